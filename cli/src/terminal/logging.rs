use std::io::IsTerminal;

use colored::*;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::FormatEvent;
use tracing_subscriber::fmt::format::{self, Writer};
use tracing_subscriber::registry::LookupSpan;

use pvesd_common::log::SUCCESS_TARGET;

pub struct PvesdFormatter;

impl<S, N> FormatEvent<S, N> for PvesdFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> format::FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &tracing_subscriber::fmt::FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> std::fmt::Result {
        let meta = event.metadata();

        type Paint = fn(ColoredString) -> ColoredString;
        let (symbol, color_func): (&str, Paint) = match *meta.level() {
            Level::INFO if meta.target() == SUCCESS_TARGET => ("[✓]", |s| s.bright_green().bold()),
            Level::TRACE => ("[ ]", |s| s.dimmed()),
            Level::DEBUG => ("[?]", |s| s.blue()),
            Level::INFO => ("[+]", |s| s.green().bold()),
            Level::WARN => ("[*]", |s| s.yellow().bold()),
            Level::ERROR => ("[-]", |s| s.red().bold()),
        };

        write!(writer, "{} ", color_func(symbol.into()))?;

        ctx.field_format().format_fields(writer.by_ref(), event)?;

        writeln!(writer)
    }
}

/// Default filter for a given `-q` count. `RUST_LOG` takes precedence.
pub fn default_directive(quiet: u8) -> &'static str {
    match quiet {
        0 => "info",
        1 => "warn",
        _ => "error",
    }
}

/// Installs the global subscriber. Logs go to stderr so `print` output stays clean.
pub fn init(quiet: u8) {
    if !std::io::stderr().is_terminal() {
        colored::control::set_override(false);
    }

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(quiet)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .event_format(PvesdFormatter)
        .init();
}
