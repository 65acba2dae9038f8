use std::io::Write;

use anyhow::Context;
use pvesd_common::config::Config;
use pvesd_core::pipeline;

pub async fn print(cfg: &Config) -> anyhow::Result<()> {
    let client = pipeline::connect(cfg)?;
    let (report, document) = pipeline::render(&client, cfg).await?;

    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{document}").context("failed to write document to stdout")?;

    pipeline::summarize(&report);
    Ok(())
}
