//! Address handling for guest agent reports.
//!
//! * [`subnet`] parses the optional target network restricting valid scrape endpoints.
//! * [`address`] decides whether a single reported address may become a scrape target.

pub mod address;
pub mod subnet;
