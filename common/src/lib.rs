//! Shared building blocks for `pvesd`.
//!
//! Everything here is free of network I/O: the run configuration, the error
//! taxonomy shared by the other crates, the Proxmox wire models, and the pure
//! address filtering applied to guest agent reports.

pub mod cluster;
pub mod config;
pub mod error;
pub mod log;
pub mod network;
pub mod target;

#[doc(hidden)]
pub use tracing;
