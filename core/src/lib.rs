//! # pvesd core
//!
//! The discovery pipeline for Proxmox VE clusters:
//!
//! * **[`cluster`]**: the [`cluster::ClusterApi`] port and its HTTP adapter.
//! * **[`discovery`]**: node and VM enumeration, turning agent reports into targets.
//! * **[`publish`]**: rendering the document and replacing the output file atomically.
//! * **[`pipeline`]**: sequencing all of the above for a single run.

pub mod cluster;
pub mod discovery;
pub mod pipeline;
pub mod publish;
