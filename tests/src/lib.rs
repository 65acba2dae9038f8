//! End-to-end tests for the discovery pipeline against a mocked Proxmox API.

#[cfg(test)]
mod support;

#[cfg(test)]
mod pipeline;
