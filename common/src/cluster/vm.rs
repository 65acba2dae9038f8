use serde::Deserialize;

pub const RUNNING: &str = "running";

/// An entry of `GET /api2/json/nodes/{node}/qemu`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct VmEntry {
    pub vmid: u32,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub status: String,
}

impl VmEntry {
    pub fn is_running(&self) -> bool {
        self.status == RUNNING
    }

    /// The configured name, or `VM-<vmid>` when the VM has none.
    pub fn display_name(&self) -> String {
        match self.name.as_deref() {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => format!("VM-{}", self.vmid),
        }
    }
}
