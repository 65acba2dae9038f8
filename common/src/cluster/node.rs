use serde::Deserialize;

pub const ONLINE: &str = "online";

/// An entry of `GET /api2/json/nodes`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NodeEntry {
    pub node: String,
    #[serde(default)]
    pub status: String,
}

impl NodeEntry {
    pub fn is_online(&self) -> bool {
        self.status == ONLINE
    }
}
