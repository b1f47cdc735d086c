use std::fmt::Display;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerInfo {
    pub id: String,
    pub name: String,
    pub ip_address: String,
    pub fqdn: String,
    #[serde(rename = "type")]
    pub kind: ServerKind,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServerKind {
    Sccm,
    Patchmypc,
    License,
    Development,
    #[default]
    Other,
}

impl ServerKind {
    pub(crate) fn cycle_next(&mut self) {
        *self = match self {
            ServerKind::Sccm => ServerKind::Patchmypc,
            ServerKind::Patchmypc => ServerKind::License,
            ServerKind::License => ServerKind::Development,
            ServerKind::Development => ServerKind::Other,
            ServerKind::Other => ServerKind::Sccm,
        };
    }
}

impl Display for ServerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ServerKind::Sccm => write!(f, "SCCM"),
            ServerKind::Patchmypc => write!(f, "Patch My PC"),
            ServerKind::License => write!(f, "License"),
            ServerKind::Development => write!(f, "Development"),
            ServerKind::Other => write!(f, "Other"),
        }
    }
}
