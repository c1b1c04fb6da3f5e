use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_CDN_HOST, DEFAULT_CHAT_HOST, DEFAULT_STORAGE_HOST};

/// The hosts a client talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Host {
    /// Account-authenticated chat service: credential issuance.
    Chat,
    /// Group management: encrypted group state.
    Storage,
    /// Content delivery: encrypted avatars.
    Cdn,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceHosts {
    pub chat_host: String,
    pub storage_host: String,
    pub cdn_host: String,
}

impl Default for ServiceHosts {
    fn default() -> Self {
        Self {
            chat_host: DEFAULT_CHAT_HOST.to_string(),
            storage_host: DEFAULT_STORAGE_HOST.to_string(),
            cdn_host: DEFAULT_CDN_HOST.to_string(),
        }
    }
}

impl ServiceHosts {
    pub fn host(&self, host: Host) -> &str {
        match host {
            Host::Chat => &self.chat_host,
            Host::Storage => &self.storage_host,
            Host::Cdn => &self.cdn_host,
        }
    }

    /// `https://<host><path>`. `path` must start with `/`.
    pub fn https_url(&self, host: Host, path: &str) -> String {
        format!("https://{}{path}", self.host(host))
    }
}
