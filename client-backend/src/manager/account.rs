use lib::identifiers::{Aci, Pni};

use crate::net::BasicAuth;

/// The registered account the group session runs as. Read-only here.
#[derive(Clone, PartialEq, Eq)]
pub struct Account {
    pub aci: Aci,
    pub pni: Pni,
    pub device_id: u32,
    password: String,
}

impl Account {
    pub fn new(aci: Aci, pni: Pni, device_id: u32, password: String) -> Self {
        Self {
            aci,
            pni,
            device_id,
            password,
        }
    }

    /// Basic credentials of this device: `<aci>.<device id>` and the account
    /// password.
    pub fn basic_auth(&self) -> BasicAuth {
        BasicAuth {
            username: format!("{}.{}", self.aci.as_uuid(), self.device_id),
            password: self.password.clone(),
        }
    }
}

impl std::fmt::Debug for Account {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Account")
            .field("aci", &self.aci)
            .field("pni", &self.pni)
            .field("device_id", &self.device_id)
            .finish_non_exhaustive()
    }
}
