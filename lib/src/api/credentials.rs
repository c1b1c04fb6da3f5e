//! JSON body of `GET /v1/certificate/auth/group`.
use serde::{Deserialize, Serialize};

use crate::{
    constants::GROUP_CREDENTIALS_PATH,
    identifiers::{Aci, Pni},
    util::time::RedemptionDay,
};

/// A bundle of group credentials, one per redemption day, issued to one
/// account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupCredentials {
    pub credentials: Vec<GroupCredential>,
    /// Not every server version echoes the ACI back.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aci: Option<Aci>,
    pub pni: Pni,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupCredential {
    #[serde(with = "crate::util::base64::serde_bytes")]
    pub credential: Vec<u8>,
    /// Start of the day this credential can be presented on, in epoch seconds.
    pub redemption_time: u64,
}

impl GroupCredentials {
    /// Path requesting credentials for every day in `[start, end)`.
    pub fn request_path(start: RedemptionDay, end: RedemptionDay) -> String {
        format!(
            "{GROUP_CREDENTIALS_PATH}?redemptionStartSeconds={}&redemptionEndSeconds={}",
            start.as_epoch_seconds(),
            end.as_epoch_seconds()
        )
    }

    pub fn from_json(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }

    /// The credential redeemable on exactly `day`, if the bundle has one.
    pub fn credential_for_day(&self, day: RedemptionDay) -> Option<&GroupCredential> {
        self.credentials
            .iter()
            .find(|credential| credential.redemption_time == day.as_epoch_seconds())
    }
}
