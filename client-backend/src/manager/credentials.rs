//! Daily group credentials.
//!
//! The server hands out one anonymous credential per day, a week at a time.
//! Each group request proves membership with a presentation built from
//! today's credential and the group's secret params.
use lib::{
    api::credentials::GroupCredentials,
    crypto::{rng::presentation_randomness, AuthCredentialResponse, GroupMasterKey},
    util::time::RedemptionDay,
};

use super::{
    error::{GroupError, Result, Stage},
    GroupManager,
};
use crate::net::BasicAuth;

/// Basic credentials of a single group request.
#[derive(Clone, PartialEq, Eq)]
pub struct GroupAuth {
    /// Hex of the group public params.
    pub username: String,
    /// Hex of the credential presentation.
    pub password: String,
}

impl std::fmt::Debug for GroupAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GroupAuth")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

impl From<GroupAuth> for BasicAuth {
    fn from(value: GroupAuth) -> Self {
        BasicAuth {
            username: value.username,
            password: value.password,
        }
    }
}

impl GroupManager {
    /// Fetches the bundle for `[today, today + window)` over the
    /// authenticated channel and checks that it was issued to us.
    async fn fetch_new_group_credentials(&self, today: RedemptionDay) -> Result<GroupCredentials> {
        let end = today.plus_days(self.config.credential_window_days);
        let path = GroupCredentials::request_path(today, end);

        let response = self
            .transport
            .request_authenticated(&path)
            .await
            .map_err(GroupError::transport(Stage::CredentialFetch))?;

        if response.status != 200 {
            return Err(GroupError::BadStatus {
                stage: Stage::CredentialFetch,
                status: response.status,
            });
        }

        let credentials = GroupCredentials::from_json(&response.body).map_err(|e| {
            log::error!("Group credential response is not valid JSON: {e}");
            GroupError::Decode {
                stage: Stage::CredentialFetch,
                source: e.into(),
            }
        })?;

        let aci_mismatch = matches!(credentials.aci, Some(aci) if aci != self.account.aci);
        if credentials.pni != self.account.pni || aci_mismatch {
            log::error!(
                "Group credentials were issued to {} / {:?}, we are {} / {}",
                credentials.pni,
                credentials.aci,
                self.account.pni,
                self.account.aci
            );
            return Err(GroupError::CredentialIdentityMismatch);
        }

        Ok(credentials)
    }

    /// The server response for `today`, refetching the bundle when the cached
    /// one does not cover it. A failed refetch leaves the cached bundle as it
    /// was.
    async fn credential_for_day(&self, today: RedemptionDay) -> Result<AuthCredentialResponse> {
        let mut cached = self.credentials.lock().await;

        if let Some(credential) = cached
            .as_ref()
            .and_then(|bundle| bundle.credential_for_day(today))
        {
            return Ok(AuthCredentialResponse::from(credential.credential.clone()));
        }

        log::debug!("No group credential cached for {today}, requesting a new bundle");
        let bundle = self.fetch_new_group_credentials(today).await?;
        let credential = bundle
            .credential_for_day(today)
            .map(|credential| AuthCredentialResponse::from(credential.credential.clone()));
        *cached = Some(bundle);

        credential.ok_or_else(|| {
            log::error!("The new group credential bundle has nothing for {today}");
            GroupError::NoCredentialForToday(today)
        })
    }

    /// Authorization for one request about the group owning `master_key`,
    /// valid for the current day.
    pub async fn get_authorization_for_today(
        &self,
        master_key: &GroupMasterKey,
    ) -> Result<GroupAuth> {
        let today = RedemptionDay::containing(self.clock.now());
        let response = self.credential_for_day(today).await?;

        let credential = self
            .crypto
            .receive_auth_credential(
                self.account.aci,
                self.account.pni,
                today.as_epoch_seconds(),
                &response,
            )
            .map_err(|e| {
                log::error!("Could not verify the group credential for {today}: {e}");
                GroupError::crypto(Stage::CredentialRedeem)(e)
            })?;

        let secret_params = self
            .crypto
            .derive_secret_params(master_key)
            .map_err(GroupError::crypto(Stage::DeriveIdentifier))?;
        let public_params = self
            .crypto
            .public_params(&secret_params)
            .map_err(GroupError::crypto(Stage::DeriveIdentifier))?;

        let presentation = self
            .crypto
            .create_auth_presentation(presentation_randomness(), &secret_params, &credential)
            .map_err(GroupError::crypto(Stage::CredentialRedeem))?;

        Ok(GroupAuth {
            username: hex::encode(public_params.as_bytes()),
            password: hex::encode(presentation.as_bytes()),
        })
    }
}
