use std::sync::Arc;

use lib::{
    api::{proto, server::Host},
    constants::GROUPS_PATH,
    crypto::{GroupMasterKey, SerializedGroupMasterKey},
    identifiers::GroupIdentifier,
};

use super::{
    error::{GroupError, Result, Stage},
    GroupManager,
};
use crate::groups::{
    decrypt::{decrypt_avatar, decrypt_group},
    Group,
};

impl GroupManager {
    /// Master keys should be stored as soon as they are seen, and groups
    /// referred to by identifier from then on. Returns that identifier.
    pub async fn store_master_key(
        &self,
        master_key: &SerializedGroupMasterKey,
    ) -> Result<GroupIdentifier> {
        let group_id = GroupIdentifier::derive(&*self.crypto, &master_key.to_master_key()?)
            .map_err(GroupError::crypto(Stage::DeriveIdentifier))?;

        self.group_store
            .store_master_key(&group_id, master_key)
            .await
            .map_err(GroupError::database(Stage::MasterKeyStore))?;

        Ok(group_id)
    }

    async fn master_key_for_group(&self, group_id: &GroupIdentifier) -> Result<GroupMasterKey> {
        let serialized = self
            .group_store
            .master_key_for_group(group_id)
            .await
            .map_err(GroupError::database(Stage::MasterKeyLookup))?
            .ok_or_else(|| GroupError::MissingMasterKey(group_id.clone()))?;

        Ok(serialized.to_master_key()?)
    }

    async fn fetch_group_by_id(&self, group_id: &GroupIdentifier) -> Result<Group> {
        let master_key = self.master_key_for_group(group_id).await?;
        let auth = self.get_authorization_for_today(&master_key).await?;

        let response = self
            .transport
            .request_http(Host::Storage, GROUPS_PATH, &auth.into())
            .await
            .map_err(GroupError::transport(Stage::GroupFetch))?;

        if response.status != 200 {
            return Err(GroupError::BadStatus {
                stage: Stage::GroupFetch,
                status: response.status,
            });
        }

        let encrypted = proto::Group::from_bytes(&response.body).map_err(|e| {
            log::error!("Could not decode the encrypted group {group_id}");
            GroupError::Decode {
                stage: Stage::GroupFetch,
                source: e.into(),
            }
        })?;

        let group = decrypt_group(&*self.crypto, &encrypted, &master_key)?;

        // The members' profile keys may be new to us
        for member in &group.members {
            self.profile_keys
                .store_profile_key(member.user_id, &member.profile_key)
                .await
                .map_err(GroupError::database(Stage::ProfileKeyStore))?;
        }

        Ok(group)
    }

    /// The group at `min_revision` or later, from cache when it was fetched
    /// recently enough.
    pub async fn retrieve_group_by_id(
        &self,
        group_id: &GroupIdentifier,
        min_revision: u32,
    ) -> Result<Arc<Group>> {
        self.cache
            .get_or_fetch(group_id, min_revision, &*self.clock, || {
                self.fetch_group_by_id(group_id)
            })
            .await
    }

    /// Forgets the cached copy, so the next retrieval fetches.
    pub async fn invalidate_group(&self, group_id: &GroupIdentifier) {
        self.cache.invalidate(group_id).await;
    }

    /// Downloads and decrypts the group's avatar. `Ok(None)` when the group
    /// has none.
    pub async fn download_group_avatar(&self, group: &Group) -> Result<Option<Vec<u8>>> {
        if group.avatar_path.is_empty() {
            return Ok(None);
        }

        let path = if group.avatar_path.starts_with('/') {
            group.avatar_path.clone()
        } else {
            format!("/{}", group.avatar_path)
        };

        let response = self
            .transport
            .request_http(Host::Cdn, &path, &self.account.basic_auth())
            .await
            .map_err(GroupError::transport(Stage::AvatarFetch))?;

        if !response.is_success() {
            return Err(GroupError::BadStatus {
                stage: Stage::AvatarFetch,
                status: response.status,
            });
        }

        decrypt_avatar(&*self.crypto, &response.body, &group.master_key).map(Some)
    }
}
