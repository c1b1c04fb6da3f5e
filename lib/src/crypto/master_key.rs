//! The group master key and its serialized (storage) form.
//!
//! A master key is the root secret of one group. It is held by every member,
//! never sent to the group service, and converted losslessly between the raw
//! bytes consumed by [`GroupCrypto`](super::GroupCrypto) and the base64 text
//! kept in the group store.
use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::{constants::GROUP_MASTER_KEY_LEN, util::base64};

#[derive(thiserror::Error, Debug, PartialEq, Eq, Clone)]
pub enum MasterKeyError {
    #[error("The serialized master key is not valid base64")]
    InvalidEncoding,
    #[error("A master key is 32 bytes long, got {0}")]
    InvalidLength(usize),
}

#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct GroupMasterKey([u8; GROUP_MASTER_KEY_LEN]);

impl GroupMasterKey {
    pub const fn from_bytes(bytes: [u8; GROUP_MASTER_KEY_LEN]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; GROUP_MASTER_KEY_LEN] {
        &self.0
    }

    pub fn serialize(&self) -> SerializedGroupMasterKey {
        SerializedGroupMasterKey(base64::encode(self.0))
    }
}

impl TryFrom<&[u8]> for GroupMasterKey {
    type Error = MasterKeyError;

    fn try_from(value: &[u8]) -> Result<Self, Self::Error> {
        let bytes = value
            .try_into()
            .map_err(|_| MasterKeyError::InvalidLength(value.len()))?;

        Ok(Self(bytes))
    }
}

impl std::fmt::Debug for GroupMasterKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("GroupMasterKey(..)")
    }
}

/// Base64 text form of a [`GroupMasterKey`].
///
/// Values are only ever produced by [`GroupMasterKey::serialize`] or read back
/// from a store that was filled that way, so a decode failure means the store
/// is corrupt. It is still reported as [`MasterKeyError`] rather than a panic
/// so store migrations can surface it.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
#[serde(transparent)]
pub struct SerializedGroupMasterKey(String);

impl SerializedGroupMasterKey {
    /// Wraps text read from storage. Validation happens in
    /// [`SerializedGroupMasterKey::to_master_key`].
    pub fn new(serialized: String) -> Self {
        Self(serialized)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn to_master_key(&self) -> Result<GroupMasterKey, MasterKeyError> {
        let mut bytes = base64::decode(&self.0).map_err(|_| MasterKeyError::InvalidEncoding)?;
        let master_key = GroupMasterKey::try_from(bytes.as_slice());
        bytes.zeroize();

        master_key
    }
}

impl std::fmt::Debug for SerializedGroupMasterKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SerializedGroupMasterKey(..)")
    }
}
