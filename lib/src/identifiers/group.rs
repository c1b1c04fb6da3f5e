use serde::{Deserialize, Serialize};

use crate::{
    constants::GROUP_IDENTIFIER_LEN,
    crypto::{GroupCrypto, GroupMasterKey, GroupSecretParams},
    error::CryptoError,
    util::base64,
};

use super::IdentifierError;

/// `GroupIdentifier` is the public name of a group.
///
/// It is derived one-way from the group's master key (master key, then
/// secret params, then public params, then identifier) and is safe to log,
/// store in clear and use as a map key. The master key cannot be recovered
/// from it.
///
/// The inner string is the standard base64 encoding of the 32 identifier
/// bytes.
#[derive(Debug, PartialEq, Eq, Clone, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupIdentifier(String);

impl GroupIdentifier {
    /// Derives the identifier of the group owning `master_key`.
    pub fn derive(
        crypto: &dyn GroupCrypto,
        master_key: &GroupMasterKey,
    ) -> Result<Self, CryptoError> {
        let secret_params = crypto.derive_secret_params(master_key)?;

        Self::from_secret_params(crypto, &secret_params)
    }

    /// Same as [`GroupIdentifier::derive`] for callers already holding the
    /// secret params.
    pub fn from_secret_params(
        crypto: &dyn GroupCrypto,
        secret_params: &GroupSecretParams,
    ) -> Result<Self, CryptoError> {
        let public_params = crypto.public_params(secret_params)?;
        let identifier = crypto.group_identifier(&public_params)?;

        Ok(Self::from_bytes(identifier))
    }

    pub fn from_bytes(bytes: [u8; GROUP_IDENTIFIER_LEN]) -> Self {
        Self(base64::encode(bytes))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn to_bytes(&self) -> Result<[u8; GROUP_IDENTIFIER_LEN], IdentifierError> {
        let bytes = base64::decode(&self.0).map_err(|_| IdentifierError::InvalidEncoding)?;
        let actual = bytes.len();

        bytes.try_into().map_err(|_| IdentifierError::InvalidLength {
            expected: GROUP_IDENTIFIER_LEN,
            actual,
        })
    }
}

impl TryFrom<&str> for GroupIdentifier {
    type Error = IdentifierError;

    /// Parses a stored identifier, checking that it is well formed.
    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let identifier = Self(value.to_owned());
        identifier.to_bytes()?;

        Ok(identifier)
    }
}

impl std::fmt::Display for GroupIdentifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Group({})", self.0)
    }
}
