//! The seam between this crate and the zero-knowledge group primitives.
//!
//! Everything here is opaque bytes handed to, and returned by, a
//! [`GroupCrypto`] collaborator. Values carrying secrets are zeroized when
//! dropped, so they are released on every exit path of the scope that
//! derived them.
use std::fmt::Debug;

use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::{
    constants::{GROUP_IDENTIFIER_LEN, PROFILE_KEY_LEN, RANDOMNESS_LEN},
    error::CryptoError,
    identifiers::{Aci, Pni, Uuid},
};

pub mod master_key;
pub mod rng;
#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

pub use master_key::{GroupMasterKey, MasterKeyError, SerializedGroupMasterKey};

macro_rules! opaque_bytes {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, PartialEq, Eq)]
        pub struct $name(Vec<u8>);

        impl $name {
            pub fn as_bytes(&self) -> &[u8] {
                &self.0
            }
        }

        impl From<Vec<u8>> for $name {
            fn from(value: Vec<u8>) -> Self {
                Self(value)
            }
        }
    };
}

opaque_bytes!(
    /// Secret group parameters, derived from the master key for the length of
    /// one operation and never persisted.
    #[derive(Zeroize, ZeroizeOnDrop)]
    GroupSecretParams
);
opaque_bytes!(
    /// Public group parameters. Sent to the server (hex encoded) as the
    /// username of a group request.
    GroupPublicParams
);
opaque_bytes!(
    /// An encrypted user identifier as stored in a group member entry.
    UuidCiphertext
);
opaque_bytes!(
    /// An encrypted profile key, bound to the member's user identifier.
    ProfileKeyCiphertext
);
opaque_bytes!(
    /// The server's response for one day of a group credential bundle.
    AuthCredentialResponse
);
opaque_bytes!(
    /// A received (verified) anonymous credential for one redemption day.
    #[derive(Zeroize, ZeroizeOnDrop)]
    AuthCredential
);
opaque_bytes!(
    /// Proof of group membership for one request, scoped to one group.
    AuthCredentialPresentation
);

impl Debug for GroupSecretParams {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("GroupSecretParams(..)")
    }
}

impl Debug for AuthCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("AuthCredential(..)")
    }
}

impl Debug for GroupPublicParams {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "GroupPublicParams({} bytes)", self.0.len())
    }
}

impl Debug for UuidCiphertext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "UuidCiphertext({} bytes)", self.0.len())
    }
}

impl Debug for ProfileKeyCiphertext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ProfileKeyCiphertext({} bytes)", self.0.len())
    }
}

impl Debug for AuthCredentialResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "AuthCredentialResponse({} bytes)", self.0.len())
    }
}

impl Debug for AuthCredentialPresentation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "AuthCredentialPresentation({} bytes)", self.0.len())
    }
}

/// A member's profile key, as recovered from group state.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct ProfileKey([u8; PROFILE_KEY_LEN]);

impl ProfileKey {
    pub const fn from_bytes(bytes: [u8; PROFILE_KEY_LEN]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; PROFILE_KEY_LEN] {
        &self.0
    }
}

impl TryFrom<&[u8]> for ProfileKey {
    type Error = CryptoError;

    fn try_from(value: &[u8]) -> Result<Self, Self::Error> {
        Ok(Self(value.try_into().map_err(|_| CryptoError::InvalidInput)?))
    }
}

impl Debug for ProfileKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ProfileKey(..)")
    }
}

/// The zero-knowledge group primitives consumed by the client backend.
///
/// Implementations hold whatever server public parameters they need to
/// verify credentials. They are assumed correct: this crate never inspects
/// the bytes it passes through, it only decides what to do when an
/// operation fails.
pub trait GroupCrypto: Send + Sync {
    fn derive_secret_params(
        &self,
        master_key: &GroupMasterKey,
    ) -> Result<GroupSecretParams, CryptoError>;

    fn public_params(
        &self,
        secret_params: &GroupSecretParams,
    ) -> Result<GroupPublicParams, CryptoError>;

    fn group_identifier(
        &self,
        public_params: &GroupPublicParams,
    ) -> Result<[u8; GROUP_IDENTIFIER_LEN], CryptoError>;

    /// Decrypts a group attribute and strips its padding. The plaintext is an
    /// encoded `GroupAttributeBlob`.
    fn decrypt_blob_with_padding(
        &self,
        secret_params: &GroupSecretParams,
        ciphertext: &[u8],
    ) -> Result<Vec<u8>, CryptoError>;

    fn decrypt_user_id(
        &self,
        secret_params: &GroupSecretParams,
        ciphertext: &UuidCiphertext,
    ) -> Result<Uuid, CryptoError>;

    /// Decrypts a profile key. `user_id` must be the already decrypted
    /// identifier of the same member: the two ciphertexts are bound together
    /// and a mismatch fails.
    fn decrypt_profile_key(
        &self,
        secret_params: &GroupSecretParams,
        ciphertext: &ProfileKeyCiphertext,
        user_id: Uuid,
    ) -> Result<ProfileKey, CryptoError>;

    /// Verifies the server's response for `redemption_time` (a day start, in
    /// epoch seconds) and binds it to this account.
    fn receive_auth_credential(
        &self,
        aci: Aci,
        pni: Pni,
        redemption_time: u64,
        response: &AuthCredentialResponse,
    ) -> Result<AuthCredential, CryptoError>;

    fn create_auth_presentation(
        &self,
        randomness: [u8; RANDOMNESS_LEN],
        secret_params: &GroupSecretParams,
        credential: &AuthCredential,
    ) -> Result<AuthCredentialPresentation, CryptoError>;
}
