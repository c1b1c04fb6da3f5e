use lib::{
    crypto::MasterKeyError,
    error::{CryptoError, ProtoError},
    identifiers::GroupIdentifier,
    util::time::RedemptionDay,
};

use crate::{
    database::DatabaseError,
    groups::decrypt::{FieldError, GroupField},
    net::TransportError,
};

pub type Result<T, E = GroupError> = std::result::Result<T, E>;

/// Where in a group operation something went wrong.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    CredentialFetch,
    CredentialRedeem,
    DeriveIdentifier,
    GroupFetch,
    AvatarFetch,
    MasterKeyLookup,
    MasterKeyStore,
    ProfileKeyStore,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Stage::CredentialFetch => "group credential fetch",
            Stage::CredentialRedeem => "group credential redemption",
            Stage::DeriveIdentifier => "group identifier derivation",
            Stage::GroupFetch => "group fetch",
            Stage::AvatarFetch => "avatar fetch",
            Stage::MasterKeyLookup => "master key lookup",
            Stage::MasterKeyStore => "master key storage",
            Stage::ProfileKeyStore => "profile key storage",
        })
    }
}

/// How a caller should treat a [`GroupError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Network or non-success status. Safe to retry with backoff higher up.
    Transport,
    /// Decryption, decoding, proof or identity failure. Retrying cannot help.
    Integrity,
    /// A serialized master key that does not decode. Only a corrupt store
    /// produces this.
    InvalidMasterKey,
    /// The local stores failed or lack a needed entry.
    Storage,
}

#[derive(Debug, thiserror::Error)]
pub enum GroupError {
    #[error("Transport failure during {stage}: {source}")]
    Transport {
        stage: Stage,
        #[source]
        source: TransportError,
    },
    #[error("Unexpected status {status} during {stage}")]
    BadStatus { stage: Stage, status: u16 },
    #[error("The response to the {stage} could not be decoded: {source}")]
    Decode {
        stage: Stage,
        #[source]
        source: DecodeError,
    },
    #[error("Cryptographic failure during {stage}: {source}")]
    Crypto {
        stage: Stage,
        #[source]
        source: CryptoError,
    },
    #[error("Could not decrypt the group {field}: {source}")]
    Decrypt {
        field: GroupField,
        #[source]
        source: FieldError,
    },
    #[error("Asked for {expected} but its master key belongs to {actual}")]
    IdentifierMismatch {
        expected: GroupIdentifier,
        actual: GroupIdentifier,
    },
    #[error("The group credentials were issued to another account")]
    CredentialIdentityMismatch,
    #[error("The server returned no group credential for {0}")]
    NoCredentialForToday(RedemptionDay),
    #[error("Invalid group master key: {0}")]
    InvalidMasterKey(#[from] MasterKeyError),
    #[error("No master key is stored for {0}")]
    MissingMasterKey(GroupIdentifier),
    #[error("Database error during {stage}: {source}")]
    Database {
        stage: Stage,
        #[source]
        source: DatabaseError,
    },
}

/// Why a server response could not be decoded.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("{0}")]
    Protobuf(#[from] ProtoError),
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Failures while opening a [`GroupManager`](super::GroupManager).
#[derive(Debug, thiserror::Error)]
pub enum InitError {
    #[error("Could not open the group database: {0}")]
    Database(#[from] DatabaseError),
    #[error("Could not build the HTTP transport: {0}")]
    Transport(#[from] TransportError),
}

impl GroupError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            GroupError::Transport { .. } | GroupError::BadStatus { .. } => ErrorKind::Transport,
            GroupError::Decode { .. }
            | GroupError::Crypto { .. }
            | GroupError::Decrypt { .. }
            | GroupError::IdentifierMismatch { .. }
            | GroupError::CredentialIdentityMismatch
            | GroupError::NoCredentialForToday(_) => ErrorKind::Integrity,
            GroupError::InvalidMasterKey(_) => ErrorKind::InvalidMasterKey,
            GroupError::MissingMasterKey(_) | GroupError::Database { .. } => ErrorKind::Storage,
        }
    }

    pub(crate) fn transport(stage: Stage) -> impl FnOnce(TransportError) -> Self {
        move |source| GroupError::Transport { stage, source }
    }

    pub(crate) fn crypto(stage: Stage) -> impl FnOnce(CryptoError) -> Self {
        move |source| GroupError::Crypto { stage, source }
    }

    pub(crate) fn database(stage: Stage) -> impl FnOnce(DatabaseError) -> Self {
        move |source| GroupError::Database { stage, source }
    }
}
