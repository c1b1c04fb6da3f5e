//! Identifiers for accounts and groups.
pub use uuid::Uuid;

pub mod account;
pub mod group;

pub use {
    account::{Aci, Pni},
    group::GroupIdentifier,
};

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum IdentifierError {
    #[error("The input is not valid base64")]
    InvalidEncoding,
    #[error("The input has the wrong length: expected {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },
}
