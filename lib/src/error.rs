#[derive(Debug, thiserror::Error, PartialEq)]
#[error("The protobuf could not be deserialized (invalid data or unexpected output).")]
pub struct ProtoError;

/// Failures reported by a [`GroupCrypto`](crate::crypto::GroupCrypto) collaborator.
#[derive(Debug, thiserror::Error, PartialEq, Eq, Clone)]
pub enum CryptoError {
    #[error("The ciphertext could not be decrypted with these group parameters")]
    DecryptionFailed,
    #[error("The input has an invalid length or encoding")]
    InvalidInput,
    #[error("The credential or proof could not be verified")]
    VerificationFailed,
}
