//! A deterministic stand-in for the zero-knowledge collaborator.
//!
//! It provides no confidentiality. Ciphertexts are their plaintexts, with
//! just enough structure to make failures observable:
//! - blobs must be non-empty,
//! - a user id ciphertext is the 16 UUID bytes,
//! - a profile key ciphertext is the owner's 16 UUID bytes followed by the
//!   32 key bytes, so a ciphertext moved to another member fails,
//! - a credential response is the big-endian redemption time followed by
//!   arbitrary bytes.
use hkdf::Hkdf;
use prost::Message;
use sha2::{Digest, Sha256};

use super::{
    AuthCredential, AuthCredentialPresentation, AuthCredentialResponse, GroupCrypto,
    GroupMasterKey, GroupPublicParams, GroupSecretParams, ProfileKey, ProfileKeyCiphertext,
    UuidCiphertext,
};
use crate::{
    api::proto::{group_attribute_blob::Content, GroupAttributeBlob},
    constants::{GROUP_IDENTIFIER_LEN, PROFILE_KEY_LEN, RANDOMNESS_LEN},
    error::CryptoError,
    identifiers::{Aci, Pni, Uuid},
};

const SECRET_PARAMS_INFO: &[u8] = b"groupsync_stub_secret_params";
const PUBLIC_PARAMS_PREFIX: &[u8] = b"groupsync_stub_public_params";

#[derive(Debug, Default, Clone, Copy)]
pub struct StubGroupCrypto;

impl StubGroupCrypto {
    /// "Encrypts" an attribute blob.
    pub fn encrypt_blob(content: Content) -> Vec<u8> {
        GroupAttributeBlob {
            content: Some(content),
        }
        .encode_to_vec()
    }

    pub fn encrypt_user_id(user_id: Uuid) -> Vec<u8> {
        user_id.as_bytes().to_vec()
    }

    pub fn encrypt_profile_key(user_id: Uuid, profile_key: &ProfileKey) -> Vec<u8> {
        let mut ciphertext = user_id.as_bytes().to_vec();
        ciphertext.extend_from_slice(profile_key.as_bytes());

        ciphertext
    }

    pub fn credential_response(redemption_time: u64) -> Vec<u8> {
        let mut response = redemption_time.to_be_bytes().to_vec();
        response.extend_from_slice(b"stub credential");

        response
    }
}

impl GroupCrypto for StubGroupCrypto {
    fn derive_secret_params(
        &self,
        master_key: &GroupMasterKey,
    ) -> Result<GroupSecretParams, CryptoError> {
        let hk = Hkdf::<Sha256>::new(None, master_key.as_bytes());
        let mut secret = vec![0u8; 32];
        hk.expand(SECRET_PARAMS_INFO, &mut secret)
            .map_err(|_| CryptoError::InvalidInput)?;

        Ok(GroupSecretParams::from(secret))
    }

    fn public_params(
        &self,
        secret_params: &GroupSecretParams,
    ) -> Result<GroupPublicParams, CryptoError> {
        let digest = Sha256::new()
            .chain_update(PUBLIC_PARAMS_PREFIX)
            .chain_update(secret_params.as_bytes())
            .finalize();

        Ok(GroupPublicParams::from(digest.to_vec()))
    }

    fn group_identifier(
        &self,
        public_params: &GroupPublicParams,
    ) -> Result<[u8; GROUP_IDENTIFIER_LEN], CryptoError> {
        Ok(Sha256::digest(public_params.as_bytes()).into())
    }

    fn decrypt_blob_with_padding(
        &self,
        _secret_params: &GroupSecretParams,
        ciphertext: &[u8],
    ) -> Result<Vec<u8>, CryptoError> {
        if ciphertext.is_empty() {
            return Err(CryptoError::DecryptionFailed);
        }

        Ok(ciphertext.to_vec())
    }

    fn decrypt_user_id(
        &self,
        _secret_params: &GroupSecretParams,
        ciphertext: &UuidCiphertext,
    ) -> Result<Uuid, CryptoError> {
        Uuid::from_slice(ciphertext.as_bytes()).map_err(|_| CryptoError::DecryptionFailed)
    }

    fn decrypt_profile_key(
        &self,
        _secret_params: &GroupSecretParams,
        ciphertext: &ProfileKeyCiphertext,
        user_id: Uuid,
    ) -> Result<ProfileKey, CryptoError> {
        let bytes = ciphertext.as_bytes();
        if bytes.len() != 16 + PROFILE_KEY_LEN || bytes[..16] != user_id.as_bytes()[..] {
            return Err(CryptoError::DecryptionFailed);
        }

        ProfileKey::try_from(&bytes[16..])
    }

    fn receive_auth_credential(
        &self,
        aci: Aci,
        pni: Pni,
        redemption_time: u64,
        response: &AuthCredentialResponse,
    ) -> Result<AuthCredential, CryptoError> {
        let bytes = response.as_bytes();
        if bytes.len() < 8 || bytes[..8] != redemption_time.to_be_bytes() {
            return Err(CryptoError::VerificationFailed);
        }

        let mut credential = aci.as_uuid().as_bytes().to_vec();
        credential.extend_from_slice(pni.as_uuid().as_bytes());
        credential.extend_from_slice(bytes);

        Ok(AuthCredential::from(credential))
    }

    fn create_auth_presentation(
        &self,
        randomness: [u8; RANDOMNESS_LEN],
        secret_params: &GroupSecretParams,
        credential: &AuthCredential,
    ) -> Result<AuthCredentialPresentation, CryptoError> {
        let mut presentation = Sha256::new()
            .chain_update(secret_params.as_bytes())
            .chain_update(credential.as_bytes())
            .finalize()
            .to_vec();
        presentation.extend_from_slice(&randomness);

        Ok(AuthCredentialPresentation::from(presentation))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_key_is_bound_to_its_owner() {
        let crypto = StubGroupCrypto;
        let secret_params = crypto
            .derive_secret_params(&GroupMasterKey::from_bytes([1u8; 32]))
            .expect("derives");
        let alice = Uuid::from_u128(1);
        let bob = Uuid::from_u128(2);
        let key = ProfileKey::from_bytes([9u8; PROFILE_KEY_LEN]);
        let ciphertext = ProfileKeyCiphertext::from(StubGroupCrypto::encrypt_profile_key(alice, &key));

        assert_eq!(
            crypto.decrypt_profile_key(&secret_params, &ciphertext, alice),
            Ok(key)
        );
        assert_eq!(
            crypto.decrypt_profile_key(&secret_params, &ciphertext, bob),
            Err(CryptoError::DecryptionFailed)
        );
    }

    #[test]
    fn credential_response_is_bound_to_its_day() {
        let crypto = StubGroupCrypto;
        let response = AuthCredentialResponse::from(StubGroupCrypto::credential_response(86_400));
        let aci = Aci::from_uuid(Uuid::from_u128(1));
        let pni = Pni::from_uuid(Uuid::from_u128(2));

        assert!(crypto.receive_auth_credential(aci, pni, 86_400, &response).is_ok());
        assert_eq!(
            crypto.receive_auth_credential(aci, pni, 2 * 86_400, &response),
            Err(CryptoError::VerificationFailed)
        );
    }
}
