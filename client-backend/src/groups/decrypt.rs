//! Turns an encrypted group record into a [`Group`].
//!
//! Title, timer and members are mandatory: if any of them fails the whole
//! group fails. The description is best effort and degrades to `""`.
use lib::{
    api::proto::{self, GroupAttributeBlob},
    crypto::{
        GroupCrypto, GroupMasterKey, GroupSecretParams, ProfileKeyCiphertext, UuidCiphertext,
    },
    error::{CryptoError, ProtoError},
    identifiers::GroupIdentifier,
};

use super::model::{Group, GroupMember};
use crate::manager::error::{GroupError, Result, Stage};

/// The part of a group a decryption failure is attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupField {
    Title,
    Description,
    DisappearingTimer,
    MemberUserId,
    MemberProfileKey,
    Avatar,
}

impl std::fmt::Display for GroupField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            GroupField::Title => "title",
            GroupField::Description => "description",
            GroupField::DisappearingTimer => "disappearing messages timer",
            GroupField::MemberUserId => "member user id",
            GroupField::MemberProfileKey => "member profile key",
            GroupField::Avatar => "avatar",
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum FieldError {
    #[error("{0}")]
    Crypto(#[from] CryptoError),
    #[error("{0}")]
    Blob(#[from] ProtoError),
}

fn field_error(field: GroupField) -> impl FnOnce(FieldError) -> GroupError {
    move |source| GroupError::Decrypt { field, source }
}

fn decrypt_attribute_blob(
    crypto: &dyn GroupCrypto,
    secret_params: &GroupSecretParams,
    ciphertext: &[u8],
) -> std::result::Result<GroupAttributeBlob, FieldError> {
    let plaintext = crypto.decrypt_blob_with_padding(secret_params, ciphertext)?;

    Ok(GroupAttributeBlob::from_bytes(&plaintext)?)
}

pub fn decrypt_group(
    crypto: &dyn GroupCrypto,
    encrypted: &proto::Group,
    master_key: &GroupMasterKey,
) -> Result<Group> {
    let secret_params = crypto
        .derive_secret_params(master_key)
        .map_err(GroupError::crypto(Stage::DeriveIdentifier))?;
    let group_identifier = GroupIdentifier::from_secret_params(crypto, &secret_params)
        .map_err(GroupError::crypto(Stage::DeriveIdentifier))?;

    let title_blob = decrypt_attribute_blob(crypto, &secret_params, &encrypted.title)
        .map_err(|e| {
            log::error!("Could not decrypt the title of {group_identifier}: {e}");
            field_error(GroupField::Title)(e)
        })?;
    let title = cleanup_string_property(title_blob.title());

    let description = if encrypted.description.is_empty() {
        String::new()
    } else {
        match decrypt_attribute_blob(crypto, &secret_params, &encrypted.description) {
            Ok(blob) => cleanup_string_property(blob.description()),
            Err(e) => {
                log::warn!("Ignoring undecryptable description of {group_identifier}: {e}");
                String::new()
            }
        }
    };

    let disappearing_messages_duration = if encrypted.disappearing_messages_timer.is_empty() {
        0
    } else {
        decrypt_attribute_blob(crypto, &secret_params, &encrypted.disappearing_messages_timer)
            .map_err(field_error(GroupField::DisappearingTimer))?
            .disappearing_messages_duration()
    };

    let members = encrypted
        .members
        .iter()
        .filter(|member| !member.is_vacant())
        .map(|member| decrypt_member(crypto, &secret_params, member))
        .collect::<Result<Vec<_>>>()
        .inspect_err(|e| log::error!("Could not decrypt the members of {group_identifier}: {e}"))?;

    Ok(Group {
        master_key: master_key.clone(),
        group_identifier,
        title,
        // These aren't encrypted
        avatar_path: encrypted.avatar.clone(),
        description,
        announcements_only: encrypted.announcements_only,
        disappearing_messages_duration,
        revision: encrypted.revision,
        members,
    })
}

fn decrypt_member(
    crypto: &dyn GroupCrypto,
    secret_params: &GroupSecretParams,
    member: &proto::Member,
) -> Result<GroupMember> {
    let user_id = crypto
        .decrypt_user_id(
            secret_params,
            &UuidCiphertext::from(member.user_id.clone()),
        )
        .map_err(|e| field_error(GroupField::MemberUserId)(e.into()))?;

    // The profile key ciphertext is bound to the user id, so it has to be
    // decrypted second.
    let profile_key = crypto
        .decrypt_profile_key(
            secret_params,
            &ProfileKeyCiphertext::from(member.profile_key.clone()),
            user_id,
        )
        .map_err(|e| field_error(GroupField::MemberProfileKey)(e.into()))?;

    Ok(GroupMember {
        user_id,
        role: member.role.into(),
        profile_key,
        joined_at_revision: member.joined_at_revision,
    })
}

/// Decrypts an avatar downloaded from the CDN.
pub fn decrypt_avatar(
    crypto: &dyn GroupCrypto,
    encrypted_avatar: &[u8],
    master_key: &GroupMasterKey,
) -> Result<Vec<u8>> {
    let secret_params = crypto
        .derive_secret_params(master_key)
        .map_err(GroupError::crypto(Stage::DeriveIdentifier))?;

    let blob = decrypt_attribute_blob(crypto, &secret_params, encrypted_avatar)
        .map_err(field_error(GroupField::Avatar))?;

    Ok(blob.into_avatar())
}

/// Strips non-printable characters and surrounding whitespace from a
/// user-controlled string.
pub fn cleanup_string_property(property: &str) -> String {
    property
        .chars()
        .filter(|&c| is_graphic(c))
        .collect::<String>()
        .trim()
        .to_owned()
}

/// Letters, marks, numbers, punctuation, symbols and spaces. Control,
/// format (bidi overrides, zero-width characters), separator-line and
/// private-use characters are not graphic.
fn is_graphic(c: char) -> bool {
    if c.is_control() {
        return false;
    }

    !matches!(
        c,
        '\u{00AD}'
            | '\u{0600}'..='\u{0605}'
            | '\u{061C}'
            | '\u{06DD}'
            | '\u{070F}'
            | '\u{08E2}'
            | '\u{180E}'
            | '\u{200B}'..='\u{200F}'
            | '\u{2028}'..='\u{202E}'
            | '\u{2060}'..='\u{2064}'
            | '\u{2066}'..='\u{206F}'
            | '\u{E000}'..='\u{F8FF}'
            | '\u{FEFF}'
            | '\u{FFF9}'..='\u{FFFB}'
            | '\u{F0000}'..='\u{10FFFF}'
    )
}
