//! Wire messages of the group service.
//!
//! Only the fields this crate reads are declared; prost skips the others
//! when decoding.
pub use prost::Message as ProstMessage;

use crate::error::ProtoError;

/// An encrypted group as returned by `GET /v1/groups`.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Group {
    #[prost(bytes = "vec", tag = "1")]
    pub public_key: Vec<u8>,
    #[prost(bytes = "vec", tag = "2")]
    pub title: Vec<u8>,
    /// CDN path of the encrypted avatar. Not encrypted itself.
    #[prost(string, tag = "3")]
    pub avatar: String,
    #[prost(bytes = "vec", tag = "4")]
    pub disappearing_messages_timer: Vec<u8>,
    #[prost(uint32, tag = "6")]
    pub revision: u32,
    #[prost(message, repeated, tag = "7")]
    pub members: Vec<Member>,
    #[prost(bytes = "vec", tag = "11")]
    pub description: Vec<u8>,
    #[prost(bool, tag = "12")]
    pub announcements_only: bool,
}

impl Group {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ProtoError> {
        Self::decode(bytes).map_err(|_| ProtoError)
    }
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Member {
    #[prost(bytes = "vec", tag = "1")]
    pub user_id: Vec<u8>,
    /// Numeric role. Values this crate does not know about are kept as-is on
    /// the wire and mapped to an unknown role when decrypted.
    #[prost(int32, tag = "2")]
    pub role: i32,
    #[prost(bytes = "vec", tag = "3")]
    pub profile_key: Vec<u8>,
    #[prost(bytes = "vec", tag = "4")]
    pub presentation: Vec<u8>,
    #[prost(uint32, tag = "5")]
    pub joined_at_revision: u32,
}

impl Member {
    /// A member entry with neither identifier nor key: the wire
    /// representation of a null slot. Such entries are skipped.
    pub fn is_vacant(&self) -> bool {
        self.user_id.is_empty() && self.profile_key.is_empty()
    }
}

/// The plaintext of every encrypted group attribute.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct GroupAttributeBlob {
    #[prost(oneof = "group_attribute_blob::Content", tags = "1, 2, 3, 4")]
    pub content: Option<group_attribute_blob::Content>,
}

pub mod group_attribute_blob {
    #[derive(Clone, PartialEq, ::prost::Oneof)]
    pub enum Content {
        #[prost(string, tag = "1")]
        Title(String),
        #[prost(bytes = "vec", tag = "2")]
        Avatar(Vec<u8>),
        #[prost(uint32, tag = "3")]
        DisappearingMessagesDuration(u32),
        #[prost(string, tag = "4")]
        Description(String),
    }
}

impl GroupAttributeBlob {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ProtoError> {
        Self::decode(bytes).map_err(|_| ProtoError)
    }

    /// The title, or `""` when the blob holds something else.
    pub fn title(&self) -> &str {
        match &self.content {
            Some(group_attribute_blob::Content::Title(title)) => title,
            _ => "",
        }
    }

    pub fn description(&self) -> &str {
        match &self.content {
            Some(group_attribute_blob::Content::Description(description)) => description,
            _ => "",
        }
    }

    pub fn disappearing_messages_duration(&self) -> u32 {
        match &self.content {
            Some(group_attribute_blob::Content::DisappearingMessagesDuration(duration)) => {
                *duration
            }
            _ => 0,
        }
    }

    pub fn into_avatar(self) -> Vec<u8> {
        match self.content {
            Some(group_attribute_blob::Content::Avatar(avatar)) => avatar,
            _ => Vec::new(),
        }
    }
}

/// Group context attached to outgoing data messages.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct GroupContextV2 {
    #[prost(bytes = "vec", optional, tag = "1")]
    pub master_key: Option<Vec<u8>>,
    #[prost(uint32, optional, tag = "2")]
    pub revision: Option<u32>,
    #[prost(bytes = "vec", optional, tag = "3")]
    pub group_change: Option<Vec<u8>>,
}
