use lib::{
    api::proto::GroupContextV2,
    crypto::{GroupMasterKey, ProfileKey},
    identifiers::{GroupIdentifier, Uuid},
};

/// Role of a member. Closed set: any value the server sends that we don't
/// know maps to [`GroupMemberRole::Unknown`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GroupMemberRole {
    #[default]
    Unknown,
    Default,
    Administrator,
}

impl From<i32> for GroupMemberRole {
    fn from(value: i32) -> Self {
        match value {
            1 => GroupMemberRole::Default,
            2 => GroupMemberRole::Administrator,
            _ => GroupMemberRole::Unknown,
        }
    }
}

impl From<GroupMemberRole> for i32 {
    fn from(value: GroupMemberRole) -> Self {
        match value {
            GroupMemberRole::Unknown => 0,
            GroupMemberRole::Default => 1,
            GroupMemberRole::Administrator => 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupMember {
    pub user_id: Uuid,
    pub role: GroupMemberRole,
    pub profile_key: ProfileKey,
    pub joined_at_revision: u32,
}

/// A decrypted group.
///
/// `group_identifier` is what the rest of the client should use to refer to
/// the group. The master key stays inside this crate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    pub(crate) master_key: GroupMasterKey,
    pub group_identifier: GroupIdentifier,

    pub title: String,
    pub avatar_path: String,
    pub description: String,
    pub announcements_only: bool,
    /// Disappearing message timer in seconds, zero when disabled.
    pub disappearing_messages_duration: u32,
    pub revision: u32,
    pub members: Vec<GroupMember>,
}

impl Group {
    pub fn member(&self, user_id: Uuid) -> Option<&GroupMember> {
        self.members.iter().find(|member| member.user_id == user_id)
    }

    /// The group context carried by outgoing data messages: the raw master
    /// key and the revision the sender saw.
    pub fn group_context(&self) -> GroupContextV2 {
        GroupContextV2 {
            master_key: Some(self.master_key.as_bytes().to_vec()),
            revision: Some(self.revision),
            group_change: None,
        }
    }
}
