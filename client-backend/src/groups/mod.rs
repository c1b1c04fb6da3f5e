//! Decrypted group state: the model, the decryption pipeline that produces
//! it, and the per-session cache that holds it.
pub mod cache;
pub mod decrypt;
pub mod model;

pub use model::{Group, GroupMember, GroupMemberRole};
