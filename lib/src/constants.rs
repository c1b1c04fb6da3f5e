//! Protocol constants shared between the client backend and its collaborators.
use std::time::Duration;

pub const GROUP_MASTER_KEY_LEN: usize = 32;
pub const GROUP_IDENTIFIER_LEN: usize = 32;
pub const PROFILE_KEY_LEN: usize = 32;
/// Length of the nonce handed to the collaborator when building a presentation.
pub const RANDOMNESS_LEN: usize = 32;

pub const SECONDS_PER_DAY: u64 = 24 * 60 * 60;

/// Number of days covered by one group credential bundle.
pub const CREDENTIAL_WINDOW_DAYS: u64 = 7;

/// How long a decrypted group is served from cache before it is refetched.
pub const GROUP_CACHE_FRESHNESS: Duration = Duration::from_secs(60 * 60);

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub const DEFAULT_CHAT_HOST: &str = "chat.signal.org";
pub const DEFAULT_STORAGE_HOST: &str = "storage.signal.org";
pub const DEFAULT_CDN_HOST: &str = "cdn.signal.org";

pub const GROUP_CREDENTIALS_PATH: &str = "/v1/certificate/auth/group";
pub const GROUPS_PATH: &str = "/v1/groups";
