pub mod account;
pub mod calls;
pub mod config;
pub mod credentials;
pub mod error;
pub mod groups;

use std::{fmt::Debug, path::PathBuf, sync::Arc};

use lib::{
    api::credentials::GroupCredentials,
    crypto::GroupCrypto,
    util::time::{Clock, SystemClock},
};

use self::{account::Account, config::GroupsConfig, error::InitError};
use crate::{
    database::{Database, GroupStore, ProfileKeyStore},
    groups::cache::GroupCache,
    net::{http::ReqwestTransport, GroupTransport},
};

/// The group session of one account.
///
/// Holds the credential bundle and the group cache for that account, plus
/// the collaborators every operation goes through. Multiple accounts need
/// multiple managers.
pub struct GroupManager {
    account: Arc<Account>,
    config: GroupsConfig,

    crypto: Arc<dyn GroupCrypto>,
    transport: Arc<dyn GroupTransport>,
    group_store: Arc<dyn GroupStore>,
    profile_keys: Arc<dyn ProfileKeyStore>,
    clock: Arc<dyn Clock>,

    /// The last credential bundle fetched. The lock is held across a
    /// refetch so concurrent callers wait for it instead of fetching too.
    credentials: tokio::sync::Mutex<Option<GroupCredentials>>,
    cache: GroupCache,
}

impl Debug for GroupManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GroupManager")
            .field("account", &self.account)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl GroupManager {
    pub fn new(
        account: Arc<Account>,
        config: GroupsConfig,
        crypto: Arc<dyn GroupCrypto>,
        transport: Arc<dyn GroupTransport>,
        group_store: Arc<dyn GroupStore>,
        profile_keys: Arc<dyn ProfileKeyStore>,
    ) -> Self {
        let cache = GroupCache::new(config.cache_freshness());

        Self {
            account,
            config,
            crypto,
            transport,
            group_store,
            profile_keys,
            clock: Arc::new(SystemClock),
            credentials: tokio::sync::Mutex::new(None),
            cache,
        }
    }

    /// Replaces the wall clock, which decides both the redemption day and
    /// cache freshness.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// If `database_folder` is Some(path), the group database is created at
    /// that location. Otherwise it is kept in memory.
    pub fn initialise(
        account: Account,
        config: GroupsConfig,
        crypto: Arc<dyn GroupCrypto>,
        database_folder: Option<PathBuf>,
    ) -> Result<Arc<Self>, InitError> {
        log::info!("Initialising: Loading group database...");
        let database = Arc::new(Database::new(database_folder)?);

        let transport = ReqwestTransport::new(
            config.hosts.clone(),
            account.basic_auth(),
            config.request_timeout(),
        )?;

        Ok(Arc::new(Self::new(
            Arc::new(account),
            config,
            crypto,
            Arc::new(transport),
            database.clone(),
            database,
        )))
    }

    pub fn account(&self) -> &Account {
        &self.account
    }

    pub fn config(&self) -> &GroupsConfig {
        &self.config
    }
}
