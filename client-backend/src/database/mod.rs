//! The module that handles the `SQLite` database required by the client,
//! and the store contracts the group logic depends on.
use std::{
    path::PathBuf,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use async_trait::async_trait;
use lib::{
    crypto::{ProfileKey, SerializedGroupMasterKey},
    identifiers::{GroupIdentifier, Uuid},
};
use rusqlite::Connection;

pub mod groups;
pub mod profile;
pub mod schemas;

#[derive(Debug, PartialEq, thiserror::Error)]
pub enum DatabaseError {
    #[error("Error with the SQLite connection: {0}")]
    Rusqlite(#[from] rusqlite::Error),
    #[error("This data we attempted to retrieve is invalid/unexpected")]
    CorruptedData,
}

/// Group identifier to master key. Filled as soon as a master key is seen
/// so that groups can be referred to by identifier everywhere else.
#[async_trait]
pub trait GroupStore: Send + Sync {
    async fn master_key_for_group(
        &self,
        group_id: &GroupIdentifier,
    ) -> Result<Option<SerializedGroupMasterKey>, DatabaseError>;

    async fn store_master_key(
        &self,
        group_id: &GroupIdentifier,
        master_key: &SerializedGroupMasterKey,
    ) -> Result<(), DatabaseError>;
}

/// User identifier to profile key. Group state is one of the main places
/// profile keys are learned from.
#[async_trait]
pub trait ProfileKeyStore: Send + Sync {
    async fn store_profile_key(
        &self,
        user_id: Uuid,
        profile_key: &ProfileKey,
    ) -> Result<(), DatabaseError>;

    async fn profile_key(&self, user_id: Uuid) -> Result<Option<ProfileKey>, DatabaseError>;
}

/// A `SQLite` connection
#[derive(Debug, Clone)]
pub struct Database {
    connection: Arc<Mutex<Connection>>,
}

impl Database {
    /// Creates a Database object, opens a connection to the given path,
    /// and upgrades the database schema if needed.
    pub fn new(database_path: Option<PathBuf>) -> Result<Self, DatabaseError> {
        let mut conn = Self::open_connection(database_path)?;

        Database::upgrade_database_version(&mut conn)?;

        Ok(Self {
            connection: Arc::new(Mutex::new(conn)),
        })
    }

    /// A simple helper function to open a Databse in-memory.
    pub fn in_memory() -> Result<Self, DatabaseError> {
        Self::new(None)
    }

    /// Acquires the mutex lock to the inner connection. A poisoned lock only
    /// means another thread panicked mid-statement; SQLite itself is still
    /// consistent, so the guard is recovered.
    pub fn get_connection(&self) -> MutexGuard<'_, Connection> {
        self.connection
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Opens a new database connection.
    #[inline]
    fn open_connection(database_path: Option<PathBuf>) -> Result<Connection, DatabaseError> {
        if let Some(mut path) = database_path {
            path.push("groups.sqlite");
            Ok(Connection::open(path)?)
        } else {
            Ok(Connection::open_in_memory()?)
        }
    }
}
