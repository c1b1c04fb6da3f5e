//! In-memory cache of decrypted groups and of the calls active in them.
//!
//! All maps live behind a single lock and are only reachable through the
//! methods below, each of which is one atomic step.
use std::{
    collections::HashMap,
    future::Future,
    sync::Arc,
    time::{Duration, SystemTime},
};

use lib::{identifiers::GroupIdentifier, util::time::Clock};
use tokio::sync::Mutex;

use super::model::Group;
use crate::manager::error::{GroupError, Result};

#[derive(Debug, Default)]
struct GroupCacheState {
    groups: HashMap<GroupIdentifier, Arc<Group>>,
    last_fetched: HashMap<GroupIdentifier, SystemTime>,
    active_calls: HashMap<GroupIdentifier, String>,
}

pub struct GroupCache {
    state: Mutex<GroupCacheState>,
    /// One lock per group identifier, held by whoever is fetching it.
    fetch_locks: scc::HashMap<GroupIdentifier, Arc<Mutex<()>>>,
    freshness: Duration,
}

impl GroupCache {
    pub fn new(freshness: Duration) -> Self {
        Self {
            state: Mutex::new(GroupCacheState::default()),
            fetch_locks: scc::HashMap::new(),
            freshness,
        }
    }

    /// The cached group if it was fetched less than `freshness` ago and is
    /// at least at `min_revision`. A clock that went backwards since the
    /// fetch counts as stale.
    pub async fn lookup_fresh(
        &self,
        group_id: &GroupIdentifier,
        min_revision: u32,
        now: SystemTime,
    ) -> Option<Arc<Group>> {
        let state = self.state.lock().await;

        let group = state.groups.get(group_id)?;
        let fetched_at = state.last_fetched.get(group_id)?;
        let age = now.duration_since(*fetched_at).ok()?;

        (age < self.freshness && group.revision >= min_revision).then(|| group.clone())
    }

    /// Replaces the cached group and its fetch time together.
    pub async fn store(&self, group: Group, fetched_at: SystemTime) -> Arc<Group> {
        let group = Arc::new(group);
        let mut state = self.state.lock().await;

        state
            .last_fetched
            .insert(group.group_identifier.clone(), fetched_at);
        state
            .groups
            .insert(group.group_identifier.clone(), group.clone());

        group
    }

    pub async fn invalidate(&self, group_id: &GroupIdentifier) {
        let mut state = self.state.lock().await;

        state.groups.remove(group_id);
        state.last_fetched.remove(group_id);
    }

    /// Records `call_id` as the active call of the group, or clears it if it
    /// already was. Returns whether a call is now recorded.
    ///
    /// A different call id replaces the recorded one.
    pub async fn toggle_call(&self, group_id: &GroupIdentifier, call_id: &str) -> bool {
        let mut state = self.state.lock().await;

        match state.active_calls.get(group_id) {
            Some(active) if active == call_id => {
                state.active_calls.remove(group_id);
                false
            }
            _ => {
                state
                    .active_calls
                    .insert(group_id.clone(), call_id.to_owned());
                true
            }
        }
    }

    pub async fn active_call(&self, group_id: &GroupIdentifier) -> Option<String> {
        self.state.lock().await.active_calls.get(group_id).cloned()
    }

    /// Serves `group_id` from the cache, or runs `fetch` and caches its
    /// result. Concurrent callers for the same group share a single fetch.
    ///
    /// Nothing is written unless `fetch` succeeds, so dropping the returned
    /// future at any point leaves the cache as it was.
    pub async fn get_or_fetch<F, Fut>(
        &self,
        group_id: &GroupIdentifier,
        min_revision: u32,
        clock: &dyn Clock,
        fetch: F,
    ) -> Result<Arc<Group>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Group>>,
    {
        if let Some(group) = self.lookup_fresh(group_id, min_revision, clock.now()).await {
            log::debug!("Cache hit for {group_id}");
            return Ok(group);
        }

        let fetch_lock = self.fetch_lock(group_id).await;
        let result = {
            let _fetching = fetch_lock.lock().await;
            self.fetch_and_store(group_id, min_revision, clock, fetch)
                .await
        };

        // Forget the lock unless another caller is queued on it
        drop(fetch_lock);
        self.fetch_locks
            .remove_if_async(group_id, |lock| Arc::strong_count(lock) == 1)
            .await;

        result
    }

    async fn fetch_and_store<F, Fut>(
        &self,
        group_id: &GroupIdentifier,
        min_revision: u32,
        clock: &dyn Clock,
        fetch: F,
    ) -> Result<Arc<Group>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Group>>,
    {
        // Whoever held the lock before us may have just fetched it.
        if let Some(group) = self.lookup_fresh(group_id, min_revision, clock.now()).await {
            log::debug!("Cache hit for {group_id} after waiting on another fetch");
            return Ok(group);
        }

        log::debug!("Cache miss for {group_id} (minimum revision {min_revision})");
        let group = fetch().await?;

        // The stored master key must belong to the group it is stored under
        if &group.group_identifier != group_id {
            log::error!(
                "Fetched {} while asking for {group_id}",
                group.group_identifier
            );
            return Err(GroupError::IdentifierMismatch {
                expected: group_id.clone(),
                actual: group.group_identifier,
            });
        }

        Ok(self.store(group, clock.now()).await)
    }

    async fn fetch_lock(&self, group_id: &GroupIdentifier) -> Arc<Mutex<()>> {
        self.fetch_locks
            .entry_async(group_id.clone())
            .await
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .get()
            .clone()
    }
}
