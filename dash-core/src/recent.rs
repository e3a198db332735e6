use tracing::warn;

use crate::{
    error::StoreError,
    model::{RecentCity, RecentSearches},
    storage::KeyValueStore,
};

/// Persistence key of the recent-search record.
pub const RECENT_SEARCHES_KEY: &str = "recentSearches";

/// Recent-search history backed by an injected [`KeyValueStore`].
pub struct RecentSearchStore {
    store: Box<dyn KeyValueStore>,
}

impl std::fmt::Debug for RecentSearchStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecentSearchStore").finish_non_exhaustive()
    }
}

impl RecentSearchStore {
    pub fn new(store: impl KeyValueStore + 'static) -> Self {
        Self {
            store: Box::new(store),
        }
    }

    /// Reads the stored list. Nothing stored yet yields an empty list.
    pub fn load(&self) -> Result<RecentSearches, StoreError> {
        let Some(raw) = self.store.get(RECENT_SEARCHES_KEY)? else {
            return Ok(RecentSearches::new());
        };

        let entries: Vec<RecentCity> = serde_json::from_str(&raw)
            .map_err(|e| StoreError::corrupt(RECENT_SEARCHES_KEY, e))?;

        Ok(RecentSearches::from_entries(entries))
    }

    /// Like [`load`](Self::load), but unreadable data counts as no history.
    pub fn load_or_default(&self) -> RecentSearches {
        self.load().unwrap_or_else(|err| {
            warn!(error = %err, "discarding unreadable recent searches");
            RecentSearches::new()
        })
    }

    /// Moves `entry` to the front of `current`, persists the result and
    /// returns it. Write failures are logged, never returned.
    pub fn record(&self, entry: RecentCity, current: &RecentSearches) -> RecentSearches {
        let updated = current.with_recorded(entry);
        if let Err(err) = self.persist(&updated) {
            warn!(error = %err, "failed to persist recent searches");
        }
        updated
    }

    fn persist(&self, list: &RecentSearches) -> Result<(), StoreError> {
        let json = serde_json::to_string(list)
            .map_err(|e| StoreError::encode(RECENT_SEARCHES_KEY, e))?;
        self.store.set(RECENT_SEARCHES_KEY, &json)
    }
}
