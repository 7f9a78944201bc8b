//! Cached sitemap index.
//!
//! [`SitemapIndex`] owns an [`EntryStore`] and memoizes its rendered document.
//! Every mutation invalidates the cache; the next [`SitemapIndex::get_document`]
//! re-renders and caches again.
//!
//! # Thread Safety
//!
//! The index has no internal locking. Mutations and reads take `&mut self`;
//! hosts that share it across threads wrap the whole index in one `Mutex`.

use std::sync::Arc;

use chrono::{DateTime, FixedOffset};

use crate::date::{Clock, SystemClock};
use crate::entity::Entity;
use crate::node::{NodeSettings, build_entry};
use crate::render::{self, RenderOptions};
use crate::store::EntryStore;

/// State of the rendered-document cache.
#[derive(Debug, Clone, Default)]
pub enum CacheState {
    /// Rendered document, current with the store contents.
    Valid(Arc<str>),
    /// Store changed since the last render.
    #[default]
    Invalid,
}

/// Incrementally maintained sitemap with a memoized document.
pub struct SitemapIndex {
    store: EntryStore,
    cache: CacheState,
    /// Running maximum last-modified across additions. Reset to "now" on removal.
    last_modified: Option<DateTime<FixedOffset>>,
    clock: Arc<dyn Clock>,
    settings: NodeSettings,
}

impl SitemapIndex {
    /// Create an empty index with default node settings and the system clock.
    #[must_use]
    pub fn new() -> Self {
        Self::with_settings(NodeSettings::default())
    }

    /// Create an empty index with the given node settings.
    #[must_use]
    pub fn with_settings(settings: NodeSettings) -> Self {
        Self {
            store: EntryStore::new(),
            cache: CacheState::Invalid,
            last_modified: None,
            clock: Arc::new(SystemClock),
            settings,
        }
    }

    /// Replace the clock used for date fallbacks and removals.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Add or replace the URL for `entity`.
    ///
    /// A blank `url` is skipped without touching the index or its cache.
    pub fn add_url(&mut self, url: &str, entity: &Entity) {
        let Some(entry) = build_entry(url, entity, self.clock.as_ref(), &self.settings) else {
            tracing::debug!(id = %entity.id, "Skipping entity without URL");
            return;
        };

        let sort_key = entry.sort_key();
        self.last_modified = Some(match self.last_modified {
            Some(current) if current >= sort_key => current,
            _ => sort_key,
        });
        self.store.upsert(entity.id.clone(), entry);
        self.invalidate();
        tracing::debug!(id = %entity.id, url, "Added sitemap URL");
    }

    /// Remove the URL for `entity`.
    ///
    /// The tracked last-modified timestamp becomes the current time; it is not
    /// recomputed from the remaining entries.
    pub fn remove_url(&mut self, url: &str, entity: &Entity) {
        let removed = self.store.remove(&entity.id);
        self.last_modified = Some(self.clock.now());
        self.invalidate();
        tracing::debug!(id = %entity.id, url, removed, "Removed sitemap URL");
    }

    /// Rendered sitemap document.
    ///
    /// Returns the cached document when nothing changed since the last call.
    /// `options` only apply when a render happens; call
    /// [`SitemapIndex::invalidate`] after changing them.
    pub fn get_document(&mut self, options: &RenderOptions) -> Arc<str> {
        if let CacheState::Valid(document) = &self.cache {
            tracing::trace!("Sitemap cache hit");
            return Arc::clone(document);
        }

        tracing::trace!(entries = self.store.len(), "Sitemap cache miss, rendering");
        let document: Arc<str> = render::render(self.store.snapshot(), options).into();
        self.cache = CacheState::Valid(Arc::clone(&document));
        document
    }

    /// Remove every URL.
    ///
    /// The tracked last-modified timestamp is left as it was.
    pub fn reset(&mut self) {
        self.store.clear();
        self.invalidate();
    }

    /// Drop the cached document.
    pub fn invalidate(&mut self) {
        self.cache = CacheState::Invalid;
    }

    /// Tracked last-modified timestamp of the index as a whole.
    #[must_use]
    pub fn last_modified(&self) -> Option<DateTime<FixedOffset>> {
        self.last_modified
    }

    #[must_use]
    pub fn cache_state(&self) -> &CacheState {
        &self.cache
    }

    #[must_use]
    pub fn store(&self) -> &EntryStore {
        &self.store
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.store.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }
}

impl Default for SitemapIndex {
    fn default() -> Self {
        Self::new()
    }
}
