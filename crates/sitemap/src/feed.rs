//! JSON feed of entities to index.
//!
//! A feed is an object keyed by resource kind. Each value is an array of
//! entity records carrying the public `url` they are served at:
//!
//! ```json
//! {
//!     "posts": [
//!         {"id": 1, "url": "https://example.com/hello/", "updated_at": "2024-06-01"}
//!     ],
//!     "authors": [
//!         {"id": "a1", "url": "https://example.com/author/jo/", "profile_image": "/content/images/jo.png"}
//!     ]
//! }
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use sitemap_index::{Entity, ResourceKind, SitemapManager};

/// Error loading a feed file.
#[derive(Debug, thiserror::Error)]
pub(crate) enum FeedError {
    /// Feed file could not be read.
    #[error("Failed to read feed {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Feed file is not valid feed JSON.
    #[error("Invalid feed {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// One entity together with its public URL.
#[derive(Debug, Deserialize)]
pub(crate) struct FeedRecord {
    #[serde(default)]
    pub url: String,
    #[serde(flatten)]
    pub entity: Entity,
}

/// Entities grouped by resource kind.
#[derive(Debug, Default, Deserialize)]
#[serde(transparent)]
pub(crate) struct Feed {
    records: BTreeMap<ResourceKind, Vec<FeedRecord>>,
}

impl Feed {
    /// Load a feed from a JSON file.
    pub(crate) fn load(path: &Path) -> Result<Self, FeedError> {
        let content = std::fs::read_to_string(path).map_err(|source| FeedError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content).map_err(|source| FeedError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    fn parse(content: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(content)
    }

    /// Add every record to `manager`.
    ///
    /// Returns the number of new index entries. Records without a URL and
    /// repeated identifiers add none.
    pub(crate) fn populate(&self, manager: &mut SitemapManager) -> usize {
        let mut added = 0;
        for (kind, records) in &self.records {
            let before = manager.index(*kind).len();
            for record in records {
                manager.add_url(*kind, &record.url, &record.entity);
            }
            let after = manager.index(*kind).len();
            tracing::debug!(%kind, records = records.len(), entries = after, "Indexed feed records");
            added += after.saturating_sub(before);
        }
        added
    }

    /// Total number of records across all kinds.
    pub(crate) fn len(&self) -> usize {
        self.records.values().map(Vec::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use sitemap_index::NodeSettings;

    use super::*;

    const FEED: &str = r#"{
        "posts": [
            {"id": 1, "url": "https://example.com/hello/", "updated_at": "2024-06-01"},
            {"id": 2, "url": "", "updated_at": "2024-06-02"},
            {"id": 3, "updated_at": "2024-06-03"}
        ],
        "authors": [
            {"id": "a1", "url": "https://example.com/author/jo/", "profile_image": "/content/images/jo.png"}
        ]
    }"#;

    #[test]
    fn test_parse_feed() {
        let feed = Feed::parse(FEED).unwrap();
        assert_eq!(feed.len(), 4);
        assert_eq!(feed.records[&ResourceKind::Posts][0].url, "https://example.com/hello/");
        assert_eq!(feed.records[&ResourceKind::Posts][2].url, "");
        assert_eq!(feed.records[&ResourceKind::Authors][0].entity.id.as_str(), "a1");
    }

    #[test]
    fn test_unknown_kind_is_rejected() {
        assert!(Feed::parse(r#"{"users": []}"#).is_err());
    }

    #[test]
    fn test_populate_skips_records_without_url() {
        let feed = Feed::parse(FEED).unwrap();
        let mut manager = SitemapManager::new("https://example.com", &NodeSettings::default());

        let added = feed.populate(&mut manager);

        assert_eq!(added, 2);
        assert_eq!(manager.index(ResourceKind::Posts).len(), 1);
        assert_eq!(manager.index(ResourceKind::Authors).len(), 1);
    }

    #[test]
    fn test_odd_dates_do_not_reject_feed() {
        let feed = Feed::parse(
            r#"{"posts": [
                {"id": 1, "url": "https://example.com/a/", "updated_at": "2024-01-01"},
                {"id": 2, "url": "https://example.com/b/", "updated_at": 1704067200000.0},
                {"id": 18446744073709551615, "url": "https://example.com/c/", "published_at": false}
            ]}"#,
        )
        .unwrap();
        let mut manager = SitemapManager::new("https://example.com", &NodeSettings::default());

        assert_eq!(feed.populate(&mut manager), 3);
    }

    #[test]
    fn test_load_reports_path() {
        let err = Feed::load(Path::new("/nonexistent/feed.json")).unwrap_err();
        assert!(matches!(err, FeedError::Read { .. }));
        assert!(err.to_string().contains("/nonexistent/feed.json"));
    }
}
