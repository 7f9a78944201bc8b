//! Incremental sitemap index with cached rendering.
//!
//! This crate provides:
//! - [`SitemapIndex`]: URL entries keyed by entity identifier, rendered into a
//!   `urlset` document that is cached until the next mutation
//! - [`SitemapManager`]: one index per [`ResourceKind`] plus the root
//!   `sitemapindex` document
//!
//! Entries are ordered most-recently-modified first. Each entry can carry an
//! image and a news extension element.
//!
//! # Quick Start
//!
//! ```
//! use sitemap_index::{Entity, RenderOptions, SitemapIndex};
//!
//! let mut index = SitemapIndex::new();
//! index.add_url("https://example.com/a/", &Entity::new("1").with_updated_at("2024-01-01"));
//! index.add_url("https://example.com/b/", &Entity::new("2").with_updated_at("2024-06-01"));
//!
//! let document = index.get_document(&RenderOptions::default());
//! let b = document.find("/b/").unwrap();
//! let a = document.find("/a/").unwrap();
//! assert!(b < a);
//! ```

pub mod date;
mod entity;
mod index;
mod manager;
mod node;
pub mod render;
mod store;

pub use date::{Clock, FixedClock, SystemClock};
pub use entity::{DateLike, Entity, EntityId};
pub use index::{CacheState, SitemapIndex};
pub use manager::{INDEX_FILE_NAME, ResourceKind, SitemapManager, UnknownResourceKind};
pub use node::{
    DEFAULT_PUBLICATION_LANGUAGE, DEFAULT_PUBLICATION_NAME, IndexEntry, Node, NodeSettings,
    build_entry,
};
pub use render::RenderOptions;
pub use store::EntryStore;
