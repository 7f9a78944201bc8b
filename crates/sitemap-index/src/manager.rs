//! Per-resource sitemaps and the root sitemap index document.
//!
//! A site publishes one `urlset` per [`ResourceKind`] (`sitemap-posts.xml`,
//! `sitemap-pages.xml`, ...) and a root `sitemap.xml` listing them. The
//! [`SitemapManager`] owns one [`SitemapIndex`] per kind and renders that root
//! document from their tracked last-modified timestamps.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::Deserialize;

use crate::date::{self, Clock, SystemClock};
use crate::entity::Entity;
use crate::index::SitemapIndex;
use crate::node::{Node, NodeSettings};
use crate::render::{self, RenderOptions, SITEMAP_NAMESPACE};

/// File name of the root sitemap index document.
pub const INDEX_FILE_NAME: &str = "sitemap.xml";

/// Kind of resource a sitemap URL belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Pages,
    Posts,
    Authors,
    Tags,
}

impl ResourceKind {
    /// Every kind, in the order listed by the root index document.
    pub const ALL: [Self; 4] = [Self::Pages, Self::Posts, Self::Authors, Self::Tags];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pages => "pages",
            Self::Posts => "posts",
            Self::Authors => "authors",
            Self::Tags => "tags",
        }
    }

    /// Position of this kind in [`ResourceKind::ALL`].
    fn slot(self) -> usize {
        self as usize
    }

    /// File name of this kind's sitemap, e.g. `sitemap-posts.xml`.
    #[must_use]
    pub fn file_name(self) -> String {
        format!("sitemap-{}.xml", self.as_str())
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown resource kind.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown resource kind: {0} (expected pages, posts, authors or tags)")]
pub struct UnknownResourceKind(String);

impl FromStr for ResourceKind {
    type Err = UnknownResourceKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| UnknownResourceKind(s.to_owned()))
    }
}

/// One [`SitemapIndex`] per [`ResourceKind`] plus the root index document.
pub struct SitemapManager {
    site_url: String,
    /// Indexed by [`ResourceKind::slot`].
    indexes: [SitemapIndex; 4],
}

impl SitemapManager {
    /// Create a manager for the site at `site_url` using the system clock.
    #[must_use]
    pub fn new(site_url: impl Into<String>, settings: &NodeSettings) -> Self {
        Self::with_clock(site_url, settings, Arc::new(SystemClock))
    }

    /// Create a manager whose indexes share `clock`.
    #[must_use]
    pub fn with_clock(
        site_url: impl Into<String>,
        settings: &NodeSettings,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let indexes = std::array::from_fn(|_| {
            SitemapIndex::with_settings(settings.clone()).with_clock(Arc::clone(&clock))
        });

        Self {
            site_url: site_url.into(),
            indexes,
        }
    }

    pub fn add_url(&mut self, kind: ResourceKind, url: &str, entity: &Entity) {
        self.index_mut(kind).add_url(url, entity);
    }

    pub fn remove_url(&mut self, kind: ResourceKind, url: &str, entity: &Entity) {
        self.index_mut(kind).remove_url(url, entity);
    }

    /// Reset every per-kind index.
    pub fn reset(&mut self) {
        self.indexes.iter_mut().for_each(SitemapIndex::reset);
    }

    /// Cached `urlset` document for `kind`.
    pub fn get_sitemap_document(&mut self, kind: ResourceKind, options: &RenderOptions) -> Arc<str> {
        self.index_mut(kind).get_document(options)
    }

    /// Root `sitemapindex` document listing every per-kind sitemap.
    ///
    /// A `lastmod` is only emitted for sitemaps that have been modified.
    #[must_use]
    pub fn get_index_document(&self, options: &RenderOptions) -> String {
        let base = self.site_url.trim_end_matches('/');

        let sitemaps = ResourceKind::ALL
            .into_iter()
            .zip(&self.indexes)
            .map(|(kind, index)| {
                let mut children =
                    vec![Node::new("loc").with_text(format!("{base}/{}", kind.file_name()))];
                if let Some(modified) = index.last_modified() {
                    children.push(Node::new("lastmod").with_text(date::format_timestamp(&modified)));
                }
                Node::new("sitemap").with_children(children)
            })
            .collect();

        let root = Node::new("sitemapindex")
            .with_attr("xmlns", SITEMAP_NAMESPACE)
            .with_children(sitemaps);

        let mut out = render::preamble(options);
        out.push_str(&render::serialize(&root));
        out
    }

    #[must_use]
    pub fn index(&self, kind: ResourceKind) -> &SitemapIndex {
        &self.indexes[kind.slot()]
    }

    #[must_use]
    pub fn site_url(&self) -> &str {
        &self.site_url
    }

    fn index_mut(&mut self, kind: ResourceKind) -> &mut SitemapIndex {
        &mut self.indexes[kind.slot()]
    }
}
