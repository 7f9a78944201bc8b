//! Document nodes and per-entity node construction.

use chrono::{DateTime, FixedOffset};

use crate::date::{self, Clock};
use crate::entity::Entity;

/// Publication name used by the news extension unless configured otherwise.
pub const DEFAULT_PUBLICATION_NAME: &str = "Newsroom";

/// Publication language used by the news extension unless configured otherwise.
pub const DEFAULT_PUBLICATION_LANGUAGE: &str = "en";

/// Element in a pre-serialization document tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Node {
    /// Element tag name, including any namespace prefix.
    pub tag: String,
    /// Text content.
    pub text: String,
    /// Attributes in output order.
    pub attrs: Vec<(String, String)>,
    /// Child elements.
    pub children: Vec<Node>,
}

impl Node {
    /// Create a new node with the given tag.
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Default::default()
        }
    }

    /// Set text content.
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Append an attribute.
    #[must_use]
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.push((name.into(), value.into()));
        self
    }

    /// Set children.
    #[must_use]
    pub fn with_children(mut self, children: Vec<Node>) -> Self {
        self.children = children;
        self
    }

    /// First direct child with the given tag.
    #[must_use]
    pub fn child(&self, tag: &str) -> Option<&Node> {
        self.children.iter().find(|child| child.tag == tag)
    }

    /// Text of the first direct child with the given tag.
    #[must_use]
    pub fn child_text(&self, tag: &str) -> Option<&str> {
        self.child(tag).map(|child| child.text.as_str())
    }
}

/// Settings applied while constructing entity nodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeSettings {
    /// Site URL used to resolve relative image paths.
    pub site_url: Option<String>,
    /// `news:name` value.
    pub publication_name: String,
    /// `news:language` value.
    pub publication_language: String,
}

impl Default for NodeSettings {
    fn default() -> Self {
        Self {
            site_url: None,
            publication_name: DEFAULT_PUBLICATION_NAME.to_owned(),
            publication_language: DEFAULT_PUBLICATION_LANGUAGE.to_owned(),
        }
    }
}

/// A node together with the timestamp it sorts by.
///
/// Both values come from the same entity snapshot and are only ever replaced
/// together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexEntry {
    node: Node,
    sort_key: DateTime<FixedOffset>,
}

impl IndexEntry {
    /// The `<url>` node.
    #[must_use]
    pub fn node(&self) -> &Node {
        &self.node
    }

    /// Resolved last-modified timestamp.
    #[must_use]
    pub fn sort_key(&self) -> DateTime<FixedOffset> {
        self.sort_key
    }
}

/// Build the index entry for `entity` published at `url`.
///
/// Returns `None` when `url` is blank.
pub fn build_entry(
    url: &str,
    entity: &Entity,
    clock: &dyn Clock,
    settings: &NodeSettings,
) -> Option<IndexEntry> {
    let url = url.trim();
    if url.is_empty() {
        return None;
    }

    let last_modified = date::first_present(&entity.last_modified_candidates(), clock);

    let mut children = vec![
        Node::new("loc").with_text(url),
        Node::new("lastmod").with_text(date::format_timestamp(&last_modified)),
    ];
    if let Some(image) = image_node(entity, settings) {
        children.push(image);
    }
    if entity.is_news() {
        children.push(news_node(entity, clock, settings));
    }

    Some(IndexEntry {
        node: Node::new("url").with_children(children),
        sort_key: last_modified,
    })
}

fn image_node(entity: &Entity, settings: &NodeSettings) -> Option<Node> {
    let image = entity.image()?.trim();
    if image.is_empty() {
        return None;
    }

    let location = absolute_url(image, settings.site_url.as_deref());
    let caption = basename(&location).to_owned();

    Some(Node::new("image:image").with_children(vec![
        Node::new("image:loc").with_text(location),
        Node::new("image:caption").with_text(caption),
    ]))
}

fn news_node(entity: &Entity, clock: &dyn Clock, settings: &NodeSettings) -> Node {
    let published = date::first_present(&entity.published_candidates(), clock);

    Node::new("news:news").with_children(vec![
        Node::new("news:publication").with_children(vec![
            Node::new("news:name").with_text(settings.publication_name.as_str()),
            Node::new("news:language").with_text(settings.publication_language.as_str()),
        ]),
        Node::new("news:publication_date").with_text(date::format_timestamp(&published)),
        Node::new("news:title").with_text(entity.title.as_deref().unwrap_or_default()),
    ])
}

/// Resolve a possibly relative URL against the site URL.
fn absolute_url(url: &str, site_url: Option<&str>) -> String {
    let is_absolute =
        url.starts_with("http://") || url.starts_with("https://") || url.starts_with("//");
    match site_url {
        Some(site) if !is_absolute => format!(
            "{}/{}",
            site.trim_end_matches('/'),
            url.trim_start_matches('/')
        ),
        _ => url.to_owned(),
    }
}

/// Last segment of a URL's path, ignoring query and fragment.
///
/// Empty when the URL has no path beyond the authority.
fn basename(url: &str) -> &str {
    let url = url.split(['?', '#']).next().unwrap_or(url);
    let after_scheme = url
        .split_once("://")
        .map(|(_, rest)| rest)
        .or_else(|| url.strip_prefix("//"));
    let path = match after_scheme {
        Some(rest) => rest.find('/').map_or("", |i| &rest[i..]),
        None => url,
    };
    path.trim_end_matches('/').rsplit('/').next().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::date::FixedClock;

    fn clock() -> FixedClock {
        FixedClock(DateTime::parse_from_rfc3339("2030-01-01T00:00:00+00:00").unwrap())
    }

    fn build(url: &str, entity: &Entity) -> Option<IndexEntry> {
        build_entry(url, entity, &clock(), &NodeSettings::default())
    }

    fn tags(node: &Node) -> Vec<&str> {
        node.children.iter().map(|c| c.tag.as_str()).collect()
    }

    #[test]
    fn test_blank_url_yields_nothing() {
        let entity = Entity::new("1");
        assert!(build("", &entity).is_none());
        assert!(build("   ", &entity).is_none());
    }

    #[test]
    fn test_minimal_entry() {
        let entity = Entity::new("1").with_updated_at("2024-01-01");
        let entry = build("https://x/a", &entity).unwrap();

        assert_eq!(entry.node().tag, "url");
        assert_eq!(tags(entry.node()), vec!["loc", "lastmod"]);
        assert_eq!(entry.node().child_text("loc"), Some("https://x/a"));
        assert_eq!(
            entry.node().child_text("lastmod"),
            Some("2024-01-01T00:00:00+00:00")
        );
        assert_eq!(
            entry.sort_key(),
            DateTime::parse_from_rfc3339("2024-01-01T00:00:00+00:00").unwrap()
        );
    }

    #[test]
    fn test_last_modified_precedence() {
        let entity = Entity::new("1")
            .with_created_at("2020-01-01")
            .with_published_at("2021-01-01");
        let entry = build("https://x/a", &entity).unwrap();
        assert_eq!(
            entry.node().child_text("lastmod"),
            Some("2021-01-01T00:00:00+00:00")
        );

        let entity = Entity::new("1").with_created_at("2020-01-01");
        let entry = build("https://x/a", &entity).unwrap();
        assert_eq!(
            entry.node().child_text("lastmod"),
            Some("2020-01-01T00:00:00+00:00")
        );
    }

    #[test]
    fn test_missing_dates_use_clock() {
        let entry = build("https://x/a", &Entity::new("1")).unwrap();
        assert_eq!(entry.sort_key(), clock().now());
        assert_eq!(
            entry.node().child_text("lastmod"),
            Some("2030-01-01T00:00:00+00:00")
        );
    }

    #[test]
    fn test_cover_image_wins_over_feature_image() {
        let entity = Entity::new("1")
            .with_feature_image("https://x/content/images/feature.png")
            .with_cover_image("https://x/content/images/cover.jpg?v=2");
        let entry = build("https://x/a", &entity).unwrap();

        let image = entry.node().child("image:image").unwrap();
        assert_eq!(
            image.child_text("image:loc"),
            Some("https://x/content/images/cover.jpg?v=2")
        );
        assert_eq!(image.child_text("image:caption"), Some("cover.jpg"));
    }

    #[test]
    fn test_relative_image_resolved_against_site_url() {
        let settings = NodeSettings {
            site_url: Some("https://blog.example.com/".to_owned()),
            ..Default::default()
        };
        let entity = Entity::new("1").with_profile_image("/content/images/me.png");
        let entry = build_entry("https://x/author", &entity, &clock(), &settings).unwrap();

        let image = entry.node().child("image:image").unwrap();
        assert_eq!(
            image.child_text("image:loc"),
            Some("https://blog.example.com/content/images/me.png")
        );
    }

    #[test]
    fn test_news_node() {
        let entity = Entity::new("1")
            .with_news("Big <News> & more")
            .with_updated_at("2024-06-02")
            .with_created_at("2024-06-01");
        let entry = build("https://x/n", &entity).unwrap();
        assert_eq!(tags(entry.node()), vec!["loc", "lastmod", "news:news"]);

        let news = entry.node().child("news:news").unwrap();
        let publication = news.child("news:publication").unwrap();
        assert_eq!(
            publication.child_text("news:name"),
            Some(DEFAULT_PUBLICATION_NAME)
        );
        assert_eq!(publication.child_text("news:language"), Some("en"));
        assert_eq!(
            news.child_text("news:publication_date"),
            Some("2024-06-01T00:00:00+00:00")
        );
        assert_eq!(news.child_text("news:title"), Some("Big <News> & more"));
    }

    #[test]
    fn test_sub_node_order() {
        let entity = Entity::new("1")
            .with_news("Title")
            .with_feature_image("https://x/f.png");
        let entry = build("https://x/n", &entity).unwrap();
        assert_eq!(
            tags(entry.node()),
            vec!["loc", "lastmod", "image:image", "news:news"]
        );
    }

    #[test]
    fn test_without_marker_has_no_news() {
        let entity = Entity::new("1").with_title("Just a post");
        let entry = build("https://x/p", &entity).unwrap();
        assert!(entry.node().child("news:news").is_none());
    }

    #[test]
    fn test_basename() {
        assert_eq!(basename("https://x/a/b/photo.jpg"), "photo.jpg");
        assert_eq!(basename("https://x/a/b/photo.jpg#top"), "photo.jpg");
        assert_eq!(basename("https://x/a/dir/"), "dir");
        assert_eq!(basename("photo.jpg"), "photo.jpg");
        assert_eq!(basename("//cdn.example.com/img/a.png?w=10"), "a.png");
    }

    #[test]
    fn test_basename_ignores_host() {
        assert_eq!(basename("https://cdn.example.com/"), "");
        assert_eq!(basename("https://cdn.example.com"), "");
        assert_eq!(basename("https://cdn.example.com?v=1"), "");
    }

    #[test]
    fn test_image_without_path_has_empty_caption() {
        let entity = Entity::new("1").with_cover_image("https://cdn.example.com/");
        let entry = build("https://x/a", &entity).unwrap();

        let image = entry.node().child("image:image").unwrap();
        assert_eq!(image.child_text("image:loc"), Some("https://cdn.example.com/"));
        assert_eq!(image.child_text("image:caption"), Some(""));
    }
}
