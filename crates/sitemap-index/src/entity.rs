//! Entity records fed into the sitemap.
//!
//! An [`Entity`] is an external, read-only record (a post, page, author or tag)
//! that becomes one `<url>` element. Entities usually arrive as JSON exports,
//! so identifiers and dates accept both string and numeric forms.

use std::fmt;

use serde::Deserialize;
use serde::de::IgnoredAny;

/// Marker value of the `type` field that enables the news extension.
const NEWS_TYPE: &str = "news";

/// Stable identifier of an entity.
///
/// Numeric identifiers are stored in their decimal string form, so `1` and
/// `"1"` name the same entity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(String);

impl EntityId {
    /// Identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntityId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl From<String> for EntityId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<u64> for EntityId {
    fn from(value: u64) -> Self {
        Self(value.to_string())
    }
}

impl<'de> Deserialize<'de> for EntityId {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Unsigned(u64),
            Signed(i64),
            Text(String),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Unsigned(n) => Self(n.to_string()),
            RawId::Signed(n) => Self(n.to_string()),
            RawId::Text(s) => Self(s),
        })
    }
}

/// Date-like input before normalization.
///
/// Strings are parsed by [`crate::date::normalize`]; numbers are Unix epoch
/// milliseconds. Any other JSON value deserializes as [`DateLike::Unrecognized`]
/// and normalizes to the current time, so one bad field never rejects a record.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum DateLike {
    /// Unix timestamp in milliseconds.
    Millis(i64),
    /// Fractional or out-of-range Unix timestamp in milliseconds.
    Float(f64),
    /// Textual date (RFC 3339, `YYYY-MM-DD HH:MM:SS`, `YYYY-MM-DD`, ...).
    Text(String),
    /// Booleans, arrays, objects.
    Unrecognized(IgnoredAny),
}

impl From<&str> for DateLike {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<i64> for DateLike {
    fn from(value: i64) -> Self {
        Self::Millis(value)
    }
}

/// External record represented as one sitemap URL.
#[derive(Debug, Clone, Deserialize)]
pub struct Entity {
    /// Stable identifier; the index key.
    pub id: EntityId,
    /// Content type marker. `"news"` enables the news extension.
    #[serde(default, rename = "type")]
    pub entity_type: Option<String>,
    /// Title used by the news extension.
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub cover_image: Option<String>,
    #[serde(default)]
    pub profile_image: Option<String>,
    #[serde(default)]
    pub feature_image: Option<String>,
    #[serde(default)]
    pub updated_at: Option<DateLike>,
    #[serde(default)]
    pub published_at: Option<DateLike>,
    #[serde(default)]
    pub created_at: Option<DateLike>,
}

impl Entity {
    /// Create an entity with only an identifier.
    #[must_use]
    pub fn new(id: impl Into<EntityId>) -> Self {
        Self {
            id: id.into(),
            entity_type: None,
            title: None,
            cover_image: None,
            profile_image: None,
            feature_image: None,
            updated_at: None,
            published_at: None,
            created_at: None,
        }
    }

    /// Mark the entity as a news article with the given title.
    #[must_use]
    pub fn with_news(mut self, title: impl Into<String>) -> Self {
        self.entity_type = Some(NEWS_TYPE.to_owned());
        self.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn with_cover_image(mut self, url: impl Into<String>) -> Self {
        self.cover_image = Some(url.into());
        self
    }

    #[must_use]
    pub fn with_profile_image(mut self, url: impl Into<String>) -> Self {
        self.profile_image = Some(url.into());
        self
    }

    #[must_use]
    pub fn with_feature_image(mut self, url: impl Into<String>) -> Self {
        self.feature_image = Some(url.into());
        self
    }

    #[must_use]
    pub fn with_updated_at(mut self, date: impl Into<DateLike>) -> Self {
        self.updated_at = Some(date.into());
        self
    }

    #[must_use]
    pub fn with_published_at(mut self, date: impl Into<DateLike>) -> Self {
        self.published_at = Some(date.into());
        self
    }

    #[must_use]
    pub fn with_created_at(mut self, date: impl Into<DateLike>) -> Self {
        self.created_at = Some(date.into());
        self
    }

    /// Whether the entity carries the news marker.
    #[must_use]
    pub fn is_news(&self) -> bool {
        self.entity_type.as_deref() == Some(NEWS_TYPE)
    }

    /// First present image of cover, profile and feature image.
    #[must_use]
    pub fn image(&self) -> Option<&str> {
        self.cover_image
            .as_deref()
            .or(self.profile_image.as_deref())
            .or(self.feature_image.as_deref())
    }

    /// Date candidates for the last-modified timestamp, in precedence order.
    pub(crate) fn last_modified_candidates(&self) -> [Option<&DateLike>; 3] {
        [
            self.updated_at.as_ref(),
            self.published_at.as_ref(),
            self.created_at.as_ref(),
        ]
    }

    /// Date candidates for the news publication timestamp, in precedence order.
    pub(crate) fn published_candidates(&self) -> [Option<&DateLike>; 3] {
        [
            self.published_at.as_ref(),
            self.created_at.as_ref(),
            self.updated_at.as_ref(),
        ]
    }
}
