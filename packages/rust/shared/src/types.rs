//! Normalized domain records for pagesmith.
//!
//! Backends disagree on envelope shape and field names; everything past the
//! adapter boundary speaks these types. Records are immutable value objects
//! constructed fresh on every fetch — there is no caching layer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

// ---------------------------------------------------------------------------
// RecordId
// ---------------------------------------------------------------------------

/// An opaque record identifier, unique within a backend.
///
/// Strapi sends numeric ids, Directus numeric or UUID strings. Both JSON
/// shapes deserialize here and normalize to a string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct RecordId(pub String);

impl<'de> Deserialize<'de> for RecordId {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Num(i64),
            Str(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Num(n) => Ok(Self(n.to_string())),
            Raw::Str(s) => Ok(Self(s)),
        }
    }
}

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for RecordId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

// ---------------------------------------------------------------------------
// Content records
// ---------------------------------------------------------------------------

/// A normalized CMS page.
///
/// Invariant: `id` and `title` are always present. `body` defaults to the
/// empty string when absent upstream; `image_url` is `None` when no image
/// is attached.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page {
    /// Opaque backend identifier.
    pub id: RecordId,
    /// Display title.
    pub title: String,
    /// URL slug, when the backend defines one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    /// Rich-text body as an HTML string (unsanitized until render time).
    #[serde(default)]
    pub body: String,
    /// Absolute or backend-relative image URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// A normalized blog post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    /// Opaque backend identifier.
    pub id: RecordId,
    /// Display title.
    pub title: String,
    /// URL slug, when the backend defines one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    /// Rich-text body as an HTML string.
    #[serde(default)]
    pub body: String,
    /// Publication timestamp, when the backend provides one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_at: Option<DateTime<Utc>>,
    /// Author display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
}

/// A normalized team member profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamMember {
    /// Opaque backend identifier.
    pub id: RecordId,
    /// Full name.
    pub name: String,
    /// Role or job title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// Rich-text biography as an HTML string.
    #[serde(default)]
    pub bio: String,
    /// Absolute or backend-relative photo URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
}

// ---------------------------------------------------------------------------
// BackendConfig
// ---------------------------------------------------------------------------

/// Identifies which backend adapter to use and where it lives.
///
/// `kind` stays an open string on purpose: unknown values must surface as
/// [`UnsupportedBackend`](crate::PagesmithError::UnsupportedBackend) at
/// dispatch time, before any network call. Immutable for the process
/// lifetime.
#[derive(Debug, Clone)]
pub struct BackendConfig {
    /// Adapter discriminator, e.g. `"strapi"` or `"directus"`.
    pub kind: String,
    /// API root of the backend.
    pub base_url: Url,
    /// Append the documented `preview=true` pass-through parameter.
    /// Draft filtering and credentials belong to the backend, not here.
    pub preview: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_id_accepts_numbers_and_strings() {
        let numeric: RecordId = serde_json::from_str("7").expect("numeric id");
        assert_eq!(numeric, RecordId::from("7"));

        let textual: RecordId =
            serde_json::from_str("\"0c8e3c1a-5bb1-4a9d-8d1f-2f6a5d9b77aa\"").expect("string id");
        assert_eq!(textual.to_string(), "0c8e3c1a-5bb1-4a9d-8d1f-2f6a5d9b77aa");
    }

    #[test]
    fn page_optional_fields_default() {
        let json = r#"{"id": 1, "title": "Home"}"#;
        let page: Page = serde_json::from_str(json).expect("deserialize page");
        assert_eq!(page.body, "");
        assert!(page.image_url.is_none());
        assert!(page.slug.is_none());
    }

    #[test]
    fn page_serialization_omits_absent_image() {
        let page = Page {
            id: RecordId::from("1"),
            title: "Home".into(),
            slug: None,
            body: "<p>Welcome</p>".into(),
            image_url: None,
        };
        let json = serde_json::to_string(&page).expect("serialize");
        assert!(!json.contains("image_url"));
        assert!(!json.contains("slug"));
    }
}
