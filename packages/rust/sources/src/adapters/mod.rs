//! Backend adapter trait and built-in adapters for content normalization.
//!
//! Each CMS backend wraps its records in an idiosyncratic envelope. Adapters
//! isolate those field paths: one adapter per backend kind, translating a
//! raw JSON payload into the normalized records from `pagesmith-shared`.
//! Adapters never perform I/O — the repository owns the HTTP client.

mod directus;
mod strapi;

use pagesmith_shared::{Page, PagesmithError, Post, Result, TeamMember};
use serde::de::DeserializeOwned;
use url::Url;

pub use directus::DirectusAdapter;
pub use strapi::StrapiAdapter;

// ---------------------------------------------------------------------------
// Collections
// ---------------------------------------------------------------------------

/// The content collections pagesmith knows how to fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    Pages,
    Posts,
    Team,
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Pages => "pages",
            Self::Posts => "posts",
            Self::Team => "team",
        };
        write!(f, "{name}")
    }
}

// ---------------------------------------------------------------------------
// Trait
// ---------------------------------------------------------------------------

/// Trait for backend-specific URL construction and payload parsing.
///
/// Result guarantee: parse methods return a possibly-empty sequence in the
/// backend's response order, or fail with `MalformedResponse` — never a
/// partial list. Missing optional nested fields (an absent image relation, a
/// null file reference) are not errors.
pub trait BackendAdapter: Send + Sync + std::fmt::Debug {
    /// Discriminator this adapter serves, e.g. `"strapi"`.
    fn kind(&self) -> &str;

    /// Build the collection endpoint URL for the given API root.
    ///
    /// `preview` appends the documented `preview=true` pass-through
    /// parameter; draft filtering is the backend's concern.
    fn collection_url(&self, base: &Url, collection: Collection, preview: bool) -> Result<Url>;

    /// Parse a pages payload into normalized [`Page`] records.
    fn parse_pages(&self, body: &str) -> Result<Vec<Page>>;

    /// Parse a posts payload into normalized [`Post`] records.
    fn parse_posts(&self, body: &str) -> Result<Vec<Post>>;

    /// Parse a team payload into normalized [`TeamMember`] records.
    fn parse_team(&self, body: &str) -> Result<Vec<TeamMember>>;
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// Holds the registered adapters, looked up by backend kind.
pub struct AdapterRegistry {
    adapters: Vec<Box<dyn BackendAdapter>>,
}

impl AdapterRegistry {
    /// Create a registry with all built-in adapters.
    pub fn new() -> Self {
        Self {
            adapters: vec![Box::new(StrapiAdapter), Box::new(DirectusAdapter)],
        }
    }

    /// Look up the adapter for a backend kind.
    ///
    /// Unknown kinds fail with `UnsupportedBackend`; callers must check this
    /// before issuing any network request.
    pub fn select(&self, kind: &str) -> Result<&dyn BackendAdapter> {
        self.adapters
            .iter()
            .find(|a| a.kind() == kind)
            .map(|a| a.as_ref())
            .ok_or_else(|| PagesmithError::unsupported_backend(kind))
    }
}

impl Default for AdapterRegistry {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

/// Decode a backend payload, mapping any JSON/shape failure to
/// `MalformedResponse`.
pub(crate) fn decode<T: DeserializeOwned>(body: &str, kind: &str) -> Result<T> {
    serde_json::from_str(body)
        .map_err(|e| PagesmithError::malformed(format!("{kind} payload: {e}")))
}

/// Build a collection URL from the API root and a relative path + query.
///
/// The base is normalized to ignore a trailing slash so that
/// `http://host` and `http://host/` produce the same endpoint.
pub(crate) fn endpoint(base: &Url, path_and_query: &str) -> Result<Url> {
    let root = base.as_str().trim_end_matches('/');
    Url::parse(&format!("{root}/{path_and_query}")).map_err(|e| {
        PagesmithError::config(format!("invalid collection URL for base {base}: {e}"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_selects_by_kind() {
        let registry = AdapterRegistry::new();
        assert_eq!(registry.select("strapi").unwrap().kind(), "strapi");
        assert_eq!(registry.select("directus").unwrap().kind(), "directus");
    }

    #[test]
    fn registry_rejects_unknown_kind() {
        let registry = AdapterRegistry::new();
        let err = registry.select("contentful").unwrap_err();
        assert!(matches!(
            err,
            PagesmithError::UnsupportedBackend { ref kind } if kind == "contentful"
        ));
    }

    #[test]
    fn endpoint_ignores_trailing_slash() {
        let with = Url::parse("http://localhost:1337/").unwrap();
        let without = Url::parse("http://localhost:1337").unwrap();
        assert_eq!(
            endpoint(&with, "api/pages?populate=*").unwrap(),
            endpoint(&without, "api/pages?populate=*").unwrap(),
        );
    }
}
