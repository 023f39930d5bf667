//! Directus backend adapter.
//!
//! Directus keeps records flat inside the top-level `data` array and names
//! the page body `content`. File fields arrive as a nullable URL string.

use chrono::{DateTime, Utc};
use pagesmith_shared::{Page, Post, RecordId, Result, TeamMember};
use serde::Deserialize;
use url::Url;

use super::{BackendAdapter, Collection, decode, endpoint};

/// Adapter for Directus-shaped backends.
#[derive(Debug)]
pub struct DirectusAdapter;

impl BackendAdapter for DirectusAdapter {
    fn kind(&self) -> &str {
        "directus"
    }

    fn collection_url(&self, base: &Url, collection: Collection, preview: bool) -> Result<Url> {
        let path = match collection {
            Collection::Pages => "items/pages",
            Collection::Posts => "items/posts",
            Collection::Team => "items/team_members",
        };
        let query = if preview {
            format!("{path}?preview=true")
        } else {
            path.to_string()
        };
        endpoint(base, &query)
    }

    fn parse_pages(&self, body: &str) -> Result<Vec<Page>> {
        let envelope: Envelope<PageRow> = decode(body, self.kind())?;
        Ok(envelope
            .data
            .into_iter()
            .map(|row| Page {
                id: row.id,
                title: row.title,
                slug: row.slug,
                body: row.content.unwrap_or_default(),
                image_url: row.image,
            })
            .collect())
    }

    fn parse_posts(&self, body: &str) -> Result<Vec<Post>> {
        let envelope: Envelope<PostRow> = decode(body, self.kind())?;
        Ok(envelope
            .data
            .into_iter()
            .map(|row| Post {
                id: row.id,
                title: row.title,
                slug: row.slug,
                body: row.body.unwrap_or_default(),
                published_at: row.published_at,
                author: row.author,
            })
            .collect())
    }

    fn parse_team(&self, body: &str) -> Result<Vec<TeamMember>> {
        let envelope: Envelope<TeamRow> = decode(body, self.kind())?;
        Ok(envelope
            .data
            .into_iter()
            .map(|row| TeamMember {
                id: row.id,
                name: row.name,
                role: row.role,
                bio: row.bio.unwrap_or_default(),
                photo_url: row.photo,
            })
            .collect())
    }
}

// ---------------------------------------------------------------------------
// Response envelope
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct Envelope<T> {
    data: Vec<T>,
}

#[derive(Deserialize)]
struct PageRow {
    id: RecordId,
    title: String,
    #[serde(default)]
    slug: Option<String>,
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    image: Option<String>,
}

#[derive(Deserialize)]
struct PostRow {
    id: RecordId,
    title: String,
    #[serde(default)]
    slug: Option<String>,
    #[serde(default)]
    body: Option<String>,
    #[serde(default)]
    published_at: Option<DateTime<Utc>>,
    #[serde(default)]
    author: Option<String>,
}

#[derive(Deserialize)]
struct TeamRow {
    id: RecordId,
    name: String,
    #[serde(default)]
    role: Option<String>,
    #[serde(default)]
    bio: Option<String>,
    #[serde(default)]
    photo: Option<String>,
}
