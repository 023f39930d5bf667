//! Strapi backend adapter.
//!
//! Strapi wraps each record as `{ id, attributes: { … } }` inside a
//! top-level `data` array, and media relations add two more levels of
//! nesting (`image.data.attributes.url`). The `populate=*` query parameter
//! is required for those relations to be present at all.

use chrono::{DateTime, Utc};
use pagesmith_shared::{Page, Post, RecordId, Result, TeamMember};
use serde::Deserialize;
use url::Url;

use super::{BackendAdapter, Collection, decode, endpoint};

/// Adapter for Strapi-shaped backends.
#[derive(Debug)]
pub struct StrapiAdapter;

impl BackendAdapter for StrapiAdapter {
    fn kind(&self) -> &str {
        "strapi"
    }

    fn collection_url(&self, base: &Url, collection: Collection, preview: bool) -> Result<Url> {
        let path = match collection {
            Collection::Pages => "api/pages",
            Collection::Posts => "api/posts",
            Collection::Team => "api/team",
        };
        let query = if preview {
            format!("{path}?populate=*&preview=true")
        } else {
            format!("{path}?populate=*")
        };
        endpoint(base, &query)
    }

    fn parse_pages(&self, body: &str) -> Result<Vec<Page>> {
        let envelope: Envelope<PageAttributes> = decode(body, self.kind())?;
        Ok(envelope
            .data
            .into_iter()
            .map(|entry| Page {
                id: entry.id,
                title: entry.attributes.title,
                slug: entry.attributes.slug,
                body: entry.attributes.body.unwrap_or_default(),
                image_url: media_url(entry.attributes.image),
            })
            .collect())
    }

    fn parse_posts(&self, body: &str) -> Result<Vec<Post>> {
        let envelope: Envelope<PostAttributes> = decode(body, self.kind())?;
        Ok(envelope
            .data
            .into_iter()
            .map(|entry| Post {
                id: entry.id,
                title: entry.attributes.title,
                slug: entry.attributes.slug,
                body: entry.attributes.body.unwrap_or_default(),
                published_at: entry.attributes.published_at,
                author: entry.attributes.author,
            })
            .collect())
    }

    fn parse_team(&self, body: &str) -> Result<Vec<TeamMember>> {
        let envelope: Envelope<TeamAttributes> = decode(body, self.kind())?;
        Ok(envelope
            .data
            .into_iter()
            .map(|entry| TeamMember {
                id: entry.id,
                name: entry.attributes.name,
                role: entry.attributes.role,
                bio: entry.attributes.bio.unwrap_or_default(),
                photo_url: media_url(entry.attributes.photo),
            })
            .collect())
    }
}

// ---------------------------------------------------------------------------
// Response envelope
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct Envelope<T> {
    data: Vec<Entry<T>>,
}

#[derive(Deserialize)]
struct Entry<T> {
    id: RecordId,
    attributes: T,
}

#[derive(Deserialize)]
struct PageAttributes {
    title: String,
    #[serde(default)]
    slug: Option<String>,
    #[serde(default)]
    body: Option<String>,
    #[serde(default)]
    image: Option<Media>,
}

#[derive(Deserialize)]
struct PostAttributes {
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
struct TeamAttributes {
    name: String,
    #[serde(default)]
    role: Option<String>,
    #[serde(default)]
    bio: Option<String>,
    #[serde(default)]
    photo: Option<Media>,
}

/// A Strapi media relation: `{ data: { attributes: { url } } }`,
/// with `data: null` when nothing is attached.
#[derive(Deserialize)]
struct Media {
    #[serde(default)]
    data: Option<MediaEntry>,
}

#[derive(Deserialize)]
struct MediaEntry {
    attributes: MediaAttributes,
}

#[derive(Deserialize)]
struct MediaAttributes {
    url: String,
}

fn media_url(media: Option<Media>) -> Option<String> {
    media.and_then(|m| m.data).map(|d| d.attributes.url)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("http://localhost:1337").unwrap()
    }

    #[test]
    fn pages_url_includes_populate() {
        let url = StrapiAdapter
            .collection_url(&base(), Collection::Pages, false)
            .unwrap();
        assert_eq!(url.as_str(), "http://localhost:1337/api/pages?populate=*");
    }

    #[test]
    fn preview_flag_appends_parameter() {
        let url = StrapiAdapter
            .collection_url(&base(), Collection::Posts, true)
            .unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:1337/api/posts?populate=*&preview=true"
        );
    }

    #[test]
    fn parse_pages_maps_nested_image() {
        let body = r#"{"data":[{"id":1,"attributes":{"title":"Home","body":"<p>Welcome</p>","image":{"data":{"attributes":{"url":"/img.png"}}}}}]}"#;
        let pages = StrapiAdapter.parse_pages(body).unwrap();
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].id, RecordId::from("1"));
        assert_eq!(pages[0].title, "Home");
        assert_eq!(pages[0].body, "<p>Welcome</p>");
        assert_eq!(pages[0].image_url.as_deref(), Some("/img.png"));
    }

    #[test]
    fn parse_pages_preserves_order() {
        let body = r#"{"data":[
            {"id":3,"attributes":{"title":"Services"}},
            {"id":1,"attributes":{"title":"Home"}},
            {"id":2,"attributes":{"title":"About Us"}}
        ]}"#;
        let pages = StrapiAdapter.parse_pages(body).unwrap();
        let titles: Vec<&str> = pages.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, ["Services", "Home", "About Us"]);
    }

    #[test]
    fn absent_image_relation_is_none() {
        // No image key at all, and an explicit null relation.
        let body = r#"{"data":[
            {"id":1,"attributes":{"title":"Home","body":""}},
            {"id":2,"attributes":{"title":"About","body":"","image":{"data":null}}}
        ]}"#;
        let pages = StrapiAdapter.parse_pages(body).unwrap();
        assert!(pages[0].image_url.is_none());
        assert!(pages[1].image_url.is_none());
    }

    #[test]
    fn missing_body_defaults_to_empty() {
        let body = r#"{"data":[{"id":1,"attributes":{"title":"Home"}}]}"#;
        let pages = StrapiAdapter.parse_pages(body).unwrap();
        assert_eq!(pages[0].body, "");
    }

    #[test]
    fn missing_data_key_is_malformed() {
        let err = StrapiAdapter
            .parse_pages(r#"{"results":[]}"#)
            .unwrap_err();
        assert!(matches!(
            err,
            pagesmith_shared::PagesmithError::MalformedResponse { .. }
        ));
    }

    #[test]
    fn non_json_body_is_malformed() {
        let err = StrapiAdapter.parse_pages("<html>502</html>").unwrap_err();
        assert!(matches!(
            err,
            pagesmith_shared::PagesmithError::MalformedResponse { .. }
        ));
    }

    #[test]
    fn parse_posts_reads_timestamp_and_author() {
        let body = r#"{"data":[{"id":10,"attributes":{
            "title":"5 Tips for Security Online",
            "body":"<p>Stay safe.</p>",
            "published_at":"2024-03-01T09:00:00Z",
            "author":"Jane Doe"
        }}]}"#;
        let posts = StrapiAdapter.parse_posts(body).unwrap();
        assert_eq!(posts[0].author.as_deref(), Some("Jane Doe"));
        assert_eq!(
            posts[0].published_at.unwrap().to_rfc3339(),
            "2024-03-01T09:00:00+00:00"
        );
    }

    #[test]
    fn parse_team_maps_photo() {
        let body = r#"{"data":[{"id":4,"attributes":{
            "name":"Jane Doe",
            "role":"UX Lead",
            "bio":"<p>Designs things.</p>",
            "photo":{"data":{"attributes":{"url":"/jane.jpg"}}}
        }}]}"#;
        let team = StrapiAdapter.parse_team(body).unwrap();
        assert_eq!(team[0].name, "Jane Doe");
        assert_eq!(team[0].photo_url.as_deref(), Some("/jane.jpg"));
    }
}
