//! End-to-end `build` pipeline: fetch → normalize → sanitize/render → site.
//!
//! Static-generation model: each collection is fetched exactly once, every
//! record is rendered to a file, and the output directory plus a `site.json`
//! build manifest are the only artifacts. No caching between builds.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Instant;

use tracing::{info, instrument, warn};

use pagesmith_render as render;
use pagesmith_shared::{
    BackendConfig, FetchConfig, Page, PagesmithError, Post, RecordId, Result, TeamMember,
};
use pagesmith_sources::ContentRepository;

/// Configuration for the `build` pipeline.
#[derive(Debug, Clone)]
pub struct BuildConfig {
    /// Which backend to fetch from.
    pub backend: BackendConfig,
    /// Site output directory.
    pub output_dir: PathBuf,
    /// HTTP/retry settings.
    pub fetch: FetchConfig,
    /// On fetch failure, substitute empty collections and render the empty
    /// state instead of failing the build. Misconfiguration errors
    /// (unsupported backend kind) still fail.
    pub allow_empty: bool,
    /// Tool version string recorded in the build manifest.
    pub tool_version: String,
}

/// Result of the `build` pipeline.
#[derive(Debug)]
pub struct BuildResult {
    /// Where the site was written.
    pub output_dir: PathBuf,
    /// Number of pages rendered.
    pub page_count: usize,
    /// Number of posts rendered.
    pub post_count: usize,
    /// Number of team members rendered.
    pub member_count: usize,
    /// Total elapsed time.
    pub elapsed: std::time::Duration,
}

/// Progress callback for reporting pipeline status.
pub trait ProgressReporter: Send + Sync {
    /// Called when entering a new phase.
    fn phase(&self, name: &str);
    /// Called when an output file is written.
    fn record_rendered(&self, path: &str, current: usize, total: usize);
    /// Called when the pipeline completes.
    fn done(&self, result: &BuildResult);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn phase(&self, _name: &str) {}
    fn record_rendered(&self, _path: &str, _current: usize, _total: usize) {}
    fn done(&self, _result: &BuildResult) {}
}

/// Run the full `build` pipeline.
///
/// 1. Fetch pages, posts, and team through the content repository
/// 2. Render each record and the index
/// 3. Write the site directory and `site.json`
#[instrument(skip_all, fields(kind = %config.backend.kind, out = %config.output_dir.display()))]
pub async fn build_site(
    config: &BuildConfig,
    progress: &dyn ProgressReporter,
) -> Result<BuildResult> {
    let start = Instant::now();

    progress.phase("Fetching content");
    let repository = ContentRepository::new(&config.fetch)?;

    let (pages, posts, team) = match fetch_all(&repository, &config.backend).await {
        Ok(collections) => collections,
        Err(e @ PagesmithError::UnsupportedBackend { .. }) => return Err(e),
        Err(e) if config.allow_empty => {
            warn!(error = %e, "fetch failed, rendering empty site");
            (Vec::new(), Vec::new(), Vec::new())
        }
        Err(e) => return Err(e),
    };

    progress.phase("Rendering site");
    std::fs::create_dir_all(&config.output_dir)
        .map_err(|e| PagesmithError::io(&config.output_dir, e))?;

    // Index: the page grid (or the empty state when there are no pages).
    let index = render::render_document("Home", &render::render_page_list(&pages));
    write_file(&config.output_dir.join("index.html"), &index)?;

    // One file per page.
    let pages_dir = config.output_dir.join("pages");
    if !pages.is_empty() {
        std::fs::create_dir_all(&pages_dir).map_err(|e| PagesmithError::io(&pages_dir, e))?;
    }
    let mut used_slugs = HashSet::new();
    let total = pages.len();
    for (i, page) in pages.iter().enumerate() {
        let slug = unique_slug(
            &mut used_slugs,
            output_slug(page.slug.as_deref(), &page.title, &page.id),
            &page.id,
        );
        let path = pages_dir.join(format!("{slug}.html"));
        let doc = render::render_document(&page.title, &render::render_page(page));
        write_file(&path, &doc)?;
        progress.record_rendered(&format!("pages/{slug}.html"), i + 1, total);
    }

    if !posts.is_empty() {
        let doc = render::render_document("Posts", &render::render_post_list(&posts));
        write_file(&config.output_dir.join("posts.html"), &doc)?;
    }

    if !team.is_empty() {
        let doc = render::render_document("Team", &render::render_team_list(&team));
        write_file(&config.output_dir.join("team.html"), &doc)?;
    }

    progress.phase("Writing build manifest");
    let manifest = serde_json::json!({
        "generated_at": chrono::Utc::now().to_rfc3339(),
        "backend": config.backend.kind,
        "base_url": config.backend.base_url.as_str(),
        "preview": config.backend.preview,
        "tool_version": config.tool_version,
        "pages": pages.len(),
        "posts": posts.len(),
        "team": team.len(),
    });
    let manifest_json = serde_json::to_string_pretty(&manifest)
        .map_err(|e| PagesmithError::Render(format!("manifest serialization: {e}")))?;
    write_file(&config.output_dir.join("site.json"), &manifest_json)?;

    let result = BuildResult {
        output_dir: config.output_dir.clone(),
        page_count: pages.len(),
        post_count: posts.len(),
        member_count: team.len(),
        elapsed: start.elapsed(),
    };

    progress.done(&result);

    info!(
        pages = result.page_count,
        posts = result.post_count,
        team = result.member_count,
        elapsed_ms = result.elapsed.as_millis(),
        "build complete"
    );

    Ok(result)
}

/// Fetch all collections, one request at a time.
async fn fetch_all(
    repository: &ContentRepository,
    backend: &BackendConfig,
) -> Result<(Vec<Page>, Vec<Post>, Vec<TeamMember>)> {
    let pages = repository.list_pages(backend).await?;
    let posts = repository.list_posts(backend).await?;
    let team = repository.list_team(backend).await?;
    Ok((pages, posts, team))
}

// ---------------------------------------------------------------------------
// Output naming
// ---------------------------------------------------------------------------

/// Pick the output slug: the backend's slug when present, otherwise the
/// slugified title, otherwise the record id.
fn output_slug(slug: Option<&str>, title: &str, id: &RecordId) -> String {
    let base = slug
        .map(slugify)
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| slugify(title));
    if base.is_empty() {
        format!("record-{id}")
    } else {
        base
    }
}

/// Disambiguate duplicate slugs with the record id.
fn unique_slug(used: &mut HashSet<String>, candidate: String, id: &RecordId) -> String {
    if used.insert(candidate.clone()) {
        return candidate;
    }
    let fallback = format!("{candidate}-{id}");
    used.insert(fallback.clone());
    fallback
}

/// Convert arbitrary text into a filesystem-safe slug.
fn slugify(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut pending_dash = false;
    for c in s.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !out.is_empty() {
                out.push('-');
            }
            pending_dash = false;
            out.push(c.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }
    out
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    std::fs::write(path, content).map_err(|e| PagesmithError::io(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path as url_path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn slugify_basic() {
        assert_eq!(slugify("About Us"), "about-us");
        assert_eq!(slugify("  5 Tips, for Security!  "), "5-tips-for-security");
        assert_eq!(slugify("???"), "");
    }

    #[test]
    fn output_slug_prefers_backend_slug() {
        let id = RecordId::from("9");
        assert_eq!(output_slug(Some("about-us"), "Ignored", &id), "about-us");
        assert_eq!(output_slug(None, "About Us", &id), "about-us");
        assert_eq!(output_slug(None, "???", &id), "record-9");
    }

    #[test]
    fn duplicate_slugs_get_id_suffix() {
        let mut used = HashSet::new();
        let first = unique_slug(&mut used, "home".into(), &RecordId::from("1"));
        let second = unique_slug(&mut used, "home".into(), &RecordId::from("2"));
        assert_eq!(first, "home");
        assert_eq!(second, "home-2");
    }

    fn test_config(uri: &str, out: PathBuf, allow_empty: bool) -> BuildConfig {
        BuildConfig {
            backend: BackendConfig {
                kind: "strapi".into(),
                base_url: url::Url::parse(uri).unwrap(),
                preview: false,
            },
            output_dir: out,
            fetch: FetchConfig {
                timeout_secs: 5,
                max_attempts: 0,
                initial_delay_ms: 1,
                max_delay_ms: 5,
            },
            allow_empty,
            tool_version: "test".into(),
        }
    }

    fn tmp_out(server: &MockServer, name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("pagesmith-{name}-{}", server.address().port()))
    }

    #[tokio::test]
    async fn build_writes_site_from_strapi_backend() {
        let server = MockServer::start().await;

        let pages = std::fs::read_to_string("../../../fixtures/json/strapi-pages.fixture.json")
            .expect("read strapi fixture");

        Mock::given(method("GET"))
            .and(url_path("/api/pages"))
            .respond_with(ResponseTemplate::new(200).set_body_string(pages))
            .mount(&server)
            .await;

        let posts = r#"{"data":[{"id":10,"attributes":{
            "title":"Why Data Matters","body":"<p>Data.</p>","author":"Maya Lin"}}]}"#;
        Mock::given(method("GET"))
            .and(url_path("/api/posts"))
            .respond_with(ResponseTemplate::new(200).set_body_string(posts))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(url_path("/api/team"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"data":[]}"#))
            .mount(&server)
            .await;

        let out = tmp_out(&server, "build");
        let config = test_config(&server.uri(), out.clone(), false);
        let result = build_site(&config, &SilentProgress).await.unwrap();

        assert_eq!(result.page_count, 3);
        assert_eq!(result.post_count, 1);
        assert_eq!(result.member_count, 0);

        let index = std::fs::read_to_string(out.join("index.html")).unwrap();
        assert!(index.contains("<h2>Home</h2>"));
        assert!(index.contains("/uploads/home.png"));

        // Fixture page 2 ("About Us") has no image relation.
        let about = std::fs::read_to_string(out.join("pages/about-us.html")).unwrap();
        assert!(!about.contains("<img"));

        assert!(out.join("posts.html").exists());
        assert!(!out.join("team.html").exists());

        let manifest: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(out.join("site.json")).unwrap())
                .unwrap();
        assert_eq!(manifest["pages"], 3);
        assert_eq!(manifest["backend"], "strapi");

        let _ = std::fs::remove_dir_all(&out);
    }

    #[tokio::test]
    async fn fetch_failure_fails_the_build_by_default() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let out = tmp_out(&server, "fail");
        let config = test_config(&server.uri(), out.clone(), false);
        let err = build_site(&config, &SilentProgress).await.unwrap_err();
        assert!(matches!(err, PagesmithError::Network(_)));
        assert!(!out.exists());
    }

    #[tokio::test]
    async fn allow_empty_substitutes_the_empty_state() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let out = tmp_out(&server, "empty");
        let config = test_config(&server.uri(), out.clone(), true);
        let result = build_site(&config, &SilentProgress).await.unwrap();

        assert_eq!(result.page_count, 0);
        let index = std::fs::read_to_string(out.join("index.html")).unwrap();
        assert!(index.contains("No content is available yet."));

        let _ = std::fs::remove_dir_all(&out);
    }

    #[tokio::test]
    async fn unsupported_backend_fails_even_with_allow_empty() {
        let server = MockServer::start().await;

        let out = tmp_out(&server, "unsupported");
        let mut config = test_config(&server.uri(), out, true);
        config.backend.kind = "ghost".into();

        let err = build_site(&config, &SilentProgress).await.unwrap_err();
        assert!(matches!(err, PagesmithError::UnsupportedBackend { .. }));
    }
}
