//! Presentation components for normalized CMS records.
//!
//! Every renderer takes a normalized record and produces a deterministic
//! HTML fragment: a container element with a heading, the sanitized body
//! region, and an image element only when an image is attached (records
//! without one get no placeholder). Scalar fields are entity-escaped;
//! rich-text bodies pass through the allow-list sanitizer in [`sanitize`].

mod sanitize;

use pagesmith_shared::{Page, Post, TeamMember};
use sanitize::safe_url;

pub use sanitize::{escape_html, sanitize_html};

// ---------------------------------------------------------------------------
// Record fragments
// ---------------------------------------------------------------------------

/// Render one page as a card fragment.
pub fn render_page(page: &Page) -> String {
    let mut out = String::new();
    out.push_str("<article class=\"page-card\">\n");
    out.push_str(&format!("  <h2>{}</h2>\n", escape_html(&page.title)));
    out.push_str(&format!(
        "  <div class=\"page-body\">{}</div>\n",
        sanitize_html(&page.body)
    ));
    if let Some(image) = page.image_url.as_deref().filter(|u| safe_url(u)) {
        out.push_str(&format!(
            "  <img src=\"{}\" alt=\"{}\">\n",
            escape_html(image),
            escape_html(&page.title)
        ));
    }
    out.push_str("</article>\n");
    out
}

/// Render one post as a card fragment.
pub fn render_post(post: &Post) -> String {
    let mut out = String::new();
    out.push_str("<article class=\"post-card\">\n");
    out.push_str(&format!("  <h2>{}</h2>\n", escape_html(&post.title)));

    let mut meta = Vec::new();
    if let Some(published) = &post.published_at {
        meta.push(published.format("%Y-%m-%d").to_string());
    }
    if let Some(author) = &post.author {
        meta.push(format!("by {}", escape_html(author)));
    }
    if !meta.is_empty() {
        out.push_str(&format!("  <p class=\"post-meta\">{}</p>\n", meta.join(" ")));
    }

    out.push_str(&format!(
        "  <div class=\"post-body\">{}</div>\n",
        sanitize_html(&post.body)
    ));
    out.push_str("</article>\n");
    out
}

/// Render one team member as a card fragment.
pub fn render_team_member(member: &TeamMember) -> String {
    let mut out = String::new();
    out.push_str("<article class=\"team-card\">\n");
    out.push_str(&format!("  <h2>{}</h2>\n", escape_html(&member.name)));
    if let Some(role) = &member.role {
        out.push_str(&format!("  <p class=\"team-role\">{}</p>\n", escape_html(role)));
    }
    out.push_str(&format!(
        "  <div class=\"team-bio\">{}</div>\n",
        sanitize_html(&member.bio)
    ));
    if let Some(photo) = member.photo_url.as_deref().filter(|u| safe_url(u)) {
        out.push_str(&format!(
            "  <img src=\"{}\" alt=\"{}\">\n",
            escape_html(photo),
            escape_html(&member.name)
        ));
    }
    out.push_str("</article>\n");
    out
}

// ---------------------------------------------------------------------------
// Collection fragments
// ---------------------------------------------------------------------------

/// Render a page collection as a grid, or the empty state when there is
/// nothing to show.
pub fn render_page_list(pages: &[Page]) -> String {
    if pages.is_empty() {
        return render_empty_state();
    }
    let mut out = String::from("<main class=\"page-grid\">\n");
    for page in pages {
        out.push_str(&render_page(page));
    }
    out.push_str("</main>\n");
    out
}

/// Render a post collection, newest-first ordering left to the backend.
pub fn render_post_list(posts: &[Post]) -> String {
    if posts.is_empty() {
        return render_empty_state();
    }
    let mut out = String::from("<main class=\"post-list\">\n");
    for post in posts {
        out.push_str(&render_post(post));
    }
    out.push_str("</main>\n");
    out
}

/// Render the team roster.
pub fn render_team_list(team: &[TeamMember]) -> String {
    if team.is_empty() {
        return render_empty_state();
    }
    let mut out = String::from("<main class=\"team-grid\">\n");
    for member in team {
        out.push_str(&render_team_member(member));
    }
    out.push_str("</main>\n");
    out
}

/// The user-visible empty/failure state.
pub fn render_empty_state() -> String {
    "<section class=\"empty-state\">\n  <p>No content is available yet.</p>\n</section>\n".into()
}

/// Wrap a body fragment in a complete HTML document.
pub fn render_document(title: &str, body: &str) -> String {
    format!(
        "<!doctype html>\n<html lang=\"en\">\n<head>\n  <meta charset=\"utf-8\">\n  \
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n  \
         <title>{}</title>\n</head>\n<body>\n{}</body>\n</html>\n",
        escape_html(title),
        body
    )
}
