//! Allow-list HTML sanitizer for rich-text bodies.
//!
//! CMS editors write rich text through a WYSIWYG editor, so bodies arrive as
//! HTML of unknown provenance. Instead of injecting them raw, the renderer
//! routes every body through this pass: a fixed set of structural and inline
//! tags survives, everything else is either dropped with its contents
//! (script-like embeds) or unwrapped so only its text remains. Attributes
//! are dropped except for a short per-tag list, and `href`/`src` values must
//! be http(s), mailto, or relative.

use ego_tree::NodeRef;
use scraper::node::Node;
use scraper::Html;

/// Tags that pass through with their children.
const ALLOWED_TAGS: &[&str] = &[
    "a", "b", "blockquote", "br", "code", "em", "figcaption", "figure", "h1", "h2", "h3", "h4",
    "h5", "h6", "hr", "i", "li", "ol", "p", "pre", "s", "span", "strong", "table", "tbody", "td",
    "th", "thead", "tr", "u", "ul",
];

/// Tags removed together with everything inside them.
const DROP_WITH_CONTENT: &[&str] = &[
    "head", "iframe", "noscript", "object", "script", "style", "svg", "template", "title",
];

/// Allowed tags with no closing tag.
const VOID_TAGS: &[&str] = &["br", "hr"];

/// Sanitize an HTML fragment through the allow-list.
///
/// Output is deterministic for a given input: tags and attributes are
/// emitted in source order, text is entity-escaped.
pub fn sanitize_html(html: &str) -> String {
    let fragment = Html::parse_fragment(html);
    let mut out = String::with_capacity(html.len());
    for child in fragment.root_element().children() {
        write_node(child, &mut out);
    }
    out
}

fn write_node(node: NodeRef<'_, Node>, out: &mut String) {
    match node.value() {
        Node::Text(text) => out.push_str(&escape_html(&text)),
        Node::Element(el) => {
            let name = el.name();

            // An image without a safe src is dropped entirely rather than
            // left as a broken placeholder.
            if name == "img" {
                if let Some(src) = el.attr("src") {
                    if safe_url(src) {
                        out.push_str("<img src=\"");
                        out.push_str(&escape_html(src));
                        out.push('"');
                        for attr in ["alt", "title"] {
                            if let Some(value) = el.attr(attr) {
                                out.push(' ');
                                out.push_str(attr);
                                out.push_str("=\"");
                                out.push_str(&escape_html(value));
                                out.push('"');
                            }
                        }
                        out.push('>');
                    }
                }
                return;
            }

            if ALLOWED_TAGS.contains(&name) {
                out.push('<');
                out.push_str(name);
                for (attr, value) in el.attrs() {
                    if !attr_allowed(name, attr) {
                        continue;
                    }
                    if attr == "href" && !safe_url(value) {
                        continue;
                    }
                    out.push(' ');
                    out.push_str(attr);
                    out.push_str("=\"");
                    out.push_str(&escape_html(value));
                    out.push('"');
                }
                out.push('>');

                if VOID_TAGS.contains(&name) {
                    return;
                }
                for child in node.children() {
                    write_node(child, out);
                }
                out.push_str("</");
                out.push_str(name);
                out.push('>');
            } else if DROP_WITH_CONTENT.contains(&name) {
                // Removed with contents.
            } else {
                // Unknown wrapper: drop the tag, keep what it contains.
                for child in node.children() {
                    write_node(child, out);
                }
            }
        }
        // Comments, doctypes, and processing instructions never survive.
        _ => {}
    }
}

fn attr_allowed(tag: &str, attr: &str) -> bool {
    match tag {
        "a" => matches!(attr, "href" | "title"),
        _ => false,
    }
}

/// Whether a URL is safe to emit in `href`/`src`.
///
/// Relative URLs and http(s)/mailto are fine; anything with another scheme
/// (`javascript:`, `data:`, `file:`) is not.
pub(crate) fn safe_url(value: &str) -> bool {
    let v = value.trim();
    if v.is_empty() {
        return false;
    }
    match v.find(':') {
        None => true,
        Some(idx) => {
            // A ':' after '/', '?', or '#' is part of a path, not a scheme.
            if v[..idx].contains(['/', '?', '#']) {
                return true;
            }
            let scheme = v[..idx].to_ascii_lowercase();
            matches!(scheme.as_str(), "http" | "https" | "mailto")
        }
    }
}

/// Entity-escape text for safe use in HTML content or attribute values.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allowed_markup_passes_through() {
        let html = r#"<p>Hello <strong>world</strong></p><ul><li>one</li><li>two</li></ul>"#;
        assert_eq!(sanitize_html(html), html);
    }

    #[test]
    fn script_is_dropped_with_content() {
        let html = r#"<p>before</p><script>alert("x")</script><p>after</p>"#;
        let clean = sanitize_html(html);
        assert_eq!(clean, "<p>before</p><p>after</p>");
    }

    #[test]
    fn event_handlers_are_stripped() {
        let html = r#"<p onclick="steal()">click me</p>"#;
        assert_eq!(sanitize_html(html), "<p>click me</p>");
    }

    #[test]
    fn javascript_href_is_removed() {
        let html = r#"<a href="javascript:alert(1)">link</a>"#;
        assert_eq!(sanitize_html(html), "<a>link</a>");
    }

    #[test]
    fn http_and_relative_hrefs_survive() {
        let html = r#"<a href="https://example.com/docs">docs</a><a href="/about">about</a>"#;
        assert_eq!(sanitize_html(html), html);
    }

    #[test]
    fn unknown_wrappers_keep_their_text() {
        let html = r#"<div class="note"><p>Important</p></div>"#;
        assert_eq!(sanitize_html(html), "<p>Important</p>");
    }

    #[test]
    fn img_without_safe_src_is_dropped() {
        let html = r#"<p>x</p><img src="javascript:alert(1)" alt="bad">"#;
        assert_eq!(sanitize_html(html), "<p>x</p>");
    }

    #[test]
    fn img_with_safe_src_keeps_alt() {
        let html = r#"<img src="/uploads/a.png" alt="diagram">"#;
        assert_eq!(sanitize_html(html), r#"<img src="/uploads/a.png" alt="diagram">"#);
    }

    #[test]
    fn text_is_entity_escaped() {
        let clean = sanitize_html("<p>1 < 2 & 3 > 2</p>");
        assert_eq!(clean, "<p>1 &lt; 2 &amp; 3 &gt; 2</p>");
    }

    #[test]
    fn comments_are_dropped() {
        let clean = sanitize_html("<p>keep</p><!-- secret -->");
        assert_eq!(clean, "<p>keep</p>");
    }

    #[test]
    fn safe_url_rules() {
        assert!(safe_url("/img.png"));
        assert!(safe_url("img.png"));
        assert!(safe_url("https://example.com/a"));
        assert!(safe_url("mailto:team@example.com"));
        assert!(safe_url("/path/with:colon"));
        assert!(!safe_url("javascript:alert(1)"));
        assert!(!safe_url("data:text/html;base64,xxx"));
        assert!(!safe_url("  "));
    }
}
