//! Markdown rendering.
//!
//! # Responsibility
//! - Turn post bodies into HTML with a fixed, deterministic option set.
//! - Assemble complete pages (post, index, tag) around rendered bodies.
//!
//! # Invariants
//! - Rendering is pure: identical input yields byte-identical output.
//! - No timestamps or environment data ever reach the output.

use comrak::Options;
use once_cell::sync::Lazy;
use regex::Regex;

pub mod page;

static HEADING_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^(#{1,6})\s+(.+?)\s*$").expect("valid heading regex"));
static INTER_TAG_WS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r">\s+<").expect("valid inter-tag whitespace regex"));

/// One heading extracted for table-of-contents assembly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Heading {
    /// Heading depth, 1 through 6.
    pub level: usize,
    /// Heading text with markdown markers stripped.
    pub text: String,
    /// Anchor id matching the rendered heading id.
    pub anchor: String,
}

/// Renders a markdown body to an HTML fragment.
///
/// `with_heading_ids` adds GitHub-style ids to headings so the
/// table-of-contents block can link to them.
pub fn markdown_to_html(body: &str, with_heading_ids: bool) -> String {
    let mut options = Options::default();
    options.extension.table = true;
    options.extension.strikethrough = true;
    options.extension.autolink = true;
    if with_heading_ids {
        options.extension.header_ids = Some(String::new());
    }
    // The corpus embeds raw HTML snippets inside prose; keep them.
    options.render.r#unsafe = true;

    comrak::markdown_to_html(body, &options)
}

/// Extracts headings from a markdown body for table-of-contents assembly.
///
/// Fenced code blocks are skipped so shell comments do not become headings.
pub fn extract_headings(body: &str) -> Vec<Heading> {
    let mut headings = Vec::new();
    let mut in_fence = false;
    for line in body.lines() {
        let trimmed = line.trim_start();
        if trimmed.starts_with("```") || trimmed.starts_with("~~~") {
            in_fence = !in_fence;
            continue;
        }
        if in_fence {
            continue;
        }
        if let Some(caps) = HEADING_RE.captures(line) {
            let level = caps[1].len();
            let text = caps[2].to_string();
            let anchor = anchor_for(&text);
            headings.push(Heading {
                level,
                text,
                anchor,
            });
        }
    }
    headings
}

/// Builds a GitHub-style anchor id from heading text.
fn anchor_for(text: &str) -> String {
    let mut anchor = String::with_capacity(text.len());
    for ch in text.chars() {
        if ch.is_alphanumeric() {
            anchor.extend(ch.to_lowercase());
        } else if ch.is_whitespace() || ch == '-' {
            anchor.push('-');
        }
    }
    anchor
}

/// Collapses whitespace between HTML tags.
pub fn minify_html(html: &str) -> String {
    INTER_TAG_WS_RE.replace_all(html.trim(), "><").into_owned()
}

/// Escapes text for embedding into HTML element content or attributes.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::{escape_html, extract_headings, markdown_to_html, minify_html};

    #[test]
    fn renders_basic_markdown() {
        let html = markdown_to_html("# Title\n\nSome **bold** text.\n", false);
        assert!(html.contains("<h1>"));
        assert!(html.contains("<strong>bold</strong>"));
    }

    #[test]
    fn rendering_is_deterministic() {
        let body = "## A\n\n| a | b |\n|---|---|\n| 1 | 2 |\n";
        assert_eq!(markdown_to_html(body, true), markdown_to_html(body, true));
    }

    #[test]
    fn heading_extraction_skips_code_fences() {
        let body = "# One\n```sh\n# not a heading\n```\n## Two\n";
        let headings = extract_headings(body);
        assert_eq!(headings.len(), 2);
        assert_eq!(headings[0].anchor, "one");
        assert_eq!(headings[1].level, 2);
    }

    #[test]
    fn minify_collapses_inter_tag_whitespace() {
        let html = "<ul>\n  <li>x</li>\n</ul>\n";
        assert_eq!(minify_html(html), "<ul><li>x</li></ul>");
    }

    #[test]
    fn escape_handles_markup_characters() {
        assert_eq!(escape_html("a < b & \"c\""), "a &lt; b &amp; &quot;c&quot;");
    }
}
