//! Site use-case service.
//!
//! # Responsibility
//! - Provide post get/list/tag APIs over any `PostRepository`.
//! - Derive plain-text summaries and lead images from markdown bodies.
//!
//! # Invariants
//! - Post listings are always sorted by `date DESC, slug ASC`.
//! - Tag filters operate on the normalized lowercase form.

use crate::corpus::{normalize_post_limit, CorpusError, CorpusResult, PostListQuery, PostRepository};
use crate::model::post::{normalize_tag, Post, Slug};
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

const SUMMARY_MAX_CHARS: usize = 160;

pub(crate) static MARKDOWN_IMAGE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"!\[[^\]]*]\(([^)\s]+)(?:\s+[^)]*)?\)").expect("valid image regex"));
static MARKDOWN_LINK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[([^\]]+)\]\(([^)]+)\)").expect("valid link regex"));
static MARKDOWN_SYMBOL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"[\*_`#>~\-\[\]\(\)!|$]+"#).expect("valid markdown symbol regex"));
static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid ws regex"));

/// Service error for site use-cases.
#[derive(Debug)]
pub enum SiteServiceError {
    /// Tag input is empty after normalization.
    InvalidTag(String),
    /// Target post does not exist (or is an excluded draft).
    PostNotFound(Slug),
    /// Corpus-layer failure.
    Corpus(CorpusError),
}

impl Display for SiteServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidTag(value) => write!(f, "invalid tag: `{value}`"),
            Self::PostNotFound(slug) => write!(f, "post not found: {slug}"),
            Self::Corpus(err) => write!(f, "{err}"),
        }
    }
}

impl Error for SiteServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Corpus(err) => Some(err),
            _ => None,
        }
    }
}

impl From<CorpusError> for SiteServiceError {
    fn from(value: CorpusError) -> Self {
        Self::Corpus(value)
    }
}

/// List result envelope used by service callers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostsListResult {
    /// List items sorted by `date DESC, slug ASC`.
    pub items: Vec<Post>,
    /// Effective normalized limit used by the query.
    pub applied_limit: u32,
}

/// Markdown-derived summary projection for listings and feeds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkdownSummary {
    /// Sanitized plain-text lead paragraph.
    pub summary_text: Option<String>,
    /// First markdown image path in the body.
    pub lead_image: Option<String>,
}

/// Site service facade over repository implementations.
pub struct SiteService<R: PostRepository> {
    repo: R,
}

impl<R: PostRepository> SiteService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Gets one published post by slug.
    pub fn get_post(&self, slug: &str) -> Result<Post, SiteServiceError> {
        self.repo
            .get_post(slug, false)?
            .ok_or_else(|| SiteServiceError::PostNotFound(slug.to_string()))
    }

    /// Lists published posts using optional single-tag filter and pagination.
    pub fn list_posts(
        &self,
        tag: Option<String>,
        limit: Option<u32>,
        offset: u32,
    ) -> Result<PostsListResult, SiteServiceError> {
        let normalized_tag = match tag {
            Some(raw) => {
                Some(normalize_tag(&raw).ok_or_else(|| SiteServiceError::InvalidTag(raw))?)
            }
            None => None,
        };
        let applied_limit = normalize_post_limit(limit);
        let query = PostListQuery {
            tag: normalized_tag,
            include_drafts: false,
            limit: Some(applied_limit),
            offset,
        };
        let items = self.repo.list_posts(&query)?;
        Ok(PostsListResult {
            items,
            applied_limit,
        })
    }

    /// Lists normalized tags across published posts.
    pub fn list_tags(&self) -> CorpusResult<Vec<String>> {
        self.repo.list_tags()
    }
}

/// Derives summary fields from a markdown body.
///
/// Rules:
/// - `lead_image`: first markdown image path matched by regex.
/// - `summary_text`: markdown symbols removed, whitespace normalized, first
///   160 chars retained.
pub fn derive_summary(body: &str) -> MarkdownSummary {
    let lead_image = MARKDOWN_IMAGE_RE
        .captures(body)
        .and_then(|caps| caps.get(1).map(|m| m.as_str().trim().to_string()))
        .filter(|value| !value.is_empty());

    let without_images = MARKDOWN_IMAGE_RE.replace_all(body, " ");
    let without_links = MARKDOWN_LINK_RE.replace_all(&without_images, "$1");
    let without_symbols = MARKDOWN_SYMBOL_RE.replace_all(&without_links, " ");
    let normalized = WHITESPACE_RE.replace_all(&without_symbols, " ");
    let trimmed = normalized.trim();
    let summary_text = if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.chars().take(SUMMARY_MAX_CHARS).collect())
    };

    MarkdownSummary {
        summary_text,
        lead_image,
    }
}

#[cfg(test)]
mod tests {
    use super::derive_summary;

    #[test]
    fn summary_extracts_first_image_path() {
        let summary = derive_summary("x ![a](images/one.png) y ![b](images/two.png)");
        assert_eq!(summary.lead_image.as_deref(), Some("images/one.png"));
    }

    #[test]
    fn summary_strips_markdown_symbols_and_limits_length() {
        let source = "# Heading\n\n- [link](https://example.com)\n**bold** `code` $x^2$";
        let summary = derive_summary(source);
        let text = summary.summary_text.expect("summary_text should exist");
        assert!(!text.contains('#'));
        assert!(!text.contains('*'));
        assert!(!text.contains('$'));
        assert!(text.chars().count() <= 160);
    }

    #[test]
    fn summary_of_empty_body_is_none() {
        let summary = derive_summary("   \n  ");
        assert!(summary.summary_text.is_none());
        assert!(summary.lead_image.is_none());
    }
}
