//! Post domain model.
//!
//! # Responsibility
//! - Define the canonical record for one corpus document.
//! - Validate front-matter invariants before a post enters the corpus.
//!
//! # Invariants
//! - `slug` is stable and unique across the corpus.
//! - `draft == true` excludes a post from the published output set.
//! - Tags are normalized to lowercase, deduplicated and sorted.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

/// Stable identifier for a post, derived from the source file stem.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type Slug = String;

/// Front-matter metadata recognized on every corpus document.
///
/// Fields beyond `title` and `date` are optional in the source document and
/// default to the inactive state here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrontMatter {
    /// Display title. Must be non-empty.
    pub title: String,
    /// Publish date driving chronological ordering.
    pub date: NaiveDate,
    /// Excludes the post from published output when true.
    #[serde(default)]
    pub draft: bool,
    /// Enables the table-of-contents block on the rendered page.
    #[serde(default)]
    pub toc: bool,
    /// Enables formula rendering on the page.
    #[serde(default)]
    pub math: bool,
    /// Declared page images, checked against the images directory.
    #[serde(default)]
    pub images: Vec<String>,
    /// Post tags, normalized to lowercase.
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Canonical corpus record: metadata plus raw markdown body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    /// Stable slug used for output paths and cross-referencing.
    pub slug: Slug,
    /// Source file this post was loaded from.
    pub source_path: PathBuf,
    /// Parsed front-matter metadata.
    pub meta: FrontMatter,
    /// Raw markdown body without the front-matter block.
    pub body: String,
}

/// Validation failures for post metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostValidationError {
    /// Title is empty or whitespace-only.
    EmptyTitle { slug: Slug },
    /// Slug contains characters outside `[a-z0-9-]` or is empty.
    InvalidSlug { slug: String },
    /// A tag normalized to the empty string.
    EmptyTag { slug: Slug },
}

impl Display for PostValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle { slug } => write!(f, "post `{slug}` has an empty title"),
            Self::InvalidSlug { slug } => write!(
                f,
                "invalid slug `{slug}`; expected lowercase letters, digits and `-`"
            ),
            Self::EmptyTag { slug } => write!(f, "post `{slug}` has an empty tag"),
        }
    }
}

impl Error for PostValidationError {}

impl Post {
    /// Creates a post from parsed parts, normalizing tags in the process.
    ///
    /// # Invariants
    /// - Tags are lowercased, trimmed, deduplicated and sorted.
    /// - The result still requires `validate()` before entering the corpus.
    pub fn new(
        slug: impl Into<Slug>,
        source_path: PathBuf,
        mut meta: FrontMatter,
        body: impl Into<String>,
    ) -> Self {
        meta.tags = normalize_tags(&meta.tags);
        Self {
            slug: slug.into(),
            source_path,
            meta,
            body: body.into(),
        }
    }

    /// Returns whether this post belongs to the published output set.
    pub fn is_published(&self) -> bool {
        !self.meta.draft
    }

    /// Validates metadata invariants.
    ///
    /// # Errors
    /// - `EmptyTitle` when the title is blank.
    /// - `InvalidSlug` when the slug is empty or carries unexpected characters.
    /// - `EmptyTag` when any raw tag normalized to nothing.
    pub fn validate(&self) -> Result<(), PostValidationError> {
        if !is_valid_slug(&self.slug) {
            return Err(PostValidationError::InvalidSlug {
                slug: self.slug.clone(),
            });
        }
        if self.meta.title.trim().is_empty() {
            return Err(PostValidationError::EmptyTitle {
                slug: self.slug.clone(),
            });
        }
        if self.meta.tags.iter().any(|tag| tag.is_empty()) {
            return Err(PostValidationError::EmptyTag {
                slug: self.slug.clone(),
            });
        }
        Ok(())
    }
}

/// Returns whether `slug` is non-empty lowercase ASCII alphanumeric plus `-`.
pub fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug
            .chars()
            .all(|ch| ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch == '-')
}

/// Derives a slug from a file stem: lowercase, non-alphanumeric runs become `-`.
pub fn slug_from_stem(stem: &str) -> Slug {
    let mut slug = String::with_capacity(stem.len());
    let mut previous_was_dash = true;
    for ch in stem.chars() {
        if ch.is_ascii_alphanumeric() {
            slug.push(ch.to_ascii_lowercase());
            previous_was_dash = false;
        } else if !previous_was_dash {
            slug.push('-');
            previous_was_dash = true;
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

/// Normalizes a single tag to its canonical lowercase form.
///
/// Returns `None` when the tag is empty after trimming.
pub fn normalize_tag(tag: &str) -> Option<String> {
    let normalized = tag.trim().to_lowercase();
    if normalized.is_empty() {
        None
    } else {
        Some(normalized)
    }
}

/// Normalizes a tag list: lowercase, trimmed, deduplicated, sorted.
///
/// Empty inputs are dropped; callers that must reject them should check the
/// raw list before normalization.
pub fn normalize_tags(tags: &[String]) -> Vec<String> {
    tags.iter()
        .filter_map(|tag| normalize_tag(tag))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
