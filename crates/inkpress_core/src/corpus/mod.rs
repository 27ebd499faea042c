//! Corpus repository contracts and filesystem implementation.
//!
//! # Responsibility
//! - Provide stable read APIs over the content tree.
//! - Keep filesystem layout details inside the corpus boundary.
//!
//! # Invariants
//! - Post listing order is always `date DESC, slug ASC`.
//! - Duplicate slugs are rejected instead of silently shadowed.
//! - Draft posts are excluded unless a query opts in.

use crate::frontmatter::FrontMatterError;
use crate::model::post::{Post, PostValidationError, Slug};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

mod fs_repo;

pub use fs_repo::FsPostRepository;

/// Default page size for post listings.
pub const POSTS_DEFAULT_LIMIT: u32 = 10;
/// Hard cap for post listing page size.
pub const POSTS_LIMIT_MAX: u32 = 50;

pub type CorpusResult<T> = Result<T, CorpusError>;

/// Corpus-layer error for scanning, parsing and query operations.
#[derive(Debug)]
pub enum CorpusError {
    /// Filesystem access failed for the given path.
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// A document failed front-matter extraction or parsing.
    FrontMatter {
        path: PathBuf,
        source: FrontMatterError,
    },
    /// A parsed post violated a metadata invariant.
    Validation(PostValidationError),
    /// Two source files resolve to the same slug.
    DuplicateSlug {
        slug: Slug,
        first: PathBuf,
        second: PathBuf,
    },
}

impl Display for CorpusError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "corpus io error at `{}`: {source}", path.display())
            }
            Self::FrontMatter { path, source } => {
                write!(f, "invalid post `{}`: {source}", path.display())
            }
            Self::Validation(err) => write!(f, "{err}"),
            Self::DuplicateSlug {
                slug,
                first,
                second,
            } => write!(
                f,
                "duplicate slug `{slug}`: `{}` collides with `{}`",
                second.display(),
                first.display()
            ),
        }
    }
}

impl Error for CorpusError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::FrontMatter { source, .. } => Some(source),
            Self::Validation(err) => Some(err),
            Self::DuplicateSlug { .. } => None,
        }
    }
}

impl From<PostValidationError> for CorpusError {
    fn from(value: PostValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Query options for listing posts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostListQuery {
    /// Optional single-tag exact match filter (normalized form).
    pub tag: Option<String>,
    /// Whether drafts participate in the result set.
    pub include_drafts: bool,
    /// Maximum rows to return. Defaults to 10 and clamps to 50.
    pub limit: Option<u32>,
    /// Number of rows to skip after ordering.
    pub offset: u32,
}

/// Repository interface for read access to the post corpus.
pub trait PostRepository {
    /// Gets one post by slug. Drafts are returned only when `include_drafts`.
    fn get_post(&self, slug: &str, include_drafts: bool) -> CorpusResult<Option<Post>>;
    /// Lists posts using tag filter, draft visibility and pagination.
    fn list_posts(&self, query: &PostListQuery) -> CorpusResult<Vec<Post>>;
    /// Returns all normalized tags used by published posts, sorted by name.
    fn list_tags(&self) -> CorpusResult<Vec<String>>;
}

/// Clamps a requested limit to the corpus page-size policy.
pub fn normalize_post_limit(limit: Option<u32>) -> u32 {
    limit
        .unwrap_or(POSTS_DEFAULT_LIMIT)
        .clamp(1, POSTS_LIMIT_MAX)
}
