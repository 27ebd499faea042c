//! Filesystem-backed post repository.
//!
//! # Responsibility
//! - Walk the content directory and load every markdown document.
//! - Derive stable slugs from file stems.
//!
//! # Invariants
//! - Only `*.md` files are considered; everything else is ignored.
//! - Scan order never leaks into results: listings re-sort by date/slug.

use super::{normalize_post_limit, CorpusError, CorpusResult, PostListQuery, PostRepository};
use crate::frontmatter;
use crate::model::post::{slug_from_stem, Post};
use log::{debug, info, warn};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;
use walkdir::WalkDir;

/// Repository reading posts directly from a content directory.
pub struct FsPostRepository {
    content_dir: PathBuf,
}

impl FsPostRepository {
    /// Creates a repository rooted at the given content directory.
    pub fn new(content_dir: impl Into<PathBuf>) -> Self {
        Self {
            content_dir: content_dir.into(),
        }
    }

    /// Returns the content root this repository scans.
    pub fn content_dir(&self) -> &Path {
        &self.content_dir
    }

    /// Loads every post in the corpus, drafts included.
    ///
    /// Results are sorted `date DESC, slug ASC`. Duplicate slugs fail the
    /// whole scan so that a published build can never pick one arbitrarily.
    ///
    /// # Side effects
    /// - Emits `corpus_scan` logging events with counts and duration.
    pub fn scan(&self) -> CorpusResult<Vec<Post>> {
        let started_at = Instant::now();
        info!(
            "event=corpus_scan module=corpus status=start content_dir={}",
            self.content_dir.display()
        );

        let mut posts: Vec<Post> = Vec::new();
        for entry in WalkDir::new(&self.content_dir)
            .sort_by_file_name()
            .into_iter()
        {
            let entry = entry.map_err(|err| {
                let path = err
                    .path()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| self.content_dir.clone());
                let source = err
                    .into_io_error()
                    .unwrap_or_else(|| std::io::Error::other("walk error"));
                CorpusError::Io { path, source }
            })?;

            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("md") {
                debug!(
                    "event=corpus_scan module=corpus status=skip reason=not_markdown path={}",
                    path.display()
                );
                continue;
            }

            let post = load_post_file(path)?;
            if let Some(existing) = posts.iter().find(|candidate| candidate.slug == post.slug) {
                warn!(
                    "event=corpus_scan module=corpus status=error error_code=duplicate_slug slug={}",
                    post.slug
                );
                return Err(CorpusError::DuplicateSlug {
                    slug: post.slug.clone(),
                    first: existing.source_path.clone(),
                    second: post.source_path,
                });
            }
            posts.push(post);
        }

        sort_chronological(&mut posts);

        info!(
            "event=corpus_scan module=corpus status=ok posts={} duration_ms={}",
            posts.len(),
            started_at.elapsed().as_millis()
        );
        Ok(posts)
    }
}

impl PostRepository for FsPostRepository {
    fn get_post(&self, slug: &str, include_drafts: bool) -> CorpusResult<Option<Post>> {
        let posts = self.scan()?;
        Ok(posts
            .into_iter()
            .find(|post| post.slug == slug && (include_drafts || post.is_published())))
    }

    fn list_posts(&self, query: &PostListQuery) -> CorpusResult<Vec<Post>> {
        let posts = self.scan()?;
        let limit = normalize_post_limit(query.limit) as usize;
        let offset = query.offset as usize;

        Ok(posts
            .into_iter()
            .filter(|post| query.include_drafts || post.is_published())
            .filter(|post| match &query.tag {
                Some(tag) => post.meta.tags.iter().any(|candidate| candidate == tag),
                None => true,
            })
            .skip(offset)
            .take(limit)
            .collect())
    }

    fn list_tags(&self) -> CorpusResult<Vec<String>> {
        let posts = self.scan()?;
        let tags: BTreeSet<String> = posts
            .into_iter()
            .filter(Post::is_published)
            .flat_map(|post| post.meta.tags)
            .collect();
        Ok(tags.into_iter().collect())
    }
}

/// Loads and validates a single post file.
fn load_post_file(path: &Path) -> CorpusResult<Post> {
    let content = fs::read_to_string(path).map_err(|source| CorpusError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let (meta, body) = frontmatter::parse(&content).map_err(|source| CorpusError::FrontMatter {
        path: path.to_path_buf(),
        source,
    })?;

    let stem = path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or_default();
    let post = Post::new(slug_from_stem(stem), path.to_path_buf(), meta, body);
    post.validate()?;
    Ok(post)
}

/// Sorts posts newest-first with slug as the deterministic tiebreak.
pub(crate) fn sort_chronological(posts: &mut [Post]) {
    posts.sort_by(|a, b| {
        b.meta
            .date
            .cmp(&a.meta.date)
            .then_with(|| a.slug.cmp(&b.slug))
    });
}
