//! Corpus-integrity checks.
//!
//! # Responsibility
//! - Enforce content invariants before a build may publish.
//! - Report findings with enough detail to fix the offending document.
//!
//! # Invariants
//! - A clean report is the only state that allows publishing.
//! - Checks never mutate the corpus; they only observe it.

use crate::model::post::{Post, Slug};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;

pub mod images;
pub mod math;

/// One violation of a corpus invariant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckFinding {
    /// Slug of the offending post.
    pub slug: Slug,
    /// Stable machine-readable finding code.
    pub code: &'static str,
    /// Human-readable description of the violation.
    pub detail: String,
}

impl Display for CheckFinding {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}: {}", self.code, self.slug, self.detail)
    }
}

/// Aggregated result of a check run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckReport {
    /// All findings, ordered by post then by check.
    pub findings: Vec<CheckFinding>,
}

impl CheckReport {
    /// Returns whether the corpus passed every check.
    pub fn is_clean(&self) -> bool {
        self.findings.is_empty()
    }

    fn push(&mut self, slug: &str, code: &'static str, detail: impl Into<String>) {
        self.findings.push(CheckFinding {
            slug: slug.to_string(),
            code,
            detail: detail.into(),
        });
    }
}

impl Display for CheckReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.is_clean() {
            return write!(f, "corpus checks passed");
        }
        writeln!(f, "{} corpus check finding(s):", self.findings.len())?;
        for finding in &self.findings {
            writeln!(f, "  {finding}")?;
        }
        Ok(())
    }
}

impl Error for CheckReport {}

/// Runs every content check over the given posts.
///
/// `images_dir` is the directory image references must resolve under.
/// Draft posts are checked too: a draft promoted later must already be clean.
pub fn run_checks(posts: &[Post], images_dir: &Path) -> CheckReport {
    let mut report = CheckReport::default();

    for post in posts {
        if post.meta.math {
            if let Some(detail) = math::unbalanced_delimiters(&post.body) {
                report.push(&post.slug, "math_unbalanced", detail);
            }
        }
        for missing in images::missing_references(post, images_dir) {
            report.push(&post.slug, "image_missing", missing);
        }
    }

    report
}

/// Audits a build manifest for draft leakage.
///
/// Every draft slug whose page appears in the manifest is a finding. Used by
/// the pipeline after rendering and by post-publish audits.
pub fn draft_leaks(posts: &[Post], manifest: &[String]) -> Vec<CheckFinding> {
    posts
        .iter()
        .filter(|post| !post.is_published())
        .filter_map(|post| {
            let page = format!("posts/{}/index.html", post.slug);
            manifest.contains(&page).then(|| CheckFinding {
                slug: post.slug.clone(),
                code: "draft_published",
                detail: format!("draft page `{page}` present in output manifest"),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::draft_leaks;
    use crate::model::post::{FrontMatter, Post};
    use chrono::NaiveDate;
    use std::path::PathBuf;

    fn post(slug: &str, draft: bool) -> Post {
        Post::new(
            slug,
            PathBuf::from(format!("{slug}.md")),
            FrontMatter {
                title: slug.to_string(),
                date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                draft,
                toc: false,
                math: false,
                images: Vec::new(),
                tags: Vec::new(),
            },
            "body",
        )
    }

    #[test]
    fn draft_in_manifest_is_reported() {
        let posts = vec![post("live", false), post("wip", true)];
        let manifest = vec![
            "posts/live/index.html".to_string(),
            "posts/wip/index.html".to_string(),
        ];
        let leaks = draft_leaks(&posts, &manifest);
        assert_eq!(leaks.len(), 1);
        assert_eq!(leaks[0].slug, "wip");
    }

    #[test]
    fn clean_manifest_has_no_leaks() {
        let posts = vec![post("live", false), post("wip", true)];
        let manifest = vec!["posts/live/index.html".to_string()];
        assert!(draft_leaks(&posts, &manifest).is_empty());
    }
}
