//! Site build pipeline.
//!
//! # Responsibility
//! - Drive scan, check, render and write into one deterministic pass.
//! - Produce the publish directory the hosting branch consumes.
//!
//! # Invariants
//! - Check findings abort the build before anything is written.
//! - Draft posts never reach the output tree on a published build.
//! - The output directory is reset first, so rebuilding unchanged content
//!   yields byte-identical results.

use crate::check::{self, run_checks, CheckReport};
use crate::config::SiteConfig;
use crate::corpus::{CorpusError, FsPostRepository};
use crate::model::post::Post;
use crate::render::page;
use log::{error, info};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;
use walkdir::WalkDir;

/// Marker file consumed by the hosting platform for custom domains.
const DOMAIN_MARKER_FILE: &str = "CNAME";

pub type BuildResult<T> = Result<T, BuildError>;

/// Pipeline error covering every stage of a build.
#[derive(Debug)]
pub enum BuildError {
    /// Corpus scan or parse failure.
    Corpus(CorpusError),
    /// Content checks reported findings.
    Checks(CheckReport),
    /// Output tree could not be written.
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl Display for BuildError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Corpus(err) => write!(f, "{err}"),
            Self::Checks(report) => write!(f, "{report}"),
            Self::Io { path, source } => {
                write!(f, "build io error at `{}`: {source}", path.display())
            }
        }
    }
}

impl Error for BuildError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Corpus(err) => Some(err),
            Self::Checks(report) => Some(report),
            Self::Io { source, .. } => Some(source),
        }
    }
}

impl From<CorpusError> for BuildError {
    fn from(value: CorpusError) -> Self {
        Self::Corpus(value)
    }
}

/// Result of a successful build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildSummary {
    /// Post pages written.
    pub posts_built: usize,
    /// Draft posts excluded from the output set.
    pub drafts_skipped: usize,
    /// Tag listing pages written.
    pub tag_pages: usize,
    /// Sorted output paths relative to the publish directory.
    pub manifest: Vec<String>,
    /// Wall-clock build duration in milliseconds.
    pub duration_ms: u128,
}

/// Builds the site into `config.output_dir`.
///
/// Stages: corpus scan, content checks, page rendering, asset copy, domain
/// marker. Any check finding aborts before the output directory is touched.
///
/// # Side effects
/// - Resets and rewrites the output directory.
/// - Emits `site_build` logging events with counts and duration.
pub fn build_site(config: &SiteConfig) -> BuildResult<BuildSummary> {
    let started_at = Instant::now();
    info!(
        "event=site_build module=build status=start content_dir={} output_dir={}",
        config.content_dir.display(),
        config.output_dir.display()
    );

    let repo = FsPostRepository::new(&config.content_dir);
    let posts = repo.scan()?;

    let report = run_checks(&posts, &config.images_dir);
    if !report.is_clean() {
        error!(
            "event=site_build module=build status=error error_code=check_findings findings={}",
            report.findings.len()
        );
        return Err(BuildError::Checks(report));
    }

    let published: Vec<Post> = posts
        .iter()
        .filter(|post| config.include_drafts || post.is_published())
        .cloned()
        .collect();
    let drafts_skipped = posts.len() - published.len();

    reset_output_dir(&config.output_dir)?;
    let mut manifest: Vec<String> = Vec::new();

    for post in &published {
        let page_html = page::post_page(post, config);
        let relative = format!("posts/{}/index.html", post.slug);
        write_output(&config.output_dir, &relative, page_html.as_bytes())?;
        manifest.push(relative);
    }

    let index_html = page::index_page(&published, config);
    write_output(&config.output_dir, "index.html", index_html.as_bytes())?;
    manifest.push("index.html".to_string());

    let by_tag = group_by_tag(&published);
    let tag_pages = by_tag.len();
    for (tag, tagged) in by_tag {
        let tag_html = page::tag_page(&tag, &tagged, config);
        let relative = format!("tags/{tag}/index.html");
        write_output(&config.output_dir, &relative, tag_html.as_bytes())?;
        manifest.push(relative);
    }

    copy_images(&config.images_dir, &config.output_dir, &mut manifest)?;

    if let Some(domain) = &config.custom_domain {
        write_output(
            &config.output_dir,
            DOMAIN_MARKER_FILE,
            format!("{}\n", domain.trim()).as_bytes(),
        )?;
        manifest.push(DOMAIN_MARKER_FILE.to_string());
    }

    manifest.sort();

    if !config.include_drafts {
        let leaks = check::draft_leaks(&posts, &manifest);
        if !leaks.is_empty() {
            error!(
                "event=site_build module=build status=error error_code=draft_leak findings={}",
                leaks.len()
            );
            return Err(BuildError::Checks(CheckReport { findings: leaks }));
        }
    }

    let summary = BuildSummary {
        posts_built: published.len(),
        drafts_skipped,
        tag_pages,
        manifest,
        duration_ms: started_at.elapsed().as_millis(),
    };
    info!(
        "event=site_build module=build status=ok posts={} drafts_skipped={} tag_pages={} files={} duration_ms={}",
        summary.posts_built,
        summary.drafts_skipped,
        summary.tag_pages,
        summary.manifest.len(),
        summary.duration_ms
    );
    Ok(summary)
}

fn group_by_tag(posts: &[Post]) -> BTreeMap<String, Vec<Post>> {
    let mut by_tag: BTreeMap<String, Vec<Post>> = BTreeMap::new();
    for post in posts {
        for tag in &post.meta.tags {
            by_tag.entry(tag.clone()).or_default().push(post.clone());
        }
    }
    by_tag
}

fn reset_output_dir(output_dir: &Path) -> BuildResult<()> {
    if output_dir.exists() {
        fs::remove_dir_all(output_dir).map_err(|source| BuildError::Io {
            path: output_dir.to_path_buf(),
            source,
        })?;
    }
    fs::create_dir_all(output_dir).map_err(|source| BuildError::Io {
        path: output_dir.to_path_buf(),
        source,
    })
}

fn write_output(output_dir: &Path, relative: &str, contents: &[u8]) -> BuildResult<()> {
    let target = output_dir.join(relative);
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent).map_err(|source| BuildError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    fs::write(&target, contents).map_err(|source| BuildError::Io {
        path: target,
        source,
    })
}

/// Copies the images directory into `output/images`, recording each file in
/// the manifest. A missing images directory is fine for text-only corpora.
fn copy_images(
    images_dir: &Path,
    output_dir: &Path,
    manifest: &mut Vec<String>,
) -> BuildResult<()> {
    if !images_dir.is_dir() {
        return Ok(());
    }
    for entry in WalkDir::new(images_dir).sort_by_file_name() {
        let entry = entry.map_err(|err| {
            let path = err
                .path()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| images_dir.to_path_buf());
            let source = err
                .into_io_error()
                .unwrap_or_else(|| std::io::Error::other("walk error"));
            BuildError::Io { path, source }
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        let relative_asset = entry
            .path()
            .strip_prefix(images_dir)
            .unwrap_or(entry.path());
        let relative = format!("images/{}", relative_asset.display());
        let contents = fs::read(entry.path()).map_err(|source| BuildError::Io {
            path: entry.path().to_path_buf(),
            source,
        })?;
        write_output(output_dir, &relative, &contents)?;
        manifest.push(relative);
    }
    Ok(())
}
