//! Image reference existence check.
//!
//! # Responsibility
//! - Resolve every local image reference against the images directory.
//! - Report references whose target asset does not exist.
//!
//! # Invariants
//! - Absolute URLs (`http://`, `https://`, `//`, `data:`) are never checked.
//! - Front-matter `images` entries follow the same resolution rules as
//!   inline references.

use crate::model::post::Post;
use crate::service::site_service::MARKDOWN_IMAGE_RE;
use std::path::Path;

const IMAGES_PREFIX: &str = "images/";

/// Returns one description per dangling image reference in the post.
pub fn missing_references(post: &Post, images_dir: &Path) -> Vec<String> {
    let mut missing = Vec::new();

    for caps in MARKDOWN_IMAGE_RE.captures_iter(&post.body) {
        if let Some(reference) = caps.get(1) {
            check_reference(reference.as_str(), images_dir, &mut missing);
        }
    }
    for reference in &post.meta.images {
        check_reference(reference, images_dir, &mut missing);
    }

    missing
}

fn check_reference(reference: &str, images_dir: &Path, missing: &mut Vec<String>) {
    let Some(relative) = local_asset_path(reference) else {
        return;
    };
    if !images_dir.join(relative).is_file() {
        missing.push(format!(
            "image reference `{reference}` not found under `{}`",
            images_dir.display()
        ));
    }
}

/// Maps a reference to its path relative to the images directory.
///
/// Returns `None` for remote or embedded references that are out of scope.
fn local_asset_path(reference: &str) -> Option<&str> {
    let trimmed = reference.trim();
    if trimmed.is_empty()
        || trimmed.starts_with("http://")
        || trimmed.starts_with("https://")
        || trimmed.starts_with("//")
        || trimmed.starts_with("data:")
    {
        return None;
    }
    let without_root = trimmed.strip_prefix('/').unwrap_or(trimmed);
    Some(without_root.strip_prefix(IMAGES_PREFIX).unwrap_or(without_root))
}
