//! Core domain logic for Inkpress.
//! This crate is the single source of truth for corpus and build invariants.

pub mod build;
pub mod check;
pub mod config;
pub mod corpus;
pub mod frontmatter;
pub mod logging;
pub mod model;
pub mod render;
pub mod service;

pub use build::{build_site, BuildError, BuildSummary};
pub use check::{run_checks, CheckFinding, CheckReport};
pub use config::{ConfigError, SiteConfig};
pub use corpus::{CorpusError, CorpusResult, FsPostRepository, PostListQuery, PostRepository};
pub use frontmatter::{FrontMatterError, Syntax};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::post::{FrontMatter, Post, PostValidationError, Slug};
pub use service::site_service::{SiteService, SiteServiceError};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
