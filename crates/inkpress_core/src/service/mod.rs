//! Use-case services over the corpus.
//!
//! # Responsibility
//! - Provide the stable entry points consumed by the CLI and build pipeline.
//! - Keep repositories storage-agnostic behind trait seams.

pub mod site_service;
