//! Domain model for corpus documents.
//!
//! # Responsibility
//! - Define the canonical post record shared by corpus, checks and build.
//! - Keep a single metadata shape for both front-matter syntaxes.
//!
//! # Invariants
//! - Every post is identified by a stable `Slug` derived from its file stem.
//! - Posts are immutable once loaded; any change is a content edit on disk.

pub mod post;
