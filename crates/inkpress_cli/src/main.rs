//! Command-line interface for the site pipeline.
//!
//! # Responsibility
//! - Expose build/check/list entry points over `inkpress_core`.
//! - Map check findings and build failures to a non-zero exit code.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use inkpress_core::{
    build_site, default_log_level, init_logging, run_checks, FsPostRepository, SiteConfig,
    SiteService,
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "inkpress", version, about = "Static blog corpus pipeline")]
struct Cli {
    /// Site configuration file.
    #[arg(long, global = true, default_value = "inkpress.toml")]
    config: PathBuf,

    /// Absolute directory for rotating log files. Logging is off when unset.
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Build the publish directory from the content tree.
    Build {
        /// Include draft posts (preview builds only).
        #[arg(long)]
        drafts: bool,
    },
    /// Run corpus-integrity checks without writing output.
    Check,
    /// List published posts, newest first.
    List {
        /// Filter by a single tag.
        #[arg(long)]
        tag: Option<String>,
        /// Maximum number of posts to show.
        #[arg(long)]
        limit: Option<u32>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(log_dir) = &cli.log_dir {
        let log_dir = log_dir
            .to_str()
            .context("log dir must be valid UTF-8")?;
        init_logging(default_log_level(), log_dir)
            .map_err(|message| anyhow::anyhow!(message))
            .context("logging initialization failed")?;
    }

    let mut config = SiteConfig::load(&cli.config)
        .with_context(|| format!("loading config `{}`", cli.config.display()))?;

    match cli.command {
        Command::Build { drafts } => {
            if drafts {
                config.include_drafts = true;
            }
            let summary = build_site(&config).context("site build failed")?;
            println!(
                "built {} post(s), {} tag page(s), {} file(s) in {} ms ({} draft(s) skipped)",
                summary.posts_built,
                summary.tag_pages,
                summary.manifest.len(),
                summary.duration_ms,
                summary.drafts_skipped,
            );
        }
        Command::Check => {
            let repo = FsPostRepository::new(&config.content_dir);
            let posts = repo.scan().context("corpus scan failed")?;
            let report = run_checks(&posts, &config.images_dir);
            if !report.is_clean() {
                eprintln!("{report}");
                bail!("corpus checks failed");
            }
            println!("corpus checks passed ({} post(s))", posts.len());
        }
        Command::List { tag, limit } => {
            let service = SiteService::new(FsPostRepository::new(&config.content_dir));
            let listed = service.list_posts(tag, limit, 0)?;
            for post in &listed.items {
                println!(
                    "{}  {:<30}  {}",
                    post.meta.date,
                    post.slug,
                    post.meta.tags.join(", ")
                );
            }
            println!("{} post(s), limit {}", listed.items.len(), listed.applied_limit);
        }
    }

    Ok(())
}
