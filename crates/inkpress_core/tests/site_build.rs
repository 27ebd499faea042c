use inkpress_core::{build_site, BuildError, SiteConfig};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn write_file(path: PathBuf, contents: &[u8]) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, contents).unwrap();
}

fn fixture_site() -> (TempDir, SiteConfig) {
    let root = tempfile::tempdir().unwrap();
    let content = root.path().join("content");
    let images = root.path().join("static/images");

    write_file(
        content.join("order-book-benchmark.md"),
        b"---\ntitle: Order Book Benchmark\ndate: 2024-05-20\ntags: [rust, perf]\n---\n\
          # Setup\n\nNumbers below.\n\n![chart](images/latency.png)\n",
    );
    write_file(
        content.join("hurdle-rates.md"),
        b"+++\ntitle = \"Hurdle Rates\"\ndate = 2024-04-11\nmath = true\ntoc = true\ntags = [\"stats\"]\n+++\n\
          ## Model\n\nWe need $r > h$ and\n\n$$\n\\rho = \\frac{cov(x,y)}{\\sigma_x \\sigma_y}\n$$\n",
    );
    write_file(
        content.join("heap-deltas.md"),
        b"---\ntitle: Heap Deltas\ndate: 2024-06-30\ndraft: true\ntags: [python]\n---\nStill writing this one.\n",
    );
    write_file(images.join("latency.png"), b"fake png bytes");

    let config = SiteConfig {
        title: "Field Notes".to_string(),
        base_url: "https://notes.example.dev".to_string(),
        custom_domain: Some("notes.example.dev".to_string()),
        content_dir: content,
        output_dir: root.path().join("public"),
        images_dir: images,
        minify: false,
        include_drafts: false,
    };
    (root, config)
}

fn snapshot_output(output_dir: &Path) -> BTreeMap<String, Vec<u8>> {
    let mut snapshot = BTreeMap::new();
    for entry in walkdir_files(output_dir) {
        let relative = entry
            .strip_prefix(output_dir)
            .unwrap()
            .to_string_lossy()
            .into_owned();
        snapshot.insert(relative, fs::read(&entry).unwrap());
    }
    snapshot
}

fn walkdir_files(dir: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    let mut pending = vec![dir.to_path_buf()];
    while let Some(current) = pending.pop() {
        for entry in fs::read_dir(&current).unwrap() {
            let path = entry.unwrap().path();
            if path.is_dir() {
                pending.push(path);
            } else {
                files.push(path);
            }
        }
    }
    files.sort();
    files
}

#[test]
fn build_writes_pages_marker_and_assets() {
    let (_root, config) = fixture_site();
    let summary = build_site(&config).unwrap();

    assert_eq!(summary.posts_built, 2);
    assert_eq!(summary.drafts_skipped, 1);
    assert!(!summary.manifest.is_empty());

    let marker = fs::read_to_string(config.output_dir.join("CNAME")).unwrap();
    assert_eq!(marker, "notes.example.dev\n");

    assert!(config
        .output_dir
        .join("posts/order-book-benchmark/index.html")
        .is_file());
    assert!(config.output_dir.join("images/latency.png").is_file());
    assert!(config.output_dir.join("tags/rust/index.html").is_file());

    let index = fs::read_to_string(config.output_dir.join("index.html")).unwrap();
    assert!(index.contains("Order Book Benchmark"));
    assert!(index.contains("Hurdle Rates"));
}

#[test]
fn drafts_never_reach_the_output_tree() {
    let (_root, config) = fixture_site();
    let summary = build_site(&config).unwrap();

    assert!(!config.output_dir.join("posts/heap-deltas").exists());
    assert!(summary
        .manifest
        .iter()
        .all(|path| !path.contains("heap-deltas")));

    let index = fs::read_to_string(config.output_dir.join("index.html")).unwrap();
    assert!(!index.contains("Heap Deltas"));
}

#[test]
fn preview_build_includes_drafts() {
    let (_root, mut config) = fixture_site();
    config.include_drafts = true;
    let summary = build_site(&config).unwrap();

    assert_eq!(summary.posts_built, 3);
    assert_eq!(summary.drafts_skipped, 0);
    assert!(config.output_dir.join("posts/heap-deltas/index.html").is_file());
}

#[test]
fn math_and_toc_features_surface_in_rendered_pages() {
    let (_root, config) = fixture_site();
    build_site(&config).unwrap();

    let math_page =
        fs::read_to_string(config.output_dir.join("posts/hurdle-rates/index.html")).unwrap();
    assert!(math_page.contains("katex"));
    assert!(math_page.contains("class=\"toc\""));

    let plain_page = fs::read_to_string(
        config
            .output_dir
            .join("posts/order-book-benchmark/index.html"),
    )
    .unwrap();
    assert!(!plain_page.contains("katex"));
}

#[test]
fn rebuilding_unchanged_content_is_byte_identical() {
    let (_root, config) = fixture_site();

    let first = build_site(&config).unwrap();
    let first_snapshot = snapshot_output(&config.output_dir);

    let second = build_site(&config).unwrap();
    let second_snapshot = snapshot_output(&config.output_dir);

    assert_eq!(first.manifest, second.manifest);
    assert_eq!(first_snapshot, second_snapshot);
}

#[test]
fn check_findings_abort_before_any_output_is_written() {
    let (root, config) = fixture_site();
    write_file(
        root.path().join("content/bad-gallery.md"),
        b"---\ntitle: Bad Gallery\ndate: 2024-07-01\n---\n![gone](images/nope.png)\n",
    );

    let err = build_site(&config).expect_err("dangling image must abort");
    match err {
        BuildError::Checks(report) => {
            assert!(report.findings.iter().any(|f| f.code == "image_missing"));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(!config.output_dir.exists());
}

#[test]
fn minified_build_collapses_inter_tag_whitespace() {
    let (_root, mut config) = fixture_site();
    config.minify = true;
    build_site(&config).unwrap();

    let index = fs::read_to_string(config.output_dir.join("index.html")).unwrap();
    assert!(!index.contains(">\n<"));
}

#[test]
fn config_load_resolves_paths_against_config_location() {
    let (root, _config) = fixture_site();
    let config_path = root.path().join("inkpress.toml");
    fs::write(
        &config_path,
        "title = \"Field Notes\"\nbase_url = \"https://notes.example.dev/\"\n\
         custom_domain = \"notes.example.dev\"\n",
    )
    .unwrap();

    let loaded = SiteConfig::load(&config_path).unwrap();
    assert_eq!(loaded.base_url, "https://notes.example.dev");
    assert_eq!(loaded.content_dir, root.path().join("content"));
    assert_eq!(loaded.output_dir, root.path().join("public"));

    let summary = build_site(&loaded).unwrap();
    assert_eq!(summary.posts_built, 2);
}
