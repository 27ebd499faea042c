use inkpress_core::{run_checks, FsPostRepository};
use std::fs;
use std::path::Path;

fn write_file(dir: &Path, name: &str, contents: &str) {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, contents).unwrap();
}

#[test]
fn clean_corpus_produces_clean_report() {
    let root = tempfile::tempdir().unwrap();
    let content = root.path().join("content");
    let images = root.path().join("static/images");
    fs::create_dir_all(&images).unwrap();
    fs::write(images.join("plot.png"), b"png").unwrap();

    write_file(
        &content,
        "derivation.md",
        "---\ntitle: Derivation\ndate: 2024-04-01\nmath: true\n---\n\
         Result: $a^2 + b^2 = c^2$\n\n$$\nE = mc^2\n$$\n\n![plot](images/plot.png)\n",
    );

    let posts = FsPostRepository::new(&content).scan().unwrap();
    let report = run_checks(&posts, &images);
    assert!(report.is_clean(), "unexpected findings: {report}");
}

#[test]
fn unbalanced_math_is_reported_only_for_math_posts() {
    let root = tempfile::tempdir().unwrap();
    let content = root.path().join("content");
    let images = root.path().join("static/images");

    write_file(
        &content,
        "broken-math.md",
        "---\ntitle: Broken\ndate: 2024-04-01\nmath: true\n---\nOnly one $delimiter here\n",
    );
    write_file(
        &content,
        "plain-prose.md",
        "---\ntitle: Plain\ndate: 2024-04-02\n---\nA $5 coffee needs no math mode.\n",
    );

    let posts = FsPostRepository::new(&content).scan().unwrap();
    let report = run_checks(&posts, &images);
    assert_eq!(report.findings.len(), 1);
    assert_eq!(report.findings[0].slug, "broken-math");
    assert_eq!(report.findings[0].code, "math_unbalanced");
}

#[test]
fn dangling_image_references_are_reported() {
    let root = tempfile::tempdir().unwrap();
    let content = root.path().join("content");
    let images = root.path().join("static/images");
    fs::create_dir_all(&images).unwrap();
    fs::write(images.join("real.png"), b"png").unwrap();

    write_file(
        &content,
        "gallery.md",
        "---\ntitle: Gallery\ndate: 2024-04-01\nimages:\n  - images/real.png\n---\n\
         ![ok](/images/real.png)\n![missing](images/ghost.png)\n\
         ![remote](https://cdn.example.com/far.png)\n",
    );

    let posts = FsPostRepository::new(&content).scan().unwrap();
    let report = run_checks(&posts, &images);
    assert_eq!(report.findings.len(), 1);
    assert_eq!(report.findings[0].code, "image_missing");
    assert!(report.findings[0].detail.contains("ghost.png"));
}

#[test]
fn drafts_are_checked_too() {
    let root = tempfile::tempdir().unwrap();
    let content = root.path().join("content");
    let images = root.path().join("static/images");

    write_file(
        &content,
        "future-post.md",
        "---\ntitle: Future\ndate: 2024-04-01\ndraft: true\nmath: true\n---\n$$ unclosed\n",
    );

    let posts = FsPostRepository::new(&content).scan().unwrap();
    let report = run_checks(&posts, &images);
    assert_eq!(report.findings.len(), 1);
    assert_eq!(report.findings[0].slug, "future-post");
}
