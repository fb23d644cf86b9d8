use std::fs;
use std::path::PathBuf;

use moniwiki::{render, render_markdown, transcode};
use pretty_assertions::assert_eq;

fn base_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("testdata")
}

fn read(name: &str) -> String {
    let path = base_dir().join(name);
    let bytes = fs::read(&path).unwrap_or_else(|e| panic!("failed to read {}: {e}", path.display()));
    String::from_utf8_lossy(&bytes).into_owned()
}

/// Compare against `<prefix>-want-<name>`; on mismatch leave the actual output
/// in `<prefix>-out-<name>` for diffing, otherwise clean it up.
fn check(prefix: &str, name: &str, actual: &str) {
    let want = read(&format!("{prefix}-want-{name}"));

    let out_path = base_dir().join(format!("{prefix}-out-{name}"));
    if actual != want {
        fs::write(&out_path, actual)
            .unwrap_or_else(|e| panic!("failed to write {}: {e}", out_path.display()));
    } else if out_path.exists() {
        fs::remove_file(&out_path)
            .unwrap_or_else(|e| panic!("failed to remove {}: {e}", out_path.display()));
    }

    assert_eq!(actual, want);
}

#[test]
fn test_basic_page_to_html() {
    let src = read("001-in-basic.moniwiki");
    check("001", "basic.html", &render(&src, &["SomePage.md"]));
}

#[test]
fn test_moving_day_to_markdown() {
    let src = read("002-in-moving-day.moniwiki");
    check("002", "moving-day.md", &transcode(&src));
}

#[test]
fn test_markdown_notes_to_html() {
    let src = read("003-in-notes.md");
    check("003", "notes.html", &render_markdown(&src, &["Setup.md"]));
}

#[test]
fn test_transcoded_page_links_pass_through_markdown() {
    // migrated links are absolute, so the Markdown path leaves them as written.
    let md = transcode(&read("002-in-moving-day.moniwiki"));
    let html = render_markdown(&md, &["Next.moniwiki"]);
    assert!(
        html.contains("<a href=\"/pages/Next.moniwiki\">Next</a>"),
        "{html}"
    );
}
