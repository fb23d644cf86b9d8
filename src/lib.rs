pub mod error;
pub mod html;
pub mod inline;
pub mod markdown;
pub mod options;
pub mod pages;
pub mod resolve;
pub mod scan;
pub mod transcode;

pub use error::{Error, Result};
pub use options::RenderOptions;
pub use pages::PageDir;
pub use resolve::PageIndex;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Render Moniwiki markup to HTML, checking internal links against `pages`.
pub fn render<S: AsRef<str>>(text: &str, pages: &[S]) -> String {
    render_with_options(text, &index_of(pages), &RenderOptions::default())
}

/// Like [`render`], with a prepared index and custom URL layout.
pub fn render_with_options(text: &str, index: &PageIndex, opts: &RenderOptions) -> String {
    html::render(text, index, opts)
}

/// Convert Moniwiki markup to Markdown. One-way; no page index is needed.
pub fn transcode(text: &str) -> String {
    transcode_with_options(text, &RenderOptions::default())
}

pub fn transcode_with_options(text: &str, opts: &RenderOptions) -> String {
    transcode::transcode(text, opts)
}

/// Render Markdown to HTML, turning links to missing pages into red links.
pub fn render_markdown<S: AsRef<str>>(text: &str, pages: &[S]) -> String {
    render_markdown_with_options(text, &index_of(pages), &RenderOptions::default())
}

pub fn render_markdown_with_options(
    text: &str,
    index: &PageIndex,
    opts: &RenderOptions,
) -> String {
    markdown::render(text, index, opts)
}

fn index_of<S: AsRef<str>>(pages: &[S]) -> PageIndex {
    PageIndex::from_names(pages.iter().map(|p| p.as_ref()))
}

/// Options controlling how converted pages are written on disk.
#[derive(Debug, Clone, Copy, Default)]
pub struct WriteOptions {
    /// Replace a Markdown page that already exists.
    pub overwrite: bool,
}

/// Counts from a [`migrate_dir`] run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MigrateSummary {
    pub converted: usize,
    pub skipped: usize,
}

/// Read a page from disk.
pub fn read_source(path: &Path) -> Result<String> {
    let bytes = fs::read(path)?;

    // pages are expected to be UTF-8; fall back to lossy conversion rather than refusing them.
    Ok(String::from_utf8(bytes)
        .unwrap_or_else(|e| String::from_utf8_lossy(&e.into_bytes()).into_owned()))
}

/// Transcode one legacy page into its Markdown sibling, e.g. `A.moniwiki` to
/// `A.md` in the same directory. Returns the path written.
pub fn transcode_file(path: &Path, opts: &RenderOptions, write_opts: &WriteOptions) -> Result<PathBuf> {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| Error::InvalidPageName(path.display().to_string()))?;
    if !opts.is_legacy(name) {
        return Err(Error::UnsupportedExtension(name.to_string()));
    }
    let target = opts.markdown_file(opts.strip_extension(name));

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let store = PageDir::new(dir, opts);

    let text = read_source(path)?;
    store.write(&target, &transcode_with_options(&text, opts), write_opts.overwrite)?;

    let written = dir.join(&target);
    tracing::info!(source = %path.display(), target = %written.display(), "transcoded page");
    Ok(written)
}

/// Bulk mode: transcode every legacy page in `dir` to a Markdown sibling.
///
/// Pages whose Markdown counterpart already exists are skipped unless
/// `write_opts.overwrite` is set.
pub fn migrate_dir(dir: &Path, opts: &RenderOptions, write_opts: &WriteOptions) -> Result<MigrateSummary> {
    let start_time = Instant::now();

    if !dir.is_dir() {
        return Err(Error::Io(io::Error::new(
            io::ErrorKind::NotFound,
            format!("page directory not found: {}", dir.display()),
        )));
    }

    let store = PageDir::new(dir, opts);
    let legacy: Vec<String> = store
        .list()?
        .into_iter()
        .filter(|name| opts.is_legacy(name))
        .collect();

    let total = legacy.len();
    let mut summary = MigrateSummary::default();

    for (i, name) in legacy.iter().enumerate() {
        let target = opts.markdown_file(opts.strip_extension(name));

        let elapsed = start_time.elapsed();
        let total_ms = elapsed.as_millis();
        let mins = total_ms / 60_000;
        let secs = (total_ms % 60_000) / 1_000;
        let ms = total_ms % 1_000;

        if !write_opts.overwrite && store.counterpart(name)?.is_some() {
            tracing::warn!(page = %name, "markdown page already exists, skipping");
            summary.skipped += 1;
            eprintln!(
                "[{:>4}/{:>4}] [{:02}:{:02}.{:03}] Skipped:   {:?}",
                i + 1,
                total,
                mins,
                secs,
                ms,
                dir.join(&target)
            );
            continue;
        }

        let text = store.read(name)?;
        store.write(&target, &transcode_with_options(&text, opts), write_opts.overwrite)?;
        summary.converted += 1;

        eprintln!(
            "[{:>4}/{:>4}] [{:02}:{:02}.{:03}] Converted: {:?}",
            i + 1,
            total,
            mins,
            secs,
            ms,
            dir.join(&target)
        );
    }

    let total_secs = start_time.elapsed().as_secs_f64();
    let avg_str = if summary.converted > 0 {
        format!("{:.3}s", total_secs / summary.converted as f64)
    } else {
        "-".to_string()
    };
    eprintln!(
        "Done. Converted {} pages in {:.3}s (avg {}/page), skipped {}.",
        summary.converted, total_secs, avg_str, summary.skipped
    );
    Ok(summary)
}
