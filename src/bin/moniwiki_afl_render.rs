//! AFL++ fuzz target for `moniwiki`.
//!
//! This binary is intentionally stdin-driven, so it can be used with AFL++.
//! Build and run it via `cargo-afl`:
//!
//! ```bash
//! cargo install cargo-afl
//!
//! cargo afl build --release --features afl_fuzz --bin moniwiki_afl_render
//!
//! mkdir -p fuzz/afl/out
//!
//! cargo afl fuzz \
//!   -i fuzz/afl/in \
//!   -o fuzz/afl/out \
//!   target/release/moniwiki_afl_render
//! ```
//!
//! Rust panics normally unwind and exit with a non-crashing status code.
//! AFL++ only treats crashes as signals/aborts. We therefore catch any unwind
//! and turn it into `abort()`.

use std::io::Read;

use moniwiki::{PageIndex, RenderOptions};

const MAX_INPUT_LEN: usize = 1_000_000; // 1MB guardrail; AFL++ will typically cap this anyway.

/// Block tags the writer opens and must always close.
const BLOCK_TAGS: [&str; 3] = ["ul", "ol", "pre"];

fn check_balanced(html: &str) {
    for tag in BLOCK_TAGS {
        let open = html.matches(&format!("<{tag}>")).count();
        let close = html.matches(&format!("</{tag}>")).count();
        assert!(
            open <= close,
            "unbalanced <{tag}>: {open} opened, {close} closed"
        );
    }
}

fn run_one_input(data: &[u8]) {
    if data.len() > MAX_INPUT_LEN {
        // guardrail: avoid pathological OOM / quadratic behavior on enormous inputs.
        return;
    }

    // pages should be UTF-8, but AFL++ will happily hand us arbitrary bytes.
    // lossy conversion keeps the harness total (no early returns that reduce coverage).
    let src = String::from_utf8_lossy(data).to_string();

    // use the first line as a page name so both link outcomes get exercised.
    let first = src.lines().next().unwrap_or_default();
    let index = PageIndex::from_names([format!("{first}.md"), format!("{first}.moniwiki")]);
    let opts = RenderOptions::default();

    // invariants that must hold for any input (valid or invalid):
    // - rendering never panics
    // - every opened block element is closed
    // - the same input always renders the same bytes
    let html = moniwiki::render_with_options(&src, &index, &opts);
    // text passes through unescaped, so tag counts only mean something for tag-free input.
    if !src.contains('<') {
        check_balanced(&html);
    }
    assert_eq!(html, moniwiki::render_with_options(&src, &index, &opts));

    let md = moniwiki::transcode(&src);
    if !src.contains('`') {
        assert_eq!(
            md.matches("```").count() % 2,
            0,
            "unterminated fence in transcoder output"
        );
    }

    let _html = moniwiki::render_markdown_with_options(&md, &index, &opts);
}

fn main() {
    let mut data = Vec::new();
    std::io::stdin().read_to_end(&mut data).unwrap();

    // convert any panic into an abort().
    if std::panic::catch_unwind(|| run_one_input(&data)).is_err() {
        std::process::abort();
    }
}
