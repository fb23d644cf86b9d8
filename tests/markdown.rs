use moniwiki::{render_markdown, transcode};
use pretty_assertions::assert_eq;

#[test]
fn links_by_existence() {
    let html = render_markdown(
        "[a](A.md) [b](B) [c](C.md) [d](https://d.io) [e](/abs) [f](#frag)",
        &["A.md", "B.moniwiki"],
    );
    assert_eq!(
        html,
        "<p><a href=\"/pages/A.md\">a</a> \
         <a href=\"/pages/B.moniwiki\" class=\"moniwiki-link\">b</a> \
         <a href=\"/search?q=C\" class=\"red-link\">c</a> \
         <a href=\"https://d.io\" target=\"_blank\" rel=\"noopener noreferrer\">d</a> \
         <a href=\"/abs\">e</a> \
         <a href=\"#frag\">f</a></p>\n"
    );
}

#[test]
fn mailto_and_ftp_are_external() {
    let html = render_markdown("[m](mailto:a@b.c) [f](ftp://f.tp/x)", &[] as &[&str]);
    assert_eq!(
        html,
        "<p><a href=\"mailto:a@b.c\" target=\"_blank\" rel=\"noopener noreferrer\">m</a> \
         <a href=\"ftp://f.tp/x\" target=\"_blank\" rel=\"noopener noreferrer\">f</a></p>\n"
    );
}

#[test]
fn link_inside_strong_and_list() {
    let html = render_markdown("* **[x](X.md)**", &["X.md"]);
    assert_eq!(
        html,
        "<ul>\n<li><strong><a href=\"/pages/X.md\">x</a></strong></li>\n</ul>\n"
    );
}

#[test]
fn strikethrough_and_tables_enabled() {
    let html = render_markdown("~~gone~~", &[] as &[&str]);
    assert_eq!(html, "<p><del>gone</del></p>\n");

    let table = render_markdown("| a |\n|---|\n| b |\n", &[] as &[&str]);
    assert!(table.contains("<table>"), "{table}");
}

#[test]
fn transcoded_page_links_resolve() {
    let md = transcode("[[Home]] and [\"Old Page\"]");
    let html = render_markdown(&md, &["Home.moniwiki"]);
    // transcoded links are absolute, so they pass through untouched.
    assert_eq!(
        html,
        "<p><a href=\"/pages/Home.moniwiki\">Home</a> and <a href=\"/pages/Old%20Page.moniwiki\">Old Page</a></p>\n"
    );
}
