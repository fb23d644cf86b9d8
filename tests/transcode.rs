use moniwiki::{RenderOptions, transcode, transcode_with_options};
use pretty_assertions::assert_eq;

#[test]
fn code_fence_and_bold() {
    assert_eq!(
        transcode("{{{\ncode line\n}}}\n'''bold'''"),
        "```\ncode line\n```\n**bold**\n"
    );
}

#[test]
fn full_page() {
    let src = "#format wiki\n= Moving Day =\n''Note:'' see [\"Old Home\"] and --> [Next]\n----\n * first\n * second\n1. one\nb. two\n> quoted [http://x.org X]\n{{{#!sh\nls -la\n}}}";
    let want = "```\n#format wiki\n```\n\
                # Moving Day\n\
                *Note:* see [Old Home](</pages/Old Home.moniwiki>) and [Next](/pages/Next.moniwiki)\n\
                ---\n\
                * first\n\
                * second\n\
                1. one\n\
                b. two\n\
                > quoted [X](http://x.org)\n\
                ```sh\nls -la\n```\n";
    assert_eq!(transcode(src), want);
}

#[test]
fn unterminated_fence_is_closed() {
    assert_eq!(transcode("{{{\nx"), "```\nx\n```\n");
}

#[test]
fn macro_becomes_page_reference() {
    assert_eq!(
        transcode("[[RecentChanges]]"),
        "[RecentChanges](/pages/RecentChanges.moniwiki)\n"
    );
}

#[test]
fn emphasis_inside_link_label() {
    assert_eq!(
        transcode("[[http://a.b|''A'' site]]"),
        "[*A* site](http://a.b)\n"
    );
}

#[test]
fn options_change_destination() {
    let opts = RenderOptions::from_yaml("pages_prefix: /w/\nlegacy_extension: mw\n").unwrap();
    assert_eq!(
        transcode_with_options("[[Page]] [[Other.mw]]", &opts),
        "[Page](/w/Page.mw) [Other.mw](/w/Other.mw)\n"
    );
}

#[test]
fn transcoding_is_deterministic() {
    let src = "* [A]\n'''b''' --c--";
    assert_eq!(transcode(src), transcode(src));
}

#[test]
fn markdown_links_already_in_the_page_survive() {
    assert_eq!(
        transcode("see [docs](http://x.org/d) here"),
        "see [docs](http://x.org/d) here\n"
    );
    assert_eq!(
        transcode("* [Guide] (guide.md) and [Old Page]"),
        "* [Guide] (guide.md) and [Old Page](</pages/Old Page.moniwiki>)\n"
    );
}

#[test]
fn unbalanced_parenthesis_stays_inside_the_destination() {
    assert_eq!(transcode("[a)b]"), "[a)b](</pages/a)b.moniwiki>)\n");
}
