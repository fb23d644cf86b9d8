//! Moniwiki to HTML.

use crate::inline::{Accumulator, Link, LinkWriter, Piece, emphasis, rewrite_links};
use crate::options::RenderOptions;
use crate::resolve::{self, LinkStyle, PageIndex};
use crate::scan::{self, BlockEvent, ListKind};

/// Renders links against a page index.
pub struct HtmlLinks<'a> {
    pub index: &'a PageIndex,
    pub opts: &'a RenderOptions,
}

impl HtmlLinks<'_> {
    fn page(&self, name: &str, style: LinkStyle, out: &mut Vec<Piece>) {
        let target = resolve::resolve(name, style, self.index, self.opts);
        out.push(Piece::Markup(target.open_tag(self.opts)));
        out.push(Piece::label(name));
        out.push(Piece::markup("</a>"));
    }
}

impl LinkWriter for HtmlLinks<'_> {
    fn write(&self, link: Link<'_>, out: &mut Vec<Piece>) {
        match link {
            Link::Arrow { name } => {
                out.push(Piece::markup("--> <span>"));
                self.page(name, LinkStyle::Legacy, out);
                out.push(Piece::markup("</span>"));
            }
            Link::Legacy { name } => self.page(name, LinkStyle::Legacy, out),
            Link::Page { name } => self.page(name, LinkStyle::Generic, out),
            Link::Macro { name } => {
                // an existing page wins over the macro reading.
                let target = resolve::resolve(name, LinkStyle::Generic, self.index, self.opts);
                if target.exists() {
                    self.page(name, LinkStyle::Generic, out);
                } else {
                    out.push(Piece::Markup(format!("{{{{{name}}}}}")));
                }
            }
            Link::External { url, label } => {
                out.push(Piece::Markup(resolve::external_open_tag(url, self.opts)));
                out.push(Piece::label(label));
                out.push(Piece::markup("</a>"));
            }
            Link::Url { url } => {
                out.push(Piece::Markup(resolve::external_open_tag(url, self.opts)));
                out.push(Piece::markup(url));
                out.push(Piece::markup("</a>"));
            }
        }
    }
}

fn list_tag(kind: ListKind) -> &'static str {
    match kind {
        ListKind::Unordered => "ul",
        ListKind::Ordered => "ol",
    }
}

/// Render a Moniwiki document to HTML.
pub fn render(text: &str, index: &PageIndex, opts: &RenderOptions) -> String {
    let links = HtmlLinks { index, opts };
    let mut acc = Accumulator::new();

    for event in scan::scan(text) {
        match event {
            BlockEvent::CodeStart { lang: Some(lang) } => acc.push_str(&format!(
                "<pre><code class=\"language-{}\">",
                html_escape::encode_double_quoted_attribute(lang)
            )),
            BlockEvent::CodeStart { lang: None } => acc.push_str("<pre><code>"),
            BlockEvent::CodeLine(line) => {
                acc.push_str(line);
                acc.push_str("\n");
            }
            BlockEvent::CodeEnd { .. } => acc.push_str("</code></pre>\n"),
            BlockEvent::Heading { level, content } => {
                acc.push_str(&format!("<h{level}>"));
                acc.push_run(rewrite_links(content, &links));
                acc.push_str(&format!("</h{level}>\n"));
            }
            BlockEvent::Rule => acc.push_str("<hr>\n"),
            BlockEvent::Meta(line) => acc.push_str(&format!("<pre><code>{line}</code></pre>\n")),
            BlockEvent::Quote(rest) => {
                acc.push_str("<blockquote>");
                acc.push_run(rewrite_links(rest, &links));
                acc.push_str("</blockquote>\n");
            }
            BlockEvent::ListStart(kind) => acc.push_str(&format!("<{}>\n", list_tag(kind))),
            BlockEvent::ListItem(item) => {
                acc.push_str(&"  ".repeat(item.depth));
                acc.push_str("<li>");
                acc.push_run(rewrite_links(item.content, &links));
                acc.push_str("</li>\n");
            }
            BlockEvent::ListEnd(kind) => acc.push_str(&format!("</{}>\n", list_tag(kind))),
            BlockEvent::Text(line) => {
                acc.push_run(rewrite_links(line, &links));
                acc.push_str("<br>\n");
            }
        }
    }

    let html = acc.finish(&emphasis::HTML);
    tracing::debug!(
        input = text.len(),
        output = html.len(),
        pages = index.len(),
        "rendered moniwiki to html"
    );
    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn html(text: &str, pages: &[&str]) -> String {
        render(text, &PageIndex::from_names(pages.iter().copied()), &RenderOptions::default())
    }

    #[test]
    fn arrow_link_keeps_the_arrow() {
        assert_eq!(
            html("--> [Next Page]", &["Next Page.moniwiki"]),
            "--> <span><a href=\"/pages/Next%20Page.moniwiki\" class=\"moniwiki-link\">Next Page</a></span><br>\n"
        );
    }

    #[test]
    fn unknown_macro_becomes_placeholder() {
        assert_eq!(html("[[TableOfContents]]", &[]), "{{TableOfContents}}<br>\n");
    }

    #[test]
    fn macro_name_of_existing_page_links() {
        assert_eq!(
            html("[[Home]]", &["Home.moniwiki"]),
            "<a href=\"/pages/Home.moniwiki\" class=\"moniwiki-link\">Home</a><br>\n"
        );
    }

    #[test]
    fn missing_page_is_a_red_link() {
        assert_eq!(
            html("[[No Such Page]]", &[]),
            "<a href=\"/search?q=No%20Such%20Page\" class=\"red-link\">No Such Page</a><br>\n"
        );
    }

    #[test]
    fn code_block_with_language_hint() {
        assert_eq!(
            html("{{{#!python\nprint('''x''')\n}}}", &[]),
            "<pre><code class=\"language-python\">print('''x''')\n</code></pre>\n"
        );
    }

    #[test]
    fn unterminated_code_block_is_closed_at_end() {
        assert_eq!(html("{{{\na", &[]), "<pre><code>a\n</code></pre>\n");
    }

    #[test]
    fn list_depth_indents_items() {
        assert_eq!(
            html("1. one\n    2. two", &[]),
            "<ol>\n<li>one</li>\n    <li>two</li>\n</ol>\n"
        );
    }

    #[test]
    fn meta_and_quote() {
        assert_eq!(
            html("#acl All:read\n> quoted ''text''", &[]),
            "<pre><code>#acl All:read</code></pre>\n<blockquote>quoted <em>text</em></blockquote>\n"
        );
    }

    #[test]
    fn external_link_label_is_emphasized() {
        assert_eq!(
            html("[http://a.com ''Site'']", &[]),
            "<a href=\"http://a.com\" target=\"_blank\" rel=\"noopener noreferrer\"><em>Site</em></a><br>\n"
        );
    }

    #[test]
    fn autolinked_url_is_not_struck() {
        assert_eq!(
            html("http://x.io/a--b--c", &[]),
            "<a href=\"http://x.io/a--b--c\" target=\"_blank\" rel=\"noopener noreferrer\">http://x.io/a--b--c</a><br>\n"
        );
    }
}
