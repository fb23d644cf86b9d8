//! One-way Moniwiki to Markdown conversion.
//!
//! Uses the same block scan and link rules as the HTML writer. No page index
//! is consulted: every internal link is assumed to point at an existing
//! legacy page.

use crate::inline::{
    Accumulator, Link, LinkWriter, MARKDOWN_RULES, Piece, Rule, emphasis, rewrite_links,
};
use crate::options::RenderOptions;
use crate::scan::{self, BlockEvent, ListKind};

pub struct MarkdownLinks<'a> {
    pub opts: &'a RenderOptions,
}

impl MarkdownLinks<'_> {
    fn page_ref(&self, name: &str, out: &mut Vec<Piece>) {
        let file = if self.opts.has_known_extension(name) {
            name.to_string()
        } else {
            self.opts.legacy_file(name)
        };
        let dest = format!("{}{}", self.opts.pages_prefix, file);
        out.push(Piece::markup("["));
        out.push(Piece::label(name));
        out.push(Piece::Markup(format!("]({})", destination(&dest))));
    }
}

/// Link destination as CommonMark reads it back. Spaces and unbalanced
/// parentheses are only allowed inside `<...>`, where `<`/`>` need escaping.
fn destination(dest: &str) -> String {
    if !dest.contains(|c: char| c.is_whitespace() || matches!(c, '(' | ')' | '<' | '>')) {
        return dest.to_string();
    }
    let mut out = String::with_capacity(dest.len() + 2);
    out.push('<');
    for c in dest.chars() {
        if matches!(c, '<' | '>') {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('>');
    out
}

impl LinkWriter for MarkdownLinks<'_> {
    fn rules(&self) -> &'static [Rule] {
        &MARKDOWN_RULES
    }

    fn write(&self, link: Link<'_>, out: &mut Vec<Piece>) {
        match link {
            Link::Arrow { name }
            | Link::Legacy { name }
            | Link::Macro { name }
            | Link::Page { name } => self.page_ref(name, out),
            Link::External { url, label } => {
                out.push(Piece::markup("["));
                out.push(Piece::label(label));
                out.push(Piece::Markup(format!("]({})", destination(url))));
            }
            Link::Url { url } => out.push(Piece::markup(url)),
        }
    }
}

/// Convert a Moniwiki document to Markdown. Every output line ends in `\n`.
pub fn transcode(text: &str, opts: &RenderOptions) -> String {
    let links = MarkdownLinks { opts };
    let mut acc = Accumulator::new();

    for event in scan::scan(text) {
        match event {
            BlockEvent::CodeStart { lang } => {
                acc.push_str("```");
                acc.push_str(lang.unwrap_or_default());
                acc.push_str("\n");
            }
            BlockEvent::CodeLine(line) => {
                acc.push_str(line);
                acc.push_str("\n");
            }
            BlockEvent::CodeEnd { .. } => acc.push_str("```\n"),
            BlockEvent::Heading { level, content } => {
                acc.push_str(&"#".repeat(usize::from(level)));
                acc.push_str(" ");
                acc.push_run(rewrite_links(content, &links));
                acc.push_str("\n");
            }
            BlockEvent::Rule => acc.push_str("---\n"),
            BlockEvent::Meta(line) => acc.push_str(&format!("```\n{line}\n```\n")),
            BlockEvent::Quote(rest) => {
                acc.push_str("> ");
                acc.push_run(rewrite_links(rest, &links));
                acc.push_str("\n");
            }
            BlockEvent::ListStart(_) | BlockEvent::ListEnd(_) => {}
            BlockEvent::ListItem(item) => {
                match item.kind {
                    ListKind::Unordered => acc.push_str("* "),
                    ListKind::Ordered => {
                        acc.push_str(item.marker);
                        acc.push_str(" ");
                    }
                }
                acc.push_run(rewrite_links(item.content, &links));
                acc.push_str("\n");
            }
            BlockEvent::Text(line) => {
                acc.push_run(rewrite_links(line, &links));
                acc.push_str("\n");
            }
        }
    }

    let markdown = acc.finish(&emphasis::MARKDOWN);
    tracing::debug!(
        input = text.len(),
        output = markdown.len(),
        "transcoded moniwiki to markdown"
    );
    markdown
}
