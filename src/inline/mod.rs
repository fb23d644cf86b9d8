//! Inline formatting.
//!
//! A line of text is held as a sequence of [`Piece`]s. Rewrites only ever turn
//! `Text` into other pieces, so markup emitted by an earlier rule (anchors,
//! hrefs, link destinations) is never scanned again by a later one.
//!
//! Two passes run over every non-code text run:
//! 1. [`rules`]: the ordered link rules, applied per line.
//! 2. [`emphasis`]: bold, italic, strikethrough, applied once the whole
//!    document has been accumulated.

pub mod emphasis;
pub mod rules;

pub use emphasis::Delimiter;
pub use rules::{Link, MARKDOWN_RULES, RULES, Rule};

/// A slice of an output line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Piece {
    /// Source text still open to link rules and emphasis.
    Text(String),
    /// Link label: closed to link rules, open to emphasis.
    Label(String),
    /// Emitted markup; copied to the output untouched.
    Markup(String),
}

impl Piece {
    pub fn markup(s: impl Into<String>) -> Self {
        Piece::Markup(s.into())
    }

    pub fn label(s: impl Into<String>) -> Self {
        Piece::Label(s.into())
    }

    pub fn as_str(&self) -> &str {
        match self {
            Piece::Text(s) | Piece::Label(s) | Piece::Markup(s) => s,
        }
    }

    /// Text emphasis delimiters may be found in.
    fn emphasizable(&self) -> Option<&str> {
        match self {
            Piece::Text(s) | Piece::Label(s) => Some(s),
            Piece::Markup(_) => None,
        }
    }

    /// A piece of the same kind holding `s`.
    fn with_text(&self, s: &str) -> Piece {
        match self {
            Piece::Text(_) => Piece::Text(s.to_string()),
            Piece::Label(_) => Piece::Label(s.to_string()),
            Piece::Markup(_) => Piece::Markup(s.to_string()),
        }
    }
}

/// Dialect-specific rendering of a recognized link.
pub trait LinkWriter {
    fn write(&self, link: Link<'_>, out: &mut Vec<Piece>);

    /// Rule table to scan with, in order.
    fn rules(&self) -> &'static [Rule] {
        &RULES
    }
}

/// Run every rule of `writer`'s table, in order, over `text`.
pub fn rewrite_links<W: LinkWriter + ?Sized>(text: &str, writer: &W) -> Vec<Piece> {
    let mut pieces = vec![Piece::Text(text.to_string())];
    for rule in writer.rules() {
        pieces = apply_rule(pieces, rule, writer);
    }
    pieces
}

fn apply_rule<W: LinkWriter + ?Sized>(pieces: Vec<Piece>, rule: &Rule, writer: &W) -> Vec<Piece> {
    let mut out = Vec::with_capacity(pieces.len());
    for piece in pieces {
        let Piece::Text(text) = piece else {
            out.push(piece);
            continue;
        };

        let mut pos = 0usize;
        while pos < text.len() {
            let Some(found) = (rule.find)(&text, pos) else {
                break;
            };
            if found.start > pos {
                out.push(Piece::Text(text[pos..found.start].to_string()));
            }
            writer.write(found.link, &mut out);
            pos = found.end;
        }
        if pos < text.len() {
            out.push(Piece::Text(text[pos..].to_string()));
        }
    }
    out
}

/// Concatenate pieces into the final string.
pub fn join(pieces: &[Piece]) -> String {
    let mut out = String::with_capacity(pieces.iter().map(|p| p.as_str().len()).sum());
    for piece in pieces {
        out.push_str(piece.as_str());
    }
    out
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Fragment {
    Verbatim(String),
    Run(Vec<Piece>),
}

/// Linear output buffer shared by the writers.
///
/// Structural markup and code go in verbatim; inline runs are kept as pieces
/// until [`Accumulator::finish`] applies the emphasis pass over all of them.
#[derive(Debug, Default)]
pub struct Accumulator {
    fragments: Vec<Fragment>,
}

impl Accumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_str(&mut self, s: &str) {
        if let Some(Fragment::Verbatim(last)) = self.fragments.last_mut() {
            last.push_str(s);
        } else {
            self.fragments.push(Fragment::Verbatim(s.to_string()));
        }
    }

    pub fn push_run(&mut self, pieces: Vec<Piece>) {
        self.fragments.push(Fragment::Run(pieces));
    }

    pub fn finish(self, delimiters: &[Delimiter]) -> String {
        let mut out = String::new();
        for fragment in self.fragments {
            match fragment {
                Fragment::Verbatim(s) => out.push_str(&s),
                Fragment::Run(pieces) => {
                    out.push_str(&join(&emphasis::emphasize(pieces, delimiters)));
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Writes every link as `<kind:payload>` markup.
    struct Tagging;

    impl LinkWriter for Tagging {
        fn write(&self, link: Link<'_>, out: &mut Vec<Piece>) {
            let tag = match link {
                Link::Arrow { name } => format!("<arrow:{name}>"),
                Link::Legacy { name } => format!("<legacy:{name}>"),
                Link::External { url, label } => format!("<ext:{url}|{label}>"),
                Link::Macro { name } => format!("<macro:{name}>"),
                Link::Page { name } => format!("<page:{name}>"),
                Link::Url { url } => format!("<url:{url}>"),
            };
            out.push(Piece::Markup(tag));
        }
    }

    fn rewrite(text: &str) -> String {
        join(&rewrite_links(text, &Tagging))
    }

    #[test]
    fn each_rule_claims_its_syntax() {
        assert_eq!(rewrite("--> [Next]"), "<arrow:Next>");
        assert_eq!(
            rewrite("[http://a.com the label]"),
            "<ext:http://a.com|the label>"
        );
        assert_eq!(rewrite("[\"Quoted Page\"]"), "<legacy:Quoted Page>");
        assert_eq!(rewrite("[Bare Page]"), "<legacy:Bare Page>");
        assert_eq!(rewrite("[[https://b.org|B]]"), "<ext:https://b.org|B>");
        assert_eq!(rewrite("[[Macro_1]]"), "<macro:Macro_1>");
        assert_eq!(rewrite("[[Two Words]]"), "<page:Two Words>");
        assert_eq!(rewrite("go http://x.io now"), "go <url:http://x.io> now");
    }

    #[test]
    fn emitted_markup_is_not_rescanned() {
        // the autolink rule must not see the URL inside the external link.
        assert_eq!(
            rewrite("[http://a.com http://a.com] and http://b.com"),
            "<ext:http://a.com|http://a.com> and <url:http://b.com>"
        );
    }

    #[test]
    fn accumulator_emphasizes_runs_only() {
        let mut acc = Accumulator::new();
        acc.push_str("<pre>'''code'''</pre>");
        acc.push_run(vec![Piece::Text("'''bold'''".to_string())]);
        let out = acc.finish(&emphasis::HTML);
        assert_eq!(out, "<pre>'''code'''</pre><strong>bold</strong>");
    }
}
