//! The ordered link rules.
//!
//! Order is part of the contract: each rule only sees text no earlier rule
//! claimed. In particular the macro rule runs before the generic
//! double-bracket rule, and autolinking runs last so it never sees a URL that
//! already belongs to a link.
//!
//! Matchers are plain scanners over one text piece. They never fail: text
//! that does not fit a rule is left for the next rule, and finally for output
//! as-is.

/// A link recognized in source text. Payloads borrow from the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Link<'a> {
    /// `--> [Name]`
    Arrow { name: &'a str },
    /// `[http://url label]` or `[[http://url|label]]`
    External { url: &'a str, label: &'a str },
    /// `["Name"]` or `[Name]`, targeting a legacy page.
    Legacy { name: &'a str },
    /// `[[Identifier]]`
    Macro { name: &'a str },
    /// `[[Any Name]]`
    Page { name: &'a str },
    /// Bare `http(s)://...`
    Url { url: &'a str },
}

/// A rule hit: `text[start..end]` is replaced by the rendered `link`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Match<'a> {
    pub start: usize,
    pub end: usize,
    pub link: Link<'a>,
}

/// One entry of the rule table.
#[derive(Debug, Clone, Copy)]
pub struct Rule {
    pub name: &'static str,
    /// Leftmost match in `text` starting at or after `from`.
    pub find: fn(&str, usize) -> Option<Match<'_>>,
}

pub const RULES: [Rule; 8] = [
    Rule {
        name: "arrow",
        find: find_arrow,
    },
    Rule {
        name: "bracket-external",
        find: find_bracket_external,
    },
    Rule {
        name: "quoted",
        find: find_quoted,
    },
    Rule {
        name: "bare",
        find: find_bare,
    },
    Rule {
        name: "piped-external",
        find: find_piped_external,
    },
    Rule {
        name: "macro",
        find: find_macro,
    },
    Rule {
        name: "page",
        find: find_page,
    },
    Rule {
        name: "autolink",
        find: find_url,
    },
];

/// [`RULES`] for migration: a bare `[text]` directly followed by `(` is
/// already a Markdown link and is left alone.
pub const MARKDOWN_RULES: [Rule; 8] = [
    RULES[0],
    RULES[1],
    RULES[2],
    Rule {
        name: "bare",
        find: find_bare_unlinked,
    },
    RULES[4],
    RULES[5],
    RULES[6],
    RULES[7],
];

/// Byte offsets of `needle` in `text` at or after `from`, overlapping hits included.
fn positions<'t>(text: &'t str, from: usize, needle: &'t str) -> impl Iterator<Item = usize> + 't {
    let mut search = from;
    std::iter::from_fn(move || {
        let rel = text.get(search..)?.find(needle)?;
        let at = search + rel;
        search = at + 1;
        Some(at)
    })
}

fn http_scheme_len(s: &str) -> Option<usize> {
    if s.starts_with("http://") {
        Some(7)
    } else if s.starts_with("https://") {
        Some(8)
    } else {
        None
    }
}

fn find_arrow(text: &str, from: usize) -> Option<Match<'_>> {
    for at in positions(text, from, "-->") {
        let after = at + 3;
        let rest = &text[after..];
        let trimmed = rest.trim_start();
        let Some(inner) = trimmed.strip_prefix('[') else {
            continue;
        };
        // no closing bracket anywhere further on: no later arrow can match either.
        let close = inner.find(']')?;
        if close == 0 {
            continue;
        }
        let name_start = after + (rest.len() - trimmed.len()) + 1;
        return Some(Match {
            start: at,
            end: name_start + close + 1,
            link: Link::Arrow {
                name: &text[name_start..name_start + close],
            },
        });
    }
    None
}

fn find_bracket_external(text: &str, from: usize) -> Option<Match<'_>> {
    let bytes = text.as_bytes();
    for at in positions(text, from, "[") {
        // `[[http://...|label]]` is the piped form.
        if at > 0 && bytes[at - 1] == b'[' {
            continue;
        }
        let base = at + 1;
        let rest = &text[base..];
        let Some(scheme) = http_scheme_len(rest) else {
            continue;
        };
        // a URL running to the end of the text leaves no room for a label, here or later.
        let url_len = scheme + rest[scheme..].find(|c: char| c == ']' || c.is_whitespace())?;
        if url_len == scheme {
            continue;
        }
        let Some(sep) = rest[url_len..].chars().next().filter(|c| c.is_whitespace()) else {
            continue;
        };
        let label_start = url_len + sep.len_utf8();
        let Some(close) = rest[label_start..].find(']') else {
            continue;
        };
        if close == 0 {
            continue;
        }
        return Some(Match {
            start: at,
            end: base + label_start + close + 1,
            link: Link::External {
                url: &rest[..url_len],
                label: &rest[label_start..label_start + close],
            },
        });
    }
    None
}

fn find_quoted(text: &str, from: usize) -> Option<Match<'_>> {
    for at in positions(text, from, "[\"") {
        let base = at + 2;
        let rest = &text[base..];
        let Some(quote) = rest.find('"') else {
            continue;
        };
        if quote == 0 || !rest[quote..].starts_with("\"]") {
            continue;
        }
        return Some(Match {
            start: at,
            end: base + quote + 2,
            link: Link::Legacy {
                name: &rest[..quote],
            },
        });
    }
    None
}

fn find_bare(text: &str, from: usize) -> Option<Match<'_>> {
    scan_bare(text, from, false)
}

fn find_bare_unlinked(text: &str, from: usize) -> Option<Match<'_>> {
    scan_bare(text, from, true)
}

fn scan_bare(text: &str, from: usize, skip_markdown_links: bool) -> Option<Match<'_>> {
    let bytes = text.as_bytes();
    for at in positions(text, from, "[") {
        if at > 0 && bytes[at - 1] == b'[' {
            continue;
        }
        let base = at + 1;
        let rest = &text[base..];
        let bracket = rest.find(['[', ']'])?;
        if bracket == 0 || bytes[base + bracket] == b'[' {
            continue;
        }
        // `[Name]]` belongs to the double-bracket rules.
        if bytes.get(base + bracket + 1) == Some(&b']') {
            continue;
        }
        if skip_markdown_links && text[base + bracket + 1..].trim_start().starts_with('(') {
            continue;
        }
        return Some(Match {
            start: at,
            end: base + bracket + 1,
            link: Link::Legacy {
                name: &rest[..bracket],
            },
        });
    }
    None
}

fn find_piped_external(text: &str, from: usize) -> Option<Match<'_>> {
    for at in positions(text, from, "[[") {
        let base = at + 2;
        let rest = &text[base..];
        let Some(scheme) = http_scheme_len(rest) else {
            continue;
        };
        let pipe = rest.find('|')?;
        if pipe <= scheme {
            continue;
        }
        let label_start = pipe + 1;
        let Some(close) = rest[label_start..].find(']') else {
            continue;
        };
        if close == 0 || !rest[label_start + close..].starts_with("]]") {
            continue;
        }
        return Some(Match {
            start: at,
            end: base + label_start + close + 2,
            link: Link::External {
                url: &rest[..pipe],
                label: &rest[label_start..label_start + close],
            },
        });
    }
    None
}

fn find_macro(text: &str, from: usize) -> Option<Match<'_>> {
    for at in positions(text, from, "[[") {
        let base = at + 2;
        let rest = &text[base..];
        let len = rest
            .bytes()
            .take_while(|b| b.is_ascii_alphanumeric() || *b == b'_')
            .count();
        if len == 0 || !rest[len..].starts_with("]]") {
            continue;
        }
        return Some(Match {
            start: at,
            end: base + len + 2,
            link: Link::Macro { name: &rest[..len] },
        });
    }
    None
}

fn find_page(text: &str, from: usize) -> Option<Match<'_>> {
    for at in positions(text, from, "[[") {
        let base = at + 2;
        let rest = &text[base..];
        let close = rest.find(']')?;
        if close == 0 || !rest[close..].starts_with("]]") {
            continue;
        }
        return Some(Match {
            start: at,
            end: base + close + 2,
            link: Link::Page {
                name: &rest[..close],
            },
        });
    }
    None
}

fn find_url(text: &str, from: usize) -> Option<Match<'_>> {
    for at in positions(text, from, "http") {
        let rest = &text[at..];
        let Some(scheme) = http_scheme_len(rest) else {
            continue;
        };
        let len = scheme
            + rest[scheme..]
                .find(|c: char| c == '<' || c.is_whitespace())
                .unwrap_or(rest.len() - scheme);
        if len == scheme || text[..at].ends_with("href=\"") {
            continue;
        }
        return Some(Match {
            start: at,
            end: at + len,
            link: Link::Url {
                url: &rest[..len],
            },
        });
    }
    None
}
