//! Per-line shape recognizers.
//!
//! Each recognizer looks at a single line (line-feed already removed) and
//! answers whether the line has that block shape. Precedence between shapes is
//! decided by the caller, not here.

/// Opening code fence marker.
pub const FENCE_OPEN: &str = "{{{";

/// Closing code fence marker.
pub const FENCE_CLOSE: &str = "}}}";

/// Deepest heading level the markup supports.
pub const MAX_HEADING_LEVEL: usize = 5;

/// List flavours. A document only ever has one of these open at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListKind {
    /// `* item`
    Unordered,
    /// `1. item` or `a. item`
    Ordered,
}

/// A recognized list item line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListLine<'a> {
    pub kind: ListKind,
    /// Marker as written, e.g. `*`, `12.` or `b.`.
    pub marker: &'a str,
    /// `floor(leading whitespace / 2)`.
    pub depth: usize,
    pub content: &'a str,
}

/// Split on line feeds, dropping a trailing `\r` from each line.
///
/// A trailing line feed produces a final empty line, same as a plain split.
pub fn split_lines(src: &str) -> impl Iterator<Item = &str> {
    src.split('\n').map(strip_cr)
}

pub fn strip_cr(s: &str) -> &str {
    s.strip_suffix('\r').unwrap_or(s)
}

/// `{{{` or `{{{#!lang ...}`. Returns the language hint, if any.
pub fn fence_open(line: &str) -> Option<Option<&str>> {
    let rest = line.strip_prefix(FENCE_OPEN)?;
    let lang = rest
        .strip_prefix("#!")
        .and_then(|hint| hint.split_whitespace().next())
        .filter(|hint| !hint.is_empty());
    Some(lang)
}

pub fn is_fence_close(line: &str) -> bool {
    line.starts_with(FENCE_CLOSE)
}

/// `== Title ==`: N `=`, one blank, content, one blank, N `=`, for N in 1..=5.
pub fn heading(line: &str) -> Option<(u8, &str)> {
    let bytes = line.as_bytes();
    let n = bytes.iter().take_while(|&&b| b == b'=').count();
    if n == 0 || n > MAX_HEADING_LEVEL {
        return None;
    }
    // opening run, a blank on each side of the content, closing run.
    if bytes.len() < n * 2 + 2 {
        return None;
    }
    let close_start = bytes.len() - n;
    if !bytes[close_start..].iter().all(|&b| b == b'=') {
        return None;
    }
    if !is_blank(bytes[n]) || !is_blank(bytes[close_start - 1]) {
        return None;
    }
    // both runs are ASCII, so these offsets sit on char boundaries.
    Some((n as u8, &line[n + 1..close_start - 1]))
}

pub fn is_rule(line: &str) -> bool {
    line.starts_with("----")
}

/// Lines starting with `#` are processing instructions / metadata.
pub fn is_meta(line: &str) -> bool {
    line.starts_with('#')
}

pub fn blockquote(line: &str) -> Option<&str> {
    line.strip_prefix("> ")
}

pub fn list_item(line: &str) -> Option<ListLine<'_>> {
    let body = line.trim_start();
    let indent = line[..line.len() - body.len()].chars().count();
    let depth = indent / 2;

    if let Some(rest) = body.strip_prefix('*') {
        return Some(ListLine {
            kind: ListKind::Unordered,
            marker: &body[..1],
            depth,
            content: skip_one_blank(rest),
        });
    }

    let marker_len = ordered_marker_len(body)?;
    Some(ListLine {
        kind: ListKind::Ordered,
        marker: &body[..marker_len],
        depth,
        content: skip_one_blank(&body[marker_len..]),
    })
}

/// Length of a leading `123.` or `a.` marker.
fn ordered_marker_len(body: &str) -> Option<usize> {
    let bytes = body.as_bytes();
    let digits = bytes.iter().take_while(|b| b.is_ascii_digit()).count();
    if digits > 0 {
        return (bytes.get(digits) == Some(&b'.')).then_some(digits + 1);
    }
    match bytes {
        [letter, b'.', ..] if letter.is_ascii_alphabetic() => Some(2),
        _ => None,
    }
}

fn skip_one_blank(s: &str) -> &str {
    match s.chars().next() {
        Some(c) if c.is_whitespace() => &s[c.len_utf8()..],
        _ => s,
    }
}

fn is_blank(b: u8) -> bool {
    b == b' ' || b == b'\t'
}
