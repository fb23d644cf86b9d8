//! Bold, italic and strikethrough.
//!
//! Delimiters are applied one after another in table order, so `'''` is
//! consumed before `''` ever sees it. Pairing is lazy: an opener takes the
//! first closer after it, even if that leaves the content empty.
//!
//! Markup pieces are opaque. A delimiter allowed to span pieces sees each
//! markup piece as a single placeholder character, so it can wrap a whole
//! anchor but never match inside one.

use super::Piece;

/// Stand-in for a markup piece while searching for delimiter pairs.
const OPAQUE: char = '\0';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Delimiter {
    pub token: &'static str,
    pub open: &'static str,
    pub close: &'static str,
    /// Opener and closer must sit in the same text piece.
    pub within_piece: bool,
    /// Characters the enclosed text may not contain.
    pub forbidden: &'static [char],
}

pub const HTML: [Delimiter; 3] = [
    Delimiter {
        token: "'''",
        open: "<strong>",
        close: "</strong>",
        within_piece: false,
        forbidden: &[],
    },
    Delimiter {
        token: "''",
        open: "<em>",
        close: "</em>",
        within_piece: false,
        forbidden: &[],
    },
    Delimiter {
        token: "--",
        open: "<del>",
        close: "</del>",
        within_piece: true,
        forbidden: &['<', '>'],
    },
];

pub const MARKDOWN: [Delimiter; 3] = [
    Delimiter {
        token: "'''",
        open: "**",
        close: "**",
        within_piece: false,
        forbidden: &[],
    },
    Delimiter {
        token: "''",
        open: "*",
        close: "*",
        within_piece: false,
        forbidden: &[],
    },
    Delimiter {
        token: "--",
        open: "~~",
        close: "~~",
        within_piece: true,
        forbidden: &['[', ']'],
    },
];

/// Replace delimiter pairs in `pieces` with markup, one delimiter at a time.
pub fn emphasize(pieces: Vec<Piece>, delimiters: &[Delimiter]) -> Vec<Piece> {
    delimiters
        .iter()
        .fold(pieces, |pieces, delimiter| apply(pieces, delimiter))
}

#[derive(Debug, Clone, Copy)]
struct Edit {
    start: usize,
    end: usize,
    markup: &'static str,
}

fn apply(pieces: Vec<Piece>, delimiter: &Delimiter) -> Vec<Piece> {
    let mentioned = pieces
        .iter()
        .any(|p| p.emphasizable().is_some_and(|s| s.contains(delimiter.token)));
    if !mentioned {
        return pieces;
    }

    if delimiter.within_piece {
        let mut out = Vec::with_capacity(pieces.len());
        for piece in pieces {
            let pairs = match piece.emphasizable() {
                Some(s) => find_pairs(s, delimiter, |_| true),
                None => Vec::new(),
            };
            if pairs.is_empty() {
                out.push(piece);
            } else {
                splice(&piece, 0, &edits(&pairs, delimiter), &mut out);
            }
        }
        return out;
    }

    let mut view = String::new();
    let mut starts = Vec::with_capacity(pieces.len());
    for piece in &pieces {
        starts.push(view.len());
        match piece.emphasizable() {
            Some(s) => view.push_str(s),
            None => view.push(OPAQUE),
        }
    }

    let token_len = delimiter.token.len();
    let pairs = find_pairs(&view, delimiter, |at| !straddles(&starts, at, token_len));
    if pairs.is_empty() {
        return pieces;
    }

    let edits = edits(&pairs, delimiter);
    let mut out = Vec::with_capacity(pieces.len() + edits.len() * 2);
    for (piece, &start) in pieces.iter().zip(&starts) {
        if piece.emphasizable().is_some() {
            splice(piece, start, &edits, &mut out);
        } else {
            out.push(piece.clone());
        }
    }
    out
}

/// Lazy opener/closer pairs in `text`, as byte offsets of each token.
fn find_pairs(
    text: &str,
    delimiter: &Delimiter,
    usable: impl Fn(usize) -> bool,
) -> Vec<(usize, usize)> {
    let token = delimiter.token;
    let next_token = |from: usize| -> Option<usize> {
        let mut search = from;
        while let Some(rel) = text.get(search..)?.find(token) {
            let at = search + rel;
            if usable(at) {
                return Some(at);
            }
            search = at + 1;
        }
        None
    };

    let mut pairs = Vec::new();
    let mut from = 0;
    while let Some(open) = next_token(from) {
        let content_start = open + token.len();
        // no closer after this opener means none after any later opener either.
        let Some(close) = next_token(content_start) else {
            break;
        };
        if text[content_start..close].contains(delimiter.forbidden) {
            from = open + 1;
            continue;
        }
        pairs.push((open, close));
        from = close + token.len();
    }
    pairs
}

/// Whether a token at `at` would cross from one piece into the next.
fn straddles(starts: &[usize], at: usize, len: usize) -> bool {
    let next = starts.partition_point(|&s| s <= at);
    starts.get(next).is_some_and(|&s| s < at + len)
}

fn edits(pairs: &[(usize, usize)], delimiter: &Delimiter) -> Vec<Edit> {
    let len = delimiter.token.len();
    pairs
        .iter()
        .flat_map(|&(open, close)| {
            [
                Edit {
                    start: open,
                    end: open + len,
                    markup: delimiter.open,
                },
                Edit {
                    start: close,
                    end: close + len,
                    markup: delimiter.close,
                },
            ]
        })
        .collect()
}

/// Cut `piece` (placed at `offset` in the search view) around the edits that
/// fall inside it. Surviving text keeps the piece's kind.
fn splice(piece: &Piece, offset: usize, edits: &[Edit], out: &mut Vec<Piece>) {
    let s = piece.as_str();
    let end = offset + s.len();
    let first = edits.partition_point(|e| e.start < offset);

    let mut pos = 0;
    for edit in edits[first..].iter().take_while(|e| e.start < end) {
        let start = edit.start - offset;
        if start > pos {
            out.push(piece.with_text(&s[pos..start]));
        }
        out.push(Piece::markup(edit.markup));
        pos = edit.end - offset;
    }
    if pos < s.len() {
        out.push(piece.with_text(&s[pos..]));
    }
}
