//! Moniwiki line classifier and block builder.
//!
//! The scanner walks the document one line at a time and produces a flat
//! stream of [`BlockEvent`]s. Both output dialects consume the same stream, so
//! the block grammar lives in exactly one place.
//!
//! Per-line precedence (first match wins):
//! 1. code fence (`{{{` opens, `}}}` closes)
//! 2. heading (`== Title ==`)
//! 3. horizontal rule (`----`)
//! 4. metadata (`#...`)
//! 5. blockquote (`> ...`)
//! 6. unordered list item (`* ...`)
//! 7. ordered list item (`1. ...`, `a. ...`)
//! 8. plain text
//!
//! Inside a code block nothing but the closing fence is recognized. A code
//! block that is never closed swallows the rest of the document.

pub mod line;

pub use line::{ListKind, ListLine};

/// Block-scan state carried from one line to the next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlockState {
    #[default]
    Normal,
    InCode,
    InUnorderedList,
    InOrderedList,
}

impl BlockState {
    fn open_list(self) -> Option<ListKind> {
        match self {
            BlockState::InUnorderedList => Some(ListKind::Unordered),
            BlockState::InOrderedList => Some(ListKind::Ordered),
            BlockState::Normal | BlockState::InCode => None,
        }
    }
}

impl From<ListKind> for BlockState {
    fn from(kind: ListKind) -> Self {
        match kind {
            ListKind::Unordered => BlockState::InUnorderedList,
            ListKind::Ordered => BlockState::InOrderedList,
        }
    }
}

/// One step of block structure. Text payloads borrow from the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockEvent<'a> {
    CodeStart {
        lang: Option<&'a str>,
    },
    CodeLine(&'a str),
    /// `terminated` is false when the document ended inside the block.
    CodeEnd {
        terminated: bool,
    },
    Heading {
        level: u8,
        content: &'a str,
    },
    Rule,
    Meta(&'a str),
    Quote(&'a str),
    ListStart(ListKind),
    ListItem(ListLine<'a>),
    ListEnd(ListKind),
    Text(&'a str),
}

/// Scan a whole document into block events.
///
/// Every `ListStart` and `CodeStart` in the result has a matching end event.
pub fn scan(src: &str) -> Vec<BlockEvent<'_>> {
    let mut events = Vec::new();
    if src.is_empty() {
        return events;
    }

    let mut state = BlockState::Normal;
    let mut line_count = 0usize;
    for text in line::split_lines(src) {
        state = step(state, text, &mut events);
        line_count += 1;
    }
    finish(state, &mut events);

    tracing::trace!(lines = line_count, events = events.len(), "scanned document");
    events
}

/// Apply one line to the state machine, pushing the events it produces.
pub fn step<'a>(state: BlockState, text: &'a str, out: &mut Vec<BlockEvent<'a>>) -> BlockState {
    if state == BlockState::InCode {
        if line::is_fence_close(text) {
            out.push(BlockEvent::CodeEnd { terminated: true });
            return BlockState::Normal;
        }
        out.push(BlockEvent::CodeLine(text));
        return BlockState::InCode;
    }

    if let Some(lang) = line::fence_open(text) {
        close_list(state, out);
        out.push(BlockEvent::CodeStart { lang });
        return BlockState::InCode;
    }

    if let Some((level, content)) = line::heading(text) {
        close_list(state, out);
        out.push(BlockEvent::Heading { level, content });
        return BlockState::Normal;
    }

    if line::is_rule(text) {
        close_list(state, out);
        out.push(BlockEvent::Rule);
        return BlockState::Normal;
    }

    if line::is_meta(text) {
        close_list(state, out);
        out.push(BlockEvent::Meta(text));
        return BlockState::Normal;
    }

    if let Some(rest) = line::blockquote(text) {
        close_list(state, out);
        out.push(BlockEvent::Quote(rest));
        return BlockState::Normal;
    }

    if let Some(item) = line::list_item(text) {
        if state.open_list() != Some(item.kind) {
            close_list(state, out);
            out.push(BlockEvent::ListStart(item.kind));
        }
        out.push(BlockEvent::ListItem(item));
        return BlockState::from(item.kind);
    }

    close_list(state, out);
    out.push(BlockEvent::Text(text));
    BlockState::Normal
}

/// Close whatever is still open at end of document.
pub fn finish(state: BlockState, out: &mut Vec<BlockEvent<'_>>) {
    if state == BlockState::InCode {
        tracing::debug!("document ended inside a code block");
        out.push(BlockEvent::CodeEnd { terminated: false });
        return;
    }
    close_list(state, out);
}

fn close_list(state: BlockState, out: &mut Vec<BlockEvent<'_>>) {
    if let Some(kind) = state.open_list() {
        out.push(BlockEvent::ListEnd(kind));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use super::BlockEvent::*;

    #[test]
    fn matched_fence_pair_holds_verbatim_lines() {
        let events = scan("{{{\n* not a list\n== nor heading ==\n}}}\nafter");
        assert_eq!(
            events,
            vec![
                CodeStart { lang: None },
                CodeLine("* not a list"),
                CodeLine("== nor heading =="),
                CodeEnd { terminated: true },
                Text("after"),
            ]
        );
    }

    #[test]
    fn repeated_open_fence_does_not_toggle() {
        // the second `{{{` is content; the block never closes.
        let events = scan("{{{\na\n{{{\nb");
        assert_eq!(
            events,
            vec![
                CodeStart { lang: None },
                CodeLine("a"),
                CodeLine("{{{"),
                CodeLine("b"),
                CodeEnd { terminated: false },
            ]
        );
    }

    #[test]
    fn stray_close_fence_is_text() {
        assert_eq!(scan("}}}"), vec![Text("}}}")]);
    }

    #[test]
    fn fence_closes_open_list() {
        let events = scan("* a\n{{{#!rust\nfn x() {}\n}}}");
        assert_eq!(
            events,
            vec![
                ListStart(ListKind::Unordered),
                ListItem(ListLine {
                    kind: ListKind::Unordered,
                    marker: "*",
                    depth: 0,
                    content: "a",
                }),
                ListEnd(ListKind::Unordered),
                CodeStart { lang: Some("rust") },
                CodeLine("fn x() {}"),
                CodeEnd { terminated: true },
            ]
        );
    }

    #[test]
    fn switching_list_kind_closes_then_reopens() {
        let kinds: Vec<_> = scan("* a\n1. b\n2. c\n* d")
            .into_iter()
            .filter(|e| matches!(e, ListStart(_) | ListEnd(_)))
            .collect();
        assert_eq!(
            kinds,
            vec![
                ListStart(ListKind::Unordered),
                ListEnd(ListKind::Unordered),
                ListStart(ListKind::Ordered),
                ListEnd(ListKind::Ordered),
                ListStart(ListKind::Unordered),
                ListEnd(ListKind::Unordered),
            ]
        );
    }

    #[test]
    fn plain_line_closes_list() {
        let events = scan("* a\ntext");
        assert_eq!(events[2], ListEnd(ListKind::Unordered));
        assert_eq!(events[3], Text("text"));
    }

    #[test]
    fn consecutive_quotes_stay_separate() {
        assert_eq!(scan("> one\n> two"), vec![Quote("one"), Quote("two")]);
    }

    #[test]
    fn precedence_meta_before_list() {
        assert_eq!(scan("#format wiki"), vec![Meta("#format wiki")]);
        assert_eq!(scan("-----"), vec![Rule]);
    }

    #[test]
    fn empty_document_has_no_events() {
        assert!(scan("").is_empty());
    }
}
