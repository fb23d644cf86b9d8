//! Page-existence index and internal link resolution.
//!
//! The index is a plain snapshot handed in by the caller for one render; it
//! is never cached between calls.

use std::borrow::Cow;
use std::cmp::Ordering;
use std::collections::HashSet;
use std::iter::Peekable;
use std::str::Chars;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};

use crate::error::Result;
use crate::options::RenderOptions;

/// Everything `encodeURIComponent` escapes.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

const EXTERNAL_SCHEMES: [&str; 4] = ["http:", "https:", "ftp:", "mailto:"];

pub fn encode_component(s: &str) -> String {
    utf8_percent_encode(s, URI_COMPONENT).to_string()
}

/// Strict percent-decoding: `None` for a stray `%` or bytes that are not UTF-8.
pub fn try_decode(s: &str) -> Option<String> {
    let bytes = s.as_bytes();
    let stray = bytes.iter().enumerate().any(|(i, &b)| {
        b == b'%'
            && !(bytes.get(i + 1).is_some_and(u8::is_ascii_hexdigit)
                && bytes.get(i + 2).is_some_and(u8::is_ascii_hexdigit))
    });
    if stray {
        return None;
    }
    percent_decode_str(s)
        .decode_utf8()
        .ok()
        .map(Cow::into_owned)
}

/// Decode a link name for lookup, keeping the raw name when decoding fails.
pub fn decode_name(name: &str) -> Cow<'_, str> {
    if !name.contains('%') {
        return Cow::Borrowed(name);
    }
    match try_decode(name) {
        Some(decoded) => Cow::Owned(decoded),
        None => {
            tracing::debug!(name, "malformed percent-encoding in link target, using it as written");
            Cow::Borrowed(name)
        }
    }
}

pub fn is_external(url: &str) -> bool {
    let lower = url.trim_start().to_ascii_lowercase();
    EXTERNAL_SCHEMES.iter().any(|scheme| lower.starts_with(scheme))
}

/// The set of known page files, e.g. `Front Page.moniwiki`, `Notes.md`.
#[derive(Debug, Clone, Default)]
pub struct PageIndex {
    names: Vec<String>,
    lookup: HashSet<String>,
}

impl PageIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut lookup = HashSet::new();
        let mut names: Vec<String> = names
            .into_iter()
            .map(Into::into)
            .filter(|n| lookup.insert(n.clone()))
            .collect();
        names.sort_by(|a, b| natural_cmp(a, b));
        Self { names, lookup }
    }

    /// Load an index given as a JSON array of page names.
    pub fn from_json(json: &str) -> Result<Self> {
        let names: Vec<String> = serde_json::from_str(json)?;
        Ok(Self::from_names(names))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.lookup.contains(name)
    }

    /// Names in natural order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for PageIndex {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::from_names(iter)
    }
}

/// Case-insensitive ordering that compares digit runs by value, so `Page2`
/// sorts before `Page10`.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let (mut x, mut y) = (a.chars().peekable(), b.chars().peekable());
    loop {
        match (x.peek().copied(), y.peek().copied()) {
            (None, None) => return a.cmp(b),
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(c), Some(d)) if c.is_ascii_digit() && d.is_ascii_digit() => {
                let m = take_digits(&mut x);
                let n = take_digits(&mut y);
                let (m, n) = (m.trim_start_matches('0'), n.trim_start_matches('0'));
                let ord = m.len().cmp(&n.len()).then_with(|| m.cmp(n));
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            (Some(c), Some(d)) => {
                let ord = c.to_lowercase().cmp(d.to_lowercase());
                if ord != Ordering::Equal {
                    return ord;
                }
                x.next();
                y.next();
            }
        }
    }
}

fn take_digits(it: &mut Peekable<Chars<'_>>) -> String {
    let mut digits = String::new();
    while let Some(c) = it.next_if(char::is_ascii_digit) {
        digits.push(c);
    }
    digits
}

/// Which family of link syntax a name came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkStyle {
    /// `--> [A]`, `["A"]`, `[A]`: the name omits the legacy extension.
    Legacy,
    /// `[[A]]` and Markdown relative links: the name may be a file name.
    Generic,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Page { file: String, legacy: bool },
    Missing { name: String },
}

impl Target {
    pub fn href(&self, opts: &RenderOptions) -> String {
        match self {
            Target::Page { file, .. } => format!("{}{}", opts.pages_prefix, encode_component(file)),
            Target::Missing { name } => {
                format!("{}?q={}", opts.search_path, encode_component(name))
            }
        }
    }

    pub fn class<'o>(&self, opts: &'o RenderOptions) -> Option<&'o str> {
        match self {
            Target::Page { legacy: true, .. } => Some(&opts.legacy_link_class),
            Target::Page { legacy: false, .. } => None,
            Target::Missing { .. } => Some(&opts.red_link_class),
        }
    }

    /// Opening `<a ...>` tag for this target.
    pub fn open_tag(&self, opts: &RenderOptions) -> String {
        anchor(&self.href(opts), self.class(opts), None, false)
    }

    pub fn exists(&self) -> bool {
        matches!(self, Target::Page { .. })
    }
}

/// Files to look for, in order, when resolving `name`.
pub fn candidates(name: &str, style: LinkStyle, opts: &RenderOptions) -> Vec<String> {
    if opts.has_known_extension(name) {
        return vec![name.to_string()];
    }
    match style {
        LinkStyle::Legacy => vec![opts.legacy_file(name), opts.markdown_file(name)],
        LinkStyle::Generic => vec![
            name.to_string(),
            opts.markdown_file(name),
            opts.legacy_file(name),
        ],
    }
}

pub fn resolve(name: &str, style: LinkStyle, index: &PageIndex, opts: &RenderOptions) -> Target {
    let name = decode_name(name);
    for file in candidates(&name, style, opts) {
        if index.contains(&file) {
            let legacy = opts.is_legacy(&file);
            return Target::Page { file, legacy };
        }
    }
    Target::Missing {
        name: opts.strip_extension(&name).to_string(),
    }
}

/// `<a href="..." ...>` with every attribute value escaped.
pub fn anchor(href: &str, class: Option<&str>, title: Option<&str>, new_tab: bool) -> String {
    let mut tag = format!(
        "<a href=\"{}\"",
        html_escape::encode_double_quoted_attribute(href)
    );
    if let Some(class) = class {
        tag.push_str(&format!(
            " class=\"{}\"",
            html_escape::encode_double_quoted_attribute(class)
        ));
    }
    if let Some(title) = title.filter(|t| !t.is_empty()) {
        tag.push_str(&format!(
            " title=\"{}\"",
            html_escape::encode_double_quoted_attribute(title)
        ));
    }
    if new_tab {
        tag.push_str(" target=\"_blank\" rel=\"noopener noreferrer\"");
    }
    tag.push('>');
    tag
}

pub fn external_open_tag(url: &str, opts: &RenderOptions) -> String {
    anchor(url, None, None, opts.external_new_tab)
}
