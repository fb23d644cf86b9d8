//! Markdown to HTML, with links checked against the page index.
//!
//! - External links (`http`, `https`, `ftp`, `mailto`, email autolinks) open
//!   in a new tab.
//! - Absolute (`/...`) and fragment (`#...`) links pass through untouched.
//! - Anything else names a page: existing pages get an internal link,
//!   missing ones a red link to search.

use pulldown_cmark::{Event, LinkType, Options, Parser, Tag, TagEnd, html};

use crate::options::RenderOptions;
use crate::resolve::{self, LinkStyle, PageIndex, Target};

pub fn render(text: &str, index: &PageIndex, opts: &RenderOptions) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_FOOTNOTES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);

    // one entry per open link: whether its start tag was replaced.
    let mut rewritten: Vec<bool> = Vec::new();

    let parser = Parser::new_ext(text, options).map(|event| match event {
        Event::Start(Tag::Link {
            link_type,
            dest_url,
            title,
            id,
        }) => match open_tag(link_type, &dest_url, &title, index, opts) {
            Some(tag) => {
                rewritten.push(true);
                Event::InlineHtml(tag.into())
            }
            None => {
                rewritten.push(false);
                Event::Start(Tag::Link {
                    link_type,
                    dest_url,
                    title,
                    id,
                })
            }
        },
        Event::End(TagEnd::Link) => {
            if rewritten.pop().unwrap_or(false) {
                Event::InlineHtml("</a>".into())
            } else {
                Event::End(TagEnd::Link)
            }
        }
        other => other,
    });

    let mut out = String::with_capacity(text.len() * 3 / 2);
    html::push_html(&mut out, parser);
    tracing::debug!(
        input = text.len(),
        output = out.len(),
        pages = index.len(),
        "rendered markdown to html"
    );
    out
}

/// Replacement `<a>` for a link, or `None` to keep the default rendering.
fn open_tag(
    link_type: LinkType,
    dest: &str,
    title: &str,
    index: &PageIndex,
    opts: &RenderOptions,
) -> Option<String> {
    if dest.is_empty() {
        return None;
    }
    // `<a@b.c>` autolinks carry the bare address.
    if link_type == LinkType::Email {
        let href = format!("mailto:{dest}");
        return Some(resolve::anchor(&href, None, Some(title), opts.external_new_tab));
    }
    if dest.starts_with('/') || dest.starts_with('#') {
        return None;
    }
    if resolve::is_external(dest) {
        return Some(resolve::anchor(dest, None, Some(title), opts.external_new_tab));
    }

    let (path, fragment) = match dest.split_once('#') {
        Some((path, fragment)) => (path, Some(fragment)),
        None => (dest, None),
    };
    if path.contains('%') && resolve::try_decode(path).is_none() {
        tracing::debug!(dest, "malformed percent-encoding in link, leaving it as written");
        return None;
    }

    let target = resolve::resolve(path, LinkStyle::Generic, index, opts);
    let href = match (&target, fragment) {
        (Target::Page { .. }, Some(fragment)) => format!("{}#{}", target.href(opts), fragment),
        _ => target.href(opts),
    };
    Some(resolve::anchor(&href, target.class(opts), Some(title), false))
}
