//! Markdown conversion.
//!
//! The renderer only needs two things from a markup engine: the page's
//! headings in document order and the HTML body with an `id` on every
//! heading so the table of contents can link to them. [`MarkupEngine`] is that
//! seam; [`CommonMarkEngine`] implements it with pulldown-cmark.
//!
//! Heading ids are slugs made unique per page by [`Slugger`]: the second
//! `## FAQ` on a page becomes `faq-1`, the third `faq-2`. The table of
//! contents runs its own [`Slugger`] over the same headings and arrives at the
//! same ids.

use pulldown_cmark::{CowStr, Event, HeadingLevel, Options, Parser, Tag, TagEnd, html};
use std::collections::HashMap;

/// One heading token extracted from a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Heading {
    /// 1 for `#`, up to 6 for `######`.
    pub level: u8,
    /// Plain text of the heading with inline markup stripped.
    pub text: String,
}

/// Output of a markup conversion.
#[derive(Debug, Clone, Default)]
pub struct Converted {
    pub headings: Vec<Heading>,
    pub html: String,
}

/// Converts raw document text into heading tokens and an HTML fragment.
pub trait MarkupEngine: Sync {
    fn convert(&self, source: &str) -> Converted;

    /// URL-safe slug for a heading text, before de-duplication.
    fn slug(&self, text: &str) -> String;
}

/// CommonMark with the GitHub-flavoured extensions most docs rely on.
#[derive(Debug, Clone)]
pub struct CommonMarkEngine {
    options: Options,
}

impl Default for CommonMarkEngine {
    fn default() -> Self {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_STRIKETHROUGH);
        options.insert(Options::ENABLE_TASKLISTS);
        options.insert(Options::ENABLE_FOOTNOTES);
        Self { options }
    }
}

impl MarkupEngine for CommonMarkEngine {
    fn convert(&self, source: &str) -> Converted {
        let mut events: Vec<Event<'_>> = Parser::new_ext(source, self.options).collect();

        // First pass: find heading spans and their text.
        let mut headings = Vec::new();
        let mut starts = Vec::new();
        let mut open: Option<(usize, u8, String)> = None;
        for (index, event) in events.iter().enumerate() {
            match event {
                Event::Start(Tag::Heading { level, .. }) => {
                    open = Some((index, heading_level_to_num(*level), String::new()));
                }
                Event::Text(text) | Event::Code(text) => {
                    if let Some((_, _, buf)) = open.as_mut() {
                        buf.push_str(text);
                    }
                }
                Event::SoftBreak | Event::HardBreak => {
                    if let Some((_, _, buf)) = open.as_mut() {
                        buf.push(' ');
                    }
                }
                Event::End(TagEnd::Heading(_)) => {
                    if let Some((start, level, text)) = open.take() {
                        starts.push(start);
                        headings.push(Heading {
                            level,
                            text: text.trim().to_string(),
                        });
                    }
                }
                _ => {}
            }
        }

        // Second pass: give every heading its unique id.
        let mut slugger = Slugger::default();
        for (&start, heading) in starts.iter().zip(&headings) {
            let slug = slugger.unique(&self.slug(&heading.text));
            if let Event::Start(Tag::Heading { id, .. }) = &mut events[start] {
                *id = Some(CowStr::from(slug));
            }
        }

        let mut body = String::with_capacity(source.len() * 3 / 2);
        html::push_html(&mut body, events.into_iter());
        Converted {
            headings,
            html: body,
        }
    }

    fn slug(&self, text: &str) -> String {
        slugify(text)
    }
}

/// Lowercase alphanumerics joined by single dashes.
///
/// Whitespace, `-` and `_` become a dash; everything else is dropped. A text
/// with nothing left (`"???"`) slugs to `section`.
pub fn slugify(text: &str) -> String {
    let mut result = String::new();
    let mut last_was_dash = true;

    for c in text.trim().chars() {
        if c.is_alphanumeric() {
            result.extend(c.to_lowercase());
            last_was_dash = false;
        } else if !last_was_dash && (c.is_whitespace() || c == '-' || c == '_') {
            result.push('-');
            last_was_dash = true;
        }
    }
    if result.ends_with('-') {
        result.pop();
    }
    if result.is_empty() {
        result.push_str("section");
    }
    result
}

/// Hands out page-unique slugs: `x`, then `x-1`, `x-2`, ...
#[derive(Debug, Default)]
pub struct Slugger {
    seen: HashMap<String, usize>,
}

impl Slugger {
    pub fn unique(&mut self, slug: &str) -> String {
        let mut candidate = slug.to_string();
        if let Some(&count) = self.seen.get(slug) {
            let mut n = count;
            loop {
                n += 1;
                candidate = format!("{slug}-{n}");
                if !self.seen.contains_key(&candidate) {
                    break;
                }
            }
            self.seen.insert(slug.to_string(), n);
        }
        self.seen.insert(candidate.clone(), 0);
        candidate
    }
}

fn heading_level_to_num(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}
