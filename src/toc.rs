//! Per-page table of contents.

use crate::markup::{Heading, MarkupEngine, Slugger};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TocEntry {
    /// Indentation level; the first entry is always 1.
    pub depth: u8,
    /// Anchor id of the heading in the page body.
    pub id: String,
    pub text: String,
}

/// Build the table of contents for a page's headings.
///
/// The first heading is promoted to depth 1 whatever its level, so a page
/// opening with `###` does not start indented. Later headings keep their
/// level. Ids come from the engine's slug with per-page de-duplication,
/// matching the ids written into the body.
pub fn table_of_contents(headings: &[Heading], engine: &dyn MarkupEngine) -> Vec<TocEntry> {
    let mut slugger = Slugger::default();
    headings
        .iter()
        .filter(|h| (1..=6).contains(&h.level))
        .enumerate()
        .map(|(i, h)| TocEntry {
            depth: if i == 0 { 1 } else { h.level },
            id: slugger.unique(&engine.slug(&h.text)),
            text: h.text.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::CommonMarkEngine;

    fn heading(level: u8, text: &str) -> Heading {
        Heading {
            level,
            text: text.to_string(),
        }
    }

    #[test]
    fn first_entry_forced_to_depth_one() {
        let engine = CommonMarkEngine::default();
        let toc = table_of_contents(
            &[heading(3, "Deep Start"), heading(2, "Next"), heading(3, "Child")],
            &engine,
        );
        let depths: Vec<u8> = toc.iter().map(|e| e.depth).collect();
        assert_eq!(depths, vec![1, 2, 3]);
    }

    #[test]
    fn ids_match_body_ids() {
        let engine = CommonMarkEngine::default();
        let converted = engine.convert("# Setup\n\n## Setup\n\n## Notes & Tips\n");
        let toc = table_of_contents(&converted.headings, &engine);

        for entry in &toc {
            assert!(
                converted.html.contains(&format!(r#"id="{}""#, entry.id)),
                "missing id {} in body",
                entry.id
            );
        }
        let ids: Vec<&str> = toc.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["setup", "setup-1", "notes-tips"]);
    }

    #[test]
    fn no_headings_no_entries() {
        let engine = CommonMarkEngine::default();
        assert!(table_of_contents(&[], &engine).is_empty());
    }
}
