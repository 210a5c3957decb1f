//! Client-side search data.
//!
//! Every page contributes its heading texts as search terms. The collected
//! entries are written to `js/searchIndex.js` as a single JavaScript
//! assignment that the bundled client script reads:
//!
//! ```text
//! var searchIndex = [{"f":"guide_setup.html","t":"Setup","c":["Setup","Install"]}];
//! ```
//!
//! The array literal is produced by serde_json, so quotes, backslashes and
//! control characters in titles or headings are always escaped correctly.

use serde::{Deserialize, Serialize};

/// Path of the generated data file, relative to the output root.
pub const SEARCH_INDEX_PATH: &str = "js/searchIndex.js";

const SCRIPT_PREFIX: &str = "var searchIndex = ";

/// Searchable record for one page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchEntry {
    /// Output file name of the page.
    #[serde(rename = "f")]
    pub file: String,
    /// Page title.
    #[serde(rename = "t")]
    pub title: String,
    /// Heading texts.
    #[serde(rename = "c")]
    pub terms: Vec<String>,
}

/// Append-only accumulator, filled in page order.
#[derive(Debug, Clone, Default)]
pub struct SearchIndex {
    entries: Vec<SearchEntry>,
}

impl SearchIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a page. Blank terms are dropped and a page left without terms
    /// is not recorded; returns whether an entry was added.
    pub fn push(&mut self, file: &str, title: &str, terms: &[String]) -> bool {
        let terms: Vec<String> = terms
            .iter()
            .filter(|t| !t.trim().is_empty())
            .cloned()
            .collect();
        if terms.is_empty() {
            return false;
        }
        self.entries.push(SearchEntry {
            file: file.to_string(),
            title: title.to_string(),
            terms,
        });
        true
    }

    pub fn entries(&self) -> &[SearchEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Serialize to the contents of `js/searchIndex.js`.
    pub fn to_script(&self) -> Result<String, serde_json::Error> {
        let json = serde_json::to_string(&self.entries)?;
        Ok(format!("{SCRIPT_PREFIX}{json};\n"))
    }
}

/// Read entries back out of a generated `searchIndex.js`.
#[cfg(test)]
pub(crate) fn parse_script(script: &str) -> Result<Vec<SearchEntry>, serde_json::Error> {
    let body = script.trim();
    let body = body.strip_prefix(SCRIPT_PREFIX).unwrap_or(body);
    let body = body.strip_suffix(';').unwrap_or(body);
    serde_json::from_str(body)
}
