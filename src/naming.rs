//! Display titles and output file names derived from source names.
//!
//! Every page and menu section takes its label from the filesystem: the file
//! name (without extension) for documents, the directory name for sections.
//! No front-matter is consulted.
//!
//! ## Display Titles
//!
//! Names are split into words at separators (`-`, `_`, `.`, whitespace) and at
//! case boundaries, then each word gets an upper-case first letter:
//! - `getting-started` → "Getting Started"
//! - `authFlow` → "Auth Flow"
//! - `HTMLParser` → "HTML Parser"
//! - `README` → "README"
//!
//! ## Output File Names
//!
//! Pages are written flat into the target directory. A page inside a
//! directory is prefixed with that directory's name so that `a/intro.md` and
//! `b/intro.md` land in `a_intro.html` and `b_intro.html`.

/// Human-readable title for a file or directory name.
pub fn display_title(name: &str) -> String {
    split_words(name)
        .iter()
        .map(|word| capitalize(word))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Output HTML file name for a document.
///
/// - `output_file_name(Some("guide"), "setup")` → `guide_setup.html`
/// - `output_file_name(None, "README")` → `README.html`
pub fn output_file_name(parent_dir: Option<&str>, base_name: &str) -> String {
    match parent_dir {
        Some(dir) if !dir.is_empty() => format!("{dir}_{base_name}.html"),
        _ => format!("{base_name}.html"),
    }
}

fn is_separator(c: char) -> bool {
    c == '-' || c == '_' || c == '.' || c.is_whitespace()
}

fn split_words(name: &str) -> Vec<String> {
    let chars: Vec<char> = name.chars().collect();
    let mut words = Vec::new();
    let mut current = String::new();

    for (i, &c) in chars.iter().enumerate() {
        if is_separator(c) {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            continue;
        }
        if c.is_uppercase() && !current.is_empty() {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            // camelCase, v2Api, and the last capital of an acronym (HTMLParser)
            if prev.is_lowercase() || prev.is_ascii_digit() || (prev.is_uppercase() && next_is_lower)
            {
                words.push(std::mem::take(&mut current));
            }
        }
        current.push(c);
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hyphenated_name() {
        assert_eq!(display_title("getting-started"), "Getting Started");
    }

    #[test]
    fn underscored_name() {
        assert_eq!(display_title("empty_dir"), "Empty Dir");
    }

    #[test]
    fn camel_case_name() {
        assert_eq!(display_title("authFlow"), "Auth Flow");
    }

    #[test]
    fn pascal_case_name() {
        assert_eq!(display_title("QuickStart"), "Quick Start");
    }

    #[test]
    fn acronym_followed_by_word() {
        assert_eq!(display_title("HTMLParser"), "HTML Parser");
    }

    #[test]
    fn all_caps_stays_intact() {
        assert_eq!(display_title("README"), "README");
    }

    #[test]
    fn lower_case_single_word() {
        assert_eq!(display_title("readme"), "Readme");
    }

    #[test]
    fn digit_then_capital_splits() {
        assert_eq!(display_title("v2Api"), "V2 Api");
    }

    #[test]
    fn repeated_separators_collapse() {
        assert_eq!(display_title("--release__notes  v1"), "Release Notes V1");
    }

    #[test]
    fn dotted_name() {
        assert_eq!(display_title("release.notes"), "Release Notes");
    }

    #[test]
    fn non_ascii_name() {
        assert_eq!(display_title("über-uns"), "Über Uns");
    }

    #[test]
    fn empty_name() {
        assert_eq!(display_title(""), "");
    }

    #[test]
    fn output_name_with_parent() {
        assert_eq!(output_file_name(Some("guide"), "setup"), "guide_setup.html");
    }

    #[test]
    fn output_name_at_root() {
        assert_eq!(output_file_name(None, "README"), "README.html");
    }

    #[test]
    fn output_name_same_base_different_dirs() {
        assert_ne!(
            output_file_name(Some("a"), "intro"),
            output_file_name(Some("b"), "intro")
        );
        assert_eq!(output_file_name(Some("a"), "intro"), "a_intro.html");
        assert_eq!(output_file_name(Some("b"), "intro"), "b_intro.html");
    }

    #[test]
    fn output_name_keeps_original_case() {
        assert_eq!(output_file_name(Some("API"), "Endpoints"), "API_Endpoints.html");
    }
}
