//! Site generation.
//!
//! Runs the whole pipeline for one source directory:
//!
//! 1. **Scan** the source into a [`DocTree`] ([`crate::scan`])
//! 2. **Assemble** the ordered page list and pick the index ([`crate::assemble`])
//! 3. **Render** every page: markdown body, table of contents and the
//!    tree-shaped menu ([`crate::render`])
//! 4. **Write** pages, the index copy, static assets and the search data
//!
//! Nothing is written before steps 1-3 succeed, so a source without documents
//! or with colliding output names leaves the target untouched.
//!
//! ## Output Structure
//!
//! ```text
//! site/
//! ├── index.html                 # Copy of the index page
//! ├── README.html
//! ├── guide_setup.html           # {parent dir}_{name}.html
//! ├── advanced_tips.html
//! ├── css/
//! │   ├── style.css
//! │   └── images/                # Menu and search icons
//! ├── js/
//! │   ├── scripts.js             # Menu toggling and client-side search
//! │   └── searchIndex.js         # Search data, see crate::search
//! └── logo.svg                   # From the user's assets/ directory
//! ```
//!
//! Pages are converted and rendered in parallel; results are collected in
//! page order, so output files and the search data are identical from run to
//! run.

use crate::assemble::{self, AssembleError, INDEX_FILE_NAME, Site};
use crate::assets::{self, AssetError};
use crate::config::{ConfigError, SiteConfig};
use crate::markup::{CommonMarkEngine, MarkupEngine};
use crate::render::{self, RenderSettings};
use crate::scan::{self, ScanError, ScanOptions};
use crate::search::{SEARCH_INDEX_PATH, SearchIndex};
use crate::tree::DocTree;
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
    #[error("The source folder \"{}\" does not exist or is not a directory.", .0.display())]
    SourceNotDirectory(PathBuf),
    #[error(transparent)]
    Scan(#[from] ScanError),
    #[error(transparent)]
    Assemble(#[from] AssembleError),
    #[error(transparent)]
    Asset(#[from] AssetError),
    #[error("cannot write {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Scanned and assembled site, ready to render.
#[derive(Debug)]
pub struct Prepared {
    pub tree: DocTree,
    pub site: Site,
}

/// Final HTML and search terms of one page.
#[derive(Debug, Clone, PartialEq)]
pub struct PageOutput {
    pub html: String,
    pub search_terms: Vec<String>,
}

/// What a build wrote, in page order.
#[derive(Debug)]
pub struct BuildReport {
    pub target: PathBuf,
    pub pages: Vec<PageReport>,
    /// Embedded and user asset files written.
    pub assets: usize,
    /// Pages recorded in the search data.
    pub search_entries: usize,
}

#[derive(Debug, Clone)]
pub struct PageReport {
    pub title: String,
    pub source: PathBuf,
    pub output: String,
    pub is_index: bool,
}

/// Validate the source, scan it and assemble the page list.
pub fn prepare(source: &Path, config: &SiteConfig) -> Result<Prepared, GenerateError> {
    if !source.is_dir() {
        return Err(GenerateError::SourceNotDirectory(source.to_path_buf()));
    }
    config.validate()?;
    let options = ScanOptions::from_config(config)?;
    let tree = scan::scan(source, &options)?;
    let site = assemble::assemble(&tree, config.index.as_deref())?;
    tracing::debug!(
        pages = site.pages.len(),
        index = site.index_page().map(|p| p.output_file_name.as_str()).unwrap_or_default(),
        "site assembled"
    );
    Ok(Prepared { tree, site })
}

/// Render every page of a prepared site. Output is in page order.
pub fn render_site(
    prepared: &Prepared,
    settings: &RenderSettings,
    engine: &dyn MarkupEngine,
) -> Vec<PageOutput> {
    let Prepared { tree, site } = prepared;
    site.pages
        .par_iter()
        .map(|page| {
            let rendered = render::convert_page(tree, page, engine);
            let html = render::render_page(tree, site, page, &rendered, settings).into_string();
            PageOutput {
                html,
                search_terms: rendered.search_terms,
            }
        })
        .collect()
}

/// Build the site from `source` into `target`.
pub fn generate(
    source: &Path,
    target: &Path,
    config: &SiteConfig,
) -> Result<BuildReport, GenerateError> {
    let prepared = prepare(source, config)?;
    let settings = RenderSettings::from_config(config);
    let engine = CommonMarkEngine::default();
    let outputs = render_site(&prepared, &settings, &engine);

    create_dir(target)?;
    let mut asset_count = assets::write_embedded(target)?.len();
    asset_count += assets::copy_user_assets(&source.join(&config.assets_dir), target)?.len();

    let mut search = SearchIndex::new();
    let mut pages = Vec::with_capacity(outputs.len());
    for (page, output) in prepared.site.pages.iter().zip(outputs) {
        // Hidden search still gets an (empty) data file below.
        if settings.search {
            search.push(&page.output_file_name, &page.title, &output.search_terms);
        }

        write_file(&target.join(&page.output_file_name), &output.html)?;
        if page.is_index {
            write_file(&target.join(INDEX_FILE_NAME), &output.html)?;
        }
        tracing::info!(file = %page.file_name, output = %page.output_file_name, "compiled");

        pages.push(PageReport {
            title: page.title.clone(),
            source: page.source_path.clone(),
            output: page.output_file_name.clone(),
            is_index: page.is_index,
        });
    }

    write_file(&target.join(SEARCH_INDEX_PATH), &search.to_script()?)?;
    tracing::info!(target = %target.display(), pages = pages.len(), "site generated");

    Ok(BuildReport {
        target: target.to_path_buf(),
        pages,
        assets: asset_count,
        search_entries: search.len(),
    })
}

fn create_dir(dir: &Path) -> Result<(), GenerateError> {
    fs::create_dir_all(dir).map_err(|source| GenerateError::Io {
        path: dir.to_path_buf(),
        source,
    })
}

fn write_file(path: &Path, contents: &str) -> Result<(), GenerateError> {
    if let Some(parent) = path.parent() {
        create_dir(parent)?;
    }
    fs::write(path, contents).map_err(|source| GenerateError::Io {
        path: path.to_path_buf(),
        source,
    })
}

// ============================================================================
// Tests
// ============================================================================
