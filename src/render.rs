//! HTML page rendering.
//!
//! Every page shares the same frame: a header with the menu button, search
//! bar and site title; the sidebar menu; the converted document body next to
//! its table of contents; and the bundled scripts.
//!
//! The sidebar menu is rendered by recursing over the [`DocTree`], so its
//! nesting always matches the source directories:
//!
//! - a directory becomes an `h4.submenu-title` followed by a
//!   `div.d-{depth}.rec-depth` holding its children one level deeper;
//! - a document becomes an `a.menu-item` link to its output file, marked
//!   `active` on its own page;
//! - directories without documents below them are left out entirely.
//!
//! Templates use [maud](https://maud.lambda.xyz/), so titles and heading
//! texts are escaped automatically. Only the converted document body is
//! inserted pre-escaped.

use crate::assemble::{Page, Site};
use crate::config::{SiteConfig, Widget};
use crate::markup::MarkupEngine;
use crate::naming::display_title;
use crate::toc::{TocEntry, table_of_contents};
use crate::tree::{DocTree, NodeId, NodeKind};
use maud::{DOCTYPE, Markup, PreEscaped, html};

/// Site-wide options applied to every page.
#[derive(Debug, Clone)]
pub struct RenderSettings {
    pub site_title: String,
    /// Render the search bar and result panel.
    pub search: bool,
    /// Render the table of contents.
    pub toc: bool,
}

impl RenderSettings {
    pub fn from_config(config: &SiteConfig) -> Self {
        Self {
            site_title: config.site_title.clone(),
            search: !config.is_hidden(Widget::Search),
            toc: !config.is_hidden(Widget::Toc),
        }
    }
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self::from_config(&SiteConfig::default())
    }
}

/// Converted content of one page.
#[derive(Debug, Clone)]
pub struct RenderedPage {
    /// Document body as HTML.
    pub html: String,
    pub toc: Vec<TocEntry>,
    /// Heading texts in document order.
    pub search_terms: Vec<String>,
}

/// Convert a page's markdown into its body, table of contents and search terms.
pub fn convert_page(tree: &DocTree, page: &Page, engine: &dyn MarkupEngine) -> RenderedPage {
    let raw = tree
        .node(page.node)
        .document()
        .map(|d| d.raw.as_str())
        .unwrap_or_default();
    let converted = engine.convert(raw);
    let toc = table_of_contents(&converted.headings, engine);
    RenderedPage {
        html: converted.html,
        toc,
        search_terms: converted.headings.into_iter().map(|h| h.text).collect(),
    }
}

/// Renders the complete HTML document for a page.
pub fn render_page(
    tree: &DocTree,
    site: &Site,
    page: &Page,
    rendered: &RenderedPage,
    settings: &RenderSettings,
) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" dir="ltr" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                link rel="stylesheet" href="css/style.css";
                title { (settings.site_title) " | " (page.title) }
            }
            body {
                header {
                    a.push-right.hide-large.menu-btn href="javascript:void(0)" onclick="openSidebarMenu()" {
                        img src="css/images/menu-white.svg" alt="";
                    }
                    @if settings.search {
                        (search_bar())
                    }
                    a.site-title href="index.html" { (settings.site_title) }
                }
                (render_menu(tree, site, Some(page.node)))
                div.main-content {
                    div.markdown-body id="markdown-body" {
                        (PreEscaped(rendered.html.as_str()))
                    }
                    @if settings.search {
                        (search_results())
                    }
                    @if settings.toc {
                        (toc_markup(&rendered.toc))
                    }
                }
                div.overlay.hide-large id="overlayLayer" onclick="closeSidebarMenu()" {}
                script src="js/scripts.js" {}
                script src="js/searchIndex.js" {}
            }
        }
    }
}

/// Renders the sidebar menu with the entry for `active` highlighted.
///
/// Entries are matched by node, not by title: `foo-bar.md` and `foo_bar.md`
/// in one directory share a title but only the current one is active.
pub fn render_menu(tree: &DocTree, site: &Site, active: Option<NodeId>) -> Markup {
    html! {
        nav.sidebar.collapse.animate-left id="menuSidebar" {
            div.text-right {
                a.close-menu.hide-large href="javascript:void(0)" onclick="closeSidebarMenu()" {
                    img src="css/images/close-black.svg" alt="";
                }
            }
            (render_menu_node(tree, site, DocTree::ROOT, active, 0))
            div.filler {}
        }
    }
}

fn render_menu_node(
    tree: &DocTree,
    site: &Site,
    id: NodeId,
    active: Option<NodeId>,
    depth: usize,
) -> Markup {
    let node = tree.node(id);
    match &node.kind {
        NodeKind::Root => html! {
            @for &child in &node.children {
                (render_menu_node(tree, site, child, active, depth))
            }
        },
        _ if !node.content_bearing => html! {},
        NodeKind::Directory { name } => html! {
            h4.submenu-title { (display_title(name)) }
            div class={ "d-" (depth) " rec-depth" } {
                @for &child in &node.children {
                    (render_menu_node(tree, site, child, active, depth + 1))
                }
            }
        },
        NodeKind::Document(_) => match site.page_for(id) {
            Some(page) => {
                let class = if active == Some(id) {
                    format!("menu-item active submenu-item d-{depth}")
                } else {
                    format!("menu-item submenu-item d-{depth}")
                };
                html! {
                    a class=(class) href=(page.output_file_name) { (page.title) }
                }
            }
            None => html! {},
        },
    }
}

fn search_bar() -> Markup {
    html! {
        div.search-container {
            input.search-text type="text" id="search-text" name="search-text" placeholder="Search";
            button.search-btn onclick="javascript:search()" {
                img src="css/images/search-black.svg" alt="";
            }
        }
    }
}

fn search_results() -> Markup {
    html! {
        div.search-result-container id="search-result-container" {
            h2.push-left {
                "Search result for "
                i id="strToSearch" {}
                br;
                small { "Total found: " span id="totFound" {} }
            }
            button.close onclick="closeSearchResult()" { "Close" }
            div.clear {}
            div id="search-result" {}
        }
    }
}

fn toc_markup(entries: &[TocEntry]) -> Markup {
    html! {
        @if !entries.is_empty() {
            div.toc-container id="toc" {
                ul.table-of-contents {
                    @for entry in entries {
                        li class={ "toc-depth-" (entry.depth) } {
                            a href={ "#" (entry.id) } { (entry.text) }
                        }
                    }
                }
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
