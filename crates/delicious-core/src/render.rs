//! Result renderer: search hits to a sanitized HTML fragment.
//!
//! [`render_results`] is pure: the same hits and query always produce the same
//! [`Fragment`]. Interpolated text is escaped first and the assembled markup
//! then goes through an allow-list sanitizer, so a store named
//! `<script>alert(1)</script>` renders as inert text.
//!
//! Alongside the markup the fragment carries one [`ResultBlock`] per rendered
//! element. The keyboard navigator works on those blocks instead of
//! re-parsing HTML.

use crate::types::SearchResult;

/// CSS class of every rendered block.
pub const RESULT_CLASS: &str = "search__result";
/// CSS class of the block selected by the keyboard navigator.
pub const ACTIVE_CLASS: &str = "search__result--active";

/// One rendered element of the results pane.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultBlock {
    /// Link target, `/store/{slug}`. `None` for the "no results" notice.
    pub href: Option<String>,
    /// Visible text of the block.
    pub label: String,
}

/// Rendered content of the results pane.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fragment {
    /// Sanitized markup, safe to insert into a document.
    pub html: String,
    pub blocks: Vec<ResultBlock>,
}

impl Fragment {
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

/// Render search hits, or a "no results" notice echoing `query` when there
/// are none.
pub fn render_results(results: &[SearchResult], query: &str) -> Fragment {
    if results.is_empty() {
        let label = format!("No results for {query} found!");
        let html = format!(
            r#"<div class="{RESULT_CLASS}">No results for {} found!</div>"#,
            ammonia::clean_text(query)
        );
        return Fragment {
            html: sanitize(&html),
            blocks: vec![ResultBlock { href: None, label }],
        };
    }

    let mut html = String::new();
    let mut blocks = Vec::with_capacity(results.len());
    for result in results {
        let href = format!("/store/{}", result.slug);
        html.push_str(&format!(
            r#"<a href="{}" class="{RESULT_CLASS}"><strong>{}</strong></a>"#,
            ammonia::clean_text(&href),
            ammonia::clean_text(&result.name)
        ));
        blocks.push(ResultBlock {
            href: Some(href),
            label: result.name.clone(),
        });
    }

    Fragment {
        html: sanitize(&html),
        blocks,
    }
}

/// Strip everything but result markup: `a[href|class]`, `strong`,
/// `div[class]`. Relative links pass through untouched.
pub fn sanitize(html: &str) -> String {
    ammonia::Builder::empty()
        .add_tags(["a", "strong", "div"])
        .add_tag_attributes("a", ["href", "class"])
        .add_tag_attributes("div", ["class"])
        .url_relative(ammonia::UrlRelative::PassThrough)
        .link_rel(None)
        .clean(html)
        .to_string()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
