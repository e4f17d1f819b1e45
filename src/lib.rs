//! # Folio
//!
//! A report pagination engine.
//!
//! Folio takes a report, a master page plus a stream of body content, and
//! flows that content *into* fixed-size pages. Every page has a header, a
//! body and a footer region; body content that does not fit is split or
//! carried over to the next page, empty pages are dropped, and a total page
//! count is resolved once the last page is known.
//!
//! ## Architecture
//!
//! ```text
//! Report (JSON/API)
//!       ↓
//!   [executor]  — Master page and body cursor
//!       ↓
//!   [layout]    — Page-by-page layout, breaks, fit-to-page
//!       ↓
//!   [area]      — Page geometry: header, body, footer, content areas
//!       ↓
//!   [emit]      — Emitter receives finished pages in order
//! ```

pub mod area;
pub mod context;
pub mod emit;
pub mod error;
pub mod executor;
pub mod font;
pub mod format;
pub mod layout;
pub mod model;

use serde::Serialize;

use context::LayoutContext;
use emit::PageCollector;
use error::LayoutError;
use executor::DocumentExecutor;
use font::{FontMetrics, StandardFontMetrics};
use layout::{Collaborators, PaginationSummary, Paginator};
use model::Report;

/// The result of an in-memory render.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Rendered {
    pub summary: PaginationSummary,
    #[serde(flatten)]
    pub output: PageCollector,
}

/// Paginate a report with the built-in font metrics and collect every page.
pub fn render(report: &Report) -> Result<Rendered, LayoutError> {
    render_with(report, &StandardFontMetrics::new())
}

/// Paginate a report measuring text with `metrics`.
pub fn render_with(report: &Report, metrics: &dyn FontMetrics) -> Result<Rendered, LayoutError> {
    let mut ctx = LayoutContext::new(&report.options);
    let mut executor = DocumentExecutor::from_report(report);
    let mut output = PageCollector::new();

    let summary = Paginator::new(
        &mut ctx,
        Collaborators {
            executor: &mut executor,
            emitter: &mut output,
            metrics,
            page_handler: None,
        },
    )
    .run()?;

    Ok(Rendered { summary, output })
}

/// Paginate a report described as JSON.
pub fn render_json(json: &str) -> Result<Rendered, LayoutError> {
    let report: Report = serde_json::from_str(json)?;
    render(&report)
}
