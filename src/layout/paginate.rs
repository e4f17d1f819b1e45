//! The pagination loop.

use log::{debug, info};
use serde::Serialize;

use crate::context::LayoutContext;
use crate::error::LayoutError;

use super::page::{Collaborators, PageLayoutManager, PageState};

/// What a finished render produced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationSummary {
    pub pages_emitted: u32,
    /// Number of the last emitted page.
    pub page_count: u32,
    pub cancelled: bool,
}

/// Lays out pages until the body is exhausted or the render is cancelled.
pub struct Paginator<'a> {
    manager: PageLayoutManager<'a>,
}

impl<'a> Paginator<'a> {
    pub fn new(ctx: &'a mut LayoutContext, io: Collaborators<'a>) -> Self {
        Self {
            manager: PageLayoutManager::new(ctx, io),
        }
    }

    pub fn run(mut self) -> Result<PaginationSummary, LayoutError> {
        while self.manager.layout()? {
            debug!("continuing with page {}", self.manager.page_number());
        }

        let summary = PaginationSummary {
            pages_emitted: self.manager.pages_emitted(),
            page_count: self.manager.last_page_number(),
            cancelled: self.manager.state() == PageState::Cancelled,
        };
        info!(
            "pagination finished: {} pages{}",
            summary.pages_emitted,
            if summary.cancelled { " (cancelled)" } else { "" }
        );
        Ok(summary)
    }
}
