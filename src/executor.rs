//! # Content Executor
//!
//! The producer side of pagination. The engine pulls body nodes one at a time
//! and hands back whatever it could not fit, so a single executor cursor is
//! resumed page after page.
//!
//! [`DocumentExecutor`] serves a fully materialised [`Report`]; real report
//! engines implement [`ContentExecutor`] over their own lazy producers.

use std::collections::VecDeque;

use crate::error::ExecutorError;
use crate::model::{ContentNode, MasterPage, PageContent, Report};

pub trait ContentExecutor {
    /// Execute the master page for `page_number` (1-based).
    fn execute_master_page(&mut self, page_number: u32) -> Result<PageContent, ExecutorError>;

    /// The next body node, or `None` once the body is exhausted.
    fn next_body(&mut self) -> Result<Option<ContentNode>, ExecutorError>;

    /// Hand a node back; it is returned by the next call to `next_body`.
    fn defer(&mut self, node: ContentNode);
}

/// Executes an in-memory report.
#[derive(Debug, Clone)]
pub struct DocumentExecutor {
    master: MasterPage,
    body: VecDeque<ContentNode>,
}

impl DocumentExecutor {
    pub fn new(master: MasterPage, body: Vec<ContentNode>) -> Self {
        Self {
            master,
            body: body.into(),
        }
    }

    pub fn from_report(report: &Report) -> Self {
        Self::new(report.master_page.clone(), report.body.clone())
    }

    pub fn remaining(&self) -> usize {
        self.body.len()
    }
}

impl ContentExecutor for DocumentExecutor {
    fn execute_master_page(&mut self, page_number: u32) -> Result<PageContent, ExecutorError> {
        Ok(PageContent {
            page_number,
            master: self.master.clone(),
        })
    }

    fn next_body(&mut self) -> Result<Option<ContentNode>, ExecutorError> {
        Ok(self.body.pop_front())
    }

    fn defer(&mut self, node: ContentNode) {
        self.body.push_front(node);
    }
}
