//! # Emitter Interfaces
//!
//! Finished pages leave the engine through a [`ContentEmitter`], strictly in
//! page-number order. The page area is lent to the emitter and dropped
//! afterwards, so an emitter that needs it later must copy what it needs.
//!
//! [`PageCollector`] is the in-memory emitter: it keeps a snapshot of every
//! page and patches total-page placeholders once they resolve.

use serde::Serialize;

use crate::area::{PageArea, TextArea};
use crate::context::LayoutContext;
use crate::model::PageContent;

/// A total-page placeholder with its final text.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedAutoText {
    /// Key carried by the placeholder's text areas.
    pub key: String,
    /// Id of the placeholder's content node, if it had one.
    pub id: Option<String>,
    pub text: String,
    /// Output format the text was measured for.
    pub output_format: String,
    /// The measured text area, when the text could be measured.
    pub area: Option<TextArea>,
}

pub trait ContentEmitter {
    fn start_page(&mut self, page: &PageArea, content: &PageContent);
    fn end_page(&mut self, page: &PageArea, content: &PageContent);
    /// Called after the last page, once for each resolved total-page placeholder.
    fn start_auto_text(&mut self, resolved: &ResolvedAutoText);
}

/// Notified after each emitted page.
pub trait PageHandler {
    fn on_page(&mut self, page_number: u32, ctx: &LayoutContext);
}

impl<F: FnMut(u32, &LayoutContext)> PageHandler for F {
    fn on_page(&mut self, page_number: u32, ctx: &LayoutContext) {
        self(page_number, ctx)
    }
}

/// An emitted page.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmittedPage {
    pub page_number: u32,
    pub area: PageArea,
}

/// Collects every emitted page in memory.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageCollector {
    pub pages: Vec<EmittedPage>,
    pub auto_texts: Vec<ResolvedAutoText>,
    #[serde(skip)]
    open_page: Option<u32>,
}

impl PageCollector {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ContentEmitter for PageCollector {
    fn start_page(&mut self, _page: &PageArea, content: &PageContent) {
        self.open_page = Some(content.page_number);
    }

    fn end_page(&mut self, page: &PageArea, content: &PageContent) {
        debug_assert_eq!(self.open_page, Some(content.page_number));
        self.open_page = None;
        self.pages.push(EmittedPage {
            page_number: content.page_number,
            area: page.clone(),
        });
    }

    fn start_auto_text(&mut self, resolved: &ResolvedAutoText) {
        for page in &mut self.pages {
            page.area.for_each_text_mut(&mut |text| {
                if text.auto_text.as_deref() == Some(resolved.key.as_str()) {
                    text.text = resolved.text.clone();
                    if let Some(area) = &resolved.area {
                        text.geometry.width = area.geometry.width;
                        text.geometry.height = area.geometry.height;
                    }
                }
            });
        }
        self.auto_texts.push(resolved.clone());
    }
}
