//! # Page Layout Manager
//!
//! Drives one page at a time through its lifecycle:
//!
//! ```text
//! Init → HeaderFooterBuilt → BodyLaidOut → Finalized → Emitted
//!   └──────────────── any state ───────────────→ Cancelled
//! ```
//!
//! The manager is reused for every page of a render. Each call to
//! [`PageLayoutManager::layout`] builds a fresh [`PageArea`], fills it from
//! the executor's body cursor, and either emits it or drops it.
//!
//! Empty pages are suppressed, with two exceptions kept on purpose: the
//! first page of a document is always emitted (a report with no content
//! still produces one page), and an empty *last* page gives its number back
//! and still triggers total-page resolution.

use log::{debug, info};

use crate::area::{ContainerArea, Geometry, PageArea, RootArea};
use crate::context::LayoutContext;
use crate::emit::{ContentEmitter, PageHandler};
use crate::error::LayoutError;
use crate::executor::ContentExecutor;
use crate::font::FontMetrics;
use crate::model::{
    resolve_or_zero, MasterPage, PageContent, Units, DEFAULT_PAGE_HEIGHT, DEFAULT_PAGE_WIDTH,
};

use super::fit::{fit_to_page, preferred_width};
use super::region::layout_region;
use super::stacking::{Placement, Stacker};
use super::total_page::resolve_total_page;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageState {
    Init,
    HeaderFooterBuilt,
    BodyLaidOut,
    Finalized,
    Emitted,
    Cancelled,
}

/// The collaborators a render talks to.
pub struct Collaborators<'a> {
    pub executor: &'a mut dyn ContentExecutor,
    pub emitter: &'a mut dyn ContentEmitter,
    pub metrics: &'a dyn FontMetrics,
    pub page_handler: Option<&'a mut dyn PageHandler>,
}

pub struct PageLayoutManager<'a> {
    ctx: &'a mut LayoutContext,
    io: Collaborators<'a>,
    state: PageState,
    page: Option<PageArea>,
    page_content: Option<PageContent>,
    page_number: u32,
    is_first: bool,
    is_last: bool,
    total_page_resolved: bool,
    /// Width and height body content may use on the current page.
    max_available_width: Units,
    max_available_height: Units,
    /// Bottom of the body content placed so far.
    current_bp: Units,
    pages_emitted: u32,
    last_page_number: u32,
}

impl<'a> PageLayoutManager<'a> {
    pub fn new(ctx: &'a mut LayoutContext, io: Collaborators<'a>) -> Self {
        Self {
            ctx,
            io,
            state: PageState::Init,
            page: None,
            page_content: None,
            page_number: 1,
            is_first: true,
            is_last: false,
            total_page_resolved: false,
            max_available_width: 0,
            max_available_height: 0,
            current_bp: 0,
            pages_emitted: 0,
            last_page_number: 0,
        }
    }

    pub fn state(&self) -> PageState {
        self.state
    }

    /// Number the next page will get.
    pub fn page_number(&self) -> u32 {
        self.page_number
    }

    pub fn pages_emitted(&self) -> u32 {
        self.pages_emitted
    }

    /// Number of the last emitted page, 0 before the first.
    pub fn last_page_number(&self) -> u32 {
        self.last_page_number
    }

    pub fn is_last(&self) -> bool {
        self.is_last
    }

    /// The page being laid out, until it is emitted or dropped.
    pub fn page(&self) -> Option<&PageArea> {
        self.page.as_ref()
    }

    pub fn context(&self) -> &LayoutContext {
        self.ctx
    }

    /// Lay out one page. Returns whether more content remains for the
    /// following pages.
    pub fn layout(&mut self) -> Result<bool, LayoutError> {
        if self.state == PageState::Cancelled {
            return Ok(false);
        }
        if self.ctx.is_cancelled() {
            self.cancel();
            return Ok(false);
        }

        self.start_page()?;
        self.initialize();
        let more = self.layout_body()?;
        if !more {
            self.is_last = true;
        }
        if !self.ctx.auto_page_break() {
            self.close_layout();
        }
        self.end_page();
        Ok(more)
    }

    /// Abandon the current page. Nothing already emitted is taken back.
    pub fn cancel(&mut self) {
        info!("layout cancelled before page {}", self.page_number);
        self.page = None;
        self.page_content = None;
        self.state = PageState::Cancelled;
    }

    fn start_page(&mut self) -> Result<(), LayoutError> {
        let content = self.io.executor.execute_master_page(self.page_number)?;
        debug!("page {}: start ({})", self.page_number, content.master.name);
        self.page = Some(create_root(&content.master));
        self.page_content = Some(content);
        self.current_bp = 0;
        self.state = PageState::Init;
        Ok(())
    }

    /// Build the header and footer, size the body, and set the space
    /// available to body content.
    fn initialize(&mut self) {
        let (Some(page), Some(content)) = (self.page.as_mut(), self.page_content.as_ref()) else {
            return;
        };

        self.ctx.set_max_height(page.root.height());
        self.ctx.set_max_width(page.root.width());

        // Percent heights inside a region resolve against that region.
        if let (Some(header), Some(node)) = (page.root.header.as_mut(), content.header()) {
            let stacker = Stacker::new(self.io.metrics, self.page_number, header.height());
            layout_region(node, header, self.ctx, &stacker);
        }
        if let (Some(footer), Some(node)) = (page.root.footer.as_mut(), content.footer()) {
            let stacker = Stacker::new(self.io.metrics, self.page_number, footer.height());
            layout_region(node, footer, self.ctx, &stacker);
        }

        update_body_size(page);

        self.ctx.set_max_height(page.body().height());
        self.ctx.set_max_width(page.body().width());
        self.max_available_width = self.ctx.max_width();
        self.max_available_height = self.ctx.available_height();
        self.current_bp = 0;
        self.state = PageState::HeaderFooterBuilt;
    }

    /// Pull body content until the page is full or the body is exhausted.
    fn layout_body(&mut self) -> Result<bool, LayoutError> {
        let Some(page) = self.page.as_mut() else {
            return Ok(false);
        };
        let stacker = Stacker::new(self.io.metrics, self.page_number, self.ctx.max_height())
            .with_break_limits(self.ctx.break_limits());

        let more = loop {
            let Some(node) = self.io.executor.next_body()? else {
                break false;
            };
            match stacker.place(
                node,
                &mut page.root.body,
                &mut self.current_bp,
                self.max_available_height,
                self.ctx,
            ) {
                Placement::Placed => {}
                Placement::Split(rest) | Placement::Deferred(rest) => {
                    self.io.executor.defer(rest);
                    if self.ctx.auto_page_break_enabled() {
                        self.ctx.request_auto_page_break();
                    }
                    break true;
                }
                Placement::Break => break true,
            }
        };

        debug!(
            "page {}: body laid out, {} areas, {} units tall, more content: {}",
            self.page_number,
            page.body().children_count(),
            self.current_bp,
            more
        );
        self.state = PageState::BodyLaidOut;
        Ok(more)
    }

    /// Post-layout adjustments: fit-to-page scaling.
    fn close_layout(&mut self) {
        if !self.ctx.fit_to_page() {
            return;
        }
        if let Some(page) = self.page.as_mut() {
            let width = preferred_width(page.body());
            if let Some(scale) = fit_to_page(
                page,
                self.ctx.max_width(),
                self.ctx.max_height(),
                width,
                self.current_bp,
            ) {
                debug!("page {}: scaled by {scale:.4}", self.page_number);
            }
        }
    }

    /// Run post-layout work now instead of in `layout`.
    fn auto_page_break(&mut self) {
        debug!("page {}: auto page break", self.page_number);
        self.close_layout();
    }

    fn is_page_empty(&self) -> bool {
        self.page.as_ref().map_or(true, |p| p.body().is_empty())
    }

    fn end_page(&mut self) {
        if self.ctx.take_auto_page_break() {
            self.auto_page_break();
        }
        self.state = PageState::Finalized;

        if self.is_page_empty() && !self.is_first {
            debug!("page {}: empty, not emitted", self.page_number);
            self.page = None;
            self.page_content = None;
            if self.is_last {
                self.page_number = self.page_number.saturating_sub(1);
                self.resolve_total_page();
            }
            return;
        }

        let (Some(mut page), Some(content)) = (self.page.take(), self.page_content.take()) else {
            return;
        };

        if let Some(options) = content.master.simple_options() {
            if self.is_first && !options.show_header_on_first {
                page.remove_header();
            }
            if self.is_last && !options.show_footer_on_last {
                page.remove_footer();
            }
            if options.floating_footer {
                let content_height = self.current_bp.min(page.body().height());
                page.body_mut().set_height(content_height);
                page.float_footer();
            }
        }
        self.is_first = false;

        self.io.emitter.start_page(&page, &content);
        self.io.emitter.end_page(&page, &content);
        self.state = PageState::Emitted;
        self.pages_emitted += 1;
        self.last_page_number = self.page_number;
        debug!("page {}: emitted", self.page_number);

        if let Some(handler) = self.io.page_handler.as_mut() {
            handler.on_page(self.page_number, self.ctx);
        }
        if self.is_last {
            self.resolve_total_page();
        }
        self.page_number += 1;
    }

    fn resolve_total_page(&mut self) {
        if self.total_page_resolved {
            return;
        }
        self.total_page_resolved = true;
        for resolved in resolve_total_page(self.ctx, self.io.metrics, self.page_number) {
            self.io.emitter.start_auto_text(&resolved);
        }
    }
}

/// Build the page area and its regions from a master page.
pub fn create_root(master: &MasterPage) -> PageArea {
    let mut page_width = master.page_width.map_or(0, |d| d.resolve(0));
    if page_width <= 0 {
        debug!("page width undeclared, using {DEFAULT_PAGE_WIDTH}");
        page_width = DEFAULT_PAGE_WIDTH;
    }
    let mut page_height = master.page_height.map_or(0, |d| d.resolve(0));
    if page_height <= 0 {
        debug!("page height undeclared, using {DEFAULT_PAGE_HEIGHT}");
        page_height = DEFAULT_PAGE_HEIGHT;
    }

    // Margin percentages are relative to the page width on every edge.
    let margin = &master.margin;
    let root_left = resolve_or_zero(margin.left, page_width).clamp(0, page_width);
    let root_top = resolve_or_zero(margin.top, page_width).clamp(0, page_height);
    let mut root_right = resolve_or_zero(margin.right, page_width).max(0);
    let mut root_bottom = resolve_or_zero(margin.bottom, page_width).max(0);
    if root_left + root_right > page_width {
        root_right = 0;
    }
    if root_top + root_bottom > page_height {
        root_bottom = 0;
    }
    let root_width = page_width - root_left - root_right;
    let root_height = page_height - root_top - root_bottom;
    let mut root_geometry = Geometry::new(root_left, root_top, root_width, root_height);
    root_geometry.clip = true;

    let header_height = resolve_or_zero(master.header_height, root_height).clamp(0, root_height);
    let header = ContainerArea::new(Geometry::new(0, 0, root_width, header_height));

    let footer_height =
        resolve_or_zero(master.footer_height, root_height).clamp(0, root_height - header_height);
    let footer = ContainerArea::new(Geometry::new(
        0,
        root_height - footer_height,
        root_width,
        footer_height,
    ));

    let body_left = resolve_or_zero(master.left_width, root_width).clamp(0, root_width);
    let body_right = resolve_or_zero(master.right_width, root_width).clamp(0, root_width - body_left);
    let mut body = ContainerArea::new(Geometry::new(
        body_left,
        header_height,
        root_width - body_left - body_right,
        root_height - header_height - footer_height,
    ));
    body.set_clip(true);

    PageArea {
        width: page_width,
        height: page_height,
        scale: 1.0,
        root: RootArea {
            geometry: root_geometry,
            header: Some(header),
            body,
            footer: Some(footer),
        },
    }
}

/// Reconcile region heights: drop regions that leave no room for the body,
/// then give the body whatever is left.
pub fn update_body_size(page: &mut PageArea) {
    let root_height = page.root.height();

    if page.header().is_some_and(|h| h.height() >= root_height) {
        info!("header taller than the page root, removed");
        page.remove_header();
    }
    if page.footer().is_some_and(|f| f.height() >= root_height) {
        info!("footer taller than the page root, removed");
        page.remove_footer();
    }
    if let (Some(header), Some(footer)) = (page.header(), page.footer()) {
        if header.height() + footer.height() >= root_height {
            info!("header and footer fill the page root, both removed");
            page.remove_header();
            page.remove_footer();
        }
    }

    let header_height = page.header().map_or(0, |h| h.height());
    let footer_height = page.footer().map_or(0, |f| f.height());

    let body = page.body_mut();
    let body_x = body.x();
    body.set_height(root_height - header_height - footer_height);
    body.set_position(body_x, header_height);
    let body_height = body.height();

    if let Some(footer) = page.root.footer.as_mut() {
        let footer_x = footer.x();
        footer.set_position(footer_x, header_height + body_height);
    }
}
