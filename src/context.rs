//! # Layout Context
//!
//! Configuration and shared state for one render. Created once from
//! [`LayoutOptions`], threaded through every page, and read by the page
//! layout manager, region layout and the fit-to-page scaler.
//!
//! Two pieces of state are mutated mid-render:
//! - `allow_page_break` is switched off while headers and footers are laid
//!   out. Use [`LayoutContext::suppress_page_breaks`]; the returned guard puts
//!   the previous value back when dropped, on every exit path.
//! - the unresolved total-page placeholders, registered wherever they are
//!   laid out and consumed by total-page resolution.

use std::ops::{Deref, DerefMut};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::font::FontSpec;
use crate::layout::page_break::BreakLimits;
use crate::model::{Units, UNBOUNDED};

/// User-facing layout options, as found in a report's `options` object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutOptions {
    #[serde(default = "default_true")]
    pub allow_page_break: bool,
    /// Pages ended by overflow run their post-layout pass from `end_page`
    /// instead of straight after body layout.
    #[serde(default)]
    pub auto_page_break: bool,
    /// Shrink pages whose content overflows the page bounds.
    #[serde(default)]
    pub fit_to_page: bool,
    /// Only explicit page breaks end a page; the body height is unbounded.
    #[serde(default)]
    pub pagination_only: bool,
    /// Name of the output format the pages are laid out for.
    #[serde(default = "default_format")]
    pub output_format: String,
    /// Orphan and widow minimums for splitting blocks and tables.
    #[serde(flatten)]
    pub break_limits: BreakLimits,
}

fn default_true() -> bool {
    true
}

fn default_format() -> String {
    "pdf".to_string()
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            allow_page_break: true,
            auto_page_break: false,
            fit_to_page: false,
            pagination_only: false,
            output_format: default_format(),
            break_limits: BreakLimits::default(),
        }
    }
}

/// A cooperative cancellation flag. Clones share the same flag, so one can
/// be handed to another thread while the render runs.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// A total-page auto text waiting for the last page to be known.
#[derive(Debug, Clone, PartialEq)]
pub struct UnresolvedAutoText {
    /// Carried by every text area laid out for this placeholder.
    pub key: String,
    /// Id of the content node the placeholder came from.
    pub id: Option<String>,
    pub pattern: String,
    pub font: FontSpec,
}

#[derive(Debug, Clone)]
pub struct LayoutContext {
    max_width: Units,
    max_height: Units,
    allow_page_break: bool,
    auto_page_break: bool,
    auto_page_break_pending: bool,
    fit_to_page: bool,
    pagination_only: bool,
    output_format: String,
    break_limits: BreakLimits,
    cancel: CancelToken,
    unresolved: Vec<UnresolvedAutoText>,
    anonymous_keys: u32,
}

impl Default for LayoutContext {
    fn default() -> Self {
        Self::new(&LayoutOptions::default())
    }
}

impl LayoutContext {
    pub fn new(options: &LayoutOptions) -> Self {
        Self {
            max_width: 0,
            max_height: 0,
            allow_page_break: options.allow_page_break,
            auto_page_break: options.auto_page_break,
            auto_page_break_pending: false,
            fit_to_page: options.fit_to_page,
            pagination_only: options.pagination_only,
            output_format: options.output_format.clone(),
            break_limits: options.break_limits,
            cancel: CancelToken::new(),
            unresolved: Vec::new(),
            anonymous_keys: 0,
        }
    }

    pub fn with_cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = token;
        self
    }

    pub fn max_width(&self) -> Units {
        self.max_width
    }

    pub fn set_max_width(&mut self, width: Units) {
        self.max_width = width;
    }

    pub fn max_height(&self) -> Units {
        self.max_height
    }

    pub fn set_max_height(&mut self, height: Units) {
        self.max_height = height;
    }

    /// The height body layout may fill: the body height, or unbounded when
    /// only explicit page breaks end a page.
    pub fn available_height(&self) -> Units {
        if self.pagination_only {
            UNBOUNDED
        } else {
            self.max_height
        }
    }

    pub fn allow_page_break(&self) -> bool {
        self.allow_page_break
    }

    pub fn set_allow_page_break(&mut self, allow: bool) {
        self.allow_page_break = allow;
    }

    /// Disable page breaks until the returned guard is dropped.
    pub fn suppress_page_breaks(&mut self) -> PageBreakGuard<'_> {
        let saved = self.allow_page_break;
        self.allow_page_break = false;
        PageBreakGuard { ctx: self, saved }
    }

    /// Whether overflow breaks are handled as auto page breaks.
    pub fn auto_page_break_enabled(&self) -> bool {
        self.auto_page_break
    }

    /// Whether an auto page break is waiting for `end_page`.
    pub fn auto_page_break(&self) -> bool {
        self.auto_page_break_pending
    }

    pub fn request_auto_page_break(&mut self) {
        self.auto_page_break_pending = true;
    }

    /// Consume a pending auto page break request.
    pub fn take_auto_page_break(&mut self) -> bool {
        std::mem::replace(&mut self.auto_page_break_pending, false)
    }

    pub fn break_limits(&self) -> BreakLimits {
        self.break_limits
    }

    pub fn fit_to_page(&self) -> bool {
        self.fit_to_page
    }

    pub fn pagination_only(&self) -> bool {
        self.pagination_only
    }

    pub fn output_format(&self) -> &str {
        &self.output_format
    }

    pub fn cancel_token(&self) -> &CancelToken {
        &self.cancel
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Register a total-page placeholder and return the key its text area
    /// must carry. A placeholder laid out again on a later page (a repeated
    /// footer, say) gets the key it was given the first time: named ones
    /// match by id, unnamed ones by pattern and font.
    pub fn register_unresolved(&mut self, id: Option<&str>, pattern: &str, font: &FontSpec) -> String {
        let existing = self.unresolved.iter().find(|u| match (id, u.id.as_deref()) {
            (Some(a), Some(b)) => a == b,
            (None, None) => u.pattern == pattern && u.font == *font,
            _ => false,
        });
        if let Some(existing) = existing {
            return existing.key.clone();
        }

        let key = match id {
            Some(id) => id.to_string(),
            None => {
                self.anonymous_keys += 1;
                format!("#total-page-{}", self.anonymous_keys)
            }
        };
        self.unresolved.push(UnresolvedAutoText {
            key: key.clone(),
            id: id.map(str::to_string),
            pattern: pattern.to_string(),
            font: font.clone(),
        });
        key
    }

    pub fn unresolved(&self) -> &[UnresolvedAutoText] {
        &self.unresolved
    }

    pub fn take_unresolved(&mut self) -> Vec<UnresolvedAutoText> {
        std::mem::take(&mut self.unresolved)
    }
}

/// Restores `allow_page_break` when dropped. Derefs to the context so the
/// suppressed region can keep using it.
pub struct PageBreakGuard<'a> {
    ctx: &'a mut LayoutContext,
    saved: bool,
}

impl Deref for PageBreakGuard<'_> {
    type Target = LayoutContext;

    fn deref(&self) -> &LayoutContext {
        self.ctx
    }
}

impl DerefMut for PageBreakGuard<'_> {
    fn deref_mut(&mut self) -> &mut LayoutContext {
        self.ctx
    }
}

impl Drop for PageBreakGuard<'_> {
    fn drop(&mut self) {
        self.ctx.allow_page_break = self.saved;
    }
}
