//! # Content Model
//!
//! The input representation for the pagination engine. A report is a master
//! page (page geometry plus header and footer content) and a stream of body
//! nodes. The engine never sees the whole body at once: nodes are pulled from
//! a [`crate::executor::ContentExecutor`] one at a time, and whatever does not
//! fit on the current page is handed back to it for the next one.
//!
//! Content kinds are a closed set. Anything the layout engine needs to know
//! about a node lives on its variant, so placement is a plain `match`.

use serde::{Deserialize, Serialize};

use crate::context::LayoutOptions;
use crate::font::FontSpec;

/// Layout units: 1/1000 of a point.
pub type Units = i64;

/// Points to layout units.
pub const LAYOUT_TO_OUTPUT_RATIO: f64 = 1000.0;

/// Page width used when the master page declares none (or a non-positive one).
pub const DEFAULT_PAGE_WIDTH: Units = 595_275;

/// Page height used when the master page declares none (or a non-positive one).
pub const DEFAULT_PAGE_HEIGHT: Units = 841_889;

/// Available height when only explicit page breaks end a page.
pub const UNBOUNDED: Units = Units::MAX;

/// A complete report ready for pagination.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    /// Layout options applied to the whole render.
    #[serde(default)]
    pub options: LayoutOptions,

    /// The master page every page of the report is built from.
    #[serde(default)]
    pub master_page: MasterPage,

    /// Body content, in document order.
    #[serde(default)]
    pub body: Vec<ContentNode>,
}

/// A length as declared in the report.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Dimension {
    /// Already in layout units.
    Units(Units),
    Points(f64),
    Millimeters(f64),
    Inches(f64),
    /// Percentage of a reference length chosen by the caller.
    Percent(f64),
}

impl Dimension {
    /// Convert to layout units. `reference` is only used by percentages.
    pub fn resolve(&self, reference: Units) -> Units {
        match *self {
            Dimension::Units(v) => v,
            Dimension::Points(pt) => (pt * LAYOUT_TO_OUTPUT_RATIO).round() as Units,
            Dimension::Millimeters(mm) => (mm * 72.0 / 25.4 * LAYOUT_TO_OUTPUT_RATIO).round() as Units,
            Dimension::Inches(inch) => (inch * 72.0 * LAYOUT_TO_OUTPUT_RATIO).round() as Units,
            Dimension::Percent(p) => (reference as f64 * p / 100.0).round() as Units,
        }
    }
}

/// Resolve an optional dimension, treating a missing one as zero.
pub fn resolve_or_zero(dim: Option<Dimension>, reference: Units) -> Units {
    dim.map(|d| d.resolve(reference)).unwrap_or(0)
}

/// Page margins. Missing edges are zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Margins {
    #[serde(default)]
    pub top: Option<Dimension>,
    #[serde(default)]
    pub right: Option<Dimension>,
    #[serde(default)]
    pub bottom: Option<Dimension>,
    #[serde(default)]
    pub left: Option<Dimension>,
}

impl Margins {
    pub fn uniform(dim: Dimension) -> Self {
        Self {
            top: Some(dim),
            right: Some(dim),
            bottom: Some(dim),
            left: Some(dim),
        }
    }
}

/// Per-page header/footer rules a simple master page can declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimplePageOptions {
    #[serde(default = "default_true")]
    pub show_header_on_first: bool,
    #[serde(default = "default_true")]
    pub show_footer_on_last: bool,
    /// Place the footer directly under the body content instead of at the
    /// bottom of the page.
    #[serde(default)]
    pub floating_footer: bool,
}

impl Default for SimplePageOptions {
    fn default() -> Self {
        Self {
            show_header_on_first: true,
            show_footer_on_last: true,
            floating_footer: false,
        }
    }
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum MasterPageVariant {
    Simple(SimplePageOptions),
    /// No first/last page rules.
    #[default]
    Free,
}

/// Page geometry and the header/footer content repeated on every page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MasterPage {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub page_width: Option<Dimension>,
    #[serde(default)]
    pub page_height: Option<Dimension>,
    #[serde(default)]
    pub margin: Margins,
    #[serde(default)]
    pub header_height: Option<Dimension>,
    #[serde(default)]
    pub footer_height: Option<Dimension>,
    /// Inset of the body from the left edge of the root area.
    #[serde(default)]
    pub left_width: Option<Dimension>,
    /// Inset of the body from the right edge of the root area.
    #[serde(default)]
    pub right_width: Option<Dimension>,
    #[serde(default)]
    pub header: Option<ContentNode>,
    #[serde(default)]
    pub footer: Option<ContentNode>,
    #[serde(default)]
    pub variant: MasterPageVariant,
}

impl MasterPage {
    pub fn simple_options(&self) -> Option<&SimplePageOptions> {
        match &self.variant {
            MasterPageVariant::Simple(options) => Some(options),
            MasterPageVariant::Free => None,
        }
    }
}

/// A master page executed for one page number.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageContent {
    pub page_number: u32,
    pub master: MasterPage,
}

impl PageContent {
    pub fn header(&self) -> Option<&ContentNode> {
        self.master.header.as_ref()
    }

    pub fn footer(&self) -> Option<&ContentNode> {
        self.master.footer.as_ref()
    }
}

/// A node in the content tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentNode {
    /// Optional identifier, carried onto auto-text areas so emitters can
    /// patch them once resolved.
    #[serde(default)]
    pub id: Option<String>,

    pub kind: ContentKind,
}

impl ContentNode {
    pub fn new(kind: ContentKind) -> Self {
        Self { id: None, kind }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ContentKind {
    /// A vertical stack of children. Breakable blocks split between children.
    Block {
        #[serde(default)]
        children: Vec<ContentNode>,
        #[serde(default = "default_true")]
        breakable: bool,
    },

    /// A single run of text, measured with the font-metrics provider.
    Text {
        text: String,
        #[serde(default)]
        font: FontSpec,
    },

    /// An opaque box of fixed size (images, charts, anything pre-sized).
    Box { width: Dimension, height: Dimension },

    /// A table. Rows never split; the table splits between rows and repeats
    /// its header row on every continuation page.
    Table {
        columns: Vec<Dimension>,
        #[serde(default)]
        header: Option<TableRow>,
        #[serde(default)]
        rows: Vec<TableRow>,
    },

    /// Forces the rest of the body onto the next page.
    PageBreak,

    /// Text computed by the engine itself.
    AutoText {
        kind: AutoTextKind,
        /// Numeric pattern, e.g. `"#,##0"` or `"'Page '0"`.
        #[serde(default)]
        pattern: String,
        #[serde(default)]
        font: FontSpec,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableRow {
    /// One node per column. Missing cells stay empty.
    #[serde(default)]
    pub cells: Vec<ContentNode>,
    /// Minimum row height.
    #[serde(default)]
    pub height: Option<Dimension>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AutoTextKind {
    PageNumber,
    /// Deferred: known only once the last page has been laid out.
    TotalPage,
}
