//! # Area Model
//!
//! Laid-out geometry. Every area carries a [`Geometry`]; positions are
//! relative to the parent area, all values are layout units.
//!
//! The page owns a root area, the root owns the header, body and footer
//! regions, and each region owns its content. Nothing here knows how to lay
//! anything out.

use std::slice;

use serde::Serialize;

use crate::font::FontSpec;
use crate::model::Units;

/// Position, size and clipping shared by every area.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Geometry {
    pub x: Units,
    pub y: Units,
    pub width: Units,
    pub height: Units,
    pub clip: bool,
}

impl Geometry {
    pub fn new(x: Units, y: Units, width: Units, height: Units) -> Self {
        Self {
            x,
            y,
            width,
            height,
            clip: false,
        }
    }

    /// Divide position and size by `scale`: the logical box a region needs
    /// so that, drawn at `scale`, it covers its original output size.
    pub fn unscale(&mut self, scale: f64) {
        let div = |v: Units| (v as f64 / scale).round() as Units;
        self.x = div(self.x);
        self.y = div(self.y);
        self.width = div(self.width);
        self.height = div(self.height);
    }
}

/// A laid-out box.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum Area {
    Container(ContainerArea),
    Table(TableArea),
    Text(TextArea),
}

impl Area {
    pub fn geometry(&self) -> &Geometry {
        match self {
            Area::Container(c) => &c.geometry,
            Area::Table(t) => &t.container.geometry,
            Area::Text(t) => &t.geometry,
        }
    }

    pub fn geometry_mut(&mut self) -> &mut Geometry {
        match self {
            Area::Container(c) => &mut c.geometry,
            Area::Table(t) => &mut t.container.geometry,
            Area::Text(t) => &mut t.geometry,
        }
    }

    pub fn width(&self) -> Units {
        self.geometry().width
    }

    pub fn height(&self) -> Units {
        self.geometry().height
    }

    /// Child areas, empty for text.
    pub fn children(&self) -> slice::Iter<'_, Area> {
        match self {
            Area::Container(c) => c.children(),
            Area::Table(t) => t.container.children(),
            Area::Text(_) => {
                let none: &[Area] = &[];
                none.iter()
            }
        }
    }

    pub fn as_table(&self) -> Option<&TableArea> {
        match self {
            Area::Table(t) => Some(t),
            _ => None,
        }
    }

    /// Visit every text area in this subtree.
    pub fn for_each_text_mut(&mut self, f: &mut dyn FnMut(&mut TextArea)) {
        match self {
            Area::Container(c) => c.for_each_text_mut(f),
            Area::Table(t) => t.container.for_each_text_mut(f),
            Area::Text(t) => f(t),
        }
    }
}

/// An area holding an ordered list of children.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerArea {
    #[serde(flatten)]
    pub geometry: Geometry,
    children: Vec<Area>,
}

impl ContainerArea {
    pub fn new(geometry: Geometry) -> Self {
        Self {
            geometry,
            children: Vec::new(),
        }
    }

    pub fn x(&self) -> Units {
        self.geometry.x
    }

    pub fn y(&self) -> Units {
        self.geometry.y
    }

    pub fn width(&self) -> Units {
        self.geometry.width
    }

    pub fn height(&self) -> Units {
        self.geometry.height
    }

    pub fn set_position(&mut self, x: Units, y: Units) {
        self.geometry.x = x;
        self.geometry.y = y;
    }

    pub fn set_width(&mut self, width: Units) {
        self.geometry.width = width;
    }

    pub fn set_height(&mut self, height: Units) {
        self.geometry.height = height;
    }

    pub fn set_clip(&mut self, clip: bool) {
        self.geometry.clip = clip;
    }

    pub fn add_child(&mut self, child: Area) {
        self.children.push(child);
    }

    pub fn children_count(&self) -> usize {
        self.children.len()
    }

    /// Children in insertion order. Call again to restart.
    pub fn children(&self) -> slice::Iter<'_, Area> {
        self.children.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Bottom edge of the lowest child, relative to this container.
    pub fn content_height(&self) -> Units {
        self.children
            .iter()
            .map(|c| c.geometry().y + c.height())
            .max()
            .unwrap_or(0)
    }

    pub fn for_each_text_mut(&mut self, f: &mut dyn FnMut(&mut TextArea)) {
        for child in &mut self.children {
            child.for_each_text_mut(f);
        }
    }
}

/// A table: rows are container children, columns are not modelled as areas.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableArea {
    #[serde(flatten)]
    pub container: ContainerArea,
    /// Sum of the declared column widths, which may exceed the width the
    /// table was given.
    pub allocated_width: Units,
}

impl TableArea {
    pub fn new(geometry: Geometry, allocated_width: Units) -> Self {
        Self {
            container: ContainerArea::new(geometry),
            allocated_width,
        }
    }
}

/// A measured run of text.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextArea {
    #[serde(flatten)]
    pub geometry: Geometry,
    pub text: String,
    pub font: FontSpec,
    /// Set on total-page placeholders: the id emitters patch once the
    /// final text is known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_text: Option<String>,
}

/// The root area: page area minus margins, split into regions.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RootArea {
    #[serde(flatten)]
    pub geometry: Geometry,
    pub header: Option<ContainerArea>,
    pub body: ContainerArea,
    pub footer: Option<ContainerArea>,
}

impl RootArea {
    pub fn width(&self) -> Units {
        self.geometry.width
    }

    pub fn height(&self) -> Units {
        self.geometry.height
    }

    /// Number of regions present; the body is always there.
    pub fn children_count(&self) -> usize {
        1 + self.header.is_some() as usize + self.footer.is_some() as usize
    }
}

/// One page of output.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageArea {
    pub width: Units,
    pub height: Units,
    /// Factor emitters apply when mapping layout units to output units.
    pub scale: f64,
    pub root: RootArea,
}

impl PageArea {
    pub fn header(&self) -> Option<&ContainerArea> {
        self.root.header.as_ref()
    }

    pub fn footer(&self) -> Option<&ContainerArea> {
        self.root.footer.as_ref()
    }

    pub fn body(&self) -> &ContainerArea {
        &self.root.body
    }

    pub fn body_mut(&mut self) -> &mut ContainerArea {
        &mut self.root.body
    }

    pub fn remove_header(&mut self) {
        self.root.header = None;
    }

    pub fn remove_footer(&mut self) {
        self.root.footer = None;
    }

    /// Place the footer directly beneath the body.
    pub fn float_footer(&mut self) {
        let body_bottom = self.root.body.y() + self.root.body.height();
        if let Some(footer) = self.root.footer.as_mut() {
            let x = footer.x();
            footer.set_position(x, body_bottom);
        }
    }

    /// Record `scale` and enlarge the page, the root and every region by
    /// `1 / scale` in layout units. Children keep their size; the emitter
    /// multiplies by `scale` when mapping to output units, so the page comes
    /// out at its declared size with its content shrunk.
    pub fn apply_scale(&mut self, scale: f64) {
        self.scale = scale;
        self.width = (self.width as f64 / scale).round() as Units;
        self.height = (self.height as f64 / scale).round() as Units;
        self.root.geometry.unscale(scale);
        self.root.body.geometry.unscale(scale);
        if let Some(header) = self.root.header.as_mut() {
            header.geometry.unscale(scale);
        }
        if let Some(footer) = self.root.footer.as_mut() {
            footer.geometry.unscale(scale);
        }
    }

    pub fn for_each_text_mut(&mut self, f: &mut dyn FnMut(&mut TextArea)) {
        if let Some(header) = self.root.header.as_mut() {
            header.for_each_text_mut(f);
        }
        self.root.body.for_each_text_mut(f);
        if let Some(footer) = self.root.footer.as_mut() {
            footer.for_each_text_mut(f);
        }
    }
}
