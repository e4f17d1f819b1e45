//! Block stacking: measuring content nodes and placing them top to bottom
//! inside a container.
//!
//! Body layout and region layout share this code. The difference is the
//! context's `allow_page_break` flag: with breaks allowed, a node that does
//! not fit is split or handed back; without, everything is placed and the
//! container clips.

use log::warn;

use crate::area::{Area, ContainerArea, Geometry, TableArea, TextArea};
use crate::context::LayoutContext;
use crate::font::{FontMetrics, FontSpec};
use crate::format::format_number;
use crate::model::{
    resolve_or_zero, AutoTextKind, ContentKind, ContentNode, Dimension, TableRow, Units,
    LAYOUT_TO_OUTPUT_RATIO,
};

use super::page_break::{BreakDecision, BreakLimits};

/// Result of placing one node.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Placement {
    /// The whole node was placed.
    Placed,
    /// The head of the node was placed; the remainder belongs on the next page.
    Split(ContentNode),
    /// Nothing was placed; the node belongs on the next page.
    Deferred(ContentNode),
    /// An explicit page break.
    Break,
}

/// Build a text area measured with `metrics`.
pub(crate) fn text_area(
    metrics: &dyn FontMetrics,
    text: &str,
    font: &FontSpec,
    x: Units,
    y: Units,
) -> TextArea {
    let width = (metrics.word_width(text, font) * LAYOUT_TO_OUTPUT_RATIO).round() as Units;
    let height = (metrics.word_height(font) * LAYOUT_TO_OUTPUT_RATIO).round() as Units;
    TextArea {
        geometry: Geometry::new(x, y, width, height),
        text: text.to_string(),
        font: font.clone(),
        auto_text: None,
    }
}

pub(crate) struct Stacker<'m> {
    metrics: &'m dyn FontMetrics,
    page_number: u32,
    /// Reference for percentage heights.
    reference_height: Units,
    limits: BreakLimits,
}

impl<'m> Stacker<'m> {
    pub(crate) fn new(metrics: &'m dyn FontMetrics, page_number: u32, reference_height: Units) -> Self {
        Self {
            metrics,
            page_number,
            reference_height,
            limits: BreakLimits::default(),
        }
    }

    pub(crate) fn with_break_limits(mut self, limits: BreakLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Place `node` at `*cursor_y` inside `container`, moving the cursor down
    /// by whatever was placed.
    pub(crate) fn place(
        &self,
        node: ContentNode,
        container: &mut ContainerArea,
        cursor_y: &mut Units,
        max_height: Units,
        ctx: &mut LayoutContext,
    ) -> Placement {
        if matches!(node.kind, ContentKind::PageBreak) {
            return if ctx.allow_page_break() {
                Placement::Break
            } else {
                Placement::Placed
            };
        }

        let width = container.width();
        let remaining = max_height.saturating_sub(*cursor_y).max(0);
        let height = self.measure(&node, width);

        if height <= remaining || !ctx.allow_page_break() {
            self.append(&node, container, cursor_y, ctx);
            return Placement::Placed;
        }

        if let Some((head, tail)) = self.split(&node, remaining, width) {
            self.append(&head, container, cursor_y, ctx);
            return Placement::Split(tail);
        }

        if container.is_empty() {
            // Nothing smaller will come along on the next page either.
            self.append(&node, container, cursor_y, ctx);
            return Placement::Placed;
        }

        Placement::Deferred(node)
    }

    fn append(
        &self,
        node: &ContentNode,
        container: &mut ContainerArea,
        cursor_y: &mut Units,
        ctx: &mut LayoutContext,
    ) {
        let area = self.build(node, 0, *cursor_y, container.width(), ctx);
        *cursor_y += area.height();
        container.add_child(area);
    }

    /// Height `node` takes when laid out `available_width` wide.
    pub(crate) fn measure(&self, node: &ContentNode, available_width: Units) -> Units {
        match &node.kind {
            ContentKind::Block { children, .. } => children
                .iter()
                .map(|c| self.measure(c, available_width))
                .sum(),
            ContentKind::Text { font, .. } | ContentKind::AutoText { font, .. } => {
                (self.metrics.word_height(font) * LAYOUT_TO_OUTPUT_RATIO).round() as Units
            }
            ContentKind::Box { height, .. } => height.resolve(self.reference_height).max(0),
            ContentKind::Table {
                columns,
                header,
                rows,
            } => {
                let widths = column_widths(columns, available_width);
                header
                    .iter()
                    .chain(rows.iter())
                    .map(|row| self.row_height(row, &widths))
                    .sum()
            }
            ContentKind::PageBreak => 0,
        }
    }

    fn row_height(&self, row: &TableRow, widths: &[Units]) -> Units {
        let declared = resolve_or_zero(row.height, self.reference_height);
        row.cells
            .iter()
            .zip(widths)
            .map(|(cell, &w)| self.measure(cell, w))
            .fold(declared, Units::max)
    }

    /// Lay out `node` at `(x, y)` relative to its parent.
    pub(crate) fn build(
        &self,
        node: &ContentNode,
        x: Units,
        y: Units,
        available_width: Units,
        ctx: &mut LayoutContext,
    ) -> Area {
        match &node.kind {
            ContentKind::Block { children, .. } => {
                let mut block = ContainerArea::new(Geometry::new(x, y, available_width, 0));
                let mut child_y = 0;
                for child in children {
                    let area = self.build(child, 0, child_y, available_width, ctx);
                    child_y += area.height();
                    block.add_child(area);
                }
                block.set_height(child_y);
                Area::Container(block)
            }
            ContentKind::Text { text, font } => {
                Area::Text(text_area(self.metrics, text, font, x, y))
            }
            ContentKind::Box { width, height } => Area::Container(ContainerArea::new(Geometry::new(
                x,
                y,
                width.resolve(available_width).max(0),
                height.resolve(self.reference_height).max(0),
            ))),
            ContentKind::Table {
                columns,
                header,
                rows,
            } => self.build_table(columns, header.as_ref(), rows, x, y, available_width, ctx),
            ContentKind::PageBreak => Area::Container(ContainerArea::new(Geometry::new(
                x,
                y,
                available_width,
                0,
            ))),
            ContentKind::AutoText {
                kind: AutoTextKind::PageNumber,
                pattern,
                font,
            } => {
                let text = match format_number(self.page_number as u64, pattern) {
                    Ok(text) => text,
                    Err(e) => {
                        warn!("page number left unresolved: {e}");
                        String::new()
                    }
                };
                Area::Text(text_area(self.metrics, &text, font, x, y))
            }
            ContentKind::AutoText {
                kind: AutoTextKind::TotalPage,
                pattern,
                font,
            } => {
                let key = ctx.register_unresolved(node.id.as_deref(), pattern, font);
                // Reserve the width of the current page number until the
                // real total is known.
                let estimate = format_number(self.page_number as u64, pattern)
                    .unwrap_or_else(|_| self.page_number.to_string());
                let mut area = text_area(self.metrics, &estimate, font, x, y);
                area.text.clear();
                area.auto_text = Some(key);
                Area::Text(area)
            }
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn build_table(
        &self,
        columns: &[Dimension],
        header: Option<&TableRow>,
        rows: &[TableRow],
        x: Units,
        y: Units,
        available_width: Units,
        ctx: &mut LayoutContext,
    ) -> Area {
        let widths = column_widths(columns, available_width);
        let allocated: Units = widths.iter().sum();
        let mut table = TableArea::new(Geometry::new(x, y, available_width, 0), allocated);

        let mut row_y = 0;
        for row in header.into_iter().chain(rows.iter()) {
            let height = self.row_height(row, &widths);
            let mut row_area = ContainerArea::new(Geometry::new(0, row_y, allocated, height));
            let mut cell_x = 0;
            for (i, &w) in widths.iter().enumerate() {
                let mut cell = ContainerArea::new(Geometry::new(cell_x, 0, w, height));
                cell.set_clip(true);
                if let Some(content) = row.cells.get(i) {
                    cell.add_child(self.build(content, 0, 0, w, ctx));
                }
                row_area.add_child(Area::Container(cell));
                cell_x += w;
            }
            table.container.add_child(Area::Container(row_area));
            row_y += height;
        }
        table.container.set_height(row_y);

        Area::Table(table)
    }

    /// Split `node` so that the head fits in `remaining`. `None` when no
    /// useful head exists.
    pub(crate) fn split(
        &self,
        node: &ContentNode,
        remaining: Units,
        width: Units,
    ) -> Option<(ContentNode, ContentNode)> {
        match &node.kind {
            ContentKind::Block {
                children,
                breakable: true,
            } => {
                let heights: Vec<Units> = children.iter().map(|c| self.measure(c, width)).collect();
                let fit = match self.limits.decide(remaining, &heights) {
                    BreakDecision::FitsWhole => return None,
                    BreakDecision::Defer => 0,
                    BreakDecision::SplitAfter(n) => n,
                };
                let used: Units = heights[..fit].iter().sum();

                // The first child that does not fit may split itself. A child
                // held back for widow control stays whole.
                if let Some(next) = children.get(fit).filter(|_| used + heights[fit] > remaining) {
                    if let Some((inner_head, inner_tail)) = self.split(next, remaining - used, width) {
                        let mut head = children[..fit].to_vec();
                        head.push(inner_head);
                        let mut tail = vec![inner_tail];
                        tail.extend_from_slice(&children[fit + 1..]);
                        return Some((
                            block_like(node, head, true),
                            block_like(node, tail, true),
                        ));
                    }
                }

                if fit == 0 {
                    return None;
                }
                Some((
                    block_like(node, children[..fit].to_vec(), true),
                    block_like(node, children[fit..].to_vec(), true),
                ))
            }
            ContentKind::Table {
                columns,
                header,
                rows,
            } => {
                let widths = column_widths(columns, width);
                let header_height = header.as_ref().map_or(0, |h| self.row_height(h, &widths));
                if remaining <= header_height {
                    return None;
                }
                let heights: Vec<Units> = rows.iter().map(|r| self.row_height(r, &widths)).collect();
                match self.limits.decide(remaining - header_height, &heights) {
                    BreakDecision::SplitAfter(items_on_current_page) => {
                        let table = |rows: Vec<TableRow>| ContentNode {
                            id: node.id.clone(),
                            kind: ContentKind::Table {
                                columns: columns.clone(),
                                header: header.clone(),
                                rows,
                            },
                        };
                        Some((
                            table(rows[..items_on_current_page].to_vec()),
                            table(rows[items_on_current_page..].to_vec()),
                        ))
                    }
                    BreakDecision::FitsWhole | BreakDecision::Defer => None,
                }
            }
            _ => None,
        }
    }
}

fn block_like(node: &ContentNode, children: Vec<ContentNode>, breakable: bool) -> ContentNode {
    ContentNode {
        id: node.id.clone(),
        kind: ContentKind::Block {
            children,
            breakable,
        },
    }
}

fn column_widths(columns: &[Dimension], available_width: Units) -> Vec<Units> {
    columns
        .iter()
        .map(|c| c.resolve(available_width).max(0))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::StandardFontMetrics;

    // 10pt text is 12pt tall with the standard metrics.
    const LINE: Units = 12_000;

    fn text(s: &str) -> ContentNode {
        ContentNode::new(ContentKind::Text {
            text: s.to_string(),
            font: FontSpec::sized(10.0),
        })
    }

    fn block(children: Vec<ContentNode>) -> ContentNode {
        ContentNode::new(ContentKind::Block {
            children,
            breakable: true,
        })
    }

    fn row(label: &str) -> TableRow {
        TableRow {
            cells: vec![text(label), text("value")],
            height: None,
        }
    }

    fn table(rows: usize) -> ContentNode {
        ContentNode::new(ContentKind::Table {
            columns: vec![Dimension::Units(60_000), Dimension::Units(60_000)],
            header: Some(row("Name")),
            rows: (0..rows).map(|i| row(&format!("Item {i}"))).collect(),
        })
    }

    fn body(height: Units) -> ContainerArea {
        ContainerArea::new(Geometry::new(0, 0, 100_000, height))
    }

    #[test]
    fn block_height_is_sum_of_children() {
        let metrics = StandardFontMetrics::new();
        let stacker = Stacker::new(&metrics, 1, 0);
        assert_eq!(stacker.measure(&block(vec![text("a"), text("b")]), 100_000), 2 * LINE);
    }

    #[test]
    fn fitting_node_is_placed() {
        let metrics = StandardFontMetrics::new();
        let stacker = Stacker::new(&metrics, 1, 0);
        let mut ctx = LayoutContext::default();
        let mut container = body(100_000);
        let mut y = 0;
        let placement = stacker.place(text("hello"), &mut container, &mut y, 100_000, &mut ctx);
        assert_eq!(placement, Placement::Placed);
        assert_eq!(y, LINE);
        assert_eq!(container.children_count(), 1);
    }

    #[test]
    fn block_splits_between_children() {
        let metrics = StandardFontMetrics::new();
        let stacker = Stacker::new(&metrics, 1, 0);
        let mut ctx = LayoutContext::default();
        let mut container = body(3 * LINE);
        let mut y = 0;
        let lines: Vec<ContentNode> = (0..5).map(|i| text(&format!("line {i}"))).collect();
        let placement = stacker.place(block(lines), &mut container, &mut y, 3 * LINE, &mut ctx);
        match placement {
            Placement::Split(rest) => {
                assert_eq!(stacker.measure(&rest, 100_000), 2 * LINE);
            }
            other => panic!("expected split, got {other:?}"),
        }
        assert_eq!(y, 3 * LINE);
    }

    #[test]
    fn nested_block_splits_inside() {
        let metrics = StandardFontMetrics::new();
        let stacker = Stacker::new(&metrics, 1, 0);
        let inner = block((0..4).map(|i| text(&format!("inner {i}"))).collect());
        let outer = block(vec![text("intro"), inner]);
        let (head, tail) = stacker.split(&outer, 3 * LINE, 100_000).unwrap();
        assert_eq!(stacker.measure(&head, 100_000), 3 * LINE);
        assert_eq!(stacker.measure(&tail, 100_000), 2 * LINE);
    }

    #[test]
    fn unbreakable_node_is_deferred_on_used_page() {
        let metrics = StandardFontMetrics::new();
        let stacker = Stacker::new(&metrics, 1, 0);
        let mut ctx = LayoutContext::default();
        let mut container = body(2 * LINE);
        let mut y = 0;
        stacker.place(text("first"), &mut container, &mut y, 2 * LINE, &mut ctx);
        let tall = ContentNode::new(ContentKind::Box {
            width: Dimension::Units(10_000),
            height: Dimension::Units(5 * LINE),
        });
        let placement = stacker.place(tall.clone(), &mut container, &mut y, 2 * LINE, &mut ctx);
        assert_eq!(placement, Placement::Deferred(tall));
        assert_eq!(container.children_count(), 1);
    }

    #[test]
    fn oversized_node_is_placed_on_empty_page() {
        let metrics = StandardFontMetrics::new();
        let stacker = Stacker::new(&metrics, 1, 0);
        let mut ctx = LayoutContext::default();
        let mut container = body(2 * LINE);
        let mut y = 0;
        let tall = ContentNode::new(ContentKind::Box {
            width: Dimension::Units(10_000),
            height: Dimension::Units(5 * LINE),
        });
        let placement = stacker.place(tall, &mut container, &mut y, 2 * LINE, &mut ctx);
        assert_eq!(placement, Placement::Placed);
        assert_eq!(y, 5 * LINE);
    }

    #[test]
    fn table_split_repeats_header() {
        let metrics = StandardFontMetrics::new();
        let stacker = Stacker::new(&metrics, 1, 0);
        let (head, tail) = stacker.split(&table(6), 4 * LINE, 100_000).unwrap();
        // header + 3 rows here, header + 3 rows on the next page
        assert_eq!(stacker.measure(&head, 100_000), 4 * LINE);
        assert_eq!(stacker.measure(&tail, 100_000), 4 * LINE);
        match tail.kind {
            ContentKind::Table { header, rows, .. } => {
                assert!(header.is_some());
                assert_eq!(rows.len(), 3);
            }
            other => panic!("expected table, got {other:?}"),
        }
    }

    #[test]
    fn table_reports_allocated_width() {
        let metrics = StandardFontMetrics::new();
        let stacker = Stacker::new(&metrics, 1, 0);
        let mut ctx = LayoutContext::default();
        let area = stacker.build(&table(1), 0, 0, 100_000, &mut ctx);
        let table = area.as_table().unwrap();
        assert_eq!(table.allocated_width, 120_000);
        assert_eq!(table.container.children_count(), 2);
        assert_eq!(area.height(), 2 * LINE);
    }

    #[test]
    fn page_break_ignored_without_breaks() {
        let metrics = StandardFontMetrics::new();
        let stacker = Stacker::new(&metrics, 1, 0);
        let mut ctx = LayoutContext::default();
        let mut container = body(LINE);
        let mut y = 0;
        let brk = ContentNode::new(ContentKind::PageBreak);
        assert_eq!(
            stacker.place(brk.clone(), &mut container, &mut y, LINE, &mut ctx),
            Placement::Break
        );
        let mut guard = ctx.suppress_page_breaks();
        assert_eq!(
            stacker.place(brk, &mut container, &mut y, LINE, &mut guard),
            Placement::Placed
        );
    }

    #[test]
    fn total_page_registers_placeholder() {
        let metrics = StandardFontMetrics::new();
        let stacker = Stacker::new(&metrics, 2, 0);
        let mut ctx = LayoutContext::default();
        let node = ContentNode::new(ContentKind::AutoText {
            kind: AutoTextKind::TotalPage,
            pattern: "0".to_string(),
            font: FontSpec::sized(10.0),
        })
        .with_id("total");
        let area = stacker.build(&node, 0, 0, 100_000, &mut ctx);
        let unresolved = &ctx.unresolved()[0];
        assert_eq!(unresolved.id.as_deref(), Some("total"));
        match area {
            Area::Text(t) => {
                assert_eq!(t.auto_text.as_deref(), Some("total"));
                assert!(t.text.is_empty());
                assert!(t.geometry.width > 0);
            }
            other => panic!("expected text, got {other:?}"),
        }
    }

    #[test]
    fn unnamed_total_page_gets_a_key() {
        let metrics = StandardFontMetrics::new();
        let stacker = Stacker::new(&metrics, 1, 0);
        let mut ctx = LayoutContext::default();
        let node = ContentNode::new(ContentKind::AutoText {
            kind: AutoTextKind::TotalPage,
            pattern: "0".to_string(),
            font: FontSpec::sized(10.0),
        });
        let first = stacker.build(&node, 0, 0, 100_000, &mut ctx);
        let again = stacker.build(&node, 0, 0, 100_000, &mut ctx);

        let key = |area: &Area| match area {
            Area::Text(t) => t.auto_text.clone(),
            other => panic!("expected text, got {other:?}"),
        };
        assert!(key(&first).is_some());
        assert_eq!(key(&first), key(&again));
        assert_eq!(ctx.unresolved().len(), 1);
        assert_eq!(Some(ctx.unresolved()[0].key.clone()), key(&first));
    }

    #[test]
    fn widow_limit_holds_lines_back() {
        let metrics = StandardFontMetrics::new();
        let stacker = Stacker::new(&metrics, 1, 0).with_break_limits(BreakLimits::new(1, 3));
        let lines: Vec<ContentNode> = (0..10).map(|i| text(&format!("line {i}"))).collect();
        let (head, tail) = stacker.split(&block(lines), 8 * LINE + 100, 100_000).unwrap();
        let count = |node: &ContentNode| match &node.kind {
            ContentKind::Block { children, .. } => children.len(),
            _ => 0,
        };
        assert_eq!((count(&head), count(&tail)), (7, 3));
    }

    #[test]
    fn orphan_limit_defers_whole_block() {
        let metrics = StandardFontMetrics::new();
        let stacker = Stacker::new(&metrics, 1, 0).with_break_limits(BreakLimits::new(2, 1));
        let mut ctx = LayoutContext::default();
        let mut container = body(LINE * 5);
        let mut y = 0;
        stacker.place(text("intro"), &mut container, &mut y, LINE * 5, &mut ctx);
        stacker.place(text("more"), &mut container, &mut y, LINE * 5, &mut ctx);
        stacker.place(text("more"), &mut container, &mut y, LINE * 5, &mut ctx);
        stacker.place(text("more"), &mut container, &mut y, LINE * 5, &mut ctx);

        let para = block(vec![text("a"), text("b"), text("c")]);
        assert!(matches!(
            stacker.place(para, &mut container, &mut y, LINE * 5, &mut ctx),
            Placement::Deferred(_)
        ));
    }

    #[test]
    fn page_number_is_formatted() {
        let metrics = StandardFontMetrics::new();
        let stacker = Stacker::new(&metrics, 4, 0);
        let mut ctx = LayoutContext::default();
        let node = ContentNode::new(ContentKind::AutoText {
            kind: AutoTextKind::PageNumber,
            pattern: "'Page '0".to_string(),
            font: FontSpec::default(),
        });
        match stacker.build(&node, 0, 0, 100_000, &mut ctx) {
            Area::Text(t) => assert_eq!(t.text, "Page 4"),
            other => panic!("expected text, got {other:?}"),
        }
    }
}
