//! Header and footer regions.
//!
//! A region never spans pages: its content is laid out in one pass with page
//! breaks suppressed, and whatever does not fit is clipped by the region.

use crate::area::ContainerArea;
use crate::context::LayoutContext;
use crate::model::{ContentKind, ContentNode};

use super::stacking::Stacker;

/// Lay out `content` into `container`. The context's `allow_page_break`
/// flag is off for the duration of the call and restored afterwards.
pub(crate) fn layout_region(
    content: &ContentNode,
    container: &mut ContainerArea,
    ctx: &mut LayoutContext,
    stacker: &Stacker<'_>,
) {
    let mut ctx = ctx.suppress_page_breaks();
    container.set_clip(true);

    let height = container.height();
    let mut cursor_y = 0;
    match &content.kind {
        ContentKind::Block { children, .. } => {
            for child in children {
                stacker.place(child.clone(), container, &mut cursor_y, height, &mut ctx);
            }
        }
        _ => {
            stacker.place(content.clone(), container, &mut cursor_y, height, &mut ctx);
        }
    }
}
