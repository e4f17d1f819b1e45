//! Resolution of the total-page auto text.
//!
//! While pages are laid out, a total-page placeholder only reserves space
//! and registers itself on the context under a key. Once the last page is
//! known each registered placeholder is formatted, measured and handed to the
//! emitter, which patches the text areas carrying that key.

use log::{debug, warn};

use crate::context::LayoutContext;
use crate::emit::ResolvedAutoText;
use crate::font::FontMetrics;
use crate::format::format_number;

use super::stacking::text_area;

/// Resolve every registered placeholder against `page_count`. Placeholders
/// with a malformed pattern are dropped and stay blank.
pub(crate) fn resolve_total_page(
    ctx: &mut LayoutContext,
    metrics: &dyn FontMetrics,
    page_count: u32,
) -> Vec<ResolvedAutoText> {
    let output_format = ctx.output_format().to_string();
    ctx.take_unresolved()
        .into_iter()
        .filter_map(|unresolved| {
            let text = match format_number(page_count as u64, &unresolved.pattern) {
                Ok(text) => text,
                Err(e) => {
                    warn!("total page count for {} left unresolved: {e}", unresolved.key);
                    return None;
                }
            };

            debug!("total page count {} resolved to {text:?} for {output_format}", unresolved.key);
            let mut area = text_area(metrics, &text, &unresolved.font, 0, 0);
            area.auto_text = Some(unresolved.key.clone());
            Some(ResolvedAutoText {
                key: unresolved.key,
                id: unresolved.id,
                text,
                output_format: output_format.clone(),
                area: Some(area),
            })
        })
        .collect()
}
