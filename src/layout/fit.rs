//! Fit-to-page: shrink a page whose content overflows its bounds.
//!
//! The whole page is scaled by one factor. Children are never scaled on
//! their own; emitters apply [`PageArea::scale`] when mapping to output units.

use log::debug;

use crate::area::{Area, ContainerArea, PageArea};
use crate::model::Units;

/// Right edge of the widest child.
pub(crate) fn preferred_width(body: &ContainerArea) -> Units {
    body.children()
        .map(|child| child.geometry().x + child.width())
        .max()
        .unwrap_or(0)
}

/// Scale `page` so that content of the preferred size fits in
/// `max_width` × `max_height`. Returns the applied scale, if any.
///
/// Tables count at their allocated width. The page and its regions grow by
/// `1 / scale` in layout units, so the body ends up at least
/// `preferred_height` tall with the footer beneath it.
pub fn fit_to_page(
    page: &mut PageArea,
    max_width: Units,
    max_height: Units,
    preferred_width: Units,
    preferred_height: Units,
) -> Option<f64> {
    if page.body().is_empty() {
        return None;
    }

    let preferred_width = page
        .body()
        .children()
        .filter_map(Area::as_table)
        .map(|t| t.allocated_width)
        .fold(preferred_width, Units::max);

    if preferred_width <= max_width && preferred_height <= max_height {
        return None;
    }

    let scale = f64::min(
        max_width as f64 / preferred_width as f64,
        max_height as f64 / preferred_height as f64,
    );
    if !(scale > 0.0 && scale.is_finite()) {
        return None;
    }

    debug!(
        "fit to page: preferred {}x{} in {}x{}, scale {:.4}",
        preferred_width, preferred_height, max_width, max_height, scale
    );
    page.apply_scale(scale);
    // rounding can leave the grown body a unit short
    if page.body().height() < preferred_height {
        page.body_mut().set_height(preferred_height);
        page.float_footer();
    }
    Some(scale)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::area::{Geometry, RootArea, TableArea};

    fn page(body_width: Units, body_height: Units) -> PageArea {
        PageArea {
            width: body_width,
            height: body_height + 20_000,
            scale: 1.0,
            root: RootArea {
                geometry: Geometry::new(0, 0, body_width, body_height + 20_000),
                header: None,
                body: ContainerArea::new(Geometry::new(0, 0, body_width, body_height)),
                footer: Some(ContainerArea::new(Geometry::new(0, body_height, body_width, 20_000))),
            },
        }
    }

    fn boxed(width: Units, height: Units) -> Area {
        Area::Container(ContainerArea::new(Geometry::new(0, 0, width, height)))
    }

    #[test]
    fn empty_body_is_left_alone() {
        let mut p = page(100_000, 100_000);
        assert_eq!(fit_to_page(&mut p, 100_000, 100_000, 200_000, 100_000), None);
        assert_eq!(p.scale, 1.0);
    }

    #[test]
    fn fitting_content_is_not_scaled() {
        let mut p = page(100_000, 100_000);
        p.body_mut().add_child(boxed(50_000, 50_000));
        assert_eq!(fit_to_page(&mut p, 100_000, 100_000, 50_000, 50_000), None);
        assert_eq!(p.width, 100_000);
    }

    #[test]
    fn table_allocated_width_counts() {
        let mut p = page(100_000, 100_000);
        p.body_mut()
            .add_child(Area::Table(TableArea::new(Geometry::new(0, 0, 100_000, 10_000), 400_000)));
        let scale = fit_to_page(&mut p, 100_000, 100_000, 100_000, 10_000).unwrap();
        assert!((scale - 0.25).abs() < 1e-12);
        assert_eq!(p.body().width(), 400_000);
    }

    #[test]
    fn tall_content_grows_body_and_floats_footer() {
        let mut p = page(100_000, 100_000);
        p.body_mut().add_child(boxed(100_000, 200_000));
        let scale = fit_to_page(&mut p, 100_000, 100_000, 100_000, 200_000).unwrap();
        assert!((scale - 0.5).abs() < 1e-12);
        assert_eq!((p.width, p.height), (200_000, 240_000));
        assert_eq!(p.body().height(), 200_000);
        assert!(p.body().content_height() <= p.body().height());
        assert_eq!(p.footer().unwrap().y(), 200_000);
        assert_eq!(p.footer().unwrap().height(), 40_000);
    }

    #[test]
    fn preferred_width_uses_right_edge() {
        // tables are widened by fit_to_page, not here
        let mut body = ContainerArea::new(Geometry::new(0, 0, 100_000, 100_000));
        body.add_child(Area::Container(ContainerArea::new(Geometry::new(5_000, 0, 50_000, 10))));
        body.add_child(Area::Table(TableArea::new(Geometry::new(0, 10, 100_000, 10), 150_000)));
        assert_eq!(preferred_width(&body), 100_000);
    }
}
