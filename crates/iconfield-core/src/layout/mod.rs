//! Icon layout: flow layouts, desktop columns and free-spot placement.

pub mod desktop;
pub mod flow;
pub mod grid;

pub use grid::{
    PlacementGrid, snap_ceil_x, snap_ceil_y, snap_nearest_x, snap_nearest_y, snap_position,
};

use crate::canvas::IconCanvas;
use crate::icon::{IconId, LabelPosition};
use kurbo::{Point, Size};
use serde::{Deserialize, Serialize};

/// Padding around each icon in flow layouts.
pub const ICON_PAD_LEFT: f64 = 4.0;
pub const ICON_PAD_RIGHT: f64 = 4.0;
pub const ICON_PAD_TOP: f64 = 4.0;
pub const ICON_PAD_BOTTOM: f64 = 4.0;

/// Padding between the canvas edge and its content.
pub const CONTAINER_PAD_LEFT: f64 = 4.0;
pub const CONTAINER_PAD_RIGHT: f64 = 4.0;
pub const CONTAINER_PAD_TOP: f64 = 4.0;
pub const CONTAINER_PAD_BOTTOM: f64 = 4.0;

/// Cell width of the gridded layout with labels under icons.
pub const STANDARD_ICON_GRID_WIDTH: f64 = 155.0;

/// Room for the selection frame in the tighter layout.
pub const TIGHTER_LAYOUT_EXTRA: f64 = 8.0;

/// Desktop margins.
pub const DESKTOP_PAD_HORIZONTAL: f64 = 10.0;
pub const DESKTOP_PAD_VERTICAL: f64 = 10.0;

/// Size of one placement grid cell.
pub const SNAP_SIZE_X: f64 = 78.0;
pub const SNAP_SIZE_Y: f64 = 20.0;

/// Flow direction of the automatic layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutMode {
    #[default]
    LeftRightTopBottom,
    RightLeftTopBottom,
    TopBottomLeftRight,
    TopBottomRightLeft,
}

impl LayoutMode {
    /// Whether icons flow right to left.
    pub fn is_rtl(self) -> bool {
        matches!(
            self,
            LayoutMode::RightLeftTopBottom | LayoutMode::TopBottomRightLeft
        )
    }

    /// Whether icons fill columns before rows.
    pub fn is_vertical(self) -> bool {
        matches!(
            self,
            LayoutMode::TopBottomLeftRight | LayoutMode::TopBottomRightLeft
        )
    }
}

/// Everything a layout pass needs besides the icons.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutParams {
    pub mode: LayoutMode,
    pub label_position: LabelPosition,
    /// Visible canvas extent in canvas units.
    pub extent: Size,
    pub tighter: bool,
    pub keep_aligned: bool,
    pub is_desktop: bool,
}

impl LayoutParams {
    pub fn is_rtl(&self) -> bool {
        self.mode.is_rtl()
    }

    /// Whether this pass uses the desktop column layout.
    pub fn is_desktop_layout(&self) -> bool {
        self.is_desktop && self.mode.is_vertical()
    }
}

/// Mirror an x coordinate across the canvas for an item of the given width.
pub fn mirror_x(canvas_width: f64, x: f64, width: f64) -> f64 {
    canvas_width - x - width
}

/// Position an icon from its left-to-right x, mirroring in right-to-left
/// layouts, and remember the left-to-right x.
pub(crate) fn set_position_ltr(
    canvas: &mut IconCanvas,
    id: IconId,
    params: &LayoutParams,
    ltr: Point,
) {
    let Some(icon) = canvas.get_mut(id) else {
        return;
    };
    let width = icon.size(params.label_position).width;
    let x = if params.is_rtl() {
        mirror_x(params.extent.width, ltr.x, width)
    } else {
        ltr.x
    };
    icon.position = Some(Point::new(x, ltr.y));
    icon.saved_ltr_x = ltr.x;
}

/// Left-to-right x for a shown x.
pub fn ltr_x(params: &LayoutParams, x: f64, width: f64) -> f64 {
    if params.is_rtl() {
        mirror_x(params.extent.width, x, width)
    } else {
        x
    }
}

/// Lay down icons in display order with the layout the mode selects.
pub fn lay_down_icons(
    canvas: &mut IconCanvas,
    ids: &[IconId],
    params: &LayoutParams,
    start_y: f64,
) {
    log::debug!(
        "Laying down {} icons ({:?}, extent {:?})",
        ids.len(),
        params.mode,
        params.extent
    );
    if params.mode.is_vertical() {
        if params.is_desktop {
            desktop::lay_down_desktop(canvas, ids, params);
        } else {
            flow::lay_down_vertical(canvas, ids, params, start_y);
        }
    } else {
        flow::lay_down_horizontal(canvas, ids, params, start_y);
    }
}

/// Give every unpositioned icon a free spot with a loose grid, starting from
/// the top-left column. Falls back to a flow layout below the existing icons
/// when the canvas is too small for a grid. Returns the icons placed.
pub fn place_unpositioned_icons(
    canvas: &mut IconCanvas,
    ids: &[IconId],
    params: &LayoutParams,
) -> Vec<IconId> {
    let pending: Vec<IconId> = ids
        .iter()
        .copied()
        .filter(|&id| canvas.get(id).is_some_and(|icon| !icon.is_positioned()))
        .collect();
    if pending.is_empty() {
        return pending;
    }

    let Some(mut grid) = PlacementGrid::new(params.extent, false) else {
        let bottom = canvas
            .bounds(params.label_position, false)
            .map_or(0.0, |bounds| bounds.y1 + ICON_PAD_BOTTOM);
        flow::lay_down_horizontal(canvas, &pending, params, bottom);
        return pending;
    };
    mark_positioned(canvas, &mut grid, params, |icon| !icon.has_lazy_position);

    for &id in &pending {
        let Some(icon) = canvas.get(id) else { continue };
        let width = icon.entire_size(params.label_position).width;
        let start = Point::new(
            DESKTOP_PAD_HORIZONTAL + SNAP_SIZE_X / 2.0 - width / 2.0,
            DESKTOP_PAD_VERTICAL,
        );
        let found = grid.find_empty_location(icon, params.label_position, start, params.extent);
        if let Some(icon) = canvas.get_mut(id) {
            icon.position = Some(found);
            icon.saved_ltr_x = ltr_x(params, found.x, icon.size(params.label_position).width);
            grid.mark_icon(icon, params.label_position);
        }
    }
    pending
}

/// Move icons whose position is only a hint to the nearest free spot from
/// that hint, using a tight grid. Clears the hint flag. Returns the icons
/// handled.
pub fn place_lazy_icons(
    canvas: &mut IconCanvas,
    ids: &[IconId],
    params: &LayoutParams,
) -> Vec<IconId> {
    let lazy: Vec<IconId> = ids
        .iter()
        .copied()
        .filter(|&id| {
            canvas
                .get(id)
                .is_some_and(|icon| icon.is_positioned() && icon.has_lazy_position)
        })
        .collect();
    if lazy.is_empty() {
        return lazy;
    }

    let mut grid = PlacementGrid::new(params.extent, true);
    if let Some(grid) = grid.as_mut() {
        mark_positioned(canvas, grid, params, |icon| !icon.has_lazy_position);
    }

    for &id in &lazy {
        let Some(icon) = canvas.get_mut(id) else { continue };
        if let Some(grid) = grid.as_mut() {
            let found =
                grid.find_empty_location(icon, params.label_position, icon.origin(), params.extent);
            icon.position = Some(found);
            icon.saved_ltr_x = ltr_x(params, found.x, icon.size(params.label_position).width);
            grid.mark_icon(icon, params.label_position);
        }
        icon.has_lazy_position = false;
    }
    lazy
}

/// Snap every positioned icon to a free grid spot, in reading order (reversed
/// for right-to-left layouts). Returns the icons in the order they were
/// aligned.
pub fn align_icons(canvas: &mut IconCanvas, params: &LayoutParams) -> Vec<IconId> {
    let Some(mut grid) = PlacementGrid::new(params.extent, true) else {
        return Vec::new();
    };
    let mut ids: Vec<IconId> = canvas
        .icons_ordered()
        .filter(|(_, icon)| icon.is_positioned())
        .map(|(id, _)| id)
        .collect();
    ids.sort_by(|&a, &b| {
        let (Some(a), Some(b)) = (canvas.get(a), canvas.get(b)) else {
            return std::cmp::Ordering::Equal;
        };
        let (a, b) = (a.origin(), b.origin());
        a.y.total_cmp(&b.y).then(a.x.total_cmp(&b.x))
    });
    if params.is_rtl() {
        ids.reverse();
    }

    for &id in &ids {
        let Some(icon) = canvas.get_mut(id) else { continue };
        let found =
            grid.find_empty_location(icon, params.label_position, icon.origin(), params.extent);
        icon.position = Some(found);
        icon.saved_ltr_x = ltr_x(params, found.x, icon.size(params.label_position).width);
        grid.mark_icon(icon, params.label_position);
    }
    ids
}

fn mark_positioned(
    canvas: &IconCanvas,
    grid: &mut PlacementGrid,
    params: &LayoutParams,
    filter: impl Fn(&crate::icon::Icon) -> bool,
) {
    for (_, icon) in canvas.icons_ordered() {
        if icon.is_positioned() && filter(icon) {
            grid.mark_icon(icon, params.label_position);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::icon::{Icon, IconData, IconMetrics};

    pub(crate) fn params(mode: LayoutMode, width: f64, height: f64) -> LayoutParams {
        LayoutParams {
            mode,
            label_position: LabelPosition::Under,
            extent: Size::new(width, height),
            tighter: false,
            keep_aligned: false,
            is_desktop: false,
        }
    }

    fn add(canvas: &mut IconCanvas, uri: &str, position: Option<Point>) -> IconId {
        let mut icon = Icon::new(IconData::from_uri(uri), IconMetrics::default());
        icon.position = position;
        canvas.add_icon(icon).unwrap()
    }

    #[test]
    fn test_mode_flags() {
        assert!(!LayoutMode::LeftRightTopBottom.is_rtl());
        assert!(LayoutMode::RightLeftTopBottom.is_rtl());
        assert!(LayoutMode::TopBottomRightLeft.is_rtl());
        assert!(LayoutMode::TopBottomLeftRight.is_vertical());
        assert!(!LayoutMode::RightLeftTopBottom.is_vertical());
    }

    #[test]
    fn test_mirror() {
        assert!((mirror_x(800.0, 100.0, 64.0) - 636.0).abs() < f64::EPSILON);
        let p = params(LayoutMode::RightLeftTopBottom, 800.0, 600.0);
        assert!((ltr_x(&p, 636.0, 64.0) - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_place_unpositioned_avoids_placed_icons() {
        let mut canvas = IconCanvas::new();
        let p = params(LayoutMode::TopBottomLeftRight, 800.0, 600.0);
        let placed = add(&mut canvas, "file:///placed", None);
        let fresh = add(&mut canvas, "file:///fresh", None);
        // Put the first icon where the scan would start.
        let first = place_unpositioned_icons(&mut canvas, &[placed], &p);
        assert_eq!(first, vec![placed]);

        let second = place_unpositioned_icons(&mut canvas, &[placed, fresh], &p);
        assert_eq!(second, vec![fresh]);
        let a = canvas.get(placed).unwrap().entire_bounds(p.label_position);
        let b = canvas.get(fresh).unwrap().entire_bounds(p.label_position);
        assert!(a.intersect(b).area() <= 0.0);
    }

    #[test]
    fn test_place_unpositioned_falls_back_to_flow() {
        let mut canvas = IconCanvas::new();
        let p = params(LayoutMode::LeftRightTopBottom, 40.0, 600.0);
        let existing = add(&mut canvas, "file:///existing", Some(Point::new(0.0, 0.0)));
        let fresh = add(&mut canvas, "file:///fresh", None);
        let placed = place_unpositioned_icons(&mut canvas, &[existing, fresh], &p);
        assert_eq!(placed, vec![fresh]);
        let bottom = canvas.get(existing).unwrap().layout_bounds(p.label_position).y1;
        assert!(canvas.get(fresh).unwrap().origin().y > bottom);
    }

    #[test]
    fn test_place_lazy_clears_flag() {
        let mut canvas = IconCanvas::new();
        let p = params(LayoutMode::TopBottomLeftRight, 800.0, 600.0);
        let anchor = add(&mut canvas, "file:///anchor", Some(Point::new(200.0, 200.0)));
        let lazy = add(&mut canvas, "file:///lazy", Some(Point::new(200.0, 200.0)));
        canvas.get_mut(lazy).unwrap().has_lazy_position = true;

        let handled = place_lazy_icons(&mut canvas, &[anchor, lazy], &p);
        assert_eq!(handled, vec![lazy]);
        let icon = canvas.get(lazy).unwrap();
        assert!(!icon.has_lazy_position);
        assert_ne!(icon.origin(), Point::new(200.0, 200.0));
    }

    #[test]
    fn test_align_icons_snaps_to_columns() {
        let mut canvas = IconCanvas::new();
        let p = params(LayoutMode::TopBottomLeftRight, 800.0, 600.0);
        let a = add(&mut canvas, "file:///a", Some(Point::new(103.0, 97.0)));
        let b = add(&mut canvas, "file:///b", Some(Point::new(110.0, 101.0)));
        let aligned = align_icons(&mut canvas, &p);
        assert_eq!(aligned, vec![a, b]);
        let ia = canvas.get(a).unwrap();
        let ib = canvas.get(b).unwrap();
        let width = ia.size(p.label_position).width;
        let center = ia.origin().x + width / 2.0;
        assert!((snap_nearest_x(center) - center).abs() < 1e-9);
        // Tight packing keeps the same column and moves the second icon down.
        assert!((ib.origin().x - ia.origin().x).abs() < 1e-9);
        assert!(ib.origin().y > ia.origin().y);
    }
}
