//! Desktop column layout.
//!
//! The desktop fills columns from the top-left corner. Once the user has
//! arranged icons, those stay where they are and only new icons are fitted
//! around them.

use kurbo::{Point, Rect, Vec2};

use super::grid::{PlacementGrid, image_baseline_offset};
use super::{
    DESKTOP_PAD_HORIZONTAL, DESKTOP_PAD_VERTICAL, LayoutParams, SNAP_SIZE_X, SNAP_SIZE_Y,
    set_position_ltr, snap_ceil_x, snap_ceil_y,
};
use crate::canvas::IconCanvas;
use crate::icon::{Icon, IconId};

/// Lay down desktop icons. Positioned icons without a lazy hint are kept;
/// if there are none, every icon is laid down in snapped columns.
pub fn lay_down_desktop(canvas: &mut IconCanvas, ids: &[IconId], params: &LayoutParams) {
    let (placed, unplaced): (Vec<IconId>, Vec<IconId>) = ids.iter().copied().partition(|&id| {
        canvas
            .get(id)
            .is_some_and(|icon| icon.is_positioned() && !icon.has_lazy_position)
    });

    if placed.is_empty() {
        lay_down_columns(canvas, ids, params);
    } else {
        fill_around_placed(canvas, &placed, &unplaced, params);
    }
}

fn fill_around_placed(
    canvas: &mut IconCanvas,
    placed: &[IconId],
    unplaced: &[IconId],
    params: &LayoutParams,
) {
    let lp = params.label_position;
    log::debug!(
        "Desktop layout keeps {} icons, places {}",
        placed.len(),
        unplaced.len()
    );

    for &id in placed {
        let Some(icon) = canvas.get(id) else { continue };
        let ltr = Point::new(icon.saved_ltr_x, icon.origin().y);
        set_position_ltr(canvas, id, params, ltr);
    }
    for &id in unplaced {
        if let Some(icon) = canvas.get_mut(id) {
            icon.position = None;
            icon.has_lazy_position = false;
        }
    }

    // The grid is searched left to right; right-to-left desktops mirror
    // the result.
    let Some(mut grid) = PlacementGrid::new(params.extent, false) else {
        lay_down_columns(canvas, unplaced, params);
        return;
    };
    for &id in placed {
        if let Some(icon) = canvas.get(id) {
            grid.mark(ltr_entire_bounds(icon, params));
        }
    }

    for &id in unplaced {
        let Some(icon) = canvas.get(id) else { continue };
        let width = icon.entire_size(lp).width;
        let start = Point::new(
            DESKTOP_PAD_HORIZONTAL + SNAP_SIZE_X / 2.0 - width / 2.0,
            DESKTOP_PAD_VERTICAL + SNAP_SIZE_Y - icon.image_size().height,
        );
        let found = grid.find_empty_location(icon, lp, start, params.extent);
        set_position_ltr(canvas, id, params, found);
        if let Some(icon) = canvas.get(id) {
            grid.mark(ltr_entire_bounds(icon, params));
        }
    }
}

/// Entire bounds of a positioned icon as they lie before mirroring.
fn ltr_entire_bounds(icon: &Icon, params: &LayoutParams) -> Rect {
    let bounds = icon.entire_bounds(params.label_position);
    bounds + Vec2::new(icon.saved_ltr_x - icon.origin().x, 0.0)
}

/// Lay icons in columns from the top-left corner. Baselines and column
/// centres are snapped to the grid unless the layout is tighter and not kept
/// aligned.
fn lay_down_columns(canvas: &mut IconCanvas, ids: &[IconId], params: &LayoutParams) {
    let lp = params.label_position;
    let height = params.extent.height;
    let should_snap = !(params.tighter && !params.keep_aligned);

    let snap_y = |y: f64, baseline: f64| {
        if should_snap {
            snap_ceil_y(y + baseline) - baseline
        } else {
            y
        }
    };

    let mut x = DESKTOP_PAD_HORIZONTAL;
    let mut remaining = ids;

    while !remaining.is_empty() {
        // Measure the column.
        let mut y = DESKTOP_PAD_VERTICAL;
        let mut max_width: f64 = 0.0;
        for (index, &id) in remaining.iter().enumerate() {
            let Some(icon) = canvas.get(id) else { continue };
            let entire = icon.entire_size(lp);
            let layout_height = icon.size(lp).height;
            y = snap_y(y, image_baseline_offset(icon, lp));
            if index > 0 && y != DESKTOP_PAD_VERTICAL && y + layout_height > height {
                break;
            }
            max_width = max_width.max(entire.width);
            y += entire.height + DESKTOP_PAD_VERTICAL;
        }

        let (center_x, column_width) = if should_snap {
            let center = snap_ceil_x(x + max_width / 2.0);
            (center, (center - x) + max_width / 2.0)
        } else {
            (x + max_width / 2.0, max_width)
        };

        // Place it.
        let mut y = DESKTOP_PAD_VERTICAL;
        let mut consumed = 0;
        for (index, &id) in remaining.iter().enumerate() {
            consumed = index + 1;
            let Some(icon) = canvas.get(id) else { continue };
            let entire_height = icon.entire_size(lp).height;
            let layout = icon.size(lp);
            y = snap_y(y, image_baseline_offset(icon, lp));
            if index > 0 && y != DESKTOP_PAD_VERTICAL && y > height - layout.height {
                consumed = index;
                break;
            }
            set_position_ltr(
                canvas,
                id,
                params,
                Point::new(center_x - layout.width / 2.0, y),
            );
            y += entire_height + DESKTOP_PAD_VERTICAL;
        }

        x += column_width + DESKTOP_PAD_HORIZONTAL;
        remaining = &remaining[consumed..];
    }
}
