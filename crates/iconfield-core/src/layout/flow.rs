//! Row and column flow layouts.

use kurbo::Point;

use super::{
    CONTAINER_PAD_TOP, ICON_PAD_BOTTOM, ICON_PAD_LEFT, ICON_PAD_RIGHT, ICON_PAD_TOP,
    LayoutParams, STANDARD_ICON_GRID_WIDTH, TIGHTER_LAYOUT_EXTRA, set_position_ltr,
};
use crate::canvas::IconCanvas;
use crate::icon::{IconId, LabelPosition};

/// Measurements of one icon in a line.
#[derive(Debug, Clone, Copy)]
struct Slot {
    id: IconId,
    /// Horizontal space the icon takes in the line.
    cell_width: f64,
    /// Offset of the icon inside its cell.
    x_offset: f64,
    height_above: f64,
    height_below: f64,
    height: f64,
}

/// Lay icons left to right, wrapping into rows.
///
/// Each row is measured before it is placed: with labels under, icons share
/// the baseline at the bottom of their images; with labels beside, each icon
/// is centred vertically in the row.
pub fn lay_down_horizontal(
    canvas: &mut IconCanvas,
    ids: &[IconId],
    params: &LayoutParams,
    start_y: f64,
) {
    let lp = params.label_position;
    let canvas_width = params.extent.width;
    let gridded = !params.tighter;

    let (max_image_width, max_label_width) = max_widths(canvas, ids);
    let grid_width = match lp {
        LabelPosition::Under => STANDARD_ICON_GRID_WIDTH,
        LabelPosition::Beside => max_image_width + max_label_width + ICON_PAD_LEFT + ICON_PAD_RIGHT,
    };
    let line_start_width = match lp {
        LabelPosition::Under => 0.0,
        LabelPosition::Beside => ICON_PAD_LEFT,
    };

    let mut y = start_y + CONTAINER_PAD_TOP;
    let mut line: Vec<Slot> = Vec::new();
    let mut line_width = line_start_width;
    let mut max_above: f64 = 0.0;
    let mut max_below: f64 = 0.0;

    for &id in ids {
        let Some(icon) = canvas.get(id) else { continue };
        let bounds = icon.layout_bounds(lp);
        let image = icon.image_rect(lp);
        let width = bounds.width();

        let cell_width = if gridded {
            (width / grid_width).ceil().max(1.0) * grid_width
        } else {
            width + ICON_PAD_RIGHT + TIGHTER_LAYOUT_EXTRA
        };
        let (height_above, height_below) = match lp {
            LabelPosition::Under => (image.y1 - bounds.y0, bounds.y1 - image.y1),
            LabelPosition::Beside => (bounds.height(), 0.0),
        };
        let x_offset = match lp {
            LabelPosition::Under => (cell_width - width) / 2.0,
            LabelPosition::Beside if gridded => {
                max_image_width + ICON_PAD_LEFT + ICON_PAD_RIGHT - image.width()
            }
            LabelPosition::Beside => 0.0,
        };

        if !line.is_empty() && line_width + cell_width >= canvas_width {
            y = place_row(canvas, &line, params, y, max_above, max_below);
            line.clear();
            line_width = line_start_width;
            max_above = 0.0;
            max_below = 0.0;
        }

        max_above = max_above.max(height_above);
        max_below = max_below.max(height_below);
        line.push(Slot {
            id,
            cell_width,
            x_offset,
            height_above,
            height_below,
            height: bounds.height(),
        });
        line_width += cell_width;
    }

    if !line.is_empty() {
        place_row(canvas, &line, params, y, max_above, max_below);
    }
}

/// Place one measured row starting at `top`. Returns the top of the next row.
fn place_row(
    canvas: &mut IconCanvas,
    line: &[Slot],
    params: &LayoutParams,
    top: f64,
    max_above: f64,
    max_below: f64,
) -> f64 {
    let y = top + ICON_PAD_TOP;
    let mut x = ICON_PAD_LEFT;
    for slot in line {
        let icon_y = match params.label_position {
            LabelPosition::Under => y + max_above - slot.height_above,
            LabelPosition::Beside => y + (max_above - slot.height) / 2.0,
        };
        set_position_ltr(canvas, slot.id, params, Point::new(x + slot.x_offset, icon_y));
        x += slot.cell_width;
    }
    debug_assert!(line.iter().all(|slot| slot.height_below <= max_below));
    y + max_above + max_below + ICON_PAD_BOTTOM
}

/// Lay icons top to bottom, wrapping into columns.
///
/// All cells share the height of the tallest icon; each column is as wide as
/// its widest icon.
pub fn lay_down_vertical(
    canvas: &mut IconCanvas,
    ids: &[IconId],
    params: &LayoutParams,
    start_y: f64,
) {
    let lp = params.label_position;
    let canvas_height = params.extent.height;
    let (max_image_width, _) = max_widths(canvas, ids);

    let mut max_height: f64 = 0.0;
    let mut max_entire_height: f64 = 0.0;
    for icon in ids.iter().filter_map(|&id| canvas.get(id)) {
        max_height = max_height.max(icon.size(lp).height);
        max_entire_height = max_entire_height.max(icon.entire_size(lp).height);
    }
    let row_pitch = ICON_PAD_TOP + max_height;
    let top = start_y + CONTAINER_PAD_TOP;

    let mut x = 0.0;
    let mut column: Vec<IconId> = Vec::new();
    let mut column_width: f64 = 0.0;
    let mut column_height = ICON_PAD_TOP;

    for &id in ids {
        let Some(icon) = canvas.get(id) else { continue };
        let width = icon.size(lp).width;

        if !column.is_empty()
            && top + column_height + max_entire_height + ICON_PAD_BOTTOM >= canvas_height
        {
            x += ICON_PAD_LEFT;
            place_column(canvas, &column, params, x, top, row_pitch, column_width, max_image_width);
            x += column_width + ICON_PAD_RIGHT;
            column.clear();
            column_width = 0.0;
            column_height = ICON_PAD_TOP;
        }

        column.push(id);
        column_width = column_width.max(width);
        column_height += max_height + ICON_PAD_BOTTOM;
    }

    if !column.is_empty() {
        x += ICON_PAD_LEFT;
        place_column(canvas, &column, params, x, top, row_pitch, column_width, max_image_width);
    }
}

#[allow(clippy::too_many_arguments)]
fn place_column(
    canvas: &mut IconCanvas,
    column: &[IconId],
    params: &LayoutParams,
    x: f64,
    top: f64,
    row_pitch: f64,
    column_width: f64,
    max_image_width: f64,
) {
    let lp = params.label_position;
    let mut y = top;
    for &id in column {
        let Some(icon) = canvas.get(id) else { continue };
        let size = icon.size(lp);
        let x_offset = match lp {
            LabelPosition::Beside => max_image_width - icon.image_size().width,
            LabelPosition::Under => (column_width - size.width) / 2.0,
        };
        let y_offset = ICON_PAD_TOP + (row_pitch - ICON_PAD_TOP - size.height) / 2.0;
        set_position_ltr(canvas, id, params, Point::new(x + x_offset, y + y_offset));
        y += row_pitch;
    }
}

/// Widest image and widest label among the icons.
fn max_widths(canvas: &IconCanvas, ids: &[IconId]) -> (f64, f64) {
    ids.iter()
        .filter_map(|&id| canvas.get(id))
        .fold((0.0_f64, 0.0_f64), |(image, label), icon| {
            (
                image.max(icon.image_size().width.ceil()),
                label.max(icon.metrics.label.width.ceil()),
            )
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::icon::{Icon, IconData, IconMetrics};
    use crate::layout::LayoutMode;
    use crate::layout::tests::params;
    use kurbo::Size;

    fn canvas_with(sizes: &[(f64, f64, f64)]) -> (IconCanvas, Vec<IconId>) {
        let mut canvas = IconCanvas::new();
        let ids = sizes
            .iter()
            .enumerate()
            .map(|(i, &(image, label_w, label_h))| {
                let metrics = IconMetrics {
                    image: Size::new(image, image),
                    label: Size::new(label_w, label_h),
                    label_overflow: 0.0,
                };
                canvas
                    .add_icon(Icon::new(IconData::from_uri(format!("file:///{i}")), metrics))
                    .unwrap()
            })
            .collect();
        (canvas, ids)
    }

    fn positions(canvas: &IconCanvas, ids: &[IconId]) -> Vec<Point> {
        ids.iter().map(|&id| canvas.get(id).unwrap().origin()).collect()
    }

    #[test]
    fn test_horizontal_wraps_rows() {
        let (mut canvas, ids) = canvas_with(&[(48.0, 60.0, 16.0); 5]);
        let p = params(LayoutMode::LeftRightTopBottom, 500.0, 800.0);
        lay_down_horizontal(&mut canvas, &ids, &p, 0.0);
        let pos = positions(&canvas, &ids);
        // Three 155px cells fit in 500px.
        assert!((pos[0].y - pos[2].y).abs() < f64::EPSILON);
        assert!(pos[3].y > pos[2].y);
        assert!((pos[3].x - pos[0].x).abs() < f64::EPSILON);
        // Icons are centred in their cells.
        assert!((pos[0].x - (ICON_PAD_LEFT + (155.0 - 60.0) / 2.0)).abs() < 1e-9);
        assert!((pos[1].x - pos[0].x - 155.0).abs() < 1e-9);
    }

    #[test]
    fn test_horizontal_shares_image_baseline() {
        let (mut canvas, ids) = canvas_with(&[(48.0, 40.0, 16.0), (96.0, 40.0, 16.0)]);
        let p = params(LayoutMode::LeftRightTopBottom, 800.0, 800.0);
        lay_down_horizontal(&mut canvas, &ids, &p, 0.0);
        let small = canvas.get(ids[0]).unwrap().image_rect(p.label_position);
        let large = canvas.get(ids[1]).unwrap().image_rect(p.label_position);
        assert!((small.y1 - large.y1).abs() < 1e-9);
        assert!((large.y0 - (CONTAINER_PAD_TOP + ICON_PAD_TOP)).abs() < 1e-9);
    }

    #[test]
    fn test_horizontal_respects_start_y() {
        let (mut canvas, ids) = canvas_with(&[(48.0, 40.0, 16.0)]);
        let p = params(LayoutMode::LeftRightTopBottom, 800.0, 800.0);
        lay_down_horizontal(&mut canvas, &ids, &p, 300.0);
        assert!(canvas.get(ids[0]).unwrap().origin().y >= 300.0);
    }

    #[test]
    fn test_horizontal_wide_icon_takes_two_cells() {
        let (mut canvas, ids) = canvas_with(&[(48.0, 200.0, 16.0), (48.0, 40.0, 16.0)]);
        let p = params(LayoutMode::LeftRightTopBottom, 800.0, 800.0);
        lay_down_horizontal(&mut canvas, &ids, &p, 0.0);
        let second = canvas.get(ids[1]).unwrap();
        let cell_start = second.origin().x - (155.0 - 48.0) / 2.0;
        assert!((cell_start - (ICON_PAD_LEFT + 310.0)).abs() < 1e-9);
    }

    #[test]
    fn test_tighter_layout_packs_by_width() {
        let (mut canvas, ids) = canvas_with(&[(48.0, 40.0, 16.0); 2]);
        let mut p = params(LayoutMode::LeftRightTopBottom, 800.0, 800.0);
        p.tighter = true;
        lay_down_horizontal(&mut canvas, &ids, &p, 0.0);
        let pos = positions(&canvas, &ids);
        let step = 48.0 + ICON_PAD_RIGHT + TIGHTER_LAYOUT_EXTRA;
        assert!((pos[1].x - pos[0].x - step).abs() < 1e-9);
    }

    #[test]
    fn test_beside_aligns_labels() {
        let (mut canvas, ids) = canvas_with(&[(32.0, 80.0, 16.0), (16.0, 40.0, 16.0)]);
        let mut p = params(LayoutMode::LeftRightTopBottom, 120.0, 800.0);
        p.label_position = LabelPosition::Beside;
        lay_down_horizontal(&mut canvas, &ids, &p, 0.0);
        let first = canvas.get(ids[0]).unwrap().label_rect(p.label_position);
        let second = canvas.get(ids[1]).unwrap().label_rect(p.label_position);
        // One icon per row, labels start at the same x.
        assert!(second.y0 > first.y0);
        assert!((first.x0 - second.x0).abs() < 1e-9);
    }

    #[test]
    fn test_layout_is_idempotent() {
        let (mut canvas, ids) =
            canvas_with(&[(48.0, 60.0, 16.0), (64.0, 90.0, 32.0), (32.0, 20.0, 16.0)]);
        let p = params(LayoutMode::LeftRightTopBottom, 330.0, 800.0);
        lay_down_horizontal(&mut canvas, &ids, &p, 0.0);
        let first = positions(&canvas, &ids);
        lay_down_horizontal(&mut canvas, &ids, &p, 0.0);
        assert_eq!(first, positions(&canvas, &ids));
    }

    #[test]
    fn test_rtl_mirrors_ltr_positions() {
        let sizes = [
            (48.0, 60.0, 16.0),
            (64.0, 90.0, 32.0),
            (32.0, 20.0, 16.0),
            (48.0, 10.0, 16.0),
        ];
        let (mut canvas, ids) = canvas_with(&sizes);
        let ltr = params(LayoutMode::LeftRightTopBottom, 400.0, 800.0);
        lay_down_horizontal(&mut canvas, &ids, &ltr, 0.0);
        let ltr_positions = positions(&canvas, &ids);

        let rtl = params(LayoutMode::RightLeftTopBottom, 400.0, 800.0);
        lay_down_horizontal(&mut canvas, &ids, &rtl, 0.0);
        for (id, ltr_pos) in ids.iter().zip(ltr_positions) {
            let icon = canvas.get(*id).unwrap();
            let width = icon.size(rtl.label_position).width;
            assert!((icon.origin().x - (400.0 - ltr_pos.x - width)).abs() < 1e-9);
            assert!((icon.origin().y - ltr_pos.y).abs() < 1e-9);
            assert!((icon.saved_ltr_x - ltr_pos.x).abs() < 1e-9);
        }
    }

    #[test]
    fn test_vertical_wraps_columns() {
        let (mut canvas, ids) =
            canvas_with(&[(16.0, 50.0, 16.0), (16.0, 90.0, 16.0), (16.0, 30.0, 16.0)]);
        let mut p = params(LayoutMode::TopBottomLeftRight, 800.0, 60.0);
        p.label_position = LabelPosition::Beside;
        lay_down_vertical(&mut canvas, &ids, &p, 0.0);
        let pos = positions(&canvas, &ids);
        // Cell pitch is 20, so two icons fit before the 60px bottom.
        assert!((pos[0].x - pos[1].x).abs() < 1e-9);
        assert!(pos[1].y > pos[0].y);
        assert!(pos[2].x > pos[1].x + 90.0);
        assert!((pos[2].y - pos[0].y).abs() < 1e-9);
    }
}
