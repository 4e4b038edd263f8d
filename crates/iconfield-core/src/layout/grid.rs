//! Occupancy grid and snapping used to find free spots for icons.

use kurbo::{Point, Rect, Size};

use super::{DESKTOP_PAD_HORIZONTAL, DESKTOP_PAD_VERTICAL, SNAP_SIZE_X, SNAP_SIZE_Y};
use crate::icon::{Icon, LabelPosition};

/// Snap an x coordinate to the nearest grid column.
pub fn snap_nearest_x(x: f64) -> f64 {
    ((x - DESKTOP_PAD_HORIZONTAL) / SNAP_SIZE_X).round() * SNAP_SIZE_X + DESKTOP_PAD_HORIZONTAL
}

/// Snap a y coordinate to the nearest grid row.
pub fn snap_nearest_y(y: f64) -> f64 {
    ((y - DESKTOP_PAD_VERTICAL) / SNAP_SIZE_Y).round() * SNAP_SIZE_Y + DESKTOP_PAD_VERTICAL
}

/// Snap an x coordinate up to the next grid column.
pub fn snap_ceil_x(x: f64) -> f64 {
    ((x - DESKTOP_PAD_HORIZONTAL) / SNAP_SIZE_X).ceil() * SNAP_SIZE_X + DESKTOP_PAD_HORIZONTAL
}

/// Snap a y coordinate down to the next grid row.
pub fn snap_ceil_y(y: f64) -> f64 {
    ((y - DESKTOP_PAD_VERTICAL) / SNAP_SIZE_Y).ceil() * SNAP_SIZE_Y + DESKTOP_PAD_VERTICAL
}

/// Distance from an icon's position to the bottom of its image.
pub(crate) fn image_baseline_offset(icon: &Icon, label_position: LabelPosition) -> f64 {
    icon.image_rect(label_position).y1 - icon.origin().y
}

/// Snap a candidate position so the icon's centre sits on a grid column and
/// the bottom of its image on a grid row, keeping it inside the canvas. The
/// top never goes above the desktop margin.
pub fn snap_position(
    icon: &Icon,
    label_position: LabelPosition,
    position: Point,
    extent: Size,
) -> Point {
    let width = icon.size(label_position).width;
    let baseline = image_baseline_offset(icon, label_position);
    let (mut x, mut y) = (position.x, position.y);

    let min_center = DESKTOP_PAD_HORIZONTAL + SNAP_SIZE_X;
    if x + width / 2.0 < min_center {
        x = min_center - width / 2.0;
    }
    if x + width / 2.0 > extent.width - min_center {
        x = extent.width - (min_center + width / 2.0);
    }

    let min_baseline = DESKTOP_PAD_VERTICAL + SNAP_SIZE_Y;
    if y + baseline < min_baseline {
        y = min_baseline - baseline;
    }
    if y + baseline > extent.height - min_baseline {
        y = extent.height - (min_baseline + baseline);
    }

    let center_x = snap_nearest_x(x + width / 2.0);
    let mut y = snap_nearest_y(y + baseline) - baseline;
    while y < DESKTOP_PAD_VERTICAL {
        y += SNAP_SIZE_Y;
    }
    Point::new(center_x - width / 2.0, y)
}

/// Cell range covered by a rectangle, inclusive on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CellRange {
    x0: usize,
    y0: usize,
    x1: usize,
    y1: usize,
}

/// Coarse occupancy grid over a canvas.
///
/// Cells are `SNAP_SIZE_X` by `SNAP_SIZE_Y`, offset by the desktop padding,
/// and stored column by column.
#[derive(Debug, Clone)]
pub struct PlacementGrid {
    columns: usize,
    rows: usize,
    cells: Vec<bool>,
    /// Round rectangles inwards (ceil the start, floor the end) instead of
    /// flooring both ends.
    tight: bool,
}

impl PlacementGrid {
    /// Create an empty grid for a canvas extent. Returns `None` if the extent
    /// does not hold a single cell.
    pub fn new(extent: Size, tight: bool) -> Option<Self> {
        let columns = (extent.width / SNAP_SIZE_X).floor();
        let rows = (extent.height / SNAP_SIZE_Y).floor();
        if !(columns >= 1.0 && rows >= 1.0) {
            return None;
        }
        let (columns, rows) = (columns as usize, rows as usize);
        Some(Self {
            columns,
            rows,
            cells: vec![false; columns * rows],
            tight,
        })
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn is_tight(&self) -> bool {
        self.tight
    }

    fn index(&self, column: usize, row: usize) -> usize {
        column * self.rows + row
    }

    fn cell_range(&self, rect: Rect) -> CellRange {
        let gx = |v: f64| (v - DESKTOP_PAD_HORIZONTAL) / SNAP_SIZE_X;
        let gy = |v: f64| (v - DESKTOP_PAD_VERTICAL) / SNAP_SIZE_Y;
        let (x0, y0) = if self.tight {
            (gx(rect.x0).ceil(), gy(rect.y0).ceil())
        } else {
            (gx(rect.x0).floor(), gy(rect.y0).floor())
        };
        let (x1, y1) = (gx(rect.x1).floor(), gy(rect.y1).floor());

        let clamp = |v: f64, len: usize| v.clamp(0.0, (len - 1) as f64) as usize;
        let x0 = clamp(x0, self.columns);
        let y0 = clamp(y0, self.rows);
        // Every rectangle covers at least one cell.
        let x1 = clamp(x1, self.columns).max(x0);
        let y1 = clamp(y1, self.rows).max(y0);
        CellRange { x0, y0, x1, y1 }
    }

    /// Whether every cell under a canvas rectangle is free.
    pub fn is_free(&self, rect: Rect) -> bool {
        let range = self.cell_range(rect);
        (range.x0..=range.x1)
            .all(|column| (range.y0..=range.y1).all(|row| !self.cells[self.index(column, row)]))
    }

    /// Mark every cell under a canvas rectangle as occupied.
    pub fn mark(&mut self, rect: Rect) {
        let range = self.cell_range(rect);
        for column in range.x0..=range.x1 {
            for row in range.y0..=range.y1 {
                let index = self.index(column, row);
                self.cells[index] = true;
            }
        }
    }

    /// Mark the entire bounds of an icon.
    pub fn mark_icon(&mut self, icon: &Icon, label_position: LabelPosition) {
        self.mark(icon.entire_bounds(label_position));
    }

    /// Whether the cell at a grid coordinate is occupied.
    pub fn is_cell_occupied(&self, column: usize, row: usize) -> bool {
        column < self.columns && row < self.rows && self.cells[self.index(column, row)]
    }

    /// Scan column by column from a snapped start for a spot where the icon
    /// fits. Returns the last position tried if the canvas is full.
    pub fn find_empty_location(
        &self,
        icon: &Icon,
        label_position: LabelPosition,
        start: Point,
        extent: Size,
    ) -> Point {
        let size = icon.entire_size(label_position);
        let baseline = image_baseline_offset(icon, label_position);
        let start = snap_position(icon, label_position, start, extent);
        let mut candidate = Rect::from_origin_size(start, size);

        loop {
            if self.is_free(candidate) {
                break;
            }
            candidate = candidate + kurbo::Vec2::new(0.0, SNAP_SIZE_Y);
            if candidate.y1 + DESKTOP_PAD_VERTICAL > extent.height {
                let mut y = DESKTOP_PAD_VERTICAL + SNAP_SIZE_Y - baseline;
                while y < DESKTOP_PAD_VERTICAL {
                    y += SNAP_SIZE_Y;
                }
                candidate = Rect::from_origin_size(
                    Point::new(candidate.x0 + SNAP_SIZE_X, y),
                    size,
                );
            }
            if candidate.x1 >= extent.width {
                break;
            }
        }

        candidate.origin()
    }
}
