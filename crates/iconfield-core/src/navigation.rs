//! Keyboard navigation between icons.
//!
//! A search walks every icon in display order and keeps a running best
//! according to a "better icon" predicate. Arrow keys chain several
//! predicates: a destination in the same row or column, then a wrap to the
//! next row or column, then a last resort for ragged layouts.

use crate::canvas::IconCanvas;
use crate::icon::{Icon, IconId, LabelPosition};
use kurbo::{Point, Rect};
use std::cmp::Ordering;

/// Arrow key direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// State shared by the predicates of one search.
#[derive(Debug, Clone, Copy)]
pub struct SearchState {
    /// Icon the search starts from.
    pub start: Option<IconId>,
    /// Comparison point of the start icon.
    pub origin: Point,
    pub direction: Direction,
    /// Squared distance of the best candidate so far.
    best_distance: f64,
}

impl SearchState {
    pub fn new(start: Option<IconId>, origin: Point, direction: Direction) -> Self {
        Self {
            start,
            origin,
            direction,
            best_distance: f64::INFINITY,
        }
    }
}

/// Decides whether `candidate` beats `best`.
pub type BetterIcon = fn(&Navigator<'_>, &mut SearchState, Option<IconId>, IconId) -> bool;

/// Read-only view of a container's icons for navigation.
pub struct Navigator<'a> {
    canvas: &'a IconCanvas,
    /// Display order.
    order: &'a [IconId],
    label_position: LabelPosition,
    rtl: bool,
}

impl<'a> Navigator<'a> {
    pub fn new(
        canvas: &'a IconCanvas,
        order: &'a [IconId],
        label_position: LabelPosition,
        rtl: bool,
    ) -> Self {
        Self {
            canvas,
            order,
            label_position,
            rtl,
        }
    }

    fn icon(&self, id: IconId) -> Option<&'a Icon> {
        self.canvas.get(id)
    }

    /// Point icons are compared by: the bottom centre of the image with
    /// labels under, the leading edge centre with labels beside.
    pub fn cmp_point(&self, id: IconId) -> Point {
        let Some(icon) = self.icon(id) else {
            return Point::ZERO;
        };
        let image = icon.image_rect(self.label_position);
        match self.label_position {
            LabelPosition::Under => Point::new((image.x0 + image.x1) / 2.0, image.y1),
            LabelPosition::Beside => {
                let x = if self.rtl { image.x1 } else { image.x0 };
                Point::new(x, (image.y0 + image.y1) / 2.0)
            }
        }
    }

    fn bounds(&self, id: IconId) -> Rect {
        self.icon(id)
            .map(|icon| icon.layout_bounds(self.label_position))
            .unwrap_or_default()
    }

    pub fn compare_by_uri(&self, a: IconId, b: IconId) -> Ordering {
        let uri = |id| self.icon(id).map(Icon::uri).unwrap_or_default();
        uri(a).cmp(uri(b))
    }

    pub fn compare_horizontal(&self, a: IconId, b: IconId) -> Ordering {
        self.cmp_point(a).x.total_cmp(&self.cmp_point(b).x)
    }

    pub fn compare_vertical(&self, a: IconId, b: IconId) -> Ordering {
        self.cmp_point(a).y.total_cmp(&self.cmp_point(b).y)
    }

    /// Compare x, then y, then uri.
    pub fn compare_horizontal_first(&self, a: IconId, b: IconId) -> Ordering {
        self.compare_horizontal(a, b)
            .then_with(|| self.compare_vertical(a, b))
            .then_with(|| self.compare_by_uri(a, b))
    }

    /// Compare y, then x, then uri.
    pub fn compare_vertical_first(&self, a: IconId, b: IconId) -> Ordering {
        self.compare_vertical(a, b)
            .then_with(|| self.compare_horizontal(a, b))
            .then_with(|| self.compare_by_uri(a, b))
    }

    /// Position of an icon relative to the search origin's row: `Less` when
    /// it lies entirely below, `Greater` when entirely above.
    fn compare_with_start_row(&self, state: &SearchState, id: IconId) -> Ordering {
        let bounds = self.bounds(id);
        if state.origin.y < bounds.y0 {
            Ordering::Less
        } else if state.origin.y > bounds.y1 {
            Ordering::Greater
        } else {
            Ordering::Equal
        }
    }

    /// Position of an icon relative to the search origin's column: `Less`
    /// when it lies entirely to the right, `Greater` when entirely left.
    fn compare_with_start_column(&self, state: &SearchState, id: IconId) -> Ordering {
        let bounds = self.bounds(id);
        if state.origin.x < bounds.x0 {
            Ordering::Less
        } else if state.origin.x > bounds.x1 {
            Ordering::Greater
        } else {
            Ordering::Equal
        }
    }

    /// Scan every icon except the start and keep the best candidate.
    pub fn find_best(&self, better: BetterIcon, state: &mut SearchState) -> Option<IconId> {
        self.find_best_among(better, state, false)
    }

    /// Like [`find_best`](Self::find_best) but only among selected icons.
    pub fn find_best_selected(
        &self,
        better: BetterIcon,
        state: &mut SearchState,
    ) -> Option<IconId> {
        self.find_best_among(better, state, true)
    }

    fn find_best_among(
        &self,
        better: BetterIcon,
        state: &mut SearchState,
        selected_only: bool,
    ) -> Option<IconId> {
        let mut best = None;
        for &candidate in self.order {
            if Some(candidate) == state.start {
                continue;
            }
            let Some(icon) = self.icon(candidate) else { continue };
            if !icon.is_positioned() || (selected_only && !icon.selected) {
                continue;
            }
            if better(self, state, best, candidate) {
                best = Some(candidate);
            }
        }
        best
    }

    /// Icon an arrow key press starts from: the keyboard focus, else the only
    /// selected icon, else the selected icon farthest in the key's direction.
    pub fn arrow_key_start(&self, focus: Option<IconId>, direction: Direction) -> Option<IconId> {
        if focus.is_some_and(|id| self.canvas.contains(id)) {
            return focus;
        }
        let selected: Vec<IconId> = self
            .order
            .iter()
            .copied()
            .filter(|&id| self.icon(id).is_some_and(|icon| icon.selected))
            .collect();
        match selected.len() {
            0 => None,
            1 => Some(selected[0]),
            _ => {
                let all_selected = selected.len() == self.order.len();
                let better = if all_selected {
                    self.empty_start()
                } else {
                    better_start(direction)
                };
                let mut state = SearchState::new(None, Point::ZERO, direction);
                self.find_best_selected(better, &mut state)
            }
        }
    }

    /// Predicate picking the first icon when nothing is focused.
    fn empty_start(&self) -> BetterIcon {
        if self.rtl {
            rightmost_in_top_row
        } else {
            leftmost_in_top_row
        }
    }

    /// Icon an arrow key press moves to from `from`. Returns `from` when no
    /// icon qualifies. `wrap` enables the row and column wrap fallbacks.
    pub fn arrow_key_destination(
        &self,
        from: IconId,
        direction: Direction,
        auto_layout: bool,
        vertical_layout: bool,
        wrap: bool,
    ) -> IconId {
        let mut state = SearchState::new(Some(from), self.cmp_point(from), direction);
        let destination = if auto_layout {
            same_line_destination(direction)
        } else {
            closest_in_90_degrees
        };
        let (fallback, last_resort) = self.fallbacks(direction, auto_layout, vertical_layout, wrap);

        self.find_best(destination, &mut state)
            .or_else(|| {
                fallback.and_then(|better| {
                    let mut state = SearchState::new(Some(from), state.origin, direction);
                    self.find_best(better, &mut state)
                })
            })
            .or_else(|| {
                last_resort.filter(|_| auto_layout).and_then(|better| {
                    let mut state = SearchState::new(Some(from), state.origin, direction);
                    self.find_best(better, &mut state)
                })
            })
            .unwrap_or(from)
    }

    fn fallbacks(
        &self,
        direction: Direction,
        auto_layout: bool,
        vertical_layout: bool,
        wrap: bool,
    ) -> (Option<BetterIcon>, Option<BetterIcon>) {
        let rows = auto_layout && wrap && !vertical_layout;
        let columns = auto_layout && wrap && vertical_layout;
        let rtl = self.rtl;
        let pick = |rtl_choice: BetterIcon, ltr_choice: BetterIcon| {
            if rtl { rtl_choice } else { ltr_choice }
        };
        match direction {
            Direction::Right => (
                rows.then(|| pick(previous_row_leftmost, next_row_leftmost)),
                (vertical_layout && !rtl).then_some(next_column_lowest as BetterIcon),
            ),
            Direction::Left => (
                rows.then(|| pick(next_row_rightmost, previous_row_rightmost)),
                (vertical_layout && rtl).then_some(previous_column_lowest as BetterIcon),
            ),
            Direction::Down => (
                columns.then(|| pick(previous_column_highest, next_column_highest)),
                (!vertical_layout).then(|| pick(next_row_leftmost, next_row_rightmost)),
            ),
            Direction::Up => (
                columns.then(|| pick(next_column_lowest, previous_column_lowest)),
                None,
            ),
        }
    }

    /// First icon in reading order.
    pub fn home(&self) -> Option<IconId> {
        let mut state = SearchState::new(None, Point::ZERO, Direction::Up);
        self.find_best(self.empty_start(), &mut state)
    }

    /// Last icon in reading order.
    pub fn end(&self) -> Option<IconId> {
        let better = if self.rtl {
            leftmost_in_bottom_row
        } else {
            rightmost_in_bottom_row
        };
        let mut state = SearchState::new(None, Point::ZERO, Direction::Down);
        self.find_best(better, &mut state)
    }
}

fn better_start(direction: Direction) -> BetterIcon {
    match direction {
        Direction::Right | Direction::Down => rightmost_in_bottom_row,
        Direction::Left | Direction::Up => leftmost_in_top_row,
    }
}

fn same_line_destination(direction: Direction) -> BetterIcon {
    match direction {
        Direction::Right => same_row_right_side_leftmost,
        Direction::Left => same_row_left_side_rightmost,
        Direction::Down => same_column_below_highest,
        Direction::Up => same_column_above_lowest,
    }
}

pub fn leftmost_in_top_row(
    nav: &Navigator<'_>,
    _: &mut SearchState,
    best: Option<IconId>,
    candidate: IconId,
) -> bool {
    best.is_none_or(|best| nav.compare_vertical_first(best, candidate).is_gt())
}

pub fn rightmost_in_top_row(
    nav: &Navigator<'_>,
    _: &mut SearchState,
    best: Option<IconId>,
    candidate: IconId,
) -> bool {
    best.is_none_or(|best| {
        nav.compare_vertical(best, candidate)
            .then_with(|| nav.compare_horizontal(candidate, best))
            .then_with(|| nav.compare_by_uri(best, candidate))
            .is_gt()
    })
}

pub fn leftmost_in_bottom_row(
    nav: &Navigator<'_>,
    _: &mut SearchState,
    best: Option<IconId>,
    candidate: IconId,
) -> bool {
    best.is_none_or(|best| {
        nav.compare_vertical(candidate, best)
            .then_with(|| nav.compare_horizontal(best, candidate))
            .then_with(|| nav.compare_by_uri(candidate, best))
            .is_gt()
    })
}

pub fn rightmost_in_bottom_row(
    nav: &Navigator<'_>,
    _: &mut SearchState,
    best: Option<IconId>,
    candidate: IconId,
) -> bool {
    best.is_none_or(|best| nav.compare_vertical_first(best, candidate).is_lt())
}

pub fn same_row_right_side_leftmost(
    nav: &Navigator<'_>,
    state: &mut SearchState,
    best: Option<IconId>,
    candidate: IconId,
) -> bool {
    let Some(start) = state.start else { return false };
    if nav.compare_vertical(candidate, start).is_ne() {
        return false;
    }
    if best.is_some_and(|best| nav.compare_horizontal_first(best, candidate).is_lt()) {
        return false;
    }
    nav.compare_horizontal_first(candidate, start).is_gt()
}

pub fn same_row_left_side_rightmost(
    nav: &Navigator<'_>,
    state: &mut SearchState,
    best: Option<IconId>,
    candidate: IconId,
) -> bool {
    let Some(start) = state.start else { return false };
    if nav.compare_vertical(candidate, start).is_ne() {
        return false;
    }
    if best.is_some_and(|best| nav.compare_horizontal_first(best, candidate).is_gt()) {
        return false;
    }
    nav.compare_horizontal_first(candidate, start).is_lt()
}

pub fn same_column_above_lowest(
    nav: &Navigator<'_>,
    state: &mut SearchState,
    best: Option<IconId>,
    candidate: IconId,
) -> bool {
    let Some(start) = state.start else { return false };
    if nav.compare_with_start_column(state, candidate).is_ne() {
        return false;
    }
    if best.is_some_and(|best| nav.compare_vertical_first(best, candidate).is_gt()) {
        return false;
    }
    nav.compare_vertical_first(candidate, start).is_lt()
}

pub fn same_column_below_highest(
    nav: &Navigator<'_>,
    state: &mut SearchState,
    best: Option<IconId>,
    candidate: IconId,
) -> bool {
    let Some(start) = state.start else { return false };
    if nav.compare_with_start_column(state, candidate).is_ne() {
        return false;
    }
    if best.is_some_and(|best| nav.compare_vertical_first(best, candidate).is_lt()) {
        return false;
    }
    nav.compare_vertical_first(candidate, start).is_gt()
}

/// Nearest row below the start, then by `prefer_left` within the row.
fn next_row(
    nav: &Navigator<'_>,
    state: &SearchState,
    best: Option<IconId>,
    candidate: IconId,
    prefer_left: bool,
) -> bool {
    if nav.compare_with_start_row(state, candidate).is_ge() {
        return false;
    }
    best.is_none_or(|best| match nav.compare_vertical(best, candidate) {
        Ordering::Greater => true,
        Ordering::Less => false,
        Ordering::Equal => {
            let horizontal = nav.compare_horizontal_first(best, candidate);
            if prefer_left { horizontal.is_gt() } else { horizontal.is_lt() }
        }
    })
}

/// Nearest row above the start, then by `prefer_left` within the row.
fn previous_row(
    nav: &Navigator<'_>,
    state: &SearchState,
    best: Option<IconId>,
    candidate: IconId,
    prefer_left: bool,
) -> bool {
    if nav.compare_with_start_row(state, candidate).is_le() {
        return false;
    }
    best.is_none_or(|best| match nav.compare_vertical(best, candidate) {
        Ordering::Less => true,
        Ordering::Greater => false,
        Ordering::Equal => {
            let horizontal = nav.compare_horizontal_first(best, candidate);
            if prefer_left { horizontal.is_gt() } else { horizontal.is_lt() }
        }
    })
}

/// Nearest column on one side of the start, then by `prefer_top` within the
/// column.
fn column(
    nav: &Navigator<'_>,
    state: &SearchState,
    best: Option<IconId>,
    candidate: IconId,
    to_right: bool,
    prefer_top: bool,
) -> bool {
    let side = nav.compare_with_start_column(state, candidate);
    if (to_right && side.is_ge()) || (!to_right && side.is_le()) {
        return false;
    }
    best.is_none_or(|best| {
        let horizontal = nav.compare_horizontal(best, candidate);
        let nearer = if to_right { horizontal.is_gt() } else { horizontal.is_lt() };
        if horizontal.is_ne() {
            return nearer;
        }
        let vertical = nav.compare_vertical_first(best, candidate);
        if prefer_top { vertical.is_gt() } else { vertical.is_lt() }
    })
}

pub fn next_row_leftmost(
    nav: &Navigator<'_>,
    state: &mut SearchState,
    best: Option<IconId>,
    candidate: IconId,
) -> bool {
    next_row(nav, state, best, candidate, true)
}

pub fn next_row_rightmost(
    nav: &Navigator<'_>,
    state: &mut SearchState,
    best: Option<IconId>,
    candidate: IconId,
) -> bool {
    next_row(nav, state, best, candidate, false)
}

pub fn previous_row_leftmost(
    nav: &Navigator<'_>,
    state: &mut SearchState,
    best: Option<IconId>,
    candidate: IconId,
) -> bool {
    previous_row(nav, state, best, candidate, true)
}

pub fn previous_row_rightmost(
    nav: &Navigator<'_>,
    state: &mut SearchState,
    best: Option<IconId>,
    candidate: IconId,
) -> bool {
    previous_row(nav, state, best, candidate, false)
}

pub fn next_column_highest(
    nav: &Navigator<'_>,
    state: &mut SearchState,
    best: Option<IconId>,
    candidate: IconId,
) -> bool {
    column(nav, state, best, candidate, true, true)
}

pub fn next_column_lowest(
    nav: &Navigator<'_>,
    state: &mut SearchState,
    best: Option<IconId>,
    candidate: IconId,
) -> bool {
    column(nav, state, best, candidate, true, false)
}

pub fn previous_column_highest(
    nav: &Navigator<'_>,
    state: &mut SearchState,
    best: Option<IconId>,
    candidate: IconId,
) -> bool {
    column(nav, state, best, candidate, false, true)
}

pub fn previous_column_lowest(
    nav: &Navigator<'_>,
    state: &mut SearchState,
    best: Option<IconId>,
    candidate: IconId,
) -> bool {
    column(nav, state, best, candidate, false, false)
}

/// Nearest icon inside the quarter plane the arrow points into.
pub fn closest_in_90_degrees(
    nav: &Navigator<'_>,
    state: &mut SearchState,
    best: Option<IconId>,
    candidate: IconId,
) -> bool {
    let point = nav.cmp_point(candidate);
    let dx = point.x - state.origin.x;
    let dy = point.y - state.origin.y;
    let outside = match state.direction {
        Direction::Up => dy > 0.0 || dx.abs() > dy.abs(),
        Direction::Down => dy < 0.0 || dx.abs() > dy.abs(),
        Direction::Left => dx > 0.0 || dy.abs() > dx.abs(),
        Direction::Right => dx < 0.0 || dy.abs() > dx.abs(),
    };
    if outside {
        return false;
    }
    let distance = dx * dx + dy * dy;
    if best.is_none() || distance < state.best_distance {
        state.best_distance = distance;
        return true;
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::icon::{IconData, IconMetrics};

    /// Icons at grid cells `(column, row)`, 100px apart.
    fn grid(cells: &[(u32, u32)]) -> (IconCanvas, Vec<IconId>) {
        let mut canvas = IconCanvas::new();
        let ids = cells
            .iter()
            .enumerate()
            .map(|(index, &(column, row))| {
                let mut icon = Icon::new(
                    IconData::from_uri(format!("file:///{index}-{column}-{row}")),
                    IconMetrics::default(),
                );
                icon.position = Some(Point::new(f64::from(column) * 100.0, f64::from(row) * 100.0));
                canvas.add_icon(icon).unwrap()
            })
            .collect();
        (canvas, ids)
    }

    fn nav<'a>(canvas: &'a IconCanvas, ids: &'a [IconId]) -> Navigator<'a> {
        Navigator::new(canvas, ids, LabelPosition::Under, false)
    }

    #[test]
    fn test_compare_vertical_first_breaks_ties_by_uri() {
        let (canvas, ids) = grid(&[(0, 0), (0, 0)]);
        let nav = nav(&canvas, &ids);
        assert_eq!(nav.compare_vertical(ids[0], ids[1]), Ordering::Equal);
        assert_ne!(nav.compare_vertical_first(ids[0], ids[1]), Ordering::Equal);
        assert_eq!(
            nav.compare_vertical_first(ids[0], ids[1]),
            nav.compare_vertical_first(ids[1], ids[0]).reverse()
        );
    }

    #[test]
    fn test_home_and_end() {
        let (canvas, ids) = grid(&[(1, 1), (0, 1), (2, 0), (0, 0)]);
        let nav = nav(&canvas, &ids);
        assert_eq!(nav.home(), Some(ids[3]));
        assert_eq!(nav.end(), Some(ids[0]));
        let rtl = Navigator::new(&canvas, &ids, LabelPosition::Under, true);
        assert_eq!(rtl.home(), Some(ids[2]));
        assert_eq!(rtl.end(), Some(ids[1]));
    }

    #[test]
    fn test_right_moves_within_row_then_wraps() {
        // 0 1 2
        // 3
        let (canvas, ids) = grid(&[(0, 0), (1, 0), (2, 0), (0, 1)]);
        let nav = nav(&canvas, &ids);
        assert_eq!(nav.arrow_key_destination(ids[0], Direction::Right, true, false, true), ids[1]);
        assert_eq!(nav.arrow_key_destination(ids[2], Direction::Right, true, false, true), ids[3]);
        // Without wrapping the focus stays.
        assert_eq!(nav.arrow_key_destination(ids[2], Direction::Right, true, false, false), ids[2]);
    }

    #[test]
    fn test_left_wraps_to_previous_row_end() {
        let (canvas, ids) = grid(&[(0, 0), (1, 0), (2, 0), (0, 1)]);
        let nav = nav(&canvas, &ids);
        assert_eq!(nav.arrow_key_destination(ids[3], Direction::Left, true, false, true), ids[2]);
        assert_eq!(nav.arrow_key_destination(ids[0], Direction::Left, true, false, true), ids[0]);
    }

    #[test]
    fn test_down_from_ragged_row_reaches_last_row() {
        // 0 1 2
        // 3
        let (canvas, ids) = grid(&[(0, 0), (1, 0), (2, 0), (0, 1)]);
        let nav = nav(&canvas, &ids);
        assert_eq!(nav.arrow_key_destination(ids[0], Direction::Down, true, false, true), ids[3]);
        assert_eq!(nav.arrow_key_destination(ids[2], Direction::Down, true, false, true), ids[3]);
        assert_eq!(nav.arrow_key_destination(ids[1], Direction::Down, true, false, true), ids[3]);
    }

    #[test]
    fn test_right_in_column_layout_reaches_next_column() {
        // 0 3
        // 1
        // 2
        let (canvas, ids) = grid(&[(0, 0), (0, 1), (0, 2), (1, 0)]);
        let nav = nav(&canvas, &ids);
        assert_eq!(nav.arrow_key_destination(ids[2], Direction::Right, true, true, true), ids[3]);
        assert_eq!(nav.arrow_key_destination(ids[0], Direction::Right, true, true, true), ids[3]);
    }

    #[test]
    fn test_right_past_short_row_lands_on_lowest_of_next_column() {
        // 0 3
        // 1 4
        // 2
        let (canvas, ids) = grid(&[(0, 0), (0, 1), (0, 2), (1, 0), (1, 1)]);
        let nav = nav(&canvas, &ids);
        assert_eq!(nav.arrow_key_destination(ids[2], Direction::Right, true, true, true), ids[4]);
        assert_eq!(nav.arrow_key_destination(ids[1], Direction::Right, true, true, true), ids[4]);
    }

    #[test]
    fn test_down_in_column_layout_wraps_to_next_column_top() {
        let (canvas, ids) = grid(&[(0, 0), (0, 1), (1, 0), (1, 1)]);
        let nav = nav(&canvas, &ids);
        assert_eq!(nav.arrow_key_destination(ids[1], Direction::Down, true, true, true), ids[2]);
        assert_eq!(nav.arrow_key_destination(ids[2], Direction::Up, true, true, true), ids[1]);
    }

    #[test]
    fn test_up_down_are_inverse() {
        let (canvas, ids) = grid(&[(0, 0), (0, 1), (1, 0), (1, 1)]);
        let nav = nav(&canvas, &ids);
        let down = nav.arrow_key_destination(ids[0], Direction::Down, true, false, true);
        assert_eq!(down, ids[1]);
        assert_eq!(nav.arrow_key_destination(down, Direction::Up, true, false, true), ids[0]);
    }

    #[test]
    fn test_closest_in_90_degrees_in_manual_layout() {
        let mut canvas = IconCanvas::new();
        let mut add = |x: f64, y: f64, name: &str| {
            let data = IconData::from_uri(format!("file:///{name}"));
            let mut icon = Icon::new(data, IconMetrics::default());
            icon.position = Some(Point::new(x, y));
            canvas.add_icon(icon).unwrap()
        };
        let start = add(200.0, 200.0, "start");
        let diagonal = add(300.0, 60.0, "diagonal");
        let right_far = add(500.0, 230.0, "far");
        let right_near = add(330.0, 180.0, "near");
        let ids = vec![start, diagonal, right_far, right_near];
        let nav = Navigator::new(&canvas, &ids, LabelPosition::Under, false);

        assert_eq!(
            nav.arrow_key_destination(start, Direction::Right, false, false, true),
            right_near
        );
        assert_eq!(nav.arrow_key_destination(start, Direction::Up, false, false, true), diagonal);
        assert_eq!(nav.arrow_key_destination(start, Direction::Left, false, false, true), start);
    }

    #[test]
    fn test_arrow_key_start() {
        let (mut canvas, ids) = grid(&[(0, 0), (1, 0), (0, 1), (1, 1)]);
        {
            let nav = nav(&canvas, &ids);
            assert_eq!(nav.arrow_key_start(None, Direction::Right), None);
            assert_eq!(nav.arrow_key_start(Some(ids[2]), Direction::Right), Some(ids[2]));
        }
        canvas.get_mut(ids[1]).unwrap().selected = true;
        assert_eq!(nav(&canvas, &ids).arrow_key_start(None, Direction::Left), Some(ids[1]));

        canvas.get_mut(ids[2]).unwrap().selected = true;
        let nav = nav(&canvas, &ids);
        assert_eq!(nav.arrow_key_start(None, Direction::Right), Some(ids[2]));
        assert_eq!(nav.arrow_key_start(None, Direction::Left), Some(ids[1]));
    }

    #[test]
    fn test_find_best_selected_skips_unselected() {
        let (mut canvas, ids) = grid(&[(0, 0), (1, 0), (2, 0)]);
        canvas.get_mut(ids[1]).unwrap().selected = true;
        let nav = nav(&canvas, &ids);
        let mut state = SearchState::new(None, Point::ZERO, Direction::Up);
        assert_eq!(nav.find_best_selected(leftmost_in_top_row, &mut state), Some(ids[1]));
        assert_eq!(nav.find_best(leftmost_in_top_row, &mut state), Some(ids[0]));
    }
}
