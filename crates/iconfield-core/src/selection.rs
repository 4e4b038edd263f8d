//! Selection state: selected flags, range selection, rubberband and keyboard
//! focus.
//!
//! The selected flag lives on each [`Icon`](crate::icon::Icon); this model
//! keeps the icons that selection operations refer back to. Every operation
//! reports whether any flag changed so callers can notify once per user
//! action.

use crate::canvas::IconCanvas;
use crate::icon::{IconId, LabelPosition};
use kurbo::Rect;

/// Range selection base and keyboard focus.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionModel {
    /// Anchor for shift-click and shift-arrow range selection.
    range_base: Option<IconId>,
    /// Icon the keyboard cursor is on.
    keyboard_focus: Option<IconId>,
}

impl SelectionModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn range_base(&self) -> Option<IconId> {
        self.range_base
    }

    pub fn set_range_base(&mut self, id: Option<IconId>) {
        self.range_base = id;
    }

    pub fn keyboard_focus(&self) -> Option<IconId> {
        self.keyboard_focus
    }

    pub fn set_keyboard_focus(&mut self, id: IconId) {
        self.keyboard_focus = Some(id);
    }

    pub fn clear_keyboard_focus(&mut self) {
        self.keyboard_focus = None;
    }

    /// Drop every reference to a removed icon.
    pub fn forget(&mut self, id: IconId) {
        if self.range_base == Some(id) {
            self.range_base = None;
        }
        if self.keyboard_focus == Some(id) {
            self.keyboard_focus = None;
        }
    }

    /// Set one icon's flag. Returns true if it changed.
    pub fn set_selected(&self, canvas: &mut IconCanvas, id: IconId, selected: bool) -> bool {
        match canvas.get_mut(id) {
            Some(icon) if icon.selected != selected => {
                icon.selected = selected;
                true
            }
            _ => false,
        }
    }

    /// Flip one icon's flag.
    pub fn toggle(&self, canvas: &mut IconCanvas, id: IconId) -> bool {
        let Some(selected) = canvas.get(id).map(|icon| icon.selected) else {
            return false;
        };
        self.set_selected(canvas, id, !selected)
    }

    /// Select a single icon and make it the range base.
    pub fn select_one_unselect_others(&mut self, canvas: &mut IconCanvas, id: IconId) -> bool {
        let ids: Vec<IconId> = canvas.ids().to_vec();
        let mut changed = false;
        for other in ids {
            changed |= self.set_selected(canvas, other, other == id);
        }
        if canvas.contains(id) {
            self.range_base = Some(id);
        }
        changed
    }

    /// Select exactly the given icons.
    pub fn select_list_unselect_others(
        &mut self,
        canvas: &mut IconCanvas,
        list: &[IconId],
    ) -> bool {
        let ids: Vec<IconId> = canvas.ids().to_vec();
        let mut changed = false;
        for id in ids {
            changed |= self.set_selected(canvas, id, list.contains(&id));
        }
        changed
    }

    pub fn select_all(&self, canvas: &mut IconCanvas) -> bool {
        let ids: Vec<IconId> = canvas.ids().to_vec();
        ids.into_iter()
            .fold(false, |changed, id| self.set_selected(canvas, id, true) | changed)
    }

    pub fn unselect_all(&self, canvas: &mut IconCanvas) -> bool {
        let ids: Vec<IconId> = canvas.ids().to_vec();
        ids.into_iter()
            .fold(false, |changed, id| self.set_selected(canvas, id, false) | changed)
    }

    /// Flip every icon's flag.
    pub fn invert(&self, canvas: &mut IconCanvas) -> bool {
        let ids: Vec<IconId> = canvas.ids().to_vec();
        let changed = !ids.is_empty();
        for id in ids {
            self.toggle(canvas, id);
        }
        changed
    }

    /// Select every icon between `a` and `b` (inclusive) in display order.
    /// With `unselect_outside`, icons outside the range are unselected. Does
    /// nothing if either end is not in `order`.
    pub fn select_range(
        &self,
        canvas: &mut IconCanvas,
        order: &[IconId],
        a: IconId,
        b: IconId,
        unselect_outside: bool,
    ) -> bool {
        if !order.contains(&a) || !order.contains(&b) {
            return false;
        }

        let mut unmatched: Option<IconId> = None;
        let mut select = false;
        let mut changed = false;
        for &id in order {
            if unmatched.is_none() {
                if id == a {
                    unmatched = Some(b);
                    select = true;
                } else if id == b {
                    unmatched = Some(a);
                    select = true;
                }
            }
            if select || unselect_outside {
                changed |= self.set_selected(canvas, id, select);
            }
            if unmatched == Some(id) {
                select = false;
            }
        }
        changed
    }

    /// Remember each icon's flag before a rubberband drag starts.
    pub fn start_rubberband(&self, canvas: &mut IconCanvas) {
        let ids: Vec<IconId> = canvas.ids().to_vec();
        for id in ids {
            if let Some(icon) = canvas.get_mut(id) {
                icon.was_selected_before_rubberband = icon.selected;
            }
        }
    }

    /// Select `previous XOR inside(rect)` for every icon.
    pub fn apply_rubberband(
        &self,
        canvas: &mut IconCanvas,
        rect: Rect,
        label_position: LabelPosition,
    ) -> bool {
        let rect = rect.abs();
        let ids: Vec<IconId> = canvas.ids().to_vec();
        let mut changed = false;
        for id in ids {
            let Some(icon) = canvas.get(id) else { continue };
            let inside = icon.intersects(rect, label_position);
            let selected = icon.was_selected_before_rubberband ^ inside;
            changed |= self.set_selected(canvas, id, selected);
        }
        changed
    }

    /// Selected icons in the given order.
    pub fn selected(&self, canvas: &IconCanvas, order: &[IconId]) -> Vec<IconId> {
        order
            .iter()
            .copied()
            .filter(|&id| canvas.get(id).is_some_and(|icon| icon.selected))
            .collect()
    }

    pub fn selection_count(&self, canvas: &IconCanvas) -> usize {
        canvas.icons_ordered().filter(|(_, icon)| icon.selected).count()
    }

    /// Whether every icon is selected.
    pub fn all_selected(&self, canvas: &IconCanvas) -> bool {
        canvas.icons_ordered().all(|(_, icon)| icon.selected)
    }
}
