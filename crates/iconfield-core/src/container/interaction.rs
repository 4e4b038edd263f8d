//! Pointer handling: clicks, rubberband selection, stretching and starting
//! drags.

use super::{Container, ContainerEvent};
use crate::dnd::autoscroll::{RUBBERBAND_SCROLL_INTERVAL, rubberband_delta};
use crate::dnd::session::StretchState;
use crate::error::{ContainerError, ContainerResult};
use crate::host::{ContainerDelegate, DragSource};
use crate::icon::{Corner, IconId};
use crate::input::{Modifiers, MouseButton, PointerEvent};
use crate::timer::{Instant, Timer};
use crate::wire::DragTarget;
use kurbo::{Point, Rect, Vec2};

/// A rubberband selection in progress.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rubberband {
    /// Press point in canvas units.
    pub start: Point,
    /// Current corner in canvas units.
    pub current: Point,
    /// Last pointer position in widget pixels, possibly outside the widget.
    pub pointer: Point,
    pub(crate) timer: Timer,
}

impl Rubberband {
    /// Selected area in canvas units.
    pub fn rect(&self) -> Rect {
        Rect::from_points(self.start, self.current)
    }
}

impl<D: ContainerDelegate> Container<D> {
    pub fn rubberband(&self) -> Option<&Rubberband> {
        self.rubberband.as_ref()
    }

    /// Scroll the view by a pixel delta. Returns how far it moved.
    pub fn scroll_by(&mut self, delta: Vec2) -> Vec2 {
        let scrolled = self.viewport.scroll_by(delta);
        if scrolled != Vec2::ZERO {
            self.drag.shift_start(scrolled);
            self.update_rubberband();
        }
        scrolled
    }

    /// Handle a button press at a widget position. Returns true if the
    /// press was used.
    pub fn button_press(
        &mut self,
        position: Point,
        button: MouseButton,
        modifiers: Modifiers,
        now: Instant,
    ) -> bool {
        self.input.set_modifiers(modifiers);
        self.input
            .handle_pointer_event(PointerEvent::Down { position, button }, now);
        let double_click = self.input.is_double_click();
        let point = self.viewport.widget_to_canvas(position);
        let label_position = self.label_position;

        if button == MouseButton::Left {
            if let Some((id, corner)) = self.stretch_handle_at(point) {
                self.start_stretch(id, corner, point, position);
                return true;
            }
        }

        match self.canvas.icon_at_point(point, label_position) {
            Some(id) => self.press_on_icon(id, point, position, button, modifiers, double_click),
            None => self.press_on_background(point, position, button, modifiers, now),
        }
        true
    }

    fn stretch_handle_at(&self, point: Point) -> Option<(IconId, Corner)> {
        self.canvas.ids().iter().rev().find_map(|&id| {
            self.canvas
                .get(id)
                .and_then(|icon| icon.stretch_handle_at(point, self.label_position))
                .map(|corner| (id, corner))
        })
    }

    fn start_stretch(&mut self, id: IconId, corner: Corner, point: Point, position: Point) {
        let Some(icon) = self.canvas.get(id) else { return };
        let stretch = StretchState::new(id, icon, corner, point, self.label_position);
        log::debug!("Stretching {:?} from {:?}", id, corner);
        self.drag.press_stretch(MouseButton::Left, stretch, position);
    }

    fn press_on_icon(
        &mut self,
        id: IconId,
        point: Point,
        position: Point,
        button: MouseButton,
        modifiers: Modifiers,
        double_click: bool,
    ) {
        let was_selected = self.canvas.get(id).is_some_and(|icon| icon.selected);

        if button == MouseButton::Left && double_click {
            self.drag.reset();
            let selection = self.selection();
            let activate = if selection.is_empty() { vec![id] } else { selection };
            self.events.push(ContainerEvent::Activate(activate));
            return;
        }

        let mut changed = false;
        if button == MouseButton::Right {
            if !was_selected {
                changed = self.selection.select_one_unselect_others(&mut self.canvas, id);
            }
            self.selection.set_keyboard_focus(id);
            self.notify_selection_changed(changed);
            self.events.push(ContainerEvent::ContextClickSelection(point));
            return;
        }

        if modifiers.shift {
            let base = self.selection.range_base().unwrap_or(id);
            changed = self
                .selection
                .select_range(&mut self.canvas, &self.order, base, id, !modifiers.ctrl);
        } else if !was_selected {
            // Ctrl adds to the selection; a plain press replaces it.
            changed = if modifiers.ctrl {
                self.selection.set_selected(&mut self.canvas, id, true)
            } else {
                self.selection.select_one_unselect_others(&mut self.canvas, id)
            };
            self.selection.set_range_base(Some(id));
        }
        self.selection.set_keyboard_focus(id);
        self.drag.press(button, id, point, position, was_selected);
        self.notify_selection_changed(changed);
    }

    fn press_on_background(
        &mut self,
        point: Point,
        position: Point,
        button: MouseButton,
        modifiers: Modifiers,
        now: Instant,
    ) {
        let mut changed = false;
        if !modifiers.extends_selection() {
            changed = self.selection.unselect_all(&mut self.canvas);
        }
        match button {
            MouseButton::Right => {
                self.notify_selection_changed(changed);
                self.events.push(ContainerEvent::ContextClickBackground(point));
            }
            MouseButton::Left => {
                self.selection.start_rubberband(&mut self.canvas);
                self.rubberband = Some(Rubberband {
                    start: point,
                    current: point,
                    pointer: position,
                    timer: Timer::new(now, RUBBERBAND_SCROLL_INTERVAL),
                });
                self.drag.press_background(button, point, position);
                self.notify_selection_changed(changed);
            }
            MouseButton::Middle => {
                self.drag.press_background(button, point, position);
                self.notify_selection_changed(changed);
            }
        }
    }

    /// Handle pointer motion at a widget position. Returns true if a drag
    /// was started through `source`.
    pub fn pointer_motion(
        &mut self,
        position: Point,
        source: &mut impl DragSource,
        now: Instant,
    ) -> ContainerResult<bool> {
        self.input
            .handle_pointer_event(PointerEvent::Move { position }, now);

        if let Some(band) = self.rubberband.as_mut() {
            band.pointer = position;
            self.update_rubberband();
            return Ok(false);
        }

        if let Some(stretch) = self.drag.stretch {
            let point = self.viewport.widget_to_canvas(position);
            let label_position = self.label_position;
            if let Some(icon) = self.canvas.get_mut(stretch.icon) {
                stretch.apply(icon, point, label_position);
            }
            return Ok(false);
        }

        if !self.drag.should_start_drag(position, self.drag_threshold) {
            return Ok(false);
        }
        let Some(button) = self.drag.button else {
            return Ok(false);
        };
        if self.selection.selection_count(&self.canvas) == 0 {
            self.drag.reset();
            return Err(ContainerError::EmptySelection);
        }
        self.drag.mark_started();
        source.begin_drag(
            &DragTarget::SOURCE_TARGETS,
            self.drag.actions(),
            button,
            self.drag.start_widget,
        );
        Ok(true)
    }

    /// Handle a button release at a widget position.
    pub fn button_release(&mut self, position: Point, button: MouseButton, now: Instant) {
        self.input
            .handle_pointer_event(PointerEvent::Up { position, button }, now);
        if self.drag.button != Some(button) {
            return;
        }

        if let Some(mut band) = self.rubberband.take() {
            band.pointer = position;
            band.current = self.viewport.widget_to_canvas(position);
            let changed = self
                .selection
                .apply_rubberband(&mut self.canvas, band.rect(), self.label_position);
            self.notify_selection_changed(changed);
        } else if let Some(stretch) = self.drag.stretch {
            self.end_stretch(stretch, position);
        } else if !self.drag.started {
            self.apply_deferred_selection();
        }

        if !self.drag.started {
            self.drag.reset();
        }
    }

    fn end_stretch(&mut self, stretch: StretchState, position: Point) {
        let point = self.viewport.widget_to_canvas(position);
        let params = self.layout_params();
        let Some(icon) = self.canvas.get_mut(stretch.icon) else {
            return;
        };
        stretch.apply(icon, point, params.label_position);
        let origin = icon.origin();
        let width = icon.size(params.label_position).width;
        icon.saved_ltr_x = crate::layout::ltr_x(&params, origin.x, width);
        log::debug!("Stretched {:?} to scale {:.3}", stretch.icon, icon.scale);

        self.drag.reset();
        if self.auto_layout {
            self.request_relayout();
        } else {
            self.emit_position(stretch.icon);
            self.update_scroll_region();
        }
        self.events.push(ContainerEvent::LayoutChanged);
    }

    /// A click that did not become a drag. Ctrl on a selected icon
    /// unselects it; a plain click on a selected icon selects it alone.
    fn apply_deferred_selection(&mut self) {
        let Some(id) = self.drag.icon else { return };
        if !self.drag.icon_was_selected {
            return;
        }
        let modifiers = self.input.modifiers;
        let changed = if modifiers.shift {
            false
        } else if modifiers.ctrl {
            self.selection.set_selected(&mut self.canvas, id, false)
        } else {
            self.selection.select_one_unselect_others(&mut self.canvas, id)
        };
        self.notify_selection_changed(changed);
    }

    /// Recompute the rubberband from its last pointer position.
    fn update_rubberband(&mut self) {
        let Some(band) = self.rubberband.as_mut() else { return };
        band.current = self.viewport.widget_to_canvas(band.pointer);
        let rect = band.rect();
        let changed = self
            .selection
            .apply_rubberband(&mut self.canvas, rect, self.label_position);
        self.notify_selection_changed(changed);
    }

    /// Scroll while the rubberband pointer is outside the widget.
    pub(crate) fn rubberband_tick(&mut self, now: Instant) {
        let Some(band) = self.rubberband.as_mut() else { return };
        if !band.timer.poll(now) {
            return;
        }
        let delta = rubberband_delta(band.pointer, self.viewport.size);
        if delta != Vec2::ZERO {
            self.scroll_by(delta);
        }
    }
}
