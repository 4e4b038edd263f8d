//! The icon container.
//!
//! A [`Container`] owns the icons, their layout, the selection and the drag
//! and drop sessions. The host feeds it input and drives its timers; the
//! container answers with [`ContainerEvent`]s drained by
//! [`Container::take_events`].

mod drop;
mod interaction;

pub use interaction::Rubberband;

use crate::canvas::IconCanvas;
use crate::config::ContainerConfig;
use crate::dnd::action::DragAction;
use crate::dnd::autoscroll::Autoscroll;
use crate::dnd::session::DragSession;
use crate::dnd::target::DropSession;
use crate::error::{ContainerError, ContainerResult};
use crate::host::ContainerDelegate;
use crate::icon::{Icon, IconData, IconId, IconMetrics, LabelPosition};
use crate::input::{InputState, Key, Modifiers};
use crate::layout::{
    self, CONTAINER_PAD_BOTTOM, CONTAINER_PAD_LEFT, CONTAINER_PAD_RIGHT, CONTAINER_PAD_TOP,
    LayoutMode, LayoutParams, mirror_x,
};
use crate::navigation::{Direction, Navigator};
use crate::selection::SelectionModel;
use crate::timer::{Duration, IdleSlot, Instant, Timer};
use crate::viewport::{Viewport, ZoomLevel};
use crate::wire::SelectionListItem;
use kurbo::{Point, Rect, Size};
use serde::{Deserialize, Serialize};

/// Delay before the icon reached with the keyboard is scrolled into view.
pub const KEYBOARD_REVEAL_DELAY: Duration = Duration::from_millis(10);

/// Position of an icon as the owner stores it. `x` is always the
/// left-to-right x.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StoredPosition {
    pub x: f64,
    pub y: f64,
    pub scale: f64,
}

/// Notifications for the container's owner.
#[derive(Debug, Clone, PartialEq)]
pub enum ContainerEvent {
    /// An icon got a position the owner should store.
    IconPositionChanged {
        id: IconId,
        uri: String,
        position: StoredPosition,
    },
    /// Icons were dropped and should be moved, copied or linked.
    MoveCopyItems {
        uris: Vec<String>,
        /// Drop position of each item, only for drops on the background.
        positions: Vec<Option<Point>>,
        target_uri: String,
        action: DragAction,
        point: Point,
    },
    HandleUriList {
        uris: Vec<String>,
        target_uri: String,
        action: DragAction,
        point: Point,
    },
    HandleNetscapeUrl {
        url: String,
        target_uri: String,
        action: DragAction,
        point: Point,
    },
    HandleText {
        text: String,
        target_uri: String,
        action: DragAction,
        point: Point,
    },
    HandleRaw {
        data: Vec<u8>,
        target_uri: String,
        direct_save_uri: Option<String>,
        action: DragAction,
        point: Point,
    },
    SelectionChanged,
    /// The arrangement changed in a way the owner may want to save.
    LayoutChanged,
    /// The icon highlighted as drop target changed.
    DropTargetChanged(Option<IconId>),
    /// Open these icons.
    Activate(Vec<IconId>),
    /// Context menu for the selection, at a canvas point.
    ContextClickSelection(Point),
    /// Context menu for the background, at a canvas point.
    ContextClickBackground(Point),
}

/// A field of icons.
pub struct Container<D: ContainerDelegate> {
    delegate: D,
    canvas: IconCanvas,
    /// Display order. Sorted by the delegate in auto layout, insertion order
    /// otherwise.
    order: Vec<IconId>,
    /// Icons added since the last layout pass.
    new_icons: Vec<IconId>,
    layout_mode: LayoutMode,
    label_position: LabelPosition,
    auto_layout: bool,
    keep_aligned: bool,
    tighter_layout: bool,
    is_desktop: bool,
    drag_threshold: f64,
    default_metrics: IconMetrics,
    viewport: Viewport,
    selection: SelectionModel,
    input: InputState,
    drag: DragSession,
    drop: DropSession,
    autoscroll: Option<Autoscroll>,
    rubberband: Option<Rubberband>,
    keyboard_reveal: Option<(Timer, IconId)>,
    /// Icon whose label is being edited.
    renaming: Option<IconId>,
    relayout: IdleSlot,
    events: Vec<ContainerEvent>,
}

impl<D: ContainerDelegate> Container<D> {
    /// Create a container with a widget allocation of `size` pixels.
    pub fn new(config: &ContainerConfig, delegate: D, size: Size) -> Self {
        let mut viewport = Viewport::new(size);
        viewport.zoom = config.zoom_level;
        viewport.margins = config.margins;
        Self {
            delegate,
            canvas: IconCanvas::new(),
            order: Vec::new(),
            new_icons: Vec::new(),
            layout_mode: config.layout_mode,
            label_position: config.label_position,
            auto_layout: config.auto_layout,
            keep_aligned: config.keep_aligned,
            tighter_layout: config.tighter_layout,
            is_desktop: config.is_desktop,
            drag_threshold: config.drag_threshold,
            default_metrics: config.default_metrics,
            viewport,
            selection: SelectionModel::new(),
            input: InputState::new(),
            drag: DragSession::new(),
            drop: DropSession::new(),
            autoscroll: None,
            rubberband: None,
            keyboard_reveal: None,
            renaming: None,
            relayout: IdleSlot::new(),
            events: Vec::new(),
        }
    }

    pub fn delegate(&self) -> &D {
        &self.delegate
    }

    pub fn delegate_mut(&mut self) -> &mut D {
        &mut self.delegate
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Drain the pending notifications.
    pub fn take_events(&mut self) -> Vec<ContainerEvent> {
        std::mem::take(&mut self.events)
    }

    // --- Icons ---

    /// Add an icon with the default metrics.
    pub fn add(&mut self, data: IconData) -> ContainerResult<IconId> {
        let metrics = self.default_metrics;
        self.add_with_metrics(data, metrics)
    }

    pub fn add_with_metrics(
        &mut self,
        data: IconData,
        metrics: IconMetrics,
    ) -> ContainerResult<IconId> {
        self.insert(Icon::new(data, metrics))
    }

    /// Add an icon at a canvas position. A lazy position is only a hint and
    /// the icon moves to the nearest free spot.
    pub fn add_at(
        &mut self,
        data: IconData,
        position: Point,
        lazy: bool,
    ) -> ContainerResult<IconId> {
        let mut icon = Icon::new(data, self.default_metrics);
        icon.position = Some(position);
        icon.has_lazy_position = lazy;
        let width = icon.size(self.label_position).width;
        icon.saved_ltr_x = layout::ltr_x(&self.layout_params(), position.x, width);
        self.insert(icon)
    }

    fn insert(&mut self, icon: Icon) -> ContainerResult<IconId> {
        let id = self.canvas.add_icon(icon)?;
        self.order.push(id);
        self.new_icons.push(id);
        self.request_relayout();
        Ok(id)
    }

    /// Remove an icon and every reference to it.
    pub fn remove(&mut self, id: IconId) -> ContainerResult<()> {
        let icon = self
            .canvas
            .remove_icon(id)
            .ok_or_else(|| ContainerError::UnknownIcon(format!("{id:?}")))?;
        self.order.retain(|&other| other != id);
        self.new_icons.retain(|&other| other != id);
        self.selection.forget(id);
        self.drag.forget(id);
        if self.drop.target_icon == Some(id) {
            self.drop.forget(id);
            self.events.push(ContainerEvent::DropTargetChanged(None));
        }
        if self.keyboard_reveal.is_some_and(|(_, reveal)| reveal == id) {
            self.keyboard_reveal = None;
        }
        if self.renaming == Some(id) {
            self.stop_renaming();
        }
        if icon.selected {
            self.notify_selection_changed(true);
        }
        self.request_relayout();
        Ok(())
    }

    /// Remove every icon.
    pub fn clear(&mut self) {
        let had_selection = self.selection.selection_count(&self.canvas) > 0;
        self.stop_renaming();
        self.canvas.clear();
        self.order.clear();
        self.new_icons.clear();
        self.selection = SelectionModel::new();
        self.drag.reset();
        self.drop.reset();
        self.keyboard_reveal = None;
        self.relayout.cancel();
        self.notify_selection_changed(had_selection);
        self.update_scroll_region();
    }

    pub fn icon(&self, id: IconId) -> Option<&Icon> {
        self.canvas.get(id)
    }

    pub fn icon_by_uri(&self, uri: &str) -> Option<IconId> {
        self.canvas.icon_by_uri(uri)
    }

    /// Icons in display order.
    pub fn icons(&self) -> &[IconId] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.canvas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.canvas.is_empty()
    }

    /// Update an icon's measured sizes.
    pub fn set_metrics(&mut self, id: IconId, metrics: IconMetrics) -> ContainerResult<()> {
        let icon = self.icon_mut(id)?;
        icon.metrics = metrics;
        self.request_relayout();
        Ok(())
    }

    fn icon_mut(&mut self, id: IconId) -> ContainerResult<&mut Icon> {
        self.canvas
            .get_mut(id)
            .ok_or_else(|| ContainerError::UnknownIcon(format!("{id:?}")))
    }

    // --- Settings ---

    pub fn layout_mode(&self) -> LayoutMode {
        self.layout_mode
    }

    pub fn set_layout_mode(&mut self, mode: LayoutMode) {
        if self.layout_mode != mode {
            self.layout_mode = mode;
            self.request_relayout();
        }
    }

    pub fn label_position(&self) -> LabelPosition {
        self.label_position
    }

    pub fn set_label_position(&mut self, label_position: LabelPosition) {
        if self.label_position != label_position {
            self.label_position = label_position;
            self.request_relayout();
        }
    }

    pub fn is_auto_layout(&self) -> bool {
        self.auto_layout
    }

    pub fn set_auto_layout(&mut self, auto_layout: bool) {
        if self.auto_layout == auto_layout {
            return;
        }
        self.auto_layout = auto_layout;
        if auto_layout {
            self.request_relayout();
        }
        self.events.push(ContainerEvent::LayoutChanged);
    }

    pub fn is_keep_aligned(&self) -> bool {
        self.keep_aligned
    }

    /// Turning alignment on in manual layout snaps every icon to the grid.
    pub fn set_keep_aligned(&mut self, keep_aligned: bool) {
        if self.keep_aligned == keep_aligned {
            return;
        }
        self.keep_aligned = keep_aligned;
        if keep_aligned && !self.auto_layout {
            self.align_icons();
        }
    }

    pub fn set_tighter_layout(&mut self, tighter: bool) {
        if self.tighter_layout != tighter {
            self.tighter_layout = tighter;
            self.request_relayout();
        }
    }

    pub fn is_desktop(&self) -> bool {
        self.is_desktop
    }

    pub fn zoom_level(&self) -> ZoomLevel {
        self.viewport.zoom
    }

    pub fn set_zoom_level(&mut self, zoom: ZoomLevel) {
        if self.viewport.zoom != zoom {
            self.viewport.set_zoom(zoom);
            self.request_relayout();
        }
    }

    /// The widget allocation changed.
    pub fn set_size(&mut self, size: Size) {
        if self.viewport.size != size {
            self.viewport.size = size;
            if self.auto_layout {
                self.request_relayout();
            } else {
                self.update_scroll_region();
            }
        }
    }

    pub fn is_rtl(&self) -> bool {
        self.layout_mode.is_rtl()
    }

    pub fn layout_params(&self) -> LayoutParams {
        LayoutParams {
            mode: self.layout_mode,
            label_position: self.label_position,
            extent: self.viewport.canvas_extent(),
            tighter: self.tighter_layout,
            keep_aligned: self.keep_aligned,
            is_desktop: self.is_desktop,
        }
    }

    // --- Layout ---

    /// Schedule a layout pass for the next idle.
    pub fn request_relayout(&mut self) {
        if self.relayout.request() {
            log::debug!("Relayout scheduled");
        }
    }

    pub fn cancel_relayout(&mut self) {
        self.relayout.cancel();
    }

    pub fn is_relayout_pending(&self) -> bool {
        self.relayout.is_pending()
    }

    /// Run the pending idle work.
    pub fn process_idle(&mut self) {
        if self.relayout.take() {
            self.relayout_now();
        }
    }

    /// Lay out now.
    pub fn relayout_now(&mut self) {
        if self.auto_layout && self.drag.is_stretching() {
            log::debug!("Relayout skipped while stretching");
            return;
        }
        self.relayout.cancel();
        let params = self.layout_params();

        if self.auto_layout {
            self.new_icons.clear();
            self.sort_icons();
            let order = self.order.clone();
            layout::lay_down_icons(&mut self.canvas, &order, &params, 0.0);
            if params.is_desktop_layout() {
                self.freeze_positions();
            }
        } else {
            self.finish_adding_new_icons(&params);
        }
        self.update_scroll_region();
    }

    fn sort_icons(&mut self) {
        let canvas = &self.canvas;
        let delegate = &self.delegate;
        self.order.sort_by(|&a, &b| match (canvas.get(a), canvas.get(b)) {
            (Some(a), Some(b)) => delegate.compare_icons(&a.data, &b.data),
            _ => std::cmp::Ordering::Equal,
        });
    }

    /// Manual layout: replay stored positions first, then fit lazy and
    /// unpositioned icons around them.
    fn finish_adding_new_icons(&mut self, params: &LayoutParams) {
        let new_icons = std::mem::take(&mut self.new_icons);
        for &id in &new_icons {
            let Some(icon) = self.canvas.get_mut(id) else { continue };
            if icon.is_positioned() {
                continue;
            }
            if let Some((stored, scale)) = self.delegate.get_stored_icon_position(&icon.data) {
                icon.scale = scale;
                let width = icon.size(params.label_position).width;
                let x = if params.is_rtl() {
                    mirror_x(params.extent.width, stored.x, width)
                } else {
                    stored.x
                };
                icon.position = Some(Point::new(x, stored.y));
                icon.saved_ltr_x = stored.x;
            }
        }

        let mut placed = layout::place_lazy_icons(&mut self.canvas, &new_icons, params);
        placed.extend(layout::place_unpositioned_icons(&mut self.canvas, &self.order, params));
        for id in placed {
            self.emit_position(id);
        }
    }

    /// Stop auto layout and report every position so it can be stored.
    pub fn freeze_positions(&mut self) {
        self.auto_layout = false;
        let ids: Vec<IconId> = self.order.clone();
        for id in ids {
            self.emit_position(id);
        }
        self.events.push(ContainerEvent::LayoutChanged);
    }

    fn emit_position(&mut self, id: IconId) {
        let Some(icon) = self.canvas.get(id) else { return };
        if !icon.is_positioned() {
            return;
        }
        self.events.push(ContainerEvent::IconPositionChanged {
            id,
            uri: icon.uri().to_string(),
            position: StoredPosition {
                x: icon.saved_ltr_x,
                y: icon.origin().y,
                scale: icon.scale,
            },
        });
    }

    /// Snap every icon to the grid.
    pub fn align_icons(&mut self) {
        let params = self.layout_params();
        let aligned = layout::align_icons(&mut self.canvas, &params);
        if aligned.is_empty() {
            return;
        }
        for id in aligned {
            self.emit_position(id);
        }
        self.update_scroll_region();
        self.events.push(ContainerEvent::LayoutChanged);
    }

    /// Move an icon. With `snap` the position is aligned to the grid; with
    /// `update_position` the new position is reported in manual layout.
    pub fn move_icon(
        &mut self,
        id: IconId,
        point: Point,
        scale: f64,
        raise: bool,
        snap: bool,
        update_position: bool,
    ) -> ContainerResult<()> {
        let params = self.layout_params();
        let icon = self.icon_mut(id)?;
        icon.scale = scale;
        let point = if snap {
            layout::snap_position(icon, params.label_position, point, params.extent)
        } else {
            point
        };
        icon.position = Some(point);
        icon.has_lazy_position = false;
        icon.saved_ltr_x = layout::ltr_x(&params, point.x, icon.size(params.label_position).width);
        if raise {
            self.canvas.raise(id);
        }
        if update_position && !self.auto_layout {
            self.emit_position(id);
        }
        self.update_scroll_region();
        Ok(())
    }

    /// Fit the scroll region to the icons, never smaller than the view.
    pub fn update_scroll_region(&mut self) {
        let visible = Rect::from_origin_size(
            Point::ZERO,
            self.viewport.size / self.viewport.pixels_per_unit(),
        );
        let region = match self.canvas.bounds(self.label_position, true) {
            Some(bounds) => Rect::new(
                bounds.x0 - CONTAINER_PAD_LEFT,
                bounds.y0 - CONTAINER_PAD_TOP,
                bounds.x1 + CONTAINER_PAD_RIGHT,
                bounds.y1 + CONTAINER_PAD_BOTTOM,
            )
            .union(visible),
            None => visible,
        };
        self.viewport.set_scroll_region(region);
    }

    /// Scroll an icon into view.
    pub fn reveal_icon(&mut self, id: IconId) -> bool {
        let Some(icon) = self.canvas.get(id) else {
            return false;
        };
        let bounds = icon.entire_bounds(self.label_position);
        self.viewport.reveal(bounds)
    }

    // --- Selection ---

    fn notify_selection_changed(&mut self, changed: bool) {
        if changed {
            self.events.push(ContainerEvent::SelectionChanged);
            self.delegate.selection_changed_notify();
        }
    }

    /// Selected icons in display order.
    pub fn selection(&self) -> Vec<IconId> {
        self.selection.selected(&self.canvas, &self.order)
    }

    pub fn selected_uris(&self) -> Vec<String> {
        self.selection()
            .into_iter()
            .filter_map(|id| self.canvas.get(id).map(|icon| icon.uri().to_string()))
            .collect()
    }

    pub fn keyboard_focus(&self) -> Option<IconId> {
        self.selection.keyboard_focus()
    }

    pub fn range_selection_base(&self) -> Option<IconId> {
        self.selection.range_base()
    }

    pub fn select_all(&mut self) {
        let changed = self.selection.select_all(&mut self.canvas);
        self.notify_selection_changed(changed);
    }

    pub fn unselect_all(&mut self) {
        let changed = self.selection.unselect_all(&mut self.canvas);
        self.notify_selection_changed(changed);
    }

    pub fn invert_selection(&mut self) {
        let changed = self.selection.invert(&mut self.canvas);
        self.notify_selection_changed(changed);
    }

    /// Select exactly these icons.
    pub fn set_selection(&mut self, ids: &[IconId]) {
        let changed = self.selection.select_list_unselect_others(&mut self.canvas, ids);
        self.notify_selection_changed(changed);
    }

    /// Select or unselect one icon. Selecting makes it the range base.
    pub fn set_selected(&mut self, id: IconId, selected: bool) -> ContainerResult<()> {
        if !self.canvas.contains(id) {
            return Err(ContainerError::UnknownIcon(format!("{id:?}")));
        }
        let changed = self.selection.set_selected(&mut self.canvas, id, selected);
        if selected {
            self.selection.set_range_base(Some(id));
        }
        self.notify_selection_changed(changed);
        Ok(())
    }

    /// Select the icons between two icons in display order.
    pub fn select_range(&mut self, a: IconId, b: IconId, unselect_outside: bool) {
        let changed = self
            .selection
            .select_range(&mut self.canvas, &self.order, a, b, unselect_outside);
        self.notify_selection_changed(changed);
    }

    /// Show the stretch handles on an icon, hiding them elsewhere.
    pub fn show_stretch_handles(&mut self, id: IconId) -> ContainerResult<()> {
        if !self.canvas.contains(id) {
            return Err(ContainerError::UnknownIcon(format!("{id:?}")));
        }
        let ids: Vec<IconId> = self.canvas.ids().to_vec();
        for other in ids {
            if let Some(icon) = self.canvas.get_mut(other) {
                icon.show_stretch_handles = other == id;
            }
        }
        Ok(())
    }

    // --- Keyboard ---

    /// Handle a key press. Returns true if the key was used.
    pub fn key_press(&mut self, key: Key, modifiers: Modifiers, now: Instant) -> bool {
        self.input.set_modifiers(modifiers);
        match key {
            Key::Up => self.arrow_key(Direction::Up, modifiers, now),
            Key::Down => self.arrow_key(Direction::Down, modifiers, now),
            Key::Left => self.arrow_key(Direction::Left, modifiers, now),
            Key::Right => self.arrow_key(Direction::Right, modifiers, now),
            Key::Home | Key::End => {
                let navigator = self.navigator();
                let target = if key == Key::Home { navigator.home() } else { navigator.end() };
                if let Some(target) = target {
                    self.keyboard_move_to(target, modifiers, now);
                }
            }
            Key::Escape => {
                if self.renaming.is_some() {
                    self.stop_renaming();
                } else if !self.cancel() {
                    self.selection.clear_keyboard_focus();
                }
            }
            Key::F2 => {
                let selection = self.selection();
                let [only] = selection.as_slice() else {
                    return false;
                };
                if let Some(icon) = self.canvas.get(*only) {
                    let data = icon.data.clone();
                    self.renaming = Some(*only);
                    self.delegate.start_rename(&data);
                }
            }
            Key::Space => {
                let Some(focus) = self.selection.keyboard_focus() else {
                    return false;
                };
                let changed = if modifiers.ctrl {
                    self.selection.toggle(&mut self.canvas, focus)
                } else {
                    self.selection.set_selected(&mut self.canvas, focus, true)
                };
                self.notify_selection_changed(changed);
            }
            Key::Return => {
                let selection = self.selection();
                if selection.is_empty() {
                    return false;
                }
                self.events.push(ContainerEvent::Activate(selection));
            }
        }
        true
    }

    fn navigator(&self) -> Navigator<'_> {
        Navigator::new(&self.canvas, &self.order, self.label_position, self.is_rtl())
    }

    fn arrow_key(&mut self, direction: Direction, modifiers: Modifiers, now: Instant) {
        let navigator = self.navigator();
        let focus = self.selection.keyboard_focus();
        let Some(from) = navigator.arrow_key_start(focus, direction) else {
            // Nothing focused yet: start at the first icon.
            if let Some(first) = navigator.home() {
                self.keyboard_move_to(first, modifiers, now);
            }
            return;
        };
        // Ctrl+Shift extends a rectangle, which must not wrap around.
        let wrap = !(modifiers.ctrl && modifiers.shift);
        let to = navigator.arrow_key_destination(
            from,
            direction,
            self.auto_layout,
            self.layout_mode.is_vertical(),
            wrap,
        );
        self.keyboard_move_to(to, modifiers, now);
    }

    /// Move the keyboard cursor. Ctrl moves the focus only, Shift extends
    /// the range from its base, otherwise the target alone is selected.
    fn keyboard_move_to(&mut self, id: IconId, modifiers: Modifiers, now: Instant) {
        let changed = if modifiers.shift {
            let base = self.selection.range_base().unwrap_or(id);
            self.selection
                .select_range(&mut self.canvas, &self.order, base, id, true)
        } else if modifiers.ctrl {
            false
        } else {
            self.selection.select_one_unselect_others(&mut self.canvas, id)
        };
        self.selection.set_keyboard_focus(id);
        self.keyboard_reveal = Some((Timer::new(now, KEYBOARD_REVEAL_DELAY), id));
        self.notify_selection_changed(changed);
    }

    // --- Timers ---

    /// Run the timers that are due.
    pub fn process_timers(&mut self, now: Instant) {
        if let Some((mut timer, id)) = self.keyboard_reveal {
            if timer.poll(now) {
                self.keyboard_reveal = None;
                self.reveal_icon(id);
            } else {
                self.keyboard_reveal = Some((timer, id));
            }
        }

        if let Some(autoscroll) = self.autoscroll.as_mut() {
            if let Some(delta) = autoscroll.tick(now, self.drop.pointer, self.viewport.size) {
                let scrolled = self.viewport.scroll_by(delta);
                if scrolled != kurbo::Vec2::ZERO {
                    self.drag.shift_start(scrolled);
                }
            }
        }

        self.rubberband_tick(now);
    }

    /// Earliest deadline among the running timers.
    pub fn next_deadline(&self) -> Option<Instant> {
        [
            self.keyboard_reveal.map(|(timer, _)| timer.deadline()),
            self.rubberband.as_ref().map(|band| band.timer.deadline()),
            self.autoscroll.map(|autoscroll| autoscroll.deadline()),
        ]
        .into_iter()
        .flatten()
        .min()
    }

    pub(crate) fn stop_autoscroll(&mut self) {
        if self.autoscroll.take().is_some() {
            log::debug!("Autoscroll stopped");
        }
    }

    pub fn renaming_icon(&self) -> Option<IconId> {
        self.renaming
    }

    /// Leave label editing, if it is active.
    pub fn stop_renaming(&mut self) {
        if self.renaming.take().is_some() {
            self.delegate.end_rename();
        }
    }

    /// Abort whatever the pointer is doing: rubberbanding, stretching,
    /// autoscrolling and drop highlighting. Returns true if anything was
    /// running.
    pub fn cancel(&mut self) -> bool {
        let mut cancelled = self.rubberband.take().is_some();
        if let Some(stretch) = self.drag.stretch {
            if let Some(icon) = self.canvas.get_mut(stretch.icon) {
                stretch.restore(icon);
            }
            cancelled = true;
        }
        if self.drag.button.is_some() {
            self.drag.reset();
        }
        if self.autoscroll.is_some() {
            self.stop_autoscroll();
            cancelled = true;
        }
        if self.drop.target_icon.take().is_some() {
            self.events.push(ContainerEvent::DropTargetChanged(None));
            cancelled = true;
        }
        self.input.release_all();
        cancelled
    }

    // --- Drag source ---

    /// Selection data for a drag started here. Icon list geometry is
    /// relative to the press point, in widget pixels.
    pub fn drag_data_get(&self, target: crate::wire::DragTarget) -> ContainerResult<Vec<u8>> {
        use crate::wire::{self, DragTarget};

        let selection = self.selection();
        if selection.is_empty() {
            return Err(ContainerError::EmptySelection);
        }
        let uris: Vec<String> = selection
            .iter()
            .filter_map(|&id| self.canvas.get(id).map(|icon| icon.uri().to_string()))
            .collect();
        let data = match target {
            DragTarget::IconList => {
                let hotspot = self.drag.start_widget;
                let transform = self.viewport.transform();
                let items: Vec<SelectionListItem> = selection
                    .iter()
                    .filter_map(|&id| self.canvas.get(id))
                    .map(|icon| {
                        let rect =
                            transform.transform_rect_bbox(icon.entire_bounds(self.label_position));
                        SelectionListItem::with_rect(
                            icon.uri(),
                            crate::wire::ItemRect::new(
                                (rect.x0 - hotspot.x).round() as i32,
                                (rect.y0 - hotspot.y).round() as i32,
                                rect.width().round() as i32,
                                rect.height().round() as i32,
                            ),
                        )
                    })
                    .collect();
                wire::encode(&items)
            }
            DragTarget::UriList => wire::encode_uri_list(&uris),
            _ => wire::encode_text(&uris).into_bytes(),
        };
        Ok(data)
    }

    /// The drag started here ended.
    pub fn drag_end(&mut self) {
        log::debug!("Drag ended");
        self.drag.reset();
        self.stop_autoscroll();
    }
}
