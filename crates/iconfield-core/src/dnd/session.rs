//! Source side of a drag: pressing an icon, crossing the drag threshold and
//! stretching icons by their corner handles.

use crate::dnd::action::DragActions;
use crate::icon::{Corner, Icon, IconId, LabelPosition};
use crate::input::MouseButton;
use kurbo::{Point, Rect, Vec2};

/// Default pointer travel before a press turns into a drag.
pub const DEFAULT_DRAG_THRESHOLD: f64 = 8.0;

/// Smallest image side a stretch can produce, in pixels.
pub const MINIMUM_STRETCH_SIZE: f64 = 16.0;

/// What a press on an icon is doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragState {
    #[default]
    Initial,
    /// Armed to drag the selection once the threshold is crossed.
    MoveOrCopy,
    /// Resizing an icon by a stretch handle.
    Stretch,
}

/// Geometry captured when a stretch starts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StretchState {
    pub icon: IconId,
    pub corner: Corner,
    pub start_pointer: Point,
    /// Longest image side at the start.
    pub start_size: f64,
    pub start_image: Rect,
    pub start_position: Point,
    pub start_scale: f64,
}

impl StretchState {
    pub fn new(
        id: IconId,
        icon: &Icon,
        corner: Corner,
        pointer: Point,
        label_position: LabelPosition,
    ) -> Self {
        let image = icon.image_size();
        Self {
            icon: id,
            corner,
            start_pointer: pointer,
            start_size: image.width.max(image.height),
            start_image: icon.image_rect(label_position),
            start_position: icon.origin(),
            start_scale: icon.scale,
        }
    }

    /// Corner that stays put while stretching.
    fn anchor(&self) -> Point {
        let image = self.start_image;
        match self.corner {
            Corner::TopLeft => Point::new(image.x1, image.y1),
            Corner::TopRight => Point::new(image.x0, image.y1),
            Corner::BottomLeft => Point::new(image.x1, image.y0),
            Corner::BottomRight => Point::new(image.x0, image.y0),
        }
    }

    /// Scale for a pointer position: the start size grown by the smaller of
    /// the two pointer offsets, measured away from the anchor.
    pub fn scale_at(&self, pointer: Point, nominal_size: f64) -> f64 {
        let delta = pointer - self.start_pointer;
        let (dx, dy) = match self.corner {
            Corner::TopLeft => (-delta.x, -delta.y),
            Corner::TopRight => (delta.x, -delta.y),
            Corner::BottomLeft => (-delta.x, delta.y),
            Corner::BottomRight => (delta.x, delta.y),
        };
        let size = (self.start_size + dx.min(dy)).max(MINIMUM_STRETCH_SIZE);
        if nominal_size > 0.0 {
            size / nominal_size
        } else {
            self.start_scale
        }
    }

    /// Resize the icon for a pointer position, keeping the opposite corner
    /// of the image in place.
    pub fn apply(&self, icon: &mut Icon, pointer: Point, label_position: LabelPosition) {
        let nominal = icon.metrics.image.width.max(icon.metrics.image.height);
        icon.scale = self.scale_at(pointer, nominal);
        icon.position = Some(self.start_position);

        let image = icon.image_rect(label_position);
        let current = match self.corner {
            Corner::TopLeft => Point::new(image.x1, image.y1),
            Corner::TopRight => Point::new(image.x0, image.y1),
            Corner::BottomLeft => Point::new(image.x1, image.y0),
            Corner::BottomRight => Point::new(image.x0, image.y0),
        };
        icon.position = Some(self.start_position + (self.anchor() - current));
    }

    /// Put the icon back the way it was.
    pub fn restore(&self, icon: &mut Icon) {
        icon.scale = self.start_scale;
        icon.position = Some(self.start_position);
    }
}

/// Press and drag tracking for the source side.
#[derive(Debug, Clone, Default)]
pub struct DragSession {
    pub button: Option<MouseButton>,
    /// Icon under the pointer at press time.
    pub icon: Option<IconId>,
    /// Press position in canvas units.
    pub start: Point,
    /// Press position in widget pixels. Shifted while autoscrolling.
    pub start_widget: Point,
    pub state: DragState,
    pub started: bool,
    /// Whether the pressed icon was selected before the press.
    pub icon_was_selected: bool,
    pub stretch: Option<StretchState>,
}

impl DragSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm a move or copy drag from a press on an icon.
    pub fn press(
        &mut self,
        button: MouseButton,
        icon: IconId,
        start: Point,
        start_widget: Point,
        was_selected: bool,
    ) {
        *self = Self {
            button: Some(button),
            icon: Some(icon),
            start,
            start_widget,
            state: DragState::MoveOrCopy,
            started: false,
            icon_was_selected: was_selected,
            stretch: None,
        };
    }

    /// Start stretching instead of dragging.
    pub fn press_stretch(
        &mut self,
        button: MouseButton,
        stretch: StretchState,
        start_widget: Point,
    ) {
        *self = Self {
            button: Some(button),
            icon: Some(stretch.icon),
            start: stretch.start_pointer,
            start_widget,
            state: DragState::Stretch,
            started: false,
            icon_was_selected: true,
            stretch: Some(stretch),
        };
    }

    /// Remember a press that does not start anything, e.g. on the
    /// background.
    pub fn press_background(&mut self, button: MouseButton, start: Point, start_widget: Point) {
        *self = Self {
            button: Some(button),
            start,
            start_widget,
            ..Self::default()
        };
    }

    pub fn is_armed(&self) -> bool {
        self.state == DragState::MoveOrCopy && !self.started
    }

    pub fn is_stretching(&self) -> bool {
        self.state == DragState::Stretch
    }

    /// Whether the pointer has travelled past the threshold from the press.
    pub fn exceeds_threshold(&self, pointer_widget: Point, threshold: f64) -> bool {
        let delta = pointer_widget - self.start_widget;
        delta.x.abs().max(delta.y.abs()) > threshold
    }

    /// Whether a motion should begin the drag now.
    pub fn should_start_drag(&self, pointer_widget: Point, threshold: f64) -> bool {
        self.is_armed() && self.exceeds_threshold(pointer_widget, threshold)
    }

    pub fn mark_started(&mut self) {
        log::debug!("Drag started from {:?}", self.icon);
        self.started = true;
    }

    /// Actions offered for a drag with the pressed button.
    pub fn actions(&self) -> DragActions {
        match self.button {
            Some(MouseButton::Middle) => DragActions::ASK,
            _ => DragActions::MOVE | DragActions::COPY | DragActions::LINK | DragActions::ASK,
        }
    }

    /// Move the cached press point along with a scroll.
    pub fn shift_start(&mut self, scrolled: Vec2) {
        self.start_widget -= scrolled;
    }

    /// Forget a removed icon.
    pub fn forget(&mut self, id: IconId) {
        if self.icon == Some(id) {
            self.reset();
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
