//! Icons and their geometry.

use kurbo::{Point, Rect, Size, Vec2};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// Gap between an icon's image and its label.
pub const LABEL_SPACING: f64 = 2.0;

/// Side length of a stretch handle square.
pub const STRETCH_HANDLE_SIZE: f64 = 8.0;

static NEXT_ICON_ID: AtomicU64 = AtomicU64::new(1);

/// Stable handle to an icon owned by a container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct IconId(u64);

impl IconId {
    /// Allocate a fresh id.
    pub fn new() -> Self {
        Self(NEXT_ICON_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn raw(self) -> u64 {
        self.0
    }
}

impl Default for IconId {
    fn default() -> Self {
        Self::new()
    }
}

/// Where the label sits relative to the image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelPosition {
    #[default]
    Under,
    Beside,
}

/// The payload an icon stands for. Identity is the uri.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IconData {
    pub uri: String,
    pub label: String,
}

impl IconData {
    pub fn new(uri: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            label: label.into(),
        }
    }

    /// Build the payload from a uri, using its last path segment as label.
    pub fn from_uri(uri: impl Into<String>) -> Self {
        let uri = uri.into();
        let label = uri
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .unwrap_or_default()
            .to_string();
        Self { uri, label }
    }
}

/// Measured sizes of an icon at scale 1, in canvas units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IconMetrics {
    pub image: Size,
    pub label: Size,
    /// Extra label height beyond the layout label, shown when the label is
    /// expanded (selected or hovered). Counted in the entire bounds only.
    #[serde(default)]
    pub label_overflow: f64,
}

impl Default for IconMetrics {
    fn default() -> Self {
        Self {
            image: Size::new(48.0, 48.0),
            label: Size::new(64.0, 16.0),
            label_overflow: 0.0,
        }
    }
}

/// Corner of the image rectangle carrying a stretch handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

/// An icon inside a container.
#[derive(Debug, Clone)]
pub struct Icon {
    pub data: IconData,
    /// Top-left of the layout bounds. `None` until placed.
    pub position: Option<Point>,
    /// Image scale, 1.0 is the nominal size.
    pub scale: f64,
    pub selected: bool,
    /// The position is only a hint and may be moved to a free spot.
    pub has_lazy_position: bool,
    /// X computed by the last auto layout before right-to-left mirroring.
    pub saved_ltr_x: f64,
    pub metrics: IconMetrics,
    pub was_selected_before_rubberband: bool,
    /// The stretch handles are shown on this icon.
    pub show_stretch_handles: bool,
}

impl Icon {
    pub fn new(data: IconData, metrics: IconMetrics) -> Self {
        Self {
            data,
            position: None,
            scale: 1.0,
            selected: false,
            has_lazy_position: false,
            saved_ltr_x: 0.0,
            metrics,
            was_selected_before_rubberband: false,
            show_stretch_handles: false,
        }
    }

    pub fn uri(&self) -> &str {
        &self.data.uri
    }

    pub fn is_positioned(&self) -> bool {
        self.position.is_some()
    }

    /// Position, or the origin for unplaced icons.
    pub fn origin(&self) -> Point {
        self.position.unwrap_or(Point::ZERO)
    }

    pub fn image_size(&self) -> Size {
        self.metrics.image * self.scale
    }

    fn has_label(&self) -> bool {
        self.metrics.label.width > 0.0 && self.metrics.label.height > 0.0
    }

    fn label_extent(&self) -> f64 {
        if self.has_label() {
            LABEL_SPACING
        } else {
            0.0
        }
    }

    /// Size of the layout bounds.
    pub fn size(&self, label_position: LabelPosition) -> Size {
        let image = self.image_size();
        let label = self.metrics.label;
        match label_position {
            LabelPosition::Under => Size::new(
                image.width.max(label.width),
                image.height + self.label_extent() + label.height,
            ),
            LabelPosition::Beside => Size::new(
                image.width + self.label_extent() + label.width,
                image.height.max(label.height),
            ),
        }
    }

    /// Size of the entire bounds, including label overflow.
    pub fn entire_size(&self, label_position: LabelPosition) -> Size {
        let size = self.size(label_position);
        Size::new(size.width, size.height + self.metrics.label_overflow)
    }

    /// Bounds used by layout, without label overflow.
    pub fn layout_bounds(&self, label_position: LabelPosition) -> Rect {
        Rect::from_origin_size(self.origin(), self.size(label_position))
    }

    /// Bounds of everything the icon draws.
    pub fn entire_bounds(&self, label_position: LabelPosition) -> Rect {
        Rect::from_origin_size(self.origin(), self.entire_size(label_position))
    }

    pub fn image_rect(&self, label_position: LabelPosition) -> Rect {
        let origin = self.origin();
        let size = self.size(label_position);
        let image = self.image_size();
        let offset = match label_position {
            LabelPosition::Under => Vec2::new((size.width - image.width) / 2.0, 0.0),
            LabelPosition::Beside => Vec2::new(0.0, (size.height - image.height) / 2.0),
        };
        Rect::from_origin_size(origin + offset, image)
    }

    pub fn label_rect(&self, label_position: LabelPosition) -> Rect {
        let origin = self.origin();
        let size = self.size(label_position);
        let image = self.image_size();
        let label = self.metrics.label;
        let offset = match label_position {
            LabelPosition::Under => Vec2::new(
                (size.width - label.width) / 2.0,
                image.height + self.label_extent(),
            ),
            LabelPosition::Beside => Vec2::new(
                image.width + self.label_extent(),
                (size.height - label.height) / 2.0,
            ),
        };
        Rect::from_origin_size(origin + offset, label)
    }

    /// Whether a canvas point lands on the image or the label.
    pub fn hit(&self, point: Point, label_position: LabelPosition) -> bool {
        self.position.is_some()
            && (self.image_rect(label_position).contains(point)
                || (self.has_label() && self.label_rect(label_position).contains(point)))
    }

    /// Whether the image or label touches a canvas rectangle.
    pub fn intersects(&self, rect: Rect, label_position: LabelPosition) -> bool {
        let touches =
            |r: Rect| r.x0 <= rect.x1 && r.x1 >= rect.x0 && r.y0 <= rect.y1 && r.y1 >= rect.y0;
        self.position.is_some()
            && (touches(self.image_rect(label_position))
                || (self.has_label() && touches(self.label_rect(label_position))))
    }

    /// The stretch handle under a canvas point, if handles are shown.
    pub fn stretch_handle_at(&self, point: Point, label_position: LabelPosition) -> Option<Corner> {
        if !self.show_stretch_handles || self.position.is_none() {
            return None;
        }
        let image = self.image_rect(label_position);
        let half = STRETCH_HANDLE_SIZE / 2.0;
        [
            (Corner::TopLeft, Point::new(image.x0, image.y0)),
            (Corner::TopRight, Point::new(image.x1, image.y0)),
            (Corner::BottomLeft, Point::new(image.x0, image.y1)),
            (Corner::BottomRight, Point::new(image.x1, image.y1)),
        ]
        .into_iter()
        .find(|(_, center)| {
            (point.x - center.x).abs() <= half && (point.y - center.y).abs() <= half
        })
        .map(|(corner, _)| corner)
    }
}
