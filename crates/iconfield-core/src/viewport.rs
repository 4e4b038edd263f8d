//! Viewport module for scroll and zoom transforms.
//!
//! The canvas is measured in canvas units; a zoom level sets how many widget
//! pixels a unit covers. The viewport scrolls over the scroll region.

use kurbo::{Affine, Point, Rect, Size, Vec2};
use serde::{Deserialize, Serialize};

/// Icon size at the standard zoom level, in pixels.
pub const STANDARD_ICON_SIZE: f64 = 48.0;

/// Discrete zoom levels, named by icon size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZoomLevel {
    Smallest,
    Smaller,
    Small,
    #[default]
    Standard,
    Large,
    Larger,
    Largest,
}

impl ZoomLevel {
    const ALL: [ZoomLevel; 7] = [
        ZoomLevel::Smallest,
        ZoomLevel::Smaller,
        ZoomLevel::Small,
        ZoomLevel::Standard,
        ZoomLevel::Large,
        ZoomLevel::Larger,
        ZoomLevel::Largest,
    ];

    /// Icon size in pixels.
    pub fn icon_size(self) -> f64 {
        match self {
            ZoomLevel::Smallest => 16.0,
            ZoomLevel::Smaller => 24.0,
            ZoomLevel::Small => 32.0,
            ZoomLevel::Standard => 48.0,
            ZoomLevel::Large => 64.0,
            ZoomLevel::Larger => 96.0,
            ZoomLevel::Largest => 192.0,
        }
    }

    pub fn pixels_per_unit(self) -> f64 {
        self.icon_size() / STANDARD_ICON_SIZE
    }

    fn index(self) -> usize {
        Self::ALL.iter().position(|&level| level == self).unwrap_or(3)
    }

    pub fn zoom_in(self) -> Self {
        Self::ALL[(self.index() + 1).min(Self::ALL.len() - 1)]
    }

    pub fn zoom_out(self) -> Self {
        Self::ALL[self.index().saturating_sub(1)]
    }
}

/// Space kept free around the canvas inside the widget, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Margins {
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
}

/// The visible part of the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Scroll offset in pixels.
    pub scroll: Vec2,
    /// Widget allocation in pixels.
    pub size: Size,
    pub zoom: ZoomLevel,
    pub margins: Margins,
    /// Scrollable area in canvas units.
    pub scroll_region: Rect,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            scroll: Vec2::ZERO,
            size: Size::new(800.0, 600.0),
            zoom: ZoomLevel::Standard,
            margins: Margins::default(),
            scroll_region: Rect::ZERO,
        }
    }
}

impl Viewport {
    pub fn new(size: Size) -> Self {
        Self {
            size,
            ..Self::default()
        }
    }

    pub fn pixels_per_unit(&self) -> f64 {
        self.zoom.pixels_per_unit()
    }

    /// Canvas to widget transform.
    pub fn transform(&self) -> Affine {
        Affine::translate(-self.scroll) * Affine::scale(self.pixels_per_unit())
    }

    /// Widget to canvas transform.
    pub fn inverse_transform(&self) -> Affine {
        Affine::scale(1.0 / self.pixels_per_unit()) * Affine::translate(self.scroll)
    }

    pub fn widget_to_canvas(&self, point: Point) -> Point {
        self.inverse_transform() * point
    }

    pub fn canvas_to_widget(&self, point: Point) -> Point {
        self.transform() * point
    }

    /// Room for icons in canvas units: the allocation less the margins.
    pub fn canvas_extent(&self) -> Size {
        let ppu = self.pixels_per_unit();
        Size::new(
            ((self.size.width - self.margins.left - self.margins.right) / ppu).max(0.0),
            ((self.size.height - self.margins.top - self.margins.bottom) / ppu).max(0.0),
        )
    }

    /// Visible rectangle in canvas units.
    pub fn visible_rect(&self) -> Rect {
        let origin = self.widget_to_canvas(Point::ZERO);
        Rect::from_origin_size(origin, self.size / self.pixels_per_unit())
    }

    fn scroll_limits(&self) -> (Vec2, Vec2) {
        let ppu = self.pixels_per_unit();
        let region = self.scroll_region;
        let min = Vec2::new(region.x0 * ppu, region.y0 * ppu);
        let max = Vec2::new(
            (region.x1 * ppu - self.size.width).max(min.x),
            (region.y1 * ppu - self.size.height).max(min.y),
        );
        (min, max)
    }

    fn clamp_scroll(&self, scroll: Vec2) -> Vec2 {
        let (min, max) = self.scroll_limits();
        Vec2::new(scroll.x.clamp(min.x, max.x), scroll.y.clamp(min.y, max.y))
    }

    /// Scroll by a pixel delta within the region. Returns how far it
    /// actually moved.
    pub fn scroll_by(&mut self, delta: Vec2) -> Vec2 {
        let old = self.scroll;
        self.scroll = self.clamp_scroll(self.scroll + delta);
        self.scroll - old
    }

    pub fn scroll_to(&mut self, scroll: Vec2) {
        self.scroll = self.clamp_scroll(scroll);
    }

    /// Set the region, keeping the scroll offset inside it.
    pub fn set_scroll_region(&mut self, region: Rect) {
        self.scroll_region = region;
        self.scroll = self.clamp_scroll(self.scroll);
    }

    /// Scroll the least amount that makes a canvas rectangle visible.
    /// Returns true if the viewport scrolled.
    pub fn reveal(&mut self, rect: Rect) -> bool {
        let target = self.transform().transform_rect_bbox(rect);
        let mut delta = Vec2::ZERO;
        if target.x1 > self.size.width {
            delta.x = target.x1 - self.size.width;
        }
        if target.x0 - delta.x < 0.0 {
            delta.x = target.x0;
        }
        if target.y1 > self.size.height {
            delta.y = target.y1 - self.size.height;
        }
        if target.y0 - delta.y < 0.0 {
            delta.y = target.y0;
        }
        self.scroll_by(delta) != Vec2::ZERO
    }

    pub fn set_zoom(&mut self, zoom: ZoomLevel) {
        self.zoom = zoom;
        self.scroll = self.clamp_scroll(self.scroll);
    }
}
