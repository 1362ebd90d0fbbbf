//! Glass (container) geometry
//!
//! The glass is a trapezoid: full width at the rim, narrowed by `taper * width`
//! on each side at the floor. Screen coordinates, y grows downward.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Trapezoidal container balls bounce around in
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Glass {
    /// Left edge of the rim
    pub x: f32,
    /// Rim height
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Per-side narrowing at the floor, as a fraction of width
    pub taper: f32,
}

impl Glass {
    pub fn new(x: f32, y: f32, width: f32, height: f32, taper: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
            taper,
        }
    }

    /// A glass centered on a screen of the given size
    pub fn centered(screen: Vec2, width: f32, height: f32, taper: f32) -> Self {
        Self::new(
            (screen.x - width) / 2.0,
            (screen.y - height) / 2.0,
            width,
            height,
            taper,
        )
    }

    /// y coordinate of the floor
    #[inline]
    pub fn floor(&self) -> f32 {
        self.y + self.height
    }

    /// Horizontal center
    #[inline]
    pub fn center_x(&self) -> f32 {
        self.x + self.width / 2.0
    }

    /// Whether the vertical span `[top, bottom]` overlaps the glass
    #[inline]
    pub fn overlaps_vertically(&self, top: f32, bottom: f32) -> bool {
        bottom > self.y && top < self.floor()
    }

    /// Left and right wall positions at height `y`
    ///
    /// Not clamped: heights outside the glass extrapolate the walls.
    pub fn bounds_at(&self, y: f32) -> (f32, f32) {
        let progress = (y - self.y) / self.height;
        let inset = self.width * self.taper * progress;
        (self.x + inset, self.x + self.width - inset)
    }

    /// Corner points: rim left, rim right, floor right, floor left
    pub fn outline(&self) -> [Vec2; 4] {
        let inset = self.width * self.taper;
        [
            Vec2::new(self.x, self.y),
            Vec2::new(self.x + self.width, self.y),
            Vec2::new(self.x + self.width - inset, self.floor()),
            Vec2::new(self.x + inset, self.floor()),
        ]
    }

    /// Check if a point is inside the trapezoid
    pub fn contains_point(&self, point: Vec2) -> bool {
        if point.y < self.y || point.y > self.floor() {
            return false;
        }
        let (left, right) = self.bounds_at(point.y);
        point.x >= left && point.x <= right
    }
}
