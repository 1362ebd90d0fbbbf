//! On-screen buttons
//!
//! Two buttons side by side near the bottom of the screen: "add ball" and
//! "merge". Layout is derived from the screen size and the tuned button sizes.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::tuning::Tuning;

/// Axis-aligned rectangle in screen coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Edges are inclusive
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.x
            && point.x <= self.x + self.width
            && point.y >= self.y
            && point.y <= self.y + self.height
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

/// Which button a tap landed on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ButtonKind {
    AddBall,
    Merge,
}

impl ButtonKind {
    pub fn label(&self) -> &'static str {
        match self {
            ButtonKind::AddBall => "Add",
            ButtonKind::Merge => "Merge",
        }
    }
}

/// Button positions for a given screen
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ButtonLayout {
    pub add: Rect,
    pub merge: Rect,
}

impl ButtonLayout {
    pub fn for_screen(screen: Vec2, tuning: &Tuning) -> Self {
        let (width, height, gap) = (tuning.button_width, tuning.button_height, tuning.button_gap);
        let start_x = (screen.x - (width * 2.0 + gap)) / 2.0;
        let y = screen.y - tuning.button_bottom_padding;

        Self {
            add: Rect::new(start_x, y, width, height),
            merge: Rect::new(start_x + width + gap, y, width, height),
        }
    }

    pub fn rect(&self, kind: ButtonKind) -> Rect {
        match kind {
            ButtonKind::AddBall => self.add,
            ButtonKind::Merge => self.merge,
        }
    }

    /// Button under `point`, add button first
    pub fn hit_test(&self, point: Vec2) -> Option<ButtonKind> {
        if self.add.contains(point) {
            Some(ButtonKind::AddBall)
        } else if self.merge.contains(point) {
            Some(ButtonKind::Merge)
        } else {
            None
        }
    }
}
