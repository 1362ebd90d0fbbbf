//! Render collaborator interface
//!
//! The simulation never draws. Each frame the session captures a
//! [`FrameSnapshot`] and hands it to a [`Renderer`].

pub mod text;

pub use text::TextRenderer;

use glam::Vec2;
use serde::Serialize;

use crate::sim::{GameState, Glass};
use crate::ui::{ButtonKind, Rect};

/// A visible ball as the renderer sees it
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BallView {
    pub pos: Vec2,
    pub radius: f32,
    /// Tier shown as the ball's label
    pub tier: u32,
}

/// A button and whether it responds to taps
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ButtonView {
    pub kind: ButtonKind,
    pub rect: Rect,
    pub active: bool,
}

/// Everything needed to draw one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameSnapshot {
    pub frame: u64,
    pub screen: Vec2,
    pub glass: Glass,
    pub balls: Vec<BallView>,
    pub add_button: ButtonView,
    pub merge_button: ButtonView,
    pub score: u64,
    /// Progress toward the target score, 0..=1
    pub progress: f32,
    pub spawn_tier: u32,
}

impl FrameSnapshot {
    pub fn capture(state: &GameState) -> Self {
        Self {
            frame: state.time_frames,
            screen: state.arena.screen,
            glass: state.arena.glass,
            balls: state
                .visible_balls()
                .map(|b| BallView {
                    pos: b.pos,
                    radius: b.radius,
                    tier: b.tier,
                })
                .collect(),
            add_button: ButtonView {
                kind: ButtonKind::AddBall,
                rect: state.buttons.add,
                active: true,
            },
            merge_button: ButtonView {
                kind: ButtonKind::Merge,
                rect: state.buttons.merge,
                active: state.has_mergeable_balls(),
            },
            score: state.score,
            progress: state.progress(),
            spawn_tier: state.spawn_tier,
        }
    }
}

/// Something that draws frames
pub trait Renderer {
    fn render(&mut self, frame: &FrameSnapshot);
}

/// Discards every frame (headless runs, tests)
#[derive(Debug, Default, Clone, Copy)]
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn render(&mut self, _frame: &FrameSnapshot) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::Tuning;

    #[test]
    fn test_snapshot_tracks_population_and_buttons() {
        let mut state = GameState::new(1, Vec2::new(400.0, 800.0), Tuning::default());
        state.spawn_ball();
        state.spawn_ball();

        let snapshot = FrameSnapshot::capture(&state);
        assert_eq!(snapshot.balls.len(), 2);
        assert!(snapshot.add_button.active);
        assert!(snapshot.merge_button.active);

        state.merge_balls();
        let snapshot = FrameSnapshot::capture(&state);
        assert_eq!(snapshot.balls.len(), 1);
        assert_eq!(snapshot.balls[0].tier, 2);
        assert!(!snapshot.merge_button.active);
        assert_eq!(snapshot.progress, 0.0);
    }
}
