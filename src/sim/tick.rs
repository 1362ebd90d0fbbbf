//! Per-frame simulation step
//!
//! One call to [`tick`] is one frame: pending taps, ball updates, the pairwise
//! collision pass, then retirement of dead balls. There is no fixed timestep;
//! velocities are per frame.

use glam::Vec2;
use rand::Rng;

use super::ball::{BallStep, StepContext};
use super::collision::collide_all;
use super::state::{GameEvent, GameState};
use crate::ui::ButtonKind;
use crate::unit_from_angle;

/// Idle mode taps "add" every this many frames while the glass is sparse
const IDLE_SPAWN_INTERVAL: u64 = 45;
/// Idle mode stops adding balls at this many visible balls
const IDLE_TARGET_POPULATION: usize = 8;
/// Idle mode taps "merge" every this many frames when possible
const IDLE_MERGE_INTERVAL: u64 = 120;

/// Input for a single frame
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Taps/clicks since the last frame, in screen coordinates
    pub taps: Vec<Vec2>,
    /// Idle/demo mode - an auto-player presses the buttons
    pub idle_mode: bool,
}

/// What a tap did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TapAction {
    /// Add button: new ball ID
    Spawned(u32),
    /// Merge button: merged ball ID
    Merged(u32),
    /// Empty space: number of balls pushed away
    Pushed(usize),
}

/// Route a tap to a button or push nearby balls away from it
pub fn handle_tap(state: &mut GameState, point: Vec2) -> TapAction {
    match state.buttons.hit_test(point) {
        Some(ButtonKind::AddBall) => return TapAction::Spawned(state.spawn_ball()),
        // An inactive merge button behaves like empty space
        Some(ButtonKind::Merge) => {
            if let Some(id) = state.merge_balls() {
                return TapAction::Merged(id);
            }
        }
        None => {}
    }

    let radius = state.tuning.tap_radius;
    let force = state.tuning.tap_force;
    let mut pushed = 0;

    for ball in state.balls.iter_mut().filter(|b| b.is_collidable()) {
        let away = ball.pos - point;
        let distance = away.length();
        if distance >= radius {
            continue;
        }
        let dir = if distance < crate::consts::OVERLAP_EPSILON {
            unit_from_angle(state.rng.random::<f32>() * std::f32::consts::TAU)
        } else {
            away / distance
        };
        ball.vel += dir * force;
        pushed += 1;
    }

    TapAction::Pushed(pushed)
}

/// Taps the auto-player wants to make this frame
fn idle_taps(state: &GameState) -> Vec<Vec2> {
    let frame = state.time_frames;
    let mut taps = Vec::new();

    if frame.is_multiple_of(IDLE_SPAWN_INTERVAL)
        && state.visible_balls().count() < IDLE_TARGET_POPULATION
    {
        taps.push(state.buttons.add.center());
    }
    if frame.is_multiple_of(IDLE_MERGE_INTERVAL) && state.has_mergeable_balls() {
        taps.push(state.buttons.merge.center());
    }
    taps
}

/// Advance the game state by one frame
pub fn tick(state: &mut GameState, input: &TickInput) {
    for &tap in &input.taps {
        let action = handle_tap(state, tap);
        log::debug!("Tap at ({:.0}, {:.0}): {:?}", tap.x, tap.y, action);
    }

    if input.idle_mode {
        for tap in idle_taps(state) {
            handle_tap(state, tap);
        }
    }

    state.time_frames += 1;

    // Per-ball integration, bounds and glass contacts
    let ctx = StepContext {
        arena: &state.arena,
        tuning: &state.tuning,
        policy: state.policy,
    };
    let mut retired = Vec::new();
    for ball in &mut state.balls {
        match ball.update(&ctx, &mut state.rng) {
            BallStep::Moved => {}
            BallStep::Exited => state.events.push(GameEvent::BallExited { id: ball.id }),
            BallStep::Respawned => state.events.push(GameEvent::BallRespawned { id: ball.id }),
            BallStep::Retired => retired.push(ball.id),
        }
    }

    // Ball-ball contacts
    let points = collide_all(&mut state.balls, &state.tuning, &mut state.rng);
    state.add_score(points);

    state.retire(&retired);
}
