//! Glass Pinball - a merge-ball arcade game
//!
//! Core modules:
//! - `sim`: Frame-driven simulation (ball physics, collisions, merge policy)
//! - `session`: Frame driver owning one game instance
//! - `renderer`: Render collaborator interface and a text renderer
//! - `ui`: On-screen button layout and hit-testing
//! - `tuning`: Data-driven game balance

pub mod renderer;
pub mod session;
pub mod sim;
pub mod tuning;
pub mod ui;

pub use session::Session;
pub use tuning::Tuning;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Ball defaults (units are pixels and frames)
    pub const BALL_RADIUS: f32 = 15.0;
    /// Downward acceleration added every frame
    pub const GRAVITY: f32 = 0.5;
    /// Velocity multiplier applied every frame
    pub const FRICTION: f32 = 0.995;
    /// Restitution for wall/floor/ceiling contacts
    pub const BOUNCE: f32 = 0.95;
    /// Rebound speed multiplier (bounces gain energy)
    pub const ENERGY_BOOST: f32 = 1.01;
    /// Minimum ball speed (friction can't stall a ball below this)
    pub const BALL_MIN_SPEED: f32 = 2.0;
    /// Maximum ball speed
    pub const BALL_MAX_SPEED: f32 = 15.0;
    /// Extra upward kick on glass wall hits
    pub const WALL_KICK: f32 = 2.0;

    /// Ball-ball restitution
    pub const BALL_RESTITUTION: f32 = 0.9;
    /// Below this center distance two balls count as coincident
    pub const OVERLAP_EPSILON: f32 = 0.001;

    /// Frames a ball stays hidden after leaving the screen (~1.5 s at 60 Hz)
    pub const RESPAWN_DELAY_FRAMES: u32 = 90;
    /// Horizontal speed given to a respawned ball
    pub const RESPAWN_SPEED: f32 = 3.0;
    /// Horizontal speed given to a freshly merged ball
    pub const MERGE_LAUNCH_SPEED: f32 = 3.0;

    /// Spawned balls drop from this height
    pub const SPAWN_Y: f32 = 50.0;
    /// Initial downward speed of a spawned ball
    pub const SPAWN_FALL_SPEED: f32 = 3.0;
    /// Spawned balls get a random horizontal speed in [-jitter, jitter)
    pub const SPAWN_JITTER: f32 = 1.0;

    /// Spawn tier doubles when the strongest ball is 2^N times the spawn tier
    pub const TIER_ESCALATION_STEPS: u32 = 3;

    /// Score multiplier for ball-ball contacts
    pub const SCORE_MULTIPLIER: u64 = 1;
    /// Score at which the progress bar is full
    pub const TARGET_SCORE: u64 = 1_000_000;

    /// Taps within this distance of a ball push it
    pub const TAP_RADIUS: f32 = 100.0;
    /// Speed added to a ball pushed by a tap
    pub const TAP_FORCE: f32 = 3.0;

    /// Glass dimensions
    pub const GLASS_WIDTH: f32 = 200.0;
    pub const GLASS_HEIGHT: f32 = 300.0;
    /// Fraction of the width the glass narrows by on each side at the bottom
    pub const GLASS_TAPER: f32 = 0.2;

    /// Button layout
    pub const BUTTON_WIDTH: f32 = 120.0;
    pub const BUTTON_HEIGHT: f32 = 50.0;
    pub const BUTTON_GAP: f32 = 40.0;
    pub const BUTTON_BOTTOM_PADDING: f32 = 120.0;
}

/// Scale `v` so its length is `len`, keeping direction
#[inline]
pub fn with_length(v: Vec2, len: f32) -> Vec2 {
    let current = v.length();
    if current <= f32::EPSILON {
        return v;
    }
    v * (len / current)
}

/// Unit vector at `angle` radians
#[inline]
pub fn unit_from_angle(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}

/// Clamp a velocity to `max_speed`, keeping direction
#[inline]
pub fn limit_speed(vel: Vec2, max_speed: f32) -> Vec2 {
    if vel.length() > max_speed {
        with_length(vel, max_speed)
    } else {
        vel
    }
}
