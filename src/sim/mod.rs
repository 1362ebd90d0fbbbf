//! Frame-driven simulation module
//!
//! All gameplay logic lives here:
//! - One `tick` per rendered frame, velocities in pixels/frame
//! - Seeded RNG only
//! - Stable iteration order (population order)
//! - No rendering or platform dependencies

pub mod ball;
pub mod collision;
pub mod glass;
pub mod state;
pub mod tick;

pub use ball::{Arena, Ball, BallStep, RespawnPolicy, StepContext};
pub use collision::{Contact, collide_all, collide_pair, detect_contact};
pub use glass::Glass;
pub use state::{GameEvent, GameState};
pub use tick::{TapAction, TickInput, handle_tap, tick};
