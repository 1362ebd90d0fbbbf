//! Ball entity: per-frame integration, screen bounds, respawn and glass contacts
//!
//! One call to [`Ball::update`] is one frame. Velocities are in pixels/frame.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::glass::Glass;
use crate::tuning::Tuning;
use crate::{limit_speed, with_length};

/// The play field a ball moves in
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Arena {
    /// Screen size in pixels
    pub screen: Vec2,
    pub glass: Glass,
}

impl Arena {
    pub fn new(screen: Vec2, tuning: &Tuning) -> Self {
        Self {
            screen,
            glass: Glass::centered(
                screen,
                tuning.glass_width,
                tuning.glass_height,
                tuning.glass_taper,
            ),
        }
    }

    /// Where respawned balls reappear
    pub fn respawn_point(&self, radius: f32) -> Vec2 {
        Vec2::new(self.screen.x / 2.0, radius * 2.0)
    }
}

/// Respawn admission published by the population manager
///
/// Each bump of `generation` is a new broadcast. A ball applies a broadcast at
/// most once, so a ball admitted before a broadcast is never re-admitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RespawnPolicy {
    pub min_eligible_tier: u32,
    pub generation: u32,
}

impl Default for RespawnPolicy {
    fn default() -> Self {
        Self {
            min_eligible_tier: 1,
            generation: 0,
        }
    }
}

/// Everything a ball reads during its update
#[derive(Debug, Clone, Copy)]
pub struct StepContext<'a> {
    pub arena: &'a Arena,
    pub tuning: &'a Tuning,
    pub policy: RespawnPolicy,
}

/// What happened to a ball's lifecycle this frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BallStep {
    /// Nothing lifecycle-related
    Moved,
    /// Left the screen; now hidden and counting down
    Exited,
    /// Countdown finished; back at the top
    Respawned,
    /// Countdown finished but the ball may not return
    Retired,
}

/// A ball entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    /// Score tier; merges sum tiers
    pub tier: u32,
    pub visible: bool,
    pub respawn_pending: bool,
    /// Frames spent hidden so far
    pub respawn_countdown: u32,
    pub respawn_eligible: bool,
    /// Last respawn policy generation applied
    #[serde(default)]
    pub policy_generation: u32,
}

impl Ball {
    pub fn new(id: u32, pos: Vec2, vel: Vec2, radius: f32, tier: u32) -> Self {
        Self {
            id,
            pos,
            vel,
            radius,
            tier: tier.max(1),
            visible: true,
            respawn_pending: false,
            respawn_countdown: 0,
            respawn_eligible: true,
            policy_generation: 0,
        }
    }

    /// Whether the ball takes part in collisions and rendering
    #[inline]
    pub fn is_collidable(&self) -> bool {
        self.visible
    }

    #[inline]
    pub fn speed(&self) -> f32 {
        self.vel.length()
    }

    /// Apply a respawn policy broadcast if it is newer than the last one seen
    pub fn apply_policy(&mut self, policy: RespawnPolicy) {
        if policy.generation == self.policy_generation {
            return;
        }
        self.policy_generation = policy.generation;
        if self.tier < policy.min_eligible_tier {
            self.respawn_eligible = false;
        }
    }

    /// Gravity, friction, speed floor and ceiling, then one Euler step
    pub fn integrate(&mut self, tuning: &Tuning) {
        self.vel.y += tuning.gravity;
        self.vel *= tuning.friction;

        let speed = self.vel.length();
        if speed < tuning.min_speed {
            self.vel = if speed > f32::EPSILON {
                with_length(self.vel, tuning.min_speed)
            } else {
                // No direction to keep; fall straight down
                Vec2::new(0.0, tuning.min_speed)
            };
        }
        self.vel = limit_speed(self.vel, tuning.max_speed);

        self.pos += self.vel;
    }

    /// Hide the ball and start its respawn countdown
    pub fn mark_exited(&mut self) {
        self.respawn_pending = true;
        self.respawn_countdown = 0;
        self.visible = false;
    }

    /// Put the ball back at the top, heading left or right at random
    pub fn respawn(&mut self, arena: &Arena, speed: f32, rng: &mut impl Rng) {
        self.pos = arena.respawn_point(self.radius);
        let dir = if rng.random_bool(0.5) { 1.0 } else { -1.0 };
        self.vel = Vec2::new(dir * speed, 0.0);
        self.respawn_pending = false;
        self.respawn_countdown = 0;
        self.visible = true;
    }

    /// Advance one frame
    pub fn update(&mut self, ctx: &StepContext<'_>, rng: &mut impl Rng) -> BallStep {
        let tuning = ctx.tuning;
        let screen = ctx.arena.screen;
        let r = self.radius;

        self.apply_policy(ctx.policy);
        self.integrate(tuning);

        let mut step = BallStep::Moved;
        // The countdown only runs for balls that were already hidden when
        // this frame started, so every exit path waits the same number of frames.
        let was_pending = self.respawn_pending;

        // Left/right edges end this ball's run
        if (self.pos.x - r < 0.0 || self.pos.x + r > screen.x) && !self.respawn_pending {
            self.mark_exited();
            step = BallStep::Exited;
        }

        // Ceiling
        if self.pos.y - r < 0.0 {
            self.pos.y = r;
            self.vel.y = self.vel.y.abs() * tuning.bounce * tuning.energy_boost;
        }

        if was_pending {
            self.respawn_countdown += 1;
            if self.respawn_countdown >= tuning.respawn_delay_frames {
                if self.respawn_eligible {
                    self.respawn(ctx.arena, tuning.respawn_speed, rng);
                    step = BallStep::Respawned;
                } else {
                    step = BallStep::Retired;
                }
            }
        }

        // Fell out the bottom
        if self.pos.y > screen.y + r && !self.respawn_pending {
            self.mark_exited();
            step = BallStep::Exited;
        }

        self.collide_glass(&ctx.arena.glass, tuning);

        step
    }

    /// Walls and floor of the glass; every matching contact applies
    pub fn collide_glass(&mut self, glass: &Glass, tuning: &Tuning) {
        let r = self.radius;
        if !glass.overlaps_vertically(self.pos.y - r, self.pos.y + r) {
            return;
        }

        let (left, right) = glass.bounds_at(self.pos.y);
        if !(self.pos.x + r > left && self.pos.x - r < right) {
            return;
        }

        let rebound = tuning.bounce * tuning.energy_boost;

        if self.pos.x - r < left && self.vel.x < 0.0 {
            self.pos.x = left + r;
            self.vel.x = -self.vel.x * rebound;
            self.vel.y = self.vel.y * tuning.bounce - tuning.wall_kick;
        }

        if self.pos.x + r > right && self.vel.x > 0.0 {
            self.pos.x = right - r;
            self.vel.x = -self.vel.x * rebound;
            self.vel.y = self.vel.y * tuning.bounce - tuning.wall_kick;
        }

        let floor = glass.floor();
        if self.pos.y + r > floor && self.vel.y > 0.0 {
            self.pos.y = floor - r;
            self.vel.y = -self.vel.y * rebound;
            self.vel.x *= tuning.bounce;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn arena() -> Arena {
        Arena::new(Vec2::new(400.0, 800.0), &Tuning::default())
    }

    fn ball_at(pos: Vec2, vel: Vec2) -> Ball {
        Ball::new(1, pos, vel, 15.0, 1)
    }

    #[test]
    fn test_integrate_applies_gravity_and_friction() {
        let tuning = Tuning::default();
        let mut ball = ball_at(Vec2::new(100.0, 100.0), Vec2::new(4.0, 0.0));
        ball.integrate(&tuning);

        let expected = Vec2::new(4.0 * 0.995, 0.5 * 0.995);
        assert!((ball.vel - expected).length() < 1e-5);
        assert!((ball.pos - (Vec2::new(100.0, 100.0) + expected)).length() < 1e-4);
    }

    #[test]
    fn test_speed_floor_keeps_direction() {
        let tuning = Tuning::default();
        let mut ball = ball_at(Vec2::new(100.0, 100.0), Vec2::new(-0.5, -0.5));
        ball.integrate(&tuning);
        assert!((ball.speed() - tuning.min_speed).abs() < 1e-4);
        assert!(ball.vel.x < 0.0);
    }

    #[test]
    fn test_speed_floor_from_rest_falls_down() {
        let tuning = Tuning {
            gravity: 0.0,
            ..Tuning::default()
        };
        let mut ball = ball_at(Vec2::new(100.0, 100.0), Vec2::ZERO);
        ball.integrate(&tuning);
        assert!(ball.vel.x.abs() < 1e-6);
        assert!((ball.vel.y - tuning.min_speed).abs() < 1e-6);
    }

    #[test]
    fn test_speed_ceiling() {
        let tuning = Tuning::default();
        let mut ball = ball_at(Vec2::new(100.0, 100.0), Vec2::new(40.0, -30.0));
        ball.integrate(&tuning);
        assert!((ball.speed() - tuning.max_speed).abs() < 1e-4);
    }

    proptest! {
        #[test]
        fn prop_speed_bounded_after_integrate(
            vx in -200.0f32..200.0,
            vy in -200.0f32..200.0,
        ) {
            let tuning = Tuning::default();
            let mut ball = ball_at(Vec2::new(200.0, 300.0), Vec2::new(vx, vy));
            ball.integrate(&tuning);
            let speed = ball.speed();
            prop_assert!(speed >= tuning.min_speed - 1e-3);
            prop_assert!(speed <= tuning.max_speed + 1e-3);
        }
    }

    #[test]
    fn test_floor_bounce_energy() {
        let tuning = Tuning::default();
        let glass = arena().glass;
        let v = 10.0;
        let mut ball = ball_at(
            Vec2::new(glass.center_x(), glass.floor() - 15.0 + 2.0),
            Vec2::new(0.0, v),
        );

        ball.collide_glass(&glass, &tuning);

        assert!((ball.vel.y - (-v * 0.95 * 1.01)).abs() < 1e-4);
        assert_eq!(ball.vel.x, 0.0);
        assert!((ball.pos.y - (glass.floor() - 15.0)).abs() < 1e-4);
    }

    #[test]
    fn test_left_wall_bounce_adds_kick() {
        let tuning = Tuning::default();
        let glass = arena().glass;
        let y = glass.y + glass.height / 2.0;
        let (left, _) = glass.bounds_at(y);
        let mut ball = ball_at(Vec2::new(left + 10.0, y), Vec2::new(-5.0, 4.0));

        ball.collide_glass(&glass, &tuning);

        assert!((ball.pos.x - (left + 15.0)).abs() < 1e-4);
        assert!((ball.vel.x - 5.0 * 0.95 * 1.01).abs() < 1e-4);
        assert!((ball.vel.y - (4.0 * 0.95 - 2.0)).abs() < 1e-4);
    }

    #[test]
    fn test_right_wall_ignored_when_moving_away() {
        let tuning = Tuning::default();
        let glass = arena().glass;
        let y = glass.y + glass.height / 2.0;
        let (_, right) = glass.bounds_at(y);
        let mut ball = ball_at(Vec2::new(right - 10.0, y), Vec2::new(-5.0, 4.0));

        ball.collide_glass(&glass, &tuning);

        assert_eq!(ball.vel, Vec2::new(-5.0, 4.0));
    }

    #[test]
    fn test_right_wall_bounce_adds_kick() {
        let tuning = Tuning::default();
        let glass = arena().glass;
        let y = glass.y + glass.height / 2.0;
        let (_, right) = glass.bounds_at(y);
        let mut ball = ball_at(Vec2::new(right - 10.0, y), Vec2::new(5.0, 4.0));

        ball.collide_glass(&glass, &tuning);

        assert!((ball.pos.x - (right - 15.0)).abs() < 1e-4);
        assert!((ball.vel.x - (-5.0 * 0.95 * 1.01)).abs() < 1e-4);
        assert!((ball.vel.y - (4.0 * 0.95 - 2.0)).abs() < 1e-4);
    }

    #[test]
    fn test_corner_applies_wall_then_floor() {
        let tuning = Tuning::default();
        let glass = arena().glass;
        let y = glass.floor() - 15.0 + 2.0;
        let (left, _) = glass.bounds_at(y);
        let mut ball = ball_at(Vec2::new(left + 10.0, y), Vec2::new(-5.0, 4.0));

        ball.collide_glass(&glass, &tuning);

        let rebound = 0.95 * 1.01;
        // Wall: x flips and y gets the kick (4 * 0.95 - 2 = 1.8, still falling)
        // Floor: y flips and x is damped once more
        assert!((ball.pos.x - (left + 15.0)).abs() < 1e-4);
        assert!((ball.pos.y - (glass.floor() - 15.0)).abs() < 1e-4);
        assert!((ball.vel.x - 5.0 * rebound * 0.95).abs() < 1e-4);
        assert!((ball.vel.y - (-1.8 * rebound)).abs() < 1e-4);
    }

    #[test]
    fn test_glass_ignored_outside_vertical_span() {
        let tuning = Tuning::default();
        let glass = arena().glass;
        let mut ball = ball_at(Vec2::new(glass.center_x(), glass.y - 40.0), Vec2::new(0.0, 10.0));
        ball.collide_glass(&glass, &tuning);
        assert_eq!(ball.vel, Vec2::new(0.0, 10.0));
    }

    #[test]
    fn test_ceiling_bounce() {
        let tuning = Tuning::default();
        let arena = arena();
        let ctx = StepContext {
            arena: &arena,
            tuning: &tuning,
            policy: RespawnPolicy::default(),
        };
        let mut rng = Pcg32::seed_from_u64(1);
        let mut ball = ball_at(Vec2::new(60.0, 16.0), Vec2::new(0.0, -10.0));

        let step = ball.update(&ctx, &mut rng);

        assert_eq!(step, BallStep::Moved);
        assert_eq!(ball.pos.y, 15.0);
        assert!(ball.vel.y > 0.0);
    }

    #[test]
    fn test_side_exit_hides_without_bounce() {
        let tuning = Tuning::default();
        let arena = arena();
        let ctx = StepContext {
            arena: &arena,
            tuning: &tuning,
            policy: RespawnPolicy::default(),
        };
        let mut rng = Pcg32::seed_from_u64(1);
        let mut ball = ball_at(Vec2::new(16.0, 100.0), Vec2::new(-5.0, 0.0));

        let step = ball.update(&ctx, &mut rng);

        assert_eq!(step, BallStep::Exited);
        assert!(!ball.visible);
        assert!(ball.respawn_pending);
        assert!(ball.vel.x < 0.0);
    }

    #[test]
    fn test_respawn_after_exactly_delay_frames() {
        let tuning = Tuning::default();
        let arena = arena();
        let ctx = StepContext {
            arena: &arena,
            tuning: &tuning,
            policy: RespawnPolicy::default(),
        };
        let mut rng = Pcg32::seed_from_u64(7);
        let mut ball = Ball::new(1, Vec2::new(16.0, 100.0), Vec2::new(-5.0, 0.0), 15.0, 4);

        assert_eq!(ball.update(&ctx, &mut rng), BallStep::Exited);
        let mut hidden_frames = 1;
        loop {
            let step = ball.update(&ctx, &mut rng);
            if step == BallStep::Respawned {
                break;
            }
            assert!(!ball.visible);
            hidden_frames += 1;
            assert!(hidden_frames <= 200, "ball never respawned");
        }

        assert_eq!(hidden_frames, 90);
        assert!(ball.visible);
        assert!(!ball.respawn_pending);
        assert_eq!(ball.pos, Vec2::new(200.0, 30.0));
        assert_eq!(ball.vel.x.abs(), 3.0);
        assert_eq!(ball.vel.y, 0.0);
        assert_eq!(ball.tier, 4);
    }

    #[test]
    fn test_bottom_exit_uses_same_delay() {
        let tuning = Tuning::default();
        let arena = arena();
        let ctx = StepContext {
            arena: &arena,
            tuning: &tuning,
            policy: RespawnPolicy::default(),
        };
        let mut rng = Pcg32::seed_from_u64(7);
        let mut ball = ball_at(Vec2::new(380.0, 812.0), Vec2::new(0.0, 5.0));

        assert_eq!(ball.update(&ctx, &mut rng), BallStep::Exited);
        let mut hidden_frames = 1;
        while ball.update(&ctx, &mut rng) != BallStep::Respawned {
            hidden_frames += 1;
        }
        assert_eq!(hidden_frames, 90);
    }

    #[test]
    fn test_ineligible_ball_retires() {
        let tuning = Tuning::default();
        let arena = arena();
        let ctx = StepContext {
            arena: &arena,
            tuning: &tuning,
            policy: RespawnPolicy {
                min_eligible_tier: 2,
                generation: 1,
            },
        };
        let mut rng = Pcg32::seed_from_u64(7);
        let mut ball = ball_at(Vec2::new(16.0, 100.0), Vec2::new(-5.0, 0.0));

        ball.update(&ctx, &mut rng);
        assert!(!ball.respawn_eligible);

        let mut last = BallStep::Moved;
        for _ in 0..90 {
            last = ball.update(&ctx, &mut rng);
        }
        assert_eq!(last, BallStep::Retired);
        assert!(!ball.visible);
    }

    #[test]
    fn test_policy_applies_once_per_generation() {
        let mut ball = ball_at(Vec2::ZERO, Vec2::ZERO);
        ball.policy_generation = 3;

        // Already seen: no effect even though the tier is below the minimum
        ball.apply_policy(RespawnPolicy {
            min_eligible_tier: 4,
            generation: 3,
        });
        assert!(ball.respawn_eligible);

        ball.apply_policy(RespawnPolicy {
            min_eligible_tier: 4,
            generation: 4,
        });
        assert!(!ball.respawn_eligible);

        // Ineligibility sticks
        ball.apply_policy(RespawnPolicy {
            min_eligible_tier: 1,
            generation: 5,
        });
        assert!(!ball.respawn_eligible);
    }
}
