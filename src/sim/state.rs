//! Game state and the ball population
//!
//! `GameState` is the only owner of the ball population. Balls are added by
//! [`GameState::spawn_ball`] and [`GameState::merge_balls`], and removed by
//! merging or by retirement during a tick.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::ball::{Arena, Ball, RespawnPolicy};
use crate::tuning::Tuning;
use crate::ui::ButtonLayout;

/// Things that happened during a frame, drained by the frame driver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    BallSpawned { id: u32, tier: u32 },
    BallsMerged { consumed: [u32; 2], id: u32, tier: u32 },
    BallExited { id: u32 },
    BallRespawned { id: u32 },
    BallRetired { id: u32 },
    SpawnTierRaised { tier: u32 },
}

/// Complete game state for one session
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub tuning: Tuning,
    pub arena: Arena,
    pub buttons: ButtonLayout,
    /// Accumulated score (unbounded)
    pub score: u64,
    /// Tier given to newly spawned balls; only ever doubles
    pub spawn_tier: u32,
    /// Current respawn admission broadcast
    pub policy: RespawnPolicy,
    /// Frames simulated so far
    pub time_frames: u64,
    pub(super) balls: Vec<Ball>,
    pub(super) rng: Pcg32,
    pub(super) events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    /// Create an empty game on a screen of the given size
    pub fn new(seed: u64, screen: Vec2, tuning: Tuning) -> Self {
        Self {
            seed,
            arena: Arena::new(screen, &tuning),
            buttons: ButtonLayout::for_screen(screen, &tuning),
            tuning,
            score: 0,
            spawn_tier: 1,
            policy: RespawnPolicy::default(),
            time_frames: 0,
            balls: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// The whole population, hidden balls included
    pub fn balls(&self) -> &[Ball] {
        &self.balls
    }

    /// Balls that are drawn and collide
    pub fn visible_balls(&self) -> impl Iterator<Item = &Ball> {
        self.balls.iter().filter(|b| b.is_collidable())
    }

    pub fn ball(&self, id: u32) -> Option<&Ball> {
        self.balls.iter().find(|b| b.id == id)
    }

    /// Highest tier in the population
    pub fn max_tier(&self) -> Option<u32> {
        self.balls.iter().map(|b| b.tier).max()
    }

    /// Score as a fraction of the target, clamped to 1
    pub fn progress(&self) -> f32 {
        (self.score as f64 / self.tuning.target_score as f64).min(1.0) as f32
    }

    pub fn add_score(&mut self, points: u64) {
        self.score = self.score.saturating_add(points);
    }

    /// Take all events recorded since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Whether the strongest ball has pulled far enough ahead of the spawn tier
    fn spawn_tier_escalation_due(&self) -> bool {
        let Some(max_tier) = self.max_tier() else {
            return false;
        };
        let steps = self.tuning.tier_escalation_steps.min(32);
        max_tier as u64 >= (self.spawn_tier as u64) << steps
    }

    /// Double the spawn tier if escalation is due
    fn escalate_spawn_tier(&mut self) -> bool {
        if !self.spawn_tier_escalation_due() {
            return false;
        }
        // Stays a power of two; stop doubling at the top of the range
        let Some(next) = self.spawn_tier.checked_mul(2) else {
            return false;
        };
        self.spawn_tier = next;
        self.events.push(GameEvent::SpawnTierRaised {
            tier: self.spawn_tier,
        });
        log::info!("Spawn tier raised to {}", self.spawn_tier);
        true
    }

    /// Drop a new ball into the glass from above its center
    ///
    /// Returns the new ball's ID.
    pub fn spawn_ball(&mut self) -> u32 {
        self.escalate_spawn_tier();
        let tier = self.spawn_tier;

        let pos = Vec2::new(self.arena.glass.center_x(), self.tuning.spawn_y);
        let jitter = self.tuning.spawn_jitter;
        let vel = Vec2::new(
            (self.rng.random::<f32>() - 0.5) * 2.0 * jitter,
            self.tuning.spawn_fall_speed,
        );

        let id = self.next_entity_id();
        let mut ball = Ball::new(id, pos, vel, self.tuning.ball_radius, tier);
        ball.policy_generation = self.policy.generation;
        self.balls.push(ball);

        self.events.push(GameEvent::BallSpawned { id, tier });
        id
    }

    /// Whether some tier has at least two balls
    pub fn has_mergeable_balls(&self) -> bool {
        self.find_merge_pair().is_some()
    }

    /// Indices of the first pair at the lowest duplicated tier
    fn find_merge_pair(&self) -> Option<(usize, usize)> {
        if self.balls.len() < 2 {
            return None;
        }
        // Stable sort keeps population order within a tier
        let mut order: Vec<usize> = (0..self.balls.len()).collect();
        order.sort_by_key(|&i| self.balls[i].tier);

        order
            .windows(2)
            .find(|w| self.balls[w[0]].tier == self.balls[w[1]].tier)
            .map(|w| (w[0], w[1]))
    }

    /// Merge the two lowest-tier matching balls into one
    ///
    /// The merged ball sits at the midpoint, keeps the first ball's radius and
    /// carries the summed tier. Returns its ID, or None if nothing matches.
    pub fn merge_balls(&mut self) -> Option<u32> {
        let (first, second) = self.find_merge_pair()?;

        let a = &self.balls[first];
        let b = &self.balls[second];
        let pos = (a.pos + b.pos) / 2.0;
        let radius = a.radius;
        let tier = a.tier.saturating_add(b.tier);
        let consumed = [a.id, b.id];

        // Higher index first so the lower one stays valid
        let (lo, hi) = (first.min(second), first.max(second));
        self.balls.remove(hi);
        self.balls.remove(lo);

        let id = self.next_entity_id();
        let vel = Vec2::new(self.tuning.merge_speed, 0.0);
        let mut merged = Ball::new(id, pos, vel, radius, tier);
        merged.policy_generation = self.policy.generation;
        self.balls.push(merged);

        self.events.push(GameEvent::BallsMerged { consumed, id, tier });
        log::info!(
            "Merged balls {} and {} into {} (tier {})",
            consumed[0],
            consumed[1],
            id,
            tier
        );

        if self.escalate_spawn_tier() {
            // Balls below the new spawn tier vanish instead of respawning
            self.policy = RespawnPolicy {
                min_eligible_tier: self.spawn_tier,
                generation: self.policy.generation + 1,
            };
        }

        Some(id)
    }

    /// Remove balls whose respawn delay ran out while ineligible
    pub(super) fn retire(&mut self, ids: &[u32]) {
        if ids.is_empty() {
            return;
        }
        self.balls.retain(|b| !ids.contains(&b.id));
        for &id in ids {
            self.events.push(GameEvent::BallRetired { id });
        }
    }
}
