//! Data-driven game balance
//!
//! Defaults mirror `crate::consts`. A JSON file may override any subset of
//! fields; missing fields keep their defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Tunable physics and game parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Ball physics ===
    pub ball_radius: f32,
    pub gravity: f32,
    pub friction: f32,
    pub bounce: f32,
    pub energy_boost: f32,
    pub min_speed: f32,
    pub max_speed: f32,
    pub wall_kick: f32,

    // === Ball-ball contacts ===
    pub restitution: f32,
    pub score_multiplier: u64,
    pub target_score: u64,

    // === Respawn / spawn ===
    pub respawn_delay_frames: u32,
    pub respawn_speed: f32,
    pub merge_speed: f32,
    pub spawn_y: f32,
    pub spawn_fall_speed: f32,
    pub spawn_jitter: f32,
    pub tier_escalation_steps: u32,

    // === Input ===
    pub tap_radius: f32,
    pub tap_force: f32,

    // === Glass ===
    pub glass_width: f32,
    pub glass_height: f32,
    pub glass_taper: f32,

    // === Buttons ===
    pub button_width: f32,
    pub button_height: f32,
    pub button_gap: f32,
    pub button_bottom_padding: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            ball_radius: BALL_RADIUS,
            gravity: GRAVITY,
            friction: FRICTION,
            bounce: BOUNCE,
            energy_boost: ENERGY_BOOST,
            min_speed: BALL_MIN_SPEED,
            max_speed: BALL_MAX_SPEED,
            wall_kick: WALL_KICK,

            restitution: BALL_RESTITUTION,
            score_multiplier: SCORE_MULTIPLIER,
            target_score: TARGET_SCORE,

            respawn_delay_frames: RESPAWN_DELAY_FRAMES,
            respawn_speed: RESPAWN_SPEED,
            merge_speed: MERGE_LAUNCH_SPEED,
            spawn_y: SPAWN_Y,
            spawn_fall_speed: SPAWN_FALL_SPEED,
            spawn_jitter: SPAWN_JITTER,
            tier_escalation_steps: TIER_ESCALATION_STEPS,

            tap_radius: TAP_RADIUS,
            tap_force: TAP_FORCE,

            glass_width: GLASS_WIDTH,
            glass_height: GLASS_HEIGHT,
            glass_taper: GLASS_TAPER,

            button_width: BUTTON_WIDTH,
            button_height: BUTTON_HEIGHT,
            button_gap: BUTTON_GAP,
            button_bottom_padding: BUTTON_BOTTOM_PADDING,
        }
    }
}

impl Tuning {
    /// Parse tuning from JSON, then repair inconsistent values
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let mut tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate();
        Ok(tuning)
    }

    /// Load tuning from a JSON file, falling back to defaults on any failure
    pub fn load_or_default(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(tuning) => {
                    log::info!("Loaded tuning from {}", path.display());
                    tuning
                }
                Err(e) => {
                    log::warn!("Invalid tuning file {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                log::warn!("Could not read tuning file {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Replace values the simulation cannot work with by their defaults
    pub fn validate(&mut self) {
        let defaults = Self::default();

        if self.ball_radius <= 0.0 {
            log::warn!("ball_radius must be positive, using {}", defaults.ball_radius);
            self.ball_radius = defaults.ball_radius;
        }
        // Floor is applied before the ceiling, so it has to stay below it
        if self.min_speed < 0.0 || self.min_speed >= self.max_speed {
            log::warn!(
                "speed range {}..{} is invalid, using {}..{}",
                self.min_speed,
                self.max_speed,
                defaults.min_speed,
                defaults.max_speed
            );
            self.min_speed = defaults.min_speed;
            self.max_speed = defaults.max_speed;
        }
        if self.glass_width <= 0.0 || self.glass_height <= 0.0 {
            log::warn!("glass size must be positive, using defaults");
            self.glass_width = defaults.glass_width;
            self.glass_height = defaults.glass_height;
        }
        if !(0.0..0.5).contains(&self.glass_taper) {
            log::warn!("glass_taper must be in [0, 0.5), using {}", defaults.glass_taper);
            self.glass_taper = defaults.glass_taper;
        }
        // Zero steps would double the spawn tier on every spawn
        if self.tier_escalation_steps == 0 {
            log::warn!(
                "tier_escalation_steps must be at least 1, using {}",
                defaults.tier_escalation_steps
            );
            self.tier_escalation_steps = defaults.tier_escalation_steps;
        }
        if self.button_width <= 0.0 || self.button_height <= 0.0 {
            log::warn!("button size must be positive, using defaults");
            self.button_width = defaults.button_width;
            self.button_height = defaults.button_height;
        }
        if self.target_score == 0 {
            self.target_score = defaults.target_score;
        }
    }

    /// Ball mass proxy (area-based)
    #[inline]
    pub fn mass_of(radius: f32) -> f32 {
        radius * radius
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "gravity": 0.8, "score_multiplier": 3 }"#).unwrap();
        assert_eq!(tuning.gravity, 0.8);
        assert_eq!(tuning.score_multiplier, 3);
        assert_eq!(tuning.max_speed, BALL_MAX_SPEED);
        assert_eq!(tuning.respawn_delay_frames, 90);
    }

    #[test]
    fn test_invalid_speed_range_is_repaired() {
        let tuning = Tuning::from_json(r#"{ "min_speed": 20.0, "max_speed": 10.0 }"#).unwrap();
        assert_eq!(tuning.min_speed, BALL_MIN_SPEED);
        assert_eq!(tuning.max_speed, BALL_MAX_SPEED);
    }

    #[test]
    fn test_zero_escalation_steps_is_repaired() {
        let tuning = Tuning::from_json(r#"{ "tier_escalation_steps": 0 }"#).unwrap();
        assert_eq!(tuning.tier_escalation_steps, TIER_ESCALATION_STEPS);

        let tuning = Tuning::from_json(r#"{ "tier_escalation_steps": 5 }"#).unwrap();
        assert_eq!(tuning.tier_escalation_steps, 5);
    }

    #[test]
    fn test_button_layout_overrides() {
        let tuning =
            Tuning::from_json(r#"{ "button_width": 100.0, "button_height": -1.0 }"#).unwrap();
        assert_eq!(tuning.button_width, BUTTON_WIDTH);
        assert_eq!(tuning.button_height, BUTTON_HEIGHT);

        let tuning = Tuning::from_json(r#"{ "button_gap": 10.0, "merge_speed": 5.0 }"#).unwrap();
        assert_eq!(tuning.button_gap, 10.0);
        assert_eq!(tuning.merge_speed, 5.0);
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        assert!(Tuning::from_json("{ gravity: ").is_err());
    }

    #[test]
    fn test_missing_file_falls_back() {
        let tuning = Tuning::load_or_default(Path::new("/nonexistent/tuning.json"));
        assert_eq!(tuning, Tuning::default());
    }
}
