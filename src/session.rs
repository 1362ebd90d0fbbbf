//! Frame driver
//!
//! A `Session` owns one game and one renderer. The host scheduler calls
//! [`Session::frame`] at its animation cadence; `start`/`stop` decide whether
//! frames do anything.

use glam::Vec2;

use crate::renderer::{FrameSnapshot, Renderer};
use crate::sim::{GameEvent, GameState, TickInput, tick};
use crate::tuning::Tuning;

/// One running game instance
pub struct Session<R: Renderer> {
    state: GameState,
    renderer: R,
    input: TickInput,
    running: bool,
}

impl<R: Renderer> Session<R> {
    /// Create a session with one ball already dropping
    pub fn new(seed: u64, screen: Vec2, tuning: Tuning, renderer: R) -> Self {
        let mut state = GameState::new(seed, screen, tuning);
        state.spawn_ball();
        log::info!(
            "Game initialized with seed {} on {}x{} screen",
            seed,
            screen.x,
            screen.y
        );
        let mut session = Self {
            state,
            renderer,
            input: TickInput::default(),
            running: false,
        };
        session.log_events();
        // Initial frame so the host has something to show before starting
        session.render();
        session
    }

    pub fn start(&mut self) {
        if !self.running {
            self.running = true;
            log::info!("Game loop started");
        }
    }

    /// Stop immediately; later frames are no-ops until `start`
    pub fn stop(&mut self) {
        if self.running {
            self.running = false;
            self.input.taps.clear();
            log::info!("Game loop stopped at frame {}", self.state.time_frames);
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Queue a tap for the next frame
    pub fn tap(&mut self, x: f32, y: f32) {
        self.input.taps.push(Vec2::new(x, y));
    }

    pub fn set_idle_mode(&mut self, idle: bool) {
        if self.input.idle_mode != idle {
            self.input.idle_mode = idle;
            log::info!("Idle mode: {}", idle);
        }
    }

    /// Update then render one frame; false if the session is stopped
    pub fn frame(&mut self) -> bool {
        if !self.running {
            return false;
        }

        tick(&mut self.state, &self.input);
        // Taps are one-shot
        self.input.taps.clear();

        self.log_events();
        self.render();
        true
    }

    /// Run up to `frames` frames, stopping early if the session stops
    pub fn run(&mut self, frames: u64) -> u64 {
        let mut ran = 0;
        while ran < frames && self.frame() {
            ran += 1;
        }
        ran
    }

    /// Throw the current game away and start over with a new seed
    pub fn restart(&mut self, seed: u64) {
        let screen = self.state.arena.screen;
        let tuning = self.state.tuning.clone();
        self.state = GameState::new(seed, screen, tuning);
        self.state.spawn_ball();
        self.input.taps.clear();
        log::info!("Game restarted with seed: {}", seed);
        self.log_events();
        self.render();
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Direct access for spawn/merge requests outside the tap path
    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    fn render(&mut self) {
        let snapshot = FrameSnapshot::capture(&self.state);
        self.renderer.render(&snapshot);
    }

    fn log_events(&mut self) {
        for event in self.state.drain_events() {
            match event {
                GameEvent::BallSpawned { id, tier } => {
                    log::info!("Ball {} spawned (tier {})", id, tier)
                }
                GameEvent::BallsMerged { consumed, id, tier } => log::info!(
                    "Balls {} and {} merged into {} (tier {})",
                    consumed[0],
                    consumed[1],
                    id,
                    tier
                ),
                GameEvent::SpawnTierRaised { tier } => log::info!("New balls now tier {}", tier),
                GameEvent::BallExited { id } => log::debug!("Ball {} left the screen", id),
                GameEvent::BallRespawned { id } => log::debug!("Ball {} respawned", id),
                GameEvent::BallRetired { id } => log::debug!("Ball {} retired", id),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::NullRenderer;

    /// Counts frames it was asked to draw
    #[derive(Default)]
    struct CountingRenderer {
        frames: Vec<u64>,
    }

    impl Renderer for CountingRenderer {
        fn render(&mut self, frame: &FrameSnapshot) {
            self.frames.push(frame.frame);
        }
    }

    fn session() -> Session<CountingRenderer> {
        Session::new(
            99,
            Vec2::new(400.0, 800.0),
            Tuning::default(),
            CountingRenderer::default(),
        )
    }

    #[test]
    fn test_new_session_has_one_ball_and_initial_frame() {
        let session = session();
        assert_eq!(session.state().balls().len(), 1);
        assert_eq!(session.renderer().frames, vec![0]);
        assert!(!session.is_running());
    }

    #[test]
    fn test_frames_only_run_while_started() {
        let mut session = session();
        assert!(!session.frame());
        assert_eq!(session.state().time_frames, 0);

        session.start();
        assert_eq!(session.run(10), 10);
        assert_eq!(session.state().time_frames, 10);
        assert_eq!(session.renderer().frames.len(), 11);

        session.stop();
        assert_eq!(session.run(10), 0);
        assert_eq!(session.state().time_frames, 10);
    }

    #[test]
    fn test_taps_apply_on_next_frame() {
        let mut session = session();
        session.start();
        let add = session.state().buttons.add.center();

        session.tap(add.x, add.y);
        assert_eq!(session.state().balls().len(), 1);
        session.frame();
        assert_eq!(session.state().balls().len(), 2);

        // One-shot: no further spawns
        session.frame();
        assert_eq!(session.state().balls().len(), 2);
    }

    #[test]
    fn test_restart_resets_game() {
        let mut session = Session::new(
            5,
            Vec2::new(400.0, 800.0),
            Tuning::default(),
            NullRenderer,
        );
        session.start();
        session.run(30);
        session.restart(6);

        assert_eq!(session.state().seed, 6);
        assert_eq!(session.state().time_frames, 0);
        assert_eq!(session.state().score, 0);
        assert_eq!(session.state().balls().len(), 1);
    }

    #[test]
    fn test_sessions_are_independent() {
        let mut a = session();
        let b = session();
        a.start();
        a.set_idle_mode(true);
        a.run(100);
        assert!(a.state().balls().len() > 1);
        assert_eq!(b.state().balls().len(), 1);
        assert_eq!(b.state().time_frames, 0);
    }
}
