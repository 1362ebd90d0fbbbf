//! Glass Pinball headless runner
//!
//! Drives a session frame by frame without a window, optionally printing the
//! text renderer's output, then prints a JSON summary of the final state.

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::path::PathBuf;
    use std::time::{Duration, Instant};

    use clap::Parser;
    use glam::Vec2;
    use serde::Serialize;

    use glass_pinball::sim::Ball;
    use glass_pinball::{Session, Tuning, renderer::TextRenderer};

    /// Frame period at the nominal 60 Hz cadence
    const FRAME_PERIOD: Duration = Duration::from_micros(16_667);

    #[derive(Parser, Debug)]
    #[command(name = "glass-pinball", about = "Run the merge-ball simulation headless")]
    struct Args {
        /// Number of frames to simulate
        #[arg(long, default_value_t = 3600)]
        frames: u64,
        /// RNG seed (defaults to the current time)
        #[arg(long)]
        seed: Option<u64>,
        /// JSON tuning overrides
        #[arg(long)]
        tuning: Option<PathBuf>,
        /// Screen width in pixels
        #[arg(long, default_value_t = 375.0)]
        width: f32,
        /// Screen height in pixels
        #[arg(long, default_value_t = 812.0)]
        height: f32,
        /// Let the auto-player press the buttons
        #[arg(long)]
        idle: bool,
        /// Print the text frame every N frames (0 = never)
        #[arg(long, default_value_t = 0)]
        render_every: u64,
        /// Text frame size
        #[arg(long, default_value_t = 48)]
        cols: usize,
        #[arg(long, default_value_t = 52)]
        rows: usize,
        /// Pace frames at 60 Hz instead of running flat out
        #[arg(long)]
        realtime: bool,
    }

    #[derive(Serialize)]
    struct Summary<'a> {
        seed: u64,
        frames: u64,
        score: u64,
        progress: f32,
        spawn_tier: u32,
        balls: &'a [Ball],
    }

    pub fn run() {
        env_logger::init();
        let args = Args::parse();
        log::info!("Glass Pinball (headless) starting...");

        if args.width <= 0.0 || args.height <= 0.0 {
            log::error!("Screen size must be positive, got {}x{}", args.width, args.height);
            std::process::exit(2);
        }

        let tuning = args
            .tuning
            .as_deref()
            .map(Tuning::load_or_default)
            .unwrap_or_default();
        let seed = args.seed.unwrap_or_else(|| {
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_millis() as u64)
                .unwrap_or(0)
        });

        let screen = Vec2::new(args.width, args.height);
        let mut session = Session::new(
            seed,
            screen,
            tuning,
            TextRenderer::new(args.cols, args.rows),
        );
        session.set_idle_mode(args.idle);
        session.start();

        let started = Instant::now();
        let mut frames = 0;
        while frames < args.frames && session.frame() {
            frames += 1;
            if args.render_every > 0 && frames.is_multiple_of(args.render_every) {
                println!("{}", session.renderer().buffer());
            }
            if args.realtime {
                let due = FRAME_PERIOD * frames as u32;
                if let Some(wait) = due.checked_sub(started.elapsed()) {
                    std::thread::sleep(wait);
                }
            }
        }
        session.stop();
        log::info!("Ran {} frames in {:?}", frames, started.elapsed());

        let state = session.state();
        let summary = Summary {
            seed,
            frames,
            score: state.score,
            progress: state.progress(),
            spawn_tier: state.spawn_tier,
            balls: state.balls(),
        };
        match serde_json::to_string_pretty(&summary) {
            Ok(json) => println!("{}", json),
            Err(e) => log::error!("Failed to serialize summary: {}", e),
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    native::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The web host drives `Session` directly; this is just to satisfy the compiler
}
