//! Mini Arcade entry point
//!
//! The games run in the browser (`mount_breakout` / `mount_blitzball` from
//! the wasm build). Natively this binary plays both headless: Breakout on
//! autopilot and a Blitzball match, each for a number of frames, and logs
//! how they went. Frames are synthetic unless `--realtime` paces them at
//! 60 Hz.
//!
//! Usage: `mini-arcade [FRAMES] [--realtime] [--save-settings]`

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use mini_arcade::ArcadeSettings;
    use mini_arcade::platform::{CancelToken, FrameDriver};
    use mini_arcade::renderer::CommandList;
    use mini_arcade::sim::{BlitzballGame, BreakoutGame, Game};

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Mini Arcade (native, headless) starting...");

    let settings = ArcadeSettings::load();
    if std::env::args().any(|arg| arg == "--save-settings") {
        settings.save();
    }
    let frames: u64 = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(3_600);
    let realtime = std::env::args().any(|arg| arg == "--realtime");
    let seed = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0);
    log::info!("Running {} frames per game, seed {}", frames, seed);

    let token = CancelToken::new();

    // Breakout on autopilot
    let mut breakout = BreakoutGame::new(settings.breakout.clone(), seed);
    breakout.set_demo(true);
    let size = breakout.arena_size();
    let mut surface = CommandList::new(size.x, size.y);
    let mut driver = FrameDriver::new(breakout, settings.step_mode);
    run(&mut driver, &mut surface, &token, frames, realtime);
    let world = &driver.game().world;
    log::info!(
        "Breakout: score {}, lives {}, {} bricks left, phase {:?}",
        world.score,
        world.lives,
        world.bricks_remaining(),
        world.phase
    );
    log::info!("Last frame: {:?}", surface.texts());

    // Blitzball match
    let blitzball = BlitzballGame::new(settings.blitzball.clone(), seed);
    let size = blitzball.arena_size();
    let mut surface = CommandList::new(size.x, size.y);
    let mut driver = FrameDriver::new(blitzball, settings.step_mode);
    run(&mut driver, &mut surface, &token, frames, realtime);
    let state = &driver.game().world.state;
    log::info!(
        "Blitzball: half {}, {} left, {} - {}, phase {:?}",
        state.half,
        state.clock_label(),
        state.score_a,
        state.score_b,
        state.phase
    );
    log::info!("Last frame: {:?}", surface.texts());
}

/// Play `frames` refreshes, paced at 60 Hz when `realtime`
#[cfg(not(target_arch = "wasm32"))]
fn run<G: mini_arcade::sim::Game>(
    driver: &mut mini_arcade::platform::FrameDriver<G>,
    surface: &mut mini_arcade::renderer::CommandList,
    token: &mini_arcade::platform::CancelToken,
    frames: u64,
    realtime: bool,
) {
    use mini_arcade::platform::{IntervalSync, ScriptedSync, run_until_cancelled};

    if realtime {
        let mut sync = IntervalSync::new(60.0);
        let mut budget = LimitedSync {
            inner: &mut sync,
            remaining: frames,
        };
        run_until_cancelled(driver, &mut budget, surface, token);
    } else {
        let mut sync = ScriptedSync::fixed_rate(60.0, frames);
        run_until_cancelled(driver, &mut sync, surface, token);
    }
}

/// Caps another display source at a number of frames
#[cfg(not(target_arch = "wasm32"))]
struct LimitedSync<'a> {
    inner: &'a mut dyn mini_arcade::platform::DisplaySync,
    remaining: u64,
}

#[cfg(not(target_arch = "wasm32"))]
impl mini_arcade::platform::DisplaySync for LimitedSync<'_> {
    fn next_frame(&mut self) -> Option<f64> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        self.inner.next_frame()
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry points are exported from the library, this is just to satisfy the compiler
}
