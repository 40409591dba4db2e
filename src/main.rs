//! Ballpit entry point
//!
//! Runs one demo headlessly with a scripted input pattern, or the grid game
//! interactively on stdin.

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use glam::Vec2;

use ballpit::consts::{FPS_LIMIT, SIM_DT};
use ballpit::grid::{Console, Grid};
use ballpit::renderer;
use ballpit::settings::{
    BlinkSettings, BounceSettings, DemoSettings, FallingSettings, GridSettings, MixerSettings,
    ShapesSettings,
};
use ballpit::sim::{
    Blink, BounceInput, BounceSim, FallingGame, FallingInput, FixedTimestep, FrameClock, Mixer,
    MixerInput, PoolError, ShapesField, ShapesInput, Simulation,
};

const USAGE: &str = "usage: ballpit <falling|bounce|shapes|mixer|blink|grid> [--settings PATH] [--seconds N]";

#[derive(Debug, thiserror::Error)]
enum RunError {
    #[error("{0}\n{usage}", usage = USAGE)]
    Usage(String),
    #[error(transparent)]
    Pool(#[from] PoolError),
    #[error("console: {0}")]
    Io(#[from] io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Demo {
    Falling,
    Bounce,
    Shapes,
    Mixer,
    Blink,
    Grid,
}

impl Demo {
    fn parse(s: &str) -> Option<Self> {
        match s {
            "falling" => Some(Demo::Falling),
            "bounce" => Some(Demo::Bounce),
            "shapes" => Some(Demo::Shapes),
            "mixer" => Some(Demo::Mixer),
            "blink" => Some(Demo::Blink),
            "grid" => Some(Demo::Grid),
            _ => None,
        }
    }
}

#[derive(Debug)]
struct Args {
    demo: Demo,
    settings: Option<PathBuf>,
    seconds: f32,
}

impl Args {
    fn parse(mut args: impl Iterator<Item = String>) -> Result<Self, RunError> {
        let name = args
            .next()
            .ok_or_else(|| RunError::Usage("missing demo name".into()))?;
        let demo =
            Demo::parse(&name).ok_or_else(|| RunError::Usage(format!("unknown demo '{name}'")))?;
        let mut parsed = Self {
            demo,
            settings: None,
            seconds: 5.0,
        };

        while let Some(flag) = args.next() {
            let value = args
                .next()
                .ok_or_else(|| RunError::Usage(format!("{flag} needs a value")))?;
            match flag.as_str() {
                "--settings" => parsed.settings = Some(PathBuf::from(value)),
                "--seconds" => {
                    parsed.seconds = value
                        .parse::<f32>()
                        .ok()
                        .filter(|s| s.is_finite() && *s > 0.0)
                        .ok_or_else(|| RunError::Usage(format!("bad --seconds '{value}'")))?;
                }
                _ => return Err(RunError::Usage(format!("unknown flag '{flag}'"))),
            }
        }
        Ok(parsed)
    }

    fn settings_path<S: DemoSettings>(&self) -> PathBuf {
        self.settings
            .clone()
            .unwrap_or_else(|| PathBuf::from(S::FILE_NAME))
    }

    fn load<S: DemoSettings>(&self) -> S {
        S::load_or_default(&self.settings_path::<S>())
    }
}

fn time_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}

/// Per-demo hooks for the headless loop
struct Hooks<S: Simulation, F, P, D, R> {
    /// Update the held-input snapshot for the current elapsed time
    script: F,
    /// Frame-rate work done before the fixed ticks
    pre_tick: P,
    /// Generate this frame's geometry, returning the vertex count
    draw: D,
    /// One-line status for the log
    report: R,
    _sim: std::marker::PhantomData<S>,
}

impl<S, F, P, D, R> Hooks<S, F, P, D, R>
where
    S: Simulation,
    F: FnMut(f32, &mut S::Input),
    P: FnMut(&mut S, f32),
    D: Fn(&S) -> usize,
    R: Fn(&S) -> String,
{
    fn new(script: F, pre_tick: P, draw: D, report: R) -> Self {
        Self {
            script,
            pre_tick,
            draw,
            report,
            _sim: std::marker::PhantomData,
        }
    }

    /// Frame loop: measure the wall delta, feed input, drain fixed ticks,
    /// draw, then sleep off the rest of the frame budget.
    fn run(mut self, name: &str, sim: &mut S, seconds: f32)
    where
        S::Input: Default,
    {
        let frame_budget = Duration::from_secs_f32(1.0 / FPS_LIMIT as f32);
        let mut clock = FrameClock::new();
        let mut stepper = FixedTimestep::new(SIM_DT);
        let mut input = S::Input::default();
        let mut elapsed = 0.0;
        let mut frames: u64 = 0;
        let mut next_report = 1.0;

        log::info!("{name}: running for {seconds} s");
        while elapsed < seconds {
            let frame_start = Instant::now();
            let delta = clock.restart();
            elapsed += delta;

            (self.script)(elapsed, &mut input);
            (self.pre_tick)(sim, delta);
            stepper.advance(delta, sim, &mut input);
            let vertices = (self.draw)(sim);
            frames += 1;

            if elapsed >= next_report {
                log::info!("{name} t={elapsed:.1}s: {} [{vertices} vertices]", (self.report)(sim));
                next_report += 1.0;
            }

            if let Some(rest) = frame_budget.checked_sub(frame_start.elapsed()) {
                std::thread::sleep(rest);
            }
        }
        log::info!(
            "{name} finished: {} ({frames} frames, {} ticks)",
            (self.report)(sim),
            stepper.ticks()
        );
    }
}

/// Which way the scripted player is pushing, changing every `period` seconds
fn sweep(t: f32, period: f32) -> usize {
    (t / period) as usize % 4
}

/// Number of whole `period`s elapsed, used to fire one-shot commands
fn pulses(t: f32, period: f32) -> u32 {
    (t / period) as u32
}

fn run_falling(args: &Args) -> Result<(), RunError> {
    let settings: FallingSettings = args.load();
    let mut game = FallingGame::new(&settings, settings.seed.unwrap_or_else(time_seed))?;

    Hooks::new(
        |t, input: &mut FallingInput| {
            let left = pulses(t, 1.0) % 2 == 0;
            input.directions.left = left;
            input.directions.right = !left;
        },
        |game: &mut FallingGame, delta| {
            game.advance_spawner(delta);
        },
        |game: &FallingGame| renderer::draw_falling(game).len(),
        |game: &FallingGame| {
            format!(
                "{} | {} balls",
                game.status_text().replace('\n', " | "),
                game.pool.active_count()
            )
        },
    )
    .run("falling", &mut game, args.seconds);

    if game.is_over() {
        log::info!("Game over with score {}", game.score);
    }
    Ok(())
}

fn run_bounce(args: &Args) -> Result<(), RunError> {
    let settings: BounceSettings = args.load();
    let mut sim = BounceSim::new(&settings);
    let mut toggles = 0;

    Hooks::new(
        move |t, input: &mut BounceInput| {
            let d = &mut input.directions;
            let dir = sweep(t, 0.5);
            d.up = dir == 0;
            d.right = dir == 1;
            d.down = dir == 2;
            d.left = dir == 3;
            let due = pulses(t, 2.0);
            if due > toggles {
                toggles = due;
                input.toggle_friction = true;
            }
        },
        |_: &mut BounceSim, _| {},
        |sim: &BounceSim| renderer::draw_bounce(sim).len(),
        |sim: &BounceSim| {
            format!(
                "pos ({:.0}, {:.0}) speed {:.1} friction {}",
                sim.ball.pos.x,
                sim.ball.pos.y,
                sim.ball.speed(),
                if sim.friction_enabled { "on" } else { "off" }
            )
        },
    )
    .run("bounce", &mut sim, args.seconds);
    Ok(())
}

fn run_shapes(args: &Args) -> Result<(), RunError> {
    let settings: ShapesSettings = args.load();
    let mut field = ShapesField::new(&settings, settings.seed.unwrap_or_else(time_seed));
    let center = field.bounds.center();

    Hooks::new(
        move |t, input: &mut ShapesInput| {
            let d = &mut input.directions;
            let dir = sweep(t, 0.75);
            d.right = dir == 0;
            d.down = dir == 1;
            d.left = dir == 2;
            d.up = dir == 3;
            input.pointer = (pulses(t, 1.0) % 2 == 1).then_some(center);
        },
        |_: &mut ShapesField, _| {},
        |field: &ShapesField| renderer::draw_shapes(field).len(),
        |field: &ShapesField| {
            let lead = field.circles.first().map_or(Vec2::ZERO, |c| c.pos);
            let chaser = field.squares.first().map_or(Vec2::ZERO, |s| s.rect.pos);
            format!(
                "steered circle ({:.0}, {:.0}) chasing square ({:.0}, {:.0})",
                lead.x, lead.y, chaser.x, chaser.y
            )
        },
    )
    .run("shapes", &mut field, args.seconds);
    Ok(())
}

fn run_mixer(args: &Args) -> Result<(), RunError> {
    let settings: MixerSettings = args.load();
    let mut mixer = Mixer::new(&settings);
    log::info!("\n{}", ballpit::sim::mixer::HELP_TEXT);
    let mut started = false;
    let mut shots = 0;

    Hooks::new(
        move |t, input: &mut MixerInput| {
            if !started {
                started = true;
                input.toggle_loop = true;
                input.toggle_help = true;
            }
            let phase = pulses(t, 1.0) % 4;
            input.music_keys.volume_up = phase == 0;
            input.music_keys.volume_down = phase == 2;
            input.sfx_keys.pitch_up = phase == 1;
            input.sfx_keys.pitch_down = phase == 3;
            let due = pulses(t, 0.25);
            if due > shots {
                shots = due;
                input.play_sfx = true;
            }
        },
        |_: &mut Mixer, _| {},
        |_: &Mixer| 0,
        |mixer: &Mixer| {
            format!(
                "music {:?} at {:.1}s vol {:.1} pitch {:.1} | sfx {} playing vol {:.1} pitch {:.1}",
                mixer.music.voice.status,
                mixer.music.voice.cursor,
                mixer.music_levels.volume,
                mixer.music_levels.pitch,
                mixer.sfx.playing_count(),
                mixer.sfx_levels.volume,
                mixer.sfx_levels.pitch
            )
        },
    )
    .run("mixer", &mut mixer, args.seconds);

    mixer.shutdown();
    Ok(())
}

fn run_blink(args: &Args) -> Result<(), RunError> {
    let settings: BlinkSettings = args.load();
    let mut blink = Blink::new(&settings, settings.seed.unwrap_or_else(time_seed));
    let center = Vec2::new(
        ballpit::consts::WINDOW_WIDTH / 2.0,
        ballpit::consts::WINDOW_HEIGHT / 2.0,
    );

    Hooks::new(
        |_, _: &mut ()| {},
        |_: &mut Blink, _| {},
        move |blink: &Blink| renderer::draw_blink(blink, center).len(),
        |blink: &Blink| format!("colour {:?} after {} changes", blink.color(), blink.changes),
    )
    .run("blink", &mut blink, args.seconds);
    Ok(())
}

fn run_grid(args: &Args) -> Result<(), RunError> {
    let path = args.settings_path::<GridSettings>();
    let stdin = io::stdin();
    let mut console = Console::new(stdin.lock(), io::stdout());
    let settings = console.setup(&path)?;
    let mut grid = Grid::new(&settings);
    let outcome = console.play(&mut grid)?;
    log::debug!("Grid game ended: {outcome:?}");
    Ok(())
}

fn run(args: &Args) -> Result<(), RunError> {
    match args.demo {
        Demo::Falling => run_falling(args),
        Demo::Bounce => run_bounce(args),
        Demo::Shapes => run_shapes(args),
        Demo::Mixer => run_mixer(args),
        Demo::Blink => run_blink(args),
        Demo::Grid => run_grid(args),
    }
}

fn main() -> ExitCode {
    env_logger::init();

    let args = match Args::parse(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::from(2);
        }
    };

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
