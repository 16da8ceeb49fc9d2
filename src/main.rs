//! Globe Guess headless driver
//!
//! Loads the catalog, spawns an avatar per subject and plays one session
//! with an autopilot clicking a flat world map. Everything the globe would
//! show is logged instead of drawn (`RUST_LOG=info` or `debug`).

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use glam::{DVec3, Vec2};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use globe_guess::scene::{EquirectPicker, Recorder};
use globe_guess::sim::{GameController, GameEvent, GamePhase, MotionGenerator, NoiseField};
use globe_guess::{Catalog, Settings};

/// Virtual frame length (~60 Hz)
const FRAME_MS: u64 = 16;
/// Stop after ten virtual minutes no matter what
const MAX_FRAMES: u64 = 10 * 60 * 60;
const MAP_WIDTH: f32 = 3600.0;
const MAP_HEIGHT: f32 = 1800.0;

#[derive(Parser, Debug)]
#[command(
    name = "globe-guess",
    about = "Play a headless Globe Guess session",
    version
)]
struct Cli {
    /// Directory holding countries.json, people.json and settings.json
    #[arg(default_value = ".")]
    data_dir: PathBuf,
    /// Session seed (overrides settings.json)
    #[arg(long)]
    seed: Option<u64>,
}

/// Clicks the map like a distracted player
struct Autopilot {
    rng: Pcg32,
    round_generation: u64,
    next_click_ms: u64,
}

impl Autopilot {
    fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            round_generation: 0,
            next_click_ms: 0,
        }
    }

    fn update(
        &mut self,
        game: &mut GameController,
        picker: &EquirectPicker,
        scene: &mut Recorder,
    ) {
        let now = game.now_ms();
        if game.round_generation() != self.round_generation {
            self.round_generation = game.round_generation();
            self.next_click_ms = now + self.rng.random_range(1_500..6_000);
        }
        if !game.accepting_guesses() || now < self.next_click_ms {
            return;
        }
        let Some(answer) = game.current_answer().map(|loc| loc.position) else {
            return;
        };

        let screen = self.choose_click(answer, picker);
        game.handle_click(picker, screen, scene);
        self.next_click_ms = now + self.rng.random_range(1_000..3_000);
    }

    fn choose_click(&mut self, answer: DVec3, picker: &EquirectPicker) -> Vec2 {
        let roll: f64 = self.rng.random();
        if roll < 0.1 {
            // Off the map
            return Vec2::new(-10.0, -10.0);
        }
        if roll < 0.55 {
            let (lon, lat) = approx_degrees(answer);
            let lon = lon + self.rng.random_range(-2.0..2.0);
            let lat = (lat + self.rng.random_range(-2.0..2.0)).clamp(-90.0, 90.0);
            return picker.screen_for(lon, lat);
        }
        picker.screen_for(
            self.rng.random_range(-180.0..180.0),
            self.rng.random_range(-60.0..70.0),
        )
    }
}

/// Geocentric longitude/latitude (degrees), close enough for aiming
fn approx_degrees(p: DVec3) -> (f64, f64) {
    let lon = p.y.atan2(p.x).to_degrees();
    let lat = p.z.atan2(p.x.hypot(p.y)).to_degrees();
    (lon, lat)
}

/// Game instance holding all state
struct Game {
    controller: GameController,
    motion: MotionGenerator,
    noise: NoiseField,
    scene: Recorder,
    picker: EquirectPicker,
    autopilot: Autopilot,
}

impl Game {
    fn new(catalog: Catalog, settings: Settings, seed: u64) -> Self {
        let mut scene = Recorder::new();
        let mut motion = MotionGenerator::new(seed.wrapping_add(1));
        for subject in catalog.subjects() {
            if let Some(home) = catalog.home_of(subject) {
                motion.spawn(home.position, &mut scene);
            }
        }
        log::info!("Spawned {} avatars", motion.len());

        Self {
            controller: GameController::new(catalog, settings, seed),
            motion,
            noise: NoiseField::new(seed.wrapping_add(2)),
            scene,
            picker: EquirectPicker::new(MAP_WIDTH, MAP_HEIGHT),
            autopilot: Autopilot::new(seed.wrapping_add(3)),
        }
    }

    fn run(&mut self) {
        self.controller.start_game(&mut self.scene);

        let mut frames = 0;
        while self.controller.phase() != GamePhase::GameOver && frames < MAX_FRAMES {
            self.motion.advance_all(&self.noise, &mut self.scene);
            self.autopilot
                .update(&mut self.controller, &self.picker, &mut self.scene);
            self.controller.advance_time(FRAME_MS, &mut self.scene);
            self.log_events();
            frames += 1;
        }

        log::info!(
            "Session finished after {} frames ({} avatar moves)",
            frames,
            self.scene.move_count()
        );
    }

    fn log_events(&mut self) {
        for event in self.controller.drain_events() {
            if let GameEvent::GuessPlaced { distance, tier } = event {
                log::info!("Guess: {:.0} km ({})", distance / 1000.0, tier.as_str());
            }
        }
    }
}

fn main() -> ExitCode {
    env_logger::init();

    let args = Cli::parse();

    let settings = Settings::load(&args.data_dir.join("settings.json"));
    let seed = args.seed.unwrap_or_else(|| settings.resolve_seed());
    log::info!("Globe Guess starting (seed {})", seed);

    let catalog = match Catalog::load(&args.data_dir) {
        Ok(catalog) => catalog,
        Err(e) => {
            log::error!("Failed to load catalog: {}", e);
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let mut game = Game::new(catalog, settings, seed);
    game.run();
    println!("Final score: {}", game.controller.score());
    ExitCode::SUCCESS
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;

    #[test]
    fn test_cli_defaults_to_current_dir() {
        let cli = Cli::try_parse_from(["globe-guess"]).unwrap();
        assert_eq!(cli.data_dir, PathBuf::from("."));
        assert_eq!(cli.seed, None);
    }

    #[test]
    fn test_cli_data_dir_and_seed() {
        let cli = Cli::try_parse_from(["globe-guess", "data", "--seed", "7"]).unwrap();
        assert_eq!(cli.data_dir, PathBuf::from("data"));
        assert_eq!(cli.seed, Some(7));
    }

    #[test]
    fn test_cli_help_is_not_a_parse_failure() {
        let err = Cli::try_parse_from(["globe-guess", "--help"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DisplayHelp);
        // clap exits 0 for help output
        assert_eq!(err.exit_code(), 0);
    }

    #[test]
    fn test_cli_rejects_bad_seed() {
        let err = Cli::try_parse_from(["globe-guess", "--seed", "abc"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValueValidation);
    }

    #[test]
    fn test_cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
