//! Globe Guess - find the person on the globe before the clock runs out
//!
//! Core modules:
//! - `sim`: Deterministic game core (round state machine, clocks, scoring, motion)
//! - `catalog`: Locations and subjects the game is played with
//! - `geo`: World-position arithmetic on the WGS84 ellipsoid
//! - `scene`: Collaborator traits for markers, HUD and globe picking
//! - `settings`: Data-driven game configuration

pub mod catalog;
pub mod geo;
pub mod scene;
pub mod settings;
pub mod sim;

pub use catalog::{Catalog, CatalogError, Location, Subject};
pub use settings::Settings;

use glam::DVec2;

/// Game configuration constants
pub mod consts {
    /// Whole-session countdown (seconds)
    pub const GAME_SECONDS: u32 = 60;
    /// Per-round guess window (seconds)
    pub const ROUND_SECONDS: u32 = 10;
    /// Clock tick period (ms)
    pub const CLOCK_TICK_MS: u64 = 1000;
    /// How long the answer stays on screen before the next round (ms)
    pub const REVEAL_DELAY_MS: u64 = 1000;

    /// Guesses closer than this (metres) end the round immediately
    pub const EARLY_FINISH_DISTANCE: f64 = 200_000.0;
    /// Guess flags float this far (metres) above the picked point
    pub const FLAG_LIFT: f64 = 100_000.0;

    /// Noise phase advance per motion step
    pub const NOISE_STEP: f64 = 0.01;
    /// Vertical bob amplitude (metres)
    pub const HEIGHT_AMPLITUDE: f64 = 50_000.0;
    /// Angular speed range (radians per step)
    pub const MIN_ANGULAR_SPEED: f64 = 0.01;
    pub const MAX_ANGULAR_SPEED: f64 = 0.03;
    /// Spiral radius range (metres)
    pub const MIN_SPIRAL_RADIUS: f64 = 100_000.0;
    pub const MAX_SPIRAL_RADIUS: f64 = 300_000.0;
    /// Upper bound of the initial noise phase
    pub const MAX_NOISE_PHASE: f64 = 1000.0;
}

/// Wrap an angle to [0, 2π)
#[inline]
pub fn wrap_angle(angle: f64) -> f64 {
    angle.rem_euclid(std::f64::consts::TAU)
}

/// Convert polar (r, theta) to a planar offset (x, y)
#[inline]
pub fn polar_offset(r: f64, theta: f64) -> DVec2 {
    DVec2::new(r * theta.cos(), r * theta.sin())
}
