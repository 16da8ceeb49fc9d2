//! Deterministic game core
//!
//! All gameplay logic lives here. This module must stay deterministic:
//! - Virtual time only (no wall clock)
//! - Seeded RNG only
//! - Stable iteration order
//! - No rendering; the globe is reached through `scene` traits

pub mod clock;
pub mod controller;
pub mod motion;
pub mod noise;
pub mod scoring;
pub mod shuffle;
pub mod state;

pub use clock::{ClockKind, ClockStep, Countdown, Timeline, Timer};
pub use controller::GameController;
pub use motion::{Agent, AgentId, MotionGenerator};
pub use noise::NoiseField;
pub use scoring::{FeedbackTier, classify, round_points, score};
pub use shuffle::shuffle;
pub use state::{GameEvent, GamePhase, GameState, RoundState};
