//! Proximity scoring and hot/cold feedback
//!
//! Both policies use half-open bands: a distance exactly on a breakpoint
//! belongs to the farther band. The color bands are finer than the point
//! bands on purpose.

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::geo;
use crate::scene::Color;

/// Points for a guess within 200 km
pub const POINTS_BULLSEYE: u32 = 500;
/// Points for a guess within 1000 km
pub const POINTS_NEAR: u32 = 100;
/// Points for any other guess
pub const POINTS_FAR: u32 = 10;

/// Hot/cold feedback bands, closest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum FeedbackTier {
    Hot,
    Warm,
    Mild,
    Cool,
    Cold,
}

impl FeedbackTier {
    /// Upper (exclusive) distance bound of each tier, in tier order
    const BANDS: [(f64, FeedbackTier); 4] = [
        (50_000.0, FeedbackTier::Hot),
        (200_000.0, FeedbackTier::Warm),
        (1_000_000.0, FeedbackTier::Mild),
        (3_000_000.0, FeedbackTier::Cool),
    ];

    pub fn color(&self) -> Color {
        match self {
            FeedbackTier::Hot => Color::Red,
            FeedbackTier::Warm => Color::Orange,
            FeedbackTier::Mild => Color::Yellow,
            FeedbackTier::Cool => Color::Cyan,
            FeedbackTier::Cold => Color::Blue,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FeedbackTier::Hot => "hot",
            FeedbackTier::Warm => "warm",
            FeedbackTier::Mild => "mild",
            FeedbackTier::Cool => "cool",
            FeedbackTier::Cold => "cold",
        }
    }
}

/// Straight-line distance between guess and answer (metres)
#[inline]
pub fn distance(a: DVec3, b: DVec3) -> f64 {
    geo::chord_distance(a, b)
}

/// Feedback tier for a guess `distance` metres away
pub fn classify(distance: f64) -> FeedbackTier {
    FeedbackTier::BANDS
        .iter()
        .find(|(limit, _)| distance < *limit)
        .map(|(_, tier)| *tier)
        .unwrap_or(FeedbackTier::Cold)
}

/// Points for a guess `distance` metres away
pub fn score(distance: f64) -> u32 {
    if distance < 200_000.0 {
        POINTS_BULLSEYE
    } else if distance < 1_000_000.0 {
        POINTS_NEAR
    } else {
        POINTS_FAR
    }
}

/// Points for a round; no guess scores nothing
pub fn round_points(distance: Option<f64>) -> u32 {
    distance.map(score).unwrap_or(0)
}
