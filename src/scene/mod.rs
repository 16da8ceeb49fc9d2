//! Presentation collaborators
//!
//! The game core never draws anything itself. It talks to the globe through
//! three narrow seams:
//! - [`MarkerSink`]: place, move and remove markers at world positions
//! - [`Hud`]: text and score overlays
//! - [`GlobePicker`]: turn a screen click into a world position (or a miss)

pub mod picker;
pub mod recorder;

pub use picker::EquirectPicker;
pub use recorder::{Recorder, SceneCommand};

use glam::{DVec3, Vec2};
use serde::{Deserialize, Serialize};

use crate::catalog::Subject;

/// Opaque handle to a marker owned by the scene
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct MarkerHandle(pub u64);

/// What a marker depicts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarkerKind {
    /// A subject's animated portrait
    Avatar,
    /// The player's current guess
    GuessFlag,
    /// The true home location, shown after a round ends
    AnswerPin,
}

/// Marker colors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Color {
    White,
    Red,
    Orange,
    Yellow,
    Cyan,
    Blue,
}

impl Color {
    pub fn as_str(&self) -> &'static str {
        match self {
            Color::White => "WHITE",
            Color::Red => "RED",
            Color::Orange => "ORANGE",
            Color::Yellow => "YELLOW",
            Color::Cyan => "CYAN",
            Color::Blue => "BLUE",
        }
    }

    /// Parse a catalog color tag (case-insensitive)
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.to_uppercase().as_str() {
            "WHITE" => Some(Color::White),
            "RED" => Some(Color::Red),
            "ORANGE" => Some(Color::Orange),
            "YELLOW" => Some(Color::Yellow),
            "CYAN" | "LIGHTBLUE" => Some(Color::Cyan),
            "BLUE" => Some(Color::Blue),
            _ => None,
        }
    }
}

/// Places, moves and removes markers on the globe
pub trait MarkerSink {
    fn place_marker(&mut self, kind: MarkerKind, position: DVec3, color: Color) -> MarkerHandle;
    fn move_marker(&mut self, handle: MarkerHandle, position: DVec3);
    fn remove_marker(&mut self, handle: MarkerHandle);
}

/// Text and score overlays
pub trait Hud {
    /// A new round started for `subject`
    fn show_subject(&mut self, subject: &Subject, round_seconds: u32);
    fn update_round_timer(&mut self, seconds_left: u32);
    fn update_scoreboard(&mut self, score: u64, game_seconds_left: u32);
    /// Points earned by the round that just ended
    fn show_points(&mut self, points: u32);
    fn show_game_over(&mut self, score: u64);
}

/// Converts a screen position into a point on the globe
pub trait GlobePicker {
    /// `None` when the click missed the globe
    fn pick(&self, screen: Vec2) -> Option<DVec3>;
}

/// Everything the game controller draws to
pub trait Scene: MarkerSink + Hud {}

impl<T: MarkerSink + Hud> Scene for T {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_tags_round_trip() {
        for color in [
            Color::White,
            Color::Red,
            Color::Orange,
            Color::Yellow,
            Color::Cyan,
            Color::Blue,
        ] {
            assert_eq!(Color::from_tag(color.as_str()), Some(color));
        }
        assert_eq!(Color::from_tag("lightblue"), Some(Color::Cyan));
        assert_eq!(Color::from_tag("MAGENTA"), None);
    }
}
