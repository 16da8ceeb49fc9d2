//! Headless scene that records every command it receives
//!
//! Used by the native driver (which logs instead of drawing) and by tests
//! to assert what the game asked the globe to show.

use std::collections::BTreeMap;

use glam::DVec3;

use super::{Color, Hud, MarkerHandle, MarkerKind, MarkerSink};
use crate::catalog::Subject;

/// A single request made to the scene
#[derive(Debug, Clone, PartialEq)]
pub enum SceneCommand {
    Place {
        handle: MarkerHandle,
        kind: MarkerKind,
        position: DVec3,
        color: Color,
    },
    Remove(MarkerHandle),
    ShowSubject {
        name: String,
        round_seconds: u32,
    },
    RoundTimer(u32),
    Scoreboard {
        score: u64,
        game_seconds_left: u32,
    },
    Points(u32),
    GameOver(u64),
}

/// A live marker
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Marker {
    pub kind: MarkerKind,
    pub position: DVec3,
    pub color: Color,
}

#[derive(Debug, Default)]
pub struct Recorder {
    /// Command history (marker moves are not recorded, they happen every frame)
    pub commands: Vec<SceneCommand>,
    markers: BTreeMap<MarkerHandle, Marker>,
    next_handle: u64,
    moves: u64,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn marker(&self, handle: MarkerHandle) -> Option<&Marker> {
        self.markers.get(&handle)
    }

    /// Live markers of one kind
    pub fn markers_of(&self, kind: MarkerKind) -> Vec<Marker> {
        self.markers
            .values()
            .filter(|m| m.kind == kind)
            .copied()
            .collect()
    }

    pub fn live_markers(&self) -> usize {
        self.markers.len()
    }

    /// Number of marker moves seen so far
    pub fn move_count(&self) -> u64 {
        self.moves
    }

    /// Points shown so far, in order
    pub fn points_shown(&self) -> Vec<u32> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                SceneCommand::Points(p) => Some(*p),
                _ => None,
            })
            .collect()
    }

    /// Drop the command history, keeping live markers
    pub fn clear_history(&mut self) {
        self.commands.clear();
    }
}

impl MarkerSink for Recorder {
    fn place_marker(&mut self, kind: MarkerKind, position: DVec3, color: Color) -> MarkerHandle {
        self.next_handle += 1;
        let handle = MarkerHandle(self.next_handle);
        self.markers.insert(
            handle,
            Marker {
                kind,
                position,
                color,
            },
        );
        if kind != MarkerKind::Avatar {
            log::debug!("Marker {:?} placed: {:?} {}", handle, kind, color.as_str());
        }
        self.commands.push(SceneCommand::Place {
            handle,
            kind,
            position,
            color,
        });
        handle
    }

    fn move_marker(&mut self, handle: MarkerHandle, position: DVec3) {
        if let Some(marker) = self.markers.get_mut(&handle) {
            marker.position = position;
            self.moves += 1;
        }
    }

    fn remove_marker(&mut self, handle: MarkerHandle) {
        if self.markers.remove(&handle).is_some() {
            self.commands.push(SceneCommand::Remove(handle));
        }
    }
}

impl Hud for Recorder {
    fn show_subject(&mut self, subject: &Subject, round_seconds: u32) {
        log::info!("Where's {}? ({}s)", subject.name, round_seconds);
        self.commands.push(SceneCommand::ShowSubject {
            name: subject.name.clone(),
            round_seconds,
        });
    }

    fn update_round_timer(&mut self, seconds_left: u32) {
        self.commands.push(SceneCommand::RoundTimer(seconds_left));
    }

    fn update_scoreboard(&mut self, score: u64, game_seconds_left: u32) {
        self.commands.push(SceneCommand::Scoreboard {
            score,
            game_seconds_left,
        });
    }

    fn show_points(&mut self, points: u32) {
        log::info!("+{} points!", points);
        self.commands.push(SceneCommand::Points(points));
    }

    fn show_game_over(&mut self, score: u64) {
        log::info!("Game Over! Your score: {}", score);
        self.commands.push(SceneCommand::GameOver(score));
    }
}
