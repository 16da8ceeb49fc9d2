//! Game and round state
//!
//! Plain data owned by the [`GameController`](super::GameController). All
//! mutation goes through the controller.

use glam::DVec3;
use serde::{Deserialize, Serialize};

use super::scoring::FeedbackTier;
use crate::scene::MarkerHandle;

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// No game started yet
    Idle,
    /// Round active, clicks are accepted
    AwaitingGuess,
    /// Round over, answer on screen until the reveal delay ends
    Concluding,
    /// Session ended; only a new `start_game` leaves this phase
    GameOver,
}

impl GamePhase {
    /// A session is in progress
    pub fn is_running(&self) -> bool {
        matches!(self, GamePhase::AwaitingGuess | GamePhase::Concluding)
    }
}

/// Something the presentation layer may want to react to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    GameStarted { subjects: usize },
    RoundStarted {
        index: usize,
        subject: String,
    },
    GuessPlaced {
        distance: f64,
        tier: FeedbackTier,
    },
    RoundConcluded {
        index: usize,
        points: u32,
        early: bool,
    },
    GameOver { score: u64 },
}

/// Per-session state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub score: u64,
    /// Seconds left on the game clock
    pub seconds_left: u32,
    /// Catalog subject indices in play order
    pub queue: Vec<usize>,
    /// Position in `queue` of the active round
    pub current_index: usize,
    pub phase: GamePhase,
}

impl GameState {
    pub fn new(queue: Vec<usize>, seconds: u32) -> Self {
        Self {
            score: 0,
            seconds_left: seconds,
            queue,
            current_index: 0,
            phase: GamePhase::Idle,
        }
    }

    /// Catalog index of the active subject
    pub fn current_subject(&self) -> Option<usize> {
        self.queue.get(self.current_index).copied()
    }

    pub fn queue_exhausted(&self, index: usize) -> bool {
        index >= self.queue.len()
    }
}

/// Per-round state, reset at the start of every round
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoundState {
    /// Increases with every round; timers armed for older rounds are ignored
    pub generation: u64,
    pub subject_index: usize,
    pub guess: Option<DVec3>,
    pub feedback: Option<FeedbackTier>,
    pub guess_marker: Option<MarkerHandle>,
    pub answer_marker: Option<MarkerHandle>,
    pub accepting_guesses: bool,
    /// Set exactly once per round; implies `!accepting_guesses`
    pub concluded: bool,
    pub seconds_left: u32,
}

impl RoundState {
    /// State before any round has started
    pub fn idle() -> Self {
        Self {
            generation: 0,
            subject_index: 0,
            guess: None,
            feedback: None,
            guess_marker: None,
            answer_marker: None,
            accepting_guesses: false,
            concluded: false,
            seconds_left: 0,
        }
    }

    pub fn new(generation: u64, subject_index: usize, seconds: u32) -> Self {
        Self {
            generation,
            subject_index,
            seconds_left: seconds,
            accepting_guesses: true,
            ..Self::idle()
        }
    }

    pub fn can_guess(&self) -> bool {
        self.accepting_guesses && !self.concluded
    }

    /// Close the round to input and mark it concluded
    pub fn close(&mut self) {
        self.accepting_guesses = false;
        self.concluded = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_round_accepts_guesses() {
        let round = RoundState::new(3, 1, 10);
        assert!(round.can_guess());
        assert_eq!(round.generation, 3);
        assert!(round.guess.is_none());
    }

    #[test]
    fn test_close_round() {
        let mut round = RoundState::new(1, 0, 10);
        round.close();
        assert!(round.concluded);
        assert!(!round.accepting_guesses);
        assert!(!round.can_guess());
    }

    #[test]
    fn test_idle_round_rejects_guesses() {
        assert!(!RoundState::idle().can_guess());
    }

    #[test]
    fn test_game_state_queue() {
        let mut state = GameState::new(vec![2, 0, 1], 60);
        assert_eq!(state.current_subject(), Some(2));
        state.current_index = 3;
        assert_eq!(state.current_subject(), None);
        assert!(state.queue_exhausted(3));
        assert!(!state.queue_exhausted(2));
    }

    #[test]
    fn test_phase_running() {
        assert!(!GamePhase::Idle.is_running());
        assert!(GamePhase::AwaitingGuess.is_running());
        assert!(GamePhase::Concluding.is_running());
        assert!(!GamePhase::GameOver.is_running());
    }
}
