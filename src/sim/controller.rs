//! Game controller: the round/session state machine
//!
//! ```text
//! Idle -> AwaitingGuess -> Concluding -> AwaitingGuess -> ... -> GameOver
//! ```
//!
//! The controller reacts to three stimuli, all delivered synchronously:
//! - clicks (`submit_guess` / `handle_click`)
//! - virtual time (`advance_time`), which fires clock ticks and reveal delays
//! - `start_game`
//!
//! Rounds and clocks are generation-tagged, so a timer armed for an earlier
//! round or session can never touch the current one.

use glam::{DVec3, Vec2};
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::clock::{ClockKind, Countdown, Timeline, Timer};
use super::scoring::{self, FeedbackTier};
use super::shuffle::shuffle;
use super::state::{GameEvent, GamePhase, GameState, RoundState};
use crate::catalog::{Catalog, Location, Subject};
use crate::consts::EARLY_FINISH_DISTANCE;
use crate::geo;
use crate::scene::{Color, GlobePicker, MarkerKind, Scene};
use crate::settings::Settings;

/// Owns all game and round state
#[derive(Debug)]
pub struct GameController {
    catalog: Catalog,
    settings: Settings,
    rng: Pcg32,
    state: GameState,
    round: RoundState,
    game_clock: Countdown,
    round_clock: Countdown,
    timeline: Timeline,
    events: Vec<GameEvent>,
}

impl GameController {
    pub fn new(catalog: Catalog, settings: Settings, seed: u64) -> Self {
        let settings = settings.sanitized();
        Self {
            state: GameState::new(Vec::new(), settings.game_seconds),
            catalog,
            settings,
            rng: Pcg32::seed_from_u64(seed),
            round: RoundState::idle(),
            game_clock: Countdown::new(ClockKind::Game),
            round_clock: Countdown::new(ClockKind::Round),
            timeline: Timeline::new(),
            events: Vec::new(),
        }
    }

    // ---- session ----

    /// Start (or restart) a session: reset score and clocks, shuffle, begin round 0
    pub fn start_game(&mut self, scene: &mut impl Scene) {
        if self.state.phase.is_running() {
            log::info!("Restarting game in progress");
        }
        self.game_clock.cancel();
        self.round_clock.cancel();
        self.clear_round_markers(scene);
        self.timeline.clear();

        let mut queue: Vec<usize> = (0..self.catalog.subjects().len()).collect();
        shuffle(&mut queue, &mut self.rng);

        self.state = GameState::new(queue, self.settings.game_seconds);
        self.round = RoundState::new(self.round.generation, 0, 0);
        self.round.close();

        self.game_clock
            .start(self.settings.game_seconds, &mut self.timeline);
        self.state.phase = GamePhase::AwaitingGuess;
        scene.update_scoreboard(self.state.score, self.state.seconds_left);

        log::info!("Game started with {} subjects", self.state.queue.len());
        self.events.push(GameEvent::GameStarted {
            subjects: self.state.queue.len(),
        });

        self.begin_round(0, scene);
    }

    /// Stop the session and show the final score. Later calls do nothing.
    pub fn end_game(&mut self, scene: &mut impl Scene) {
        if self.state.phase == GamePhase::GameOver {
            return;
        }
        self.round_clock.cancel();
        self.game_clock.cancel();
        self.round.accepting_guesses = false;
        self.clear_round_markers(scene);
        self.state.phase = GamePhase::GameOver;

        scene.show_game_over(self.state.score);
        log::info!("Game over, final score {}", self.state.score);
        self.events.push(GameEvent::GameOver {
            score: self.state.score,
        });
    }

    // ---- rounds ----

    /// Start round `index`, or end the game if the queue or the clock ran out
    ///
    /// Only reached from `start_game` and the reveal timer. The previous
    /// round must be concluded and the index never moves backward.
    fn begin_round(&mut self, index: usize, scene: &mut impl Scene) {
        if !self.state.phase.is_running() {
            return;
        }
        if !self.round.concluded || index < self.state.current_index {
            log::warn!(
                "Round {} not started, round {} still owns the board",
                index + 1,
                self.state.current_index + 1
            );
            return;
        }
        self.clear_round_markers(scene);

        if self.state.queue_exhausted(index) || self.state.seconds_left == 0 {
            self.end_game(scene);
            return;
        }

        self.state.current_index = index;
        let subject_index = self.state.queue[index];
        let round_seconds = self.settings.round_seconds;
        self.round = RoundState::new(self.round.generation + 1, subject_index, round_seconds);
        self.round_clock.start(round_seconds, &mut self.timeline);
        self.state.phase = GamePhase::AwaitingGuess;

        if let Some(subject) = self.catalog.subject(subject_index) {
            scene.show_subject(subject, round_seconds);
            log::info!("Round {} started: {}", index + 1, subject.name);
            self.events.push(GameEvent::RoundStarted {
                index,
                subject: subject.name.clone(),
            });
        }
    }

    /// Handle a click via the picker. Misses are ignored.
    pub fn handle_click(
        &mut self,
        picker: &impl GlobePicker,
        screen: Vec2,
        scene: &mut impl Scene,
    ) {
        let position = picker.pick(screen);
        self.submit_guess(position, scene);
    }

    /// Record a guess for the active round
    ///
    /// `None` means the click missed the globe. Guesses outside the
    /// acceptance window are ignored. A guess closer than 200 km ends the
    /// round at once; otherwise the player may keep re-guessing and only the
    /// latest guess counts.
    pub fn submit_guess(&mut self, position: Option<DVec3>, scene: &mut impl Scene) {
        let Some(position) = position else {
            log::debug!("Pick missed the globe");
            return;
        };
        if !self.round.can_guess() {
            log::debug!("Guess ignored, round not accepting input");
            return;
        }
        let Some(home) = self.active_home().map(|loc| loc.position) else {
            return;
        };

        if let Some(old) = self.round.guess_marker.take() {
            scene.remove_marker(old);
        }

        let distance = scoring::distance(position, home);
        let tier = scoring::classify(distance);
        self.round.guess = Some(position);
        self.round.feedback = Some(tier);
        self.round.guess_marker = Some(scene.place_marker(
            MarkerKind::GuessFlag,
            geo::lift(position, self.settings.flag_lift_m),
            tier.color(),
        ));

        log::debug!("Guess {:.0} km away ({})", distance / 1000.0, tier.as_str());
        self.events.push(GameEvent::GuessPlaced { distance, tier });

        if distance < EARLY_FINISH_DISTANCE {
            self.round_clock.cancel();
            self.conclude_round(true, scene);
        }
    }

    /// End the active round: score it, reveal the answer, schedule the next
    /// round. Runs at most once per round.
    pub fn conclude_round(&mut self, early: bool, scene: &mut impl Scene) {
        if self.round.concluded || !self.state.phase.is_running() {
            return;
        }
        self.round.close();
        self.round_clock.cancel();

        let answer = self.active_home().map(|loc| {
            let color = Color::from_tag(&loc.color_tag).unwrap_or(Color::Red);
            (loc.position, color)
        });
        let home = answer.map(|(position, _)| position);
        let distance = self
            .round
            .guess
            .zip(home)
            .map(|(guess, home)| scoring::distance(guess, home));
        let points = scoring::round_points(distance);
        self.state.score += u64::from(points);

        if let Some((home, color)) = answer {
            self.round.answer_marker = Some(scene.place_marker(MarkerKind::AnswerPin, home, color));
        }
        scene.show_points(points);
        scene.update_scoreboard(self.state.score, self.state.seconds_left);
        self.state.phase = GamePhase::Concluding;

        log::info!(
            "Round {} concluded{}: +{} (score {})",
            self.state.current_index + 1,
            if early { " early" } else { "" },
            points,
            self.state.score
        );
        self.events.push(GameEvent::RoundConcluded {
            index: self.state.current_index,
            points,
            early,
        });

        self.timeline.schedule(
            self.settings.reveal_delay_ms,
            Timer::RevealDone {
                round_generation: self.round.generation,
            },
        );
    }

    /// Round clock ran out: conclude with whatever guess is on the board
    pub fn on_round_timeout(&mut self, scene: &mut impl Scene) {
        if self.round.concluded {
            return;
        }
        self.round.accepting_guesses = false;
        self.conclude_round(false, scene);
    }

    // ---- time ----

    /// Advance virtual time, firing every timer that falls due
    pub fn advance_time(&mut self, elapsed_ms: u64, scene: &mut impl Scene) {
        let target = self.timeline.now_ms() + elapsed_ms;
        while let Some(timer) = self.timeline.pop_due(target) {
            self.dispatch(timer, scene);
        }
        self.timeline.advance_to(target);
    }

    fn dispatch(&mut self, timer: Timer, scene: &mut impl Scene) {
        match timer {
            Timer::ClockTick {
                clock: ClockKind::Game,
                generation,
            } => {
                let Some(step) = self.game_clock.on_tick(generation, &mut self.timeline) else {
                    log::debug!("Stale game tick ignored");
                    return;
                };
                self.state.seconds_left = step.seconds_left;
                scene.update_scoreboard(self.state.score, self.state.seconds_left);
                if step.expired {
                    self.end_game(scene);
                }
            }
            Timer::ClockTick {
                clock: ClockKind::Round,
                generation,
            } => {
                let Some(step) = self.round_clock.on_tick(generation, &mut self.timeline) else {
                    log::debug!("Stale round tick ignored");
                    return;
                };
                self.round.seconds_left = step.seconds_left;
                scene.update_round_timer(step.seconds_left);
                if step.expired {
                    self.on_round_timeout(scene);
                }
            }
            Timer::RevealDone { round_generation } => {
                if round_generation != self.round.generation
                    || self.state.phase != GamePhase::Concluding
                {
                    log::debug!("Stale reveal timer ignored");
                    return;
                }
                self.begin_round(self.state.current_index + 1, scene);
            }
        }
    }

    fn clear_round_markers(&mut self, scene: &mut impl Scene) {
        if let Some(marker) = self.round.guess_marker.take() {
            scene.remove_marker(marker);
        }
        if let Some(marker) = self.round.answer_marker.take() {
            scene.remove_marker(marker);
        }
    }

    fn active_home(&self) -> Option<&Location> {
        let subject = self.catalog.subject(self.round.subject_index)?;
        self.catalog.home_of(subject)
    }

    // ---- queries ----

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn score(&self) -> u64 {
        self.state.score
    }

    pub fn game_seconds_left(&self) -> u32 {
        self.state.seconds_left
    }

    pub fn round_seconds_left(&self) -> u32 {
        self.round.seconds_left
    }

    /// Subject of the active round (none before the first round or after game over)
    pub fn current_subject(&self) -> Option<&Subject> {
        if !self.state.phase.is_running() {
            return None;
        }
        self.catalog.subject(self.round.subject_index)
    }

    pub fn current_subject_name(&self) -> Option<&str> {
        self.current_subject().map(|s| s.name.as_str())
    }

    /// Home location of the active subject
    pub fn current_answer(&self) -> Option<&Location> {
        self.current_subject()?;
        self.active_home()
    }

    pub fn feedback(&self) -> Option<FeedbackTier> {
        self.round.feedback
    }

    pub fn feedback_color(&self) -> Option<Color> {
        self.round.feedback.map(|tier| tier.color())
    }

    pub fn has_guess(&self) -> bool {
        self.round.guess.is_some()
    }

    pub fn accepting_guesses(&self) -> bool {
        self.round.can_guess()
    }

    pub fn round_index(&self) -> usize {
        self.state.current_index
    }

    pub fn round_generation(&self) -> u64 {
        self.round.generation
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn round(&self) -> &RoundState {
        &self.round
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn now_ms(&self) -> u64 {
        self.timeline.now_ms()
    }

    /// Take the events recorded since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
