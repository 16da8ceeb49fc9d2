//! Countdown clocks on a virtual timeline
//!
//! All timing runs on a single logical [`Timeline`] measured in milliseconds.
//! Nothing here reads the wall clock: the caller advances time explicitly,
//! so sessions replay identically and tests never sleep.
//!
//! Every scheduled timer carries the generation of whatever armed it. A
//! countdown bumps its generation each time it is started, so a tick left
//! over from a previous round can never leak into the next one.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use crate::consts::CLOCK_TICK_MS;

/// Which countdown a tick belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ClockKind {
    /// Whole-session clock
    Game,
    /// Per-round guess window
    Round,
}

/// A timer waiting on the timeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Timer {
    ClockTick {
        clock: ClockKind,
        generation: u64,
    },
    /// Answer display finished for the round with this generation
    RevealDone { round_generation: u64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct Scheduled {
    due_ms: u64,
    /// Insertion order breaks ties between timers due at the same instant
    seq: u64,
    timer: Timer,
}

/// Single logical clock and timer queue
#[derive(Debug, Default)]
pub struct Timeline {
    now_ms: u64,
    seq: u64,
    queue: BinaryHeap<Reverse<Scheduled>>,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Schedule `timer` to fire `delay_ms` from now
    pub fn schedule(&mut self, delay_ms: u64, timer: Timer) {
        self.seq += 1;
        self.queue.push(Reverse(Scheduled {
            due_ms: self.now_ms + delay_ms,
            seq: self.seq,
            timer,
        }));
    }

    /// Pop the earliest timer due at or before `until_ms`, moving time to it
    pub fn pop_due(&mut self, until_ms: u64) -> Option<Timer> {
        match self.queue.peek() {
            Some(Reverse(next)) if next.due_ms <= until_ms => {
                let Reverse(next) = self.queue.pop()?;
                self.now_ms = self.now_ms.max(next.due_ms);
                Some(next.timer)
            }
            _ => None,
        }
    }

    /// Move time forward (never backward)
    pub fn advance_to(&mut self, ms: u64) {
        self.now_ms = self.now_ms.max(ms);
    }

    /// Drop every pending timer
    pub fn clear(&mut self) {
        self.queue.clear();
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }
}

/// Outcome of one accepted tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockStep {
    pub seconds_left: u32,
    /// This tick reached zero; the countdown has stopped
    pub expired: bool,
}

/// A once-per-second countdown
#[derive(Debug, Clone)]
pub struct Countdown {
    kind: ClockKind,
    seconds_left: u32,
    generation: u64,
    running: bool,
}

impl Countdown {
    pub fn new(kind: ClockKind) -> Self {
        Self {
            kind,
            seconds_left: 0,
            generation: 0,
            running: false,
        }
    }

    pub fn seconds_left(&self) -> u32 {
        self.seconds_left
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Arm a fresh countdown; any tick from an earlier start becomes stale
    pub fn start(&mut self, seconds: u32, timeline: &mut Timeline) {
        self.generation += 1;
        self.seconds_left = seconds;
        self.running = seconds > 0;
        if self.running {
            self.schedule_tick(timeline);
        }
    }

    /// Stop future ticks. Cancelling a stopped clock does nothing.
    pub fn cancel(&mut self) {
        self.running = false;
    }

    /// Handle a tick fired from the timeline
    ///
    /// Returns `None` for stale or cancelled ticks.
    pub fn on_tick(&mut self, generation: u64, timeline: &mut Timeline) -> Option<ClockStep> {
        if !self.running || generation != self.generation {
            return None;
        }

        self.seconds_left = self.seconds_left.saturating_sub(1);
        let expired = self.seconds_left == 0;
        if expired {
            self.running = false;
        } else {
            self.schedule_tick(timeline);
        }

        Some(ClockStep {
            seconds_left: self.seconds_left,
            expired,
        })
    }

    fn schedule_tick(&self, timeline: &mut Timeline) {
        timeline.schedule(
            CLOCK_TICK_MS,
            Timer::ClockTick {
                clock: self.kind,
                generation: self.generation,
            },
        );
    }
}
