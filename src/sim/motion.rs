//! Avatar motion: a noisy spiral around each subject's home location
//!
//! Each agent orbits its home point in the local east-north-up plane. The
//! orbit radius breathes and the avatar bobs vertically, both driven by a
//! shared [`NoiseField`] sampled at the agent's own phase. Agents advance
//! only when told to; the caller owns the frame rate.

use glam::{DMat3, DVec3};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::noise::NoiseField;
use crate::consts::*;
use crate::geo;
use crate::scene::{Color, MarkerHandle, MarkerKind, MarkerSink};
use crate::{polar_offset, wrap_angle};

/// Identifier of a live agent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AgentId(pub u32);

/// Live animation state for one avatar
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Agent {
    pub id: AgentId,
    pub home: DVec3,
    /// Local frame captured at creation
    pub frame: DMat3,
    pub angle: f64,
    pub angular_speed: f64,
    pub spiral_radius: f64,
    pub noise_phase: f64,
    pub height_offset: f64,
    pub position: DVec3,
    pub marker: MarkerHandle,
}

impl Agent {
    /// Advance one step and return the new world position
    pub fn step(&mut self, noise: &NoiseField) -> DVec3 {
        self.angle = wrap_angle(self.angle + self.angular_speed);

        self.noise_phase += NOISE_STEP;
        let n = noise.value(self.noise_phase) * 2.0 - 1.0;

        let radius = self.spiral_radius * (0.9 + 0.1 * n);
        let planar = polar_offset(radius, self.angle);
        self.height_offset = HEIGHT_AMPLITUDE * n;

        let local = planar.extend(self.height_offset);
        self.position = self.home + self.frame * local;
        self.position
    }
}

/// Owns every live agent and advances them on request
#[derive(Debug)]
pub struct MotionGenerator {
    /// Sorted by id for deterministic iteration
    agents: Vec<Agent>,
    next_id: u32,
    rng: Pcg32,
}

impl MotionGenerator {
    pub fn new(seed: u64) -> Self {
        Self {
            agents: Vec::new(),
            next_id: 1,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Create an agent at `home` with randomized motion and place its avatar
    pub fn spawn(&mut self, home: DVec3, sink: &mut impl MarkerSink) -> AgentId {
        let id = AgentId(self.next_id);
        self.next_id += 1;

        let marker = sink.place_marker(MarkerKind::Avatar, home, Color::White);
        self.agents.push(Agent {
            id,
            home,
            frame: geo::east_north_up(home),
            angle: self.rng.random_range(0.0..std::f64::consts::TAU),
            angular_speed: self.rng.random_range(MIN_ANGULAR_SPEED..MAX_ANGULAR_SPEED),
            spiral_radius: self.rng.random_range(MIN_SPIRAL_RADIUS..MAX_SPIRAL_RADIUS),
            noise_phase: self.rng.random_range(0.0..MAX_NOISE_PHASE),
            height_offset: 0.0,
            position: home,
            marker,
        });
        id
    }

    /// Advance one agent and move its marker. `None` if the agent is gone.
    pub fn advance(
        &mut self,
        id: AgentId,
        noise: &NoiseField,
        sink: &mut impl MarkerSink,
    ) -> Option<DVec3> {
        let agent = self.agents.iter_mut().find(|a| a.id == id)?;
        let position = agent.step(noise);
        sink.move_marker(agent.marker, position);
        Some(position)
    }

    /// Advance every agent one step
    pub fn advance_all(&mut self, noise: &NoiseField, sink: &mut impl MarkerSink) {
        for agent in &mut self.agents {
            let position = agent.step(noise);
            sink.move_marker(agent.marker, position);
        }
    }

    /// Remove an agent and its avatar. Returns false if it did not exist.
    pub fn despawn(&mut self, id: AgentId, sink: &mut impl MarkerSink) -> bool {
        match self.agents.iter().position(|a| a.id == id) {
            Some(i) => {
                let agent = self.agents.remove(i);
                sink.remove_marker(agent.marker);
                true
            }
            None => false,
        }
    }

    pub fn agent(&self, id: AgentId) -> Option<&Agent> {
        self.agents.iter().find(|a| a.id == id)
    }

    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }
}
