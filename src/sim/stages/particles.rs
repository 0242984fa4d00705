//! Particle stage: drift, life countdown and pulse growth

use super::Frame;
use crate::sim::batch::{BatchKind, BatchScheduler};
use crate::sim::state::{GameState, ParticleKind};

pub fn update_particles(state: &mut GameState, batch: &mut BatchScheduler, frame: &Frame) {
    let dt = frame.dt;
    let dt_ms = frame.dt_ms();

    batch.process(BatchKind::Particles, &mut state.particles, |particle| {
        if let Some(vel) = particle.vel {
            particle.pos += vel * dt;
        }
        particle.life_ms -= dt_ms;

        if particle.kind == ParticleKind::Pulse
            && particle.target_radius > 0.0
            && particle.initial_life_ms > 0.0
        {
            let progress = 1.0 - particle.life_ms / particle.initial_life_ms;
            particle.radius = progress * particle.target_radius;
        }
    });
}
