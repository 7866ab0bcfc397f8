use cgmath::Point2;
use rand::Rng;
use rayon::prelude::*;

use crate::{
    config::SimulationConfig,
    error::Result,
    particle::Particle,
    plane::CartesianPlane,
    render::FanSink,
};

/// Owns the live particles and drives them one frame at a time.
pub struct Simulation<R> {
    config: SimulationConfig,
    plane: CartesianPlane,
    rng: R,
    particles: Vec<Particle>,
}

impl<R: Rng> Simulation<R> {
    pub fn new(config: SimulationConfig, plane: CartesianPlane, rng: R) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            plane,
            rng,
            particles: Vec::new(),
        })
    }

    /// Replaces the surface used for future spawns. Live particles keep the
    /// plane they were created against.
    pub fn resize(&mut self, width: f64, height: f64) -> Result<()> {
        let plane = CartesianPlane::new(width, height)?;
        if plane != self.plane {
            log::debug!("Render surface resized to {width}x{height}");
            self.plane = plane;
        }
        Ok(())
    }

    /// Spawns a burst of particles at a pixel position.
    pub fn spawn(&mut self, click: Point2<f64>) -> Result<()> {
        let count = self.config.particles_per_spawn;
        let mut burst = Vec::with_capacity(count);
        for _ in 0..count {
            let point_count = self
                .rng
                .gen_range(self.config.min_points..=self.config.max_points);
            burst.push(Particle::new(
                self.plane,
                point_count,
                click,
                self.config.physics,
                &mut self.rng,
            )?);
        }

        log::debug!(
            "Spawned {count} particles at ({}, {}), {} live",
            click.x,
            click.y,
            self.particles.len() + count
        );
        self.particles.append(&mut burst);
        Ok(())
    }

    /// Advances every particle by `dt` seconds and drops the expired ones,
    /// keeping the survivors in insertion order.
    pub fn update(&mut self, dt: f64) {
        self.particles
            .par_iter_mut()
            .for_each(|particle| particle.update(dt));

        let before = self.particles.len();
        self.particles.retain(Particle::is_alive);
        let expired = before - self.particles.len();
        if expired > 0 {
            log::trace!("{expired} particles expired, {} live", self.particles.len());
        }
    }

    pub fn render<S: FanSink + ?Sized>(&self, sink: &mut S) {
        for particle in &self.particles {
            particle.render(sink);
        }
    }

    /// One frame: handle spawn events, update, render.
    pub fn step<S, I>(&mut self, dt: f64, spawns: I, sink: &mut S) -> Result<()>
    where
        S: FanSink + ?Sized,
        I: IntoIterator<Item = Point2<f64>>,
    {
        for click in spawns {
            self.spawn(click)?;
        }
        self.update(dt);
        self.render(sink);
        Ok(())
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }
}
