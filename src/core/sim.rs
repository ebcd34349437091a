use std::fmt;

use ndarray::{Array2, Zip};
use rand::{rng, rngs::StdRng, Rng, SeedableRng};

use crate::core::boundary;
use crate::core::config::SimConfig;
use crate::core::ensemble::Ensemble;
use crate::core::langevin;
use crate::error::Result;

/// Aggregate state sampled by the driver for reporting.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepSample {
    /// Step index the sample was taken at.
    pub step: usize,
    /// Particles with membrane-normal coordinate below the box mid-plane.
    pub left: usize,
    /// Particles at or beyond the mid-plane.
    pub right: usize,
    /// Mean kinetic energy per particle.
    pub mean_kinetic_energy: f64,
}

impl fmt::Display for StepSample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "step {}: left {} right {} mean KE {:.6e}",
            self.step, self.left, self.right, self.mean_kinetic_energy
        )
    }
}

/// Brownian dynamics driver.
///
/// Owns the parameter set, the evolving ensemble, the noise stream, and a
/// snapshot of the initial state, and advances the ensemble one timestep at
/// a time: free-flight proposal, boundary collision resolution, then the
/// stochastic velocity update.
#[derive(Debug)]
pub struct Simulation {
    config: SimConfig,
    gamma: f64,
    ensemble: Ensemble,
    initial: Ensemble,
    step_now: usize,
    rng: StdRng,
}

impl Simulation {
    /// Create a simulation with a freshly sampled initial condition.
    ///
    /// Positions start uniform with the membrane-normal axis confined to the
    /// left half of the box; velocities are Maxwell-Boltzmann at the bath
    /// temperature. `seed` fixes the whole run; `None` seeds from entropy.
    ///
    /// Errors: `Error::InvalidParam` on an invalid configuration.
    pub fn new(config: SimConfig, seed: Option<u64>) -> Result<Self> {
        config.validate()?;
        let mut rng = seeded_rng(seed);
        let ensemble = Ensemble::sample(&config, &mut rng);
        Ok(Self::assemble(config, ensemble, rng))
    }

    /// Create a simulation from a caller-supplied ensemble.
    ///
    /// The ensemble is re-validated against the configuration (shape,
    /// finiteness, positions inside the box).
    pub fn with_ensemble(config: SimConfig, ensemble: Ensemble, seed: Option<u64>) -> Result<Self> {
        config.validate()?;
        let ensemble = Ensemble::from_arrays(&config, ensemble.positions, ensemble.velocities)?;
        Ok(Self::assemble(config, ensemble, seeded_rng(seed)))
    }

    /// Parameter set for this run.
    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Drag coefficient in effect, derived once at construction.
    pub fn gamma(&self) -> f64 {
        self.gamma
    }

    /// Steps taken so far.
    pub fn step_now(&self) -> usize {
        self.step_now
    }

    /// Number of particles.
    pub fn num_particles(&self) -> usize {
        self.ensemble.num_particles()
    }

    /// Current ensemble state.
    pub fn ensemble(&self) -> &Ensemble {
        &self.ensemble
    }

    /// Snapshot of the ensemble the run started from.
    pub fn initial(&self) -> &Ensemble {
        &self.initial
    }

    /// Current (left, right) particle counts about the box mid-plane.
    pub fn occupancy(&self) -> (usize, usize) {
        self.ensemble.occupancy(self.config.box_size)
    }

    /// Mean kinetic energy per particle of the current ensemble.
    pub fn mean_kinetic_energy(&self) -> f64 {
        self.ensemble.mean_kinetic_energy(self.config.particle_mass)
    }

    /// Replace all particle positions (validated as in `Ensemble::from_arrays`).
    pub fn set_positions(&mut self, positions: Array2<f64>) -> Result<()> {
        let velocities = self.ensemble.velocities.clone();
        self.ensemble = Ensemble::from_arrays(&self.config, positions, velocities)?;
        Ok(())
    }

    /// Replace all particle velocities (validated as in `Ensemble::from_arrays`).
    pub fn set_velocities(&mut self, velocities: Array2<f64>) -> Result<()> {
        let positions = self.ensemble.positions.clone();
        self.ensemble = Ensemble::from_arrays(&self.config, positions, velocities)?;
        Ok(())
    }

    /// Advance the ensemble by one timestep.
    ///
    /// Per step: propose `x += v dt`, resolve boundary collisions on the
    /// proposal, then apply the Langevin kick to the post-collision
    /// velocities (including any reflection sign flips).
    pub fn step(&mut self) {
        let c = &self.config;
        debug_assert!(
            self.ensemble
                .velocities
                .iter()
                .all(|v| (v * c.time_step).abs() < c.box_size - 2.0 * c.particle_radius),
            "time_step too large for single-bounce collision resolution"
        );

        Zip::from(&mut self.ensemble.positions)
            .and(&self.ensemble.velocities)
            .for_each(|x, &v| *x += v * c.time_step);

        boundary::resolve_collisions(
            &mut self.ensemble.positions,
            &mut self.ensemble.velocities,
            c.box_size,
            c.particle_radius,
        );

        langevin::update_velocities(
            &mut self.ensemble.velocities,
            self.gamma,
            c.kb,
            c.particle_mass,
            c.temperature,
            c.time_step,
            &mut self.rng,
        );

        self.step_now += 1;
    }

    /// Advance by `n` steps without sampling diagnostics.
    pub fn advance(&mut self, n: usize) {
        for _ in 0..n {
            self.step();
        }
    }

    /// Run the remaining steps of the configured schedule.
    ///
    /// Occupancy is sampled at the start of every step and collected into
    /// the returned trace, one (left, right) pair per executed step. The
    /// observer receives a [`StepSample`] whenever the step index is a
    /// multiple of `report_interval`. Runs that already reached
    /// `total_steps` return an empty trace.
    pub fn run<F>(&mut self, mut observer: F) -> Vec<(usize, usize)>
    where
        F: FnMut(&StepSample),
    {
        let total = self.config.total_steps;
        let mut trace = Vec::with_capacity(total.saturating_sub(self.step_now));
        while self.step_now < total {
            let (left, right) = self.ensemble.occupancy(self.config.box_size);
            trace.push((left, right));
            if self.step_now % self.config.report_interval == 0 {
                observer(&StepSample {
                    step: self.step_now,
                    left,
                    right,
                    mean_kinetic_energy: self.mean_kinetic_energy(),
                });
            }
            self.step();
        }
        trace
    }

    // ============ Internal helpers ============

    fn assemble(config: SimConfig, ensemble: Ensemble, rng: StdRng) -> Self {
        let gamma = config.gamma();
        let initial = ensemble.clone();
        Self {
            config,
            gamma,
            ensemble,
            initial,
            step_now: 0,
            rng,
        }
    }
}

fn seeded_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(s) => SeedableRng::seed_from_u64(s),
        None => SeedableRng::seed_from_u64(rng().random()),
    }
}
