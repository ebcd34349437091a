use ndarray::Array2;
use rand::Rng;
use rand_distr::StandardNormal;

use crate::core::config::SimConfig;
use crate::error::{Error, Result};

/// Fixed spatial dimension (3D).
pub const DIM: usize = 3;

/// Particle ensemble state: one row per particle.
///
/// Axis roles are fixed: axis 0 is normal to the membrane plane, axis 1 has
/// reflecting walls on both faces, axis 2 is periodic. Positions and
/// velocities always share the shape `(N, 3)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Ensemble {
    /// Positions, shape (N, 3).
    pub positions: Array2<f64>,
    /// Velocities, shape (N, 3).
    pub velocities: Array2<f64>,
}

impl Ensemble {
    /// Draw an initial condition from the configured distributions.
    ///
    /// Positions are uniform over the box with the membrane-normal axis
    /// confined to the left half; velocities are Maxwell-Boltzmann at the
    /// bath temperature, `sqrt(kB T / m)` per component.
    pub fn sample<R: Rng>(config: &SimConfig, rng: &mut R) -> Self {
        let n = config.num_particles;

        let mut positions = Array2::<f64>::zeros((n, DIM));
        for x in positions.iter_mut() {
            *x = rng.random_range(0.0..config.box_size);
        }
        // Start the whole ensemble left of the mid-plane.
        positions.column_mut(0).mapv_inplace(|x| 0.5 * x);

        let sigma = config.thermal_sigma();
        let mut velocities = Array2::<f64>::zeros((n, DIM));
        for v in velocities.iter_mut() {
            let g: f64 = rng.sample(StandardNormal);
            *v = sigma * g;
        }

        Self {
            positions,
            velocities,
        }
    }

    /// Build an ensemble from caller-supplied arrays.
    ///
    /// Errors:
    /// - `Error::InvalidParam` on a shape other than `(num_particles, 3)` or
    ///   any non-finite component.
    /// - `Error::OutOfBounds` when a position lies outside `[0, box_size]`.
    pub fn from_arrays(
        config: &SimConfig,
        positions: Array2<f64>,
        velocities: Array2<f64>,
    ) -> Result<Self> {
        let expected = (config.num_particles, DIM);
        for (name, arr) in [("positions", &positions), ("velocities", &velocities)] {
            if arr.dim() != expected {
                return Err(Error::InvalidParam(format!(
                    "{name} must have shape {expected:?}, got {:?}",
                    arr.dim()
                )));
            }
            if !arr.iter().all(|x| x.is_finite()) {
                return Err(Error::InvalidParam(format!("{name} values must be finite")));
            }
        }
        if positions.iter().any(|&x| x < 0.0 || x > config.box_size) {
            return Err(Error::OutOfBounds(format!(
                "positions must lie within [0, {}]",
                config.box_size
            )));
        }
        Ok(Self {
            positions,
            velocities,
        })
    }

    /// Number of particles.
    pub fn num_particles(&self) -> usize {
        self.positions.nrows()
    }

    /// Particle counts (left, right) of the box mid-plane along axis 0.
    pub fn occupancy(&self, box_size: f64) -> (usize, usize) {
        let half = 0.5 * box_size;
        let left = self
            .positions
            .column(0)
            .iter()
            .filter(|&&x| x < half)
            .count();
        (left, self.num_particles() - left)
    }

    /// Mean kinetic energy per particle, `0.5 m <|v|^2>`.
    pub fn mean_kinetic_energy(&self, mass: f64) -> f64 {
        let n = self.num_particles();
        if n == 0 {
            return 0.0;
        }
        let sum_sq: f64 = self.velocities.iter().map(|v| v * v).sum();
        0.5 * mass * sum_sq / n as f64
    }
}
