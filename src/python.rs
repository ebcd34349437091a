use numpy::ndarray::Array2;
use numpy::{IntoPyArray, PyArray1, PyArray2, PyReadonlyArray2};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use crate::core::boundary;
use crate::core::{MembraneSpec, SimConfig, Simulation};

fn py_err<E: ToString>(e: E) -> PyErr {
    PyValueError::new_err(e.to_string())
}

/// BrownianSim Python-facing wrapper around the Rust Simulation core.
///
/// Workflow:
/// - __new__(num_particles=400, ..., seed=None); defaults are the
///   nicotine-in-water reference case
/// - run(verbose=True) -> np.ndarray of per-step [left, right] counts
/// - advance(n) for manual stepping
/// - get_positions() / get_velocities() -> np.ndarray, shape (N, 3)
/// - get_initial_positions() / get_initial_velocities() for before/after plots
#[pyclass]
pub struct BrownianSim {
    sim: Simulation,
}

#[pymethods]
impl BrownianSim {
    /// Initialize a Brownian dynamics simulation in a cubic box.
    ///
    /// Parameters
    /// - num_particles: number of particles (int, > 0)
    /// - box_size: box edge length (float, > 0)
    /// - temperature: bath temperature (float, > 0)
    /// - particle_mass, particle_radius, viscosity: particle and solvent
    ///   properties (floats, > 0); the drag coefficient is derived as
    ///   Stokes drag 6*pi*viscosity*particle_radius
    /// - time_step, total_steps, report_interval: integration schedule
    /// - kb: Boltzmann constant; override for reduced-unit setups
    /// - hole_size, wall_to_hole_ratio: membrane geometry (experimental)
    /// - seed: RNG seed (int) for reproducibility; None for nondeterministic
    ///
    /// Errors: raises ValueError on invalid parameters.
    #[new]
    #[pyo3(signature = (
        num_particles = 400,
        box_size = 2e-6,
        temperature = 310.0,
        particle_mass = 2.7e-25,
        particle_radius = 3e-10,
        viscosity = 1e-6,
        time_step = 1e-11,
        total_steps = 100_000,
        report_interval = 10_000,
        kb = 1.4e-23,
        hole_size = 1.0,
        wall_to_hole_ratio = 1.0,
        seed = None
    ))]
    #[allow(clippy::too_many_arguments)]
    fn new(
        num_particles: usize,
        box_size: f64,
        temperature: f64,
        particle_mass: f64,
        particle_radius: f64,
        viscosity: f64,
        time_step: f64,
        total_steps: usize,
        report_interval: usize,
        kb: f64,
        hole_size: f64,
        wall_to_hole_ratio: f64,
        seed: Option<u64>,
    ) -> PyResult<Self> {
        let config = SimConfig {
            kb,
            box_size,
            num_particles,
            temperature,
            particle_mass,
            particle_radius,
            viscosity,
            time_step,
            total_steps,
            report_interval,
            membrane: MembraneSpec {
                hole_size,
                wall_to_hole_ratio,
            },
        };
        let sim = Simulation::new(config, seed).map_err(py_err)?;
        Ok(Self { sim })
    }

    /// Run the remaining configured steps (releases the GIL during computation).
    ///
    /// Returns a (steps, 2) NumPy array of per-step [left, right] occupancy
    /// counts about the box mid-plane. With `verbose`, prints a diagnostic
    /// sample at the configured report interval and the final mean kinetic
    /// energy against the equipartition prediction.
    #[pyo3(signature = (verbose = true))]
    fn run<'py>(&mut self, py: Python<'py>, verbose: bool) -> PyResult<Py<PyArray2<f64>>> {
        let trace = py.detach(|| {
            self.sim.run(|sample| {
                if verbose {
                    println!("{sample}");
                }
            })
        });
        if verbose {
            let observed = self.sim.mean_kinetic_energy();
            let predicted = self.sim.config().equipartition_energy();
            println!(
                "mean kinetic energy per particle: {observed:.6e} (equipartition predicts {predicted:.6e})"
            );
        }

        let mut arr = Array2::<f64>::zeros((trace.len(), 2));
        for (i, (left, right)) in trace.into_iter().enumerate() {
            arr[[i, 0]] = left as f64;
            arr[[i, 1]] = right as f64;
        }
        Ok(arr.into_pyarray(py).to_owned().into())
    }

    /// Advance `n` steps without diagnostics (releases the GIL).
    fn advance(&mut self, py: Python<'_>, n: usize) -> PyResult<()> {
        py.detach(|| self.sim.advance(n));
        Ok(())
    }

    /// Return positions as a NumPy array of shape (N, 3), dtype=float64.
    fn get_positions<'py>(&self, py: Python<'py>) -> PyResult<Py<PyArray2<f64>>> {
        let arr = self.sim.ensemble().positions.clone();
        Ok(arr.into_pyarray(py).to_owned().into())
    }

    /// Return velocities as a NumPy array of shape (N, 3), dtype=float64.
    fn get_velocities<'py>(&self, py: Python<'py>) -> PyResult<Py<PyArray2<f64>>> {
        let arr = self.sim.ensemble().velocities.clone();
        Ok(arr.into_pyarray(py).to_owned().into())
    }

    /// Return the positions the run started from, shape (N, 3).
    fn get_initial_positions<'py>(&self, py: Python<'py>) -> PyResult<Py<PyArray2<f64>>> {
        let arr = self.sim.initial().positions.clone();
        Ok(arr.into_pyarray(py).to_owned().into())
    }

    /// Return the velocities the run started from, shape (N, 3).
    fn get_initial_velocities<'py>(&self, py: Python<'py>) -> PyResult<Py<PyArray2<f64>>> {
        let arr = self.sim.initial().velocities.clone();
        Ok(arr.into_pyarray(py).to_owned().into())
    }

    /// Set all particle positions from a NumPy array of shape (N, 3), dtype=float64.
    /// Values must be finite and lie inside the box.
    fn set_positions<'py>(&mut self, positions: PyReadonlyArray2<'py, f64>) -> PyResult<()> {
        let arr = positions.as_array().to_owned();
        self.sim.set_positions(arr).map_err(py_err)
    }

    /// Set all particle velocities from a NumPy array of shape (N, 3), dtype=float64.
    /// Values must be finite.
    fn set_velocities<'py>(&mut self, velocities: PyReadonlyArray2<'py, f64>) -> PyResult<()> {
        let arr = velocities.as_array().to_owned();
        self.sim.set_velocities(arr).map_err(py_err)
    }

    /// Current (left, right) particle counts about the box mid-plane.
    fn get_occupancy(&self) -> PyResult<(usize, usize)> {
        Ok(self.sim.occupancy())
    }

    /// Observed mean kinetic energy per particle and the equipartition
    /// prediction 1.5 * kB * T, as a (observed, predicted) pair.
    fn get_energy(&self) -> PyResult<(f64, f64)> {
        Ok((
            self.sim.mean_kinetic_energy(),
            self.sim.config().equipartition_energy(),
        ))
    }

    /// Boolean mask of particles currently overlapping the membrane's wall
    /// material (experimental diagnostic; the membrane does not deflect
    /// particles).
    fn get_membrane_overlap<'py>(&self, py: Python<'py>) -> PyResult<Py<PyArray1<bool>>> {
        let config = self.sim.config();
        let mask = boundary::membrane_overlap_mask(
            &self.sim.ensemble().positions,
            &config.membrane,
            config.box_size,
            config.particle_radius,
        );
        Ok(mask.into_pyarray(py).to_owned().into())
    }

    /// Derived Stokes drag coefficient in effect.
    fn get_gamma(&self) -> PyResult<f64> {
        Ok(self.sim.gamma())
    }

    /// Steps taken so far.
    fn get_step(&self) -> PyResult<usize> {
        Ok(self.sim.step_now())
    }
}

/// The brownsim Python module entry point.
#[pymodule]
fn brownsim(_py: Python<'_>, m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<BrownianSim>()?;
    Ok(())
}
