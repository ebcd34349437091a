//! Brownian dynamics of a dilute suspension in a cubic box.
//!
//! An ensemble of non-interacting particles evolves under the discretized
//! Langevin equation: viscous drag plus a thermal noise term tied to it by
//! the fluctuation-dissipation relation. Five faces of the box reflect
//! particles; the remaining axis is periodic. The driver reports occupancy
//! counts about the box mid-plane and kinetic-energy diagnostics against the
//! equipartition prediction.
//!
//! ```
//! use brownsim::core::{SimConfig, Simulation};
//!
//! # fn main() -> brownsim::error::Result<()> {
//! let mut sim = Simulation::new(SimConfig::quick_case(64), Some(7))?;
//! sim.advance(100);
//! let (left, right) = sim.occupancy();
//! assert_eq!(left + right, 64);
//! # Ok(())
//! # }
//! ```
//!
//! The `python` feature adds a NumPy-facing module built around the same
//! driver; see `src/python.rs`.

pub mod core;
pub mod error;

#[cfg(feature = "python")]
mod python;

pub use crate::core::{Ensemble, MembraneSpec, SimConfig, Simulation, StepSample};
pub use crate::error::{Error, Result};
