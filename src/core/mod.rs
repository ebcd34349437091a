//! Core simulation types for Brownian dynamics.
//!
//! Leaves first: the parameter set, the particle ensemble, boundary
//! collision resolution, and the Langevin velocity update, tied together by
//! the stepping driver in `sim`.

pub mod boundary;
pub mod config;
pub mod ensemble;
pub mod langevin;
pub mod sim;

pub use config::{MembraneSpec, SimConfig};
pub use ensemble::Ensemble;
pub use sim::{Simulation, StepSample};
