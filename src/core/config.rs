use std::f64::consts::PI;

use crate::error::{Error, Result};

/// Geometry of the perforated membrane spanning the box mid-plane.
///
/// The membrane is a square grid: holes of side `hole_size` separated by
/// wall material of width `wall_to_hole_ratio * hole_size`. Experimental;
/// only the overlap predicate in [`crate::core::boundary`] consumes it, and
/// nothing feeds it into the active collision path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MembraneSpec {
    /// Side length of a square hole.
    pub hole_size: f64,
    /// Wall width as a multiple of the hole size.
    pub wall_to_hole_ratio: f64,
}

impl MembraneSpec {
    /// Width of the wall material between two holes.
    pub fn wall_size(&self) -> f64 {
        self.wall_to_hole_ratio * self.hole_size
    }

    /// Period of the hole/wall pattern.
    pub fn pitch(&self) -> f64 {
        self.hole_size + self.wall_size()
    }

    fn validate(&self) -> Result<()> {
        if !self.hole_size.is_finite() || self.hole_size <= 0.0 {
            return Err(Error::InvalidParam(
                "membrane hole_size must be finite and > 0".into(),
            ));
        }
        if !self.wall_to_hole_ratio.is_finite() || self.wall_to_hole_ratio < 0.0 {
            return Err(Error::InvalidParam(
                "membrane wall_to_hole_ratio must be finite and >= 0".into(),
            ));
        }
        Ok(())
    }
}

/// Physical and numerical parameters of a Brownian dynamics run.
///
/// Quantities are in SI units for the physical presets; the Boltzmann
/// constant is a field so reduced-unit setups can put `kb = 1`.
#[derive(Debug, Clone, PartialEq)]
pub struct SimConfig {
    /// Boltzmann constant, energy per kelvin.
    pub kb: f64,
    /// Edge length of the cubic box.
    pub box_size: f64,
    /// Number of particles in the ensemble.
    pub num_particles: usize,
    /// Bath temperature driving the thermal noise.
    pub temperature: f64,
    /// Particle mass.
    pub particle_mass: f64,
    /// Hydrodynamic particle radius; also the wall contact distance.
    pub particle_radius: f64,
    /// Dynamic viscosity of the solvent.
    pub viscosity: f64,
    /// Integration timestep.
    pub time_step: f64,
    /// Number of steps a full run performs.
    pub total_steps: usize,
    /// Steps between diagnostic samples handed to the run observer.
    pub report_interval: usize,
    /// Membrane geometry (experimental, not part of the active dynamics).
    pub membrane: MembraneSpec,
}

impl SimConfig {
    /// Stokes drag coefficient for a sphere, `6 * pi * eta * a`.
    pub fn gamma(&self) -> f64 {
        6.0 * PI * self.viscosity * self.particle_radius
    }

    /// Standard deviation of one thermal velocity component, `sqrt(kB T / m)`.
    pub fn thermal_sigma(&self) -> f64 {
        (self.kb * self.temperature / self.particle_mass).sqrt()
    }

    /// Equipartition prediction for the mean kinetic energy per particle,
    /// `1.5 kB T` for the three translational degrees of freedom.
    pub fn equipartition_energy(&self) -> f64 {
        1.5 * self.kb * self.temperature
    }

    /// Check every parameter before a simulation is built.
    ///
    /// Errors with `Error::InvalidParam` on non-positive or non-finite
    /// physical quantities, an empty ensemble, a zero report interval, or a
    /// particle radius too large for the box.
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("kb", self.kb),
            ("box_size", self.box_size),
            ("temperature", self.temperature),
            ("particle_mass", self.particle_mass),
            ("particle_radius", self.particle_radius),
            ("viscosity", self.viscosity),
            ("time_step", self.time_step),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(Error::InvalidParam(format!(
                    "{name} must be finite and > 0, got {value}"
                )));
            }
        }
        if self.num_particles == 0 {
            return Err(Error::InvalidParam("num_particles must be > 0".into()));
        }
        if self.report_interval == 0 {
            return Err(Error::InvalidParam("report_interval must be > 0".into()));
        }
        if self.box_size <= 2.0 * self.particle_radius {
            return Err(Error::InvalidParam(
                "box_size must exceed 2 * particle_radius".into(),
            ));
        }
        self.membrane.validate()
    }

    /// Reference case: nicotine molecules diffusing in water at body
    /// temperature inside a 2 micrometre box.
    pub fn nicotine_in_water() -> Self {
        Self {
            kb: 1.4e-23,
            box_size: 2e-6,
            num_particles: 400,
            temperature: 310.0,
            // molecular mass of nicotine in kg
            particle_mass: 2.7e-25,
            // a three angstrom sphere
            particle_radius: 3e-10,
            viscosity: 1e-6,
            time_step: 1e-11,
            total_steps: 100_000,
            report_interval: 10_000,
            membrane: MembraneSpec {
                hole_size: 1.0,
                wall_to_hole_ratio: 1.0,
            },
        }
    }

    /// Reduced-unit case sized for fast tests: kB = 1, unit mass, a box of
    /// 50 with drag near unity so a few thousand steps thermalize.
    pub fn quick_case(num_particles: usize) -> Self {
        Self {
            kb: 1.0,
            box_size: 50.0,
            num_particles,
            temperature: 1.5,
            particle_mass: 1.0,
            particle_radius: 0.5,
            viscosity: 0.1,
            time_step: 0.02,
            total_steps: 2_000,
            report_interval: 500,
            membrane: MembraneSpec {
                hole_size: 5.0,
                wall_to_hole_ratio: 1.0,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn presets_validate() -> Result<()> {
        SimConfig::nicotine_in_water().validate()?;
        SimConfig::quick_case(64).validate()?;
        Ok(())
    }

    #[test]
    fn stokes_drag_for_nicotine() {
        let config = SimConfig::nicotine_in_water();
        // 6 * pi * 1e-6 * 3e-10
        assert_relative_eq!(config.gamma(), 5.654_866_776_461_628e-15, max_relative = 1e-12);
    }

    #[test]
    fn equipartition_prediction() {
        let config = SimConfig::nicotine_in_water();
        assert_relative_eq!(
            config.equipartition_energy(),
            1.5 * 1.4e-23 * 310.0,
            max_relative = 1e-15
        );
    }

    #[test]
    fn thermal_sigma_matches_definition() {
        let config = SimConfig::quick_case(8);
        assert_relative_eq!(config.thermal_sigma(), (1.5_f64).sqrt(), max_relative = 1e-15);
    }

    #[test]
    fn membrane_derived_sizes() {
        let membrane = MembraneSpec {
            hole_size: 2.0,
            wall_to_hole_ratio: 0.5,
        };
        assert_relative_eq!(membrane.wall_size(), 1.0);
        assert_relative_eq!(membrane.pitch(), 3.0);
    }

    #[test]
    fn non_positive_fields_rejected() {
        let mut config = SimConfig::quick_case(16);
        config.time_step = 0.0;
        assert!(config.validate().is_err());

        let mut config = SimConfig::quick_case(16);
        config.temperature = f64::NAN;
        assert!(config.validate().is_err());

        let mut config = SimConfig::quick_case(16);
        config.viscosity = -1.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn empty_ensemble_rejected() {
        let config = SimConfig::quick_case(0);
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("num_particles"));
    }

    #[test]
    fn zero_report_interval_rejected() {
        let mut config = SimConfig::quick_case(16);
        config.report_interval = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn oversized_radius_rejected() {
        let mut config = SimConfig::quick_case(16);
        config.particle_radius = 30.0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("2 * particle_radius"));
    }

    #[test]
    fn bad_membrane_rejected() {
        let mut config = SimConfig::quick_case(16);
        config.membrane.hole_size = 0.0;
        assert!(config.validate().is_err());

        let mut config = SimConfig::quick_case(16);
        config.membrane.wall_to_hole_ratio = -0.25;
        assert!(config.validate().is_err());
    }
}
