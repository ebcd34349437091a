use ndarray::Array2;
use rand::Rng;
use rand_distr::StandardNormal;

/// One Euler-Maruyama step of the Langevin velocity equation,
/// `v' = v + dt/m (-gamma v + xi)`, applied in place to every component.
///
/// The stochastic force `xi` is drawn independently per particle per axis
/// per step as an amplitude `sqrt(24 kB T gamma / dt)` times a zero-mean
/// Gaussian kernel of standard deviation `sqrt(1/12)`, giving the second
/// moment `2 gamma kB T / dt` the fluctuation-dissipation relation requires
/// for the discrete step. Components are visited in row-major order, so a
/// given RNG state yields one fixed result.
pub fn update_velocities<R: Rng>(
    velocities: &mut Array2<f64>,
    gamma: f64,
    kb: f64,
    mass: f64,
    temperature: f64,
    time_step: f64,
    rng: &mut R,
) {
    let amplitude = (24.0 * kb * temperature * gamma / time_step).sqrt();
    let kernel_sigma = (1.0_f64 / 12.0).sqrt();
    let scale = time_step / mass;
    for v in velocities.iter_mut() {
        let g: f64 = rng.sample(StandardNormal);
        let noise = amplitude * kernel_sigma * g;
        *v += scale * (-gamma * *v + noise);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::Array2;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn zero_temperature_is_pure_drag() {
        let mut v = Array2::from_elem((2, 3), 2.0);
        let mut rng = StdRng::seed_from_u64(1);
        // gamma dt / m = 0.05, so each component decays to 2 * 0.95
        update_velocities(&mut v, 0.5, 1.0, 1.0, 0.0, 0.1, &mut rng);
        for &x in v.iter() {
            assert_relative_eq!(x, 1.9, max_relative = 1e-12);
        }
    }

    #[test]
    fn single_step_noise_variance() {
        // From rest, Var(v') = (dt/m)^2 * 2 gamma kB T / dt
        let (gamma, kb, mass, temp, dt) = (0.8, 1.0, 1.0, 2.0, 0.05);
        let mut v = Array2::zeros((2000, 3));
        let mut rng = StdRng::seed_from_u64(31415);
        update_velocities(&mut v, gamma, kb, mass, temp, dt, &mut rng);

        let n = (2000 * 3) as f64;
        let mean: f64 = v.iter().sum::<f64>() / n;
        let var: f64 = v.iter().map(|x| (x - mean) * (x - mean)).sum::<f64>() / n;
        let expected = 2.0 * gamma * kb * temp * dt / (mass * mass);

        assert!(mean.abs() < 0.025, "noise mean {mean} too far from zero");
        assert_relative_eq!(var, expected, max_relative = 0.1);
    }

    #[test]
    fn same_rng_state_same_kick() {
        let mut a = Array2::from_elem((8, 3), 0.7);
        let mut b = a.clone();
        let mut rng_a = StdRng::seed_from_u64(99);
        let mut rng_b = StdRng::seed_from_u64(99);
        update_velocities(&mut a, 0.3, 1.0, 1.5, 1.0, 0.01, &mut rng_a);
        update_velocities(&mut b, 0.3, 1.0, 1.5, 1.0, 0.01, &mut rng_b);
        assert_eq!(a, b);
    }
}
