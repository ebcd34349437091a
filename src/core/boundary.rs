use ndarray::{Array1, Array2, Zip};

use crate::core::config::MembraneSpec;

/// Axis normal to the membrane plane.
pub const MEMBRANE_AXIS: usize = 0;
/// Axis closed by reflecting walls on both faces.
pub const WALL_AXIS: usize = 1;
/// Axis with periodic boundary conditions.
pub const PERIODIC_AXIS: usize = 2;

/// Reduce the periodic axis into `[0, box_size)` by Euclidean remainder.
///
/// Winding counts are discarded; a proposal of -0.3 lands at box_size - 0.3.
pub fn wrap_periodic_axis(positions: &mut Array2<f64>, box_size: f64) {
    positions
        .column_mut(PERIODIC_AXIS)
        .mapv_inplace(|z| z.rem_euclid(box_size));
}

/// Reflect components that penetrated a face back into the box and flip the
/// matching velocity component.
///
/// One masked elementwise pass over every component of the ensemble: a
/// component below the contact plane at `particle_radius` mirrors about it,
/// a component beyond `box_size - particle_radius` mirrors about that plane.
/// Single bounce per axis per step; exact while overshoots stay small
/// against the box edge.
pub fn reflect_walls(
    positions: &mut Array2<f64>,
    velocities: &mut Array2<f64>,
    box_size: f64,
    particle_radius: f64,
) {
    let lo = particle_radius;
    let hi = box_size - particle_radius;
    Zip::from(positions).and(velocities).for_each(|x, v| {
        if *x < lo {
            *x = particle_radius - *x;
            *v = -*v;
        } else if *x > hi {
            *x = 2.0 * box_size - *x - particle_radius;
            *v = -*v;
        }
    });
}

/// Resolve boundary collisions on proposed positions: wrap the periodic
/// axis, then run the reflecting pass over all components.
///
/// The reflection masks also see the wrapped axis; outside the seam bands of
/// width `particle_radius` at 0 and `box_size` they never trigger there.
pub fn resolve_collisions(
    positions: &mut Array2<f64>,
    velocities: &mut Array2<f64>,
    box_size: f64,
    particle_radius: f64,
) {
    wrap_periodic_axis(positions, box_size);
    reflect_walls(positions, velocities, box_size, particle_radius);
}

/// Mask of particles whose position overlaps the membrane's wall material at
/// the box mid-plane.
///
/// A particle overlaps when its membrane-normal coordinate lies within one
/// radius of the mid-plane and its in-plane position falls on the wall grid
/// rather than inside a hole. Experimental: the permeability semantics are
/// unresolved, so nothing feeds this mask into collision resolution.
pub fn membrane_overlap_mask(
    positions: &Array2<f64>,
    membrane: &MembraneSpec,
    box_size: f64,
    particle_radius: f64,
) -> Array1<bool> {
    let half = 0.5 * box_size;
    let wall = membrane.wall_size();
    let pitch = membrane.pitch();
    Array1::from_shape_fn(positions.nrows(), |i| {
        let near_plane = positions[[i, MEMBRANE_AXIS]] < half + particle_radius
            && positions[[i, MEMBRANE_AXIS]] > half - particle_radius;
        let on_wall = positions[[i, WALL_AXIS]].rem_euclid(pitch) < wall
            || positions[[i, PERIODIC_AXIS]].rem_euclid(pitch) < wall;
        near_plane && on_wall
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    const BOX: f64 = 10.0;
    const RADIUS: f64 = 0.1;

    #[test]
    fn low_face_reflection() {
        let mut x = array![[-0.5, 5.0, 5.0]];
        let mut v = array![[-1.0, 0.3, 0.2]];
        resolve_collisions(&mut x, &mut v, BOX, RADIUS);

        assert_relative_eq!(x[[0, 0]], 0.6, max_relative = 1e-12);
        assert_relative_eq!(v[[0, 0]], 1.0, max_relative = 1e-12);
        // untouched components pass through
        assert_relative_eq!(x[[0, 1]], 5.0);
        assert_relative_eq!(v[[0, 1]], 0.3);
    }

    #[test]
    fn high_face_reflection() {
        let mut x = array![[5.0, 10.3, 5.0]];
        let mut v = array![[0.1, 2.0, 0.2]];
        resolve_collisions(&mut x, &mut v, BOX, RADIUS);

        // 2 * 10 - 10.3 - 0.1
        assert_relative_eq!(x[[0, 1]], 9.6, max_relative = 1e-12);
        assert_relative_eq!(v[[0, 1]], -2.0, max_relative = 1e-12);
    }

    #[test]
    fn periodic_axis_wraps_without_velocity_flip() {
        let mut x = array![[5.0, 5.0, 12.0]];
        let mut v = array![[0.1, 0.2, 0.7]];
        resolve_collisions(&mut x, &mut v, BOX, RADIUS);

        assert_relative_eq!(x[[0, 2]], 2.0, max_relative = 1e-12);
        assert_relative_eq!(v[[0, 2]], 0.7, max_relative = 1e-12);
    }

    #[test]
    fn negative_periodic_proposal_wraps_up() {
        let mut x = array![[5.0, 5.0, -0.3]];
        let mut v = array![[0.1, 0.2, -0.7]];
        resolve_collisions(&mut x, &mut v, BOX, RADIUS);

        assert_relative_eq!(x[[0, 2]], 9.7, max_relative = 1e-12);
        assert_relative_eq!(v[[0, 2]], -0.7, max_relative = 1e-12);
    }

    #[test]
    fn interior_proposal_is_untouched() {
        let mut x = array![[3.0, 4.0, 5.0]];
        let mut v = array![[1.0, -2.0, 0.5]];
        let x0 = x.clone();
        let v0 = v.clone();
        resolve_collisions(&mut x, &mut v, BOX, RADIUS);

        assert_eq!(x, x0);
        assert_eq!(v, v0);
    }

    #[test]
    fn each_axis_reflects_independently() {
        // every component out of range at once
        let mut x = array![[-0.2, 10.5, 5.0]];
        let mut v = array![[-1.0, 1.0, 0.0]];
        resolve_collisions(&mut x, &mut v, BOX, RADIUS);

        assert_relative_eq!(x[[0, 0]], 0.3, max_relative = 1e-12);
        assert_relative_eq!(x[[0, 1]], 9.4, max_relative = 1e-12);
        assert_relative_eq!(v[[0, 0]], 1.0);
        assert_relative_eq!(v[[0, 1]], -1.0);
    }

    #[test]
    fn membrane_mask_wall_and_hole() {
        // wall_size = 1, pitch = 2
        let membrane = MembraneSpec {
            hole_size: 1.0,
            wall_to_hole_ratio: 1.0,
        };
        let positions = array![
            // at the plane, y on wall material
            [5.05, 0.5, 1.5],
            // at the plane, z on wall material
            [4.95, 1.5, 2.3],
            // at the plane but inside a hole
            [5.0, 1.5, 1.5],
            // on the wall grid but far from the plane
            [3.0, 0.5, 0.5],
        ];
        let mask = membrane_overlap_mask(&positions, &membrane, BOX, RADIUS);
        assert_eq!(mask, array![true, true, false, false]);
    }
}
