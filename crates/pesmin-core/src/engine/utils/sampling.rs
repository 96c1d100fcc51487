use crate::core::models::configuration::Configuration;
use nalgebra::Point3;
use rand::prelude::*;
use rand::rngs::StdRng;
use tracing::instrument;

/// Places `count` particles roughly on the unit sphere.
///
/// For each particle `x` is drawn from `[−0.5, 0)`, the remaining length is split evenly
/// between `y` and `z` (`|y| = |z| = sqrt((1 − x²)/2)`), and the signs of `y` and `z` are
/// one of the four combinations chosen uniformly.
#[instrument(level = "debug", skip(rng))]
pub fn sphere_configuration(count: usize, rng: &mut impl Rng) -> Configuration {
    (0..count)
        .map(|_| {
            let x: f64 = rng.gen_range(-0.5..0.0);
            let other = ((1.0 - x * x) / 2.0).sqrt();
            let (sign_y, sign_z) = match rng.gen_range(0..4) {
                0 => (1.0, 1.0),
                1 => (-1.0, 1.0),
                2 => (1.0, -1.0),
                _ => (-1.0, -1.0),
            };
            Point3::new(x, sign_y * other, sign_z * other)
        })
        .collect()
}

/// Initial configuration for a run, reproducible when `seed` is given.
pub fn initial_configuration(count: usize, seed: Option<u64>) -> Configuration {
    match seed {
        Some(seed) => sphere_configuration(count, &mut StdRng::seed_from_u64(seed)),
        None => sphere_configuration(count, &mut thread_rng()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generates_requested_number_of_particles() {
        assert_eq!(initial_configuration(17, Some(1)).len(), 17);
        assert!(initial_configuration(0, None).is_empty());
    }

    #[test]
    fn particles_lie_on_unit_sphere_with_x_in_lower_half_interval() {
        let config = initial_configuration(200, Some(7));
        for p in &config {
            assert!((-0.5..0.0).contains(&p.x));
            assert!((p.coords.norm() - 1.0).abs() < 1e-12);
            assert!((p.y.abs() - p.z.abs()).abs() < 1e-15);
        }
    }

    #[test]
    fn all_four_sign_combinations_occur() {
        let config = initial_configuration(400, Some(11));
        let mut seen = [false; 4];
        for p in &config {
            let idx = match (p.y > 0.0, p.z > 0.0) {
                (true, true) => 0,
                (false, true) => 1,
                (true, false) => 2,
                (false, false) => 3,
            };
            seen[idx] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn same_seed_gives_same_configuration() {
        assert_eq!(
            initial_configuration(10, Some(99)),
            initial_configuration(10, Some(99))
        );
        assert_ne!(
            initial_configuration(10, Some(99)),
            initial_configuration(10, Some(100))
        );
    }
}
