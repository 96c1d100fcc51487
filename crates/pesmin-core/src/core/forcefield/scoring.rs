use super::params::PotentialKind;
use super::potentials::{lennard_jones_reduced, morse_reduced};
use crate::core::models::configuration::Configuration;
use crate::core::utils::geometry::distance;
use itertools::Itertools;

/// Energy of a single particle pair at separation `dist` under `potential`.
#[inline]
pub fn pair_energy(potential: &PotentialKind, dist: f64) -> f64 {
    match *potential {
        PotentialKind::LennardJones => lennard_jones_reduced(dist),
        PotentialKind::Morse { re_over_sigma } => morse_reduced(dist, re_over_sigma),
    }
}

/// Total potential energy of a configuration.
///
/// Sums the pair term over every unordered pair `(i, j)` with `j > i`, so each pair is
/// counted once and no particle interacts with itself. Pairs are visited in a fixed order,
/// which keeps the result bit-reproducible for a given configuration.
pub fn evaluate(configuration: &Configuration, potential: &PotentialKind) -> f64 {
    let positions = configuration.positions();
    (0..positions.len())
        .tuple_combinations()
        .map(|(i, j)| pair_energy(potential, distance(&positions[i], &positions[j])))
        .sum()
}
