/// Lennard-Jones 12-6 pair energy in reduced units (ε = 1, σ = 1): `4·(d⁻¹² − d⁻⁶)`.
///
/// Coincident particles (`dist == 0`) yield a non-finite energy; no floor is applied to the
/// distance.
#[inline]
pub fn lennard_jones_reduced(dist: f64) -> f64 {
    let inv6 = dist.powi(-6);
    let inv12 = inv6 * inv6;
    4.0 * (inv12 - inv6)
}

/// Morse-style pair energy `(1 − e^(d − r_e/σ))²` relative to the reference ratio `r_e/σ`.
///
/// The exponential may overflow for extreme separations, which is outside any realistic
/// cluster geometry.
#[inline]
pub fn morse_reduced(dist: f64, re_over_sigma: f64) -> f64 {
    let well = 1.0 - (dist - re_over_sigma).exp();
    well * well
}

/// Separation at which the reduced Lennard-Jones pair energy has its minimum of −1.
#[inline]
pub fn lennard_jones_equilibrium_distance() -> f64 {
    2f64.powf(1.0 / 6.0)
}
