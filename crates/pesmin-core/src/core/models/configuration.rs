use nalgebra::Point3;
use std::fmt;
use std::ops::Index;

/// One of the three Cartesian axes of a particle position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    #[inline]
    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Axis::X => "x",
            Axis::Y => "y",
            Axis::Z => "z",
        };
        f.write_str(name)
    }
}

/// An ordered set of particle positions.
///
/// Particle `i` refers to the same physical particle for the whole lifetime of a run, so
/// every operation that derives a new configuration preserves both the length and the order
/// of the positions. Configurations are treated as values: a descent step builds a new one
/// rather than editing the previous one.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Configuration {
    positions: Vec<Point3<f64>>,
}

impl Configuration {
    pub fn new(positions: Vec<Point3<f64>>) -> Self {
        Self { positions }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    #[inline]
    pub fn positions(&self) -> &[Point3<f64>] {
        &self.positions
    }

    #[inline]
    pub fn get(&self, particle: usize) -> Option<&Point3<f64>> {
        self.positions.get(particle)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Point3<f64>> {
        self.positions.iter()
    }

    pub fn into_positions(self) -> Vec<Point3<f64>> {
        self.positions
    }

    /// Returns a copy of this configuration with a single coordinate shifted by `delta`.
    ///
    /// Every other particle, and the other two coordinates of `particle`, are unchanged.
    ///
    /// # Panics
    ///
    /// Panics if `particle` is out of bounds.
    pub fn with_offset(&self, particle: usize, axis: Axis, delta: f64) -> Self {
        let mut scratch = self.clone();
        scratch.positions[particle][axis.index()] += delta;
        scratch
    }

    /// `true` when every coordinate of every particle is a finite number.
    pub fn is_finite(&self) -> bool {
        self.positions
            .iter()
            .all(|p| p.coords.iter().all(|c| c.is_finite()))
    }
}

impl From<Vec<Point3<f64>>> for Configuration {
    fn from(positions: Vec<Point3<f64>>) -> Self {
        Self::new(positions)
    }
}

impl FromIterator<Point3<f64>> for Configuration {
    fn from_iter<I: IntoIterator<Item = Point3<f64>>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl Index<usize> for Configuration {
    type Output = Point3<f64>;

    fn index(&self, particle: usize) -> &Self::Output {
        &self.positions[particle]
    }
}

impl<'a> IntoIterator for &'a Configuration {
    type Item = &'a Point3<f64>;
    type IntoIter = std::slice::Iter<'a, Point3<f64>>;

    fn into_iter(self) -> Self::IntoIter {
        self.positions.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Configuration {
        Configuration::new(vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 2.0, 3.0),
            Point3::new(-1.0, 0.5, 0.25),
        ])
    }

    #[test]
    fn axis_indices_follow_cartesian_order() {
        let indices: Vec<_> = Axis::ALL.iter().map(|a| a.index()).collect();
        assert_eq!(indices, vec![0, 1, 2]);
        assert_eq!(Axis::Y.to_string(), "y");
    }

    #[test]
    fn with_offset_shifts_exactly_one_coordinate() {
        let base = sample();
        let shifted = base.with_offset(1, Axis::Z, 0.5);

        assert_eq!(shifted[0], base[0]);
        assert_eq!(shifted[2], base[2]);
        assert_eq!(shifted[1], Point3::new(1.0, 2.0, 3.5));
    }

    #[test]
    fn with_offset_leaves_original_untouched() {
        let base = sample();
        let snapshot = base.clone();
        let _ = base.with_offset(0, Axis::X, -1.0);
        assert_eq!(base, snapshot);
    }

    #[test]
    fn with_offset_preserves_length_and_order() {
        let base = sample();
        let shifted = base.with_offset(2, Axis::X, 1e-5);
        assert_eq!(shifted.len(), base.len());
        assert_eq!(shifted[1], base[1]);
    }

    #[test]
    fn is_finite_detects_nan_and_infinity() {
        assert!(sample().is_finite());

        let with_nan = Configuration::new(vec![Point3::new(0.0, f64::NAN, 0.0)]);
        assert!(!with_nan.is_finite());

        let with_inf = Configuration::new(vec![Point3::new(f64::INFINITY, 0.0, 0.0)]);
        assert!(!with_inf.is_finite());
    }

    #[test]
    fn collects_from_iterator_in_order() {
        let config: Configuration = (0..4).map(|i| Point3::new(i as f64, 0.0, 0.0)).collect();
        assert_eq!(config.len(), 4);
        assert_eq!(config[3].x, 3.0);
        assert!(!config.is_empty());
        assert!(Configuration::default().is_empty());
    }
}
