use crate::cli::InspectArgs;
use crate::error::{CliError, Result};
use nalgebra::Point3;
use pesmin::core::{
    forcefield::{params::PotentialKind, scoring},
    io::{traits::CoordinateFile, xyz::XyzFile},
    models::configuration::Configuration,
    utils::geometry,
};
use std::fmt;
use tracing::{info, warn};

pub async fn run(args: InspectArgs) -> Result<()> {
    info!("Loading configuration from {:?}", &args.path);
    let (configuration, metadata) =
        XyzFile::read_from_path(&args.path).map_err(|e| CliError::FileParsing {
            path: args.path.clone(),
            source: e.into(),
        })?;

    if let Some(declared) = metadata.declared_count {
        if declared != configuration.len() {
            warn!(
                "File declares {} particles but {} particle lines were found.",
                declared,
                configuration.len()
            );
        }
    }
    if !metadata.comment.is_empty() {
        println!("Comment: {}", metadata.comment);
    }

    let potential = args
        .potential
        .as_deref()
        .map(|name| PotentialKind::from_name(name, args.re_over_sigma))
        .transpose()?;

    let report = InspectReport::new(&configuration, potential.as_ref());
    print!("{}", report);
    Ok(())
}

/// Geometric summary of a point cloud, optionally with its energy under a pair potential.
#[derive(Debug, Clone, PartialEq)]
pub struct InspectReport {
    pub count: usize,
    pub centroid: Option<Point3<f64>>,
    pub bounds: Option<(Point3<f64>, Point3<f64>)>,
    /// Distance from each particle to its closest other particle, in file order.
    pub nearest_neighbours: Vec<f64>,
    pub energy: Option<(PotentialKind, f64)>,
}

impl InspectReport {
    pub fn new(configuration: &Configuration, potential: Option<&PotentialKind>) -> Self {
        let positions = configuration.positions();
        Self {
            count: positions.len(),
            centroid: geometry::centroid(positions),
            bounds: geometry::bounding_box(positions),
            nearest_neighbours: nearest_neighbour_distances(positions),
            energy: potential.map(|p| (*p, scoring::evaluate(configuration, p))),
        }
    }
}

fn nearest_neighbour_distances(positions: &[Point3<f64>]) -> Vec<f64> {
    if positions.len() < 2 {
        return Vec::new();
    }
    positions
        .iter()
        .enumerate()
        .map(|(i, a)| {
            positions
                .iter()
                .enumerate()
                .filter(|(j, _)| *j != i)
                .map(|(_, b)| geometry::distance(a, b))
                .fold(f64::INFINITY, f64::min)
        })
        .collect()
}

impl fmt::Display for InspectReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Particles: {}", self.count)?;
        if let Some(c) = self.centroid {
            writeln!(f, "Centroid:  ({:.6}, {:.6}, {:.6})", c.x, c.y, c.z)?;
        }
        if let Some((min, max)) = self.bounds {
            writeln!(
                f,
                "Bounds:    ({:.6}, {:.6}, {:.6}) .. ({:.6}, {:.6}, {:.6})",
                min.x, min.y, min.z, max.x, max.y, max.z
            )?;
        }
        if !self.nearest_neighbours.is_empty() {
            writeln!(f, "Nearest-neighbour distances:")?;
            for (i, d) in self.nearest_neighbours.iter().enumerate() {
                writeln!(f, "  {:>4}  {:.6}", i, d)?;
            }
        }
        if let Some((potential, energy)) = &self.energy {
            writeln!(f, "Energy ({}): {:.12}", potential, energy)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pesmin::core::io::xyz::XyzMetadata;

    const TOLERANCE: f64 = 1e-9;

    fn f64_approx_equal(a: f64, b: f64) -> bool {
        (a - b).abs() < TOLERANCE
    }

    fn triangle() -> Configuration {
        Configuration::new(vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 2.0, 0.0),
        ])
    }

    #[test]
    fn nearest_neighbours_follow_file_order() {
        let report = InspectReport::new(&triangle(), None);
        assert_eq!(report.count, 3);
        assert!(f64_approx_equal(report.nearest_neighbours[0], 1.0));
        assert!(f64_approx_equal(report.nearest_neighbours[1], 1.0));
        assert!(f64_approx_equal(report.nearest_neighbours[2], 2.0));
        assert!(report.energy.is_none());
    }

    #[test]
    fn report_includes_energy_when_potential_given() {
        let d = 2f64.powf(1.0 / 6.0);
        let pair = Configuration::new(vec![Point3::origin(), Point3::new(d, 0.0, 0.0)]);

        let report = InspectReport::new(&pair, Some(&PotentialKind::LennardJones));

        let (_, energy) = report.energy.unwrap();
        assert!(f64_approx_equal(energy, -1.0));
        assert!(report.to_string().contains("Energy (Lennard-Jones): -1.0000000000"));
    }

    #[test]
    fn single_particle_has_no_neighbours() {
        let single = Configuration::new(vec![Point3::new(0.5, 0.5, 0.5)]);
        let report = InspectReport::new(&single, None);
        assert!(report.nearest_neighbours.is_empty());
        assert_eq!(report.centroid, Some(Point3::new(0.5, 0.5, 0.5)));
    }

    #[test]
    fn empty_configuration_reports_only_count() {
        let report = InspectReport::new(&Configuration::new(vec![]), None);
        assert_eq!(report.to_string(), "Particles: 0\n");
    }

    #[tokio::test]
    async fn run_reads_written_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("3LJ.xyz");
        XyzFile::write_to_path(&triangle(), &XyzMetadata::new("test"), &path).unwrap();

        let args = InspectArgs {
            path,
            potential: Some("lj".to_string()),
            re_over_sigma: None,
        };
        assert!(run(args).await.is_ok());
    }

    #[tokio::test]
    async fn run_missing_file_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let args = InspectArgs {
            path: dir.path().join("absent.xyz"),
            potential: None,
            re_over_sigma: None,
        };
        assert!(matches!(
            run(args).await,
            Err(CliError::FileParsing { .. })
        ));
    }

    #[tokio::test]
    async fn run_rejects_morse_without_parameter() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("3Morse.xyz");
        XyzFile::write_to_path(&triangle(), &XyzMetadata::new("test"), &path).unwrap();

        let args = InspectArgs {
            path,
            potential: Some("morse".to_string()),
            re_over_sigma: None,
        };
        assert!(matches!(run(args).await, Err(CliError::Argument(_))));
    }
}
