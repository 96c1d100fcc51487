use crate::core::forcefield::params::PotentialKind;
use crate::core::io::traits::CoordinateFile;
use crate::core::models::configuration::{Axis, Configuration};
use nalgebra::Point3;
use std::io::{self, BufRead, Write};
use thiserror::Error;

/// Element label written in front of every particle line.
pub const PARTICLE_LABEL: &str = "X";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct XyzMetadata {
    /// Particle count from the first line, when it parses as an integer.
    pub declared_count: Option<usize>,
    /// Free-text second line.
    pub comment: String,
}

impl XyzMetadata {
    pub fn new(comment: impl Into<String>) -> Self {
        Self {
            declared_count: None,
            comment: comment.into(),
        }
    }

    /// Comment line describing a finished run, e.g.
    /// `Geometry of 13 calculated using the LJ potential.`
    pub fn for_run(particle_count: usize, potential: &PotentialKind) -> Self {
        Self::new(format!(
            "Geometry of {} calculated using the {} potential.",
            particle_count,
            potential.label()
        ))
    }
}

#[derive(Debug, Error)]
pub enum XyzError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Parse error on line {line}: {kind}")]
    Parse { line: usize, kind: XyzParseErrorKind },
}

#[derive(Debug, Error, PartialEq)]
pub enum XyzParseErrorKind {
    #[error("Missing {axis} coordinate after particle label")]
    MissingCoordinate { axis: Axis },
    #[error("Invalid float for {axis} coordinate (value: '{value}')")]
    InvalidFloat { axis: Axis, value: String },
}

/// Restricted XYZ layout: a count line, a comment line, then `X x y z` per particle.
///
/// Reading follows a scanning rule rather than a strict grammar: every line whose first
/// whitespace-separated token is `X` contributes one particle built from the next three
/// tokens, and all other lines are ignored. Particle order in the file is the configuration
/// order.
pub struct XyzFile;

impl CoordinateFile for XyzFile {
    type Metadata = XyzMetadata;
    type Error = XyzError;

    fn read_from(
        reader: &mut impl BufRead,
    ) -> Result<(Configuration, Self::Metadata), Self::Error> {
        let mut positions = Vec::new();
        let mut metadata = XyzMetadata::default();

        for (line_idx, line_res) in reader.lines().enumerate() {
            let line = line_res?;
            let line_num = line_idx + 1;
            let mut tokens = line.split_whitespace();

            match tokens.next() {
                Some(PARTICLE_LABEL) => {
                    let point = parse_coordinates(&mut tokens, line_num)?;
                    positions.push(point);
                }
                _ if line_idx == 0 => {
                    metadata.declared_count = line.trim().parse().ok();
                }
                _ if line_idx == 1 => {
                    metadata.comment = line.trim_end().to_string();
                }
                _ => {}
            }
        }

        Ok((Configuration::new(positions), metadata))
    }

    fn write_to(
        configuration: &Configuration,
        metadata: &Self::Metadata,
        writer: &mut impl Write,
    ) -> Result<(), Self::Error> {
        writeln!(writer, "{}", configuration.len())?;
        writeln!(writer, "{}", metadata.comment)?;
        for p in configuration {
            writeln!(writer, "{}\t{}\t{}\t{}", PARTICLE_LABEL, p.x, p.y, p.z)?;
        }
        Ok(())
    }
}

fn parse_coordinates<'a>(
    tokens: &mut impl Iterator<Item = &'a str>,
    line: usize,
) -> Result<Point3<f64>, XyzError> {
    let mut coords = [0.0; 3];
    for axis in Axis::ALL {
        let token = tokens.next().ok_or(XyzError::Parse {
            line,
            kind: XyzParseErrorKind::MissingCoordinate { axis },
        })?;
        coords[axis.index()] = token.parse().map_err(|_| XyzError::Parse {
            line,
            kind: XyzParseErrorKind::InvalidFloat {
                axis,
                value: token.to_string(),
            },
        })?;
    }
    Ok(Point3::from(coords))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn sample_configuration() -> Configuration {
        Configuration::new(vec![
            Point3::new(-0.123456789012345, 0.7071067811865476, -0.7071067811865476),
            Point3::new(1.0e-9, -2.5, 3.0),
            Point3::new(0.1 + 0.2, 1.0 / 3.0, -0.0),
        ])
    }

    fn write_to_string(configuration: &Configuration, metadata: &XyzMetadata) -> String {
        let mut buffer = Vec::new();
        XyzFile::write_to(configuration, metadata, &mut buffer).unwrap();
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn write_produces_count_comment_and_labelled_lines() {
        let config = Configuration::new(vec![Point3::new(1.5, -2.0, 0.25)]);
        let metadata = XyzMetadata::for_run(1, &PotentialKind::LennardJones);
        let text = write_to_string(&config, &metadata);

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "1");
        assert_eq!(lines[1], "Geometry of 1 calculated using the LJ potential.");
        assert_eq!(lines[2], "X\t1.5\t-2\t0.25");
    }

    #[test]
    fn round_trip_reproduces_coordinates_in_order() {
        let original = sample_configuration();
        let metadata = XyzMetadata::for_run(3, &PotentialKind::Morse { re_over_sigma: 2.0 });
        let text = write_to_string(&original, &metadata);

        let (parsed, parsed_meta) = XyzFile::read_from(&mut Cursor::new(text)).unwrap();
        assert_eq!(parsed, original);
        assert_eq!(parsed_meta.declared_count, Some(3));
        assert_eq!(
            parsed_meta.comment,
            "Geometry of 3 calculated using the Morse potential."
        );
    }

    #[test]
    fn round_trip_through_a_file_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("3LJ.xyz");
        let original = sample_configuration();

        XyzFile::write_to_path(&original, &XyzMetadata::new("test"), &path).unwrap();
        let (parsed, _) = XyzFile::read_from_path(&path).unwrap();
        assert_eq!(parsed, original);
    }

    #[test]
    fn reader_skips_lines_without_particle_label() {
        let text = "2\n\nX 0 0 0\n\n# trailing note\nH 1 1 1\n   X\t1.0\t2.0\t3.0   \n";
        let (config, metadata) = XyzFile::read_from(&mut Cursor::new(text)).unwrap();

        assert_eq!(config.len(), 2);
        assert_eq!(config[1], Point3::new(1.0, 2.0, 3.0));
        assert_eq!(metadata.declared_count, Some(2));
        assert_eq!(metadata.comment, "");
    }

    #[test]
    fn reader_ignores_tokens_beyond_the_third_coordinate() {
        let text = "1\ncomment\nX 1 2 3 extra columns\n";
        let (config, _) = XyzFile::read_from(&mut Cursor::new(text)).unwrap();
        assert_eq!(config[0], Point3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn reader_tolerates_non_numeric_count_line() {
        let text = "cluster\nX 1 2 3\n";
        let (config, metadata) = XyzFile::read_from(&mut Cursor::new(text)).unwrap();
        assert_eq!(config.len(), 1);
        assert_eq!(metadata.declared_count, None);
    }

    #[test]
    fn reader_reports_missing_coordinate_with_line_number() {
        let text = "1\ncomment\nX 1.0 2.0\n";
        let err = XyzFile::read_from(&mut Cursor::new(text)).unwrap_err();
        match err {
            XyzError::Parse { line, kind } => {
                assert_eq!(line, 3);
                assert_eq!(kind, XyzParseErrorKind::MissingCoordinate { axis: Axis::Z });
            }
            other => panic!("Expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn reader_reports_invalid_float() {
        let text = "1\ncomment\nX 1.0 abc 2.0\n";
        let err = XyzFile::read_from(&mut Cursor::new(text)).unwrap_err();
        assert!(matches!(
            err,
            XyzError::Parse {
                line: 3,
                kind: XyzParseErrorKind::InvalidFloat { axis: Axis::Y, .. }
            }
        ));
    }

    #[test]
    fn reading_a_missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = XyzFile::read_from_path(dir.path().join("absent.xyz"));
        assert!(matches!(result, Err(XyzError::Io(_))));
    }
}
