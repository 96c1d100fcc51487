use crate::core::models::configuration::Configuration;
use std::error::Error;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// Common interface for coordinate file formats.
///
/// Implementors provide the format-specific `read_from` / `write_to`; the path-based
/// helpers open or create the file and wrap it in a buffered reader or writer.
pub trait CoordinateFile {
    /// The type of metadata carried alongside the coordinates.
    type Metadata;

    /// The error type for I/O and parse failures.
    type Error: Error + From<io::Error>;

    /// Reads a configuration and its metadata from a buffered reader.
    ///
    /// # Errors
    ///
    /// Returns an error if parsing fails or the reader fails.
    fn read_from(reader: &mut impl BufRead)
    -> Result<(Configuration, Self::Metadata), Self::Error>;

    /// Writes a configuration and its metadata to a writer.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    fn write_to(
        configuration: &Configuration,
        metadata: &Self::Metadata,
        writer: &mut impl Write,
    ) -> Result<(), Self::Error>;

    fn read_from_path<P: AsRef<Path>>(
        path: P,
    ) -> Result<(Configuration, Self::Metadata), Self::Error> {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        Self::read_from(&mut reader)
    }

    fn write_to_path<P: AsRef<Path>>(
        configuration: &Configuration,
        metadata: &Self::Metadata,
        path: P,
    ) -> Result<(), Self::Error> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        Self::write_to(configuration, metadata, &mut writer)?;
        writer.flush()?;
        Ok(())
    }
}
