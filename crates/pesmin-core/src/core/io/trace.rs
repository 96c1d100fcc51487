use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TraceError {
    #[error("I/O error for trace file: {0}")]
    Io(#[from] io::Error),
    #[error("CSV error for trace file: {0}")]
    Csv(#[from] csv::Error),
}

/// One convergence check as recorded in a trace file.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TraceRecord {
    pub iteration: usize,
    pub energy: f64,
    /// Summed displacement of all particles over the checked step.
    pub displacement: f64,
    /// `displacement` divided by the particle count.
    pub mean_displacement: f64,
}

/// Writes [`TraceRecord`]s as CSV rows with a header line.
pub struct TraceWriter<W: Write> {
    inner: csv::Writer<W>,
}

impl TraceWriter<File> {
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self, TraceError> {
        Ok(Self {
            inner: csv::Writer::from_path(path)?,
        })
    }
}

impl<W: Write> TraceWriter<W> {
    pub fn from_writer(writer: W) -> Self {
        Self {
            inner: csv::Writer::from_writer(writer),
        }
    }

    pub fn record(&mut self, record: &TraceRecord) -> Result<(), TraceError> {
        self.inner.serialize(record)?;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<(), TraceError> {
        self.inner.flush()?;
        Ok(())
    }

    pub fn into_inner(self) -> Result<W, TraceError> {
        self.inner
            .into_inner()
            .map_err(|e| TraceError::Io(e.into_error()))
    }
}
