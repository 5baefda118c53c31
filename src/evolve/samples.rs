use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim};

use super::error::{EvolveError, Result};

/// Observed `(x, y)` points the polynomial is fitted against.
///
/// Both columns are index-aligned and non-empty for the whole lifetime of the
/// value, so the evolution loop never has to re-check them.
#[derive(Debug, Clone, PartialEq)]
pub struct Samples {
    xs: Vec<f64>,
    ys: Vec<f64>,
}

impl Samples {
    pub fn new(xs: Vec<f64>, ys: Vec<f64>) -> Result<Samples> {
        if xs.len() != ys.len() {
            return Err(EvolveError::MisalignedSamples { xs: xs.len(), ys: ys.len() });
        }
        if xs.is_empty() {
            return Err(EvolveError::EmptySamples);
        }
        Ok(Samples { xs, ys })
    }

    pub fn from_pairs(pairs: &[(f64, f64)]) -> Result<Samples> {
        let (xs, ys): (Vec<f64>, Vec<f64>) = pairs.iter().copied().unzip();
        Samples::new(xs, ys)
    }

    /// Reads a two column table. The first record is a header and is discarded.
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Samples> {
        let mut reader = ReaderBuilder::new().has_headers(true).trim(Trim::All).from_reader(reader);

        let n_columns = reader.headers().map_err(malformed)?.len();
        if n_columns == 0 {
            return Err(EvolveError::EmptySamples);
        }
        if n_columns != 2 {
            return Err(EvolveError::MalformedRow {
                line: 1,
                message: format!("expected 2 columns in header, found {}", n_columns),
            });
        }

        let mut xs = Vec::new();
        let mut ys = Vec::new();
        let mut record = StringRecord::new();
        while reader.read_record(&mut record).map_err(malformed)? {
            let line = record.position().map_or(0, |p| p.line() as usize);
            xs.push(parse_field(&record[0], line)?);
            ys.push(parse_field(&record[1], line)?);
        }

        Samples::new(xs, ys)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Samples> {
        let file = File::open(path.as_ref())?;
        let samples = Samples::from_csv_reader(file)?;
        log::debug!("loaded {} samples from {}", samples.len(), path.as_ref().display());
        Ok(samples)
    }

    pub fn len(&self) -> usize {
        self.xs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.xs.is_empty()
    }

    pub fn xs(&self) -> &[f64] {
        &self.xs
    }

    pub fn ys(&self) -> &[f64] {
        &self.ys
    }

    pub fn iter(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.xs.iter().copied().zip(self.ys.iter().copied())
    }
}

fn malformed(err: csv::Error) -> EvolveError {
    let line = err.position().map_or(0, |p| p.line() as usize);
    let message = err.to_string();
    match err.into_kind() {
        csv::ErrorKind::Io(err) => EvolveError::Io(err),
        _ => EvolveError::MalformedRow { line, message },
    }
}

fn parse_field(field: &str, line: usize) -> Result<f64> {
    let value: f64 = field.parse().map_err(|_| EvolveError::MalformedRow {
        line,
        message: format!("'{}' is not a number", field),
    })?;
    if !value.is_finite() {
        return Err(EvolveError::MalformedRow {
            line,
            message: format!("'{}' is not a finite number", field),
        });
    }
    Ok(value)
}
