//! Row validation: raw text rows → cleaned `Dataset`.
//!
//! Rules, applied per row in this order (first match wins):
//!
//! 1. fewer than three fields, or a field that is not a finite number → reject
//! 2. uncertainty exactly zero → reject
//! 3. response above `median_level ×` the median response of the raw set → reject
//! 4. negative response → reject
//! 5. negative energy → reject
//! 6. negative uncertainty → keep, with the sign corrected
//!
//! Nothing here is fatal: a rejected row is recorded and skipped.
//!
//! The median in rule 3 belongs to the set being cleaned. Rows dropped by other
//! rules still count towards it, so cleaning an already cleaned set can drop
//! more rows when those rows held the median up.

use crate::domain::{Dataset, Observation};

/// One raw input row, as read from a delimited source.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRow {
    /// 1-based line number in the source (header included).
    pub line: usize,
    pub fields: Vec<String>,
}

impl RawRow {
    pub fn new(line: usize, fields: Vec<String>) -> Self {
        Self { line, fields }
    }

    /// Split a comma-delimited line (no quoting).
    pub fn from_line(line: usize, text: &str) -> Self {
        Self::new(line, text.split(',').map(|s| s.trim().to_string()).collect())
    }

    /// Render an observation back into a row. `f64` display is lossless.
    pub fn from_observation(line: usize, o: &Observation) -> Self {
        Self::new(line, vec![o.x.to_string(), o.y.to_string(), o.sigma.to_string()])
    }
}

/// Why a row was dropped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RejectReason {
    /// Missing fields or non-numeric tokens.
    Malformed,
    /// Parsed, but NaN or infinite.
    NonFinite,
    ZeroUncertainty,
    /// Response above `median_level × median`.
    AboveMedianLevel { limit: f64 },
    NegativeResponse,
    NegativeEnergy,
}

impl RejectReason {
    pub fn describe(&self) -> String {
        match self {
            RejectReason::Malformed => "malformed row".to_string(),
            RejectReason::NonFinite => "non-finite value".to_string(),
            RejectReason::ZeroUncertainty => "zero uncertainty".to_string(),
            RejectReason::AboveMedianLevel { limit } => format!("response above median limit {limit:.4}"),
            RejectReason::NegativeResponse => "negative response".to_string(),
            RejectReason::NegativeEnergy => "negative energy".to_string(),
        }
    }
}

/// A row-level rejection.
#[derive(Debug, Clone, PartialEq)]
pub struct RowRejection {
    pub line: usize,
    pub reason: RejectReason,
}

/// Cleaner output: the dataset plus what happened to the other rows.
#[derive(Debug, Clone, PartialEq)]
pub struct CleanReport {
    pub dataset: Dataset,
    pub rejections: Vec<RowRejection>,
    /// Rows kept after flipping a negative uncertainty.
    pub corrected_uncertainties: usize,
    pub rows_read: usize,
    /// Median of the raw set's parseable responses, if any.
    pub median_response: Option<f64>,
}

/// Clean raw rows into a dataset. Row order is preserved.
pub fn clean_rows(rows: &[RawRow], median_level: f64) -> CleanReport {
    let median_response = response_median(rows);
    let limit = median_response.map(|m| median_level * m);

    let mut observations = Vec::with_capacity(rows.len());
    let mut rejections = Vec::new();
    let mut corrected_uncertainties = 0usize;

    for row in rows {
        let outcome = parse_row(row).and_then(|values| classify(values, limit));
        match outcome {
            Ok((obs, corrected)) => {
                if corrected {
                    corrected_uncertainties += 1;
                }
                observations.push(obs);
            }
            Err(reason) => {
                log::debug!("line {}: dropped ({})", row.line, reason.describe());
                rejections.push(RowRejection {
                    line: row.line,
                    reason,
                });
            }
        }
    }

    CleanReport {
        dataset: Dataset::new(observations),
        rejections,
        corrected_uncertainties,
        rows_read: rows.len(),
        median_response,
    }
}

/// Re-run the cleaner over an existing dataset.
///
/// A no-op only when every response is within `median_level ×` the dataset's
/// own median; see the module docs.
pub fn clean_dataset(dataset: &Dataset, median_level: f64) -> CleanReport {
    let rows: Vec<RawRow> = dataset
        .iter()
        .enumerate()
        .map(|(i, o)| RawRow::from_observation(i + 1, o))
        .collect();
    clean_rows(&rows, median_level)
}

fn parse_row(row: &RawRow) -> Result<[f64; 3], RejectReason> {
    if row.fields.len() < 3 {
        return Err(RejectReason::Malformed);
    }
    let mut values = [0.0; 3];
    for (slot, field) in values.iter_mut().zip(&row.fields) {
        *slot = parse_number(field).ok_or(RejectReason::Malformed)?;
    }
    if values.iter().any(|v| !v.is_finite()) {
        return Err(RejectReason::NonFinite);
    }
    Ok(values)
}

fn classify([x, y, sigma]: [f64; 3], limit: Option<f64>) -> Result<(Observation, bool), RejectReason> {
    if sigma == 0.0 {
        return Err(RejectReason::ZeroUncertainty);
    }
    if let Some(limit) = limit {
        if y > limit {
            return Err(RejectReason::AboveMedianLevel { limit });
        }
    }
    if y < 0.0 {
        return Err(RejectReason::NegativeResponse);
    }
    if x < 0.0 {
        return Err(RejectReason::NegativeEnergy);
    }
    let corrected = sigma < 0.0;
    Ok((Observation::new(x, y, sigma.abs()), corrected))
}

fn parse_number(field: &str) -> Option<f64> {
    field.trim().parse::<f64>().ok()
}

fn response_median(rows: &[RawRow]) -> Option<f64> {
    let mut ys: Vec<f64> = rows
        .iter()
        .filter_map(|r| r.fields.get(1))
        .filter_map(|f| parse_number(f))
        .filter(|v| v.is_finite())
        .collect();
    median_mut(&mut ys)
}

pub(crate) fn median_mut(values: &mut [f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(|a, b| a.total_cmp(b));
    let mid = values.len() / 2;
    if values.len() % 2 == 1 {
        Some(values[mid])
    } else {
        Some((values[mid - 1] + values[mid]) / 2.0)
    }
}
