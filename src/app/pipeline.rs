//! The fit workflow shared by every front-end.
//!
//! sources → clean each → combine → fit loop → lifetime
//!
//! The CLI only prints what comes back; nothing here writes to stdout.

use std::path::PathBuf;

use crate::data::{RowRejection, clean_rows, combine_datasets};
use crate::domain::{Dataset, FitConfig, Lifetime, Observation};
use crate::error::{AppError, ErrorKind};
use crate::fit::{FitLoopOutcome, run_fit_loop};
use crate::io::{LoadedSource, SourceNotice, load_source};
use crate::math::reduced_chi_square;
use crate::models::lifetime_with_uncertainty;

/// Number of free parameters in the model.
pub const N_PARAMS: usize = 2;

/// What the cleaner made of one source.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceSummary {
    pub name: String,
    pub rows_read: usize,
    pub kept: usize,
    pub rejections: Vec<RowRejection>,
    pub corrected_uncertainties: usize,
    pub notice: Option<SourceNotice>,
}

/// All computed outputs of a single `rfit fit` run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub sources: Vec<SourceSummary>,
    /// Cleaned and merged input, before outlier rejection.
    pub combined: Dataset,
    pub outcome: FitLoopOutcome,
    pub lifetime: Lifetime,
    /// `χ²min / (n − 2)` on the final dataset, if it has degrees of freedom left.
    pub reduced_chi_square: Option<f64>,
}

impl RunOutput {
    /// Model prediction at each observation of the final dataset.
    pub fn predicted(&self) -> &[f64] {
        &self.outcome.predicted
    }

    pub fn rejected(&self) -> &[Observation] {
        &self.outcome.rejected
    }
}

/// Read every path, then run the pipeline.
pub fn run_fit(paths: &[PathBuf], config: &FitConfig) -> Result<RunOutput, AppError> {
    config.validate()?;
    let sources = paths.iter().map(|p| load_source(p)).collect();
    run_fit_with_sources(sources, config)
}

/// Run the pipeline on already-read sources.
pub fn run_fit_with_sources(sources: Vec<LoadedSource>, config: &FitConfig) -> Result<RunOutput, AppError> {
    config.validate()?;

    let mut summaries = Vec::with_capacity(sources.len());
    let mut datasets = Vec::with_capacity(sources.len());
    for source in sources {
        let report = clean_rows(&source.rows, config.median_level);
        log::info!(
            "'{}': kept {} of {} rows ({} corrected)",
            source.name,
            report.dataset.len(),
            report.rows_read,
            report.corrected_uncertainties
        );
        summaries.push(SourceSummary {
            name: source.name,
            rows_read: report.rows_read,
            kept: report.dataset.len(),
            rejections: report.rejections,
            corrected_uncertainties: report.corrected_uncertainties,
            notice: source.notice,
        });
        datasets.push(report.dataset);
    }

    let combined = combine_datasets(&datasets);
    if combined.is_empty() {
        return Err(AppError::new(
            ErrorKind::NoData,
            "No usable observations remain after cleaning the input sources.",
        ));
    }

    let outcome = run_fit_loop(&combined, config)?;
    let lifetime = lifetime_with_uncertainty(
        outcome.fit.result.parameters.width,
        outcome.fit.bounds.width_uncertainty,
        config.physics.hbar,
    )?;
    let reduced_chi_square = reduced_chi_square(outcome.fit.result.chi_square_min, outcome.dataset.len(), N_PARAMS);

    Ok(RunOutput {
        sources: summaries,
        combined,
        outcome,
        lifetime,
        reduced_chi_square,
    })
}
