//! Write measurements back out in the ingest format.
//!
//! Used by `rfit simulate`; the output is readable by `load_source`. Values are
//! written in their shortest exact decimal form, so a read-back is lossless.

use std::path::Path;

use crate::domain::Dataset;
use crate::error::{AppError, ErrorKind};

pub const HEADER: [&str; 3] = ["energy_gev", "cross_section_nb", "uncertainty_nb"];

/// Write observations as `energy,cross_section,uncertainty` CSV with a header.
pub fn write_observations_csv(path: &Path, dataset: &Dataset) -> Result<(), AppError> {
    let io_err = |e: csv::Error| {
        AppError::new(
            ErrorKind::Io,
            format!("Failed to write measurements CSV '{}': {e}", path.display()),
        )
    };

    let mut writer = csv::Writer::from_path(path).map_err(io_err)?;
    writer.write_record(HEADER).map_err(io_err)?;
    for o in dataset {
        writer
            .write_record([o.x.to_string(), o.y.to_string(), o.sigma.to_string()])
            .map_err(io_err)?;
    }
    writer.flush().map_err(|e| {
        AppError::new(
            ErrorKind::Io,
            format!("Failed to flush measurements CSV '{}': {e}", path.display()),
        )
    })?;

    log::info!("wrote {} observation(s) to '{}'", dataset.len(), path.display());
    Ok(())
}
