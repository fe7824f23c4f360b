//! Merge several cleaned datasets into one, ordered by energy.

use crate::domain::Dataset;

/// Concatenate `datasets` and stable-sort the result by `x`.
///
/// Ties keep their input order; duplicates are kept.
pub fn combine_datasets(datasets: &[Dataset]) -> Dataset {
    let mut all: Vec<_> = datasets.iter().flat_map(|d| d.iter().copied()).collect();
    all.sort_by(|a, b| a.x.total_cmp(&b.x));
    Dataset::new(all)
}
