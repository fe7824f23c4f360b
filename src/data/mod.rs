//! Measurement preparation: row cleaning, dataset merging, synthetic scans.

pub mod clean;
pub mod combine;
pub mod sample;

pub use clean::{CleanReport, RawRow, RejectReason, RowRejection, clean_dataset, clean_rows};
pub use combine::combine_datasets;
pub use sample::{SampleConfig, generate_sample};
