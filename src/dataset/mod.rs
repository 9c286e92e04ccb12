//! CSV dataset batch processing

mod driver;

pub use driver::{process_dataset, DatasetOptions, DatasetSummary, PROGRESS_INTERVAL};
