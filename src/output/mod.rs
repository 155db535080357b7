//! Output module for scrape results
//!
//! This module handles:
//! - Periodic checkpoint files and the final timestamped CSV
//! - The plain-text error log
//! - Fill-rate statistics and recommendations

mod csv_output;
mod error_log;
pub mod stats;

pub use csv_output::{file_timestamp, read_records, write_records, ResultWriter};
pub use error_log::write_error_log;
pub use stats::{print_report, Recommendation, ScrapeReport};
