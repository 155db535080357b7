//! Plain-text error log
//!
//! Written next to the final CSV, and only when the run recorded errors.

use crate::record::ErrorEntry;
use chrono::{DateTime, Local};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Writes a plain-text error report, one error per line
pub fn write_error_log(
    path: &Path,
    errors: &[ErrorEntry],
    now: &DateTime<Local>,
) -> std::io::Result<()> {
    let mut out = BufWriter::new(File::create(path)?);

    writeln!(out, "Error report - {}", now.format("%Y-%m-%d %H:%M:%S"))?;
    writeln!(out, "{}", "=".repeat(50))?;
    writeln!(out)?;

    for error in errors {
        writeln!(out, "{}", error)?;
    }

    out.flush()
}
