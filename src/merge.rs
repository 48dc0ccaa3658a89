//! Merging per-unit delta files into one canonical delta.
//!
//! The merged file carries a single two-line header — the whole-reference
//! and contigs paths, then the `NUCMER` format marker — followed by each
//! successful unit's alignment blocks with that unit's own header
//! stripped. Units are appended in the order they were supplied, never in
//! completion order, so a fingerprint-equal rerun produces a byte-identical
//! delta no matter how the workers were scheduled.

use crate::error::Result;
use crate::report::Reporter;
use crate::tools::EngineResult;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// Delta format marker line, shared by every nucmer output.
pub const DELTA_MARKER: &str = "NUCMER";

/// Concatenates successful unit deltas under one header.
///
/// Failed units are skipped with a warning naming the unit and the
/// assembly; a successful unit whose delta file is missing is skipped the
/// same way. Returns the number of units actually merged. The caller must
/// not invoke this with zero successful results — that case is a terminal
/// `Error` upstream and no merged artifact may exist for it.
pub fn merge(
    results: &[EngineResult],
    reference_label: &Path,
    contigs: &Path,
    contigs_label: &str,
    delta_path: &Path,
    reporter: &Reporter,
) -> Result<usize> {
    let mut out = BufWriter::new(File::create(delta_path)?);
    writeln!(out, "{} {}", reference_label.display(), contigs.display())?;
    writeln!(out, "{DELTA_MARKER}")?;

    let mut merged = 0;
    for result in results {
        if !result.succeeded() {
            reporter.warn(&format!(
                "Failed aligning contigs {} to reference part {}! Skipping this part.",
                contigs_label,
                result.invocation.reference_unit.display()
            ));
            continue;
        }
        let unit_delta = result.invocation.delta_path();
        if !unit_delta.is_file() {
            reporter.warn(&format!(
                "Missing delta for reference part {} despite engine success; skipping.",
                result.invocation.reference_unit.display()
            ));
            continue;
        }
        let mut reader = BufReader::new(File::open(&unit_delta)?);
        // Drop the unit's own two header lines; only the shared header
        // survives in the merged file.
        let mut skip = String::new();
        reader.read_line(&mut skip)?;
        skip.clear();
        reader.read_line(&mut skip)?;
        io::copy(&mut reader, &mut out)?;
        merged += 1;
    }

    out.flush()?;
    Ok(merged)
}
