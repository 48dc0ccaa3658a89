//! Terminal status of an alignment run.

use std::fmt;
use std::path::Path;

/// A well-formed coordinate row carries at least this many whitespace
/// fields (start/end pairs, lengths, identity, separators, names). Fewer
/// means the table is degenerate: no real alignment was found.
pub const MIN_COORDS_FIELDS: usize = 13;

/// One terminal status per request, consumed by downstream reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlignStatus {
    /// An expected artifact is missing despite every tool succeeding;
    /// signals a tool-contract violation rather than a process failure.
    Failed,
    /// Well-formed coordinate table (and SNP table when requested).
    Ok,
    /// Tools succeeded but no usable alignment was produced. A legitimate
    /// biological outcome, not an error.
    NotAligned,
    /// All units failed, or a filter/extraction tool exited nonzero.
    Error,
}

impl fmt::Display for AlignStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AlignStatus::Failed => "FAILED",
            AlignStatus::Ok => "OK",
            AlignStatus::NotAligned => "NOT_ALIGNED",
            AlignStatus::Error => "ERROR",
        };
        f.write_str(name)
    }
}

/// Classifies a rewritten coordinate table by existence and row shape.
pub fn classify_coords(coords: &Path) -> AlignStatus {
    if !coords.is_file() {
        return AlignStatus::Failed;
    }
    let text = match std::fs::read_to_string(coords) {
        Ok(text) => text,
        Err(_) => return AlignStatus::Failed,
    };
    let last = text.lines().last().unwrap_or("");
    if last.split_whitespace().count() < MIN_COORDS_FIELDS {
        AlignStatus::NotAligned
    } else {
        AlignStatus::Ok
    }
}
