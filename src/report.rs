//! Per-request reporting.
//!
//! Each run gets its own [`Reporter`], scoped to the request's log files.
//! Progress notes and warnings land in the `.log.out` / `.log.err` pair so
//! a run's record survives on disk next to its artifacts; the same events
//! are mirrored through `tracing` for whatever subscriber the host process
//! installed. Subprocess output goes to the same files but is never parsed
//! for control flow.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Reporting capability for one alignment run.
///
/// Methods take `&self` and open the log files in append mode per call, so
/// a single Reporter can be shared across dispatcher workers without locks.
/// Logging failures are swallowed: a run must never die because its log
/// file did.
#[derive(Debug, Clone)]
pub struct Reporter {
    log_out: PathBuf,
    log_err: PathBuf,
}

impl Reporter {
    pub fn new(log_out: impl Into<PathBuf>, log_err: impl Into<PathBuf>) -> Self {
        Reporter {
            log_out: log_out.into(),
            log_err: log_err.into(),
        }
    }

    pub fn log_out_path(&self) -> &Path {
        &self.log_out
    }

    pub fn log_err_path(&self) -> &Path {
        &self.log_err
    }

    /// Truncates both log files at the start of a run.
    pub fn reset(&self) {
        let _ = std::fs::write(&self.log_out, b"");
        let _ = std::fs::write(&self.log_err, b"");
    }

    /// Progress note: stdout log plus a tracing event.
    pub fn info(&self, msg: &str) {
        tracing::info!("{msg}");
        self.append(&self.log_out, msg);
    }

    /// Warning: stderr log plus a tracing event.
    pub fn warn(&self, msg: &str) {
        tracing::warn!("{msg}");
        self.append(&self.log_err, msg);
    }

    /// Writes a line to the stderr log only, without a tracing event.
    pub fn note_err(&self, msg: &str) {
        self.append(&self.log_err, msg);
    }

    fn append(&self, path: &Path, msg: &str) {
        if let Ok(mut f) = OpenOptions::new().create(true).append(true).open(path) {
            let _ = writeln!(f, "{msg}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn info_and_warn_land_in_their_files() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("run.log.out");
        let err = dir.path().join("run.log.err");
        let reporter = Reporter::new(&out, &err);

        reporter.info("Aligning contigs to the reference");
        reporter.warn("Failed aligning contigs to reference part chr2.fa");

        let out_text = std::fs::read_to_string(&out).unwrap();
        let err_text = std::fs::read_to_string(&err).unwrap();
        assert!(out_text.contains("Aligning contigs"));
        assert!(err_text.contains("chr2.fa"));
    }

    #[test]
    fn reset_truncates() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("run.log.out");
        let err = dir.path().join("run.log.err");
        let reporter = Reporter::new(&out, &err);

        reporter.info("old");
        reporter.reset();
        assert_eq!(std::fs::read_to_string(&out).unwrap(), "");
    }
}
