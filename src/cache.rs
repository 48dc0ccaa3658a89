//! Result caching via size fingerprints.
//!
//! A finished run leaves a small `.sf` sidecar recording the byte sizes of
//! the contigs and reference files. A later request with the same output
//! prefix can reuse the on-disk artifacts if the sidecar, the merged delta
//! and the coordinate table are all present and the recorded sizes still
//! match the inputs. Sizes are a cheap structural summary; file contents
//! are never re-read. Any I/O error on this path is a cache miss, never a
//! hard error.

use crate::error::Result;
use crate::request::{AlignmentRequest, ArtifactPaths};
use std::fs;
use std::io::Write;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

/// Structural summary of a request's inputs. Equality is sizes only; the
/// sidecar's timestamp line is informational and never compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fingerprint {
    pub contigs_bytes: u64,
    pub reference_bytes: u64,
}

impl Fingerprint {
    /// Fingerprint of the current on-disk inputs.
    pub fn of(contigs: &Path, reference: &Path) -> std::io::Result<Self> {
        Ok(Fingerprint {
            contigs_bytes: fs::metadata(contigs)?.len(),
            reference_bytes: fs::metadata(reference)?.len(),
        })
    }

    /// Parses a sidecar file; `None` for missing or malformed sidecars.
    pub fn read(sidecar: &Path) -> Option<Self> {
        let text = fs::read_to_string(sidecar).ok()?;
        let mut lines = text.lines();
        let contigs_bytes = trailing_size(lines.next()?)?;
        let reference_bytes = trailing_size(lines.next()?)?;
        Some(Fingerprint {
            contigs_bytes,
            reference_bytes,
        })
    }
}

fn trailing_size(line: &str) -> Option<u64> {
    line.trim().rsplit(' ').next()?.parse().ok()
}

/// Whether a prior run under this request's prefix can be reused.
///
/// True only if the sidecar, merged delta and coordinate table all exist
/// (plus the SNP table when variants were requested) and the recorded
/// sizes match the current inputs exactly.
pub fn is_reusable(request: &AlignmentRequest, paths: &ArtifactPaths) -> bool {
    if !paths.fingerprint.is_file() || !paths.delta.is_file() || !paths.coords.is_file() {
        return false;
    }
    if request.want_variants && !paths.all_snps.is_file() {
        return false;
    }
    let recorded = match Fingerprint::read(&paths.fingerprint) {
        Some(fp) => fp,
        None => return false,
    };
    match Fingerprint::of(&request.contigs, &request.reference_label) {
        Ok(current) => recorded == current,
        Err(_) => false,
    }
}

/// Writes a fresh sidecar for a run that ended `Ok`.
pub fn commit(request: &AlignmentRequest, paths: &ArtifactPaths) -> Result<()> {
    let fp = Fingerprint::of(&request.contigs, &request.reference_label)?;
    let mut f = fs::File::create(&paths.fingerprint)?;
    writeln!(f, "Assembly file size in bytes: {}", fp.contigs_bytes)?;
    writeln!(f, "Reference file size in bytes: {}", fp.reference_bytes)?;
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    writeln!(f, "Successfully finished on {now}")?;
    Ok(())
}
