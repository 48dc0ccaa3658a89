//! Request and artifact types for one alignment run.
//!
//! An [`AlignmentRequest`] is created per (contigs, reference) pair and is
//! immutable once built. All on-disk artifacts of a run hang off the
//! request's output prefix, which together with the size fingerprint acts
//! as the cache key for a later identical request.

use std::path::{Path, PathBuf};

/// The alignment target: either one whole reference or a pre-split list
/// of per-chromosome units.
///
/// Splitting the reference into units is the caller's job; the dispatcher
/// only fans out over whatever units it is handed.
#[derive(Debug, Clone)]
pub enum ReferenceTarget {
    /// Align against the reference as a single sequence file.
    Whole(PathBuf),
    /// Align against each unit separately and merge the deltas.
    Split(Vec<PathBuf>),
}

impl ReferenceTarget {
    /// Every unit this target aligns against, in supplied order.
    pub fn units(&self) -> Vec<&Path> {
        match self {
            ReferenceTarget::Whole(p) => vec![p.as_path()],
            ReferenceTarget::Split(units) => units.iter().map(PathBuf::as_path).collect(),
        }
    }

    pub fn is_split(&self) -> bool {
        matches!(self, ReferenceTarget::Split(_))
    }
}

/// One contig-to-reference alignment request.
#[derive(Debug, Clone)]
pub struct AlignmentRequest {
    /// Assembly (contigs) FASTA path.
    pub contigs: PathBuf,
    /// Reference to align against, whole or pre-split.
    pub reference: ReferenceTarget,
    /// Whole-reference path used for the delta header and the fingerprint.
    pub reference_label: PathBuf,
    /// Prefix for every artifact this run produces.
    pub output_prefix: PathBuf,
    /// Also extract per-base SNP records via show-snps.
    pub want_variants: bool,
}

impl AlignmentRequest {
    /// Builds a request against one whole reference.
    pub fn new(contigs: impl Into<PathBuf>, reference: impl Into<PathBuf>, output_prefix: impl Into<PathBuf>) -> Self {
        let reference = reference.into();
        AlignmentRequest {
            contigs: contigs.into(),
            reference_label: reference.clone(),
            reference: ReferenceTarget::Whole(reference),
            output_prefix: output_prefix.into(),
            want_variants: false,
        }
    }

    /// Builds a request against a pre-split reference. `reference_label`
    /// names the whole reference for header and fingerprint purposes.
    pub fn split(
        contigs: impl Into<PathBuf>,
        units: Vec<PathBuf>,
        reference_label: impl Into<PathBuf>,
        output_prefix: impl Into<PathBuf>,
    ) -> Self {
        AlignmentRequest {
            contigs: contigs.into(),
            reference: ReferenceTarget::Split(units),
            reference_label: reference_label.into(),
            output_prefix: output_prefix.into(),
            want_variants: false,
        }
    }

    pub fn with_variants(mut self, want: bool) -> Self {
        self.want_variants = want;
        self
    }

    /// Short label for the assembly, used in warnings and log lines.
    pub fn contigs_label(&self) -> String {
        self.contigs
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.contigs.display().to_string())
    }
}

/// Appends a suffix to a path without touching its existing extension.
pub(crate) fn with_suffix(prefix: &Path, suffix: &str) -> PathBuf {
    let mut s = prefix.as_os_str().to_os_string();
    s.push(suffix);
    PathBuf::from(s)
}

/// Every on-disk artifact of one run, derived from the output prefix.
///
/// The `.unaligned` and `.used_snps` paths are not written by this crate;
/// they are reserved for downstream consumers that key on the same prefix.
#[derive(Debug, Clone)]
pub struct ArtifactPaths {
    /// Merged (then filtered, in place) delta file.
    pub delta: PathBuf,
    /// Scratch path for the filtered delta before it replaces `delta`.
    pub filtered_delta: PathBuf,
    /// Normalized coordinate table.
    pub coords: PathBuf,
    /// Coordinate table after downstream filtering (reserved).
    pub coords_filtered: PathBuf,
    /// Unaligned-contig report (reserved).
    pub unaligned: PathBuf,
    /// SNP table written by show-snps when variants are requested.
    pub all_snps: PathBuf,
    /// SNPs actually used downstream (reserved).
    pub used_snps: PathBuf,
    /// Fingerprint sidecar marking a successfully finished run.
    pub fingerprint: PathBuf,
    /// Captured stdout of every tool invocation.
    pub log_out: PathBuf,
    /// Captured stderr of every tool invocation.
    pub log_err: PathBuf,
}

impl ArtifactPaths {
    pub fn from_prefix(prefix: &Path) -> Self {
        ArtifactPaths {
            delta: with_suffix(prefix, ".delta"),
            filtered_delta: with_suffix(prefix, ".fdelta"),
            coords: with_suffix(prefix, ".coords"),
            coords_filtered: with_suffix(prefix, ".coords.filtered"),
            unaligned: with_suffix(prefix, ".unaligned"),
            all_snps: with_suffix(prefix, ".all_snps"),
            used_snps: with_suffix(prefix, ".used_snps"),
            fingerprint: with_suffix(prefix, ".sf"),
            log_out: with_suffix(prefix, ".log.out"),
            log_err: with_suffix(prefix, ".log.err"),
        }
    }
}
