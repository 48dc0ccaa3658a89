//! # nucmer-rs: Orchestration for the MUMmer Genome Aligner
//!
//! This library drives the external MUMmer tool suite (`nucmer`,
//! `delta-filter`, `show-coords`, `show-snps`) to evaluate assembled
//! contigs against one or more reference sequences. The alignment
//! algorithm itself is a black box; the value here is the orchestration
//! around it.
//!
//! ## Overview
//!
//! nucmer-rs allows you to:
//! - Align an assembly against a whole reference or a pre-split set of
//!   per-chromosome units, with a bounded worker pool per request
//! - Reuse a previous run's artifacts when a cheap size fingerprint shows
//!   the inputs have not changed
//! - Merge per-unit delta outputs into one canonical, deterministic file,
//!   tolerating individual unit failures
//! - Filter by identity and alignment length, extract a normalized
//!   coordinate table, and optionally extract per-base SNP records
//!
//! ## Example Usage
//!
//! ```no_run
//! # use anyhow::Result;
//! # fn main() -> Result<()> {
//! use nucmer_rs::{AlignmentRequest, Config, ContigAligner};
//!
//! let aligner = ContigAligner::new(Config::builder()
//!     .min_identity(95.0)
//!     .min_alignment_length(100)
//!     .num_threads(8)
//!     .build());
//!
//! let request = AlignmentRequest::new("assembly.fasta", "reference.fasta", "out/assembly")
//!     .with_variants(true);
//! let outcome = aligner.align(&request)?;
//! println!("terminal status: {}", outcome.status);
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! The library is structured in several modules:
//! - `cache`: size-fingerprint validation and commit of reusable runs
//! - `dispatch`: invocation planning and the bounded worker pool
//! - `tools`: the `AlignerTools` capability trait plus the MUMmer
//!   subprocess implementation
//! - `merge`: deterministic concatenation of per-unit deltas
//! - `postprocess`: delta filtering, coordinate and SNP extraction
//! - `status`: the four-state terminal status
//!
//! ## Status space
//!
//! Every request ends in exactly one of `Ok`, `NotAligned` (tools
//! succeeded, nothing usable aligned), `Failed` (an expected artifact is
//! missing despite tool success) or `Error` (every unit failed, or a
//! filter/extraction tool exited nonzero). Nothing is retried internally.

pub mod binary_finder;
pub mod cache;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod merge;
pub mod pipeline;
pub mod postprocess;
pub mod report;
pub mod request;
pub mod status;
pub mod tools;

pub use config::{Config, ConfigBuilder};
pub use error::{AlignError, Result};
pub use pipeline::{align_contigs, AlignOutcome};
pub use postprocess::{read_coords, CoordsRow};
pub use request::{AlignmentRequest, ArtifactPaths, ReferenceTarget};
pub use status::AlignStatus;
pub use tools::{AlignerTools, EngineInvocation, EngineResult, MummerTools};

/// Main interface to the alignment-orchestration pipeline.
///
/// Wraps a configuration plus the production MUMmer tool suite. Code that
/// needs to substitute the tools (tests, alternative engine builds) can
/// call [`pipeline::align_contigs`] with any [`AlignerTools`] directly.
#[derive(Debug)]
pub struct ContigAligner {
    config: Config,
    tools: MummerTools,
}

impl ContigAligner {
    /// Creates a new aligner with the given configuration.
    pub fn new(config: Config) -> Self {
        let tools = MummerTools::from_config(&config);
        ContigAligner { config, tools }
    }

    /// Runs one request to its terminal status.
    ///
    /// # Errors
    /// Returns an error if input files are missing, a MUMmer binary
    /// cannot be found or spawned, or an artifact cannot be written. Tool
    /// exit codes do not produce errors; they land in the outcome status.
    pub fn align(&self, request: &AlignmentRequest) -> Result<AlignOutcome> {
        pipeline::align_contigs(request, &self.config, &self.tools)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builder() {
        let config = Config::builder()
            .min_cluster(65)
            .min_identity(95.0)
            .num_threads(4)
            .build();

        assert_eq!(config.min_cluster, 65);
        assert_eq!(config.min_identity, 95.0);
        assert_eq!(config.num_threads, 4);
    }

    #[test]
    fn aligner_holds_its_config() {
        let aligner = ContigAligner::new(Config::gage());
        assert_eq!(aligner.config().min_alignment_length, 100);
    }
}
