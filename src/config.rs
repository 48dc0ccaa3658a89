//! Configuration options for alignment-orchestration runs.
//!
//! This module provides a builder pattern for configuring the nucmer
//! invocation parameters and the post-filtering thresholds, allowing
//! fine-tuned control over sensitivity and parallelism.

use std::path::PathBuf;

/// Configuration for a contig-to-reference alignment run.
///
/// This struct contains all parameters that control how nucmer is invoked
/// and how its output is filtered. Use the builder pattern to construct
/// configurations with non-default values.
///
/// # Default Values
/// - `min_cluster`: 65 (nucmer `-c`/`-l` seed cluster length)
/// - `min_identity`: 95.0 (percent, delta-filter `-i`)
/// - `min_alignment_length`: 0 (delta-filter `-l`)
/// - `num_threads`: Number of CPU cores
/// - `parallelism_allowed`: true
#[derive(Debug, Clone)]
pub struct Config {
    /// Minimum cluster/seed length passed to nucmer (`-c` and `-l`)
    pub min_cluster: usize,

    /// Minimum identity percent (0.0-100.0) kept by delta-filter (`-i`)
    pub min_identity: f64,

    /// Minimum alignment length in bp kept by delta-filter (`-l`)
    pub min_alignment_length: usize,

    /// Total thread budget for the run, split across reference units
    pub num_threads: usize,

    /// Whether per-chromosome fan-out may run in parallel.
    ///
    /// A caller that is itself one worker of a bounded pool must set this
    /// to false so nested dispatch does not oversubscribe the machine;
    /// the dispatcher then runs units one at a time with one thread each.
    pub parallelism_allowed: bool,

    /// Directory holding the MUMmer binaries, overriding discovery
    pub tool_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            min_cluster: 65,
            min_identity: 95.0,
            min_alignment_length: 0,
            num_threads: num_cpus::get().max(1),
            parallelism_allowed: true,
            tool_dir: None,
        }
    }
}

impl Config {
    /// Creates a new configuration builder.
    ///
    /// # Example
    /// ```
    /// use nucmer_rs::Config;
    ///
    /// let config = Config::builder()
    ///     .min_cluster(50)
    ///     .min_identity(90.0)
    ///     .num_threads(4)
    ///     .build();
    /// ```
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }
}

/// Builder for constructing Config instances.
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Sets the nucmer minimum cluster length (`-c`, also used for `-l`).
    ///
    /// Default: 65
    pub fn min_cluster(mut self, length: usize) -> Self {
        self.config.min_cluster = length;
        self
    }

    /// Sets the minimum identity percent kept by delta-filter.
    ///
    /// Value should be between 0.0 and 100.0.
    /// Default: 95.0
    pub fn min_identity(mut self, percent: f64) -> Self {
        assert!(
            (0.0..=100.0).contains(&percent),
            "Identity must be between 0.0 and 100.0 percent"
        );
        self.config.min_identity = percent;
        self
    }

    /// Sets the minimum alignment length kept by delta-filter.
    ///
    /// Default: 0 (no length filtering)
    pub fn min_alignment_length(mut self, length: usize) -> Self {
        self.config.min_alignment_length = length;
        self
    }

    /// Sets the total thread budget for the run.
    ///
    /// Default: Number of CPU cores
    pub fn num_threads(mut self, threads: usize) -> Self {
        assert!(threads > 0, "Number of threads must be positive");
        self.config.num_threads = threads;
        self
    }

    /// Allows or forbids parallel fan-out over reference units.
    ///
    /// Default: true
    pub fn parallelism_allowed(mut self, allowed: bool) -> Self {
        self.config.parallelism_allowed = allowed;
        self
    }

    /// Sets an explicit directory for the MUMmer binaries.
    ///
    /// Default: None (discovered via `MUMMER_BIN` or `PATH`)
    pub fn tool_dir(mut self, dir: PathBuf) -> Self {
        self.config.tool_dir = Some(dir);
        self
    }

    /// Builds the final Config instance.
    pub fn build(self) -> Config {
        self.config
    }
}

/// Preset configurations for common use cases.
impl Config {
    /// Permissive preset for diverged assemblies.
    ///
    /// - Shorter seed clusters (40 bp)
    /// - Lower identity threshold (80%)
    pub fn diverged_assemblies() -> Self {
        Config {
            min_cluster: 40,
            min_identity: 80.0,
            ..Default::default()
        }
    }

    /// Strict preset mirroring the GAGE evaluation defaults.
    ///
    /// - 95% identity, 100 bp minimum alignment length
    pub fn gage() -> Self {
        Config {
            min_identity: 95.0,
            min_alignment_length: 100,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_overrides_defaults() {
        let config = Config::builder()
            .min_cluster(50)
            .min_identity(90.0)
            .min_alignment_length(100)
            .num_threads(4)
            .parallelism_allowed(false)
            .build();

        assert_eq!(config.min_cluster, 50);
        assert_eq!(config.min_identity, 90.0);
        assert_eq!(config.min_alignment_length, 100);
        assert_eq!(config.num_threads, 4);
        assert!(!config.parallelism_allowed);
    }

    #[test]
    #[should_panic]
    fn identity_over_100_rejected() {
        let _ = Config::builder().min_identity(150.0);
    }
}
