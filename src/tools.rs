//! Subprocess clients for the MUMmer tool suite.
//!
//! The orchestrator depends only on the [`AlignerTools`] capability trait;
//! [`MummerTools`] is the production implementation that shells out via
//! `std::process::Command`. Tests substitute a mock implementation.
//!
//! Exit codes are returned verbatim and never interpreted here. Only
//! spawn-level failures (binary missing, fork failure) surface as errors.

use crate::binary_finder::find_tool;
use crate::config::Config;
use crate::error::{AlignError, Result};
use crate::request::with_suffix;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// One unit of engine work: align the contigs against one reference unit.
#[derive(Debug, Clone)]
pub struct EngineInvocation {
    /// Reference unit (one chromosome, or the whole reference).
    pub reference_unit: PathBuf,
    /// Output prefix for this unit; the engine writes `<prefix>.delta`.
    pub output_prefix: PathBuf,
    /// Thread share for this invocation.
    pub threads: usize,
    /// Per-unit stderr capture file.
    pub log_err: PathBuf,
}

impl EngineInvocation {
    /// Path of the delta file this invocation writes on success.
    pub fn delta_path(&self) -> PathBuf {
        with_suffix(&self.output_prefix, ".delta")
    }
}

/// Outcome of one engine invocation. Exit code 0 means the unit succeeded;
/// nonzero means the unit failed, which is not necessarily fatal to a
/// multi-unit request.
#[derive(Debug, Clone)]
pub struct EngineResult {
    pub invocation: EngineInvocation,
    pub exit_code: i32,
}

impl EngineResult {
    pub fn succeeded(&self) -> bool {
        self.exit_code == 0
    }
}

/// Capability interface over the external MUMmer tools.
///
/// `Send + Sync` so the dispatcher can drive engine invocations from a
/// bounded pool of worker threads.
pub trait AlignerTools: Send + Sync {
    /// Runs nucmer for one reference unit. Returns the raw exit code.
    ///
    /// The thread share in the invocation is only meaningful for engine
    /// builds with multi-threaded seed extension; the production
    /// implementation passes it as `-t` and therefore requires a
    /// MUMmer >= 4 (or E-MEM) `nucmer`. The classic MUMmer 3 binary
    /// rejects the flag.
    fn nucmer(
        &self,
        invocation: &EngineInvocation,
        contigs: &Path,
        config: &Config,
        log_out: &Path,
    ) -> Result<i32>;

    /// Runs delta-filter over `delta`, stdout captured to `stdout_to`.
    fn delta_filter(
        &self,
        config: &Config,
        delta: &Path,
        stdout_to: &Path,
        log_err: &Path,
    ) -> Result<i32>;

    /// Runs show-coords over `delta`, stdout captured to `stdout_to`.
    fn show_coords(&self, delta: &Path, stdout_to: &Path, log_err: &Path) -> Result<i32>;

    /// Runs show-snps over `delta`, feeding the headless coordinate table
    /// on stdin and capturing the SNP table from stdout.
    fn show_snps(
        &self,
        delta: &Path,
        headless_coords: &Path,
        stdout_to: &Path,
        log_err: &Path,
    ) -> Result<i32>;
}

/// Production tool suite: spawns the real MUMmer binaries.
#[derive(Debug, Default, Clone)]
pub struct MummerTools {
    tool_dir: Option<PathBuf>,
}

impl MummerTools {
    pub fn new(tool_dir: Option<PathBuf>) -> Self {
        MummerTools { tool_dir }
    }

    pub fn from_config(config: &Config) -> Self {
        MummerTools {
            tool_dir: config.tool_dir.clone(),
        }
    }

    fn command(&self, name: &str) -> Result<Command> {
        let binary = find_tool(name, self.tool_dir.as_deref())?;
        Ok(Command::new(binary))
    }

    fn run(mut cmd: Command, tool: &str) -> Result<i32> {
        let status = cmd.status().map_err(|e| AlignError::ToolSpawnFailed {
            tool: tool.to_string(),
            reason: e.to_string(),
        })?;
        // Signal-terminated processes carry no code; treat as failure.
        Ok(status.code().unwrap_or(-1))
    }
}

fn append_to(path: &Path) -> Result<Stdio> {
    let f = OpenOptions::new().create(true).append(true).open(path)?;
    Ok(Stdio::from(f))
}

fn write_to(path: &Path) -> Result<Stdio> {
    let f = std::fs::File::create(path)?;
    Ok(Stdio::from(f))
}

impl AlignerTools for MummerTools {
    // Needs a nucmer that accepts -t (MUMmer >= 4 or E-MEM).
    fn nucmer(
        &self,
        invocation: &EngineInvocation,
        contigs: &Path,
        config: &Config,
        log_out: &Path,
    ) -> Result<i32> {
        let mut cmd = self.command("nucmer")?;
        cmd.arg("-c")
            .arg(config.min_cluster.to_string())
            .arg("-l")
            .arg(config.min_cluster.to_string())
            .arg("--maxmatch")
            .arg("-p")
            .arg(&invocation.output_prefix)
            .arg("-t")
            .arg(invocation.threads.to_string())
            .arg(&invocation.reference_unit)
            .arg(contigs)
            .stdout(append_to(log_out)?)
            .stderr(append_to(&invocation.log_err)?);
        Self::run(cmd, "nucmer")
    }

    fn delta_filter(
        &self,
        config: &Config,
        delta: &Path,
        stdout_to: &Path,
        log_err: &Path,
    ) -> Result<i32> {
        let mut cmd = self.command("delta-filter")?;
        cmd.arg("-i")
            .arg(format!("{}", config.min_identity))
            .arg("-l")
            .arg(config.min_alignment_length.to_string())
            .arg(delta)
            .stdout(write_to(stdout_to)?)
            .stderr(append_to(log_err)?);
        Self::run(cmd, "delta-filter")
    }

    fn show_coords(&self, delta: &Path, stdout_to: &Path, log_err: &Path) -> Result<i32> {
        let mut cmd = self.command("show-coords")?;
        cmd.arg(delta)
            .stdout(write_to(stdout_to)?)
            .stderr(append_to(log_err)?);
        Self::run(cmd, "show-coords")
    }

    fn show_snps(
        &self,
        delta: &Path,
        headless_coords: &Path,
        stdout_to: &Path,
        log_err: &Path,
    ) -> Result<i32> {
        let stdin = std::fs::File::open(headless_coords)?;
        let mut cmd = self.command("show-snps")?;
        cmd.arg("-S")
            .arg("-T")
            .arg("-H")
            .arg(delta)
            .stdin(Stdio::from(stdin))
            .stdout(write_to(stdout_to)?)
            .stderr(append_to(log_err)?);
        Self::run(cmd, "show-snps")
    }
}
