//! The orchestration pipeline for one alignment request.
//!
//! Cache validation gates everything; on a miss the dispatcher drives the
//! engine over every reference unit, the merger builds one canonical
//! delta, the post-processor filters and extracts coordinates (and SNPs
//! when asked), and the run is reduced to one terminal [`AlignStatus`].
//! A fresh fingerprint is committed only on `Ok`.

use crate::cache;
use crate::config::Config;
use crate::dispatch;
use crate::error::{AlignError, Result};
use crate::merge;
use crate::postprocess;
use crate::report::Reporter;
use crate::request::{AlignmentRequest, ArtifactPaths};
use crate::status::AlignStatus;
use crate::tools::AlignerTools;

/// What a finished run hands back: the terminal status plus the paths of
/// whatever artifacts were produced, so callers can report partial results
/// even on `NotAligned`.
#[derive(Debug)]
pub struct AlignOutcome {
    pub status: AlignStatus,
    pub artifacts: ArtifactPaths,
    /// True when a prior run was reused and no subprocess was spawned.
    pub from_cache: bool,
}

impl AlignOutcome {
    fn fresh(status: AlignStatus, artifacts: ArtifactPaths) -> Self {
        AlignOutcome {
            status,
            artifacts,
            from_cache: false,
        }
    }
}

/// Runs one request to a terminal status.
///
/// Returns `Err` only for process-level trouble (missing inputs, a tool
/// that could not be spawned, filesystem errors). Tool exit codes and
/// artifact shape land in the returned status instead.
pub fn align_contigs(
    request: &AlignmentRequest,
    config: &Config,
    tools: &dyn AlignerTools,
) -> Result<AlignOutcome> {
    let paths = ArtifactPaths::from_prefix(&request.output_prefix);
    let reporter = Reporter::new(&paths.log_out, &paths.log_err);

    if cache::is_reusable(request, &paths) {
        reporter.info("Using existing alignments...");
        return Ok(AlignOutcome {
            status: AlignStatus::Ok,
            artifacts: paths,
            from_cache: true,
        });
    }

    if !request.contigs.is_file() {
        return Err(AlignError::FileNotFound(request.contigs.clone()));
    }
    for unit in request.reference.units() {
        if !unit.is_file() {
            return Err(AlignError::FileNotFound(unit.to_path_buf()));
        }
    }

    reporter.reset();
    reporter.info("Aligning contigs to the reference");
    let contigs_label = request.contigs_label();

    let plan = dispatch::plan(request, config, &paths);
    if plan.jobs > 1 {
        reporter.info(&format!(
            "Aligning to different chromosomes in parallel ({} jobs)",
            plan.jobs
        ));
    }
    let results = dispatch::dispatch(&plan, tools, &request.contigs, config, &paths.log_out)?;

    if request.reference.is_split() {
        if !results.iter().any(|r| r.succeeded()) {
            return Ok(AlignOutcome::fresh(AlignStatus::Error, paths));
        }
        reporter.note_err("Stderr outputs for reference parts are in:");
        for invocation in &plan.invocations {
            reporter.note_err(&invocation.log_err.display().to_string());
        }
        merge::merge(
            &results,
            &request.reference_label,
            &request.contigs,
            &contigs_label,
            &paths.delta,
            &reporter,
        )?;
    } else if !results[0].succeeded() {
        return Ok(AlignOutcome::fresh(AlignStatus::Error, paths));
    }

    if !postprocess::filter_delta(tools, config, &paths, &reporter, &contigs_label)? {
        return Ok(AlignOutcome::fresh(AlignStatus::Error, paths));
    }
    if !postprocess::extract_coords(tools, &paths, &reporter, &contigs_label)? {
        return Ok(AlignOutcome::fresh(AlignStatus::Error, paths));
    }

    match crate::status::classify_coords(&paths.coords) {
        AlignStatus::Ok => {}
        degenerate => return Ok(AlignOutcome::fresh(degenerate, paths)),
    }

    if request.want_variants
        && !postprocess::extract_variants(tools, &paths, &reporter, &contigs_label)?
    {
        return Ok(AlignOutcome::fresh(AlignStatus::Error, paths));
    }

    cache::commit(request, &paths)?;
    Ok(AlignOutcome::fresh(AlignStatus::Ok, paths))
}
