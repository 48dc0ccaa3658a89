//! Planning and dispatch of per-unit engine invocations.
//!
//! A whole reference becomes a single invocation with the full thread
//! budget. A pre-split reference becomes one invocation per unit, run by a
//! bounded pool of worker threads. Each unit writes to its own uniquely
//! prefixed output files, so workers never contend on a path; results are
//! returned in the supplied unit order regardless of completion order.

use crate::config::Config;
use crate::error::{AlignError, Result};
use crate::request::{with_suffix, AlignmentRequest, ArtifactPaths, ReferenceTarget};
use crate::tools::{AlignerTools, EngineInvocation, EngineResult};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::thread;

/// The invocations for one request plus the worker-pool size to run them
/// with.
#[derive(Debug)]
pub struct DispatchPlan {
    pub invocations: Vec<EngineInvocation>,
    /// Bounded pool size; 1 when fan-out is disallowed or pointless.
    pub jobs: usize,
}

/// Computes the invocation list and parallelism budget for a request.
///
/// Parallel fan-out is permitted only at the outermost level: when
/// `config.parallelism_allowed` is false the plan degrades to one job with
/// one thread per unit, so a nested caller never multiplies workers.
pub fn plan(request: &AlignmentRequest, config: &Config, paths: &ArtifactPaths) -> DispatchPlan {
    match &request.reference {
        ReferenceTarget::Whole(reference) => DispatchPlan {
            invocations: vec![EngineInvocation {
                reference_unit: reference.clone(),
                output_prefix: request.output_prefix.clone(),
                threads: config.num_threads.max(1),
                log_err: paths.log_err.clone(),
            }],
            jobs: 1,
        },
        ReferenceTarget::Split(units) => {
            let (jobs, threads) = if config.parallelism_allowed {
                let jobs = config.num_threads.min(units.len()).max(1);
                (jobs, (config.num_threads / jobs).max(1))
            } else {
                (1, 1)
            };
            let invocations = units
                .iter()
                .enumerate()
                .map(|(i, unit)| EngineInvocation {
                    reference_unit: unit.clone(),
                    output_prefix: unit_prefix(&request.output_prefix, unit),
                    threads,
                    log_err: with_suffix(&paths.log_err, &format!("_part{}", i + 1)),
                })
                .collect();
            DispatchPlan { invocations, jobs }
        }
    }
}

fn unit_prefix(prefix: &Path, unit: &Path) -> std::path::PathBuf {
    let basename = unit
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "unit".to_string());
    with_suffix(prefix, &format!("_{basename}"))
}

/// Runs every invocation, at most `plan.jobs` at a time, and returns all
/// results in invocation order.
///
/// A unit exiting nonzero is recorded, not propagated: dispatch never
/// short-circuits on one unit's failure. Only spawn-level failures (engine
/// binary missing, fork failure) abort the run.
pub fn dispatch(
    plan: &DispatchPlan,
    tools: &dyn AlignerTools,
    contigs: &Path,
    config: &Config,
    log_out: &Path,
) -> Result<Vec<EngineResult>> {
    let total = plan.invocations.len();
    if plan.jobs <= 1 || total <= 1 {
        let mut results = Vec::with_capacity(total);
        for invocation in &plan.invocations {
            let exit_code = tools.nucmer(invocation, contigs, config, log_out)?;
            results.push(EngineResult {
                invocation: invocation.clone(),
                exit_code,
            });
        }
        return Ok(results);
    }

    let next = AtomicUsize::new(0);
    let slots: Mutex<Vec<Option<Result<EngineResult>>>> =
        Mutex::new((0..total).map(|_| None).collect());

    thread::scope(|s| {
        for _ in 0..plan.jobs {
            s.spawn(|| loop {
                let i = next.fetch_add(1, Ordering::SeqCst);
                if i >= total {
                    break;
                }
                let invocation = &plan.invocations[i];
                let outcome = tools
                    .nucmer(invocation, contigs, config, log_out)
                    .map(|exit_code| EngineResult {
                        invocation: invocation.clone(),
                        exit_code,
                    });
                let mut slots = slots.lock().unwrap_or_else(|e| e.into_inner());
                slots[i] = Some(outcome);
            });
        }
    });

    let slots = slots.into_inner().unwrap_or_else(|e| e.into_inner());
    let mut results = Vec::with_capacity(total);
    for slot in slots {
        match slot {
            Some(outcome) => results.push(outcome?),
            None => return Err(AlignError::Other("engine worker dropped a unit".to_string())),
        }
    }
    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::AlignmentRequest;
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;
    use std::sync::atomic::AtomicUsize;

    fn split_request(units: usize) -> (AlignmentRequest, ArtifactPaths) {
        let unit_paths: Vec<PathBuf> = (1..=units)
            .map(|i| PathBuf::from(format!("ref/chr{i}.fa")))
            .collect();
        let request =
            AlignmentRequest::split("asm.fa", unit_paths, "ref/genome.fa", "out/asm");
        let paths = ArtifactPaths::from_prefix(&request.output_prefix);
        (request, paths)
    }

    #[test]
    fn whole_reference_gets_one_invocation_with_full_budget() {
        let request = AlignmentRequest::new("asm.fa", "ref.fa", "out/asm");
        let paths = ArtifactPaths::from_prefix(&request.output_prefix);
        let config = Config::builder().num_threads(8).build();

        let plan = plan(&request, &config, &paths);
        assert_eq!(plan.jobs, 1);
        assert_eq!(plan.invocations.len(), 1);
        assert_eq!(plan.invocations[0].threads, 8);
        assert_eq!(plan.invocations[0].output_prefix, PathBuf::from("out/asm"));
    }

    #[test]
    fn split_reference_divides_the_thread_budget() {
        let (request, paths) = split_request(3);
        let config = Config::builder().num_threads(8).build();

        let plan = plan(&request, &config, &paths);
        assert_eq!(plan.jobs, 3);
        assert_eq!(plan.invocations.len(), 3);
        for inv in &plan.invocations {
            assert_eq!(inv.threads, 2); // floor(8 / 3), min 1
        }
        assert_eq!(
            plan.invocations[1].output_prefix,
            PathBuf::from("out/asm_chr2.fa")
        );
        assert_eq!(
            plan.invocations[1].log_err,
            PathBuf::from("out/asm.log.err_part2")
        );
    }

    #[test]
    fn nested_dispatch_is_forced_serial() {
        let (request, paths) = split_request(4);
        let config = Config::builder()
            .num_threads(8)
            .parallelism_allowed(false)
            .build();

        let plan = plan(&request, &config, &paths);
        assert_eq!(plan.jobs, 1);
        for inv in &plan.invocations {
            assert_eq!(inv.threads, 1);
        }
    }

    #[test]
    fn more_units_than_threads_keeps_one_thread_each() {
        let (request, paths) = split_request(6);
        let config = Config::builder().num_threads(4).build();

        let plan = plan(&request, &config, &paths);
        assert_eq!(plan.jobs, 4);
        for inv in &plan.invocations {
            assert_eq!(inv.threads, 1);
        }
    }

    /// Records invocation order while returning a canned exit code per unit.
    struct ScriptedEngine {
        codes: Vec<i32>,
        calls: AtomicUsize,
    }

    impl AlignerTools for ScriptedEngine {
        fn nucmer(
            &self,
            invocation: &EngineInvocation,
            _contigs: &Path,
            _config: &Config,
            _log_out: &Path,
        ) -> Result<i32> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let idx = invocation
                .reference_unit
                .to_string_lossy()
                .chars()
                .filter_map(|c| c.to_digit(10))
                .last()
                .unwrap() as usize;
            Ok(self.codes[idx - 1])
        }

        fn delta_filter(&self, _: &Config, _: &Path, _: &Path, _: &Path) -> Result<i32> {
            unreachable!("dispatch only runs the engine")
        }

        fn show_coords(&self, _: &Path, _: &Path, _: &Path) -> Result<i32> {
            unreachable!("dispatch only runs the engine")
        }

        fn show_snps(&self, _: &Path, _: &Path, _: &Path, _: &Path) -> Result<i32> {
            unreachable!("dispatch only runs the engine")
        }
    }

    #[test]
    fn dispatch_returns_results_in_unit_order_and_never_short_circuits() {
        let (request, paths) = split_request(3);
        let config = Config::builder().num_threads(3).build();
        let plan = plan(&request, &config, &paths);

        let engine = ScriptedEngine {
            codes: vec![0, 1, 0],
            calls: AtomicUsize::new(0),
        };
        let results = dispatch(&plan, &engine, &request.contigs, &config, &paths.log_out).unwrap();

        assert_eq!(engine.calls.load(Ordering::SeqCst), 3);
        let codes: Vec<i32> = results.iter().map(|r| r.exit_code).collect();
        assert_eq!(codes, vec![0, 1, 0]);
        assert!(results[0].succeeded());
        assert!(!results[1].succeeded());
    }
}
