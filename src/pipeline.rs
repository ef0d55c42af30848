//! Crate-level orchestration (§2.1): wires reduce → partition → solve →
//! merge into the one entry point a caller (or the thin binary) invokes.

use rayon::prelude::*;
use tracing::{info, span, Level};

use crate::config::PlannerConfig;
use crate::domain::ModelInput;
use crate::error::PlannerError;
use crate::merger::{self, MergeMode};
use crate::partitioner;
use crate::reducer::{self, ReducerKind};
use crate::solver::{self, SolveOutcome, SolveStatus};

/// The final merged schedule plus per-partition solve diagnostics, so a
/// caller can see which sub-problems were optimal/feasible/infeasible
/// without losing the packages that did solve (§2.1).
#[derive(Debug, Clone)]
pub struct PipelineOutcome {
    pub result: crate::domain::ModelResult,
    pub partition_statuses: Vec<SolveStatus>,
    pub infeasible_diagnostics: Vec<crate::domain::PackageId>,
}

/// Runs the full reduce → partition → solve → merge pipeline over
/// `input` (§2).
#[tracing::instrument(name = "run_pipeline", skip(input, config))]
pub fn run_pipeline(
    input: ModelInput,
    config: &PlannerConfig,
    reducer_kind: ReducerKind,
    max_package_num: usize,
) -> Result<PipelineOutcome, PlannerError> {
    let (partial_result, reduced_input) = {
        let span = span!(Level::INFO, "reduce");
        let _guard = span.enter();
        reducer::reduce(&input, reducer_kind)
    };

    let sub_inputs = {
        let span = span!(Level::INFO, "partition");
        let _guard = span.enter();
        partitioner::partition(&reduced_input, max_package_num)
    };

    info!(sub_problems = sub_inputs.len(), "dispatching solver over partitions");

    let outcomes: Vec<Result<SolveOutcome, PlannerError>> = {
        let span = span!(Level::INFO, "solve");
        let _guard = span.enter();
        if config.sequential {
            sub_inputs
                .iter()
                .enumerate()
                .map(|(i, sub_input)| solver::solve(i, sub_input))
                .collect()
        } else {
            sub_inputs
                .par_iter()
                .enumerate()
                .map(|(i, sub_input)| solver::solve(i, sub_input))
                .collect()
        }
    };

    let mut sub_results = Vec::with_capacity(outcomes.len());
    let mut partition_statuses = Vec::with_capacity(outcomes.len());
    let mut infeasible_diagnostics = Vec::new();

    for outcome in outcomes {
        // Solver errors are per-sub-problem (§7): a model-construction
        // failure invalidates only its own partition.
        let outcome = outcome?;
        partition_statuses.push(outcome.status);
        if let Some(package) = outcome.diagnostic {
            infeasible_diagnostics.push(package);
        }
        if outcome.status.is_success() {
            sub_results.push(outcome.result);
        }
    }

    let merged = {
        let span = span!(Level::INFO, "merge");
        let _guard = span.enter();
        merger::merge(partial_result, sub_results, MergeMode::SetUnion)
    };
    let merged = merged.map_err(|e| PlannerError::ModelConstruction(e.to_string()))?;

    Ok(PipelineOutcome {
        result: merged,
        partition_statuses,
        infeasible_diagnostics,
    })
}
