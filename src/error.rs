use thiserror::Error;

use crate::domain::package::PackageId;

/// The error taxonomy of the planning pipeline.
///
/// Reducer and partitioner errors are always fatal; solver errors are
/// scoped to a single sub-problem and do not invalidate the others (see
/// `solver::SolveOutcome`).
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PlannerError {
    #[error("input schema error: {0}")]
    InputSchema(String),

    #[error("package {package:?} is infeasible: {reason}")]
    Feasibility { package: PackageId, reason: String },

    #[error("model construction error: {0}")]
    ModelConstruction(String),

    #[error("unknown objective: {0}")]
    UnknownObjective(String),
}

/// Errors raised by the merger. Kept separate from `PlannerError` since a
/// merge failure is never fatal to the caller the way a reducer/solver
/// error is — the merger is defined as tolerant (§4.4).
#[derive(Debug, Error, Clone, PartialEq)]
pub enum MergeError {
    #[error("package {0:?} appears in more than one partial result")]
    DuplicatePackage(PackageId),

    #[error("the `optimize` merge mode is a reserved extension point and is not implemented")]
    OptimizeNotImplemented,
}
