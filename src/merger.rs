//! Concatenates the reducer's partial schedule with every sub-problem's
//! schedule into the final schedule (§4.4).
//!
//! Ported from `ResultMerger.merge`.

use crate::domain::ModelResult;
use crate::error::MergeError;

/// Which merge strategy to run (§4.4, §4.4.1).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeMode {
    /// Plain set-union of disjoint package sets (the default; §4.4).
    SetUnion,
    /// Reserved extension point the original source leaves as a bare
    /// `pass` (§4.4, Open Question #2) — not implemented here either.
    Optimize,
}

/// Unions `partial` (from the reducer) with every per-sub-problem result,
/// in the order given. Correctness rests on the pipeline's own
/// guarantee that the reducer's output and every sub-input partition the
/// original input disjointly (§4.4) — `ModelResult::union` surfaces a
/// `DuplicatePackage` error if that invariant was violated upstream.
pub fn merge(
    partial: ModelResult,
    sub_results: Vec<ModelResult>,
    mode: MergeMode,
) -> Result<ModelResult, MergeError> {
    match mode {
        MergeMode::Optimize => Err(MergeError::OptimizeNotImplemented),
        MergeMode::SetUnion => {
            let mut merged = partial;
            for sub in sub_results {
                merged = merged.union(sub)?;
            }
            Ok(merged)
        }
    }
}
