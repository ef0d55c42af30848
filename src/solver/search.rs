//! Depth-bounded branch-and-bound search over the decision variables of
//! §4.3 (§4.3.1): assigns packages to trucks in a fixed variable order,
//! propagating capacity/danger/time-window/deadline constraints eagerly
//! as each assignment is made, and backtracks on violation.
//!
//! This plays the role the CP-SAT engine plays in the original source,
//! without linking a third-party solver (§4.3.1): `Group` accumulates
//! one truck's assignment exactly as `x[t,p]` would, and a finished,
//! fully-assigned leaf is scored with the same objective (§4.3,
//! `solver::model::group_cost`).

use std::time::Instant;

use tracing::debug;

use crate::config::PlannerConfig;
use crate::domain::{DistanceMatrix, Package};
use crate::solver::model::{evaluate_group, EvaluatedGroup, Group};
use crate::solver::SolveStatus;

/// A hard cap on explored search nodes, independent of the wall-clock
/// budget — a backstop against pathological branching on a sub-input
/// whose size still passed the partitioner's cap.
const MAX_NODES: u64 = 200_000;

pub struct SearchOutcome<'a> {
    pub status: SolveStatus,
    pub groups: Vec<EvaluatedGroup<'a>>,
}

pub fn search<'a>(
    packages: &[&'a Package],
    truck_types: &[crate::domain::truck::TruckType],
    distance_matrix: &DistanceMatrix,
    config: &PlannerConfig,
) -> SearchOutcome<'a> {
    if packages.is_empty() {
        return SearchOutcome {
            status: SolveStatus::Optimal,
            groups: Vec::new(),
        };
    }

    let max_area_capacity = truck_types.iter().map(|t| t.area_capacity).max().unwrap_or(0);
    let max_weight_capacity = truck_types.iter().map(|t| t.weight_capacity).max().unwrap_or(0);
    let max_start_in_subproblem = packages.iter().map(|p| p.available_time).max().unwrap_or(0);

    let deadline = Instant::now() + std::time::Duration::from_secs(config.max_time_in_seconds);

    let mut state = SearchState {
        packages,
        truck_types,
        distance_matrix,
        config,
        max_area_capacity,
        max_weight_capacity,
        max_start_in_subproblem,
        deadline,
        nodes: 0,
        budget_exhausted: false,
        best: None,
    };

    let mut groups: Vec<Group<'a>> = Vec::new();
    state.assign(0, &mut groups);

    match state.best {
        Some((_, groups)) if state.budget_exhausted => SearchOutcome {
            status: SolveStatus::Feasible,
            groups,
        },
        Some((_, groups)) => SearchOutcome {
            status: SolveStatus::Optimal,
            groups,
        },
        None if state.budget_exhausted => SearchOutcome {
            status: SolveStatus::Unknown,
            groups: Vec::new(),
        },
        None => SearchOutcome {
            status: SolveStatus::Infeasible,
            groups: Vec::new(),
        },
    }
}

struct SearchState<'a, 'b> {
    packages: &'b [&'a Package],
    truck_types: &'b [crate::domain::truck::TruckType],
    distance_matrix: &'b DistanceMatrix,
    config: &'b PlannerConfig,
    max_area_capacity: i64,
    max_weight_capacity: i64,
    max_start_in_subproblem: i64,
    deadline: Instant,
    nodes: u64,
    budget_exhausted: bool,
    best: Option<(i64, Vec<EvaluatedGroup<'a>>)>,
}

impl<'a, 'b> SearchState<'a, 'b> {
    /// Assigns `packages[index..]`, recursing depth-first. `groups` holds
    /// the in-progress truck clusters for `packages[..index]`.
    fn assign(&mut self, index: usize, groups: &mut Vec<Group<'a>>) {
        if self.budget_exhausted {
            return;
        }
        self.nodes += 1;
        if self.nodes % 64 == 0 && (self.nodes >= MAX_NODES || Instant::now() >= self.deadline) {
            self.budget_exhausted = true;
            return;
        }

        if index == self.packages.len() {
            self.evaluate_leaf(groups);
            return;
        }

        let package = self.packages[index];

        // Branch 1: join each existing compatible group.
        for gi in 0..groups.len() {
            if groups[gi].can_accept(
                package,
                self.config,
                self.max_area_capacity,
                self.max_weight_capacity,
            ) {
                groups[gi].push(package);
                self.assign(index + 1, groups);
                groups[gi].pop_last(package);
                if self.budget_exhausted {
                    return;
                }
            }
        }

        // Branch 2: open a fresh group for this package.
        let mut fresh = Group::default();
        fresh.push(package);
        groups.push(fresh);
        self.assign(index + 1, groups);
        groups.pop();
    }

    fn evaluate_leaf(&mut self, groups: &[Group<'a>]) {
        let mut evaluated = Vec::with_capacity(groups.len());
        let mut total_cost = 0i64;

        for group in groups {
            match evaluate_group(
                group.clone(),
                self.truck_types,
                self.distance_matrix,
                self.config,
                self.max_start_in_subproblem,
            ) {
                Some(eg) => {
                    total_cost += eg.cost;
                    evaluated.push(eg);
                }
                None => return, // this leaf violates C10 or C11 for every type
            }
        }

        let is_better = self.best.as_ref().map(|(c, _)| total_cost < *c).unwrap_or(true);
        if is_better {
            debug!(cost = total_cost, groups = evaluated.len(), "new best leaf");
            self.best = Some((total_cost, evaluated));
        }
    }
}

impl<'a> Group<'a> {
    /// Undoes the most recent `push`, used by the search's backtracking.
    /// Only ever called to undo the package that was just pushed, so a
    /// full recompute from the remaining members is correct and simple.
    fn pop_last(&mut self, just_pushed: &'a Package) {
        debug_assert_eq!(self.members.last().copied().map(|p| &p.id), Some(&just_pushed.id));
        self.members.pop();
        *self = Self::rebuild(std::mem::take(&mut self.members));
    }

    fn rebuild(members: Vec<&'a Package>) -> Self {
        let mut group = Group::default();
        for m in members {
            group.push(m);
        }
        group
    }
}
