//! The constraint model and its search (§4.3) — the pipeline's
//! centerpiece. `solve` builds a finite-domain model of one sub-input's
//! packages and trucks and searches it to cost-optimality (or a feasible
//! compromise under the wall-clock budget).

pub mod model;
pub mod pool;
pub mod search;
pub mod validate;

use std::collections::BTreeMap;

use tracing::{info, warn};

use crate::domain::truck::TruckId;
use crate::domain::{ModelInput, ModelResult, Package, PackageId};
use crate::error::PlannerError;

/// Terminal status of one sub-problem solve (§4.3 "Search").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveStatus {
    /// A cost-optimal assignment was found and proven optimal.
    Optimal,
    /// A feasible assignment was found but optimality wasn't proven
    /// (the wall-clock budget ran out first) — the pipeline treats this
    /// as success (§7).
    Feasible,
    /// The model was proven to have no feasible assignment.
    Infeasible,
    /// The model itself was invalid (e.g. an empty truck pool).
    ModelInvalid,
    /// The search limit was reached with no feasible solution found.
    Unknown,
}

impl SolveStatus {
    pub fn is_success(self) -> bool {
        matches!(self, SolveStatus::Optimal | SolveStatus::Feasible)
    }
}

/// The outcome of solving one sub-input: its status plus whatever result
/// was produced (empty unless the status is `Optimal`/`Feasible`).
#[derive(Debug, Clone)]
pub struct SolveOutcome {
    pub status: SolveStatus,
    pub result: ModelResult,
    /// Set on `Infeasible`/`ModelInvalid`: the first package the
    /// pre-flight diagnostic could not cover (§4.3.2).
    pub diagnostic: Option<PackageId>,
}

/// Builds and solves the constraint model for `input` (§4.3).
///
/// `partition_index` identifies which sub-input this is among the
/// partitioner's output and seeds the truck-id scope
/// (`TruckId::SOLVER_SCOPE_BASE + partition_index`) so truck ids minted
/// here stay globally unique once `pipeline::run_pipeline` merges every
/// partition's result back together (§9 arena-and-index) — without it,
/// two partitions solved independently would both mint truck 0 in the
/// same scope and the merge would silently overwrite one partition's
/// trucks with another's.
pub fn solve(partition_index: usize, input: &ModelInput) -> Result<SolveOutcome, PlannerError> {
    if input.trucks.is_empty() && !input.packages.is_empty() {
        return Err(PlannerError::ModelConstruction(
            "empty truck pool for a non-empty package set".to_string(),
        ));
    }

    if input.packages.is_empty() {
        return Ok(SolveOutcome {
            status: SolveStatus::Optimal,
            result: ModelResult::default(),
            diagnostic: None,
        });
    }

    let packages: Vec<&Package> = input.packages.values().collect();
    let outcome = search::search(&packages, &input.truck_types, &input.distance_matrix, &input.config);

    if outcome.status.is_success() {
        info!(status = ?outcome.status, groups = outcome.groups.len(), "solve complete");
        let result = assemble_result(partition_index, outcome.groups);
        return Ok(SolveOutcome {
            status: outcome.status,
            result,
            diagnostic: None,
        });
    }

    warn!(status = ?outcome.status, "solve did not find a feasible solution, running pre-flight diagnostic");
    let diagnostic = validate::first_infeasible_package(
        input.packages.iter(),
        &input.trucks,
        &input.distance_matrix,
    );

    let status = if outcome.status == SolveStatus::Infeasible && diagnostic.is_none() {
        // The greedy diagnostic found no single offending package, but the
        // search still proved no joint assignment exists — keep Infeasible,
        // the diagnostic is advisory only (§4.3.2).
        SolveStatus::Infeasible
    } else {
        outcome.status
    };

    Ok(SolveOutcome {
        status,
        result: ModelResult::default(),
        diagnostic,
    })
}

fn assemble_result(partition_index: usize, groups: Vec<model::EvaluatedGroup>) -> ModelResult {
    let mut result = ModelResult::default();
    let mut id_gen = crate::domain::truck::TruckIdGen::new(
        crate::domain::truck::TruckId::SOLVER_SCOPE_BASE + partition_index as u32,
    );

    for evaluated in groups {
        let truck_id = id_gen.next();

        let truck = crate::domain::truck::Truck {
            id: truck_id,
            truck_type: evaluated.truck_type,
        };
        result.trucks.insert(truck_id, truck);

        let mut route = vec![evaluated.group.source().clone()];
        route.extend(evaluated.route.stops.iter().cloned());
        result.truck_route.insert(truck_id, route);

        let per_destination_arrival: BTreeMap<crate::domain::Location, i64> = evaluated
            .route
            .stops
            .iter()
            .zip(evaluated.route.arrival_at_stop.iter())
            .map(|(loc, t)| (loc.clone(), *t))
            .collect();

        let mut package_ids = Vec::with_capacity(evaluated.group.members.len());
        for package in &evaluated.group.members {
            result.packages.insert(package.id.clone(), (*package).clone());
            result.package_truck.insert(package.id.clone(), truck_id);
            result
                .package_start_time
                .insert(package.id.clone(), evaluated.natural_start);
            let arrival = per_destination_arrival
                .get(&package.destination)
                .copied()
                .unwrap_or(evaluated.natural_start);
            result.package_arrival_time.insert(package.id.clone(), arrival);
            package_ids.push(package.id.clone());
        }
        result.truck_packages.insert(truck_id, package_ids);
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PlannerConfig;
    use crate::domain::package::NON_DANGER;
    use crate::domain::truck::TruckType;
    use crate::domain::{DistanceMatrix, Location};
    use std::collections::BTreeMap;
    use std::sync::Arc;

    fn pkg(order: &str, src: &str, dst: &str, danger: &str, avail: i64, deadline: i64) -> Package {
        Package::new(
            PackageId::new(order, "M1", "P1"),
            Location::new(src),
            Location::new(dst),
            5,
            1_000,
            danger,
            avail,
            deadline,
        )
        .unwrap()
    }

    fn input_for(packages: Vec<Package>, distances: Vec<(Location, Location, i64)>) -> ModelInput {
        let map: BTreeMap<PackageId, Package> =
            packages.into_iter().map(|p| (p.id.clone(), p)).collect();
        let truck_types: Vec<TruckType> = TruckType::catalog().to_vec();
        let dm = Arc::new(DistanceMatrix::new(distances));
        let trucks = crate::solver::pool::truck_pool(&map, &truck_types);
        ModelInput::new(map, truck_types, dm, trucks, PlannerConfig::default())
    }

    /// Scenario A: a single package solves to one truck, route
    /// [source, destination], arrival = start + floor(distance/speed).
    #[test]
    fn scenario_a_single_package_single_truck() {
        let input = input_for(
            vec![pkg("O1", "A", "B", NON_DANGER, 100, 1_000_000)],
            vec![(Location::new("A"), Location::new("B"), 36_000)],
        );
        let outcome = solve(0, &input).unwrap();
        assert_eq!(outcome.status, SolveStatus::Optimal);
        assert_eq!(outcome.result.trucks.len(), 1);
        let (truck_id, route) = outcome.result.truck_route.iter().next().unwrap();
        assert_eq!(route, &vec![Location::new("A"), Location::new("B")]);
        let package_id = PackageId::new("O1", "M1", "P1");
        assert_eq!(outcome.result.package_truck[&package_id], *truck_id);
        assert_eq!(outcome.result.package_start_time[&package_id], 100);
        assert_eq!(outcome.result.package_arrival_time[&package_id], 100 + 3_240);
    }

    /// Scenario C: two packages sharing a source/destination but with
    /// conflicting danger types must never share a truck.
    #[test]
    fn scenario_c_conflicting_danger_types_split_trucks() {
        let input = input_for(
            vec![
                pkg("O1", "A", "B", "type_1", 0, 1_000_000),
                pkg("O2", "A", "B", "type_2", 0, 1_000_000),
            ],
            vec![(Location::new("A"), Location::new("B"), 1_000)],
        );
        let outcome = solve(0, &input).unwrap();
        assert!(outcome.status.is_success());
        assert_eq!(outcome.result.trucks.len(), 2);
        let truck_ids: std::collections::HashSet<_> = outcome.result.package_truck.values().collect();
        assert_eq!(truck_ids.len(), 2);
    }

    /// Scenario E: two packages from the same source to two different
    /// destinations, both within the time window, share one truck that
    /// visits both stops with distinct stop indices and the later
    /// arrival respecting `stop_time` plus inter-stop travel.
    #[test]
    fn scenario_e_two_stop_shared_route() {
        let input = input_for(
            vec![
                pkg("O1", "A", "B", NON_DANGER, 0, 1_000_000),
                pkg("O2", "A", "C", NON_DANGER, 0, 1_000_000),
            ],
            vec![
                (Location::new("A"), Location::new("B"), 10_000),
                (Location::new("A"), Location::new("C"), 50_000),
                (Location::new("B"), Location::new("C"), 5_000),
                (Location::new("C"), Location::new("B"), 5_000),
            ],
        );
        let outcome = solve(0, &input).unwrap();
        assert!(outcome.status.is_success());
        assert_eq!(outcome.result.trucks.len(), 1);
        let route = outcome.result.truck_route.values().next().unwrap();
        assert_eq!(route.len(), 3); // source + two stops
        assert_ne!(route[1], route[2]);

        let arrivals: Vec<i64> = outcome.result.package_arrival_time.values().copied().collect();
        let (earlier, later) = (arrivals[0].min(arrivals[1]), arrivals[0].max(arrivals[1]));
        assert!(later >= earlier + input.config.stop_time);
    }

    #[test]
    fn empty_truck_pool_is_model_invalid_for_nonempty_packages() {
        let mut input = input_for(
            vec![pkg("O1", "A", "B", NON_DANGER, 0, 1_000_000)],
            vec![(Location::new("A"), Location::new("B"), 1_000)],
        );
        input.trucks.clear();
        let err = solve(0, &input).unwrap_err();
        assert!(matches!(err, PlannerError::ModelConstruction(_)));
    }
}
