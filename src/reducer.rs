//! The greedy pre-solver (§4.1): prunes "obviously packable" orders or
//! destination groups into fresh full trucks before the expensive solver
//! ever sees them.
//!
//! Two sibling heuristics share the signature
//! `(&ModelInput) -> (ModelResult, ModelInput)`, matching the original
//! source's `SearchSpaceReducer.reduce1`/`reduce2` pair (§9 polymorphism
//! via sibling procedures, not inheritance).

use std::collections::BTreeMap;

use tracing::info;

use crate::domain::package::NON_DANGER;
use crate::domain::truck::{Truck, TruckIdGen};
use crate::domain::{ModelInput, ModelResult, Package, PackageId};

/// Selects which greedy heuristic the reducer stage runs (§4.1.1).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReducerKind {
    /// H1 — per-order packing.
    PerOrder,
    /// H2 — per-destination packing.
    PerDestination,
}

/// Runs the selected heuristic and returns `(partial_result, reduced_input)`
/// — the order the distilled spec's §2 names them in.
pub fn reduce(input: &ModelInput, kind: ReducerKind) -> (ModelResult, ModelInput) {
    match kind {
        ReducerKind::PerOrder => reduce_per_order(input),
        ReducerKind::PerDestination => reduce_per_destination(input),
    }
}

/// H1: group by order_id, greedily fill the largest truck type in
/// iteration order, commit on saturation.
///
/// Asserts the reducer's documented assumption: every package in one
/// order shares source, destination, available_time, and danger_type.
fn reduce_per_order(input: &ModelInput) -> (ModelResult, ModelInput) {
    let threshold = input.config.reduce_threshold;
    let truck_type = input.truck_types[0]; // sorted largest-capacity first (§3)

    let mut by_order: BTreeMap<&str, Vec<&Package>> = BTreeMap::new();
    for package in input.packages.values() {
        by_order.entry(&package.id.order_id).or_default().push(package);
    }

    for (order_id, packages) in &by_order {
        let sources: std::collections::HashSet<_> = packages.iter().map(|p| &p.source).collect();
        let destinations: std::collections::HashSet<_> =
            packages.iter().map(|p| &p.destination).collect();
        let available_times: std::collections::HashSet<_> =
            packages.iter().map(|p| p.available_time).collect();
        let danger_types: std::collections::HashSet<_> =
            packages.iter().map(|p| &p.danger_type).collect();
        assert!(
            sources.len() == 1 && destinations.len() == 1,
            "order {order_id} spans more than one source/destination"
        );
        assert!(
            available_times.len() == 1 && danger_types.len() == 1,
            "order {order_id} spans more than one available_time/danger_type"
        );
    }

    let mut result = ModelResult::default();
    let mut id_gen = TruckIdGen::new(crate::domain::truck::TruckId::REDUCER_SCOPE);

    for packages in by_order.values() {
        commit_saturated_batches(packages, &mut result, &mut id_gen, input, truck_type, threshold);
    }

    finish(input, result)
}

/// H2: group by destination, sort by (available_time, danger_type,
/// order_id), greedily pack respecting capacity, danger compatibility,
/// and the time window.
fn reduce_per_destination(input: &ModelInput) -> (ModelResult, ModelInput) {
    let threshold = input.config.reduce_threshold;
    let truck_type = input.truck_types[0];
    let max_gap = input.config.max_time_difference_between_package;

    let mut by_destination: BTreeMap<&crate::domain::Location, Vec<&Package>> = BTreeMap::new();
    for package in input.packages.values() {
        by_destination.entry(&package.destination).or_default().push(package);
    }

    let mut result = ModelResult::default();
    let mut id_gen = TruckIdGen::new(crate::domain::truck::TruckId::REDUCER_SCOPE);

    for packages in by_destination.values_mut() {
        packages.sort_by(|a, b| {
            (a.available_time, &a.danger_type, &a.id.order_id).cmp(&(
                b.available_time,
                &b.danger_type,
                &b.id.order_id,
            ))
        });

        let mut candidates: Vec<&Package> = Vec::new();
        let mut total_area = 0i64;
        let mut total_weight = 0i64;
        let mut danger_tag: Option<&str> = None;
        let mut min_available_time = i64::MAX;

        for package in packages.iter().copied() {
            let fits_capacity = total_area + package.area <= truck_type.area_capacity
                && total_weight + package.weight <= truck_type.weight_capacity;
            if !fits_capacity {
                candidates.clear();
                total_area = 0;
                total_weight = 0;
                danger_tag = None;
                min_available_time = i64::MAX;
                continue;
            }

            let is_dangerous = package.danger_type != NON_DANGER;
            let compatible = match (is_dangerous, danger_tag) {
                (false, _) => true,
                (true, None) => true,
                (true, Some(existing)) => existing == package.danger_type,
            };
            if !compatible {
                continue;
            }
            if !candidates.is_empty()
                && (package.available_time - min_available_time).abs() > max_gap
            {
                continue;
            }

            candidates.push(package);
            total_area += package.area;
            total_weight += package.weight;
            if is_dangerous && danger_tag.is_none() {
                danger_tag = Some(&package.danger_type);
            }
            min_available_time = min_available_time.min(package.available_time);

            if total_area as f64 > truck_type.area_capacity as f64 * threshold
                || total_weight as f64 > truck_type.weight_capacity as f64 * threshold
            {
                commit(&candidates, &mut result, &mut id_gen, input, truck_type);
                candidates.clear();
                total_area = 0;
                total_weight = 0;
                danger_tag = None;
                min_available_time = i64::MAX;
            }
        }
    }

    finish(input, result)
}

/// Shared "fill, check saturation, commit" loop for H1 (§4.1: accumulate
/// unconditionally, commit whenever the threshold is crossed — unlike
/// H2, nothing in the per-order heuristic's spec text gates a package on
/// the *raw* capacity first, so a large enough package can legitimately
/// carry the running total past the threshold in one step, per Scenario
/// B (ten packages at 30% apiece commit in chunks of four, cumulative
/// 120%, not three)).
fn commit_saturated_batches(
    packages: &[&Package],
    result: &mut ModelResult,
    id_gen: &mut TruckIdGen,
    input: &ModelInput,
    truck_type: crate::domain::truck::TruckType,
    threshold: f64,
) {
    let mut candidates: Vec<&Package> = Vec::new();
    let mut total_area = 0i64;
    let mut total_weight = 0i64;

    for package in packages {
        candidates.push(package);
        total_area += package.area;
        total_weight += package.weight;

        if total_area as f64 > truck_type.area_capacity as f64 * threshold
            || total_weight as f64 > truck_type.weight_capacity as f64 * threshold
        {
            commit(&candidates, result, id_gen, input, truck_type);
            candidates.clear();
            total_area = 0;
            total_weight = 0;
        }
    }
}

/// Commits a saturated batch to a fresh truck of `truck_type` (§4.1
/// "Commit semantics").
fn commit(
    candidates: &[&Package],
    result: &mut ModelResult,
    id_gen: &mut TruckIdGen,
    input: &ModelInput,
    truck_type: crate::domain::truck::TruckType,
) {
    if candidates.is_empty() {
        return;
    }

    let truck_id = id_gen.next();
    let truck = Truck { id: truck_id, truck_type };

    let start_time = candidates.iter().map(|p| p.available_time).max().unwrap();
    let first = candidates[0];
    let distance = input
        .distance_matrix
        .get(&first.source, &first.destination)
        .unwrap_or(0);
    let arrival_time = start_time + (distance as f64 / truck_type.speed) as i64;

    result.trucks.insert(truck_id, truck);
    result
        .truck_route
        .insert(truck_id, vec![first.source.clone(), first.destination.clone()]);

    let mut package_ids = Vec::with_capacity(candidates.len());
    for package in candidates {
        result.packages.insert(package.id.clone(), (*package).clone());
        result.package_truck.insert(package.id.clone(), truck_id);
        result.package_start_time.insert(package.id.clone(), start_time);
        result.package_arrival_time.insert(package.id.clone(), arrival_time);
        package_ids.push(package.id.clone());
    }
    result.truck_packages.insert(truck_id, package_ids);
}

/// Builds the reduced input (committed packages removed) and logs the
/// before/after package counts the way the original source's reducer does.
fn finish(input: &ModelInput, result: ModelResult) -> (ModelResult, ModelInput) {
    let remaining: BTreeMap<PackageId, Package> = input
        .packages
        .iter()
        .filter(|(id, _)| !result.package_truck.contains_key(*id))
        .map(|(id, p)| (id.clone(), p.clone()))
        .collect();

    info!(
        before = input.packages.len(),
        after = remaining.len(),
        "reducer pass complete"
    );

    let trucks = crate::solver::pool::truck_pool(&remaining, &input.truck_types);
    let reduced = ModelInput::new(
        remaining,
        input.truck_types.clone(),
        input.distance_matrix.clone(),
        trucks,
        input.config,
    );

    (result, reduced)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DistanceMatrix, Location};
    use crate::domain::truck::TruckType;
    use std::sync::Arc;

    fn make_input(packages: Vec<Package>) -> ModelInput {
        let map: BTreeMap<PackageId, Package> =
            packages.into_iter().map(|p| (p.id.clone(), p)).collect();
        let truck_types: Vec<TruckType> = TruckType::catalog().to_vec();
        let dm = Arc::new(DistanceMatrix::new([(
            Location::new("A"),
            Location::new("B"),
            36_000,
        )]));
        let trucks = crate::solver::pool::truck_pool(&map, &truck_types);
        ModelInput::new(map, truck_types, dm, trucks, crate::config::PlannerConfig::default())
    }

    fn package(order: &str, mat: &str, area: i64, weight: i64) -> Package {
        Package::new(
            PackageId::new(order, mat, "P1"),
            Location::new("A"),
            Location::new("B"),
            area,
            weight,
            NON_DANGER,
            0,
            1_000_000,
        )
        .unwrap()
    }

    #[test]
    fn below_threshold_leaves_input_unchanged() {
        let input = make_input(vec![package("O1", "M1", 1, 1)]);
        let (partial, reduced) = reduce(&input, ReducerKind::PerOrder);
        assert!(partial.is_empty());
        assert_eq!(reduced.packages.len(), 1);
    }

    #[test]
    fn saturated_order_is_committed_in_chunks_of_four() {
        // Scenario B: ten packages of one order, each 30% of the
        // biggest truck's area capacity. Cumulative area crosses the
        // 95% threshold on the fourth package in each chunk (90% -> 120%,
        // skipping the 95-100% band), so H1 commits chunks of four,
        // leaving two packages for the solver.
        let largest = TruckType::catalog()[0];
        let each_area = (largest.area_capacity as f64 * 0.3) as i64;
        let packages: Vec<Package> = (0..10)
            .map(|i| package("O1", &format!("M{i}"), each_area, 1))
            .collect();
        let input = make_input(packages);
        let (partial, reduced) = reduce(&input, ReducerKind::PerOrder);

        assert_eq!(partial.trucks.len(), 2);
        assert!(partial.truck_packages.values().all(|pkgs| pkgs.len() == 4));
        assert_eq!(reduced.packages.len(), 2);
    }

    #[test]
    fn danger_type_conflict_blocks_per_destination_packing() {
        let mut p1 = package("O1", "M1", 1, 1);
        p1.danger_type = "type_1".to_string();
        let mut p2 = package("O2", "M1", 1, 1);
        p2.danger_type = "type_2".to_string();
        let input = make_input(vec![p1, p2]);
        let (partial, reduced) = reduce(&input, ReducerKind::PerDestination);
        assert!(partial.is_empty());
        assert_eq!(reduced.packages.len(), 2);
    }
}
