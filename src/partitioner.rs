//! Three monotone refinement passes (§4.2) that split a reduced input
//! into independent sub-inputs the solver can solve separately, each
//! provably (for the first two passes) non-interfering.
//!
//! Ported from `ProblemPartitioner` (`partition.py`).

use std::collections::BTreeMap;

use tracing::info;

use crate::domain::{ModelInput, Package};

/// Splits `input` into sub-inputs of at most `max_package_num` packages
/// each, via by-source, then by-time-interval, then hard-cut passes.
pub fn partition(input: &ModelInput, max_package_num: usize) -> Vec<ModelInput> {
    let by_source = partition_by_source(input);

    let mut by_time = Vec::new();
    for small in by_source {
        if small.packages.len() <= max_package_num {
            by_time.push(small);
        } else {
            by_time.extend(partition_by_time_interval(&small));
        }
    }

    let mut by_hard_cut = Vec::new();
    for small in by_time {
        if small.packages.len() <= max_package_num {
            by_hard_cut.push(small);
        } else {
            by_hard_cut.extend(partition_by_hard_cut(&small, max_package_num));
        }
    }

    info!(
        sub_inputs = by_hard_cut.len(),
        total_packages = by_hard_cut.iter().map(|m| m.packages.len()).sum::<usize>(),
        "partition complete"
    );

    by_hard_cut
}

/// Step 1: group by delivery source. A truck needs exactly one source,
/// so packages from different sources can never occupy the same truck —
/// this split is independence-preserving.
fn partition_by_source(input: &ModelInput) -> Vec<ModelInput> {
    let mut by_source: BTreeMap<&crate::domain::Location, Vec<&Package>> = BTreeMap::new();
    for package in input.packages.values() {
        by_source.entry(&package.source).or_default().push(package);
    }

    by_source
        .into_values()
        .map(|packages| create_sub_input(input, packages))
        .collect()
}

/// Step 2: within an oversized source-group, sort by
/// (available_time, order_id, material_id) and open a new sub-group
/// whenever the gap to the previous package's available_time exceeds
/// `max_time_difference_between_package`. The time-window constraint
/// forbids co-occupancy across that gap, so this split is also
/// independence-preserving.
fn partition_by_time_interval(input: &ModelInput) -> Vec<ModelInput> {
    let mut sorted = sorted_packages(input);
    let max_gap = input.config.max_time_difference_between_package;

    let mut out = Vec::new();
    let mut candidates: Vec<&Package> = Vec::new();
    let mut previous_available_time: Option<i64> = None;

    for package in sorted.drain(..) {
        match previous_available_time {
            Some(prev) if (package.available_time - prev).abs() <= max_gap => {
                candidates.push(package);
            }
            None => {
                candidates.push(package);
            }
            Some(_) => {
                out.push(create_sub_input(input, std::mem::take(&mut candidates)));
                candidates.push(package);
            }
        }
        previous_available_time = Some(package.available_time);
    }

    if !candidates.is_empty() {
        out.push(create_sub_input(input, candidates));
    }

    out
}

/// Step 3 (last resort, not independence-preserving): sorted as above,
/// emit consecutive chunks of `max_package_num`.
fn partition_by_hard_cut(input: &ModelInput, max_package_num: usize) -> Vec<ModelInput> {
    let sorted = sorted_packages(input);

    sorted
        .chunks(max_package_num)
        .map(|chunk| create_sub_input(input, chunk.to_vec()))
        .collect()
}

fn sorted_packages(input: &ModelInput) -> Vec<&Package> {
    let mut packages: Vec<&Package> = input.packages.values().collect();
    packages.sort_by(|a, b| {
        (a.available_time, &a.id.order_id, &a.id.material_id).cmp(&(
            b.available_time,
            &b.id.order_id,
            &b.id.material_id,
        ))
    });
    packages
}

/// Builds a sub-input sharing the parent's distance matrix, truck types,
/// and config, with a freshly recomputed truck pool (§4.5).
fn create_sub_input(parent: &ModelInput, packages: Vec<&Package>) -> ModelInput {
    let map: BTreeMap<_, _> = packages.into_iter().map(|p| (p.id.clone(), p.clone())).collect();
    let trucks = crate::solver::pool::truck_pool(&map, &parent.truck_types);
    ModelInput::new(
        map,
        parent.truck_types.clone(),
        parent.distance_matrix.clone(),
        trucks,
        parent.config,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::package::NON_DANGER;
    use crate::domain::truck::TruckType;
    use crate::domain::{DistanceMatrix, Location, PackageId};
    use std::sync::Arc;

    fn make_input(packages: Vec<Package>) -> ModelInput {
        let map: BTreeMap<PackageId, Package> =
            packages.into_iter().map(|p| (p.id.clone(), p)).collect();
        let truck_types: Vec<TruckType> = TruckType::catalog().to_vec();
        let dm = Arc::new(DistanceMatrix::new([
            (Location::new("A"), Location::new("B"), 1_000),
            (Location::new("A"), Location::new("C"), 2_000),
        ]));
        let trucks = crate::solver::pool::truck_pool(&map, &truck_types);
        ModelInput::new(map, truck_types, dm, trucks, crate::config::PlannerConfig::default())
    }

    fn package(order: &str, src: &str, dst: &str, avail: i64) -> Package {
        Package::new(
            PackageId::new(order, "M1", "P1"),
            Location::new(src),
            Location::new(dst),
            1,
            1,
            NON_DANGER,
            avail,
            avail + 1_000_000,
        )
        .unwrap()
    }

    #[test]
    fn partitions_disjointly_and_covers_every_package() {
        let input = make_input(vec![
            package("O1", "A", "B", 0),
            package("O2", "A", "C", 0),
        ]);
        let parts = partition(&input, 30);
        let total: usize = parts.iter().map(|p| p.packages.len()).sum();
        assert_eq!(total, 2);
    }

    #[test]
    fn small_input_passes_through_by_source_only() {
        let input = make_input(vec![package("O1", "A", "B", 0)]);
        let parts = partition(&input, 30);
        assert_eq!(parts.len(), 1);
        assert_eq!(parts[0].packages.len(), 1);
    }

    #[test]
    fn scenario_f_time_gap_splits_into_two_groups() {
        let input = make_input(vec![
            package("O1", "A", "B", 0),
            package("O2", "A", "B", 3_600),
            package("O3", "A", "B", 10_800),
            package("O4", "A", "B", 14_400),
        ]);
        // max_package_num = 2 forces the by-source group (size 4) through
        // the time-interval pass with max_time_diff = 7_200.
        let parts = partition(&input, 2);
        let sizes: Vec<usize> = parts.iter().map(|p| p.packages.len()).collect();
        assert_eq!(sizes, vec![2, 2]);
    }
}
