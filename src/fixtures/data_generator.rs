//! Synthetic `ModelInput` fixtures for the thin demo binary and the
//! pipeline-level integration tests, in the spirit of the teacher's own
//! `fixtures::data_generator` — except this one builds the domain model
//! directly instead of reading a customer-postal CSV, since file I/O is
//! an external collaborator's job (§1, §6.2).

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::config::PlannerConfig;
use crate::domain::package::NON_DANGER;
use crate::domain::truck::TruckType;
use crate::domain::{DistanceMatrix, Location, ModelInput, Package, PackageId};

/// A small, deterministic batch: `num_orders` single-package orders fanning
/// out from one warehouse to `num_orders` distinct destinations, spaced a
/// few minutes apart so most of them land in the same time window.
pub fn fan_out_batch(num_orders: usize, config: PlannerConfig) -> ModelInput {
    let warehouse = Location::new("WAREHOUSE");
    let mut packages = BTreeMap::new();
    let mut distance_pairs = Vec::new();

    for i in 0..num_orders {
        let destination = Location::new(format!("DEST-{i:03}"));
        let order_id = format!("ORDER-{i:03}");
        let available_time = (i as i64) * 300;
        let deadline = available_time + 6 * 3_600;
        let area = 2_000 + (i as i64 % 5) * 500;
        let weight = 5_000 + (i as i64 % 7) * 1_000;

        let package = Package::new(
            PackageId::new(order_id, "M1", "P1"),
            warehouse.clone(),
            destination.clone(),
            area,
            weight,
            NON_DANGER,
            available_time,
            deadline,
        )
        .expect("fixture packages satisfy the domain invariants by construction");

        distance_pairs.push((warehouse.clone(), destination.clone(), 8_000 + (i as i64) * 1_500));
        packages.insert(package.id.clone(), package);
    }

    let truck_types = TruckType::catalog().to_vec();
    let distance_matrix = Arc::new(DistanceMatrix::new(distance_pairs));
    let trucks = crate::solver::pool::truck_pool(&packages, &truck_types);

    ModelInput::new(packages, truck_types, distance_matrix, trucks, config)
}

/// Scenario A from the spec: one package, one truck, one stop.
pub fn scenario_a_trivial_single_package() -> ModelInput {
    let mut packages = BTreeMap::new();
    let package = Package::new(
        PackageId::new("O1", "M1", "P1"),
        Location::new("A"),
        Location::new("B"),
        5,
        1_000,
        NON_DANGER,
        100,
        1_000_000,
    )
    .unwrap();
    packages.insert(package.id.clone(), package);

    let truck_types = TruckType::catalog().to_vec();
    let distance_matrix = Arc::new(DistanceMatrix::new([(
        Location::new("A"),
        Location::new("B"),
        36_000,
    )]));
    let trucks = crate::solver::pool::truck_pool(&packages, &truck_types);

    ModelInput::new(packages, truck_types, distance_matrix, trucks, PlannerConfig::default())
}
