use std::collections::BTreeMap;
use std::sync::Arc;

use crate::config::PlannerConfig;
use crate::domain::distance::DistanceMatrix;
use crate::domain::location::Location;
use crate::domain::package::{Package, PackageId};
use crate::domain::truck::{Truck, TruckType};

/// Everything one pipeline stage needs: the packages, the truck-type
/// catalog, the distance matrix, a derived truck pool, the sorted
/// distinct location list, and the global scalar parameters (§3).
///
/// Packages are kept in a `BTreeMap` rather than a hash map so iteration
/// order is deterministic without re-sorting at every call site — useful
/// since several stages (partitioner, diagnostics) are specified to walk
/// packages in a stable order.
#[derive(Debug, Clone)]
pub struct ModelInput {
    pub packages: BTreeMap<PackageId, Package>,
    pub truck_types: Vec<TruckType>,
    pub distance_matrix: Arc<DistanceMatrix>,
    pub trucks: Vec<Truck>,
    pub locations: Vec<Location>,
    pub config: PlannerConfig,
}

impl ModelInput {
    pub fn new(
        packages: BTreeMap<PackageId, Package>,
        truck_types: Vec<TruckType>,
        distance_matrix: Arc<DistanceMatrix>,
        trucks: Vec<Truck>,
        config: PlannerConfig,
    ) -> Self {
        let locations = Self::sorted_distinct_locations(&packages);
        ModelInput {
            packages,
            truck_types,
            distance_matrix,
            trucks,
            locations,
            config,
        }
    }

    fn sorted_distinct_locations(packages: &BTreeMap<PackageId, Package>) -> Vec<Location> {
        let mut locations: Vec<Location> = packages
            .values()
            .flat_map(|p| [p.source.clone(), p.destination.clone()])
            .collect();
        locations.sort();
        locations.dedup();
        locations
    }
}
