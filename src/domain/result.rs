use std::collections::BTreeMap;

use crate::domain::location::Location;
use crate::domain::package::{Package, PackageId};
use crate::domain::truck::{Truck, TruckId};
use crate::error::MergeError;

/// The output of a reduce/solve step, or the final merged schedule (§3).
///
/// Results copy package and truck records rather than holding
/// back-references, so a `ModelResult` can outlive the `ModelInput` it was
/// computed from.
#[derive(Debug, Clone, Default)]
pub struct ModelResult {
    pub packages: BTreeMap<PackageId, Package>,
    pub trucks: BTreeMap<TruckId, Truck>,
    pub package_truck: BTreeMap<PackageId, TruckId>,
    /// Source first, then visited destinations in stop order.
    pub truck_route: BTreeMap<TruckId, Vec<Location>>,
    pub truck_packages: BTreeMap<TruckId, Vec<PackageId>>,
    pub package_start_time: BTreeMap<PackageId, i64>,
    pub package_arrival_time: BTreeMap<PackageId, i64>,
}

impl ModelResult {
    pub fn is_empty(&self) -> bool {
        self.package_truck.is_empty()
    }

    /// Set-union merge (§4.4): every package key must appear in exactly
    /// one of `self`/`other`, since sub-inputs are supposed to partition
    /// the original input disjointly. A duplicate means that invariant
    /// was violated upstream.
    pub fn union(mut self, other: ModelResult) -> Result<ModelResult, MergeError> {
        for (id, package) in other.packages {
            if self.packages.contains_key(&id) {
                return Err(MergeError::DuplicatePackage(id));
            }
            self.packages.insert(id, package);
        }
        for (id, truck) in other.trucks {
            self.trucks.insert(id, truck);
        }
        for (id, truck_id) in other.package_truck {
            if self.package_truck.contains_key(&id) {
                return Err(MergeError::DuplicatePackage(id));
            }
            self.package_truck.insert(id, truck_id);
        }
        for (id, route) in other.truck_route {
            self.truck_route.insert(id, route);
        }
        for (id, packages) in other.truck_packages {
            self.truck_packages.insert(id, packages);
        }
        for (id, t) in other.package_start_time {
            self.package_start_time.insert(id, t);
        }
        for (id, t) in other.package_arrival_time {
            self.package_arrival_time.insert(id, t);
        }
        Ok(self)
    }
}
