//! Truck-pool sizing (§4.5): a cheap upper bound on how many trucks of
//! each type a sub-input could possibly need, biased toward larger
//! (cheaper-per-unit) trucks via a discount on the smaller types.
//!
//! Ported from `structure.py::getAllTrucks`.

use std::collections::{BTreeMap, HashMap};

use crate::domain::truck::{Truck, TruckIdGen, TruckType};
use crate::domain::{Package, PackageId};

/// Smaller-truck discount applied to intermediate types; squared for the
/// smallest type (§4.5: 0.6 and 0.36).
const DISCOUNT: f64 = 0.6;

/// Builds the upper-bound truck pool for `packages` against `truck_types`.
/// The solver decides which of these are actually used; this only bounds
/// how many could ever be needed.
pub fn truck_pool(packages: &BTreeMap<PackageId, Package>, truck_types: &[TruckType]) -> Vec<Truck> {
    let mut by_order: HashMap<&str, (i64, i64)> = HashMap::new();
    for package in packages.values() {
        let entry = by_order.entry(&package.id.order_id).or_insert((0, 0));
        entry.0 += package.area;
        entry.1 += package.weight;
    }

    let mut trucks = Vec::new();
    // One id-generation scope per truck type keeps pool ids dense and
    // disjoint from the reducer's committed-truck scope (§9).
    for truck_type in truck_types {
        let mut id_gen = TruckIdGen::new(100 + truck_type.rank as u32);

        for (total_area, total_weight) in by_order.values() {
            let min_by_area = div_ceil(*total_area, truck_type.area_capacity);
            let min_by_weight = div_ceil(*total_weight, truck_type.weight_capacity);
            let min_num_raw = min_by_area.max(min_by_weight);

            // Heuristic: bigger trucks are more cost efficient, bias the
            // pool toward using them (§4.5).
            let min_num = match truck_type.rank {
                0 => min_num_raw,
                1 | 2 => (min_num_raw as f64 * DISCOUNT) as i64,
                _ => (min_num_raw as f64 * DISCOUNT * DISCOUNT) as i64,
            };

            for _ in 0..min_num {
                trucks.push(Truck {
                    id: id_gen.next(),
                    truck_type: *truck_type,
                });
            }
        }
    }

    trucks
}

fn div_ceil(a: i64, b: i64) -> i64 {
    if a <= 0 {
        0
    } else {
        (a + b - 1) / b
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Location;
    use crate::domain::package::NON_DANGER;

    #[test]
    fn discounts_smaller_truck_types() {
        let truck_types = TruckType::catalog();
        let biggest = truck_types[0];
        let mut packages = BTreeMap::new();
        let p = Package::new(
            PackageId::new("O1", "M1", "P1"),
            Location::new("A"),
            Location::new("B"),
            biggest.area_capacity * 3,
            1,
            NON_DANGER,
            0,
            1_000,
        )
        .unwrap();
        packages.insert(p.id.clone(), p);

        let pool = truck_pool(&packages, &truck_types);
        let count_for = |rank: usize| {
            pool.iter()
                .filter(|t| t.truck_type.rank == rank)
                .count()
        };
        assert_eq!(count_for(0), 3);
        assert!(count_for(3) < count_for(0));
    }
}
