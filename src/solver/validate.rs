//! Pre-flight feasibility diagnostic (§4.3.1, §4.3.2), ported from
//! `Model.validateInput`.
//!
//! Run before the search and again on `INFEASIBLE`/`MODEL_INVALID`, this
//! greedily claims one not-yet-claimed truck per package, in package
//! iteration order, checking only whether *some* truck is fast enough to
//! cover source→destination inside the package's delivery window. It
//! never feeds back into the optimal solve — it only names the first
//! package a reviewer should look at.

use crate::domain::truck::Truck;
use crate::domain::{DistanceMatrix, Package, PackageId};

/// Returns the first package for which no not-yet-claimed truck is fast
/// enough, or `None` if every package could be (greedily) covered.
pub fn first_infeasible_package<'a>(
    packages: impl IntoIterator<Item = (&'a PackageId, &'a Package)>,
    trucks: &[Truck],
    distance_matrix: &DistanceMatrix,
) -> Option<PackageId> {
    let mut claimed = vec![false; trucks.len()];

    for (id, package) in packages {
        let distance = distance_matrix.get(&package.source, &package.destination)?;
        let window = package.deadline - package.available_time;

        let mut allocated = false;
        for (i, truck) in trucks.iter().enumerate() {
            if claimed[i] {
                continue;
            }
            let travel_seconds = distance as f64 / truck.truck_type.speed;
            if travel_seconds <= window as f64 {
                claimed[i] = true;
                allocated = true;
                break;
            }
        }

        if !allocated {
            return Some(id.clone());
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::package::NON_DANGER;
    use crate::domain::truck::TruckType;
    use crate::domain::Location;
    use std::collections::BTreeMap;

    #[test]
    fn flags_package_no_truck_can_reach_in_time() {
        // Scenario D: 100_000 m at 40 km/h needs 9_000s, window is 10s.
        let package = Package::new(
            PackageId::new("O1", "M1", "P1"),
            Location::new("A"),
            Location::new("B"),
            1,
            1,
            NON_DANGER,
            0,
            10,
        )
        .unwrap();
        let mut packages = BTreeMap::new();
        packages.insert(package.id.clone(), package);

        let dm = DistanceMatrix::new([(Location::new("A"), Location::new("B"), 100_000)]);
        let trucks: Vec<Truck> = TruckType::catalog()
            .iter()
            .map(|t| Truck {
                id: crate::domain::truck::TruckIdGen::new(0).next(),
                truck_type: *t,
            })
            .collect();

        let offending = first_infeasible_package(packages.iter(), &trucks, &dm);
        assert_eq!(offending, Some(PackageId::new("O1", "M1", "P1")));
    }
}
