use std::collections::HashMap;

use crate::domain::location::Location;
use crate::error::PlannerError;

/// Square, symmetric-in-practice mapping of (source, destination) to
/// meters, plus the synthetic `Placeholder` location with zero distance
/// to and from everywhere (§3).
#[derive(Debug, Clone, Default)]
pub struct DistanceMatrix {
    meters: HashMap<(Location, Location), i64>,
}

impl DistanceMatrix {
    /// Builds a matrix from explicit (source, destination, meters) rows —
    /// the pivoted form of the Distance CSV (§6) — and adds the
    /// `Placeholder` row/column automatically.
    pub fn new(pairs: impl IntoIterator<Item = (Location, Location, i64)>) -> Self {
        let mut meters = HashMap::new();
        let mut locations: Vec<Location> = Vec::new();

        for (from, to, m) in pairs {
            if !locations.contains(&from) {
                locations.push(from.clone());
            }
            if !locations.contains(&to) {
                locations.push(to.clone());
            }
            meters.insert((from, to), m);
        }

        let placeholder = Location::placeholder();
        for loc in &locations {
            meters.insert((loc.clone(), placeholder.clone()), 0);
            meters.insert((placeholder.clone(), loc.clone()), 0);
        }
        meters.insert((placeholder.clone(), placeholder.clone()), 0);

        DistanceMatrix { meters }
    }

    /// Distance in meters, or `None` if neither `(from, to)` nor any
    /// placeholder rule covers the pair. Unlike the original source's
    /// `DataFrame.fillna(0)`, an unrecognized (non-placeholder) pair is
    /// never silently treated as zero distance.
    pub fn get(&self, from: &Location, to: &Location) -> Option<i64> {
        if from == to {
            return Some(0);
        }
        self.meters.get(&(from.clone(), to.clone())).copied()
    }

    pub fn try_get(&self, from: &Location, to: &Location) -> Result<i64, PlannerError> {
        self.get(from, to).ok_or_else(|| {
            PlannerError::InputSchema(format!("no distance entry for {from} -> {to}"))
        })
    }
}
