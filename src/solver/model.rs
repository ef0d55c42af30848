//! Arena-and-index building blocks for the constraint model of §4.3: a
//! `Group` is the bespoke solver's stand-in for the CP-SAT encoding's
//! per-truck variable cluster (`x[t,·]`, `stop[·]`, `start[·]`,
//! `arrive[·]`, `tt[·,k]`, `T_start`/`T_arrive`/`T_maxstop`/`C`), and the
//! free functions here check the constraints C1–C13 and evaluate the
//! objective for one finalized group.
//!
//! The search in `solver::search` builds groups incrementally and asks
//! these functions whether a candidate package can join, then scores the
//! finished groups with [`group_cost`].

use crate::config::PlannerConfig;
use crate::domain::package::NON_DANGER;
use crate::domain::truck::TruckType;
use crate::domain::{DistanceMatrix, Location, Package};

/// One truck's worth of packages, built up incrementally by the search.
///
/// Destinations are recorded in *first-seen* order; [`order_stops`] later
/// permutes them to the route that minimizes total travel distance (the
/// model's `stop[p]` variables), so insertion order here carries no
/// meaning on its own.
#[derive(Debug, Clone, Default)]
pub struct Group<'a> {
    pub members: Vec<&'a Package>,
    pub destinations: Vec<Location>,
    pub total_area: i64,
    pub total_weight: i64,
    pub danger_tag: Option<&'a str>,
    pub min_available_time: i64,
    pub max_available_time: i64,
}

impl<'a> Group<'a> {
    pub fn source(&self) -> &Location {
        &self.members[0].source
    }

    /// C1/C11/C12/C4/C6 (the parts checkable without knowing the route
    /// order or truck type yet): would adding `package` keep this group
    /// a coherent candidate truck load? `max_area_capacity`/
    /// `max_weight_capacity` are the widest limits across the whole
    /// catalog, used only as a capacity upper bound for pruning — the
    /// actual truck type is chosen later by [`evaluate_group`].
    pub fn can_accept(
        &self,
        package: &Package,
        config: &PlannerConfig,
        max_area_capacity: i64,
        max_weight_capacity: i64,
    ) -> bool {
        if !self.members.is_empty() && self.members[0].source != package.source {
            return false; // C2: same-source only
        }

        let new_area = self.total_area + package.area;
        let new_weight = self.total_weight + package.weight;
        if new_area > max_area_capacity || new_weight > max_weight_capacity {
            return false; // C11, checked against the most permissive type
        }

        let is_dangerous = package.danger_type != NON_DANGER;
        if is_dangerous {
            if let Some(existing) = self.danger_tag {
                if existing != package.danger_type {
                    return false; // C12
                }
            }
        }

        if !self.members.is_empty() {
            let min_avail = self.min_available_time.min(package.available_time);
            let max_avail = self.max_available_time.max(package.available_time);
            if max_avail - min_avail > config.max_time_difference_between_package {
                return false; // C4
            }
        }

        let new_destination_count = if self.destinations.contains(&package.destination) {
            self.destinations.len()
        } else {
            self.destinations.len() + 1
        };
        if new_destination_count > config.max_stops as usize {
            return false; // C8 stop-count bound, §3 invariant "stop bound"
        }

        true
    }

    pub fn push(&mut self, package: &'a Package) {
        if self.members.is_empty() {
            self.min_available_time = package.available_time;
            self.max_available_time = package.available_time;
        } else {
            self.min_available_time = self.min_available_time.min(package.available_time);
            self.max_available_time = self.max_available_time.max(package.available_time);
        }
        self.total_area += package.area;
        self.total_weight += package.weight;
        if package.danger_type != NON_DANGER {
            self.danger_tag = Some(&package.danger_type);
        }
        if !self.destinations.contains(&package.destination) {
            self.destinations.push(package.destination.clone());
        }
        self.members.push(package);
    }

    /// The cheapest truck type whose capacity fits this group's total
    /// load, or `None` if even the largest type can't carry it (C11).
    pub fn feasible_types<'t>(&self, truck_types: &'t [TruckType]) -> Vec<&'t TruckType> {
        truck_types
            .iter()
            .filter(|t| t.area_capacity >= self.total_area && t.weight_capacity >= self.total_weight)
            .collect()
    }
}

/// The stop order and per-stop arrival times for a finalized group under
/// one truck type (C7, C8): permutes `group.destinations` (at most
/// `max_stops`, so this is never more than 3! = 6 orderings) and keeps
/// the one with the smallest total travel distance.
pub struct RoutePlan {
    pub stops: Vec<Location>,
    /// Arrival time at each stop, same length/order as `stops`.
    pub arrival_at_stop: Vec<i64>,
}

pub fn plan_route(
    group: &Group,
    truck_type: &TruckType,
    distance_matrix: &DistanceMatrix,
    config: &PlannerConfig,
    natural_start: i64,
) -> Option<RoutePlan> {
    let source = group.source().clone();
    let mut best: Option<(i64, RoutePlan)> = None;

    for perm in permutations(&group.destinations) {
        let mut arrivals = Vec::with_capacity(perm.len());
        let mut current = source.clone();
        let mut time = natural_start;
        let mut ok = true;

        for (i, stop) in perm.iter().enumerate() {
            let distance = match distance_matrix.get(&current, stop) {
                Some(d) => d,
                None => {
                    ok = false;
                    break;
                }
            };
            let travel = (distance as f64 / truck_type.speed) as i64;
            if i == 0 {
                time += travel;
            } else {
                time += config.stop_time + travel;
            }
            arrivals.push(time);
            current = stop.clone();
        }

        if !ok {
            continue;
        }

        let total_travel = *arrivals.last().unwrap() - natural_start;
        if best.as_ref().map(|(t, _)| total_travel < *t).unwrap_or(true) {
            best = Some((
                total_travel,
                RoutePlan {
                    stops: perm,
                    arrival_at_stop: arrivals,
                },
            ));
        }
    }

    best.map(|(_, plan)| plan)
}

fn permutations(items: &[Location]) -> Vec<Vec<Location>> {
    if items.len() <= 1 {
        return vec![items.to_vec()];
    }
    let mut out = Vec::new();
    for i in 0..items.len() {
        let mut rest = items.to_vec();
        let head = rest.remove(i);
        for mut tail in permutations(&rest) {
            tail.insert(0, head.clone());
            out.push(tail);
        }
    }
    out
}

/// One evaluated group: the route, per-package arrival time, and the
/// truck's objective contribution (§4.3 objective).
pub struct EvaluatedGroup<'a> {
    pub group: Group<'a>,
    pub truck_type: TruckType,
    pub route: RoutePlan,
    pub natural_start: i64,
    pub cost: i64,
}

/// Deadline-feasible evaluation of `group` against every truck type that
/// can carry its load, keeping the cheapest. Returns `None` if no truck
/// type both fits the capacity and meets every member's deadline (C10).
pub fn evaluate_group<'a>(
    group: Group<'a>,
    truck_types: &[TruckType],
    distance_matrix: &DistanceMatrix,
    config: &PlannerConfig,
    max_start_in_subproblem: i64,
) -> Option<EvaluatedGroup<'a>> {
    let natural_start = group.max_available_time;
    let mut best: Option<EvaluatedGroup> = None;

    for truck_type in group.feasible_types(truck_types) {
        let Some(route) = plan_route(&group, truck_type, distance_matrix, config, natural_start)
        else {
            continue;
        };

        let per_destination_arrival: std::collections::HashMap<&Location, i64> = route
            .stops
            .iter()
            .zip(route.arrival_at_stop.iter())
            .map(|(loc, t)| (loc, *t))
            .collect();

        let deadline_ok = group.members.iter().all(|p| {
            per_destination_arrival
                .get(&p.destination)
                .map(|arrival| *arrival <= p.deadline)
                .unwrap_or(false)
        });
        if !deadline_ok {
            continue;
        }

        let cost = group_cost(
            &route,
            truck_type,
            config,
            natural_start,
            max_start_in_subproblem,
        );

        if best.as_ref().map(|b| cost < b.cost).unwrap_or(true) {
            best = Some(EvaluatedGroup {
                group: group.clone(),
                truck_type: *truck_type,
                route,
                natural_start,
                cost,
            });
        }
    }

    best
}

/// §4.3 objective, one truck's `C[t]`.
///
/// **Open Question #1 (not silently fixed):** the reference CP-SAT
/// encoding only ever asserts `T_start[t] >= start[p]` for assigned
/// packages — never the matching `<=` — while `start[p]` itself is
/// pinned to this group's own maximum available time by C5. Minimizing
/// cost therefore gives the solver every incentive to push `T_start[t]`
/// up past this group's own start, as far as the shared `[0, max_start]`
/// domain and the truck-cost variable's own `[0, upper]` domain allow,
/// before the equality constraint binding `C[t]` to the formula forces a
/// floor. That is reproduced here rather than "fixed" to the group's own
/// start: `start_for_cost` is pushed toward the sub-problem-wide maximum
/// available time, clamped so the resulting drive time never goes
/// negative (which the CP-SAT domain `[0, upper]` would also forbid).
fn group_cost(
    route: &RoutePlan,
    truck_type: &TruckType,
    config: &PlannerConfig,
    natural_start: i64,
    max_start_in_subproblem: i64,
) -> i64 {
    let max_stop = route.stops.len() as i64;
    if max_stop == 0 {
        return 0;
    }

    let t_arrive = *route.arrival_at_stop.last().unwrap();
    let stop_overhead = (max_stop - 1) * config.stop_time;

    let start_for_cost = max_start_in_subproblem
        .min(t_arrive - stop_overhead)
        .max(natural_start);

    let drive_seconds = (t_arrive - start_for_cost - stop_overhead).max(0);
    let per_second_rate =
        (truck_type.speed * truck_type.cost_per_km / 1000.0 * config.cost_scale_factor as f64) as i64;

    drive_seconds * per_second_rate + (max_stop - 1) * config.stop_cost * config.cost_scale_factor
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PackageId;

    fn pkg(id: &str, dst: &str, avail: i64, deadline: i64) -> Package {
        Package::new(
            PackageId::new("O1", id, "P1"),
            Location::new("A"),
            Location::new(dst),
            1,
            1,
            NON_DANGER,
            avail,
            deadline,
        )
        .unwrap()
    }

    #[test]
    fn single_stop_route_matches_scenario_a() {
        let config = PlannerConfig::default();
        let p = pkg("M1", "B", 100, 1_000_000);
        let mut group = Group::default();
        group.push(&p);

        let dm = DistanceMatrix::new([(Location::new("A"), Location::new("B"), 36_000)]);
        let truck_type = TruckType::catalog()[0];
        let plan = plan_route(&group, &truck_type, &dm, &config, 100).unwrap();
        assert_eq!(plan.arrival_at_stop[0], 100 + 3_240);
    }

    #[test]
    fn two_stop_route_respects_stop_time_between_legs() {
        let config = PlannerConfig::default();
        let p1 = pkg("M1", "B", 0, 1_000_000);
        let p2 = pkg("M2", "C", 0, 1_000_000);
        let mut group = Group::default();
        group.push(&p1);
        group.push(&p2);

        let dm = DistanceMatrix::new([
            (Location::new("A"), Location::new("B"), 10_000),
            (Location::new("A"), Location::new("C"), 50_000),
            (Location::new("B"), Location::new("C"), 5_000),
            (Location::new("C"), Location::new("B"), 5_000),
        ]);
        let truck_type = TruckType::catalog()[0];
        let plan = plan_route(&group, &truck_type, &dm, &config, 0).unwrap();
        assert_eq!(plan.stops.len(), 2);
        // Visiting B then C is shorter (10_000 + 5_000) than C then B (50_000 + 5_000).
        assert_eq!(plan.stops[0], Location::new("B"));
    }
}
