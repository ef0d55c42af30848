/// A vehicle class: capacity, speed and per-km cost (§3, §6).
///
/// The built-in catalog (`TruckType::catalog`) is sorted largest-capacity
/// first and `rank` records that position — the reducer relies on this
/// ordering (it uses `truck_types[0]`), and the pool-sizing discount in
/// §4.5 keys off `rank` rather than the floating-point `id` label.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TruckType {
    /// The catalog's human-facing numeric label (e.g. 16.5 for a 16.5m
    /// trailer). Not used as a lookup key — compare by `rank` instead.
    pub id: f64,
    pub rank: usize,
    pub area_capacity: i64,
    pub weight_capacity: i64,
    /// Meters per second.
    pub speed: f64,
    pub cost_per_km: f64,
}

impl TruckType {
    /// The four built-in truck types (§6), largest-capacity first. Areas
    /// and weights are pre-scaled the way `getTruckTypes` scales them in
    /// the original source: inner_length × inner_width × 10,000 for area,
    /// kilograms × 10,000 for weight.
    pub fn catalog() -> [TruckType; 4] {
        const SCALE: f64 = 10_000.0;
        const SPEED_M_PER_S: f64 = 40.0 / 3.6;

        [
            TruckType {
                id: 16.5,
                rank: 0,
                area_capacity: (16.1 * 2.5 * SCALE) as i64,
                weight_capacity: 27_000 * 10_000,
                speed: SPEED_M_PER_S,
                cost_per_km: 10.0,
            },
            TruckType {
                id: 12.5,
                rank: 1,
                area_capacity: (12.1 * 2.5 * SCALE) as i64,
                weight_capacity: 24_000 * 10_000,
                speed: SPEED_M_PER_S,
                cost_per_km: 9.0,
            },
            TruckType {
                id: 9.6,
                rank: 2,
                area_capacity: (9.1 * 2.3 * SCALE) as i64,
                weight_capacity: 14_000 * 10_000,
                speed: SPEED_M_PER_S,
                cost_per_km: 6.5,
            },
            TruckType {
                id: 7.6,
                rank: 3,
                area_capacity: (7.2 * 2.3 * SCALE) as i64,
                weight_capacity: 8_000 * 10_000,
                speed: SPEED_M_PER_S,
                cost_per_km: 5.5,
            },
        ]
    }
}

/// Dense arena id for a truck instance.
///
/// Packs a scope (which pipeline stage/partition minted the id) into the
/// high bits and a per-scope counter into the low bits, so ids stay
/// globally unique after the merger unions results from many independently
/// solved partitions without needing a shared counter or a UUID (§9
/// arena-and-index). Scope `0` is reserved for the reducer's committed
/// trucks; partitions use `scope = partition_index + 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TruckId(u64);

impl TruckId {
    pub const REDUCER_SCOPE: u32 = 0;

    /// Scope of partition `i`'s solver-minted trucks is
    /// `SOLVER_SCOPE_BASE + i`, keeping every partition's ids disjoint
    /// from the reducer's scope `0` and from each other.
    pub const SOLVER_SCOPE_BASE: u32 = 1;

    fn pack(scope: u32, local: u32) -> Self {
        TruckId(((scope as u64) << 32) | local as u64)
    }

    pub fn scope(&self) -> u32 {
        (self.0 >> 32) as u32
    }
}

impl std::fmt::Display for TruckId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "truck-{}-{}", self.scope(), self.0 as u32)
    }
}

/// Monotonic truck id generator for a single scope (§9).
#[derive(Debug, Clone)]
pub struct TruckIdGen {
    scope: u32,
    next: u32,
}

impl TruckIdGen {
    pub fn new(scope: u32) -> Self {
        TruckIdGen { scope, next: 0 }
    }

    pub fn next(&mut self) -> TruckId {
        let id = TruckId::pack(self.scope, self.next);
        self.next += 1;
        id
    }
}

/// A vehicle instance: an id plus its immutable type profile (§3).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Truck {
    pub id: TruckId,
    pub truck_type: TruckType,
}
