/// The ten-odd scalar tuning constants shared by every stage, passed by
/// value so no stage ever reaches for process-wide mutable state (§9
/// "Global parameters").
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlannerConfig {
    /// Packages on the same truck may not differ in `available_time` by
    /// more than this, in seconds.
    pub max_time_difference_between_package: i64,
    /// Dwell time a truck loses at every stop beyond the first, in seconds.
    pub stop_time: i64,
    /// Flat currency cost charged per extra stop, pre-scale.
    pub stop_cost: i64,
    /// A truck may visit at most this many distinct destinations.
    pub max_stops: u32,
    /// Integer multiplier that keeps the objective an exact integer.
    pub cost_scale_factor: i64,
    /// Reducer saturation threshold (fraction of the largest truck's
    /// capacity) at which a candidate batch is committed.
    pub reduce_threshold: f64,
    /// Partitioner hard cap on packages per sub-input.
    pub max_package_num: usize,
    /// Scale applied to raw Area/Weight CSV columns on ingestion (§6).
    pub scale_factor: i64,
    /// Solver wall-clock budget per sub-problem, in seconds.
    pub max_time_in_seconds: u64,
    /// Solve sub-problems one at a time instead of with `rayon`. A
    /// debugging knob only — must not change the schema of the output
    /// (§5).
    pub sequential: bool,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        PlannerConfig {
            max_time_difference_between_package: 7_200,
            stop_time: 21_600,
            stop_cost: 500,
            max_stops: 3,
            cost_scale_factor: 1_000,
            reduce_threshold: 0.95,
            max_package_num: 30,
            scale_factor: 10_000,
            max_time_in_seconds: 120,
            sequential: false,
        }
    }
}
