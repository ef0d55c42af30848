//! Thin demo binary (§6.2): wires `pipeline::run_pipeline` over an
//! in-process synthetic fixture and logs a summary. A real CLI wrapper
//! that parses `--order-file`/`--distance-file` flags and writes the
//! Schedule CSV is exactly the external collaborator §1 excludes — this
//! binary only exercises the library end to end.

use std::error::Error;

use fleet_dispatch_planner::config::PlannerConfig;
use fleet_dispatch_planner::fixtures::data_generator::fan_out_batch;
use fleet_dispatch_planner::pipeline::run_pipeline;
use fleet_dispatch_planner::reducer::ReducerKind;
use fleet_dispatch_planner::schema::to_schedule_records;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tracing::instrument(name = "fleet-planner", level = "info")]
fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(fmt::layer().with_span_events(fmt::format::FmtSpan::NEW | fmt::format::FmtSpan::CLOSE).pretty())
        .init();

    let config = PlannerConfig::default();
    let input = fan_out_batch(12, config);

    info!(
        packages = input.packages.len(),
        trucks_in_pool = input.trucks.len(),
        "built synthetic fixture"
    );

    let outcome = run_pipeline(input, &config, ReducerKind::PerOrder, config.max_package_num)?;

    info!(
        packages_scheduled = outcome.result.package_truck.len(),
        trucks_used = outcome.result.trucks.len(),
        partitions = outcome.partition_statuses.len(),
        "pipeline complete"
    );

    for status in &outcome.partition_statuses {
        info!(?status, "partition solve status");
    }

    let rows = to_schedule_records(&outcome.result);
    for row in &rows {
        info!(
            schedule_id = %row.schedule_id,
            order_id = %row.order_id,
            route = %row.truck_route,
            shared_truck = %row.shared_truck,
            "schedule row"
        );
    }

    Ok(())
}
