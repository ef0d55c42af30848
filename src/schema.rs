//! Data schemas crossing the process boundary (§6).
//!
//! CSV ingestion itself — opening a path, running it through the `csv`
//! crate — is an external collaborator's job (§1); this module only
//! defines the row shapes and the pure conversions to and from the domain
//! model, since those are the parts the spec actually pins down.

use chrono::NaiveDateTime;
use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::domain::{Location, ModelResult, Package, PackageId};
use crate::error::PlannerError;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One row of the Order CSV (§6).
#[derive(Debug, Clone, Deserialize)]
pub struct OrderRecord {
    #[serde(rename = "Order_ID")]
    pub order_id: String,
    #[serde(rename = "Material_ID")]
    pub material_id: String,
    #[serde(rename = "Plate_ID")]
    pub plate_id: String,
    #[serde(rename = "Source")]
    pub source: String,
    #[serde(rename = "Destination")]
    pub destination: String,
    #[serde(rename = "Available_Time")]
    pub available_time: String,
    #[serde(rename = "Deadline")]
    pub deadline: String,
    #[serde(rename = "Danger_Type")]
    pub danger_type: String,
    #[serde(rename = "Area")]
    pub area: f64,
    #[serde(rename = "Weight")]
    pub weight: f64,
}

impl OrderRecord {
    /// Converts a raw CSV row into a validated `Package`, scaling
    /// Area/Weight by `scale_factor` and truncating to an integer the way
    /// the original source's `getAllPackages` does (§6).
    pub fn into_package(self, scale_factor: i64) -> Result<Package, PlannerError> {
        let available_time = parse_timestamp(&self.available_time)?;
        let deadline = parse_timestamp(&self.deadline)?;

        Package::new(
            PackageId::new(self.order_id, self.material_id, self.plate_id),
            Location::new(self.source),
            Location::new(self.destination),
            (self.area * scale_factor as f64) as i64,
            (self.weight * scale_factor as f64) as i64,
            self.danger_type,
            available_time,
            deadline,
        )
    }
}

fn parse_timestamp(raw: &str) -> Result<i64, PlannerError> {
    NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT)
        .map(|dt| dt.and_utc().timestamp())
        .map_err(|e| PlannerError::InputSchema(format!("unparseable timestamp {raw:?}: {e}")))
}

/// One row of the Distance CSV (§6), pre-pivot.
#[derive(Debug, Clone, Deserialize)]
pub struct DistanceRecord {
    #[serde(rename = "Source")]
    pub source: String,
    #[serde(rename = "Destination")]
    pub destination: String,
    #[serde(rename = "Distance(M)")]
    pub distance_m: i64,
}

/// One row of the Schedule CSV output (§6), in column order.
#[derive(Debug, Clone, Serialize)]
pub struct ScheduleRecord {
    #[serde(rename = "Schedule_ID")]
    pub schedule_id: String,
    #[serde(rename = "Truck_Route")]
    pub truck_route: String,
    #[serde(rename = "Order_ID")]
    pub order_id: String,
    #[serde(rename = "Material_ID")]
    pub material_id: String,
    #[serde(rename = "Plate_ID")]
    pub plate_id: String,
    #[serde(rename = "Danger_Type")]
    pub danger_type: String,
    #[serde(rename = "Source")]
    pub source: String,
    #[serde(rename = "Destination")]
    pub destination: String,
    #[serde(rename = "Start_Time")]
    pub start_time: i64,
    #[serde(rename = "Arrival_Time")]
    pub arrival_time: i64,
    #[serde(rename = "Deadline")]
    pub deadline: i64,
    #[serde(rename = "Shared_Truck")]
    pub shared_truck: String,
    #[serde(rename = "Truck_Type")]
    pub truck_type: f64,
    #[serde(rename = "Area_Rate")]
    pub area_rate: f64,
    #[serde(rename = "Weight_Rate")]
    pub weight_rate: f64,
    #[serde(rename = "Capacity_Rate")]
    pub capacity_rate: f64,
}

/// Expands a `ModelResult` into Schedule CSV rows, sorted by
/// (Schedule_ID, Order_ID, Material_ID) as §6 requires.
pub fn to_schedule_records(result: &ModelResult) -> Vec<ScheduleRecord> {
    let mut rows = Vec::with_capacity(result.package_truck.len());

    for (truck_id, package_ids) in &result.truck_packages {
        let truck = match result.trucks.get(truck_id) {
            Some(t) => t,
            None => continue,
        };
        let route = result
            .truck_route
            .get(truck_id)
            .cloned()
            .unwrap_or_default();
        let route_str = route
            .iter()
            .map(|l| l.as_str())
            .collect::<Vec<_>>()
            .join("->");

        let distinct_orders = package_ids
            .iter()
            .filter_map(|id| result.packages.get(id))
            .map(|p| p.id.order_id.as_str())
            .unique()
            .count();
        let shared = if distinct_orders > 1 { "Y" } else { "N" };

        let total_area: i64 = package_ids
            .iter()
            .filter_map(|id| result.packages.get(id))
            .map(|p| p.area)
            .sum();
        let total_weight: i64 = package_ids
            .iter()
            .filter_map(|id| result.packages.get(id))
            .map(|p| p.weight)
            .sum();
        let area_rate = total_area as f64 / truck.truck_type.area_capacity as f64;
        let weight_rate = total_weight as f64 / truck.truck_type.weight_capacity as f64;
        let capacity_rate = area_rate.max(weight_rate);

        for package_id in package_ids {
            let Some(package) = result.packages.get(package_id) else {
                continue;
            };
            let Some(&start) = result.package_start_time.get(package_id) else {
                continue;
            };
            let Some(&arrival) = result.package_arrival_time.get(package_id) else {
                continue;
            };

            rows.push(ScheduleRecord {
                schedule_id: truck_id.to_string(),
                truck_route: route_str.clone(),
                order_id: package.id.order_id.clone(),
                material_id: package.id.material_id.clone(),
                plate_id: package.id.plate_id.clone(),
                danger_type: package.danger_type.clone(),
                source: package.source.to_string(),
                destination: package.destination.to_string(),
                start_time: start,
                arrival_time: arrival,
                deadline: package.deadline,
                shared_truck: shared.to_string(),
                truck_type: truck.truck_type.id,
                area_rate,
                weight_rate,
                capacity_rate,
            });
        }
    }

    rows.sort_by(|a, b| {
        (&a.schedule_id, &a.order_id, &a.material_id).cmp(&(
            &b.schedule_id,
            &b.order_id,
            &b.material_id,
        ))
    });

    rows
}
