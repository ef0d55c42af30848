use crate::domain::location::Location;
use crate::error::PlannerError;

/// Sentinel danger-type tag meaning "compatible with anything" (§3).
pub const NON_DANGER: &str = "non_danger";

/// Uniquely identifies a package by the triple the CSV schema keys orders
/// on: order, material, and plate (§3). `plate_id` is the name the
/// distilled spec settles on (Open Question #3 — the original source
/// calls the same field `item_id` in a couple of call sites; this crate
/// uses `plate_id` everywhere).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PackageId {
    pub order_id: String,
    pub material_id: String,
    pub plate_id: String,
}

impl PackageId {
    pub fn new(
        order_id: impl Into<String>,
        material_id: impl Into<String>,
        plate_id: impl Into<String>,
    ) -> Self {
        PackageId {
            order_id: order_id.into(),
            material_id: material_id.into(),
            plate_id: plate_id.into(),
        }
    }
}

/// A physical shipment unit with size, weight, danger class, and a
/// delivery window (§3).
#[derive(Debug, Clone, PartialEq)]
pub struct Package {
    pub id: PackageId,
    pub source: Location,
    pub destination: Location,
    /// Scaled integer area (§6: raw CSV value × `scale_factor`).
    pub area: i64,
    /// Scaled integer weight.
    pub weight: i64,
    pub danger_type: String,
    pub available_time: i64,
    pub deadline: i64,
}

impl Package {
    /// Constructs a package, enforcing the invariants in §3:
    /// `deadline > available_time` and `area, weight > 0`.
    pub fn new(
        id: PackageId,
        source: Location,
        destination: Location,
        area: i64,
        weight: i64,
        danger_type: impl Into<String>,
        available_time: i64,
        deadline: i64,
    ) -> Result<Self, PlannerError> {
        if deadline <= available_time {
            return Err(PlannerError::InputSchema(format!(
                "package {:?}: deadline ({deadline}) must be greater than available_time ({available_time})",
                id
            )));
        }
        if area <= 0 {
            return Err(PlannerError::InputSchema(format!(
                "package {:?}: area must be positive, got {area}",
                id
            )));
        }
        if weight <= 0 {
            return Err(PlannerError::InputSchema(format!(
                "package {:?}: weight must be positive, got {weight}",
                id
            )));
        }

        Ok(Package {
            id,
            source,
            destination,
            area,
            weight,
            danger_type: danger_type.into(),
            available_time,
            deadline,
        })
    }

    pub fn is_dangerous(&self) -> bool {
        self.danger_type != NON_DANGER
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(n: &str) -> PackageId {
        PackageId::new("O1", "M1", n)
    }

    #[test]
    fn rejects_deadline_not_after_available() {
        let err = Package::new(
            id("P1"),
            Location::new("A"),
            Location::new("B"),
            1,
            1,
            NON_DANGER,
            100,
            100,
        )
        .unwrap_err();
        assert!(matches!(err, PlannerError::InputSchema(_)));
    }

    #[test]
    fn rejects_non_positive_area_or_weight() {
        assert!(Package::new(
            id("P1"),
            Location::new("A"),
            Location::new("B"),
            0,
            1,
            NON_DANGER,
            0,
            10
        )
        .is_err());
        assert!(Package::new(
            id("P1"),
            Location::new("A"),
            Location::new("B"),
            1,
            0,
            NON_DANGER,
            0,
            10
        )
        .is_err());
    }
}
