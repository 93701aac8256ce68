//! Vehicle entity

use crate::core::query::{FilterOp, FilterRule};
use crate::core::validation::DraftRules;
use crate::core::{FieldValue, Listable};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Body style of a vehicle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VehicleType {
    #[serde(rename = "SUV")]
    Suv,
    Sedan,
    Hatchback,
    Convertible,
    Truck,
    Van,
}

impl VehicleType {
    pub const ALL: [VehicleType; 6] = [
        VehicleType::Suv,
        VehicleType::Sedan,
        VehicleType::Hatchback,
        VehicleType::Convertible,
        VehicleType::Truck,
        VehicleType::Van,
    ];

    pub const NAMES: [&'static str; 6] = ["SUV", "Sedan", "Hatchback", "Convertible", "Truck", "Van"];

    pub fn as_str(&self) -> &'static str {
        match self {
            VehicleType::Suv => "SUV",
            VehicleType::Sedan => "Sedan",
            VehicleType::Hatchback => "Hatchback",
            VehicleType::Convertible => "Convertible",
            VehicleType::Truck => "Truck",
            VehicleType::Van => "Van",
        }
    }
}

impl fmt::Display for VehicleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FuelType {
    Petrol,
    Diesel,
    Electric,
    Hybrid,
}

impl FuelType {
    pub const ALL: [FuelType; 4] = [
        FuelType::Petrol,
        FuelType::Diesel,
        FuelType::Electric,
        FuelType::Hybrid,
    ];

    pub const NAMES: [&'static str; 4] = ["Petrol", "Diesel", "Electric", "Hybrid"];

    pub fn as_str(&self) -> &'static str {
        match self {
            FuelType::Petrol => "Petrol",
            FuelType::Diesel => "Diesel",
            FuelType::Electric => "Electric",
            FuelType::Hybrid => "Hybrid",
        }
    }
}

impl fmt::Display for FuelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// A rentable vehicle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub vehicle_type: VehicleType,
    #[serde(default)]
    pub image: String,
    pub fuel_type: FuelType,
    pub seating_capacity: u32,
    pub location: String,
    pub hourly_rate: f64,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub available: bool,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub features: Vec<String>,
}

impl_entity!(Vehicle, "vehicle", "vehicles");

/// Payload for adding a vehicle to a fleet
///
/// Numeric fields are strings so raw form input can be passed through; the
/// draft rules turn them into numbers or reject them.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleDraft {
    pub name: String,
    #[serde(rename = "type")]
    pub vehicle_type: String,
    pub fuel_type: String,
    pub seating_capacity: String,
    pub location: String,
    pub hourly_rate: String,
    pub image: String,
    pub description: String,
    pub features: Vec<String>,
    pub available: bool,
}

impl Listable for Vehicle {
    type Draft = VehicleDraft;

    fn searchable_values(&self) -> Vec<&str> {
        vec![&self.name, self.vehicle_type.as_str()]
    }

    fn field_value(&self, field: &str) -> Option<FieldValue> {
        match field {
            "id" => Some(FieldValue::from(self.id.as_str())),
            "name" => Some(FieldValue::from(self.name.as_str())),
            "type" | "vehicleType" => Some(FieldValue::from(self.vehicle_type.as_str())),
            "fuelType" => Some(FieldValue::from(self.fuel_type.as_str())),
            "seatingCapacity" => Some(FieldValue::from(self.seating_capacity)),
            "location" => Some(FieldValue::from(self.location.as_str())),
            "hourlyRate" => Some(FieldValue::Float(self.hourly_rate)),
            "rating" => Some(FieldValue::Float(self.rating)),
            "available" => Some(FieldValue::Boolean(self.available)),
            _ => None,
        }
    }

    /// Filter keys used by the vehicle filter sheet
    ///
    /// `seatingCapacity` means "at least", `minPrice`/`maxPrice` bound the
    /// hourly rate.
    fn filter_rule(key: &str) -> FilterRule {
        match key {
            "vehicleType" => FilterRule::new("type", FilterOp::Equals),
            "seatingCapacity" => FilterRule::new("seatingCapacity", FilterOp::AtLeast),
            "minPrice" => FilterRule::new("hourlyRate", FilterOp::AtLeast),
            "maxPrice" => FilterRule::new("hourlyRate", FilterOp::AtMost),
            other => FilterRule::parse(other),
        }
    }

    fn sort_field(key: &str) -> &str {
        match key {
            "price" => "hourlyRate",
            "availability" => "available",
            other => other,
        }
    }

    fn draft_rules() -> DraftRules {
        draft_rules!("vehicle",
            validate: {
                "name": [required],
                "type": [required, one_of(VehicleType::NAMES)],
                "fuelType": [required, one_of(FuelType::NAMES)],
                "seatingCapacity": [required, numeric, positive],
                "location": [required],
                "hourlyRate": [required, numeric, positive],
                "description": [required],
            },
            filters: {
                "name": [trim],
                "location": [trim],
                "description": [trim],
                "seatingCapacity": [to_number],
                "hourlyRate": [to_number, round_decimals(2)],
            }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::StoreError;
    use serde_json::json;

    fn draft() -> VehicleDraft {
        VehicleDraft {
            name: "Kia Niro".to_string(),
            vehicle_type: "SUV".to_string(),
            fuel_type: "Hybrid".to_string(),
            seating_capacity: "5".to_string(),
            location: "Austin".to_string(),
            hourly_rate: "19.999".to_string(),
            description: "Roomy hybrid".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_json_shape() {
        let vehicle: Vehicle = serde_json::from_value(json!({
            "id": "9",
            "name": "Kia Niro",
            "type": "SUV",
            "fuelType": "Hybrid",
            "seatingCapacity": 5,
            "location": "Austin",
            "hourlyRate": 19
        }))
        .unwrap();

        assert_eq!(vehicle.vehicle_type, VehicleType::Suv);
        assert_eq!(vehicle.hourly_rate, 19.0);
        assert!(vehicle.features.is_empty());
        assert_eq!(serde_json::to_value(&vehicle).unwrap()["type"], "SUV");
    }

    #[test]
    fn test_filter_aliases() {
        assert_eq!(
            Vehicle::filter_rule("minPrice"),
            FilterRule::new("hourlyRate", FilterOp::AtLeast)
        );
        assert_eq!(
            Vehicle::filter_rule("seatingCapacity"),
            FilterRule::new("seatingCapacity", FilterOp::AtLeast)
        );
        assert_eq!(
            Vehicle::filter_rule("location"),
            FilterRule::new("location", FilterOp::Equals)
        );
        assert_eq!(Vehicle::sort_field("price"), "hourlyRate");
        assert_eq!(Vehicle::sort_field("rating"), "rating");
    }

    #[test]
    fn test_draft_rules_normalize() {
        let payload = serde_json::to_value(draft()).unwrap();
        let checked = Vehicle::draft_rules().check(payload).unwrap();
        assert_eq!(checked["hourlyRate"].as_f64(), Some(20.0));
        assert_eq!(checked["seatingCapacity"].as_f64(), Some(5.0));
    }

    #[test]
    fn test_draft_rules_reject_unknown_type() {
        let mut bad = draft();
        bad.vehicle_type = "Spaceship".to_string();
        let err = Vehicle::draft_rules()
            .check(serde_json::to_value(bad).unwrap())
            .unwrap_err();
        assert!(matches!(err, StoreError::Validation { ref field, .. } if field == "type"));
    }

    #[test]
    fn test_draft_rules_reject_free_rate() {
        let mut bad = draft();
        bad.hourly_rate = "0".to_string();
        let err = Vehicle::draft_rules()
            .check(serde_json::to_value(bad).unwrap())
            .unwrap_err();
        assert_eq!(err.to_string(), "hourlyRate must be positive");
    }
}
