//! Bundled vehicle catalog used when no remote fleet is configured

use super::model::{FuelType, Vehicle, VehicleType};

const IMAGE_BASE: &str = "https://images.unsplash.com";
const IMAGE_PARAMS: &str = "auto=format&fit=crop&w=1000&q=80";

#[allow(clippy::too_many_arguments)]
fn vehicle(
    id: &str,
    name: &str,
    vehicle_type: VehicleType,
    photo: &str,
    fuel_type: FuelType,
    seating_capacity: u32,
    location: &str,
    hourly_rate: f64,
    rating: f64,
    available: bool,
    description: &str,
    features: [&str; 4],
) -> Vehicle {
    Vehicle {
        id: id.to_string(),
        name: name.to_string(),
        vehicle_type,
        image: format!("{}/{}?{}", IMAGE_BASE, photo, IMAGE_PARAMS),
        fuel_type,
        seating_capacity,
        location: location.to_string(),
        hourly_rate,
        rating,
        available,
        description: description.to_string(),
        features: features.iter().map(|f| f.to_string()).collect(),
    }
}

/// The eight demo vehicles, ids "1" to "8"
pub fn demo_fleet() -> Vec<Vehicle> {
    vec![
        vehicle(
            "1",
            "Tesla Model 3",
            VehicleType::Sedan,
            "photo-1560958089-b8a1929cea89",
            FuelType::Electric,
            5,
            "San Francisco",
            25.0,
            4.8,
            true,
            "Experience the future of driving with Tesla's Model 3. This all-electric sedan offers impressive range, cutting-edge technology, and a sleek design.",
            ["Autopilot", "Premium Sound System", "Heated Seats", "Supercharger Access"],
        ),
        vehicle(
            "2",
            "Toyota RAV4",
            VehicleType::Suv,
            "photo-1581540222194-0def2dda95b8",
            FuelType::Hybrid,
            5,
            "Los Angeles",
            18.0,
            4.5,
            true,
            "The Toyota RAV4 Hybrid combines efficiency with versatility. Perfect for city driving or weekend getaways with ample cargo space.",
            ["Backup Camera", "Apple CarPlay", "Android Auto", "Lane Departure Warning"],
        ),
        vehicle(
            "3",
            "BMW 5 Series",
            VehicleType::Sedan,
            "photo-1555215695-3004980ad54e",
            FuelType::Petrol,
            5,
            "New York",
            30.0,
            4.7,
            false,
            "Luxury meets performance in the BMW 5 Series. Enjoy premium comfort, advanced technology, and the ultimate driving experience.",
            ["Leather Seats", "Navigation System", "Sunroof", "Parking Sensors"],
        ),
        vehicle(
            "4",
            "Ford F-150",
            VehicleType::Truck,
            "photo-1605893477799-b99e3b8b93fe",
            FuelType::Diesel,
            6,
            "Dallas",
            22.0,
            4.6,
            true,
            "America's favorite truck, the Ford F-150 offers unmatched capability, durability, and comfort for work or play.",
            ["Towing Package", "4x4 Capability", "Bed Liner", "Trailer Backup Assist"],
        ),
        vehicle(
            "5",
            "Honda Civic",
            VehicleType::Sedan,
            "photo-1590362891991-f776e747a588",
            FuelType::Petrol,
            5,
            "Chicago",
            15.0,
            4.4,
            true,
            "The reliable Honda Civic offers excellent fuel economy, a comfortable ride, and modern features at an affordable price.",
            ["Bluetooth Connectivity", "Backup Camera", "USB Ports", "Cruise Control"],
        ),
        vehicle(
            "6",
            "Jeep Wrangler",
            VehicleType::Suv,
            "photo-1533473359331-0135ef1b58bf",
            FuelType::Petrol,
            4,
            "Denver",
            24.0,
            4.6,
            true,
            "Adventure awaits with the iconic Jeep Wrangler. Built for off-road exploration with legendary capability and open-air freedom.",
            ["4x4 Capability", "Removable Top", "Off-Road Tires", "Trail Rated"],
        ),
        vehicle(
            "7",
            "Chevrolet Bolt",
            VehicleType::Hatchback,
            "photo-1566443280617-2684998eec9f",
            FuelType::Electric,
            5,
            "Seattle",
            20.0,
            4.3,
            false,
            "The all-electric Chevrolet Bolt offers impressive range and versatility in a compact package. Perfect for eco-conscious city driving.",
            ["DC Fast Charging", "One-Pedal Driving", "Regen on Demand", "Apple CarPlay"],
        ),
        vehicle(
            "8",
            "Mazda MX-5 Miata",
            VehicleType::Convertible,
            "photo-1566023497365-c8dacf929e11",
            FuelType::Petrol,
            2,
            "Miami",
            28.0,
            4.9,
            true,
            "The Mazda MX-5 Miata delivers pure driving joy with its perfect balance, responsive handling, and open-top experience.",
            ["Convertible Top", "Bose Sound System", "Leather Seats", "Sport Mode"],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_demo_fleet_ids_are_unique() {
        let fleet = demo_fleet();
        assert_eq!(fleet.len(), 8);
        let ids: HashSet<&str> = fleet.iter().map(|v| v.id.as_str()).collect();
        assert_eq!(ids.len(), 8);
    }

    #[test]
    fn test_demo_fleet_availability() {
        let fleet = demo_fleet();
        let unavailable: Vec<&str> = fleet
            .iter()
            .filter(|v| !v.available)
            .map(|v| v.id.as_str())
            .collect();
        assert_eq!(unavailable, vec!["3", "7"]);
    }
}
