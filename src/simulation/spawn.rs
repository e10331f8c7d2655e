//! Puntos de aparición de vehículos

use rand::seq::SliceRandom;
use rand::Rng;

use crate::utils::geo::GeoPoint;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnLocation {
    pub name: &'static str,
    pub lat: f64,
    pub lng: f64,
}

impl SpawnLocation {
    pub fn location(&self) -> GeoPoint {
        GeoPoint::new(self.lat, self.lng)
    }
}

const fn spawn(name: &'static str, lat: f64, lng: f64) -> SpawnLocation {
    SpawnLocation { name, lat, lng }
}

/// Aparcamientos y zonas seguras de Portland
pub const PORTLAND_SPAWN_LOCATIONS: &[SpawnLocation] = &[
    spawn("Pioneer Courthouse Square", 45.5188, -122.6793),
    spawn("Union Station Parking", 45.5289, -122.6765),
    spawn("Portland Building Lot", 45.5145, -122.6794),
    spawn("Lloyd Center Parking", 45.5311, -122.6536),
    spawn("Pioneer Place Garage", 45.5188, -122.6746),
    spawn("OHSU Campus Parking", 45.4993, -122.6859),
    spawn("Portland State Parking", 45.5118, -122.6839),
    spawn("Hawthorne District", 45.5122, -122.6208),
    spawn("Alberta Arts District", 45.5581, -122.6656),
    spawn("Mississippi District", 45.5459, -122.6759),
    spawn("Pearl District", 45.5266, -122.6908),
    spawn("NW 23rd Avenue", 45.5298, -122.6979),
    spawn("PDX Airport Pickup", 45.5898, -122.5951),
    spawn("Eastbank Esplanade", 45.5152, -122.6647),
    spawn("Washington Park", 45.5099, -122.7161),
    spawn("Laurelhurst Park", 45.5162, -122.6295),
    spawn("Mount Tabor Park", 45.5118, -122.5933),
];

/// Radio (en grados) alrededor del punto de inicio fuera de Portland
const START_AREA_RADIUS_DEG: f64 = 0.01;

/// Posición inicial: un punto seguro de Portland en us-west-2, o un punto
/// aleatorio cerca de `start` en cualquier otra región.
pub fn random_spawn_location(region: &str, start: GeoPoint) -> (String, GeoPoint) {
    let mut rng = rand::thread_rng();

    if region == "us-west-2" {
        if let Some(spot) = PORTLAND_SPAWN_LOCATIONS.choose(&mut rng) {
            return (spot.name.to_string(), spot.location());
        }
    }

    let lat = start.lat + rng.gen_range(-START_AREA_RADIUS_DEG..=START_AREA_RADIUS_DEG);
    let lng = start.lng + rng.gen_range(-START_AREA_RADIUS_DEG..=START_AREA_RADIUS_DEG);
    ("start-area".to_string(), GeoPoint::new(lat, lng))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_portland_spawns_come_from_list() {
        for _ in 0..50 {
            let (name, point) = random_spawn_location("us-west-2", GeoPoint::new(0.0, 0.0));
            let spot = PORTLAND_SPAWN_LOCATIONS
                .iter()
                .find(|s| s.name == name)
                .expect("spawn name should be known");
            assert_eq!(spot.location(), point);
        }
    }

    #[test]
    fn test_other_regions_spawn_near_start() {
        let start = GeoPoint::new(37.7749, -122.4194);
        for _ in 0..50 {
            let (_, point) = random_spawn_location("eu-west-1", start);
            assert!((point.lat - start.lat).abs() <= START_AREA_RADIUS_DEG + 1e-12);
            assert!((point.lng - start.lng).abs() <= START_AREA_RADIUS_DEG + 1e-12);
        }
    }
}
