use crate::models::Coordinates;
use once_cell::sync::Lazy;
use std::collections::BTreeMap;

const LOCATIONS_JSON: &str = include_str!("locations.json");

static LOCATION_TABLE: Lazy<BTreeMap<String, Coordinates>> = Lazy::new(|| {
    serde_json::from_str(LOCATIONS_JSON).expect("valid embedded location table")
});

// Exact string match; unknown locations simply have no marker.
pub fn lookup(location: &str) -> Option<Coordinates> {
    LOCATION_TABLE.get(location.trim()).copied()
}
