use serde::{Deserialize, Serialize};

use crate::{GeoPoint, Place, StreetNetworkMode, UtcDateTime};

/// One named stretch of a street-network path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathItem {
    pub name: String,
    /// Seconds.
    pub duration: i64,
    /// Meters.
    pub length: i64,
    /// Turn angle in degrees relative to the previous item.
    pub direction: i32,
}

/// Street-network section of an itinerary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub id: String,
    pub mode: StreetNetworkMode,
    pub duration: i64,
    pub length: i64,
    pub begin_date_time: UtcDateTime,
    pub end_date_time: UtcDateTime,
    pub origin: Place,
    pub destination: Place,
    pub coordinates: Vec<GeoPoint>,
    pub path_items: Vec<PathItem>,
}

/// Door-to-door journey returned by a direct-path call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Itinerary {
    pub duration: i64,
    pub departure_date_time: UtcDateTime,
    pub arrival_date_time: UtcDateTime,
    pub sections: Vec<Section>,
}
