use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// WGS84 coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    lat: f64,
    lon: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Result<Self, ValidationError> {
        if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
            return Err(ValidationError::InvalidLatitude {
                value: lat.to_string(),
            });
        }
        if !lon.is_finite() || !(-180.0..=180.0).contains(&lon) {
            return Err(ValidationError::InvalidLongitude {
                value: lon.to_string(),
            });
        }
        Ok(Self { lat, lon })
    }

    pub const fn lat(self) -> f64 {
        self.lat
    }

    pub const fn lon(self) -> f64 {
        self.lon
    }
}

impl Display for GeoPoint {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{},{}", self.lat, self.lon)
    }
}

/// A routable location owned by the planner.
///
/// The connector only reads the coordinate and the optional stable
/// identifier; it never keeps a reference past a single call.
pub trait PlaceRef: Send + Sync {
    fn coord(&self) -> GeoPoint;

    fn uri(&self) -> Option<&str>;
}

/// Plain place value used by the CLI and by tests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    pub coord: GeoPoint,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
}

impl Place {
    pub fn new(coord: GeoPoint) -> Self {
        Self { coord, uri: None }
    }

    pub fn with_uri(coord: GeoPoint, uri: impl Into<String>) -> Self {
        Self {
            coord,
            uri: Some(uri.into()),
        }
    }

    /// Copies the readable parts of any planner place.
    pub fn from_ref<P: PlaceRef + ?Sized>(place: &P) -> Self {
        Self {
            coord: place.coord(),
            uri: place.uri().map(str::to_owned),
        }
    }
}

impl PlaceRef for Place {
    fn coord(&self) -> GeoPoint {
        self.coord
    }

    fn uri(&self) -> Option<&str> {
        self.uri.as_deref()
    }
}

impl FromStr for Place {
    type Err = ValidationError;

    /// Parses `lat,lon` or `lat,lon,uri`.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let invalid = || ValidationError::InvalidCoordinate {
            value: value.to_owned(),
        };

        let mut parts = value.splitn(3, ',');
        let lat = parts
            .next()
            .and_then(|part| part.trim().parse::<f64>().ok())
            .ok_or_else(invalid)?;
        let lon = parts
            .next()
            .and_then(|part| part.trim().parse::<f64>().ok())
            .ok_or_else(invalid)?;
        let coord = GeoPoint::new(lat, lon)?;

        match parts.next().map(str::trim) {
            Some(uri) if !uri.is_empty() => Ok(Self::with_uri(coord, uri)),
            _ => Ok(Self::new(coord)),
        }
    }
}
