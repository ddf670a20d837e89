//! Coordinate value type
//!
//! A latitude/longitude pair that is either set or explicitly unset. The unset
//! coordinate is a real value (it serializes as `{}`), distinct from an error.
//!
//! ## JSON Shape
//! ```text
//! set:    {"latitude": 10.5, "longitude": -66.9}
//! unset:  {}
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{QuickmapsError, Result};

/// Key under which the latitude is stored
pub const LATITUDE_KEY: &str = "latitude";

/// Key under which the longitude is stored
pub const LONGITUDE_KEY: &str = "longitude";

/// One of the two halves of a coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoordinateField {
    Latitude,
    Longitude,
}

impl CoordinateField {
    /// Dictionary key for this field
    pub fn key(self) -> &'static str {
        match self {
            CoordinateField::Latitude => LATITUDE_KEY,
            CoordinateField::Longitude => LONGITUDE_KEY,
        }
    }
}

impl fmt::Display for CoordinateField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// A set latitude/longitude pair
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub latitude: f64,
    pub longitude: f64,
}

impl LatLng {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.latitude.is_finite() && self.longitude.is_finite()
    }
}

/// A coordinate field value: either unset or a latitude/longitude pair
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "LooseCoordinate", into = "LooseCoordinate")]
pub enum Coordinate {
    /// No location set
    #[default]
    Unset,

    /// A location
    Set(LatLng),
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Coordinate::Set(LatLng::new(latitude, longitude))
    }

    pub fn is_set(&self) -> bool {
        matches!(self, Coordinate::Set(_))
    }

    pub fn lat_lng(&self) -> Option<LatLng> {
        match self {
            Coordinate::Set(ll) => Some(*ll),
            Coordinate::Unset => None,
        }
    }

    pub fn latitude(&self) -> Option<f64> {
        self.lat_lng().map(|ll| ll.latitude)
    }

    pub fn longitude(&self) -> Option<f64> {
        self.lat_lng().map(|ll| ll.longitude)
    }

    /// Canonical dictionary form: two keys when set, empty when unset
    pub fn to_value(&self) -> Value {
        let mut map = Map::new();
        if let Coordinate::Set(ll) = self {
            map.insert(LATITUDE_KEY.to_string(), Value::from(ll.latitude));
            map.insert(LONGITUDE_KEY.to_string(), Value::from(ll.longitude));
        }
        Value::Object(map)
    }

    /// Build a coordinate from a loose dictionary-shaped value.
    ///
    /// `null` and `{}` are unset. Otherwise both keys must be present and each
    /// must hold a number or a numeric string; any other keys are ignored.
    pub fn from_value(value: &Value) -> Result<Self> {
        let map = match value {
            Value::Null => return Ok(Coordinate::Unset),
            Value::Object(map) if map.is_empty() => return Ok(Coordinate::Unset),
            Value::Object(map) => map,
            other => {
                return Err(QuickmapsError::invalid(format!(
                    "{} is not a dictionary.",
                    other
                )))
            }
        };

        let latitude = component_from_map(map, CoordinateField::Latitude, value)?;
        let longitude = component_from_map(map, CoordinateField::Longitude, value)?;
        Ok(Coordinate::new(latitude, longitude))
    }
}

impl From<LatLng> for Coordinate {
    fn from(ll: LatLng) -> Self {
        Coordinate::Set(ll)
    }
}

impl From<Option<LatLng>> for Coordinate {
    fn from(ll: Option<LatLng>) -> Self {
        ll.map_or(Coordinate::Unset, Coordinate::Set)
    }
}

/// Comma separated, longitude first; empty when unset. Whole numbers keep
/// their decimal point (`10.0`, not `10`).
impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Coordinate::Set(ll) => write!(f, "{:?}, {:?}", ll.longitude, ll.latitude),
            Coordinate::Unset => Ok(()),
        }
    }
}

fn component_from_map(map: &Map<String, Value>, field: CoordinateField, whole: &Value) -> Result<f64> {
    let raw = map.get(field.key()).ok_or_else(|| {
        QuickmapsError::invalid_field(field, format!("{} should have a {} key.", whole, field))
    })?;
    parse_component(raw).ok_or_else(|| {
        QuickmapsError::invalid_field(
            field,
            format!("{} key in {} is not a string or a float", field, whole),
        )
    })
}

/// Coerce a number or numeric string into a finite float
pub fn parse_component(raw: &Value) -> Option<f64> {
    let parsed = match raw {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    parsed.is_finite().then_some(parsed)
}

// =============================================================================
// Serde bridge
// =============================================================================

/// Wire form of [`Coordinate`]: both keys or neither
#[derive(Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct LooseCoordinate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    latitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    longitude: Option<f64>,
}

impl TryFrom<LooseCoordinate> for Coordinate {
    type Error = QuickmapsError;

    fn try_from(loose: LooseCoordinate) -> Result<Self> {
        match (loose.latitude, loose.longitude) {
            (Some(latitude), Some(longitude)) => Ok(Coordinate::new(latitude, longitude)),
            (None, None) => Ok(Coordinate::Unset),
            (None, Some(_)) => Err(QuickmapsError::invalid_field(
                CoordinateField::Latitude,
                "coordinate should have a latitude key.",
            )),
            (Some(_), None) => Err(QuickmapsError::invalid_field(
                CoordinateField::Longitude,
                "coordinate should have a longitude key.",
            )),
        }
    }
}

impl From<Coordinate> for LooseCoordinate {
    fn from(coordinate: Coordinate) -> Self {
        LooseCoordinate {
            latitude: coordinate.latitude(),
            longitude: coordinate.longitude(),
        }
    }
}
