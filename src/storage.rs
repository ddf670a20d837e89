//! Storage Column
//!
//! The model-side half of the coordinate field: normalizes whatever is about
//! to be saved, validates it, and turns it into the serialized column blob.
//!
//! ## Blob Format
//! ```text
//! ┌─────────────┬─────────┬─────────┬──────────────────────┐
//! │ Version (1) │ CRC (4) │ Len (4) │ Payload (bincode)    │
//! └─────────────┴─────────┴─────────┴──────────────────────┘
//! ```
//!
//! CRC and length are little-endian and cover the payload only. The payload
//! is an `Option<LatLng>`, so an unset coordinate is stored as a real value
//! rather than a SQL null.

use serde_json::Value;

use crate::config::Config;
use crate::coordinate::{Coordinate, CoordinateField, LatLng};
use crate::error::{QuickmapsError, Result};
use crate::form::MapField;

/// Blob format version
pub const FORMAT_VERSION: u8 = 1;

/// Header size: version (1) + crc (4) + payload length (4)
pub const HEADER_SIZE: usize = 9;

/// Message for an empty value on a column that does not allow blanks
pub const BLANK_NOT_ALLOWED: &str = "This field cannot be blank.";

/// A coordinate column backed by a serialized-object blob
#[derive(Debug, Clone)]
pub struct LatLngColumn {
    config: Config,
}

impl LatLngColumn {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Coordinate columns are always editable in forms.
    pub fn editable(&self) -> bool {
        true
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The form field this column is edited with
    pub fn formfield(&self) -> MapField {
        MapField::new(&self.config)
    }

    // =========================================================================
    // Normalization
    // =========================================================================

    /// Normalize a value about to be saved.
    ///
    /// Absent and falsy values become the unset coordinate; anything else is
    /// reduced to its latitude and longitude.
    pub fn prepare(&self, value: Option<&Value>) -> Result<Coordinate> {
        match value {
            Some(v) if !is_empty_value(v) => {
                let coordinate = Coordinate::from_value(v)?;
                tracing::debug!(%coordinate, "normalized stored coordinate");
                Ok(coordinate)
            }
            _ => Ok(Coordinate::Unset),
        }
    }

    /// [`prepare`](Self::prepare), returned in canonical dictionary form
    pub fn prepare_value(&self, value: Option<&Value>) -> Result<Value> {
        Ok(self.prepare(value)?.to_value())
    }

    // =========================================================================
    // Validation
    // =========================================================================

    /// Check the stored-value invariant.
    ///
    /// The value must be a dictionary with exactly the keys `latitude` and
    /// `longitude`, each holding a string or a number. Empty values are only
    /// checked against `blank`.
    pub fn validate(&self, value: &Value) -> Result<()> {
        if is_empty_value(value) {
            if self.config.blank {
                return Ok(());
            }
            return Err(QuickmapsError::Required(BLANK_NOT_ALLOWED.to_string()));
        }

        let map = value
            .as_object()
            .ok_or_else(|| QuickmapsError::invalid(format!("{} is not a dictionary.", value)))?;

        for field in [CoordinateField::Latitude, CoordinateField::Longitude] {
            if !map.contains_key(field.key()) {
                return Err(QuickmapsError::invalid_field(
                    field,
                    format!("{} should have a {} key.", value, field),
                ));
            }
        }

        if map.len() != 2 {
            return Err(QuickmapsError::invalid(format!(
                "{} should only have two keys.",
                value
            )));
        }

        for field in [CoordinateField::Latitude, CoordinateField::Longitude] {
            if !matches!(map[field.key()], Value::String(_) | Value::Number(_)) {
                return Err(QuickmapsError::invalid_field(
                    field,
                    format!("{} key in {} is not a string or a float", field, value),
                ));
            }
        }

        Ok(())
    }

    /// Validate, then normalize
    pub fn clean(&self, value: &Value) -> Result<Coordinate> {
        self.validate(value)?;
        self.prepare(Some(value))
    }

    // =========================================================================
    // Blob encoding
    // =========================================================================

    /// Serialize a coordinate into the column blob
    pub fn to_db(&self, value: &Coordinate) -> Result<Vec<u8>> {
        if let Some(ll) = value.lat_lng().filter(|ll| !ll.is_finite()) {
            return Err(QuickmapsError::invalid(format!(
                "{:?} is not a finite coordinate",
                ll
            )));
        }

        let payload = bincode::serialize(&value.lat_lng())?;
        let crc = crc32fast::hash(&payload);

        let mut blob = Vec::with_capacity(HEADER_SIZE + payload.len());
        blob.push(FORMAT_VERSION);
        blob.extend_from_slice(&crc.to_le_bytes());
        blob.extend_from_slice(&(payload.len() as u32).to_le_bytes());
        blob.extend_from_slice(&payload);
        Ok(blob)
    }

    /// Deserialize a column blob, verifying its header and checksum
    pub fn from_db(&self, blob: &[u8]) -> Result<Coordinate> {
        if blob.len() < HEADER_SIZE {
            return Err(corrupted(format!(
                "incomplete header: expected {} bytes, got {}",
                HEADER_SIZE,
                blob.len()
            )));
        }

        let version = blob[0];
        if version != FORMAT_VERSION {
            return Err(corrupted(format!("unknown format version {}", version)));
        }

        let expected_crc = u32::from_le_bytes([blob[1], blob[2], blob[3], blob[4]]);
        let payload_len = u32::from_le_bytes([blob[5], blob[6], blob[7], blob[8]]) as usize;

        let payload = &blob[HEADER_SIZE..];
        if payload.len() != payload_len {
            return Err(corrupted(format!(
                "payload length mismatch: header says {}, found {}",
                payload_len,
                payload.len()
            )));
        }

        let actual_crc = crc32fast::hash(payload);
        if actual_crc != expected_crc {
            return Err(corrupted(format!(
                "checksum mismatch: expected {:08x}, got {:08x}",
                expected_crc, actual_crc
            )));
        }

        let stored: Option<LatLng> = bincode::deserialize(payload)?;
        if let Some(ll) = stored.filter(|ll| !ll.is_finite()) {
            return Err(corrupted(format!("non-finite coordinate {:?}", ll)));
        }
        Ok(Coordinate::from(stored))
    }
}

impl Default for LatLngColumn {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

/// Falsy values (null, `false`, `0`, `""`, `[]`, `{}`) mean "nothing stored"
fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::Object(map) => map.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::String(s) => s.is_empty(),
    }
}

fn corrupted(reason: String) -> QuickmapsError {
    tracing::warn!("rejecting stored coordinate: {}", reason);
    QuickmapsError::Corruption(reason)
}
