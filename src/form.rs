//! Form Fields
//!
//! Multi-part form fields that turn a flat list of submitted sub-values into
//! a [`Coordinate`].
//!
//! ## Sub-value Layout
//! ```text
//! LatLngField:  [latitude, longitude]
//! MapField:     [latitude, longitude, clear]
//! ```
//!
//! `clean` runs the whole pipeline (blank check, per-input coercion, then
//! `compress`). `compress` alone only merges already-submitted values and is
//! what the widget round-trips through.

use serde::{Deserialize, Serialize};

use crate::config::{Config, ErrorMessages};
use crate::coordinate::{Coordinate, CoordinateField};
use crate::error::{QuickmapsError, Result};

/// A single raw sub-value as submitted by a form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
}

impl RawValue {
    /// Null, or text that is blank once trimmed
    pub fn is_empty(&self) -> bool {
        match self {
            RawValue::Null => true,
            RawValue::Text(s) => s.trim().is_empty(),
            RawValue::Bool(_) | RawValue::Number(_) => false,
        }
    }

    /// Checkbox semantics: `""`, `"false"` and `"0"` are off
    pub fn as_flag(&self) -> bool {
        match self {
            RawValue::Null => false,
            RawValue::Bool(b) => *b,
            RawValue::Number(n) => *n != 0.0,
            RawValue::Text(s) => {
                let s = s.trim();
                !(s.is_empty() || s.eq_ignore_ascii_case("false") || s == "0")
            }
        }
    }
}

impl From<f64> for RawValue {
    fn from(n: f64) -> Self {
        RawValue::Number(n)
    }
}

impl From<bool> for RawValue {
    fn from(b: bool) -> Self {
        RawValue::Bool(b)
    }
}

impl From<&str> for RawValue {
    fn from(s: &str) -> Self {
        RawValue::Text(s.to_string())
    }
}

impl From<String> for RawValue {
    fn from(s: String) -> Self {
        RawValue::Text(s)
    }
}

impl<T: Into<RawValue>> From<Option<T>> for RawValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(RawValue::Null, Into::into)
    }
}

/// A form field assembled from several sub-inputs
pub trait MultiValueField {
    /// Number of sub-inputs this field expects
    fn arity(&self) -> usize;

    fn required(&self) -> bool;

    fn error_messages(&self) -> &ErrorMessages;

    /// Merge the sub-values into a coordinate
    fn compress(&self, data: &[RawValue]) -> Result<Coordinate>;

    /// No coordinate typed in and no flag ticked
    fn is_blank(&self, data: &[RawValue]) -> bool {
        (0..2).all(|i| value_at(data, i).is_empty())
            && (2..self.arity()).all(|i| !value_at(data, i).as_flag())
    }

    /// Clean each sub-input, then compress.
    ///
    /// A blank submission yields the unset coordinate on an optional field.
    /// A required field needs both coordinates, even when clearing.
    fn clean(&self, data: &[RawValue]) -> Result<Coordinate> {
        let required = || QuickmapsError::Required(self.error_messages().required.clone());

        if self.is_blank(data) {
            if self.required() {
                return Err(required());
            }
            return self.compress(&[]);
        }
        if self.required() && (0..2).any(|i| value_at(data, i).is_empty()) {
            return Err(required());
        }

        let messages = self.error_messages();
        let mut cleaned = Vec::with_capacity(self.arity());
        for (i, field) in [CoordinateField::Latitude, CoordinateField::Longitude]
            .into_iter()
            .enumerate()
        {
            let value = coerce_component(field, value_at(data, i), messages)?;
            cleaned.push(RawValue::from(value));
        }
        for i in 2..self.arity() {
            cleaned.push(RawValue::Bool(value_at(data, i).as_flag()));
        }

        self.compress(&cleaned)
    }
}

/// Two inputs: latitude and longitude
#[derive(Debug, Clone)]
pub struct LatLngField {
    required: bool,
    error_messages: ErrorMessages,
}

impl LatLngField {
    pub fn new(config: &Config) -> Self {
        Self {
            required: config.required,
            error_messages: config.error_messages.clone(),
        }
    }
}

impl Default for LatLngField {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}

impl MultiValueField for LatLngField {
    fn arity(&self) -> usize {
        2
    }

    fn required(&self) -> bool {
        self.required
    }

    fn error_messages(&self) -> &ErrorMessages {
        &self.error_messages
    }

    /// Empty list is unset; otherwise latitude then longitude must be present.
    fn compress(&self, data: &[RawValue]) -> Result<Coordinate> {
        if data.is_empty() {
            return Ok(Coordinate::Unset);
        }

        let latitude = coerce_component(CoordinateField::Latitude, value_at(data, 0), &self.error_messages)?
            .ok_or_else(|| missing(CoordinateField::Latitude, &self.error_messages))?;
        let longitude = coerce_component(CoordinateField::Longitude, value_at(data, 1), &self.error_messages)?
            .ok_or_else(|| missing(CoordinateField::Longitude, &self.error_messages))?;

        Ok(Coordinate::new(latitude, longitude))
    }
}

/// Latitude, longitude and a clear checkbox, rendered with a map
#[derive(Debug, Clone, Default)]
pub struct MapField {
    inner: LatLngField,
}

impl MapField {
    pub fn new(config: &Config) -> Self {
        Self {
            inner: LatLngField::new(config),
        }
    }
}

impl MultiValueField for MapField {
    fn arity(&self) -> usize {
        3
    }

    fn required(&self) -> bool {
        self.inner.required
    }

    fn error_messages(&self) -> &ErrorMessages {
        &self.inner.error_messages
    }

    /// The clear flag wins over whatever coordinates were submitted.
    fn compress(&self, data: &[RawValue]) -> Result<Coordinate> {
        if !data.is_empty() && value_at(data, 2).as_flag() {
            tracing::debug!("clear flag set, discarding submitted coordinate");
            return Ok(Coordinate::Unset);
        }
        self.inner.compress(data)
    }
}

// =============================================================================
// Helpers
// =============================================================================

static NULL: RawValue = RawValue::Null;

fn value_at(data: &[RawValue], index: usize) -> &RawValue {
    data.get(index).unwrap_or(&NULL)
}

fn message_for(field: CoordinateField, messages: &ErrorMessages) -> &str {
    match field {
        CoordinateField::Latitude => &messages.invalid_latitude,
        CoordinateField::Longitude => &messages.invalid_longitude,
    }
}

fn missing(field: CoordinateField, messages: &ErrorMessages) -> QuickmapsError {
    QuickmapsError::invalid_field(field, message_for(field, messages))
}

/// Empty input is `None`; anything else must be a finite number
fn coerce_component(
    field: CoordinateField,
    raw: &RawValue,
    messages: &ErrorMessages,
) -> Result<Option<f64>> {
    let parsed = match raw {
        _ if raw.is_empty() => return Ok(None),
        RawValue::Number(n) => Some(*n),
        RawValue::Text(s) => s.trim().parse::<f64>().ok(),
        RawValue::Bool(_) | RawValue::Null => None,
    };
    match parsed {
        Some(n) if n.is_finite() => Ok(Some(n)),
        _ => Err(missing(field, messages)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_strings() {
        assert!(RawValue::from("on").as_flag());
        assert!(RawValue::from("True").as_flag());
        assert!(!RawValue::from("false").as_flag());
        assert!(!RawValue::from("0").as_flag());
        assert!(!RawValue::from("").as_flag());
        assert!(!RawValue::Null.as_flag());
    }

    #[test]
    fn test_blank_text_is_empty() {
        assert!(RawValue::from("   ").is_empty());
        assert!(!RawValue::from(0.0).is_empty());
        assert!(!RawValue::Bool(false).is_empty());
    }

    #[test]
    fn test_raw_value_from_option() {
        assert_eq!(RawValue::from(None::<f64>), RawValue::Null);
        assert_eq!(RawValue::from(Some(1.5)), RawValue::Number(1.5));
    }

    #[test]
    fn test_untagged_deserialize() {
        let values: Vec<RawValue> = serde_json::from_str(r#"[null, "10.5", -66.9, true]"#).unwrap();
        assert_eq!(
            values,
            vec![
                RawValue::Null,
                RawValue::Text("10.5".to_string()),
                RawValue::Number(-66.9),
                RawValue::Bool(true),
            ]
        );
    }
}
