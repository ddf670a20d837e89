//! Tests for the storage column
//!
//! These tests verify:
//! - Normalization of absent/empty/loose values before saving
//! - The two-key, string-or-number validation invariant
//! - Column blob encoding with checksum verification

use quickmaps::storage::{FORMAT_VERSION, HEADER_SIZE};
use quickmaps::{
    Config, Coordinate, CoordinateField, LatLng, LatLngColumn, MultiValueField, QuickmapsError,
};
use serde_json::{json, Value};

// =============================================================================
// Normalization Tests
// =============================================================================

#[test]
fn test_prepare_none_is_canonical_empty() {
    let column = LatLngColumn::default();

    assert_eq!(column.prepare(None).unwrap(), Coordinate::Unset);
    assert_eq!(column.prepare_value(None).unwrap(), json!({}));
}

#[test]
fn test_prepare_null_and_empty_are_canonical_empty() {
    let column = LatLngColumn::default();

    for value in [Value::Null, json!({}), json!(""), json!([])] {
        assert_eq!(column.prepare_value(Some(&value)).unwrap(), json!({}));
    }
}

#[test]
fn test_prepare_false_and_zero_are_canonical_empty() {
    let column = LatLngColumn::default();

    for value in [json!(false), json!(0), json!(0.0)] {
        assert_eq!(column.prepare(Some(&value)).unwrap(), Coordinate::Unset);
        assert!(column.validate(&value).is_ok());
    }
}

#[test]
fn test_prepare_true_is_not_a_dictionary() {
    let column = LatLngColumn::default();

    let err = column.prepare(Some(&json!(true))).unwrap_err();

    assert!(err.to_string().contains("is not a dictionary"));
}

#[test]
fn test_prepare_loose_dict_keeps_values() {
    let column = LatLngColumn::default();
    let loose = json!({"longitude": "-66.9", "latitude": 10.5});

    let value = column.prepare_value(Some(&loose)).unwrap();

    assert_eq!(value, json!({"latitude": 10.5, "longitude": -66.9}));
}

#[test]
fn test_prepare_drops_extra_keys() {
    let column = LatLngColumn::default();
    let loose = json!({"latitude": 1.0, "longitude": 2.0, "zoom": 12});

    let coordinate = column.prepare(Some(&loose)).unwrap();

    assert_eq!(coordinate, Coordinate::new(1.0, 2.0));
}

#[test]
fn test_prepare_missing_key_fails() {
    let column = LatLngColumn::default();

    let err = column.prepare(Some(&json!({"latitude": 1.0}))).unwrap_err();

    assert_eq!(err.field(), Some(CoordinateField::Longitude));
}

// =============================================================================
// Validation Tests
// =============================================================================

#[test]
fn test_validate_accepts_canonical() {
    let column = LatLngColumn::default();

    assert!(column.validate(&json!({"latitude": 10.5, "longitude": -66.9})).is_ok());
    assert!(column.validate(&json!({"latitude": "10.5", "longitude": "-66.9"})).is_ok());
}

#[test]
fn test_validate_empty_allowed_when_blank() {
    let column = LatLngColumn::default();

    assert!(column.validate(&json!({})).is_ok());
    assert!(column.validate(&Value::Null).is_ok());
}

#[test]
fn test_validate_empty_rejected_when_not_blank() {
    let column = LatLngColumn::new(Config::builder().blank(false).build());

    let err = column.validate(&json!({})).unwrap_err();

    assert!(matches!(err, QuickmapsError::Required(_)));
}

#[test]
fn test_validate_rejects_non_dictionary() {
    let column = LatLngColumn::default();

    let err = column.validate(&json!([10.5, -66.9])).unwrap_err();

    assert!(err.to_string().contains("is not a dictionary"));
    assert_eq!(err.field(), None);
}

#[test]
fn test_validate_rejects_missing_latitude() {
    let column = LatLngColumn::default();

    let err = column.validate(&json!({"longitude": 1.0})).unwrap_err();

    assert_eq!(err.field(), Some(CoordinateField::Latitude));
    assert!(err.to_string().contains("should have a latitude key"));
}

#[test]
fn test_validate_rejects_missing_longitude() {
    let column = LatLngColumn::default();

    let err = column.validate(&json!({"latitude": 1.0, "lng": 2.0})).unwrap_err();

    assert_eq!(err.field(), Some(CoordinateField::Longitude));
}

#[test]
fn test_validate_rejects_extra_keys() {
    let column = LatLngColumn::default();

    let err = column
        .validate(&json!({"latitude": 1.0, "longitude": 2.0, "zoom": 3}))
        .unwrap_err();

    assert!(err.to_string().contains("should only have two keys"));
}

#[test]
fn test_validate_rejects_unsupported_types() {
    let column = LatLngColumn::default();

    let err = column
        .validate(&json!({"latitude": true, "longitude": 2.0}))
        .unwrap_err();
    assert_eq!(err.field(), Some(CoordinateField::Latitude));

    let err = column
        .validate(&json!({"latitude": 1.0, "longitude": [2.0]}))
        .unwrap_err();
    assert_eq!(err.field(), Some(CoordinateField::Longitude));
    assert!(err.to_string().contains("is not a string or a float"));
}

#[test]
fn test_clean_validates_before_normalizing() {
    let column = LatLngColumn::default();

    assert!(column.clean(&json!({"latitude": 1.0, "longitude": 2.0, "x": 0})).is_err());
    assert_eq!(
        column.clean(&json!({"latitude": "1", "longitude": 2})).unwrap(),
        Coordinate::new(1.0, 2.0)
    );
}

// =============================================================================
// Blob Tests
// =============================================================================

#[test]
fn test_blob_set_value() {
    let column = LatLngColumn::default();
    let coordinate = Coordinate::new(10.5, -66.9);

    let blob = column.to_db(&coordinate).unwrap();

    assert_eq!(blob[0], FORMAT_VERSION);
    assert_eq!(column.from_db(&blob).unwrap(), coordinate);
}

#[test]
fn test_blob_unset_value() {
    let column = LatLngColumn::default();

    let blob = column.to_db(&Coordinate::Unset).unwrap();

    assert_eq!(column.from_db(&blob).unwrap(), Coordinate::Unset);
}

#[test]
fn test_blob_rejects_non_finite_on_write() {
    let column = LatLngColumn::default();

    for coordinate in [
        Coordinate::new(f64::NAN, 1.0),
        Coordinate::new(1.0, f64::INFINITY),
    ] {
        let err = column.to_db(&coordinate).unwrap_err();
        assert!(matches!(err, QuickmapsError::InvalidCoordinate { .. }));
    }
}

#[test]
fn test_blob_rejects_non_finite_on_read() {
    let column = LatLngColumn::default();

    // Well-formed frame with a valid checksum around a NaN latitude
    let payload = bincode::serialize(&Some(LatLng::new(f64::NAN, 1.0))).unwrap();
    let mut blob = vec![FORMAT_VERSION];
    blob.extend_from_slice(&crc32fast::hash(&payload).to_le_bytes());
    blob.extend_from_slice(&(payload.len() as u32).to_le_bytes());
    blob.extend_from_slice(&payload);

    let err = column.from_db(&blob).unwrap_err();

    assert!(matches!(err, QuickmapsError::Corruption(_)));
    assert!(err.to_string().contains("non-finite"));
}

#[test]
fn test_blob_truncated_header() {
    let column = LatLngColumn::default();

    let err = column.from_db(&[FORMAT_VERSION, 0, 0]).unwrap_err();

    assert!(matches!(err, QuickmapsError::Corruption(_)));
}

#[test]
fn test_blob_unknown_version() {
    let column = LatLngColumn::default();
    let mut blob = column.to_db(&Coordinate::new(1.0, 2.0)).unwrap();
    blob[0] = 0xEE;

    let err = column.from_db(&blob).unwrap_err();

    assert!(err.to_string().contains("unknown format version"));
}

#[test]
fn test_blob_checksum_mismatch() {
    let column = LatLngColumn::default();
    let mut blob = column.to_db(&Coordinate::new(1.0, 2.0)).unwrap();
    let last = blob.len() - 1;
    blob[last] ^= 0xFF;

    let err = column.from_db(&blob).unwrap_err();

    assert!(err.to_string().contains("checksum mismatch"));
}

#[test]
fn test_blob_length_mismatch() {
    let column = LatLngColumn::default();
    let mut blob = column.to_db(&Coordinate::new(1.0, 2.0)).unwrap();
    blob.push(0);

    let err = column.from_db(&blob).unwrap_err();

    assert!(matches!(err, QuickmapsError::Corruption(_)));
    assert!(blob.len() > HEADER_SIZE);
}

// =============================================================================
// Column Metadata Tests
// =============================================================================

#[test]
fn test_column_is_editable() {
    assert!(LatLngColumn::default().editable());
}

#[test]
fn test_formfield_is_map_field_with_column_config() {
    let column = LatLngColumn::new(Config::builder().required(false).build());

    let field = column.formfield();

    assert_eq!(field.arity(), 3);
    assert!(!field.required());
}
