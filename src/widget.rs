//! Widgets
//!
//! The display side of the coordinate field: splits a [`Coordinate`] back into
//! sub-values for re-rendering, collects sub-values out of submitted form data,
//! and builds the data a map template is rendered with.
//!
//! ## Input Naming
//! ```text
//! {name}_0  latitude
//! {name}_1  longitude
//! {name}_2  clear checkbox (MapWidget only)
//! {name}_map  map element
//! ```

use std::collections::HashMap;

use serde::Serialize;

use crate::config::Config;
use crate::coordinate::{Coordinate, LatLng};
use crate::form::RawValue;

/// Sub-values shown for a coordinate: latitude, longitude
pub type LatLngParts = [Option<f64>; 2];

/// Sub-values shown for a coordinate: latitude, longitude, clear
pub type MapParts = (Option<f64>, Option<f64>, bool);

/// Two plain text inputs
#[derive(Debug, Clone, Copy, Default)]
pub struct LatLngWidget;

impl LatLngWidget {
    pub fn decompress(&self, value: &Coordinate) -> LatLngParts {
        [value.latitude(), value.longitude()]
    }

    pub fn value_from_data(&self, data: &HashMap<String, String>, name: &str) -> Vec<RawValue> {
        (0..2).map(|i| submitted(data, name, i)).collect()
    }
}

/// Two hidden inputs, a clear checkbox, and a map
#[derive(Debug, Clone)]
pub struct MapWidget {
    default_location: LatLng,
    map_template_name: String,
    map_width: u32,
    map_height: u32,
    map_zoom: u8,
}

impl MapWidget {
    pub fn new(config: &Config) -> Self {
        Self {
            default_location: config.default_location,
            map_template_name: config.map_template_name.clone(),
            map_width: config.map_width,
            map_height: config.map_height,
            map_zoom: config.map_zoom,
        }
    }

    /// The clear flag always starts unticked.
    pub fn decompress(&self, value: &Coordinate) -> MapParts {
        (value.latitude(), value.longitude(), false)
    }

    /// Collect the three sub-values submitted under `name`.
    ///
    /// An unticked checkbox is simply absent from the data, so a missing
    /// `{name}_2` reads as `false`.
    pub fn value_from_data(&self, data: &HashMap<String, String>, name: &str) -> Vec<RawValue> {
        let mut values: Vec<RawValue> = (0..2).map(|i| submitted(data, name, i)).collect();
        let clear = data
            .get(&format!("{}_2", name))
            .map(|v| RawValue::from(v.as_str()).as_flag())
            .unwrap_or(false);
        values.push(RawValue::Bool(clear));
        values
    }

    /// Everything the map template needs to draw the widget.
    ///
    /// Without a value the map is centred on the default location and no
    /// marker is pinned.
    pub fn context(&self, name: &str, id: &str, value: &Coordinate) -> MapContext {
        let (location, pin_marker) = match value.lat_lng() {
            Some(ll) => (ll, true),
            None => (self.default_location, false),
        };

        MapContext {
            location,
            pin_marker,
            map: MapAttrs {
                id: id.to_string(),
                name: format!("{}_map", name),
                width: self.map_width,
                height: self.map_height,
                zoom: self.map_zoom,
            },
            input: InputIds {
                latitude: format!("{}_0", id),
                longitude: format!("{}_1", id),
            },
        }
    }

    pub fn template_name(&self) -> &str {
        &self.map_template_name
    }
}

impl Default for MapWidget {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}

/// Template context for a map widget
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapContext {
    pub location: LatLng,
    pub pin_marker: bool,
    pub map: MapAttrs,
    pub input: InputIds,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapAttrs {
    pub id: String,
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub zoom: u8,
}

/// DOM ids of the latitude/longitude inputs the map writes into
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InputIds {
    pub latitude: String,
    pub longitude: String,
}

fn submitted(data: &HashMap<String, String>, name: &str, index: usize) -> RawValue {
    data.get(&format!("{}_{}", name, index))
        .map(|v| RawValue::Text(v.clone()))
        .unwrap_or(RawValue::Null)
}
