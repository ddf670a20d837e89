//! Configuration for quickmaps
//!
//! Centralized configuration with sensible defaults.

use crate::coordinate::LatLng;
use crate::error::{QuickmapsError, Result};

/// Highest zoom level the map widget accepts
pub const MAX_MAP_ZOOM: u8 = 21;

/// Main configuration shared by the form field, widget and storage column
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Map Widget Configuration
    // -------------------------------------------------------------------------
    /// Where the map is centred when no location is set (Caracas)
    pub default_location: LatLng,

    /// Map width in pixels
    pub map_width: u32,

    /// Map height in pixels
    pub map_height: u32,

    /// Initial zoom level
    pub map_zoom: u8,

    /// Template the map widget is rendered with
    pub map_template_name: String,

    // -------------------------------------------------------------------------
    // Form Configuration
    // -------------------------------------------------------------------------
    /// Whether a blank submission is rejected
    pub required: bool,

    /// User-facing validation messages
    pub error_messages: ErrorMessages,

    // -------------------------------------------------------------------------
    // Storage Configuration
    // -------------------------------------------------------------------------
    /// Whether the column accepts the empty coordinate without validation
    pub blank: bool,
}

/// Messages surfaced when a submitted coordinate is rejected
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorMessages {
    pub invalid_latitude: String,
    pub invalid_longitude: String,
    pub required: String,
}

impl Default for ErrorMessages {
    fn default() -> Self {
        Self {
            invalid_latitude: "Enter a valid latitude.".to_string(),
            invalid_longitude: "Enter a valid longitude.".to_string(),
            required: "This field is required.".to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_location: LatLng::new(10.49929, -66.900558),
            map_width: 300,
            map_height: 300,
            map_zoom: 12,
            map_template_name: "maps/map_widget.html".to_string(),
            required: true,
            error_messages: ErrorMessages::default(),
            blank: true,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Check that the values make sense together
    pub fn validate(&self) -> Result<()> {
        if self.map_width == 0 || self.map_height == 0 {
            return Err(QuickmapsError::Config(format!(
                "map size must be non-zero, got {}x{}",
                self.map_width, self.map_height
            )));
        }
        if self.map_zoom > MAX_MAP_ZOOM {
            return Err(QuickmapsError::Config(format!(
                "map zoom {} exceeds maximum {}",
                self.map_zoom, MAX_MAP_ZOOM
            )));
        }
        if self.map_template_name.is_empty() {
            return Err(QuickmapsError::Config(
                "map template name must not be empty".to_string(),
            ));
        }
        if !self.default_location.is_finite() {
            return Err(QuickmapsError::Config(format!(
                "default location must be finite, got {:?}",
                self.default_location
            )));
        }
        Ok(())
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the location the map centres on when nothing is set
    pub fn default_location(mut self, location: LatLng) -> Self {
        self.config.default_location = location;
        self
    }

    /// Set the map size in pixels
    pub fn map_size(mut self, width: u32, height: u32) -> Self {
        self.config.map_width = width;
        self.config.map_height = height;
        self
    }

    /// Set the initial zoom level
    pub fn map_zoom(mut self, zoom: u8) -> Self {
        self.config.map_zoom = zoom;
        self
    }

    /// Set the map template name
    pub fn map_template_name(mut self, name: impl Into<String>) -> Self {
        self.config.map_template_name = name.into();
        self
    }

    /// Set whether a blank submission is an error
    pub fn required(mut self, required: bool) -> Self {
        self.config.required = required;
        self
    }

    /// Set whether the storage column accepts the empty coordinate
    pub fn blank(mut self, blank: bool) -> Self {
        self.config.blank = blank;
        self
    }

    /// Override the invalid-latitude message
    pub fn invalid_latitude_message(mut self, message: impl Into<String>) -> Self {
        self.config.error_messages.invalid_latitude = message.into();
        self
    }

    /// Override the invalid-longitude message
    pub fn invalid_longitude_message(mut self, message: impl Into<String>) -> Self {
        self.config.error_messages.invalid_longitude = message.into();
        self
    }

    /// Override the required message
    pub fn required_message(mut self, message: impl Into<String>) -> Self {
        self.config.error_messages.required = message.into();
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
