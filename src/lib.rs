//! # quickmaps
//!
//! Latitude/longitude as a single logical model field:
//! - A coordinate value that is either set or explicitly unset
//! - Multi-part form fields (two numeric inputs, plus a clear checkbox)
//! - Widgets that split a coordinate back into inputs and describe the map
//! - A storage column that normalizes, validates and serializes the value
//!
//! ## Data Flow
//!
//! ```text
//!   submitted data ──► MapWidget::value_from_data ──► [lat, lng, clear]
//!                                                         │
//!                                                         ▼
//!                                               MapField::clean / compress
//!                                                         │
//!                                                         ▼
//!   MapWidget::decompress ◄────────────────────────── Coordinate
//!   MapWidget::context                                    │
//!                                                         ▼
//!                                            LatLngColumn::prepare / to_db
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod coordinate;
pub mod form;
pub mod widget;
pub mod storage;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{QuickmapsError, Result};
pub use config::Config;
pub use coordinate::{Coordinate, CoordinateField, LatLng};
pub use form::{LatLngField, MapField, MultiValueField, RawValue};
pub use widget::{LatLngWidget, MapWidget};
pub use storage::LatLngColumn;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of quickmaps
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
