//! # Map Directory
//!
//! Feature-to-marker reconciliation, coordinate grouping and selection for
//! an interactive profile directory map.
//!
//! This library provides:
//! - GeoJSON feature collection parsing and normalization into location records
//! - Exact-coordinate grouping and marker synthesis with record-count labels
//! - Cluster click resolution (single-location select vs. bounds fit)
//! - A single-writer selection with picker and detail panel read models
//! - A surface-driving directory engine plus a radius clusterer
//!
//! ## Features
//!
//! - **`parallel`** - Enable parallel collection normalization with rayon
//!
//! ## Quick Start
//!
//! ```rust
//! use map_directory::{
//!     build_markers, group_by_coordinate, normalize_records, parse_feature_collection,
//! };
//!
//! let collection = parse_feature_collection(r#"{
//!     "type": "FeatureCollection",
//!     "features": [{
//!         "type": "Feature",
//!         "geometry": { "type": "Point", "coordinates": [13.405, 52.52] },
//!         "properties": {
//!             "location": "Berlin",
//!             "coordinates": [13.405, 52.52],
//!             "profiles": [
//!                 { "uid": "p-1", "name": "Ada" },
//!                 { "uid": "p-2", "name": "Grace" }
//!             ]
//!         }
//!     }]
//! }"#).unwrap();
//!
//! let records = normalize_records(&collection);
//! let groups = group_by_coordinate(&records);
//! let markers = build_markers(&collection, &groups);
//!
//! assert_eq!(markers.len(), 1);
//! assert_eq!(markers[0].label, "2");
//! ```

// GeoJSON schema, parsing and record normalization
pub mod collection;

// Exact-coordinate grouping
pub mod grouping;

// Marker synthesis
pub mod markers;

// Cluster click resolution
pub mod cluster;

// Built-in radius clusterer
pub mod clusterer;

// Selection state, picker and detail read models
pub mod selection;

// The surface-driving engine
pub mod directory;

// Error types
pub mod error;

#[cfg(feature = "parallel")]
pub use collection::normalize_records_parallel;
pub use collection::{
    normalize_records, parse_feature_collection, Feature, FeatureCollection, FeatureProperties,
    Geometry, LocationRecord, ProfileRecord,
};

pub use cluster::{resolve_cluster, ClusterEvent, ResolvedAction};
pub use clusterer::GridClusterer;
pub use directory::{MapDirectory, MapSurface};
pub use error::{DirectoryError, Result};
pub use grouping::{group_by_coordinate, records_at, CoordKey};
pub use markers::{build_markers, MarkerDescriptor};
pub use selection::{
    detail_for, DetailContent, PickerOption, PickerOptions, Selection, SelectionState,
    GROUP_LOCATIONS, GROUP_PROFILES,
};

/// View center applied when bounds fitting is disabled.
pub const DEFAULT_CENTER: LngLat = LngLat { lng: 0.0, lat: 0.0 };

/// Zoom level applied when bounds fitting is disabled.
pub const DEFAULT_ZOOM: u8 = 2;

/// Grouping radius of the built-in clusterer, in meters.
pub const DEFAULT_CLUSTER_RADIUS_METERS: f64 = 100.0;

/// A geographic position, longitude first.
///
/// The field order matches GeoJSON and the upstream data; keeping one
/// order everywhere avoids the classic lat/lng swap.
///
/// # Example
/// ```
/// use map_directory::LngLat;
///
/// let berlin = LngLat::new(13.405, 52.52);
/// assert!(berlin.is_valid());
/// assert!(!LngLat::new(200.0, 0.0).is_valid());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LngLat {
    pub lng: f64,
    pub lat: f64,
}

impl LngLat {
    /// Create a new position.
    pub fn new(lng: f64, lat: f64) -> Self {
        Self { lng, lat }
    }

    /// Check if the position has valid coordinates.
    pub fn is_valid(&self) -> bool {
        self.lng.is_finite()
            && self.lat.is_finite()
            && self.lng >= -180.0
            && self.lng <= 180.0
            && self.lat >= -90.0
            && self.lat <= 90.0
    }
}

/// Bounding box over positions.
///
/// Starts empty and only ever grows: [`extend`](Bounds::extend) widens the
/// box to admit a position and nothing shrinks it, so fitting the view to
/// the box as markers land never loses an earlier marker.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lng: f64,
    pub max_lng: f64,
}

impl Bounds {
    /// An empty box admitting nothing.
    pub fn empty() -> Self {
        Self {
            min_lat: f64::MAX,
            max_lat: f64::MIN,
            min_lng: f64::MAX,
            max_lng: f64::MIN,
        }
    }

    /// Create bounds spanning the given positions, `None` for no positions.
    pub fn from_points(points: &[LngLat]) -> Option<Self> {
        if points.is_empty() {
            return None;
        }
        let mut bounds = Self::empty();
        for p in points {
            bounds.extend(*p);
        }
        Some(bounds)
    }

    /// Widen the box to admit a position.
    pub fn extend(&mut self, position: LngLat) {
        self.min_lat = self.min_lat.min(position.lat);
        self.max_lat = self.max_lat.max(position.lat);
        self.min_lng = self.min_lng.min(position.lng);
        self.max_lng = self.max_lng.max(position.lng);
    }

    /// True until the first `extend`.
    pub fn is_empty(&self) -> bool {
        self.min_lat > self.max_lat || self.min_lng > self.max_lng
    }

    /// Check whether a position lies inside the box.
    pub fn contains(&self, position: LngLat) -> bool {
        position.lat >= self.min_lat
            && position.lat <= self.max_lat
            && position.lng >= self.min_lng
            && position.lng <= self.max_lng
    }

    /// Get the center point of the bounds, `None` while empty.
    pub fn center(&self) -> Option<LngLat> {
        if self.is_empty() {
            return None;
        }
        Some(LngLat::new(
            (self.min_lng + self.max_lng) / 2.0,
            (self.min_lat + self.max_lat) / 2.0,
        ))
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self::empty()
    }
}

/// Engine configuration.
///
/// The two flags mirror the hosting product's feature toggles; both
/// default to off, leaving plain markers on a world view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectoryOptions {
    /// Collect markers into the built-in clusterer.
    pub marker_clusterer: bool,
    /// Fit the view to the accumulated bounds as markers land.
    pub bounds: bool,
    /// View center applied at construction.
    pub default_center: LngLat,
    /// Zoom level applied at construction.
    pub default_zoom: u8,
    /// Grouping radius for the built-in clusterer.
    pub cluster_radius_meters: f64,
}

impl Default for DirectoryOptions {
    fn default() -> Self {
        Self {
            marker_clusterer: false,
            bounds: false,
            default_center: DEFAULT_CENTER,
            default_zoom: DEFAULT_ZOOM,
            cluster_radius_meters: DEFAULT_CLUSTER_RADIUS_METERS,
        }
    }
}
