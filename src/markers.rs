//! Marker synthesis.
//!
//! Each `Point` feature of the collection becomes one marker descriptor.
//! The marker is *rendered* at the geometry's position but *labelled* by
//! the feature's declared `coordinates` property: the label is the number
//! of location records grouped under that declared pair. The two are
//! deliberately decoupled, matching the upstream data model where the
//! geometry places the pin and the property identifies the location.
//!
//! Non-`Point` features and features with missing or malformed properties
//! are skipped with a warning; they never fail the pass.

use std::collections::HashMap;

use log::warn;

use crate::collection::FeatureCollection;
use crate::grouping::CoordKey;
use crate::LngLat;

/// Everything a map surface needs to render one marker.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerDescriptor {
    /// Rendered position, from the feature's `Point` geometry.
    pub position: LngLat,
    /// Declared grouping coordinates, carried as the click payload.
    pub key: LngLat,
    /// Display label: the record count at `key`, rendered as text.
    pub label: String,
    /// Number of location records grouped under `key`.
    pub source_record_count: usize,
}

/// Builds marker descriptors for every `Point` feature of the collection.
///
/// `groups` is the output of [`group_by_coordinate`] over the same pass's
/// records; a declared coordinate with no records yields a `0` label. The
/// output order follows the collection, so the same input always produces
/// the same markers.
///
/// [`group_by_coordinate`]: crate::grouping::group_by_coordinate
pub fn build_markers(
    collection: &FeatureCollection,
    groups: &HashMap<CoordKey, usize>,
) -> Vec<MarkerDescriptor> {
    let mut markers = Vec::new();
    for (index, feature) in collection.features.iter().enumerate() {
        let Some(position) = feature.geometry.as_ref().and_then(|g| g.point()) else {
            // LineStrings, polygons, and malformed points have no pin.
            continue;
        };
        let Some(props) = feature.properties.as_ref() else {
            warn!("feature {}: point without properties, skipping marker", index);
            continue;
        };
        let Some(key) = props.declared_coordinates() else {
            warn!(
                "feature {}: point without declared coordinates, skipping marker",
                index
            );
            continue;
        };
        let count = groups.get(&CoordKey::of(key)).copied().unwrap_or(0);
        markers.push(MarkerDescriptor {
            position,
            key,
            label: count.to_string(),
            source_record_count: count,
        });
    }
    markers
}
