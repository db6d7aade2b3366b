//! GeoJSON schema and collection normalization.
//!
//! The directory's input is a GeoJSON `FeatureCollection` whose features
//! carry application properties: a `location` name, a declared `coordinates`
//! pair used as the grouping key (distinct from the geometry's own
//! coordinates), and a `profiles` array of profile records.
//!
//! Parsing is strict at the document level (not JSON, or not a
//! `FeatureCollection`, is an error) and lenient at the feature level:
//! features with missing or malformed properties are skipped during
//! normalization with a warning, never failing the pass.

use log::warn;
use serde::{Deserialize, Serialize};

use crate::error::{DirectoryError, Result};
use crate::LngLat;

/// A GeoJSON feature collection of profile locations.
///
/// Obtain one through [`parse_feature_collection`]; the `type` tag is
/// validated there.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureCollection {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    pub features: Vec<Feature>,
}

/// One GeoJSON feature: a geometry plus the directory's properties.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Feature {
    #[serde(default)]
    pub geometry: Option<Geometry>,
    #[serde(default)]
    pub properties: Option<FeatureProperties>,
}

/// A GeoJSON geometry, kept permissive on the wire.
///
/// `coordinates` varies in shape per geometry type, so it is held as raw
/// JSON and validated by the typed accessors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Geometry {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub coordinates: serde_json::Value,
}

impl Geometry {
    /// Returns the position of a `Point` geometry, or `None` for any other
    /// geometry type or malformed coordinates.
    ///
    /// Accepts the optional third (altitude) element GeoJSON allows and
    /// ignores it.
    pub fn point(&self) -> Option<LngLat> {
        if self.kind != "Point" {
            return None;
        }
        let coords = self.coordinates.as_array()?;
        if coords.len() < 2 {
            return None;
        }
        let position = LngLat::new(coords[0].as_f64()?, coords[1].as_f64()?);
        position.is_valid().then_some(position)
    }
}

/// Application properties carried by each feature.
///
/// All fields are optional on the wire; [`normalize_records`] and the marker
/// builder fail closed, skipping features whose required properties are
/// absent rather than probing dynamically at each use site.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureProperties {
    #[serde(default)]
    pub location: Option<String>,
    /// Declared grouping coordinates, `[lng, lat]`. This is the key markers
    /// are labelled by, independent of the rendered geometry position. Held
    /// as raw JSON so a malformed pair skips one feature, not the document.
    #[serde(default)]
    pub coordinates: serde_json::Value,
    #[serde(default)]
    pub profiles: Vec<ProfileRecord>,
}

impl FeatureProperties {
    /// The location name, if present and non-empty.
    pub fn location_name(&self) -> Option<&str> {
        match self.location.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => Some(name),
            _ => None,
        }
    }

    /// The declared grouping coordinates, if they form a valid pair.
    ///
    /// Exactly two finite numbers are required; anything else is treated as
    /// malformed and the feature is skipped by its consumers.
    pub fn declared_coordinates(&self) -> Option<LngLat> {
        let coords = self.coordinates.as_array()?;
        if coords.len() != 2 {
            return None;
        }
        let position = LngLat::new(coords[0].as_f64()?, coords[1].as_f64()?);
        position.is_valid().then_some(position)
    }

    /// Profiles with a usable identity (non-empty `uid` and `name`).
    pub fn valid_profiles(&self) -> impl Iterator<Item = &ProfileRecord> {
        self.profiles.iter().filter(|p| p.is_valid())
    }
}

/// One profile as carried by the upstream CMS.
///
/// `uid` and `name` are required for the profile to participate in the
/// directory; the descriptive fields are passed through for detail views.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileRecord {
    #[serde(default)]
    pub uid: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub about: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stackoverflow: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub twitter: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instagram: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

impl ProfileRecord {
    /// True if the profile carries the identity fields the directory needs.
    pub fn is_valid(&self) -> bool {
        !self.uid.is_empty() && !self.name.is_empty()
    }
}

/// One location entry: a profile reference at a declared coordinate.
///
/// Records are created from the raw profile data during normalization,
/// one per (feature, profile) pairing, so the number of records at a
/// coordinate equals the number of profiles there. They are immutable for
/// the duration of an ingestion pass and rebuilt on refetch.
#[derive(Debug, Clone, PartialEq)]
pub struct LocationRecord {
    /// Ordinal within the ingestion pass.
    pub id: usize,
    /// Location name, non-empty.
    pub location: String,
    /// Declared grouping coordinates.
    pub position: LngLat,
    /// Profile uids this entry references. The upstream CMS models one
    /// location entry per profile, so this is typically a single uid.
    pub profile_refs: Vec<String>,
}

/// Parses a GeoJSON string into a [`FeatureCollection`].
///
/// Fails only at the document level; per-feature problems are deferred to
/// normalization, which skips the offending feature.
///
/// # Example
/// ```
/// use map_directory::parse_feature_collection;
///
/// let collection = parse_feature_collection(
///     r#"{ "type": "FeatureCollection", "features": [] }"#,
/// ).unwrap();
/// assert!(collection.features.is_empty());
///
/// assert!(parse_feature_collection(r#"{ "type": "Feature" }"#).is_err());
/// ```
pub fn parse_feature_collection(input: &str) -> Result<FeatureCollection> {
    let collection: FeatureCollection = serde_json::from_str(input)?;
    if collection.kind != "FeatureCollection" {
        return Err(DirectoryError::NotACollection(collection.kind));
    }
    Ok(collection)
}

/// Normalizes a feature collection into location records.
///
/// One record is produced per valid profile of each feature that carries a
/// location name and declared coordinates. Features missing either are
/// skipped with a warning; profiles without identity are dropped. The
/// output order follows the collection, so repeat passes over an unchanged
/// collection yield identical records.
pub fn normalize_records(collection: &FeatureCollection) -> Vec<LocationRecord> {
    let mut records = Vec::new();
    for (index, feature) in collection.features.iter().enumerate() {
        let Some(props) = feature.properties.as_ref() else {
            warn!("feature {}: no properties, skipping", index);
            continue;
        };
        let Some(location) = props.location_name() else {
            warn!("feature {}: missing location name, skipping", index);
            continue;
        };
        let Some(position) = props.declared_coordinates() else {
            warn!(
                "feature {} ({}): missing or malformed coordinates, skipping",
                index, location
            );
            continue;
        };
        for profile in props.valid_profiles() {
            records.push(LocationRecord {
                id: records.len(),
                location: location.to_string(),
                position,
                profile_refs: vec![profile.uid.clone()],
            });
        }
    }
    records
}

/// Parallel variant of [`normalize_records`] for very large collections.
///
/// Produces the same records in the same order as the sequential version;
/// record ids are assigned after the parallel pass to keep them ordinal.
#[cfg(feature = "parallel")]
pub fn normalize_records_parallel(collection: &FeatureCollection) -> Vec<LocationRecord> {
    use rayon::prelude::*;

    let mut records: Vec<LocationRecord> = collection
        .features
        .par_iter()
        .flat_map_iter(|feature| {
            let entry = feature.properties.as_ref().and_then(|props| {
                Some((props, props.location_name()?, props.declared_coordinates()?))
            });
            let feature_records: Vec<LocationRecord> = match entry {
                Some((props, location, position)) => props
                    .valid_profiles()
                    .map(|profile| LocationRecord {
                        id: 0,
                        location: location.to_string(),
                        position,
                        profile_refs: vec![profile.uid.clone()],
                    })
                    .collect(),
                None => Vec::new(),
            };
            feature_records
        })
        .collect();
    for (id, record) in records.iter_mut().enumerate() {
        record.id = id;
    }
    records
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_collection() -> FeatureCollection {
        parse_feature_collection(
            r#"{
                "type": "FeatureCollection",
                "features": [
                    {
                        "type": "Feature",
                        "geometry": { "type": "Point", "coordinates": [13.405, 52.52] },
                        "properties": {
                            "location": "Berlin",
                            "coordinates": [13.405, 52.52],
                            "profiles": [
                                { "uid": "p-1", "name": "Ada" },
                                { "uid": "p-2", "name": "Grace" }
                            ]
                        }
                    },
                    {
                        "type": "Feature",
                        "geometry": { "type": "Point", "coordinates": [2.3522, 48.8566] },
                        "properties": {
                            "location": "Paris",
                            "coordinates": [2.3522, 48.8566],
                            "profiles": [{ "uid": "p-3", "name": "Blaise" }]
                        }
                    }
                ]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_parses_a_feature_collection() {
        let collection = sample_collection();
        assert_eq!(collection.features.len(), 2);
    }

    #[test]
    fn test_rejects_non_collections() {
        let err = parse_feature_collection(r#"{ "type": "Feature" }"#).unwrap_err();
        assert!(matches!(err, DirectoryError::NotACollection(kind) if kind == "Feature"));
    }

    #[test]
    fn test_rejects_invalid_json() {
        assert!(parse_feature_collection("{").is_err());
    }

    #[test]
    fn test_point_accessor_ignores_other_geometries() {
        let line = Geometry {
            kind: "LineString".to_string(),
            coordinates: serde_json::json!([[0.0, 0.0], [1.0, 1.0]]),
        };
        assert!(line.point().is_none());

        let point = Geometry {
            kind: "Point".to_string(),
            coordinates: serde_json::json!([13.405, 52.52, 34.0]),
        };
        let position = point.point().unwrap();
        assert_eq!(position.lng, 13.405);
        assert_eq!(position.lat, 52.52);
    }

    #[test]
    fn test_point_accessor_rejects_malformed_coordinates() {
        let short = Geometry {
            kind: "Point".to_string(),
            coordinates: serde_json::json!([13.405]),
        };
        assert!(short.point().is_none());

        let out_of_range = Geometry {
            kind: "Point".to_string(),
            coordinates: serde_json::json!([13.405, 95.0]),
        };
        assert!(out_of_range.point().is_none());
    }

    #[test]
    fn test_normalization_flattens_profiles_into_records() {
        let records = normalize_records(&sample_collection());
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].location, "Berlin");
        assert_eq!(records[0].profile_refs, vec!["p-1".to_string()]);
        assert_eq!(records[2].location, "Paris");
        // Ids are ordinal within the pass.
        assert_eq!(records.iter().map(|r| r.id).collect::<Vec<_>>(), vec![0, 1, 2]);
    }

    #[test]
    fn test_normalization_skips_incomplete_features() {
        let collection = parse_feature_collection(
            r#"{
                "type": "FeatureCollection",
                "features": [
                    { "type": "Feature", "properties": { "location": "Nowhere" } },
                    {
                        "type": "Feature",
                        "properties": {
                            "location": "  ",
                            "coordinates": [1.0, 1.0],
                            "profiles": [{ "uid": "p-9", "name": "Nobody" }]
                        }
                    },
                    {
                        "type": "Feature",
                        "properties": {
                            "location": "Bad pair",
                            "coordinates": "13.4,52.5",
                            "profiles": [{ "uid": "p-8", "name": "Nowhere near" }]
                        }
                    },
                    {
                        "type": "Feature",
                        "properties": {
                            "location": "Lima",
                            "coordinates": [-77.0428, -12.0464],
                            "profiles": [
                                { "uid": "", "name": "No uid" },
                                { "uid": "p-4", "name": "Mario" }
                            ]
                        }
                    }
                ]
            }"#,
        )
        .unwrap();

        let records = normalize_records(&collection);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].location, "Lima");
        assert_eq!(records[0].profile_refs, vec!["p-4".to_string()]);
    }

    #[test]
    fn test_normalization_is_idempotent() {
        let collection = sample_collection();
        assert_eq!(normalize_records(&collection), normalize_records(&collection));
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn test_parallel_normalization_matches_sequential() {
        let collection = sample_collection();
        assert_eq!(
            normalize_records_parallel(&collection),
            normalize_records(&collection)
        );
    }
}
