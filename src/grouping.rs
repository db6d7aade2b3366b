//! Coordinate grouping.
//!
//! Locations are grouped by *bit-exact* coordinate equality: two records
//! share a group only if their declared coordinates are identical as
//! ingested. No epsilon comparison is performed, and none is wanted: the
//! upstream CMS writes the same literal pair for every profile at a shared
//! office, so exact equality is the correct grouping key and anything
//! fuzzier would merge genuinely distinct nearby locations.
//!
//! Known limitation: coordinates for the "same" place arriving from
//! independent sources can differ in the last bits and will then not
//! group. That is accepted; do not paper over it with a tolerance.
//!
//! Keys are the raw IEEE-754 bit patterns of the pair, which makes them
//! hashable without any float-in-hashmap caveats. Counting is a single
//! pass over the records.

use std::collections::HashMap;

use crate::collection::LocationRecord;
use crate::LngLat;

/// Hashable identity of a coordinate pair, by exact bit pattern.
///
/// `-0.0` and `0.0` are distinct keys, as are any two NaN payloads; the
/// records this is built from are validated finite, so in practice the
/// distinction only matters for the signed zero, which is preserved as
/// ingested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CoordKey([u64; 2]);

impl CoordKey {
    /// The key for a position, in `(lng, lat)` order.
    pub fn of(position: LngLat) -> Self {
        Self([position.lng.to_bits(), position.lat.to_bits()])
    }
}

/// Counts location records per exact coordinate.
///
/// The sum of all group counts equals the number of input records; the
/// same input always produces the same map.
///
/// # Example
/// ```
/// use map_directory::{group_by_coordinate, normalize_records, parse_feature_collection};
///
/// let collection = parse_feature_collection(r#"{
///     "type": "FeatureCollection",
///     "features": [{
///         "type": "Feature",
///         "geometry": { "type": "Point", "coordinates": [13.405, 52.52] },
///         "properties": {
///             "location": "Berlin",
///             "coordinates": [13.405, 52.52],
///             "profiles": [
///                 { "uid": "p-1", "name": "Ada" },
///                 { "uid": "p-2", "name": "Grace" }
///             ]
///         }
///     }]
/// }"#).unwrap();
///
/// let records = normalize_records(&collection);
/// let groups = group_by_coordinate(&records);
/// assert_eq!(groups.len(), 1);
/// assert_eq!(groups.values().sum::<usize>(), records.len());
/// ```
pub fn group_by_coordinate(records: &[LocationRecord]) -> HashMap<CoordKey, usize> {
    let mut groups = HashMap::new();
    for record in records {
        *groups.entry(CoordKey::of(record.position)).or_insert(0) += 1;
    }
    groups
}

/// The records declared at exactly this position, in ingestion order.
pub fn records_at(records: &[LocationRecord], position: LngLat) -> Vec<&LocationRecord> {
    let key = CoordKey::of(position);
    records
        .iter()
        .filter(|record| CoordKey::of(record.position) == key)
        .collect()
}
