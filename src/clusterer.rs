//! Grid clustering of markers.
//!
//! A small clustering primitive for hosts that do not bring their own:
//! markers within a fixed radius of a seed marker are grouped into one
//! cluster. Seeds are taken in insertion order and each marker belongs to
//! exactly one cluster, so the same marker set always produces the same
//! clusters.
//!
//! Neighbor lookup runs on an R-tree over the marker positions. The query
//! radius is converted from meters to degrees at the seed's latitude for
//! the coarse pass, then each candidate is confirmed with the haversine
//! distance.
//!
//! The click resolution in [`crate::cluster`] accepts events from any
//! producer; this one is just the default.

use geo::{Distance, Haversine, Point};
use log::debug;
use rstar::RTree;

use crate::cluster::ClusterEvent;
use crate::markers::MarkerDescriptor;

const METERS_PER_DEGREE: f64 = 111_320.0;

/// A marker position with its index in the insertion order.
#[derive(Debug, Clone, Copy)]
struct IndexedMarker {
    point: Point<f64>,
    index: usize,
}

impl rstar::RTreeObject for IndexedMarker {
    type Envelope = rstar::AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        rstar::AABB::from_point([self.point.x(), self.point.y()])
    }
}

impl rstar::PointDistance for IndexedMarker {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.point.x() - point[0];
        let dy = self.point.y() - point[1];
        dx * dx + dy * dy
    }
}

/// Radius-based marker clusterer.
///
/// Collects markers during an ingestion pass and groups them on demand.
/// `clear` drops the collected markers so a refetch can rebuild the set
/// atomically.
#[derive(Debug, Clone)]
pub struct GridClusterer {
    radius_meters: f64,
    markers: Vec<MarkerDescriptor>,
}

impl GridClusterer {
    /// A clusterer grouping markers within `radius_meters` of each other.
    pub fn new(radius_meters: f64) -> Self {
        Self {
            radius_meters,
            markers: Vec::new(),
        }
    }

    pub fn add_marker(&mut self, marker: MarkerDescriptor) {
        self.markers.push(marker);
    }

    pub fn clear(&mut self) {
        self.markers.clear();
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    pub fn markers(&self) -> &[MarkerDescriptor] {
        &self.markers
    }

    /// Groups the collected markers into cluster events.
    ///
    /// Single markers come back as one-member events; hosts that render
    /// those as plain pins can filter on member count.
    pub fn clusters(&self) -> Vec<ClusterEvent> {
        if self.markers.is_empty() {
            return Vec::new();
        }

        let tree = RTree::bulk_load(
            self.markers
                .iter()
                .enumerate()
                .map(|(index, marker)| IndexedMarker {
                    point: Point::new(marker.position.lng, marker.position.lat),
                    index,
                })
                .collect(),
        );

        let mut visited = vec![false; self.markers.len()];
        let mut clusters = Vec::new();
        for seed in 0..self.markers.len() {
            if visited[seed] {
                continue;
            }
            let center = self.markers[seed].position;
            let center_point = Point::new(center.lng, center.lat);

            // Coarse query in degree space, at the seed's latitude.
            let lat_radius = self.radius_meters / METERS_PER_DEGREE;
            let lng_radius =
                self.radius_meters / (METERS_PER_DEGREE * center.lat.to_radians().cos().max(0.01));
            let search_radius = lat_radius.max(lng_radius);

            let mut members: Vec<usize> = tree
                .locate_within_distance(
                    [center.lng, center.lat],
                    search_radius * search_radius,
                )
                .filter(|candidate| !visited[candidate.index])
                .filter(|candidate| {
                    Haversine::distance(center_point, candidate.point) <= self.radius_meters
                })
                .map(|candidate| candidate.index)
                .collect();
            members.sort_unstable();

            for &index in &members {
                visited[index] = true;
            }
            clusters.push(ClusterEvent::from_markers(
                members
                    .iter()
                    .map(|&index| self.markers[index].clone())
                    .collect(),
            ));
        }

        debug!(
            "clustered {} markers into {} clusters (radius {} m)",
            self.markers.len(),
            clusters.len(),
            self.radius_meters,
        );
        clusters
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cluster::{resolve_cluster, ResolvedAction};
    use crate::LngLat;

    fn marker(lng: f64, lat: f64) -> MarkerDescriptor {
        let position = LngLat::new(lng, lat);
        MarkerDescriptor {
            position,
            key: position,
            label: "1".to_string(),
            source_record_count: 1,
        }
    }

    #[test]
    fn test_groups_markers_within_the_radius() {
        let mut clusterer = GridClusterer::new(100.0);
        clusterer.add_marker(marker(13.405, 52.52));
        // About 50 m north.
        clusterer.add_marker(marker(13.405, 52.52045));

        let clusters = clusterer.clusters();
        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].markers.len(), 2);
    }

    #[test]
    fn test_keeps_distant_markers_apart() {
        let mut clusterer = GridClusterer::new(100.0);
        clusterer.add_marker(marker(13.405, 52.52));
        clusterer.add_marker(marker(2.3522, 48.8566));

        let clusters = clusterer.clusters();
        assert_eq!(clusters.len(), 2);
        assert!(clusters.iter().all(|c| c.markers.len() == 1));
    }

    #[test]
    fn test_honours_the_radius_boundary() {
        let mut clusterer = GridClusterer::new(100.0);
        clusterer.add_marker(marker(13.405, 52.52));
        // About 200 m north, outside a 100 m radius.
        clusterer.add_marker(marker(13.405, 52.5218));

        assert_eq!(clusterer.clusters().len(), 2);
    }

    #[test]
    fn test_same_position_markers_resolve_to_a_selection() {
        let mut clusterer = GridClusterer::new(100.0);
        clusterer.add_marker(marker(13.405, 52.52));
        clusterer.add_marker(marker(13.405, 52.52));

        let clusters = clusterer.clusters();
        assert_eq!(clusters.len(), 1);
        assert_eq!(
            resolve_cluster(&clusters[0]),
            Some(ResolvedAction::SelectLocation(LngLat::new(13.405, 52.52))),
        );
    }

    #[test]
    fn test_clustering_is_deterministic() {
        let mut clusterer = GridClusterer::new(150.0);
        for (lng, lat) in [
            (13.405, 52.52),
            (13.4055, 52.5203),
            (2.3522, 48.8566),
            (2.3525, 48.8568),
        ] {
            clusterer.add_marker(marker(lng, lat));
        }
        assert_eq!(clusterer.clusters(), clusterer.clusters());
    }

    #[test]
    fn test_clear_drops_collected_markers() {
        let mut clusterer = GridClusterer::new(100.0);
        clusterer.add_marker(marker(13.405, 52.52));
        assert_eq!(clusterer.len(), 1);
        assert_eq!(clusterer.markers()[0].position, LngLat::new(13.405, 52.52));

        clusterer.clear();
        assert!(clusterer.is_empty());
        assert!(clusterer.markers().is_empty());
        assert!(clusterer.clusters().is_empty());
    }
}
