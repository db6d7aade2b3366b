//! Cluster click resolution.
//!
//! When a cluster is clicked the directory has to decide between two very
//! different outcomes: a cluster whose markers all sit on one position is
//! really a single location rendered as a badge, so the click selects that
//! location; a cluster spanning several positions is a zoom affordance, so
//! the click fits the view to the cluster's bounds instead.
//!
//! Homogeneity is decided by collecting the member positions into a set of
//! exact coordinate keys and checking its cardinality, a single pass over
//! the members. Positions are compared bit-exactly, consistent with
//! coordinate grouping.

use std::collections::HashSet;

use crate::grouping::CoordKey;
use crate::markers::MarkerDescriptor;
use crate::{Bounds, LngLat};

/// A cluster click as reported by the clustering primitive: the member
/// markers plus the bounds the primitive computed for them.
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterEvent {
    pub markers: Vec<MarkerDescriptor>,
    pub bounds: Bounds,
}

impl ClusterEvent {
    /// Builds an event from member markers, deriving the bounds from their
    /// positions. Clustering primitives that already carry bounds can
    /// construct the struct directly instead.
    pub fn from_markers(markers: Vec<MarkerDescriptor>) -> Self {
        let mut bounds = Bounds::empty();
        for marker in &markers {
            bounds.extend(marker.position);
        }
        Self { markers, bounds }
    }
}

/// What a cluster click resolves to.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolvedAction {
    /// Every member sits on this one position; select the location there.
    /// The pair is in `(lng, lat)` order, ready to be matched against the
    /// pass's location records.
    SelectLocation(LngLat),
    /// Members span several positions; fit the view to the cluster bounds.
    /// Any location-based selection must be cleared by the caller, since
    /// the view no longer points at one location.
    FitBounds(Bounds),
}

/// Resolves a cluster click to an action, or `None` for a memberless
/// cluster (nothing to select, nothing to fit).
///
/// The decision is pure and deterministic: the same event always resolves
/// to the same action, and nothing here touches selection state or the map
/// surface.
///
/// # Example
/// ```
/// use map_directory::{resolve_cluster, ClusterEvent, LngLat, MarkerDescriptor, ResolvedAction};
///
/// let here = LngLat::new(13.405, 52.52);
/// let badge = MarkerDescriptor {
///     position: here,
///     key: here,
///     label: "2".to_string(),
///     source_record_count: 2,
/// };
/// let event = ClusterEvent::from_markers(vec![badge.clone(), badge]);
/// assert_eq!(
///     resolve_cluster(&event),
///     Some(ResolvedAction::SelectLocation(here)),
/// );
/// ```
pub fn resolve_cluster(event: &ClusterEvent) -> Option<ResolvedAction> {
    let first = event.markers.first()?;
    let mut positions: HashSet<CoordKey> = HashSet::with_capacity(event.markers.len());
    for marker in &event.markers {
        positions.insert(CoordKey::of(marker.position));
    }
    if positions.len() == 1 {
        Some(ResolvedAction::SelectLocation(first.position))
    } else {
        Some(ResolvedAction::FitBounds(event.bounds))
    }
}
