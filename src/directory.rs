//! The directory engine.
//!
//! [`MapDirectory`] owns one ingestion pass worth of state (collection,
//! records, groups, markers, view bounds) plus the selection, and drives a
//! host-provided [`MapSurface`] with the rendering side effects. Hosts
//! feed it collections and forward their UI events to the explicit
//! handlers; everything else is derived on demand.
//!
//! Flow per pass:
//! 1. Normalize the collection into location records
//! 2. Group records by exact coordinate
//! 3. Build marker descriptors and place them on the surface (and in the
//!    clusterer, when enabled)
//! 4. Optionally grow the view bounds marker by marker
//!
//! A refetch replaces the pass state wholesale: markers from an earlier
//! pass never survive into the next one. The selection is the only state
//! that crosses passes, and the derived views treat a selection that no
//! longer matches anything as empty rather than stale.

use std::collections::HashMap;

use log::{debug, info};

use crate::cluster::{resolve_cluster, ClusterEvent, ResolvedAction};
use crate::clusterer::GridClusterer;
use crate::collection::{normalize_records, FeatureCollection, LocationRecord};
use crate::grouping::{group_by_coordinate, records_at, CoordKey};
use crate::markers::{build_markers, MarkerDescriptor};
use crate::selection::{detail_for, DetailContent, PickerOptions, Selection, SelectionState};
use crate::{Bounds, DirectoryOptions, LngLat};

/// What the engine needs from a hosting map: marker placement and view
/// control. Implementations adapt whatever map widget the host embeds.
pub trait MapSurface {
    /// Removes every placed marker.
    fn clear_markers(&mut self);
    /// Places one marker with its display label.
    fn place_marker(&mut self, position: LngLat, label: &str);
    /// Fits the view to the given bounds.
    fn fit_bounds(&mut self, bounds: Bounds);
    /// Centers the view.
    fn set_center(&mut self, center: LngLat);
    /// Sets the zoom level.
    fn set_zoom(&mut self, zoom: u8);
}

/// The feature-to-marker reconciliation and selection engine.
///
/// # Example
/// ```
/// use map_directory::{
///     Bounds, DirectoryOptions, LngLat, MapDirectory, MapSurface, Selection,
///     parse_feature_collection,
/// };
///
/// #[derive(Default)]
/// struct NullSurface;
/// impl MapSurface for NullSurface {
///     fn clear_markers(&mut self) {}
///     fn place_marker(&mut self, _position: LngLat, _label: &str) {}
///     fn fit_bounds(&mut self, _bounds: Bounds) {}
///     fn set_center(&mut self, _center: LngLat) {}
///     fn set_zoom(&mut self, _zoom: u8) {}
/// }
///
/// let mut directory = MapDirectory::new(NullSurface, DirectoryOptions::default());
/// let collection = parse_feature_collection(r#"{
///     "type": "FeatureCollection",
///     "features": [{
///         "type": "Feature",
///         "geometry": { "type": "Point", "coordinates": [13.405, 52.52] },
///         "properties": {
///             "location": "Berlin",
///             "coordinates": [13.405, 52.52],
///             "profiles": [{ "uid": "p-1", "name": "Ada" }]
///         }
///     }]
/// }"#).unwrap();
///
/// directory.ingest(collection);
/// let marker = directory.markers()[0].clone();
/// directory.on_marker_click(&marker);
/// assert_eq!(
///     directory.selection(),
///     Some(&Selection::Location { name: "Berlin".to_string() }),
/// );
/// ```
pub struct MapDirectory<S: MapSurface> {
    surface: S,
    options: DirectoryOptions,
    collection: Option<FeatureCollection>,
    records: Vec<LocationRecord>,
    groups: HashMap<CoordKey, usize>,
    markers: Vec<MarkerDescriptor>,
    clusterer: Option<GridClusterer>,
    bounds: Bounds,
    selection: SelectionState,
}

impl<S: MapSurface> MapDirectory<S> {
    /// Creates an engine over a surface, applying the configured default
    /// view immediately.
    pub fn new(mut surface: S, options: DirectoryOptions) -> Self {
        surface.set_center(options.default_center);
        surface.set_zoom(options.default_zoom);
        let clusterer = options
            .marker_clusterer
            .then(|| GridClusterer::new(options.cluster_radius_meters));
        Self {
            surface,
            options,
            collection: None,
            records: Vec::new(),
            groups: HashMap::new(),
            markers: Vec::new(),
            clusterer,
            bounds: Bounds::empty(),
            selection: SelectionState::new(),
        }
    }

    /// Runs one ingestion pass over a collection.
    ///
    /// The previous pass's records, groups, markers and bounds are
    /// replaced wholesale; the surface is cleared before the new markers
    /// are placed. With the bounds option enabled the view is fitted to
    /// the accumulated bounds as each marker lands; without it the view is
    /// left alone.
    pub fn ingest(&mut self, collection: FeatureCollection) {
        let records = normalize_records(&collection);
        let groups = group_by_coordinate(&records);
        let markers = build_markers(&collection, &groups);
        info!(
            "ingest: {} features -> {} records in {} groups, {} markers",
            collection.features.len(),
            records.len(),
            groups.len(),
            markers.len(),
        );

        self.surface.clear_markers();
        if let Some(clusterer) = self.clusterer.as_mut() {
            clusterer.clear();
        }
        self.records = records;
        self.groups = groups;
        self.markers = markers;
        self.collection = Some(collection);
        self.bounds = Bounds::empty();

        for marker in &self.markers {
            self.surface.place_marker(marker.position, &marker.label);
            if let Some(clusterer) = self.clusterer.as_mut() {
                clusterer.add_marker(marker.clone());
            }
            if self.options.bounds {
                self.bounds.extend(marker.position);
                self.surface.fit_bounds(self.bounds);
                self.surface.set_center(marker.position);
            }
        }
    }

    /// Handles a click on a single marker: the marker's declared
    /// coordinates are resolved to a location selection.
    pub fn on_marker_click(&mut self, marker: &MarkerDescriptor) {
        debug!(
            "marker click at ({}, {})",
            marker.key.lng, marker.key.lat,
        );
        self.select_position(marker.key);
    }

    /// Handles a click on a cluster.
    ///
    /// A cluster whose members all share one position selects the location
    /// there; one spanning several positions fits the view to the cluster
    /// bounds and drops any location selection (a profile selection
    /// survives). A memberless cluster does nothing.
    pub fn on_cluster_click(&mut self, event: &ClusterEvent) {
        match resolve_cluster(event) {
            Some(ResolvedAction::SelectLocation(position)) => {
                debug!(
                    "cluster click resolves to one location at ({}, {})",
                    position.lng, position.lat,
                );
                self.select_position(position);
            }
            Some(ResolvedAction::FitBounds(bounds)) => {
                debug!("cluster click spans locations; fitting bounds");
                self.selection.clear_location();
                self.surface.fit_bounds(bounds);
            }
            None => {}
        }
    }

    /// Handles a picker change. `None` deselects.
    pub fn on_picker_change(&mut self, value: Option<Selection>) {
        self.selection.set(value);
    }

    /// Resolves a position to a location selection through the pass's
    /// records. A position no record was declared at clears the selection
    /// instead of selecting something that does not exist.
    fn select_position(&mut self, position: LngLat) {
        let records = records_at(&self.records, position);
        match records.first() {
            Some(record) => {
                let name = record.location.clone();
                self.selection.set(Some(Selection::Location { name }));
            }
            None => {
                debug!(
                    "no records at ({}, {}); clearing selection",
                    position.lng, position.lat,
                );
                self.selection.clear();
            }
        }
    }

    /// The current selection, if any.
    pub fn selection(&self) -> Option<&Selection> {
        self.selection.current()
    }

    /// The picker options for the current pass.
    pub fn picker_options(&self) -> PickerOptions {
        match &self.collection {
            Some(collection) => PickerOptions::build(collection),
            None => PickerOptions::default(),
        }
    }

    /// The detail panel content for the current selection.
    pub fn detail(&self) -> DetailContent<'_> {
        match &self.collection {
            Some(collection) => detail_for(collection, self.selection.current()),
            None => DetailContent::Empty,
        }
    }

    /// The markers of the current pass, in collection order.
    pub fn markers(&self) -> &[MarkerDescriptor] {
        &self.markers
    }

    /// The location records of the current pass.
    pub fn records(&self) -> &[LocationRecord] {
        &self.records
    }

    /// The record count per exact coordinate.
    pub fn groups(&self) -> &HashMap<CoordKey, usize> {
        &self.groups
    }

    /// The view bounds accumulated during the last pass. Empty unless the
    /// bounds option is enabled.
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// The built-in clusterer, when the clusterer option is enabled.
    pub fn clusterer(&self) -> Option<&GridClusterer> {
        self.clusterer.as_ref()
    }

    /// The ingested collection, once one has been ingested.
    pub fn collection(&self) -> Option<&FeatureCollection> {
        self.collection.as_ref()
    }

    pub fn options(&self) -> &DirectoryOptions {
        &self.options
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }
}
