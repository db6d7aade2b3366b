//! Selection state and its read models.
//!
//! At most one thing is selected at a time: a profile (by uid) or a
//! location (by name). The state is a plain `Option` behind a single
//! writer; every interaction funnels through [`SelectionState::set`], so
//! there is exactly one place where the selection changes and no chance of
//! two handlers disagreeing about it.
//!
//! Two read models derive from the selection on demand rather than being
//! kept in sync: the picker (grouped options with a reverse lookup from
//! the current selection) and the detail panel content.

use log::debug;

use crate::collection::{FeatureCollection, ProfileRecord};

/// Picker group label for the profile options.
pub const GROUP_PROFILES: &str = "By Profiles";
/// Picker group label for the location options.
pub const GROUP_LOCATIONS: &str = "By Locations";

/// The one thing currently selected, when anything is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// A profile, by its uid.
    Profile { uid: String },
    /// A location, by its name.
    Location { name: String },
}

/// Owner of the current selection.
///
/// Deselection is modelled as `None`, never as a sentinel value, so
/// consumers can only ever observe a valid selection or nothing.
#[derive(Debug, Default)]
pub struct SelectionState {
    current: Option<Selection>,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// The current selection, if any.
    pub fn current(&self) -> Option<&Selection> {
        self.current.as_ref()
    }

    /// Replaces the selection. This is the single write path; passing
    /// `None` deselects.
    pub fn set(&mut self, next: Option<Selection>) {
        if self.current != next {
            debug!("selection: {:?} -> {:?}", self.current, next);
        }
        self.current = next;
    }

    /// Deselects.
    pub fn clear(&mut self) {
        self.set(None);
    }

    /// Deselects only if a location is selected; a profile selection
    /// survives. Used when the view stops pointing at one location.
    pub fn clear_location(&mut self) {
        if matches!(self.current, Some(Selection::Location { .. })) {
            self.set(None);
        }
    }
}

/// One choice offered by the picker.
#[derive(Debug, Clone, PartialEq)]
pub struct PickerOption {
    pub value: Selection,
    pub label: String,
}

/// The picker's choices, grouped the way they are presented:
/// [`GROUP_PROFILES`] first, then [`GROUP_LOCATIONS`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PickerOptions {
    pub profiles: Vec<PickerOption>,
    pub locations: Vec<PickerOption>,
}

impl PickerOptions {
    /// Derives the options from a collection: one profile option per valid
    /// profile, one location option per feature with a location name, in
    /// collection order.
    pub fn build(collection: &FeatureCollection) -> Self {
        let mut options = Self::default();
        for feature in &collection.features {
            let Some(props) = feature.properties.as_ref() else {
                continue;
            };
            for profile in props.valid_profiles() {
                options.profiles.push(PickerOption {
                    value: Selection::Profile {
                        uid: profile.uid.clone(),
                    },
                    label: profile.name.clone(),
                });
            }
            if let Some(name) = props.location_name() {
                options.locations.push(PickerOption {
                    value: Selection::Location {
                        name: name.to_string(),
                    },
                    label: name.to_string(),
                });
            }
        }
        options
    }

    /// Reverse lookup: the option matching the current selection. `None`
    /// when nothing is selected or the selection no longer matches any
    /// option (a refetch may have removed it); the picker then renders its
    /// placeholder.
    pub fn selected(&self, current: Option<&Selection>) -> Option<&PickerOption> {
        let current = current?;
        let group = match current {
            Selection::Profile { .. } => &self.profiles,
            Selection::Location { .. } => &self.locations,
        };
        group.iter().find(|option| option.value == *current)
    }
}

/// What the detail panel shows for a selection.
#[derive(Debug, Clone, PartialEq)]
pub enum DetailContent<'a> {
    /// A single profile's details.
    Profile(&'a ProfileRecord),
    /// All profiles at a selected location.
    LocationProfiles {
        location: &'a str,
        profiles: Vec<&'a ProfileRecord>,
    },
    /// Nothing selected, or the selection matches nothing in the
    /// collection. The panel renders empty; a miss is never an error.
    Empty,
}

/// Derives the detail panel content for the current selection.
///
/// Lookups borrow from the collection; nothing is copied or cached, so the
/// panel can never go stale relative to the data it is derived from.
pub fn detail_for<'a>(
    collection: &'a FeatureCollection,
    current: Option<&Selection>,
) -> DetailContent<'a> {
    match current {
        None => DetailContent::Empty,
        Some(Selection::Profile { uid }) => collection
            .features
            .iter()
            .filter_map(|feature| feature.properties.as_ref())
            .flat_map(|props| props.valid_profiles())
            .find(|profile| profile.uid == *uid)
            .map(DetailContent::Profile)
            .unwrap_or(DetailContent::Empty),
        Some(Selection::Location { name }) => {
            for feature in &collection.features {
                let Some(props) = feature.properties.as_ref() else {
                    continue;
                };
                if let Some(location) = props.location_name() {
                    if location == name.as_str() {
                        return DetailContent::LocationProfiles {
                            location,
                            profiles: props.valid_profiles().collect(),
                        };
                    }
                }
            }
            DetailContent::Empty
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collection::parse_feature_collection;

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
                                { "uid": "p-1", "name": "Ada", "github": "ada" },
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
    fn test_starts_deselected() {
        let state = SelectionState::new();
        assert_eq!(state.current(), None);
    }

    #[test]
    fn test_set_and_clear_round_trip() {
        let mut state = SelectionState::new();
        state.set(Some(Selection::Profile {
            uid: "p-1".to_string(),
        }));
        assert_eq!(
            state.current(),
            Some(&Selection::Profile {
                uid: "p-1".to_string()
            }),
        );
        state.clear();
        assert_eq!(state.current(), None);
    }

    #[test]
    fn test_set_none_deselects() {
        let mut state = SelectionState::new();
        state.set(Some(Selection::Location {
            name: "Berlin".to_string(),
        }));
        state.set(None);
        assert_eq!(state.current(), None);
    }

    #[test]
    fn test_clear_location_spares_profile_selections() {
        let mut state = SelectionState::new();
        state.set(Some(Selection::Profile {
            uid: "p-1".to_string(),
        }));
        state.clear_location();
        assert!(state.current().is_some());

        state.set(Some(Selection::Location {
            name: "Berlin".to_string(),
        }));
        state.clear_location();
        assert_eq!(state.current(), None);
    }

    #[test]
    fn test_picker_groups_profiles_and_locations() {
        let options = PickerOptions::build(&sample_collection());
        assert_eq!(options.profiles.len(), 3);
        assert_eq!(options.locations.len(), 2);
        assert_eq!(options.profiles[0].label, "Ada");
        assert_eq!(options.locations[1].label, "Paris");
    }

    #[test]
    fn test_picker_reverse_lookup_finds_the_selected_option() {
        let options = PickerOptions::build(&sample_collection());
        let selection = Selection::Profile {
            uid: "p-2".to_string(),
        };
        let option = options.selected(Some(&selection)).unwrap();
        assert_eq!(option.label, "Grace");

        let selection = Selection::Location {
            name: "Paris".to_string(),
        };
        let option = options.selected(Some(&selection)).unwrap();
        assert_eq!(option.label, "Paris");
    }

    #[test]
    fn test_picker_reverse_lookup_misses_render_placeholder() {
        let options = PickerOptions::build(&sample_collection());
        assert_eq!(options.selected(None), None);

        // A selection that survived a refetch which removed its subject.
        let stale = Selection::Profile {
            uid: "p-gone".to_string(),
        };
        assert_eq!(options.selected(Some(&stale)), None);
    }

    #[test]
    fn test_detail_for_a_profile() {
        let collection = sample_collection();
        let selection = Selection::Profile {
            uid: "p-1".to_string(),
        };
        match detail_for(&collection, Some(&selection)) {
            DetailContent::Profile(profile) => {
                assert_eq!(profile.name, "Ada");
                assert_eq!(profile.github.as_deref(), Some("ada"));
            }
            other => panic!("expected Profile, got {:?}", other),
        }
    }

    #[test]
    fn test_detail_for_a_location_lists_its_profiles() {
        let collection = sample_collection();
        let selection = Selection::Location {
            name: "Berlin".to_string(),
        };
        match detail_for(&collection, Some(&selection)) {
            DetailContent::LocationProfiles { location, profiles } => {
                assert_eq!(location, "Berlin");
                let names: Vec<&str> = profiles.iter().map(|p| p.name.as_str()).collect();
                assert_eq!(names, vec!["Ada", "Grace"]);
            }
            other => panic!("expected LocationProfiles, got {:?}", other),
        }
    }

    #[test]
    fn test_detail_misses_are_empty_not_errors() {
        let collection = sample_collection();
        assert_eq!(detail_for(&collection, None), DetailContent::Empty);

        let unknown = Selection::Profile {
            uid: "p-404".to_string(),
        };
        assert_eq!(detail_for(&collection, Some(&unknown)), DetailContent::Empty);

        let nowhere = Selection::Location {
            name: "Atlantis".to_string(),
        };
        assert_eq!(detail_for(&collection, Some(&nowhere)), DetailContent::Empty);
    }
}
