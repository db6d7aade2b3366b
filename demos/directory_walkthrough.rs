//! End-to-end walkthrough of the directory engine against a console surface.
//!
//! Run with: cargo run --example directory_walkthrough

use map_directory::{
    parse_feature_collection, Bounds, DetailContent, DirectoryOptions, LngLat, MapDirectory,
    MapSurface, Selection, GROUP_LOCATIONS, GROUP_PROFILES,
};

/// A surface that narrates every call it receives.
#[derive(Default)]
struct ConsoleSurface;

impl MapSurface for ConsoleSurface {
    fn clear_markers(&mut self) {
        println!("   [surface] clear markers");
    }

    fn place_marker(&mut self, position: LngLat, label: &str) {
        println!(
            "   [surface] marker '{}' at ({:.4}, {:.4})",
            label, position.lng, position.lat
        );
    }

    fn fit_bounds(&mut self, bounds: Bounds) {
        println!(
            "   [surface] fit bounds lng [{:.4}, {:.4}] lat [{:.4}, {:.4}]",
            bounds.min_lng, bounds.max_lng, bounds.min_lat, bounds.max_lat
        );
    }

    fn set_center(&mut self, center: LngLat) {
        println!("   [surface] center ({:.4}, {:.4})", center.lng, center.lat);
    }

    fn set_zoom(&mut self, zoom: u8) {
        println!("   [surface] zoom {}", zoom);
    }
}

const SAMPLE: &str = r#"{
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
                    { "uid": "p-2", "name": "Grace", "website": "https://grace.dev" }
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
}"#;

fn main() {
    let options = DirectoryOptions {
        bounds: true,
        ..DirectoryOptions::default()
    };

    println!("Map Directory Walkthrough\n");

    println!("1. Construct the engine (default view goes out immediately):");
    let mut directory = MapDirectory::new(ConsoleSurface, options);

    println!("\n2. Ingest a collection (markers land, bounds grow per marker):");
    let collection = parse_feature_collection(SAMPLE).unwrap();
    directory.ingest(collection);
    println!(
        "   {} records in {} groups, {} markers (bounds fitting: {})",
        directory.records().len(),
        directory.groups().len(),
        directory.markers().len(),
        directory.options().bounds
    );

    println!("\n3. Click the Berlin marker:");
    let berlin = directory.markers()[0].clone();
    directory.on_marker_click(&berlin);
    println!("   selection: {:?}", directory.selection());
    match directory.detail() {
        DetailContent::LocationProfiles { location, profiles } => {
            println!("   detail panel: {} profiles at {}", profiles.len(), location);
            for profile in profiles {
                println!("     - {}", profile.name);
            }
        }
        other => println!("   detail panel: {:?}", other),
    }

    println!("\n4. Pick a profile from the picker:");
    let picker = directory.picker_options();
    println!(
        "   picker offers {} '{}' and {} '{}' options",
        picker.profiles.len(),
        GROUP_PROFILES,
        picker.locations.len(),
        GROUP_LOCATIONS
    );
    directory.on_picker_change(Some(Selection::Profile {
        uid: "p-1".to_string(),
    }));
    match directory.detail() {
        DetailContent::Profile(profile) => {
            println!(
                "   detail panel: {} (github: {})",
                profile.name,
                profile.github.as_deref().unwrap_or("-")
            );
        }
        other => println!("   detail panel: {:?}", other),
    }

    println!("\n5. Refetch with Ada gone (selection goes stale, views go empty):");
    let without_ada = parse_feature_collection(
        r#"{
            "type": "FeatureCollection",
            "features": [{
                "type": "Feature",
                "geometry": { "type": "Point", "coordinates": [2.3522, 48.8566] },
                "properties": {
                    "location": "Paris",
                    "coordinates": [2.3522, 48.8566],
                    "profiles": [{ "uid": "p-3", "name": "Blaise" }]
                }
            }]
        }"#,
    )
    .unwrap();
    directory.ingest(without_ada);
    println!("   selection: {:?}", directory.selection());
    println!(
        "   picker shows: {:?}",
        directory
            .picker_options()
            .selected(directory.selection())
            .map(|o| o.label.as_str())
    );
    println!("   detail panel: {:?}", directory.detail());
}
