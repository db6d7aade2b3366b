//! Clustering markers and resolving cluster clicks.
//!
//! Run with: cargo run --example cluster_resolution

use map_directory::{
    build_markers, group_by_coordinate, normalize_records, parse_feature_collection,
    resolve_cluster, GridClusterer, ResolvedAction,
};

const SAMPLE: &str = r#"{
    "type": "FeatureCollection",
    "features": [
        {
            "type": "Feature",
            "geometry": { "type": "Point", "coordinates": [13.405, 52.52] },
            "properties": {
                "location": "Berlin Mitte",
                "coordinates": [13.405, 52.52],
                "profiles": [
                    { "uid": "p-1", "name": "Ada" },
                    { "uid": "p-2", "name": "Grace" }
                ]
            }
        },
        {
            "type": "Feature",
            "geometry": { "type": "Point", "coordinates": [13.4055, 52.5203] },
            "properties": {
                "location": "Berlin Hackescher Markt",
                "coordinates": [13.4055, 52.5203],
                "profiles": [{ "uid": "p-3", "name": "Karl" }]
            }
        },
        {
            "type": "Feature",
            "geometry": { "type": "Point", "coordinates": [2.3522, 48.8566] },
            "properties": {
                "location": "Paris",
                "coordinates": [2.3522, 48.8566],
                "profiles": [{ "uid": "p-4", "name": "Blaise" }]
            }
        }
    ]
}"#;

fn main() {
    let collection = parse_feature_collection(SAMPLE).unwrap();
    let records = normalize_records(&collection);
    let groups = group_by_coordinate(&records);
    let markers = build_markers(&collection, &groups);

    println!("Cluster Resolution Example\n");
    println!(
        "{} features -> {} records in {} groups, {} markers\n",
        collection.features.len(),
        records.len(),
        groups.len(),
        markers.len()
    );

    // The two Berlin markers are about 50 m apart; Paris is on its own.
    let mut clusterer = GridClusterer::new(150.0);
    for marker in &markers {
        clusterer.add_marker(marker.clone());
    }

    let clusters = clusterer.clusters();
    println!(
        "Clustered {} markers into {} clusters (radius 150 m):\n",
        clusterer.markers().len(),
        clusters.len()
    );

    for (i, cluster) in clusters.iter().enumerate() {
        println!(
            "{}. {} member(s), labels {:?}:",
            i + 1,
            cluster.markers.len(),
            cluster
                .markers
                .iter()
                .map(|m| m.label.as_str())
                .collect::<Vec<_>>()
        );
        match resolve_cluster(cluster) {
            Some(ResolvedAction::SelectLocation(position)) => {
                println!(
                    "   click selects the location at ({:.4}, {:.4})",
                    position.lng, position.lat
                );
            }
            Some(ResolvedAction::FitBounds(bounds)) => {
                println!(
                    "   click fits the view to lng [{:.4}, {:.4}] lat [{:.4}, {:.4}]",
                    bounds.min_lng, bounds.max_lng, bounds.min_lat, bounds.max_lat
                );
            }
            None => println!("   empty cluster, click does nothing"),
        }
        println!();
    }
}
