//! Shared fixtures for the API tests.

use std::sync::Arc;

use recommendify_server::catalog::{Song, SongCatalog, FEATURE_DIM};
use recommendify_server::recommend::{Recommender, ScalerSource, StandardScaler};

pub fn song(name: &str, year: i32, artist: &str, offset: f64) -> Song {
    let mut features = [0.0; FEATURE_DIM];
    for (i, value) in features.iter_mut().enumerate() {
        *value = offset + i as f64 * 0.1;
    }
    features[1] = year as f64;
    Song {
        name: name.to_string(),
        year,
        artists: vec![artist.to_string()],
        features,
    }
}

/// 16 distinct songs, including the three well-known seeds.
pub fn fixture_catalog() -> Arc<SongCatalog> {
    let mut songs = vec![
        song("Shape of You", 2017, "Ed Sheeran", 1.0),
        song("Rolling in the Deep", 2011, "Adele", 2.0),
        song("Blinding Lights", 2020, "The Weeknd", 3.0),
    ];
    for i in 0..13i32 {
        songs.push(song(
            &format!("Filler {i}"),
            2000 + i,
            "Various",
            4.0 + i as f64,
        ));
    }
    Arc::new(SongCatalog::new(songs))
}

/// Engine over the fixture catalog, scaler fitted in-process, no clustering.
pub fn fixture_recommender(catalog: Arc<SongCatalog>) -> Arc<Recommender> {
    let features: Vec<_> = catalog.songs().iter().map(|song| song.features).collect();
    let scaler = StandardScaler::fit(&features);
    Arc::new(Recommender::from_parts(
        catalog,
        scaler,
        ScalerSource::FittedFromCatalog,
        None,
    ))
}
