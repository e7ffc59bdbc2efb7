use std::sync::OnceLock;

use super::song::Song;

/// Immutable in-memory song catalog.
///
/// Row order is the load order of the backing file and is the deterministic
/// tiebreak everywhere: duplicate (name, year) rows resolve to the first one,
/// and equal-distance candidates rank by row index.
#[derive(Debug)]
pub struct SongCatalog {
    songs: Vec<Song>,
    /// Cluster label per row, computed at most once per process. May be
    /// pre-attached when the catalog file already carries labels.
    cluster_labels: OnceLock<Vec<usize>>,
}

impl SongCatalog {
    pub fn new(songs: Vec<Song>) -> SongCatalog {
        SongCatalog {
            songs,
            cluster_labels: OnceLock::new(),
        }
    }

    pub fn with_cluster_labels(songs: Vec<Song>, labels: Vec<usize>) -> SongCatalog {
        debug_assert_eq!(songs.len(), labels.len());
        let catalog = SongCatalog::new(songs);
        let _ = catalog.cluster_labels.set(labels);
        catalog
    }

    pub fn len(&self) -> usize {
        self.songs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.songs.is_empty()
    }

    pub fn songs(&self) -> &[Song] {
        &self.songs
    }

    /// First row matching (name, year) exactly, by row order.
    pub fn find(&self, name: &str, year: i32) -> Option<&Song> {
        self.songs
            .iter()
            .find(|song| song.name == name && song.year == year)
    }

    pub fn has_cluster_labels(&self) -> bool {
        self.cluster_labels.get().is_some()
    }

    /// Returns the cached cluster labels, computing them with `compute` on
    /// first use. Safe to hit from concurrent requests: the closure may run
    /// more than once but exactly one result is kept.
    pub fn cluster_labels_or_init(&self, compute: impl FnOnce() -> Vec<usize>) -> &[usize] {
        self.cluster_labels.get_or_init(compute)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::FEATURE_DIM;

    fn song(name: &str, year: i32, valence: f64) -> Song {
        let mut features = [0.5; FEATURE_DIM];
        features[0] = valence;
        Song {
            name: name.to_string(),
            year,
            artists: vec!["Somebody".to_string()],
            features,
        }
    }

    #[test]
    fn find_is_exact_on_name_and_year() {
        let catalog = SongCatalog::new(vec![song("One", 2001, 0.1), song("Two", 2002, 0.2)]);

        assert!(catalog.find("One", 2001).is_some());
        assert!(catalog.find("One", 2002).is_none());
        assert!(catalog.find("one", 2001).is_none());
    }

    #[test]
    fn duplicate_rows_resolve_to_the_first_one() {
        let catalog = SongCatalog::new(vec![song("Same", 2010, 0.1), song("Same", 2010, 0.9)]);

        let found = catalog.find("Same", 2010).unwrap();
        assert_eq!(found.features[0], 0.1);
    }

    #[test]
    fn cluster_labels_compute_once() {
        let catalog = SongCatalog::new(vec![song("One", 2001, 0.1)]);
        assert!(!catalog.has_cluster_labels());

        let first = catalog.cluster_labels_or_init(|| vec![3]).to_vec();
        let second = catalog.cluster_labels_or_init(|| vec![7]).to_vec();

        assert_eq!(first, vec![3]);
        assert_eq!(second, vec![3]);
    }

    #[test]
    fn preattached_labels_win_over_computation() {
        let catalog = SongCatalog::with_cluster_labels(vec![song("One", 2001, 0.1)], vec![5]);
        assert!(catalog.has_cluster_labels());
        assert_eq!(catalog.cluster_labels_or_init(|| vec![0]), &[5]);
    }
}
