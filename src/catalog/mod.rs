mod catalog;
mod load;
mod song;

pub use catalog::SongCatalog;
pub use load::{build_catalog, load_catalog, CatalogBuildResult, Problem as LoadCatalogProblem};
pub use song::{FeatureVector, Song, FEATURE_COLUMNS, FEATURE_DIM};
