use anyhow::{bail, Context, Result};
use csv::StringRecord;
use std::path::Path;
use tracing::info;

use super::song::{Song, FEATURE_COLUMNS, FEATURE_DIM};
use super::SongCatalog;

/// A non-fatal issue found while reading the catalog file. The offending row
/// is skipped, the rest of the catalog still loads.
#[derive(Debug)]
pub enum Problem {
    UnreadableRow { row: usize, message: String },
    MissingValue { row: usize, column: &'static str },
    UnparsableValue { row: usize, column: &'static str, value: String },
}

pub struct CatalogBuildResult {
    pub catalog: Option<SongCatalog>,
    pub problems: Vec<Problem>,
}

struct Columns {
    name: usize,
    year: usize,
    artists: usize,
    features: [usize; FEATURE_DIM],
    cluster: Option<usize>,
}

impl Columns {
    fn from_headers(headers: &StringRecord) -> Result<Columns> {
        let position = |name: &str| -> Result<usize> {
            headers
                .iter()
                .position(|header| header == name)
                .with_context(|| format!("Catalog CSV is missing the \"{name}\" column"))
        };

        let mut features = [0usize; FEATURE_DIM];
        for (i, feature) in FEATURE_COLUMNS.iter().enumerate() {
            features[i] = position(feature)?;
        }

        Ok(Columns {
            name: position("name")?,
            year: position("year")?,
            artists: position("artists")?,
            features,
            cluster: headers.iter().position(|header| header == "cluster"),
        })
    }
}

fn field<'a>(
    record: &'a StringRecord,
    row: usize,
    col: usize,
    column: &'static str,
) -> std::result::Result<&'a str, Problem> {
    record
        .get(col)
        .ok_or(Problem::MissingValue { row, column })
}

fn parse_feature(
    record: &StringRecord,
    row: usize,
    col: usize,
    column: &'static str,
) -> std::result::Result<f64, Problem> {
    let raw = field(record, row, col, column)?;
    raw.trim().parse::<f64>().map_err(|_| Problem::UnparsableValue {
        row,
        column,
        value: raw.to_string(),
    })
}

/// Parses the artists cell. The reference dataset stores a Python list repr,
/// e.g. `['Ed Sheeran']` or `['Beyoncé', 'JAY-Z']`; plain cells split on `;`.
fn parse_artists(raw: &str) -> Vec<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }
    let Some(inner) = trimmed.strip_prefix('[').and_then(|s| s.strip_suffix(']')) else {
        return trimmed
            .split(';')
            .map(str::trim)
            .filter(|artist| !artist.is_empty())
            .map(str::to_string)
            .collect();
    };

    // Quote-aware scan so names containing commas survive.
    let mut artists = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;
    for c in inner.chars() {
        match (quote, c) {
            (None, '\'' | '"') => quote = Some(c),
            (Some(q), _) if c == q => quote = None,
            (None, ',') => {
                let name = current.trim().to_string();
                if !name.is_empty() {
                    artists.push(name);
                }
                current.clear();
            }
            _ => current.push(c),
        }
    }
    let name = current.trim().to_string();
    if !name.is_empty() {
        artists.push(name);
    }
    artists
}

fn parse_song(
    record: &StringRecord,
    row: usize,
    columns: &Columns,
) -> std::result::Result<(Song, Option<usize>), Problem> {
    let name = field(record, row, columns.name, "name")?.trim();
    if name.is_empty() {
        return Err(Problem::MissingValue { row, column: "name" });
    }

    let raw_year = field(record, row, columns.year, "year")?;
    let year = raw_year
        .trim()
        .parse::<i32>()
        .or_else(|_| raw_year.trim().parse::<f64>().map(|y| y as i32))
        .map_err(|_| Problem::UnparsableValue {
            row,
            column: "year",
            value: raw_year.to_string(),
        })?;

    let artists = parse_artists(field(record, row, columns.artists, "artists")?);

    let mut features = [0.0; FEATURE_DIM];
    for (i, &col) in columns.features.iter().enumerate() {
        features[i] = parse_feature(record, row, col, FEATURE_COLUMNS[i])?;
    }

    let label = match columns.cluster {
        Some(col) => {
            let raw = field(record, row, col, "cluster")?;
            Some(raw.trim().parse::<usize>().map_err(|_| {
                Problem::UnparsableValue {
                    row,
                    column: "cluster",
                    value: raw.to_string(),
                }
            })?)
        }
        None => None,
    };

    Ok((
        Song {
            name: name.to_string(),
            year,
            artists,
            features,
        },
        label,
    ))
}

pub fn build_catalog(path: &Path) -> Result<CatalogBuildResult> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("Could not open catalog CSV at {}", path.display()))?;
    let headers = reader.headers()?.clone();
    let columns = Columns::from_headers(&headers)?;

    let mut songs = Vec::new();
    let mut labels = Vec::new();
    let mut problems = Vec::new();

    for (row, record) in reader.records().enumerate() {
        let record = match record {
            Ok(record) => record,
            Err(err) => {
                problems.push(Problem::UnreadableRow {
                    row,
                    message: err.to_string(),
                });
                continue;
            }
        };
        match parse_song(&record, row, &columns) {
            Ok((song, label)) => {
                songs.push(song);
                if let Some(label) = label {
                    labels.push(label);
                }
            }
            Err(problem) => problems.push(problem),
        }
    }

    let catalog = if songs.is_empty() {
        None
    } else if columns.cluster.is_some() && labels.len() == songs.len() {
        Some(SongCatalog::with_cluster_labels(songs, labels))
    } else {
        Some(SongCatalog::new(songs))
    };

    Ok(CatalogBuildResult { catalog, problems })
}

pub fn load_catalog<P: AsRef<Path>>(path: P) -> Result<SongCatalog> {
    let build_result = build_catalog(path.as_ref())?;
    let problems = build_result.problems;
    let catalog = build_result.catalog;

    if !problems.is_empty() {
        info!("Found {} problems:", problems.len());
        for problem in problems.iter() {
            info!("- {:?}", problem);
        }
    }

    match (&catalog, problems.is_empty()) {
        (Some(_), true) => info!("Catalog checked, no issues found."),
        (Some(_), false) => info!(
            "Catalog was built, but check the {} non-fatal issues above.",
            problems.len()
        ),
        (None, _) => info!(
            "Check the {} problems above, the catalog could not be initialized.",
            problems.len()
        ),
    }

    if let Some(catalog) = catalog {
        info!(
            "Catalog has {} songs ({})",
            catalog.len(),
            if catalog.has_cluster_labels() {
                "with precomputed cluster labels"
            } else {
                "no cluster labels attached"
            }
        );
        return Ok(catalog);
    }

    bail!("Could not load catalog");
}
