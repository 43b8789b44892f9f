//! Static data sources for the catalog.
//!
//! The planet and satellite lists are JSON arrays. They either come from files
//! named in the configuration or from the dataset compiled into the binary.

use std::path::Path;

use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::{Error, Result};
use crate::model::{Planet, Satellite};

/// Planets bundled with the binary.
pub const EMBEDDED_PLANETS: &str = include_str!("../../data/planets.json");

/// Satellites bundled with the binary.
pub const EMBEDDED_SATELLITES: &str = include_str!("../../data/satellites.json");

/// Parse a JSON array of records, labelling failures with `origin`.
///
/// # Errors
///
/// Returns [`Error::DataParse`] if the text is not a JSON array of records.
pub fn parse_records<T: DeserializeOwned>(json: &str, origin: &str) -> Result<Vec<T>> {
    serde_json::from_str(json).map_err(|source| Error::DataParse {
        origin: origin.to_string(),
        source,
    })
}

/// Read and parse a JSON array of records from a file.
///
/// # Errors
///
/// Returns [`Error::DataRead`] if the file cannot be read and
/// [`Error::DataParse`] if its contents are not valid records.
pub fn read_records<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    debug!("Reading catalog data from {}", path.display());
    let json = std::fs::read_to_string(path).map_err(|source| Error::DataRead {
        path: path.to_path_buf(),
        source,
    })?;
    parse_records(&json, &path.display().to_string())
}

/// Load planets from `path`, or from the bundled dataset when `None`.
///
/// # Errors
///
/// Returns an error if the data cannot be read or parsed.
pub fn load_planets(path: Option<&Path>) -> Result<Vec<Planet>> {
    match path {
        Some(path) => read_records(path),
        None => parse_records(EMBEDDED_PLANETS, "embedded planets"),
    }
}

/// Load satellites from `path`, or from the bundled dataset when `None`.
///
/// # Errors
///
/// Returns an error if the data cannot be read or parsed.
pub fn load_satellites(path: Option<&Path>) -> Result<Vec<Satellite>> {
    match path {
        Some(path) => read_records(path),
        None => parse_records(EMBEDDED_SATELLITES, "embedded satellites"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_planets_parse() {
        let planets = load_planets(None).unwrap();
        assert_eq!(planets.len(), 8);
        assert_eq!(planets[2].name, "Terre");
        assert!(planets.iter().all(|p| p.image.is_none()));
    }

    #[test]
    fn test_embedded_satellites_parse() {
        let satellites = load_satellites(None).unwrap();
        assert!(!satellites.is_empty());
        assert!(satellites.iter().any(|s| s.name == "Lune" && s.planet_id == 3));
    }

    #[test]
    fn test_read_records_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("planets.json");
        std::fs::write(&path, r#"[{"id": 10, "name": "Vulcain"}]"#).unwrap();

        let planets = load_planets(Some(&path)).unwrap();
        assert_eq!(planets.len(), 1);
        assert_eq!(planets[0].id, 10);
    }

    #[test]
    fn test_read_records_missing_file() {
        let result = load_satellites(Some(Path::new("/nonexistent/satellites.json")));
        assert!(matches!(result, Err(Error::DataRead { .. })));
    }

    #[test]
    fn test_parse_records_invalid_json() {
        let result = parse_records::<Planet>("{not json", "test data");
        match result {
            Err(Error::DataParse { origin, .. }) => assert_eq!(origin, "test data"),
            other => panic!("expected DataParse, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_records_rejects_object() {
        let result = parse_records::<Planet>(r#"{"id": 1, "name": "Mercure"}"#, "object");
        assert!(result.is_err());
    }
}
