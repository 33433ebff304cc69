//! Reading the source document and the optional index-to-filename map.

use crate::engine::writer::is_path_component;
use crate::error::LoadError;
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::Path;
use tokio::fs;
use tracing::{info, warn};

/// Raw `conf` objects, in declared order, before validation.
pub type RawEntries = Vec<Value>;

pub async fn load_sources(path: impl AsRef<Path>) -> Result<RawEntries, LoadError> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)
        .await
        .map_err(|source| LoadError::Read {
            path: path.to_path_buf(),
            source,
        })?;
    parse_sources(path, &contents)
}

pub fn parse_sources(path: &Path, contents: &str) -> Result<RawEntries, LoadError> {
    let mut document: Map<String, Value> =
        serde_json::from_str(contents).map_err(|source| LoadError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

    match document.remove("conf") {
        Some(Value::Array(entries)) => Ok(entries),
        _ => Err(LoadError::MissingConf {
            path: path.to_path_buf(),
        }),
    }
}

/// Maps `original_index` to a file stem. A missing file yields an empty map.
pub async fn load_name_map(path: impl AsRef<Path>) -> Result<HashMap<usize, String>, LoadError> {
    let path = path.as_ref();
    let contents = match fs::read_to_string(path).await {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            info!("No name map at {}, using indices as file names", path.display());
            return Ok(HashMap::new());
        }
        Err(source) => {
            return Err(LoadError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    };
    parse_name_map(path, &contents)
}

pub fn parse_name_map(path: &Path, contents: &str) -> Result<HashMap<usize, String>, LoadError> {
    let raw: HashMap<String, String> =
        serde_json::from_str(contents).map_err(|source| LoadError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

    // Keys that are not indices cannot refer to any entry.
    let by_index: BTreeMap<usize, String> = raw
        .into_iter()
        .filter_map(|(k, v)| k.trim().parse::<usize>().ok().map(|idx| (idx, v)))
        .collect();

    // Lowest index wins a shared stem; the loser falls back to its index.
    let mut stems = HashSet::new();
    let mut map = HashMap::with_capacity(by_index.len());
    for (idx, stem) in by_index {
        let stem = stem.trim();
        if stem.is_empty() {
            continue;
        }
        if !is_path_component(stem) {
            warn!("Name map entry {} -> {:?} is not a file name, ignoring", idx, stem);
            continue;
        }
        if !stems.insert(stem.to_string()) {
            warn!("Name map entry {} reuses stem {:?}, ignoring", idx, stem);
            continue;
        }
        map.insert(idx, stem.to_string());
    }
    Ok(map)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_sources_returns_conf_in_order() {
        let entries = parse_sources(
            Path::new("test.json"),
            r#"{"conf": [{"vname": "a"}, {"vname": "b"}], "other": 1}"#,
        )
        .unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1]["vname"], "b");
    }

    #[test]
    fn test_parse_sources_requires_conf_list() {
        let err = parse_sources(Path::new("test.json"), r#"{"lists": []}"#).unwrap_err();
        assert!(matches!(err, LoadError::MissingConf { .. }));

        let err = parse_sources(Path::new("test.json"), "{not json").unwrap_err();
        assert!(matches!(err, LoadError::Parse { .. }));
    }

    #[test]
    fn test_parse_name_map_skips_non_index_keys() {
        let map = parse_name_map(
            Path::new("map.json"),
            r#"{"0": "AAA", "12": "XYZ", "name": "bad", "3": ""}"#,
        )
        .unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map[&0], "AAA");
        assert_eq!(map[&12], "XYZ");
    }

    #[test]
    fn test_parse_name_map_drops_path_like_and_duplicate_stems() {
        let map = parse_name_map(
            Path::new("map.json"),
            r#"{"0": "../../escape", "1": "a/b", "2": "..", "3": "SAME", "4": "SAME", "5": " OK "}"#,
        )
        .unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map[&3], "SAME");
        assert!(!map.contains_key(&4));
        assert_eq!(map[&5], "OK");
    }

    #[tokio::test]
    async fn test_missing_name_map_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let map = load_name_map(dir.path().join("absent.json")).await.unwrap();
        assert!(map.is_empty());
    }
}
