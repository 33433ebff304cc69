use blocklist_fetch::config::Config;
use blocklist_fetch::init::build_coordinator;
use blocklist_fetch::source::{load_name_map, load_sources, validate_and_shuffle, Format};
use std::collections::HashMap;

const SOURCES: &str = r#"{
  "conf": [
    {
      "vname": "Ads (hosts)",
      "format": "hosts",
      "group": "privacy",
      "subg": "ads",
      "url": "https://hosts.example.com/hosts.txt",
      "pack": ["recommended"]
    },
    {
      "vname": "Split list",
      "format": ["domains", "wildcard"],
      "group": "security",
      "subg": "",
      "url": ["https://a.example.net/d.txt", "https://b.example.net/w.txt"],
      "pack": ["ignore"],
      "index": 41
    },
    {
      "vname": "Retired",
      "format": "abp",
      "group": "privacy",
      "subg": "",
      "url": "https://old.example.org/list.txt",
      "pack": ["dead"]
    }
  ]
}"#;

#[tokio::test]
async fn test_component_instantiation() {
    let config = Config::default();
    let _coordinator = build_coordinator(&config, HashMap::new()).unwrap();
}

#[tokio::test]
async fn test_load_and_validate_source_document() {
    let dir = tempfile::tempdir().unwrap();
    let sources = dir.path().join("blocklistConfig.json");
    let names = dir.path().join("valueUnameMap.json");
    tokio::fs::write(&sources, SOURCES).await.unwrap();
    tokio::fs::write(&names, r#"{"0": "HST", "1": "SPL"}"#)
        .await
        .unwrap();

    let raw = load_sources(&sources).await.unwrap();
    let name_map = load_name_map(&names).await.unwrap();
    let mut entries = validate_and_shuffle(&raw, &mut rand::rng()).unwrap();
    entries.sort_by_key(|e| e.original_index);

    assert_eq!(entries.len(), 3);
    assert_eq!(entries[0].display_name, "Ads (hosts)");
    assert_eq!(entries[0].subgroup, "ads");
    assert_eq!(entries[1].original_index, 1);
    assert_eq!(entries[1].sources.len(), 2);
    assert_eq!(entries[1].sources[1].format, Format::Wildcard);
    assert!(entries[1].is_ignored());
    assert!(entries[2].is_dead());
    assert_eq!(name_map.get(&1).map(String::as_str), Some("SPL"));
}

#[tokio::test]
async fn test_config_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("blocklist-fetch.toml");
    tokio::fs::write(
        &path,
        r#"
sources = "conf/sources.json"
output_dir = "lists"

[fetch]
concurrency = 16
min_domains = 9

[logging]
level = "debug"
"#,
    )
    .await
    .unwrap();

    let config = Config::load(&path).await.unwrap();
    assert_eq!(config.fetch.concurrency, 16);
    assert_eq!(config.fetch.min_domains, 9);
    assert_eq!(config.fetch.attempts, 2);
    assert_eq!(config.logging.level, "debug");
    assert_eq!(config.output_dir, std::path::PathBuf::from("lists"));
}
