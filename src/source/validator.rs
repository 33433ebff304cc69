//! Validation of the declared source list.
//!
//! Runs once, before any network activity. Produces a new list of
//! [`SourceEntry`] values in declared order with `original_index` assigned;
//! the raw JSON is never modified. The first offending entry aborts validation.

use super::types::{Format, SourceEntry, SourceUrl, TAG_DEAD, TAG_IGNORE};
use crate::engine::writer::is_path_component;
use crate::error::ValidationError;
use rand::seq::SliceRandom;
use rand::Rng;
use regex::Regex;
use rustc_hash::FxHashSet;
use serde_json::{Map, Value};
use std::collections::BTreeSet;
use std::sync::LazyLock;

pub const REQUIRED_KEYS: [&str; 6] = ["vname", "format", "group", "subg", "url", "pack"];

/// Tolerated and overwritten by validation.
const OPTIONAL_KEYS: [&str; 1] = ["index"];

/// http(s)/ftp(s) with a hostname, localhost or IPv4 host, optional port and path.
static URL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^(?:http|ftp)s?://(?:(?:[a-z0-9](?:[a-z0-9-]{0,61}[a-z0-9])?\.)+(?:[a-z]{2,6}\.?|[a-z0-9-]{2,}\.?)|localhost|[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3})(?::[0-9]+)?(?:/?|[/?]\S+)$",
    )
    .expect("URL_PATTERN regex")
});

pub fn is_valid_url(url: &str) -> bool {
    URL_PATTERN.is_match(url)
}

/// Validates, assigns indices in declared order, then shuffles the result.
pub fn validate_and_shuffle<R: Rng + ?Sized>(
    raw: &[Value],
    rng: &mut R,
) -> Result<Vec<SourceEntry>, ValidationError> {
    let mut entries = validate(raw)?;
    entries.shuffle(rng);
    Ok(entries)
}

/// Validates every raw entry. The returned list is in declared order.
pub fn validate(raw: &[Value]) -> Result<Vec<SourceEntry>, ValidationError> {
    let mut seen_urls: FxHashSet<String> = FxHashSet::default();
    let mut entries = Vec::with_capacity(raw.len());

    for (position, value) in raw.iter().enumerate() {
        let obj = value
            .as_object()
            .ok_or(ValidationError::NotAnObject { position })?;
        let entry = validate_entry(obj, position, &mut seen_urls)?;
        entries.push(entry);
    }

    Ok(entries)
}

fn validate_entry(
    obj: &Map<String, Value>,
    position: usize,
    seen_urls: &mut FxHashSet<String>,
) -> Result<SourceEntry, ValidationError> {
    let name = obj
        .get("vname")
        .and_then(Value::as_str)
        .unwrap_or("<unnamed>")
        .to_string();
    let field_error = |field: &'static str| ValidationError::InvalidField {
        position,
        name: name.clone(),
        field,
    };

    let pack_tags = match obj.get("pack") {
        None => BTreeSet::new(),
        Some(v) => string_list(v)
            .ok_or_else(|| field_error("pack"))?
            .into_iter()
            .collect(),
    };

    // 1. dead/ignore entries skip the key and format checks
    let exempt = pack_tags.contains(TAG_DEAD) || pack_tags.contains(TAG_IGNORE);

    // 2. exact key set
    if !exempt {
        check_keys(obj, position, &name)?;
    }

    // 3. url syntax and global uniqueness
    let urls = match obj.get("url").and_then(string_list) {
        Some(urls) if !urls.is_empty() => urls,
        _ if exempt => Vec::new(),
        _ => return Err(field_error("url")),
    };
    for url in &urls {
        if !is_valid_url(url) {
            return Err(ValidationError::InvalidUrl {
                position,
                name: name.clone(),
                url: url.clone(),
            });
        }
        if !seen_urls.insert(url.clone()) {
            return Err(ValidationError::DuplicateUrl {
                position,
                name: name.clone(),
                url: url.clone(),
            });
        }
    }

    // 4. formats, paired with urls
    let sources = match pair_sources(obj, &urls, position, &name) {
        Ok(sources) => sources,
        Err(_) if exempt => Vec::new(),
        Err(e) => return Err(e),
    };

    // 5. group
    let group = obj
        .get("group")
        .and_then(Value::as_str)
        .map(str::trim)
        .unwrap_or_default();
    if group.is_empty() {
        return Err(ValidationError::MissingGroup {
            position,
            name: name.clone(),
        });
    }

    let subgroup = match obj.get("subg") {
        None | Some(Value::Null) if exempt => "",
        Some(Value::String(s)) => s.trim(),
        _ => return Err(field_error("subg")),
    };

    // group and subg become directories under the output root
    for (field, value) in [("group", group), ("subg", subgroup)] {
        if !value.is_empty() && !is_path_component(value) {
            return Err(ValidationError::UnsafePath {
                position,
                name: name.clone(),
                field,
                value: value.to_string(),
            });
        }
    }

    Ok(SourceEntry {
        display_name: name.clone(),
        sources,
        group: group.to_string(),
        subgroup: subgroup.to_string(),
        pack_tags,
        original_index: position,
    })
}

fn check_keys(
    obj: &Map<String, Value>,
    position: usize,
    name: &str,
) -> Result<(), ValidationError> {
    let found: BTreeSet<&str> = obj
        .keys()
        .map(String::as_str)
        .filter(|k| !OPTIONAL_KEYS.contains(k))
        .collect();
    let expected: BTreeSet<&str> = REQUIRED_KEYS.into_iter().collect();

    if found == expected {
        return Ok(());
    }
    Err(ValidationError::InvalidKeys {
        position,
        name: name.to_string(),
        expected: expected.into_iter().map(String::from).collect(),
        found: found.into_iter().map(String::from).collect(),
    })
}

/// Normalizes the scalar-or-list `format` field against the url list.
fn pair_sources(
    obj: &Map<String, Value>,
    urls: &[String],
    position: usize,
    name: &str,
) -> Result<Vec<SourceUrl>, ValidationError> {
    let raw_formats = obj
        .get("format")
        .and_then(string_list)
        .filter(|f| !f.is_empty())
        .ok_or_else(|| ValidationError::InvalidField {
            position,
            name: name.to_string(),
            field: "format",
        })?;

    let mut formats = Vec::with_capacity(raw_formats.len());
    for raw in raw_formats {
        let format = raw
            .parse::<Format>()
            .map_err(|format| ValidationError::UnsupportedFormat {
                position,
                name: name.to_string(),
                format,
            })?;
        formats.push(format);
    }

    // A single format applies to every url.
    if formats.len() == 1 {
        let format = formats[0];
        return Ok(urls
            .iter()
            .map(|url| SourceUrl {
                url: url.clone(),
                format,
            })
            .collect());
    }

    if formats.len() != urls.len() {
        return Err(ValidationError::FormatCountMismatch {
            position,
            name: name.to_string(),
            urls: urls.len(),
            formats: formats.len(),
        });
    }

    Ok(urls
        .iter()
        .zip(formats)
        .map(|(url, format)| SourceUrl {
            url: url.clone(),
            format,
        })
        .collect())
}

/// A string or an array of strings; anything else is `None`.
fn string_list(value: &Value) -> Option<Vec<String>> {
    match value {
        Value::String(s) => Some(vec![s.clone()]),
        Value::Array(items) => items
            .iter()
            .map(|item| item.as_str().map(String::from))
            .collect(),
        _ => None,
    }
}
