use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

pub const TAG_DEAD: &str = "dead";
pub const TAG_IGNORE: &str = "ignore";

/// Text layout of a downloaded list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    Domains,
    Hosts,
    Abp,
    Wildcard,
}

impl Format {
    pub const ALL: [Format; 4] = [Format::Domains, Format::Hosts, Format::Abp, Format::Wildcard];

    pub fn as_str(&self) -> &'static str {
        match self {
            Format::Domains => "domains",
            Format::Hosts => "hosts",
            Format::Abp => "abp",
            Format::Wildcard => "wildcard",
        }
    }
}

impl FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "domains" => Ok(Format::Domains),
            "hosts" => Ok(Format::Hosts),
            "abp" => Ok(Format::Abp),
            "wildcard" => Ok(Format::Wildcard),
            other => Err(other.to_string()),
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One downloadable (url, format) pair of an entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceUrl {
    pub url: String,
    pub format: Format,
}

/// A validated block-list source. Built only by the validator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceEntry {
    pub display_name: String,
    pub sources: Vec<SourceUrl>,
    pub group: String,
    pub subgroup: String,
    pub pack_tags: BTreeSet<String>,
    pub original_index: usize,
}

impl SourceEntry {
    pub fn has_tag(&self, tag: &str) -> bool {
        self.pack_tags.contains(tag)
    }

    pub fn is_dead(&self) -> bool {
        self.has_tag(TAG_DEAD)
    }

    pub fn is_ignored(&self) -> bool {
        self.has_tag(TAG_IGNORE)
    }
}

impl fmt::Display for SourceEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let urls: Vec<&str> = self.sources.iter().map(|s| s.url.as_str()).collect();
        write!(
            f,
            "#{} {} [{}/{}] {:?} pack={:?}",
            self.original_index,
            self.display_name,
            self.group,
            self.subgroup,
            urls,
            self.pack_tags
        )
    }
}
