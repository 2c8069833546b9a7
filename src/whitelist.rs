use crate::Dependency;
use serde::{Deserialize, de};
use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
    str::FromStr,
};

/// Only YAML strings are usable as values, anything else, eg. an unquoted
/// `1.0` that YAML reads as a float, is treated as if the key was never
/// specified
fn string_or_absent<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: de::Deserializer<'de>,
{
    Ok(match serde_yaml::Value::deserialize(deserializer)? {
        serde_yaml::Value::String(s) => Some(s),
        _ => None,
    })
}

/// A single manually reviewed dependency that is exempt from remote license
/// checks
#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
pub struct WhitelistEntry {
    /// The `<group>/<name>` of the dependency
    #[serde(default, deserialize_with = "string_or_absent")]
    pub name: Option<String>,
    /// The exact version that was reviewed
    #[serde(default, deserialize_with = "string_or_absent")]
    pub version: Option<String>,
    /// Link to the issue where the review happened
    #[serde(default, deserialize_with = "string_or_absent")]
    pub issue: Option<String>,
    #[serde(default, deserialize_with = "string_or_absent")]
    pub comment: Option<String>,
    /// Any other keys, kept as they were written
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_yaml::Value>,
}

impl WhitelistEntry {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            version: Some(version.into()),
            ..Default::default()
        }
    }

    #[inline]
    pub fn with_issue(mut self, issue: impl Into<String>) -> Self {
        self.issue = Some(issue.into());
        self
    }

    #[inline]
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    /// True if both the name and version are present and exactly equal to
    /// the dependency's
    pub fn matches(&self, dependency: &Dependency) -> bool {
        let (Some(name), Some(version)) = (&self.name, &self.version) else {
            return false;
        };

        *version == dependency.version
            && name
                .strip_prefix(dependency.group.as_str())
                .and_then(|rest| rest.strip_prefix('/'))
                == Some(dependency.name.as_str())
    }
}

/// An ordered list of whitelist entries
#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(transparent)]
pub struct Whitelist(pub Vec<WhitelistEntry>);

impl Whitelist {
    /// Returns the first entry that matches the dependency
    #[inline]
    pub fn find(&self, dependency: &Dependency) -> Option<&WhitelistEntry> {
        is_whitelisted_by(dependency, &self.0)
    }
}

impl std::ops::Deref for Whitelist {
    type Target = [WhitelistEntry];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<Vec<WhitelistEntry>> for Whitelist {
    fn from(entries: Vec<WhitelistEntry>) -> Self {
        Self(entries)
    }
}

impl FromStr for Whitelist {
    type Err = serde_yaml::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // An empty document is an empty list, not an error
        match serde_yaml::from_str::<Option<Vec<WhitelistEntry>>>(s) {
            Ok(entries) => Ok(Self(entries.unwrap_or_default())),
            Err(_) if s.trim().is_empty() => Ok(Self::default()),
            Err(err) => Err(err),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum WhitelistError {
    #[error("unable to read whitelist '{}'", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse whitelist '{}'", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

/// Reads the whitelist at the specified path
pub fn load_whitelist(path: impl AsRef<Path>) -> Result<Whitelist, WhitelistError> {
    let path = path.as_ref();

    let contents = std::fs::read_to_string(path).map_err(|source| WhitelistError::Read {
        path: path.to_owned(),
        source,
    })?;

    let whitelist: Whitelist = contents.parse().map_err(|source| WhitelistError::Parse {
        path: path.to_owned(),
        source,
    })?;

    log::debug!(
        "loaded {} whitelist entries from '{}'",
        whitelist.len(),
        path.display()
    );

    Ok(whitelist)
}

/// True if any entry in the whitelist matches the dependency
#[inline]
pub fn is_whitelisted(dependency: &Dependency, whitelist: &[WhitelistEntry]) -> bool {
    is_whitelisted_by(dependency, whitelist).is_some()
}

/// Same as [`is_whitelisted`], but returns the entry that matched
#[inline]
pub fn is_whitelisted_by<'wl>(
    dependency: &Dependency,
    whitelist: &'wl [WhitelistEntry],
) -> Option<&'wl WhitelistEntry> {
    whitelist.iter().find(|entry| entry.matches(dependency))
}
