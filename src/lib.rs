#![doc = include_str!("../README.md")]

use std::{fmt, str::FromStr};

pub mod check;
pub mod config;
pub mod definitions;
pub mod whitelist;

pub use check::{CheckResult, Checker, Clearance, FailurePolicy};
pub use whitelist::{Whitelist, WhitelistEntry, is_whitelisted, load_whitelist};

#[inline]
pub fn parse_license_expression(license: &str) -> Result<spdx::Expression, spdx::ParseError> {
    // Declared licenses are harvested from arbitrary packages, so imprecise
    // names and lower case operators are expected rather than exceptional
    spdx::Expression::parse_mode(license, spdx::ParseMode::LAX)
}

/// A single inbound dependency, identified by its Maven style coordinate
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Dependency {
    pub group: String,
    pub name: String,
    pub version: String,
}

impl Dependency {
    pub fn new(
        group: impl Into<String>,
        name: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            group: group.into(),
            name: name.into(),
            version: version.into(),
        }
    }

    /// The `<group>/<name>` form used by the `name` key of whitelist entries
    #[inline]
    pub fn whitelist_name(&self) -> String {
        format!("{}/{}", self.group, self.name)
    }
}

impl fmt::Display for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.group, self.name, self.version)
    }
}

#[derive(Debug, thiserror::Error)]
#[error("'{0}' is not a <group>:<name>:<version> coordinate")]
pub struct InvalidCoordinate(String);

impl FromStr for Dependency {
    type Err = InvalidCoordinate;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split(':');

        match (parts.next(), parts.next(), parts.next(), parts.next()) {
            (Some(group), Some(name), Some(version), None)
                if !name.is_empty() && !version.is_empty() =>
            {
                Ok(Self::new(group, name, version))
            }
            _ => Err(InvalidCoordinate(s.to_owned())),
        }
    }
}
