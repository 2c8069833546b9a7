use crate::Dependency;
use reqwest::blocking::Client;
use serde::Deserialize;
use std::io::Read;
use url::Url;

pub const DEFAULT_API_URL: &str = "https://api.clearlydefined.io";

/// The value clearlydefined uses when a license could not be determined
pub const NO_ASSERTION: &str = "NOASSERTION";

#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    #[error("'{0}' cannot be used as the base of a definitions url")]
    InvalidBase(Url),
    #[error("request to '{url}' failed")]
    Request {
        url: Url,
        #[source]
        source: reqwest::Error,
    },
    #[error("failed to read response from '{url}'")]
    Read {
        url: Url,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to deserialize definition from '{url}'")]
    Decode {
        url: Url,
        #[source]
        source: serde_json::Error,
    },
}

/// Retrieves license metadata for a dependency from some external source
pub trait Lookup {
    fn definition(&self, dependency: &Dependency) -> Result<Definition, LookupError>;
}

impl<L: Lookup + ?Sized> Lookup for &L {
    #[inline]
    fn definition(&self, dependency: &Dependency) -> Result<Definition, LookupError> {
        (**self).definition(dependency)
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Coordinates {
    #[serde(rename = "type")]
    pub kind: String,
    pub provider: String,
    #[serde(default)]
    pub namespace: Option<String>,
    pub name: String,
    pub revision: String,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct Discovered {
    #[serde(default)]
    pub expressions: Vec<String>,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct Facet {
    #[serde(default)]
    pub discovered: Discovered,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct Facets {
    #[serde(default)]
    pub core: Facet,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct Licensed {
    /// The SPDX expression the package declares, as curated by clearlydefined
    #[serde(default)]
    pub declared: Option<String>,
    #[serde(default)]
    pub facets: Facets,
}

/// The subset of a clearlydefined definition we actually care about
#[derive(Deserialize, Debug, Clone, Default)]
pub struct Definition {
    #[serde(default)]
    pub coordinates: Option<Coordinates>,
    #[serde(default)]
    pub licensed: Licensed,
}

impl Definition {
    /// The declared license expression, unless it is missing or clearlydefined
    /// could not make an assertion about it
    pub fn declared(&self) -> Option<&str> {
        self.licensed
            .declared
            .as_deref()
            .map(str::trim)
            .filter(|dec| !dec.is_empty() && *dec != NO_ASSERTION)
    }

    /// License expressions discovered by scanning the package's files
    #[inline]
    pub fn discovered(&self) -> &[String] {
        &self.licensed.facets.core.discovered.expressions
    }
}

/// Retrieves definitions for maven packages from a clearlydefined instance
#[derive(Clone)]
pub struct ClearlyDefined {
    client: Client,
    base: Url,
}

impl ClearlyDefined {
    pub fn online() -> Self {
        Self {
            client: Client::new(),
            // The constant is a known good url
            base: Url::parse(DEFAULT_API_URL).unwrap(),
        }
    }

    /// Fails if the base url can't have definition paths appended to it
    pub fn with_client(client: Client, base: Url) -> Result<Self, LookupError> {
        if base.cannot_be_a_base() {
            return Err(LookupError::InvalidBase(base));
        }

        Ok(Self { client, base })
    }

    /// The url of the definition for the dependency, eg.
    /// `https://api.clearlydefined.io/definitions/maven/mavencentral/org.springframework/spring-context/5.2.2.RELEASE`
    pub fn definition_url(&self, dependency: &Dependency) -> Result<Url, LookupError> {
        let mut url = self.base.clone();

        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|()| LookupError::InvalidBase(self.base.clone()))?;

            // clearlydefined uses `-` for an empty namespace
            let group = if dependency.group.is_empty() {
                "-"
            } else {
                dependency.group.as_str()
            };

            segments.pop_if_empty().extend([
                "definitions",
                "maven",
                "mavencentral",
                group,
                dependency.name.as_str(),
                dependency.version.as_str(),
            ]);
        }

        Ok(url)
    }
}

impl Lookup for ClearlyDefined {
    fn definition(&self, dependency: &Dependency) -> Result<Definition, LookupError> {
        let url = self.definition_url(dependency)?;

        log::debug!("retrieving definition for '{dependency}' from '{url}'");

        let mut res = self
            .client
            .get(url.clone())
            .send()
            .and_then(|res| res.error_for_status())
            .map_err(|source| LookupError::Request {
                url: url.clone(),
                source,
            })?;

        let mut body = String::with_capacity(res.content_length().unwrap_or(4 * 1024) as usize);
        res.read_to_string(&mut body)
            .map_err(|source| LookupError::Read {
                url: url.clone(),
                source,
            })?;

        serde_json::from_str(&body).map_err(|source| LookupError::Decode { url, source })
    }
}
