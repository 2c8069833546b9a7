use crate::{
    check::FailurePolicy,
    definitions::DEFAULT_API_URL,
    whitelist::{Whitelist, load_whitelist},
};
use anyhow::Context as _;
use serde::{Deserialize, de};
use std::{
    fmt,
    path::{Path, PathBuf},
};
use url::Url;

#[inline]
fn deserialize_licensee<'de, D>(
    deserializer: D,
) -> std::result::Result<Vec<spdx::Licensee>, D::Error>
where
    D: de::Deserializer<'de>,
{
    struct Visitor;

    impl<'de> de::Visitor<'de> for Visitor {
        type Value = Vec<spdx::Licensee>;

        fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
            formatter.write_str("array of SPDX licensees")
        }

        fn visit_seq<S>(self, mut seq: S) -> Result<Self::Value, S::Error>
        where
            S: de::SeqAccess<'de>,
        {
            let mut vec = Vec::new();

            while let Some(v) = seq.next_element::<String>()? {
                let lic = spdx::Licensee::parse(&v).map_err(|e| {
                    de::Error::custom(format!("'{v}' is not a valid SPDX licensee: {e}"))
                })?;

                vec.push(lic);
            }

            Ok(vec)
        }
    }

    deserializer.deserialize_seq(Visitor)
}

/// The definitions url is built by appending path segments, so urls like
/// `mailto:` that can't take them are rejected up front
fn deserialize_base_url<'de, D>(deserializer: D) -> Result<Url, D::Error>
where
    D: de::Deserializer<'de>,
{
    let url = Url::deserialize(deserializer)?;

    if url.cannot_be_a_base() {
        return Err(de::Error::custom(format!(
            "'{url}' cannot be used as the base of a definitions url"
        )));
    }

    Ok(url)
}

#[inline]
fn default_api_url() -> Url {
    // The constant is a known good url
    Url::parse(DEFAULT_API_URL).unwrap()
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct Config {
    /// The licenses a dependency's declared license expression must be
    /// satisfied by, in priority order
    #[serde(default, deserialize_with = "deserialize_licensee")]
    pub accepted: Vec<spdx::Licensee>,
    /// The clearlydefined instance to retrieve harvested license data from
    #[serde(
        default = "default_api_url",
        deserialize_with = "deserialize_base_url"
    )]
    pub clearly_defined_url: Url,
    /// Whether a dependency passes or fails when its license data could not
    /// be retrieved
    #[serde(default)]
    pub on_lookup_failure: FailurePolicy,
    /// Path to the whitelist of manually reviewed dependencies, relative
    /// paths are relative to the config file
    #[serde(default)]
    pub whitelist: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            accepted: Vec::new(),
            clearly_defined_url: default_api_url(),
            on_lookup_failure: FailurePolicy::default(),
            whitelist: None,
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("unable to read config '{}'", path.display()))?;

        let mut cfg: Self = toml::from_str(&contents)
            .with_context(|| format!("failed to deserialize config '{}'", path.display()))?;

        if let Some(wl) = &mut cfg.whitelist {
            if wl.is_relative() {
                if let Some(parent) = path.parent() {
                    *wl = parent.join(&*wl);
                }
            }
        }

        log::info!("loaded config from {}", path.display());
        Ok(cfg)
    }

    /// Loads the configured whitelist, or an empty one if there isn't one
    pub fn load_whitelist(&self) -> anyhow::Result<Whitelist> {
        match &self.whitelist {
            Some(path) => Ok(load_whitelist(path)?),
            None => Ok(Whitelist::default()),
        }
    }
}
