//! Static source catalog: country → topic → sources.
//!
//! Lookups never fail. Unknown combinations fall back to US technology
//! outlets, and every result is de-duplicated by URL, shuffled and capped to
//! one batch.

use crate::error::ConfigError;
use crate::models::Source;
use itertools::Itertools;
use rand::rng;
use rand::seq::SliceRandom;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{info, instrument, warn};

/// Catalog bundled into the binary.
const BUILTIN_CATALOG: &str = include_str!("../config/catalog.yaml");

/// Countries a `global` lookup draws from.
pub const GLOBAL_COUNTRIES: &[&str] = &["usa", "uk", "canada"];

pub const ALL_TOPICS: &str = "all";
pub const GLOBAL: &str = "global";

const FALLBACK_COUNTRY: &str = "usa";
const FALLBACK_TOPIC: &str = "technology";

pub const DEFAULT_BATCH_SIZE: usize = 5;

/// Where the orchestrator's input batch comes from.
pub trait SourceCatalog {
    /// At most one batch of sources for `topic` in `country`.
    fn sources_for(&self, topic: &str, country: &str) -> Vec<Source>;
}

type Topics = BTreeMap<String, Vec<Source>>;

#[derive(Debug, Clone)]
pub struct StaticCatalog {
    countries: BTreeMap<String, Topics>,
    batch_size: usize,
}

fn key(raw: &str) -> String {
    raw.trim().to_lowercase()
}

impl StaticCatalog {
    /// Parse a catalog document.
    ///
    /// Country and topic keys are trimmed and lower-cased; entries whose keys
    /// only differ in case are merged. An empty document is an empty catalog.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] when the document is not a
    /// country → topic → source-list mapping.
    ///
    /// # Examples
    ///
    /// ```ignore
    /// let catalog = StaticCatalog::from_yaml("usa:\n  technology:\n    - { name: Wired, url: https://www.wired.com }\n")?;
    /// assert_eq!(catalog.sources_for("Technology", "USA").len(), 1);
    /// ```
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let raw: BTreeMap<String, Topics> = if yaml.trim().is_empty() {
            BTreeMap::new()
        } else {
            serde_yaml::from_str(yaml)?
        };

        let mut countries: BTreeMap<String, Topics> = BTreeMap::new();
        for (country, topics) in raw {
            let entry = countries.entry(key(&country)).or_default();
            for (topic, sources) in topics {
                entry.entry(key(&topic)).or_default().extend(sources);
            }
        }
        Ok(Self {
            countries,
            batch_size: DEFAULT_BATCH_SIZE,
        })
    }

    /// The catalog bundled with the crate.
    pub fn builtin() -> Result<Self, ConfigError> {
        Self::from_yaml(BUILTIN_CATALOG)
    }

    #[instrument(level = "info", skip_all, fields(path = %path.as_ref().display()))]
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let yaml = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ConfigError::Io {
                path: path.display().to_string(),
                source,
            })?;
        let catalog = Self::from_yaml(&yaml)?;
        info!(countries = catalog.countries.len(), "Loaded source catalog");
        Ok(catalog)
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    pub fn countries(&self) -> impl Iterator<Item = &str> {
        self.countries.keys().map(String::as_str)
    }

    pub fn topics(&self, country: &str) -> impl Iterator<Item = &str> {
        self.countries
            .get(&key(country))
            .into_iter()
            .flat_map(|topics| topics.keys().map(String::as_str))
    }

    /// Every matching source, duplicates included, before shuffling.
    fn matching(&self, topic: &str, country: &str) -> Vec<&Source> {
        let countries: Vec<&str> = if country == GLOBAL {
            GLOBAL_COUNTRIES.to_vec()
        } else {
            vec![country]
        };

        countries
            .into_iter()
            .filter_map(|c| self.countries.get(c))
            .flat_map(|topics| {
                if topic == ALL_TOPICS {
                    topics.values().flatten().collect::<Vec<_>>()
                } else {
                    topics.get(topic).into_iter().flatten().collect::<Vec<_>>()
                }
            })
            .collect()
    }

    fn pick(&self, sources: Vec<&Source>) -> Vec<Source> {
        let mut unique: Vec<Source> = sources
            .into_iter()
            .unique_by(|s| s.url.clone())
            .cloned()
            .collect();
        unique.shuffle(&mut rng());
        unique.truncate(self.batch_size);
        unique
    }
}

impl SourceCatalog for StaticCatalog {
    #[instrument(level = "info", skip(self))]
    fn sources_for(&self, topic: &str, country: &str) -> Vec<Source> {
        let (topic, country) = (key(topic), key(country));

        let mut sources = self.pick(self.matching(&topic, &country));
        if sources.is_empty() {
            warn!(
                fallback_country = FALLBACK_COUNTRY,
                fallback_topic = FALLBACK_TOPIC,
                "No sources for topic/country, using fallback"
            );
            sources = self.pick(self.matching(FALLBACK_TOPIC, FALLBACK_COUNTRY));
        }

        info!(
            count = sources.len(),
            sources = %sources.iter().map(|s| s.name.as_str()).join(", "),
            "Selected news sources"
        );
        sources
    }
}
