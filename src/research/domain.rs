//! Domain configurations.
//!
//! A domain (cruises, jobs, ...) is plain data: display metadata for the
//! launcher plus per-stage instruction overrides. Adding a domain never
//! needs new code, only a new `[domains.<name>]` table.

use crate::types::{AppError, Result, Stage};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

/// Display metadata for a domain, not interpreted by the pipeline
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DomainUi {
    #[serde(default)]
    pub theme_color: Option<String>,
    #[serde(default)]
    pub input_label: Option<String>,
    #[serde(default)]
    pub input_placeholder: Option<String>,
    #[serde(default)]
    pub button_text: Option<String>,
    #[serde(default)]
    pub output_label: Option<String>,
    #[serde(default)]
    pub examples: Vec<String>,
}

/// A named bundle of stage instruction overrides
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DomainConfig {
    /// Filled from the table key when loaded from `research.toml`
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub display_name: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub ui: DomainUi,

    /// Override instructions keyed by stage
    #[serde(default)]
    pub instructions: HashMap<Stage, String>,
}

impl DomainConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Builder-style helper to set one stage override
    pub fn with_instructions(mut self, stage: Stage, instructions: impl Into<String>) -> Self {
        self.instructions.insert(stage, instructions.into());
        self
    }

    /// Override for `stage`, if this domain has one
    pub fn instructions_for(&self, stage: Stage) -> Option<&str> {
        self.instructions.get(&stage).map(String::as_str)
    }

    /// Name shown to users, falling back to the domain key
    pub fn title(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.name)
    }
}

/// Name to domain lookup
///
/// Lookups hand out shared immutable values, so repeated lookups of the same
/// name return the same configuration for as long as the registry lives.
#[derive(Debug, Clone, Default)]
pub struct DomainRegistry {
    domains: BTreeMap<String, Arc<DomainConfig>>,
}

impl DomainRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, name: impl Into<String>, mut domain: DomainConfig) {
        let name = name.into();
        domain.name = name.clone();
        self.domains.insert(name, Arc::new(domain));
    }

    pub fn get(&self, name: &str) -> Option<Arc<DomainConfig>> {
        self.domains.get(name).cloned()
    }

    /// Like [`get`](Self::get) but reports the available names on a miss
    pub fn require(&self, name: &str) -> Result<Arc<DomainConfig>> {
        self.get(name).ok_or_else(|| {
            AppError::NotFound(format!(
                "domain '{}' (available: {})",
                name,
                if self.domains.is_empty() {
                    "none".to_string()
                } else {
                    self.names().join(", ")
                }
            ))
        })
    }

    /// Domain names in sorted order
    pub fn names(&self) -> Vec<&str> {
        self.domains.keys().map(String::as_str).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<DomainConfig>> {
        self.domains.values()
    }

    pub fn len(&self) -> usize {
        self.domains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.domains.is_empty()
    }
}

impl FromIterator<(String, DomainConfig)> for DomainRegistry {
    fn from_iter<I: IntoIterator<Item = (String, DomainConfig)>>(iter: I) -> Self {
        let mut registry = Self::new();
        for (name, domain) in iter {
            registry.register(name, domain);
        }
        registry
    }
}
