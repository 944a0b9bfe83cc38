//! Engine configuration

use serde::Deserialize;

use crate::error::Result;
use crate::rule::{Connective, DEFAULT_CACHE_CAPACITY};

/// Rule engine configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Connective used by combine when the caller gives none
    pub default_connective: Connective,
    /// Maximum number of distinct rule strings kept in the parse cache
    pub cache_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_connective: Connective::And,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
        }
    }
}

impl EngineConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Resolve a caller-supplied connective; missing or blank means the default
    pub fn resolve_connective(&self, connective: Option<&str>) -> Result<Connective> {
        match connective.map(str::trim) {
            None | Some("") => Ok(self.default_connective),
            Some(text) => text.parse(),
        }
    }
}
