//! Tuple configuration: buffer sizing, overflow handling, float precision.
//!
//! ```json
//! { "max_collection_size": 64, "overflow_policy": "truncate", "precision": "full" }
//! ```
//!
//! Every key is optional; missing keys take their defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::buffer::OverflowPolicy;
use crate::codec::Precision;
use crate::{Error, Result};

/// Default per-event collection capacity.
pub const DEFAULT_MAX_COLLECTION_SIZE: usize = 64;

/// Largest capacity the `u16` count prefix of a packed collection can express.
pub const MAX_COLLECTION_SIZE: usize = u16::MAX as usize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TupleConfig {
    /// Maximal number of records kept per collection and event.
    pub max_collection_size: usize,
    /// What to do when an event has more objects than `max_collection_size`.
    pub overflow_policy: OverflowPolicy,
    /// Float width of collections packed by buffers built from this config.
    pub precision: Precision,
}

impl Default for TupleConfig {
    fn default() -> Self {
        Self {
            max_collection_size: DEFAULT_MAX_COLLECTION_SIZE,
            overflow_policy: OverflowPolicy::default(),
            precision: Precision::default(),
        }
    }
}

impl TupleConfig {
    /// Parse and validate a JSON document.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: TupleConfig = serde_json::from_str(json)?;
        config.validate()?;
        tracing::debug!(?config, "loaded tuple configuration");
        Ok(config)
    }

    /// Read, parse and validate a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        tracing::debug!(path = %path.display(), "reading tuple configuration");
        Self::from_json(&text)
    }

    /// Capacity must be non-zero and expressible in the packed count prefix.
    pub fn validate(&self) -> Result<()> {
        check_collection_size(self.max_collection_size)
    }

    pub fn with_max_collection_size(mut self, size: usize) -> Self {
        self.max_collection_size = size;
        self
    }

    pub fn with_overflow_policy(mut self, policy: OverflowPolicy) -> Self {
        self.overflow_policy = policy;
        self
    }

    pub fn with_precision(mut self, precision: Precision) -> Self {
        self.precision = precision;
        self
    }
}

pub(crate) fn check_collection_size(size: usize) -> Result<()> {
    if size == 0 {
        return Err(Error::Config("max_collection_size must be at least 1".into()));
    }
    if size > MAX_COLLECTION_SIZE {
        return Err(Error::Config(format!(
            "max_collection_size {size} exceeds {MAX_COLLECTION_SIZE}"
        )));
    }
    Ok(())
}
