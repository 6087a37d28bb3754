//! Provider payload adapters
//!
//! Each adapter is a pure translation from one provider's payload shape
//! into the aggregated DTO sequence the normalizer consumes. Adapters know
//! nothing about how payloads were fetched and nothing about the canonical
//! record — both sides can evolve independently.

mod coingecko;
mod coinmarketcap;

pub use coingecko::CoinGeckoSource;
pub use coinmarketcap::CoinMarketCapSource;

use crate::types::{Result, StablewatchError};
use serde_json::Value;

/// Trait for translating provider payloads into aggregated DTOs
pub trait SourceAdapter: Send + Sync {
    /// Adapter name (e.g., "coingecko")
    fn name(&self) -> &str;

    /// Translate one payload into a sequence of aggregated DTOs.
    ///
    /// Malformed individual records are skipped (fail-soft); only a payload
    /// whose overall shape is unusable is an error.
    fn adapt(&self, payload: &Value) -> Result<Vec<Value>>;
}

/// Passthrough for payloads already in aggregated shape
pub struct AggregatedSource;

impl SourceAdapter for AggregatedSource {
    fn name(&self) -> &str {
        "aggregated"
    }

    fn adapt(&self, payload: &Value) -> Result<Vec<Value>> {
        match payload {
            Value::Array(items) => Ok(items.clone()),
            // A single-entity payload becomes a one-element batch
            Value::Object(_) => Ok(vec![payload.clone()]),
            _ => Err(StablewatchError::Parse(
                "aggregated payload must be an array or object".into(),
            )),
        }
    }
}

/// Registry of available source adapters
pub struct SourceRegistry {
    adapters: Vec<Box<dyn SourceAdapter>>,
}

impl SourceRegistry {
    /// Create a new registry with default adapters
    pub fn new() -> Self {
        Self {
            adapters: vec![
                Box::new(AggregatedSource),
                Box::new(CoinGeckoSource),
                Box::new(CoinMarketCapSource),
            ],
        }
    }

    /// Find an adapter by name
    pub fn get(&self, name: &str) -> Option<&dyn SourceAdapter> {
        self.adapters
            .iter()
            .find(|a| a.name() == name)
            .map(|a| a.as_ref())
    }

    /// Look up an adapter, failing with a configuration error on unknown
    /// names — misconfiguration is surfaced immediately, not at first use.
    pub fn resolve(&self, name: &str) -> Result<&dyn SourceAdapter> {
        self.get(name).ok_or_else(|| {
            StablewatchError::Config(format!(
                "unknown source adapter '{}' (available: {})",
                name,
                self.names().join(", ")
            ))
        })
    }

    fn names(&self) -> Vec<&str> {
        self.adapters.iter().map(|a| a.name()).collect()
    }
}

impl Default for SourceRegistry {
    fn default() -> Self {
        Self::new()
    }
}
