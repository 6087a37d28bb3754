//! Record types for the transformation pipeline

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Default tag applied when a provider supplies no usable tag list
pub const DEFAULT_TAG: &str = "stablecoin";

/// Per-network supply attribution for one tracked entity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct NetworkSupply {
    pub network: Option<String>,
    pub supply: Option<f64>,
    pub share_percent: Option<f64>,
    pub contract_address: Option<String>,
}

/// Normalized, provider-agnostic representation of one tracked entity.
///
/// Built fresh from the current input batch on every transformation cycle
/// and never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CanonicalEntityRecord {
    pub id: Option<String>,
    pub name: String,
    pub symbol: String,
    pub slug: String,
    pub image_url: Option<String>,
    pub price: Option<f64>,
    pub market_cap: Option<f64>,
    pub volume_24h: Option<f64>,
    pub percent_change_24h: Option<f64>,
    pub rank: Option<f64>,
    pub circulating_supply: Option<f64>,
    pub total_supply: Option<f64>,
    pub network_breakdown: Vec<NetworkSupply>,
    pub tags: Vec<String>,
    pub description: Option<String>,
    pub logo_url: Option<String>,
    #[serde(default)]
    pub last_updated: Option<DateTime<Utc>>,
}

/// Derived per-platform totals, recomputed wholesale each aggregation call
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlatformAggregate {
    pub platform_name: String,
    pub total_supply: f64,
    pub entity_count: u64,
    pub share_percent_of_global: Option<f64>,
}

/// Global summary across the current batch
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct GlobalMetrics {
    pub total_market_cap: f64,
    pub total_supply: f64,
    pub entity_count: u64,
}

/// The complete, display-ready snapshot of one transformation cycle.
///
/// `metrics` and `platform_data` are always derived from the current
/// `items`, never stale relative to the last transform/reset call.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ViewModelBundle {
    pub items: Vec<CanonicalEntityRecord>,
    pub metrics: GlobalMetrics,
    pub platform_data: Vec<PlatformAggregate>,
}

impl CanonicalEntityRecord {
    /// Supply contribution attributed to one breakdown entry.
    ///
    /// Explicit per-network supply wins; otherwise circulating supply is
    /// apportioned by the entry's share percentage; otherwise zero.
    pub fn platform_contribution(&self, entry: &NetworkSupply) -> f64 {
        if let Some(supply) = entry.supply {
            return supply;
        }
        match (self.circulating_supply, entry.share_percent) {
            (Some(circulating), Some(share)) => circulating * share / 100.0,
            _ => 0.0,
        }
    }
}
