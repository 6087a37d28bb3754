//! Aggregator service for platform and global metrics

use crate::types::{CanonicalEntityRecord, GlobalMetrics, PlatformAggregate};
use std::collections::{HashMap, HashSet};

/// Aggregator for computing derived metrics over the current batch
pub struct Aggregator;

struct PlatformBucket {
    display_name: String,
    total_supply: f64,
    entity_count: u64,
}

impl Aggregator {
    /// Aggregate per-platform supply across records.
    ///
    /// Grouping is multi-membership: a record contributes to every platform
    /// named in its network breakdown. Platform identity is the trimmed,
    /// case-insensitive name; the first-seen spelling is kept for display.
    /// Output order equals first-seen order across the input sequence, so
    /// identical input yields identical ordering on every call.
    pub fn platforms(records: &[CanonicalEntityRecord]) -> Vec<PlatformAggregate> {
        let mut order: Vec<String> = Vec::new();
        let mut buckets: HashMap<String, PlatformBucket> = HashMap::new();

        for record in records {
            // A record counts once per platform even with duplicate entries
            let mut counted: HashSet<String> = HashSet::new();

            for entry in &record.network_breakdown {
                let Some(display) = entry.network.as_deref().map(str::trim) else {
                    continue;
                };
                if display.is_empty() {
                    continue;
                }
                let key = display.to_lowercase();

                let bucket = buckets.entry(key.clone()).or_insert_with(|| {
                    order.push(key.clone());
                    PlatformBucket {
                        display_name: display.to_string(),
                        total_supply: 0.0,
                        entity_count: 0,
                    }
                });

                bucket.total_supply += record.platform_contribution(entry);
                if counted.insert(key) {
                    bucket.entity_count = bucket.entity_count.saturating_add(1);
                }
            }
        }

        let grand_total: f64 = buckets.values().map(|b| b.total_supply).sum();

        order
            .into_iter()
            .filter_map(|key| buckets.remove(&key))
            .map(|bucket| PlatformAggregate {
                share_percent_of_global: if grand_total > 0.0 {
                    Some(bucket.total_supply / grand_total * 100.0)
                } else {
                    None
                },
                platform_name: bucket.display_name,
                total_supply: bucket.total_supply,
                entity_count: bucket.entity_count,
            })
            .collect()
    }

    /// Compute global summary metrics across all records
    pub fn global(records: &[CanonicalEntityRecord]) -> GlobalMetrics {
        let mut metrics = GlobalMetrics::default();

        for record in records {
            metrics.total_market_cap += record.market_cap.unwrap_or(0.0);
            metrics.total_supply += record.circulating_supply.unwrap_or(0.0);
            metrics.entity_count = metrics.entity_count.saturating_add(1);
        }

        metrics
    }
}
