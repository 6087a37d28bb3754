//! CoinGecko markets payload adapter

use crate::types::Result;
use serde::Deserialize;
use serde_json::{json, Value};
use std::collections::BTreeMap;

use super::SourceAdapter;

/// One row of the CoinGecko coins/markets shape
#[derive(Deserialize)]
struct CoinGeckoRow {
    id: Option<String>,
    symbol: String,
    name: Option<String>,
    image: Option<String>,
    current_price: Option<f64>,
    market_cap: Option<f64>,
    market_cap_rank: Option<f64>,
    total_volume: Option<f64>,
    price_change_percentage_24h: Option<f64>,
    circulating_supply: Option<f64>,
    total_supply: Option<f64>,
    /// Network name → contract address; addresses may be null
    #[serde(default)]
    platforms: Option<BTreeMap<String, Option<String>>>,
    last_updated: Option<String>,
}

/// Adapter for the CoinGecko markets payload shape
pub struct CoinGeckoSource;

impl SourceAdapter for CoinGeckoSource {
    fn name(&self) -> &str {
        "coingecko"
    }

    fn adapt(&self, payload: &Value) -> Result<Vec<Value>> {
        let rows = match payload.as_array() {
            Some(rows) => rows.as_slice(),
            // A single-row payload is accepted the same way
            None => std::slice::from_ref(payload),
        };

        let mut dtos = Vec::with_capacity(rows.len());

        for row in rows {
            let row: CoinGeckoRow = match serde_json::from_value(row.clone()) {
                Ok(r) => r,
                Err(e) => {
                    eprintln!("[stablewatch] Warning: skipping malformed coingecko record: {}", e);
                    continue;
                }
            };

            let breakdown: Vec<Value> = row
                .platforms
                .unwrap_or_default()
                .into_iter()
                .filter(|(network, _)| !network.trim().is_empty())
                .map(|(network, address)| {
                    json!({"network": network, "contractAddress": address})
                })
                .collect();

            dtos.push(json!({
                "id": row.id,
                "symbol": row.symbol.to_uppercase(),
                "name": row.name,
                "slug": row.id,
                "imageUrl": row.image,
                "marketData": {
                    "price": row.current_price,
                    "marketCap": row.market_cap,
                    "rank": row.market_cap_rank,
                    "volume24h": row.total_volume,
                    "percentChange24h": row.price_change_percentage_24h,
                },
                "supplyData": {
                    "circulatingSupply": row.circulating_supply,
                    "totalSupply": row.total_supply,
                    "networkBreakdown": breakdown,
                },
                "metadata": {
                    "logoUrl": row.image,
                    "lastUpdated": row.last_updated,
                },
            }));
        }

        Ok(dtos)
    }
}
