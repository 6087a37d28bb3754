//! CoinMarketCap listings payload adapter

use crate::types::Result;
use serde::Deserialize;
use serde_json::{json, Value};

use super::SourceAdapter;

/// One entry of the CMC listings shape
#[derive(Deserialize)]
struct CmcRow {
    id: Option<u64>,
    name: Option<String>,
    symbol: String,
    slug: Option<String>,
    cmc_rank: Option<f64>,
    circulating_supply: Option<f64>,
    total_supply: Option<f64>,
    #[serde(default)]
    tags: Option<Vec<String>>,
    #[serde(default)]
    platform: Option<CmcPlatform>,
    #[serde(default)]
    quote: Option<CmcQuote>,
}

#[derive(Deserialize)]
struct CmcPlatform {
    name: Option<String>,
    token_address: Option<String>,
}

#[derive(Deserialize)]
struct CmcQuote {
    #[serde(rename = "USD")]
    usd: Option<CmcUsdQuote>,
}

#[derive(Deserialize)]
struct CmcUsdQuote {
    price: Option<f64>,
    volume_24h: Option<f64>,
    percent_change_24h: Option<f64>,
    market_cap: Option<f64>,
    last_updated: Option<String>,
}

/// Adapter for the CoinMarketCap listings payload shape
pub struct CoinMarketCapSource;

impl SourceAdapter for CoinMarketCapSource {
    fn name(&self) -> &str {
        "coinmarketcap"
    }

    fn adapt(&self, payload: &Value) -> Result<Vec<Value>> {
        // Listings arrive either bare or wrapped in the API's data envelope
        let rows = payload
            .get("data")
            .and_then(Value::as_array)
            .or_else(|| payload.as_array());
        let rows = match rows {
            Some(rows) => rows.as_slice(),
            None => std::slice::from_ref(payload),
        };

        let mut dtos = Vec::with_capacity(rows.len());

        for row in rows {
            let row: CmcRow = match serde_json::from_value(row.clone()) {
                Ok(r) => r,
                Err(e) => {
                    eprintln!(
                        "[stablewatch] Warning: skipping malformed coinmarketcap record: {}",
                        e
                    );
                    continue;
                }
            };

            let usd = row.quote.and_then(|q| q.usd);
            let (price, volume_24h, percent_change_24h, market_cap, last_updated) = match usd {
                Some(q) => (
                    q.price,
                    q.volume_24h,
                    q.percent_change_24h,
                    q.market_cap,
                    q.last_updated,
                ),
                None => (None, None, None, None, None),
            };

            let breakdown: Vec<Value> = row
                .platform
                .into_iter()
                .filter_map(|p| {
                    let network = p.name?;
                    Some(json!({"network": network, "contractAddress": p.token_address}))
                })
                .collect();

            dtos.push(json!({
                "id": row.id,
                "symbol": row.symbol,
                "name": row.name,
                "slug": row.slug,
                "tags": row.tags,
                "marketData": {
                    "price": price,
                    "marketCap": market_cap,
                    "rank": row.cmc_rank,
                    "volume24h": volume_24h,
                    "percentChange24h": percent_change_24h,
                },
                "supplyData": {
                    "circulatingSupply": row.circulating_supply,
                    "totalSupply": row.total_supply,
                    "networkBreakdown": breakdown,
                },
                "metadata": {
                    "lastUpdated": last_updated,
                },
            }));
        }

        Ok(dtos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::format::StandardFormatter;
    use crate::services::normalizer::normalize;
    use serde_json::json;

    fn sample_row() -> Value {
        json!({
            "id": 3408,
            "name": "USDC",
            "symbol": "USDC",
            "slug": "usd-coin",
            "cmc_rank": 6,
            "circulating_supply": 2.45e10,
            "total_supply": 2.46e10,
            "tags": ["stablecoin", "asset-backed-stablecoin"],
            "platform": {
                "name": "Ethereum",
                "token_address": "0xa0b86991c6218b36c1d19d4a2e9eb0ce3606eb48"
            },
            "quote": {
                "USD": {
                    "price": 0.9999,
                    "volume_24h": 5.6e9,
                    "percent_change_24h": -0.004,
                    "market_cap": 2.45e10,
                    "last_updated": "2025-06-01T12:00:00.000Z"
                }
            }
        })
    }

    #[test]
    fn test_adapt_bare_array() {
        let dtos = CoinMarketCapSource.adapt(&json!([sample_row()])).unwrap();
        assert_eq!(dtos.len(), 1);
        assert_eq!(dtos[0]["symbol"], "USDC");
        assert_eq!(dtos[0]["marketData"]["price"], 0.9999);
    }

    #[test]
    fn test_adapt_data_envelope() {
        let payload = json!({"data": [sample_row()], "status": {"error_code": 0}});
        let dtos = CoinMarketCapSource.adapt(&payload).unwrap();
        assert_eq!(dtos.len(), 1);
    }

    #[test]
    fn test_adapt_flattens_usd_quote() {
        let dtos = CoinMarketCapSource.adapt(&json!([sample_row()])).unwrap();
        let dto = &dtos[0];

        assert_eq!(dto["marketData"]["marketCap"], 2.45e10);
        assert_eq!(dto["marketData"]["volume24h"], 5.6e9);
        assert_eq!(dto["marketData"]["percentChange24h"], -0.004);
        assert_eq!(dto["marketData"]["rank"], 6.0);
        assert_eq!(dto["metadata"]["lastUpdated"], "2025-06-01T12:00:00.000Z");
    }

    #[test]
    fn test_adapt_platform_to_breakdown() {
        let dtos = CoinMarketCapSource.adapt(&json!([sample_row()])).unwrap();
        let breakdown = dtos[0]["supplyData"]["networkBreakdown"].as_array().unwrap();

        assert_eq!(breakdown.len(), 1);
        assert_eq!(breakdown[0]["network"], "Ethereum");
    }

    #[test]
    fn test_adapt_missing_quote_and_platform() {
        let payload = json!([{"symbol": "DAI", "name": "Dai"}]);
        let dtos = CoinMarketCapSource.adapt(&payload).unwrap();

        assert_eq!(dtos.len(), 1);
        assert_eq!(dtos[0]["marketData"]["price"], Value::Null);
        assert!(dtos[0]["supplyData"]["networkBreakdown"]
            .as_array()
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_adapt_skips_malformed_rows() {
        let payload = json!([sample_row(), {"name": "no symbol"}, 17]);
        let dtos = CoinMarketCapSource.adapt(&payload).unwrap();
        assert_eq!(dtos.len(), 1);
    }

    #[test]
    fn test_adapted_dto_is_normalizable() {
        let dtos = CoinMarketCapSource.adapt(&json!([sample_row()])).unwrap();
        let record = normalize(&dtos[0], &StandardFormatter).unwrap();

        assert_eq!(record.symbol, "USDC");
        assert_eq!(record.slug, "usd-coin");
        assert_eq!(record.id, Some("3408".into()));
        assert_eq!(record.price, Some(0.9999));
        assert_eq!(record.rank, Some(6.0));
        assert_eq!(
            record.tags,
            vec!["stablecoin".to_string(), "asset-backed-stablecoin".to_string()]
        );
        assert_eq!(record.network_breakdown.len(), 1);
        assert_eq!(
            record.network_breakdown[0].contract_address,
            Some("0xa0b86991c6218b36c1d19d4a2e9eb0ce3606eb48".into())
        );
        assert!(record.last_updated.is_some());
    }
}
