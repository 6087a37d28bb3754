//! Source record normalizer
//!
//! Maps one untyped aggregated provider DTO into the canonical record
//! shape. Mapping is tolerant throughout: a missing or malformed field
//! becomes `None`, and only a DTO that is not an object or has no usable
//! symbol is dropped outright. Nothing here returns an error.

use crate::services::format::ValueFormatter;
use crate::types::{CanonicalEntityRecord, NetworkSupply, DEFAULT_TAG};
use chrono::{DateTime, Utc};
use serde_json::Value;

/// Normalize one aggregated DTO into a canonical record.
///
/// Returns `None` (record dropped, not an error) when the DTO is not a
/// JSON object or lacks a usable symbol. Partial records are never
/// produced: every optional field independently degrades to `None`.
pub fn normalize(raw: &Value, fmt: &dyn ValueFormatter) -> Option<CanonicalEntityRecord> {
    let dto = raw.as_object()?;

    let symbol = text_of(dto.get("symbol"))?;
    let name = text_of(dto.get("name")).unwrap_or_else(|| symbol.clone());

    let market = dto.get("marketData");
    let supply = dto.get("supplyData");
    let metadata = dto.get("metadata");

    let price = num_of(field(market, "price"));
    let circulating_supply = num_of(field(supply, "circulatingSupply"));

    // Explicit market cap wins; otherwise derive it when both inputs exist
    let market_cap = num_of(field(market, "marketCap")).or_else(|| {
        match (circulating_supply, price) {
            (Some(circulating), Some(price)) => Some(circulating * price),
            _ => None,
        }
    });

    let slug = text_of(dto.get("slug")).unwrap_or_else(|| fmt.slugify(&symbol));

    let logo_url = text_of(field(metadata, "logoUrl"))
        .or_else(|| text_of(field(metadata, "logo")))
        .or_else(|| text_of(field(metadata, "image")));
    let image_url = text_of(dto.get("imageUrl"))
        .or_else(|| text_of(dto.get("image")))
        .or_else(|| logo_url.clone());

    Some(CanonicalEntityRecord {
        id: id_of(dto.get("id")),
        name,
        slug,
        image_url,
        price,
        market_cap,
        volume_24h: num_of(field(market, "volume24h")),
        percent_change_24h: num_of(field(market, "percentChange24h")),
        rank: num_of(field(market, "rank")),
        circulating_supply,
        total_supply: num_of(field(supply, "totalSupply")),
        network_breakdown: breakdown_of(field(supply, "networkBreakdown")),
        tags: tags_of(dto.get("tags")),
        description: text_of(field(metadata, "description")),
        logo_url,
        last_updated: timestamp_of(
            field(metadata, "lastUpdated").or_else(|| dto.get("lastUpdated")),
        ),
        symbol,
    })
}

fn field<'a>(parent: Option<&'a Value>, key: &str) -> Option<&'a Value> {
    parent.and_then(|v| v.get(key))
}

/// Numeric fields tolerate JSON numbers and numeric strings
fn num_of(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Number(n) => n.as_f64().filter(|v| v.is_finite()),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        _ => None,
    }
}

fn text_of(value: Option<&Value>) -> Option<String> {
    value?
        .as_str()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
}

/// Opaque ids arrive as strings or numbers depending on the provider
fn id_of(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn breakdown_of(value: Option<&Value>) -> Vec<NetworkSupply> {
    let Some(entries) = value.and_then(Value::as_array) else {
        return Vec::new();
    };

    entries
        .iter()
        .filter_map(|entry| {
            entry.as_object()?;
            Some(NetworkSupply {
                network: text_of(entry.get("network"))
                    .or_else(|| text_of(entry.get("platform"))),
                supply: num_of(entry.get("supply")),
                share_percent: num_of(entry.get("sharePercent"))
                    .or_else(|| num_of(entry.get("percentage"))),
                contract_address: text_of(entry.get("contractAddress"))
                    .or_else(|| text_of(entry.get("contract_address"))),
            })
        })
        .collect()
}

fn tags_of(value: Option<&Value>) -> Vec<String> {
    match value.and_then(Value::as_array) {
        Some(entries) => entries
            .iter()
            .filter_map(|v| v.as_str())
            .map(String::from)
            .collect(),
        None => vec![DEFAULT_TAG.to_string()],
    }
}

fn timestamp_of(value: Option<&Value>) -> Option<DateTime<Utc>> {
    let raw = value?.as_str()?;
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
}
