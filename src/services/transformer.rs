//! View model transformer
//!
//! Owns the transformation lifecycle (reset → transform → expose) and the
//! only mutable state in the pipeline: the canonical record set built from
//! the current batch. One logical writer per instance; callers needing
//! parallel pipelines create independent instances.

use crate::services::aggregator::Aggregator;
use crate::services::format::{create_formatter, ValueFormatter};
use crate::services::normalizer::normalize;
use crate::types::{
    CanonicalEntityRecord, PlatformAggregate, Result, StablewatchError, ViewModelBundle,
};
use serde_json::Value;
use std::str::FromStr;

/// Transformation lifecycle operations exposed to presentation code.
///
/// This is the entire public surface of the pipeline; no other method or
/// internal structure is part of the contract.
pub trait DataTransformer {
    /// Replace state wholesale from a raw batch. A non-sequence batch
    /// behaves as `reset` — no partial state is ever kept.
    fn transform_data(&mut self, raw_batch: &Value);

    /// Current canonical records; empty slice when no batch is held.
    fn transformed_data(&self) -> &[CanonicalEntityRecord];

    /// Per-platform aggregates over the current records
    fn calculate_aggregations(&self) -> Vec<PlatformAggregate>;

    /// Compose the complete bundle fresh from current state
    fn complete_view_model(&self) -> ViewModelBundle;

    /// Clear all stored records; idempotent
    fn reset(&mut self);

    /// True iff `raw` is a proper (possibly empty) sequence. Element shape
    /// is not inspected here; the normalizer tolerates malformed elements.
    fn validate_input_data(&self, raw: &Value) -> bool;
}

/// Transformer variants constructible through [`create_transformer`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransformerKind {
    Stablecoin,
}

impl FromStr for TransformerKind {
    type Err = StablewatchError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "stablecoin" => Ok(TransformerKind::Stablecoin),
            other => Err(StablewatchError::Config(format!(
                "unknown transformer kind '{}'",
                other
            ))),
        }
    }
}

/// Build a transformer from its kind string.
///
/// Unknown kinds fail here, at construction time — never at first use.
pub fn create_transformer(kind: &str, formatter: &str) -> Result<Box<dyn DataTransformer>> {
    let fmt = create_formatter(formatter)?;
    match kind.parse::<TransformerKind>()? {
        TransformerKind::Stablecoin => Ok(Box::new(StablecoinTransformer::new(fmt))),
    }
}

/// Stablecoin view model transformer
pub struct StablecoinTransformer {
    records: Vec<CanonicalEntityRecord>,
    formatter: Box<dyn ValueFormatter>,
}

impl StablecoinTransformer {
    pub fn new(formatter: Box<dyn ValueFormatter>) -> Self {
        Self {
            records: Vec::new(),
            formatter,
        }
    }
}

impl DataTransformer for StablecoinTransformer {
    fn transform_data(&mut self, raw_batch: &Value) {
        if !self.validate_input_data(raw_batch) {
            self.reset();
            return;
        }

        let batch = raw_batch.as_array().map(Vec::as_slice).unwrap_or_default();
        self.records = batch
            .iter()
            .filter_map(|dto| normalize(dto, self.formatter.as_ref()))
            .collect();
    }

    fn transformed_data(&self) -> &[CanonicalEntityRecord] {
        &self.records
    }

    fn calculate_aggregations(&self) -> Vec<PlatformAggregate> {
        Aggregator::platforms(&self.records)
    }

    fn complete_view_model(&self) -> ViewModelBundle {
        ViewModelBundle {
            items: self.records.clone(),
            metrics: Aggregator::global(&self.records),
            platform_data: Aggregator::platforms(&self.records),
        }
    }

    fn reset(&mut self) {
        self.records.clear();
    }

    fn validate_input_data(&self, raw: &Value) -> bool {
        raw.is_array()
    }
}
