use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Flat per-million-token price of one model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceEntry {
    pub provider: String,
    pub model: String,
    pub input_price_per_million: f64,
    pub output_price_per_million: f64,
}

impl PriceEntry {
    pub fn new(
        provider: impl Into<String>,
        model: impl Into<String>,
        input_price_per_million: f64,
        output_price_per_million: f64,
    ) -> Self {
        Self {
            provider: provider.into(),
            model: model.into(),
            input_price_per_million,
            output_price_per_million,
        }
    }

    /// Zero-priced placeholder carrying the requested identifiers
    pub fn unpriced(provider: &str, model: &str) -> Self {
        Self::new(provider, model, 0.0, 0.0)
    }

    /// `provider/model` label used in report notes
    pub fn label(&self) -> String {
        format!("{}/{}", self.provider, self.model)
    }
}

/// Estimated cost of one request and of a 30-day month at the configured volume
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CostEstimate {
    pub per_request_cost: f64,
    pub monthly_cost: f64,
}

/// Immutable price table, constructed once at startup and passed by reference.
#[derive(Debug, Clone)]
pub struct PricingCatalog {
    last_updated: String,
    sources: Vec<String>,
    entries: Vec<PriceEntry>,
    /// (lowercase provider, lowercase model) -> position of the first matching entry
    index: HashMap<(String, String), usize>,
}

impl PricingCatalog {
    pub fn new(last_updated: impl Into<String>, sources: Vec<String>, entries: Vec<PriceEntry>) -> Self {
        let mut index = HashMap::with_capacity(entries.len());
        for (position, entry) in entries.iter().enumerate() {
            // Duplicates keep the first occurrence
            index
                .entry(index_key(&entry.provider, &entry.model))
                .or_insert(position);
        }

        Self {
            last_updated: last_updated.into(),
            sources,
            entries,
            index,
        }
    }

    pub fn last_updated(&self) -> &str {
        &self.last_updated
    }

    pub fn sources(&self) -> &[String] {
        &self.sources
    }

    pub fn entries(&self) -> &[PriceEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// O(1) exact lookup, case-insensitive on both identifiers
    pub fn exact(&self, provider: &str, model: &str) -> Option<&PriceEntry> {
        self.index
            .get(&index_key(provider, model))
            .map(|&position| &self.entries[position])
    }

    /// First entry published by `provider`, ignoring the model.
    /// Case-folded the same way as the exact index.
    pub fn first_for_provider(&self, provider: &str) -> Option<&PriceEntry> {
        let provider = normalize(provider);
        self.entries
            .iter()
            .find(|entry| normalize(&entry.provider) == provider)
    }

    pub fn first(&self) -> Option<&PriceEntry> {
        self.entries.first()
    }
}

fn normalize(identifier: &str) -> String {
    identifier.to_lowercase()
}

fn index_key(provider: &str, model: &str) -> (String, String) {
    (normalize(provider), normalize(model))
}
