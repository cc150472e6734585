use crate::error::AppError;
use crate::pricing::models::{PriceEntry, PricingCatalog};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

/// Catalog compiled into the binary; no network access is needed at runtime.
const EMBEDDED_PRICING: &str = include_str!("../../data/pricing.json");

/// On-disk pricing document
#[derive(Debug, Serialize, Deserialize)]
pub struct PricingFile {
    #[serde(default)]
    pub last_updated: String,
    #[serde(default)]
    pub sources: Vec<String>,
    pub models: Vec<ModelPriceData>,
}

/// Individual model pricing data, per 1M tokens
#[derive(Debug, Serialize, Deserialize)]
pub struct ModelPriceData {
    pub provider: String,
    pub name: String,
    pub input_per_million: f64,
    pub output_per_million: f64,
}

impl From<&PricingCatalog> for PricingFile {
    fn from(catalog: &PricingCatalog) -> Self {
        Self {
            last_updated: catalog.last_updated().to_string(),
            sources: catalog.sources().to_vec(),
            models: catalog
                .entries()
                .iter()
                .map(|entry| ModelPriceData {
                    provider: entry.provider.clone(),
                    name: entry.model.clone(),
                    input_per_million: entry.input_price_per_million,
                    output_per_million: entry.output_price_per_million,
                })
                .collect(),
        }
    }
}

/// Parse pricing JSON into a catalog.
///
/// Any structural problem, negative or non-finite price is a hard error.
pub fn parse_catalog(json: &str) -> Result<PricingCatalog, AppError> {
    let data: PricingFile = serde_json::from_str(json)
        .map_err(|e| AppError::MalformedCatalog(format!("Failed to parse pricing JSON: {}", e)))?;

    let mut entries = Vec::with_capacity(data.models.len());
    for (position, price) in data.models.into_iter().enumerate() {
        if price.provider.trim().is_empty() || price.name.trim().is_empty() {
            return Err(AppError::MalformedCatalog(format!(
                "models[{}] has an empty provider or name",
                position
            )));
        }
        for (field, value) in [
            ("input_per_million", price.input_per_million),
            ("output_per_million", price.output_per_million),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(AppError::MalformedCatalog(format!(
                    "models[{}] ({}/{}) has invalid {}: {}",
                    position, price.provider, price.name, field, value
                )));
            }
        }

        entries.push(PriceEntry::new(
            price.provider,
            price.name,
            price.input_per_million,
            price.output_per_million,
        ));
    }

    debug!("Parsed {} model prices", entries.len());
    Ok(PricingCatalog::new(data.last_updated, data.sources, entries))
}

/// The catalog shipped with the binary
pub fn embedded_catalog() -> Result<PricingCatalog, AppError> {
    parse_catalog(EMBEDDED_PRICING)
}

/// Load the catalog from `path`, or the embedded copy when no path is given.
pub fn load_catalog(path: Option<&Path>) -> Result<PricingCatalog, AppError> {
    let catalog = match path {
        Some(path) => {
            let content = std::fs::read_to_string(path).map_err(|e| {
                AppError::MalformedCatalog(format!("Failed to read {}: {}", path.display(), e))
            })?;
            parse_catalog(&content)?
        }
        None => embedded_catalog()?,
    };

    info!(
        "Loaded {} model prices (last updated: {})",
        catalog.len(),
        if catalog.last_updated().is_empty() {
            "unknown"
        } else {
            catalog.last_updated()
        }
    );
    Ok(catalog)
}
