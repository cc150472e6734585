use crate::config::Assumptions;
use crate::pricing::models::{CostEstimate, PriceEntry, PricingCatalog};
use crate::usage::MeasuredUsageRecord;

/// Prices are quoted per 1M tokens
pub const TOKENS_PER_MILLION: f64 = 1_000_000.0;

/// Fixed month length used for monthly projections
pub const DAYS_PER_MONTH: f64 = 30.0;

/// Cost of a single call with the given token counts. No rounding.
pub fn tokens_cost(input_tokens: u64, output_tokens: u64, price: &PriceEntry) -> f64 {
    (input_tokens as f64 * price.input_price_per_million
        + output_tokens as f64 * price.output_price_per_million)
        / TOKENS_PER_MILLION
}

/// Per-request and monthly cost for a usage profile.
///
/// `monthly_cost` is exactly `per_request_cost * requests_per_day * 30`;
/// rounding happens only when rendering.
pub fn estimate(assumptions: &Assumptions, price: &PriceEntry) -> CostEstimate {
    let per_request_cost = tokens_cost(
        assumptions.avg_input_tokens,
        assumptions.avg_output_tokens,
        price,
    );
    let monthly_cost = per_request_cost * assumptions.requests_per_day as f64 * DAYS_PER_MONTH;

    CostEstimate {
        per_request_cost,
        monthly_cost,
    }
}

/// Cost of one measured call, priced with the record's own provider/model.
///
/// Cached input tokens are not priced separately.
pub fn cost_of(record: &MeasuredUsageRecord, catalog: &PricingCatalog) -> f64 {
    let resolution = catalog.resolve(&record.provider, &record.model);
    tokens_cost(record.input_tokens, record.output_tokens, &resolution.entry)
}
