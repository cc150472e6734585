//! Price resolution with an explicit fallback order.
//!
//! 1. exact `(provider, model)` match
//! 2. first entry of the same provider
//! 3. first entry of the catalog
//! 4. zero-priced placeholder (empty catalog only)
//!
//! Anything but rule 1 is approximate and must be annotated by the caller.

use crate::pricing::models::{PriceEntry, PricingCatalog};
use tracing::debug;

/// How a price was found
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    Exact,
    SameProvider,
    CatalogDefault,
    Unpriced,
}

impl MatchKind {
    pub fn describe(&self) -> &'static str {
        match self {
            MatchKind::Exact => "exact match",
            MatchKind::SameProvider => "priced with another model from the same provider",
            MatchKind::CatalogDefault => "unknown provider, priced with the catalog's first entry",
            MatchKind::Unpriced => "no pricing data, counted as $0",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PriceResolution {
    pub entry: PriceEntry,
    pub kind: MatchKind,
}

impl PriceResolution {
    pub fn is_exact(&self) -> bool {
        self.kind == MatchKind::Exact
    }
}

impl PricingCatalog {
    /// Resolve a price for `(provider, model)`. Total: never fails.
    pub fn resolve(&self, provider: &str, model: &str) -> PriceResolution {
        if let Some(entry) = self.exact(provider, model) {
            return PriceResolution {
                entry: entry.clone(),
                kind: MatchKind::Exact,
            };
        }

        let (entry, kind) = if let Some(entry) = self.first_for_provider(provider) {
            (entry.clone(), MatchKind::SameProvider)
        } else if let Some(entry) = self.first() {
            (entry.clone(), MatchKind::CatalogDefault)
        } else {
            (PriceEntry::unpriced(provider, model), MatchKind::Unpriced)
        };

        debug!(
            provider = provider,
            model = model,
            fallback = %entry.label(),
            "No exact price, using fallback"
        );
        PriceResolution { entry, kind }
    }
}

/// Free-function form returning `(entry, exact_match)`.
pub fn resolve(catalog: &PricingCatalog, provider: &str, model: &str) -> (PriceEntry, bool) {
    let resolution = catalog.resolve(provider, model);
    let exact = resolution.is_exact();
    (resolution.entry, exact)
}
