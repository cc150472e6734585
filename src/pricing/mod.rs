pub mod calculator;
pub mod loader;
pub mod models;
pub mod resolver;

pub use calculator::{cost_of, estimate, tokens_cost, TOKENS_PER_MILLION};
pub use loader::{embedded_catalog, load_catalog, parse_catalog, PricingFile};
pub use models::{CostEstimate, PriceEntry, PricingCatalog};
pub use resolver::{resolve, MatchKind, PriceResolution};
