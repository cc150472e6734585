//! Command implementations for the CLI
//!
//! - check: CI run against the current pull request
//! - render: offline report from a local diff
//! - pricing: show the pricing catalog

pub mod check;
pub mod pricing;
pub mod render;

use crate::cli::{non_empty_path, InputArgs};
use anyhow::Result;
use plarix::config::{load_config, LoadedConfig};
use plarix::pricing::{load_catalog, PricingCatalog};
use plarix::report::{render_report, ReportInput};
use plarix::signals::DiffSignals;
use plarix::usage::{load_side, MeasuredPair};
use std::path::PathBuf;

/// Everything a report needs besides the diff signals
pub struct ReportInputs {
    pub catalog: PricingCatalog,
    pub config: LoadedConfig,
    pub config_path: PathBuf,
    pub measured: MeasuredPair,
}

impl ReportInputs {
    /// Load catalog, assumptions and measured logs. Only a bad catalog is an error.
    pub fn load(args: &InputArgs) -> Result<Self> {
        let catalog = load_catalog(non_empty_path(&args.pricing))?;
        let config = load_config(&args.config);
        let measured = MeasuredPair::new(
            load_side(non_empty_path(&args.measure_base), &catalog),
            load_side(non_empty_path(&args.measure_head), &catalog),
        );

        Ok(Self {
            catalog,
            config,
            config_path: args.config.clone(),
            measured,
        })
    }

    pub fn render(&self, signals: &DiffSignals) -> String {
        let input = ReportInput {
            catalog: &self.catalog,
            assumptions: self.config.found_assumptions(),
            config_path: &self.config_path,
            signals,
            measured: &self.measured,
        };
        tracing::info!("Rendering report in {:?} mode", input.mode());
        render_report(&input)
    }
}
