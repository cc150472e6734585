//! Measured token usage: JSONL records from real API calls, reduced per side.

pub mod aggregator;
pub mod reader;
pub mod record;

pub use aggregator::{aggregate, MeasuredSummary, ModelCallCount, UsageAggregator};
pub use reader::{load_side, read_usage_file};
pub use record::MeasuredUsageRecord;

/// Environment variable naming the base-branch usage log
pub const MEASURE_BASE_ENV: &str = "PLARIX_MEASURE_BASE";
/// Environment variable naming the head-branch usage log
pub const MEASURE_HEAD_ENV: &str = "PLARIX_MEASURE_HEAD";

/// Which side of the pull request a usage log describes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Base,
    Head,
}

impl Side {
    pub fn label(&self) -> &'static str {
        match self {
            Side::Base => "Base",
            Side::Head => "Head",
        }
    }

    pub fn env_var(&self) -> &'static str {
        match self {
            Side::Base => MEASURE_BASE_ENV,
            Side::Head => MEASURE_HEAD_ENV,
        }
    }
}

/// Zero, one or two measured summaries. A side with no calls is `None`.
#[derive(Debug, Clone, Default)]
pub struct MeasuredPair {
    pub base: Option<MeasuredSummary>,
    pub head: Option<MeasuredSummary>,
}

impl MeasuredPair {
    pub fn new(base: Option<MeasuredSummary>, head: Option<MeasuredSummary>) -> Self {
        Self { base, head }
    }

    pub fn is_empty(&self) -> bool {
        self.base.is_none() && self.head.is_none()
    }

    pub fn get(&self, side: Side) -> Option<&MeasuredSummary> {
        match side {
            Side::Base => self.base.as_ref(),
            Side::Head => self.head.as_ref(),
        }
    }
}
