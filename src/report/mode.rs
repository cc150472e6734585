use crate::usage::MeasuredPair;

/// Report modes, highest priority first. Chosen by which inputs are present, never by their values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportMode {
    /// At least one measured usage summary exists
    Measured,
    /// No measured data, but assumptions were configured
    ConfiguredEstimate,
    /// Neither: only diff signals are reported
    HeuristicOnly,
}

impl ReportMode {
    pub fn select(measured: &MeasuredPair, config_found: bool) -> Self {
        if !measured.is_empty() {
            ReportMode::Measured
        } else if config_found {
            ReportMode::ConfiguredEstimate
        } else {
            ReportMode::HeuristicOnly
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            ReportMode::Measured => "Measured usage",
            ReportMode::ConfiguredEstimate => "Configured estimate",
            ReportMode::HeuristicOnly => "Diff heuristics only",
        }
    }
}
