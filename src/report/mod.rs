//! Markdown report: mode selection, rendering helpers and the composer.

pub mod composer;
pub mod format;
pub mod mode;

pub use composer::{configured_estimates, render_report, CostDelta, ReportInput, SideEstimate};
pub use mode::ReportMode;

/// First line of every report, used to find the PR comment again on later runs
pub const COMMENT_MARKER: &str = "<!-- plarix-action -->";
