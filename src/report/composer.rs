use crate::config::Assumptions;
use crate::pricing::{estimate, CostEstimate, PriceResolution, PricingCatalog};
use crate::report::format::{
    abbreviate_tokens, dedupe_preserving_order, list_or_placeholder, safe_value, signed_percent,
    signed_usd, trend_bar, trend_scale, usd,
};
use crate::report::mode::ReportMode;
use crate::report::COMMENT_MARKER;
use crate::signals::DiffSignals;
use crate::usage::{MeasuredPair, MeasuredSummary, Side, MEASURE_BASE_ENV, MEASURE_HEAD_ENV};
use std::fmt::{self, Write};
use std::path::Path;

const NO_CHANGES: &str = "No LLM-cost-relevant changes detected in this diff.";

/// Everything the report can be built from. Absent inputs narrow the mode.
#[derive(Debug, Clone, Copy)]
pub struct ReportInput<'a> {
    pub catalog: &'a PricingCatalog,
    /// `Some` only when a configuration source was found
    pub assumptions: Option<&'a Assumptions>,
    /// Where assumptions were looked for, named in the guidance text
    pub config_path: &'a Path,
    pub signals: &'a DiffSignals,
    pub measured: &'a MeasuredPair,
}

impl ReportInput<'_> {
    pub fn mode(&self) -> ReportMode {
        ReportMode::select(self.measured, self.assumptions.is_some())
    }
}

/// Change between two costs. `percent` is 0 when the baseline is 0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CostDelta {
    pub delta: f64,
    pub percent: f64,
}

impl CostDelta {
    pub fn between(before: f64, after: f64) -> Self {
        let delta = after - before;
        let percent = if before == 0.0 {
            0.0
        } else {
            delta / before * 100.0
        };
        Self { delta, percent }
    }
}

/// Estimate for one side of the pull request in configured mode
#[derive(Debug, Clone, PartialEq)]
pub struct SideEstimate {
    pub model: String,
    pub resolution: PriceResolution,
    pub cost: CostEstimate,
}

/// Before/after estimates: the first detected model of each side, else the configured model.
pub fn configured_estimates(
    catalog: &PricingCatalog,
    assumptions: &Assumptions,
    signals: &DiffSignals,
) -> (SideEstimate, SideEstimate) {
    let side = |detected: Option<&str>| {
        let (provider, model) = match detected {
            Some(model) => (provider_for_model(model, &assumptions.provider), model),
            None => (assumptions.provider.as_str(), assumptions.model.as_str()),
        };
        let resolution = catalog.resolve(provider, model);
        let cost = estimate(assumptions, &resolution.entry);
        SideEstimate {
            model: model.to_string(),
            resolution,
            cost,
        }
    };

    (
        side(signals.first_before_model()),
        side(signals.first_after_model()),
    )
}

/// Provider implied by a detected model name, else the configured one
fn provider_for_model<'a>(model: &str, configured: &'a str) -> &'a str {
    let lower = model.to_ascii_lowercase();
    if lower.starts_with("gpt-") {
        "openai"
    } else if lower.starts_with("claude-") {
        "anthropic"
    } else {
        configured
    }
}

/// Render the Markdown report. Always starts with the comment marker line and never fails.
pub fn render_report(input: &ReportInput<'_>) -> String {
    let mut out = String::new();
    // fmt::Write into a String cannot fail
    let _ = compose(&mut out, input);
    out
}

fn compose(out: &mut String, input: &ReportInput<'_>) -> fmt::Result {
    let mode = input.mode();

    writeln!(out, "{}", COMMENT_MARKER)?;
    writeln!(out)?;
    writeln!(out, "### LLM cost check")?;
    writeln!(out)?;
    writeln!(out, "Mode: **{}**", mode.title())?;
    writeln!(out)?;
    let sources = if input.catalog.sources().is_empty() {
        "none listed".to_string()
    } else {
        input.catalog.sources().join(", ")
    };
    writeln!(
        out,
        "Pricing: {} (sources: {})",
        safe_value(input.catalog.last_updated(), "unknown"),
        sources
    )?;
    writeln!(out)?;

    match (mode, input.assumptions) {
        (ReportMode::Measured, _) => write_measured(out, input.measured)?,
        (ReportMode::ConfiguredEstimate, Some(assumptions)) => {
            write_configured(out, input.catalog, assumptions, input.signals)?
        }
        _ => write_heuristic(out, input.config_path)?,
    }

    write_signals(out, input.signals)
}

fn write_measured(out: &mut String, measured: &MeasuredPair) -> fmt::Result {
    writeln!(out, "#### Measured usage")?;
    writeln!(out)?;
    writeln!(out, "| | Calls | Input tokens | Output tokens | Cost |")?;
    writeln!(out, "|---|---|---|---|---|")?;

    let sides: Vec<(Side, &MeasuredSummary)> = [Side::Base, Side::Head]
        .into_iter()
        .filter_map(|side| measured.get(side).map(|summary| (side, summary)))
        .collect();

    for (side, summary) in &sides {
        writeln!(
            out,
            "| {} | {} | {} | {} | {} |",
            side.label(),
            summary.call_count,
            abbreviate_tokens(summary.total_input_tokens),
            abbreviate_tokens(summary.total_output_tokens),
            usd(summary.total_cost, 4)
        )?;
    }
    writeln!(out)?;

    match (&measured.base, &measured.head) {
        (Some(base), Some(head)) => {
            let delta = CostDelta::between(base.total_cost, head.total_cost);
            writeln!(
                out,
                "Cost delta: {} ({})",
                signed_usd(delta.delta, 4),
                signed_percent(delta.percent)
            )?;
            writeln!(out)?;

            let scale = trend_scale(base.total_cost, head.total_cost);
            writeln!(out, "```text")?;
            writeln!(
                out,
                "Base |{}| {}",
                trend_bar(base.total_cost, scale),
                usd(base.total_cost, 4)
            )?;
            writeln!(
                out,
                "Head |{}| {}",
                trend_bar(head.total_cost, scale),
                usd(head.total_cost, 4)
            )?;
            writeln!(out, "```")?;
            writeln!(out)?;
        }
        (Some(_), None) => {
            writeln!(
                out,
                "_Only base usage was measured. Set `{}` to compare against the head branch._",
                Side::Head.env_var()
            )?;
            writeln!(out)?;
        }
        (None, Some(_)) => {
            writeln!(
                out,
                "_Only head usage was measured. Set `{}` to compare against the base branch._",
                Side::Base.env_var()
            )?;
            writeln!(out)?;
        }
        (None, None) => {}
    }

    let models: Vec<&str> = sides.iter().flat_map(|(_, s)| s.models()).collect();
    writeln!(out, "Models seen: {}", list_or_placeholder(&models))?;

    if sides.iter().any(|(_, s)| s.total_cached_input_tokens > 0) {
        let cached: Vec<String> = sides
            .iter()
            .map(|(side, s)| {
                format!(
                    "{} {}",
                    side.label(),
                    abbreviate_tokens(s.total_cached_input_tokens)
                )
            })
            .collect();
        writeln!(out)?;
        writeln!(out, "Cached input tokens (not priced): {}", cached.join(" | "))?;
    }

    for (side, summary) in &sides {
        if let (Some(first), Some(last)) = (summary.first_timestamp, summary.last_timestamp) {
            writeln!(out)?;
            writeln!(
                out,
                "{} window: {} to {}",
                side.label(),
                first.format("%Y-%m-%d %H:%M %:z"),
                last.format("%Y-%m-%d %H:%M %:z")
            )?;
        }
    }

    let approximate: Vec<&str> = sides
        .iter()
        .flat_map(|(_, s)| s.approximate_models.iter().map(String::as_str))
        .collect();
    if !approximate.is_empty() {
        writeln!(out)?;
        writeln!(
            out,
            "_Note: no exact price for {}; costs are approximate._",
            dedupe_preserving_order(&approximate).join(", ")
        )?;
    }

    for (side, summary) in &sides {
        if summary.skipped_lines > 0 {
            writeln!(out)?;
            writeln!(
                out,
                "_Skipped {} malformed line(s) in the {} usage log._",
                summary.skipped_lines,
                side.label().to_lowercase()
            )?;
        }
    }

    writeln!(out)
}

fn write_configured(
    out: &mut String,
    catalog: &PricingCatalog,
    assumptions: &Assumptions,
    signals: &DiffSignals,
) -> fmt::Result {
    let (before, after) = configured_estimates(catalog, assumptions, signals);

    writeln!(out, "#### Configured estimate")?;
    writeln!(out)?;
    writeln!(
        out,
        "Assumptions: {} req/day | {} input tokens | {} output tokens | {}/{}",
        assumptions.requests_per_day,
        assumptions.avg_input_tokens,
        assumptions.avg_output_tokens,
        assumptions.provider,
        assumptions.model
    )?;
    writeln!(out)?;
    writeln!(
        out,
        "Per request = (input tokens × input price + output tokens × output price) / 1,000,000. \
         Monthly = per request × requests per day × 30."
    )?;
    writeln!(out)?;
    writeln!(out, "| | Model | Est. per request | Est. monthly |")?;
    writeln!(out, "|---|---|---|---|")?;
    for (label, side) in [("Before", &before), ("After", &after)] {
        writeln!(
            out,
            "| {} | {} | {} | {} |",
            label,
            side.model,
            usd(side.cost.per_request_cost, 4),
            usd(side.cost.monthly_cost, 2)
        )?;
    }
    writeln!(out)?;

    let delta = CostDelta::between(before.cost.monthly_cost, after.cost.monthly_cost);
    writeln!(
        out,
        "Monthly delta: {} ({})",
        signed_usd(delta.delta, 2),
        signed_percent(delta.percent)
    )?;
    writeln!(out)?;

    let scale = trend_scale(before.cost.monthly_cost, after.cost.monthly_cost);
    writeln!(out, "```text")?;
    writeln!(
        out,
        "Before |{}| {}",
        trend_bar(before.cost.monthly_cost, scale),
        usd(before.cost.monthly_cost, 2)
    )?;
    writeln!(
        out,
        "After  |{}| {}",
        trend_bar(after.cost.monthly_cost, scale),
        usd(after.cost.monthly_cost, 2)
    )?;
    writeln!(out, "```")?;
    writeln!(out)?;

    let mut noted: Vec<&str> = Vec::new();
    for side in [&before, &after] {
        if side.resolution.is_exact() || noted.contains(&side.model.as_str()) {
            continue;
        }
        noted.push(&side.model);
        writeln!(
            out,
            "_Note: no exact price for `{}`: {} ({}). Values are approximate._",
            side.model,
            side.resolution.kind.describe(),
            side.resolution.entry.label()
        )?;
        writeln!(out)?;
    }

    Ok(())
}

fn write_heuristic(out: &mut String, config_path: &Path) -> fmt::Result {
    writeln!(out, "#### Diff heuristics only")?;
    writeln!(out)?;
    writeln!(
        out,
        "No cost figures: no measured usage and no `{}` were found.",
        config_path.display()
    )?;
    writeln!(out)?;
    writeln!(out, "To get numbers:")?;
    writeln!(
        out,
        "- add `{}` with an `assumptions:` section (requests_per_day, avg_input_tokens, avg_output_tokens, provider, model) for configured estimates",
        config_path.display()
    )?;
    writeln!(
        out,
        "- set `{}` and `{}` to JSONL usage logs for measured costs",
        MEASURE_BASE_ENV, MEASURE_HEAD_ENV
    )?;
    writeln!(out)
}

fn write_signals(out: &mut String, signals: &DiffSignals) -> fmt::Result {
    writeln!(out, "#### Diff signals")?;
    writeln!(out)?;

    if signals.is_empty() {
        return writeln!(out, "{}", NO_CHANGES);
    }

    if signals.has_model_change() {
        writeln!(
            out,
            "- Models: {} → {}",
            list_or_placeholder(&signals.before_models),
            list_or_placeholder(&signals.after_models)
        )?;
    }
    if signals.has_max_tokens_change() {
        writeln!(
            out,
            "- max_tokens: {} → {}",
            list_or_placeholder(&signals.before_max_tokens),
            list_or_placeholder(&signals.after_max_tokens)
        )?;
    }
    if signals.has_retry_change() {
        writeln!(
            out,
            "- retries: {} → {}",
            list_or_placeholder(&signals.before_retries),
            list_or_placeholder(&signals.after_retries)
        )?;
    }
    Ok(())
}
