/// Integration tests for report mode selection and rendering
use plarix::{
    config::{Assumptions, DEFAULT_CONFIG_PATH},
    pricing::{embedded_catalog, estimate, resolve, PriceEntry, PricingCatalog},
    report::{render_report, CostDelta, ReportInput, ReportMode, COMMENT_MARKER},
    signals::{scan_diff, DiffSignals},
    usage::{aggregate, MeasuredPair, MeasuredSummary},
};
use std::path::Path;

fn openai_catalog() -> PricingCatalog {
    PricingCatalog::new(
        "2025-01-06",
        vec!["https://platform.openai.com/docs/pricing".to_string()],
        vec![
            PriceEntry::new("openai", "gpt-4o", 2.5, 10.0),
            PriceEntry::new("openai", "gpt-4o-mini", 0.15, 0.60),
        ],
    )
}

fn render(
    catalog: &PricingCatalog,
    assumptions: Option<&Assumptions>,
    signals: &DiffSignals,
    measured: &MeasuredPair,
) -> String {
    render_report(&ReportInput {
        catalog,
        assumptions,
        config_path: Path::new(DEFAULT_CONFIG_PATH),
        signals,
        measured,
    })
}

#[test]
fn test_embedded_catalog_estimates() {
    let catalog = embedded_catalog().unwrap();
    let assumptions = Assumptions::default();

    let (mini, exact) = resolve(&catalog, "openai", "gpt-4o-mini");
    assert!(exact);
    let cost = estimate(&assumptions, &mini);
    assert!((cost.per_request_cost - 0.00036).abs() < 1e-12);
    assert!((cost.monthly_cost - 108.0).abs() < 1e-9);

    let (full, exact) = resolve(&catalog, "openai", "gpt-4o");
    assert!(exact);
    let cost = estimate(&assumptions, &full);
    assert!((cost.per_request_cost - 0.006).abs() < 1e-12);
    assert!((cost.monthly_cost - 1800.0).abs() < 1e-9);
}

#[test]
fn test_unknown_openai_model_uses_first_openai_entry() {
    let (entry, exact) = resolve(&openai_catalog(), "openai", "not-a-real-model");
    assert!(!exact);
    assert_eq!(entry.model, "gpt-4o");
}

#[test]
fn test_empty_inputs_still_produce_a_report() {
    let catalog = openai_catalog();
    let report = render(
        &catalog,
        None,
        &DiffSignals::default(),
        &MeasuredPair::default(),
    );

    assert!(report.starts_with(COMMENT_MARKER));
    assert!(report.contains("Diff heuristics only"));
    assert!(report.contains("No LLM-cost-relevant changes detected in this diff."));
}

#[test]
fn test_heuristic_model_swap() {
    let catalog = openai_catalog();
    let signals = DiffSignals {
        before_models: vec!["gpt-4o".to_string()],
        after_models: vec!["gpt-4o-mini".to_string()],
        ..Default::default()
    };
    let report = render(&catalog, None, &signals, &MeasuredPair::default());

    assert!(report.contains("gpt-4o → gpt-4o-mini"));
    assert!(!report.contains("Est. monthly"));
    assert!(!report.contains('$'));
}

#[test]
fn test_configured_mode_from_diff() {
    let catalog = openai_catalog();
    let assumptions = Assumptions::default();
    let signals = scan_diff(
        "--- a/app.py\n+++ b/app.py\n@@ -1,2 +1,2 @@\n-model = \"gpt-4o\"\n+model = \"gpt-4o-mini\"\n-max_tokens=1024\n+max_tokens=256\n",
    );
    let report = render(
        &catalog,
        Some(&assumptions),
        &signals,
        &MeasuredPair::default(),
    );

    assert!(report.contains("Mode: **Configured estimate**"));
    assert!(report.contains("Assumptions: 10000 req/day | 800 input tokens | 400 output tokens"));
    assert!(report.contains("| Before | gpt-4o | $0.0060 | $1800.00 |"));
    assert!(report.contains("| After | gpt-4o-mini | $0.0004 | $108.00 |"));
    assert!(report.contains("Monthly delta: -$1692.00 (-94.0%)"));
    assert!(report.contains("- max_tokens: 1024 → 256"));
    assert!(!report.contains("no exact price"));
}

#[test]
fn test_measured_mode_wins_over_config() {
    let catalog = openai_catalog();
    let assumptions = Assumptions::default();
    let head = aggregate(
        [r#"{"provider":"openai","model":"gpt-4o","input_tokens":1000,"output_tokens":100}"#],
        &catalog,
    );
    let measured = MeasuredPair::new(None, head);

    assert_eq!(ReportMode::select(&measured, true), ReportMode::Measured);

    let report = render(&catalog, Some(&assumptions), &DiffSignals::default(), &measured);
    assert!(report.contains("Mode: **Measured usage**"));
    assert!(!report.contains("Configured estimate"));
    assert!(report.contains("PLARIX_MEASURE_BASE"));
}

#[test]
fn test_measured_zero_baseline_reports_zero_percent() {
    let catalog = openai_catalog();
    let base = MeasuredSummary {
        call_count: 4,
        total_cost: 0.0,
        ..Default::default()
    };
    let head = MeasuredSummary {
        call_count: 4,
        total_cost: 0.5,
        ..Default::default()
    };

    let delta = CostDelta::between(base.total_cost, head.total_cost);
    assert_eq!(delta.percent, 0.0);

    let measured = MeasuredPair::new(Some(base), Some(head));
    let report = render(&catalog, None, &DiffSignals::default(), &measured);

    assert!(report.contains("Cost delta: +$0.5000 (0.0%)"));
    assert!(!report.contains("NaN"));
}

#[test]
fn test_measured_both_zero_costs() {
    let catalog = PricingCatalog::new("", vec![], vec![]);
    let line = r#"{"provider":"openai","model":"gpt-4o","input_tokens":10,"output_tokens":10}"#;
    let base = aggregate([line], &catalog);
    let head = aggregate([line], &catalog);
    let measured = MeasuredPair::new(base, head);

    let report = render(&catalog, None, &DiffSignals::default(), &measured);

    assert!(report.contains("Pricing: unknown"));
    assert!(report.contains("Cost delta: $0.0000 (0.0%)"));
    assert!(report.contains("no exact price for gpt-4o"));
}
