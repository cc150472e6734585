use std::collections::HashSet;
use std::fmt::Display;
use std::hash::Hash;

/// Width of the proportional trend bar
pub const BAR_WIDTH: usize = 22;
/// Rendered for a side with no detections
pub const PLACEHOLDER: &str = "-";

const BAR_FILLED: char = '█';
const BAR_EMPTY: char = '░';

/// Scale for a pair of values. Zero collapses to 1 so bars stay empty instead of dividing by zero.
pub fn trend_scale(a: f64, b: f64) -> f64 {
    let max = a.max(b);
    if max > 0.0 {
        max
    } else {
        1.0
    }
}

/// Fixed-width bar: `round(value / scale * width)` units, at least one when `value > 0`.
pub fn trend_bar(value: f64, scale: f64) -> String {
    let scale = if scale > 0.0 { scale } else { 1.0 };
    let value = value.max(0.0);

    let mut filled = (value / scale * BAR_WIDTH as f64).round() as usize;
    if value > 0.0 && filled == 0 {
        filled = 1;
    }
    let filled = filled.min(BAR_WIDTH);

    let mut bar = String::with_capacity(BAR_WIDTH * BAR_FILLED.len_utf8());
    bar.extend(std::iter::repeat(BAR_FILLED).take(filled));
    bar.extend(std::iter::repeat(BAR_EMPTY).take(BAR_WIDTH - filled));
    bar
}

/// `950`, `1.5K`, `2.3M`
pub fn abbreviate_tokens(tokens: u64) -> String {
    if tokens >= 1_000_000 {
        format!("{:.1}M", tokens as f64 / 1_000_000.0)
    } else if tokens >= 1_000 {
        format!("{:.1}K", tokens as f64 / 1_000.0)
    } else {
        tokens.to_string()
    }
}

/// Drop repeats, keeping the first occurrence of each value
pub fn dedupe_preserving_order<T>(values: &[T]) -> Vec<T>
where
    T: Eq + Hash + Clone,
{
    let mut seen = HashSet::new();
    values
        .iter()
        .filter(|v| seen.insert(*v))
        .cloned()
        .collect()
}

/// Deduplicated, comma-joined values or the placeholder. Never empty.
pub fn list_or_placeholder<T>(values: &[T]) -> String
where
    T: Eq + Hash + Clone + Display,
{
    if values.is_empty() {
        return PLACEHOLDER.to_string();
    }
    dedupe_preserving_order(values)
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn safe_value<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.trim().is_empty() {
        fallback
    } else {
        value
    }
}

pub fn usd(amount: f64, decimals: usize) -> String {
    format!("${:.*}", decimals, amount)
}

/// `+$1.50`, `-$0.25`, `$0.00`
pub fn signed_usd(amount: f64, decimals: usize) -> String {
    let rendered = format!("{:.*}", decimals, amount.abs());
    let is_zero = rendered.chars().all(|c| c == '0' || c == '.');
    if is_zero {
        format!("${}", rendered)
    } else if amount < 0.0 {
        format!("-${}", rendered)
    } else {
        format!("+${}", rendered)
    }
}

/// `+12.5%`, `-3.0%`, `0.0%`
pub fn signed_percent(percent: f64) -> String {
    let rendered = format!("{:.1}", percent.abs());
    if rendered == "0.0" {
        "0.0%".to_string()
    } else if percent < 0.0 {
        format!("-{}%", rendered)
    } else {
        format!("+{}%", rendered)
    }
}
