use crate::pricing::{tokens_cost, PricingCatalog};
use crate::usage::record::MeasuredUsageRecord;
use chrono::{DateTime, FixedOffset};
use tracing::debug;

/// Calls observed for one model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelCallCount {
    pub model: String,
    pub calls: u64,
}

/// Reduction of one usage log
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeasuredSummary {
    pub total_input_tokens: u64,
    pub total_output_tokens: u64,
    pub total_cached_input_tokens: u64,
    /// Sum of per-record costs
    pub total_cost: f64,
    pub call_count: u64,
    /// Per-model call counts in first-seen order
    pub model_calls: Vec<ModelCallCount>,
    /// Models whose price came from a fallback, first-seen order
    pub approximate_models: Vec<String>,
    pub first_timestamp: Option<DateTime<FixedOffset>>,
    pub last_timestamp: Option<DateTime<FixedOffset>>,
    /// Non-blank lines that were not well-formed records
    pub skipped_lines: u64,
}

impl MeasuredSummary {
    pub fn calls_for(&self, model: &str) -> u64 {
        self.model_calls
            .iter()
            .find(|entry| entry.model == model)
            .map(|entry| entry.calls)
            .unwrap_or(0)
    }

    pub fn models(&self) -> impl Iterator<Item = &str> {
        self.model_calls.iter().map(|entry| entry.model.as_str())
    }
}

/// Incremental reducer: feed lines one at a time, nothing is buffered.
pub struct UsageAggregator<'a> {
    catalog: &'a PricingCatalog,
    summary: MeasuredSummary,
    line_number: u64,
}

impl<'a> UsageAggregator<'a> {
    pub fn new(catalog: &'a PricingCatalog) -> Self {
        Self {
            catalog,
            summary: MeasuredSummary::default(),
            line_number: 0,
        }
    }

    pub fn push_line(&mut self, line: &str) {
        self.line_number += 1;
        let line = line.trim();
        if line.is_empty() {
            return;
        }

        match MeasuredUsageRecord::parse_line(line) {
            Some(record) => self.push_record(&record),
            None => {
                self.summary.skipped_lines += 1;
                debug!(line = self.line_number, "Skipping malformed usage record");
            }
        }
    }

    /// Feed one undecoded line. Invalid UTF-8 counts as a malformed line.
    pub fn push_bytes(&mut self, bytes: &[u8]) {
        match std::str::from_utf8(bytes) {
            Ok(line) => self.push_line(line),
            Err(_) => {
                self.line_number += 1;
                self.summary.skipped_lines += 1;
                debug!(line = self.line_number, "Skipping usage line that is not UTF-8");
            }
        }
    }

    pub fn push_record(&mut self, record: &MeasuredUsageRecord) {
        let resolution = self.catalog.resolve(&record.provider, &record.model);
        let summary = &mut self.summary;

        summary.call_count += 1;
        summary.total_input_tokens = summary.total_input_tokens.saturating_add(record.input_tokens);
        summary.total_output_tokens = summary
            .total_output_tokens
            .saturating_add(record.output_tokens);
        summary.total_cached_input_tokens = summary
            .total_cached_input_tokens
            .saturating_add(record.cached_input_tokens.unwrap_or(0));
        summary.total_cost += tokens_cost(record.input_tokens, record.output_tokens, &resolution.entry);

        match summary
            .model_calls
            .iter_mut()
            .find(|entry| entry.model == record.model)
        {
            Some(entry) => entry.calls += 1,
            None => summary.model_calls.push(ModelCallCount {
                model: record.model.clone(),
                calls: 1,
            }),
        }

        if !resolution.is_exact() && !summary.approximate_models.contains(&record.model) {
            summary.approximate_models.push(record.model.clone());
        }

        if let Some(ts) = record
            .timestamp
            .as_deref()
            .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
        {
            if summary.first_timestamp.map_or(true, |first| ts < first) {
                summary.first_timestamp = Some(ts);
            }
            if summary.last_timestamp.map_or(true, |last| ts > last) {
                summary.last_timestamp = Some(ts);
            }
        }
    }

    /// `None` when no well-formed record was seen
    pub fn finish(self) -> Option<MeasuredSummary> {
        if self.summary.call_count == 0 {
            None
        } else {
            Some(self.summary)
        }
    }
}

/// Reduce a stream of JSONL lines. Blank and malformed lines are skipped.
pub fn aggregate<I, S>(lines: I, catalog: &PricingCatalog) -> Option<MeasuredSummary>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut aggregator = UsageAggregator::new(catalog);
    for line in lines {
        aggregator.push_line(line.as_ref());
    }
    aggregator.finish()
}
