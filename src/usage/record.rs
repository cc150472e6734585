use serde::{Deserialize, Serialize};

/// One observed API call, read from a JSONL line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RecordLine")]
pub struct MeasuredUsageRecord {
    pub provider: String,
    pub model: String,
    pub input_tokens: u64,
    pub output_tokens: u64,
    /// Informational only, not priced
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cached_input_tokens: Option<u64>,
    /// Read from `timestamp`, or from `ts` when `timestamp` is absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

/// Wire shape of a line. `timestamp` and `ts` may both appear.
#[derive(Deserialize)]
struct RecordLine {
    provider: String,
    model: String,
    input_tokens: u64,
    output_tokens: u64,
    #[serde(default)]
    cached_input_tokens: Option<u64>,
    #[serde(default)]
    timestamp: Option<String>,
    #[serde(default)]
    ts: Option<String>,
}

impl From<RecordLine> for MeasuredUsageRecord {
    fn from(line: RecordLine) -> Self {
        Self {
            provider: line.provider,
            model: line.model,
            input_tokens: line.input_tokens,
            output_tokens: line.output_tokens,
            cached_input_tokens: line.cached_input_tokens,
            timestamp: line.timestamp.or(line.ts),
        }
    }
}

impl MeasuredUsageRecord {
    /// Parse one line. Returns `None` for anything that is not a well-formed record:
    /// invalid JSON, missing or negative token counts, blank provider or model.
    pub fn parse_line(line: &str) -> Option<Self> {
        let record: Self = serde_json::from_str(line).ok()?;
        if record.provider.trim().is_empty() || record.model.trim().is_empty() {
            return None;
        }
        Some(record)
    }
}
