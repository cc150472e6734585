use crate::github::PrFile;
use regex::Regex;
use std::sync::LazyLock;

static MODEL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(gpt-[\w.-]+|claude-[\w.-]+)\b").unwrap()
});

static MAX_TOKENS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)max[_-]?tokens\s*[:=]\s*([0-9]+)").unwrap()
});

static RETRY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(retries|maxRetries|retry\s*count|retry_limit)\s*[:=]\s*([0-9]+)").unwrap()
});

/// Signals found on removed ("before") and added ("after") diff lines, in discovery order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiffSignals {
    pub before_models: Vec<String>,
    pub after_models: Vec<String>,
    pub before_max_tokens: Vec<u64>,
    pub after_max_tokens: Vec<u64>,
    pub before_retries: Vec<u64>,
    pub after_retries: Vec<u64>,
}

impl DiffSignals {
    pub fn is_empty(&self) -> bool {
        self.before_models.is_empty()
            && self.after_models.is_empty()
            && self.before_max_tokens.is_empty()
            && self.after_max_tokens.is_empty()
            && self.before_retries.is_empty()
            && self.after_retries.is_empty()
    }

    pub fn has_model_change(&self) -> bool {
        !self.before_models.is_empty() || !self.after_models.is_empty()
    }

    pub fn has_max_tokens_change(&self) -> bool {
        !self.before_max_tokens.is_empty() || !self.after_max_tokens.is_empty()
    }

    pub fn has_retry_change(&self) -> bool {
        !self.before_retries.is_empty() || !self.after_retries.is_empty()
    }

    /// First model seen on a removed line
    pub fn first_before_model(&self) -> Option<&str> {
        self.before_models.first().map(String::as_str)
    }

    /// First model seen on an added line
    pub fn first_after_model(&self) -> Option<&str> {
        self.after_models.first().map(String::as_str)
    }
}

/// Scan one unified-diff patch, appending what it finds to `signals`.
pub fn scan_patch(patch: &str, signals: &mut DiffSignals) {
    for line in patch.lines() {
        if line.starts_with("+++") || line.starts_with("---") || line.starts_with("@@") {
            continue;
        }

        let (models, max_tokens, retries) = if line.starts_with('-') {
            (
                &mut signals.before_models,
                &mut signals.before_max_tokens,
                &mut signals.before_retries,
            )
        } else if line.starts_with('+') {
            (
                &mut signals.after_models,
                &mut signals.after_max_tokens,
                &mut signals.after_retries,
            )
        } else {
            continue;
        };

        models.extend(MODEL_RE.find_iter(line).map(|m| m.as_str().to_string()));

        // Values too large for u64 are dropped
        max_tokens.extend(
            MAX_TOKENS_RE
                .captures_iter(line)
                .filter_map(|c| c.get(1)?.as_str().parse::<u64>().ok()),
        );
        retries.extend(
            RETRY_RE
                .captures_iter(line)
                .filter_map(|c| c.get(2)?.as_str().parse::<u64>().ok()),
        );
    }
}

/// Scan every file of a pull request. Files without a patch (binary, too large) are skipped.
pub fn extract_signals(files: &[PrFile]) -> DiffSignals {
    let mut signals = DiffSignals::default();
    for file in files {
        match file.patch.as_deref() {
            Some(patch) if !patch.is_empty() => scan_patch(patch, &mut signals),
            _ => {}
        }
    }
    signals
}

/// Scan a whole local unified diff, as produced by `git diff`.
pub fn scan_diff(diff: &str) -> DiffSignals {
    let mut signals = DiffSignals::default();
    scan_patch(diff, &mut signals);
    signals
}
