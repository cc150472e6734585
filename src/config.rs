use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use tracing::{info, warn};

/// Default location of the assumptions file, relative to the repository root
pub const DEFAULT_CONFIG_PATH: &str = ".plarix.yml";

const ENV_PREFIX: &str = "PLARIX";
const ENV_SEPARATOR: &str = "__";

/// A stated usage profile used for configured estimates
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Assumptions {
    #[serde(default = "default_requests_per_day")]
    pub requests_per_day: u64,

    #[serde(default = "default_avg_input_tokens")]
    pub avg_input_tokens: u64,

    #[serde(default = "default_avg_output_tokens")]
    pub avg_output_tokens: u64,

    #[serde(default = "default_provider")]
    pub provider: String,

    #[serde(default = "default_model")]
    pub model: String,
}

impl Default for Assumptions {
    fn default() -> Self {
        Self {
            requests_per_day: default_requests_per_day(),
            avg_input_tokens: default_avg_input_tokens(),
            avg_output_tokens: default_avg_output_tokens(),
            provider: default_provider(),
            model: default_model(),
        }
    }
}

fn default_requests_per_day() -> u64 {
    10_000
}

fn default_avg_input_tokens() -> u64 {
    800
}

fn default_avg_output_tokens() -> u64 {
    400
}

fn default_provider() -> String {
    "openai".to_string()
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

/// Result of looking for a configuration source
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedConfig {
    pub assumptions: Assumptions,
    /// Whether any configuration source existed. Drives report mode selection.
    pub found: bool,
}

impl LoadedConfig {
    /// Assumptions only when a configuration source was found
    pub fn found_assumptions(&self) -> Option<&Assumptions> {
        self.found.then_some(&self.assumptions)
    }
}

/// Load assumptions from `path` plus `PLARIX_ASSUMPTIONS__*` environment overrides.
///
/// Never fails: a missing source yields defaults with `found = false`, an
/// unparseable one yields defaults with `found = true` and a warning. A single
/// bad value falls back to its own default and leaves the other fields alone.
pub fn load_config(path: &Path) -> LoadedConfig {
    load_with_env(path, None)
}

fn load_with_env(path: &Path, env: Option<HashMap<String, String>>) -> LoadedConfig {
    let file_exists = path.is_file();
    let env_overrides = match &env {
        Some(vars) => vars.keys().any(|k| is_assumption_override(k)),
        None => std::env::vars().any(|(k, _)| is_assumption_override(&k)),
    };

    if !file_exists && !env_overrides {
        info!(
            "No configuration found at {}, using built-in defaults",
            path.display()
        );
        return LoadedConfig {
            assumptions: Assumptions::default(),
            found: false,
        };
    }

    let assumptions = match build_assumptions(path, env) {
        Ok(assumptions) => assumptions,
        Err(e) => {
            warn!(
                "Failed to read configuration from {}: {}. Using defaults",
                path.display(),
                e
            );
            Assumptions::default()
        }
    };

    info!(
        requests_per_day = assumptions.requests_per_day,
        provider = %assumptions.provider,
        model = %assumptions.model,
        "Loaded assumptions"
    );
    LoadedConfig {
        assumptions,
        found: true,
    }
}

fn build_assumptions(
    path: &Path,
    env: Option<HashMap<String, String>>,
) -> anyhow::Result<Assumptions> {
    let settings = config::Config::builder()
        .add_source(
            config::File::from(path)
                .format(config::FileFormat::Yaml)
                .required(false),
        )
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator(ENV_SEPARATOR)
                .try_parsing(true)
                .source(env),
        )
        .build()?;

    let positive = |value: &u64| *value > 0;
    let non_empty = |value: &String| !value.trim().is_empty();

    Ok(Assumptions {
        requests_per_day: field(&settings, "requests_per_day", default_requests_per_day(), positive),
        avg_input_tokens: field(&settings, "avg_input_tokens", default_avg_input_tokens(), |_| true),
        avg_output_tokens: field(&settings, "avg_output_tokens", default_avg_output_tokens(), |_| true),
        provider: field(&settings, "provider", default_provider(), non_empty)
            .trim()
            .to_lowercase(),
        model: field(&settings, "model", default_model(), non_empty)
            .trim()
            .to_string(),
    })
}

/// Read `assumptions.<key>`, keeping `default` when it is absent, unparseable or rejected by `valid`.
fn field<T>(settings: &config::Config, key: &str, default: T, valid: impl Fn(&T) -> bool) -> T
where
    T: serde::de::DeserializeOwned + std::fmt::Debug,
{
    let path = format!("assumptions.{}", key);
    match settings.get::<T>(&path) {
        Ok(value) if valid(&value) => value,
        Ok(value) => {
            warn!("Invalid {} {:?}, using default {:?}", path, value, default);
            default
        }
        Err(config::ConfigError::NotFound(_)) => default,
        Err(e) => {
            warn!("Failed to read {}: {}. Using default {:?}", path, e, default);
            default
        }
    }
}

fn is_assumption_override(key: &str) -> bool {
    key.to_uppercase()
        .starts_with(&format!("{}_ASSUMPTIONS{}", ENV_PREFIX, ENV_SEPARATOR))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".yml").tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    fn no_env() -> Option<HashMap<String, String>> {
        Some(HashMap::new())
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let loaded = load_with_env(Path::new("/nonexistent/.plarix.yml"), no_env());

        assert!(!loaded.found);
        assert!(loaded.found_assumptions().is_none());
        assert_eq!(loaded.assumptions, Assumptions::default());
        assert_eq!(loaded.assumptions.requests_per_day, 10_000);
        assert_eq!(loaded.assumptions.avg_input_tokens, 800);
        assert_eq!(loaded.assumptions.avg_output_tokens, 400);
        assert_eq!(loaded.assumptions.provider, "openai");
        assert_eq!(loaded.assumptions.model, "gpt-4o-mini");
    }

    #[test]
    fn test_full_config() {
        let file = write_config(
            "# cost assumptions\nassumptions:\n  requests_per_day: 5000\n  avg_input_tokens: 1200\n  avg_output_tokens: 300\n  provider: \"Anthropic\"\n  model: 'claude-sonnet-4'\n",
        );
        let loaded = load_with_env(file.path(), no_env());

        assert!(loaded.found);
        assert_eq!(
            loaded.assumptions,
            Assumptions {
                requests_per_day: 5000,
                avg_input_tokens: 1200,
                avg_output_tokens: 300,
                provider: "anthropic".to_string(),
                model: "claude-sonnet-4".to_string(),
            }
        );
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let file = write_config("assumptions:\n  model: gpt-4o\n");
        let loaded = load_with_env(file.path(), no_env());

        assert!(loaded.found);
        assert_eq!(loaded.assumptions.model, "gpt-4o");
        assert_eq!(loaded.assumptions.requests_per_day, 10_000);
        assert_eq!(loaded.assumptions.provider, "openai");
    }

    #[test]
    fn test_empty_file_counts_as_found() {
        let file = write_config("");
        let loaded = load_with_env(file.path(), no_env());

        assert!(loaded.found);
        assert_eq!(loaded.assumptions, Assumptions::default());
    }

    #[test]
    fn test_invalid_value_keeps_other_fields() {
        let file = write_config(
            "assumptions:\n  requests_per_day: 5k\n  avg_input_tokens: 2000\n  model: gpt-4o\n",
        );
        let loaded = load_with_env(file.path(), no_env());

        assert!(loaded.found);
        assert_eq!(
            loaded.assumptions,
            Assumptions {
                requests_per_day: 10_000,
                avg_input_tokens: 2000,
                avg_output_tokens: 400,
                provider: "openai".to_string(),
                model: "gpt-4o".to_string(),
            }
        );
    }

    #[test]
    fn test_zero_requests_rejected() {
        let file = write_config("assumptions:\n  requests_per_day: 0\n  model: gpt-4o\n");
        let loaded = load_with_env(file.path(), no_env());
        assert_eq!(loaded.assumptions.requests_per_day, 10_000);
        assert_eq!(loaded.assumptions.model, "gpt-4o");
    }

    #[test]
    fn test_blank_model_keeps_default() {
        let file = write_config("assumptions:\n  model: \"  \"\n  avg_output_tokens: 50\n");
        let loaded = load_with_env(file.path(), no_env());
        assert_eq!(loaded.assumptions.model, "gpt-4o-mini");
        assert_eq!(loaded.assumptions.avg_output_tokens, 50);
    }

    #[test]
    fn test_unparseable_yaml_uses_defaults() {
        let file = write_config("assumptions: [unclosed\n");
        let loaded = load_with_env(file.path(), no_env());

        assert!(loaded.found);
        assert_eq!(loaded.assumptions, Assumptions::default());
    }

    #[test]
    fn test_env_override() {
        let file = write_config("assumptions:\n  model: gpt-4o\n");
        let mut env = HashMap::new();
        env.insert(
            "PLARIX_ASSUMPTIONS__REQUESTS_PER_DAY".to_string(),
            "250".to_string(),
        );
        let loaded = load_with_env(file.path(), Some(env));

        assert_eq!(loaded.assumptions.requests_per_day, 250);
        assert_eq!(loaded.assumptions.model, "gpt-4o");
    }

    #[test]
    fn test_env_only_counts_as_found() {
        let mut env = HashMap::new();
        env.insert(
            "PLARIX_ASSUMPTIONS__MODEL".to_string(),
            "o3-mini".to_string(),
        );
        let loaded = load_with_env(Path::new("/nonexistent/.plarix.yml"), Some(env));

        assert!(loaded.found);
        assert_eq!(loaded.assumptions.model, "o3-mini");
    }

    #[test]
    fn test_measure_env_is_not_an_assumption_override() {
        assert!(!is_assumption_override("PLARIX_MEASURE_BASE"));
        assert!(is_assumption_override("PLARIX_ASSUMPTIONS__MODEL"));
    }
}
