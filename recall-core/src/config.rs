//! Configuration for loading fixtures and activating wrappers.

use crate::activity::ActivityLog;
use crate::error::{RecallError, Result};
use crate::fixture::{LoadOptions, LoadReport};
use crate::intercept::Activation;
use crate::store::MockRegistry;
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Where fixtures come from and how strictly calls are resolved.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RecallConfig {
    /// Fixture files loaded by [`bootstrap`](Self::bootstrap), in order.
    pub fixtures: Vec<PathBuf>,
    /// Ignore options applied while loading.
    pub load: LoadOptions,
    /// Fail calls without a recorded outcome.
    pub require_automock: bool,
    /// Record passthrough calls to an activity log.
    pub record: bool,
}

impl RecallConfig {
    /// Create a new builder.
    pub fn builder() -> RecallConfigBuilder {
        RecallConfigBuilder::default()
    }

    /// Create configuration from environment variables.
    ///
    /// Environment variables:
    /// - `RECALL_FIXTURES`: fixture paths, separated like `PATH`
    /// - `RECALL_REQUIRE_AUTOMOCK`: "true" or "1" for strict mode
    /// - `RECALL_IGNORE_MOCK_DATA_ERRORS`
    /// - `RECALL_IGNORE_INVALID_MOCK_DATA_TYPE`
    /// - `RECALL_IGNORE_INVALID_MOCK_DATA`
    /// - `RECALL_RECORD`: "true" or "1" to record passthrough calls
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var_os(key))
    }

    /// Create configuration from any variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<OsString>,
    {
        let flag = |key: &str| -> Result<bool> {
            match lookup(key) {
                None => Ok(false),
                Some(raw) => parse_flag(key, &raw.to_string_lossy()),
            }
        };

        let fixtures = lookup("RECALL_FIXTURES")
            .map(|raw| {
                std::env::split_paths(&raw)
                    .filter(|p| !p.as_os_str().is_empty())
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            fixtures,
            load: LoadOptions {
                ignore_mock_data_errors: flag("RECALL_IGNORE_MOCK_DATA_ERRORS")?,
                ignore_invalid_mock_data_type: flag("RECALL_IGNORE_INVALID_MOCK_DATA_TYPE")?,
                ignore_invalid_mock_data: flag("RECALL_IGNORE_INVALID_MOCK_DATA")?,
            },
            require_automock: flag("RECALL_REQUIRE_AUTOMOCK")?,
            record: flag("RECALL_RECORD")?,
        })
    }

    /// Parse configuration from YAML.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(|e| RecallError::Config {
            field: "yaml".to_string(),
            cause: e.to_string(),
        })
    }

    /// Read configuration from a YAML file.
    ///
    /// Relative fixture paths are resolved against the file's directory.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| RecallError::io(path, e))?;
        let mut config = serde_yaml::from_str::<Self>(&text).map_err(|e| RecallError::Config {
            field: path.display().to_string(),
            cause: e.to_string(),
        })?;
        if let Some(base) = path.parent() {
            for fixture in &mut config.fixtures {
                if fixture.is_relative() {
                    *fixture = base.join(&*fixture);
                }
            }
        }
        Ok(config)
    }

    /// Create a registry and load every configured fixture file into it.
    pub fn bootstrap(&self) -> Result<(Arc<MockRegistry>, LoadReport)> {
        let registry = MockRegistry::shared();
        let loader = registry.loader(self.load.clone());
        let mut report = LoadReport::default();
        for path in &self.fixtures {
            report.merge(loader.load_from_file(path)?);
        }
        tracing::info!(
            files = self.fixtures.len(),
            calls = report.calls(),
            outcomes = report.outcomes(),
            skipped = report.skipped,
            "Bootstrapped mock registry"
        );
        Ok((registry, report))
    }

    /// Start an activation with this configuration's strictness.
    ///
    /// When recording is enabled the returned log is attached to every
    /// wrapper.
    pub fn activation(
        &self,
        registry: Arc<MockRegistry>,
    ) -> (Activation, Option<Arc<ActivityLog>>) {
        let activation = Activation::new(registry).require_mocks(self.require_automock);
        if self.record {
            let log = Arc::new(ActivityLog::new());
            (activation.with_recorder(Arc::clone(&log)), Some(log))
        } else {
            (activation, None)
        }
    }
}

fn parse_flag(key: &str, raw: &str) -> Result<bool> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "" | "0" | "false" | "no" | "off" => Ok(false),
        other => Err(RecallError::Config {
            field: key.to_string(),
            cause: format!("expected a boolean, got '{}'", other),
        }),
    }
}

/// Builder for [`RecallConfig`].
#[derive(Debug, Clone, Default)]
pub struct RecallConfigBuilder {
    config: RecallConfig,
}

impl RecallConfigBuilder {
    /// Add a fixture file.
    pub fn fixture(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.fixtures.push(path.into());
        self
    }

    /// Set the load options.
    pub fn load_options(mut self, options: LoadOptions) -> Self {
        self.config.load = options;
        self
    }

    /// Set strict mode.
    pub fn require_automock(mut self, require: bool) -> Self {
        self.config.require_automock = require;
        self
    }

    /// Set passthrough recording.
    pub fn record(mut self, record: bool) -> Self {
        self.config.record = record;
        self
    }

    /// Build the configuration.
    pub fn build(self) -> RecallConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<OsString> {
        let vars: HashMap<String, OsString> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), OsString::from(v)))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn empty_environment_is_default() {
        assert_eq!(RecallConfig::from_lookup(lookup(&[])).unwrap(), RecallConfig::default());
    }

    #[test]
    fn environment_flags_and_paths() {
        let fixtures = std::env::join_paths(["a.jsonl", "b.jsonl"]).unwrap();
        let fixtures = fixtures.to_string_lossy().into_owned();
        let config = RecallConfig::from_lookup(lookup(&[
            ("RECALL_FIXTURES", fixtures.as_str()),
            ("RECALL_REQUIRE_AUTOMOCK", "1"),
            ("RECALL_IGNORE_INVALID_MOCK_DATA", "TRUE"),
            ("RECALL_RECORD", "false"),
        ]))
        .unwrap();
        assert_eq!(
            config.fixtures,
            vec![PathBuf::from("a.jsonl"), PathBuf::from("b.jsonl")]
        );
        assert!(config.require_automock);
        assert!(config.load.ignore_invalid_mock_data);
        assert!(!config.load.ignore_mock_data_errors);
        assert!(!config.record);
    }

    #[test]
    fn bad_flag_is_config_error() {
        let err = RecallConfig::from_lookup(lookup(&[("RECALL_RECORD", "maybe")])).unwrap_err();
        assert_eq!(err.code(), "E801");
        assert!(err.to_string().contains("RECALL_RECORD"));
    }

    #[test]
    fn yaml_uses_camel_case() {
        let config = RecallConfig::from_yaml_str(
            "fixtures: [mock.jsonl]\nrequireAutomock: true\nload:\n  ignoreMockDataErrors: true\n",
        )
        .unwrap();
        assert_eq!(config.fixtures, vec![PathBuf::from("mock.jsonl")]);
        assert!(config.require_automock);
        assert!(config.load.ignore_mock_data_errors);
        assert!(RecallConfig::from_yaml_str("fixtures: 3").is_err());
    }

    #[test]
    fn yaml_file_resolves_relative_fixtures() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("recall.yaml");
        std::fs::write(&path, "fixtures: [mock.jsonl]\n").unwrap();
        let config = RecallConfig::from_yaml_file(&path).unwrap();
        assert_eq!(config.fixtures, vec![dir.path().join("mock.jsonl")]);
    }

    #[test]
    fn bootstrap_loads_every_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mock.jsonl");
        std::fs::write(
            &path,
            "{\"type\":\"moduleCall\",\"data\":{\"moduleName\":\"A\",\"moduleCallId\":\"m\"}}\n",
        )
        .unwrap();
        let config = RecallConfig::builder().fixture(&path).record(true).build();
        let (registry, report) = config.bootstrap().unwrap();
        assert_eq!(report.calls(), 1);
        assert_eq!(registry.stats().total_calls(), 1);

        let (_activation, log) = config.activation(registry);
        assert!(log.is_some());
    }

    #[test]
    fn bootstrap_reports_missing_file() {
        let config = RecallConfig::builder().fixture("/nonexistent/mock.jsonl").build();
        assert_eq!(config.bootstrap().unwrap_err().code(), "E901");
    }
}
