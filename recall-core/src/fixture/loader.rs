//! Routing fixture entries into a [`MockRegistry`].

use super::{FixtureEntry, RecordKind, fixture_kind};
use crate::error::{RecallError, Result};
use crate::fingerprint::fingerprint_with_record;
use crate::store::{CallRecord, MockRegistry};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::path::Path;

/// Which fixture problems are skipped instead of aborting the load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoadOptions {
    /// Skip malformed lines and entries without an object `data` or a string `type`.
    pub ignore_mock_data_errors: bool,
    /// Skip entries whose `type` is unknown.
    pub ignore_invalid_mock_data_type: bool,
    /// Skip entries whose data cannot be fingerprinted or lacks its call id.
    pub ignore_invalid_mock_data: bool,
}

impl LoadOptions {
    /// Fail on every problem.
    pub fn strict() -> Self {
        Self::default()
    }

    /// Skip every problem.
    pub fn permissive() -> Self {
        Self {
            ignore_mock_data_errors: true,
            ignore_invalid_mock_data_type: true,
            ignore_invalid_mock_data: true,
        }
    }

    /// Set whether malformed entries are skipped.
    pub fn with_ignore_mock_data_errors(mut self, ignore: bool) -> Self {
        self.ignore_mock_data_errors = ignore;
        self
    }

    /// Set whether unknown types are skipped.
    pub fn with_ignore_invalid_mock_data_type(mut self, ignore: bool) -> Self {
        self.ignore_invalid_mock_data_type = ignore;
        self
    }

    /// Set whether unusable data is skipped.
    pub fn with_ignore_invalid_mock_data(mut self, ignore: bool) -> Self {
        self.ignore_invalid_mock_data = ignore;
        self
    }
}

/// What a load call stored and skipped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    /// Entries stored, by fixture type.
    pub loaded: BTreeMap<String, usize>,
    /// Entries skipped because an ignore option allowed it.
    pub skipped: usize,
}

impl LoadReport {
    /// Entries stored of one fixture type.
    pub fn count(&self, kind: &str) -> usize {
        self.loaded.get(kind).copied().unwrap_or(0)
    }

    /// Total entries stored.
    pub fn total(&self) -> usize {
        self.loaded.values().sum()
    }

    /// Call entries stored.
    pub fn calls(&self) -> usize {
        self.count_record(RecordKind::Call)
    }

    /// Outcome entries stored.
    pub fn outcomes(&self) -> usize {
        self.count_record(RecordKind::Outcome)
    }

    /// Add another report's counts to this one.
    pub fn merge(&mut self, other: LoadReport) {
        for (kind, count) in other.loaded {
            *self.loaded.entry(kind).or_default() += count;
        }
        self.skipped += other.skipped;
    }

    fn count_record(&self, record: RecordKind) -> usize {
        self.loaded
            .iter()
            .filter(|(kind, _)| fixture_kind(kind).is_some_and(|k| k.record == record))
            .map(|(_, count)| count)
            .sum()
    }

    fn stored(&mut self, kind: &str) {
        *self.loaded.entry(kind.to_string()).or_default() += 1;
    }
}

/// Loads fixture entries into a registry.
///
/// The first problem not covered by an ignore option aborts the load call;
/// entries before it stay loaded.
#[derive(Debug)]
pub struct FixtureLoader<'a> {
    registry: &'a MockRegistry,
    options: LoadOptions,
}

impl<'a> FixtureLoader<'a> {
    /// Create a loader.
    pub fn new(registry: &'a MockRegistry, options: LoadOptions) -> Self {
        Self { registry, options }
    }

    /// The options in effect.
    pub fn options(&self) -> &LoadOptions {
        &self.options
    }

    /// Load a single entry, or each entry of an array.
    pub fn load(&self, data: &Value) -> Result<LoadReport> {
        let mut report = LoadReport::default();
        self.load_value(data, &mut report)?;
        Ok(report)
    }

    /// Load one `{type, data}` entry.
    pub fn load_one(&self, entry: &Value) -> Result<LoadReport> {
        let mut report = LoadReport::default();
        self.load_entry(entry, &mut report)?;
        Ok(report)
    }

    /// Load entries in order.
    pub fn load_many<'v, I>(&self, entries: I) -> Result<LoadReport>
    where
        I: IntoIterator<Item = &'v Value>,
    {
        let mut report = LoadReport::default();
        for entry in entries {
            self.load_entry(entry, &mut report)?;
        }
        Ok(report)
    }

    /// Load typed entries, such as those captured by an activity log.
    pub fn load_entries(&self, entries: &[FixtureEntry]) -> Result<LoadReport> {
        let mut report = LoadReport::default();
        for entry in entries {
            self.load_entry(&entry.to_value(), &mut report)?;
        }
        Ok(report)
    }

    /// Load JSON-lines text; `path` is used in errors and logs.
    pub fn load_str(&self, text: &str, path: &Path) -> Result<LoadReport> {
        let mut report = LoadReport::default();
        for (index, line) in text.split('\n').enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let line_number = index + 1;
            let value: Value = match serde_json::from_str(line) {
                Ok(value) => value,
                Err(err) if self.options.ignore_mock_data_errors => {
                    tracing::warn!(
                        path = %path.display(),
                        line = line_number,
                        error = %err,
                        "Skipping malformed fixture line"
                    );
                    report.skipped += 1;
                    continue;
                }
                Err(err) => {
                    return Err(RecallError::ParseError {
                        path: path.to_path_buf(),
                        line: line_number,
                        cause: err.to_string(),
                    });
                }
            };
            self.load_value(&value, &mut report)?;
        }
        Ok(report)
    }

    /// Load a JSON-lines fixture file.
    pub fn load_from_file(&self, path: impl AsRef<Path>) -> Result<LoadReport> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| RecallError::io(path, e))?;
        let report = self.load_str(&text, path)?;
        tracing::info!(
            path = %path.display(),
            calls = report.calls(),
            outcomes = report.outcomes(),
            skipped = report.skipped,
            "Loaded fixture file"
        );
        Ok(report)
    }

    fn load_value(&self, value: &Value, report: &mut LoadReport) -> Result<()> {
        match value {
            Value::Array(entries) => {
                for entry in entries {
                    self.load_entry(entry, report)?;
                }
                Ok(())
            }
            entry => self.load_entry(entry, report),
        }
    }

    fn load_entry(&self, entry: &Value, report: &mut LoadReport) -> Result<()> {
        let Some(data) = entry.get("data").and_then(Value::as_object) else {
            return self.skip_or_fail(
                self.options.ignore_mock_data_errors,
                RecallError::invalid_mock_data("mock data must be object"),
                report,
            );
        };
        let Some(kind) = entry.get("type").and_then(Value::as_str) else {
            return self.skip_or_fail(
                self.options.ignore_mock_data_errors,
                RecallError::invalid_mock_data("mock data must have type"),
                report,
            );
        };
        let Some(target) = fixture_kind(kind) else {
            return self.skip_or_fail(
                self.options.ignore_invalid_mock_data_type,
                RecallError::InvalidMockType {
                    mock_type: kind.to_string(),
                },
                report,
            );
        };

        let stored = match target.record {
            RecordKind::Call => self.store_call(target.domain, kind, data),
            RecordKind::Outcome => self.store_outcome(target.domain, kind, data),
        };
        match stored {
            Ok(()) => {
                report.stored(kind);
                Ok(())
            }
            Err(err) => self.skip_or_fail(self.options.ignore_invalid_mock_data, err, report),
        }
    }

    fn store_call(
        &self,
        domain: crate::types::Domain,
        kind: &str,
        data: &Map<String, Value>,
    ) -> Result<()> {
        let spec = domain.spec();
        let (fingerprint, record) = fingerprint_with_record(domain, &Value::Object(data.clone()))
            .map_err(|err| RecallError::invalid_mock_data(format!("{kind}: {err}")))?;
        let call_id = spec.call_id(data).ok_or_else(|| {
            RecallError::invalid_mock_data(format!("{kind}: missing '{}'", spec.id_field))
        })?;
        tracing::trace!(
            domain = %domain,
            fingerprint = %fingerprint,
            call_id = %call_id,
            "Loaded call"
        );
        self.registry.insert_call(
            domain,
            CallRecord {
                fingerprint,
                call_id,
                record,
            },
        );
        Ok(())
    }

    fn store_outcome(
        &self,
        domain: crate::types::Domain,
        kind: &str,
        data: &Map<String, Value>,
    ) -> Result<()> {
        let spec = domain.spec();
        let call_id = spec.call_id(data).ok_or_else(|| {
            RecallError::invalid_mock_data(format!("{kind}: missing '{}'", spec.id_field))
        })?;
        let outcome = (spec.shape_outcome)(kind, data)?;
        tracing::trace!(domain = %domain, call_id = %call_id, kind, "Loaded outcome");
        self.registry.insert_outcome(domain, call_id, outcome);
        Ok(())
    }

    fn skip_or_fail(&self, skip: bool, err: RecallError, report: &mut LoadReport) -> Result<()> {
        if skip {
            tracing::warn!(code = err.code(), error = %err, "Skipping fixture entry");
            report.skipped += 1;
            Ok(())
        } else {
            Err(err)
        }
    }
}
