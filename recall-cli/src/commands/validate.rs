//! Validate command - load a fixture file and report problems.

use anyhow::{Context, Result};
use recall_core::fixture::{LoadOptions, LoadReport};
use recall_core::store::{MockRegistry, Orphan, RegistryStats};
use std::path::Path;

/// What loading a fixture file produced.
#[derive(Debug)]
pub struct Validation {
    /// Entries stored and skipped.
    pub report: LoadReport,
    /// Record counts after loading.
    pub stats: RegistryStats,
    /// Records that can never replay.
    pub orphans: Vec<Orphan>,
}

/// Load a file into a fresh registry.
pub fn check(path: &Path, options: &LoadOptions) -> Result<Validation> {
    let registry = MockRegistry::new();
    let report = registry
        .load_mock_from_file(path, options)
        .with_context(|| format!("Failed to load {}", path.display()))?;
    Ok(Validation {
        report,
        stats: registry.stats(),
        orphans: registry.orphans(),
    })
}

/// Run the validate command.
pub fn run(file: &Path, ignore_errors: bool) -> Result<()> {
    if !file.exists() {
        anyhow::bail!("Fixture file not found: {}", file.display());
    }

    tracing::info!(file = %file.display(), "Validating fixture file");

    let title = format!("Validation Results for: {}", file.display());
    println!("{}", title);
    println!("{}", "=".repeat(title.chars().count()));
    println!();

    let options = if ignore_errors {
        LoadOptions::permissive()
    } else {
        LoadOptions::strict()
    };

    let validation = match check(file, &options) {
        Ok(validation) => validation,
        Err(e) => {
            println!("✗ LOAD ERROR:");
            println!("  {:#}", e);
            anyhow::bail!("Fixture file failed to load");
        }
    };

    println!("✓ All entries loaded");
    println!();
    println!("Fixture Summary:");
    for stats in &validation.stats.domains {
        println!(
            "  {:<13} {} calls, {} outcomes",
            format!("{}:", stats.domain),
            stats.calls,
            stats.outcomes
        );
    }

    let mut has_warnings = false;
    if validation.report.skipped > 0 {
        has_warnings = true;
        println!();
        println!(
            "⚠ WARNING: {} entries skipped",
            validation.report.skipped
        );
    }
    if validation.stats.is_empty() {
        has_warnings = true;
        println!();
        println!("⚠ WARNING: File contains no mock data");
    }
    for orphan in &validation.orphans {
        has_warnings = true;
        println!();
        println!("⚠ WARNING: {}", orphan);
    }

    println!();
    println!("{}", "=".repeat(title.chars().count()));
    if has_warnings {
        println!("⚠ Validation passed with warnings");
    } else {
        println!("✓ Validation PASSED");
    }

    Ok(())
}
