//! Version command - show version information.

use anyhow::Result;
use recall_core::fixture::fixture_kind_names;

/// Version information.
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Run the version command.
pub fn run() -> Result<()> {
    println!("Recall - Deterministic record/replay for cross-boundary calls");
    println!();
    println!("Version:     {}", VERSION);
    println!(
        "Platform:    {} / {}",
        std::env::consts::OS,
        std::env::consts::ARCH
    );
    println!();
    println!("Components:");
    println!("  recall-core    Fingerprints, mock stores, interception, fixtures");
    println!("  recall-cli     Command-line interface");
    println!();
    println!(
        "Fixture types: {}",
        fixture_kind_names().collect::<Vec<_>>().join(", ")
    );

    Ok(())
}
