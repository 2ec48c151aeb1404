//! Fingerprint command - compute the stable id of call data.

use anyhow::{Context, Result};
use recall_core::fingerprint::fingerprint_with_record;
use recall_core::types::{Domain, Fingerprint};
use serde_json::Value;
use std::io::Read;

/// Run the fingerprint command.
pub fn run(domain: &str, data: Option<&str>, show_record: bool) -> Result<()> {
    let domain: Domain = domain.parse().map_err(|e| anyhow::anyhow!("{}", e))?;
    let text = match data {
        Some(text) => text.to_string(),
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read call data from stdin")?;
            buf
        }
    };

    let (fingerprint, record) = compute(domain, &text)?;
    tracing::debug!(domain = %domain, fingerprint = %fingerprint, "Computed fingerprint");

    println!("{}", fingerprint);
    if show_record {
        println!("{}", serde_json::to_string_pretty(&record)?);
    }
    Ok(())
}

fn compute(domain: Domain, text: &str) -> Result<(Fingerprint, Value)> {
    let data: Value = serde_json::from_str(text).context("Call data is not valid JSON")?;
    fingerprint_with_record(domain, &data)
        .with_context(|| format!("Cannot fingerprint {} call data", domain))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_order_is_irrelevant() {
        let (a, _) = compute(Domain::DbQuery, r#"{"query":"SELECT 1","connectionId":1}"#).unwrap();
        let (b, _) = compute(Domain::DbQuery, r#"{"connectionId":2,"query":"SELECT 1"}"#).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn bad_input_is_reported() {
        assert!(compute(Domain::DbQuery, "not json").is_err());
        assert!(compute(Domain::ModuleCall, r#"{"args": []}"#).is_err());
    }
}
