//! Inspect command - list the entries of a fixture file.

use anyhow::{Context, Result};
use recall_core::fingerprint::fingerprint;
use recall_core::fixture::{FixtureEntry, RecordKind};
use std::collections::BTreeMap;
use std::path::Path;

/// One non-blank line of a fixture file.
#[derive(Debug)]
pub struct LineSummary {
    /// 1-based line number.
    pub line: usize,
    /// Fixture type, if the line parsed.
    pub kind: Option<String>,
    /// Call id embedded in the data.
    pub call_id: Option<String>,
    /// Fingerprint of call entries.
    pub fingerprint: Option<String>,
    /// Why the line cannot be loaded.
    pub problem: Option<String>,
}

/// Summarize every non-blank line of fixture text.
pub fn summarize(text: &str) -> Vec<LineSummary> {
    text.split('\n')
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(index, line)| summarize_line(index + 1, line))
        .collect()
}

fn summarize_line(line: usize, text: &str) -> LineSummary {
    let mut summary = LineSummary {
        line,
        kind: None,
        call_id: None,
        fingerprint: None,
        problem: None,
    };

    let entry: FixtureEntry = match serde_json::from_str(text) {
        Ok(entry) => entry,
        Err(e) => {
            summary.problem = Some(e.to_string());
            return summary;
        }
    };
    summary.kind = Some(entry.kind.clone());

    let Some(kind) = entry.fixture_kind() else {
        summary.problem = Some("unknown fixture type".to_string());
        return summary;
    };
    let spec = kind.domain.spec();
    summary.call_id = entry
        .data
        .as_object()
        .and_then(|data| spec.call_id(data))
        .map(|id| id.to_string());

    if kind.record == RecordKind::Call {
        match fingerprint(kind.domain, &entry.data) {
            Ok(fp) => summary.fingerprint = Some(fp.to_hex()),
            Err(e) => summary.problem = Some(e.to_string()),
        }
    }
    if summary.call_id.is_none() && summary.problem.is_none() {
        summary.problem = Some(format!("missing '{}'", spec.id_field));
    }
    summary
}

/// Run the inspect command.
pub fn run(file: &Path, kind: Option<&str>) -> Result<()> {
    tracing::info!(file = %file.display(), kind = ?kind, "Inspecting fixture file");

    let text = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read fixture file: {}", file.display()))?;
    let lines = summarize(&text);

    println!("Fixture File");
    println!("============");
    println!("Path:     {}", file.display());
    println!("Entries:  {}", lines.len());
    println!();

    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    let mut problems = 0;
    for summary in &lines {
        let entry_kind = summary.kind.as_deref().unwrap_or("?");
        *counts.entry(entry_kind).or_default() += 1;
        if kind.is_some_and(|k| k != entry_kind) {
            continue;
        }

        let marker = if summary.problem.is_some() { "✗" } else { "✓" };
        print!(
            "  {} {:>5}  {:<18} {}",
            marker,
            summary.line,
            entry_kind,
            summary.call_id.as_deref().unwrap_or("-")
        );
        if let Some(fp) = &summary.fingerprint {
            print!("  {}", fp);
        }
        println!();
        if let Some(problem) = &summary.problem {
            problems += 1;
            println!("            {}", problem);
        }
    }

    println!();
    println!("Entry Types:");
    for (entry_kind, count) in &counts {
        println!("  {:<18} {}", entry_kind, count);
    }
    if problems > 0 {
        println!();
        println!("⚠ {} entries cannot be loaded", problems);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summarizes_calls_outcomes_and_problems() {
        let text = [
            r#"{"type":"httpRequest","data":{"options":{"uri":"http://a"},"httpRequestId":"h1"}}"#,
            "",
            r#"{"type":"httpResponse","data":{"httpRequestId":"h1","httpResponseStatusCode":200}}"#,
            r#"{"type":"FOO","data":{}}"#,
            "{broken",
        ]
        .join("\n");

        let lines = summarize(&text);
        assert_eq!(lines.len(), 4);

        assert_eq!(lines[0].line, 1);
        assert_eq!(lines[0].call_id.as_deref(), Some("h1"));
        assert_eq!(lines[0].fingerprint.as_ref().map(String::len), Some(32));
        assert!(lines[0].problem.is_none());

        assert_eq!(lines[1].line, 3);
        assert!(lines[1].fingerprint.is_none());
        assert!(lines[1].problem.is_none());

        assert_eq!(lines[2].kind.as_deref(), Some("FOO"));
        assert!(lines[2].problem.is_some());

        assert_eq!(lines[3].line, 5);
        assert!(lines[3].kind.is_none());
    }
}
