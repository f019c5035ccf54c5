//! Summary input.

use anyhow::{Context, Result, bail};
use std::io::Read;
use std::path::PathBuf;

/// Resolves the summary from the flag, a file, or stdin, in that order.
pub fn read_summary(summary: Option<String>, summary_file: Option<PathBuf>) -> Result<String> {
    let text = match (summary, summary_file) {
        (Some(summary), _) => summary,
        (None, Some(path)) => std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read summary from {}", path.display()))?,
        (None, None) => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("Failed to read summary from stdin")?;
            text
        }
    };

    let text = text.trim().to_string();
    if text.is_empty() {
        bail!("No summary given");
    }
    Ok(text)
}
