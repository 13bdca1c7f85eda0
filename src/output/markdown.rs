//! Markdown summary generation
//!
//! Renders a finished crawl as a human-readable markdown document: run
//! information, statistics, every fetched page and the failures.

use crate::crawler::FetchOutcome;
use crate::output::summary::{CrawlSummary, OutputError, OutputResult};
use std::path::Path;

/// Content longer than this is cut in the pages table
const CONTENT_PREVIEW_CHARS: usize = 80;

/// Writes the markdown summary of a crawl to `output_path`
pub fn generate_markdown_summary(summary: &CrawlSummary, output_path: &Path) -> OutputResult<()> {
    let markdown = format_markdown_summary(summary);

    std::fs::write(output_path, markdown).map_err(|source| OutputError::Write {
        path: output_path.display().to_string(),
        source,
    })
}

/// Formats a crawl summary as markdown
pub fn format_markdown_summary(summary: &CrawlSummary) -> String {
    let stats = &summary.statistics;
    let mut md = String::new();

    md.push_str("# Fan-Crawl Summary\n\n");

    md.push_str("## Run Information\n\n");
    md.push_str(&format!("- **Seed**: {}\n", summary.seed));
    md.push_str(&format!("- **Max Depth**: {}\n", summary.max_depth));
    md.push_str(&format!("- **Started**: {}\n", summary.started_at.to_rfc3339()));
    md.push_str(&format!("- **Finished**: {}\n", summary.finished_at.to_rfc3339()));
    md.push_str(&format!("- **Duration**: {} ms\n", summary.duration_ms()));
    if let Some(hash) = &summary.config_hash {
        md.push_str(&format!("- **Config Hash**: {}\n", hash));
    }
    md.push('\n');

    md.push_str("## Statistics\n\n");
    md.push_str(&format!("- **Pages Fetched**: {}\n", stats.pages_fetched));
    md.push_str(&format!("- **Succeeded**: {}\n", stats.pages_succeeded));
    md.push_str(&format!("- **Failed**: {}\n", stats.pages_failed));
    md.push_str(&format!(
        "- **Links Discovered**: {} ({} distinct)\n",
        stats.links_discovered, stats.unique_links
    ));
    md.push_str(&format!("- **Success Rate**: {:.2}%\n\n", stats.success_rate()));

    if !summary.report.is_empty() {
        md.push_str("## Pages\n\n");
        md.push_str("| Address | Status | Links | Content |\n");
        md.push_str("|---------|--------|-------|---------|\n");

        for (address, outcome) in &summary.report {
            let (status, content) = match outcome {
                FetchOutcome::Success { content, .. } => ("ok", preview(content)),
                FetchOutcome::Failure(_) => ("failed", String::new()),
            };
            md.push_str(&format!(
                "| {} | {} | {} | {} |\n",
                escape_cell(address),
                status,
                outcome.links().len(),
                escape_cell(&content)
            ));
        }
        md.push('\n');
    }

    let failures: Vec<_> = summary.report.failures().collect();
    if !failures.is_empty() {
        md.push_str("## Failures\n\n");
        for (address, error) in failures {
            md.push_str(&format!("- `{}`: {}\n", address, error));
        }
        md.push('\n');
    }

    md
}

fn preview(content: &str) -> String {
    let single_line = content.split_whitespace().collect::<Vec<_>>().join(" ");
    if single_line.chars().count() > CONTENT_PREVIEW_CHARS {
        let cut: String = single_line.chars().take(CONTENT_PREVIEW_CHARS).collect();
        format!("{}...", cut)
    } else {
        single_line
    }
}

fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|")
}
