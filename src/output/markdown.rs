//! Completion summary generation
//!
//! This module renders the end-of-run report twice: as plain lines for the
//! log and as a markdown file for later reading.

use crate::output::traits::{CrawlReport, OutputResult};
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

/// Registrars listed in the coverage table
const TOP_REGISTRARS: usize = 20;

/// Formats the completion summary as log lines
pub fn format_summary_lines(report: &CrawlReport) -> Vec<String> {
    let stats = &report.stats;
    let mut lines = vec![
        "Full crawl completed".to_string(),
        format!("Total zones processed: {}", stats.total_zones),
        format!("Successful zones: {}", stats.successful_zones),
        format!("Failed zones: {}", stats.failed_zones),
        format!("Total registrars found: {}", stats.total_registrars),
        format!(
            "Total price records: {} ({} saved)",
            report.total_records, report.saved_records
        ),
        format!("Success rate: {:.1}%", stats.success_rate),
    ];

    match report.average_registrars_per_zone() {
        Some(average) => lines.push(format!("Average registrars per zone: {:.1}", average)),
        None => lines.push("Average registrars per zone: N/A".to_string()),
    }

    if !stats.failed_zone_list.is_empty() {
        lines.push(format!("Failed zones: {}", report.failed_zone_preview()));
    }

    lines
}

/// Writes the markdown summary, creating the parent directory if needed
pub fn generate_markdown_summary(report: &CrawlReport, output_path: &Path) -> OutputResult<()> {
    let markdown = format_markdown_summary(report);

    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let mut file = File::create(output_path)?;
    file.write_all(markdown.as_bytes())?;

    Ok(())
}

/// Formats the end-of-run report as markdown
pub fn format_markdown_summary(report: &CrawlReport) -> String {
    let stats = &report.stats;
    let mut md = String::new();

    md.push_str("# TLD Price Crawl Summary\n\n");

    // Run metadata
    md.push_str("## Run Information\n\n");
    md.push_str(&format!("- **Run ID**: {}\n", report.run_id));
    md.push_str(&format!("- **Started**: {}\n", report.started_at.to_rfc3339()));
    md.push_str(&format!("- **Finished**: {}\n", report.finished_at.to_rfc3339()));
    let duration = report.duration_seconds();
    md.push_str(&format!(
        "- **Duration**: {} seconds ({:.2} minutes)\n",
        duration,
        duration as f64 / 60.0
    ));
    md.push_str(&format!("- **Config Hash**: {}\n\n", report.config_hash));

    // Overall statistics
    md.push_str("## Overall Statistics\n\n");
    md.push_str(&format!("- **Verified Zones**: {}\n", stats.total_zones));
    md.push_str(&format!("- **Successful Zones**: {}\n", stats.successful_zones));
    md.push_str(&format!("- **Failed Zones**: {}\n", stats.failed_zones));
    md.push_str(&format!("- **Success Rate**: {:.1}%\n", stats.success_rate));
    md.push_str(&format!("- **Registrars**: {}\n", stats.total_registrars));
    md.push_str(&format!(
        "- **Registrar/Zone Combinations**: {}\n",
        stats.total_combinations
    ));
    md.push_str(&format!("- **Price Records**: {}\n", report.total_records));
    md.push_str(&format!("- **Records Saved**: {}\n", report.saved_records));
    match report.average_registrars_per_zone() {
        Some(average) => md.push_str(&format!(
            "- **Average Registrars per Zone**: {:.1}\n\n",
            average
        )),
        None => md.push_str("- **Average Registrars per Zone**: N/A\n\n"),
    }

    // Coverage
    let top = stats.top_registrars(TOP_REGISTRARS);
    if !top.is_empty() {
        md.push_str(&format!("## Top {} Registrars by Zone Coverage\n\n", TOP_REGISTRARS));
        md.push_str("| Registrar | Zones |\n");
        md.push_str("|-----------|-------|\n");
        for (registrar, zones) in top {
            md.push_str(&format!("| {} | {} |\n", registrar, zones));
        }
        md.push('\n');
    }

    // Failed zones are listed in full here
    if !stats.failed_zone_list.is_empty() {
        md.push_str("## Failed Zones\n\n");
        for zone in &stats.failed_zone_list {
            md.push_str(&format!("- .{}\n", zone));
        }
        md.push('\n');
    }

    md
}
