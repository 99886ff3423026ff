/*!
 * Reporting functionality for dupsync
 *
 * Renders a summary of a synchronization run using the tabled library.
 */

use tabled::{
    settings::{object::Columns, Alignment, Modify, Padding, Style},
    Table, Tabled,
};

use crate::sync::{SyncOutcome, SyncStatus};
use crate::utils::format_file_size;

/// Everything shown in the run summary
#[derive(Debug, Clone)]
pub struct RunReport {
    /// Generations selected for mirroring
    pub generations: usize,
    /// Full backups among them
    pub full_backups: usize,
    /// Files selected for mirroring
    pub selected_files: usize,
    /// Byte ceiling, 0 for unlimited
    pub max_total_bytes: u64,
    /// Result of the synchronizer
    pub outcome: SyncOutcome,
}

/// Report generator for sync results
pub struct Reporter;

impl Reporter {
    /// Create a new reporter
    pub fn new() -> Self {
        Self
    }

    /// Generate the summary table
    pub fn generate_report(&self, report: &RunReport) -> String {
        #[derive(Tabled)]
        struct SummaryRow {
            #[tabled(rename = "Metric")]
            key: String,

            #[tabled(rename = "Value")]
            value: String,
        }

        let stats = &report.outcome.stats;
        let row = |key: &str, value: String| SummaryRow {
            key: key.to_string(),
            value,
        };

        let status = match &report.outcome.status {
            SyncStatus::Completed if stats.dry_run => "Completed (dry run)".to_string(),
            SyncStatus::Completed => "Completed".to_string(),
            SyncStatus::SizeLimitReached { file, exceeded_by } => format!(
                "Size limit reached at {} (over by {} bytes)",
                file, exceeded_by
            ),
        };
        let limit = if report.max_total_bytes == 0 {
            "unlimited".to_string()
        } else {
            format!("{} bytes", report.max_total_bytes)
        };

        let rows = vec![
            row("Status", status),
            row(
                "Generations",
                format!("{} ({} full)", report.generations, report.full_backups),
            ),
            row("Selected Files", report.selected_files.to_string()),
            row("Kept", stats.kept.to_string()),
            row("Deleted", stats.deleted.to_string()),
            row(
                "Copied",
                format!("{} ({})", stats.copied, format_file_size(stats.bytes_copied)),
            ),
            row("Skipped", stats.skipped.to_string()),
            row("Destination Size", format_file_size(stats.destination_bytes)),
            row("Size Limit", limit),
        ];

        let mut table = Table::new(rows);
        table
            .with(Style::rounded())
            .with(Padding::new(1, 1, 0, 0))
            .with(Modify::new(Columns::new(..)).with(Alignment::left()));

        table.to_string()
    }

    /// Print the report to stdout
    pub fn print_report(&self, report: &RunReport) {
        println!("\n{}", self.generate_report(report));
    }
}

impl Default for Reporter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sync::SyncStats;

    #[test]
    fn test_report_mentions_limit() {
        let report = RunReport {
            generations: 3,
            full_backups: 1,
            selected_files: 9,
            max_total_bytes: 60,
            outcome: SyncOutcome {
                status: SyncStatus::SizeLimitReached {
                    file: "file3".to_string(),
                    exceeded_by: 10,
                },
                stats: SyncStats {
                    copied: 2,
                    skipped: 1,
                    bytes_copied: 50,
                    destination_bytes: 50,
                    ..SyncStats::default()
                },
            },
        };

        let table = Reporter::new().generate_report(&report);
        assert!(table.contains("Size limit reached at file3"));
        assert!(table.contains("3 (1 full)"));
        assert!(table.contains("60 bytes"));
    }
}
