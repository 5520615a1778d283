/*!
 * Reporting functionality for pastepack
 *
 * Renders a console summary of a bundle run using the tabled library.
 */

use std::time::Duration;

use tabled::{
    settings::{object::Columns, Alignment, Modify, Padding, Style},
    Table, Tabled,
};

use crate::types::BundleResult;
use crate::utils::format_file_size;

/// Information about one included file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileReportInfo {
    /// Relative path
    pub path: String,
    /// Raw size in bytes
    pub bytes: u64,
    /// Number of lines in the rendered body
    pub lines: usize,
    /// Number of characters in the rendered body
    pub chars: usize,
    /// Fence language tag
    pub lang: String,
}

/// Statistics for a bundle run
#[derive(Debug, Clone)]
pub struct BundleReport {
    /// Where the artifact was delivered
    pub destinations: Vec<String>,
    /// Time taken to scan and bundle
    pub duration: Duration,
    /// Number of files in the bundle
    pub files_included: usize,
    /// Sum of raw bytes of included files
    pub total_bytes: u64,
    /// Sum of characters of included bodies
    pub total_chars: usize,
    /// Number of warnings raised
    pub warnings: usize,
    /// Details for each file, in bundle order
    pub file_details: Vec<FileReportInfo>,
}

impl BundleReport {
    /// Collect report data from a finished bundle
    pub fn from_result(result: &BundleResult, destinations: Vec<String>, duration: Duration) -> Self {
        let file_details: Vec<FileReportInfo> = result
            .blocks
            .iter()
            .map(|block| FileReportInfo {
                path: block.path.clone(),
                bytes: block.size,
                lines: block.body.lines().count(),
                chars: block.body.chars().count(),
                lang: block.lang.clone(),
            })
            .collect();

        Self {
            destinations,
            duration,
            files_included: result.included_count,
            total_bytes: result.total_bytes,
            total_chars: file_details.iter().map(|f| f.chars).sum(),
            warnings: result.warnings.len(),
            file_details,
        }
    }
}

/// Format of the report output
pub enum ReportFormat {
    /// Console table output
    ConsoleTable,
}

/// Report generator for bundle runs
pub struct Reporter {
    format: ReportFormat,
}

impl Reporter {
    /// Create a new reporter
    pub fn new(format: ReportFormat) -> Self {
        Self { format }
    }

    /// Format a number with human-readable units
    fn format_number(&self, num: usize) -> String {
        if num >= 1_000_000 {
            format!("{:.1}M", num as f64 / 1_000_000.0)
        } else if num >= 1_000 {
            format!("{:.1}K", num as f64 / 1_000.0)
        } else {
            num.to_string()
        }
    }

    /// Generate a report string
    pub fn generate_report(&self, report: &BundleReport) -> String {
        match self.format {
            ReportFormat::ConsoleTable => self.generate_console_report(report),
        }
    }

    /// Print the report to stderr, keeping stdout free for the artifact
    pub fn print_report(&self, report: &BundleReport) {
        eprintln!("\n{}", self.generate_report(report));
    }

    // Keep the end of long paths, which carries the file name
    fn format_path(&self, path: &str, max_len: usize) -> String {
        if path.chars().count() <= max_len {
            return path.to_string();
        }

        let mut segments = Vec::new();
        let mut current_len = 3; // "..."
        for part in path.split('/').rev() {
            let part_len = part.chars().count() + 1;
            if current_len + part_len > max_len {
                break;
            }
            segments.push(part);
            current_len += part_len;
        }

        if segments.is_empty() {
            let tail: String = path
                .chars()
                .rev()
                .take(max_len.saturating_sub(3))
                .collect::<Vec<_>>()
                .into_iter()
                .rev()
                .collect();
            return format!("...{}", tail);
        }

        let mut result = String::from("...");
        for part in segments.iter().rev() {
            result.push('/');
            result.push_str(part);
        }
        result
    }

    fn create_summary_table(&self, report: &BundleReport) -> String {
        #[derive(Tabled)]
        struct SummaryRow {
            #[tabled(rename = "Metric")]
            key: String,

            #[tabled(rename = "Value")]
            value: String,
        }

        let destinations = if report.destinations.is_empty() {
            "-".to_string()
        } else {
            report.destinations.join(", ")
        };

        let rows = vec![
            SummaryRow {
                key: "📋 Delivered To".to_string(),
                value: destinations,
            },
            SummaryRow {
                key: "⏱️ Process Time".to_string(),
                value: format!("{:.4?}", report.duration),
            },
            SummaryRow {
                key: "📄 Files Included".to_string(),
                value: self.format_number(report.files_included),
            },
            SummaryRow {
                key: "📦 Total Size".to_string(),
                value: format_file_size(report.total_bytes),
            },
            SummaryRow {
                key: "🔤 LLM Tokens".to_string(),
                value: format!(
                    "{} tokens (estimated)",
                    self.format_number(report.total_chars / 4)
                ),
            },
            SummaryRow {
                key: "⚠️ Warnings".to_string(),
                value: report.warnings.to_string(),
            },
        ];

        let mut table = Table::new(rows);
        table
            .with(Style::rounded())
            .with(Padding::new(1, 1, 0, 0))
            .with(Modify::new(Columns::new(..)).with(Alignment::left()));

        table.to_string()
    }

    fn create_files_table(&self, report: &BundleReport) -> String {
        #[derive(Tabled)]
        struct FileRow {
            #[tabled(rename = "File Path")]
            path: String,

            #[tabled(rename = "Lang")]
            lang: String,

            #[tabled(rename = "Size")]
            size: String,

            #[tabled(rename = "Lines")]
            lines: String,
        }

        // Largest first when the list has to be cut
        let mut files: Vec<&FileReportInfo> = report.file_details.iter().collect();
        if files.len() > 15 {
            files.sort_by(|a, b| b.bytes.cmp(&a.bytes));
            files.truncate(10);
        }

        let rows: Vec<FileRow> = files
            .iter()
            .map(|info| FileRow {
                path: self.format_path(&info.path, 60),
                lang: info.lang.clone(),
                size: format_file_size(info.bytes),
                lines: self.format_number(info.lines),
            })
            .collect();

        let mut table = Table::new(rows);
        table
            .with(Style::rounded())
            .with(Padding::new(1, 1, 0, 0))
            .with(Modify::new(Columns::new(..)).with(Alignment::left()));

        table.to_string()
    }

    fn generate_console_report(&self, report: &BundleReport) -> String {
        let files_title = if report.file_details.len() > 15 {
            "📋  TOP 10 LARGEST FILES"
        } else {
            "📋  BUNDLED FILES"
        };

        format!(
            "{}\n{}\n\n{}\n{}",
            files_title,
            self.create_files_table(report),
            "✅  BUNDLE COMPLETE",
            self.create_summary_table(report)
        )
    }
}
