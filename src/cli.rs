//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use crate::analysis::ReportFilters;
use crate::models::ReportSection;
use chrono::NaiveDate;
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// SSMS Reports - sponsorship report aggregator
///
/// Fetches students, sponsors, scholarship programs, allocations and
/// payments from the SSMS record-keeping API and renders the seven
/// sponsorship reports plus a dashboard summary as Markdown or JSON.
///
/// Examples:
///   ssms-reports
///   ssms-reports --api-url http://127.0.0.1:8000/api -o report.md
///   ssms-reports --university Makerere --sections student-sponsorship,students-per-university
///   ssms-reports --student-id 7 --sections student-detail --format json
///   ssms-reports --dry-run
///   ssms-reports --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Base URL of the record-keeping API
    ///
    /// Default: from config or http://127.0.0.1:8000/api.
    #[arg(long, value_name = "URL", env = "SSMS_API_URL")]
    pub api_url: Option<String>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .ssms-reports.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Output file path for the report
    ///
    /// Default: from config or sponsorship_report.md.
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Output format (markdown, json)
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<OutputFormat>,

    /// Report sections to include (comma-separated)
    ///
    /// Example: --sections sponsor-contribution,dashboard
    #[arg(long, value_name = "SECTIONS", value_delimiter = ',')]
    pub sections: Option<Vec<ReportSection>>,

    /// Only students at this university
    #[arg(long, value_name = "NAME")]
    pub university: Option<String>,

    /// Only students in this year of study
    #[arg(long, value_name = "YEAR")]
    pub year: Option<String>,

    /// Only rows funded by this sponsor id
    #[arg(long, value_name = "ID")]
    pub sponsor_id: Option<String>,

    /// Only allocations with this status (e.g. Active, Completed)
    #[arg(long, value_name = "STATUS")]
    pub status: Option<String>,

    /// Only payments made in this semester (1 or 2)
    #[arg(long, value_name = "N")]
    pub semester: Option<String>,

    /// Only payments made on or after this date (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub date_from: Option<String>,

    /// Only payments made on or before this date (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub date_to: Option<String>,

    /// Student to show in the student detail report
    #[arg(long, value_name = "ID")]
    pub student_id: Option<String>,

    /// Request timeout in seconds
    ///
    /// Applied to each collection request. Default: from config or 30s.
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Dry run: fetch the collections and show what is available
    ///
    /// Prints record counts and filter values, writes no report.
    #[arg(long)]
    pub dry_run: bool,

    /// Exit with code 2 when every selected report is empty
    ///
    /// Useful for scheduled jobs.
    #[arg(long)]
    pub fail_on_empty: bool,

    /// Generate a default .ssms-reports.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Output format for the report.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Markdown format (default)
    #[default]
    Markdown,
    /// JSON format
    Json,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        // Validate API URL format
        if let Some(ref url) = self.api_url {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err("API URL must start with 'http://' or 'https://'".to_string());
            }
        }

        // Check for conflicting options
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        // Validate timeout if provided
        if let Some(timeout) = self.timeout {
            if timeout == 0 {
                return Err("Timeout must be at least 1 second".to_string());
            }
        }

        if let Some(ref semester) = self.semester {
            if !matches!(semester.trim(), "1" | "2") {
                return Err(format!("Semester must be 1 or 2, got '{}'", semester));
            }
        }

        let from = parse_date_arg("--date-from", self.date_from.as_deref())?;
        let to = parse_date_arg("--date-to", self.date_to.as_deref())?;
        if let (Some(from), Some(to)) = (from, to) {
            if from > to {
                return Err(format!(
                    "--date-from ({}) must not be after --date-to ({})",
                    from, to
                ));
            }
        }

        if let Some(ref sections) = self.sections {
            if sections.is_empty() {
                return Err("At least one report section is required".to_string());
            }
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings. `--quiet` wins over
    /// both `--verbose` and the config file's `verbose` key.
    pub fn log_level(&self, config_verbose: bool) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose || config_verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }

    /// Report filters given on the command line, normalized.
    pub fn filters(&self) -> ReportFilters {
        ReportFilters {
            university: self.university.clone(),
            year: self.year.clone(),
            sponsor_id: self.sponsor_id.clone(),
            status: self.status.clone(),
            semester: self.semester.clone(),
            date_from: iso_date(self.date_from.as_deref()),
            date_to: iso_date(self.date_to.as_deref()),
            student_id: self.student_id.clone(),
        }
        .normalized()
    }
}

/// Date bounds are compared as strings, so store them zero-padded.
fn iso_date(value: Option<&str>) -> Option<String> {
    value.map(|v| {
        let v = v.trim();
        NaiveDate::parse_from_str(v, "%Y-%m-%d")
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|_| v.to_string())
    })
}

fn parse_date_arg(flag: &str, value: Option<&str>) -> Result<Option<NaiveDate>, String> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(v) => NaiveDate::parse_from_str(v, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| format!("{} must be a date in YYYY-MM-DD form, got '{}'", flag, v)),
    }
}
