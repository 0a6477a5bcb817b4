//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.ssms-reports.toml` files.

use crate::cli::OutputFormat;
use crate::models::{CollectionKind, ReportSection};
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Name of the configuration file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = ".ssms-reports.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// API connection settings.
    #[serde(default)]
    pub api: ApiConfig,

    /// Report settings.
    #[serde(default)]
    pub report: ReportConfig,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Default output file path.
    #[serde(default = "default_output")]
    pub output: String,

    /// Enable verbose logging by default.
    #[serde(default)]
    pub verbose: bool,

    /// Report output format.
    #[serde(default)]
    pub format: OutputFormat,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            output: default_output(),
            verbose: false,
            format: OutputFormat::default(),
        }
    }
}

fn default_output() -> String {
    "sponsorship_report.md".to_string()
}

/// Record-keeping API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL the endpoint paths are joined to.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds, applied to each request.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// List endpoint paths, relative to the base URL.
    #[serde(default)]
    pub endpoints: EndpointConfig,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_seconds: default_timeout(),
            endpoints: EndpointConfig::default(),
        }
    }
}

fn default_base_url() -> String {
    "http://127.0.0.1:8000/api".to_string()
}

fn default_timeout() -> u64 {
    30
}

/// Path of each collection's list endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointConfig {
    #[serde(default = "default_students_path")]
    pub students: String,
    #[serde(default = "default_sponsors_path")]
    pub sponsors: String,
    #[serde(default = "default_programs_path")]
    pub programs: String,
    #[serde(default = "default_allocations_path")]
    pub allocations: String,
    #[serde(default = "default_payments_path")]
    pub payments: String,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            students: default_students_path(),
            sponsors: default_sponsors_path(),
            programs: default_programs_path(),
            allocations: default_allocations_path(),
            payments: default_payments_path(),
        }
    }
}

impl EndpointConfig {
    pub fn path(&self, kind: CollectionKind) -> &str {
        match kind {
            CollectionKind::Students => &self.students,
            CollectionKind::Sponsors => &self.sponsors,
            CollectionKind::Programs => &self.programs,
            CollectionKind::Allocations => &self.allocations,
            CollectionKind::Payments => &self.payments,
        }
    }
}

fn default_students_path() -> String {
    "show-students/".to_string()
}

fn default_sponsors_path() -> String {
    "show-sponsors/".to_string()
}

fn default_programs_path() -> String {
    "show-programs/".to_string()
}

fn default_allocations_path() -> String {
    "show-allocations/".to_string()
}

fn default_payments_path() -> String {
    "show-payments/".to_string()
}

/// Report generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Sections to render, in order.
    #[serde(default = "default_sections")]
    pub sections: Vec<ReportSection>,

    /// Dashboard: number of upcoming end dates listed.
    #[serde(default = "default_top_limit")]
    pub upcoming_limit: usize,

    /// Dashboard: number of best funded programs listed.
    #[serde(default = "default_top_limit")]
    pub top_programs_limit: usize,

    /// Dashboard: number of most recent allocations listed.
    #[serde(default = "default_recent_limit")]
    pub recent_allocations_limit: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            sections: default_sections(),
            upcoming_limit: default_top_limit(),
            top_programs_limit: default_top_limit(),
            recent_allocations_limit: default_recent_limit(),
        }
    }
}

fn default_sections() -> Vec<ReportSection> {
    ReportSection::ALL.to_vec()
}

fn default_top_limit() -> usize {
    5
}

fn default_recent_limit() -> usize {
    3
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        Self::load_optional(Path::new(DEFAULT_CONFIG_FILE))
    }

    fn load_optional(path: &Path) -> Result<Option<Self>> {
        if path.exists() {
            Ok(Some(Self::load(path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings, but only
    /// when they were actually given.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref url) = args.api_url {
            self.api.base_url = url.clone();
        }
        if let Some(timeout) = args.timeout {
            self.api.timeout_seconds = timeout;
        }

        if let Some(ref output) = args.output {
            self.general.output = output.display().to_string();
        }
        if let Some(format) = args.format {
            self.general.format = format;
        }
        if let Some(ref sections) = args.sections {
            self.report.sections = sections.clone();
        }

        // Flags always override
        if args.verbose {
            self.general.verbose = true;
        }
    }

    /// Checks values a config file can set but the command line does not
    /// re-validate. Call after `merge_with_args`.
    pub fn validate(&self) -> Result<()> {
        if self.api.timeout_seconds == 0 {
            bail!("api.timeout_seconds must be greater than 0");
        }
        let url = self.api.base_url.trim();
        if !url.starts_with("http://") && !url.starts_with("https://") {
            bail!("api.base_url must start with http:// or https://, got '{}'", url);
        }
        Ok(())
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}
