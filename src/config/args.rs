use crate::config::toml_config::{TomlConfig, DEFAULT_FOLDER_SUFFIX};
use crate::domain::fiscal::FiscalCalendar;
use crate::domain::model::ReportFormat;
use crate::domain::ports::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use clap::Parser;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Parser)]
#[command(name = "classfy", version)]
#[command(about = "Sort files into financial-year folders based on the date at the end of their names")]
pub struct CliConfig {
    /// Directories to classify
    #[arg(default_value = ".")]
    pub directories: Vec<PathBuf>,

    /// Path to TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// First month of the financial year (1-12)
    #[arg(long)]
    pub fy_start_month: Option<u8>,

    /// Suffix appended to the year in folder names
    #[arg(long)]
    pub suffix: Option<String>,

    /// Reject day-of-month values that are not real calendar dates
    #[arg(long, overrides_with = "no_strict_dates")]
    pub strict_dates: bool,

    /// Accept any two-digit day (overrides the config file)
    #[arg(long, overrides_with = "strict_dates")]
    pub no_strict_dates: bool,

    /// Show what would be moved without touching any file
    #[arg(long, overrides_with = "no_dry_run")]
    pub dry_run: bool,

    /// Move files even if the config file enables dry runs
    #[arg(long, overrides_with = "dry_run")]
    pub no_dry_run: bool,

    /// Write a report of every file to this path
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// Report format: csv or json
    #[arg(long)]
    pub report_format: Option<String>,

    /// Log CPU and memory usage per phase
    #[arg(long, overrides_with = "no_monitor")]
    pub monitor: bool,

    /// Disable monitoring even if the config file enables it
    #[arg(long, overrides_with = "monitor")]
    pub no_monitor: bool,

    /// Emit logs as JSON
    #[arg(long)]
    pub log_json: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl CliConfig {
    /// 合併 TOML 設定，命令列參數優先
    pub fn merge_toml(&mut self, toml: &TomlConfig) {
        if self.fy_start_month.is_none() {
            self.fy_start_month = toml.classify.fy_start_month;
        }
        if self.suffix.is_none() {
            self.suffix = toml.classify.folder_suffix.clone();
        }
        self.strict_dates = resolve_flag(
            self.strict_dates,
            self.no_strict_dates,
            toml.classify.strict_dates,
        );
        self.dry_run = resolve_flag(self.dry_run, self.no_dry_run, toml.classify.dry_run);
        self.monitor = resolve_flag(
            self.monitor,
            self.no_monitor,
            toml.monitoring.as_ref().map(|m| m.enabled),
        );

        if let Some(report) = &toml.report {
            if self.report.is_none() {
                self.report = Some(PathBuf::from(&report.path));
            }
            if self.report_format.is_none() {
                self.report_format = report.format.clone();
            }
        }
    }
}

/// 命令列的 `--x` / `--no-x` 優先於設定檔
fn resolve_flag(on: bool, off: bool, from_file: Option<bool>) -> bool {
    match (on, off) {
        (true, _) => true,
        (_, true) => false,
        _ => from_file.unwrap_or(false),
    }
}

impl ConfigProvider for CliConfig {
    fn fiscal_calendar(&self) -> FiscalCalendar {
        FiscalCalendar::new(
            self.fy_start_month
                .unwrap_or(FiscalCalendar::DEFAULT_START_MONTH),
        )
        .unwrap_or_default()
        .with_strict_dates(self.strict_dates)
    }

    fn folder_suffix(&self) -> &str {
        self.suffix.as_deref().unwrap_or(DEFAULT_FOLDER_SUFFIX)
    }

    fn dry_run(&self) -> bool {
        self.dry_run
    }

    fn report_path(&self) -> Option<&Path> {
        self.report.as_deref()
    }

    fn report_format(&self) -> ReportFormat {
        self.report_format
            .as_deref()
            .and_then(|f| f.parse().ok())
            .unwrap_or_default()
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        if let Some(month) = self.fy_start_month {
            validation::validate_range("fy_start_month", month, 1, 12)?;
        }
        if let Some(suffix) = &self.suffix {
            validation::validate_folder_component("suffix", suffix)?;
        }
        if let Some(report) = &self.report {
            validation::validate_path("report", &report.to_string_lossy())?;
        }
        if let Some(format) = &self.report_format {
            validation::validate_one_of("report_format", format, &ReportFormat::VALID)?;
        }
        for dir in &self.directories {
            validation::validate_path("directories", &dir.to_string_lossy())?;
        }
        Ok(())
    }
}
