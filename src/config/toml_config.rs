use crate::domain::fiscal::FiscalCalendar;
use crate::domain::model::ReportFormat;
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{ClassifyError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_FOLDER_SUFFIX: &str = "FY";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub classify: ClassifyConfig,
    pub report: Option<ReportConfig>,
    pub monitoring: Option<MonitoringConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClassifyConfig {
    pub fy_start_month: Option<u8>,
    pub folder_suffix: Option<String>,
    pub strict_dates: Option<bool>,
    pub dry_run: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    pub path: String,
    pub format: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    pub enabled: bool,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;
        Ok(toml::from_str(&processed_content)?)
    }

    /// 替換環境變數 (例如 ${ARCHIVE_DIR})，未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| ClassifyError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        if let Some(month) = self.classify.fy_start_month {
            validation::validate_range("classify.fy_start_month", month, 1, 12)?;
        }

        if let Some(suffix) = &self.classify.folder_suffix {
            validation::validate_folder_component("classify.folder_suffix", suffix)?;
        }

        if let Some(report) = &self.report {
            validation::validate_path("report.path", &report.path)?;
            if let Some(format) = &report.format {
                validation::validate_one_of("report.format", format, &ReportFormat::VALID)?;
            }
        }

        Ok(())
    }

    pub fn fy_start_month(&self) -> u8 {
        self.classify
            .fy_start_month
            .unwrap_or(FiscalCalendar::DEFAULT_START_MONTH)
    }

    pub fn monitoring_enabled(&self) -> bool {
        self.monitoring.as_ref().map(|m| m.enabled).unwrap_or(false)
    }
}

impl ConfigProvider for TomlConfig {
    fn fiscal_calendar(&self) -> FiscalCalendar {
        FiscalCalendar::new(self.fy_start_month())
            .unwrap_or_default()
            .with_strict_dates(self.classify.strict_dates.unwrap_or(false))
    }

    fn folder_suffix(&self) -> &str {
        self.classify
            .folder_suffix
            .as_deref()
            .unwrap_or(DEFAULT_FOLDER_SUFFIX)
    }

    fn dry_run(&self) -> bool {
        self.classify.dry_run.unwrap_or(false)
    }

    fn report_path(&self) -> Option<&Path> {
        self.report.as_ref().map(|r| Path::new(&r.path))
    }

    fn report_format(&self) -> ReportFormat {
        self.report
            .as_ref()
            .and_then(|r| r.format.as_deref())
            .and_then(|f| f.parse().ok())
            .unwrap_or_default()
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
