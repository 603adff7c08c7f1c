use crate::domain::fiscal::FiscalYear;
use crate::utils::error::ClassifyError;
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// 掃描目錄時找到的一般檔案
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub path: PathBuf,
    /// 原始檔名，搬移時保持不變（可能不是 UTF-8）
    pub file_name: OsString,
}

impl Candidate {
    pub fn display_name(&self) -> std::borrow::Cow<'_, str> {
        self.file_name.to_string_lossy()
    }
}

// 報表中的路徑一律以 lossy 字串輸出
mod lossy_path {
    use serde::Serializer;
    use std::path::{Path, PathBuf};

    pub fn serialize<S: Serializer>(path: &Path, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&path.to_string_lossy())
    }

    pub fn serialize_opt<S: Serializer>(
        path: &Option<PathBuf>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match path {
            Some(path) => serialize(path, serializer),
            None => serializer.serialize_none(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub fiscal_year: FiscalYear,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Skipped {
    pub path: PathBuf,
    pub reason: String,
}

#[derive(Debug, Clone, Default)]
pub struct ClassificationPlan {
    pub directory: PathBuf,
    pub placements: Vec<Placement>,
    pub skipped: Vec<Skipped>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Moved,
    Planned,
    Conflict,
    Skipped,
    Failed,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Outcome::Moved => "moved",
            Outcome::Planned => "planned",
            Outcome::Conflict => "conflict",
            Outcome::Skipped => "skipped",
            Outcome::Failed => "failed",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileReport {
    #[serde(serialize_with = "lossy_path::serialize")]
    pub source: PathBuf,
    #[serde(serialize_with = "lossy_path::serialize_opt")]
    pub destination: Option<PathBuf>,
    pub fiscal_year: Option<FiscalYear>,
    pub outcome: Outcome,
    pub detail: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    #[serde(serialize_with = "lossy_path::serialize")]
    pub directory: PathBuf,
    pub dry_run: bool,
    pub entries: Vec<FileReport>,
}

impl RunReport {
    pub fn new(directory: PathBuf, dry_run: bool) -> Self {
        Self {
            directory,
            dry_run,
            entries: Vec::new(),
        }
    }

    fn count(&self, outcome: Outcome) -> usize {
        self.entries.iter().filter(|e| e.outcome == outcome).count()
    }

    /// 已搬移（dry run 時為預計搬移）的檔案數
    pub fn moved(&self) -> usize {
        self.count(Outcome::Moved) + self.count(Outcome::Planned)
    }

    pub fn skipped(&self) -> usize {
        self.count(Outcome::Skipped)
    }

    pub fn conflicts(&self) -> usize {
        self.count(Outcome::Conflict)
    }

    pub fn failures(&self) -> usize {
        self.count(Outcome::Failed)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Csv,
    Json,
}

impl ReportFormat {
    pub const VALID: [&'static str; 2] = ["csv", "json"];
}

impl FromStr for ReportFormat {
    type Err = ClassifyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(ReportFormat::Csv),
            "json" => Ok(ReportFormat::Json),
            other => Err(ClassifyError::InvalidConfigValueError {
                field: "report.format".to_string(),
                value: other.to_string(),
                reason: format!("Unsupported format. Valid formats: {}", Self::VALID.join(", ")),
            }),
        }
    }
}
