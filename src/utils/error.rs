use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClassifyError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Directory does not exist: {}", path.display())]
    DirectoryNotFound { path: PathBuf },

    #[error("Not a directory: {}", path.display())]
    NotADirectory { path: PathBuf },

    #[error("Destination already exists: {}", path.display())]
    DestinationExists { path: PathBuf },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for '{field}' ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Report error: {message}")]
    ReportError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    FileSystem,
    Configuration,
    Report,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ErrorSeverity {
    /// 根據錯誤嚴重程度決定退出碼
    pub fn exit_code(self) -> i32 {
        match self {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

impl ClassifyError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ClassifyError::IoError(_)
            | ClassifyError::DirectoryNotFound { .. }
            | ClassifyError::NotADirectory { .. }
            | ClassifyError::DestinationExists { .. } => ErrorCategory::FileSystem,
            ClassifyError::TomlError(_)
            | ClassifyError::ConfigError { .. }
            | ClassifyError::InvalidConfigValueError { .. }
            | ClassifyError::MissingConfigError { .. } => ErrorCategory::Configuration,
            ClassifyError::CsvError(_)
            | ClassifyError::SerializationError(_)
            | ClassifyError::ReportError { .. } => ErrorCategory::Report,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            ClassifyError::DirectoryNotFound { .. } | ClassifyError::NotADirectory { .. } => {
                ErrorSeverity::High
            }
            ClassifyError::CsvError(_)
            | ClassifyError::SerializationError(_)
            | ClassifyError::ReportError { .. }
            | ClassifyError::DestinationExists { .. } => ErrorSeverity::Medium,
            ClassifyError::IoError(_)
            | ClassifyError::TomlError(_)
            | ClassifyError::ConfigError { .. }
            | ClassifyError::InvalidConfigValueError { .. }
            | ClassifyError::MissingConfigError { .. } => ErrorSeverity::Critical,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            ClassifyError::DirectoryNotFound { path } => {
                format!("Directory '{}' does not exist", path.display())
            }
            ClassifyError::NotADirectory { path } => {
                format!("'{}' is not a directory", path.display())
            }
            ClassifyError::IoError(e) => format!("A file system operation failed: {}", e),
            ClassifyError::TomlError(e) => format!("The config file is not valid TOML: {}", e),
            ClassifyError::InvalidConfigValueError { field, reason, .. } => {
                format!("Invalid setting '{}': {}", field, reason)
            }
            ClassifyError::MissingConfigError { field } => {
                format!("Required setting '{}' is missing", field)
            }
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::FileSystem => "Check that the path exists and that you have permission to read and write it",
            ErrorCategory::Configuration => "Review the config file and command-line options, then try again",
            ErrorCategory::Report => "Check the report path and format (csv or json)",
        }
    }
}

pub type Result<T> = std::result::Result<T, ClassifyError>;
