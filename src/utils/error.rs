use thiserror::Error;

#[derive(Error, Debug)]
pub enum MigrateError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Source file not found: {path}")]
    SourceNotFound { path: String },

    #[error("Source file is not a valid JSON array: {path}: {reason}")]
    SourceParseError { path: String, reason: String },

    #[error("API is unreachable: {reason}")]
    ApiUnreachable { reason: String },

    #[error("Access key rejected by the API: {message}")]
    AccessKeyRejected { message: String },

    #[error("Configuration error: {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid configuration value for {field} ('{value}'): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration field: {field}")]
    MissingConfigError { field: String },
}

pub type Result<T> = std::result::Result<T, MigrateError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Source,
    Auth,
    Config,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl MigrateError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            MigrateError::ApiError(_) | MigrateError::ApiUnreachable { .. } => {
                ErrorCategory::Network
            }
            MigrateError::SourceNotFound { .. } | MigrateError::SourceParseError { .. } => {
                ErrorCategory::Source
            }
            MigrateError::AccessKeyRejected { .. } => ErrorCategory::Auth,
            MigrateError::ConfigValidationError { .. }
            | MigrateError::InvalidConfigValueError { .. }
            | MigrateError::MissingConfigError { .. } => ErrorCategory::Config,
            MigrateError::IoError(_) | MigrateError::SerializationError(_) => {
                ErrorCategory::System
            }
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Config => ErrorSeverity::Medium,
            ErrorCategory::Network | ErrorCategory::Source | ErrorCategory::Auth => {
                ErrorSeverity::High
            }
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            MigrateError::ApiError(_) | MigrateError::ApiUnreachable { .. } => {
                "Check that the API base URL is correct and the service is running".to_string()
            }
            MigrateError::SourceNotFound { path } => {
                format!("Make sure '{}' exists relative to the data directory", path)
            }
            MigrateError::SourceParseError { .. } => {
                "The source file must contain a top-level JSON array of records".to_string()
            }
            MigrateError::AccessKeyRejected { .. } => {
                "Verify the access key and make sure users were migrated first".to_string()
            }
            MigrateError::ConfigValidationError { .. }
            | MigrateError::InvalidConfigValueError { .. }
            | MigrateError::MissingConfigError { .. } => {
                "Fix the migration TOML file and re-run".to_string()
            }
            MigrateError::IoError(_) | MigrateError::SerializationError(_) => {
                "Check file permissions and available disk space".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            MigrateError::ApiUnreachable { reason } => {
                format!("Cannot connect to the API: {}", reason)
            }
            MigrateError::AccessKeyRejected { message } => {
                format!("Authentication failed: {}", message)
            }
            MigrateError::SourceNotFound { path } => {
                format!("Source file not found: {}", path)
            }
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_precondition_errors_are_high_severity() {
        let err = MigrateError::SourceNotFound {
            path: "users.json".to_string(),
        };
        assert_eq!(err.severity(), ErrorSeverity::High);
        assert_eq!(err.category(), ErrorCategory::Source);

        let err = MigrateError::ApiUnreachable {
            reason: "connection refused".to_string(),
        };
        assert_eq!(err.severity(), ErrorSeverity::High);

        let err = MigrateError::AccessKeyRejected {
            message: "invalid key".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Auth);
    }

    #[test]
    fn test_config_errors_are_medium_severity() {
        let err = MigrateError::ConfigValidationError {
            field: "migration.base_url".to_string(),
            message: "empty".to_string(),
        };
        assert_eq!(err.severity(), ErrorSeverity::Medium);
    }
}
