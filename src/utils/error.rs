use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClinicError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Storage error: {message}")]
    StorageError { message: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },

    #[error("Doctor not found: {surname} {name}")]
    DoctorNotFound { surname: String, name: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },
}

/// 錯誤分類，決定 HTTP 狀態碼與 CLI 退出碼
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    NotFound,
    Storage,
    Configuration,
}

impl ClinicError {
    pub fn validation(message: impl Into<String>) -> Self {
        ClinicError::ValidationError {
            message: message.into(),
        }
    }

    pub fn not_found(surname: &str, name: &str) -> Self {
        ClinicError::DoctorNotFound {
            surname: surname.to_string(),
            name: name.to_string(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            ClinicError::ValidationError { .. } => ErrorCategory::Validation,
            ClinicError::DoctorNotFound { .. } => ErrorCategory::NotFound,
            ClinicError::IoError(_)
            | ClinicError::SerializationError(_)
            | ClinicError::StorageError { .. } => ErrorCategory::Storage,
            ClinicError::ConfigError { .. }
            | ClinicError::ConfigValidationError { .. }
            | ClinicError::InvalidConfigValueError { .. }
            | ClinicError::MissingConfigError { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self.category() {
            ErrorCategory::Validation => 2,
            ErrorCategory::NotFound => 4,
            ErrorCategory::Storage | ErrorCategory::Configuration => 1,
        }
    }

    /// 給終端使用者看的訊息，不含內部細節
    pub fn user_friendly_message(&self) -> String {
        match self {
            ClinicError::ValidationError { message } => message.clone(),
            ClinicError::DoctorNotFound { .. } => "doctor not found".to_string(),
            ClinicError::IoError(_)
            | ClinicError::SerializationError(_)
            | ClinicError::StorageError { .. } => {
                "The catalog file could not be read or written".to_string()
            }
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Validation => "Check the request data; a doctor can have at most 10 patients",
            ErrorCategory::NotFound => "Check the surname and name of the doctor",
            ErrorCategory::Storage => {
                "Check that the catalog file exists, is valid JSON and is writable"
            }
            ErrorCategory::Configuration => "Check the configuration file and command line flags",
        }
    }
}

pub type Result<T> = std::result::Result<T, ClinicError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categories() {
        assert_eq!(
            ClinicError::validation("too many patients").category(),
            ErrorCategory::Validation
        );
        assert_eq!(
            ClinicError::not_found("Ivanov", "Petr").category(),
            ErrorCategory::NotFound
        );
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        assert_eq!(ClinicError::from(io).category(), ErrorCategory::Storage);
    }

    #[test]
    fn test_not_found_message() {
        let err = ClinicError::not_found("Ivanov", "Petr");
        assert_eq!(err.to_string(), "Doctor not found: Ivanov Petr");
        assert_eq!(err.user_friendly_message(), "doctor not found");
        assert_eq!(err.exit_code(), 4);
    }
}
