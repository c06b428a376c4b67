use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    #[error("Product lookup unavailable: {message}")]
    LookupUnavailable { message: String },

    #[error("Invalid product data received: {message}")]
    LookupInvalidResponse { message: String },

    #[error("User not found: {mobile}")]
    UserNotFound { mobile: String },

    #[error("A user with {field} '{value}' already exists")]
    DuplicateUser { field: String, value: String },

    #[error("Validation error in {field}: {message}")]
    ValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Lookup,
    User,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl AppError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ValidationError {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidInput { .. } | Self::ValidationError { .. } => ErrorCategory::Input,
            Self::LookupUnavailable { .. } | Self::LookupInvalidResponse { .. } => {
                ErrorCategory::Lookup
            }
            Self::UserNotFound { .. } | Self::DuplicateUser { .. } => ErrorCategory::User,
            Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. }
            | Self::ConfigError { .. } => ErrorCategory::Configuration,
            Self::IoError(_) | Self::SerializationError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::UserNotFound { .. } | Self::DuplicateUser { .. } => ErrorSeverity::High,
            Self::InvalidInput { .. } | Self::ValidationError { .. } => ErrorSeverity::High,
            Self::LookupUnavailable { .. } => ErrorSeverity::Medium,
            Self::LookupInvalidResponse { .. } => ErrorSeverity::High,
            Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. }
            | Self::ConfigError { .. } => ErrorSeverity::High,
            Self::IoError(_) | Self::SerializationError(_) => ErrorSeverity::Critical,
        }
    }

    /// Only transient network and filesystem failures are worth retrying.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::LookupUnavailable { .. } | Self::IoError(_))
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::InvalidInput { .. } => "Provide both a user profile and a product before checking",
            Self::LookupUnavailable { .. } => {
                "Check your network connection and try the scan again"
            }
            Self::LookupInvalidResponse { .. } => {
                "The product database returned unexpected data; try another product"
            }
            Self::UserNotFound { .. } => "Register first with the `register` command",
            Self::DuplicateUser { .. } => {
                "Pick another username, or use `profile` / `update-profile` for the existing user"
            }
            Self::ValidationError { .. } => "Correct the highlighted field and retry",
            Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. }
            | Self::ConfigError { .. } => "Review the configuration file and command-line flags",
            Self::IoError(_) => "Check that the user store path exists and is writable",
            Self::SerializationError(_) => "The user store file may be corrupted; restore a backup",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::InvalidInput { message } => format!("Cannot check product safety: {}", message),
            Self::LookupUnavailable { .. } => {
                "Failed to fetch product data. The product database could not be reached."
                    .to_string()
            }
            Self::LookupInvalidResponse { .. } => {
                "The product database returned data we could not understand.".to_string()
            }
            Self::UserNotFound { .. } => "User not found. Please register first.".to_string(),
            Self::DuplicateUser { field, .. } => {
                format!("A user with this {} already exists.", field)
            }
            Self::ValidationError { field, message } => format!("{}: {}", field, message),
            Self::InvalidConfigValueError { field, reason, .. } => {
                format!("Configuration value for {} is invalid: {}", field, reason)
            }
            Self::MissingConfigError { field } => {
                format!("Configuration is missing {}", field)
            }
            Self::ConfigError { message } => format!("Configuration problem: {}", message),
            Self::IoError(_) => "Could not read or write the user store.".to_string(),
            Self::SerializationError(_) => "The user store could not be parsed.".to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
