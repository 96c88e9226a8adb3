use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProFormaError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration validation failed for {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("RPC '{function}' returned HTTP {status}: {message}")]
    RpcError {
        function: String,
        status: u16,
        message: String,
    },

    #[error("Contract violation: {message}")]
    ContractError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Data,
    Configuration,
    Remote,
    Contract,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ProFormaError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ApiError(_) | Self::IoError(_) => ErrorCategory::Network,
            Self::SerializationError(_) => ErrorCategory::Data,
            Self::ConfigError { .. }
            | Self::MissingConfigError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::ConfigValidationError { .. } => ErrorCategory::Configuration,
            Self::RpcError { .. } => ErrorCategory::Remote,
            Self::ContractError { .. } => ErrorCategory::Contract,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::ContractError { .. } => ErrorSeverity::Low,
            Self::ApiError(_) => ErrorSeverity::Medium,
            Self::RpcError { status, .. } if *status >= 500 => ErrorSeverity::Medium,
            Self::RpcError { .. } | Self::SerializationError(_) => ErrorSeverity::High,
            Self::IoError(_)
            | Self::ConfigError { .. }
            | Self::MissingConfigError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::ConfigValidationError { .. } => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            Self::ApiError(e) if e.is_timeout() => {
                "The service did not answer in time; raise service.timeout_seconds or retry later"
                    .to_string()
            }
            Self::ApiError(_) => "Check network connectivity and the service base URL".to_string(),
            Self::IoError(_) => "Check that the file exists and is readable".to_string(),
            Self::SerializationError(_) => {
                "The response did not match the expected shape; check the RPC function version"
                    .to_string()
            }
            Self::ConfigError { .. } | Self::ConfigValidationError { .. } => {
                "Review the configuration file".to_string()
            }
            Self::MissingConfigError { field } => {
                format!("Set '{}' in the configuration file or on the command line", field)
            }
            Self::InvalidConfigValueError { field, .. } => {
                format!("Correct the value of '{}'", field)
            }
            Self::RpcError { status: 401, .. } | Self::RpcError { status: 403, .. } => {
                "Check the API key (service.api_key)".to_string()
            }
            Self::RpcError { status: 404, function, .. } => {
                format!("Make sure the '{}' function is deployed", function)
            }
            Self::RpcError { .. } => "Inspect the remote function logs".to_string(),
            Self::ContractError { .. } => {
                "Compare the remote function with the local engine output".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Network => format!("Could not reach the service: {}", self),
            ErrorCategory::Data => format!("Unexpected data: {}", self),
            ErrorCategory::Configuration => format!("Configuration problem: {}", self),
            ErrorCategory::Remote => format!("The remote function failed: {}", self),
            ErrorCategory::Contract => format!("{}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, ProFormaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rpc_error_severity_depends_on_status() {
        let server_side = ProFormaError::RpcError {
            function: "calc_irr".to_string(),
            status: 503,
            message: "unavailable".to_string(),
        };
        let client_side = ProFormaError::RpcError {
            function: "calc_irr".to_string(),
            status: 400,
            message: "bad request".to_string(),
        };

        assert_eq!(server_side.severity(), ErrorSeverity::Medium);
        assert_eq!(client_side.severity(), ErrorSeverity::High);
        assert_eq!(server_side.category(), ErrorCategory::Remote);
    }

    #[test]
    fn test_recovery_suggestion_names_missing_field() {
        let err = ProFormaError::MissingConfigError {
            field: "service.base_url".to_string(),
        };
        assert!(err.recovery_suggestion().contains("service.base_url"));
        assert_eq!(err.severity(), ErrorSeverity::Critical);
    }

    #[test]
    fn test_unauthorized_points_at_api_key() {
        let err = ProFormaError::RpcError {
            function: "get_default_costs".to_string(),
            status: 401,
            message: "Invalid API key".to_string(),
        };
        assert!(err.recovery_suggestion().contains("api_key"));
        assert!(err.user_friendly_message().contains("Invalid API key"));
    }
}
