//! Error types shared by the Skyboard crates.
//!
//! `Display` carries the detail for logs; `user_message()` is the one line
//! printed to the terminal.

use thiserror::Error;

/// Anything that stops the `skyboard` binary before it can print a report.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Network error: {0}")]
    Network(#[from] NetworkError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

impl AppError {
    pub fn user_message(&self) -> &'static str {
        match self {
            AppError::Network(e) => e.user_message(),
            AppError::Config(e) => e.user_message(),
            AppError::Storage(e) => e.user_message(),
        }
    }
}

/// Transport-level failures talking to the weather API or the file host.
#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Server error: {status} - {message}")]
    ServerError { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl NetworkError {
    pub fn user_message(&self) -> &'static str {
        match self {
            NetworkError::ConnectionFailed(_) => "Could not reach the weather service. Check your connection.",
            NetworkError::Timeout => "The weather service took too long to answer.",
            NetworkError::ServerError { status, .. } if *status >= 500 => {
                "The weather service is down. Try again later."
            }
            NetworkError::ServerError { .. } => "The weather service rejected the request.",
            NetworkError::InvalidResponse(_) => "The weather service sent something unreadable.",
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file exists but could not be read or parsed
    #[error("Cannot load configuration: {0}")]
    Unreadable(String),

    /// The file parsed but failed validation
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

impl ConfigError {
    pub fn user_message(&self) -> &'static str {
        match self {
            ConfigError::Unreadable(_) => {
                "Config file could not be read. Run `skyboard config` to see its path."
            }
            ConfigError::Invalid(_) => "Config file has invalid settings. Run `skyboard config`.",
        }
    }
}

/// Local key/value storage errors (cache directory, cache payloads).
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Storage unavailable at {path}: {message}")]
    Unavailable { path: String, message: String },

    #[error("Failed to read key {key}: {message}")]
    ReadFailed { key: String, message: String },

    #[error("Failed to write key {key}: {message}")]
    WriteFailed { key: String, message: String },

    #[error("Corrupt value for key {key}: {message}")]
    Corrupt { key: String, message: String },
}

impl StorageError {
    pub fn user_message(&self) -> &'static str {
        match self {
            StorageError::Unavailable { .. } => {
                "Local cache directory is unavailable. Check permissions."
            }
            StorageError::ReadFailed { .. } => "Cached weather could not be read.",
            StorageError::WriteFailed { .. } => "Weather could not be saved for later.",
            StorageError::Corrupt { .. } => "Cached weather is damaged and will be replaced.",
        }
    }
}

/// Classify a reqwest failure as a [`NetworkError`].
pub trait ReqwestErrorExt {
    fn into_network_error(self) -> NetworkError;
}

impl ReqwestErrorExt for reqwest::Error {
    fn into_network_error(self) -> NetworkError {
        if self.is_timeout() {
            NetworkError::Timeout
        } else if self.is_decode() {
            NetworkError::InvalidResponse(self.to_string())
        } else if let Some(status) = self.status() {
            NetworkError::ServerError {
                status: status.as_u16(),
                message: self.to_string(),
            }
        } else {
            NetworkError::ConnectionFailed(self.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_error_converts_to_app_error() {
        let storage_err = StorageError::Corrupt {
            key: "weatherCache".into(),
            message: "eof".into(),
        };
        let app_err: AppError = storage_err.into();
        assert!(matches!(app_err, AppError::Storage(StorageError::Corrupt { .. })));
        assert!(app_err.user_message().contains("damaged"));
    }

    #[test]
    fn test_config_errors_point_at_config_command() {
        let unreadable: AppError = ConfigError::Unreadable("expected `=`".into()).into();
        let invalid: AppError = ConfigError::Invalid("weather.cities: empty".into()).into();
        assert!(unreadable.user_message().contains("skyboard config"));
        assert!(invalid.user_message().contains("skyboard config"));
        assert!(invalid.to_string().contains("weather.cities"));
    }

    #[test]
    fn test_server_error_messages_split_on_5xx() {
        let upstream = NetworkError::ServerError {
            status: 503,
            message: "down".into(),
        };
        let client = NetworkError::ServerError {
            status: 404,
            message: "missing".into(),
        };
        assert!(upstream.user_message().contains("later"));
        assert!(!client.user_message().contains("later"));
    }

    #[test]
    fn test_storage_error_display_names_key() {
        let err = StorageError::WriteFailed {
            key: "weatherCacheTime".into(),
            message: "read-only".into(),
        };
        assert!(err.to_string().contains("weatherCacheTime"));
    }
}
