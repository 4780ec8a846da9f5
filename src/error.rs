//! Error types for xmlrender
//!
//! This module defines all error types used throughout the library.
//! Only two conditions abort a render: a date met under an unknown date format and
//! a value kind with no XML mapping. Everything else is loading or I/O failure.

use thiserror::Error;

/// Result type alias using xmlrender Error
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for xmlrender operations
#[derive(Error, Debug)]
pub enum Error {
    /// A date value was rendered while the configured date format is not ISO, SQL or JS
    #[error("{key} contained unknown_date_format: {format}")]
    UnknownDateFormat {
        /// Key whose value was the date
        key: String,
        /// The configured format name
        format: String,
    },

    /// A value kind that has no XML representation
    #[error("{key} contained unknown_data_type: {type_label}")]
    UnknownDataType {
        /// Key whose value could not be mapped
        key: String,
        /// Type label of the offending value
        type_label: String,
    },

    /// Malformed schema definition
    #[error("schema error: {0}")]
    Schema(String),

    /// Malformed configuration overlay
    #[error("config error: {0}")]
    Config(String),

    /// Limit exceeded error
    #[error("limit exceeded: {0}")]
    LimitExceeded(String),

    /// XML writing error
    #[error("XML error: {0}")]
    Xml(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON input error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Key named by a fatal render error, if any
    pub fn key(&self) -> Option<&str> {
        match self {
            Error::UnknownDateFormat { key, .. } | Error::UnknownDataType { key, .. } => Some(key),
            _ => None,
        }
    }
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::Xml(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_date_format_display() {
        let err = Error::UnknownDateFormat {
            key: "created".to_string(),
            format: "RFC".to_string(),
        };

        let msg = format!("{}", err);
        assert!(msg.contains("created"));
        assert!(msg.contains("unknown_date_format"));
        assert_eq!(err.key(), Some("created"));
    }

    #[test]
    fn test_unknown_data_type_display() {
        let err = Error::UnknownDataType {
            key: "callback".to_string(),
            type_label: "function".to_string(),
        };

        let msg = format!("{}", err);
        assert_eq!(msg, "callback contained unknown_data_type: function");
    }

    #[test]
    fn test_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: Error = json_err.into();
        assert!(matches!(err, Error::Json(_)));
        assert!(err.key().is_none());
    }
}
