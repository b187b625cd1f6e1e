//! Error types for the helping-hand-rs library.
//!
//! Operation-level failures (`HelpingHandError`) abort an operation before it
//! mutates anything. Per-object rename failures (`RenameError`) are reported
//! by the host repository and collected as warnings by batch operations.

use std::io;

use thiserror::Error;

/// Main result type for helping-hand operations.
pub type Result<T> = std::result::Result<T, HelpingHandError>;

/// Reasons a host refuses to rename a single object.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RenameError {
    /// The object is linked, library-owned or otherwise locked by the host
    #[error("object '{name}' is protected")]
    Protected {
        /// Current name of the object
        name: String,
    },

    /// The requested name is not accepted by the host
    #[error("invalid name '{requested}': {reason}")]
    InvalidName {
        /// Name that was rejected
        requested: String,
        /// Why the host rejected it
        reason: String,
    },

    /// Another object already carries the requested name
    #[error("name '{requested}' is already used by another object")]
    NameTaken {
        /// Name that was requested
        requested: String,
    },

    /// The object handle no longer resolves
    #[error("object #{id} does not exist")]
    UnknownObject {
        /// Raw object handle
        id: u64,
    },
}

/// Error type for all helping-hand operations.
#[derive(Error, Debug)]
pub enum HelpingHandError {
    /// A similarity query needs data the active object does not carry
    #[error("Cannot compute similarity for '{object}': {reason}")]
    CannotCompute {
        /// Name of the object the query was made for
        object: String,
        /// What was missing
        reason: String,
    },

    /// The operation needs selected objects and there are none
    #[error("{operation}: no objects selected")]
    EmptySelection {
        /// Operation that was attempted
        operation: String,
    },

    /// The operation needs an active object and there is none
    #[error("{operation}: no active object")]
    NoActiveObject {
        /// Operation that was attempted
        operation: String,
    },

    /// A rename that could not be recorded as a per-object warning
    #[error("Rename error: {0}")]
    Rename(#[from] RenameError),

    /// An object handle did not resolve in the repository
    #[error("Unknown object: {id}")]
    UnknownObject {
        /// Name or handle that was looked up
        id: String,
    },

    /// The host repository refused an operation
    #[error("Repository error: {message}")]
    Repository {
        /// Error description
        message: String,
        /// Object involved, if any
        object: Option<String>,
    },

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Config {
        /// Error description
        message: String,
        /// Configuration field that caused the error
        field: Option<String>,
    },

    /// Validation errors for input data
    #[error("Validation error: {message}")]
    Validation {
        /// Error description
        message: String,
        /// Field or input that failed validation
        field: Option<String>,
        /// Expected value or format
        expected: Option<String>,
        /// Actual value received
        actual: Option<String>,
    },

    /// I/O related errors
    #[error("I/O error: {message}")]
    Io {
        /// Human-readable error message
        message: String,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// Serialization/deserialization errors
    #[error("Serialization error: {message}")]
    Serialization {
        /// Error description
        message: String,
        /// Data format being handled
        data_type: Option<String>,
        /// Underlying serialization error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl HelpingHandError {
    /// Create a new cannot-compute error
    pub fn cannot_compute(object: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::CannotCompute {
            object: object.into(),
            reason: reason.into(),
        }
    }

    /// Create a new empty-selection error
    pub fn empty_selection(operation: impl Into<String>) -> Self {
        Self::EmptySelection {
            operation: operation.into(),
        }
    }

    /// Create a new no-active-object error
    pub fn no_active_object(operation: impl Into<String>) -> Self {
        Self::NoActiveObject {
            operation: operation.into(),
        }
    }

    /// Create a new unknown-object error
    pub fn unknown_object(id: impl Into<String>) -> Self {
        Self::UnknownObject { id: id.into() }
    }

    /// Create a new repository error
    pub fn repository(message: impl Into<String>) -> Self {
        Self::Repository {
            message: message.into(),
            object: None,
        }
    }

    /// Create a new repository error naming the object involved
    pub fn repository_object(message: impl Into<String>, object: impl Into<String>) -> Self {
        Self::Repository {
            message: message.into(),
            object: Some(object.into()),
        }
    }

    /// Create a new I/O error with context
    pub fn io(message: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Create a new configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            field: None,
        }
    }

    /// Create a new configuration error with field context
    pub fn config_field(message: impl Into<String>, field: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            field: Some(field.into()),
        }
    }

    /// Create a new validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            field: None,
            expected: None,
            actual: None,
        }
    }

    /// Create a new validation error describing the offending field
    pub fn validation_field(
        message: impl Into<String>,
        field: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self::Validation {
            message: message.into(),
            field: Some(field.into()),
            expected: Some(expected.into()),
            actual: Some(actual.into()),
        }
    }

    /// Add context to an existing error
    ///
    /// Message-carrying variants get the context prefixed; a repository error
    /// without an object records the context as the object.
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        match &mut self {
            Self::Io { message, .. }
            | Self::Serialization { message, .. }
            | Self::Config { message, .. }
            | Self::Validation { message, .. } => {
                *message = format!("{}: {message}", context.into());
            }
            Self::Repository { object, .. } if object.is_none() => {
                *object = Some(context.into());
            }
            _ => {}
        }
        self
    }
}

impl From<io::Error> for HelpingHandError {
    fn from(err: io::Error) -> Self {
        Self::io(err.to_string(), err)
    }
}

impl From<serde_json::Error> for HelpingHandError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            message: format!("JSON serialization failed: {err}"),
            data_type: Some("JSON".to_string()),
            source: Some(Box::new(err)),
        }
    }
}

impl From<serde_yaml::Error> for HelpingHandError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Serialization {
            message: format!("YAML serialization failed: {err}"),
            data_type: Some("YAML".to_string()),
            source: Some(Box::new(err)),
        }
    }
}

/// Result extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error result
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;

    /// Add static context to an error result
    fn context(self, msg: &'static str) -> Result<T>;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Into<HelpingHandError>,
{
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| e.into().with_context(f()))
    }

    fn context(self, msg: &'static str) -> Result<T> {
        self.map_err(|e| e.into().with_context(msg))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = HelpingHandError::cannot_compute("Empty", "object has no mesh data");
        assert!(matches!(err, HelpingHandError::CannotCompute { .. }));

        let err = HelpingHandError::empty_selection("batch rename");
        assert!(matches!(err, HelpingHandError::EmptySelection { .. }));
    }

    #[test]
    fn test_rename_error_conversion() {
        let err: HelpingHandError = RenameError::NameTaken {
            requested: "Cube".to_string(),
        }
        .into();

        if let HelpingHandError::Rename(RenameError::NameTaken { requested }) = err {
            assert_eq!(requested, "Cube");
        } else {
            panic!("Expected Rename error");
        }
    }

    #[test]
    fn test_rename_error_display() {
        let err = RenameError::Protected {
            name: "Linked.Rock".to_string(),
        };
        assert_eq!(err.to_string(), "object 'Linked.Rock' is protected");

        let err = RenameError::InvalidName {
            requested: String::new(),
            reason: "name is empty".to_string(),
        };
        assert!(err.to_string().contains("name is empty"));
    }

    #[test]
    fn test_error_with_context() {
        let err = HelpingHandError::config("unknown field `padd`").with_context("rename section");

        assert_eq!(
            err.to_string(),
            "Configuration error: rename section: unknown field `padd`"
        );
    }

    #[test]
    fn test_repository_context_fills_object() {
        let err = HelpingHandError::repository("collection not found").with_context("Cube");

        if let HelpingHandError::Repository { object, .. } = err {
            assert_eq!(object, Some("Cube".to_string()));
        } else {
            panic!("Expected Repository error");
        }
    }

    #[test]
    fn test_config_field_error() {
        let err = HelpingHandError::config_field("Invalid value", "rename.padding");

        if let HelpingHandError::Config { message, field } = err {
            assert_eq!(message, "Invalid value");
            assert_eq!(field, Some("rename.padding".to_string()));
        } else {
            panic!("Expected Config error");
        }
    }

    #[test]
    fn test_result_extension() {
        let result: std::result::Result<i32, std::io::Error> = Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "File not found",
        ));

        let converted = result.context("Failed to read scene file");
        match converted {
            Err(HelpingHandError::Io { message, .. }) => {
                assert_eq!(message, "Failed to read scene file: File not found");
            }
            other => panic!("Expected Io error, got {other:?}"),
        }
    }

    #[test]
    fn test_from_yaml_error() {
        let yaml_err = serde_yaml::from_str::<i32>("invalid: yaml: content").unwrap_err();
        let err: HelpingHandError = yaml_err.into();

        if let HelpingHandError::Serialization { data_type, .. } = err {
            assert_eq!(data_type, Some("YAML".to_string()));
        } else {
            panic!("Expected Serialization error");
        }
    }
}
