//! Error types for staffdir.
//!
//! This module defines all error types used throughout the staffdir crate,
//! providing detailed context for debugging and user-friendly error messages.

use std::path::PathBuf;
use thiserror::Error;

use crate::employee::EmployeeId;

/// The main error type for staffdir operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Storage Errors ===
    /// Failed to open or create the database.
    #[error("failed to open database at {path}: {source}")]
    DatabaseOpen {
        /// Path to the database file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: rusqlite::Error,
    },

    /// A database query failed.
    #[error("database query failed: {0}")]
    DatabaseQuery(#[from] rusqlite::Error),

    /// Failed to run database migrations.
    #[error("database migration failed: {message}")]
    DatabaseMigration {
        /// Description of what went wrong.
        message: String,
    },

    /// The store lock was poisoned by a panicking holder.
    #[error("store lock poisoned")]
    StoreLock,

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === Directory Errors ===
    /// No employee with the given identifier exists.
    #[error("employee {0} not found")]
    EmployeeNotFound(EmployeeId),

    /// Another employee already uses this phone number.
    #[error("phone number {phone} already belongs to employee {owner}")]
    DuplicatePhone {
        /// The colliding phone number in canonical form.
        phone: String,
        /// The employee that already owns it.
        owner: EmployeeId,
    },

    /// Another employee already uses this email address.
    #[error("email {email} already belongs to employee {owner}")]
    DuplicateEmail {
        /// The colliding email address.
        email: String,
        /// The employee that already owns it.
        owner: EmployeeId,
    },

    /// The largest numeric identifier cannot be incremented.
    #[error("no identifier left after {0}")]
    IdsExhausted(EmployeeId),

    /// The working copy failed field validation.
    #[error("invalid fields: {}", fields.join(", "))]
    Validation {
        /// Names of the invalid fields.
        fields: Vec<&'static str>,
    },

    /// An edit was submitted without changing any field.
    #[error("nothing to save: no field changed")]
    Unchanged,

    /// A value could not be parsed into a domain type.
    #[error("invalid {kind}: {value}")]
    Parse {
        /// What was being parsed.
        kind: &'static str,
        /// The offending input.
        value: String,
    },

    // === I/O Errors ===
    /// File system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to create a required directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Serialization Errors ===
    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // === Generic Errors ===
    /// An internal error occurred (bug).
    #[error("internal error: {0}")]
    Internal(String),
}

/// A specialized Result type for staffdir operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a new internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Create a parse error for the given kind of value.
    #[must_use]
    pub fn parse(kind: &'static str, value: impl Into<String>) -> Self {
        Self::Parse {
            kind,
            value: value.into(),
        }
    }

    /// Check if this error is a uniqueness collision on phone or email.
    #[must_use]
    pub fn is_duplicate(&self) -> bool {
        matches!(
            self,
            Self::DuplicatePhone { .. } | Self::DuplicateEmail { .. }
        )
    }

    /// Check if this error means the requested employee does not exist.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::EmployeeNotFound(_))
    }

    /// The i18n key of the message shown to the user for this error, if any.
    #[must_use]
    pub fn message_key(&self) -> Option<&'static str> {
        match self {
            Self::DuplicatePhone { .. } => Some("phoneExists"),
            Self::DuplicateEmail { .. } => Some("emailExists"),
            Self::EmployeeNotFound(_) => Some("employeeNotFound"),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_display() {
        let err = Error::EmployeeNotFound(EmployeeId::from(3));
        assert_eq!(err.to_string(), "employee 3 not found");
        assert!(err.is_not_found());
        assert!(!err.is_duplicate());
    }

    #[test]
    fn test_duplicate_phone_display() {
        let err = Error::DuplicatePhone {
            phone: "+905321234567".to_string(),
            owner: EmployeeId::from(7),
        };
        let msg = err.to_string();
        assert!(msg.contains("+905321234567"));
        assert!(msg.contains('7'));
        assert!(err.is_duplicate());
        assert_eq!(err.message_key(), Some("phoneExists"));
    }

    #[test]
    fn test_duplicate_email_message_key() {
        let err = Error::DuplicateEmail {
            email: "a@b.co".to_string(),
            owner: EmployeeId::from(1),
        };
        assert!(err.is_duplicate());
        assert_eq!(err.message_key(), Some("emailExists"));
    }

    #[test]
    fn test_validation_display_lists_fields() {
        let err = Error::Validation {
            fields: vec!["phone", "email"],
        };
        assert_eq!(err.to_string(), "invalid fields: phone, email");
        assert_eq!(err.message_key(), None);
    }

    #[test]
    fn test_unchanged_display() {
        assert_eq!(Error::Unchanged.to_string(), "nothing to save: no field changed");
    }

    #[test]
    fn test_parse_error() {
        let err = Error::parse("view mode", "grid");
        assert_eq!(err.to_string(), "invalid view mode: grid");
    }

    #[test]
    fn test_internal_error() {
        let err = Error::internal("something went wrong");
        assert_eq!(err.to_string(), "internal error: something went wrong");
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_from_rusqlite_error() {
        let result = rusqlite::Connection::open_with_flags(
            "/nonexistent/path/db.sqlite",
            rusqlite::OpenFlags::SQLITE_OPEN_READ_ONLY,
        );
        if let Err(sqlite_err) = result {
            let err: Error = sqlite_err.into();
            assert!(matches!(err, Error::DatabaseQuery(_)));
        }
    }

    #[test]
    fn test_from_json_error() {
        let json_result: std::result::Result<i32, serde_json::Error> =
            serde_json::from_str("not valid json");
        if let Err(json_err) = json_result {
            let err: Error = json_err.into();
            assert!(matches!(err, Error::Json(_)));
        }
    }

    #[test]
    fn test_database_migration_error_display() {
        let err = Error::DatabaseMigration {
            message: "version mismatch".to_string(),
        };
        assert!(err.to_string().contains("version mismatch"));
    }

    #[test]
    fn test_config_validation_error_display() {
        let err = Error::ConfigValidation {
            message: "page size".to_string(),
        };
        assert!(err.to_string().contains("page size"));
    }

    #[test]
    fn test_directory_create_error_display() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let err = Error::DirectoryCreate {
            path: PathBuf::from("/root/forbidden"),
            source: io_err,
        };
        assert!(err.to_string().contains("/root/forbidden"));
    }
}
