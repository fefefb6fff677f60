//! Error types for the session crate
//!
//! Provides custom error types for session functionality including settings
//! persistence, record-store access, and engine interaction. Nothing in here
//! is allowed to escape [`crate::session::BoardSessionController`] as an
//! unhandled fault: the controller converts every error into a user-visible
//! message or a silently discarded stale result.

use thiserror::Error;

/// Errors that can occur while driving a game session
#[derive(Error, Debug)]
pub enum SessionError {
    /// Settings file I/O error
    #[error("Settings I/O error: {0}")]
    SettingsIo(#[from] std::io::Error),

    /// Settings serialization/deserialization error
    #[error("Settings serialization error: {0}")]
    SettingsSerialization(#[from] serde_json::Error),

    /// The durable record store rejected an operation
    #[error("Record store error: {message}")]
    RecordStore { message: String },
}

/// Result type alias for session operations
pub type SessionResult<T> = Result<T, SessionError>;
