//! # Error Handling
//!
//! Provides the unified `AppError` enum used across the workspace.
//!
//! Schema generation itself never fails; errors only surface from status-code
//! parsing, file loading and serialization.

use derive_more::{Display, From};

/// The Global Error Enum.
///
/// We use `derive_more` for boilerplate.
/// Note: String errors default to `General`.
#[derive(Debug, Display, From)]
pub enum AppError {
    /// Wrapper for standard IO errors.
    #[display("IO Error: {_0}")]
    Io(std::io::Error),

    /// JSON (de)serialization failure.
    #[display("JSON Error: {_0}")]
    Json(serde_json::Error),

    /// YAML (de)serialization failure.
    #[display("YAML Error: {_0}")]
    Yaml(serde_yaml::Error),

    /// A status-code key that is not a decimal integer.
    #[display("Invalid status code: {_0}")]
    StatusCode(std::num::ParseIntError),

    /// Generic errors.
    #[display("General Error: {_0}")]
    General(String),
}

/// Manual implementation of the standard Error trait.
impl std::error::Error for AppError {}

/// Helper type alias for Result using AppError.
pub type AppResult<T> = Result<T, AppError>;
