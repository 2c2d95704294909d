//! Error types for Stevedore
//!
//! `StevedoreError` is the crate-wide failure taxonomy; `DeployError` covers
//! transport-level failures behind the [`crate::deploy::DeployTarget`] seam
//! and is what the retry loop swallows between attempts.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for Stevedore operations
pub type StevedoreResult<T> = Result<T, StevedoreError>;

/// Main error type for Stevedore operations
#[derive(Error, Debug)]
pub enum StevedoreError {
    /// No resource mappings declared; nothing to deploy
    #[error("no deployment resources declared - add at least one [[deploy.resources]] entry")]
    NoResources,

    /// A mapping points at a directory that does not exist
    #[error("resource directory not found: {path}")]
    MissingDirectory { path: PathBuf },

    /// Staging directory missing or empty after copy (mapping/pattern mismatch)
    #[error("staging directory '{path}' is empty")]
    StagingEmpty { path: PathBuf },

    /// All retry attempts for a single deploy call failed
    #[error("{operation} failed after {attempts} attempts")]
    DeployExhausted {
        operation: String,
        attempts: u32,
        #[source]
        last: DeployError,
    },

    /// Deploy endpoint URL missing from config, env and flags
    #[error("deploy endpoint is not configured - set [app] url or STEVEDORE_APP_URL")]
    MissingUrl,

    /// Basic-auth credentials missing from env and flags
    #[error("deploy credentials are not configured - set STEVEDORE_DEPLOY_USERNAME and STEVEDORE_DEPLOY_PASSWORD")]
    MissingCredentials,

    /// Configuration file could not be parsed
    #[error("invalid configuration in {file}: {message}")]
    InvalidConfig { file: PathBuf, message: String },

    /// Include/exclude glob failed to compile
    #[error("invalid resource pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    /// Directory walk error
    #[error("walk error: {0}")]
    Walk(#[from] ignore::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Archive read/write error
    #[error("archive error: {0}")]
    Archive(#[from] zip::result::ZipError),
}

/// Transport-level failure from a deploy capability.
///
/// Every variant is retried uniformly - Kudu-style socket timeouts dominate
/// the failure distribution, so the retry loop does not classify.
#[derive(Error, Debug)]
pub enum DeployError {
    /// HTTP transport failure (connect, timeout, TLS, ...)
    #[error("HTTP transport error: {0}")]
    Http(#[from] reqwest::Error),

    /// Endpoint answered with a non-success status
    #[error("deploy endpoint returned {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },

    /// Local IO failure while reading the artifact
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
