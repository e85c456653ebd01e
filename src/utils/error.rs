//! Custom error types for cert-watch
//!
//! This module defines domain-specific error types using `thiserror` for
//! the failure modes of connection evaluation, pin storage, certificate
//! decoding and configuration loading.

use thiserror::Error;

/// Top-level error type for the cert-watch application
#[derive(Error, Debug)]
pub enum ToolkitError {
    #[error("Evaluation error: {0}")]
    Evaluation(#[from] EvaluationError),

    #[error("Certificate store error: {0}")]
    Store(#[from] StoreError),

    #[error("Certificate error: {0}")]
    Certificate(#[from] CertificateError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Output error: {0}")]
    Output(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while evaluating a single connection
#[derive(Error, Debug)]
pub enum EvaluationError {
    #[error("Cannot extract host from URL: {url}")]
    UrlParse { url: String },

    #[error("Certificate store failed: {0}")]
    Store(#[from] StoreError),

    #[error("Evaluation task aborted: {message}")]
    Aborted { message: String },
}

/// Pin storage errors
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Failed to read certificate store {path}: {message}")]
    ReadFailed { path: String, message: String },

    #[error("Failed to write certificate store {path}: {message}")]
    WriteFailed { path: String, message: String },

    #[error("Corrupt certificate store {path}: {message}")]
    Corrupt { path: String, message: String },

    #[error("Certificate store lock poisoned")]
    Poisoned,

    #[error("No certificate pinned for {host}")]
    NotFound { host: String },
}

/// Certificate decoding errors
#[derive(Error, Debug)]
pub enum CertificateError {
    #[error("Failed to read certificate file {path}: {message}")]
    FileReadError { path: String, message: String },

    #[error("Unsupported certificate format: {format}")]
    UnsupportedFormat { format: String },

    #[error("Failed to parse certificate: {message}")]
    ParseError { message: String },

    #[error("Invalid certificate time: {message}")]
    InvalidTime { message: String },
}

/// Configuration loading errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {path}")]
    FileNotFound { path: String },

    #[error("Failed to parse configuration: {message}")]
    ParseError { message: String },

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Result type alias using ToolkitError
pub type Result<T> = std::result::Result<T, ToolkitError>;
