//! Utility modules for cert-watch
//!
//! This module contains the error types shared across the crate.

pub mod error;

pub use error::{
    CertificateError, ConfigError, EvaluationError, Result, StoreError, ToolkitError,
};
