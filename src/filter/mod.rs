//! Host filtering
//!
//! Decides which hosts are exempt from certificate pinning.

pub mod domain;

pub use domain::is_ignored;
