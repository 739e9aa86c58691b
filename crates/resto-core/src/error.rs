//! Error type for invalid primitive values.
//!
//! Higher crates keep their own error enums; `CoreError` only covers the
//! checks that live next to the primitives themselves.

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum CoreError {
    #[error("time value {0} is not a finite, non-negative number")]
    InvalidTime(f64),

    #[error("invalid size range {lo}..={hi}")]
    InvalidRange { lo: u32, hi: u32 },
}

/// Shorthand result type for `resto-core`.
pub type CoreResult<T> = Result<T, CoreError>;
