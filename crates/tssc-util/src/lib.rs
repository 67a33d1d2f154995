//! # tssc util
//!
//! Algebraic absence and error types used across the tssc workspace:
//! [`Maybe`] for optional values and [`Either`] for error-or-value results.
//! Both are immutable sum types consumed through combinators, with narrow
//! conversions to `Option`, `Result`, serde and futures at the boundaries.

pub mod either;
pub mod maybe;

pub use either::Either;
pub use maybe::{Absent, Maybe};
