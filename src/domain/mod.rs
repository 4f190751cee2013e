//! Domain model for finstr
//!
//! This module contains core domain types and errors that provide:
//! - Compile-time safety via newtype pattern
//! - Self-documenting function signatures
//! - Structured error handling with explicit severity

pub mod errors;
pub mod types;

// Re-export common types for convenience
pub use types::{CallAddress, Timestamp};

pub use errors::{MatchError, PipelineError, ResolveError, Severity, SymbolError};
