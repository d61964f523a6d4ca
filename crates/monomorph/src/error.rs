//! Error types for the generation engine.

use thiserror::Error;

/// Errors that abort a generation run.
///
/// There is no local recovery and no best-effort variant emission: a
/// generated unit has to be trustworthy as committed source, so every error
/// is a hard stop for the entire run. Line numbers are 1-based.
#[derive(Debug, Error)]
pub enum Error {
    /// A line starts with the directive marker but fails the grammar
    /// (unparsable replace count, malformed JSON payload, truncated form).
    #[error("line {line}: malformed directive: {message}")]
    DirectiveSyntax { line: usize, message: String },

    /// The expression evaluator rejected or failed to render a directive
    /// for at least one variant.
    #[error("line {line}: expression evaluation failed: {message}")]
    Evaluation { line: usize, message: String },

    /// Regenerating the unit with the identity configuration diverged from
    /// the original input. This indicates a bug in the directive content or
    /// the engine itself, never a property of a specific target variant.
    #[error("identity regeneration diverges from the source at line {line}")]
    RoundTrip { line: usize },
}

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, Error>;
