//! Engine error types.

use std::fmt;

/// Errors surfaced by the engine.
///
/// Factory errors abort only the operation that triggered them; the grid
/// is never left in a state that violates its invariants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// A block type name has no known mapping in the kind registry.
    InvalidBlockKind(String),
    /// A coordinate outside the grid dimensions was used without a prior
    /// bounds check. Programming-error class.
    OutOfBounds { row: usize, col: usize },
    /// Structural grid corruption detected mid-tick (e.g. a row whose
    /// length differs from the declared column count).
    Fault(String),
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::InvalidBlockKind(name) => {
                write!(f, "invalid block kind: {:?}", name)
            }
            EngineError::OutOfBounds { row, col } => {
                write!(f, "coordinate ({}, {}) is outside the grid", row, col)
            }
            EngineError::Fault(detail) => write!(f, "engine fault: {}", detail),
        }
    }
}

impl std::error::Error for EngineError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_formats() {
        let e = EngineError::InvalidBlockKind("FrobVisualBlock".to_string());
        assert!(e.to_string().contains("FrobVisualBlock"));

        let e = EngineError::OutOfBounds { row: 9, col: 2 };
        assert!(e.to_string().contains("(9, 2)"));
    }
}
