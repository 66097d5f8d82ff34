use crate::morphology::NodeId;

/// Result type for morphology operations
pub type Result<T> = std::result::Result<T, MorphError>;

/// Errors raised when a tree or a parameter breaks a precondition
#[derive(Debug, thiserror::Error)]
pub enum MorphError {
    #[error("Invalid tree structure: {0}")]
    InvalidTreeStructure(String),

    #[error("Node {0} has an empty section")]
    EmptySection(NodeId),

    #[error("Node {node} has a non-finite sample at index {sample}")]
    NonFiniteSample { node: NodeId, sample: usize },

    #[error("Unknown node: {0}")]
    UnknownNode(NodeId),

    #[error("Invalid tolerance: {0}")]
    InvalidTolerance(f64),

    #[error("Invalid spacing: horizontal spacing must be positive and finite, got {0}")]
    InvalidSpacing(f64),

    #[error("Invalid scale: {0}")]
    InvalidScale(f64),

    #[error("Polygon buffer mismatch: expected {expected}, emitted {actual}")]
    BufferMismatch { expected: usize, actual: usize },
}

/// Tolerances are compared with `<`/`<=`, so only non-negative finite values make sense.
pub(crate) fn ensure_tolerance(tol: f64) -> Result<f64> {
    if tol.is_finite() && tol >= 0.0 {
        Ok(tol)
    } else {
        Err(MorphError::InvalidTolerance(tol))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_negative_and_nan_tolerance() {
        assert!(ensure_tolerance(0.0).is_ok());
        assert!(ensure_tolerance(1e-3).is_ok());
        assert!(matches!(
            ensure_tolerance(-1.0),
            Err(MorphError::InvalidTolerance(_))
        ));
        assert!(ensure_tolerance(f64::NAN).is_err());
        assert!(ensure_tolerance(f64::INFINITY).is_err());
    }

    #[test]
    fn messages_name_the_problem() {
        let err = MorphError::InvalidTreeStructure("node 3 visited twice".to_string());
        assert_eq!(err.to_string(), "Invalid tree structure: node 3 visited twice");

        let err = MorphError::BufferMismatch {
            expected: 4,
            actual: 3,
        };
        assert_eq!(
            err.to_string(),
            "Polygon buffer mismatch: expected 4, emitted 3"
        );
    }
}
