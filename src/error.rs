//! Error types for the frame solver

use thiserror::Error;

/// Main error type for frame analysis operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FrameError {
    #[error("Node '{0}' not found in model")]
    NodeNotFound(String),

    #[error("Element '{0}' not found in model")]
    ElementNotFound(String),

    #[error("Load case '{0}' not found in model")]
    LoadCaseNotFound(String),

    #[error("Load combination '{0}' not found in model")]
    LoadCombinationNotFound(String),

    #[error("Duplicate name '{0}' already exists")]
    DuplicateName(String),

    #[error("Nodes '{0}' and '{1}' share the same position")]
    DuplicateNodePosition(String, String),

    #[error("Degenerate element '{element}': {reason}")]
    DegenerateElement { element: String, reason: String },

    #[error("Invalid load in case '{case}': {reason}")]
    InvalidLoad { case: String, reason: String },

    #[error("Model is underconstrained: {0}")]
    UnderconstrainedModel(String),

    #[error("Singular stiffness matrix at DOF {dof} (pivot {pivot:e}) - model may be unstable or have insufficient supports")]
    SingularMatrix { dof: usize, pivot: f64 },

    #[error("Load combination '{combination}' references case '{case}', which has no results")]
    MissingCaseResult { combination: String, case: String },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Analysis failed: {0}")]
    AnalysisFailed(String),
}

/// Result type for frame analysis operations
pub type FrameResult<T> = Result<T, FrameError>;
