//! Shared error taxonomy for the workbench engines.
//!
//! Every fallible query or command in `workbench-kernel` and
//! `workbench-system` returns `Result<T, EngineError>`. `workbench-proof`
//! defines its own `TacticError` (tactic preconditions are a different
//! failure shape), but reuses `EngineError` for anything that bottoms out in
//! the kernel (pattern matching, evaluation, derivation).

use std::fmt;

/// Errors surfaced by the metamodel and its engines (§7 of the design doc).
#[derive(Debug, Clone, PartialEq)]
pub enum EngineError {
    /// A referenced entity id does not exist in the registry that was asked
    /// about it.
    NotFound { kind: &'static str, id: String },

    /// An arity or sort mismatch: e.g. a pattern applied to a term of the
    /// wrong sort, or a rule whose conclusion arity disagrees with its
    /// judgment.
    ShapeMismatch { reason: String },

    /// An operation required a complete pattern (no empty holes) but one
    /// remained.
    IncompletePattern,

    /// A recursive function failed the structural-termination check.
    TerminationFailure { case: String, reason: String },

    /// The function evaluator hit an undefined state: a non-matching case
    /// or a type mismatch between operands.
    EvaluationStuck { reason: String },

    /// Backward derivation search exhausted the depth bound without finding
    /// a witness.
    DerivationNotFound,
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::NotFound { kind, id } => {
                write!(f, "no {} found with id '{}'", kind, id)
            }
            EngineError::ShapeMismatch { reason } => {
                write!(f, "shape mismatch: {}", reason)
            }
            EngineError::IncompletePattern => {
                write!(f, "operation requires a complete pattern, but a hole remained")
            }
            EngineError::TerminationFailure { case, reason } => {
                write!(f, "termination check failed in case '{}': {}", case, reason)
            }
            EngineError::EvaluationStuck { reason } => {
                write!(f, "evaluation stuck: {}", reason)
            }
            EngineError::DerivationNotFound => {
                write!(f, "no derivation found within the depth bound")
            }
        }
    }
}

impl std::error::Error for EngineError {}

/// Result type for kernel/metamodel operations.
pub type EngineResult<T> = Result<T, EngineError>;
