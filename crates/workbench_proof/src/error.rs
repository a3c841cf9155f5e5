//! Error type for the tactic engine.
//!
//! A failing tactic never corrupts proof state (see
//! [`crate::tactic::apply_tactic`]) — it just hands back one of these.

use std::fmt;

#[derive(Debug, Clone)]
pub enum TacticError {
    /// The goal's top-level shape doesn't match what the tactic requires.
    GoalShapeMismatch { tactic: String, reason: String },
    /// A newly introduced variable or hypothesis name shadows one already
    /// in scope.
    NameCollision { name: String },
    /// A tactic referenced a hypothesis name that isn't in the goal's
    /// context.
    HypothesisNotFound { name: String },
    /// A tactic referenced a variable name that isn't in the goal's
    /// context, or that isn't of the sort the tactic requires.
    VariableNotFound { name: String },
    /// `induction`/`case_analysis` was asked to split on a non-inductive
    /// sort.
    SortNotInductive { sort_name: String },
    /// The goal or proof id named by the command doesn't exist.
    NotFound { kind: &'static str, id: String },
    /// A reserved tactic (`rewrite`, `derivation_induction`, `apply_rule`,
    /// `contradiction`, `compute`) with no interpreter yet.
    Unsupported { tactic: String },
}

impl fmt::Display for TacticError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TacticError::GoalShapeMismatch { tactic, reason } => {
                write!(f, "tactic `{}` does not apply here: {}", tactic, reason)
            }
            TacticError::NameCollision { name } => {
                write!(f, "name `{}` is already in scope", name)
            }
            TacticError::HypothesisNotFound { name } => {
                write!(f, "no hypothesis named `{}` in this goal's context", name)
            }
            TacticError::VariableNotFound { name } => {
                write!(f, "no variable named `{}` in this goal's context", name)
            }
            TacticError::SortNotInductive { sort_name } => {
                write!(f, "sort `{}` is not inductive", sort_name)
            }
            TacticError::NotFound { kind, id } => write!(f, "{} `{}` not found", kind, id),
            TacticError::Unsupported { tactic } => write!(f, "tactic `{}` is reserved and not yet implemented", tactic),
        }
    }
}

impl std::error::Error for TacticError {}

pub type TacticResult<T> = Result<T, TacticError>;
