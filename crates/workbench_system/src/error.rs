//! Error type for the command/query layer.
//!
//! Wraps the two engine-level error taxonomies (`workbench_base::EngineError`
//! from the kernel, `workbench_proof::TacticError` from the tactic engine)
//! and adds the handful of failures that only make sense at the
//! system/registry level (an unknown property or proof id).

use std::fmt;

use workbench_base::EngineError;
use workbench_proof::TacticError;

#[derive(Debug, Clone)]
pub enum SystemError {
    Engine(EngineError),
    Tactic(TacticError),
    NotFound { kind: &'static str, id: String },
}

impl fmt::Display for SystemError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SystemError::Engine(e) => write!(f, "{}", e),
            SystemError::Tactic(e) => write!(f, "{}", e),
            SystemError::NotFound { kind, id } => write!(f, "no {} found with id '{}'", kind, id),
        }
    }
}

impl std::error::Error for SystemError {}

impl From<EngineError> for SystemError {
    fn from(e: EngineError) -> Self {
        SystemError::Engine(e)
    }
}

impl From<TacticError> for SystemError {
    fn from(e: TacticError) -> Self {
        SystemError::Tactic(e)
    }
}

pub type SystemResult<T> = Result<T, SystemError>;
