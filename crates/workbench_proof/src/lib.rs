//! The proof layer: first-order formulas over the object-language kernel,
//! named properties, and the interactive tactic engine that steps a proof
//! from its statement down to closed leaves.
//!
//! Depends on `workbench-kernel` but never the reverse — the metamodel
//! stays usable without a tactic engine attached.

pub mod error;
pub mod formula;
pub mod property;
pub mod tactic;

pub use error::{TacticError, TacticResult};
pub use formula::{
    can_prove_geq, is_non_negative, is_positive, render_formula, render_formula_expr, simplify_expr,
    simplify_formula, subst_expr, subst_formula, unfold_func_app, ArithOp, Formula, FormulaExpr, UnfoldOutcome,
};
pub use property::Property;
pub use tactic::{
    apply_tactic, is_goal_trivial, render_goal, GoalContext, Proof, ProofGoal, ProofStatus, ProofStep, Side, Tactic,
};

pub use workbench_base::{EngineError, EngineResult, Id};
