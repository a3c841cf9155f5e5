//! # workbench-kernel
//!
//! The object-language metamodel: sorts, constructors, terms, patterns,
//! meta-variables, judgments, inference rules, and recursive functions, plus
//! the pure engines that answer mechanical queries over them (pattern
//! matching, structural-termination checking, evaluation,
//! syntax-directedness analysis, and bounded backward derivation search).
//!
//! Nothing in this crate performs I/O, logging, or randomness without an
//! explicit seed — see `workbench-system` for the driver that wires this
//! crate up to the outside world.

pub mod constructor;
pub mod derive;
pub mod function;
pub mod judgment;
pub mod metamodel;
pub mod metavariable;
pub mod pattern;
pub mod rule;
pub mod sort;
pub mod term;
pub mod termination;

pub use constructor::{Constructor, ConstructorArg};
pub use derive::{analyze_syntax_directed, derive, enumerate_examples, enumerate_terms, Derivation, ExampleSet, DEFAULT_MAX_DEPTH};
pub use function::{
    eval, render_func_expr, render_func_predicate, FuncBinOp, FuncCase, FuncExpr, FuncPredicate, FuncReturnType,
    FuncValue, RecursiveFunc,
};
pub use judgment::{Judgment, JudgmentArg, JudgmentInstance, SideCondition, SidePredicate};
pub use metamodel::Metamodel;
pub use metavariable::MetaVariable;
pub use pattern::{match_pattern, match_pattern_into, render_pattern, substitute_pattern, Bindings, Pattern};
pub use rule::InferenceRule;
pub use sort::{Sort, SortKind};
pub use term::{fresh_atom_name, generate_random_term, Term};
pub use termination::check_termination;

pub use workbench_base::{EngineError, EngineResult, Id};
