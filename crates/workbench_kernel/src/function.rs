//! Recursive functions over inductive sorts: structural recursion checked by
//! [`crate::termination`], evaluated by the interpreter in this module.

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use crate::constructor::Constructor;
use crate::metamodel::Metamodel;
use crate::sort::Sort;
use crate::term::Term;
use workbench_base::Id;

/// What a function returns: an integer, a finite set of atom names, or a
/// term of the named inductive sort.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FuncReturnType {
    Int,
    Set { element_sort_id: Id<Sort> },
    Inductive { sort_id: Id<Sort> },
}

/// A runtime value produced by [`eval`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FuncValue {
    Int(i64),
    Set(BTreeSet<String>),
    Term(Term),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FuncBinOp {
    Add,
    Sub,
    Mul,
    Max,
    Min,
    Union,
    Intersect,
    Diff,
}

/// The function-expression language: everything a `FuncCase` body can be
/// built from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum FuncExpr {
    IntLiteral(i64),
    EmptySet,
    Var(String),
    Singleton(Box<FuncExpr>),
    /// A call to `function_id`; `args[0]` is the principal argument, the
    /// rest (if any) are extra arguments in declaration order.
    Call { function_id: Id<RecursiveFunc>, args: Vec<FuncExpr> },
    Construct { constructor_id: Id<Constructor>, args: Vec<FuncExpr> },
    BinOp { op: FuncBinOp, lhs: Box<FuncExpr>, rhs: Box<FuncExpr> },
    If { cond: Box<FuncPredicate>, then_branch: Box<FuncExpr>, else_branch: Box<FuncExpr> },
}

/// Mirrors [`FuncExpr`]'s comparison and set-membership primitives, plus
/// boolean connectives.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum FuncPredicate {
    IntEq(FuncExpr, FuncExpr),
    IntNeq(FuncExpr, FuncExpr),
    IntLt(FuncExpr, FuncExpr),
    IntLeq(FuncExpr, FuncExpr),
    IntGt(FuncExpr, FuncExpr),
    IntGeq(FuncExpr, FuncExpr),
    AtomEq(FuncExpr, FuncExpr),
    AtomNeq(FuncExpr, FuncExpr),
    In { element: FuncExpr, set: FuncExpr },
    And(Box<FuncPredicate>, Box<FuncPredicate>),
    Or(Box<FuncPredicate>, Box<FuncPredicate>),
    Not(Box<FuncPredicate>),
}

/// One case of a `RecursiveFunc`: the body to run when the principal
/// argument's head constructor is `constructor_id`. `bound_vars[i]` names
/// the `i`th argument of that constructor within `body`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FuncCase {
    pub constructor_id: Id<Constructor>,
    pub bound_vars: Vec<String>,
    pub body: FuncExpr,
}

/// A recursive function defined by cases over the constructors of its
/// principal sort. `terminates`/`termination_error` are derived attributes
/// recomputed by [`crate::metamodel::Metamodel`] on every edit, never
/// hand-set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecursiveFunc {
    pub id: Id<RecursiveFunc>,
    pub name: String,
    pub principal_sort_id: Id<Sort>,
    pub extra_args: Vec<(String, Id<Sort>)>,
    pub return_type: FuncReturnType,
    pub cases: Vec<FuncCase>,
    pub terminates: bool,
    pub termination_error: Option<(String, String)>,
}

impl RecursiveFunc {
    pub fn new(
        name: impl Into<String>,
        principal_sort_id: Id<Sort>,
        extra_args: Vec<(String, Id<Sort>)>,
        return_type: FuncReturnType,
    ) -> Self {
        RecursiveFunc {
            id: Id::fresh(),
            name: name.into(),
            principal_sort_id,
            extra_args,
            return_type,
            cases: Vec::new(),
            terminates: true,
            termination_error: None,
        }
    }
}

/// The evaluation environment: bound constructor args (terms) plus extra
/// arguments (arbitrary values) in scope for one case body.
type Env = HashMap<String, FuncValue>;

/// `eval(f, principalTerm, extraEnv) -> FuncValue | undefined`. Selects the
/// case matching `principal_term`'s head constructor, extends the
/// environment with the pattern-bound subterms and the caller-supplied
/// extra-argument values, then evaluates the body.
pub fn eval(
    metamodel: &Metamodel,
    func: &RecursiveFunc,
    principal_term: &Term,
    extra_env: &[FuncValue],
) -> Option<FuncValue> {
    let (constructor_id, subterms) = match principal_term {
        Term::Construct { constructor_id, args } => (constructor_id, args),
        Term::Atom { .. } => return None,
    };
    let case = func.cases.iter().find(|c| &c.constructor_id == constructor_id)?;
    if case.bound_vars.len() != subterms.len() {
        return None;
    }
    if func.extra_args.len() != extra_env.len() {
        return None;
    }

    let mut env = Env::new();
    for (name, term) in case.bound_vars.iter().zip(subterms.iter()) {
        env.insert(name.clone(), FuncValue::Term(term.clone()));
    }
    for ((name, _sort), value) in func.extra_args.iter().zip(extra_env.iter()) {
        env.insert(name.clone(), value.clone());
    }

    eval_expr(metamodel, &case.body, &env)
}

fn eval_expr(metamodel: &Metamodel, expr: &FuncExpr, env: &Env) -> Option<FuncValue> {
    match expr {
        FuncExpr::IntLiteral(n) => Some(FuncValue::Int(*n)),
        FuncExpr::EmptySet => Some(FuncValue::Set(BTreeSet::new())),
        FuncExpr::Var(name) => env.get(name).cloned(),
        FuncExpr::Singleton(inner) => match eval_expr(metamodel, inner, env)? {
            FuncValue::Term(Term::Atom { variable_name, .. }) => {
                let mut set = BTreeSet::new();
                set.insert(variable_name);
                Some(FuncValue::Set(set))
            }
            _ => None,
        },
        FuncExpr::Call { function_id, args } => {
            let callee = metamodel.function(function_id)?;
            let mut values = Vec::with_capacity(args.len());
            for arg in args {
                values.push(eval_expr(metamodel, arg, env)?);
            }
            let (principal, extras) = values.split_first()?;
            let principal_term = match principal {
                FuncValue::Term(t) => t.clone(),
                _ => return None,
            };
            eval(metamodel, callee, &principal_term, extras)
        }
        FuncExpr::Construct { constructor_id, args } => {
            let mut evaluated = Vec::with_capacity(args.len());
            for arg in args {
                match eval_expr(metamodel, arg, env)? {
                    FuncValue::Term(t) => evaluated.push(t),
                    _ => return None,
                }
            }
            Some(FuncValue::Term(Term::construct(constructor_id.clone(), evaluated)))
        }
        FuncExpr::BinOp { op, lhs, rhs } => {
            let lhs = eval_expr(metamodel, lhs, env)?;
            let rhs = eval_expr(metamodel, rhs, env)?;
            eval_binop(*op, lhs, rhs)
        }
        FuncExpr::If { cond, then_branch, else_branch } => {
            if eval_predicate(metamodel, cond, env)? {
                eval_expr(metamodel, then_branch, env)
            } else {
                eval_expr(metamodel, else_branch, env)
            }
        }
    }
}

fn eval_binop(op: FuncBinOp, lhs: FuncValue, rhs: FuncValue) -> Option<FuncValue> {
    use FuncBinOp::*;
    match (op, lhs, rhs) {
        (Add, FuncValue::Int(a), FuncValue::Int(b)) => Some(FuncValue::Int(a + b)),
        (Sub, FuncValue::Int(a), FuncValue::Int(b)) => Some(FuncValue::Int(a - b)),
        (Mul, FuncValue::Int(a), FuncValue::Int(b)) => Some(FuncValue::Int(a * b)),
        (Max, FuncValue::Int(a), FuncValue::Int(b)) => Some(FuncValue::Int(a.max(b))),
        (Min, FuncValue::Int(a), FuncValue::Int(b)) => Some(FuncValue::Int(a.min(b))),
        (Union, FuncValue::Set(a), FuncValue::Set(b)) => Some(FuncValue::Set(a.union(&b).cloned().collect())),
        (Intersect, FuncValue::Set(a), FuncValue::Set(b)) => {
            Some(FuncValue::Set(a.intersection(&b).cloned().collect()))
        }
        (Diff, FuncValue::Set(a), FuncValue::Set(b)) => Some(FuncValue::Set(a.difference(&b).cloned().collect())),
        _ => None,
    }
}

fn eval_predicate(metamodel: &Metamodel, pred: &FuncPredicate, env: &Env) -> Option<bool> {
    match pred {
        FuncPredicate::IntEq(l, r) => int_cmp(metamodel, l, r, env, |a, b| a == b),
        FuncPredicate::IntNeq(l, r) => int_cmp(metamodel, l, r, env, |a, b| a != b),
        FuncPredicate::IntLt(l, r) => int_cmp(metamodel, l, r, env, |a, b| a < b),
        FuncPredicate::IntLeq(l, r) => int_cmp(metamodel, l, r, env, |a, b| a <= b),
        FuncPredicate::IntGt(l, r) => int_cmp(metamodel, l, r, env, |a, b| a > b),
        FuncPredicate::IntGeq(l, r) => int_cmp(metamodel, l, r, env, |a, b| a >= b),
        FuncPredicate::AtomEq(l, r) => atom_cmp(metamodel, l, r, env, |a, b| a == b),
        FuncPredicate::AtomNeq(l, r) => atom_cmp(metamodel, l, r, env, |a, b| a != b),
        FuncPredicate::In { element, set } => {
            let element = match eval_expr(metamodel, element, env)? {
                FuncValue::Term(Term::Atom { variable_name, .. }) => variable_name,
                _ => return None,
            };
            match eval_expr(metamodel, set, env)? {
                FuncValue::Set(set) => Some(set.contains(&element)),
                _ => None,
            }
        }
        FuncPredicate::And(l, r) => {
            let l = eval_predicate(metamodel, l, env)?;
            if !l {
                return Some(false);
            }
            eval_predicate(metamodel, r, env)
        }
        FuncPredicate::Or(l, r) => {
            let l = eval_predicate(metamodel, l, env)?;
            if l {
                return Some(true);
            }
            eval_predicate(metamodel, r, env)
        }
        FuncPredicate::Not(inner) => eval_predicate(metamodel, inner, env).map(|b| !b),
    }
}

fn int_cmp(
    metamodel: &Metamodel,
    l: &FuncExpr,
    r: &FuncExpr,
    env: &Env,
    cmp: impl FnOnce(i64, i64) -> bool,
) -> Option<bool> {
    match (eval_expr(metamodel, l, env)?, eval_expr(metamodel, r, env)?) {
        (FuncValue::Int(a), FuncValue::Int(b)) => Some(cmp(a, b)),
        _ => None,
    }
}

fn atom_cmp(
    metamodel: &Metamodel,
    l: &FuncExpr,
    r: &FuncExpr,
    env: &Env,
    cmp: impl FnOnce(&str, &str) -> bool,
) -> Option<bool> {
    match (eval_expr(metamodel, l, env)?, eval_expr(metamodel, r, env)?) {
        (FuncValue::Term(Term::Atom { variable_name: a, .. }), FuncValue::Term(Term::Atom { variable_name: b, .. })) => {
            Some(cmp(&a, &b))
        }
        _ => None,
    }
}

// ---------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------

/// Renders a `FuncExpr` as a Unicode string, resolving constructor/function
/// names against `metamodel` — the expression-language counterpart to
/// `Term::render` and `crate::pattern::render_pattern`.
pub fn render_func_expr(expr: &FuncExpr, metamodel: &Metamodel) -> String {
    match expr {
        FuncExpr::IntLiteral(n) => n.to_string(),
        FuncExpr::EmptySet => "\u{2205}".to_string(),
        FuncExpr::Var(name) => name.clone(),
        FuncExpr::Singleton(inner) => format!("{{{}}}", render_func_expr(inner, metamodel)),
        FuncExpr::Call { function_id, args } => {
            let name = metamodel.function(function_id).map(|f| f.name.as_str()).unwrap_or("<?>");
            let rendered: Vec<String> = args.iter().map(|a| render_func_expr(a, metamodel)).collect();
            format!("{}({})", name, rendered.join(", "))
        }
        FuncExpr::Construct { constructor_id, args } => {
            let name = metamodel.constructor(constructor_id).map(|c| c.name.as_str()).unwrap_or("<?>");
            if args.is_empty() {
                name.to_string()
            } else {
                let rendered: Vec<String> = args.iter().map(|a| render_func_expr(a, metamodel)).collect();
                format!("{}({})", name, rendered.join(", "))
            }
        }
        FuncExpr::BinOp { op, lhs, rhs } => {
            let lhs = render_func_expr(lhs, metamodel);
            let rhs = render_func_expr(rhs, metamodel);
            match op {
                FuncBinOp::Add => format!("({} + {})", lhs, rhs),
                FuncBinOp::Sub => format!("({} - {})", lhs, rhs),
                FuncBinOp::Mul => format!("({} * {})", lhs, rhs),
                FuncBinOp::Max => format!("max({}, {})", lhs, rhs),
                FuncBinOp::Min => format!("min({}, {})", lhs, rhs),
                FuncBinOp::Union => format!("({} \u{222a} {})", lhs, rhs),
                FuncBinOp::Intersect => format!("({} \u{2229} {})", lhs, rhs),
                FuncBinOp::Diff => format!("({} \u{2216} {})", lhs, rhs),
            }
        }
        FuncExpr::If { cond, then_branch, else_branch } => format!(
            "if {} then {} else {}",
            render_func_predicate(cond, metamodel),
            render_func_expr(then_branch, metamodel),
            render_func_expr(else_branch, metamodel)
        ),
    }
}

/// Renders a `FuncPredicate` as a Unicode string.
pub fn render_func_predicate(pred: &FuncPredicate, metamodel: &Metamodel) -> String {
    let cmp = |l: &FuncExpr, r: &FuncExpr, symbol: &str| {
        format!("{} {} {}", render_func_expr(l, metamodel), symbol, render_func_expr(r, metamodel))
    };
    match pred {
        FuncPredicate::IntEq(l, r) => cmp(l, r, "="),
        FuncPredicate::IntNeq(l, r) => cmp(l, r, "\u{2260}"),
        FuncPredicate::IntLt(l, r) => cmp(l, r, "<"),
        FuncPredicate::IntLeq(l, r) => cmp(l, r, "\u{2264}"),
        FuncPredicate::IntGt(l, r) => cmp(l, r, ">"),
        FuncPredicate::IntGeq(l, r) => cmp(l, r, "\u{2265}"),
        FuncPredicate::AtomEq(l, r) => cmp(l, r, "="),
        FuncPredicate::AtomNeq(l, r) => cmp(l, r, "\u{2260}"),
        FuncPredicate::In { element, set } => {
            format!("{} \u{2208} {}", render_func_expr(element, metamodel), render_func_expr(set, metamodel))
        }
        FuncPredicate::And(l, r) => {
            format!("({} \u{2227} {})", render_func_predicate(l, metamodel), render_func_predicate(r, metamodel))
        }
        FuncPredicate::Or(l, r) => {
            format!("({} \u{2228} {})", render_func_predicate(l, metamodel), render_func_predicate(r, metamodel))
        }
        FuncPredicate::Not(inner) => format!("\u{ac}{}", render_func_predicate(inner, metamodel)),
    }
}
