//! First-order formulas: the ADT, capture-free expression substitution, an
//! arithmetic simplifier, and a bounded (incomplete but sound) linear
//! arithmetic decider.
//!
//! Nothing here mutates a [`Metamodel`] or logs — the formula kernel is pure,
//! the same way `workbench-kernel`'s pattern and function engines are.

use serde::{Deserialize, Serialize};

use workbench_kernel::{Constructor, Judgment, Metamodel, RecursiveFunc, Sort};
use workbench_base::Id;

/// Arithmetic binary operators available in a [`FormulaExpr`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArithOp {
    Add,
    Sub,
    Mul,
    Max,
    Min,
}

/// Expressions that appear inside a [`Formula`]: variables, constructor
/// applications, function applications, integer literals, the empty set,
/// and arithmetic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FormulaExpr {
    Var(String),
    Construct { constructor_id: Id<Constructor>, args: Vec<FormulaExpr> },
    /// `args[0]` is the principal argument, the rest are extra arguments in
    /// declaration order — mirrors `FuncExpr::Call`.
    FuncApp { function_id: Id<RecursiveFunc>, args: Vec<FormulaExpr> },
    IntLiteral(i64),
    EmptySet,
    BinOp { op: ArithOp, lhs: Box<FormulaExpr>, rhs: Box<FormulaExpr> },
}

impl FormulaExpr {
    pub fn add(lhs: FormulaExpr, rhs: FormulaExpr) -> Self {
        FormulaExpr::BinOp { op: ArithOp::Add, lhs: Box::new(lhs), rhs: Box::new(rhs) }
    }

    pub fn sub(lhs: FormulaExpr, rhs: FormulaExpr) -> Self {
        FormulaExpr::BinOp { op: ArithOp::Sub, lhs: Box::new(lhs), rhs: Box::new(rhs) }
    }
}

/// A first-order formula over [`FormulaExpr`]s.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Formula {
    True,
    False,
    Forall { var: String, sort_id: Id<Sort>, body: Box<Formula> },
    Exists { var: String, sort_id: Id<Sort>, body: Box<Formula> },
    Implies(Box<Formula>, Box<Formula>),
    And(Box<Formula>, Box<Formula>),
    Or(Box<Formula>, Box<Formula>),
    Not(Box<Formula>),
    /// A judgment applied to a tuple of expressions (e.g. `e ↓ v`).
    Judgment { judgment_id: Id<Judgment>, args: Vec<FormulaExpr> },
    /// Structural/term equality (also used for `funcEq`-shaped goals: both
    /// sides are just `FormulaExpr`s, one or both of which may be a
    /// `FuncApp`).
    TermEq(FormulaExpr, FormulaExpr),
    NumEq(FormulaExpr, FormulaExpr),
    NumLt(FormulaExpr, FormulaExpr),
    NumLeq(FormulaExpr, FormulaExpr),
    NumGt(FormulaExpr, FormulaExpr),
    NumGeq(FormulaExpr, FormulaExpr),
    SetIn { element: FormulaExpr, set: FormulaExpr },
    SetEmpty(FormulaExpr),
}

// ---------------------------------------------------------------------
// Substitution
// ---------------------------------------------------------------------

/// Capture-free substitution of `replacement` for free occurrences of `var`
/// in `expr`. `FormulaExpr` has no binders of its own, so this is a plain
/// structural replace.
pub fn subst_expr(expr: &FormulaExpr, var: &str, replacement: &FormulaExpr) -> FormulaExpr {
    match expr {
        FormulaExpr::Var(name) => {
            if name == var {
                replacement.clone()
            } else {
                expr.clone()
            }
        }
        FormulaExpr::Construct { constructor_id, args } => FormulaExpr::Construct {
            constructor_id: constructor_id.clone(),
            args: args.iter().map(|a| subst_expr(a, var, replacement)).collect(),
        },
        FormulaExpr::FuncApp { function_id, args } => FormulaExpr::FuncApp {
            function_id: function_id.clone(),
            args: args.iter().map(|a| subst_expr(a, var, replacement)).collect(),
        },
        FormulaExpr::IntLiteral(_) | FormulaExpr::EmptySet => expr.clone(),
        FormulaExpr::BinOp { op, lhs, rhs } => FormulaExpr::BinOp {
            op: *op,
            lhs: Box::new(subst_expr(lhs, var, replacement)),
            rhs: Box::new(subst_expr(rhs, var, replacement)),
        },
    }
}

/// Capture-free substitution at the formula level. A quantifier whose bound
/// variable equals `var` leaves its body untouched (shadowing); the kernel
/// does not rename to avoid capture from `replacement` — callers are
/// expected to supply a closed or disjoint-from-bound-names replacement
/// (see the tactic boundary check in `workbench_proof::tactic`).
pub fn subst_formula(formula: &Formula, var: &str, replacement: &FormulaExpr) -> Formula {
    match formula {
        Formula::True | Formula::False => formula.clone(),
        Formula::Forall { var: bound, sort_id, body } => {
            if bound == var {
                formula.clone()
            } else {
                Formula::Forall {
                    var: bound.clone(),
                    sort_id: sort_id.clone(),
                    body: Box::new(subst_formula(body, var, replacement)),
                }
            }
        }
        Formula::Exists { var: bound, sort_id, body } => {
            if bound == var {
                formula.clone()
            } else {
                Formula::Exists {
                    var: bound.clone(),
                    sort_id: sort_id.clone(),
                    body: Box::new(subst_formula(body, var, replacement)),
                }
            }
        }
        Formula::Implies(l, r) => Formula::Implies(
            Box::new(subst_formula(l, var, replacement)),
            Box::new(subst_formula(r, var, replacement)),
        ),
        Formula::And(l, r) => Formula::And(
            Box::new(subst_formula(l, var, replacement)),
            Box::new(subst_formula(r, var, replacement)),
        ),
        Formula::Or(l, r) => Formula::Or(
            Box::new(subst_formula(l, var, replacement)),
            Box::new(subst_formula(r, var, replacement)),
        ),
        Formula::Not(inner) => Formula::Not(Box::new(subst_formula(inner, var, replacement))),
        Formula::Judgment { judgment_id, args } => Formula::Judgment {
            judgment_id: judgment_id.clone(),
            args: args.iter().map(|a| subst_expr(a, var, replacement)).collect(),
        },
        Formula::TermEq(l, r) => Formula::TermEq(subst_expr(l, var, replacement), subst_expr(r, var, replacement)),
        Formula::NumEq(l, r) => Formula::NumEq(subst_expr(l, var, replacement), subst_expr(r, var, replacement)),
        Formula::NumLt(l, r) => Formula::NumLt(subst_expr(l, var, replacement), subst_expr(r, var, replacement)),
        Formula::NumLeq(l, r) => Formula::NumLeq(subst_expr(l, var, replacement), subst_expr(r, var, replacement)),
        Formula::NumGt(l, r) => Formula::NumGt(subst_expr(l, var, replacement), subst_expr(r, var, replacement)),
        Formula::NumGeq(l, r) => Formula::NumGeq(subst_expr(l, var, replacement), subst_expr(r, var, replacement)),
        Formula::SetIn { element, set } => Formula::SetIn {
            element: subst_expr(element, var, replacement),
            set: subst_expr(set, var, replacement),
        },
        Formula::SetEmpty(e) => Formula::SetEmpty(subst_expr(e, var, replacement)),
    }
}

/// Free variable names that occur in `expr` (ignoring sort information,
/// which the caller is expected to track separately via a context).
pub fn free_vars_expr(expr: &FormulaExpr, out: &mut std::collections::BTreeSet<String>) {
    match expr {
        FormulaExpr::Var(name) => {
            out.insert(name.clone());
        }
        FormulaExpr::Construct { args, .. } | FormulaExpr::FuncApp { args, .. } => {
            for arg in args {
                free_vars_expr(arg, out);
            }
        }
        FormulaExpr::IntLiteral(_) | FormulaExpr::EmptySet => {}
        FormulaExpr::BinOp { lhs, rhs, .. } => {
            free_vars_expr(lhs, out);
            free_vars_expr(rhs, out);
        }
    }
}

// ---------------------------------------------------------------------
// Arithmetic simplification
// ---------------------------------------------------------------------

/// Fully evaluates constant subexpressions and applies the identity
/// rewrites named in the design doc. Bottom-up and idempotent: simplifying
/// an already-simplified expression returns it unchanged.
pub fn simplify_expr(expr: &FormulaExpr) -> FormulaExpr {
    match expr {
        FormulaExpr::Var(_) | FormulaExpr::IntLiteral(_) | FormulaExpr::EmptySet => expr.clone(),
        FormulaExpr::Construct { constructor_id, args } => FormulaExpr::Construct {
            constructor_id: constructor_id.clone(),
            args: args.iter().map(simplify_expr).collect(),
        },
        FormulaExpr::FuncApp { function_id, args } => FormulaExpr::FuncApp {
            function_id: function_id.clone(),
            args: args.iter().map(simplify_expr).collect(),
        },
        FormulaExpr::BinOp { op, lhs, rhs } => {
            let lhs = simplify_expr(lhs);
            let rhs = simplify_expr(rhs);
            simplify_binop(*op, lhs, rhs)
        }
    }
}

fn simplify_binop(op: ArithOp, lhs: FormulaExpr, rhs: FormulaExpr) -> FormulaExpr {
    if let (FormulaExpr::IntLiteral(a), FormulaExpr::IntLiteral(b)) = (&lhs, &rhs) {
        let (a, b) = (*a, *b);
        let value = match op {
            ArithOp::Add => a + b,
            ArithOp::Sub => a - b,
            ArithOp::Mul => a * b,
            ArithOp::Max => a.max(b),
            ArithOp::Min => a.min(b),
        };
        return FormulaExpr::IntLiteral(value);
    }

    match op {
        ArithOp::Add => {
            if is_zero_literal(&lhs) {
                return rhs;
            }
            if is_zero_literal(&rhs) {
                return lhs;
            }
        }
        ArithOp::Sub => {
            if is_zero_literal(&rhs) {
                return lhs;
            }
            if lhs == rhs {
                return FormulaExpr::IntLiteral(0);
            }
        }
        ArithOp::Mul => {
            if is_zero_literal(&lhs) || is_zero_literal(&rhs) {
                return FormulaExpr::IntLiteral(0);
            }
            if is_one_literal(&lhs) {
                return rhs;
            }
            if is_one_literal(&rhs) {
                return lhs;
            }
        }
        ArithOp::Max | ArithOp::Min => {
            if lhs == rhs {
                return lhs;
            }
        }
    }

    FormulaExpr::BinOp { op, lhs: Box::new(lhs), rhs: Box::new(rhs) }
}

fn is_zero_literal(expr: &FormulaExpr) -> bool {
    matches!(expr, FormulaExpr::IntLiteral(0))
}

fn is_one_literal(expr: &FormulaExpr) -> bool {
    matches!(expr, FormulaExpr::IntLiteral(1))
}

/// Simplifies every [`FormulaExpr`] reachable from `formula`, and collapses
/// `and`/`or` with one `true`/`false` operand per the design doc's boundary
/// behavior note. Does not touch quantifier/connective structure otherwise.
pub fn simplify_formula(formula: &Formula) -> Formula {
    match formula {
        Formula::True | Formula::False => formula.clone(),
        Formula::Forall { var, sort_id, body } => Formula::Forall {
            var: var.clone(),
            sort_id: sort_id.clone(),
            body: Box::new(simplify_formula(body)),
        },
        Formula::Exists { var, sort_id, body } => Formula::Exists {
            var: var.clone(),
            sort_id: sort_id.clone(),
            body: Box::new(simplify_formula(body)),
        },
        Formula::Implies(l, r) => Formula::Implies(Box::new(simplify_formula(l)), Box::new(simplify_formula(r))),
        Formula::And(l, r) => {
            let (l, r) = (simplify_formula(l), simplify_formula(r));
            match (&l, &r) {
                (Formula::True, _) => r,
                (_, Formula::True) => l,
                (Formula::False, _) | (_, Formula::False) => Formula::False,
                _ => Formula::And(Box::new(l), Box::new(r)),
            }
        }
        Formula::Or(l, r) => {
            let (l, r) = (simplify_formula(l), simplify_formula(r));
            match (&l, &r) {
                (Formula::False, _) => r,
                (_, Formula::False) => l,
                (Formula::True, _) | (_, Formula::True) => Formula::True,
                _ => Formula::Or(Box::new(l), Box::new(r)),
            }
        }
        Formula::Not(inner) => {
            let inner = simplify_formula(inner);
            match inner {
                Formula::True => Formula::False,
                Formula::False => Formula::True,
                other => Formula::Not(Box::new(other)),
            }
        }
        Formula::Judgment { judgment_id, args } => Formula::Judgment {
            judgment_id: judgment_id.clone(),
            args: args.iter().map(simplify_expr).collect(),
        },
        Formula::TermEq(l, r) => Formula::TermEq(simplify_expr(l), simplify_expr(r)),
        Formula::NumEq(l, r) => Formula::NumEq(simplify_expr(l), simplify_expr(r)),
        Formula::NumLt(l, r) => Formula::NumLt(simplify_expr(l), simplify_expr(r)),
        Formula::NumLeq(l, r) => Formula::NumLeq(simplify_expr(l), simplify_expr(r)),
        Formula::NumGt(l, r) => Formula::NumGt(simplify_expr(l), simplify_expr(r)),
        Formula::NumGeq(l, r) => Formula::NumGeq(simplify_expr(l), simplify_expr(r)),
        Formula::SetIn { element, set } => Formula::SetIn { element: simplify_expr(element), set: simplify_expr(set) },
        Formula::SetEmpty(e) => Formula::SetEmpty(simplify_expr(e)),
    }
}

// ---------------------------------------------------------------------
// Linear-arithmetic decider
// ---------------------------------------------------------------------

/// Syntactic non-negativity: a conservative, incomplete check used by both
/// [`can_prove_geq`] and [`is_positive`].
pub fn is_non_negative(expr: &FormulaExpr) -> bool {
    match expr {
        FormulaExpr::IntLiteral(n) => *n >= 0,
        FormulaExpr::BinOp { op: ArithOp::Add, lhs, rhs } => is_non_negative(lhs) && is_non_negative(rhs),
        FormulaExpr::BinOp { op: ArithOp::Mul, lhs, rhs } => is_non_negative(lhs) && is_non_negative(rhs),
        FormulaExpr::BinOp { op: ArithOp::Min, lhs, rhs } => is_non_negative(lhs) && is_non_negative(rhs),
        FormulaExpr::BinOp { op: ArithOp::Max, lhs, rhs } => is_non_negative(lhs) || is_non_negative(rhs),
        _ => false,
    }
}

fn hypothesis_geq(l: &FormulaExpr, r: &FormulaExpr, hypotheses: &[Formula]) -> bool {
    hypotheses.iter().any(|h| match h {
        Formula::NumGeq(hl, hr) | Formula::NumGt(hl, hr) => hl == l && hr == r,
        _ => false,
    })
}

/// Incomplete but sound: attempts to prove `l >= r` against the hypotheses
/// in scope. Both sides are simplified first so syntactic comparisons see
/// a normal form.
pub fn can_prove_geq(l: &FormulaExpr, r: &FormulaExpr, hypotheses: &[Formula]) -> bool {
    let l = simplify_expr(l);
    let r = simplify_expr(r);
    can_prove_geq_simplified(&l, &r, hypotheses)
}

fn can_prove_geq_simplified(l: &FormulaExpr, r: &FormulaExpr, hypotheses: &[Formula]) -> bool {
    if let (FormulaExpr::IntLiteral(a), FormulaExpr::IntLiteral(b)) = (l, r) {
        return a >= b;
    }
    if l == r {
        return true;
    }
    if hypothesis_geq(l, r, hypotheses) {
        return true;
    }
    if let FormulaExpr::BinOp { op: ArithOp::Add, lhs: a, rhs: b } = l {
        if can_prove_geq_simplified(a, r, hypotheses) && is_non_negative(b) {
            return true;
        }
        if can_prove_geq_simplified(b, r, hypotheses) && is_non_negative(a) {
            return true;
        }
    }
    if matches!(r, FormulaExpr::IntLiteral(0)) && is_non_negative(l) {
        return true;
    }
    false
}

/// Strict-inequality mirror of [`can_prove_geq`]: attempts to prove `l > 0`.
pub fn is_positive(l: &FormulaExpr, hypotheses: &[Formula]) -> bool {
    let l = simplify_expr(l);
    if let FormulaExpr::IntLiteral(n) = l {
        return n > 0;
    }
    hypotheses.iter().any(|h| match h {
        Formula::NumGt(hl, hr) => *hl == l && matches!(hr, FormulaExpr::IntLiteral(0)),
        _ => false,
    })
}

// ---------------------------------------------------------------------
// Function unfolding
// ---------------------------------------------------------------------

/// Result of attempting to unfold one `f(...)` occurrence inside an
/// expression.
pub enum UnfoldOutcome {
    Unfolded(FormulaExpr),
    /// An occurrence was found but its case body uses an operation with no
    /// `FormulaExpr` translation (`mul`, `max`, `min`, set ops, `if`) — the
    /// sound choice from the open-question resolution is to refuse rather
    /// than emit a literal `0`.
    Unsupported,
    NotFound,
}

/// Finds the outermost subexpression of the form `f(C(...))` (`f` being
/// `func`) and replaces it with `func`'s matching case body, translated
/// into `FormulaExpr` with the case's bound variables substituted for the
/// constructor's argument subexpressions.
pub fn unfold_func_app(expr: &FormulaExpr, func: &RecursiveFunc) -> UnfoldOutcome {
    if let FormulaExpr::FuncApp { function_id, args } = expr {
        if function_id == &func.id {
            if let Some(first) = args.first() {
                if let FormulaExpr::Construct { constructor_id, args: ctor_args } = first {
                    if let Some(case) = func.cases.iter().find(|c| &c.constructor_id == constructor_id) {
                        if case.bound_vars.len() != ctor_args.len() {
                            return UnfoldOutcome::NotFound;
                        }
                        return match translate_func_expr(&case.body) {
                            Some(mut translated) => {
                                for (name, value) in case.bound_vars.iter().zip(ctor_args.iter()) {
                                    translated = subst_expr(&translated, name, value);
                                }
                                for ((name, _sort), value) in func.extra_args.iter().zip(args.iter().skip(1)) {
                                    translated = subst_expr(&translated, name, value);
                                }
                                UnfoldOutcome::Unfolded(translated)
                            }
                            None => UnfoldOutcome::Unsupported,
                        };
                    }
                }
            }
        }
    }

    // Not an applicable occurrence at this node; descend into subexpressions,
    // left to right, stopping at the first node that is either unfolded or
    // flagged unsupported.
    match expr {
        FormulaExpr::Construct { constructor_id, args } => {
            unfold_in_children(args, func, |new_args| FormulaExpr::Construct {
                constructor_id: constructor_id.clone(),
                args: new_args,
            })
        }
        FormulaExpr::FuncApp { function_id, args } => {
            unfold_in_children(args, func, |new_args| FormulaExpr::FuncApp {
                function_id: function_id.clone(),
                args: new_args,
            })
        }
        FormulaExpr::BinOp { op, lhs, rhs } => match unfold_func_app(lhs, func) {
            UnfoldOutcome::Unfolded(new_lhs) => {
                UnfoldOutcome::Unfolded(FormulaExpr::BinOp { op: *op, lhs: Box::new(new_lhs), rhs: rhs.clone() })
            }
            UnfoldOutcome::Unsupported => UnfoldOutcome::Unsupported,
            UnfoldOutcome::NotFound => match unfold_func_app(rhs, func) {
                UnfoldOutcome::Unfolded(new_rhs) => {
                    UnfoldOutcome::Unfolded(FormulaExpr::BinOp { op: *op, lhs: lhs.clone(), rhs: Box::new(new_rhs) })
                }
                other => other,
            },
        },
        FormulaExpr::Var(_) | FormulaExpr::IntLiteral(_) | FormulaExpr::EmptySet => UnfoldOutcome::NotFound,
    }
}

fn unfold_in_children(
    args: &[FormulaExpr],
    func: &RecursiveFunc,
    rebuild: impl FnOnce(Vec<FormulaExpr>) -> FormulaExpr,
) -> UnfoldOutcome {
    for (i, arg) in args.iter().enumerate() {
        match unfold_func_app(arg, func) {
            UnfoldOutcome::Unfolded(new_arg) => {
                let mut new_args = args.to_vec();
                new_args[i] = new_arg;
                return UnfoldOutcome::Unfolded(rebuild(new_args));
            }
            UnfoldOutcome::Unsupported => return UnfoldOutcome::Unsupported,
            UnfoldOutcome::NotFound => continue,
        }
    }
    UnfoldOutcome::NotFound
}

/// Translates a `FuncExpr` body into a `FormulaExpr`, node-wise, per the
/// design doc's resolved open question: `mul`, `max`, `min`, any set
/// operation, and `if` have no translation and cause the whole unfold to
/// fail (`None`) rather than silently becoming a literal `0`.
fn translate_func_expr(expr: &workbench_kernel::FuncExpr) -> Option<FormulaExpr> {
    use workbench_kernel::{FuncBinOp, FuncExpr};
    match expr {
        FuncExpr::IntLiteral(n) => Some(FormulaExpr::IntLiteral(*n)),
        FuncExpr::Var(name) => Some(FormulaExpr::Var(name.clone())),
        FuncExpr::EmptySet => Some(FormulaExpr::EmptySet),
        FuncExpr::Call { function_id, args } => {
            let translated: Option<Vec<FormulaExpr>> = args.iter().map(translate_func_expr).collect();
            Some(FormulaExpr::FuncApp { function_id: function_id.clone(), args: translated? })
        }
        FuncExpr::Construct { constructor_id, args } => {
            let translated: Option<Vec<FormulaExpr>> = args.iter().map(translate_func_expr).collect();
            Some(FormulaExpr::Construct { constructor_id: constructor_id.clone(), args: translated? })
        }
        FuncExpr::BinOp { op: FuncBinOp::Add, lhs, rhs } => Some(FormulaExpr::add(
            translate_func_expr(lhs)?,
            translate_func_expr(rhs)?,
        )),
        FuncExpr::BinOp { op: FuncBinOp::Sub, lhs, rhs } => Some(FormulaExpr::sub(
            translate_func_expr(lhs)?,
            translate_func_expr(rhs)?,
        )),
        // mul/max/min/union/intersect/diff have no FormulaExpr counterpart.
        FuncExpr::BinOp { .. } => None,
        // singleton/if have no FormulaExpr counterpart either.
        FuncExpr::Singleton(_) | FuncExpr::If { .. } => None,
    }
}

// ---------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------

/// Renders a `FormulaExpr`, resolving constructor/function names against
/// `metamodel`.
pub fn render_formula_expr(expr: &FormulaExpr, metamodel: &Metamodel) -> String {
    match expr {
        FormulaExpr::Var(name) => name.clone(),
        FormulaExpr::IntLiteral(n) => n.to_string(),
        FormulaExpr::EmptySet => "\u{2205}".to_string(),
        FormulaExpr::Construct { constructor_id, args } => {
            let name = metamodel.constructor(constructor_id).map(|c| c.name.as_str()).unwrap_or("<?>");
            if args.is_empty() {
                name.to_string()
            } else {
                let rendered: Vec<String> = args.iter().map(|a| render_formula_expr(a, metamodel)).collect();
                format!("{}({})", name, rendered.join(", "))
            }
        }
        FormulaExpr::FuncApp { function_id, args } => {
            let name = metamodel.function(function_id).map(|f| f.name.as_str()).unwrap_or("<?>");
            let rendered: Vec<String> = args.iter().map(|a| render_formula_expr(a, metamodel)).collect();
            format!("{}({})", name, rendered.join(", "))
        }
        FormulaExpr::BinOp { op, lhs, rhs } => {
            let symbol = match op {
                ArithOp::Add => "+",
                ArithOp::Sub => "-",
                ArithOp::Mul => "*",
                ArithOp::Max => "max",
                ArithOp::Min => "min",
            };
            match op {
                ArithOp::Max | ArithOp::Min => format!(
                    "{}({}, {})",
                    symbol,
                    render_formula_expr(lhs, metamodel),
                    render_formula_expr(rhs, metamodel)
                ),
                _ => format!(
                    "({} {} {})",
                    render_formula_expr(lhs, metamodel),
                    symbol,
                    render_formula_expr(rhs, metamodel)
                ),
            }
        }
    }
}

/// Renders a `Formula` with full parenthesization around binary connectives
/// and unicode quantifiers/connectives.
pub fn render_formula(formula: &Formula, metamodel: &Metamodel) -> String {
    match formula {
        Formula::True => "\u{22a4}".to_string(),
        Formula::False => "\u{22a5}".to_string(),
        Formula::Forall { var, sort_id, body } => {
            let sort_name = metamodel.sort(sort_id).map(|s| s.name.as_str()).unwrap_or("?");
            format!("\u{2200}{}:{}. {}", var, sort_name, render_formula(body, metamodel))
        }
        Formula::Exists { var, sort_id, body } => {
            let sort_name = metamodel.sort(sort_id).map(|s| s.name.as_str()).unwrap_or("?");
            format!("\u{2203}{}:{}. {}", var, sort_name, render_formula(body, metamodel))
        }
        Formula::Implies(l, r) => {
            format!("({} \u{2192} {})", render_formula(l, metamodel), render_formula(r, metamodel))
        }
        Formula::And(l, r) => format!("({} \u{2227} {})", render_formula(l, metamodel), render_formula(r, metamodel)),
        Formula::Or(l, r) => format!("({} \u{2228} {})", render_formula(l, metamodel), render_formula(r, metamodel)),
        Formula::Not(inner) => format!("\u{ac}{}", render_formula(inner, metamodel)),
        Formula::Judgment { judgment_id, args } => {
            let rendered_args: Vec<String> = args.iter().map(|a| render_formula_expr(a, metamodel)).collect();
            metamodel
                .judgment(judgment_id)
                .map(|j| j.render_with(&rendered_args))
                .unwrap_or_else(|| "<?>".to_string())
        }
        Formula::TermEq(l, r) => format!("{} = {}", render_formula_expr(l, metamodel), render_formula_expr(r, metamodel)),
        Formula::NumEq(l, r) => format!("{} = {}", render_formula_expr(l, metamodel), render_formula_expr(r, metamodel)),
        Formula::NumLt(l, r) => format!("{} < {}", render_formula_expr(l, metamodel), render_formula_expr(r, metamodel)),
        Formula::NumLeq(l, r) => format!("{} \u{2264} {}", render_formula_expr(l, metamodel), render_formula_expr(r, metamodel)),
        Formula::NumGt(l, r) => format!("{} > {}", render_formula_expr(l, metamodel), render_formula_expr(r, metamodel)),
        Formula::NumGeq(l, r) => format!("{} \u{2265} {}", render_formula_expr(l, metamodel), render_formula_expr(r, metamodel)),
        Formula::SetIn { element, set } => {
            format!("{} \u{2208} {}", render_formula_expr(element, metamodel), render_formula_expr(set, metamodel))
        }
        Formula::SetEmpty(e) => format!("{} = \u{2205}", render_formula_expr(e, metamodel)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simplify_is_idempotent_on_identities() {
        let expr = FormulaExpr::add(FormulaExpr::IntLiteral(0), FormulaExpr::Var("x".into()));
        let once = simplify_expr(&expr);
        let twice = simplify_expr(&once);
        assert_eq!(once, FormulaExpr::Var("x".into()));
        assert_eq!(once, twice);
    }

    #[test]
    fn simplify_folds_ground_arithmetic() {
        let expr = FormulaExpr::add(FormulaExpr::IntLiteral(2), FormulaExpr::IntLiteral(3));
        assert_eq!(simplify_expr(&expr), FormulaExpr::IntLiteral(5));
    }

    #[test]
    fn subst_does_not_descend_into_shadowing_quantifier() {
        let inner = Formula::NumEq(FormulaExpr::Var("x".into()), FormulaExpr::IntLiteral(0));
        let formula = Formula::Forall { var: "x".into(), sort_id: Id::fresh(), body: Box::new(inner.clone()) };
        let substituted = subst_formula(&formula, "x", &FormulaExpr::IntLiteral(7));
        assert_eq!(substituted, formula);
    }

    #[test]
    fn can_prove_geq_uses_non_negative_summand() {
        let l = FormulaExpr::add(FormulaExpr::Var("n".into()), FormulaExpr::IntLiteral(1));
        let r = FormulaExpr::Var("n".into());
        assert!(can_prove_geq(&l, &r, &[]));
    }

    #[test]
    fn can_prove_geq_consults_hypotheses() {
        let l = FormulaExpr::Var("a".into());
        let r = FormulaExpr::Var("b".into());
        let hyp = Formula::NumGeq(l.clone(), r.clone());
        assert!(can_prove_geq(&l, &r, &[hyp]));
        assert!(!can_prove_geq(&l, &r, &[]));
    }

    #[test]
    fn zero_is_non_negative_when_lhs_syntactically_nonneg() {
        let l = FormulaExpr::add(FormulaExpr::IntLiteral(3), FormulaExpr::Var("n".into()));
        assert!(!is_non_negative(&l));
        let l2 = FormulaExpr::add(FormulaExpr::IntLiteral(3), FormulaExpr::IntLiteral(4));
        assert!(is_non_negative(&l2));
    }
}
