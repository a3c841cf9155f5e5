//! Structural termination checking for [`RecursiveFunc`]s.
//!
//! The guard condition: a recursive call to `f` is only permitted when its
//! principal argument is exactly one of the bound variables the enclosing
//! case introduced for a sub-position of the *same* sort as the function's
//! own principal sort (the "structural variables" of that case). No other
//! shape of expression — not a nested call, not a literal, not another
//! constructor's child of the right sort — is accepted there, matching the
//! syntactic guard condition Coq-style kernels enforce on fixpoints.

use std::collections::HashSet;

use crate::constructor::Constructor;
use crate::function::{FuncCase, FuncExpr, FuncPredicate, RecursiveFunc};
use crate::metamodel::Metamodel;

/// Check every case of `func` for structural termination, stopping at the
/// first violation. `Ok(())` means every recursive call in every case is
/// guarded; `Err((case_name, reason))` names the offending case by its
/// constructor's name.
pub fn check_termination(metamodel: &Metamodel, func: &RecursiveFunc) -> Result<(), (String, String)> {
    for case in &func.cases {
        check_case(metamodel, func, case)?;
    }
    Ok(())
}

fn check_case(metamodel: &Metamodel, func: &RecursiveFunc, case: &FuncCase) -> Result<(), (String, String)> {
    let case_name = metamodel
        .constructor(&case.constructor_id)
        .map(|c| c.name.clone())
        .unwrap_or_else(|| "<unknown constructor>".to_string());

    let structural_vars = structural_variables(metamodel, func, case);
    check_expr(func, &structural_vars, &case.body).map_err(|reason| (case_name, reason))
}

/// The names, among `case.bound_vars`, whose corresponding constructor
/// argument has the function's principal sort — the variables a recursive
/// call is allowed to recurse on.
fn structural_variables(metamodel: &Metamodel, func: &RecursiveFunc, case: &FuncCase) -> HashSet<String> {
    let constructor: Option<&Constructor> = metamodel.constructor(&case.constructor_id);
    let mut out = HashSet::new();
    if let Some(constructor) = constructor {
        for (arg, name) in constructor.args.iter().zip(case.bound_vars.iter()) {
            if arg.sort_id == func.principal_sort_id {
                out.insert(name.clone());
            }
        }
    }
    out
}

fn check_expr(func: &RecursiveFunc, structural_vars: &HashSet<String>, expr: &FuncExpr) -> Result<(), String> {
    match expr {
        FuncExpr::IntLiteral(_) | FuncExpr::EmptySet | FuncExpr::Var(_) => Ok(()),
        FuncExpr::Singleton(inner) => check_expr(func, structural_vars, inner),
        FuncExpr::Call { function_id, args } => {
            if function_id == &func.id {
                let principal = args.first().ok_or_else(|| {
                    "recursive call is missing its principal argument".to_string()
                })?;
                match principal {
                    FuncExpr::Var(name) if structural_vars.contains(name) => {}
                    FuncExpr::Var(name) => {
                        return Err(format!(
                            "recursive call's principal argument `{}` is not a structural variable of this case",
                            name
                        ))
                    }
                    _ => {
                        return Err(
                            "recursive call's principal argument must be exactly a structural variable, not a compound expression"
                                .to_string(),
                        )
                    }
                }
            }
            for arg in args.iter().skip(if function_id == &func.id { 1 } else { 0 }) {
                check_expr(func, structural_vars, arg)?;
            }
            Ok(())
        }
        FuncExpr::Construct { args, .. } => {
            for arg in args {
                check_expr(func, structural_vars, arg)?;
            }
            Ok(())
        }
        FuncExpr::BinOp { lhs, rhs, .. } => {
            check_expr(func, structural_vars, lhs)?;
            check_expr(func, structural_vars, rhs)
        }
        FuncExpr::If { cond, then_branch, else_branch } => {
            check_predicate(func, structural_vars, cond)?;
            check_expr(func, structural_vars, then_branch)?;
            check_expr(func, structural_vars, else_branch)
        }
    }
}

fn check_predicate(
    func: &RecursiveFunc,
    structural_vars: &HashSet<String>,
    pred: &FuncPredicate,
) -> Result<(), String> {
    match pred {
        FuncPredicate::IntEq(l, r)
        | FuncPredicate::IntNeq(l, r)
        | FuncPredicate::IntLt(l, r)
        | FuncPredicate::IntLeq(l, r)
        | FuncPredicate::IntGt(l, r)
        | FuncPredicate::IntGeq(l, r)
        | FuncPredicate::AtomEq(l, r)
        | FuncPredicate::AtomNeq(l, r) => {
            check_expr(func, structural_vars, l)?;
            check_expr(func, structural_vars, r)
        }
        FuncPredicate::In { element, set } => {
            check_expr(func, structural_vars, element)?;
            check_expr(func, structural_vars, set)
        }
        FuncPredicate::And(l, r) | FuncPredicate::Or(l, r) => {
            check_predicate(func, structural_vars, l)?;
            check_predicate(func, structural_vars, r)
        }
        FuncPredicate::Not(inner) => check_predicate(func, structural_vars, inner),
    }
}
