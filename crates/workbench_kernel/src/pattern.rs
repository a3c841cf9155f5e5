//! Patterns: partial term shapes used in rule premises and conclusions.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::constructor::Constructor;
use crate::metamodel::Metamodel;
use crate::metavariable::MetaVariable;
use crate::term::Term;
use workbench_base::Id;

/// A rose tree whose leaves are a meta-variable reference, a nullary
/// constructor, or an empty hole. Interior nodes are constructor
/// applications whose arity matches the constructor they name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Pattern {
    MetaVar { metavariable_id: Id<MetaVariable> },
    Construct { constructor_id: Id<Constructor>, args: Vec<Pattern> },
    Hole,
}

/// Meta-variable bindings produced by a successful match.
pub type Bindings = HashMap<Id<MetaVariable>, Term>;

/// Recursively compares `term` against `pattern`, producing the bindings
/// that make them equal, or `None` on mismatch.
///
/// A meta-variable pattern unconditionally binds; a constructor pattern
/// requires the term to be a construction with the same constructor id and
/// arity, then merges the pairwise-recursive bindings, failing if the same
/// meta-variable is bound to two structurally unequal terms. Atom terms
/// never match constructor patterns, and holes never match anything.
pub fn match_pattern(term: &Term, pattern: &Pattern) -> Option<Bindings> {
    let mut bindings = Bindings::new();
    match_into(term, pattern, &mut bindings)?;
    Some(bindings)
}

/// Like [`match_pattern`], but extends an existing binding set instead of
/// starting fresh — used to match several argument patterns against several
/// terms in turn (e.g. a rule conclusion's whole argument tuple) while
/// requiring repeated meta-variables to agree across positions.
pub fn match_pattern_into(term: &Term, pattern: &Pattern, bindings: &mut Bindings) -> Option<()> {
    match_into(term, pattern, bindings)
}

fn match_into(term: &Term, pattern: &Pattern, bindings: &mut Bindings) -> Option<()> {
    match pattern {
        Pattern::Hole => None,
        Pattern::MetaVar { metavariable_id } => {
            if let Some(existing) = bindings.get(metavariable_id) {
                if existing == term {
                    Some(())
                } else {
                    None
                }
            } else {
                bindings.insert(metavariable_id.clone(), term.clone());
                Some(())
            }
        }
        Pattern::Construct { constructor_id, args } => match term {
            Term::Atom { .. } => None,
            Term::Construct {
                constructor_id: term_ctor,
                args: term_args,
            } => {
                if term_ctor != constructor_id || term_args.len() != args.len() {
                    return None;
                }
                for (t, p) in term_args.iter().zip(args.iter()) {
                    match_into(t, p, bindings)?;
                }
                Some(())
            }
        },
    }
}

/// Builds the term a complete pattern denotes under `bindings`. Fails if a
/// referenced meta-variable is unbound or the pattern still has a hole.
pub fn substitute_pattern(pattern: &Pattern, bindings: &Bindings) -> Option<Term> {
    match pattern {
        Pattern::Hole => None,
        Pattern::MetaVar { metavariable_id } => bindings.get(metavariable_id).cloned(),
        Pattern::Construct { constructor_id, args } => {
            let mut out = Vec::with_capacity(args.len());
            for arg in args {
                out.push(substitute_pattern(arg, bindings)?);
            }
            Some(Term::construct(constructor_id.clone(), out))
        }
    }
}

/// True iff every leaf of `pattern` is a meta-variable or nullary
/// constructor — no empty hole remains anywhere in the tree.
pub fn is_pattern_complete(pattern: &Pattern) -> bool {
    match pattern {
        Pattern::Hole => false,
        Pattern::MetaVar { .. } => true,
        Pattern::Construct { args, .. } => args.iter().all(is_pattern_complete),
    }
}

/// True iff a rule's conclusion and every premise pattern are complete.
pub fn is_rule_complete(conclusion: &Pattern, premises: &[Pattern]) -> bool {
    is_pattern_complete(conclusion) && premises.iter().all(is_pattern_complete)
}

/// Render a pattern, resolving constructor names against `metamodel` and
/// meta-variable names against the rule's own meta-variable list (callers
/// that have a [`Metamodel`] but no rule-local list can pass an empty
/// slice; unresolved meta-variables render as `?`).
pub fn render_pattern(pattern: &Pattern, metamodel: &Metamodel, metavariables: &[MetaVariable]) -> String {
    match pattern {
        Pattern::Hole => "_".to_string(),
        Pattern::MetaVar { metavariable_id } => metavariables
            .iter()
            .find(|mv| &mv.id == metavariable_id)
            .map(|mv| mv.name.clone())
            .unwrap_or_else(|| "?".to_string()),
        Pattern::Construct { constructor_id, args } => {
            let name = metamodel
                .constructor(constructor_id)
                .map(|c| c.name.as_str())
                .unwrap_or("<?>");
            if args.is_empty() {
                name.to_string()
            } else {
                let rendered: Vec<String> = args
                    .iter()
                    .map(|a| render_pattern(a, metamodel, metavariables))
                    .collect();
                format!("{}({})", name, rendered.join(", "))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sort::Sort;

    fn pair_fixture() -> (Id<Constructor>, Id<Constructor>, Id<MetaVariable>) {
        (Id::fresh(), Id::fresh(), Id::fresh())
    }

    #[test]
    fn repeated_metavariable_requires_equal_terms() {
        let (pair_ctor, zero_ctor, x) = pair_fixture();
        let nat: Id<Sort> = Id::fresh();
        let _ = &nat;
        let succ_ctor: Id<Constructor> = Id::fresh();

        let zero = Term::construct(zero_ctor.clone(), vec![]);
        let one = Term::construct(succ_ctor.clone(), vec![zero.clone()]);

        let pattern = Pattern::Construct {
            constructor_id: pair_ctor.clone(),
            args: vec![
                Pattern::MetaVar { metavariable_id: x.clone() },
                Pattern::MetaVar { metavariable_id: x.clone() },
            ],
        };

        let mismatched = Term::construct(pair_ctor.clone(), vec![zero.clone(), one.clone()]);
        assert!(match_pattern(&mismatched, &pattern).is_none());

        let matched = Term::construct(pair_ctor, vec![zero.clone(), zero.clone()]);
        let bindings = match_pattern(&matched, &pattern).expect("Pair(Z, Z) should match Pair(x, x)");
        assert_eq!(bindings.get(&x), Some(&zero));
    }

    #[test]
    fn hole_never_matches_and_is_never_complete() {
        let term = Term::construct(Id::fresh(), vec![]);
        assert!(match_pattern(&term, &Pattern::Hole).is_none());
        assert!(!is_pattern_complete(&Pattern::Hole));
    }

    #[test]
    fn substitute_then_match_round_trips_to_original_bindings() {
        let ctor: Id<Constructor> = Id::fresh();
        let x: Id<MetaVariable> = Id::fresh();
        let pattern = Pattern::Construct {
            constructor_id: ctor.clone(),
            args: vec![Pattern::MetaVar { metavariable_id: x.clone() }],
        };
        let nat_sort: Id<Sort> = Id::fresh();
        let mut bindings = Bindings::new();
        bindings.insert(x.clone(), Term::atom("n", nat_sort));

        let term = substitute_pattern(&pattern, &bindings).expect("complete pattern substitutes");
        let recovered = match_pattern(&term, &pattern).expect("substituted term matches its own pattern");
        assert_eq!(recovered, bindings);
    }
}
