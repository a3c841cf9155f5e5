//! Syntax-directedness analysis and bounded backward derivation search.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::function::{eval, FuncValue};
use crate::judgment::{Judgment, JudgmentInstance, SideCondition, SidePredicate};
use crate::metamodel::Metamodel;
use crate::pattern::{match_pattern_into, substitute_pattern, Bindings, Pattern};
use crate::rule::InferenceRule;
use crate::sort::Sort;
use crate::term::Term;
use workbench_base::Id;

/// Default bound on backward-search recursion depth (§5 resource bounds).
pub const DEFAULT_MAX_DEPTH: usize = 10;

/// A proof tree witnessing that a tuple of terms satisfies a judgment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Derivation {
    pub rule_name: String,
    pub rule_id: Id<InferenceRule>,
    pub conclusion: (Id<Judgment>, Vec<Term>),
    pub premises: Vec<Derivation>,
}

/// True iff patterns at the same conclusion position *could* describe
/// overlapping terms: a meta-variable or hole is maximally overlapping;
/// two constructor patterns overlap only if they name the same
/// constructor.
fn positions_could_overlap(a: &Pattern, b: &Pattern) -> bool {
    match (a, b) {
        (Pattern::Construct { constructor_id: c1, .. }, Pattern::Construct { constructor_id: c2, .. }) => c1 == c2,
        _ => true,
    }
}

fn rules_overlap(r1: &InferenceRule, r2: &InferenceRule) -> bool {
    if r1.conclusion.args.len() != r2.conclusion.args.len() {
        return false;
    }
    r1.conclusion
        .args
        .iter()
        .zip(r2.conclusion.args.iter())
        .all(|(p1, p2)| positions_could_overlap(p1, p2))
}

/// A judgment is syntax-directed iff no two of its rules overlap at every
/// conclusion position — i.e. every pair of rules is provably disjoint at
/// at least one position.
pub fn analyze_syntax_directed(metamodel: &Metamodel, judgment_id: &Id<Judgment>) -> bool {
    let rules: Vec<&InferenceRule> = metamodel.rules_for(judgment_id).collect();
    for (i, r1) in rules.iter().enumerate() {
        for r2 in rules.iter().skip(i + 1) {
            if rules_overlap(r1, r2) {
                return false;
            }
        }
    }
    true
}

fn eval_side_condition(metamodel: &Metamodel, side_condition: &SideCondition, bindings: &Bindings) -> Option<bool> {
    let function = metamodel.function(&side_condition.function_id)?;
    let argument_term = substitute_pattern(&side_condition.argument, bindings)?;
    let value = eval(metamodel, function, &argument_term, &[])?;

    match &side_condition.predicate {
        SidePredicate::Eq { literal } => match value {
            FuncValue::Int(n) => Some(n == *literal),
            _ => None,
        },
        SidePredicate::Neq { literal } => match value {
            FuncValue::Int(n) => Some(n != *literal),
            _ => None,
        },
        SidePredicate::Lt { literal } => match value {
            FuncValue::Int(n) => Some(n < *literal),
            _ => None,
        },
        SidePredicate::Leq { literal } => match value {
            FuncValue::Int(n) => Some(n <= *literal),
            _ => None,
        },
        SidePredicate::Gt { literal } => match value {
            FuncValue::Int(n) => Some(n > *literal),
            _ => None,
        },
        SidePredicate::Geq { literal } => match value {
            FuncValue::Int(n) => Some(n >= *literal),
            _ => None,
        },
        SidePredicate::IsEmpty => match value {
            FuncValue::Set(s) => Some(s.is_empty()),
            _ => None,
        },
        SidePredicate::NotEmpty => match value {
            FuncValue::Set(s) => Some(!s.is_empty()),
            _ => None,
        },
        SidePredicate::In { element } => {
            let element_term = substitute_pattern(element, bindings)?;
            let element_name = match element_term {
                Term::Atom { variable_name, .. } => variable_name,
                Term::Construct { .. } => return None,
            };
            match value {
                FuncValue::Set(s) => Some(s.contains(&element_name)),
                _ => None,
            }
        }
        SidePredicate::NotIn { element } => {
            let element_term = substitute_pattern(element, bindings)?;
            let element_name = match element_term {
                Term::Atom { variable_name, .. } => variable_name,
                Term::Construct { .. } => return None,
            };
            match value {
                FuncValue::Set(s) => Some(!s.contains(&element_name)),
                _ => None,
            }
        }
    }
}

/// Attempts to derive that `terms` satisfies `judgment_id`, searching
/// backward through the judgment's rules up to `max_depth` premise levels.
/// Per the design doc's resolution of the side-condition open question,
/// each rule's side conditions are evaluated after its premises derive
/// successfully, and the rule is pruned (not merely flagged) if any fails.
pub fn derive(metamodel: &Metamodel, judgment_id: &Id<Judgment>, terms: &[Term], max_depth: usize) -> Option<Derivation> {
    derive_at_depth(metamodel, judgment_id, terms, max_depth, 0)
}

fn derive_at_depth(
    metamodel: &Metamodel,
    judgment_id: &Id<Judgment>,
    terms: &[Term],
    max_depth: usize,
    depth: usize,
) -> Option<Derivation> {
    if depth > max_depth {
        return None;
    }

    'rules: for rule in metamodel.rules_for(judgment_id) {
        if !rule.is_complete() || rule.conclusion.args.len() != terms.len() {
            continue;
        }

        let mut bindings = Bindings::new();
        for (term, pattern) in terms.iter().zip(rule.conclusion.args.iter()) {
            if match_pattern_into(term, pattern, &mut bindings).is_none() {
                continue 'rules;
            }
        }

        let mut premise_derivations = Vec::with_capacity(rule.premises.len());
        for premise in &rule.premises {
            let premise_terms: Option<Vec<Term>> =
                premise.args.iter().map(|p| substitute_pattern(p, &bindings)).collect();
            let Some(premise_terms) = premise_terms else { continue 'rules };

            match derive_at_depth(metamodel, &premise.judgment_id, &premise_terms, max_depth, depth + 1) {
                Some(derivation) => premise_derivations.push(derivation),
                None => continue 'rules,
            }
        }

        for side_condition in &rule.side_conditions {
            match eval_side_condition(metamodel, side_condition, &bindings) {
                Some(true) => {}
                _ => continue 'rules,
            }
        }

        return Some(Derivation {
            rule_name: rule.name.clone(),
            rule_id: rule.id.clone(),
            conclusion: (judgment_id.clone(), terms.to_vec()),
            premises: premise_derivations,
        });
    }

    None
}

fn term_size(term: &Term) -> usize {
    match term {
        Term::Atom { .. } => 1,
        Term::Construct { args, .. } => 1 + args.iter().map(term_size).sum::<usize>(),
    }
}

/// Deterministic, depth-bounded enumeration of terms of `sort_id`, smallest
/// first, truncated to `limit` entries. Used by example enumeration rather
/// than [`crate::term::generate_random_term`], which is unbounded and
/// unordered by design.
pub fn enumerate_terms(metamodel: &Metamodel, sort_id: &Id<Sort>, max_depth: usize, limit: usize) -> Vec<Term> {
    let mut out = Vec::new();
    for depth in 0..=max_depth {
        if out.len() >= limit {
            break;
        }
        enumerate_terms_at_depth(metamodel, sort_id, depth, limit, &mut out);
    }
    out.truncate(limit);
    out
}

fn enumerate_terms_at_depth(metamodel: &Metamodel, sort_id: &Id<Sort>, depth: usize, limit: usize, out: &mut Vec<Term>) {
    let Some(sort) = metamodel.sort(sort_id) else { return };
    if sort.is_atom() {
        if depth == 0 {
            let prefix = sort.atom_prefix.as_deref().unwrap_or("a");
            out.push(Term::atom(format!("{}1", prefix), sort_id.clone()));
        }
        return;
    }

    for constructor in metamodel.constructors_of(sort_id) {
        if out.len() >= limit {
            return;
        }
        if constructor.args.is_empty() {
            if depth == 0 {
                out.push(Term::construct(constructor.id.clone(), vec![]));
            }
            continue;
        }
        if depth == 0 {
            continue;
        }
        let arg_options: Vec<Vec<Term>> = constructor
            .args
            .iter()
            .map(|arg| {
                let mut per_arg = Vec::new();
                for d in 0..depth {
                    enumerate_terms_at_depth(metamodel, &arg.sort_id, d, limit, &mut per_arg);
                }
                per_arg
            })
            .collect();
        for combo in cartesian_product(&arg_options) {
            if out.len() >= limit {
                return;
            }
            out.push(Term::construct(constructor.id.clone(), combo));
        }
    }
}

fn cartesian_product(options: &[Vec<Term>]) -> Vec<Vec<Term>> {
    let mut result: Vec<Vec<Term>> = vec![vec![]];
    for option in options {
        let mut next = Vec::new();
        for prefix in &result {
            for term in option {
                let mut candidate = prefix.clone();
                candidate.push(term.clone());
                next.push(candidate);
            }
        }
        result = next;
    }
    result
}

/// Classified example tuples for a judgment: positives derive, negatives
/// don't, each capped at `max_examples` and surfaced smallest-first.
#[derive(Debug, Clone, Default)]
pub struct ExampleSet {
    pub positive: Vec<Vec<Term>>,
    pub negative: Vec<Vec<Term>>,
}

/// Enumerates bounded term tuples for `judgment_id`'s argument positions
/// and classifies each through [`derive`], smallest combined size first,
/// until `max_examples` of each polarity are found or candidates run out.
pub fn enumerate_examples(
    metamodel: &Metamodel,
    judgment_id: &Id<Judgment>,
    max_term_depth: usize,
    max_per_position: usize,
    max_per_sort: usize,
    max_examples: usize,
) -> Option<ExampleSet> {
    let judgment = metamodel.judgment(judgment_id)?;
    let per_position: Vec<Vec<Term>> = judgment
        .arg_sorts
        .iter()
        .map(|arg| {
            let mut candidates = enumerate_terms(metamodel, &arg.sort_id, max_term_depth, max_per_sort);
            candidates.truncate(max_per_position);
            candidates
        })
        .collect();

    let mut tuples: Vec<(usize, Vec<Term>)> = cartesian_product(&per_position)
        .into_iter()
        .map(|tuple| {
            let size = tuple.iter().map(term_size).sum();
            (size, tuple)
        })
        .collect();
    tuples.sort_by_key(|(size, _)| *size);

    let mut seen_renders = HashSet::new();
    let mut result = ExampleSet::default();
    for (_, tuple) in tuples {
        if result.positive.len() >= max_examples && result.negative.len() >= max_examples {
            break;
        }
        let render_key: Vec<String> = tuple.iter().map(|t| t.render(metamodel)).collect();
        if !seen_renders.insert(render_key) {
            continue;
        }
        let derivable = derive(metamodel, judgment_id, &tuple, DEFAULT_MAX_DEPTH).is_some();
        if derivable && result.positive.len() < max_examples {
            result.positive.push(tuple);
        } else if !derivable && result.negative.len() < max_examples {
            result.negative.push(tuple);
        }
    }
    Some(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constructor::{Constructor, ConstructorArg};
    use crate::judgment::{Judgment, JudgmentArg, JudgmentInstance};
    use crate::metavariable::MetaVariable;
    use crate::pattern::Pattern;
    use crate::sort::Sort;

    struct PeanoEvenOdd {
        metamodel: Metamodel,
        even: Id<Judgment>,
        odd: Id<Judgment>,
        zero_ctor: Id<Constructor>,
        succ_ctor: Id<Constructor>,
    }

    fn peano_even_odd() -> PeanoEvenOdd {
        let mut metamodel = Metamodel::new();
        let nat = Sort::new_inductive("Nat");
        let nat_id = metamodel.create_sort(nat);
        let zero_ctor = metamodel.create_constructor(Constructor::nullary(nat_id.clone(), "Z"));
        let succ_ctor = metamodel.create_constructor(Constructor::new(
            nat_id.clone(),
            "S",
            vec![ConstructorArg::new(nat_id.clone()).with_label("n")],
        ));

        let even = metamodel.create_judgment(
            Judgment::new(
                "even",
                "even",
                vec![JudgmentArg { sort_id: nat_id.clone(), label: "n".into() }],
                vec!["".into(), " even".into()],
            )
            .unwrap(),
        );
        let odd = metamodel.create_judgment(
            Judgment::new(
                "odd",
                "odd",
                vec![JudgmentArg { sort_id: nat_id.clone(), label: "n".into() }],
                vec!["".into(), " odd".into()],
            )
            .unwrap(),
        );

        // E-Zero: |- Z even
        let e_zero = InferenceRule::new(
            "E-Zero",
            JudgmentInstance::new(even.clone(), vec![Pattern::Construct { constructor_id: zero_ctor.clone(), args: vec![] }]),
        );
        metamodel.create_rule(e_zero);

        // E-Succ: n odd |- S(n) even
        let n = MetaVariable::new("n", nat_id.clone());
        let mut e_succ = InferenceRule::new(
            "E-Succ",
            JudgmentInstance::new(
                even.clone(),
                vec![Pattern::Construct {
                    constructor_id: succ_ctor.clone(),
                    args: vec![Pattern::MetaVar { metavariable_id: n.id.clone() }],
                }],
            ),
        );
        e_succ.premises.push(JudgmentInstance::new(odd.clone(), vec![Pattern::MetaVar { metavariable_id: n.id.clone() }]));
        e_succ.metavariables.push(n);
        metamodel.create_rule(e_succ);

        // O-Succ: n even |- S(n) odd
        let n2 = MetaVariable::new("n", nat_id.clone());
        let mut o_succ = InferenceRule::new(
            "O-Succ",
            JudgmentInstance::new(
                odd.clone(),
                vec![Pattern::Construct {
                    constructor_id: succ_ctor.clone(),
                    args: vec![Pattern::MetaVar { metavariable_id: n2.id.clone() }],
                }],
            ),
        );
        o_succ.premises.push(JudgmentInstance::new(even.clone(), vec![Pattern::MetaVar { metavariable_id: n2.id.clone() }]));
        o_succ.metavariables.push(n2);
        metamodel.create_rule(o_succ);

        PeanoEvenOdd { metamodel, even, odd, zero_ctor, succ_ctor }
    }

    #[test]
    fn derives_two_is_even_but_not_one() {
        let fixture = peano_even_odd();
        let zero = Term::construct(fixture.zero_ctor.clone(), vec![]);
        let one = Term::construct(fixture.succ_ctor.clone(), vec![zero.clone()]);
        let two = Term::construct(fixture.succ_ctor.clone(), vec![one.clone()]);

        let derivation = derive(&fixture.metamodel, &fixture.even, &[two], DEFAULT_MAX_DEPTH);
        assert!(derivation.is_some());
        let derivation = derivation.unwrap();
        assert_eq!(derivation.rule_name, "E-Succ");
        assert_eq!(derivation.premises[0].rule_name, "O-Succ");
        assert_eq!(derivation.premises[0].premises[0].rule_name, "E-Zero");

        assert!(derive(&fixture.metamodel, &fixture.even, &[one], DEFAULT_MAX_DEPTH).is_none());
    }

    #[test]
    fn even_and_odd_judgments_are_syntax_directed() {
        let fixture = peano_even_odd();
        assert!(analyze_syntax_directed(&fixture.metamodel, &fixture.even));
        assert!(analyze_syntax_directed(&fixture.metamodel, &fixture.odd));
    }
}
