//! End-to-end derivation over a hand-built Peano even/odd metamodel,
//! exercised through the `workbench-kernel` engines directly (no system
//! crate involved — these are pure, metamodel-only operations).

use workbench_base::Id;
use workbench_kernel::{
    analyze_syntax_directed, derive, match_pattern, substitute_pattern, Constructor, ConstructorArg, InferenceRule,
    Judgment, JudgmentArg, JudgmentInstance, MetaVariable, Metamodel, Pattern, Sort, Term, DEFAULT_MAX_DEPTH,
};

struct PeanoEvenOdd {
    metamodel: Metamodel,
    even: Id<Judgment>,
    odd: Id<Judgment>,
    zero: Id<Constructor>,
    succ: Id<Constructor>,
}

fn build() -> PeanoEvenOdd {
    let mut metamodel = Metamodel::new();
    let nat_id = metamodel.create_sort(Sort::new_inductive("Nat"));
    let zero = metamodel.create_constructor(Constructor::nullary(nat_id.clone(), "Z"));
    let succ = metamodel.create_constructor(Constructor::new(
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

    let e_zero = InferenceRule::new(
        "E-Zero",
        JudgmentInstance::new(even.clone(), vec![Pattern::Construct { constructor_id: zero.clone(), args: vec![] }]),
    );
    metamodel.create_rule(e_zero);

    let n = MetaVariable::new("n", nat_id.clone());
    let mut e_succ = InferenceRule::new(
        "E-Succ",
        JudgmentInstance::new(
            even.clone(),
            vec![Pattern::Construct {
                constructor_id: succ.clone(),
                args: vec![Pattern::MetaVar { metavariable_id: n.id.clone() }],
            }],
        ),
    );
    e_succ.premises.push(JudgmentInstance::new(odd.clone(), vec![Pattern::MetaVar { metavariable_id: n.id.clone() }]));
    e_succ.metavariables.push(n);
    metamodel.create_rule(e_succ);

    let n2 = MetaVariable::new("n", nat_id.clone());
    let mut o_succ = InferenceRule::new(
        "O-Succ",
        JudgmentInstance::new(
            odd.clone(),
            vec![Pattern::Construct {
                constructor_id: succ.clone(),
                args: vec![Pattern::MetaVar { metavariable_id: n2.id.clone() }],
            }],
        ),
    );
    o_succ.premises.push(JudgmentInstance::new(even.clone(), vec![Pattern::MetaVar { metavariable_id: n2.id.clone() }]));
    o_succ.metavariables.push(n2);
    metamodel.create_rule(o_succ);

    PeanoEvenOdd { metamodel, even, odd, zero, succ }
}

fn nat(fixture: &PeanoEvenOdd, n: u32) -> Term {
    let mut term = Term::construct(fixture.zero.clone(), vec![]);
    for _ in 0..n {
        term = Term::construct(fixture.succ.clone(), vec![term]);
    }
    term
}

#[test]
fn two_is_even_via_succ_odd_zero_chain() {
    let fixture = build();
    let two = nat(&fixture, 2);

    let derivation = derive(&fixture.metamodel, &fixture.even, &[two], DEFAULT_MAX_DEPTH).expect("2 is even");
    assert_eq!(derivation.rule_name, "E-Succ");
    assert_eq!(derivation.premises[0].rule_name, "O-Succ");
    assert_eq!(derivation.premises[0].premises[0].rule_name, "E-Zero");
}

#[test]
fn one_is_not_even() {
    let fixture = build();
    let one = nat(&fixture, 1);
    assert!(derive(&fixture.metamodel, &fixture.even, &[one], DEFAULT_MAX_DEPTH).is_none());
}

#[test]
fn both_judgments_are_syntax_directed() {
    let fixture = build();
    assert!(analyze_syntax_directed(&fixture.metamodel, &fixture.even));
    assert!(analyze_syntax_directed(&fixture.metamodel, &fixture.odd));
}

#[test]
fn pattern_binding_consistency_across_repeated_metavariable() {
    // Pair(x, x) matches Pair(Z, Z) binding x |-> Z, rejects Pair(Z, S(Z)),
    // and the binding round-trips back through substitution.
    let fixture = build();
    let x: Id<MetaVariable> = Id::fresh();
    let pair_pattern = Pattern::Construct {
        constructor_id: fixture.succ.clone(),
        args: vec![Pattern::MetaVar { metavariable_id: x.clone() }, Pattern::MetaVar { metavariable_id: x.clone() }],
    };
    let zero = nat(&fixture, 0);
    let one = nat(&fixture, 1);

    let mismatched = Term::construct(fixture.succ.clone(), vec![zero.clone(), one.clone()]);
    assert!(match_pattern(&mismatched, &pair_pattern).is_none());

    let matched = Term::construct(fixture.succ.clone(), vec![zero.clone(), zero.clone()]);
    let bindings = match_pattern(&matched, &pair_pattern).expect("Pair(Z, Z) matches Pair(x, x)");
    assert_eq!(bindings.get(&x), Some(&zero));

    let rebuilt = substitute_pattern(&pair_pattern, &bindings).expect("bindings cover every metavariable");
    assert_eq!(rebuilt, matched);
}
