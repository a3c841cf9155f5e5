//! Proof state and the tactic interpreter.
//!
//! A [`Proof`] is a tree of [`ProofGoal`]s plus an append-only step log.
//! [`apply_tactic`] is total: it either produces a (possibly empty)
//! ordered sequence of new goals, bookkeeping them into the proof, or
//! returns a [`TacticError`] that leaves the proof completely unchanged —
//! "failure is never fatal to the proof" (design doc §4.5).

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use workbench_kernel::{Metamodel, RecursiveFunc, Sort, SortKind};
use workbench_base::Id;

use crate::error::{TacticError, TacticResult};
use crate::formula::{
    can_prove_geq, is_positive, simplify_expr, simplify_formula, subst_formula, unfold_func_app, Formula, FormulaExpr,
    UnfoldOutcome,
};
use crate::property::Property;

/// Which side of a two-sided comparison a tactic acts on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    Left,
    Right,
}

/// A goal's local context: the variables it quantifies over and the
/// hypotheses available to close it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GoalContext {
    pub variables: Vec<(String, Id<Sort>)>,
    pub hypotheses: Vec<(String, Formula)>,
}

impl GoalContext {
    fn names(&self) -> HashSet<String> {
        self.variables
            .iter()
            .map(|(n, _)| n.clone())
            .chain(self.hypotheses.iter().map(|(n, _)| n.clone()))
            .collect()
    }

    fn hypothesis(&self, name: &str) -> Option<&Formula> {
        self.hypotheses.iter().find(|(n, _)| n == name).map(|(_, f)| f)
    }

    fn variable_sort(&self, name: &str) -> Option<&Id<Sort>> {
        self.variables.iter().find(|(n, _)| n == name).map(|(_, s)| s)
    }
}

/// One open goal in a [`Proof`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProofGoal {
    pub id: Id<ProofGoal>,
    pub context: GoalContext,
    pub goal: Formula,
}

impl ProofGoal {
    fn child(&self, goal: Formula) -> Self {
        ProofGoal { id: Id::fresh(), context: self.context.clone(), goal }
    }
}

/// A named, named-tag tactic invocation. `#[serde(tag = "kind")]` gives a
/// JSON shape the headless driver can read as `{"kind": "intro", ...}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Tactic {
    Intro { var_name: String },
    IntroHyp { name: String },
    ExistsWitness { witness: FormulaExpr },
    Split,
    Left,
    Right,
    Induction { var_name: String },
    CaseAnalysis { var_name: String },
    Reflexivity,
    Trivial,
    Exact { name: String },
    Apply { name: String },
    Discriminate { name: String },
    Unfold { function_id: Id<RecursiveFunc>, side: Side },
    Simplify,
    Rewrite,
    DerivationInduction,
    ApplyRule,
    Contradiction,
    Compute,
}

impl Tactic {
    fn name(&self) -> &'static str {
        match self {
            Tactic::Intro { .. } => "intro",
            Tactic::IntroHyp { .. } => "intro_hyp",
            Tactic::ExistsWitness { .. } => "exists_witness",
            Tactic::Split => "split",
            Tactic::Left => "left",
            Tactic::Right => "right",
            Tactic::Induction { .. } => "induction",
            Tactic::CaseAnalysis { .. } => "case_analysis",
            Tactic::Reflexivity => "reflexivity",
            Tactic::Trivial => "trivial",
            Tactic::Exact { .. } => "exact",
            Tactic::Apply { .. } => "apply",
            Tactic::Discriminate { .. } => "discriminate",
            Tactic::Unfold { .. } => "unfold",
            Tactic::Simplify => "simplify",
            Tactic::Rewrite => "rewrite",
            Tactic::DerivationInduction => "derivation_induction",
            Tactic::ApplyRule => "apply_rule",
            Tactic::Contradiction => "contradiction",
            Tactic::Compute => "compute",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProofStatus {
    Incomplete,
    Complete,
}

/// One entry in the proof's append-only step log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProofStep {
    pub goal_id: Id<ProofGoal>,
    pub tactic: Tactic,
    pub produced_goal_ids: Vec<Id<ProofGoal>>,
}

/// A proof in progress: the goal tree, the open frontier, and the step
/// log, per the design doc's `Proof` record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Proof {
    pub id: Id<Proof>,
    pub property_id: Id<Property>,
    pub goals: workbench_base::Registry<ProofGoal>,
    pub root_goal_id: Id<ProofGoal>,
    pub open_goals: Vec<Id<ProofGoal>>,
    pub steps: Vec<ProofStep>,
    pub status: ProofStatus,
}

impl Proof {
    /// Starts a fresh proof of `property`'s statement: a single open root
    /// goal with an empty context.
    pub fn start(property: &Property) -> Self {
        let root = ProofGoal { id: Id::fresh(), context: GoalContext::default(), goal: property.statement.clone() };
        let root_id = root.id.clone();
        let mut goals = workbench_base::Registry::new();
        goals.insert(root_id.clone(), root);
        Proof {
            id: Id::fresh(),
            property_id: property.id.clone(),
            goals,
            root_goal_id: root_id.clone(),
            open_goals: vec![root_id],
            steps: Vec::new(),
            status: ProofStatus::Incomplete,
        }
    }

    pub fn goal(&self, id: &Id<ProofGoal>) -> Option<&ProofGoal> {
        self.goals.get(id)
    }
}

/// `isGoalTrivial` (§6 Queries): true iff `goal` is literally `true` or
/// matches a hypothesis by structural equality — the same check `trivial`
/// performs, exposed standalone so the UI can offer/hide the tactic
/// without risking proof state.
pub fn is_goal_trivial(goal: &Formula, hypotheses: &[(String, Formula)]) -> bool {
    matches!(goal, Formula::True) || hypotheses.iter().any(|(_, h)| h == goal)
}

/// Applies `tactic` to the open goal `goal_id` within `proof`. On success,
/// removes `goal_id` from `open_goals`, inserts the produced goals into
/// `proof.goals`, appends their ids (in order) to `open_goals`, and logs
/// the step. On failure, `proof` is left byte-for-byte unchanged.
pub fn apply_tactic(
    metamodel: &Metamodel,
    proof: &mut Proof,
    goal_id: &Id<ProofGoal>,
    tactic: Tactic,
) -> TacticResult<Vec<Id<ProofGoal>>> {
    if !proof.open_goals.contains(goal_id) {
        return Err(TacticError::NotFound { kind: "open ProofGoal", id: goal_id.to_string() });
    }
    let current = proof
        .goals
        .get(goal_id)
        .cloned()
        .ok_or_else(|| TacticError::NotFound { kind: "ProofGoal", id: goal_id.to_string() })?;

    let produced = dispatch(metamodel, &current, &tactic)?;

    proof.open_goals.retain(|id| id != goal_id);
    let mut produced_ids = Vec::with_capacity(produced.len());
    for goal in produced {
        let id = goal.id.clone();
        proof.goals.insert(id.clone(), goal);
        proof.open_goals.push(id.clone());
        produced_ids.push(id);
    }
    proof.steps.push(ProofStep { goal_id: goal_id.clone(), tactic, produced_goal_ids: produced_ids.clone() });
    if proof.open_goals.is_empty() {
        proof.status = ProofStatus::Complete;
    }
    Ok(produced_ids)
}

fn dispatch(metamodel: &Metamodel, goal: &ProofGoal, tactic: &Tactic) -> TacticResult<Vec<ProofGoal>> {
    match tactic {
        Tactic::Intro { var_name } => intro(goal, var_name),
        Tactic::IntroHyp { name } => intro_hyp(goal, name),
        Tactic::ExistsWitness { witness } => exists_witness(goal, witness),
        Tactic::Split => split(goal),
        Tactic::Left => left(goal),
        Tactic::Right => right(goal),
        Tactic::Induction { var_name } => induction(metamodel, goal, var_name, true),
        Tactic::CaseAnalysis { var_name } => induction(metamodel, goal, var_name, false),
        Tactic::Reflexivity => reflexivity(goal),
        Tactic::Trivial => trivial(goal),
        Tactic::Exact { name } => exact(goal, name),
        Tactic::Apply { name } => apply(goal, name),
        Tactic::Discriminate { name } => discriminate(goal, name),
        Tactic::Unfold { function_id, side } => unfold(metamodel, goal, function_id, *side),
        Tactic::Simplify => simplify(goal),
        Tactic::Rewrite
        | Tactic::DerivationInduction
        | Tactic::ApplyRule
        | Tactic::Contradiction
        | Tactic::Compute => Err(TacticError::Unsupported { tactic: tactic.name().to_string() }),
    }
}

fn mismatch(tactic: &str, reason: impl Into<String>) -> TacticError {
    TacticError::GoalShapeMismatch { tactic: tactic.to_string(), reason: reason.into() }
}

fn intro(goal: &ProofGoal, var_name: &str) -> TacticResult<Vec<ProofGoal>> {
    let Formula::Forall { var, sort_id, body } = &goal.goal else {
        return Err(mismatch("intro", "goal is not a universal quantifier"));
    };
    if var_name != var && goal.context.names().contains(var_name) {
        return Err(TacticError::NameCollision { name: var_name.to_string() });
    }
    let mut child = goal.child(subst_formula(body, var, &FormulaExpr::Var(var_name.to_string())));
    child.context.variables.push((var_name.to_string(), sort_id.clone()));
    Ok(vec![child])
}

fn intro_hyp(goal: &ProofGoal, name: &str) -> TacticResult<Vec<ProofGoal>> {
    let Formula::Implies(antecedent, consequent) = &goal.goal else {
        return Err(mismatch("intro_hyp", "goal is not an implication"));
    };
    if goal.context.names().contains(name) {
        return Err(TacticError::NameCollision { name: name.to_string() });
    }
    let mut child = goal.child((**consequent).clone());
    child.context.hypotheses.push((name.to_string(), (**antecedent).clone()));
    Ok(vec![child])
}

fn exists_witness(goal: &ProofGoal, witness: &FormulaExpr) -> TacticResult<Vec<ProofGoal>> {
    let Formula::Exists { var, body, .. } = &goal.goal else {
        return Err(mismatch("exists_witness", "goal is not an existential quantifier"));
    };
    let mut free = std::collections::BTreeSet::new();
    crate::formula::free_vars_expr(witness, &mut free);
    let bound_in_scope: HashSet<&str> = goal.context.variables.iter().map(|(n, _)| n.as_str()).collect();
    if let Some(collision) = free.iter().find(|name| bound_in_scope.contains(name.as_str())) {
        return Err(TacticError::NameCollision { name: collision.clone() });
    }
    Ok(vec![goal.child(subst_formula(body, var, witness))])
}

fn split(goal: &ProofGoal) -> TacticResult<Vec<ProofGoal>> {
    let Formula::And(l, r) = &goal.goal else {
        return Err(mismatch("split", "goal is not a conjunction"));
    };
    Ok(vec![goal.child((**l).clone()), goal.child((**r).clone())])
}

fn left(goal: &ProofGoal) -> TacticResult<Vec<ProofGoal>> {
    let Formula::Or(l, _) = &goal.goal else {
        return Err(mismatch("left", "goal is not a disjunction"));
    };
    Ok(vec![goal.child((**l).clone())])
}

fn right(goal: &ProofGoal) -> TacticResult<Vec<ProofGoal>> {
    let Formula::Or(_, r) = &goal.goal else {
        return Err(mismatch("right", "goal is not a disjunction"));
    };
    Ok(vec![goal.child((**r).clone())])
}

fn fresh_name(base: &str, used: &mut HashSet<String>) -> String {
    let mut candidate = base.to_string();
    let mut suffix = 0u32;
    while used.contains(&candidate) {
        suffix += 1;
        candidate = format!("{}{}", base, suffix);
    }
    used.insert(candidate.clone());
    candidate
}

fn induction(
    metamodel: &Metamodel,
    goal: &ProofGoal,
    var_name: &str,
    with_hypothesis: bool,
) -> TacticResult<Vec<ProofGoal>> {
    let sort_id = goal
        .context
        .variable_sort(var_name)
        .cloned()
        .ok_or_else(|| TacticError::VariableNotFound { name: var_name.to_string() })?;
    let sort = metamodel
        .sort(&sort_id)
        .ok_or_else(|| TacticError::NotFound { kind: "Sort", id: sort_id.to_string() })?;
    if sort.kind != SortKind::Inductive {
        return Err(TacticError::SortNotInductive { sort_name: sort.name.clone() });
    }

    let mut goals = Vec::new();
    for constructor in metamodel.constructors_of(&sort_id) {
        let mut used_names = goal.context.names();
        used_names.remove(var_name);

        let mut fresh_args = Vec::with_capacity(constructor.args.len());
        for (i, arg) in constructor.args.iter().enumerate() {
            let base = arg.label.clone().unwrap_or_else(|| format!("{}{}", var_name, i));
            fresh_args.push((fresh_name(&base, &mut used_names), arg.sort_id.clone()));
        }

        let mut new_context = GoalContext {
            variables: goal.context.variables.iter().filter(|(n, _)| n != var_name).cloned().collect(),
            hypotheses: goal.context.hypotheses.clone(),
        };

        if with_hypothesis {
            for (fresh, arg_sort) in fresh_args.iter() {
                if arg_sort == &sort_id {
                    let ih_goal = subst_formula(&goal.goal, var_name, &FormulaExpr::Var(fresh.clone()));
                    let ih_name = fresh_name(&format!("IH_{}", fresh), &mut used_names);
                    new_context.hypotheses.push((ih_name, ih_goal));
                }
            }
        }

        new_context.variables.extend(fresh_args.iter().cloned());

        let instance = FormulaExpr::Construct {
            constructor_id: constructor.id.clone(),
            args: fresh_args.iter().map(|(name, _)| FormulaExpr::Var(name.clone())).collect(),
        };
        let new_goal = subst_formula(&goal.goal, var_name, &instance);
        goals.push(ProofGoal { id: Id::fresh(), context: new_context, goal: new_goal });
    }
    Ok(goals)
}

fn comparison_sides(goal: &Formula) -> Option<(FormulaExpr, FormulaExpr)> {
    match goal {
        Formula::TermEq(l, r)
        | Formula::NumEq(l, r)
        | Formula::NumLeq(l, r)
        | Formula::NumGeq(l, r)
        | Formula::NumLt(l, r)
        | Formula::NumGt(l, r) => Some((l.clone(), r.clone())),
        _ => None,
    }
}

fn reflexivity(goal: &ProofGoal) -> TacticResult<Vec<ProofGoal>> {
    let allowed = matches!(
        goal.goal,
        Formula::TermEq(..) | Formula::NumEq(..) | Formula::NumLeq(..) | Formula::NumGeq(..)
    );
    if !allowed {
        return Err(mismatch("reflexivity", "goal is not an equality or a <=/>= comparison"));
    }
    let (l, r) = comparison_sides(&goal.goal).expect("allowed variants all have two sides");
    if simplify_expr(&l) == simplify_expr(&r) {
        Ok(vec![])
    } else {
        Err(mismatch("reflexivity", "sides are not syntactically equal after simplification"))
    }
}

fn trivial(goal: &ProofGoal) -> TacticResult<Vec<ProofGoal>> {
    if is_goal_trivial(&goal.goal, &goal.context.hypotheses) {
        Ok(vec![])
    } else {
        Err(mismatch("trivial", "goal is neither `true` nor an exact hypothesis match"))
    }
}

fn exact(goal: &ProofGoal, name: &str) -> TacticResult<Vec<ProofGoal>> {
    let hypothesis = goal
        .context
        .hypothesis(name)
        .ok_or_else(|| TacticError::HypothesisNotFound { name: name.to_string() })?;
    if hypothesis == &goal.goal {
        Ok(vec![])
    } else {
        Err(mismatch("exact", format!("hypothesis `{}` does not match the goal", name)))
    }
}

fn apply(goal: &ProofGoal, name: &str) -> TacticResult<Vec<ProofGoal>> {
    let hypothesis = goal
        .context
        .hypothesis(name)
        .ok_or_else(|| TacticError::HypothesisNotFound { name: name.to_string() })?;
    let Formula::Implies(antecedent, consequent) = hypothesis else {
        return Err(mismatch("apply", format!("hypothesis `{}` is not an implication", name)));
    };
    if **consequent != goal.goal {
        return Err(mismatch("apply", format!("hypothesis `{}`'s consequent does not match the goal", name)));
    }
    Ok(vec![goal.child((**antecedent).clone())])
}

fn head_constructor(expr: &FormulaExpr) -> Option<&Id<workbench_kernel::Constructor>> {
    match expr {
        FormulaExpr::Construct { constructor_id, .. } => Some(constructor_id),
        _ => None,
    }
}

fn discriminate(goal: &ProofGoal, name: &str) -> TacticResult<Vec<ProofGoal>> {
    let hypothesis = goal
        .context
        .hypothesis(name)
        .ok_or_else(|| TacticError::HypothesisNotFound { name: name.to_string() })?;
    let Formula::TermEq(l, r) = hypothesis else {
        return Err(mismatch("discriminate", format!("hypothesis `{}` is not a term equality", name)));
    };
    match (head_constructor(l), head_constructor(r)) {
        (Some(a), Some(b)) if a != b => Ok(vec![]),
        _ => Err(mismatch("discriminate", format!("hypothesis `{}` is not provably head-distinct", name))),
    }
}

fn rebuild_comparison(goal: &Formula, new_l: FormulaExpr, new_r: FormulaExpr) -> Formula {
    match goal {
        Formula::TermEq(..) => Formula::TermEq(new_l, new_r),
        Formula::NumEq(..) => Formula::NumEq(new_l, new_r),
        Formula::NumLeq(..) => Formula::NumLeq(new_l, new_r),
        Formula::NumGeq(..) => Formula::NumGeq(new_l, new_r),
        Formula::NumLt(..) => Formula::NumLt(new_l, new_r),
        Formula::NumGt(..) => Formula::NumGt(new_l, new_r),
        other => other.clone(),
    }
}

fn unfold(
    metamodel: &Metamodel,
    goal: &ProofGoal,
    function_id: &Id<RecursiveFunc>,
    side: Side,
) -> TacticResult<Vec<ProofGoal>> {
    let (l, r) = comparison_sides(&goal.goal).ok_or_else(|| mismatch("unfold", "goal is not a comparison"))?;
    let func = metamodel
        .function(function_id)
        .ok_or_else(|| TacticError::NotFound { kind: "RecursiveFunc", id: function_id.to_string() })?;
    let target = match side {
        Side::Left => &l,
        Side::Right => &r,
    };
    match unfold_func_app(target, func) {
        UnfoldOutcome::Unfolded(new_side) => {
            let new_goal = match side {
                Side::Left => rebuild_comparison(&goal.goal, new_side, r),
                Side::Right => rebuild_comparison(&goal.goal, l, new_side),
            };
            Ok(vec![goal.child(new_goal)])
        }
        UnfoldOutcome::Unsupported => Err(TacticError::Unsupported { tactic: "unfold".to_string() }),
        UnfoldOutcome::NotFound => {
            Err(mismatch("unfold", "no outermost application of this function over a constructor was found"))
        }
    }
}

fn try_close(goal: &Formula, hypotheses: &[(String, Formula)]) -> bool {
    let hyps: Vec<Formula> = hypotheses.iter().map(|(_, h)| h.clone()).collect();
    match goal {
        Formula::True => true,
        Formula::NumGeq(l, r) => can_prove_geq(l, r, &hyps),
        Formula::NumGt(l, r) => is_positive(&FormulaExpr::sub(l.clone(), r.clone()), &hyps),
        Formula::NumLeq(l, r) => can_prove_geq(r, l, &hyps),
        Formula::NumLt(l, r) => is_positive(&FormulaExpr::sub(r.clone(), l.clone()), &hyps),
        Formula::NumEq(l, r) | Formula::TermEq(l, r) => simplify_expr(l) == simplify_expr(r),
        _ => false,
    }
}

fn simplify(goal: &ProofGoal) -> TacticResult<Vec<ProofGoal>> {
    let simplified = simplify_formula(&goal.goal);
    if try_close(&simplified, &goal.context.hypotheses) {
        Ok(vec![])
    } else {
        Ok(vec![goal.child(simplified)])
    }
}

/// Convenience: renders a goal's statement for display, used by the
/// headless driver's JSON responses.
pub fn render_goal(goal: &ProofGoal, metamodel: &Metamodel) -> String {
    crate::formula::render_formula(&goal.goal, metamodel)
}

#[cfg(test)]
mod tests {
    use super::*;
    use workbench_kernel::{Constructor, ConstructorArg, FuncReturnType, RecursiveFunc as Func};

    fn peano_metamodel() -> (Metamodel, Id<Sort>, Id<workbench_kernel::Constructor>, Id<workbench_kernel::Constructor>) {
        let mut metamodel = Metamodel::new();
        let nat = workbench_kernel::Sort::new_inductive("Nat");
        let nat_id = metamodel.create_sort(nat);
        let zero = Constructor::nullary(nat_id.clone(), "Z");
        let zero_id = metamodel.create_constructor(zero);
        let succ = Constructor::new(nat_id.clone(), "S", vec![ConstructorArg::new(nat_id.clone()).with_label("n")]);
        let succ_id = metamodel.create_constructor(succ);
        (metamodel, nat_id, zero_id, succ_id)
    }

    #[test]
    fn induction_produces_one_goal_per_constructor_with_hypothesis() {
        let (metamodel, nat_id, zero_id, succ_id) = peano_metamodel();
        let size_fn = Id::fresh();
        let goal_formula = Formula::NumGeq(
            FormulaExpr::FuncApp { function_id: size_fn.clone(), args: vec![FormulaExpr::Var("n".into())] },
            FormulaExpr::IntLiteral(0),
        );
        let property = Property::new("size_nonneg", Formula::Forall { var: "n".into(), sort_id: nat_id.clone(), body: Box::new(goal_formula) });
        let mut proof = Proof::start(&property);
        let root_id = proof.root_goal_id.clone();

        let produced = apply_tactic(&metamodel, &mut proof, &root_id, Tactic::Intro { var_name: "n".into() }).unwrap();
        assert_eq!(produced.len(), 1);
        let after_intro = produced[0].clone();

        let produced = apply_tactic(&metamodel, &mut proof, &after_intro, Tactic::Induction { var_name: "n".into() }).unwrap();
        assert_eq!(produced.len(), 2);

        let zero_case = proof.goal(&produced[0]).unwrap();
        assert!(zero_case.context.hypotheses.is_empty());
        if let Formula::NumGeq(FormulaExpr::FuncApp { args, .. }, _) = &zero_case.goal {
            assert_eq!(args[0], FormulaExpr::Construct { constructor_id: zero_id.clone(), args: vec![] });
        } else {
            panic!("expected NumGeq goal");
        }

        let succ_case = proof.goal(&produced[1]).unwrap();
        assert_eq!(succ_case.context.hypotheses.len(), 1);
        if let Formula::NumGeq(FormulaExpr::FuncApp { args, .. }, _) = &succ_case.goal {
            match &args[0] {
                FormulaExpr::Construct { constructor_id, .. } => assert_eq!(constructor_id, &succ_id),
                _ => panic!("expected constructor application"),
            }
        } else {
            panic!("expected NumGeq goal");
        }
    }

    #[test]
    fn discriminate_closes_any_goal_from_distinct_constructors() {
        let (metamodel, nat_id, zero_id, succ_id) = peano_metamodel();
        let property = Property::new("anything", Formula::False);
        let mut proof = Proof::start(&property);
        let root_id = proof.root_goal_id.clone();

        proof.goals.get_mut(&root_id).unwrap().context.hypotheses.push((
            "H".into(),
            Formula::TermEq(
                FormulaExpr::Construct { constructor_id: zero_id, args: vec![] },
                FormulaExpr::Construct {
                    constructor_id: succ_id,
                    args: vec![FormulaExpr::Var("n".into())],
                },
            ),
        ));
        let _ = nat_id;

        let produced = apply_tactic(&metamodel, &mut proof, &root_id, Tactic::Discriminate { name: "H".into() }).unwrap();
        assert!(produced.is_empty());
        assert_eq!(proof.status, ProofStatus::Complete);
    }

    #[test]
    fn failing_tactic_leaves_proof_state_untouched() {
        let (metamodel, _nat_id, _zero, _succ) = peano_metamodel();
        let property = Property::new("trivially_false", Formula::False);
        let proof_before = Proof::start(&property);
        let mut proof = proof_before.clone();
        let root_id = proof.root_goal_id.clone();

        let err = apply_tactic(&metamodel, &mut proof, &root_id, Tactic::Split).unwrap_err();
        assert!(matches!(err, TacticError::GoalShapeMismatch { .. }));
        assert_eq!(proof.open_goals, proof_before.open_goals);
        assert_eq!(proof.steps.len(), proof_before.steps.len());
    }

    #[test]
    fn unfold_then_reflexivity_closes_size_successor_goal() {
        let (mut metamodel, nat_id, zero_id, succ_id) = peano_metamodel();
        let mut size_fn = Func::new("size", nat_id.clone(), vec![], FuncReturnType::Int);
        size_fn.cases.push(workbench_kernel::FuncCase {
            constructor_id: zero_id,
            bound_vars: vec![],
            body: workbench_kernel::FuncExpr::IntLiteral(0),
        });
        size_fn.cases.push(workbench_kernel::FuncCase {
            constructor_id: succ_id.clone(),
            bound_vars: vec!["n".to_string()],
            body: workbench_kernel::FuncExpr::BinOp {
                op: workbench_kernel::FuncBinOp::Add,
                lhs: Box::new(workbench_kernel::FuncExpr::IntLiteral(1)),
                rhs: Box::new(workbench_kernel::FuncExpr::Call {
                    function_id: size_fn.id.clone(),
                    args: vec![workbench_kernel::FuncExpr::Var("n".to_string())],
                }),
            },
        });
        let function_id = metamodel.create_function(size_fn);

        // size(S(n)) = 1 + size(n)
        let goal_formula = Formula::NumEq(
            FormulaExpr::FuncApp {
                function_id: function_id.clone(),
                args: vec![FormulaExpr::Construct {
                    constructor_id: succ_id,
                    args: vec![FormulaExpr::Var("n".into())],
                }],
            },
            FormulaExpr::add(FormulaExpr::IntLiteral(1), FormulaExpr::FuncApp {
                function_id: function_id.clone(),
                args: vec![FormulaExpr::Var("n".into())],
            }),
        );
        let property = Property::new("size_succ", goal_formula);
        let mut proof = Proof::start(&property);
        let root_id = proof.root_goal_id.clone();

        let produced = apply_tactic(
            &metamodel,
            &mut proof,
            &root_id,
            Tactic::Unfold { function_id, side: Side::Left },
        )
        .unwrap();
        assert_eq!(produced.len(), 1);

        let produced = apply_tactic(&metamodel, &mut proof, &produced[0], Tactic::Reflexivity).unwrap();
        assert!(produced.is_empty());
        assert_eq!(proof.status, ProofStatus::Complete);
    }
}
