//! The metamodel: the single owning registry of sorts, constructors,
//! judgments, inference rules and recursive functions.
//!
//! Terms, patterns and FuncExprs are value types produced on demand by the
//! engines; they are never registry-owned (see the lifecycle note in the
//! design doc). Everything that *is* owned here is reached exclusively by
//! id, and every deletion cascades the referential-integrity edges the
//! design doc names: a sort's constructors, a judgment's rules and the
//! premises elsewhere that mention it.

use workbench_base::{EngineError, EngineResult, Id, Registry};

use crate::constructor::Constructor;
use crate::function::RecursiveFunc;
use crate::judgment::{Judgment, JudgmentInstance, SideCondition};
use crate::metavariable::MetaVariable;
use crate::rule::InferenceRule;
use crate::sort::Sort;
use crate::termination;

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct Metamodel {
    sorts: Registry<Sort>,
    constructors: Registry<Constructor>,
    judgments: Registry<Judgment>,
    rules: Registry<InferenceRule>,
    functions: Registry<RecursiveFunc>,
}

impl Metamodel {
    pub fn new() -> Self {
        Metamodel::default()
    }

    // -- Sorts ---------------------------------------------------------

    pub fn sort(&self, id: &Id<Sort>) -> Option<&Sort> {
        self.sorts.get(id)
    }

    pub fn sorts(&self) -> impl Iterator<Item = &Sort> {
        self.sorts.values()
    }

    /// Registers a sort that was already constructed (tests and the
    /// random-generation path use this directly; `create_sort` is the
    /// command-surface entry point for the same operation).
    pub fn insert_sort(&mut self, sort: Sort) -> Id<Sort> {
        let id = sort.id.clone();
        self.sorts.insert(id.clone(), sort);
        id
    }

    pub fn create_sort(&mut self, sort: Sort) -> Id<Sort> {
        self.insert_sort(sort)
    }

    pub fn update_sort(&mut self, sort: Sort) -> EngineResult<()> {
        if !self.sorts.contains(&sort.id) {
            return Err(EngineError::NotFound { kind: "Sort", id: sort.id.to_string() });
        }
        self.sorts.insert(sort.id.clone(), sort);
        Ok(())
    }

    /// Deletes a sort and cascades to its constructors.
    pub fn delete_sort(&mut self, id: &Id<Sort>) -> EngineResult<()> {
        self.sorts
            .remove(id)
            .ok_or_else(|| EngineError::NotFound { kind: "Sort", id: id.to_string() })?;
        let dangling: Vec<Id<Constructor>> = self
            .constructors
            .values()
            .filter(|c| &c.sort_id == id)
            .map(|c| c.id.clone())
            .collect();
        for ctor_id in dangling {
            self.constructors.remove(&ctor_id);
        }
        Ok(())
    }

    // -- Constructors ----------------------------------------------------

    pub fn constructor(&self, id: &Id<Constructor>) -> Option<&Constructor> {
        self.constructors.get(id)
    }

    /// Constructors of `sort_id`, in registry (registration) order.
    pub fn constructors_of<'a>(&'a self, sort_id: &'a Id<Sort>) -> impl Iterator<Item = &'a Constructor> {
        self.constructors.values().filter(move |c| &c.sort_id == sort_id)
    }

    pub fn insert_constructor(&mut self, constructor: Constructor) -> Id<Constructor> {
        let id = constructor.id.clone();
        self.constructors.insert(id.clone(), constructor);
        id
    }

    pub fn create_constructor(&mut self, constructor: Constructor) -> Id<Constructor> {
        self.insert_constructor(constructor)
    }

    pub fn update_constructor(&mut self, constructor: Constructor) -> EngineResult<()> {
        if !self.constructors.contains(&constructor.id) {
            return Err(EngineError::NotFound { kind: "Constructor", id: constructor.id.to_string() });
        }
        self.constructors.insert(constructor.id.clone(), constructor);
        Ok(())
    }

    pub fn delete_constructor(&mut self, id: &Id<Constructor>) -> EngineResult<()> {
        self.constructors
            .remove(id)
            .ok_or_else(|| EngineError::NotFound { kind: "Constructor", id: id.to_string() })?;
        Ok(())
    }

    // -- Judgments ---------------------------------------------------------

    pub fn judgment(&self, id: &Id<Judgment>) -> Option<&Judgment> {
        self.judgments.get(id)
    }

    pub fn judgments(&self) -> impl Iterator<Item = &Judgment> {
        self.judgments.values()
    }

    pub fn insert_judgment(&mut self, judgment: Judgment) -> Id<Judgment> {
        let id = judgment.id.clone();
        self.judgments.insert(id.clone(), judgment);
        id
    }

    pub fn create_judgment(&mut self, judgment: Judgment) -> Id<Judgment> {
        self.insert_judgment(judgment)
    }

    pub fn update_judgment(&mut self, judgment: Judgment) -> EngineResult<()> {
        if !self.judgments.contains(&judgment.id) {
            return Err(EngineError::NotFound { kind: "Judgment", id: judgment.id.to_string() });
        }
        self.judgments.insert(judgment.id.clone(), judgment);
        Ok(())
    }

    /// Deletes a judgment, the rules that conclude it, and any surviving
    /// premise referencing it in another rule.
    pub fn delete_judgment(&mut self, id: &Id<Judgment>) -> EngineResult<()> {
        self.judgments
            .remove(id)
            .ok_or_else(|| EngineError::NotFound { kind: "Judgment", id: id.to_string() })?;

        let concluding: Vec<Id<InferenceRule>> = self
            .rules
            .values()
            .filter(|r| &r.conclusion.judgment_id == id)
            .map(|r| r.id.clone())
            .collect();
        for rule_id in concluding {
            self.rules.remove(&rule_id);
        }

        for rule in self.rules.iter_mut() {
            rule.premises.retain(|p| &p.judgment_id != id);
        }
        Ok(())
    }

    // -- Rules ---------------------------------------------------------

    pub fn rule(&self, id: &Id<InferenceRule>) -> Option<&InferenceRule> {
        self.rules.get(id)
    }

    pub fn rules(&self) -> impl Iterator<Item = &InferenceRule> {
        self.rules.values()
    }

    /// Rules concluding `judgment_id`, in registry order — the order
    /// backward search tries them in.
    pub fn rules_for<'a>(&'a self, judgment_id: &'a Id<Judgment>) -> impl Iterator<Item = &'a InferenceRule> {
        self.rules.values().filter(move |r| &r.conclusion.judgment_id == judgment_id)
    }

    pub fn insert_rule(&mut self, rule: InferenceRule) -> Id<InferenceRule> {
        let id = rule.id.clone();
        self.rules.insert(id.clone(), rule);
        id
    }

    pub fn create_rule(&mut self, rule: InferenceRule) -> Id<InferenceRule> {
        self.insert_rule(rule)
    }

    pub fn update_rule(&mut self, rule: InferenceRule) -> EngineResult<()> {
        if !self.rules.contains(&rule.id) {
            return Err(EngineError::NotFound { kind: "InferenceRule", id: rule.id.to_string() });
        }
        self.rules.insert(rule.id.clone(), rule);
        Ok(())
    }

    pub fn delete_rule(&mut self, id: &Id<InferenceRule>) -> EngineResult<()> {
        self.rules
            .remove(id)
            .ok_or_else(|| EngineError::NotFound { kind: "InferenceRule", id: id.to_string() })?;
        Ok(())
    }

    pub fn add_premise(&mut self, rule_id: &Id<InferenceRule>, premise: JudgmentInstance) -> EngineResult<()> {
        let rule = self
            .rules
            .get_mut(rule_id)
            .ok_or_else(|| EngineError::NotFound { kind: "InferenceRule", id: rule_id.to_string() })?;
        rule.premises.push(premise);
        Ok(())
    }

    pub fn remove_premise(
        &mut self,
        rule_id: &Id<InferenceRule>,
        premise_id: &Id<JudgmentInstance>,
    ) -> EngineResult<()> {
        let rule = self
            .rules
            .get_mut(rule_id)
            .ok_or_else(|| EngineError::NotFound { kind: "InferenceRule", id: rule_id.to_string() })?;
        rule.premises.retain(|p| &p.id != premise_id);
        Ok(())
    }

    pub fn add_side_condition(
        &mut self,
        rule_id: &Id<InferenceRule>,
        side_condition: SideCondition,
    ) -> EngineResult<()> {
        let rule = self
            .rules
            .get_mut(rule_id)
            .ok_or_else(|| EngineError::NotFound { kind: "InferenceRule", id: rule_id.to_string() })?;
        rule.side_conditions.push(side_condition);
        Ok(())
    }

    pub fn remove_side_condition(
        &mut self,
        rule_id: &Id<InferenceRule>,
        side_condition_id: &Id<SideCondition>,
    ) -> EngineResult<()> {
        let rule = self
            .rules
            .get_mut(rule_id)
            .ok_or_else(|| EngineError::NotFound { kind: "InferenceRule", id: rule_id.to_string() })?;
        rule.side_conditions.retain(|s| &s.id != side_condition_id);
        Ok(())
    }

    pub fn update_side_condition(
        &mut self,
        rule_id: &Id<InferenceRule>,
        side_condition: SideCondition,
    ) -> EngineResult<()> {
        let rule = self
            .rules
            .get_mut(rule_id)
            .ok_or_else(|| EngineError::NotFound { kind: "InferenceRule", id: rule_id.to_string() })?;
        let slot = rule
            .side_conditions
            .iter_mut()
            .find(|s| s.id == side_condition.id)
            .ok_or_else(|| EngineError::NotFound { kind: "SideCondition", id: side_condition.id.to_string() })?;
        *slot = side_condition;
        Ok(())
    }

    pub fn update_rule_position(&mut self, rule_id: &Id<InferenceRule>, position: (f64, f64)) -> EngineResult<()> {
        let rule = self
            .rules
            .get_mut(rule_id)
            .ok_or_else(|| EngineError::NotFound { kind: "InferenceRule", id: rule_id.to_string() })?;
        rule.position = position;
        Ok(())
    }

    pub fn create_metavariable(
        &mut self,
        rule_id: &Id<InferenceRule>,
        name: impl Into<String>,
        sort_id: Id<Sort>,
    ) -> EngineResult<Id<MetaVariable>> {
        let rule = self
            .rules
            .get_mut(rule_id)
            .ok_or_else(|| EngineError::NotFound { kind: "InferenceRule", id: rule_id.to_string() })?;
        let mv = MetaVariable::new(name, sort_id);
        let id = mv.id.clone();
        rule.metavariables.push(mv);
        Ok(id)
    }

    pub fn delete_metavariable(
        &mut self,
        rule_id: &Id<InferenceRule>,
        metavariable_id: &Id<MetaVariable>,
    ) -> EngineResult<()> {
        let rule = self
            .rules
            .get_mut(rule_id)
            .ok_or_else(|| EngineError::NotFound { kind: "InferenceRule", id: rule_id.to_string() })?;
        rule.metavariables.retain(|mv| &mv.id != metavariable_id);
        Ok(())
    }

    // -- Functions -------------------------------------------------------

    pub fn function(&self, id: &Id<RecursiveFunc>) -> Option<&RecursiveFunc> {
        self.functions.get(id)
    }

    pub fn functions(&self) -> impl Iterator<Item = &RecursiveFunc> {
        self.functions.values()
    }

    /// Inserts a function and recomputes its `terminates`/`termination_error`
    /// derived attributes against the current metamodel.
    pub fn create_function(&mut self, mut func: RecursiveFunc) -> Id<RecursiveFunc> {
        let id = func.id.clone();
        self.recompute_termination_for(&mut func);
        self.functions.insert(id.clone(), func);
        id
    }

    pub fn update_function(&mut self, mut func: RecursiveFunc) -> EngineResult<()> {
        if !self.functions.contains(&func.id) {
            return Err(EngineError::NotFound { kind: "RecursiveFunc", id: func.id.to_string() });
        }
        self.recompute_termination_for(&mut func);
        self.functions.insert(func.id.clone(), func);
        Ok(())
    }

    /// Replaces the case for `constructor_id` (or appends it if absent),
    /// then recomputes termination for the whole function.
    pub fn update_func_case(
        &mut self,
        function_id: &Id<RecursiveFunc>,
        case: crate::function::FuncCase,
    ) -> EngineResult<()> {
        let mut func = self
            .functions
            .get(function_id)
            .cloned()
            .ok_or_else(|| EngineError::NotFound { kind: "RecursiveFunc", id: function_id.to_string() })?;
        if let Some(slot) = func.cases.iter_mut().find(|c| c.constructor_id == case.constructor_id) {
            *slot = case;
        } else {
            func.cases.push(case);
        }
        self.recompute_termination_for(&mut func);
        self.functions.insert(func.id.clone(), func);
        Ok(())
    }

    pub fn delete_function(&mut self, id: &Id<RecursiveFunc>) -> EngineResult<()> {
        self.functions
            .remove(id)
            .ok_or_else(|| EngineError::NotFound { kind: "RecursiveFunc", id: id.to_string() })?;
        Ok(())
    }

    fn recompute_termination_for(&self, func: &mut RecursiveFunc) {
        match termination::check_termination(self, func) {
            Ok(()) => {
                func.terminates = true;
                func.termination_error = None;
            }
            Err((case, reason)) => {
                func.terminates = false;
                func.termination_error = Some((case, reason));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deleting_a_sort_cascades_to_its_constructors() {
        let mut metamodel = Metamodel::new();
        let nat = Sort::new_inductive("Nat");
        let nat_id = metamodel.create_sort(nat);
        let zero = Constructor::nullary(nat_id.clone(), "Z");
        let zero_id = metamodel.create_constructor(zero);

        metamodel.delete_sort(&nat_id).unwrap();
        assert!(metamodel.constructor(&zero_id).is_none());
    }

    #[test]
    fn deleting_a_judgment_cascades_to_concluding_rules_and_premises() {
        let mut metamodel = Metamodel::new();
        let nat_id = metamodel.create_sort(Sort::new_inductive("Nat"));
        let even = metamodel.create_judgment(
            Judgment::new(
                "even",
                "even",
                vec![crate::judgment::JudgmentArg { sort_id: nat_id.clone(), label: "n".into() }],
                vec!["".into(), " even".into()],
            )
            .unwrap(),
        );
        let odd = metamodel.create_judgment(
            Judgment::new(
                "odd",
                "odd",
                vec![crate::judgment::JudgmentArg { sort_id: nat_id, label: "n".into() }],
                vec!["".into(), " odd".into()],
            )
            .unwrap(),
        );

        let concludes_even = InferenceRule::new(
            "E-Zero",
            JudgmentInstance::new(even.clone(), vec![crate::pattern::Pattern::Hole]),
        );
        let rule_id = metamodel.create_rule(concludes_even);

        let mut refers_to_even = InferenceRule::new(
            "O-Succ",
            JudgmentInstance::new(odd, vec![crate::pattern::Pattern::Hole]),
        );
        refers_to_even
            .premises
            .push(JudgmentInstance::new(even.clone(), vec![crate::pattern::Pattern::Hole]));
        let other_rule_id = metamodel.create_rule(refers_to_even);

        metamodel.delete_judgment(&even).unwrap();
        assert!(metamodel.rule(&rule_id).is_none());
        assert!(metamodel.rule(&other_rule_id).unwrap().premises.is_empty());
    }

    #[test]
    fn binary_round_trip_through_bincode_preserves_insertion_order_and_fields() {
        let mut metamodel = Metamodel::new();
        let nat_id = metamodel.create_sort(Sort::new_inductive("Nat"));
        let zero_id = metamodel.create_constructor(Constructor::nullary(nat_id.clone(), "Z"));
        let succ_id = metamodel.create_constructor(Constructor::new(
            nat_id.clone(),
            "S",
            vec![crate::constructor::ConstructorArg::new(nat_id.clone()).with_label("n")],
        ));

        let bytes = bincode::serialize(&metamodel).expect("metamodel serializes to bincode");
        let restored: Metamodel = bincode::deserialize(&bytes).expect("metamodel deserializes from bincode");

        // Insertion order and content survive the binary round trip exactly,
        // the same guarantee the JSON path gives via `Registry`'s custom
        // `Serialize`/`Deserialize` impl.
        let original_sort_ids: Vec<&Id<Sort>> = metamodel.sorts.ids().collect();
        let restored_sort_ids: Vec<&Id<Sort>> = restored.sorts.ids().collect();
        assert_eq!(original_sort_ids, restored_sort_ids);

        assert_eq!(restored.sort(&nat_id).unwrap().name, "Nat");
        assert_eq!(restored.constructor(&zero_id).unwrap().name, "Z");
        assert_eq!(restored.constructor(&succ_id).unwrap().name, "S");
        assert_eq!(restored.constructors_of(&nat_id).count(), 2);
    }
}
