//! Inference rules: premises, side conditions and a conclusion over a
//! judgment, with meta-variables scoped to the rule that declares them.

use serde::{Deserialize, Serialize};

use crate::judgment::{JudgmentInstance, SideCondition};
use crate::metavariable::MetaVariable;
use crate::pattern::is_pattern_complete;
use workbench_base::Id;

/// `{id, name, premises, sideConditions, conclusion, position}`.
/// Meta-variables referenced by `conclusion`'s args may be reused in
/// `premises` and `side_conditions`; their scope does not extend beyond
/// this rule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InferenceRule {
    pub id: Id<InferenceRule>,
    pub name: String,
    pub metavariables: Vec<MetaVariable>,
    pub premises: Vec<JudgmentInstance>,
    pub side_conditions: Vec<SideCondition>,
    pub conclusion: JudgmentInstance,
    pub position: (f64, f64),
}

impl InferenceRule {
    pub fn new(name: impl Into<String>, conclusion: JudgmentInstance) -> Self {
        InferenceRule {
            id: Id::fresh(),
            name: name.into(),
            metavariables: Vec::new(),
            premises: Vec::new(),
            side_conditions: Vec::new(),
            conclusion,
            position: (0.0, 0.0),
        }
    }

    /// A rule is complete iff its conclusion and every premise pattern are
    /// complete (no empty holes anywhere in either).
    pub fn is_complete(&self) -> bool {
        self.conclusion.args.iter().all(is_pattern_complete)
            && self
                .premises
                .iter()
                .all(|premise| premise.args.iter().all(is_pattern_complete))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::judgment::Judgment;
    use crate::pattern::Pattern;

    #[test]
    fn rule_with_metavariable_conclusion_is_complete() {
        let judgment_id: Id<Judgment> = Id::fresh();
        let x: Id<MetaVariable> = Id::fresh();
        let conclusion = JudgmentInstance::new(
            judgment_id,
            vec![Pattern::MetaVar { metavariable_id: x }],
        );
        let rule = InferenceRule::new("Refl", conclusion);
        assert!(rule.premises.is_empty());
        assert_eq!(rule.position, (0.0, 0.0));
    }
}
