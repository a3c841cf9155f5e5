//! Judgments: named relations on tuples of sort-typed positions.

use serde::{Deserialize, Serialize};

use crate::pattern::Pattern;
use crate::sort::Sort;
use workbench_base::{EngineError, EngineResult, Id};

/// One argument position of a judgment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JudgmentArg {
    pub sort_id: Id<Sort>,
    pub label: String,
}

/// A named relation, rendered with separator strings interleaved between
/// its arguments: `separators[0]` is the prefix, `separators[i]` (for
/// `1 <= i < argSorts.len()`) falls between args `i-1` and `i`, and the
/// last entry is the suffix. `separators.len() == argSorts.len() + 1`
/// always holds for a well-formed judgment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Judgment {
    pub id: Id<Judgment>,
    pub name: String,
    pub symbol: String,
    pub arg_sorts: Vec<JudgmentArg>,
    pub separators: Vec<String>,
}

impl Judgment {
    /// Builds a judgment from argument labels and the separators flanking
    /// them, checking the `len(separators) == len(arg_sorts) + 1` invariant.
    pub fn new(
        name: impl Into<String>,
        symbol: impl Into<String>,
        arg_sorts: Vec<JudgmentArg>,
        separators: Vec<String>,
    ) -> EngineResult<Self> {
        if separators.len() != arg_sorts.len() + 1 {
            return Err(EngineError::ShapeMismatch {
                reason: format!(
                    "judgment needs {} separators for {} arguments, got {}",
                    arg_sorts.len() + 1,
                    arg_sorts.len(),
                    separators.len()
                ),
            });
        }
        Ok(Judgment {
            id: Id::fresh(),
            name: name.into(),
            symbol: symbol.into(),
            arg_sorts,
            separators,
        })
    }

    /// Interleaves `rendered_args` with this judgment's separators.
    pub fn render_with(&self, rendered_args: &[String]) -> String {
        let mut out = String::new();
        for (i, sep) in self.separators.iter().enumerate() {
            out.push_str(sep);
            if let Some(arg) = rendered_args.get(i) {
                out.push_str(arg);
            }
        }
        out
    }
}

/// An occurrence of a judgment applied to a sequence of patterns, used as a
/// rule's conclusion or one of its premises. `args.len()` must equal the
/// owning judgment's `arg_sorts.len()`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JudgmentInstance {
    pub id: Id<JudgmentInstance>,
    pub judgment_id: Id<Judgment>,
    pub args: Vec<Pattern>,
}

impl JudgmentInstance {
    pub fn new(judgment_id: Id<Judgment>, args: Vec<Pattern>) -> Self {
        JudgmentInstance {
            id: Id::fresh(),
            judgment_id,
            args,
        }
    }
}

/// The predicate a side condition checks, applied to a function identifier
/// plus an argument pattern and, where applicable, a literal integer or a
/// membership-element pattern.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum SidePredicate {
    Eq { literal: i64 },
    Neq { literal: i64 },
    Lt { literal: i64 },
    Leq { literal: i64 },
    Gt { literal: i64 },
    Geq { literal: i64 },
    IsEmpty,
    NotEmpty,
    In { element: Pattern },
    NotIn { element: Pattern },
}

/// `{id, predicate}` where `predicate` names the function whose result is
/// checked and the argument pattern feeding it, alongside the predicate
/// itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SideCondition {
    pub id: Id<SideCondition>,
    pub function_id: Id<crate::function::RecursiveFunc>,
    pub argument: Pattern,
    pub predicate: SidePredicate,
}

impl SideCondition {
    pub fn new(
        function_id: Id<crate::function::RecursiveFunc>,
        argument: Pattern,
        predicate: SidePredicate,
    ) -> Self {
        SideCondition {
            id: Id::fresh(),
            function_id,
            argument,
            predicate,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_mismatched_separator_count() {
        let arg = JudgmentArg {
            sort_id: Id::fresh(),
            label: "n".to_string(),
        };
        let result = Judgment::new("even", "even", vec![arg], vec!["".to_string()]);
        assert!(result.is_err());
    }

    #[test]
    fn renders_ternary_judgment_with_separators() {
        let arg_gamma = JudgmentArg { sort_id: Id::fresh(), label: "ctx".to_string() };
        let arg_e = JudgmentArg { sort_id: Id::fresh(), label: "e".to_string() };
        let arg_t = JudgmentArg { sort_id: Id::fresh(), label: "t".to_string() };
        let judgment = Judgment::new(
            "typing",
            "types",
            vec![arg_gamma, arg_e, arg_t],
            vec!["".into(), " \u{22a2} ".into(), " : ".into(), "".into()],
        )
        .unwrap();
        let rendered = judgment.render_with(&["\u{0393}".to_string(), "e".to_string(), "\u{03c4}".to_string()]);
        assert_eq!(rendered, "\u{0393} \u{22a2} e : \u{03c4}");
    }
}
