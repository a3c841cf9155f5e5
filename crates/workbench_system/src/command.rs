//! The wire-level command/query surface (design doc §6) and the values it
//! produces.
//!
//! Every command is a pure transformation over the state snapshot owned by
//! [`crate::Workbench`]: the caller gets back both the command's own result
//! and a full post-state snapshot, per the documented contract "each
//! command returns the post-state".

use serde::{Deserialize, Serialize};

use workbench_kernel::{
    Constructor, FuncCase, FuncExpr, InferenceRule, Judgment, JudgmentArg, JudgmentInstance, MetaVariable, Pattern,
    RecursiveFunc, SideCondition, Sort, Term,
};
use workbench_proof::{Formula, Proof, ProofGoal, Property, Tactic};
use workbench_base::Id;

/// One request on the command/query surface. Tagged by variant name so the
/// headless driver can read `{"command": "CreateSort", ...}` off stdin.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "command")]
pub enum Command {
    // -- Sorts -----------------------------------------------------------
    CreateSort { sort: Sort },
    UpdateSort { sort: Sort },
    DeleteSort { id: Id<Sort> },

    // -- Constructors ------------------------------------------------------
    CreateConstructor { constructor: Constructor },
    UpdateConstructor { constructor: Constructor },
    DeleteConstructor { id: Id<Constructor> },

    // -- Judgments ---------------------------------------------------------
    CreateJudgment { name: String, symbol: String, arg_sorts: Vec<JudgmentArg>, separators: Vec<String> },
    UpdateJudgment { judgment: Judgment },
    DeleteJudgment { id: Id<Judgment> },

    // -- Rules ---------------------------------------------------------
    CreateRule { name: String, conclusion: JudgmentInstance },
    UpdateRule { rule: InferenceRule },
    /// Supplement to the advisory command list: the metamodel already
    /// supports deleting a rule outright, not just editing it via premises.
    DeleteRule { id: Id<InferenceRule> },
    AddPremise { rule_id: Id<InferenceRule>, premise: JudgmentInstance },
    RemovePremise { rule_id: Id<InferenceRule>, premise_id: Id<JudgmentInstance> },
    AddSideCondition { rule_id: Id<InferenceRule>, side_condition: SideCondition },
    RemoveSideCondition { rule_id: Id<InferenceRule>, side_condition_id: Id<SideCondition> },
    UpdateSideCondition { rule_id: Id<InferenceRule>, side_condition: SideCondition },
    UpdateRulePosition { rule_id: Id<InferenceRule>, position: (f64, f64) },
    CreateMetaVariable { rule_id: Id<InferenceRule>, name: String, sort_id: Id<Sort> },
    DeleteMetaVariable { rule_id: Id<InferenceRule>, metavariable_id: Id<MetaVariable> },

    // -- Functions -------------------------------------------------------
    CreateFunction { function: RecursiveFunc },
    UpdateFunction { function: RecursiveFunc },
    UpdateFuncCase { function_id: Id<RecursiveFunc>, case: FuncCase },
    DeleteFunction { id: Id<RecursiveFunc> },

    // -- Properties & proofs -----------------------------------------------
    CreateProperty { name: String, statement: Formula },
    DeleteProperty { id: Id<Property> },
    StartProof { property_id: Id<Property> },
    ApplyTactic { proof_id: Id<Proof>, goal_id: Id<ProofGoal>, tactic: Tactic },
    DeleteProof { id: Id<Proof> },

    // -- Queries -------------------------------------------------------
    EnumerateTerms { sort_id: Id<Sort>, max_depth: usize },
    MatchPattern { term: Term, pattern: Pattern },
    Derive { judgment_id: Id<Judgment>, terms: Vec<Term> },
    AnalyzeSyntaxDirected { judgment_id: Id<Judgment> },
    IsGoalTrivial { goal: Formula, hypotheses: Vec<(String, Formula)> },
    RenderFormula { formula: Formula },
    RenderFuncExpr { expr: FuncExpr },
    RenderTerm { term: Term },
    /// Supplement: exposes the example-enumeration engine (design doc §4.3)
    /// that the UI's example-seeding collaborator would otherwise have no
    /// way to reach.
    EnumerateExamples { judgment_id: Id<Judgment> },
    /// Supplement: exposes seeded random term generation (design doc §9,
    /// "random generation uses an explicit seed").
    GenerateRandomTerm { sort_id: Id<Sort>, max_depth: usize },
    ResetAtomCounter,
}

/// A JSON-friendly restatement of `workbench_kernel::ExampleSet`: the
/// original holds plain `Vec<Term>`s already, but doesn't derive `Serialize`
/// since it is an internal engine return type, not a wire value.
#[derive(Debug, Clone, Serialize)]
pub struct ExampleSetResult {
    pub positive: Vec<Vec<Term>>,
    pub negative: Vec<Vec<Term>>,
}

impl From<workbench_kernel::ExampleSet> for ExampleSetResult {
    fn from(set: workbench_kernel::ExampleSet) -> Self {
        ExampleSetResult { positive: set.positive, negative: set.negative }
    }
}

/// The payload a command produces, beyond the post-state snapshot every
/// response also carries. Most edit commands produce `Unit`; queries and
/// entity-creating commands produce something more specific.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "result")]
pub enum CommandResult {
    Unit,
    SortId(Id<Sort>),
    ConstructorId(Id<Constructor>),
    JudgmentId(Id<Judgment>),
    RuleId(Id<InferenceRule>),
    MetaVariableId(Id<MetaVariable>),
    FunctionId(Id<RecursiveFunc>),
    PropertyId(Id<Property>),
    ProofId(Id<Proof>),
    TacticGoals(Vec<Id<ProofGoal>>),
    Terms(Vec<Term>),
    MatchResult { bindings: Option<Vec<(Id<MetaVariable>, Term)>> },
    Derivation(Option<workbench_kernel::Derivation>),
    SyntaxDirected(bool),
    GoalTrivial(bool),
    Rendered(String),
    Examples(ExampleSetResult),
    RandomTerm(Option<Term>),
}
