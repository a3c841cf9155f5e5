//! # workbench-system
//!
//! The command/query dispatcher that wires the pure `workbench-kernel` and
//! `workbench-proof` crates up to the outside world: owns the single
//! mutable [`Workbench`], logs every edit and cascade, and seeds the only
//! source of randomness the core uses (`generateRandomTerm`).
//!
//! Nothing in `workbench-kernel` or `workbench-proof` does I/O or logging —
//! this crate is where that ambient stack lives, per the design doc's
//! component boundary (§2: "the engines never mutate the metamodel").

pub mod command;
pub mod error;

use rand::rngs::StdRng;
use rand::SeedableRng;

use workbench_base::{Id, Registry};
use workbench_kernel::{enumerate_examples, enumerate_terms, render_func_expr, Metamodel};
use workbench_proof::{apply_tactic, is_goal_trivial, render_formula, Proof, Property};

pub use command::{Command, CommandResult, ExampleSetResult};
pub use error::{SystemError, SystemResult};

/// Term-depth bound for bounded example enumeration (design doc §5).
pub const EXAMPLE_TERM_DEPTH: usize = 3;
/// Per-position term cap for example enumeration.
pub const EXAMPLE_MAX_PER_POSITION: usize = 20;
/// Per-sort term cap for example enumeration.
pub const EXAMPLE_MAX_PER_SORT: usize = 30;
/// Positive/negative example cap (each), per example set.
pub const EXAMPLE_MAX_EXAMPLES: usize = 4;

/// A post-command snapshot of every registry-owned entity. Deliberately a
/// plain owned clone rather than a borrow: the driver serializes this to
/// JSON once per command and the caller is free to discard or persist it,
/// matching the design doc's "each command returns the post-state"
/// contract without pinning the response to `Workbench`'s lifetime.
#[derive(Debug, Clone, serde::Serialize)]
pub struct WorkbenchState {
    pub metamodel: Metamodel,
    pub properties: Registry<Property>,
    pub proofs: Registry<Proof>,
}

/// The response to one command: its own result, plus the full post-state.
#[derive(Debug, Clone, serde::Serialize)]
pub struct Response {
    pub result: CommandResult,
    pub state: WorkbenchState,
}

/// The single owning container of all registry-keyed entities (design doc
/// §5: "the metamodel is a single owner ... external callers are expected
/// to serialize edits"). Holds the seeded RNG and atom counter that back
/// `generateRandomTerm`, neither of which is registry-owned or persisted.
pub struct Workbench {
    metamodel: Metamodel,
    properties: Registry<Property>,
    proofs: Registry<Proof>,
    atom_counter: u64,
    rng: StdRng,
    max_depth: usize,
    enumeration_depth: usize,
}

impl Workbench {
    /// `max_depth` bounds backward derivation search (design doc §5,
    /// default 10); `enumeration_depth` bounds example/random term
    /// generation depth (default 3); `seed` seeds the only RNG the core
    /// consults, defaulting to a fixed constant rather than time-based
    /// entropy so runs stay reproducible when the caller omits it.
    pub fn new(max_depth: usize, enumeration_depth: usize, seed: Option<u64>) -> Self {
        Workbench {
            metamodel: Metamodel::new(),
            properties: Registry::new(),
            proofs: Registry::new(),
            atom_counter: 0,
            rng: StdRng::seed_from_u64(seed.unwrap_or(0)),
            max_depth,
            enumeration_depth,
        }
    }

    pub fn metamodel(&self) -> &Metamodel {
        &self.metamodel
    }

    fn snapshot(&self) -> WorkbenchState {
        WorkbenchState {
            metamodel: self.metamodel.clone(),
            properties: self.properties.clone(),
            proofs: self.proofs.clone(),
        }
    }

    fn respond(&self, result: CommandResult) -> Response {
        Response { result, state: self.snapshot() }
    }

    /// Executes one command against the current state, logging the command
    /// kind and any cascading deletions it triggers, and returns its result
    /// bundled with the full post-state.
    pub fn execute(&mut self, command: Command) -> SystemResult<Response> {
        log::debug!("dispatching command: {:?}", command);
        let result = self.dispatch(command)?;
        Ok(self.respond(result))
    }

    fn property(&self, id: &Id<Property>) -> SystemResult<&Property> {
        self.properties
            .get(id)
            .ok_or_else(|| SystemError::NotFound { kind: "Property", id: id.to_string() })
    }

    fn proof_mut(&mut self, id: &Id<Proof>) -> SystemResult<&mut Proof> {
        self.proofs
            .get_mut(id)
            .ok_or_else(|| SystemError::NotFound { kind: "Proof", id: id.to_string() })
    }

    fn dispatch(&mut self, command: Command) -> SystemResult<CommandResult> {
        use Command::*;
        match command {
            CreateSort { sort } => Ok(CommandResult::SortId(self.metamodel.create_sort(sort))),
            UpdateSort { sort } => {
                self.metamodel.update_sort(sort)?;
                Ok(CommandResult::Unit)
            }
            DeleteSort { id } => {
                log::info!("deleting sort {} (cascades to its constructors)", id);
                self.metamodel.delete_sort(&id)?;
                Ok(CommandResult::Unit)
            }

            CreateConstructor { constructor } => {
                Ok(CommandResult::ConstructorId(self.metamodel.create_constructor(constructor)))
            }
            UpdateConstructor { constructor } => {
                self.metamodel.update_constructor(constructor)?;
                Ok(CommandResult::Unit)
            }
            DeleteConstructor { id } => {
                self.metamodel.delete_constructor(&id)?;
                Ok(CommandResult::Unit)
            }

            CreateJudgment { name, symbol, arg_sorts, separators } => {
                let judgment = workbench_kernel::Judgment::new(name, symbol, arg_sorts, separators)
                    .map_err(SystemError::Engine)?;
                Ok(CommandResult::JudgmentId(self.metamodel.create_judgment(judgment)))
            }
            UpdateJudgment { judgment } => {
                self.metamodel.update_judgment(judgment)?;
                Ok(CommandResult::Unit)
            }
            DeleteJudgment { id } => {
                log::info!("deleting judgment {} (cascades to concluding rules and premises)", id);
                self.metamodel.delete_judgment(&id)?;
                Ok(CommandResult::Unit)
            }

            CreateRule { name, conclusion } => {
                let rule = workbench_kernel::InferenceRule::new(name, conclusion);
                Ok(CommandResult::RuleId(self.metamodel.create_rule(rule)))
            }
            UpdateRule { rule } => {
                self.metamodel.update_rule(rule)?;
                Ok(CommandResult::Unit)
            }
            DeleteRule { id } => {
                self.metamodel.delete_rule(&id)?;
                Ok(CommandResult::Unit)
            }
            AddPremise { rule_id, premise } => {
                self.metamodel.add_premise(&rule_id, premise)?;
                Ok(CommandResult::Unit)
            }
            RemovePremise { rule_id, premise_id } => {
                self.metamodel.remove_premise(&rule_id, &premise_id)?;
                Ok(CommandResult::Unit)
            }
            AddSideCondition { rule_id, side_condition } => {
                self.metamodel.add_side_condition(&rule_id, side_condition)?;
                Ok(CommandResult::Unit)
            }
            RemoveSideCondition { rule_id, side_condition_id } => {
                self.metamodel.remove_side_condition(&rule_id, &side_condition_id)?;
                Ok(CommandResult::Unit)
            }
            UpdateSideCondition { rule_id, side_condition } => {
                self.metamodel.update_side_condition(&rule_id, side_condition)?;
                Ok(CommandResult::Unit)
            }
            UpdateRulePosition { rule_id, position } => {
                self.metamodel.update_rule_position(&rule_id, position)?;
                Ok(CommandResult::Unit)
            }
            CreateMetaVariable { rule_id, name, sort_id } => {
                let id = self.metamodel.create_metavariable(&rule_id, name, sort_id)?;
                Ok(CommandResult::MetaVariableId(id))
            }
            DeleteMetaVariable { rule_id, metavariable_id } => {
                self.metamodel.delete_metavariable(&rule_id, &metavariable_id)?;
                Ok(CommandResult::Unit)
            }

            CreateFunction { function } => Ok(CommandResult::FunctionId(self.metamodel.create_function(function))),
            UpdateFunction { function } => {
                self.metamodel.update_function(function)?;
                Ok(CommandResult::Unit)
            }
            UpdateFuncCase { function_id, case } => {
                self.metamodel.update_func_case(&function_id, case)?;
                Ok(CommandResult::Unit)
            }
            DeleteFunction { id } => {
                self.metamodel.delete_function(&id)?;
                Ok(CommandResult::Unit)
            }

            CreateProperty { name, statement } => {
                let property = Property::new(name, statement);
                let id = property.id.clone();
                self.properties.insert(id.clone(), property);
                Ok(CommandResult::PropertyId(id))
            }
            DeleteProperty { id } => {
                log::info!("deleting property {} (cascades to its proof)", id);
                self.properties
                    .remove(&id)
                    .ok_or_else(|| SystemError::NotFound { kind: "Property", id: id.to_string() })?;
                let dangling: Vec<Id<Proof>> =
                    self.proofs.values().filter(|p| p.property_id == id).map(|p| p.id.clone()).collect();
                for proof_id in dangling {
                    self.proofs.remove(&proof_id);
                }
                Ok(CommandResult::Unit)
            }
            StartProof { property_id } => {
                let property = self.property(&property_id)?;
                let proof = Proof::start(property);
                let id = proof.id.clone();
                self.proofs.insert(id.clone(), proof);
                Ok(CommandResult::ProofId(id))
            }
            ApplyTactic { proof_id, goal_id, tactic } => {
                let metamodel = self.metamodel.clone();
                let proof = self.proof_mut(&proof_id)?;
                let produced = apply_tactic(&metamodel, proof, &goal_id, tactic)?;
                Ok(CommandResult::TacticGoals(produced))
            }
            DeleteProof { id } => {
                self.proofs
                    .remove(&id)
                    .ok_or_else(|| SystemError::NotFound { kind: "Proof", id: id.to_string() })?;
                Ok(CommandResult::Unit)
            }

            EnumerateTerms { sort_id, max_depth } => {
                let terms = enumerate_terms(&self.metamodel, &sort_id, max_depth, EXAMPLE_MAX_PER_SORT);
                Ok(CommandResult::Terms(terms))
            }
            MatchPattern { term, pattern } => {
                let bindings = workbench_kernel::match_pattern(&term, &pattern).map(|b| b.into_iter().collect());
                Ok(CommandResult::MatchResult { bindings })
            }
            Derive { judgment_id, terms } => {
                let derivation = workbench_kernel::derive(&self.metamodel, &judgment_id, &terms, self.max_depth);
                Ok(CommandResult::Derivation(derivation))
            }
            AnalyzeSyntaxDirected { judgment_id } => {
                Ok(CommandResult::SyntaxDirected(workbench_kernel::analyze_syntax_directed(&self.metamodel, &judgment_id)))
            }
            IsGoalTrivial { goal, hypotheses } => Ok(CommandResult::GoalTrivial(is_goal_trivial(&goal, &hypotheses))),
            RenderFormula { formula } => Ok(CommandResult::Rendered(render_formula(&formula, &self.metamodel))),
            RenderFuncExpr { expr } => Ok(CommandResult::Rendered(render_func_expr(&expr, &self.metamodel))),
            RenderTerm { term } => Ok(CommandResult::Rendered(term.render(&self.metamodel))),
            EnumerateExamples { judgment_id } => {
                let examples = enumerate_examples(
                    &self.metamodel,
                    &judgment_id,
                    self.enumeration_depth,
                    EXAMPLE_MAX_PER_POSITION,
                    EXAMPLE_MAX_PER_SORT,
                    EXAMPLE_MAX_EXAMPLES,
                )
                .ok_or_else(|| SystemError::NotFound { kind: "Judgment", id: judgment_id.to_string() })?;
                Ok(CommandResult::Examples(examples.into()))
            }
            GenerateRandomTerm { sort_id, max_depth } => {
                let term = workbench_kernel::generate_random_term(
                    &self.metamodel,
                    &sort_id,
                    max_depth,
                    &mut self.atom_counter,
                    &mut self.rng,
                );
                Ok(CommandResult::RandomTerm(term))
            }
            ResetAtomCounter => {
                self.atom_counter = 0;
                Ok(CommandResult::Unit)
            }
        }
    }
}
