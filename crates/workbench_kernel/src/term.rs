//! Terms: immutable, structurally-compared values of the object language.
//!
//! A term is either an atom occurrence (a name drawn from an atom sort) or a
//! constructor application. Terms carry no reference to the metamodel that
//! defines their shape — rendering and sort-checking take the metamodel as
//! an explicit argument, the way [`crate::pattern::match_pattern`] and
//! friends do, rather than embedding a back-reference.

use std::collections::BTreeSet;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::constructor::Constructor;
use crate::metamodel::Metamodel;
use crate::sort::Sort;
use workbench_base::Id;

/// A term of the object language. Identity is structural: two terms are
/// `==` iff they have the same shape all the way down (`#[derive(PartialEq)]`
/// on an enum of owned fields gives this for free).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Term {
    /// An occurrence of a name drawn from an atom sort.
    Atom {
        variable_name: String,
        sort_id: Id<Sort>,
    },
    /// A constructor application. `args.len()` must equal the arity of the
    /// constructor named by `constructor_id`; callers that build terms by
    /// hand (tests, the random generator) are expected to uphold this, and
    /// [`Term::sort_id`] will panic against a metamodel that disagrees only
    /// if asked to look up a nonexistent constructor.
    Construct {
        constructor_id: Id<Constructor>,
        args: Vec<Term>,
    },
}

impl Term {
    pub fn atom(variable_name: impl Into<String>, sort_id: Id<Sort>) -> Self {
        Term::Atom {
            variable_name: variable_name.into(),
            sort_id,
        }
    }

    pub fn construct(constructor_id: Id<Constructor>, args: Vec<Term>) -> Self {
        Term::Construct { constructor_id, args }
    }

    /// The sort this term belongs to, resolved against `metamodel`.
    pub fn sort_id(&self, metamodel: &Metamodel) -> Option<Id<Sort>> {
        match self {
            Term::Atom { sort_id, .. } => Some(sort_id.clone()),
            Term::Construct { constructor_id, .. } => {
                metamodel.constructor(constructor_id).map(|c| c.sort_id.clone())
            }
        }
    }

    /// Free atom-variable names occurring in this term, grouped by sort.
    /// Binder metadata is not consulted — the kernel does not perform
    /// alpha-conversion (see the Non-goals in the design doc), so every
    /// atom occurrence counts as free.
    pub fn free_variables(&self) -> BTreeSet<(Id<Sort>, String)> {
        let mut out = BTreeSet::new();
        self.collect_free_variables(&mut out);
        out
    }

    fn collect_free_variables(&self, out: &mut BTreeSet<(Id<Sort>, String)>) {
        match self {
            Term::Atom { variable_name, sort_id } => {
                out.insert((sort_id.clone(), variable_name.clone()));
            }
            Term::Construct { args, .. } => {
                for arg in args {
                    arg.collect_free_variables(out);
                }
            }
        }
    }

    /// Render this term as a Unicode string, resolving constructor names
    /// against `metamodel`. Unknown constructor ids render as `<?>`.
    pub fn render(&self, metamodel: &Metamodel) -> String {
        match self {
            Term::Atom { variable_name, .. } => variable_name.clone(),
            Term::Construct { constructor_id, args } => {
                let name = metamodel
                    .constructor(constructor_id)
                    .map(|c| c.name.as_str())
                    .unwrap_or("<?>");
                if args.is_empty() {
                    name.to_string()
                } else {
                    let rendered_args: Vec<String> = args.iter().map(|a| a.render(metamodel)).collect();
                    format!("{}({})", name, rendered_args.join(", "))
                }
            }
        }
    }
}

/// Produce the next fresh instance name for an atom sort with the given
/// prefix: `x` -> `x1`, `x` again -> `x2`, etc. `counter` is caller-owned so
/// that a full reset is just setting it back to zero (the "resetAtomCounter"
/// operation from the design doc).
pub fn fresh_atom_name(prefix: &str, counter: &mut u64) -> String {
    *counter += 1;
    format!("{}{}", prefix, counter)
}

/// Generate a random, well-sorted term of `sort_id` up to `max_depth`
/// constructor applications deep, using the supplied (caller-seeded) RNG.
///
/// Determinism requirement: the only source of randomness is `rng`; no
/// thread-local or time-based entropy is consulted (see the design doc's
/// "Random generation uses an explicit seed" note).
pub fn generate_random_term<R: Rng + ?Sized>(
    metamodel: &Metamodel,
    sort_id: &Id<Sort>,
    max_depth: usize,
    atom_counter: &mut u64,
    rng: &mut R,
) -> Option<Term> {
    let sort = metamodel.sort(sort_id)?;
    if sort.is_atom() {
        let prefix = sort.atom_prefix.as_deref().unwrap_or("a");
        return Some(Term::atom(fresh_atom_name(prefix, atom_counter), sort_id.clone()));
    }

    let constructors: Vec<&Constructor> = metamodel.constructors_of(sort_id).collect();
    if constructors.is_empty() {
        return None;
    }

    // At depth zero only terminal constructors are eligible, guaranteeing
    // termination of the recursive descent below.
    let candidates: Vec<&Constructor> = if max_depth == 0 {
        constructors.iter().copied().filter(|c| c.is_terminal()).collect()
    } else {
        constructors
    };
    if candidates.is_empty() {
        return None;
    }

    let chosen = candidates[rng.gen_range(0..candidates.len())];
    let mut args = Vec::with_capacity(chosen.args.len());
    for arg in &chosen.args {
        let next_depth = if arg.sort_id == chosen.sort_id {
            max_depth.saturating_sub(1)
        } else {
            max_depth
        };
        args.push(generate_random_term(
            metamodel,
            &arg.sort_id,
            next_depth,
            atom_counter,
            rng,
        )?);
    }
    Some(Term::construct(chosen.id.clone(), args))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn structural_equality_ignores_identity() {
        let sort_id: Id<Sort> = Id::fresh();
        let a = Term::atom("x", sort_id.clone());
        let b = Term::atom("x", sort_id.clone());
        assert_eq!(a, b);
        let c = Term::atom("y", sort_id);
        assert_ne!(a, c);
    }

    #[test]
    fn fresh_atom_names_are_distinct_and_sequential() {
        let mut counter = 0u64;
        assert_eq!(fresh_atom_name("x", &mut counter), "x1");
        assert_eq!(fresh_atom_name("x", &mut counter), "x2");
        counter = 0;
        assert_eq!(fresh_atom_name("x", &mut counter), "x1");
    }

    #[test]
    fn free_variables_collects_atoms_from_nested_constructs() {
        let ctor_id: Id<Constructor> = Id::fresh();
        let sort_id: Id<Sort> = Id::fresh();
        let term = Term::construct(
            ctor_id,
            vec![Term::atom("x", sort_id.clone()), Term::atom("y", sort_id.clone())],
        );
        let vars: Vec<String> = term.free_variables().into_iter().map(|(_, n)| n).collect();
        assert_eq!(vars, vec!["x".to_string(), "y".to_string()]);
    }
}
