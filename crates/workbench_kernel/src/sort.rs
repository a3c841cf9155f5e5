//! Sorts: the syntactic categories of the object language.
//!
//! A sort is either `inductive` (defined by its constructors, registered
//! separately in the [`Metamodel`](crate::metamodel::Metamodel)) or `atom`
//! (an infinite family of distinct names, e.g. variable names).

use serde::{Deserialize, Serialize};

use crate::constructor::Constructor;
use workbench_base::Id;

/// Discriminates the two kinds of sort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortKind {
    Inductive,
    Atom,
}

/// A syntactic category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sort {
    pub id: Id<Sort>,
    pub name: String,
    pub kind: SortKind,
    pub is_binder: bool,
    /// Present iff `kind == SortKind::Atom`. Seeds human-readable instances
    /// (prefix `x` yields `x1, x2, ...`; see [`crate::term::fresh_atom_name`]).
    pub atom_prefix: Option<String>,
}

impl Sort {
    pub fn new_inductive(name: impl Into<String>) -> Self {
        Sort {
            id: Id::fresh(),
            name: name.into(),
            kind: SortKind::Inductive,
            is_binder: false,
            atom_prefix: None,
        }
    }

    pub fn new_atom(name: impl Into<String>, atom_prefix: impl Into<String>) -> Self {
        Sort {
            id: Id::fresh(),
            name: name.into(),
            kind: SortKind::Atom,
            is_binder: false,
            atom_prefix: Some(atom_prefix.into()),
        }
    }

    pub fn is_atom(&self) -> bool {
        self.kind == SortKind::Atom
    }

    pub fn is_inductive(&self) -> bool {
        self.kind == SortKind::Inductive
    }
}

/// Whether a constructor is terminal: none of its args recurse into its own
/// sort. This is a derived attribute — never stored — so it can't drift out
/// of sync with the constructor's argument list.
pub fn is_terminal(sort_id: &Id<Sort>, constructor: &Constructor) -> bool {
    constructor.args.iter().all(|arg| &arg.sort_id != sort_id)
}
