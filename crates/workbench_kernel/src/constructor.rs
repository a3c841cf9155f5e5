//! Constructors: the building blocks of inductive sorts.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::sort::Sort;
use workbench_base::Id;

/// One argument of a constructor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConstructorArg {
    pub id: Id<ConstructorArg>,
    pub sort_id: Id<Sort>,
    pub label: Option<String>,
    pub is_binder: bool,
    /// Ids of other args of the same constructor whose scope this binder
    /// introduces. Metadata only — the kernel never performs alpha-renaming
    /// based on it (see the Non-goals in the design doc).
    pub binds_in: BTreeSet<Id<ConstructorArg>>,
}

impl ConstructorArg {
    pub fn new(sort_id: Id<Sort>) -> Self {
        ConstructorArg {
            id: Id::fresh(),
            sort_id,
            label: None,
            is_binder: false,
            binds_in: BTreeSet::new(),
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

/// A constructor of an inductive sort.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Constructor {
    pub id: Id<Constructor>,
    pub sort_id: Id<Sort>,
    pub name: String,
    pub args: Vec<ConstructorArg>,
}

impl Constructor {
    pub fn nullary(sort_id: Id<Sort>, name: impl Into<String>) -> Self {
        Constructor {
            id: Id::fresh(),
            sort_id,
            name: name.into(),
            args: Vec::new(),
        }
    }

    pub fn new(sort_id: Id<Sort>, name: impl Into<String>, args: Vec<ConstructorArg>) -> Self {
        Constructor {
            id: Id::fresh(),
            sort_id,
            name: name.into(),
            args,
        }
    }

    pub fn arity(&self) -> usize {
        self.args.len()
    }

    /// See [`crate::sort::is_terminal`]: true iff no argument recurses into
    /// this constructor's own sort.
    pub fn is_terminal(&self) -> bool {
        crate::sort::is_terminal(&self.sort_id, self)
    }
}
