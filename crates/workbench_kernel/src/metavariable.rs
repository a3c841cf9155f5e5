//! Meta-variables: schematic placeholders scoped to a single rule.

use serde::{Deserialize, Serialize};

use crate::sort::Sort;
use workbench_base::Id;

/// Stands for any term of `sort_id` within the rule that declares it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetaVariable {
    pub id: Id<MetaVariable>,
    pub name: String,
    pub sort_id: Id<Sort>,
}

impl MetaVariable {
    pub fn new(name: impl Into<String>, sort_id: Id<Sort>) -> Self {
        MetaVariable {
            id: Id::fresh(),
            name: name.into(),
            sort_id,
        }
    }
}
