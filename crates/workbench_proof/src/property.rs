//! Named top-level theorems: a formula the user wants proved, with the
//! lifecycle of any other registry-owned entity (`createProperty` /
//! `deleteProperty` in the command surface).

use serde::{Deserialize, Serialize};

use crate::formula::Formula;
use workbench_base::Id;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Property {
    pub id: Id<Property>,
    pub name: String,
    pub statement: Formula,
}

impl Property {
    pub fn new(name: impl Into<String>, statement: Formula) -> Self {
        Property { id: Id::fresh(), name: name.into(), statement }
    }
}
