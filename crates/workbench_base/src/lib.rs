//! # workbench-base
//!
//! Opaque identifiers, the generic keyed-registry container, and the shared
//! error taxonomy used throughout the formal-methods workbench.
//!
//! This crate has **no knowledge of sorts, patterns, judgments, or
//! formulas**. It provides only the generic infrastructure that the
//! `workbench-kernel` and `workbench-proof` crates build on.

pub mod error;
pub mod id;
pub mod registry;

pub use error::{EngineError, EngineResult};
pub use id::Id;
pub use registry::Registry;
