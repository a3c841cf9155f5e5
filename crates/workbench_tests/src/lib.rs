//! Integration tests for the formal-methods workbench engines.
//!
//! This crate holds no production code; `tests/*.rs` exercises
//! `workbench-kernel`, `workbench-proof`, and `workbench-system` end to end.
