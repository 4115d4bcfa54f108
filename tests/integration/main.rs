//! Integration Tests
//!
//! End-to-end tests over byte-built snapshots: the reference scenarios, the
//! file-based pipeline used by the CLI, and property tests of the invariants.

#[path = "../common/mod.rs"]
mod common;

mod pipeline;
mod properties;
mod scenarios;
