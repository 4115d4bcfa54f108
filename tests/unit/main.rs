//! Unit-level tests against the public API
//!
//! Exercise the decoder, alias loading and multiplier rules on byte-built
//! fixtures rather than hand-written structs.

#[path = "../common/mod.rs"]
mod common;
