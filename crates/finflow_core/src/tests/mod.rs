//! Integration tests for the cash-flow simulation engine
//!
//! Tests are organized by topic:
//! - `determinism` - Seed and worker-count reproducibility guarantees
//! - `end_to_end` - Whole-run totals, abort semantics, degenerate scenarios
//! - `scenario` - JSON scenario decoding and the config-to-engine pipeline
