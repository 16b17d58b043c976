//! Monte Carlo cash-flow simulation library
//!
//! This crate estimates the distribution of net cash flows for a scenario
//! made of uncertain line items. It supports:
//! - Period applicability masks parsed from compact specs ("1-12,24,36-48")
//! - Fixed, triangle, PERT, and uniform value distributions, including
//!   sample-once variants for rates that are uncertain but constant
//! - Per-line-item growth that compounds on trigger periods
//! - Deterministic parallel execution: same seed and worker count, same
//!   results, bit for bit
//! - Closed-form analytics (NPV, IRR, MIRR, payback periods) over cash-flow
//!   series
//!
//! # Running a scenario
//!
//! ```ignore
//! use finflow_core::{ScenarioConfig, simulation::simulate};
//!
//! let scenario: ScenarioConfig = serde_json::from_str(&raw)?;
//! let templates = scenario.build_templates()?;
//! let output = simulate(&templates, scenario.sims, 4, 42)?;
//! println!("first draw net: {}", output.net[0]);
//! ```

#![warn(clippy::all)]

// ============================================================================
// Core modules
// ============================================================================

pub mod analytics;
pub mod cashflow;
pub mod distribution;
pub mod error;
pub mod periods;
pub mod simulation;

// ============================================================================
// Type definition modules
// ============================================================================

pub mod config;

// ============================================================================
// Test modules
// ============================================================================

#[cfg(test)]
mod tests;

// ============================================================================
// Public re-exports for convenience
// ============================================================================

pub use cashflow::{CashflowInstance, CashflowTemplate, Growth, LineItem};
pub use config::ScenarioConfig;
pub use distribution::{Distribution, Sampler};
pub use error::{BuildError, DistributionError, PeriodSpecError, SimulationError};
pub use periods::PeriodSet;
pub use simulation::{SimulationOutput, partition_draws, simulate};
