//! Monte Carlo orchestration
//!
//! [`simulate`] fans a batch of draws out over a fixed number of workers.
//! Each worker gets its own deterministically derived seed, binds private
//! cashflow instances, and runs its share of the draws to completion; blocks
//! are collected in worker order, so a run is bit-for-bit reproducible for a
//! given `(templates, draws, workers, seed)` regardless of how threads get
//! scheduled.

use rand::SeedableRng;
use rand::rngs::SmallRng;
use rayon::iter::{IntoParallelIterator, ParallelIterator};

use crate::cashflow::{CashflowInstance, CashflowTemplate};
use crate::error::{DistributionError, SimulationError};

/// Spacing between consecutive worker seeds. A large odd stride keeps the
/// seed sequences of nearby base seeds from colliding.
const WORKER_SEED_STRIDE: u64 = 0x9E37_79B9_7F4A_7C15;

/// Per-draw inflow and outflow totals accumulated by a worker.
struct DrawTotals {
    inflow: f64,
    outflow: f64,
}

/// Results of a simulation run: one entry per draw, in worker order.
///
/// Outflows are positive magnitudes and `net[i] == inflows[i] - outflows[i]`.
/// The order of draws carries no statistical meaning.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationOutput {
    pub net: Vec<f64>,
    pub inflows: Vec<f64>,
    pub outflows: Vec<f64>,
}

impl SimulationOutput {
    fn with_capacity(draws: usize) -> SimulationOutput {
        SimulationOutput {
            net: Vec::with_capacity(draws),
            inflows: Vec::with_capacity(draws),
            outflows: Vec::with_capacity(draws),
        }
    }

    /// Number of draws in the output.
    pub fn draws(&self) -> usize {
        self.net.len()
    }

    pub fn is_empty(&self) -> bool {
        self.net.is_empty()
    }
}

/// Split `draws` into one block per worker.
///
/// The first `draws % workers` workers carry one extra draw, so the blocks
/// always sum to `draws` exactly and never differ in size by more than one.
/// A worker count of zero is treated as one.
pub fn partition_draws(draws: usize, workers: usize) -> Vec<usize> {
    let workers = workers.max(1);
    let base = draws / workers;
    let leftovers = draws - workers * base;
    (0..workers)
        .map(|worker| if worker < leftovers { base + 1 } else { base })
        .collect()
}

/// Seed for a worker's private RNG.
fn worker_seed(base_seed: u64, worker: usize) -> u64 {
    base_seed.wrapping_add((worker as u64).wrapping_mul(WORKER_SEED_STRIDE))
}

/// Run `draws` Monte Carlo draws of the scenario across `workers` workers.
///
/// Every template must cover the same horizon. Any worker failure aborts
/// the whole run; there are no partial results. An empty template list is
/// allowed and produces all-zero draws.
pub fn simulate(
    templates: &[CashflowTemplate],
    draws: usize,
    workers: usize,
    seed: u64,
) -> Result<SimulationOutput, SimulationError> {
    let horizon = shared_horizon(templates)?;
    let counts = partition_draws(draws, workers);

    let blocks = (0..counts.len())
        .into_par_iter()
        .map(|worker| {
            run_block(templates, horizon, counts[worker], worker_seed(seed, worker))
                .map_err(|source| SimulationError::Worker { worker, source })
        })
        .collect::<Result<Vec<Vec<DrawTotals>>, SimulationError>>()?;

    let mut output = SimulationOutput::with_capacity(draws);
    for totals in blocks.iter().flatten() {
        output.net.push(totals.inflow - totals.outflow);
        output.inflows.push(totals.inflow);
        output.outflows.push(totals.outflow);
    }
    if output.draws() != draws {
        return Err(SimulationError::PartitionInvariant {
            requested: draws,
            produced: output.draws(),
        });
    }
    Ok(output)
}

/// Horizon shared by all templates, or the mismatching offender.
fn shared_horizon(templates: &[CashflowTemplate]) -> Result<usize, SimulationError> {
    let mut horizon = None;
    for template in templates {
        match horizon {
            None => horizon = Some(template.horizon()),
            Some(expected) if template.horizon() != expected => {
                return Err(SimulationError::HorizonMismatch {
                    item: template.name().to_string(),
                    expected,
                    found: template.horizon(),
                });
            }
            Some(_) => {}
        }
    }
    Ok(horizon.unwrap_or(0))
}

/// One worker: bind instances from a private RNG, then run a block of draws.
///
/// Instances are bound in template order and all share the worker's RNG, so
/// a block is fully determined by `(templates, horizon, draws, seed)`.
fn run_block(
    templates: &[CashflowTemplate],
    horizon: usize,
    draws: usize,
    seed: u64,
) -> Result<Vec<DrawTotals>, DistributionError> {
    let mut rng = SmallRng::seed_from_u64(seed);
    let mut instances = templates
        .iter()
        .map(|template| CashflowInstance::bind(template, &mut rng))
        .collect::<Result<Vec<CashflowInstance>, DistributionError>>()?;

    let mut totals = Vec::with_capacity(draws);
    for _ in 0..draws {
        for instance in &mut instances {
            instance.reset();
        }
        let mut inflow = 0.0;
        let mut outflow = 0.0;
        for index in 0..horizon {
            for instance in &mut instances {
                let value = instance.value(index, &mut rng);
                if instance.is_outflow() {
                    outflow += value;
                } else {
                    inflow += value;
                }
            }
        }
        totals.push(DrawTotals { inflow, outflow });
    }
    Ok(totals)
}
