use std::fmt;

/// Errors from parsing a period specification string
#[derive(Debug, Clone, PartialEq)]
pub enum PeriodSpecError {
    /// A token was not an integer or an integer range
    Syntax { token: String },
    /// A range ran backwards, e.g. "5-3"
    ReversedRange { from: i32, to: i32 },
    /// A period fell outside the simulation horizon
    OutOfRange { period: i32, start: i32, end: i32 },
    /// The horizon itself is empty (end before start)
    InvalidHorizon { start: i32, end: i32 },
}

impl fmt::Display for PeriodSpecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PeriodSpecError::Syntax { token } => {
                write!(f, "period spec token {token:?} is not a period or range")
            }
            PeriodSpecError::ReversedRange { from, to } => {
                write!(f, "period range {from}-{to} runs backwards")
            }
            PeriodSpecError::OutOfRange { period, start, end } => {
                write!(f, "period {period} is outside the horizon {start}..={end}")
            }
            PeriodSpecError::InvalidHorizon { start, end } => {
                write!(f, "end period {end} precedes start period {start}")
            }
        }
    }
}

impl std::error::Error for PeriodSpecError {}

/// Errors from validating or binding a distribution
#[derive(Debug, Clone, PartialEq)]
pub enum DistributionError {
    InvalidParameters {
        family: &'static str,
        min: f64,
        max: f64,
        mode: Option<f64>,
        reason: &'static str,
    },
}

impl fmt::Display for DistributionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DistributionError::InvalidParameters {
                family,
                min,
                max,
                mode,
                reason,
            } => match mode {
                Some(mode) => write!(
                    f,
                    "invalid {family} parameters (min={min}, max={max}, mode={mode}): {reason}"
                ),
                None => write!(
                    f,
                    "invalid {family} parameters (min={min}, max={max}): {reason}"
                ),
            },
        }
    }
}

impl std::error::Error for DistributionError {}

/// Errors from building a cashflow template out of a line item
///
/// Every variant names the offending line item so a scenario with dozens of
/// entries stays diagnosable.
#[derive(Debug, Clone, PartialEq)]
pub enum BuildError {
    ApplicablePeriods { item: String, source: PeriodSpecError },
    GrowthPeriods { item: String, source: PeriodSpecError },
    Distribution { item: String, source: DistributionError },
}

impl BuildError {
    /// Name of the line item that failed to build
    pub fn item(&self) -> &str {
        match self {
            BuildError::ApplicablePeriods { item, .. }
            | BuildError::GrowthPeriods { item, .. }
            | BuildError::Distribution { item, .. } => item,
        }
    }
}

impl fmt::Display for BuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildError::ApplicablePeriods { item, source } => {
                write!(f, "line item {item:?}: applicable periods: {source}")
            }
            BuildError::GrowthPeriods { item, source } => {
                write!(f, "line item {item:?}: growth periods: {source}")
            }
            BuildError::Distribution { item, source } => {
                write!(f, "line item {item:?}: {source}")
            }
        }
    }
}

impl std::error::Error for BuildError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BuildError::ApplicablePeriods { source, .. }
            | BuildError::GrowthPeriods { source, .. } => Some(source),
            BuildError::Distribution { source, .. } => Some(source),
        }
    }
}

/// Errors from running a simulation
#[derive(Debug, Clone, PartialEq)]
pub enum SimulationError {
    /// A worker could not bind samplers for its cashflow instances; the run
    /// is aborted with no partial results
    Worker {
        worker: usize,
        source: DistributionError,
    },
    /// Templates were built over different horizons
    HorizonMismatch {
        item: String,
        expected: usize,
        found: usize,
    },
    /// Internal accounting defect: assembled draws do not match the request
    PartitionInvariant { requested: usize, produced: usize },
}

impl fmt::Display for SimulationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimulationError::Worker { worker, source } => {
                write!(f, "worker {worker} failed: {source}")
            }
            SimulationError::HorizonMismatch {
                item,
                expected,
                found,
            } => {
                write!(
                    f,
                    "template {item:?} covers {found} periods, expected {expected}"
                )
            }
            SimulationError::PartitionInvariant {
                requested,
                produced,
            } => {
                write!(f, "assembled {produced} draws for a request of {requested}")
            }
        }
    }
}

impl std::error::Error for SimulationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SimulationError::Worker { source, .. } => Some(source),
            _ => None,
        }
    }
}
