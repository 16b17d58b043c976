//! Period applicability masks
//!
//! A scenario runs over an inclusive horizon of integer periods
//! `start..=end` (months, quarters, whatever the caller means by a period).
//! Line items rarely apply to every period, so each one carries a
//! [`PeriodSet`]: one flag per period, parsed from a compact spec string
//! such as `"1-12,24,36-48"`.

use crate::error::PeriodSpecError;

/// One applicability flag per period of the simulation horizon.
///
/// Index 0 corresponds to the start period; period `p` lives at index
/// `p - start`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeriodSet {
    flags: Vec<bool>,
}

impl PeriodSet {
    /// Parse a period spec string over the horizon `start..=end`.
    ///
    /// The spec is a comma-separated list of single periods (`"7"`) and
    /// inclusive ranges (`"2-5"`). Listing a period twice is harmless. An
    /// empty spec is valid and yields a mask that never applies.
    ///
    /// Each listed period must lie inside the horizon; anything else is an
    /// error rather than a silently dropped entry.
    pub fn parse(spec: &str, start: i32, end: i32) -> Result<PeriodSet, PeriodSpecError> {
        if end < start {
            return Err(PeriodSpecError::InvalidHorizon { start, end });
        }
        let mut flags = vec![false; (end - start + 1) as usize];
        if spec.trim().is_empty() {
            return Ok(PeriodSet { flags });
        }

        for token in spec.split(',') {
            let token = token.trim();
            let (from, to) = parse_token(token)?;
            if from > to {
                return Err(PeriodSpecError::ReversedRange { from, to });
            }
            for period in from..=to {
                if period < start || period > end {
                    return Err(PeriodSpecError::OutOfRange { period, start, end });
                }
                flags[(period - start) as usize] = true;
            }
        }
        Ok(PeriodSet { flags })
    }

    /// A mask of the given length that never applies.
    pub fn never(len: usize) -> PeriodSet {
        PeriodSet {
            flags: vec![false; len],
        }
    }

    /// Whether the period at this zero-based index applies. Out-of-bounds
    /// indexes are simply not applicable.
    pub fn contains(&self, index: usize) -> bool {
        self.flags.get(index).copied().unwrap_or(false)
    }

    /// Number of periods in the horizon.
    pub fn len(&self) -> usize {
        self.flags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }

    /// Number of applicable periods.
    pub fn count(&self) -> usize {
        self.flags.iter().filter(|&&set| set).count()
    }

    pub fn as_slice(&self) -> &[bool] {
        &self.flags
    }
}

/// Split one spec token into an inclusive `(from, to)` pair.
fn parse_token(token: &str) -> Result<(i32, i32), PeriodSpecError> {
    if let Ok(period) = token.parse::<i32>() {
        return Ok((period, period));
    }
    if let Some((from, to)) = token.split_once('-') {
        let parsed = (from.trim().parse::<i32>(), to.trim().parse::<i32>());
        if let (Ok(from), Ok(to)) = parsed {
            return Ok((from, to));
        }
    }
    Err(PeriodSpecError::Syntax {
        token: token.to_string(),
    })
}
