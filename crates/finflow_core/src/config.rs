//! Scenario configuration
//!
//! The serde data model for a scenario file. Field names follow the JSON
//! schema (`startPeriod`, `isOutflow`, ...); reading files and decoding
//! bytes is the caller's business, this module only defines the shape and
//! the hand-off into validated templates.

use serde::{Deserialize, Serialize};

use crate::cashflow::{CashflowTemplate, LineItem};
use crate::error::BuildError;

/// A complete scenario: horizon, draw count, and the cash-flow line items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioConfig {
    pub name: String,
    /// First period of the horizon (inclusive); periods are caller-defined
    /// integers, commonly 1-based months
    pub start_period: i32,
    /// Last period of the horizon (inclusive)
    pub end_period: i32,
    /// Number of Monte Carlo draws to run
    pub sims: usize,
    #[serde(default)]
    pub cashflows: Vec<LineItem>,
}

impl ScenarioConfig {
    /// Number of periods in the horizon.
    pub fn horizon(&self) -> usize {
        if self.end_period < self.start_period {
            return 0;
        }
        (self.end_period - self.start_period + 1) as usize
    }

    /// Build one validated template per line item.
    ///
    /// Fails on the first bad line item, naming it; nothing is built
    /// partially.
    pub fn build_templates(&self) -> Result<Vec<CashflowTemplate>, BuildError> {
        self.cashflows
            .iter()
            .map(|item| CashflowTemplate::build(self.start_period, self.end_period, item))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use crate::distribution::Distribution;

    use super::*;

    #[test]
    fn test_build_templates_shares_the_scenario_horizon() {
        let config = ScenarioConfig {
            name: "test".to_string(),
            start_period: 1,
            end_period: 48,
            sims: 10,
            cashflows: vec![
                LineItem {
                    name: "Revenues".to_string(),
                    is_outflow: false,
                    periods: "1-48".to_string(),
                    dist: Distribution::Fixed { value: 100.0 },
                    growth: None,
                },
                LineItem {
                    name: "Fixed Expenses".to_string(),
                    is_outflow: true,
                    periods: "25-48".to_string(),
                    dist: Distribution::Fixed { value: 5.0 },
                    growth: None,
                },
            ],
        };

        assert_eq!(config.horizon(), 48);
        let templates = config.build_templates().unwrap();
        assert_eq!(templates.len(), 2);
        assert!(templates.iter().all(|t| t.horizon() == 48));
        assert!(templates[1].is_outflow());
    }

    #[test]
    fn test_build_templates_names_the_bad_line_item() {
        let config = ScenarioConfig {
            name: "test".to_string(),
            start_period: 1,
            end_period: 4,
            sims: 1,
            cashflows: vec![LineItem {
                name: "Rent".to_string(),
                is_outflow: true,
                periods: "1-9".to_string(),
                dist: Distribution::Fixed { value: 1.0 },
                growth: None,
            }],
        };
        let err = config.build_templates().unwrap_err();
        assert_eq!(err.item(), "Rent");
    }

    #[test]
    fn test_horizon_of_inverted_bounds_is_zero() {
        let config = ScenarioConfig {
            name: "test".to_string(),
            start_period: 4,
            end_period: 1,
            sims: 1,
            cashflows: Vec::new(),
        };
        assert_eq!(config.horizon(), 0);
    }
}
