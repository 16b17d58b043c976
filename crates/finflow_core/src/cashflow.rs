//! Cashflow line items, templates, and per-worker instances
//!
//! A scenario is a list of [`LineItem`] descriptors. Building turns each
//! descriptor into an immutable [`CashflowTemplate`]: period specs parsed
//! into masks, distributions validated, every failure reported before any
//! simulation work starts. Workers then bind a private [`CashflowInstance`]
//! per template, which owns the samplers and the running growth state for
//! that worker's draws.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::distribution::{Distribution, Sampler};
use crate::error::{BuildError, DistributionError};
use crate::periods::PeriodSet;

/// Growth applied to a line item on trigger periods.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Growth {
    /// Optional label, e.g. "revenueGrowth"
    #[serde(default)]
    pub name: Option<String>,
    /// Period spec of the trigger periods
    pub periods: String,
    /// Distribution of the per-trigger growth rate (0.10 means +10%)
    pub dist: Distribution,
}

/// One cash-flow line item of a scenario, as described by the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub name: String,
    /// Outflows are accumulated as positive magnitudes and subtracted from
    /// the net at collection time
    #[serde(default)]
    pub is_outflow: bool,
    /// Period spec of the applicable periods, e.g. "1-48" or "1-12,24"
    pub periods: String,
    /// Distribution of the per-period value
    pub dist: Distribution,
    /// Absent growth means the value never grows
    #[serde(default)]
    pub growth: Option<Growth>,
}

/// A validated, immutable line item shared read-only by every worker.
#[derive(Debug, Clone, PartialEq)]
pub struct CashflowTemplate {
    pub(crate) name: String,
    pub(crate) is_outflow: bool,
    pub(crate) applicable: PeriodSet,
    pub(crate) growth_trigger: PeriodSet,
    pub(crate) value: Distribution,
    pub(crate) growth: Option<Distribution>,
}

impl CashflowTemplate {
    /// Build a template for the horizon `start..=end` from a descriptor.
    ///
    /// Period specs are parsed and both distributions validated here, so a
    /// bad scenario fails before any worker is spawned. Errors name the
    /// line item.
    pub fn build(start: i32, end: i32, item: &LineItem) -> Result<CashflowTemplate, BuildError> {
        let applicable =
            PeriodSet::parse(&item.periods, start, end).map_err(|source| {
                BuildError::ApplicablePeriods {
                    item: item.name.clone(),
                    source,
                }
            })?;
        item.dist
            .validate()
            .map_err(|source| BuildError::Distribution {
                item: item.name.clone(),
                source,
            })?;

        let (growth_trigger, growth) = match &item.growth {
            Some(growth) => {
                let trigger = PeriodSet::parse(&growth.periods, start, end).map_err(|source| {
                    BuildError::GrowthPeriods {
                        item: item.name.clone(),
                        source,
                    }
                })?;
                growth
                    .dist
                    .validate()
                    .map_err(|source| BuildError::Distribution {
                        item: item.name.clone(),
                        source,
                    })?;
                (trigger, Some(growth.dist))
            }
            None => (PeriodSet::never(applicable.len()), None),
        };

        Ok(CashflowTemplate {
            name: item.name.clone(),
            is_outflow: item.is_outflow,
            applicable,
            growth_trigger,
            value: item.dist,
            growth,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_outflow(&self) -> bool {
        self.is_outflow
    }

    /// Number of periods this template covers.
    pub fn horizon(&self) -> usize {
        self.applicable.len()
    }
}

/// A worker-private realization of a template.
///
/// Holds the bound samplers and the running growth factor. Instances are
/// never shared: each worker binds its own set against its own RNG.
#[derive(Debug)]
pub struct CashflowInstance<'a> {
    template: &'a CashflowTemplate,
    value_sampler: Sampler,
    growth_sampler: Option<Sampler>,
    growth_factor: f64,
}

impl<'a> CashflowInstance<'a> {
    /// Bind the template's distributions against a worker RNG.
    ///
    /// The value sampler is bound before the growth sampler; for the
    /// once-sampled families that order decides which frozen draw each one
    /// gets, so it is part of the reproducibility contract.
    pub fn bind<R: Rng + ?Sized>(
        template: &'a CashflowTemplate,
        rng: &mut R,
    ) -> Result<CashflowInstance<'a>, DistributionError> {
        let value_sampler = template.value.bind(rng)?;
        let growth_sampler = match &template.growth {
            Some(dist) => Some(dist.bind(rng)?),
            None => None,
        };
        Ok(CashflowInstance {
            template,
            value_sampler,
            growth_sampler,
            growth_factor: 1.0,
        })
    }

    /// Restore the running growth factor to 1.0.
    ///
    /// Call at the start of every draw; growth never carries over between
    /// draws and `value` never resets implicitly.
    pub fn reset(&mut self) {
        self.growth_factor = 1.0;
    }

    /// Value contributed at a period index (zero-based offset from the
    /// horizon start).
    ///
    /// Not-applicable periods contribute 0.0 without consuming any
    /// randomness, so masking an item out never shifts the draws of other
    /// periods. On a growth-trigger period the running factor compounds by
    /// `1 + growth` before the value is drawn. Indexes must be visited in
    /// ascending order within a draw.
    pub fn value<R: Rng + ?Sized>(&mut self, index: usize, rng: &mut R) -> f64 {
        if !self.template.applicable.contains(index) {
            return 0.0;
        }
        if self.template.growth_trigger.contains(index) {
            if let Some(growth) = &self.growth_sampler {
                self.growth_factor *= 1.0 + growth.sample(rng);
            }
        }
        self.value_sampler.sample(rng) * self.growth_factor
    }

    pub fn is_outflow(&self) -> bool {
        self.template.is_outflow
    }

    pub fn name(&self) -> &str {
        &self.template.name
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;

    fn item(periods: &str, dist: Distribution, growth: Option<(&str, Distribution)>) -> LineItem {
        LineItem {
            name: "test item".to_string(),
            is_outflow: false,
            periods: periods.to_string(),
            dist,
            growth: growth.map(|(periods, dist)| Growth {
                name: None,
                periods: periods.to_string(),
                dist,
            }),
        }
    }

    #[test]
    fn test_build_without_growth_has_inert_trigger() {
        let template =
            CashflowTemplate::build(1, 4, &item("1-4", Distribution::Fixed { value: 1.0 }, None))
                .unwrap();
        assert_eq!(template.horizon(), 4);
        assert_eq!(template.growth_trigger.count(), 0);
        assert!(template.growth.is_none());
    }

    #[test]
    fn test_build_reports_bad_applicable_periods_with_item_name() {
        let mut bad = item("1-x", Distribution::Fixed { value: 1.0 }, None);
        bad.name = "Rent".to_string();
        let err = CashflowTemplate::build(1, 4, &bad).unwrap_err();
        assert_eq!(err.item(), "Rent");
        assert!(matches!(err, BuildError::ApplicablePeriods { .. }));
    }

    #[test]
    fn test_build_reports_bad_growth_periods_with_item_name() {
        let growth = Some(("60", Distribution::Fixed { value: 0.1 }));
        let mut bad = item("1-4", Distribution::Fixed { value: 1.0 }, growth);
        bad.name = "Revenues".to_string();
        let err = CashflowTemplate::build(1, 4, &bad).unwrap_err();
        assert_eq!(err.item(), "Revenues");
        assert!(matches!(err, BuildError::GrowthPeriods { .. }));
    }

    #[test]
    fn test_build_rejects_invalid_distribution_before_simulation() {
        let bad = item(
            "1-4",
            Distribution::Triangle {
                min: 2.0,
                max: 1.0,
                mode: 1.5,
            },
            None,
        );
        let err = CashflowTemplate::build(1, 4, &bad).unwrap_err();
        assert!(matches!(err, BuildError::Distribution { .. }));
    }

    #[test]
    fn test_inapplicable_periods_return_zero_without_consuming_randomness() {
        let template = CashflowTemplate::build(
            1,
            4,
            &item(
                "",
                Distribution::Triangle {
                    min: 0.0,
                    max: 1.0,
                    mode: 0.5,
                },
                None,
            ),
        )
        .unwrap();

        let mut rng = SmallRng::seed_from_u64(42);
        let mut instance = CashflowInstance::bind(&template, &mut rng).unwrap();
        for index in 0..4 {
            assert_eq!(instance.value(index, &mut rng), 0.0);
        }

        // Binding a plain triangle draws nothing, and neither did the
        // masked-out periods, so the stream is still at its origin.
        let mut untouched = SmallRng::seed_from_u64(42);
        assert_eq!(rng.random::<f64>(), untouched.random::<f64>());
    }

    #[test]
    fn test_growth_compounds_on_trigger_periods() {
        // Periods 1-4, value fixed at 100, 10% growth triggered at period 3:
        // the draw must read 100, 100, 110, 110.
        let template = CashflowTemplate::build(
            1,
            4,
            &item(
                "1-4",
                Distribution::Fixed { value: 100.0 },
                Some(("3", Distribution::Fixed { value: 0.10 })),
            ),
        )
        .unwrap();

        let mut rng = SmallRng::seed_from_u64(1);
        let mut instance = CashflowInstance::bind(&template, &mut rng).unwrap();

        for _ in 0..2 {
            instance.reset();
            let values: Vec<f64> = (0..4).map(|i| instance.value(i, &mut rng)).collect();
            let expected = [100.0, 100.0, 110.0, 110.0];
            for (i, (got, want)) in values.iter().zip(expected).enumerate() {
                assert!(
                    (got - want).abs() < 1e-9,
                    "period index {i}: expected {want}, got {got}"
                );
            }
        }
    }

    #[test]
    fn test_growth_multiple_triggers_compound() {
        let template = CashflowTemplate::build(
            1,
            4,
            &item(
                "1-4",
                Distribution::Fixed { value: 100.0 },
                Some(("2,4", Distribution::Fixed { value: 0.5 })),
            ),
        )
        .unwrap();

        let mut rng = SmallRng::seed_from_u64(1);
        let mut instance = CashflowInstance::bind(&template, &mut rng).unwrap();
        instance.reset();
        let values: Vec<f64> = (0..4).map(|i| instance.value(i, &mut rng)).collect();
        assert_eq!(values, vec![100.0, 150.0, 150.0, 225.0]);
    }

    #[test]
    fn test_growth_trigger_skipped_on_inapplicable_period() {
        // Applicable 2-4 but triggers at 1 and 3: the period-1 trigger must
        // be swallowed by the applicability gate, leaving one compounding.
        let template = CashflowTemplate::build(
            1,
            4,
            &item(
                "2-4",
                Distribution::Fixed { value: 100.0 },
                Some(("1,3", Distribution::Fixed { value: 0.5 })),
            ),
        )
        .unwrap();

        let mut rng = SmallRng::seed_from_u64(1);
        let mut instance = CashflowInstance::bind(&template, &mut rng).unwrap();
        instance.reset();
        let values: Vec<f64> = (0..4).map(|i| instance.value(i, &mut rng)).collect();
        assert_eq!(values, vec![0.0, 100.0, 150.0, 150.0]);
    }

    #[test]
    fn test_out_of_bounds_index_contributes_nothing() {
        let template =
            CashflowTemplate::build(1, 4, &item("1-4", Distribution::Fixed { value: 9.0 }, None))
                .unwrap();
        let mut rng = SmallRng::seed_from_u64(3);
        let mut instance = CashflowInstance::bind(&template, &mut rng).unwrap();
        assert_eq!(instance.value(4, &mut rng), 0.0);
        assert_eq!(instance.value(1000, &mut rng), 0.0);
    }
}
