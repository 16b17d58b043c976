//! Closed-form cash-flow analytics
//!
//! Scalar measures over a per-period cash-flow series (index 0 is the
//! initial flow, typically negative). These are deterministic companions to
//! the Monte Carlo engine: run a scenario, reduce it to a series, then
//! discount or annualize it here. Undefined results follow the usual
//! conventions (`NaN` for "never", `+inf` for a costless MIRR) rather than
//! turning into errors.

/// Tuning knobs for the Newton-Raphson IRR search.
#[derive(Debug, Clone, Copy)]
pub struct IrrOptions {
    /// Relative change between iterates below which the search converges
    pub rel_error: f64,
    /// Iterations before giving up and returning NaN
    pub max_iterations: usize,
}

impl Default for IrrOptions {
    fn default() -> IrrOptions {
        IrrOptions {
            rel_error: 1e-8,
            max_iterations: 100,
        }
    }
}

/// Net present value of the series at discount rate `k`.
///
/// NPV = Σ CF_t / (1+k)^t for t = 0..n; the initial flow is not discounted.
pub fn npv(cashflows: &[f64], k: f64) -> f64 {
    cashflows
        .iter()
        .enumerate()
        .map(|(t, cf)| cf / (1.0 + k).powi(t as i32))
        .sum()
}

/// Internal rate of return with default options.
///
/// The IRR is the discount rate at which the NPV is zero. It assumes flows
/// are reinvested at the IRR itself, which is why [`mirr`] is usually
/// preferred. Returns NaN when the search does not converge.
pub fn irr(cashflows: &[f64]) -> f64 {
    irr_with(cashflows, IrrOptions::default())
}

/// Internal rate of return via Newton-Raphson.
///
/// Solves NPV(k) = 0 using
/// `f(k) = Σ CF_t (1+k)^-t` and `f'(k) = Σ -t CF_t (1+k)^(-t-1)`,
/// declaring convergence when the relative step drops below
/// `options.rel_error`.
pub fn irr_with(cashflows: &[f64], options: IrrOptions) -> f64 {
    let mut k0;
    let mut k1: f64 = 0.0;
    for _ in 0..options.max_iterations {
        k0 = k1;
        let mut f = 0.0;
        let mut fdk = 0.0;
        for (t, cf) in cashflows.iter().enumerate() {
            let t = t as f64;
            f += cf * (1.0 + k0).powf(-t);
            fdk -= t * cf * (1.0 + k0).powf(-t - 1.0);
        }
        k1 = k0 - f / fdk;
        if ((k1 - k0) / k0).abs() < options.rel_error {
            return k1;
        }
    }
    f64::NAN
}

/// Modified internal rate of return at cost of capital `k`.
///
/// Outflows (negative entries) are discounted to a present value at `k`;
/// inflows are compounded to a terminal value at `k`. Then
/// MIRR = (TV / PV_costs)^(1/n) - 1. A series with no outflows yields +inf.
pub fn mirr(cashflows: &[f64], k: f64) -> f64 {
    let n = cashflows.len() as f64 - 1.0;
    let mut pv_costs = 0.0;
    let mut tv = 0.0;
    for (t, &cf) in cashflows.iter().enumerate() {
        let t = t as f64;
        if cf > 0.0 {
            tv += cf * (1.0 + k).powf(n - t);
        } else {
            pv_costs -= cf / (1.0 + k).powf(t);
        }
    }
    (tv / pv_costs).powf(1.0 / n) - 1.0
}

/// Periods until the cumulative series first turns non-negative, as a
/// fractional period count. NaN when the investment never pays back.
pub fn payback_period(cashflows: &[f64]) -> f64 {
    let mut cumulative = 0.0;
    for (t, &cf) in cashflows.iter().enumerate() {
        if cumulative + cf >= 0.0 {
            return (t as f64 - 1.0) - cumulative / cf;
        }
        cumulative += cf;
    }
    f64::NAN
}

/// [`payback_period`] on flows discounted at rate `k`.
pub fn discounted_payback_period(cashflows: &[f64], k: f64) -> f64 {
    let mut cumulative = 0.0;
    for (t, &cf) in cashflows.iter().enumerate() {
        let discounted = cf / (1.0 + k).powf(t as f64);
        if cumulative + discounted >= 0.0 {
            return (t as f64 - 1.0) - cumulative / discounted;
        }
        cumulative += discounted;
    }
    f64::NAN
}

/// Plain sum of the series.
pub fn net_cash_flow(cashflows: &[f64]) -> f64 {
    cashflows.iter().sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f64 = 1e-6;

    fn almost_equal(a: f64, b: f64) -> bool {
        (a - b).abs() < TOLERANCE
    }

    #[test]
    fn test_npv() {
        let cases = [
            (vec![-1000.0, 500.0, 400.0, 300.0, 100.0], 0.10, 78.819753),
            (vec![-3000.0, 1300.0, 1300.0, 1300.0], 0.08, 350.226083),
        ];
        for (cashflows, k, expected) in cases {
            let got = npv(&cashflows, k);
            assert!(almost_equal(got, expected), "expected {expected}, got {got}");
        }
    }

    #[test]
    fn test_irr() {
        let cases = [
            (vec![-1000.0, 500.0, 400.0, 300.0, 100.0], 0.144888),
            (vec![-1000.0, 100.0, 300.0, 400.0, 600.0], 0.117906),
        ];
        for (cashflows, expected) in cases {
            let got = irr(&cashflows);
            assert!(almost_equal(got, expected), "expected {expected}, got {got}");
        }
    }

    #[test]
    fn test_irr_with_loose_options_still_converges() {
        let options = IrrOptions {
            rel_error: 1e-5,
            max_iterations: 10,
        };
        let got = irr_with(&[-1000.0, 500.0, 400.0, 300.0, 100.0], options);
        assert!(almost_equal(got, 0.144888), "got {got}");
    }

    #[test]
    fn test_irr_returns_nan_when_no_rate_exists() {
        // All-positive series: NPV never crosses zero.
        assert!(irr(&[1000.0, 100.0, 300.0, 400.0, 600.0]).is_nan());
    }

    #[test]
    fn test_mirr() {
        let cases = [
            (vec![-1000.0, 500.0, 400.0, 300.0, 100.0], 0.121063),
            (vec![-1000.0, 100.0, 300.0, 400.0, 600.0], 0.113281),
        ];
        for (cashflows, expected) in cases {
            let got = mirr(&cashflows, 0.10);
            assert!(almost_equal(got, expected), "expected {expected}, got {got}");
        }
    }

    #[test]
    fn test_mirr_with_no_outflows_is_infinite() {
        let got = mirr(&[1000.0, 100.0, 300.0, 400.0, 600.0], 0.10);
        assert!(got.is_infinite() && got.is_sign_positive(), "got {got}");
    }

    #[test]
    fn test_payback_period() {
        let cases = [
            (vec![-1000.0, 500.0, 400.0, 300.0, 100.0], 2.3333333),
            (vec![-1000.0, 100.0, 300.0, 400.0, 600.0], 3.3333333),
        ];
        for (cashflows, expected) in cases {
            let got = payback_period(&cashflows);
            assert!(almost_equal(got, expected), "expected {expected}, got {got}");
        }
    }

    #[test]
    fn test_payback_period_never_recovers() {
        assert!(payback_period(&[-1000.0, -100.0, -300.0, -400.0, -600.0]).is_nan());
    }

    #[test]
    fn test_discounted_payback_period() {
        let cases = [
            (vec![-1000.0, 500.0, 400.0, 300.0, 100.0], 2.9533333),
            (vec![-1000.0, 100.0, 300.0, 400.0, 600.0], 3.8800000),
        ];
        for (cashflows, expected) in cases {
            let got = discounted_payback_period(&cashflows, 0.10);
            assert!(almost_equal(got, expected), "expected {expected}, got {got}");
        }
    }

    #[test]
    fn test_discounted_payback_never_recovers() {
        assert!(discounted_payback_period(&[-1000.0, -100.0, -300.0], 0.10).is_nan());
    }

    #[test]
    fn test_net_cash_flow() {
        assert_eq!(net_cash_flow(&[-1000.0, 500.0, 400.0, 300.0, 100.0]), 300.0);
        assert_eq!(net_cash_flow(&[-1000.0, 100.0, 300.0, 400.0, 600.0]), 400.0);
        assert_eq!(net_cash_flow(&[]), 0.0);
    }
}
