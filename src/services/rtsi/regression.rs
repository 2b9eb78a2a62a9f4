//! Ordinary least-squares trend regression with a two-sided slope test.

use crate::error::{Result, RtsiError};

/// p-value below which a slope is considered significant.
pub const SIGNIFICANCE_LEVEL: f64 = 0.05;

/// Guards the t statistic against division by zero for a perfect fit.
const TINY: f64 = 1e-20;

/// Result of regressing a series against its zero-based index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
    /// Pearson correlation between index and value.
    pub r_value: f64,
    /// Two-sided p-value for the hypothesis slope != 0.
    pub p_value: f64,
    /// Standard error of the slope.
    pub std_err: f64,
}

impl LinearFit {
    /// Coefficient of determination.
    pub fn consistency(&self) -> f64 {
        (self.r_value * self.r_value).clamp(0.0, 1.0)
    }

    /// `1 - p` when the slope is significant at the 5% level, otherwise exactly 0.
    pub fn significance(&self) -> f64 {
        if self.p_value < SIGNIFICANCE_LEVEL {
            (1.0 - self.p_value).max(0.0)
        } else {
            0.0
        }
    }
}

/// Fit `y = slope * i + intercept` over `i = 0..n`.
///
/// A constant series yields `slope = 0`, `r_value = 0` and `p_value = 1`.
/// Fewer than three points leave no residual degrees of freedom and fail.
pub fn linear_regression(values: &[f64]) -> Result<LinearFit> {
    let n = values.len();
    if n < 3 {
        return Err(RtsiError::InsufficientData {
            found: n,
            required: 3,
        });
    }
    if let Some(bad) = values.iter().find(|v| !v.is_finite()) {
        return Err(RtsiError::Calculation(format!(
            "non-finite value in series: {}",
            bad
        )));
    }

    let n_f = n as f64;
    let x_mean = (n_f - 1.0) / 2.0;
    let y_mean = values.iter().sum::<f64>() / n_f;

    let mut ssxm = 0.0;
    let mut ssym = 0.0;
    let mut ssxym = 0.0;
    for (i, &y) in values.iter().enumerate() {
        let dx = i as f64 - x_mean;
        let dy = y - y_mean;
        ssxm += dx * dx;
        ssym += dy * dy;
        ssxym += dx * dy;
    }

    let slope = ssxym / ssxm;
    let intercept = y_mean - slope * x_mean;

    let r_value = if ssym == 0.0 {
        0.0
    } else {
        (ssxym / (ssxm * ssym).sqrt()).clamp(-1.0, 1.0)
    };

    let df = n_f - 2.0;
    let t = r_value * (df / ((1.0 - r_value + TINY) * (1.0 + r_value + TINY))).sqrt();
    let p_value = student_t_two_sided(t, df)?;
    let std_err = ((1.0 - r_value * r_value) * ssym / ssxm / df).max(0.0).sqrt();

    let fit = LinearFit {
        slope,
        intercept,
        r_value,
        p_value,
        std_err,
    };

    if [fit.slope, fit.intercept, fit.r_value, fit.p_value]
        .iter()
        .any(|v| !v.is_finite())
    {
        return Err(RtsiError::Calculation(format!(
            "regression produced non-finite output: {:?}",
            fit
        )));
    }

    Ok(fit)
}

/// Slope of the OLS line through `values`, 0 for fewer than two points.
pub fn ols_slope(values: &[f64]) -> f64 {
    let n = values.len() as f64;
    if n < 2.0 {
        return 0.0;
    }
    let x_mean = (n - 1.0) / 2.0;
    let y_mean = values.iter().sum::<f64>() / n;
    let mut num = 0.0;
    let mut den = 0.0;
    for (i, &y) in values.iter().enumerate() {
        let dx = i as f64 - x_mean;
        num += dx * (y - y_mean);
        den += dx * dx;
    }
    if den.abs() < 1e-12 {
        return 0.0;
    }
    num / den
}

// =============================================================================
// Math Helpers
// =============================================================================

const BETACF_MAX_ITER: usize = 1000;
const BETACF_EPS: f64 = 1.0e-15;
const BETACF_FPMIN: f64 = 1.0e-300;

/// Two-sided tail probability of Student's t distribution, `P(|T| >= |t|)`.
fn student_t_two_sided(t: f64, df: f64) -> Result<f64> {
    if t.is_infinite() {
        return Ok(0.0);
    }
    if t.is_nan() {
        return Err(RtsiError::Calculation("t statistic is NaN".to_string()));
    }
    let x = df / (df + t * t);
    Ok(regularized_incomplete_beta(df / 2.0, 0.5, x)?.clamp(0.0, 1.0))
}

/// Regularized incomplete beta function I_x(a, b).
fn regularized_incomplete_beta(a: f64, b: f64, x: f64) -> Result<f64> {
    if x <= 0.0 {
        return Ok(0.0);
    }
    if x >= 1.0 {
        return Ok(1.0);
    }

    let ln_front = ln_gamma(a + b) - ln_gamma(a) - ln_gamma(b) + a * x.ln() + b * (1.0 - x).ln();
    let front = ln_front.exp();

    // The continued fraction converges fastest for x < (a + 1) / (a + b + 2)
    if x < (a + 1.0) / (a + b + 2.0) {
        Ok(front * beta_continued_fraction(a, b, x)? / a)
    } else {
        Ok(1.0 - front * beta_continued_fraction(b, a, 1.0 - x)? / b)
    }
}

/// Lentz evaluation of the incomplete beta continued fraction.
fn beta_continued_fraction(a: f64, b: f64, x: f64) -> Result<f64> {
    let qab = a + b;
    let qap = a + 1.0;
    let qam = a - 1.0;

    let mut c = 1.0;
    let mut d = 1.0 - qab * x / qap;
    if d.abs() < BETACF_FPMIN {
        d = BETACF_FPMIN;
    }
    d = 1.0 / d;
    let mut h = d;

    for m in 1..=BETACF_MAX_ITER {
        let m = m as f64;
        let m2 = 2.0 * m;

        // Even step
        let aa = m * (b - m) * x / ((qam + m2) * (a + m2));
        d = 1.0 + aa * d;
        if d.abs() < BETACF_FPMIN {
            d = BETACF_FPMIN;
        }
        c = 1.0 + aa / c;
        if c.abs() < BETACF_FPMIN {
            c = BETACF_FPMIN;
        }
        d = 1.0 / d;
        h *= d * c;

        // Odd step
        let aa = -(a + m) * (qab + m) * x / ((a + m2) * (qap + m2));
        d = 1.0 + aa * d;
        if d.abs() < BETACF_FPMIN {
            d = BETACF_FPMIN;
        }
        c = 1.0 + aa / c;
        if c.abs() < BETACF_FPMIN {
            c = BETACF_FPMIN;
        }
        d = 1.0 / d;
        let delta = d * c;
        h *= delta;

        if (delta - 1.0).abs() < BETACF_EPS {
            return Ok(h);
        }
    }

    Err(RtsiError::Calculation(format!(
        "incomplete beta did not converge (a={}, b={}, x={})",
        a, b, x
    )))
}

/// Natural log of the gamma function (Lanczos approximation, g=7, n=9).
fn ln_gamma(x: f64) -> f64 {
    const COEFFS: [f64; 9] = [
        0.999_999_999_999_809_9,
        676.520_368_121_885_1,
        -1_259.139_216_722_402_8,
        771.323_428_777_653_1,
        -176.615_029_162_140_6,
        12.507_343_278_686_905,
        -0.138_571_095_265_720_12,
        9.984_369_578_019_572e-6,
        1.505_632_735_149_311_6e-7,
    ];

    if x < 0.5 {
        // Reflection formula
        let pi = std::f64::consts::PI;
        return (pi / (pi * x).sin()).ln() - ln_gamma(1.0 - x);
    }

    let x = x - 1.0;
    let mut sum = COEFFS[0];
    for (i, &c) in COEFFS.iter().enumerate().skip(1) {
        sum += c / (x + i as f64);
    }
    let t = x + 7.5;
    0.5 * (2.0 * std::f64::consts::PI).ln() + (x + 0.5) * t.ln() - t + sum.ln()
}
