//! Statistical probability distributions
//!
//! Continuous distributions needed for critical values and p-values: the standard
//! normal, Student's t and Fisher's F. The special functions (incomplete beta,
//! inverse error function) come from `statrs`.

use crate::error::{check_confidence_level, Error, Result};
use statrs::distribution::{ContinuousCDF, FisherSnedecor, StudentsT};
use statrs::function::erf::{erfc, erfc_inv};
use std::f64::consts::SQRT_2;

/// Trait for probability distributions
pub trait Distribution {
    /// Cumulative distribution function (CDF)
    fn cdf(&self, x: f64) -> f64;

    /// Inverse CDF (quantile function)
    fn inverse_cdf(&self, p: f64) -> f64;

    /// Survival function, `1 - cdf(x)`
    fn sf(&self, x: f64) -> f64 {
        1.0 - self.cdf(x)
    }
}

/// Standard normal distribution N(0,1)
#[derive(Debug, Clone, Copy)]
pub struct StandardNormal;

impl StandardNormal {
    pub fn new() -> Self {
        StandardNormal
    }
}

impl Default for StandardNormal {
    fn default() -> Self {
        Self::new()
    }
}

impl Distribution for StandardNormal {
    fn cdf(&self, x: f64) -> f64 {
        0.5 * erfc(-x / SQRT_2)
    }

    fn inverse_cdf(&self, p: f64) -> f64 {
        if p <= 0.0 || p >= 1.0 {
            return f64::NAN;
        }
        -SQRT_2 * erfc_inv(2.0 * p)
    }

    fn sf(&self, x: f64) -> f64 {
        0.5 * erfc(x / SQRT_2)
    }
}

/// Student's t-distribution
#[derive(Debug, Clone)]
pub struct TDistribution {
    pub degrees_of_freedom: f64,
    inner: StudentsT,
}

impl TDistribution {
    pub fn new(degrees_of_freedom: f64) -> Result<Self> {
        if !(degrees_of_freedom > 0.0) {
            return Err(Error::InvalidInput(
                "Degrees of freedom must be positive".into(),
            ));
        }

        let inner = StudentsT::new(0.0, 1.0, degrees_of_freedom)
            .map_err(|e| Error::Distribution(format!("t-distribution: {}", e)))?;

        Ok(TDistribution {
            degrees_of_freedom,
            inner,
        })
    }

    /// Two-sided p-value for an observed t statistic
    pub fn two_sided_p_value(&self, t: f64) -> f64 {
        if t == 0.0 {
            return 1.0;
        }
        (2.0 * self.sf(t.abs())).min(1.0)
    }
}

impl Distribution for TDistribution {
    fn cdf(&self, x: f64) -> f64 {
        self.inner.cdf(x)
    }

    fn inverse_cdf(&self, p: f64) -> f64 {
        if p <= 0.0 || p >= 1.0 {
            return f64::NAN;
        }
        self.inner.inverse_cdf(p)
    }

    fn sf(&self, x: f64) -> f64 {
        self.inner.sf(x)
    }
}

/// F-distribution
#[derive(Debug, Clone)]
pub struct FDistribution {
    pub df1: f64, // numerator degrees of freedom
    pub df2: f64, // denominator degrees of freedom
    inner: FisherSnedecor,
}

impl FDistribution {
    pub fn new(df1: f64, df2: f64) -> Result<Self> {
        if !(df1 > 0.0 && df2 > 0.0) {
            return Err(Error::InvalidInput(
                "Both degrees of freedom must be positive".into(),
            ));
        }

        let inner = FisherSnedecor::new(df1, df2)
            .map_err(|e| Error::Distribution(format!("F-distribution: {}", e)))?;

        Ok(FDistribution { df1, df2, inner })
    }
}

impl Distribution for FDistribution {
    fn cdf(&self, x: f64) -> f64 {
        if x <= 0.0 {
            return 0.0;
        }
        self.inner.cdf(x)
    }

    fn inverse_cdf(&self, p: f64) -> f64 {
        if p <= 0.0 {
            return 0.0;
        }
        if p >= 1.0 {
            return f64::INFINITY;
        }
        self.inner.inverse_cdf(p)
    }

    fn sf(&self, x: f64) -> f64 {
        if x <= 0.0 {
            return 1.0;
        }
        self.inner.sf(x)
    }
}

/// Two-tailed Student-t critical value at cumulative probability `(1 + c) / 2`
pub fn t_critical(confidence_level: f64, degrees_of_freedom: f64) -> Result<f64> {
    check_confidence_level(confidence_level)?;
    let dist = TDistribution::new(degrees_of_freedom)?;
    Ok(dist.inverse_cdf((1.0 + confidence_level) / 2.0))
}

/// Two-tailed standard-normal critical value at cumulative probability `(1 + c) / 2`
pub fn z_critical(confidence_level: f64) -> Result<f64> {
    check_confidence_level(confidence_level)?;
    Ok(StandardNormal::new().inverse_cdf((1.0 + confidence_level) / 2.0))
}
