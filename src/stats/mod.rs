//! Statistics module
//!
//! This module provides the statistical functionality for exploratory analysis of
//! numeric columns: descriptive statistics and outlier flags, confidence intervals
//! (parametric and bootstrap), hypothesis tests with effect sizes, and a sampling
//! distribution simulator illustrating the Central Limit Theorem.
//!
//! Every public function is a thin, generic entry point over an `*_impl` function
//! that works on plain slices.

// Feature modules
pub mod descriptive;
pub mod distributions;
pub mod inference;
pub mod sampling;

use crate::error::{Error, Result};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub use distributions::{
    t_critical, z_critical, Distribution, FDistribution, StandardNormal, TDistribution,
};

/// Ten-field descriptive summary of one sample
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryStatistics {
    /// Number of data points
    pub count: usize,
    /// Mean value
    pub mean: f64,
    /// Median (50% quantile)
    pub median: f64,
    /// Standard deviation (unbiased estimator)
    pub std: f64,
    /// Minimum value
    pub min: f64,
    /// Maximum value
    pub max: f64,
    /// 25% quantile
    pub q1: f64,
    /// 75% quantile
    pub q3: f64,
    /// Adjusted Fisher-Pearson skewness
    pub skewness: f64,
    /// Bias-corrected excess kurtosis
    pub kurtosis: f64,
}

impl SummaryStatistics {
    /// Interquartile range (Q3 - Q1)
    pub fn iqr(&self) -> f64 {
        self.q3 - self.q1
    }
}

/// Outlier detection rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutlierMethod {
    /// Values outside `[Q1 - t*IQR, Q3 + t*IQR]`
    Iqr,
    /// Values with `|z| > 3`
    ZScore,
}

impl fmt::Display for OutlierMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutlierMethod::Iqr => write!(f, "iqr"),
            OutlierMethod::ZScore => write!(f, "zscore"),
        }
    }
}

impl FromStr for OutlierMethod {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "iqr" => Ok(OutlierMethod::Iqr),
            "zscore" | "z-score" | "z_score" => Ok(OutlierMethod::ZScore),
            other => Err(Error::InvalidInput(format!(
                "Unknown outlier method '{}'. Valid methods: iqr, zscore",
                other
            ))),
        }
    }
}

/// Parametric confidence interval for a mean
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceInterval {
    /// Point estimate (sample mean)
    pub mean: f64,
    /// Lower bound
    pub lower: f64,
    /// Upper bound
    pub upper: f64,
    /// Half-width of the interval
    pub margin: f64,
    /// Confidence level in (0, 1)
    pub confidence_level: f64,
}

impl ConfidenceInterval {
    /// Full width of the interval
    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }

    /// Whether the interval contains `value`
    pub fn contains(&self, value: f64) -> bool {
        self.lower <= value && value <= self.upper
    }

    /// Whether two intervals share at least one point
    pub fn overlaps(&self, other: &ConfidenceInterval) -> bool {
        !(self.upper < other.lower || other.upper < self.lower)
    }
}

/// Side-by-side comparison of two groups' confidence intervals
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntervalComparison {
    /// Interval of the first group
    pub first: ConfidenceInterval,
    /// Interval of the second group
    pub second: ConfidenceInterval,
    /// Whether the two intervals overlap (heuristic, not a formal test)
    pub overlap: bool,
    /// Mean of the first group minus mean of the second
    pub difference: f64,
}

/// Percentile bootstrap confidence interval
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BootstrapInterval {
    /// Statistic evaluated on the original sample
    pub statistic: f64,
    /// Lower bound (alpha/2 percentile)
    pub lower: f64,
    /// Upper bound (1 - alpha/2 percentile)
    pub upper: f64,
    /// Confidence level in (0, 1)
    pub confidence_level: f64,
    /// Number of resamples drawn
    pub resamples: usize,
}

/// Result of a two-sample hypothesis test
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HypothesisTestResult {
    /// Test statistic
    pub statistic: f64,
    /// Two-sided p-value
    pub p_value: f64,
    /// Significance level used for the decision
    pub alpha: f64,
    /// `p_value < alpha`
    pub reject_null: bool,
    /// Degrees of freedom of the reference distribution
    pub degrees_of_freedom: f64,
}

/// One-way ANOVA results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnovaResult {
    /// F-statistic
    pub f_statistic: f64,
    /// p-value
    pub p_value: f64,
    /// `p_value < 0.05`; the threshold is fixed
    pub significant: bool,
    /// Between-groups sum of squares
    pub ss_between: f64,
    /// Within-groups sum of squares
    pub ss_within: f64,
    /// Between-groups degrees of freedom
    pub df_between: usize,
    /// Within-groups degrees of freedom
    pub df_within: usize,
    /// Between-groups mean square
    pub ms_between: f64,
    /// Within-groups mean square
    pub ms_within: f64,
}

/// Conventional magnitude label for a standardized mean difference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EffectMagnitude {
    Negligible,
    Small,
    Medium,
    Large,
}

impl EffectMagnitude {
    /// Classify Cohen's d using the 0.2 / 0.5 / 0.8 thresholds
    pub fn from_cohens_d(d: f64) -> Self {
        let val = d.abs();
        if val < 0.2 {
            EffectMagnitude::Negligible
        } else if val < 0.5 {
            EffectMagnitude::Small
        } else if val < 0.8 {
            EffectMagnitude::Medium
        } else {
            EffectMagnitude::Large
        }
    }
}

impl fmt::Display for EffectMagnitude {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            EffectMagnitude::Negligible => "Negligible",
            EffectMagnitude::Small => "Small",
            EffectMagnitude::Medium => "Medium",
            EffectMagnitude::Large => "Large",
        };
        f.write_str(label)
    }
}

// Public API functions

/// Calculate the ten-field summary for a sample
///
/// # Example
/// ```rust
/// use retail_eda::stats;
///
/// let data = vec![1.0, 2.0, 3.0, 4.0, 5.0];
/// let summary = stats::summary_statistics(&data).unwrap();
/// println!("Mean: {}", summary.mean);
/// println!("Skewness: {}", summary.skewness);
/// ```
pub fn summary_statistics<T: AsRef<[f64]>>(data: T) -> Result<SummaryStatistics> {
    descriptive::summary_statistics_impl(data.as_ref())
}

/// Flag outliers, one boolean per input value in input order
///
/// `threshold` scales the IQR fences; the z-score rule always uses `|z| > 3`.
///
/// # Example
/// ```rust
/// use retail_eda::stats::{self, OutlierMethod};
///
/// let data = vec![1.0, 2.0, 3.0, 4.0, 5.0, 100.0];
/// let flags = stats::detect_outliers(&data, OutlierMethod::Iqr, 1.5).unwrap();
/// assert_eq!(flags, vec![false, false, false, false, false, true]);
/// ```
pub fn detect_outliers<T: AsRef<[f64]>>(
    data: T,
    method: OutlierMethod,
    threshold: f64,
) -> Result<Vec<bool>> {
    descriptive::detect_outliers_impl(data.as_ref(), method, threshold)
}

/// Percentile (`p` in [0, 100]) of data sorted in ascending order
pub fn percentile(sorted_data: &[f64], p: f64) -> Result<f64> {
    descriptive::percentile_impl(sorted_data, p)
}

/// Arithmetic mean
pub fn mean<T: AsRef<[f64]>>(data: T) -> Result<f64> {
    descriptive::mean_impl(data.as_ref())
}

/// Sample variance (ddof = 1)
pub fn variance<T: AsRef<[f64]>>(data: T) -> Result<f64> {
    descriptive::variance_impl(data.as_ref())
}

/// Sample standard deviation (ddof = 1)
pub fn std_dev<T: AsRef<[f64]>>(data: T) -> Result<f64> {
    descriptive::variance_impl(data.as_ref()).map(f64::sqrt)
}

/// Student-t confidence interval for the mean
///
/// # Example
/// ```rust
/// use retail_eda::stats;
///
/// let purchases = vec![8370.0, 15200.0, 1422.0, 1057.0, 7969.0];
/// let ci = stats::confidence_interval(&purchases, 0.95).unwrap();
/// assert!(ci.lower <= ci.mean && ci.mean <= ci.upper);
/// ```
pub fn confidence_interval<T: AsRef<[f64]>>(
    data: T,
    confidence_level: f64,
) -> Result<ConfidenceInterval> {
    inference::confidence_interval_impl(data.as_ref(), confidence_level)
}

/// Compute both groups' confidence intervals and whether they overlap
pub fn compare_confidence_intervals<T: AsRef<[f64]>, U: AsRef<[f64]>>(
    sample1: T,
    sample2: U,
    confidence_level: f64,
) -> Result<IntervalComparison> {
    inference::compare_confidence_intervals_impl(
        sample1.as_ref(),
        sample2.as_ref(),
        confidence_level,
    )
}

/// Percentile bootstrap confidence interval driven by a caller-supplied generator
///
/// # Example
/// ```rust
/// use rand::rngs::StdRng;
/// use rand::SeedableRng;
/// use retail_eda::stats;
///
/// let data = vec![2.0, 4.0, 4.0, 5.0, 7.0, 9.0];
/// let mut rng = StdRng::seed_from_u64(42);
/// let mean = |s: &[f64]| s.iter().sum::<f64>() / s.len() as f64;
/// let ci = stats::bootstrap_confidence_interval(&data, mean, 2000, 0.95, &mut rng).unwrap();
/// assert!(ci.lower <= ci.statistic && ci.statistic <= ci.upper);
/// ```
pub fn bootstrap_confidence_interval<T, F, R>(
    data: T,
    statistic_fn: F,
    resamples: usize,
    confidence_level: f64,
    rng: &mut R,
) -> Result<BootstrapInterval>
where
    T: AsRef<[f64]>,
    F: Fn(&[f64]) -> f64,
    R: Rng + ?Sized,
{
    sampling::bootstrap_ci_impl(data.as_ref(), statistic_fn, resamples, confidence_level, rng)
}

/// Percentile bootstrap confidence interval with a fixed seed
pub fn bootstrap_confidence_interval_seeded<T, F>(
    data: T,
    statistic_fn: F,
    resamples: usize,
    confidence_level: f64,
    seed: u64,
) -> Result<BootstrapInterval>
where
    T: AsRef<[f64]>,
    F: Fn(&[f64]) -> f64,
{
    let mut rng = sampling::seeded_rng(seed);
    sampling::bootstrap_ci_impl(data.as_ref(), statistic_fn, resamples, confidence_level, &mut rng)
}

/// Parallel percentile bootstrap; the result depends only on `seed`, not on thread count
#[cfg(feature = "parallel")]
pub fn bootstrap_confidence_interval_par<T, F>(
    data: T,
    statistic_fn: F,
    resamples: usize,
    confidence_level: f64,
    seed: u64,
) -> Result<BootstrapInterval>
where
    T: AsRef<[f64]>,
    F: Fn(&[f64]) -> f64 + Send + Sync,
{
    sampling::bootstrap_ci_par_impl(data.as_ref(), statistic_fn, resamples, confidence_level, seed)
}

/// Generate bootstrap resamples (with replacement, same size as `data`)
pub fn bootstrap<T: AsRef<[f64]>, R: Rng + ?Sized>(
    data: T,
    n_samples: usize,
    rng: &mut R,
) -> Result<Vec<Vec<f64>>> {
    sampling::bootstrap_impl(data.as_ref(), n_samples, rng)
}

/// Means of `num_samples` draws of `sample_size` values without replacement
///
/// # Example
/// ```rust
/// use rand::rngs::StdRng;
/// use rand::SeedableRng;
/// use retail_eda::stats;
///
/// let population: Vec<f64> = (1..=100).map(f64::from).collect();
/// let mut rng = StdRng::seed_from_u64(7);
/// let means = stats::sample_mean_distribution(&population, 30, 500, &mut rng).unwrap();
/// assert_eq!(means.len(), 500);
/// ```
pub fn sample_mean_distribution<T: AsRef<[f64]>, R: Rng + ?Sized>(
    population: T,
    sample_size: usize,
    num_samples: usize,
    rng: &mut R,
) -> Result<Vec<f64>> {
    sampling::sample_mean_distribution_impl(population.as_ref(), sample_size, num_samples, rng)
}

/// Two-sided independent-samples t-test assuming equal variances
///
/// # Example
/// ```rust
/// use retail_eda::stats;
///
/// let male = vec![9.0, 10.0, 11.0, 10.5, 9.5];
/// let female = vec![7.0, 8.0, 7.5, 8.5, 8.0];
/// let result = stats::t_test_independent(&male, &female, 0.05).unwrap();
/// println!("t = {}, p = {}", result.statistic, result.p_value);
/// assert!(result.reject_null);
/// ```
pub fn t_test_independent<T: AsRef<[f64]>, U: AsRef<[f64]>>(
    sample1: T,
    sample2: U,
    alpha: f64,
) -> Result<HypothesisTestResult> {
    inference::ttest_impl(sample1.as_ref(), sample2.as_ref(), alpha, true)
}

/// Two-sided Welch t-test (no equal-variance assumption)
pub fn welch_t_test<T: AsRef<[f64]>, U: AsRef<[f64]>>(
    sample1: T,
    sample2: U,
    alpha: f64,
) -> Result<HypothesisTestResult> {
    inference::ttest_impl(sample1.as_ref(), sample2.as_ref(), alpha, false)
}

/// One-way ANOVA across two or more groups
///
/// # Example
/// ```rust
/// use retail_eda::stats;
///
/// let groups = vec![
///     vec![1.0, 2.0, 3.0, 4.0, 5.0],
///     vec![11.0, 12.0, 13.0, 14.0, 15.0],
///     vec![21.0, 22.0, 23.0, 24.0, 25.0],
/// ];
/// let result = stats::one_way_anova(&groups).unwrap();
/// assert!(result.significant);
/// ```
pub fn one_way_anova<T: AsRef<[f64]>>(groups: &[T]) -> Result<AnovaResult> {
    let slices: Vec<&[f64]> = groups.iter().map(|g| g.as_ref()).collect();
    inference::anova_impl(&slices)
}

/// Cohen's d with pooled standard deviation
pub fn cohens_d<T: AsRef<[f64]>, U: AsRef<[f64]>>(sample1: T, sample2: U) -> Result<f64> {
    inference::cohens_d_impl(sample1.as_ref(), sample2.as_ref())
}

/// Minimum sample size for a target margin of error under the normal approximation
///
/// # Example
/// ```rust
/// use retail_eda::stats;
///
/// assert_eq!(stats::required_sample_size(1.0, 10.0, 0.95).unwrap(), 385);
/// ```
pub fn required_sample_size(
    margin_of_error: f64,
    std_dev: f64,
    confidence_level: f64,
) -> Result<usize> {
    inference::required_sample_size_impl(margin_of_error, std_dev, confidence_level)
}
