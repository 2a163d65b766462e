//! Inferential statistics and hypothesis testing module

use crate::error::{check_alpha, check_confidence_level, Error, Result};
use crate::stats::descriptive::{mean_impl, variance_impl};
use crate::stats::distributions::{
    t_critical, z_critical, Distribution, FDistribution, TDistribution,
};
use crate::stats::{AnovaResult, ConfidenceInterval, HypothesisTestResult, IntervalComparison};
use log::{debug, warn};

/// Fixed significance threshold reported by [`AnovaResult::significant`]
pub const ANOVA_SIGNIFICANCE: f64 = 0.05;

/// Internal implementation for the Student-t confidence interval of a mean
pub(crate) fn confidence_interval_impl(
    data: &[f64],
    confidence_level: f64,
) -> Result<ConfidenceInterval> {
    if data.len() < 2 {
        return Err(Error::InvalidInput(format!(
            "Confidence interval requires at least 2 data points, got {}",
            data.len()
        )));
    }
    check_confidence_level(confidence_level)?;

    let n = data.len();
    let mean = mean_impl(data)?;
    let std_err = variance_impl(data)?.sqrt() / (n as f64).sqrt();

    let margin = std_err * t_critical(confidence_level, (n - 1) as f64)?;

    Ok(ConfidenceInterval {
        mean,
        lower: mean - margin,
        upper: mean + margin,
        margin,
        confidence_level,
    })
}

/// Internal implementation for comparing two groups' intervals
pub(crate) fn compare_confidence_intervals_impl(
    sample1: &[f64],
    sample2: &[f64],
    confidence_level: f64,
) -> Result<IntervalComparison> {
    let first = confidence_interval_impl(sample1, confidence_level)?;
    let second = confidence_interval_impl(sample2, confidence_level)?;

    let overlap = first.overlaps(&second);
    let difference = first.mean - second.mean;
    debug!(
        "CI comparison at {}: [{}, {}] vs [{}, {}], overlap={}, difference={}",
        confidence_level, first.lower, first.upper, second.lower, second.upper, overlap, difference
    );

    Ok(IntervalComparison {
        first,
        second,
        overlap,
        difference,
    })
}

/// Internal implementation for two-sample t-test
pub(crate) fn ttest_impl(
    sample1: &[f64],
    sample2: &[f64],
    alpha: f64,
    equal_var: bool,
) -> Result<HypothesisTestResult> {
    let n1 = sample1.len();
    let n2 = sample2.len();

    if n1 < 2 || n2 < 2 {
        return Err(Error::InvalidInput(format!(
            "t-test requires at least 2 data points in each group, got {} and {}",
            n1, n2
        )));
    }
    check_alpha(alpha)?;

    let mean1 = mean_impl(sample1)?;
    let mean2 = mean_impl(sample2)?;
    let var1 = variance_impl(sample1)?;
    let var2 = variance_impl(sample2)?;

    let (std_err, df) = if equal_var {
        // Equal variance assumption
        let pooled_var =
            ((n1 - 1) as f64 * var1 + (n2 - 1) as f64 * var2) / (n1 + n2 - 2) as f64;
        let std_err = (pooled_var * (1.0 / n1 as f64 + 1.0 / n2 as f64)).sqrt();
        (std_err, (n1 + n2 - 2) as f64)
    } else {
        // Welch-Satterthwaite approximation for degrees of freedom
        let se1 = var1 / n1 as f64;
        let se2 = var2 / n2 as f64;
        let std_err = (se1 + se2).sqrt();
        let df_num = (se1 + se2).powi(2);
        let df_denom = se1.powi(2) / (n1 - 1) as f64 + se2.powi(2) / (n2 - 1) as f64;
        (std_err, df_num / df_denom)
    };

    if !(std_err > 0.0) {
        return Err(Error::NumericDegeneracy(
            "t-test standard error is zero; both samples have zero variance".into(),
        ));
    }

    let t_stat = (mean1 - mean2) / std_err;
    let p_value = TDistribution::new(df)?.two_sided_p_value(t_stat);

    let result = HypothesisTestResult {
        statistic: t_stat,
        p_value,
        alpha,
        reject_null: p_value < alpha,
        degrees_of_freedom: df,
    };
    debug!(
        "{} t-test: t={}, df={}, p={}",
        if equal_var { "pooled" } else { "Welch" },
        result.statistic,
        result.degrees_of_freedom,
        result.p_value
    );
    Ok(result)
}

/// Implementation for one-way ANOVA
pub(crate) fn anova_impl(groups: &[&[f64]]) -> Result<AnovaResult> {
    if groups.len() < 2 {
        return Err(Error::InvalidInput(format!(
            "ANOVA requires at least two groups, got {}",
            groups.len()
        )));
    }

    for (i, group) in groups.iter().enumerate() {
        if group.is_empty() {
            return Err(Error::InvalidInput(format!("Group {} is empty", i)));
        }
    }

    let k = groups.len();
    let total_n: usize = groups.iter().map(|g| g.len()).sum();
    if total_n <= k {
        return Err(Error::InvalidInput(
            "ANOVA requires more observations than groups".into(),
        ));
    }

    let global_mean = groups.iter().flat_map(|g| g.iter()).sum::<f64>() / total_n as f64;

    // Calculate sum of squares between groups (SSB) and within groups (SSW)
    let mut ss_between = 0.0;
    let mut ss_within = 0.0;

    for values in groups.iter() {
        let group_n = values.len();
        let group_mean = values.iter().sum::<f64>() / group_n as f64;

        ss_between += group_n as f64 * (group_mean - global_mean).powi(2);
        ss_within += values.iter().map(|&v| (v - group_mean).powi(2)).sum::<f64>();
    }

    let df_between = k - 1;
    let df_within = total_n - k;

    let ms_between = ss_between / df_between as f64;
    let ms_within = ss_within / df_within as f64;

    if !(ms_within > 0.0) {
        return Err(Error::NumericDegeneracy(
            "ANOVA within-group variance is zero".into(),
        ));
    }

    let f_statistic = ms_between / ms_within;
    let p_value = FDistribution::new(df_between as f64, df_within as f64)?.sf(f_statistic);

    let result = AnovaResult {
        f_statistic,
        p_value,
        significant: p_value < ANOVA_SIGNIFICANCE,
        ss_between,
        ss_within,
        df_between,
        df_within,
        ms_between,
        ms_within,
    };
    debug!(
        "one-way ANOVA over {} groups: F={}, p={}",
        k, result.f_statistic, result.p_value
    );
    Ok(result)
}

/// Implementation for Cohen's d with pooled standard deviation
pub(crate) fn cohens_d_impl(sample1: &[f64], sample2: &[f64]) -> Result<f64> {
    let n1 = sample1.len();
    let n2 = sample2.len();

    if n1 == 0 || n2 == 0 {
        return Err(Error::InvalidInput(
            "Cohen's d requires data in both groups".into(),
        ));
    }
    if n1 + n2 <= 2 {
        return Err(Error::InvalidInput(
            "Cohen's d requires more than 2 observations in total".into(),
        ));
    }

    let mean1 = mean_impl(sample1)?;
    let mean2 = mean_impl(sample2)?;
    // A single-value group contributes no within-group variation
    let var1 = if n1 > 1 { variance_impl(sample1)? } else { 0.0 };
    let var2 = if n2 > 1 { variance_impl(sample2)? } else { 0.0 };

    let pooled_var = ((n1 - 1) as f64 * var1 + (n2 - 1) as f64 * var2) / (n1 + n2 - 2) as f64;
    let pooled_std = pooled_var.sqrt();

    if !(pooled_std > 0.0) {
        return Err(Error::NumericDegeneracy(
            "Cohen's d pooled standard deviation is zero".into(),
        ));
    }

    Ok((mean1 - mean2) / pooled_std)
}

/// Implementation for the normal-approximation sample size calculation
pub(crate) fn required_sample_size_impl(
    margin_of_error: f64,
    std_dev: f64,
    confidence_level: f64,
) -> Result<usize> {
    if !(margin_of_error > 0.0) {
        return Err(Error::InvalidInput(format!(
            "Margin of error must be positive, got {}",
            margin_of_error
        )));
    }
    if !(std_dev >= 0.0) || !std_dev.is_finite() {
        return Err(Error::InvalidInput(format!(
            "Standard deviation must be finite and non-negative, got {}",
            std_dev
        )));
    }

    let z = z_critical(confidence_level)?;
    let n = (z * std_dev / margin_of_error).powi(2).ceil();
    if !n.is_finite() || n >= usize::MAX as f64 {
        return Err(Error::InvalidInput(format!(
            "Required sample size for margin {} and standard deviation {} is not representable",
            margin_of_error, std_dev
        )));
    }
    if n == 0.0 {
        warn!("Zero standard deviation gives a required sample size of 0");
    }

    Ok(n as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confidence_interval_known_values() {
        let data = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let ci = confidence_interval_impl(&data, 0.95).unwrap();

        // sem = 0.7071068, t(0.975, 4) = 2.776445
        assert!((ci.mean - 3.0).abs() < 1e-12);
        assert!((ci.margin - 1.963243).abs() < 1e-5);
        assert!((ci.lower - 1.036757).abs() < 1e-5);
        assert!((ci.upper - 4.963243).abs() < 1e-5);
        assert_eq!(ci.confidence_level, 0.95);
    }

    #[test]
    fn test_confidence_interval_invalid() {
        assert!(matches!(
            confidence_interval_impl(&[1.0], 0.95),
            Err(Error::InvalidInput(_))
        ));
        assert!(matches!(
            confidence_interval_impl(&[1.0, 2.0], 1.0),
            Err(Error::InvalidInput(_))
        ));
        assert!(confidence_interval_impl(&[1.0, 2.0], -0.5).is_err());
    }

    #[test]
    fn test_compare_disjoint_intervals() {
        let a = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let b = vec![101.0, 102.0, 103.0, 104.0, 105.0];
        let cmp = compare_confidence_intervals_impl(&a, &b, 0.95).unwrap();

        assert!(!cmp.overlap);
        assert!((cmp.difference + 100.0).abs() < 1e-12);
    }

    #[test]
    fn test_ttest_equal_means() {
        let sample1 = vec![5.0, 6.0, 7.0, 8.0, 9.0];
        let sample2 = vec![6.0, 7.0, 8.0, 9.0, 10.0];

        let result = ttest_impl(&sample1, &sample2, 0.05, true).unwrap();

        // t = -1 / sqrt(2.5 * 0.4) = -1, df = 8
        assert!((result.statistic + 1.0).abs() < 1e-12);
        assert_eq!(result.degrees_of_freedom, 8.0);
        assert!((result.p_value - 0.3465935).abs() < 1e-5);
        assert!(!result.reject_null);
    }

    #[test]
    fn test_ttest_different_means() {
        let sample1 = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let sample2 = vec![11.0, 12.0, 13.0, 14.0, 15.0];

        let result = ttest_impl(&sample1, &sample2, 0.05, true).unwrap();

        assert!(result.statistic < -5.0);
        assert!(result.p_value < 0.05);
        assert!(result.reject_null);
    }

    #[test]
    fn test_ttest_welch() {
        let sample1 = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let sample2 = vec![11.0, 13.0, 15.0, 17.0, 19.0];

        let pooled = ttest_impl(&sample1, &sample2, 0.05, true).unwrap();
        let welch = ttest_impl(&sample1, &sample2, 0.05, false).unwrap();

        // Equal sizes give the same t, but Welch df is smaller
        assert!((pooled.statistic - welch.statistic).abs() < 1e-12);
        assert!(welch.degrees_of_freedom < pooled.degrees_of_freedom);
        assert!((welch.degrees_of_freedom - 5.882352941).abs() < 1e-6);
        assert!(pooled.reject_null && welch.reject_null);
    }

    #[test]
    fn test_ttest_invalid() {
        let sample1 = vec![1.0, 2.0, 3.0];
        let empty: Vec<f64> = vec![];

        assert!(matches!(
            ttest_impl(&sample1, &empty, 0.05, true),
            Err(Error::InvalidInput(_))
        ));
        assert!(ttest_impl(&sample1, &sample1, 0.0, true).is_err());
        assert!(matches!(
            ttest_impl(&[2.0, 2.0], &[2.0, 2.0, 2.0], 0.05, true),
            Err(Error::NumericDegeneracy(_))
        ));
    }

    #[test]
    fn test_anova_basic() {
        let a = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let b = vec![2.0, 3.0, 4.0, 5.0, 6.0];
        let c = vec![3.0, 4.0, 5.0, 6.0, 7.0];

        let result = anova_impl(&[a.as_slice(), b.as_slice(), c.as_slice()]).unwrap();

        // SSB = 10, SSW = 30 -> F = 5 / 2.5 = 2
        assert!((result.f_statistic - 2.0).abs() < 1e-12);
        assert_eq!(result.df_between, 2);
        assert_eq!(result.df_within, 12);
        assert!((result.p_value - 0.1778).abs() < 1e-3);
        assert!(!result.significant);
    }

    #[test]
    fn test_anova_significant_difference() {
        let a = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let b = vec![11.0, 12.0, 13.0, 14.0, 15.0];
        let c = vec![21.0, 22.0, 23.0, 24.0, 25.0];

        let result = anova_impl(&[a.as_slice(), b.as_slice(), c.as_slice()]).unwrap();

        assert!(result.f_statistic > 100.0);
        assert!(result.p_value < 0.05);
        assert!(result.significant);
    }

    #[test]
    fn test_anova_invalid() {
        let a = vec![1.0, 2.0];
        let empty: Vec<f64> = vec![];
        assert!(anova_impl(&[a.as_slice()]).is_err());
        assert!(anova_impl(&[a.as_slice(), empty.as_slice()]).is_err());
        assert!(matches!(
            anova_impl(&[&[1.0, 1.0][..], &[2.0, 2.0][..]]),
            Err(Error::NumericDegeneracy(_))
        ));
    }

    #[test]
    fn test_cohens_d() {
        let a = vec![2.0, 4.0, 6.0];
        let b = vec![1.0, 3.0, 5.0];
        // pooled sd = 2, mean difference = 1
        assert!((cohens_d_impl(&a, &b).unwrap() - 0.5).abs() < 1e-12);
        assert_eq!(cohens_d_impl(&a, &a).unwrap(), 0.0);
    }

    #[test]
    fn test_cohens_d_invalid() {
        assert!(matches!(
            cohens_d_impl(&[1.0], &[2.0]),
            Err(Error::InvalidInput(_))
        ));
        assert!(cohens_d_impl(&[], &[1.0, 2.0]).is_err());
        assert!(matches!(
            cohens_d_impl(&[3.0, 3.0], &[5.0, 5.0]),
            Err(Error::NumericDegeneracy(_))
        ));
    }

    #[test]
    fn test_required_sample_size() {
        assert_eq!(required_sample_size_impl(1.0, 10.0, 0.95).unwrap(), 385);
        // z(0.99) = 2.5758 -> (2.5758 * 15 / 2)^2 = 373.2
        assert_eq!(required_sample_size_impl(2.0, 15.0, 0.99).unwrap(), 374);
        assert_eq!(required_sample_size_impl(1.0, 0.0, 0.95).unwrap(), 0);
        assert!(required_sample_size_impl(0.0, 10.0, 0.95).is_err());
        assert!(required_sample_size_impl(-1.0, 10.0, 0.95).is_err());
        assert!(required_sample_size_impl(1.0, 10.0, 1.0).is_err());
    }

    #[test]
    fn test_required_sample_size_overflow() {
        // (z * sigma / E)^2 overflows f64
        assert!(matches!(
            required_sample_size_impl(1e-160, 1e160, 0.95),
            Err(Error::InvalidInput(_))
        ));
        // Finite but larger than usize::MAX
        assert!(matches!(
            required_sample_size_impl(1e-10, 1e10, 0.95),
            Err(Error::InvalidInput(_))
        ));
    }
}
