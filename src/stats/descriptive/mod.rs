//! Descriptive statistics module

use crate::error::{Error, Result};
use crate::stats::{OutlierMethod, SummaryStatistics};
use log::{debug, warn};

/// Z-score cutoff used by [`OutlierMethod::ZScore`]
pub const ZSCORE_CUTOFF: f64 = 3.0;

/// Arithmetic mean
pub(crate) fn mean_impl(data: &[f64]) -> Result<f64> {
    if data.is_empty() {
        return Err(Error::InvalidInput("Mean requires at least one value".into()));
    }
    Ok(data.iter().sum::<f64>() / data.len() as f64)
}

/// Sample variance (unbiased estimator, ddof = 1)
pub(crate) fn variance_impl(data: &[f64]) -> Result<f64> {
    if data.len() < 2 {
        return Err(Error::InvalidInput(format!(
            "Sample variance requires at least 2 values, got {}",
            data.len()
        )));
    }
    let mean = mean_impl(data)?;
    let sum_squared_diff = data.iter().map(|&x| (x - mean).powi(2)).sum::<f64>();
    Ok(sum_squared_diff / (data.len() - 1) as f64)
}

/// Sort a copy of the data in ascending order
pub(crate) fn sorted_copy(data: &[f64]) -> Vec<f64> {
    let mut sorted = data.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    sorted
}

/// Quantile of sorted data by linear interpolation, `q` in [0, 1]
pub(crate) fn quantile_sorted(sorted_data: &[f64], q: f64) -> f64 {
    let n = sorted_data.len();
    if n == 0 {
        return f64::NAN;
    }

    let idx = q * (n - 1) as f64;
    let idx_floor = idx.floor() as usize;
    let idx_ceil = idx.ceil() as usize;

    if idx_floor == idx_ceil {
        return sorted_data[idx_floor];
    }

    let weight_ceil = idx - idx_floor as f64;
    let weight_floor = 1.0 - weight_ceil;

    sorted_data[idx_floor] * weight_floor + sorted_data[idx_ceil] * weight_ceil
}

/// Percentile of sorted data, `p` in [0, 100]
pub(crate) fn percentile_impl(sorted_data: &[f64], p: f64) -> Result<f64> {
    if sorted_data.is_empty() {
        return Err(Error::InvalidInput(
            "Cannot compute percentile for empty data".into(),
        ));
    }

    if !(0.0..=100.0).contains(&p) {
        return Err(Error::InvalidInput(
            "Percentile must be between 0 and 100".into(),
        ));
    }

    Ok(quantile_sorted(sorted_data, p / 100.0))
}

/// Adjusted Fisher-Pearson skewness (G1)
fn skewness(data: &[f64], mean: f64, std: f64) -> f64 {
    let n = data.len() as f64;
    if data.len() < 3 {
        return f64::NAN;
    }
    if std == 0.0 {
        return 0.0;
    }
    let sum_cubed = data.iter().map(|&x| ((x - mean) / std).powi(3)).sum::<f64>();
    n / ((n - 1.0) * (n - 2.0)) * sum_cubed
}

/// Bias-corrected excess kurtosis (G2)
fn kurtosis(data: &[f64], mean: f64, std: f64) -> f64 {
    let n = data.len() as f64;
    if data.len() < 4 {
        return f64::NAN;
    }
    if std == 0.0 {
        return 0.0;
    }
    let sum_fourth = data.iter().map(|&x| ((x - mean) / std).powi(4)).sum::<f64>();
    n * (n + 1.0) / ((n - 1.0) * (n - 2.0) * (n - 3.0)) * sum_fourth
        - 3.0 * (n - 1.0).powi(2) / ((n - 2.0) * (n - 3.0))
}

/// Internal implementation for the ten-field summary
pub(crate) fn summary_statistics_impl(data: &[f64]) -> Result<SummaryStatistics> {
    if data.is_empty() {
        return Err(Error::InvalidInput(
            "At least one data point is required for summary statistics".into(),
        ));
    }

    let count = data.len();
    let mean = mean_impl(data)?;

    let std = if count > 1 {
        variance_impl(data)?.sqrt()
    } else {
        f64::NAN
    };

    let sorted = sorted_copy(data);
    let min = sorted[0];
    let max = sorted[count - 1];
    let q1 = quantile_sorted(&sorted, 0.25);
    let median = quantile_sorted(&sorted, 0.5);
    let q3 = quantile_sorted(&sorted, 0.75);

    let skewness = skewness(data, mean, std);
    let kurtosis = kurtosis(data, mean, std);
    if skewness.is_nan() || kurtosis.is_nan() {
        warn!(
            "Sample of {} values is too small for shape statistics; skewness/kurtosis are NaN",
            count
        );
    }

    let summary = SummaryStatistics {
        count,
        mean,
        median,
        std,
        min,
        max,
        q1,
        q3,
        skewness,
        kurtosis,
    };
    debug!("summary statistics: {:?}", summary);
    Ok(summary)
}

/// Internal implementation for outlier flags
pub(crate) fn detect_outliers_impl(
    data: &[f64],
    method: OutlierMethod,
    threshold: f64,
) -> Result<Vec<bool>> {
    if data.is_empty() {
        return Err(Error::InvalidInput(
            "Outlier detection requires at least one value".into(),
        ));
    }

    let flags: Vec<bool> = match method {
        OutlierMethod::Iqr => {
            if !(threshold >= 0.0) {
                return Err(Error::InvalidInput(format!(
                    "IQR threshold must be non-negative, got {}",
                    threshold
                )));
            }
            let sorted = sorted_copy(data);
            let q1 = quantile_sorted(&sorted, 0.25);
            let q3 = quantile_sorted(&sorted, 0.75);
            let iqr = q3 - q1;
            let lower_bound = q1 - threshold * iqr;
            let upper_bound = q3 + threshold * iqr;

            data.iter()
                .map(|&x| x < lower_bound || x > upper_bound)
                .collect()
        }
        OutlierMethod::ZScore => {
            // A single value has no sample std, so it cannot be an outlier
            if data.len() < 2 {
                return Ok(vec![false]);
            }
            let mean = mean_impl(data)?;
            let std = variance_impl(data)?.sqrt();
            if std == 0.0 {
                warn!("Z-score outlier detection on a constant sample; nothing is flagged");
                vec![false; data.len()]
            } else {
                data.iter()
                    .map(|&x| ((x - mean) / std).abs() > ZSCORE_CUTOFF)
                    .collect()
            }
        }
    };

    debug!(
        "Found {} outliers in {} values using {} method",
        flags.iter().filter(|&&f| f).count(),
        data.len(),
        method
    );
    Ok(flags)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_basic() {
        let data = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let stats = summary_statistics_impl(&data).unwrap();

        assert_eq!(stats.count, 5);
        assert!((stats.mean - 3.0).abs() < 1e-10);
        assert!((stats.std - 1.5811388300841898).abs() < 1e-10);
        assert!((stats.min - 1.0).abs() < 1e-10);
        assert!((stats.max - 5.0).abs() < 1e-10);
        assert!((stats.median - 3.0).abs() < 1e-10);
        assert!((stats.q1 - 2.0).abs() < 1e-10);
        assert!((stats.q3 - 4.0).abs() < 1e-10);
        // Symmetric data
        assert!(stats.skewness.abs() < 1e-10);
        assert!((stats.kurtosis + 1.2).abs() < 1e-10);
    }

    #[test]
    fn test_summary_skewed() {
        let data = vec![1.0, 2.0, 3.0, 4.0, 10.0];
        let stats = summary_statistics_impl(&data).unwrap();

        // G1 / G2 reference values
        assert!((stats.skewness - 1.6970563).abs() < 1e-6);
        assert!((stats.kurtosis - 3.152).abs() < 1e-6);
    }

    #[test]
    fn test_summary_small_samples() {
        let stats = summary_statistics_impl(&[7.0]).unwrap();
        assert_eq!(stats.count, 1);
        assert!(stats.std.is_nan());
        assert!(stats.skewness.is_nan());
        assert_eq!(stats.median, 7.0);

        let stats = summary_statistics_impl(&[4.0, 4.0, 4.0, 4.0]).unwrap();
        assert_eq!(stats.std, 0.0);
        assert_eq!(stats.skewness, 0.0);
        assert_eq!(stats.kurtosis, 0.0);
    }

    #[test]
    fn test_summary_empty() {
        let data: Vec<f64> = vec![];
        assert!(matches!(
            summary_statistics_impl(&data),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_percentile() {
        let sorted = vec![1.0, 2.0, 3.0, 4.0];
        assert_eq!(percentile_impl(&sorted, 0.0).unwrap(), 1.0);
        assert_eq!(percentile_impl(&sorted, 100.0).unwrap(), 4.0);
        assert!((percentile_impl(&sorted, 50.0).unwrap() - 2.5).abs() < 1e-12);
        assert!((percentile_impl(&sorted, 25.0).unwrap() - 1.75).abs() < 1e-12);
        assert!(percentile_impl(&sorted, 101.0).is_err());
        assert!(percentile_impl(&[], 50.0).is_err());
    }

    #[test]
    fn test_iqr_outliers() {
        let data = vec![1.0, 2.0, 3.0, 4.0, 5.0, 100.0];
        let flags = detect_outliers_impl(&data, OutlierMethod::Iqr, 1.5).unwrap();
        assert_eq!(flags, vec![false, false, false, false, false, true]);
    }

    #[test]
    fn test_zscore_outliers() {
        let mut data: Vec<f64> = (0..20).map(|i| (i % 5) as f64).collect();
        data.push(50.0);
        let flags = detect_outliers_impl(&data, OutlierMethod::ZScore, 1.5).unwrap();

        assert_eq!(flags.len(), data.len());
        assert!(flags[20]);
        assert_eq!(flags.iter().filter(|&&f| f).count(), 1);
    }

    #[test]
    fn test_zscore_constant_sample() {
        let flags = detect_outliers_impl(&[2.0, 2.0, 2.0], OutlierMethod::ZScore, 0.0).unwrap();
        assert_eq!(flags, vec![false, false, false]);
    }

    #[test]
    fn test_outliers_invalid() {
        assert!(detect_outliers_impl(&[], OutlierMethod::Iqr, 1.5).is_err());
        assert!(detect_outliers_impl(&[1.0, 2.0], OutlierMethod::Iqr, -1.0).is_err());
    }

    #[test]
    fn test_zscore_single_value() {
        let flags = detect_outliers_impl(&[5.0], OutlierMethod::ZScore, 3.0).unwrap();
        assert_eq!(flags, vec![false]);
    }
}
