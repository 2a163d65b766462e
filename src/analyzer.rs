//! Config-driven entry point
//!
//! [`Analyzer`] runs the statistics functions with the confidence level,
//! significance level, resample counts, seeds and outlier rule taken from an
//! [`AnalysisConfig`], so callers do not repeat those arguments.

use log::{debug, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::AnalysisConfig;
use crate::dataset::{Dataset, GroupSummary};
use crate::error::Result;
use crate::stats::{
    self, AnovaResult, BootstrapInterval, ConfidenceInterval, EffectMagnitude,
    HypothesisTestResult, IntervalComparison, SummaryStatistics,
};

/// Statistics runner bound to one validated configuration
#[derive(Debug, Clone)]
pub struct Analyzer {
    config: AnalysisConfig,
}

impl Default for Analyzer {
    fn default() -> Self {
        Analyzer {
            config: AnalysisConfig::default(),
        }
    }
}

impl Analyzer {
    /// Create an analyzer; the configuration is validated first
    ///
    /// The configured logging level becomes the global `log` max level.
    pub fn new(config: AnalysisConfig) -> Result<Self> {
        config.validate()?;
        log::set_max_level(config.logging.level_filter()?);
        Ok(Analyzer { config })
    }

    /// Create an analyzer from the discovered config file and environment
    pub fn from_default_sources() -> Result<Self> {
        let config = AnalysisConfig::auto_load()?;
        info!(
            "analyzer configured: confidence_level={}, alpha={}, resamples={}",
            config.inference.confidence_level, config.inference.alpha, config.bootstrap.resamples
        );
        log::set_max_level(config.logging.level_filter()?);
        Ok(Analyzer { config })
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    fn rng_for(seed: Option<u64>) -> StdRng {
        match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_rng(&mut rand::rng()),
        }
    }

    /// Ten-field summary of a sample
    pub fn summarize<T: AsRef<[f64]>>(&self, data: T) -> Result<SummaryStatistics> {
        stats::summary_statistics(data)
    }

    /// Outlier flags using the configured method and threshold
    pub fn outliers<T: AsRef<[f64]>>(&self, data: T) -> Result<Vec<bool>> {
        let outliers = &self.config.outliers;
        stats::detect_outliers(data, outliers.method, outliers.threshold)
    }

    /// Student-t interval at the configured confidence level
    pub fn confidence_interval<T: AsRef<[f64]>>(&self, data: T) -> Result<ConfidenceInterval> {
        stats::confidence_interval(data, self.config.inference.confidence_level)
    }

    /// Compare two groups' intervals at the configured confidence level
    pub fn compare<T: AsRef<[f64]>, U: AsRef<[f64]>>(
        &self,
        sample1: T,
        sample2: U,
    ) -> Result<IntervalComparison> {
        stats::compare_confidence_intervals(
            sample1,
            sample2,
            self.config.inference.confidence_level,
        )
    }

    /// Percentile bootstrap interval with the configured resamples and seed
    ///
    /// Without a configured seed each call draws a fresh one.
    pub fn bootstrap_interval<T, F>(&self, data: T, statistic_fn: F) -> Result<BootstrapInterval>
    where
        T: AsRef<[f64]>,
        F: Fn(&[f64]) -> f64 + Send + Sync,
    {
        let bootstrap = &self.config.bootstrap;
        let confidence_level = self.config.inference.confidence_level;
        let seed = bootstrap.seed.unwrap_or_else(|| rand::rng().random());
        debug!(
            "bootstrap with {} resamples, seed {}, parallel={}",
            bootstrap.resamples, seed, bootstrap.parallel
        );

        #[cfg(feature = "parallel")]
        {
            if bootstrap.parallel {
                return stats::bootstrap_confidence_interval_par(
                    data,
                    statistic_fn,
                    bootstrap.resamples,
                    confidence_level,
                    seed,
                );
            }
        }

        stats::bootstrap_confidence_interval_seeded(
            data,
            statistic_fn,
            bootstrap.resamples,
            confidence_level,
            seed,
        )
    }

    /// Pooled two-sample t-test at the configured alpha
    pub fn t_test<T: AsRef<[f64]>, U: AsRef<[f64]>>(
        &self,
        sample1: T,
        sample2: U,
    ) -> Result<HypothesisTestResult> {
        stats::t_test_independent(sample1, sample2, self.config.inference.alpha)
    }

    /// Welch t-test at the configured alpha
    pub fn welch_t_test<T: AsRef<[f64]>, U: AsRef<[f64]>>(
        &self,
        sample1: T,
        sample2: U,
    ) -> Result<HypothesisTestResult> {
        stats::welch_t_test(sample1, sample2, self.config.inference.alpha)
    }

    pub fn anova<T: AsRef<[f64]>>(&self, groups: &[T]) -> Result<AnovaResult> {
        stats::one_way_anova(groups)
    }

    /// Cohen's d together with its conventional magnitude label
    pub fn effect_size<T: AsRef<[f64]>, U: AsRef<[f64]>>(
        &self,
        sample1: T,
        sample2: U,
    ) -> Result<(f64, EffectMagnitude)> {
        let d = stats::cohens_d(sample1, sample2)?;
        Ok((d, EffectMagnitude::from_cohens_d(d)))
    }

    /// Sample size for a margin of error at the configured confidence level
    pub fn required_sample_size(&self, margin_of_error: f64, std_dev: f64) -> Result<usize> {
        stats::required_sample_size(
            margin_of_error,
            std_dev,
            self.config.inference.confidence_level,
        )
    }

    /// Sample means over the configured number of draws
    pub fn sampling_distribution<T: AsRef<[f64]>>(
        &self,
        population: T,
        sample_size: usize,
    ) -> Result<Vec<f64>> {
        let sampling = &self.config.sampling;
        let mut rng = Self::rng_for(sampling.seed);
        stats::sample_mean_distribution(population, sample_size, sampling.num_samples, &mut rng)
    }

    /// Grouped summary of a dataset column
    pub fn summarize_groups(
        &self,
        dataset: &Dataset,
        group_column: &str,
        value_column: &str,
    ) -> Result<Vec<GroupSummary>> {
        dataset.summary_by_group(group_column, value_column)
    }
}
