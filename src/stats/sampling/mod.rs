//! Sampling and resampling module
//!
//! All routines take their randomness from the caller, either as a `rand::Rng`
//! or as an explicit seed, so results are reproducible.

use crate::error::{check_confidence_level, Error, Result};
use crate::stats::descriptive::{quantile_sorted, sorted_copy};
use crate::stats::BootstrapInterval;
use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Seeded generator used by the seed-based entry points
pub fn seeded_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Draw one resample of `data.len()` values with replacement
fn resample<R: Rng + ?Sized>(data: &[f64], rng: &mut R) -> Vec<f64> {
    let n = data.len();
    (0..n).map(|_| data[rng.random_range(0..n)]).collect()
}

/// Internal implementation for generating bootstrap samples
pub(crate) fn bootstrap_impl<R: Rng + ?Sized>(
    data: &[f64],
    n_samples: usize,
    rng: &mut R,
) -> Result<Vec<Vec<f64>>> {
    if data.is_empty() {
        return Err(Error::InvalidInput("Bootstrap requires data".into()));
    }

    if n_samples == 0 {
        return Err(Error::InvalidInput(
            "Number of samples must be positive".into(),
        ));
    }

    Ok((0..n_samples).map(|_| resample(data, rng)).collect())
}

fn check_bootstrap_args(data: &[f64], resamples: usize, confidence_level: f64) -> Result<()> {
    if data.is_empty() {
        return Err(Error::InvalidInput(
            "Bootstrap confidence interval requires data".into(),
        ));
    }
    if resamples == 0 {
        return Err(Error::InvalidInput(
            "Number of bootstrap resamples must be positive".into(),
        ));
    }
    check_confidence_level(confidence_level)
}

/// Turn the bootstrap distribution into percentile bounds
fn percentile_interval<F>(
    data: &[f64],
    statistic_fn: F,
    bootstrap_stats: Vec<f64>,
    confidence_level: f64,
) -> Result<BootstrapInterval>
where
    F: Fn(&[f64]) -> f64,
{
    if let Some(bad) = bootstrap_stats.iter().find(|s| !s.is_finite()) {
        return Err(Error::NumericDegeneracy(format!(
            "Bootstrap statistic produced a non-finite value ({})",
            bad
        )));
    }

    let resamples = bootstrap_stats.len();
    let sorted = sorted_copy(&bootstrap_stats);

    let alpha = 1.0 - confidence_level;
    let lower = quantile_sorted(&sorted, alpha / 2.0);
    let upper = quantile_sorted(&sorted, 1.0 - alpha / 2.0);
    let statistic = statistic_fn(data);

    debug!(
        "bootstrap CI over {} resamples: statistic={}, [{}, {}]",
        resamples, statistic, lower, upper
    );

    Ok(BootstrapInterval {
        statistic,
        lower,
        upper,
        confidence_level,
        resamples,
    })
}

/// Internal implementation for the percentile bootstrap confidence interval
pub(crate) fn bootstrap_ci_impl<F, R>(
    data: &[f64],
    statistic_fn: F,
    resamples: usize,
    confidence_level: f64,
    rng: &mut R,
) -> Result<BootstrapInterval>
where
    F: Fn(&[f64]) -> f64,
    R: Rng + ?Sized,
{
    check_bootstrap_args(data, resamples, confidence_level)?;

    let bootstrap_stats: Vec<f64> = (0..resamples)
        .map(|_| statistic_fn(&resample(data, rng)))
        .collect();

    percentile_interval(data, statistic_fn, bootstrap_stats, confidence_level)
}

/// Parallel percentile bootstrap
///
/// Each resample gets its own generator seeded from a master generator, so the
/// output is identical for any thread count.
#[cfg(feature = "parallel")]
pub(crate) fn bootstrap_ci_par_impl<F>(
    data: &[f64],
    statistic_fn: F,
    resamples: usize,
    confidence_level: f64,
    seed: u64,
) -> Result<BootstrapInterval>
where
    F: Fn(&[f64]) -> f64 + Send + Sync,
{
    check_bootstrap_args(data, resamples, confidence_level)?;

    let mut master = seeded_rng(seed);
    let seeds: Vec<u64> = (0..resamples).map(|_| master.random::<u64>()).collect();

    let bootstrap_stats: Vec<f64> = seeds
        .par_iter()
        .map(|&s| {
            let mut rng = seeded_rng(s);
            statistic_fn(&resample(data, &mut rng))
        })
        .collect();

    percentile_interval(data, statistic_fn, bootstrap_stats, confidence_level)
}

/// Internal implementation for the CLT sampling-distribution simulator
pub(crate) fn sample_mean_distribution_impl<R: Rng + ?Sized>(
    population: &[f64],
    sample_size: usize,
    num_samples: usize,
    rng: &mut R,
) -> Result<Vec<f64>> {
    if sample_size == 0 {
        return Err(Error::InvalidInput("Sample size must be positive".into()));
    }
    if sample_size > population.len() {
        return Err(Error::InvalidInput(format!(
            "For sampling without replacement, sample size ({}) must not exceed population size ({})",
            sample_size,
            population.len()
        )));
    }

    let means: Vec<f64> = (0..num_samples)
        .map(|_| {
            let indices = rand::seq::index::sample(rng, population.len(), sample_size);
            indices.iter().map(|i| population[i]).sum::<f64>() / sample_size as f64
        })
        .collect();

    debug!(
        "drew {} samples of size {} from a population of {}",
        num_samples,
        sample_size,
        population.len()
    );
    Ok(means)
}
