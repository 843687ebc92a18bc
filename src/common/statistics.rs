//! Descriptive statistics over discrete samples
//!
//! All functions take borrowed slices and return `None` (or an empty vector)
//! for empty input instead of panicking.

use serde::Serialize;
use std::collections::BTreeMap;

/// Integer sample types the statistics can be computed over
pub trait Sample: Copy + Ord {
    fn as_f64(self) -> f64;
}

impl Sample for u64 {
    fn as_f64(self) -> f64 {
        self as f64
    }
}

impl Sample for i64 {
    fn as_f64(self) -> f64 {
        self as f64
    }
}

/// Central tendency and spread of a sample
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary<T> {
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    /// Most frequent value; ties resolve to the smallest value
    pub mode: T,
    /// Sample standard deviation, `None` for fewer than two values
    pub std_dev: Option<f64>,
    pub min: T,
    pub max: T,
}

impl<T: Sample> Summary<T> {
    pub fn of(values: &[T]) -> Option<Self> {
        let mut sorted = values.to_vec();
        sorted.sort_unstable();

        let min = *sorted.first()?;
        let max = *sorted.last()?;

        Some(Self {
            count: sorted.len(),
            mean: mean(values)?,
            median: median_of_sorted(&sorted)?,
            mode: mode(values)?,
            std_dev: std_dev(values),
            min,
            max,
        })
    }
}

pub fn mean<T: Sample>(values: &[T]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let sum: f64 = values.iter().map(|value| value.as_f64()).sum();
    Some(sum / values.len() as f64)
}

/// Median of a sample; even-length samples average the two middle values
#[cfg(test)]
pub fn median<T: Sample>(values: &[T]) -> Option<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_unstable();
    median_of_sorted(&sorted)
}

fn median_of_sorted<T: Sample>(sorted: &[T]) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let middle = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[middle - 1].as_f64() + sorted[middle].as_f64()) / 2.0)
    } else {
        Some(sorted[middle].as_f64())
    }
}

/// Most frequently occurring value, the smallest one on ties
pub fn mode<T: Sample>(values: &[T]) -> Option<T> {
    let frequencies = frequencies(values);

    let mut best: Option<(T, usize)> = None;
    for (&value, &count) in &frequencies {
        // Ascending key order, so only a strictly higher count replaces the best
        match best {
            Some((_, best_count)) if count <= best_count => {}
            _ => best = Some((value, count)),
        }
    }

    best.map(|(value, _)| value)
}

pub fn std_dev<T: Sample>(values: &[T]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let mean = mean(values)?;
    let sum_of_squares: f64 = values
        .iter()
        .map(|value| {
            let delta = value.as_f64() - mean;
            delta * delta
        })
        .sum();
    Some((sum_of_squares / (values.len() - 1) as f64).sqrt())
}

/// Occurrences of each distinct value, in ascending value order
pub fn frequencies<T: Sample>(values: &[T]) -> BTreeMap<T, usize> {
    let mut counts = BTreeMap::new();
    for &value in values {
        *counts.entry(value).or_insert(0usize) += 1;
    }
    counts
}

/// Probability mass of each distinct value (frequency / total), ascending by value
pub fn probability_mass<T: Sample>(values: &[T]) -> Vec<(T, f64)> {
    let total = values.len() as f64;
    frequencies(values)
        .into_iter()
        .map(|(value, count)| (value, count as f64 / total))
        .collect()
}

/// Prefix-summed probability mass; the last entry is 1.0 for non-empty input
pub fn cumulative_mass<T: Sample>(mass: &[(T, f64)]) -> Vec<(T, f64)> {
    let mut running = 0.0;
    mass.iter()
        .map(|&(value, probability)| {
            running += probability;
            (value, running)
        })
        .collect()
}

/// Rank-based empirical CDF: the i-th smallest value gets `(i + 1) / n`
///
/// Duplicate values produce one point per occurrence, which draws as a
/// vertical rise in a step chart.
pub fn rank_cdf<T: Sample>(values: &[T]) -> Vec<(T, f64)> {
    let mut sorted = values.to_vec();
    sorted.sort_unstable();

    let total = sorted.len() as f64;
    sorted
        .into_iter()
        .enumerate()
        .map(|(index, value)| (value, (index + 1) as f64 / total))
        .collect()
}
