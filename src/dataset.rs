//! In-memory tabular dataset
//!
//! A small column store holding the numeric and categorical columns of a
//! customer table. Grouped summaries and ANOVA by a categorical column are
//! built on top of it.

use std::collections::{BTreeMap, HashMap, HashSet};

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::stats::descriptive::{mean_impl, quantile_sorted, sorted_copy, variance_impl};
use crate::stats::inference::anova_impl;
use crate::stats::AnovaResult;

/// A single column of data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Column {
    Numeric(Vec<f64>),
    Categorical(Vec<String>),
}

impl Column {
    /// Number of values in the column
    pub fn len(&self) -> usize {
        match self {
            Column::Numeric(values) => values.len(),
            Column::Categorical(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn type_name(&self) -> &'static str {
        match self {
            Column::Numeric(_) => "numeric",
            Column::Categorical(_) => "categorical",
        }
    }
}

/// Per-group summary of a numeric column, rounded to two decimals
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupSummary {
    pub group: String,
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    /// Sample standard deviation; NaN for a single-row group
    pub std: f64,
    pub min: f64,
    pub max: f64,
}

/// Shape, missing values and duplicate rows of a dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityReport {
    pub rows: usize,
    pub columns: usize,
    /// Missing values per column; NaN counts as missing in numeric columns
    pub missing: BTreeMap<String, usize>,
    /// Rows equal to an earlier row across every column
    pub duplicate_rows: usize,
    /// "numeric" or "categorical" per column
    pub column_types: BTreeMap<String, String>,
}

impl QualityReport {
    /// Total missing values across all columns
    pub fn total_missing(&self) -> usize {
        self.missing.values().sum()
    }
}

/// One cell as a hashable key; NaNs compare equal, as do 0.0 and -0.0
#[derive(PartialEq, Eq, Hash)]
enum CellKey<'a> {
    Numeric(u64),
    Categorical(&'a str),
}

fn numeric_key(x: f64) -> u64 {
    if x.is_nan() {
        f64::NAN.to_bits()
    } else if x == 0.0 {
        0.0f64.to_bits()
    } else {
        x.to_bits()
    }
}

/// Column-oriented table with named columns of equal length
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    columns: HashMap<String, Column>,
    column_order: Vec<String>,
    row_count: usize,
}

impl Dataset {
    /// Create a new empty dataset
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if the dataset contains a column with the given name
    pub fn contains_column(&self, column_name: &str) -> bool {
        self.columns.contains_key(column_name)
    }

    /// Get the number of rows
    pub fn row_count(&self) -> usize {
        self.row_count
    }

    /// Get column names in insertion order
    pub fn column_names(&self) -> Vec<String> {
        self.column_order.clone()
    }

    /// Add a numeric column
    pub fn add_numeric<S: Into<String>>(&mut self, column_name: S, values: Vec<f64>) -> Result<()> {
        self.add_column(column_name.into(), Column::Numeric(values))
    }

    /// Add a categorical column
    pub fn add_categorical<S, V>(&mut self, column_name: S, values: Vec<V>) -> Result<()>
    where
        S: Into<String>,
        V: Into<String>,
    {
        let values = values.into_iter().map(Into::into).collect();
        self.add_column(column_name.into(), Column::Categorical(values))
    }

    fn add_column(&mut self, column_name: String, column: Column) -> Result<()> {
        if self.contains_column(&column_name) {
            return Err(Error::DuplicateColumnName(column_name));
        }

        let column_len = column.len();
        if !self.columns.is_empty() && column_len != self.row_count {
            return Err(Error::LengthMismatch {
                expected: self.row_count,
                found: column_len,
            });
        }

        self.columns.insert(column_name.clone(), column);
        self.column_order.push(column_name);

        if self.columns.len() == 1 {
            self.row_count = column_len;
        }

        Ok(())
    }

    /// Get a column by name
    pub fn column(&self, column_name: &str) -> Result<&Column> {
        self.columns
            .get(column_name)
            .ok_or_else(|| Error::ColumnNotFound(column_name.to_string()))
    }

    /// Get the values of a numeric column
    pub fn numeric_column(&self, column_name: &str) -> Result<&[f64]> {
        match self.column(column_name)? {
            Column::Numeric(values) => Ok(values),
            other => Err(Error::ColumnType(format!(
                "Column '{}' is {}, expected numeric",
                column_name,
                other.type_name()
            ))),
        }
    }

    /// Get the values of a categorical column
    pub fn categorical_column(&self, column_name: &str) -> Result<&[String]> {
        match self.column(column_name)? {
            Column::Categorical(values) => Ok(values),
            other => Err(Error::ColumnType(format!(
                "Column '{}' is {}, expected categorical",
                column_name,
                other.type_name()
            ))),
        }
    }

    /// Split a numeric column by the labels of a categorical column
    ///
    /// Keys are ordered; values keep their row order within each group.
    pub fn group_values(
        &self,
        group_column: &str,
        value_column: &str,
    ) -> Result<BTreeMap<String, Vec<f64>>> {
        let keys = self.categorical_column(group_column)?;
        let values = self.numeric_column(value_column)?;

        let mut groups: BTreeMap<String, Vec<f64>> = BTreeMap::new();
        for (key, &value) in keys.iter().zip(values) {
            groups.entry(key.clone()).or_default().push(value);
        }

        debug!(
            "grouped '{}' by '{}' into {} groups",
            value_column,
            group_column,
            groups.len()
        );
        Ok(groups)
    }

    /// Count, mean, median, std, min and max of `value_column` per group
    pub fn summary_by_group(
        &self,
        group_column: &str,
        value_column: &str,
    ) -> Result<Vec<GroupSummary>> {
        let groups = self.group_values(group_column, value_column)?;

        groups
            .into_iter()
            .map(|(group, values)| summarize_group(group, &values))
            .collect()
    }

    /// Row and column counts, missing values per column and duplicate rows
    pub fn quality_report(&self) -> QualityReport {
        let mut missing = BTreeMap::new();
        let mut column_types = BTreeMap::new();
        for name in &self.column_order {
            let column = &self.columns[name];
            let count = match column {
                Column::Numeric(values) => values.iter().filter(|v| v.is_nan()).count(),
                Column::Categorical(_) => 0,
            };
            missing.insert(name.clone(), count);
            column_types.insert(name.clone(), column.type_name().to_string());
        }

        let mut seen = HashSet::with_capacity(self.row_count);
        let mut duplicate_rows = 0;
        for row in 0..self.row_count {
            let key: Vec<CellKey<'_>> = self
                .column_order
                .iter()
                .map(|name| match &self.columns[name] {
                    Column::Numeric(values) => CellKey::Numeric(numeric_key(values[row])),
                    Column::Categorical(values) => CellKey::Categorical(&values[row]),
                })
                .collect();
            if !seen.insert(key) {
                duplicate_rows += 1;
            }
        }

        let report = QualityReport {
            rows: self.row_count,
            columns: self.column_order.len(),
            missing,
            duplicate_rows,
            column_types,
        };
        if report.total_missing() > 0 {
            warn!(
                "dataset has {} missing values; NaNs propagate into means and ANOVA",
                report.total_missing()
            );
        }
        debug!("quality report: {:?}", report);
        report
    }

    /// One-way ANOVA of `value_column` across the groups of `group_column`
    pub fn anova_by_group(&self, group_column: &str, value_column: &str) -> Result<AnovaResult> {
        let groups = self.group_values(group_column, value_column)?;
        let slices: Vec<&[f64]> = groups.values().map(Vec::as_slice).collect();
        anova_impl(&slices)
    }
}

/// Round to two decimals, ties to even
fn round2(x: f64) -> f64 {
    (x * 100.0).round_ties_even() / 100.0
}

fn summarize_group(group: String, values: &[f64]) -> Result<GroupSummary> {
    let sorted = sorted_copy(values);
    let count = sorted.len();
    let std = if count > 1 {
        variance_impl(values)?.sqrt()
    } else {
        f64::NAN
    };

    Ok(GroupSummary {
        group,
        count,
        mean: round2(mean_impl(values)?),
        median: round2(quantile_sorted(&sorted, 0.5)),
        std: round2(std),
        min: round2(sorted[0]),
        max: round2(sorted[count - 1]),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_dataset() -> Dataset {
        let mut ds = Dataset::new();
        ds.add_categorical("Gender", vec!["M", "F", "M", "F", "M", "F"])
            .unwrap();
        ds.add_numeric("Purchase", vec![10.0, 4.0, 12.0, 6.0, 11.0, 5.0])
            .unwrap();
        ds
    }

    #[test]
    fn test_add_columns() {
        let ds = sample_dataset();
        assert_eq!(ds.row_count(), 6);
        assert_eq!(ds.column_names(), vec!["Gender", "Purchase"]);
        assert!(ds.contains_column("Purchase"));
    }

    #[test]
    fn test_add_column_errors() {
        let mut ds = sample_dataset();
        assert!(matches!(
            ds.add_numeric("Purchase", vec![0.0; 6]),
            Err(Error::DuplicateColumnName(_))
        ));
        assert!(matches!(
            ds.add_numeric("Age", vec![1.0, 2.0]),
            Err(Error::LengthMismatch {
                expected: 6,
                found: 2
            })
        ));
    }

    #[test]
    fn test_column_lookup() {
        let ds = sample_dataset();
        assert_eq!(ds.numeric_column("Purchase").unwrap().len(), 6);
        assert!(matches!(
            ds.numeric_column("Gender"),
            Err(Error::ColumnType(_))
        ));
        assert!(matches!(
            ds.numeric_column("Age"),
            Err(Error::ColumnNotFound(_))
        ));
    }

    #[test]
    fn test_group_values() {
        let ds = sample_dataset();
        let groups = ds.group_values("Gender", "Purchase").unwrap();

        let keys: Vec<&String> = groups.keys().collect();
        assert_eq!(keys, vec!["F", "M"]);
        assert_eq!(groups["M"], vec![10.0, 12.0, 11.0]);
        assert_eq!(groups["F"], vec![4.0, 6.0, 5.0]);
    }

    #[test]
    fn test_summary_by_group() {
        let mut ds = Dataset::new();
        ds.add_categorical("City", vec!["A", "A", "A", "B"]).unwrap();
        ds.add_numeric("Purchase", vec![1.0, 2.0, 4.0, 7.5]).unwrap();

        let summary = ds.summary_by_group("City", "Purchase").unwrap();
        assert_eq!(summary.len(), 2);

        let a = &summary[0];
        assert_eq!(a.group, "A");
        assert_eq!(a.count, 3);
        assert_eq!(a.mean, 2.33);
        assert_eq!(a.median, 2.0);
        assert_eq!(a.std, 1.53);
        assert_eq!(a.min, 1.0);
        assert_eq!(a.max, 4.0);

        let b = &summary[1];
        assert_eq!(b.count, 1);
        assert!(b.std.is_nan());
        assert_eq!(b.mean, 7.5);
    }

    #[test]
    fn test_round2_ties_to_even() {
        assert_eq!(round2(0.125), 0.12);
        assert_eq!(round2(0.375), 0.38);
        assert_eq!(round2(-0.125), -0.12);
        assert_eq!(round2(2.333333), 2.33);
        assert!(round2(f64::NAN).is_nan());

        let mut ds = Dataset::new();
        ds.add_categorical("Group", vec!["A", "A"]).unwrap();
        ds.add_numeric("Value", vec![0.0, 0.25]).unwrap();
        let summary = ds.summary_by_group("Group", "Value").unwrap();
        assert_eq!(summary[0].mean, 0.12);
        assert_eq!(summary[0].median, 0.12);
    }

    #[test]
    fn test_quality_report() {
        let mut ds = Dataset::new();
        ds.add_categorical("Gender", vec!["M", "F", "M", "M"]).unwrap();
        ds.add_numeric("Purchase", vec![10.0, f64::NAN, 10.0, 7.0]).unwrap();

        let report = ds.quality_report();
        assert_eq!(report.rows, 4);
        assert_eq!(report.columns, 2);
        assert_eq!(report.missing["Purchase"], 1);
        assert_eq!(report.missing["Gender"], 0);
        assert_eq!(report.duplicate_rows, 1);
        assert_eq!(report.column_types["Gender"], "categorical");
    }

    #[test]
    fn test_quality_report_nan_rows_are_duplicates() {
        let mut ds = Dataset::new();
        ds.add_numeric("x", vec![f64::NAN, f64::NAN, 0.0, -0.0]).unwrap();

        let report = ds.quality_report();
        assert_eq!(report.missing["x"], 2);
        assert_eq!(report.duplicate_rows, 2);
    }

    #[test]
    fn test_anova_by_group() {
        let ds = sample_dataset();
        let result = ds.anova_by_group("Gender", "Purchase").unwrap();
        assert_eq!(result.df_between, 1);
        assert_eq!(result.df_within, 4);
        assert!(result.significant);
    }
}
