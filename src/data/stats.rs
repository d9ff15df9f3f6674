use std::collections::HashSet;

use super::filter::{classify_column, ColumnKind};
use super::model::Table;

// ---------------------------------------------------------------------------
// KPIs
// ---------------------------------------------------------------------------

/// Headline counts shown above the chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Kpis {
    pub total_lines: usize,
    pub unique_projects: usize,
    pub unique_vessels: usize,
    pub countries: usize,
}

impl Kpis {
    pub fn compute(table: &Table) -> Self {
        Kpis {
            total_lines: table.n_rows(),
            unique_projects: n_unique(table, "Project"),
            unique_vessels: n_unique(table, "Vessel"),
            countries: n_unique(table, "Country"),
        }
    }
}

/// Distinct present values in `column`; 0 if the column is absent.
pub fn n_unique(table: &Table, column: &str) -> usize {
    table
        .column(column)
        .map(|c| c.present().collect::<HashSet<_>>().len())
        .unwrap_or(0)
}

// ---------------------------------------------------------------------------
// Value counts
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct ValueCount {
    pub value: String,
    pub count: usize,
    /// Share of all rows in the table, 0–100.
    pub percent: f64,
}

/// Occurrences of each present value, most frequent first. Ties keep
/// first-appearance order.
pub fn value_counts(table: &Table, column: &str) -> Vec<ValueCount> {
    let Some(col) = table.column(column) else {
        return Vec::new();
    };
    let labels = col.distinct_labels();
    let mut counts: Vec<ValueCount> = labels
        .into_iter()
        .map(|value| {
            let count = col.present().filter(|v| v.to_string() == value).count();
            ValueCount {
                value,
                count,
                percent: 100.0 * count as f64 / table.n_rows() as f64,
            }
        })
        .collect();
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts
}

// ---------------------------------------------------------------------------
// Numeric summary (describe)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct NumericSummary {
    pub column: String,
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation; NaN with fewer than two values.
    pub std: f64,
    pub min: f64,
    pub q25: f64,
    pub median: f64,
    pub q75: f64,
    pub max: f64,
}

/// Summary of every numeric column, in table order.
pub fn describe(table: &Table) -> Vec<NumericSummary> {
    table
        .columns()
        .iter()
        .filter(|c| classify_column(c) == ColumnKind::Numeric)
        .map(|c| {
            let mut values: Vec<f64> = c.values.iter().filter_map(|v| v.as_f64()).collect();
            values.sort_by(f64::total_cmp);
            summarize(&c.name, &values)
        })
        .collect()
}

/// `sorted` must be non-empty and ascending.
fn summarize(column: &str, sorted: &[f64]) -> NumericSummary {
    let n = sorted.len();
    let mean = sorted.iter().sum::<f64>() / n as f64;
    let std = if n > 1 {
        let ss: f64 = sorted.iter().map(|v| (v - mean).powi(2)).sum();
        (ss / (n - 1) as f64).sqrt()
    } else {
        f64::NAN
    };
    NumericSummary {
        column: column.to_string(),
        count: n,
        mean,
        std,
        min: sorted[0],
        q25: quantile(sorted, 0.25),
        median: quantile(sorted, 0.5),
        q75: quantile(sorted, 0.75),
        max: sorted[n - 1],
    }
}

/// Linear interpolation between closest ranks.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{Column, Value};

    fn lines() -> Table {
        Table::from_columns(vec![
            Column::new(
                "Project",
                vec!["P1".into(), "P1".into(), "P2".into(), Value::Empty],
            ),
            Column::new(
                "Pipe Type",
                vec!["Rigid".into(), "Flexible".into(), "Flexible".into(), "Rigid".into()],
            ),
            Column::new("Pipe OD", vec![1.0.into(), 2.0.into(), 3.0.into(), 4.0.into()]),
        ])
    }

    #[test]
    fn kpis_ignore_missing_and_absent_columns() {
        let kpis = Kpis::compute(&lines());
        assert_eq!(
            kpis,
            Kpis {
                total_lines: 4,
                unique_projects: 2,
                unique_vessels: 0,
                countries: 0,
            }
        );
    }

    #[test]
    fn value_counts_sorted_with_stable_ties() {
        let counts = value_counts(&lines(), "Pipe Type");
        assert_eq!(counts.len(), 2);
        assert_eq!(counts[0].value, "Rigid");
        assert_eq!(counts[0].count, 2);
        assert!((counts[1].percent - 50.0).abs() < 1e-9);

        let counts = value_counts(&lines(), "Project");
        assert_eq!(counts[0].value, "P1");
        assert!((counts[0].percent - 50.0).abs() < 1e-9);
        assert!(value_counts(&lines(), "Vessel").is_empty());
    }

    #[test]
    fn describe_matches_interpolated_quartiles() {
        let summary = describe(&lines());
        assert_eq!(summary.len(), 1);
        let s = &summary[0];
        assert_eq!(s.column, "Pipe OD");
        assert_eq!(s.count, 4);
        assert!((s.mean - 2.5).abs() < 1e-12);
        assert!((s.std - 1.2909944487358056).abs() < 1e-12);
        assert_eq!((s.min, s.q25, s.median, s.q75, s.max), (1.0, 1.75, 2.5, 3.25, 4.0));
    }

    #[test]
    fn single_value_has_nan_std() {
        let table = Table::from_columns(vec![Column::new("Water Depth", vec![80.0.into()])]);
        let s = &describe(&table)[0];
        assert!(s.std.is_nan());
        assert_eq!(s.median, 80.0);
    }
}
