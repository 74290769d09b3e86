use crate::Dataset;
use statrs::statistics::{Data, Distribution};

/// Descriptive statistics of one numeric column.
#[derive(Debug, Clone, PartialEq)]
pub struct StatisticsRow {
    pub column: String,
    pub mean: f64,
    pub median: f64,
    pub min: f64,
    pub max: f64,
    pub std_dev: f64,
}

impl StatisticsRow {
    pub const HEADERS: [&'static str; 6] = ["Column", "Mean", "Median", "Min", "Max", "Std Dev"];

    pub fn cells(&self) -> [String; 6] {
        [
            self.column.clone(),
            fixed(self.mean),
            fixed(self.median),
            fixed(self.min),
            fixed(self.max),
            fixed(self.std_dev),
        ]
    }
}

/// Two decimals, with undefined values spelled `nan`.
fn fixed(val: f64) -> String {
    if val.is_nan() {
        "nan".to_string()
    } else {
        format!("{val:.2}")
    }
}

/// Five-number summary behind one box of a boxplot.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxSummary {
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub lower_whisker: f64,
    pub upper_whisker: f64,
    pub outliers: Vec<f64>,
}

/// Equal-width bin counts over `[start, end]`; the last bin includes `end`.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    pub start: f64,
    pub end: f64,
    pub counts: Vec<usize>,
}

impl Histogram {
    pub fn bin_width(&self) -> f64 {
        (self.end - self.start) / self.counts.len() as f64
    }
}

/// Statistics for every numeric column in source order, or `None` when the
/// dataset has no numeric column at all.
pub fn summarize(dataset: &Dataset) -> Option<Vec<StatisticsRow>> {
    let rows: Vec<StatisticsRow> = dataset
        .numeric_columns()
        .map(|col_idx| {
            compute_stats(&dataset.headers()[col_idx], &dataset.numeric_values(col_idx))
        })
        .collect();
    if rows.is_empty() { None } else { Some(rows) }
}

fn compute_stats(column: &str, values: &[f64]) -> StatisticsRow {
    if values.is_empty() {
        return StatisticsRow {
            column: column.to_string(),
            mean: f64::NAN,
            median: f64::NAN,
            min: f64::NAN,
            max: f64::NAN,
            std_dev: f64::NAN,
        };
    }

    let data = Data::new(values.to_vec());
    let sorted = sort_values(values);
    StatisticsRow {
        column: column.to_string(),
        mean: data.mean().unwrap_or(f64::NAN),
        median: median(&sorted),
        min: sorted[0],
        max: sorted[sorted.len() - 1],
        // Sample deviation; undefined below two values.
        std_dev: data.std_dev().unwrap_or(f64::NAN),
    }
}

pub fn box_summary(values: &[f64]) -> Option<BoxSummary> {
    if values.is_empty() {
        return None;
    }
    let sorted = sort_values(values);
    let q1 = quantile(&sorted, 0.25);
    let q3 = quantile(&sorted, 0.75);
    let iqr = q3 - q1;
    let low_fence = q1 - 1.5 * iqr;
    let high_fence = q3 + 1.5 * iqr;

    let lower_whisker = sorted
        .iter()
        .copied()
        .find(|&v| v >= low_fence)
        .filter(|&v| v <= q1)
        .unwrap_or(q1);
    let upper_whisker = sorted
        .iter()
        .rev()
        .copied()
        .find(|&v| v <= high_fence)
        .filter(|&v| v >= q3)
        .unwrap_or(q3);
    let outliers = sorted
        .iter()
        .copied()
        .filter(|&v| v < lower_whisker || v > upper_whisker)
        .collect();

    Some(BoxSummary {
        q1,
        median: median(&sorted),
        q3,
        lower_whisker,
        upper_whisker,
        outliers,
    })
}

/// Bins `values` into `bins` equal-width buckets spanning their range. A
/// single repeated value gets a unit-wide range centred on it.
pub fn histogram(values: &[f64], bins: usize) -> Option<Histogram> {
    if values.is_empty() || bins == 0 {
        return None;
    }
    let sorted = sort_values(values);
    let (mut start, mut end) = (sorted[0], sorted[sorted.len() - 1]);
    if start == end {
        start -= 0.5;
        end += 0.5;
    }
    let width = (end - start) / bins as f64;
    let mut counts = vec![0; bins];
    for val in sorted {
        let bin = ((val - start) / width).floor() as usize;
        counts[bin.min(bins - 1)] += 1;
    }
    Some(Histogram { start, end, counts })
}

fn sort_values(values: &[f64]) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_unstable_by(f64::total_cmp);
    sorted
}

fn median(sorted: &[f64]) -> f64 {
    if sorted.len() % 2 == 0 {
        (sorted[sorted.len() / 2 - 1] + sorted[sorted.len() / 2]) / 2.0
    } else {
        sorted[sorted.len() / 2]
    }
}

/// Quantile by linear interpolation between the closest order statistics.
fn quantile(sorted: &[f64], p: f64) -> f64 {
    let pos = p * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn dataset(headers: &[&str], rows: &[&[&str]]) -> Dataset {
        Dataset::new(
            headers.iter().map(|h| h.to_string()).collect(),
            rows.iter()
                .map(|row| row.iter().map(|v| v.to_string()).collect())
                .collect(),
        )
        .expect("dataset builds")
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn summarizes_two_column_scenario() {
        let dataset = dataset(&["x", "y"], &[&["1", "2"], &["3", "4"]]);
        let rows = summarize(&dataset).expect("numeric columns");
        let cells: Vec<[String; 6]> = rows.iter().map(StatisticsRow::cells).collect();
        assert_eq!(
            cells,
            vec![
                ["x", "2.00", "2.00", "1.00", "3.00", "1.41"].map(String::from),
                ["y", "3.00", "3.00", "2.00", "4.00", "1.41"].map(String::from),
            ]
        );
    }

    #[test]
    fn keeps_numeric_columns_in_source_order() {
        let dataset = dataset(
            &["b", "name", "a", "flag"],
            &[&["1.5", "x", "2", "true"], &["2.5", "y", "4", "false"]],
        );
        let rows = summarize(&dataset).expect("numeric columns");
        let names: Vec<&str> = rows.iter().map(|r| r.column.as_str()).collect();
        assert_eq!(names, vec!["b", "a"]);
    }

    #[test]
    fn no_numeric_columns_yields_none() {
        let dataset = dataset(&["name", "flag"], &[&["a", "true"], &["b", "false"]]);
        assert_eq!(summarize(&dataset), None);
    }

    #[test]
    fn summarize_is_idempotent() {
        let dataset = dataset(&["x"], &[&["4"], &["1"], &["7"], &["NA"]]);
        assert_eq!(summarize(&dataset), summarize(&dataset));
    }

    #[rstest]
    #[case(&[5.0])]
    #[case(&[1.0, 100.0])]
    #[case(&[0.1, 0.1, 0.1])]
    #[case(&[-3.0, 8.5, 2.25, 2.25, 40.0, -17.0])]
    #[case(&[1e12, 1e-12, 3.0])]
    fn order_statistics_bracket_centre(#[case] values: &[f64]) {
        let row = compute_stats("c", values);
        assert!(row.min <= row.median && row.median <= row.max);
        assert!(row.min <= row.mean && row.mean <= row.max);
    }

    #[test]
    fn single_value_has_undefined_std_dev() {
        let row = compute_stats("c", &[3.0]);
        assert_eq!(row.mean, 3.0);
        assert!(row.std_dev.is_nan());
        assert_eq!(row.cells()[5], "nan");
    }

    #[test]
    fn all_missing_numeric_column_is_undefined() {
        let dataset = dataset(&["x"], &[&[""], &["NA"]]);
        let rows = summarize(&dataset).expect("all-missing column is numeric");
        assert!(rows[0].mean.is_nan());
        assert!(rows[0].max.is_nan());
        assert_eq!(rows[0].cells()[1..], ["nan", "nan", "nan", "nan", "nan"].map(String::from));
    }

    #[test]
    fn box_summary_interpolates_quartiles() {
        let summary = box_summary(&[1.0, 2.0, 3.0, 4.0]).expect("non-empty");
        assert!(approx(summary.q1, 1.75));
        assert!(approx(summary.median, 2.5));
        assert!(approx(summary.q3, 3.25));
        assert_eq!(summary.lower_whisker, 1.0);
        assert_eq!(summary.upper_whisker, 4.0);
        assert!(summary.outliers.is_empty());
    }

    #[test]
    fn box_summary_flags_outliers() {
        let summary = box_summary(&[1.0, 2.0, 3.0, 4.0, 5.0, 100.0]).expect("non-empty");
        assert_eq!(summary.upper_whisker, 5.0);
        assert_eq!(summary.outliers, vec![100.0]);
        assert!(summary.lower_whisker <= summary.q1);
        assert!(summary.q1 <= summary.median && summary.median <= summary.q3);
        assert!(summary.q3 <= summary.upper_whisker);
    }

    #[test]
    fn box_summary_of_nothing_is_none() {
        assert_eq!(box_summary(&[]), None);
    }

    #[test]
    fn histogram_counts_every_value() {
        let values: Vec<f64> = (0..=100).map(f64::from).collect();
        let hist = histogram(&values, 20).expect("non-empty");
        assert_eq!(hist.counts.len(), 20);
        assert_eq!(hist.counts.iter().sum::<usize>(), values.len());
        assert_eq!(hist.start, 0.0);
        assert_eq!(hist.end, 100.0);
        // The maximum lands in the closed last bin.
        assert_eq!(hist.counts[19], 6);
    }

    #[test]
    fn histogram_of_constant_values_widens_range() {
        let hist = histogram(&[2.0, 2.0, 2.0], 20).expect("non-empty");
        assert_eq!(hist.start, 1.5);
        assert_eq!(hist.end, 2.5);
        assert_eq!(hist.counts.iter().sum::<usize>(), 3);
        assert!(approx(hist.bin_width(), 0.05));
    }

    #[test]
    fn histogram_needs_values_and_bins() {
        assert_eq!(histogram(&[], 20), None);
        assert_eq!(histogram(&[1.0], 0), None);
    }
}
