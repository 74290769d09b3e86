//! Runs a parsed command: load the dataset once, then produce each requested
//! output in a fixed order.

use crate::sink::{BoxPlot, HistogramGrid, Notice, Presenter, TableView};
use crate::stats::{box_summary, histogram, summarize};
use crate::{ColumnError, Dataset, RenderError, resolve};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{debug, error, info, warn};

pub const HISTOGRAM_BINS: usize = 20;

/// One requested output. A plan always orders them table, summary, boxplot,
/// histogram.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    Table,
    Summary,
    Boxplot(Vec<String>),
    Histogram(Vec<String>),
}

impl Request {
    fn rank(&self) -> u8 {
        match self {
            Request::Table => 0,
            Request::Summary => 1,
            Request::Boxplot(_) => 2,
            Request::Histogram(_) => 3,
        }
    }
}

/// A validated command line, ready to execute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plan {
    pub path: PathBuf,
    pub delimiter: u8,
    requests: Vec<Request>,
}

impl Plan {
    pub fn new(path: impl Into<PathBuf>, delimiter: u8, mut requests: Vec<Request>) -> Self {
        requests.sort_by_key(Request::rank);
        Plan {
            path: path.into(),
            delimiter,
            requests,
        }
    }

    pub fn requests(&self) -> &[Request] {
        &self.requests
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    /// The dataset could not be loaded.
    Failure,
}

impl Outcome {
    pub fn exit_code(self) -> ExitCode {
        match self {
            Outcome::Success => ExitCode::SUCCESS,
            Outcome::Failure => ExitCode::FAILURE,
        }
    }
}

/// Executes `plan` against `presenter`.
///
/// A load failure ends the run with [`Outcome::Failure`]. A bad column
/// selection abandons only its own plot and the run still succeeds. `Err` is
/// reserved for the presenter itself failing.
pub fn execute<P: Presenter + ?Sized>(
    plan: &Plan,
    presenter: &mut P,
) -> Result<Outcome, RenderError> {
    presenter.banner()?;

    let dataset = match Dataset::from_path(&plan.path, plan.delimiter) {
        Ok(dataset) => dataset,
        Err(err) => {
            error!(path = %plan.path.display(), error = %err, "failed to load dataset");
            presenter.notice(Notice::Error(err.to_string()))?;
            return Ok(Outcome::Failure);
        }
    };
    info!(
        rows = dataset.row_count(),
        columns = dataset.column_count(),
        "dataset ready"
    );

    for request in &plan.requests {
        debug!(?request, "rendering");
        match request {
            Request::Table => presenter.render_table(&TableView::from_dataset(&dataset))?,
            Request::Summary => match summarize(&dataset) {
                Some(stats) => presenter.render_table(&TableView::from_statistics(&stats))?,
                None => {
                    warn!("summary requested without numeric columns");
                    presenter.notice(Notice::Warning(
                        "No numeric columns found in the dataset.".to_string(),
                    ))?;
                }
            },
            Request::Boxplot(names) => {
                if let Some(series) = plot_series(&dataset, names, presenter)? {
                    let boxes = series
                        .into_iter()
                        .filter_map(|(name, values)| box_summary(&values).map(|b| (name, b)))
                        .collect();
                    presenter.show_boxplot(&BoxPlot { boxes })?;
                }
            }
            Request::Histogram(names) => {
                if let Some(series) = plot_series(&dataset, names, presenter)? {
                    let panels = series
                        .into_iter()
                        .filter_map(|(name, values)| {
                            histogram(&values, HISTOGRAM_BINS).map(|h| (name, h))
                        })
                        .collect();
                    presenter.show_histograms(&HistogramGrid { panels })?;
                }
            }
        }
    }
    Ok(Outcome::Success)
}

/// Resolves a plot selection to the values of each plottable column.
///
/// Returns `None` after reporting the problem when the selection names a
/// missing column or holds no numeric data at all. Text columns and empty
/// numeric columns are dropped with a warning.
fn plot_series<P: Presenter + ?Sized>(
    dataset: &Dataset,
    names: &[String],
    presenter: &mut P,
) -> Result<Option<Vec<(String, Vec<f64>)>>, RenderError> {
    let columns = match resolve(dataset, names) {
        Ok(columns) => columns,
        Err(err) => {
            report_column_error(presenter, &err)?;
            return Ok(None);
        }
    };

    let mut series = Vec::new();
    let mut skipped = Vec::new();
    for column in columns {
        let numeric = dataset
            .column_type(column.index)
            .is_some_and(|t| t.is_numeric());
        let values = if numeric {
            dataset.numeric_values(column.index)
        } else {
            Vec::new()
        };
        if values.is_empty() {
            skipped.push(column.name);
        } else {
            series.push((column.name, values));
        }
    }

    if series.is_empty() {
        report_column_error(presenter, &ColumnError::NotPlottable(skipped))?;
        return Ok(None);
    }
    for name in skipped {
        warn!(column = %name, "skipping column without numeric data");
        presenter.notice(Notice::Warning(format!(
            "Skipping column '{name}': no numeric data to plot."
        )))?;
    }
    Ok(Some(series))
}

fn report_column_error<P: Presenter + ?Sized>(
    presenter: &mut P,
    err: &ColumnError,
) -> Result<(), RenderError> {
    warn!(error = %err, "plot abandoned");
    presenter.notice(Notice::Error(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plan_orders_requests() {
        let plan = Plan::new(
            "data.csv",
            b',',
            vec![
                Request::Histogram(vec!["x".into()]),
                Request::Summary,
                Request::Boxplot(vec!["y".into()]),
                Request::Table,
            ],
        );
        assert_eq!(
            plan.requests(),
            &[
                Request::Table,
                Request::Summary,
                Request::Boxplot(vec!["y".into()]),
                Request::Histogram(vec!["x".into()]),
            ]
        );
    }
}
