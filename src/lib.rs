//! Loads a delimited dataset, prints a preview and descriptive statistics,
//! and draws boxplots or histograms for selected columns in the terminal.

pub mod cli;
mod columns;
mod console;
mod dataset;
pub mod dispatch;
pub mod logging;
mod sink;
mod stats;
mod tui;
mod types;

use std::io;
use std::path::PathBuf;
use thiserror::Error;

pub use columns::{ColumnRef, resolve};
pub use console::Console;
pub use dataset::Dataset;
pub use dispatch::{Outcome, Plan, Request, execute};
pub use sink::{
    BoxPlot, HistogramGrid, Notice, PlotSink, Presenter, TableSink, TableView, Terminal,
};
pub use stats::{BoxSummary, Histogram, StatisticsRow, box_summary, histogram, summarize};
pub use tui::PlotWindow;
pub use types::ColumnType;

/// Reasons a dataset could not be loaded. Every variant is fatal for a run.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("File not found. Please check the path and try again.")]
    NotFound { path: PathBuf },
    #[error("{0}")]
    Io(#[source] io::Error),
    #[error("{0}")]
    Parse(String),
    #[error("No columns to parse from file")]
    Empty,
    #[error("Expected {expected} fields in row {row}, saw {found}")]
    Ragged {
        row: usize,
        expected: usize,
        found: usize,
    },
}

/// Reasons a column selection cannot be plotted. These abandon only the
/// operation that asked for the columns.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColumnError {
    #[error("Column '{0}' not found in the dataset.")]
    Missing(String),
    #[error("No numeric data to plot for: {}", .0.join(", "))]
    NotPlottable(Vec<String>),
}

/// The terminal or output stream failed underneath a render operation.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to write output: {0}")]
    Io(#[from] io::Error),
}
