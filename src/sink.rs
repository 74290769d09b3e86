use crate::console::Console;
use crate::stats::{BoxSummary, Histogram, StatisticsRow};
use crate::tui::PlotWindow;
use crate::{Dataset, RenderError};
use ratatui::layout::Alignment;
use std::io::{Stdout, Write};

/// A message for the user that is not part of any table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Error(String),
    Warning(String),
}

/// Stringified table ready for a sink: title, header and body rows.
#[derive(Debug, Clone, PartialEq)]
pub struct TableView {
    pub title: String,
    pub headers: Vec<String>,
    pub alignments: Vec<Alignment>,
    pub rows: Vec<Vec<String>>,
}

impl TableView {
    /// Every row and column of the dataset under the title "Data Summary".
    pub fn from_dataset(dataset: &Dataset) -> Self {
        let rows = (0..dataset.row_count())
            .map(|row_idx| {
                (0..dataset.column_count())
                    .map(|col_idx| dataset.display_cell(row_idx, col_idx).to_string())
                    .collect()
            })
            .collect();
        TableView {
            title: "Data Summary".to_string(),
            headers: dataset.headers().to_vec(),
            alignments: vec![Alignment::Left; dataset.column_count()],
            rows,
        }
    }

    pub fn from_statistics(stats: &[StatisticsRow]) -> Self {
        let mut alignments = vec![Alignment::Center; StatisticsRow::HEADERS.len()];
        alignments[0] = Alignment::Left;
        TableView {
            title: "Descriptive Statistics".to_string(),
            headers: StatisticsRow::HEADERS.map(String::from).to_vec(),
            alignments,
            rows: stats.iter().map(|row| row.cells().to_vec()).collect(),
        }
    }
}

/// One box per column, drawn on a shared value axis.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxPlot {
    pub boxes: Vec<(String, BoxSummary)>,
}

/// One histogram panel per column.
#[derive(Debug, Clone, PartialEq)]
pub struct HistogramGrid {
    pub panels: Vec<(String, Histogram)>,
}

pub trait TableSink {
    fn banner(&mut self) -> Result<(), RenderError>;
    fn render_table(&mut self, table: &TableView) -> Result<(), RenderError>;
    fn notice(&mut self, notice: Notice) -> Result<(), RenderError>;
}

/// Plot output. Both calls return only once the user has dismissed the plot.
pub trait PlotSink {
    fn show_boxplot(&mut self, plot: &BoxPlot) -> Result<(), RenderError>;
    fn show_histograms(&mut self, grid: &HistogramGrid) -> Result<(), RenderError>;
}

/// Everything the dispatcher needs to present a run.
pub trait Presenter: TableSink + PlotSink {}

impl<T: TableSink + PlotSink + ?Sized> Presenter for T {}

/// Tables and notices on a writer, plots in a full-screen terminal window.
pub struct Terminal<W: Write> {
    console: Console<W>,
    plots: PlotWindow,
}

impl Terminal<Stdout> {
    pub fn stdout() -> Self {
        Terminal::new(Console::stdout(), PlotWindow::default())
    }
}

impl<W: Write> Terminal<W> {
    pub fn new(console: Console<W>, plots: PlotWindow) -> Self {
        Terminal { console, plots }
    }

    pub fn into_inner(self) -> W {
        self.console.into_inner()
    }
}

impl<W: Write> TableSink for Terminal<W> {
    fn banner(&mut self) -> Result<(), RenderError> {
        self.console.banner()
    }

    fn render_table(&mut self, table: &TableView) -> Result<(), RenderError> {
        self.console.render_table(table)
    }

    fn notice(&mut self, notice: Notice) -> Result<(), RenderError> {
        self.console.notice(notice)
    }
}

impl<W: Write> PlotSink for Terminal<W> {
    fn show_boxplot(&mut self, plot: &BoxPlot) -> Result<(), RenderError> {
        // Pending table output must reach the screen before it is swapped out.
        self.console.flush()?;
        self.plots.show_boxplot(plot)
    }

    fn show_histograms(&mut self, grid: &HistogramGrid) -> Result<(), RenderError> {
        self.console.flush()?;
        self.plots.show_histograms(grid)
    }
}
