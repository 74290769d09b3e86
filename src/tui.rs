use crate::RenderError;
use crate::sink::{BoxPlot, HistogramGrid};
use crate::stats::BoxSummary;
use crossterm::{
    cursor::{Hide, Show},
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{
        Bar, BarChart, BarGroup, Block, BorderType, Borders, Paragraph,
        canvas::{self, Canvas, Points, Rectangle},
    },
};
use std::io;
use tracing::debug;

const BOX_HALF_WIDTH: f64 = 0.25;
const CAP_HALF_WIDTH: f64 = 0.12;

/// Full-screen plot view on the alternate screen. Each `show_*` call blocks
/// until the user presses `q`, `Esc` or `Enter`.
#[derive(Debug, Clone)]
pub struct PlotWindow {
    title: String,
}

impl Default for PlotWindow {
    fn default() -> Self {
        PlotWindow {
            title: "Vizzy".to_string(),
        }
    }
}

/// Puts the terminal back the way it was found, on every exit path.
struct TerminalGuard;

impl TerminalGuard {
    fn enter() -> io::Result<Self> {
        enable_raw_mode()?;
        let guard = TerminalGuard;
        execute!(io::stdout(), EnterAlternateScreen, Hide)?;
        Ok(guard)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = execute!(io::stdout(), Show, LeaveAlternateScreen);
        let _ = disable_raw_mode();
    }
}

impl PlotWindow {
    pub fn show_boxplot(&self, plot: &BoxPlot) -> Result<(), RenderError> {
        debug!(columns = plot.boxes.len(), "opening boxplot window");
        self.run("Boxplot", |f, area| draw_boxplot(f, area, plot))
    }

    pub fn show_histograms(&self, grid: &HistogramGrid) -> Result<(), RenderError> {
        debug!(columns = grid.panels.len(), "opening histogram window");
        self.run("Histogram", |f, area| draw_histograms(f, area, grid))
    }

    fn run<F>(&self, kind: &str, draw: F) -> Result<(), RenderError>
    where
        F: Fn(&mut Frame, Rect),
    {
        let _guard = TerminalGuard::enter()?;
        let mut terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;
        let heading = format!("{} · {}", self.title, kind);

        loop {
            terminal.draw(|f| {
                let chunks = Layout::vertical([
                    Constraint::Length(3),
                    Constraint::Min(5),
                    Constraint::Length(1),
                ])
                .split(f.area());

                let title = Paragraph::new(heading.as_str())
                    .style(Style::default().fg(Color::Green).add_modifier(Modifier::BOLD))
                    .block(
                        Block::default()
                            .borders(Borders::ALL)
                            .border_type(BorderType::Rounded)
                            .border_style(Style::default().fg(Color::Cyan)),
                    );
                f.render_widget(title, chunks[0]);

                draw(f, chunks[1]);

                let help = Paragraph::new(Line::from(vec![
                    Span::styled("q", Style::default().fg(Color::Yellow)),
                    Span::raw(" / "),
                    Span::styled("Esc", Style::default().fg(Color::Yellow)),
                    Span::raw(" / "),
                    Span::styled("Enter", Style::default().fg(Color::Yellow)),
                    Span::raw(" close"),
                ]));
                f.render_widget(help, chunks[2]);
            })?;

            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press
                    && matches!(key.code, KeyCode::Char('q') | KeyCode::Esc | KeyCode::Enter)
                {
                    break;
                }
            }
        }
        Ok(())
    }
}

/// Shared value range of every box, whisker and outlier, padded by 5%.
fn value_bounds(boxes: &[(String, BoxSummary)]) -> [f64; 2] {
    let (lo, hi) = boxes
        .iter()
        .flat_map(|(_, b)| {
            [b.lower_whisker, b.upper_whisker]
                .into_iter()
                .chain(b.outliers.iter().copied())
        })
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
    if !lo.is_finite() || !hi.is_finite() {
        return [0.0, 1.0];
    }
    if lo == hi {
        return [lo - 0.5, hi + 0.5];
    }
    let pad = (hi - lo) * 0.05;
    [lo - pad, hi + pad]
}

fn draw_boxplot(f: &mut Frame, area: Rect, plot: &BoxPlot) {
    let chunks = Layout::vertical([
        Constraint::Min(3),
        Constraint::Length(plot.boxes.len() as u16 + 2),
    ])
    .split(area);

    let [y_min, y_max] = value_bounds(&plot.boxes);
    let x_max = plot.boxes.len() as f64 + 1.0;
    let chart = Canvas::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .title(format!(" y: {y_min:.2} .. {y_max:.2} ")),
        )
        .marker(Marker::Braille)
        .x_bounds([0.0, x_max])
        .y_bounds([y_min, y_max])
        .paint(|ctx| {
            for (idx, (name, summary)) in plot.boxes.iter().enumerate() {
                let x = idx as f64 + 1.0;
                ctx.draw(&Rectangle {
                    x: x - BOX_HALF_WIDTH,
                    y: summary.q1,
                    width: 2.0 * BOX_HALF_WIDTH,
                    height: summary.q3 - summary.q1,
                    color: Color::Cyan,
                });
                ctx.draw(&canvas::Line::new(
                    x - BOX_HALF_WIDTH,
                    summary.median,
                    x + BOX_HALF_WIDTH,
                    summary.median,
                    Color::Yellow,
                ));
                for (from, to) in [
                    (summary.q3, summary.upper_whisker),
                    (summary.q1, summary.lower_whisker),
                ] {
                    ctx.draw(&canvas::Line::new(x, from, x, to, Color::White));
                    ctx.draw(&canvas::Line::new(
                        x - CAP_HALF_WIDTH,
                        to,
                        x + CAP_HALF_WIDTH,
                        to,
                        Color::White,
                    ));
                }
                let outliers: Vec<(f64, f64)> = summary.outliers.iter().map(|&v| (x, v)).collect();
                ctx.draw(&Points {
                    coords: &outliers,
                    color: Color::Red,
                });
                ctx.print(x - BOX_HALF_WIDTH, y_min, Span::raw(name.clone()));
            }
        });
    f.render_widget(chart, chunks[0]);

    let legend: Vec<Line> = plot
        .boxes
        .iter()
        .map(|(name, b)| {
            Line::from(vec![
                Span::styled(format!("{name}: "), Style::default().fg(Color::Cyan)),
                Span::raw(format!(
                    "whiskers {:.2}..{:.2}  q1 {:.2}  median {:.2}  q3 {:.2}  outliers {}",
                    b.lower_whisker,
                    b.upper_whisker,
                    b.q1,
                    b.median,
                    b.q3,
                    b.outliers.len()
                )),
            ])
        })
        .collect();
    let legend = Paragraph::new(legend).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded),
    );
    f.render_widget(legend, chunks[1]);
}

/// Rows and columns of a near-square grid holding `panels` cells.
fn grid_shape(panels: usize) -> (usize, usize) {
    let cols = (panels as f64).sqrt().ceil().max(1.0) as usize;
    let rows = panels.div_ceil(cols).max(1);
    (rows, cols)
}

fn draw_histograms(f: &mut Frame, area: Rect, grid: &HistogramGrid) {
    let (rows, cols) = grid_shape(grid.panels.len());
    let row_areas = Layout::vertical(vec![Constraint::Ratio(1, rows as u32); rows]).split(area);
    let cells: Vec<Rect> = row_areas
        .iter()
        .flat_map(|row| {
            Layout::horizontal(vec![Constraint::Ratio(1, cols as u32); cols])
                .split(*row)
                .to_vec()
        })
        .collect();

    for ((name, hist), cell) in grid.panels.iter().zip(cells) {
        let bins = hist.counts.len().max(1) as u16;
        let bar_width = (cell.width.saturating_sub(2) / bins).max(1);
        let bars: Vec<Bar> = hist
            .counts
            .iter()
            .map(|&count| Bar::default().value(count as u64))
            .collect();
        let chart = BarChart::default()
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .title(format!(
                        " {name} [{:.2}, {:.2}] bin {:.2} ",
                        hist.start,
                        hist.end,
                        hist.bin_width()
                    )),
            )
            .data(BarGroup::default().bars(&bars))
            .bar_width(bar_width)
            .bar_gap(0)
            .bar_style(Style::default().fg(Color::Cyan))
            .value_style(Style::default().fg(Color::Black).bg(Color::Cyan));
        f.render_widget(chart, cell);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::{box_summary, histogram};
    use ratatui::backend::TestBackend;
    use rstest::rstest;

    #[rstest]
    #[case(1, (1, 1))]
    #[case(2, (1, 2))]
    #[case(3, (2, 2))]
    #[case(4, (2, 2))]
    #[case(5, (2, 3))]
    #[case(10, (3, 4))]
    fn grid_is_near_square(#[case] panels: usize, #[case] expected: (usize, usize)) {
        assert_eq!(grid_shape(panels), expected);
    }

    #[test]
    fn bounds_cover_whiskers_and_outliers() {
        let summary = box_summary(&[1.0, 2.0, 3.0, 4.0, 5.0, 100.0]).expect("non-empty");
        let [lo, hi] = value_bounds(&[("x".into(), summary)]);
        assert!(lo < 1.0);
        assert!(hi > 100.0);
    }

    #[test]
    fn constant_box_gets_a_visible_range() {
        let summary = box_summary(&[2.0, 2.0]).expect("non-empty");
        assert_eq!(value_bounds(&[("x".into(), summary)]), [1.5, 2.5]);
    }

    #[test]
    fn boxplot_draws_labels_and_legend() {
        let plot = BoxPlot {
            boxes: vec![
                ("x".into(), box_summary(&[1.0, 2.0, 3.0]).expect("non-empty")),
                ("y".into(), box_summary(&[4.0, 8.0]).expect("non-empty")),
            ],
        };
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).expect("test terminal");
        terminal
            .draw(|f| draw_boxplot(f, f.area(), &plot))
            .expect("draw boxplot");
        let screen = buffer_text(terminal.backend().buffer());
        assert!(screen.contains("x: whiskers 1.00..3.00"));
        assert!(screen.contains("y: whiskers 4.00..8.00"));
    }

    #[test]
    fn histograms_get_one_titled_panel_each() {
        let values: Vec<f64> = (0..40).map(f64::from).collect();
        let grid = HistogramGrid {
            panels: vec![
                ("a".into(), histogram(&values, 20).expect("non-empty")),
                ("b".into(), histogram(&[1.0], 20).expect("non-empty")),
            ],
        };
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).expect("test terminal");
        terminal
            .draw(|f| draw_histograms(f, f.area(), &grid))
            .expect("draw histograms");
        let screen = buffer_text(terminal.backend().buffer());
        assert!(screen.contains("a [0.00, 39.00]"));
        assert!(screen.contains("b [0.50, 1.50]"));
    }

    fn buffer_text(buf: &ratatui::buffer::Buffer) -> String {
        buf.content
            .chunks(usize::from(buf.area.width))
            .map(|line| line.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }
}
