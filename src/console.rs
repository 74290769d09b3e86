use crate::RenderError;
use crate::sink::{Notice, TableView};
use crossterm::queue;
use crossterm::style::{
    self, Attribute, Print, PrintStyledContent, SetAttribute, SetForegroundColor, Stylize,
};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Rect},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Cell, Row, Table, Widget},
};
use std::io::{self, IsTerminal, Stdout, Write};
use unicode_width::UnicodeWidthStr;

const MAX_CELL_WIDTH: usize = 40;
const MAX_TABLE_WIDTH: usize = 4096;
const COLUMN_SPACING: u16 = 1;
// A ratatui 0.28 `Rect` holds at most this many cells.
const MAX_PAGE_CELLS: usize = u16::MAX as usize;

/// Line-oriented output: banner, notices and tables laid out by ratatui in
/// an off-screen buffer and then printed like any other text.
pub struct Console<W: Write> {
    out: W,
    color: bool,
}

impl Console<Stdout> {
    /// Styles output only when stdout is a terminal.
    pub fn stdout() -> Self {
        let out = io::stdout();
        let color = out.is_terminal();
        Console { out, color }
    }
}

impl<W: Write> Console<W> {
    pub fn new(out: W, color: bool) -> Self {
        Console { out, color }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    pub fn flush(&mut self) -> Result<(), RenderError> {
        self.out.flush()?;
        Ok(())
    }

    pub fn banner(&mut self) -> Result<(), RenderError> {
        writeln!(self.out)?;
        self.emphasised("Welcome to Vizzy!", style::Color::Cyan)?;
        writeln!(self.out)?;
        writeln!(
            self.out,
            "\nA command-line tool for quick and easy data visualization!\n"
        )?;
        self.flush()
    }

    pub fn notice(&mut self, notice: Notice) -> Result<(), RenderError> {
        match notice {
            Notice::Error(message) => {
                self.emphasised("Error:", style::Color::Red)?;
                writeln!(self.out, " {message}")?;
            }
            Notice::Warning(message) => {
                self.emphasised(&message, style::Color::Yellow)?;
                writeln!(self.out)?;
            }
        }
        self.flush()
    }

    /// Prints the table as one bordered block. Large tables are laid out in
    /// pages that share column widths, so the block reads as continuous.
    pub fn render_table(&mut self, table: &TableView) -> Result<(), RenderError> {
        let widths = column_widths(table);
        let columns_width = widths.iter().map(|&w| usize::from(w)).sum::<usize>()
            + usize::from(COLUMN_SPACING) * widths.len().saturating_sub(1);
        let inner_width = columns_width
            .max(table.title.width() + 2)
            .min(MAX_TABLE_WIDTH);
        let width = inner_width + 2;
        let rows_per_page = (MAX_PAGE_CELLS / width).saturating_sub(4).max(1);

        let no_rows: &[Vec<String>] = &[];
        let pages: Vec<&[Vec<String>]> = if table.rows.is_empty() {
            vec![no_rows]
        } else {
            table.rows.chunks(rows_per_page).collect()
        };
        let last = pages.len() - 1;
        for (idx, rows) in pages.into_iter().enumerate() {
            let buf = render_page(table, &widths, width as u16, rows, idx == 0, idx == last);
            self.write_buffer(&buf)?;
        }
        self.flush()
    }

    fn emphasised(&mut self, text: &str, color: style::Color) -> io::Result<()> {
        if self.color {
            queue!(self.out, PrintStyledContent(text.with(color).bold()))
        } else {
            queue!(self.out, Print(text))
        }
    }

    fn write_buffer(&mut self, buf: &Buffer) -> io::Result<()> {
        let width = usize::from(buf.area.width).max(1);
        for line in buf.content.chunks(width) {
            let mut skip = 0;
            let mut current = (Color::Reset, Modifier::empty());
            for cell in line {
                // Cells behind a wide grapheme are placeholders.
                if skip > 0 {
                    skip -= 1;
                    continue;
                }
                let symbol = cell.symbol();
                skip = symbol.width().saturating_sub(1);
                if self.color && (cell.fg, cell.modifier) != current {
                    queue!(self.out, SetAttribute(Attribute::Reset))?;
                    if let Some(color) = term_color(cell.fg) {
                        queue!(self.out, SetForegroundColor(color))?;
                    }
                    if cell.modifier.contains(Modifier::BOLD) {
                        queue!(self.out, SetAttribute(Attribute::Bold))?;
                    }
                    if cell.modifier.contains(Modifier::ITALIC) {
                        queue!(self.out, SetAttribute(Attribute::Italic))?;
                    }
                    current = (cell.fg, cell.modifier);
                }
                queue!(self.out, Print(symbol))?;
            }
            if current != (Color::Reset, Modifier::empty()) {
                queue!(self.out, SetAttribute(Attribute::Reset))?;
            }
            queue!(self.out, Print("\n"))?;
        }
        Ok(())
    }
}

fn column_widths(table: &TableView) -> Vec<u16> {
    table
        .headers
        .iter()
        .enumerate()
        .map(|(idx, header)| {
            let widest = table
                .rows
                .iter()
                .filter_map(|row| row.get(idx))
                .map(|val| val.width())
                .chain(std::iter::once(header.width()))
                .max()
                .unwrap_or(1);
            widest.clamp(1, MAX_CELL_WIDTH) as u16
        })
        .collect()
}

fn render_page(
    table: &TableView,
    widths: &[u16],
    width: u16,
    rows: &[Vec<String>],
    first: bool,
    last: bool,
) -> Buffer {
    let mut borders = Borders::LEFT | Borders::RIGHT;
    if first {
        borders |= Borders::TOP;
    }
    if last {
        borders |= Borders::BOTTOM;
    }
    // Header row plus the rule under it.
    let header_height = if first { 2 } else { 0 };
    let height = rows.len() + header_height + usize::from(first) + usize::from(last);
    let area = Rect::new(0, 0, width, height as u16);
    let mut buf = Buffer::empty(area);

    let mut block = Block::default().borders(borders);
    if first {
        block = block
            .title(Line::from(table.title.as_str()).style(
                Style::new()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD | Modifier::ITALIC),
            ))
            .title_alignment(Alignment::Center);
    }

    let body = rows.iter().map(|row| {
        Row::new(
            row.iter()
                .zip(&table.alignments)
                .map(|(val, &alignment)| {
                    Cell::from(Line::from(val.as_str()).alignment(alignment))
                }),
        )
    });
    let mut widget = Table::new(body, widths.iter().map(|&w| Constraint::Length(w)))
        .column_spacing(COLUMN_SPACING)
        .block(block);
    if first {
        let header = Row::new(
            table
                .headers
                .iter()
                .zip(&table.alignments)
                .map(|(name, &alignment)| {
                    Cell::from(Line::from(name.as_str()).alignment(alignment))
                }),
        )
        .style(Style::new().add_modifier(Modifier::BOLD))
        .bottom_margin(1);
        widget = widget.header(header);
    }
    widget.render(area, &mut buf);

    if first && width >= 2 {
        let rule = format!("├{}┤", "─".repeat(usize::from(width - 2)));
        buf.set_string(0, 2, rule, Style::default());
    }
    buf
}

fn term_color(color: Color) -> Option<style::Color> {
    match color {
        Color::Cyan => Some(style::Color::Cyan),
        Color::Green => Some(style::Color::Green),
        Color::Yellow => Some(style::Color::Yellow),
        Color::Red => Some(style::Color::Red),
        Color::Magenta => Some(style::Color::Magenta),
        _ => None,
    }
}
