//! Output rendering: JSON, CSV and plain-text tables.

use std::io::{self, Write};

use clap::ValueEnum;
use pricer_models::analytical::Greeks;
use serde::Serialize;

use crate::Result;

/// Output format of a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Pretty-printed JSON
    Json,
    /// Comma-separated rows (series outputs only)
    Csv,
    /// Aligned plain-text table
    #[default]
    Table,
}

/// Display scaling of Greeks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GreeksDisplay {
    /// Theta per calendar day instead of per year.
    pub per_day_theta: bool,
    /// Vega and rho per 1 % move instead of per unit.
    pub percent_vega_rho: bool,
}

impl GreeksDisplay {
    /// Applies the requested scaling.
    pub fn apply(&self, greeks: Greeks<f64>) -> Greeks<f64> {
        let greeks = if self.per_day_theta {
            greeks.per_day_theta()
        } else {
            greeks
        };
        if self.percent_vega_rho {
            greeks.per_percent_vega_rho()
        } else {
            greeks
        }
    }
}

/// Writes `value` as pretty JSON to stdout.
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    serde_json::to_writer_pretty(&mut handle, value)?;
    writeln!(handle)?;
    Ok(())
}

/// Writes `rows` as CSV with a header to `writer`.
pub fn write_csv<T: Serialize, W: Write>(writer: W, rows: &[T]) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    for row in rows {
        csv.serialize(row)?;
    }
    csv.flush()?;
    Ok(())
}

/// Writes `rows` as CSV to stdout.
pub fn print_csv<T: Serialize>(rows: &[T]) -> Result<()> {
    write_csv(io::stdout().lock(), rows)
}

/// Minimal column-aligned text table.
#[derive(Debug, Clone, Default)]
pub struct Table {
    header: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    /// Creates a table with the given column titles.
    pub fn new<I, S>(header: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            header: header.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Appends one row.
    pub fn row<I, S>(&mut self, cells: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rows.push(cells.into_iter().map(Into::into).collect());
    }

    /// Renders the table.
    pub fn render(&self) -> String {
        let columns = self
            .rows
            .iter()
            .map(Vec::len)
            .chain(std::iter::once(self.header.len()))
            .max()
            .unwrap_or(0);
        let widths: Vec<usize> = (0..columns)
            .map(|c| {
                std::iter::once(&self.header)
                    .chain(&self.rows)
                    .filter_map(|r| r.get(c))
                    .map(|cell| cell.chars().count())
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let line = |cells: &[String]| -> String {
            let padded: Vec<String> = widths
                .iter()
                .enumerate()
                .map(|(c, &w)| {
                    let cell = cells.get(c).map(String::as_str).unwrap_or("");
                    let pad = w.saturating_sub(cell.chars().count());
                    format!("{}{}", cell, " ".repeat(pad))
                })
                .collect();
            padded.join("  ").trim_end().to_string()
        };
        let rule: String = widths
            .iter()
            .map(|&w| "-".repeat(w))
            .collect::<Vec<_>>()
            .join("  ");

        let mut out = String::new();
        out.push_str(&line(&self.header));
        out.push('\n');
        out.push_str(&rule);
        out.push('\n');
        for row in &self.rows {
            out.push_str(&line(row));
            out.push('\n');
        }
        out
    }

    /// Prints the table to stdout.
    pub fn print(&self) {
        print!("{}", self.render());
    }
}

/// Fixed-precision number formatting for tables.
pub fn num(value: f64) -> String {
    format!("{:.6}", value)
}
