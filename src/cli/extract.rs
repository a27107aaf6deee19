use std::io;

use backlog::{Config, Record, Table, storage::csv::write_csv};
use clap::{Parser, ValueEnum};
use tracing::instrument;

use super::{
    input::Input,
    terminal::{Colorize, is_narrow},
};

/// Longest cell printed in table output before truncation.
const MAX_CELL_WIDTH: usize = 60;

#[derive(Debug, Parser)]
pub struct Extract {
    #[command(flatten)]
    input: Input,

    /// Table to print
    #[arg(long, value_name = "VIEW", default_value = "stories")]
    view: View,

    /// Output format (table, json, csv)
    #[arg(long, value_name = "FORMAT", default_value = "table")]
    output: OutputFormat,
}

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
enum View {
    #[default]
    Stories,
    Criteria,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum, Default)]
enum OutputFormat {
    #[default]
    Table,
    Json,
    Csv,
}

impl Extract {
    #[instrument(level = "debug", skip_all)]
    pub fn run(self, config: &Config) -> anyhow::Result<()> {
        let Some(extracted) = self.input.extract(config) else {
            return Ok(());
        };

        match self.view {
            View::Stories => render(&extracted.stories, self.output),
            View::Criteria => render(&extracted.criteria, self.output),
        }
    }
}

fn render<R: Record>(table: &Table<R>, format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Table => {
            render_table(table);
            Ok(())
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(table.rows())?);
            Ok(())
        }
        OutputFormat::Csv => Ok(write_csv(table, io::stdout().lock())?),
    }
}

fn render_table<R: Record>(table: &Table<R>) {
    let headers = table.columns();
    let data: Vec<Vec<String>> = table
        .iter()
        .map(|row| {
            row.cells()
                .iter()
                .map(|cell| single_line(&cell.to_string()))
                .collect()
        })
        .collect();

    if is_narrow() {
        // Stacked output for narrow terminals
        for row in &data {
            for (header, value) in headers.iter().zip(row) {
                println!("{} {value}", format!("{header}:").dim());
            }
            println!();
        }
    } else {
        let widths: Vec<usize> = headers
            .iter()
            .enumerate()
            .map(|(idx, header)| {
                data.iter()
                    .map(|row| row[idx].chars().count())
                    .max()
                    .unwrap_or(0)
                    .max(header.chars().count())
            })
            .collect();

        for (header, &width) in headers.iter().zip(&widths) {
            print!("{header:<width$}  ");
        }
        println!();

        for &width in &widths {
            print!("{:-<width$}  ", "");
        }
        println!();

        for row in &data {
            for (value, &width) in row.iter().zip(&widths) {
                print!("{value:<width$}  ");
            }
            println!();
        }
    }

    println!("{}", format!("{} row(s)", table.len()).dim());
}

/// Joins multi-line cell text and truncates long values.
fn single_line(text: &str) -> String {
    let joined = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if joined.chars().count() > MAX_CELL_WIDTH {
        let truncated: String = joined.chars().take(MAX_CELL_WIDTH - 1).collect();
        format!("{truncated}…")
    } else {
        joined
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cells_are_flattened_and_truncated() {
        assert_eq!(single_line("Given a card\nWhen I pay\tThen"), "Given a card When I pay Then");

        let long = "x".repeat(MAX_CELL_WIDTH + 10);
        let line = single_line(&long);
        assert_eq!(line.chars().count(), MAX_CELL_WIDTH);
        assert!(line.ends_with('…'));
    }
}
