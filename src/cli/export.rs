use std::{
    fs::{self, File},
    io::BufWriter,
    path::{Path, PathBuf},
};

use anyhow::Context;
use backlog::{
    Config, Record, Table,
    storage::{csv::write_csv, xlsx::write_xlsx},
};
use clap::{Parser, ValueEnum};
use tracing::instrument;

use super::{input::Input, terminal::Colorize};

#[derive(Debug, Parser)]
pub struct Export {
    #[command(flatten)]
    input: Input,

    /// File format
    #[arg(long, value_name = "FORMAT", default_value = "csv")]
    format: Format,

    /// Directory to write the files to (created if missing)
    #[arg(long, value_name = "DIR", default_value = ".")]
    out: PathBuf,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum, Default)]
enum Format {
    #[default]
    Csv,
    Xlsx,
}

impl Format {
    const fn extension(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Xlsx => "xlsx",
        }
    }
}

impl Export {
    #[instrument(level = "debug", skip_all, fields(format = ?self.format, out = %self.out.display()))]
    pub fn run(self, config: &Config) -> anyhow::Result<()> {
        let Some(extracted) = self.input.extract(config) else {
            return Ok(());
        };

        fs::create_dir_all(&self.out)
            .with_context(|| format!("failed to create {}", self.out.display()))?;

        self.write("stories", &extracted.stories)?;
        self.write("acceptance_criteria", &extracted.criteria)?;
        Ok(())
    }

    fn write<R: Record>(&self, stem: &str, table: &Table<R>) -> anyhow::Result<()> {
        let path = self
            .out
            .join(format!("{stem}.{}", self.format.extension()));
        write_table(&path, table, self.format)
            .with_context(|| format!("failed to write {}", path.display()))?;

        println!(
            "{} {} ({} rows)",
            "Wrote".success(),
            path.display(),
            table.len()
        );
        Ok(())
    }
}

fn write_table<R: Record>(path: &Path, table: &Table<R>, format: Format) -> anyhow::Result<()> {
    let file = File::create(path)?;
    match format {
        Format::Csv => write_csv(table, BufWriter::new(file))?,
        Format::Xlsx => {
            write_xlsx(table, file)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use backlog::{StoriesTable, storage::csv::BOM};
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn empty_tables_are_written_with_headers() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("stories.csv");

        write_table(&path, &StoriesTable::new(), Format::Csv).unwrap();

        let bytes = fs::read(&path).unwrap();
        assert!(bytes.starts_with(BOM));
        assert!(bytes.ends_with(b"Source File\n"));
    }

    #[test]
    fn xlsx_files_are_zip_packages() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("stories.xlsx");

        write_table(&path, &StoriesTable::new(), Format::Xlsx).unwrap();

        let bytes = fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"PK"));
    }
}
