use backlog::{
    Config,
    report::{CriteriaSummary, StorySummary},
};
use clap::Parser;
use tracing::instrument;

use super::{
    input::{Extracted, Input},
    terminal::{Colorize, is_narrow},
};

#[derive(Debug, Parser)]
#[command(about = "Show story and acceptance criteria counts")]
pub struct Summary {
    #[command(flatten)]
    input: Input,

    /// Output format (table, json)
    #[arg(long, value_name = "FORMAT", default_value = "table")]
    output: OutputFormat,
}

#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Table,
    Json,
}

impl Summary {
    #[instrument(level = "debug", skip_all)]
    pub fn run(self, config: &Config) -> anyhow::Result<()> {
        let Some(extracted) = self.input.extract(config) else {
            return Ok(());
        };

        let stories = StorySummary::new(&extracted.stories, &extracted.criteria);
        let criteria = CriteriaSummary::new(&extracted.criteria);

        match self.output {
            OutputFormat::Json => Self::output_json(&extracted, &stories, &criteria)?,
            OutputFormat::Table => Self::output_table(&extracted, &stories, &criteria),
        }
        Ok(())
    }

    fn output_json(
        extracted: &Extracted,
        stories: &StorySummary,
        criteria: &CriteriaSummary,
    ) -> anyhow::Result<()> {
        use serde_json::json;

        let overall = &extracted.overall;
        let output = json!({
            "documents": extracted.documents,
            "overall": {
                "files": extracted.documents,
                "epics": overall.epics,
                "stories": overall.stories,
                "acceptance_criteria": overall.criteria,
                "avg_acceptance_criteria_per_story":
                    format!("{:.2}", overall.avg_criteria_per_story),
            },
            "stories": {
                "stories": stories.stories,
                "epics": stories.epics,
                "acceptance_criteria": stories.criteria,
                "modules": stories.modules,
                "avg_acceptance_criteria_per_story":
                    format!("{:.2}", stories.avg_criteria_per_story),
            },
            "acceptance_criteria": {
                "acceptance_criteria": criteria.criteria,
                "epics": criteria.epics,
                "stories": criteria.stories,
                "modules": criteria.modules,
                "files": criteria.files,
            },
        });

        println!("{}", serde_json::to_string_pretty(&output)?);
        Ok(())
    }

    fn output_table(extracted: &Extracted, stories: &StorySummary, criteria: &CriteriaSummary) {
        let overall = &extracted.overall;
        print_cards(
            "Overall",
            &[
                ("Files", extracted.documents.to_string()),
                ("Epics", overall.epics.to_string()),
                ("Stories", overall.stories.to_string()),
                ("ACs", overall.criteria.to_string()),
                ("Avg ACs/Story", format!("{:.2}", overall.avg_criteria_per_story)),
            ],
        );
        println!();

        print_cards(
            "Stories",
            &[
                ("Stories", stories.stories.to_string()),
                ("Epics", stories.epics.to_string()),
                ("ACs", stories.criteria.to_string()),
                ("Modules", stories.modules.to_string()),
                ("Avg ACs/Story", format!("{:.2}", stories.avg_criteria_per_story)),
            ],
        );
        println!();

        print_cards(
            "Acceptance criteria",
            &[
                ("ACs", criteria.criteria.to_string()),
                ("Epics", criteria.epics.to_string()),
                ("Stories", criteria.stories.to_string()),
                ("Modules", criteria.modules.to_string()),
                ("Files", criteria.files.to_string()),
            ],
        );
    }
}

fn print_cards(title: &str, cards: &[(&str, String)]) {
    println!("{title}");
    println!("{}", "─".repeat(title.chars().count()).dim());

    if is_narrow() {
        for (label, value) in cards {
            println!("{label}: {}", value.figure());
        }
        return;
    }

    let widths: Vec<usize> = cards
        .iter()
        .map(|(label, value)| label.len().max(value.len()))
        .collect();
    for ((label, _), &width) in cards.iter().zip(&widths) {
        print!("{label:<width$}   ");
    }
    println!();
    for ((_, value), &width) in cards.iter().zip(&widths) {
        // pad before coloring so escape codes don't skew the width
        print!("{}   ", format!("{value:<width$}").figure());
    }
    println!();
}
