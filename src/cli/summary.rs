use auditor::{Config, RuleKind};
use clap::Parser;
use tracing::instrument;

use super::{SourceArgs, terminal};

#[derive(Debug, Parser, Default)]
#[command(about = "List the required courses in every rule source")]
pub struct Summary {
    #[command(flatten)]
    sources: SourceArgs,
}

/// Column width for one course code plus padding.
const COLUMN_WIDTH: usize = 14;

impl Summary {
    #[instrument(level = "debug", skip(self, config))]
    pub fn run(self, config: &Config) -> anyhow::Result<()> {
        let sources = self.sources.collect(config)?;

        let columns = terminal::terminal_width()
            .map_or(4, |width| usize::from(width) / COLUMN_WIDTH)
            .max(1);

        let mut total = 0;

        for source in &sources {
            for rule in source.rules() {
                let RuleKind::CourseList { courses } = rule.kind() else {
                    continue;
                };
                if courses.is_empty() {
                    continue;
                }

                total += courses.len();
                println!("\n### From: {} ({})", source.name(), rule.description());

                for row in courses.chunks(columns) {
                    let cells: Vec<String> = row
                        .iter()
                        .map(|course| format!("  - {:<10}", course.to_string()))
                        .collect();
                    println!("{}", cells.concat());
                }
            }
        }

        if total == 0 {
            println!("No specific required courses were found in the rule sources.");
        } else {
            println!("\nTotal required courses listed: {total}");
        }

        Ok(())
    }
}
