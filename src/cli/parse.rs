use std::path::PathBuf;

use clap::Parser;
use tracing::instrument;

#[derive(Debug, Parser)]
#[command(about = "Extract course codes from a free-text transcript")]
pub struct Parse {
    /// Text file to scan for course codes
    file: PathBuf,

    /// Output format (list, json)
    #[arg(long, value_name = "FORMAT", default_value = "list")]
    output: OutputFormat,
}

#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    List,
    Json,
}

impl Parse {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self) -> anyhow::Result<()> {
        let courses = super::course_set_from_file(&self.file)?;

        match self.output {
            OutputFormat::Json => {
                let output = serde_json::json!({
                    "courses": courses
                        .iter()
                        .map(ToString::to_string)
                        .collect::<Vec<_>>(),
                    "total": courses.len(),
                });
                println!("{}", serde_json::to_string_pretty(&output)?);
            }
            OutputFormat::List => {
                for course in courses.iter() {
                    println!(" - {course}");
                }
                println!("\nTotal unique courses detected: {}", courses.len());
            }
        }

        Ok(())
    }
}
