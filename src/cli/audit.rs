use std::{path::PathBuf, process};

use auditor::{
    Config, Transcript,
    audit::{RuleStatus, SourceReport, run_all},
    domain::Fallback,
    storage,
};
use clap::Parser;
use tracing::instrument;

use super::{
    SourceArgs,
    terminal::Colorize,
};

#[derive(Debug, Parser, Default)]
#[command(about = "Audit a transcript against every rule source")]
pub struct Audit {
    #[command(flatten)]
    sources: SourceArgs,

    /// Transcript file (defaults to the configured path)
    #[arg(long, short, value_name = "FILE")]
    transcript: Option<PathBuf>,

    /// Output format (table, json)
    #[arg(long, value_name = "FORMAT", default_value = "table")]
    output: OutputFormat,

    /// Suppress headers and format for scripting
    #[arg(long)]
    quiet: bool,
}

#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Table,
    Json,
}

impl Audit {
    #[instrument(level = "debug", skip(self, config))]
    pub fn run(self, config: &Config) -> anyhow::Result<()> {
        let sources = self.sources.collect(config)?;

        if sources.is_empty() {
            println!(
                "No rule sources found. Add rule files under '{}' or pass --rules/--catalog.",
                config.rules_dir.display()
            );
            return Ok(());
        }

        let transcript_path = self
            .transcript
            .clone()
            .unwrap_or_else(|| config.transcript.clone());
        let transcript = storage::load_transcript(&transcript_path)?;

        let reports = run_all(&sources, &transcript);

        match self.output {
            OutputFormat::Json => Self::output_json(&reports, &transcript)?,
            OutputFormat::Table => {
                if self.quiet {
                    Self::output_quiet(&reports);
                } else {
                    Self::output_table(&reports, &transcript);
                }
            }
        }

        // Exit with a non-zero code when requirements are outstanding.
        let issues: usize = reports.iter().map(SourceReport::issue_count).sum();
        if issues > 0 {
            process::exit(2);
        }

        Ok(())
    }

    fn output_table(reports: &[SourceReport], transcript: &Transcript) {
        println!(
            "Auditing {} completed courses",
            transcript.distinct_count()
        );

        for report in reports {
            println!();
            println!("--- {} ---", report.source_name());

            if report.results().is_empty() {
                println!("{}", "  (no rules)".dim());
                continue;
            }

            for result in report.results() {
                let line = match result.status() {
                    RuleStatus::CourseList { satisfied: true, .. } => {
                        format!("✓ {} (all courses taken)", result.description()).success()
                    }
                    RuleStatus::CourseList { missing, .. } => {
                        let listed: Vec<String> =
                            missing.iter().map(ToString::to_string).collect();
                        format!(
                            "✗ {} (missing: {})",
                            result.description(),
                            listed.join(", ")
                        )
                        .warning()
                    }
                    RuleStatus::Credits {
                        earned,
                        required,
                        satisfied: true,
                    } => format!(
                        "✓ {} (you have {earned} / {required})",
                        result.description()
                    )
                    .success(),
                    RuleStatus::Credits {
                        earned, required, ..
                    } => format!(
                        "✗ {} (you have {earned} / {required})",
                        result.description()
                    )
                    .warning(),
                    RuleStatus::Skipped { reason } => {
                        format!("- {} (skipped: {reason})", result.description()).dim()
                    }
                    RuleStatus::Error { message } => {
                        format!("! {} (error: {message})", result.description()).warning()
                    }
                };
                println!("  {line}");

                for fallback in result.fallbacks() {
                    println!("    {}", format!("note: {fallback}").dim());
                }
            }
        }

        println!();
        let issues: usize = reports.iter().map(SourceReport::issue_count).sum();
        if issues == 0 {
            println!("{}", "All requirements satisfied ✅".success());
        } else {
            println!("{}", format!("{issues} requirements outstanding").warning());
        }
    }

    fn output_quiet(reports: &[SourceReport]) {
        let issues: usize = reports.iter().map(SourceReport::issue_count).sum();
        let rules: usize = reports.iter().map(|report| report.results().len()).sum();
        println!("sources={} rules={rules} issues={issues}", reports.len());
    }

    fn output_json(reports: &[SourceReport], transcript: &Transcript) -> anyhow::Result<()> {
        use serde_json::json;

        let sources: Vec<_> = reports
            .iter()
            .map(|report| {
                let results: Vec<_> = report
                    .results()
                    .iter()
                    .map(|result| {
                        let status = match result.status() {
                            RuleStatus::CourseList { satisfied, missing } => json!({
                                "kind": "course_list",
                                "satisfied": satisfied,
                                "missing": missing
                                    .iter()
                                    .map(ToString::to_string)
                                    .collect::<Vec<_>>(),
                            }),
                            RuleStatus::Credits {
                                earned,
                                required,
                                satisfied,
                            } => json!({
                                "kind": "total_credits",
                                "earned": earned,
                                "required": required,
                                "satisfied": satisfied,
                            }),
                            RuleStatus::Skipped { reason } => json!({
                                "kind": "skipped",
                                "reason": reason,
                            }),
                            RuleStatus::Error { message } => json!({
                                "kind": "error",
                                "message": message,
                            }),
                        };

                        json!({
                            "description": result.description(),
                            "status": status,
                            "notes": result
                                .fallbacks()
                                .iter()
                                .map(Fallback::to_string)
                                .collect::<Vec<_>>(),
                        })
                    })
                    .collect();

                json!({
                    "source": report.source_name(),
                    "results": results,
                    "issues": report.issue_count(),
                })
            })
            .collect();

        let output = json!({
            "completed_courses": transcript.distinct_count(),
            "sources": sources,
        });

        println!("{}", serde_json::to_string_pretty(&output)?);
        Ok(())
    }
}
