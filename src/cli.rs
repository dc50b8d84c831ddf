use std::path::{Path, PathBuf};

mod audit;
mod parse;
mod summary;
mod terminal;

use anyhow::{Context, bail};
use audit::Audit;
use auditor::{Catalog, Config, CourseSet, RuleSource, storage};
use clap::ArgAction;
use parse::Parse;
use summary::Summary;
use tracing::{debug, info};

#[derive(Debug, clap::Parser)]
#[command(version, about)]
pub struct Cli {
    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to the configuration file
    #[arg(short, long, default_value = "audit.toml", global = true)]
    config: PathBuf,

    #[command(subcommand)]
    command: Option<Command>,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        Self::setup_logging(self.verbose);

        let config = if self.config.exists() {
            Config::load(&self.config).map_err(anyhow::Error::msg)?
        } else {
            Config::default()
        };

        self.command
            .unwrap_or_else(|| Command::Audit(Audit::default()))
            .run(&config)
    }

    fn setup_logging(verbosity: u8) {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let level = match verbosity {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        };

        let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());

        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_thread_names(false)
            .with_line_number(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

#[derive(Debug, clap::Parser)]
pub enum Command {
    /// Audit a transcript against all rule sources (default)
    Audit(Audit),

    /// List the required courses in all rule sources
    Summary(Summary),

    /// Extract course codes from a free-text transcript
    Parse(Parse),
}

impl Command {
    fn run(self, config: &Config) -> anyhow::Result<()> {
        match self {
            Self::Audit(audit) => audit.run(config),
            Self::Summary(summary) => summary.run(config),
            Self::Parse(parse) => parse.run(),
        }
    }
}

/// Where the rule sources for a run come from: manual rule files, a rules
/// directory, and optionally one program out of a scraped catalog.
#[derive(Debug, Default, clap::Args)]
pub struct SourceArgs {
    /// Manual rule file (can be specified multiple times)
    #[arg(long = "rules", value_name = "FILE")]
    rule_files: Vec<PathBuf>,

    /// Directory of rule files, overriding the configured one
    #[arg(long, value_name = "DIR")]
    rules_dir: Option<PathBuf>,

    /// Scraped catalog file to take a program's requirements from
    #[arg(long, value_name = "FILE")]
    catalog: Option<PathBuf>,

    /// Faculty name within the catalog (prompted for if omitted)
    #[arg(long, value_name = "NAME", requires = "catalog")]
    faculty: Option<String>,

    /// Program name within the faculty (prompted for if omitted)
    #[arg(long, value_name = "NAME", requires = "catalog")]
    program: Option<String>,
}

impl SourceArgs {
    /// Assembles the rule sources in reporting order: manual files first,
    /// then the scraped program, matching the original audit stacking.
    fn collect(&self, config: &Config) -> anyhow::Result<Vec<RuleSource>> {
        let default_required = config.default_required_credits();
        let mut sources = Vec::new();

        if self.rule_files.is_empty() {
            let dir = self.rules_dir.as_deref().unwrap_or(&config.rules_dir);
            if dir.is_dir() {
                sources.extend(storage::load_rules_dir(dir, default_required)?);
            } else {
                debug!(dir = %dir.display(), "no rules directory, skipping manual rules");
            }
        } else {
            for path in &self.rule_files {
                sources.push(storage::load_rule_source_or_empty(path, default_required));
            }
        }

        if let Some(catalog_path) = &self.catalog {
            let catalog = storage::load_catalog(catalog_path)?;
            sources.push(self.scraped_source(&catalog)?);
        }

        Ok(sources)
    }

    /// Builds the auto-scraped rule source for the selected program.
    fn scraped_source(&self, catalog: &Catalog) -> anyhow::Result<RuleSource> {
        let faculty = match &self.faculty {
            Some(name) => catalog
                .faculty(name)
                .with_context(|| format!("faculty '{name}' not found in catalog"))?,
            None => {
                let names: Vec<&str> = catalog.faculties().iter().map(|f| f.name()).collect();
                &catalog.faculties()[select("Please select your faculty", &names)?]
            }
        };

        let program = match &self.program {
            Some(name) => faculty
                .program(name)
                .with_context(|| format!("program '{name}' not found in faculty"))?,
            None => {
                let names: Vec<&str> = faculty.programs().iter().map(|p| p.name()).collect();
                &faculty.programs()[select("Please select your program", &names)?]
            }
        };

        let mut courses = program.course_set();

        // Engineering programs share a common first year; stack the
        // qualifying-year requirements onto the program's own.
        if faculty.name().contains("Faculty of Engineering")
            && !program.name().contains("Qualifying Year")
        {
            match faculty.program_containing("Qualifying Year") {
                Some(qualifying) => {
                    info!(program = %qualifying.name(), "adding common first-year requirements");
                    courses.merge(qualifying.course_set());
                }
                None => {
                    tracing::warn!("could not find a qualifying year to stack common rules from");
                }
            }
        }

        Ok(courses.into_source(
            format!("{} (Auto-Scraped)", program.name()),
            "Auto-Scraped Required Courses (from calendar)",
        ))
    }
}

fn select(prompt: &str, items: &[&str]) -> anyhow::Result<usize> {
    if !terminal::is_interactive() {
        bail!("{prompt}: no terminal to prompt on; pass --faculty/--program instead");
    }

    Ok(dialoguer::Select::new()
        .with_prompt(prompt)
        .items(items)
        .default(0)
        .interact()?)
}

/// Parses a free-text file into a deduplicated, sorted course set.
fn course_set_from_file(path: &Path) -> anyhow::Result<CourseSet> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(CourseSet::from_text(&text))
}
