//! Loading of rule files, transcripts, and catalogs from disk.
//!
//! All inputs are JSON. The lenient per-field recovery for rule files
//! lives in [`rule_data`]; this module handles the file-level concerns:
//! reading, parsing, directory discovery, and the missing-manual-rules
//! fallback.

/// Raw serde representation of rule files.
pub mod rule_data;

/// Raw serde representation of transcript files.
pub mod transcript_data;

use std::{
    io,
    path::{Path, PathBuf},
};

use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::domain::{Catalog, RuleSource, Transcript};

use rule_data::RuleSourceData;
use transcript_data::TranscriptData;

/// Errors that can occur while loading an input file.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The file could not be read.
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The file is not valid JSON of the expected shape.
    #[error("Failed to parse {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

fn read(path: &Path) -> Result<String, LoadError> {
    std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn parse<T: serde::de::DeserializeOwned>(path: &Path, content: &str) -> Result<T, LoadError> {
    serde_json::from_str(content).map_err(|source| LoadError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Loads one rule file as a [`RuleSource`].
///
/// Field-level recovery (malformed courses, thresholds) happens inside
/// the conversion; only an unreadable file or invalid JSON is an error.
///
/// # Errors
///
/// Returns [`LoadError`] if the file cannot be read or parsed.
pub fn load_rule_source(path: &Path, default_required: u32) -> Result<RuleSource, LoadError> {
    let content = read(path)?;
    let data: RuleSourceData = parse(path, &content)?;
    debug!(path = %path.display(), rules = data.rules.len(), "loaded rule file");
    Ok(data.into_source(default_required))
}

/// Loads one rule file, substituting an empty source if it is missing or
/// unreadable.
///
/// A missing manual rule file is not fatal to an audit; general rules
/// (like total credits) are simply skipped, and the report still names
/// the source so the gap is visible.
#[must_use]
pub fn load_rule_source_or_empty(path: &Path, default_required: u32) -> RuleSource {
    match load_rule_source(path, default_required) {
        Ok(source) => source,
        Err(error) => {
            warn!(%error, "missing or unreadable rule file, continuing without it");
            let stem = path
                .file_stem()
                .map_or_else(|| "rules".to_string(), |s| s.to_string_lossy().into_owned());
            RuleSource::empty(format!("{stem} (Missing)"))
        }
    }
}

/// Loads every `*.json` rule file under a directory, one [`RuleSource`]
/// per file, in sorted path order.
///
/// # Errors
///
/// Returns [`LoadError`] if any discovered file cannot be read or parsed.
pub fn load_rules_dir(dir: &Path, default_required: u32) -> Result<Vec<RuleSource>, LoadError> {
    let mut paths: Vec<PathBuf> = WalkDir::new(dir)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| {
            entry.file_type().is_file()
                && entry.path().extension().is_some_and(|ext| ext == "json")
        })
        .map(|entry| entry.into_path())
        .collect();
    paths.sort();

    paths
        .iter()
        .map(|path| load_rule_source(path, default_required))
        .collect()
}

/// Loads the learner's transcript.
///
/// # Errors
///
/// Returns [`LoadError`] if the file cannot be read or parsed.
/// Individual unrecognisable entries are skipped, not fatal.
pub fn load_transcript(path: &Path) -> Result<Transcript, LoadError> {
    let content = read(path)?;
    let data: TranscriptData = parse(path, &content)?;
    Ok(data.into_transcript())
}

/// Loads a scraped catalog file.
///
/// # Errors
///
/// Returns [`LoadError`] if the file cannot be read or parsed.
pub fn load_catalog(path: &Path) -> Result<Catalog, LoadError> {
    let content = read(path)?;
    parse(path, &content)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use crate::domain::rule::DEFAULT_REQUIRED_CREDITS;

    #[test]
    fn load_rule_source_reads_valid_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("common.json");
        fs::write(
            &path,
            r#"{"name": "Common", "rules": [{"description": "Credits", "type": "TOTAL_CREDITS", "required": 120}]}"#,
        )
        .unwrap();

        let source = load_rule_source(&path, DEFAULT_REQUIRED_CREDITS).unwrap();

        assert_eq!(source.name(), "Common");
        assert_eq!(source.rules().len(), 1);
    }

    #[test]
    fn load_rule_source_invalid_json_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("broken.json");
        fs::write(&path, "{not json").unwrap();

        assert!(matches!(
            load_rule_source(&path, DEFAULT_REQUIRED_CREDITS),
            Err(LoadError::Json { .. })
        ));
    }

    #[test]
    fn missing_rule_file_substitutes_empty_source() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("common.json");

        let source = load_rule_source_or_empty(&path, DEFAULT_REQUIRED_CREDITS);

        assert_eq!(source.name(), "common (Missing)");
        assert!(source.rules().is_empty());
    }

    #[test]
    fn rules_dir_loads_files_in_sorted_order() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join("b.json"), r#"{"name": "B", "rules": []}"#).unwrap();
        fs::write(tmp.path().join("a.json"), r#"{"name": "A", "rules": []}"#).unwrap();
        fs::write(tmp.path().join("notes.txt"), "not a rule file").unwrap();

        let sources = load_rules_dir(tmp.path(), DEFAULT_REQUIRED_CREDITS).unwrap();

        let names: Vec<&str> = sources.iter().map(RuleSource::name).collect();
        assert_eq!(names, ["A", "B"]);
    }

    #[test]
    fn load_transcript_reads_valid_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("my_courses.json");
        fs::write(
            &path,
            r#"{"courses": [{"subject": "CMPUT", "number": "174"}]}"#,
        )
        .unwrap();

        let transcript = load_transcript(&path).unwrap();

        assert_eq!(transcript.distinct_count(), 1);
    }

    #[test]
    fn load_transcript_missing_file_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let missing = tmp.path().join("missing.json");

        assert!(matches!(
            load_transcript(&missing),
            Err(LoadError::Io { .. })
        ));
    }

    #[test]
    fn load_catalog_round_trips() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("catalog.json");
        fs::write(
            &path,
            r#"{"faculties": [{"name": "Science", "programs": [
                {"name": "BSc Computing Science", "source_url": "https://example/p", "courses": ["CMPUT 174"]}
            ]}]}"#,
        )
        .unwrap();

        let catalog = load_catalog(&path).unwrap();

        assert_eq!(catalog.faculties().len(), 1);
        assert_eq!(
            catalog.faculties()[0].programs()[0].course_set().len(),
            1
        );
    }
}
