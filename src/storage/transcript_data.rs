//! Raw serde representation of the learner's transcript file.
//!
//! The on-disk shape is `{ "courses": [ { "subject", "number", ... } ] }`.
//! Canonicalization of the `"{subject} {number}"` string is done here via
//! the domain parser; the file format itself makes no normalization
//! promises (numbers may even be written as JSON integers).

use serde::Deserialize;
use tracing::warn;

use crate::domain::{CompletedCourse, Transcript};

/// The whole transcript file.
#[derive(Debug, Deserialize)]
pub struct TranscriptData {
    pub courses: Vec<CourseRecordData>,
}

/// One completed-course entry as written in the file.
#[derive(Debug, Deserialize)]
pub struct CourseRecordData {
    pub subject: String,
    pub number: NumberField,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub term: Option<String>,
}

/// Catalog numbers appear both as strings ("174") and as bare integers
/// (174) in the wild.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum NumberField {
    Text(String),
    Integer(u64),
}

impl NumberField {
    fn into_string(self) -> String {
        match self {
            Self::Text(s) => s,
            Self::Integer(n) => n.to_string(),
        }
    }
}

impl TranscriptData {
    /// Converts the file into a domain [`Transcript`].
    ///
    /// Entries whose subject/number pair does not canonicalize are
    /// skipped with a warning rather than failing the load; the rest of
    /// the transcript is still usable ground truth.
    #[must_use]
    pub fn into_transcript(self) -> Transcript {
        self.courses
            .into_iter()
            .filter_map(|record| {
                let raw = format!("{} {}", record.subject, record.number.into_string());
                match raw.parse() {
                    Ok(id) => Some(CompletedCourse::with_metadata(id, record.title, record.term)),
                    Err(error) => {
                        warn!(%raw, %error, "skipping unrecognised transcript entry");
                        None
                    }
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> TranscriptData {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn records_canonicalize_on_load() {
        let data = parse(
            r#"{"courses": [
                {"subject": "cmput", "number": "174"},
                {"subject": "STAT", "number": 151}
            ]}"#,
        );

        let transcript = data.into_transcript();

        assert_eq!(transcript.distinct_count(), 2);
        assert_eq!(transcript.records()[0].id().to_string(), "CMPUT 174");
        assert_eq!(transcript.records()[1].id().to_string(), "STAT 151");
    }

    #[test]
    fn metadata_is_carried_through() {
        let data = parse(
            r#"{"courses": [{
                "subject": "CMPUT",
                "number": "174",
                "title": "Intro",
                "term": "Fall 2023"
            }]}"#,
        );

        let transcript = data.into_transcript();

        assert_eq!(transcript.records()[0].title(), Some("Intro"));
        assert_eq!(transcript.records()[0].term(), Some("Fall 2023"));
    }

    #[test]
    fn unrecognised_entries_are_skipped() {
        let data = parse(
            r#"{"courses": [
                {"subject": "CMPUT", "number": "174"},
                {"subject": "???", "number": "abc"}
            ]}"#,
        );

        let transcript = data.into_transcript();

        assert_eq!(transcript.distinct_count(), 1);
    }
}
