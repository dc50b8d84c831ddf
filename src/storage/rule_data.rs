//! Raw serde representation of a rule file.
//!
//! Rule files are hand-written JSON and arrive in whatever shape the
//! author managed. Conversion into domain [`Rule`]s is deliberately
//! lenient: a malformed field never fails the file, it falls back to a
//! safe default and the recovery is recorded on the rule.

use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use crate::domain::rule::{Fallback, Rule, RuleSource};

/// A whole rule file: a source name and its rules.
#[derive(Debug, Deserialize)]
pub struct RuleSourceData {
    pub name: String,
    #[serde(default)]
    pub rules: Vec<RuleData>,
}

/// One rule as written in the file.
///
/// `courses` and `required` are kept as raw JSON values so that
/// wrong-shaped fields can be recovered instead of failing
/// deserialization of the whole file.
#[derive(Debug, Deserialize)]
pub struct RuleData {
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub courses: Option<Value>,
    #[serde(default)]
    pub required: Option<Value>,
}

impl RuleSourceData {
    /// Converts the file into a domain [`RuleSource`], preserving rule
    /// order.
    #[must_use]
    pub fn into_source(self, default_required: u32) -> RuleSource {
        let name = self.name;
        let rules = self
            .rules
            .into_iter()
            .map(|rule| rule.into_rule(default_required))
            .collect();
        RuleSource::new(name, rules)
    }
}

impl RuleData {
    /// Converts one raw rule into a domain [`Rule`].
    ///
    /// Recoveries:
    /// - missing or non-list `courses` → empty list, [`Fallback::MissingCourses`]
    /// - unparseable course entries → dropped, [`Fallback::UnparsedCourse`]
    /// - missing or non-integer `required` → `default_required`,
    ///   [`Fallback::InvalidThreshold`]
    /// - missing or unrecognised `type` → an unknown rule, skipped at
    ///   evaluation time
    #[must_use]
    pub fn into_rule(self, default_required: u32) -> Rule {
        let description = self
            .description
            .unwrap_or_else(|| "Unnamed Rule".to_string());

        match self.kind.as_deref() {
            Some("COURSE_LIST") => Self::course_list(description, self.courses),
            Some("TOTAL_CREDITS") => Self::total_credits(description, self.required, default_required),
            Some(tag) => Rule::unknown(description, tag),
            None => Rule::unknown(description, "<missing>"),
        }
    }

    fn course_list(description: String, courses: Option<Value>) -> Rule {
        let Some(Value::Array(entries)) = courses else {
            return Rule::course_list(description, []).with_fallback(Fallback::MissingCourses);
        };

        let mut ids = Vec::with_capacity(entries.len());
        let mut fallbacks = Vec::new();

        for entry in entries {
            let raw = match entry {
                Value::String(s) => s,
                other => other.to_string(),
            };
            match raw.parse() {
                Ok(id) => ids.push(id),
                Err(_) => {
                    warn!(course = %raw, "dropping unrecognised course entry");
                    fallbacks.push(Fallback::UnparsedCourse(raw));
                }
            }
        }

        fallbacks
            .into_iter()
            .fold(Rule::course_list(description, ids), Rule::with_fallback)
    }

    fn total_credits(description: String, required: Option<Value>, default_required: u32) -> Rule {
        match required.as_ref().and_then(Value::as_u64).and_then(|n| u32::try_from(n).ok()) {
            Some(required) => Rule::total_credits(description, required),
            None => Rule::total_credits(description, default_required)
                .with_fallback(Fallback::InvalidThreshold),
        }
    }
}
