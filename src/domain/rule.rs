use std::{collections::BTreeSet, fmt};

use super::course::CourseId;

/// Credits awarded per completed course.
///
/// The calendar data carries no per-course credit weights, so every
/// completed course counts as exactly three credit units. This is a known
/// simplification; it is deliberately a named constant rather than
/// something configurable.
pub const CREDITS_PER_COURSE: u32 = 3;

/// Credit threshold assumed when a total-credits rule omits or mangles its
/// `required` field.
pub const DEFAULT_REQUIRED_CREDITS: u32 = 120;

/// One declarative requirement an audit checks.
///
/// Rules are immutable once loaded. Malformed fields encountered while
/// loading are recovered with safe defaults and recorded as [`Fallback`]
/// annotations so the report can note them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    description: String,
    kind: RuleKind,
    fallbacks: Vec<Fallback>,
}

/// The closed set of rule kinds.
///
/// Evaluation matches exhaustively on this enum, so adding a kind is a
/// compile-time-checked extension rather than a silent else branch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleKind {
    /// A set of required courses, all of which must be completed.
    ///
    /// Stored deduplicated in lexicographic order; that order is the
    /// stable order missing courses are reported in.
    CourseList { courses: Vec<CourseId> },

    /// A minimum aggregate credit threshold.
    TotalCredits { required: u32 },

    /// A rule kind this engine does not understand. Carried through so the
    /// report can show it was skipped rather than silently dropped.
    Unknown { tag: String },
}

/// A recovery applied while loading a malformed rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fallback {
    /// The `courses` field was missing or not a list; an empty list was
    /// substituted.
    MissingCourses,

    /// A `courses` entry did not parse as a course identifier and was
    /// dropped.
    UnparsedCourse(String),

    /// The `required` field was missing or not an integer; the default
    /// threshold was substituted.
    InvalidThreshold,
}

impl fmt::Display for Fallback {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::MissingCourses => write!(f, "courses missing or malformed, treated as empty"),
            Self::UnparsedCourse(raw) => write!(f, "unrecognised course '{raw}' dropped"),
            Self::InvalidThreshold => write!(
                f,
                "required credits missing or malformed, defaulted to {DEFAULT_REQUIRED_CREDITS}"
            ),
        }
    }
}

impl Rule {
    /// Creates a course-list rule.
    ///
    /// The courses are deduplicated and stored in lexicographic order.
    #[must_use]
    pub fn course_list(
        description: impl Into<String>,
        courses: impl IntoIterator<Item = CourseId>,
    ) -> Self {
        let deduplicated: BTreeSet<CourseId> = courses.into_iter().collect();
        Self {
            description: description.into(),
            kind: RuleKind::CourseList {
                courses: deduplicated.into_iter().collect(),
            },
            fallbacks: Vec::new(),
        }
    }

    /// Creates a total-credits rule with the given threshold.
    #[must_use]
    pub fn total_credits(description: impl Into<String>, required: u32) -> Self {
        Self {
            description: description.into(),
            kind: RuleKind::TotalCredits { required },
            fallbacks: Vec::new(),
        }
    }

    /// Creates a rule of an unrecognised kind.
    #[must_use]
    pub fn unknown(description: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            kind: RuleKind::Unknown { tag: tag.into() },
            fallbacks: Vec::new(),
        }
    }

    /// Attaches a fallback annotation to the rule.
    #[must_use]
    pub fn with_fallback(mut self, fallback: Fallback) -> Self {
        self.fallbacks.push(fallback);
        self
    }

    /// The human-readable description of the rule.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// The rule's kind and payload.
    #[must_use]
    pub const fn kind(&self) -> &RuleKind {
        &self.kind
    }

    /// Fallbacks applied while this rule was loaded.
    #[must_use]
    pub fn fallbacks(&self) -> &[Fallback] {
        &self.fallbacks
    }
}

/// A named, ordered bundle of rules evaluated together but reported
/// per-source.
///
/// Multiple sources may be supplied for one audit run (one generic source
/// plus one per scraped program); they are evaluated independently with no
/// cross-source deduplication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleSource {
    name: String,
    rules: Vec<Rule>,
}

impl RuleSource {
    /// Creates a rule source from a name and its rules, preserving rule
    /// order.
    #[must_use]
    pub fn new(name: impl Into<String>, rules: Vec<Rule>) -> Self {
        Self {
            name: name.into(),
            rules,
        }
    }

    /// Creates a source with no rules, used when a rule file is missing
    /// but the audit should proceed.
    #[must_use]
    pub fn empty(name: impl Into<String>) -> Self {
        Self::new(name, Vec::new())
    }

    /// The source's display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The rules in stored order.
    #[must_use]
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> CourseId {
        s.parse().unwrap()
    }

    #[test]
    fn course_list_deduplicates_and_sorts() {
        let rule = Rule::course_list(
            "Core courses",
            vec![id("STAT 151"), id("CMPUT 174"), id("CMPUT 174")],
        );

        let RuleKind::CourseList { courses } = rule.kind() else {
            panic!("expected course list");
        };
        let rendered: Vec<String> = courses.iter().map(ToString::to_string).collect();
        assert_eq!(rendered, ["CMPUT 174", "STAT 151"]);
    }

    #[test]
    fn fallbacks_accumulate() {
        let rule = Rule::course_list("Core", [])
            .with_fallback(Fallback::MissingCourses)
            .with_fallback(Fallback::UnparsedCourse("???".to_string()));
        assert_eq!(rule.fallbacks().len(), 2);
    }

    #[test]
    fn empty_source_has_no_rules() {
        let source = RuleSource::empty("Manual Rules (Missing)");
        assert_eq!(source.name(), "Manual Rules (Missing)");
        assert!(source.rules().is_empty());
    }

    #[test]
    fn fallback_messages_are_descriptive() {
        assert_eq!(
            Fallback::InvalidThreshold.to_string(),
            "required credits missing or malformed, defaulted to 120"
        );
    }
}
