//! Course-code extraction from free text.
//!
//! Scraped calendar link text ("CMPUT 174 - Introduction to the
//! Foundations of Computation") and pasted transcripts both carry course
//! mentions embedded in arbitrary prose. The extractor pulls out every
//! mention matching the subject-number pattern and canonicalizes it.

use std::{collections::BTreeSet, sync::OnceLock};

use regex::Regex;

use super::{
    course::CourseId,
    rule::{Rule, RuleSource},
};

/// One or more uppercase letters, whitespace, then exactly three digits
/// with an optional trailing letter. Matching runs over uppercased input,
/// so case in the raw text is irrelevant. Multi-word subjects are not
/// matched here; structured input goes through [`CourseId::from_str`]
/// instead.
fn pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"([A-Z]+)\s+(\d{3}[A-Z]?)\b").expect("valid regex"))
}

/// Extracts the first course mention from raw text, canonicalized.
///
/// Returns `None` when the text contains no recognizable course code. The
/// caller decides whether that is a skip or a warning.
#[must_use]
pub fn normalize(raw: &str) -> Option<CourseId> {
    extract_course_ids(raw).into_iter().next()
}

/// Extracts every course mention from raw text, in order of appearance.
///
/// Duplicates are preserved; collapse them with [`CourseSet`] when a
/// deduplicated, sorted collection is wanted.
#[must_use]
pub fn extract_course_ids(raw: &str) -> Vec<CourseId> {
    let upper = raw.to_uppercase();

    pattern()
        .captures_iter(&upper)
        .filter_map(|captures| {
            let text = format!("{} {}", &captures[1], &captures[2]);
            // The pattern guarantees the components are valid, so a parse
            // failure here would be a bug in the pattern itself.
            text.parse().ok()
        })
        .collect()
}

/// A deduplicated set of course identifiers in lexicographic order.
///
/// This is the shape the catalog scraper hands to the engine: a program's
/// required courses, collapsed by canonical form and stably sorted so that
/// reports are deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CourseSet(BTreeSet<CourseId>);

impl CourseSet {
    /// Creates an empty set.
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeSet::new())
    }

    /// Builds a set from every course mention found in raw text.
    #[must_use]
    pub fn from_text(raw: &str) -> Self {
        extract_course_ids(raw).into_iter().collect()
    }

    /// Adds a course to the set.
    ///
    /// Returns `true` if the course was not already present.
    pub fn insert(&mut self, id: CourseId) -> bool {
        self.0.insert(id)
    }

    /// Folds another set into this one.
    ///
    /// Used to stack a shared prerequisite course set (e.g. a qualifying
    /// year) into a program's own set before the rule is built.
    pub fn merge(&mut self, other: Self) {
        self.0.extend(other.0);
    }

    /// Membership test by canonical identifier.
    #[must_use]
    pub fn contains(&self, id: &CourseId) -> bool {
        self.0.contains(id)
    }

    /// Iterates the courses in lexicographic order.
    pub fn iter(&self) -> impl Iterator<Item = &CourseId> {
        self.0.iter()
    }

    /// Number of distinct courses.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Converts the set into a course-list [`Rule`] with the given
    /// description.
    #[must_use]
    pub fn into_rule(self, description: impl Into<String>) -> Rule {
        Rule::course_list(description, self.0)
    }

    /// Wraps the set in a single-rule [`RuleSource`], the shape an
    /// auto-scraped program requirement takes.
    #[must_use]
    pub fn into_source(
        self,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> RuleSource {
        RuleSource::new(name, vec![self.into_rule(description)])
    }
}

impl FromIterator<CourseId> for CourseSet {
    fn from_iter<I: IntoIterator<Item = CourseId>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for CourseSet {
    type Item = CourseId;
    type IntoIter = std::collections::btree_set::IntoIter<CourseId>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
