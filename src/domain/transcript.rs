use std::collections::BTreeSet;

use super::course::CourseId;

/// One completed course on the learner's transcript.
///
/// Only the identifier matters for evaluation; the optional metadata is
/// carried for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletedCourse {
    id: CourseId,
    title: Option<String>,
    term: Option<String>,
}

impl CompletedCourse {
    /// Creates a record with no metadata.
    #[must_use]
    pub const fn new(id: CourseId) -> Self {
        Self {
            id,
            title: None,
            term: None,
        }
    }

    /// Creates a record with optional title and term metadata.
    #[must_use]
    pub const fn with_metadata(id: CourseId, title: Option<String>, term: Option<String>) -> Self {
        Self { id, title, term }
    }

    /// The course identifier.
    #[must_use]
    pub const fn id(&self) -> &CourseId {
        &self.id
    }

    /// The course title, if recorded.
    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// The term the course was taken in, if recorded.
    #[must_use]
    pub fn term(&self) -> Option<&str> {
        self.term.as_deref()
    }
}

/// The learner's transcript: the completed-course set an audit runs
/// against.
///
/// Records are kept in input order for display; membership and credit
/// counting go through a deduplicated index keyed by canonical course
/// identifier. Built once per audit run and never mutated by the engine.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transcript {
    records: Vec<CompletedCourse>,
    index: BTreeSet<CourseId>,
}

impl Transcript {
    /// Builds a transcript from completed-course records.
    ///
    /// Duplicate course identifiers collapse in the membership index but
    /// are preserved in the record list.
    #[must_use]
    pub fn new(records: Vec<CompletedCourse>) -> Self {
        let index = records.iter().map(|record| record.id().clone()).collect();
        Self { records, index }
    }

    /// Builds a transcript from bare course identifiers.
    #[must_use]
    pub fn from_ids(ids: impl IntoIterator<Item = CourseId>) -> Self {
        Self::new(ids.into_iter().map(CompletedCourse::new).collect())
    }

    /// Whether the given course has been completed.
    #[must_use]
    pub fn contains(&self, id: &CourseId) -> bool {
        self.index.contains(id)
    }

    /// Number of distinct completed courses.
    #[must_use]
    pub fn distinct_count(&self) -> usize {
        self.index.len()
    }

    /// The completed-course records in input order.
    #[must_use]
    pub fn records(&self) -> &[CompletedCourse] {
        &self.records
    }

    /// Whether the transcript is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl FromIterator<CompletedCourse> for Transcript {
    fn from_iter<I: IntoIterator<Item = CompletedCourse>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
