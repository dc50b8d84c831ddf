//! Domain models for degree auditing.
//!
//! This module contains the core value types: course identifiers, the
//! learner's transcript, requirement rules, and the scraped catalog.

/// Course identifier types and parsing.
pub mod course;
pub use course::{CourseId, CourseNumber, Error as CourseError, Subject};

/// Course-code extraction from free text.
pub mod extract;
pub use extract::{CourseSet, extract_course_ids, normalize};

/// Requirement rules and rule sources.
pub mod rule;
pub use rule::{CREDITS_PER_COURSE, DEFAULT_REQUIRED_CREDITS, Fallback, Rule, RuleKind, RuleSource};

/// The completed-course set.
pub mod transcript;
pub use transcript::{CompletedCourse, Transcript};

/// The scraped faculty/program catalog.
pub mod catalog;
pub use catalog::{Catalog, Faculty, Program};

mod config;
pub use config::Config;
