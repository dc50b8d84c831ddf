//! Degree progress auditing
//!
//! Requirement rules (explicit course lists, credit thresholds) are
//! evaluated against a learner's completed courses, producing a
//! per-source report.

pub mod domain;
pub use domain::{
    Catalog, Config, CourseId, CourseSet, Rule, RuleKind, RuleSource, Subject, Transcript,
};

/// Rule evaluation and report aggregation.
pub mod audit;
pub use audit::{RuleResult, RuleStatus, SourceReport};

/// Loading of rule files, transcripts, and catalogs.
pub mod storage;
