//! The audit engine.
//!
//! Evaluation is a pure function of a rule and the transcript: no I/O, no
//! shared state, no partial results. A rule that cannot be evaluated
//! still produces a result ([`RuleStatus::Skipped`] or
//! [`RuleStatus::Error`]) so the report never silently drops a rule, and
//! one bad rule never aborts the rest of its source or the run.

use rayon::prelude::*;

use crate::domain::{
    CourseId, Transcript,
    rule::{CREDITS_PER_COURSE, Fallback, Rule, RuleKind, RuleSource},
};

/// The outcome of evaluating a single rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleStatus {
    /// A course-list rule: satisfied iff no required course is missing.
    ///
    /// Missing courses are listed in the rule's stable sorted order.
    CourseList {
        satisfied: bool,
        missing: Vec<CourseId>,
    },

    /// A total-credits rule: earned versus required credit units.
    Credits {
        earned: u32,
        required: u32,
        satisfied: bool,
    },

    /// The rule kind is not understood; nothing was evaluated.
    Skipped { reason: String },

    /// Evaluation failed for this rule alone.
    Error { message: String },
}

impl RuleStatus {
    /// Whether the rule is definitively satisfied.
    ///
    /// Skipped and errored rules are neither satisfied nor unsatisfied.
    #[must_use]
    pub const fn satisfied(&self) -> Option<bool> {
        match self {
            Self::CourseList { satisfied, .. } | Self::Credits { satisfied, .. } => {
                Some(*satisfied)
            }
            Self::Skipped { .. } | Self::Error { .. } => None,
        }
    }
}

/// The result of evaluating one rule: its description, outcome, and any
/// fallbacks that were applied when the rule was loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleResult {
    description: String,
    status: RuleStatus,
    fallbacks: Vec<Fallback>,
}

impl RuleResult {
    /// The description of the rule this result belongs to.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// The evaluation outcome.
    #[must_use]
    pub const fn status(&self) -> &RuleStatus {
        &self.status
    }

    /// Fallbacks applied while the rule was loaded, echoed into the
    /// result so the report can note them.
    #[must_use]
    pub fn fallbacks(&self) -> &[Fallback] {
        &self.fallbacks
    }
}

/// The report for one rule source: one result per rule, in rule order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceReport {
    source_name: String,
    results: Vec<RuleResult>,
}

impl SourceReport {
    /// The name of the rule source this report covers.
    #[must_use]
    pub fn source_name(&self) -> &str {
        &self.source_name
    }

    /// The rule results in the source's rule order.
    #[must_use]
    pub fn results(&self) -> &[RuleResult] {
        &self.results
    }

    /// Number of rules that evaluated as unsatisfied or errored.
    ///
    /// Skipped rules do not count against the source.
    #[must_use]
    pub fn issue_count(&self) -> usize {
        self.results
            .iter()
            .filter(|result| match result.status() {
                RuleStatus::Error { .. } => true,
                status => status.satisfied() == Some(false),
            })
            .count()
    }
}

/// Evaluates a single rule against the transcript.
pub fn evaluate(rule: &Rule, completed: &Transcript) -> RuleResult {
    let status = match rule.kind() {
        RuleKind::CourseList { courses } => {
            let missing: Vec<CourseId> = courses
                .iter()
                .filter(|course| !completed.contains(course))
                .cloned()
                .collect();
            RuleStatus::CourseList {
                satisfied: missing.is_empty(),
                missing,
            }
        }
        RuleKind::TotalCredits { required } => evaluate_credits(*required, completed),
        RuleKind::Unknown { tag } => RuleStatus::Skipped {
            reason: format!("unknown rule type '{tag}'"),
        },
    };

    RuleResult {
        description: rule.description().to_string(),
        status,
        fallbacks: rule.fallbacks().to_vec(),
    }
}

fn evaluate_credits(required: u32, completed: &Transcript) -> RuleStatus {
    // Duplicate transcript entries collapse before counting, so retaking a
    // course does not earn credit twice.
    let distinct = completed.distinct_count();

    match u32::try_from(distinct)
        .ok()
        .and_then(|count| count.checked_mul(CREDITS_PER_COURSE))
    {
        Some(earned) => RuleStatus::Credits {
            earned,
            required,
            satisfied: earned >= required,
        },
        None => RuleStatus::Error {
            message: format!("credit total overflow for {distinct} completed courses"),
        },
    }
}

/// Evaluates every rule in a source, preserving rule order.
pub fn run_audit(source: &RuleSource, completed: &Transcript) -> SourceReport {
    SourceReport {
        source_name: source.name().to_string(),
        results: source
            .rules()
            .iter()
            .map(|rule| evaluate(rule, completed))
            .collect(),
    }
}

/// Evaluates every source, producing one report per source in input order.
///
/// Sources are evaluated in parallel; this is safe because rules and the
/// transcript are read-only for the duration of the audit and results are
/// collected by source position.
pub fn run_all(sources: &[RuleSource], completed: &Transcript) -> Vec<SourceReport> {
    sources
        .par_iter()
        .map(|source| run_audit(source, completed))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::rule::DEFAULT_REQUIRED_CREDITS;

    fn id(s: &str) -> CourseId {
        s.parse().unwrap()
    }

    fn transcript(courses: &[&str]) -> Transcript {
        Transcript::from_ids(courses.iter().map(|s| id(s)))
    }

    #[test]
    fn course_list_reports_missing_courses() {
        let rule = Rule::course_list("Core courses", vec![id("CMPUT 174"), id("CMPUT 175")]);
        let completed = transcript(&["CMPUT 174"]);

        let result = evaluate(&rule, &completed);

        assert_eq!(
            result.status(),
            &RuleStatus::CourseList {
                satisfied: false,
                missing: vec![id("CMPUT 175")],
            }
        );
    }

    #[test]
    fn course_list_satisfied_when_all_taken() {
        let rule = Rule::course_list("Core courses", vec![id("CMPUT 174"), id("CMPUT 175")]);
        let completed = transcript(&["CMPUT 175", "CMPUT 174", "STAT 151"]);

        let result = evaluate(&rule, &completed);

        assert_eq!(
            result.status(),
            &RuleStatus::CourseList {
                satisfied: true,
                missing: Vec::new(),
            }
        );
    }

    #[test]
    fn empty_course_list_is_vacuously_satisfied() {
        let rule = Rule::course_list("No requirements", Vec::new());

        for completed in [transcript(&[]), transcript(&["CMPUT 174"])] {
            let result = evaluate(&rule, &completed);
            assert_eq!(result.status().satisfied(), Some(true));
        }
    }

    #[test]
    fn missing_courses_keep_stable_sorted_order() {
        let rule = Rule::course_list(
            "Core courses",
            vec![id("STAT 151"), id("CMPUT 174"), id("MATH 125")],
        );
        let completed = transcript(&[]);

        let result = evaluate(&rule, &completed);

        let RuleStatus::CourseList { missing, .. } = result.status() else {
            panic!("expected course list status");
        };
        let rendered: Vec<String> = missing.iter().map(ToString::to_string).collect();
        assert_eq!(rendered, ["CMPUT 174", "MATH 125", "STAT 151"]);
    }

    #[test]
    fn credits_boundary_exactly_meets_threshold() {
        let rule = Rule::total_credits("Minimum credits", 90);
        let courses: Vec<String> = (100..130).map(|n| format!("CMPUT {n}")).collect();
        let completed = Transcript::from_ids(courses.iter().map(|s| id(s)));
        assert_eq!(completed.distinct_count(), 30);

        let result = evaluate(&rule, &completed);

        assert_eq!(
            result.status(),
            &RuleStatus::Credits {
                earned: 90,
                required: 90,
                satisfied: true,
            }
        );
    }

    #[test]
    fn credits_one_course_short_fails() {
        let rule = Rule::total_credits("Minimum credits", 90);
        let courses: Vec<String> = (100..129).map(|n| format!("CMPUT {n}")).collect();
        let completed = Transcript::from_ids(courses.iter().map(|s| id(s)));

        let result = evaluate(&rule, &completed);

        assert_eq!(
            result.status(),
            &RuleStatus::Credits {
                earned: 87,
                required: 90,
                satisfied: false,
            }
        );
    }

    #[test]
    fn retaken_courses_earn_credit_once() {
        let rule = Rule::total_credits("Minimum credits", 6);
        let completed = transcript(&["CMPUT 174", "CMPUT 174", "STAT 151"]);

        let result = evaluate(&rule, &completed);

        assert_eq!(
            result.status(),
            &RuleStatus::Credits {
                earned: 6,
                required: 6,
                satisfied: true,
            }
        );
    }

    #[test]
    fn unknown_rule_type_is_skipped_not_failed() {
        let rule = Rule::unknown("Mystery requirement", "FOO");
        let completed = transcript(&["CMPUT 174"]);

        let result = evaluate(&rule, &completed);

        assert_eq!(
            result.status(),
            &RuleStatus::Skipped {
                reason: "unknown rule type 'FOO'".to_string(),
            }
        );
        assert_eq!(result.status().satisfied(), None);
    }

    #[test]
    fn skipped_rules_do_not_count_as_issues() {
        let source = RuleSource::new(
            "Mixed",
            vec![
                Rule::unknown("Mystery", "FOO"),
                Rule::course_list("Core", vec![id("CMPUT 174")]),
            ],
        );
        let report = run_audit(&source, &transcript(&["CMPUT 174"]));

        assert_eq!(report.issue_count(), 0);
    }

    #[test]
    fn fallbacks_are_echoed_into_the_result() {
        let rule =
            Rule::total_credits("Minimum credits", DEFAULT_REQUIRED_CREDITS)
                .with_fallback(Fallback::InvalidThreshold);

        let result = evaluate(&rule, &transcript(&[]));

        assert_eq!(result.fallbacks(), &[Fallback::InvalidThreshold]);
    }

    #[test]
    fn reports_preserve_source_and_rule_order() {
        let sources = vec![
            RuleSource::new(
                "Common Requirements",
                vec![
                    Rule::total_credits("Minimum credits", 120),
                    Rule::course_list("Writing requirement", vec![id("WRS 101")]),
                ],
            ),
            RuleSource::new(
                "BSc Computing Science (Auto-Scraped)",
                vec![Rule::course_list("Required courses", vec![id("CMPUT 174")])],
            ),
            RuleSource::empty("Manual Rules (Missing)"),
        ];
        let completed = transcript(&["CMPUT 174"]);

        let reports = run_all(&sources, &completed);

        assert_eq!(reports.len(), 3);
        assert_eq!(reports[0].source_name(), "Common Requirements");
        assert_eq!(reports[1].source_name(), "BSc Computing Science (Auto-Scraped)");
        assert_eq!(reports[2].source_name(), "Manual Rules (Missing)");

        assert_eq!(reports[0].results().len(), 2);
        assert_eq!(reports[0].results()[0].description(), "Minimum credits");
        assert_eq!(reports[0].results()[1].description(), "Writing requirement");
        assert!(reports[2].results().is_empty());
    }

    #[test]
    fn duplicate_requirements_across_sources_are_reported_independently() {
        let rule = || Rule::course_list("Core", vec![id("CMPUT 174")]);
        let sources = vec![
            RuleSource::new("A", vec![rule()]),
            RuleSource::new("B", vec![rule()]),
        ];

        let reports = run_all(&sources, &transcript(&[]));

        for report in &reports {
            assert_eq!(report.results()[0].status().satisfied(), Some(false));
        }
    }
}
