//! The academic-calendar catalog as supplied by the scraper collaborator.
//!
//! Scraping itself (page fetching, menu parsing) lives outside this crate;
//! the scraper's output is a [`Catalog`] value, typically serialized as
//! JSON. Course codes inside a program arrive as raw scraped strings and
//! are canonicalized here on the way into a [`CourseSet`].

use serde::{Deserialize, Serialize};

use super::extract::{CourseSet, normalize};

/// The full faculty/program menu scraped from the calendar.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    faculties: Vec<Faculty>,
}

/// A faculty and its degree programs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Faculty {
    name: String,
    programs: Vec<Program>,
}

/// A degree program: its calendar page plus any pre-scraped course codes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Program {
    name: String,
    source_url: String,
    #[serde(default)]
    courses: Vec<String>,
}

impl Catalog {
    /// Creates a catalog from its faculties.
    #[must_use]
    pub fn new(faculties: Vec<Faculty>) -> Self {
        Self { faculties }
    }

    /// The faculties in scraped order.
    #[must_use]
    pub fn faculties(&self) -> &[Faculty] {
        &self.faculties
    }

    /// Looks up a faculty by exact name.
    #[must_use]
    pub fn faculty(&self, name: &str) -> Option<&Faculty> {
        self.faculties.iter().find(|faculty| faculty.name == name)
    }
}

impl Faculty {
    /// Creates a faculty from its name and programs.
    #[must_use]
    pub fn new(name: impl Into<String>, programs: Vec<Program>) -> Self {
        Self {
            name: name.into(),
            programs,
        }
    }

    /// The faculty's display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The programs in scraped order.
    #[must_use]
    pub fn programs(&self) -> &[Program] {
        &self.programs
    }

    /// Looks up a program by exact name.
    #[must_use]
    pub fn program(&self, name: &str) -> Option<&Program> {
        self.programs.iter().find(|program| program.name == name)
    }

    /// Finds the first program whose name contains the given fragment.
    ///
    /// Used to locate shared prerequisite programs such as an engineering
    /// qualifying year without hard-coding calendar URLs.
    #[must_use]
    pub fn program_containing(&self, fragment: &str) -> Option<&Program> {
        self.programs
            .iter()
            .find(|program| program.name.contains(fragment))
    }
}

impl Program {
    /// Creates a program from its name, calendar URL, and raw scraped
    /// course strings.
    #[must_use]
    pub fn new(name: impl Into<String>, source_url: impl Into<String>, courses: Vec<String>) -> Self {
        Self {
            name: name.into(),
            source_url: source_url.into(),
            courses,
        }
    }

    /// The program's display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The calendar page the program was scraped from.
    #[must_use]
    pub fn source_url(&self) -> &str {
        &self.source_url
    }

    /// The raw scraped course strings, as found on the page.
    #[must_use]
    pub fn raw_courses(&self) -> &[String] {
        &self.courses
    }

    /// Canonicalizes the scraped course strings into a deduplicated,
    /// sorted set.
    ///
    /// Entries with no recognizable course code are dropped; scraped link
    /// text is noisy and the menu parser does not pre-filter it.
    #[must_use]
    pub fn course_set(&self) -> CourseSet {
        self.courses
            .iter()
            .filter_map(|raw| normalize(raw))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Catalog {
        Catalog::new(vec![Faculty::new(
            "Faculty of Engineering",
            vec![
                Program::new(
                    "BSc in Computer Engineering",
                    "https://calendar.example/preview_program.php?poid=1",
                    vec![
                        "CMPE 300 - Digital Systems".to_string(),
                        "ECE 210 - Circuits".to_string(),
                        "cmpe 300".to_string(),
                        "Elective block".to_string(),
                    ],
                ),
                Program::new(
                    "BSc in Engineering - Qualifying Year",
                    "https://calendar.example/preview_program.php?poid=2",
                    vec!["MATH 100".to_string(), "ENGG 130".to_string()],
                ),
            ],
        )])
    }

    #[test]
    fn lookup_by_name() {
        let catalog = sample();
        let faculty = catalog.faculty("Faculty of Engineering").unwrap();
        assert!(faculty.program("BSc in Computer Engineering").is_some());
        assert!(faculty.program("BSc in Basket Weaving").is_none());
        assert!(catalog.faculty("Faculty of Arts").is_none());
    }

    #[test]
    fn program_containing_finds_qualifying_year() {
        let catalog = sample();
        let faculty = catalog.faculty("Faculty of Engineering").unwrap();
        let program = faculty.program_containing("Qualifying Year").unwrap();
        assert_eq!(program.name(), "BSc in Engineering - Qualifying Year");
    }

    #[test]
    fn course_set_drops_noise_and_deduplicates() {
        let catalog = sample();
        let program = catalog
            .faculty("Faculty of Engineering")
            .unwrap()
            .program("BSc in Computer Engineering")
            .unwrap();

        let rendered: Vec<String> = program.course_set().iter().map(ToString::to_string).collect();
        assert_eq!(rendered, ["CMPE 300", "ECE 210"]);
    }

    #[test]
    fn catalog_round_trips_through_json() {
        let catalog = sample();
        let json = serde_json::to_string(&catalog).unwrap();
        let parsed: Catalog = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, catalog);
    }
}
