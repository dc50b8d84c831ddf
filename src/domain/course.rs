use std::{fmt, ops::Deref, str::FromStr};

use non_empty_string::NonEmptyString;

/// A validated subject code: one or more uppercase alphabetic tokens
/// separated by single spaces (e.g. "CMPUT", "INT D").
///
/// Observed subjects are 2-5 letters, but the length is deliberately not
/// capped since some subjects exceed it.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Subject(NonEmptyString);

impl Subject {
    /// Creates a new `Subject` from a string.
    ///
    /// Interior whitespace is collapsed to single spaces before validation.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidSubjectError`] if the string is empty (after
    /// whitespace collapsing) or any token contains characters other than
    /// uppercase letters (A-Z).
    pub fn new(s: &str) -> Result<Self, InvalidSubjectError> {
        let tokens: Vec<&str> = s.split_whitespace().collect();

        if tokens.is_empty()
            || !tokens
                .iter()
                .all(|token| token.chars().all(|c| c.is_ascii_uppercase()))
        {
            return Err(InvalidSubjectError(s.to_string()));
        }

        let joined = tokens.join(" ");
        let non_empty =
            NonEmptyString::new(joined).map_err(|_| InvalidSubjectError(s.to_string()))?;

        Ok(Self(non_empty))
    }

    /// Returns the string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl TryFrom<&str> for Subject {
    type Error = InvalidSubjectError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl AsRef<str> for Subject {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl Deref for Subject {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        self.0.as_str()
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Subject {
    type Err = InvalidSubjectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

/// Error returned when a string is not a valid subject code.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("Invalid subject '{0}': must be non-empty uppercase letters (A-Z)")]
pub struct InvalidSubjectError(String);

/// A validated catalog number: one or more digits with an optional single
/// trailing uppercase letter (e.g. "174", "201A").
///
/// Numbers are compared as strings, so ordering is lexicographic. Observed
/// numbers are all three digits, which makes lexicographic and numeric
/// order agree.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct CourseNumber(NonEmptyString);

impl CourseNumber {
    /// Creates a new `CourseNumber` from a string.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidNumberError`] if the string is empty, has no leading
    /// digits, or has anything other than a single uppercase letter after
    /// the digits.
    pub fn new(s: &str) -> Result<Self, InvalidNumberError> {
        let digits = s.chars().take_while(char::is_ascii_digit).count();
        let rest = &s[digits..];

        let valid_suffix = match rest.len() {
            0 => true,
            1 => rest.chars().all(|c| c.is_ascii_uppercase()),
            _ => false,
        };

        if digits == 0 || !valid_suffix {
            return Err(InvalidNumberError(s.to_string()));
        }

        let non_empty =
            NonEmptyString::new(s.to_string()).map_err(|_| InvalidNumberError(s.to_string()))?;

        Ok(Self(non_empty))
    }

    /// Returns the string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for CourseNumber {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for CourseNumber {
    type Err = InvalidNumberError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

/// Error returned when a string is not a valid catalog number.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("Invalid course number '{0}': expected digits with an optional trailing letter")]
pub struct InvalidNumberError(String);

/// A normalized course identifier: a subject code plus a catalog number
/// (e.g. `CMPUT 174`).
///
/// The canonical textual form is `{SUBJECT} {NUMBER}` — uppercase,
/// single-space joined. Two identifiers are equal iff their canonical forms
/// are equal; the derived ordering is lexicographic on that form, which is
/// the stable order used everywhere results are reported.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct CourseId {
    subject: Subject,
    number: CourseNumber,
}

impl CourseId {
    /// Create a course identifier from pre-validated components.
    #[must_use]
    pub const fn new(subject: Subject, number: CourseNumber) -> Self {
        Self { subject, number }
    }

    /// Returns the subject code.
    #[must_use]
    pub fn subject(&self) -> &str {
        self.subject.as_str()
    }

    /// Returns the catalog number.
    #[must_use]
    pub fn number(&self) -> &str {
        self.number.as_str()
    }
}

impl fmt::Display for CourseId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} {}", self.subject, self.number)
    }
}

/// Errors that can occur while parsing a course identifier.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum Error {
    /// The string has no subject/number structure at all.
    #[error("Invalid course identifier '{0}': expected '<SUBJECT> <NUMBER>'")]
    Syntax(String),

    /// The subject portion is malformed.
    #[error(transparent)]
    Subject(#[from] InvalidSubjectError),

    /// The number portion is malformed.
    #[error(transparent)]
    Number(#[from] InvalidNumberError),
}

impl FromStr for CourseId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.to_uppercase();
        let tokens: Vec<&str> = upper.split_whitespace().collect();

        // Need at least one subject token and the trailing number.
        let Some((number_str, subject_tokens)) = tokens.split_last() else {
            return Err(Error::Syntax(s.to_string()));
        };
        if subject_tokens.is_empty() {
            return Err(Error::Syntax(s.to_string()));
        }

        let subject = Subject::new(&subject_tokens.join(" "))?;
        let number = CourseNumber::new(number_str)?;

        Ok(Self::new(subject, number))
    }
}

impl TryFrom<&str> for CourseId {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::from_str(value)
    }
}
