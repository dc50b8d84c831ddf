use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::rule::DEFAULT_REQUIRED_CREDITS;

/// Configuration for an audit run.
///
/// Holds the defaults the CLI falls back to when flags are not given:
/// where manual rule files live, where the transcript is, and the credit
/// threshold substituted into malformed total-credits rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Versions", into = "Versions")]
pub struct Config {
    /// Directory scanned for manual rule files (`*.json`).
    pub rules_dir: PathBuf,

    /// Default path to the learner's transcript file.
    pub transcript: PathBuf,

    /// Credit threshold used when a total-credits rule omits or mangles
    /// its `required` field.
    default_required_credits: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rules_dir: default_rules_dir(),
            transcript: default_transcript(),
            default_required_credits: DEFAULT_REQUIRED_CREDITS,
        }
    }
}

impl Config {
    /// Loads the configuration from a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or if the TOML content
    /// is invalid.
    pub fn load(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file: {e}"))?;
        toml::from_str(&content).map_err(|e| format!("Failed to parse config file: {e}"))
    }

    /// Saves the configuration to a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be serialized to TOML
    /// or if the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), String> {
        let content =
            toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize config: {e}"))?;
        std::fs::write(path, content).map_err(|e| format!("Failed to write config file: {e}"))
    }

    /// Returns the fallback credit threshold for malformed total-credits
    /// rules.
    #[must_use]
    pub const fn default_required_credits(&self) -> u32 {
        self.default_required_credits
    }
}

fn default_rules_dir() -> PathBuf {
    PathBuf::from("rules")
}

fn default_transcript() -> PathBuf {
    PathBuf::from("my_courses.json")
}

const fn default_required_credits() -> u32 {
    DEFAULT_REQUIRED_CREDITS
}

/// The serialized versions of the configuration.
/// This allows for future changes to the configuration format and to the
/// domain type without breaking compatibility.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "_version")]
enum Versions {
    #[serde(rename = "1")]
    V1 {
        #[serde(default = "default_rules_dir")]
        rules_dir: PathBuf,

        #[serde(default = "default_transcript")]
        transcript: PathBuf,

        #[serde(default = "default_required_credits")]
        default_required_credits: u32,
    },
}

impl From<Versions> for Config {
    fn from(versions: Versions) -> Self {
        match versions {
            Versions::V1 {
                rules_dir,
                transcript,
                default_required_credits,
            } => Self {
                rules_dir,
                transcript,
                default_required_credits,
            },
        }
    }
}

impl From<Config> for Versions {
    fn from(config: Config) -> Self {
        Self::V1 {
            rules_dir: config.rules_dir,
            transcript: config.transcript,
            default_required_credits: config.default_required_credits,
        }
    }
}
