//! Language and workflow mode models.
//!
//! A run is always tied to exactly one [`Language`] and happens in one
//! [`Mode`]. Each language has a static [`LanguageProfile`] used to seed the
//! editor and to infer languages from file names.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

/// A language supported by both remote services.
///
/// Serialized as the lowercase tag the services expect:
/// `"python"`, `"javascript"` or `"java"`.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default, TS)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Python,
    Javascript,
    Java,
}

impl Language {
    /// Every supported language, in display order.
    pub const ALL: [Language; 3] = [Language::Python, Language::Javascript, Language::Java];

    /// The wire tag for this language.
    pub fn as_str(self) -> &'static str {
        match self {
            Language::Python => "python",
            Language::Javascript => "javascript",
            Language::Java => "java",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "python" | "py" => Ok(Language::Python),
            "javascript" | "js" => Ok(Language::Javascript),
            "java" => Ok(Language::Java),
            other => Err(format!(
                "unsupported language '{other}' (expected python, javascript or java)"
            )),
        }
    }
}

/// The top-level workflow currently selected.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default, TS)]
#[serde(rename_all = "camelCase")]
pub enum Mode {
    /// Generate tests for a single source snippet, then run them.
    #[default]
    SingleFile,

    /// Upload a whole project archive and run its own test suite.
    ProjectArchive,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::SingleFile => f.write_str("single-file"),
            Mode::ProjectArchive => f.write_str("project-archive"),
        }
    }
}

/// Static configuration associated with a language.
///
/// One profile exists per [`Language`]. Profiles are created once at startup
/// and never mutated.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, TS)]
pub struct LanguageProfile {
    pub language: Language,

    /// Sample source used to seed the editor when the language is selected.
    pub default_source: String,

    /// Syntax identifier understood by editor widgets (e.g. "python").
    pub editor_syntax_id: String,

    /// File extension of single source files, including the leading dot.
    pub accepted_file_extension: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_from_str_accepts_aliases() {
        assert_eq!("python".parse::<Language>(), Ok(Language::Python));
        assert_eq!("JS".parse::<Language>(), Ok(Language::Javascript));
        assert_eq!(" java ".parse::<Language>(), Ok(Language::Java));
    }

    #[test]
    fn test_language_from_str_rejects_unknown() {
        let err = "rust".parse::<Language>().unwrap_err();
        assert!(err.contains("rust"));
    }

    #[test]
    fn test_language_display_matches_wire_tag() {
        for language in Language::ALL {
            let json = serde_json::to_value(language).unwrap();
            assert_eq!(json, language.to_string());
        }
    }

    #[test]
    fn test_mode_default_is_single_file() {
        assert_eq!(Mode::default(), Mode::SingleFile);
        assert_eq!(
            serde_json::to_value(Mode::ProjectArchive).unwrap(),
            "projectArchive"
        );
    }
}
