//! Language profile registry.
//!
//! A read-only, process-wide table with one [`LanguageProfile`] per
//! [`Language`]. The sample sources are compiled in from `templates/samples/`,
//! the same files `codetest init --with-samples` writes out.

use ct_protocol::language_models::{Language, LanguageProfile};
use std::path::Path;
use std::sync::LazyLock;

const PYTHON_SAMPLE: &str = include_str!("../../../../templates/samples/python.py");
const JAVASCRIPT_SAMPLE: &str = include_str!("../../../../templates/samples/javascript.js");
const JAVA_SAMPLE: &str = include_str!("../../../../templates/samples/java.java");

static PROFILES: LazyLock<[LanguageProfile; 3]> = LazyLock::new(|| {
    [
        profile(Language::Python, PYTHON_SAMPLE, "python", ".py"),
        profile(Language::Javascript, JAVASCRIPT_SAMPLE, "javascript", ".js"),
        profile(Language::Java, JAVA_SAMPLE, "java", ".java"),
    ]
});

fn profile(
    language: Language,
    default_source: &str,
    editor_syntax_id: &str,
    accepted_file_extension: &str,
) -> LanguageProfile {
    LanguageProfile {
        language,
        default_source: default_source.to_string(),
        editor_syntax_id: editor_syntax_id.to_string(),
        accepted_file_extension: accepted_file_extension.to_string(),
    }
}

/// Look up the profile of a language.
///
/// Total over [`Language`]; there is no error path.
pub fn profile_for(language: Language) -> &'static LanguageProfile {
    match language {
        Language::Python => &PROFILES[0],
        Language::Javascript => &PROFILES[1],
        Language::Java => &PROFILES[2],
    }
}

/// All profiles, in [`Language::ALL`] order.
pub fn all_profiles() -> &'static [LanguageProfile] {
    PROFILES.as_slice()
}

/// Infer a language from a source file name via the accepted extensions.
///
/// Returns `None` when no profile claims the extension.
pub fn language_for_path(path: &Path) -> Option<Language> {
    let name = path.file_name()?.to_str()?.to_ascii_lowercase();
    all_profiles()
        .iter()
        .find(|profile| name.ends_with(&profile.accepted_file_extension))
        .map(|profile| profile.language)
}
