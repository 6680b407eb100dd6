//! Terminal rendering of run results and profiles.

use crate::driver::RunReport;
use colored::Colorize;
use ct_protocol::language_models::LanguageProfile;

/// Render a run as a result card.
pub fn report_card(report: &RunReport, show_tests: bool) -> String {
    let mut lines = Vec::new();

    if show_tests {
        if let Some(tests) = &report.generated_tests {
            lines.push(format!("{}", "Generated tests".bold()));
            lines.push(tests.clone());
            lines.push(String::new());
        }
    }

    if let Some(outcome) = &report.outcome {
        let badge = if outcome.success {
            " PASSED ".black().on_green().bold()
        } else {
            " FAILED ".white().on_red().bold()
        };
        lines.push(format!("{badge} {}", outcome.summary.bold()));
        if !outcome.output.is_empty() {
            lines.push(String::new());
            lines.push(outcome.output.trim_end().to_string());
        }
    }

    if let Some(error) = &report.error {
        if !lines.is_empty() {
            lines.push(String::new());
        }
        lines.push(format!("{} {}", "error:".red().bold(), error));
    }

    if lines.is_empty() {
        lines.push(format!("Run ended with status {}", report.status));
    }
    lines.join("\n")
}

pub fn report_json(report: &RunReport) -> serde_json::Result<String> {
    serde_json::to_string_pretty(report)
}

/// Render the profile table.
pub fn profile_table(profiles: &[LanguageProfile]) -> String {
    let mut lines = vec![format!(
        "{:<12} {:<10} {}",
        "LANGUAGE".bold(),
        "EXTENSION".bold(),
        "SYNTAX".bold()
    )];
    for profile in profiles {
        lines.push(format!(
            "{:<12} {:<10} {}",
            profile.language.as_str().cyan(),
            profile.accepted_file_extension,
            profile.editor_syntax_id
        ));
    }
    lines.join("\n")
}
