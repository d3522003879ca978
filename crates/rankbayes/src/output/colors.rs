//! Terminal color helpers.
//!
//! Thin wrappers over the `colored` crate, which respects `NO_COLOR`,
//! `CLICOLOR_FORCE` and TTY detection on its own.

use colored::Colorize;

use rankbayes_core::{Evidence, EvidenceStrength, Hypothesis};

/// Green text.
pub fn green(s: &str) -> String {
    s.green().to_string()
}

/// Red text.
pub fn red(s: &str) -> String {
    s.red().to_string()
}

/// Yellow text.
pub fn yellow(s: &str) -> String {
    s.yellow().to_string()
}

/// Bold text.
pub fn bold(s: &str) -> String {
    s.bold().to_string()
}

/// Dimmed text.
pub fn dim(s: &str) -> String {
    s.dimmed().to_string()
}

/// Bold green text.
pub fn bold_green(s: &str) -> String {
    s.green().bold().to_string()
}

/// Bold cyan text.
pub fn bold_cyan(s: &str) -> String {
    s.cyan().bold().to_string()
}

/// Evidence band text, colored by direction and strength.
///
/// Anecdotal evidence either way is yellow; anything stronger is green for
/// H1 and cyan for H0.
pub fn evidence(e: &Evidence) -> String {
    let text = e.to_string();
    match (e.favours, e.strength) {
        (None, _) => dim(&text),
        (Some(_), EvidenceStrength::Anecdotal) => yellow(&text),
        (Some(Hypothesis::H1), _) => bold_green(&text),
        (Some(Hypothesis::H0), _) => bold_cyan(&text),
    }
}
