// SPDX-FileCopyrightText: 2026 Ledgersync Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Figment-to-miette error bridge with fuzzy match suggestions.
//!
//! Converts Figment deserialization errors into miette diagnostics with
//! valid key listings and "did you mean?" suggestions using Jaro-Winkler
//! string similarity.

use miette::Diagnostic;
use thiserror::Error;

/// Minimum Jaro-Winkler similarity score to suggest a correction.
/// 0.75 catches common typos like `batch_limt` -> `batch_limit`
/// while filtering noise.
const SUGGESTION_THRESHOLD: f64 = 0.75;

/// A configuration error with diagnostic information.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    /// An unknown key was found in the configuration.
    #[error("unknown configuration key `{key}`")]
    #[diagnostic(
        code(ledgersync::config::unknown_key),
        help("{}", format_unknown_key_help(suggestion.as_deref(), valid_keys))
    )]
    UnknownKey {
        /// The unrecognized key name, prefixed with its section path.
        key: String,
        /// Suggested correction via fuzzy matching, if any.
        suggestion: Option<String>,
        /// List of valid keys for the section.
        valid_keys: String,
    },

    /// A configuration value has the wrong type.
    #[error("invalid type for key `{key}`: {detail}")]
    #[diagnostic(code(ledgersync::config::invalid_type))]
    InvalidType { key: String, detail: String },

    /// A semantic validation constraint was violated.
    #[error("invalid configuration: {message}")]
    #[diagnostic(code(ledgersync::config::validation))]
    Validation { message: String },

    /// Any other parse failure.
    #[error("configuration parse error: {message}")]
    #[diagnostic(code(ledgersync::config::parse))]
    Parse { message: String },
}

fn format_unknown_key_help(suggestion: Option<&str>, valid_keys: &str) -> String {
    match suggestion {
        Some(s) => format!("did you mean `{s}`? valid keys: {valid_keys}"),
        None => format!("valid keys: {valid_keys}"),
    }
}

/// Convert a Figment extraction error into a list of [`ConfigError`]s.
pub fn figment_to_config_errors(err: figment::Error) -> Vec<ConfigError> {
    let mut errors = Vec::new();

    for e in err {
        let path = e.path.join(".");
        match &e.kind {
            figment::error::Kind::UnknownField(field, expected) => {
                let suggestion = suggest_key(field, expected);
                let key = if path.is_empty() {
                    field.clone()
                } else {
                    format!("{path}.{field}")
                };
                errors.push(ConfigError::UnknownKey {
                    key,
                    suggestion,
                    valid_keys: expected.join(", "),
                });
            }
            figment::error::Kind::InvalidType(actual, expected) => {
                errors.push(ConfigError::InvalidType {
                    key: path,
                    detail: format!("found {actual}, expected {expected}"),
                });
            }
            other => {
                let message = if path.is_empty() {
                    other.to_string()
                } else {
                    format!("{path}: {other}")
                };
                errors.push(ConfigError::Parse { message });
            }
        }
    }

    errors
}

/// Find the closest valid key to a typo'd one, if close enough.
fn suggest_key(actual: &str, valid: &[&str]) -> Option<String> {
    valid
        .iter()
        .map(|candidate| (strsim::jaro_winkler(actual, candidate), *candidate))
        .filter(|(score, _)| *score >= SUGGESTION_THRESHOLD)
        .max_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, candidate)| candidate.to_string())
}

/// Render a list of configuration errors to stderr as miette reports.
pub fn render_errors(errors: &[ConfigError]) {
    for error in errors {
        let report = miette::Report::msg(error.to_string());
        eprintln!("{report:?}");
        if let Some(help) = error.help() {
            eprintln!("  help: {help}");
        }
    }
}
