//! Error taxonomy for registry and CLI operations.

use std::time::Duration;

/// Errors raised by the registry client and the skills CLI gateway.
///
/// `Http` and `Network` come from the registry side; the `Cli*` variants
/// come from invoking the external `skills` tool. A query that is too short
/// to search is not an error and never shows up here.
#[derive(Debug, thiserror::Error)]
pub enum SkillsError {
    #[error("HTTP error! status: {status} ({url})")]
    Http { status: u16, url: String },

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("invalid registry response: {0}")]
    Json(#[from] serde_json::Error),

    #[error("`{command}` failed{}: {stderr}", exit_suffix(.code))]
    Cli {
        command: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("`{command}` timed out after {}s", .timeout.as_secs())]
    CliTimeout { command: String, timeout: Duration },

    #[error("unexpected output from `{command}`: {reason}")]
    CliOutput { command: String, reason: String },
}

impl SkillsError {
    /// True for failures that originate in the registry HTTP layer.
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Http { .. } | Self::Network(_) | Self::Json(_))
    }

    /// True for failures that originate in the skills CLI.
    pub fn is_cli(&self) -> bool {
        matches!(
            self,
            Self::Cli { .. } | Self::CliTimeout { .. } | Self::CliOutput { .. }
        )
    }

    /// HTTP status code, when the registry answered with a non-2xx response.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            Self::Network(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

fn exit_suffix(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!(" with exit code {code}"),
        None => String::new(),
    }
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, SkillsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_error_carries_status() {
        let err = SkillsError::Http {
            status: 503,
            url: "https://skills.sh/api/search".to_string(),
        };
        assert_eq!(err.status(), Some(503));
        assert!(err.is_network());
        assert!(!err.is_cli());
        assert!(err.to_string().contains("503"));
    }

    #[test]
    fn cli_error_message_includes_exit_code() {
        let err = SkillsError::Cli {
            command: "npx -y skills list -g --json".to_string(),
            code: Some(1),
            stderr: "boom".to_string(),
        };
        assert!(err.is_cli());
        assert_eq!(
            err.to_string(),
            "`npx -y skills list -g --json` failed with exit code 1: boom"
        );
    }

    #[test]
    fn cli_error_without_code_omits_suffix() {
        let err = SkillsError::Cli {
            command: "npx".to_string(),
            code: None,
            stderr: "killed".to_string(),
        };
        assert_eq!(err.to_string(), "`npx` failed: killed");
    }
}
