//! TOML parser with helpful error messages

use std::path::Path;

use anyhow::{Context, Result};

use super::schema::Settings;

/// Parse a settings file with detailed error messages
pub fn parse_settings(path: &Path) -> Result<Settings> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read settings file: {}", path.display()))?;

    parse_settings_str(&content)
        .with_context(|| format!("Failed to parse settings file: {}", path.display()))
}

/// Parse settings content from string
pub fn parse_settings_str(content: &str) -> Result<Settings> {
    let settings: Settings = toml::from_str(content).map_err(|e| enhance_toml_error(e, content))?;

    validate_settings(&settings)?;

    Ok(settings)
}

/// Serialize settings to TOML
pub fn to_toml(settings: &Settings) -> Result<String> {
    toml::to_string_pretty(settings).context("Failed to serialize settings to TOML")
}

/// Enhance TOML parsing errors with the offending line
fn enhance_toml_error(error: toml::de::Error, content: &str) -> anyhow::Error {
    let Some(span) = error.span() else {
        return anyhow::anyhow!("TOML parsing error: {}", error.message());
    };

    let start = span.start.min(content.len());
    let line_num = content.as_bytes()[..start].iter().filter(|&&b| b == b'\n').count() + 1;
    let line = content.lines().nth(line_num - 1).unwrap_or_default();
    anyhow::anyhow!(
        "TOML parsing error at line {}:\n  {}\n\nError: {}",
        line_num,
        line,
        error.message()
    )
}

fn validate_settings(settings: &Settings) -> Result<()> {
    url::Url::parse(&settings.registry.base_url).with_context(|| {
        format!(
            "registry.base_url is not a valid URL: {}",
            settings.registry.base_url
        )
    })?;
    url::Url::parse(&settings.registry.raw_content_url).with_context(|| {
        format!(
            "registry.raw_content_url is not a valid URL: {}",
            settings.registry.raw_content_url
        )
    })?;

    if settings.cli.program.trim().is_empty() {
        anyhow::bail!("cli.program must not be empty");
    }
    if settings.cli.timeout_secs == 0 {
        anyhow::bail!("cli.timeout_secs must be greater than zero");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_content_yields_defaults() {
        let settings = parse_settings_str("").unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let settings = parse_settings_str(
            r#"
[search]
debounce_ms = 150

[companies]
anthropics = "Anthropic"
"#,
        )
        .unwrap();

        assert_eq!(settings.search.debounce_ms, 150);
        assert_eq!(settings.registry.base_url, "https://skills.sh");
        assert_eq!(settings.cli.program, "npx");
        assert_eq!(
            settings.companies.get("anthropics").map(String::as_str),
            Some("Anthropic")
        );
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let err = parse_settings_str(
            r#"
[registry]
base_url = "not a url"
"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("registry.base_url"));
    }

    #[test]
    fn syntax_error_reports_line() {
        let err = parse_settings_str("[search]\ndebounce_ms = = 3\n").unwrap_err();
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn duplicate_key_reports_its_own_line() {
        let err =
            parse_settings_str("[search]\ndebounce_ms = 1\ndebounce_ms = 2\n").unwrap_err();
        let message = err.to_string();
        assert!(message.contains("line 3"), "{message}");
        assert!(message.contains("debounce_ms = 2"), "{message}");
    }

    #[test]
    fn zero_cli_timeout_is_rejected() {
        let err = parse_settings_str("[cli]\ntimeout_secs = 0\n").unwrap_err();
        assert!(err.to_string().contains("timeout_secs"));
    }
}
