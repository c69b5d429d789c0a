//! Gateway to the external `skills` command-line tool.
//!
//! The CLI owns installation and update mechanics. This module only runs it
//! and shape-checks what comes back.

use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, info};

use crate::config::CliSettings;
use crate::error::{Result, SkillsError};
use crate::skills::InstalledSkill;

/// Operations the installed-skills views need from the CLI.
#[async_trait]
pub trait SkillsCli: Send + Sync {
    /// All globally installed skills, each with the agents that use it.
    async fn list_installed(&self) -> Result<Vec<InstalledSkill>>;

    /// Names of installed skills that have an update available.
    async fn check_updates(&self) -> Result<Vec<String>>;

    /// Update every installed skill.
    async fn update_all(&self) -> Result<UpdateReport>;
}

/// Outcome of a successful bulk update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateReport {
    /// Trimmed CLI output, for display
    pub output: String,
}

/// [`SkillsCli`] backed by a child process (`npx -y skills …` by default).
#[derive(Debug, Clone)]
pub struct ProcessSkillsCli {
    program: String,
    base_args: Vec<String>,
    timeout: Duration,
    registry_url: String,
}

impl ProcessSkillsCli {
    pub fn new(settings: &CliSettings, registry_url: impl Into<String>) -> Self {
        Self {
            program: settings.program.clone(),
            base_args: settings.args.clone(),
            timeout: settings.timeout(),
            registry_url: registry_url.into(),
        }
    }

    fn command_line(&self, args: &[&str]) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.base_args.iter().map(String::as_str))
            .chain(args.iter().copied())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Run the CLI with `args` appended to the base arguments. Returns the
    /// rendered command line and stdout.
    async fn run(&self, args: &[&str]) -> Result<(String, String)> {
        let command = self.command_line(args);
        info!(%command, "invoking skills CLI");

        let child = tokio::process::Command::new(&self.program)
            .args(&self.base_args)
            .args(args)
            .env("NO_COLOR", "1")
            .env("FORCE_COLOR", "0")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| SkillsError::Cli {
                command: command.clone(),
                code: None,
                stderr: format!("failed to spawn process: {e}"),
            })?;

        // On timeout the child is dropped and killed via `kill_on_drop`.
        let output = match tokio::time::timeout(self.timeout, child.wait_with_output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => {
                return Err(SkillsError::Cli {
                    command,
                    code: None,
                    stderr: e.to_string(),
                });
            }
            Err(_) => {
                return Err(SkillsError::CliTimeout {
                    command,
                    timeout: self.timeout,
                });
            }
        };

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();

        if !output.status.success() {
            return Err(SkillsError::Cli {
                command,
                code: output.status.code(),
                stderr,
            });
        }

        debug!(%command, bytes = stdout.len(), "skills CLI finished");
        Ok((command, stdout))
    }
}

#[async_trait]
impl SkillsCli for ProcessSkillsCli {
    async fn list_installed(&self) -> Result<Vec<InstalledSkill>> {
        let (command, stdout) = self.run(&["list", "-g", "--json"]).await?;
        parse_installed(&command, &stdout, &self.registry_url)
    }

    async fn check_updates(&self) -> Result<Vec<String>> {
        let (command, stdout) = self.run(&["check", "--json"]).await?;
        parse_updates(&command, &stdout)
    }

    async fn update_all(&self) -> Result<UpdateReport> {
        let (_, stdout) = self.run(&["update"]).await?;
        Ok(UpdateReport {
            output: stdout.trim().to_string(),
        })
    }
}

#[derive(Debug, Deserialize)]
struct ListedSkill {
    name: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    source: Option<String>,
    #[serde(default)]
    path: Option<PathBuf>,
    #[serde(default)]
    agents: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ListOutput {
    Bare(Vec<ListedSkill>),
    Wrapped { skills: Vec<ListedSkill> },
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum UpdateEntry {
    Name(String),
    Named { name: String },
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CheckOutput {
    Bare(Vec<UpdateEntry>),
    Wrapped { updates: Vec<UpdateEntry> },
}

/// Parse `skills list --json` output.
///
/// Accepts a bare array or an object with a `skills` array. Anything else
/// is a [`SkillsError::CliOutput`].
pub fn parse_installed(
    command: &str,
    stdout: &str,
    registry_url: &str,
) -> Result<Vec<InstalledSkill>> {
    let trimmed = stdout.trim();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }

    let listed = match serde_json::from_str::<ListOutput>(trimmed) {
        Ok(ListOutput::Bare(skills)) | Ok(ListOutput::Wrapped { skills }) => skills,
        Err(e) => {
            return Err(SkillsError::CliOutput {
                command: command.to_string(),
                reason: e.to_string(),
            });
        }
    };

    Ok(listed
        .into_iter()
        .map(|entry| {
            let mut skill = InstalledSkill::new(
                entry.name,
                entry.source.as_deref(),
                entry.agents,
                registry_url,
            );
            if let Some(description) = entry.description {
                skill.skill = skill.skill.with_description(description);
            }
            skill.path = entry.path;
            skill
        })
        .collect())
}

/// Parse `skills check --json` output into skill names.
///
/// JSON may be an array of names, an array of `{ "name": .. }` objects, or
/// an object with an `updates` array. Non-JSON output is read as one name
/// per non-empty line.
pub fn parse_updates(command: &str, stdout: &str) -> Result<Vec<String>> {
    let trimmed = stdout.trim();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }

    if trimmed.starts_with('[') || trimmed.starts_with('{') {
        let entries = match serde_json::from_str::<CheckOutput>(trimmed) {
            Ok(CheckOutput::Bare(entries)) | Ok(CheckOutput::Wrapped { updates: entries }) => {
                entries
            }
            Err(e) => {
                return Err(SkillsError::CliOutput {
                    command: command.to_string(),
                    reason: e.to_string(),
                });
            }
        };
        return Ok(entries
            .into_iter()
            .map(|entry| match entry {
                UpdateEntry::Name(name) | UpdateEntry::Named { name } => name,
            })
            .collect());
    }

    Ok(trimmed
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}
