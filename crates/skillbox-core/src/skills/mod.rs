//! Skill entities shared by the registry, trending and installed views.

pub mod format;

use std::collections::BTreeSet;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

pub use format::format_install_count;

/// Command prefix used to install a skill through the skills CLI.
pub const INSTALL_PREFIX: &str = "npx skills add";

/// Base URL for repository links derived from an `owner/repo` source.
pub const GITHUB_BASE_URL: &str = "https://github.com";

/// A skill as published on the registry.
///
/// Values are snapshots taken at fetch time. A refresh replaces the whole
/// collection instead of editing entries in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Skill {
    /// Unique identifier (registry id, or `owner/repo/name` for local skills)
    pub id: String,
    /// Display name
    pub name: String,
    /// Description, empty when the source does not provide one
    #[serde(default)]
    pub description: String,
    /// Owner half of the `owner/repo` source, empty when unknown
    pub owner: String,
    /// Repository half of the source, may contain further `/` segments
    pub repo: String,
    /// Number of installs reported by the registry
    #[serde(default)]
    pub install_count: u64,
    /// Shell command that installs this skill
    pub install_command: String,
    /// Registry page for this skill
    pub url: String,
    /// Repository page, only set when the source is known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repository_url: Option<String>,
    /// 1-based position, only set in trending listings
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rank: Option<u32>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Skill {
    /// Build a skill from its registry identity.
    ///
    /// `source` is the combined `owner/repo` string. It is split on the first
    /// `/` only, so nested repository paths survive intact. An empty source
    /// yields empty owner/repo and identifier-only command and URL forms.
    /// The repository URL is only set when the source splits cleanly.
    pub fn from_source(
        id: impl Into<String>,
        name: impl Into<String>,
        skill_id: &str,
        source: Option<&str>,
        registry_url: &str,
    ) -> Self {
        let source = source.map(str::trim).unwrap_or_default();
        let (owner, repo) = split_source(source);
        let base = registry_url.trim_end_matches('/');

        let (install_command, url, repository_url) = if source.is_empty() {
            (
                install_command(None, skill_id),
                format!("{base}/{skill_id}"),
                None,
            )
        } else {
            (
                install_command(Some(source), skill_id),
                format!("{base}/{source}/{skill_id}"),
                (!owner.is_empty()).then(|| format!("{GITHUB_BASE_URL}/{source}")),
            )
        };

        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            owner,
            repo,
            install_count: 0,
            install_command,
            url,
            repository_url,
            rank: None,
            tags: Vec::new(),
        }
    }

    pub fn with_install_count(mut self, count: u64) -> Self {
        self.install_count = count;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Combined `owner/repo` source, if known.
    pub fn source(&self) -> Option<String> {
        if self.owner.is_empty() {
            None
        } else {
            Some(format!("{}/{}", self.owner, self.repo))
        }
    }
}

/// A skill reported by the local skills CLI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstalledSkill {
    #[serde(flatten)]
    pub skill: Skill,
    /// Agents that reference this skill
    pub agents: BTreeSet<String>,
    /// Whether the update check reported this skill by name
    #[serde(default)]
    pub has_update: bool,
    /// Install location, when the CLI reports one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

impl InstalledSkill {
    /// Build an installed skill. The id is synthesized as
    /// `owner/repo/name`, or just `name` when the source is unknown.
    pub fn new(
        name: impl Into<String>,
        source: Option<&str>,
        agents: impl IntoIterator<Item = String>,
        registry_url: &str,
    ) -> Self {
        let name = name.into();
        let source = source.map(str::trim).filter(|s| !s.is_empty());
        let id = match source {
            Some(source) => format!("{source}/{name}"),
            None => name.clone(),
        };

        Self {
            skill: Skill::from_source(id, name.clone(), &name, source, registry_url),
            agents: agents.into_iter().collect(),
            has_update: false,
            path: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.skill.name
    }

    pub fn id(&self) -> &str {
        &self.skill.id
    }
}

/// Split `owner/repo[/more]` on the first separator.
///
/// Both halves are empty unless both are present.
pub fn split_source(source: &str) -> (String, String) {
    match source.split_once('/') {
        Some((owner, repo)) if !owner.is_empty() && !repo.is_empty() => {
            (owner.to_string(), repo.to_string())
        }
        _ => (String::new(), String::new()),
    }
}

/// Install command for a skill id, qualified by source when one is known.
pub fn install_command(source: Option<&str>, skill_id: &str) -> String {
    match source.filter(|s| !s.is_empty()) {
        Some(source) => format!("{INSTALL_PREFIX} {source}@{skill_id}"),
        None => format!("{INSTALL_PREFIX} {skill_id}"),
    }
}
