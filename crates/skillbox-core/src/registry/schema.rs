//! Wire types for the registry search API.
//!
//! Response format:
//!   id: "anthropics/skills/webapp-testing" (full path)
//!   skillId: "webapp-testing" (skill name only)
//!   source: "anthropics/skills" (owner/repo)

use serde::Deserialize;

use crate::skills::Skill;

/// `GET /api/search` response body
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    #[serde(default)]
    pub query: String,
    #[serde(default)]
    pub search_type: Option<String>,
    #[serde(default)]
    pub skills: Vec<SearchSkill>,
    #[serde(default)]
    pub count: Option<u64>,
    #[serde(default, rename = "duration_ms")]
    pub duration_ms: Option<u64>,
}

/// One search hit
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchSkill {
    pub id: String,
    #[serde(default)]
    pub skill_id: String,
    pub name: String,
    #[serde(default)]
    pub installs: Option<u64>,
    #[serde(default)]
    pub source: Option<String>,
}

impl SearchSkill {
    /// Map a search hit onto the shared skill model.
    pub fn into_skill(self, registry_url: &str) -> Skill {
        let skill_id = if self.skill_id.is_empty() {
            self.name.as_str()
        } else {
            self.skill_id.as_str()
        };

        Skill::from_source(
            self.id.clone(),
            self.name.clone(),
            skill_id,
            self.source.as_deref(),
            registry_url,
        )
        .with_install_count(self.installs.unwrap_or(0))
    }
}
