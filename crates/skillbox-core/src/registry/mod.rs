//! Registry HTTP client
//!
//! Searches the public skills registry and fetches README content for
//! skills that point at a GitHub repository.

pub mod readme;
pub mod schema;

use async_trait::async_trait;
use tracing::debug;

use crate::config::RegistrySettings;
use crate::error::{Result, SkillsError};
use crate::skills::Skill;

pub use schema::{SearchResponse, SearchSkill};

/// Default registry URL.
pub const DEFAULT_REGISTRY_URL: &str = "https://skills.sh";

/// Default base URL for raw repository content.
pub const DEFAULT_RAW_CONTENT_URL: &str = "https://raw.githubusercontent.com";

/// Results requested per search. The API is not paginated.
pub const SEARCH_LIMIT: usize = 50;

/// Queries shorter than this (after trimming) are never sent.
pub const MIN_QUERY_CHARS: usize = 2;

/// Broad query used for the popular listing. Results come back ordered by
/// install count.
pub const POPULAR_QUERY: &str = "skills";

const USER_AGENT: &str = concat!("skillbox/", env!("CARGO_PKG_VERSION"));

/// Anything that can answer a skills search.
#[async_trait]
pub trait SkillSearch: Send + Sync {
    /// Search for skills. Implementations return an empty list for
    /// queries shorter than [`MIN_QUERY_CHARS`].
    async fn search(&self, query: &str) -> Result<Vec<Skill>>;
}

/// True when `query` is long enough to be sent to the registry.
pub fn is_searchable(query: &str) -> bool {
    query.trim().chars().count() >= MIN_QUERY_CHARS
}

/// HTTP client for the skills registry.
#[derive(Debug, Clone)]
pub struct RegistryClient {
    base_url: String,
    raw_content_url: String,
    http: reqwest::Client,
}

impl RegistryClient {
    /// Create a client from settings.
    pub fn new(settings: &RegistrySettings) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(settings.timeout())
            .build()?;

        Ok(Self {
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            raw_content_url: settings.raw_content_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    /// Create a client against a custom registry URL with default settings
    /// otherwise.
    pub fn with_url(url: impl Into<String>) -> Result<Self> {
        let settings = RegistrySettings {
            base_url: url.into(),
            ..RegistrySettings::default()
        };
        Self::new(&settings)
    }

    /// Point README lookups at a different raw-content host.
    pub fn with_raw_content_url(mut self, url: impl Into<String>) -> Self {
        self.raw_content_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Search the registry. Short queries return an empty list without a
    /// request.
    pub async fn search_skills(&self, query: &str) -> Result<Vec<Skill>> {
        let query = query.trim();
        if !is_searchable(query) {
            return Ok(Vec::new());
        }
        self.fetch_search(query).await
    }

    /// Popular skills, ranked by position.
    pub async fn popular(&self) -> Result<Vec<Skill>> {
        let mut skills = self.fetch_search(POPULAR_QUERY).await?;
        for (index, skill) in skills.iter_mut().enumerate() {
            skill.rank = Some(index as u32 + 1);
        }
        Ok(skills)
    }

    async fn fetch_search(&self, query: &str) -> Result<Vec<Skill>> {
        let url = format!("{}/api/search", self.base_url);
        debug!(query, "searching registry");

        let response = self
            .http
            .get(&url)
            .query(&[("q", query), ("limit", &SEARCH_LIMIT.to_string())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SkillsError::Http {
                status: status.as_u16(),
                url: response.url().to_string(),
            });
        }

        let bytes = response.bytes().await?;
        let body: SearchResponse = serde_json::from_slice(&bytes)?;
        debug!(
            query,
            count = body.skills.len(),
            duration_ms = body.duration_ms,
            "registry search completed"
        );

        Ok(body
            .skills
            .into_iter()
            .map(|hit| hit.into_skill(&self.base_url))
            .collect())
    }

    /// README for `skill`, or `None` when it has no repository or no README
    /// could be fetched.
    pub async fn readme(&self, skill: &Skill) -> Option<String> {
        if skill.repository_url.is_none() || skill.owner.is_empty() {
            return None;
        }
        readme::fetch_readme(&self.http, &self.raw_content_url, &skill.owner, &skill.repo).await
    }
}

#[async_trait]
impl SkillSearch for RegistryClient {
    async fn search(&self, query: &str) -> Result<Vec<Skill>> {
        self.search_skills(query).await
    }
}
