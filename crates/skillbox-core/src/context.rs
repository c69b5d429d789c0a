//! Application context for unified dependency injection.

use std::sync::Arc;

use crate::config::{Settings, SettingsStore};
use crate::error::Result;
use crate::facet::{CompanyResolver, FacetFilter, KnownCompanies, OwnerCompany};
use crate::gateway::{ProcessSkillsCli, SkillsCli};
use crate::installed::InstalledSkills;
use crate::registry::RegistryClient;
use crate::search::DebouncedSearch;
use crate::skills::Skill;

/// Unified application context for dependency injection.
///
/// Loads settings once and hands out the registry client, the CLI gateway
/// and the stateful views built on them. Frontends create this once per
/// process.
#[derive(Debug, Clone)]
pub struct AppContext {
    settings: Settings,
    registry: RegistryClient,
}

impl AppContext {
    /// Create a context from already loaded settings.
    pub fn new(settings: Settings) -> Result<Self> {
        let registry = RegistryClient::new(&settings.registry)?;
        Ok(Self {
            settings,
            registry,
        })
    }

    /// Load settings from the default location.
    pub fn with_defaults() -> anyhow::Result<Self> {
        let store = SettingsStore::from_default_location()?;
        Self::from_store(&store)
    }

    /// Load settings from `store`.
    pub fn from_store(store: &SettingsStore) -> anyhow::Result<Self> {
        let settings = store.load()?;
        Ok(Self::new(settings)?)
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn registry(&self) -> &RegistryClient {
        &self.registry
    }

    /// Gateway to the external skills CLI.
    pub fn skills_cli(&self) -> Arc<dyn SkillsCli> {
        Arc::new(ProcessSkillsCli::new(
            &self.settings.cli,
            self.settings.registry.base_url.clone(),
        ))
    }

    /// Company lookup from the `[companies]` table, or raw owners when the
    /// table is empty.
    pub fn company_resolver(&self) -> Arc<dyn CompanyResolver> {
        let known = KnownCompanies::new(&self.settings.companies);
        if known.is_empty() {
            Arc::new(OwnerCompany)
        } else {
            Arc::new(known)
        }
    }

    /// A fresh debounced search bound to the registry.
    pub fn debounced_search(&self) -> DebouncedSearch {
        DebouncedSearch::new(
            Arc::new(self.registry.clone()),
            self.settings.search.debounce(),
        )
    }

    /// A fresh company facet for search results.
    pub fn company_filter(&self) -> FacetFilter<Skill> {
        FacetFilter::by_company(self.company_resolver())
    }

    /// A fresh installed-skills aggregator.
    pub fn installed_skills(&self) -> InstalledSkills {
        InstalledSkills::new(self.skills_cli())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn company_resolver_uses_table_when_present() {
        let mut settings = Settings::default();
        settings
            .companies
            .insert("anthropics".to_string(), "Anthropic".to_string());
        let ctx = AppContext::new(settings).unwrap();

        let skill = Skill::from_source(
            "a/b/c",
            "c",
            "c",
            Some("anthropics/skills"),
            "https://skills.sh",
        );
        assert_eq!(ctx.company_resolver().company(&skill), "Anthropic");
    }

    #[test]
    fn debounced_search_uses_configured_delay() {
        let mut settings = Settings::default();
        settings.search.debounce_ms = 120;
        let ctx = AppContext::new(settings).unwrap();

        assert_eq!(
            ctx.debounced_search().delay(),
            std::time::Duration::from_millis(120)
        );
    }
}
