//! Skillbox Core Library
//!
//! Discovery and management of agent skills: registry search with
//! debouncing and cancellation, installed-skill listing merged with update
//! availability, and facet filtering by company or agent.

pub mod config;
pub mod context;
pub mod error;
pub mod facet;
pub mod gateway;
pub mod installed;
pub mod registry;
pub mod search;
pub mod skills;
pub mod trending;

pub use error::{Result, SkillsError};

/// Re-exports of commonly used types
pub mod prelude {
    // Configuration
    pub use crate::config::{Settings, SettingsStore};
    pub use crate::context::AppContext;

    // Skills
    pub use crate::skills::{InstalledSkill, Skill, format_install_count};

    // Registry
    pub use crate::registry::{RegistryClient, SkillSearch};
    pub use crate::search::{DebouncedSearch, SearchState};
    pub use crate::trending::TrendingView;

    // Installed
    pub use crate::gateway::{ProcessSkillsCli, SkillsCli, UpdateReport};
    pub use crate::installed::{InstalledSkills, InstalledSnapshot, InstalledState};

    // Facets
    pub use crate::facet::{ALL, CompanyResolver, FacetCounts, FacetFilter};

    // Errors
    pub use crate::error::{Result, SkillsError};
}
