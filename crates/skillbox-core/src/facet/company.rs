//! Company lookup for the company facet.

use std::collections::BTreeMap;

use crate::skills::Skill;

/// Maps a skill to the company it is grouped under.
pub trait CompanyResolver: Send + Sync {
    fn company(&self, skill: &Skill) -> String;
}

impl<F> CompanyResolver for F
where
    F: Fn(&Skill) -> String + Send + Sync,
{
    fn company(&self, skill: &Skill) -> String {
        self(skill)
    }
}

/// Groups skills by their raw owner.
#[derive(Debug, Clone, Copy, Default)]
pub struct OwnerCompany;

impl CompanyResolver for OwnerCompany {
    fn company(&self, skill: &Skill) -> String {
        skill.owner.clone()
    }
}

/// Groups skills by a display name looked up from their owner.
///
/// Owners are matched case-insensitively; unknown owners fall back to the
/// owner itself.
#[derive(Debug, Clone, Default)]
pub struct KnownCompanies {
    names: BTreeMap<String, String>,
}

impl KnownCompanies {
    pub fn new(names: &BTreeMap<String, String>) -> Self {
        Self {
            names: names
                .iter()
                .map(|(owner, company)| (owner.to_lowercase(), company.clone()))
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl CompanyResolver for KnownCompanies {
    fn company(&self, skill: &Skill) -> String {
        self.names
            .get(&skill.owner.to_lowercase())
            .cloned()
            .unwrap_or_else(|| skill.owner.clone())
    }
}
