//! Trending listing: popular skills with an owner facet and a text filter.

use std::sync::Arc;

use crate::facet::{FacetCounts, FacetFilter};
use crate::skills::Skill;

/// Client-side view over the popular list.
#[derive(Debug)]
pub struct TrendingView {
    owners: FacetFilter<Skill>,
    filter: String,
}

impl TrendingView {
    pub fn new(skills: impl Into<Arc<Vec<Skill>>>) -> Self {
        let mut owners = FacetFilter::by_owner();
        owners.set_items(skills.into());
        Self {
            owners,
            filter: String::new(),
        }
    }

    /// Replace the underlying list, keeping filter text and owner selection
    /// where still valid.
    pub fn set_skills(&mut self, skills: impl Into<Arc<Vec<Skill>>>) {
        self.owners.set_items(skills.into());
    }

    pub fn set_filter(&mut self, text: &str) {
        self.filter = text.to_lowercase();
    }

    pub fn select_owner(&mut self, owner: &str) {
        self.owners.select(owner);
    }

    pub fn selected_owner(&self) -> &str {
        self.owners.selected()
    }

    pub fn owners(&self) -> &FacetCounts {
        self.owners.counts()
    }

    pub fn len(&self) -> usize {
        self.owners.items().len()
    }

    pub fn is_empty(&self) -> bool {
        self.owners.items().is_empty()
    }

    /// Skills passing the owner selection and the text filter, ranked by
    /// their position in the result (1-based).
    pub fn visible(&self) -> Vec<Skill> {
        self.owners
            .filtered()
            .into_iter()
            .filter(|skill| matches_text(skill, &self.filter))
            .enumerate()
            .map(|(index, skill)| Skill {
                rank: Some(index as u32 + 1),
                ..skill.clone()
            })
            .collect()
    }
}

/// Case-insensitive substring match over name, owner and repo.
/// `needle` must already be lower-cased.
pub fn matches_text(skill: &Skill, needle: &str) -> bool {
    needle.is_empty()
        || skill.name.to_lowercase().contains(needle)
        || skill.owner.to_lowercase().contains(needle)
        || skill.repo.to_lowercase().contains(needle)
}
