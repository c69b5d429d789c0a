//! Facets: grouping keys with counts, and filtering by a selected key.
//!
//! A facet is computed from a collection and a key function. The company
//! facet yields one key per skill; the agent facet yields one key per agent
//! of an installed skill, so a skill can land in several buckets.

pub mod company;

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::skills::{InstalledSkill, Skill};

pub use company::{CompanyResolver, KnownCompanies, OwnerCompany};

/// Synthetic key selecting the whole collection.
pub const ALL: &str = "all";

/// Key → count, in ascending key order, plus the unfiltered total.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FacetCounts {
    total: usize,
    buckets: BTreeMap<String, usize>,
}

impl FacetCounts {
    /// Count keys over `items`. An item contributes at most once to each
    /// bucket, however many times its key function repeats a key.
    pub fn from_keys<T, F, I>(items: &[T], keys: F) -> Self
    where
        F: Fn(&T) -> I,
        I: IntoIterator<Item = String>,
    {
        let mut buckets = BTreeMap::new();
        for item in items {
            let unique: BTreeSet<String> = keys(item).into_iter().collect();
            for key in unique {
                *buckets.entry(key).or_insert(0) += 1;
            }
        }
        Self {
            total: items.len(),
            buckets,
        }
    }

    /// Size of the unfiltered collection (the count for [`ALL`]).
    pub fn total(&self) -> usize {
        self.total
    }

    pub fn get(&self, key: &str) -> Option<usize> {
        if key == ALL {
            Some(self.total)
        } else {
            self.buckets.get(key).copied()
        }
    }

    /// True for [`ALL`] and for every key present in the data.
    pub fn contains(&self, key: &str) -> bool {
        key == ALL || self.buckets.contains_key(key)
    }

    /// Real buckets, sorted by key.
    pub fn buckets(&self) -> impl Iterator<Item = (&str, usize)> {
        self.buckets.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// [`ALL`] first, then the real buckets in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        std::iter::once((ALL, self.total)).chain(self.buckets())
    }

    /// Number of real buckets.
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}

type KeyFn<T> = Arc<dyn Fn(&T) -> Vec<String> + Send + Sync>;

/// A collection with one facet and a current selection.
///
/// Counts are recomputed only when a different collection is supplied
/// (compared by `Arc` identity). The selection never points at a key that
/// is missing from the current counts: it falls back to [`ALL`].
pub struct FacetFilter<T> {
    keys: KeyFn<T>,
    items: Arc<Vec<T>>,
    counts: FacetCounts,
    selected: String,
}

impl<T> FacetFilter<T> {
    pub fn new(keys: impl Fn(&T) -> Vec<String> + Send + Sync + 'static) -> Self {
        Self {
            keys: Arc::new(keys),
            items: Arc::new(Vec::new()),
            counts: FacetCounts::default(),
            selected: ALL.to_string(),
        }
    }

    /// Supply a new collection. Returns `false` if it is the same snapshot
    /// as before and nothing was recomputed.
    pub fn set_items(&mut self, items: Arc<Vec<T>>) -> bool {
        if Arc::ptr_eq(&self.items, &items) {
            return false;
        }
        self.counts = FacetCounts::from_keys(items.as_slice(), |item| (self.keys)(item));
        self.items = items;
        self.ensure_selection();
        true
    }

    /// Select a key. Unknown keys select [`ALL`].
    pub fn select(&mut self, key: &str) {
        self.selected = key.to_string();
        self.ensure_selection();
    }

    pub fn selected(&self) -> &str {
        &self.selected
    }

    pub fn counts(&self) -> &FacetCounts {
        &self.counts
    }

    pub fn items(&self) -> &Arc<Vec<T>> {
        &self.items
    }

    /// Items matching the selection, in collection order.
    pub fn filtered(&self) -> Vec<&T> {
        if self.selected == ALL {
            return self.items.iter().collect();
        }
        self.items
            .iter()
            .filter(|&item| (self.keys)(item).iter().any(|k| *k == self.selected))
            .collect()
    }

    fn ensure_selection(&mut self) {
        if !self.counts.contains(&self.selected) {
            debug!(selected = %self.selected, "facet value vanished; resetting to all");
            self.selected = ALL.to_string();
        }
    }
}

impl FacetFilter<Skill> {
    /// Facet search results by company.
    pub fn by_company(resolver: Arc<dyn CompanyResolver>) -> Self {
        Self::new(move |skill: &Skill| vec![resolver.company(skill)])
    }

    /// Facet by raw owner.
    pub fn by_owner() -> Self {
        Self::new(|skill: &Skill| vec![skill.owner.clone()])
    }
}

impl FacetFilter<InstalledSkill> {
    /// Facet installed skills by agent.
    pub fn by_agent() -> Self {
        Self::new(|skill: &InstalledSkill| skill.agents.iter().cloned().collect())
    }
}

impl<T> fmt::Debug for FacetFilter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FacetFilter")
            .field("items", &self.items.len())
            .field("counts", &self.counts)
            .field("selected", &self.selected)
            .finish()
    }
}
