mod support;

use std::collections::BTreeMap;
use std::sync::Arc;

use pretty_assertions::assert_eq;

use skillbox_core::facet::{ALL, FacetFilter, KnownCompanies, OwnerCompany};
use skillbox_core::skills::Skill;

use support::{installed, registry_skill};

fn by_owner(owners: &[&str]) -> Arc<Vec<Skill>> {
    Arc::new(
        owners
            .iter()
            .enumerate()
            .map(|(i, owner)| registry_skill(&format!("skill-{i}"), &format!("{owner}/skills")))
            .collect(),
    )
}

#[test]
fn company_counts_group_by_owner() {
    let mut filter = FacetFilter::by_company(Arc::new(OwnerCompany));
    filter.set_items(by_owner(&["acme", "acme", "zeta"]));

    let counts: Vec<_> = filter.counts().iter().collect();
    assert_eq!(counts, vec![(ALL, 3), ("acme", 2), ("zeta", 1)]);
}

#[test]
fn selection_narrows_results_in_order() {
    let mut filter = FacetFilter::by_company(Arc::new(OwnerCompany));
    filter.set_items(by_owner(&["acme", "zeta", "acme"]));

    filter.select("acme");

    let names: Vec<_> = filter.filtered().iter().map(|s| s.name.clone()).collect();
    assert_eq!(names, vec!["skill-0", "skill-2"]);
}

#[test]
fn vanished_selection_resets_to_all() {
    let mut filter = FacetFilter::by_company(Arc::new(OwnerCompany));
    filter.set_items(by_owner(&["acme", "zeta"]));
    filter.select("acme");
    assert_eq!(filter.selected(), "acme");

    let next = by_owner(&["zeta", "omega"]);
    filter.set_items(Arc::clone(&next));

    assert_eq!(filter.selected(), ALL);
    assert_eq!(filter.filtered().len(), next.len());
}

#[test]
fn surviving_selection_is_kept_across_refresh() {
    let mut filter = FacetFilter::by_company(Arc::new(OwnerCompany));
    filter.set_items(by_owner(&["acme", "zeta"]));
    filter.select("zeta");

    filter.set_items(by_owner(&["zeta", "zeta", "acme"]));

    assert_eq!(filter.selected(), "zeta");
    assert_eq!(filter.filtered().len(), 2);
}

#[test]
fn empty_collection_offers_only_all() {
    let mut filter = FacetFilter::by_company(Arc::new(OwnerCompany));
    filter.set_items(Arc::new(Vec::new()));

    let counts: Vec<_> = filter.counts().iter().collect();
    assert_eq!(counts, vec![(ALL, 0)]);
    assert!(filter.filtered().is_empty());
}

#[test]
fn company_table_merges_owners_into_one_bucket() {
    let mut table = BTreeMap::new();
    table.insert("anthropics".to_string(), "Anthropic".to_string());
    table.insert("anthropic-labs".to_string(), "Anthropic".to_string());
    let mut filter = FacetFilter::by_company(Arc::new(KnownCompanies::new(&table)));

    filter.set_items(by_owner(&["anthropics", "Anthropic-Labs", "vercel-labs"]));

    assert_eq!(filter.counts().get("Anthropic"), Some(2));
    assert_eq!(filter.counts().get("vercel-labs"), Some(1));
    assert_eq!(filter.counts().get("anthropics"), None);
}

#[test]
fn agent_facet_places_skill_in_every_agent_bucket() {
    let mut filter = FacetFilter::by_agent();
    filter.set_items(Arc::new(vec![
        installed("pdf", &["claude", "codex"]),
        installed("docx", &["claude"]),
        installed("orphan", &[]),
    ]));

    let counts: Vec<_> = filter.counts().iter().collect();
    assert_eq!(counts, vec![(ALL, 3), ("claude", 2), ("codex", 1)]);

    filter.select("codex");
    let names: Vec<_> = filter.filtered().iter().map(|s| s.name().to_string()).collect();
    assert_eq!(names, vec!["pdf"]);

    filter.select("claude");
    assert_eq!(filter.filtered().len(), 2);
}
