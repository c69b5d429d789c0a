//! skillbox - Agent Skills Browser
//!
//! Usage:
//!   skillbox search <query>     # Search the registry
//!   skillbox search             # Interactive search session
//!   skillbox trending           # Popular skills
//!   skillbox installed          # Installed skills with update status
//!   skillbox update             # Update all installed skills
//!   skillbox readme <owner/repo>
//!   skillbox config

mod interactive;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use console::style;
use dialoguer::theme::ColorfulTheme;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use skillbox_core::config::{SettingsStore, to_toml};
use skillbox_core::context::AppContext;
use skillbox_core::facet::{FacetCounts, FacetFilter};
use skillbox_core::registry::{MIN_QUERY_CHARS, is_searchable};
use skillbox_core::skills::{InstalledSkill, Skill, format_install_count};
use skillbox_core::trending::TrendingView;

use crate::interactive::UpdateFlow;

#[derive(Parser)]
#[command(name = "skillbox")]
#[command(about = "Search, browse and update agent skills", long_about = None)]
struct Cli {
    /// Settings directory (defaults to the platform config dir)
    #[arg(long, global = true, value_name = "DIR")]
    config_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search the skills registry
    ///
    /// Without a query, opens an interactive session where each line is
    /// searched as it is submitted.
    Search {
        /// Search text (at least two characters)
        query: Option<String>,

        /// Only show skills from this company
        #[arg(long)]
        company: Option<String>,

        /// Output format
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// Show popular skills
    Trending {
        /// Only show skills whose name, owner or repo contains this text
        #[arg(long)]
        filter: Option<String>,

        /// Only show skills from this owner
        #[arg(long)]
        owner: Option<String>,

        /// Maximum number of entries to show
        #[arg(short = 'n', long)]
        limit: Option<usize>,

        /// Output format
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// List installed skills and whether updates are available
    #[command(alias = "ls")]
    Installed {
        /// Only show skills used by this agent
        #[arg(long)]
        agent: Option<String>,

        /// Output format
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// Update all installed skills
    Update {
        /// Skip the confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Print the README of a skill's repository
    Readme {
        /// Repository as `owner/repo`
        source: String,
    },

    /// Show the settings file location and effective settings
    Config {
        /// Print only the settings file path
        #[arg(long)]
        path: bool,
    },
}

#[derive(Clone, Copy, ValueEnum, Default)]
enum OutputFormat {
    /// Human-readable table
    #[default]
    Table,
    /// Machine-readable JSON
    Json,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "skillbox=info,warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let store = match &cli.config_dir {
        Some(dir) => SettingsStore::from_dir(dir),
        None => SettingsStore::from_default_location()?,
    };
    let ctx = AppContext::from_store(&store)?;
    tracing::debug!(
        settings = %store.settings_path().display(),
        registry = ctx.registry().base_url(),
        "context ready"
    );

    run_cli(cli.command, &ctx, &store).await
}

async fn run_cli(command: Commands, ctx: &AppContext, store: &SettingsStore) -> Result<()> {
    match command {
        Commands::Search {
            query: Some(query),
            company,
            format,
        } => run_search(ctx, &query, company.as_deref(), format).await?,
        Commands::Search { query: None, .. } => run_search_session(ctx).await?,
        Commands::Trending {
            filter,
            owner,
            limit,
            format,
        } => run_trending(ctx, filter.as_deref(), owner.as_deref(), limit, format).await?,
        Commands::Installed { agent, format } => {
            run_installed(ctx, agent.as_deref(), format).await?
        }
        Commands::Update { yes } => run_update(ctx, yes).await?,
        Commands::Readme { source } => run_readme(ctx, &source).await?,
        Commands::Config { path } => {
            if path {
                println!("{}", store.settings_path().display());
            } else {
                println!("# {}", store.settings_path().display());
                print!("{}", to_toml(ctx.settings())?);
            }
        }
    }
    Ok(())
}

async fn run_search(
    ctx: &AppContext,
    query: &str,
    company: Option<&str>,
    format: OutputFormat,
) -> Result<()> {
    if !is_searchable(query) {
        println!("Type at least {MIN_QUERY_CHARS} characters to search.");
        return Ok(());
    }

    let skills = ctx
        .registry()
        .search_skills(query)
        .await
        .with_context(|| format!("Search for '{}' failed", query.trim()))?;

    let mut companies = ctx.company_filter();
    companies.set_items(Arc::new(skills));
    if let Some(company) = company {
        select_facet(&mut companies, company);
    }

    match format {
        OutputFormat::Table => {
            print_facets("Companies", companies.counts(), companies.selected());
            print_skill_table(&companies.filtered());
        }
        OutputFormat::Json => print_json(&companies.filtered())?,
    }
    Ok(())
}

/// Prompt for queries until an empty line, searching each through the
/// debounced coordinator.
async fn run_search_session(ctx: &AppContext) -> Result<()> {
    let search = ctx.debounced_search();
    let mut companies = ctx.company_filter();
    let theme = ColorfulTheme::default();
    let mut previous = String::new();

    loop {
        let input = tokio::task::block_in_place(|| interactive::prompt_query(&theme, &previous))?;
        if input.trim().is_empty() {
            break;
        }
        if !is_searchable(&input) {
            println!("Type at least {MIN_QUERY_CHARS} characters to search.");
            continue;
        }

        search.set_query(&input);
        let state = search.settled().await;

        if let Some(err) = &state.error {
            eprintln!("{} {}", style("✗ Search failed:").red(), err);
            if state.data.is_some() {
                eprintln!("  Showing previous results.");
            }
        }
        if let Some(data) = &state.data {
            companies.set_items(Arc::clone(data));
            print_facets("Companies", companies.counts(), companies.selected());
            print_skill_table(&companies.filtered());
        }
        previous = input;
    }

    Ok(())
}

async fn run_trending(
    ctx: &AppContext,
    filter: Option<&str>,
    owner: Option<&str>,
    limit: Option<usize>,
    format: OutputFormat,
) -> Result<()> {
    let popular = ctx
        .registry()
        .popular()
        .await
        .context("Failed to load trending skills")?;

    let mut view = TrendingView::new(popular);
    if let Some(text) = filter {
        view.set_filter(text);
    }
    if let Some(owner) = owner {
        view.select_owner(owner);
        if view.selected_owner() != owner {
            eprintln!("No trending skills from '{owner}'; showing all owners.");
        }
    }

    let mut visible = view.visible();
    if let Some(limit) = limit {
        visible.truncate(limit);
    }

    match format {
        OutputFormat::Table => {
            print_facets("Owners", view.owners(), view.selected_owner());
            print_trending_table(&visible);
        }
        OutputFormat::Json => print_json(&visible)?,
    }
    Ok(())
}

async fn run_installed(ctx: &AppContext, agent: Option<&str>, format: OutputFormat) -> Result<()> {
    let installed = ctx.installed_skills();
    let state = installed.revalidate().await;
    if let Some(err) = &state.error {
        anyhow::bail!("Failed to list installed skills: {err}");
    }
    let Some(snapshot) = state.data else {
        return Ok(());
    };

    let mut agents = FacetFilter::by_agent();
    agents.set_items(Arc::clone(&snapshot.skills));
    if let Some(agent) = agent {
        select_facet(&mut agents, agent);
    }

    match format {
        OutputFormat::Table => {
            if let Some(err) = &snapshot.update_check_error {
                eprintln!(
                    "{} Could not check for updates: {}",
                    style("⚠").yellow(),
                    err
                );
            }
            print_facets("Agents", agents.counts(), agents.selected());
            print_installed_table(&agents.filtered());
        }
        OutputFormat::Json => print_json(&agents.filtered())?,
    }
    Ok(())
}

async fn run_update(ctx: &AppContext, yes: bool) -> Result<()> {
    let installed = ctx.installed_skills();
    let state = installed.revalidate().await;
    if let Some(err) = &state.error {
        anyhow::bail!("Failed to list installed skills: {err}");
    }
    let Some(snapshot) = state.data else {
        return Ok(());
    };

    let mut flow = UpdateFlow::new(yes);
    let confirmed = tokio::task::block_in_place(|| flow.confirm(&snapshot))?;
    if !confirmed {
        return Ok(());
    }

    let report = installed.update_all().await.context("Update failed")?;
    if !report.output.is_empty() {
        println!("{}", report.output);
    }
    println!("{} Skills updated", style("✓").green());

    let remaining = installed
        .state()
        .data
        .map(|refreshed| refreshed.updatable_count())
        .unwrap_or(0);
    if remaining > 0 {
        println!("  {remaining} skill(s) still report updates");
    }
    Ok(())
}

async fn run_readme(ctx: &AppContext, source: &str) -> Result<()> {
    let source = source.trim().trim_end_matches('/');
    let name = source.rsplit('/').next().unwrap_or(source);
    let skill = Skill::from_source(
        source,
        name,
        name,
        Some(source),
        ctx.registry().base_url(),
    );
    if skill.owner.is_empty() {
        anyhow::bail!("Expected a repository as 'owner/repo', got '{source}'");
    }

    match ctx.registry().readme(&skill).await {
        Some(readme) => println!("{readme}"),
        None => println!("No README found for {source}"),
    }
    Ok(())
}

/// Select `key`, reporting when it is not present in the data.
fn select_facet<T>(facet: &mut FacetFilter<T>, key: &str) {
    facet.select(key);
    if facet.selected() != key {
        eprintln!("No results for '{key}'; showing all.");
    }
}

fn print_facets(label: &str, counts: &FacetCounts, selected: &str) {
    if counts.is_empty() {
        return;
    }
    let entries: Vec<String> = counts
        .iter()
        .map(|(key, count)| {
            let entry = format!("{key} ({count})");
            if key == selected {
                style(entry).bold().cyan().to_string()
            } else {
                entry
            }
        })
        .collect();
    println!("{}: {}", style(label).bold(), entries.join("  "));
    println!();
}

fn print_skill_table(skills: &[&Skill]) {
    if skills.is_empty() {
        println!("No skills found.");
        return;
    }

    println!(
        "{:<32} {:<32} {:>9}  Install",
        "Name", "Source", "Installs"
    );
    println!("{}", "-".repeat(100));

    for skill in skills {
        println!(
            "{:<32} {:<32} {:>9}  {}",
            skill.name,
            skill.source().unwrap_or_else(|| "-".to_string()),
            format_install_count(skill.install_count),
            skill.install_command
        );
    }
}

fn print_trending_table(skills: &[Skill]) {
    if skills.is_empty() {
        println!("No trending skills match.");
        return;
    }

    println!("{:>4}  {:<32} {:<32} {:>9}", "#", "Name", "Source", "Installs");
    println!("{}", "-".repeat(82));

    for skill in skills {
        println!(
            "{:>4}  {:<32} {:<32} {:>9}",
            skill.rank.unwrap_or_default(),
            skill.name,
            skill.source().unwrap_or_else(|| "-".to_string()),
            format_install_count(skill.install_count)
        );
    }
}

fn print_installed_table(skills: &[&InstalledSkill]) {
    if skills.is_empty() {
        println!("No skills installed.");
        println!("Find some with: skillbox search <query>");
        return;
    }

    println!("{:<32} {:<32} {:<24} Status", "Name", "Source", "Agents");
    println!("{}", "-".repeat(100));

    for skill in skills {
        let agents = skill.agents.iter().cloned().collect::<Vec<_>>().join(", ");
        let status = if skill.has_update {
            style("update available").yellow().to_string()
        } else {
            "up to date".to_string()
        };
        println!(
            "{:<32} {:<32} {:<24} {}",
            skill.name(),
            skill.skill.source().unwrap_or_else(|| "-".to_string()),
            if agents.is_empty() { "-" } else { agents.as_str() },
            status
        );
    }
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_search_with_company() {
        let cli = Cli::try_parse_from([
            "skillbox",
            "search",
            "react",
            "--company",
            "vercel-labs",
            "-f",
            "json",
        ])
        .unwrap();

        match cli.command {
            Commands::Search {
                query,
                company,
                format,
            } => {
                assert_eq!(query.as_deref(), Some("react"));
                assert_eq!(company.as_deref(), Some("vercel-labs"));
                assert!(matches!(format, OutputFormat::Json));
            }
            _ => panic!("expected search"),
        }
    }

    #[test]
    fn test_cli_search_without_query_is_interactive() {
        let cli = Cli::try_parse_from(["skillbox", "search"]).unwrap();
        assert!(matches!(cli.command, Commands::Search { query: None, .. }));
    }

    #[test]
    fn test_cli_global_config_dir() {
        let cli =
            Cli::try_parse_from(["skillbox", "update", "-y", "--config-dir", "/tmp/sb"]).unwrap();

        assert_eq!(cli.config_dir, Some(PathBuf::from("/tmp/sb")));
        assert!(matches!(cli.command, Commands::Update { yes: true }));
    }

    #[test]
    fn test_cli_installed_alias() {
        let cli = Cli::try_parse_from(["skillbox", "ls", "--agent", "codex"]).unwrap();
        match cli.command {
            Commands::Installed { agent, .. } => assert_eq!(agent.as_deref(), Some("codex")),
            _ => panic!("expected installed"),
        }
    }
}
