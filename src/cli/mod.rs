//! Command-line interface for bibliotechka.
//!
//! Provides commands for resolving resource links, printing group pages,
//! the home page overview, the updates feed and the admin version listing,
//! plus the pure identifier helpers.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::info;

use crate::catalog::{group_overview, version_listing, CatalogAggregator, UpdatesFeed};
use crate::config::{self, ResolvedConfig};
use crate::domain::{Status, StatusFilter};
use crate::identifier::{anchor_id, build_seo_segment, canonical_path};
use crate::resolver::{Resolution, Resolver};
use crate::store::ResourceStore;

/// bibliotechka - catalog resolver and aggregator
#[derive(Parser, Debug)]
#[command(name = "bibliotechka")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Print machine-readable JSON instead of tables
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Resolve a `/{group}/{segment}` link to a resource
    Resolve {
        /// Group slug (first path segment)
        group: String,

        /// Resource segment (UUID, title-id, numeric id or short id)
        segment: String,
    },

    /// Show a group page grouped by subgroup
    Group {
        /// Group slug
        slug: String,

        /// Statuses to include (comma-separated, default: published)
        #[arg(short, long, value_delimiter = ',')]
        status: Vec<String>,
    },

    /// List groups with resource counts
    Groups {
        /// Statuses to include (comma-separated, default: published)
        #[arg(short, long, value_delimiter = ',')]
        status: Vec<String>,
    },

    /// Show the updates feed
    Updates,

    /// List release versions with resource counts
    Versions,

    /// Build the readable segment for a title and id
    SeoUrl {
        title: String,

        id: String,

        /// Print the full path under this group
        #[arg(short, long)]
        group: Option<String>,
    },

    /// Print the anchor id for a label
    Anchor { text: String },

    /// Show resolved configuration (debug)
    Config,
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(self) -> Result<()> {
        let json = self.json;
        match self.command {
            Commands::Resolve { group, segment } => resolve(&group, &segment, json).await,
            Commands::Group { slug, status } => show_group(&slug, &status, json).await,
            Commands::Groups { status } => list_groups(&status, json).await,
            Commands::Updates => show_updates(json).await,
            Commands::Versions => list_versions(json).await,
            Commands::SeoUrl { title, id, group } => {
                match group {
                    Some(group) => println!("{}", canonical_path(&group, &title, &id)),
                    None => println!("{}", build_seo_segment(&title, &id)),
                }
                Ok(())
            }
            Commands::Anchor { text } => {
                println!("{}", anchor_id(&text));
                Ok(())
            }
            Commands::Config => show_config(),
        }
    }
}

/// Parse `--status` values; none means the public view
fn parse_status_filter(values: &[String]) -> Result<StatusFilter> {
    if values.is_empty() {
        return Ok(StatusFilter::default());
    }

    let statuses = values
        .iter()
        .map(|v| {
            v.parse::<Status>()
                .with_context(|| format!("Invalid status: {}", v))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(StatusFilter::only(statuses))
}

fn open_store() -> Result<(&'static ResolvedConfig, Box<dyn ResourceStore>)> {
    let cfg = config::config()?;
    let store = cfg.open_store()?;
    Ok((cfg, store))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let out = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{}", out);
    Ok(())
}

/// Resolve a link and print the resource
async fn resolve(group: &str, segment: &str, json: bool) -> Result<()> {
    let (cfg, store) = open_store()?;
    let resolver = Resolver::new(store.as_ref(), cfg.resolver);

    let resolution = resolver
        .resolve_in_group(group, segment)
        .await
        .with_context(|| format!("Failed to resolve /{}/{}", group, segment))?;

    let reference = match resolution {
        Resolution::Found(reference) => reference,
        Resolution::NotFound => {
            info!(group, segment, "Not found");
            eprintln!("Not found: /{}/{}", group, segment);
            std::process::exit(1);
        }
    };

    info!(
        scheme = %reference.scheme,
        key = %reference.key,
        "Resolved"
    );

    if json {
        return print_json(&reference);
    }

    let resource = &reference.resource;
    println!("Title:       {}", resource.display_title());
    println!("Scheme:      {} ({})", reference.scheme, reference.key);
    if let Some(id) = resource.id {
        println!("UUID:        {}", id);
    }
    if let Some(slug) = resource.slug {
        println!("Slug:        {}", slug);
    }
    if let Some(short_id) = &resource.short_id {
        println!("Short id:    {}", short_id);
    }
    println!("Status:      {}", resource.status);
    if let Some(description) = resource.display_description() {
        println!("Description: {}", description);
    }
    if let Some(author) = resource.display_author() {
        println!("Author:      {}", author);
    }
    if let Some(id) = resource.slug.map(|n| n.to_string()).or(resource.short_id.clone()) {
        println!("Canonical:   {}", canonical_path(group, &resource.title, &id));
    }
    println!(
        "Screenshot:  {}",
        resource.screenshot_url(cfg.public_url.as_deref())
    );

    if !resource.links.is_empty() {
        println!("\nLinks:");
        for link in &resource.links {
            println!("  {} - {}", link.title, link.url);
        }
    }

    Ok(())
}

/// Print a group page
async fn show_group(slug: &str, status: &[String], json: bool) -> Result<()> {
    let filter = parse_status_filter(status)?;
    let (cfg, store) = open_store()?;

    let group = store
        .find_group_by_slug_or_translation(slug)
        .await?
        .with_context(|| format!("Group not found: {}", slug))?;
    let key = group
        .key(cfg.resolver.group_scheme)
        .with_context(|| format!("Group '{}' has no legacy name to match resources by", slug))?;

    let resources = store.list_by_group(&key, &filter).await?;
    let subgroups = store.list_subgroups().await?;
    let aggregate = CatalogAggregator::new()
        .with_subgroups(subgroups)
        .aggregate(resources, &filter);

    if json {
        return print_json(&aggregate);
    }

    println!("{} ({} resources)", group.display_name(), aggregate.total);
    if let Some(description) = &group.description {
        println!("{}", description);
    }

    if aggregate.is_empty() {
        println!("\nNo resources");
        return Ok(());
    }

    if aggregate.has_navigation() {
        println!();
        for section in &aggregate.sections {
            println!("  #{:<30} {} ({})", section.anchor, section.label, section.len());
        }
    }

    for section in &aggregate.sections {
        println!("\n{} [#{}]", section.label, section.anchor);
        println!("{}", "-".repeat(60));
        for resource in &section.resources {
            let segment = resource
                .slug
                .map(|n| n.to_string())
                .or(resource.short_id.clone())
                .map(|id| build_seo_segment(&resource.title, &id))
                .unwrap_or_default();
            println!("  {:<40} {}", resource.display_title(), segment);
        }
    }

    Ok(())
}

/// Print the home page overview
async fn list_groups(status: &[String], json: bool) -> Result<()> {
    let filter = parse_status_filter(status)?;
    let (cfg, store) = open_store()?;

    let resources = store.list_resources(&filter).await?;
    let groups = store.list_groups().await?;
    let translations = store.list_translations().await?;

    let overview = group_overview(
        &resources,
        &groups,
        &translations,
        cfg.resolver.group_scheme,
        &filter,
    );

    if json {
        return print_json(&overview);
    }

    if overview.is_empty() {
        println!("No groups found");
        return Ok(());
    }

    println!("{:<30} {:<30} {:>6}", "SLUG", "NAME", "COUNT");
    println!("{}", "-".repeat(68));
    for group in overview {
        println!(
            "{:<30} {:<30} {:>6}",
            group.slug, group.display_name, group.count
        );
    }

    Ok(())
}

/// Print the updates feed
async fn show_updates(json: bool) -> Result<()> {
    let (_, store) = open_store()?;

    let versions = store.list_versions().await?;
    let resources = store.list_resources(&StatusFilter::published_only()).await?;
    let translations = store.list_translations().await?;

    let updates = UpdatesFeed::new()
        .with_translations(translations)
        .build(versions, &resources);

    if json {
        return print_json(&updates);
    }

    if updates.is_empty() {
        println!("No updates yet");
        return Ok(());
    }

    for update in updates {
        let date = update
            .version
            .release_date
            .map(|d| d.format("%d.%m.%Y").to_string())
            .unwrap_or_else(|| "undated".to_string());
        let name = update
            .version
            .display_name
            .as_deref()
            .unwrap_or(&update.version.version);

        println!("\n{} ({})", name, date);
        if let Some(description) = &update.version.description {
            println!("{}", description);
        }
        for entry in update.entries {
            println!(
                "  {:<40} {}",
                entry.title,
                entry.path.unwrap_or_default()
            );
        }
    }

    Ok(())
}

/// Print every version with its resource count
async fn list_versions(json: bool) -> Result<()> {
    let (_, store) = open_store()?;

    let versions = store.list_versions().await?;
    let resources = store.list_all_resources().await?;
    let listing = version_listing(versions, &resources);

    if json {
        return print_json(&listing);
    }

    if listing.is_empty() {
        println!("No versions found");
        return Ok(());
    }

    println!("{:<6} {:<12} {:<12} {:>9}", "ID", "VERSION", "RELEASED", "RESOURCES");
    println!("{}", "-".repeat(42));
    for summary in listing {
        let date = summary
            .version
            .release_date
            .map(|d| d.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:<6} {:<12} {:<12} {:>9}",
            summary.version.slug, summary.version.version, date, summary.resource_count
        );
    }

    Ok(())
}

/// Print the resolved configuration
fn show_config() -> Result<()> {
    let cfg = config::config()?;

    let config_file = cfg
        .config_file
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "(none - using defaults)".to_string());

    println!("Config file: {}", config_file);
    println!();
    println!("Store:");
    println!("  Backend:   {}", cfg.backend);
    println!("  Database:  {}", cfg.database.display());
    println!("  URL:       {}", cfg.store_url.as_deref().unwrap_or("(not set)"));
    println!(
        "  API key:   {}",
        if cfg.api_key.is_some() { "(set)" } else { "(not set)" }
    );
    println!();
    println!("Schema:");
    println!("  Group scheme: {:?}", cfg.resolver.group_scheme);
    println!("  Trailing id:  {:?}", cfg.resolver.trailing_id);
    println!();
    println!(
        "Public storage: {}",
        cfg.public_url.as_deref().unwrap_or("(not set)")
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_status_filter() {
        assert_eq!(parse_status_filter(&[]).unwrap(), StatusFilter::default());

        let filter =
            parse_status_filter(&["archived".to_string(), "published".to_string()]).unwrap();
        assert!(filter.allows(&Status::Archived));
        assert!(filter.allows(&Status::Published));
        assert!(!filter.allows(&Status::Trash));

        assert!(parse_status_filter(&["draft".to_string()]).is_err());
    }

    #[test]
    fn test_cli_parses_commands() {
        let cli = Cli::try_parse_from([
            "bibliotechka",
            "group",
            "trainers",
            "--status",
            "published,archived",
        ])
        .unwrap();
        match cli.command {
            Commands::Group { slug, status } => {
                assert_eq!(slug, "trainers");
                assert_eq!(status, vec!["published", "archived"]);
            }
            other => panic!("unexpected command: {:?}", other),
        }

        let cli = Cli::try_parse_from(["bibliotechka", "--json", "resolve", "trainers", "302"])
            .unwrap();
        assert!(cli.json);
        assert!(matches!(cli.command, Commands::Resolve { .. }));
    }
}
