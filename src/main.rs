use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::{error, info};

use brand_resolver::app::enrich_use_case::BrandEnrichmentUseCase;
use brand_resolver::app::ports::{BrandAssignmentOutputPort, RelationSourcePort};
use brand_resolver::config::Config;
use brand_resolver::domain::ScopeSelector;
use brand_resolver::infra::assignment_output_adapter::{
    FileAssignmentOutputAdapter, InMemoryAssignmentOutput,
};
use brand_resolver::infra::json_source_adapter::{JsonProductFeed, JsonRelationSource};
use brand_resolver::logging;
use brand_resolver::pipeline::{build_group_index, GroupIndex, MatchSelector};

#[derive(Parser)]
#[command(name = "brand_resolver")]
#[command(about = "Groups related manufacturer names and assigns canonical brands to products")]
#[command(version = "0.1.0")]
struct Cli {
    /// Config file (defaults to $BRAND_RESOLVER_CONFIG or config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build brand groups and print them as JSON
    Groups {
        #[arg(long)]
        relations: Option<PathBuf>,
        /// Write the groups here instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Resolve a single title to its canonical brand
    Match {
        #[arg(long)]
        relations: Option<PathBuf>,
        title: String,
    },
    /// Assign canonical brands to every unclassified product in a feed
    Assign {
        #[arg(long)]
        relations: Option<PathBuf>,
        /// Product file; may contain {source} and {country} placeholders
        #[arg(long)]
        products: Option<String>,
        #[arg(long)]
        output: Option<String>,
        #[arg(long)]
        source: Option<String>,
        #[arg(long)]
        country: Option<String>,
        /// Keep assignments in memory instead of writing them
        #[arg(long)]
        dry_run: bool,
    },
}

#[derive(Serialize)]
struct GroupView<'a> {
    canonical_brand: &'a str,
    brands: Vec<&'a str>,
}

async fn load_groups(config: &Config, relations: Option<PathBuf>) -> anyhow::Result<GroupIndex> {
    let path = relations.unwrap_or_else(|| PathBuf::from(&config.data.relations_path));
    let records = JsonRelationSource::new(&path)
        .load_relations()
        .await
        .with_context(|| format!("loading relations from {}", path.display()))?;
    Ok(build_group_index(&records))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    logging::init_logging();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    match cli.command {
        Commands::Groups { relations, output } => {
            let index = load_groups(&config, relations).await?;
            let view: Vec<GroupView<'_>> = index
                .groups()
                .map(|group| GroupView {
                    canonical_brand: &group.canonical_brand,
                    brands: group.brands.iter().map(String::as_str).collect(),
                })
                .collect();
            let json = serde_json::to_string_pretty(&view)?;

            match output {
                Some(path) => {
                    std::fs::write(&path, json)?;
                    info!("Wrote {} groups to {}", view.len(), path.display());
                }
                None => println!("{}", json),
            }
        }
        Commands::Match { relations, title } => {
            let index = Arc::new(load_groups(&config, relations).await?);
            let selector = MatchSelector::new(index, &config.matching.policy())?;

            match selector.select(&title) {
                Some(found) => println!(
                    "{} -> {} (matched '{}' at word {})",
                    title, found.canonical_brand, found.matched_brand, found.match_index
                ),
                None => println!("{} -> no match", title),
            }
        }
        Commands::Assign {
            relations,
            products,
            output,
            source,
            country,
            dry_run,
        } => {
            let index = Arc::new(load_groups(&config, relations).await?);
            let selector = Arc::new(MatchSelector::new(index, &config.matching.policy())?);

            let scope = ScopeSelector::new(
                source.unwrap_or_else(|| config.scope.source.clone()),
                country.unwrap_or_else(|| config.scope.country_code.clone()),
            );
            let feed = JsonProductFeed::new(
                products.unwrap_or_else(|| config.data.products_path.clone()),
            );

            let sink: Arc<dyn BrandAssignmentOutputPort> = if dry_run {
                Arc::new(InMemoryAssignmentOutput::new())
            } else {
                let path = output.unwrap_or_else(|| config.data.output_path.clone());
                Arc::new(FileAssignmentOutputAdapter::new(&path)?)
            };

            let use_case = BrandEnrichmentUseCase::new(selector, sink, scope);
            match use_case.run_from_feed(&feed).await {
                Ok(summary) => {
                    println!("{}", serde_json::to_string_pretty(&summary)?);
                }
                Err(e) => {
                    error!("Brand enrichment failed: {:#}", e);
                    return Err(e);
                }
            }
        }
    }

    Ok(())
}
