//! Knowledge management commands.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use kb_core::{Category, KbConfig};
use kb_embedding::KnowledgeBase;
use tracing::debug;

use crate::output;

#[derive(Args)]
pub struct AddArgs {
    /// Knowledge content (a rule or guideline)
    pub content: String,

    /// Category (brand_voice, technical_seo, content_quality, strategy, general)
    #[arg(long, short, default_value = "general")]
    pub category: String,
}

#[derive(Args)]
pub struct SearchArgs {
    /// Search query
    pub query: String,

    /// Number of results to return (defaults to search.default_limit)
    #[arg(long, short)]
    pub limit: Option<usize>,

    /// Print results as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct ListArgs {
    /// Print entries as JSON (embeddings omitted)
    #[arg(long)]
    pub json: bool,
}

async fn open(config: &KbConfig) -> Result<KnowledgeBase> {
    KnowledgeBase::from_config(config)
        .await
        .context("Failed to initialize knowledge base")
}

/// Add a knowledge entry.
pub async fn cmd_add(config: &KbConfig, args: AddArgs) -> Result<()> {
    let category: Category = args.category.parse()?;
    let kb = open(config).await?;

    debug!(category = %category, chars = args.content.chars().count(), "Adding knowledge");
    println!("{}", "Adding knowledge...".dimmed());

    let doc = kb.add(&args.content, category).await?;

    println!(
        "{} Knowledge added (id: {}, category: {}, embedding: {} dims)",
        "✓".green().bold(),
        output::short_id(&doc.id).dimmed(),
        doc.category.as_str().cyan(),
        doc.dimensions()
    );

    Ok(())
}

/// Retrieve the most similar entries.
pub async fn cmd_search(config: &KbConfig, args: SearchArgs) -> Result<()> {
    let kb = open(config).await?;
    let limit = args.limit.unwrap_or(kb.default_limit());

    if !args.json {
        println!("{}", "Searching...".dimmed());
    }

    let results = kb.find_similar(&args.query, limit).await;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&results)?);
    } else {
        output::print_results(&results);
    }

    Ok(())
}

/// List all entries.
pub async fn cmd_list(config: &KbConfig, args: ListArgs) -> Result<()> {
    let kb = open(config).await?;
    let docs = kb.list_all().await?;

    if args.json {
        let summaries: Vec<kb_core::DocumentSummary> = docs.iter().map(Into::into).collect();
        println!("{}", serde_json::to_string_pretty(&summaries)?);
    } else {
        output::print_documents_table(&docs);
    }

    Ok(())
}

/// Load the default rules.
pub async fn cmd_seed(config: &KbConfig) -> Result<()> {
    let kb = open(config).await?;

    println!("{}", "Seeding knowledge base with brand & SEO rules...".bold());

    let added = kb.seed_defaults().await.context("Seeding stopped")?;

    for doc in &added {
        println!(
            "  {} [{}] {}",
            "✓".green(),
            doc.category.as_str().cyan(),
            output::truncate(&doc.content, 60)
        );
    }
    println!("{} Seeded {} entries", "✓".green().bold(), added.len());

    Ok(())
}
