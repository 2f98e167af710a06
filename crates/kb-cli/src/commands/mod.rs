//! CLI command definitions and handlers.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use kb_core::KbConfig;
use std::path::{Path, PathBuf};

pub mod knowledge;
pub mod serve;

/// Config file picked up from the working directory when --config is absent.
const DEFAULT_CONFIG_FILE: &str = "kb.toml";

/// Knowledge base for brand and SEO rules
#[derive(Parser)]
#[command(name = "kb")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to a TOML config file (defaults to ./kb.toml when present)
    #[arg(long, global = true, env = "KB_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Add a knowledge entry with its embedding
    Add(knowledge::AddArgs),

    /// Retrieve the entries most similar to a query
    Search(knowledge::SearchArgs),

    /// List every stored entry
    List(knowledge::ListArgs),

    /// Load the built-in brand and SEO rules
    Seed,

    /// Start the HTTP API
    Serve(serve::ServeArgs),
}

impl Cli {
    /// Resolve the configuration file path, if any.
    fn config_path(&self) -> Option<PathBuf> {
        self.config.clone().or_else(|| {
            let candidate = Path::new(DEFAULT_CONFIG_FILE);
            candidate.exists().then(|| candidate.to_path_buf())
        })
    }

    pub async fn execute(self) -> Result<()> {
        let path = self.config_path();
        let config = KbConfig::load(path.as_deref()).context("Failed to load configuration")?;

        match self.command {
            Commands::Add(args) => knowledge::cmd_add(&config, args).await,
            Commands::Search(args) => knowledge::cmd_search(&config, args).await,
            Commands::List(args) => knowledge::cmd_list(&config, args).await,
            Commands::Seed => knowledge::cmd_seed(&config).await,
            Commands::Serve(args) => serve::execute(config, args).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_add_with_category() {
        let cli = Cli::try_parse_from(["kb", "add", "Keep H1 short", "-c", "technical_seo"]).unwrap();
        match cli.command {
            Commands::Add(args) => {
                assert_eq!(args.content, "Keep H1 short");
                assert_eq!(args.category, "technical_seo");
            }
            _ => panic!("expected add"),
        }
    }

    #[test]
    fn test_parse_search_defaults_to_config_limit() {
        let cli = Cli::try_parse_from(["kb", "search", "alt text"]).unwrap();
        match cli.command {
            Commands::Search(args) => {
                assert_eq!(args.query, "alt text");
                assert_eq!(args.limit, None);
                assert!(!args.json);
            }
            _ => panic!("expected search"),
        }
    }

    #[test]
    fn test_category_short_flag_with_global_config() {
        let cli = Cli::try_parse_from(["kb", "add", "x", "-c", "strategy", "--config", "kb.toml"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("kb.toml")));
        match cli.command {
            Commands::Add(args) => assert_eq!(args.category, "strategy"),
            _ => panic!("expected add"),
        }
    }

    #[test]
    fn test_global_config_flag() {
        let cli = Cli::try_parse_from(["kb", "list", "--config", "custom.toml"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("custom.toml")));
    }

    #[test]
    fn test_serve_flags() {
        let cli = Cli::try_parse_from(["kb", "serve", "--port", "8080", "--log"]).unwrap();
        match cli.command {
            Commands::Serve(args) => {
                assert_eq!(args.port, Some(8080));
                assert!(args.log);
            }
            _ => panic!("expected serve"),
        }
    }
}
