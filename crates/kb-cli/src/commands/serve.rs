//! Web server command.

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use kb_core::KbConfig;
use kb_embedding::KnowledgeBase;
use std::path::PathBuf;

#[derive(Args)]
pub struct ServeArgs {
    /// Port to listen on (defaults to server.port)
    #[arg(long)]
    pub port: Option<u16>,

    /// Host to bind to (defaults to server.host)
    #[arg(long)]
    pub host: Option<String>,

    /// Also write logs to a file
    #[arg(long)]
    pub log: bool,

    /// Log file path (defaults to ./kb-serve.log)
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

pub async fn execute(config: KbConfig, args: ServeArgs) -> Result<()> {
    let host = args.host.unwrap_or_else(|| config.server.host.clone());
    let port = args.port.unwrap_or(config.server.port);

    let kb = KnowledgeBase::from_config(&config).await?;

    println!();
    println!("  {} {}", "KB".cyan().bold(), "Web Server".bold());
    println!();
    println!("  {}       http://{}:{}/api", "API".green(), host, port);
    println!("  {}    http://{}:{}/health", "Health".green(), host, port);
    println!(
        "  {}  {} / {}",
        "Backends".green(),
        config.embedding.backend,
        config.storage.backend
    );
    println!();
    println!("  {}", "Ctrl+C to stop".dimmed());
    println!();

    kb_web::run_server(kb, &host, port).await?;

    Ok(())
}
