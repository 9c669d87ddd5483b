//! CLI administration tool for the URL shortening service.
//!
//! Inspects and maintains mappings directly in PostgreSQL, without going
//! through the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # List all mappings
//! cargo run --bin admin -- list
//!
//! # Totals, or details for one code
//! cargo run --bin admin -- stats
//! cargo run --bin admin -- stats 3fa9c1
//!
//! # Delete a mapping (asks for confirmation unless --yes)
//! cargo run --bin admin -- delete 3fa9c1
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! `DATABASE_URL`, or the `DB_*` components, as for the server.

use url_shortening::application::services::MappingService;
use url_shortening::config::{Config, StorageBackend, mask_connection_string};
use url_shortening::error::AppError;
use url_shortening::infrastructure::persistence::PgMappingRepository;
use url_shortening::server::connect_database;
use url_shortening::utils::code_generator::HashCodeGenerator;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Confirm;
use sqlx::PgPool;
use std::sync::Arc;

type Service = MappingService<PgMappingRepository, HashCodeGenerator>;

/// CLI tool for managing the URL shortening service.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level commands.
#[derive(Subcommand)]
enum Commands {
    /// List all mappings
    List,

    /// Show totals, or statistics for one code
    Stats {
        /// Short code to inspect
        code: Option<String>,
    },

    /// Permanently delete a mapping
    Delete {
        /// Short code to delete
        code: String,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,

    /// Show database info
    Info,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = Config::from_env()?;
    if config.storage_backend == StorageBackend::Memory {
        anyhow::bail!("The admin tool needs the PostgreSQL backend (STORAGE_BACKEND=postgres)");
    }

    let pool = connect_database(&config).await?;

    let repository = Arc::new(
        PgMappingRepository::new(Arc::new(pool.clone()))
            .with_operation_timeout(config.store_timeout()),
    );
    let generator = Arc::new(HashCodeGenerator::new(config.code_length)?);
    let service = MappingService::new(repository, generator);

    match cli.command {
        Commands::List => list_mappings(&service).await?,
        Commands::Stats { code: None } => handle_stats(&pool).await?,
        Commands::Stats { code: Some(code) } => show_mapping(&service, &code).await?,
        Commands::Delete { code, yes } => delete_mapping(&service, &code, yes).await?,
        Commands::Db { action } => handle_db_action(action, &pool, &config).await?,
    }

    Ok(())
}

/// Lists all mappings in creation order.
///
/// # Output Format
///
/// ```text
/// Mappings
///
///   ID    Code      Hits    Created           URL
///   ----------------------------------------------------------------------------
///   1     3fa9c1    42      2025-01-15 10:30  https://example.com
/// ```
async fn list_mappings(service: &Service) -> Result<()> {
    println!("{}", "Mappings".bright_blue().bold());
    println!();

    let mappings = service.list().await?;

    if mappings.is_empty() {
        println!("{}", "  No mappings found".yellow());
        return Ok(());
    }

    println!(
        "  {:<5} {:<9} {:<7} {:<17} {}",
        "ID".bright_white().bold(),
        "Code".bright_white().bold(),
        "Hits".bright_white().bold(),
        "Created".bright_white().bold(),
        "URL".bright_white().bold()
    );
    println!("  {}", "-".repeat(76).bright_black());

    for mapping in &mappings {
        println!(
            "  {:<5} {:<9} {:<7} {:<17} {}",
            mapping.id.to_string().bright_black(),
            mapping.code.cyan(),
            mapping.access_count,
            mapping
                .created_at
                .format("%Y-%m-%d %H:%M")
                .to_string()
                .bright_black(),
            mapping.url
        );
    }

    println!();
    println!(
        "  Total: {}",
        mappings.len().to_string().bright_white().bold()
    );
    println!();

    Ok(())
}

/// Displays store-wide totals.
async fn handle_stats(pool: &PgPool) -> Result<()> {
    println!("{}", "Statistics".bright_blue().bold());
    println!();

    let (mappings, accesses): (i64, i64) = sqlx::query_as(
        "SELECT COUNT(*), COALESCE(SUM(access_count), 0)::BIGINT FROM mappings",
    )
    .fetch_one(pool)
    .await?;

    println!(
        "  Mappings:  {}",
        mappings.to_string().bright_green().bold()
    );
    println!(
        "  Accesses:  {}",
        accesses.to_string().bright_green().bold()
    );
    println!();

    Ok(())
}

/// Displays one mapping without counting an access.
async fn show_mapping(service: &Service, code: &str) -> Result<()> {
    let mapping = match service.stats(code).await {
        Ok(mapping) => mapping,
        Err(AppError::NotFound { .. }) => {
            println!("{} {}", "No mapping for code".yellow(), code.cyan());
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    println!("{}", "Mapping".bright_blue().bold());
    println!();
    println!("  Code:     {}", mapping.code.cyan());
    println!("  URL:      {}", mapping.url);
    println!(
        "  Hits:     {}",
        mapping.access_count.to_string().bright_green().bold()
    );
    println!("  Created:  {}", mapping.created_at.to_rfc3339());
    println!("  Updated:  {}", mapping.updated_at.to_rfc3339());
    println!();

    Ok(())
}

/// Deletes a mapping after confirmation (default: No).
async fn delete_mapping(service: &Service, code: &str, skip_confirm: bool) -> Result<()> {
    let mapping = match service.stats(code).await {
        Ok(mapping) => mapping,
        Err(AppError::NotFound { .. }) => {
            println!("{} {}", "No mapping for code".yellow(), code.cyan());
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    println!("  Code: {}", mapping.code.cyan());
    println!("  URL:  {}", mapping.url);
    println!("  Hits: {}", mapping.access_count);
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Delete this mapping?")
            .default(false)
            .interact()?;

        if !confirmed {
            println!("{}", "Cancelled".red());
            return Ok(());
        }
    }

    service.delete(code).await?;

    println!("{}", "Mapping deleted".green().bold());
    Ok(())
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, pool: &PgPool, config: &Config) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "Checking database connection...".bright_blue());

            sqlx::query("SELECT 1").fetch_one(pool).await?;

            println!("{}", "Database connection OK".green().bold());
        }
        DbAction::Info => {
            println!("{}", "Database Information".bright_blue().bold());
            println!();

            let version: String = sqlx::query_scalar("SELECT version()")
                .fetch_one(pool)
                .await?;

            println!(
                "  Target:     {}",
                mask_connection_string(&config.database_url).bright_white()
            );
            println!("  PostgreSQL: {}", version.bright_white());
            println!();
        }
    }

    Ok(())
}
