//! temperament_admin: schema and reference-data administration.
//!
//! Usage:
//!   temperament_admin migrate
//!   temperament_admin import-temperaments data/temperamentos.csv
//!   temperament_admin import-subtemperaments data/subtemperamentos.csv
//!   temperament_admin upload-template --name template_pt template_pt.pdf

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use temperament_core::ports::TemplateStore;
use temperament_postgres::import::{import_subtemperaments, import_temperaments};
use temperament_postgres::{DatabaseConfig, PgTemplateStore};

#[derive(Parser)]
#[command(name = "temperament_admin")]
#[command(about = "Temperament test administration")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Apply database migrations
    Migrate,

    /// Import temperament texts from a ';'-separated CSV (14 columns, no header)
    ImportTemperaments {
        file: PathBuf,
    },

    /// Import sub-temperament texts from a ';'-separated CSV (4 columns, no header)
    ImportSubtemperaments {
        file: PathBuf,
    },

    /// Store a report template PDF, replacing any template of the same name
    UploadTemplate {
        /// Template name, e.g. template_pt or template_en
        #[arg(long)]
        name: String,
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();
    let pool = temperament_postgres::connect(&DatabaseConfig::default())
        .await
        .context("Failed to connect to database")?;

    match cli.command {
        Command::Migrate => {
            temperament_postgres::run_migrations(&pool).await?;
        }
        Command::ImportTemperaments { file } => {
            let summary = import_temperaments(&pool, &file).await?;
            println!(
                "Imported {} temperaments ({} rows skipped)",
                summary.imported, summary.skipped
            );
        }
        Command::ImportSubtemperaments { file } => {
            let summary = import_subtemperaments(&pool, &file).await?;
            println!(
                "Imported {} sub-temperaments ({} rows skipped)",
                summary.imported, summary.skipped
            );
        }
        Command::UploadTemplate { name, file } => {
            let bytes = tokio::fs::read(&file)
                .await
                .with_context(|| format!("Failed to read {}", file.display()))?;
            if lopdf::Document::load_mem(&bytes).is_err() {
                anyhow::bail!("{} is not a readable PDF", file.display());
            }
            PgTemplateStore::new(pool)
                .save_template(&name, &bytes)
                .await?;
            println!("Stored template {} ({} bytes)", name, bytes.len());
        }
    }
    Ok(())
}
