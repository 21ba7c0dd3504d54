// ABOUTME: CLI entry point for postgres-schema-diff
// ABOUTME: Parses commands, builds the diff configuration, and routes to handlers

use anyhow::Context;
use clap::{Parser, Subcommand};
use postgres_schema_diff::commands;
use postgres_schema_diff::config::{load_diff_config_from_file, DiffConfig};
use postgres_schema_diff::diff::{OutputFormat, SchemaKind};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "postgres-schema-diff")]
#[command(about = "Generate the DDL that makes a target PostgreSQL schema match a source", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare source and target schemas and print the DDL to apply to target
    Diff {
        #[arg(long)]
        source: String,
        #[arg(long)]
        target: String,
        /// Schema to compare on both sides (default: public)
        #[arg(long)]
        schema: Option<String>,
        /// Object kinds to compare (comma-separated)
        #[arg(long, value_enum, value_delimiter = ',')]
        kinds: Option<Vec<SchemaKind>>,
        /// Path to a diff-config.toml with default settings
        #[arg(long = "config")]
        config_path: Option<PathBuf>,
        /// Write the script to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Sql)]
        format: OutputFormat,
        /// Length for varchar columns that have no maximum length
        #[arg(long)]
        varchar_fallback_length: Option<u32>,
        /// Emit DROP DEFAULT when only the target has a column default
        #[arg(long)]
        drop_orphaned_defaults: bool,
        /// Exit with status 1 when the schemas differ
        #[arg(long)]
        exit_code: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so stdout carries only the generated script
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Diff {
            source,
            target,
            schema,
            kinds,
            config_path,
            output,
            format,
            varchar_fallback_length,
            drop_orphaned_defaults,
            exit_code,
        } => {
            let mut config = match &config_path {
                Some(path) => load_diff_config_from_file(path)?,
                None => DiffConfig::default(),
            };
            if let Some(schema) = schema {
                config.schema = schema;
            }
            if let Some(kinds) = kinds {
                config.kinds = kinds;
            }
            if let Some(length) = varchar_fallback_length {
                config.varchar_fallback_length = length;
            }
            if drop_orphaned_defaults {
                config.drop_orphaned_defaults = true;
            }

            let summary = match &output {
                Some(path) => {
                    let file = File::create(path)
                        .with_context(|| format!("Failed to create {}", path.display()))?;
                    let mut writer = BufWriter::new(file);
                    let summary =
                        commands::diff(&source, &target, &config, format, &mut writer).await?;
                    writer.flush().context("Failed to write output file")?;
                    tracing::info!("Script written to {}", path.display());
                    summary
                }
                None => {
                    let mut stdout = std::io::stdout().lock();
                    commands::diff(&source, &target, &config, format, &mut stdout).await?
                }
            };

            if exit_code && summary.has_differences() {
                std::process::exit(1);
            }
            Ok(())
        }
    }
}
