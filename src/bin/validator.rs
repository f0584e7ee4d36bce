//! MCP-L Validator CLI
//!
//! Checks MCP-L messages stored as JSON against the schema.

use std::io::Read;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use mcpl::{McplConfig, SchemaValidator};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "mcpl-validate")]
#[command(about = "Validate MCP-L messages against the schema")]
#[command(version = mcpl::VERSION)]
struct Cli {
    /// Config file to load on top of the default locations
    #[arg(short, long)]
    config: Option<String>,

    /// Schema directory searched before the embedded schema
    #[arg(short, long)]
    schema_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a message file ("-" reads stdin)
    Check {
        /// JSON file holding the message
        file: String,
    },

    /// Show which schema would be used
    Schema,

    /// Print the effective configuration
    Config,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(2);
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<bool> {
    let mut config = McplConfig::load_from(cli.config.as_deref())?;
    if let Some(dir) = cli.schema_dir {
        config.schema.dir = Some(dir);
    }

    match cli.command {
        Commands::Check { file } => {
            let raw = read_input(&file)?;
            let message: serde_json::Value =
                serde_json::from_str(&raw).with_context(|| format!("{} is not valid JSON", file))?;

            let validator = SchemaValidator::from_config(&config);
            let errors = validator.validation_errors(&message)?;

            if errors.is_empty() {
                println!("✅ {} - valid", file);
                Ok(true)
            } else {
                println!("❌ {} - {} violation(s)", file, errors.len());
                for error in &errors {
                    println!("   └─ {}", error);
                }
                Ok(false)
            }
        }

        Commands::Schema => {
            let validator = SchemaValidator::from_config(&config);
            println!("Lookup order: {}", validator.loader().sources().join(" -> "));

            let schema = validator.load_schema()?;
            println!("Origin:   {}", schema.origin);
            println!("Checksum: {}", schema.checksum);
            if let Some(title) = schema.document.get("title").and_then(|t| t.as_str()) {
                println!("Title:    {}", title);
            }
            Ok(true)
        }

        Commands::Config => {
            print!("{}", config.to_toml()?);
            Ok(true)
        }
    }
}

fn read_input(file: &str) -> anyhow::Result<String> {
    if file == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf).context("failed to read stdin")?;
        Ok(buf)
    } else {
        std::fs::read_to_string(file).with_context(|| format!("failed to read {}", file))
    }
}
