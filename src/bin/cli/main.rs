use anyhow::Result;
use clap::{Parser, Subcommand};
use s3_version_history::{ConfigManager, ConfiguredBucket, ObjectVersionStore};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "s3-version-history-cli")]
#[command(about = "Administration CLI for S3 bucket versioning", long_about = None)]
struct Cli {
    /// S3 endpoint URL
    #[arg(long, env = "S3_ENDPOINT")]
    endpoint: String,

    /// S3 region
    #[arg(long, env = "S3_REGION", default_value = "us-east-1")]
    region: String,

    /// S3 access key
    #[arg(long, env = "S3_ACCESS_KEY")]
    access_key: String,

    /// S3 secret key
    #[arg(long, env = "S3_SECRET_KEY")]
    secret_key: String,

    /// Comma-separated bucket names to administer
    #[arg(long, env = "S3_BUCKETS", value_delimiter = ',')]
    buckets: Vec<String>,

    /// Output format: text or json
    #[arg(long, default_value = "text")]
    output: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Report per-bucket versioning enablement
    Status,

    /// Enable versioning for one configured bucket
    Enable {
        /// Id of the bucket configuration to enable versioning for
        id: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let manager = ConfigManager::from_s3_endpoint(
        &cli.endpoint,
        &cli.region,
        &cli.access_key,
        &cli.secret_key,
        &cli.buckets,
    );

    match cli.command {
        Commands::Status => status(&manager, &cli.output).await,
        Commands::Enable { id } => enable(&manager, &id).await,
    }
}

async fn status(manager: &ConfigManager, output: &str) -> Result<()> {
    if output == "json" {
        let mut report = serde_json::Map::new();
        for config in manager.configs() {
            let entry = match config {
                ConfiguredBucket::Ready { id, connection } => serde_json::json!({
                    "id": id,
                    "enabled": connection.versioning_enabled().await?,
                }),
                ConfiguredBucket::Broken { id, error } => serde_json::json!({
                    "id": id,
                    "error": error,
                }),
            };
            report.insert(config.id().to_string(), entry);
        }
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    for config in manager.configs() {
        match config {
            ConfiguredBucket::Ready { id, connection } => {
                let enabled = connection.versioning_enabled().await?;
                println!("{}: {}", id, if enabled { "enabled" } else { "disabled" });
            }
            ConfiguredBucket::Broken { id, error } => {
                println!("{}: error: {}", id, error);
            }
        }
    }
    Ok(())
}

async fn enable(manager: &ConfigManager, id: &str) -> Result<()> {
    match manager.find(id) {
        Some(ConfiguredBucket::Ready { connection, .. }) => {
            connection.enable_versioning().await?;
            info!(bucket = id, "versioning enabled");
            println!("versioning enabled for {}", id);
            Ok(())
        }
        Some(ConfiguredBucket::Broken { error, .. }) => {
            eprintln!("config broken: {}", error);
            std::process::exit(1);
        }
        None => {
            eprintln!("config not found: {}", id);
            std::process::exit(1);
        }
    }
}
