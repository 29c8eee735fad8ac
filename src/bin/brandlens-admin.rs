use anyhow::Result;
use clap::{Parser, Subcommand};
use std::sync::Arc;

use brandlens::config::{Config, DatabaseBackend};
use brandlens::models::AnalyticsConfig;
use brandlens::storage::{PostgresStorage, SqliteStorage, Storage};

#[derive(Parser)]
#[command(name = "brandlens-admin")]
#[command(about = "Brandlens operator CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Enable website tracking for a brand
    EnableTracking {
        /// Brand identifier
        brand_id: String,
        /// Website property identifier at the analytics provider
        property_id: String,
    },
    /// Disable website tracking for a brand
    DisableTracking {
        /// Brand identifier
        brand_id: String,
    },
    /// List a brand's active social accounts
    Accounts {
        /// Brand identifier
        brand_id: String,
    },
    /// Deactivate a social account (soft delete)
    Deactivate {
        /// Account id
        account_id: i64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let config = Config::from_env()?;

    let storage: Arc<dyn Storage> = match config.database.backend {
        DatabaseBackend::Sqlite => Arc::new(
            SqliteStorage::new(&config.database.url, config.database.max_connections).await?,
        ),
        DatabaseBackend::Postgres => Arc::new(
            PostgresStorage::new(&config.database.url, config.database.max_connections).await?,
        ),
    };

    // Ensure database is initialized
    storage.init().await?;

    match cli.command {
        Commands::EnableTracking {
            brand_id,
            property_id,
        } => {
            storage
                .upsert_config(&AnalyticsConfig {
                    brand_id: brand_id.clone(),
                    property_id: property_id.clone(),
                    tracking_enabled: true,
                })
                .await?;
            println!("✓ Enabled tracking for brand '{brand_id}' on property '{property_id}'");
        }
        Commands::DisableTracking { brand_id } => {
            match storage.get_config(&brand_id).await? {
                Some(mut existing) => {
                    existing.tracking_enabled = false;
                    storage.upsert_config(&existing).await?;
                    println!("✓ Disabled tracking for brand '{brand_id}'");
                }
                None => {
                    println!("⚠ Brand '{brand_id}' has no analytics configuration");
                }
            }
        }
        Commands::Accounts { brand_id } => {
            let accounts = storage.list_active_accounts(&brand_id).await?;
            if accounts.is_empty() {
                println!("No active social accounts for brand '{brand_id}'.");
            } else {
                println!("{:<8} {:<24} {:<12} {}", "ID", "Username", "Kind", "Last sync");
                println!("{}", "-".repeat(64));
                for account in accounts {
                    let last_sync = account
                        .last_synced_at
                        .map(|t| t.to_string())
                        .unwrap_or_else(|| "never".to_string());
                    println!(
                        "{:<8} {:<24} {:<12} {}",
                        account.id, account.username, account.account_kind, last_sync
                    );
                }
            }
        }
        Commands::Deactivate { account_id } => {
            let deactivated = storage.deactivate_account(account_id).await?;
            if deactivated {
                println!("✓ Deactivated account {account_id}");
            } else {
                println!("⚠ Account {account_id} not found");
            }
        }
    }

    Ok(())
}
