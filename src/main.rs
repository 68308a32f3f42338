use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use proxy_client::{ProxyClient, ProxyConfig};

#[derive(Parser)]
#[command(name = "proxy-client", version, about = "Proxy Service client (document analysis)")]
struct AppCli {
    /// Config file path
    #[arg(short, long, default_value = "proxy.json", global = true)]
    config: String,

    /// Subcommands
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check Proxy Service availability
    Health,
    /// Show Proxy Service status and metrics
    Status,
    /// Fetch order details
    Order { id: String },
    /// Fetch order processing status
    OrderStatus { id: String },
    /// Fetch order analysis results
    Results { id: String },
    /// Cancel an order
    Cancel { id: String },
    /// List a user's orders
    Orders { user_id: i64 },
}

fn load_config(path: &str) -> Result<ProxyConfig> {
    if std::path::Path::new(path).exists() {
        return ProxyConfig::from_file(path);
    }
    match ProxyConfig::from_env().context("reading proxy environment")? {
        Some(config) => Ok(config),
        None => bail!(
            "no config file at {path} and PROXY_SERVICE_URL/PROXY_JWT_SECRET not set"
        ),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    proxy_client::utils::logging::init();

    let args = AppCli::parse();
    let config = load_config(&args.config)?;
    let client = ProxyClient::new(config).context("building proxy client")?;

    match args.command {
        Commands::Health => {
            if client.health_check().await {
                info!("Proxy Service is healthy");
            } else {
                bail!("Proxy Service is unavailable");
            }
        }
        Commands::Status => match client.get_service_status().await {
            Some(status) => println!("{}", serde_json::to_string_pretty(&status)?),
            None => bail!("service status unavailable"),
        },
        Commands::Order { id } => {
            let order = client.get_order(&id).await?;
            println!("{}", serde_json::to_string_pretty(&order)?);
        }
        Commands::OrderStatus { id } => {
            let status = client.get_order_status(&id).await?;
            println!("{}", serde_json::to_string_pretty(&status)?);
        }
        Commands::Results { id } => match client.get_order_results(&id).await? {
            Some(results) => println!("{}", serde_json::to_string_pretty(&results)?),
            None => info!("no results yet for order {id}"),
        },
        Commands::Cancel { id } => {
            if client.cancel_order(&id).await {
                info!("order {id} cancelled");
            } else {
                bail!("order {id} could not be cancelled");
            }
        }
        Commands::Orders { user_id } => {
            let orders = client.get_user_orders(user_id).await;
            println!("{}", serde_json::to_string_pretty(&orders)?);
        }
    }

    Ok(())
}
