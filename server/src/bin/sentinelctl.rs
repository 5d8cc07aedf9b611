//! Sentinel CLI - Command-line client for the Sentinel API
//!
//! Lists servers and recommendations, triggers cleanups, asks for
//! deletion advice, and prints the action log.

use clap::{Parser, Subcommand};
use reqwest::Client;
use serde_json::{json, Value};
use std::process;
use tracing::{error, info};

/// Sentinel CLI - disk cleanup administration tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Server URL to connect to
    #[arg(
        short,
        long,
        default_value = "http://localhost:8080",
        env = "SENTINEL_URL"
    )]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Quick health check
    Health,

    /// Server status and fleet summary
    Status,

    /// Server inventory commands
    Servers {
        #[command(subcommand)]
        command: ServerCommands,
    },

    /// Run a cleanup on a server
    Cleanup {
        /// Target server address
        #[arg(short, long)]
        target: String,

        /// Username on the target
        #[arg(short = 'U', long)]
        username: String,

        /// Password on the target
        #[arg(short, long, env = "SENTINEL_CLEANUP_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Recommendation commands
    Recommendations {
        #[command(subcommand)]
        command: RecommendationCommands,
    },

    /// Show the action log
    Logs,
}

#[derive(Subcommand, Debug)]
enum ServerCommands {
    /// List servers
    List,

    /// Add a server
    Add {
        /// Display name
        name: String,

        /// IPv4 address
        ip_address: String,

        /// Total disk in GB
        #[arg(long)]
        total_disk: f64,

        /// Used disk in GB
        #[arg(long)]
        used_disk: f64,
    },

    /// Remove a server
    Remove {
        /// Server ID
        id: String,
    },

    /// Re-probe server statuses
    Refresh,
}

#[derive(Subcommand, Debug)]
enum RecommendationCommands {
    /// List recommendations
    List {
        /// Only show these servers (comma-separated names)
        #[arg(short, long)]
        servers: Option<String>,
    },

    /// Delete recommendations by id
    Delete {
        /// Recommendation IDs
        #[arg(required = true)]
        ids: Vec<String>,
    },

    /// Ask the AI advisor about a recommendation
    Advice {
        /// Recommendation ID
        id: String,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();
    let client = Client::new();

    let result = match cli.command {
        Commands::Health => get(&client, &cli.url, "/api/health").await,
        Commands::Status => handle_status(&client, &cli.url).await,
        Commands::Servers { command } => handle_servers(&client, &cli.url, command).await,
        Commands::Cleanup {
            target,
            username,
            password,
        } => handle_cleanup(&client, &cli.url, target, username, password).await,
        Commands::Recommendations { command } => {
            handle_recommendations(&client, &cli.url, command).await
        }
        Commands::Logs => get(&client, &cli.url, "/api/v1/logs").await,
    };

    if let Err(e) = result {
        error!("Command failed: {}", e);
        process::exit(1);
    }
}

fn print(value: &Value) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn get(client: &Client, base_url: &str, path: &str) -> anyhow::Result<()> {
    let url = format!("{}{}", base_url, path);
    let response = client.get(&url).send().await?;

    if !response.status().is_success() {
        anyhow::bail!("{} failed with status: {}", path, response.status());
    }
    print(&response.json().await?)
}

async fn post(client: &Client, base_url: &str, path: &str, body: Value) -> anyhow::Result<Value> {
    let url = format!("{}{}", base_url, path);
    let response = client.post(&url).json(&body).send().await?;
    let status = response.status();

    if !status.is_success() {
        let text = response.text().await.unwrap_or_default();
        anyhow::bail!("{} failed with status {}: {}", path, status, text);
    }
    Ok(response.json().await?)
}

async fn handle_status(client: &Client, base_url: &str) -> anyhow::Result<()> {
    get(client, base_url, "/api/status").await?;
    get(client, base_url, "/api/v1/dashboard").await
}

async fn handle_servers(
    client: &Client,
    base_url: &str,
    command: ServerCommands,
) -> anyhow::Result<()> {
    match command {
        ServerCommands::List => get(client, base_url, "/api/v1/servers").await,
        ServerCommands::Add {
            name,
            ip_address,
            total_disk,
            used_disk,
        } => {
            let body = json!({
                "name": name,
                "ipAddress": ip_address,
                "totalDisk": total_disk,
                "usedDisk": used_disk
            });
            print(&post(client, base_url, "/api/v1/servers", body).await?)
        }
        ServerCommands::Remove { id } => {
            let url = format!("{}/api/v1/servers/{}", base_url, id);
            let response = client.delete(&url).send().await?;
            if !response.status().is_success() {
                anyhow::bail!("Failed to remove {}: {}", id, response.status());
            }
            print(&response.json().await?)
        }
        ServerCommands::Refresh => {
            print(&post(client, base_url, "/api/v1/servers/refresh", json!({})).await?)
        }
    }
}

async fn handle_cleanup(
    client: &Client,
    base_url: &str,
    target: String,
    username: String,
    password: String,
) -> anyhow::Result<()> {
    info!("Running cleanup on {}", target);
    let body = json!({
        "targetAddress": target,
        "username": username,
        "credential": password
    });
    let outcome = post(client, base_url, "/api/v1/cleanup", body).await?;
    print(&outcome)?;

    // Errors come back as data; surface them through the exit code
    if let Some(message) = outcome.get("error").and_then(Value::as_str) {
        anyhow::bail!("Cleanup was not attempted: {}", message);
    }
    if outcome["result"]["success"] == false {
        anyhow::bail!("Cleanup finished with errors");
    }
    Ok(())
}

async fn handle_recommendations(
    client: &Client,
    base_url: &str,
    command: RecommendationCommands,
) -> anyhow::Result<()> {
    match command {
        RecommendationCommands::List { servers } => {
            let url = format!("{}/api/v1/recommendations", base_url);
            let mut request = client.get(&url);
            if let Some(s) = servers {
                request = request.query(&[("servers", s)]);
            }
            let response = request.send().await?;
            if !response.status().is_success() {
                anyhow::bail!("Listing recommendations failed: {}", response.status());
            }
            print(&response.json().await?)
        }
        RecommendationCommands::Delete { ids } => {
            let body = json!({ "ids": ids });
            print(&post(client, base_url, "/api/v1/recommendations/delete", body).await?)
        }
        RecommendationCommands::Advice { id } => {
            let path = format!("/api/v1/recommendations/{}/advice", id);
            print(&post(client, base_url, &path, json!({})).await?)
        }
    }
}
