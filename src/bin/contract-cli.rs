use clap::{Parser, Subcommand};
use reqwest::header::CONTENT_TYPE;
use serde_json::Value;

#[derive(Parser)]
#[command(name = "contract-cli")]
#[command(about = "Command-line client for the contract-sync API", long_about = None)]
struct Cli {
    #[arg(short, long, env = "CONTRACT_SYNC_URL", default_value = "http://localhost:8080")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Read the value stored in the contract
    Get,
    /// Submit a transaction setting a new value
    Set {
        /// Non-negative integer to store (up to 2^256 - 1)
        #[arg(allow_negative_numbers = true)]
        value: String,
    },
    /// Copy the network value into the database
    Sync,
    /// Compare the network value with the database copy
    Check,
    /// Show chain and database health
    Health,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/');

    let res = match cli.command {
        Commands::Get => client.get(format!("{}/value", base)).send().await?,
        Commands::Set { value } => {
            client
                .post(format!("{}/value", base))
                .header(CONTENT_TYPE, "application/json")
                .body(set_body(&value)?)
                .send()
                .await?
        }
        Commands::Sync => client.post(format!("{}/sync", base)).send().await?,
        Commands::Check => client.get(format!("{}/check", base)).send().await?,
        Commands::Health => client.get(format!("{}/health", base)).send().await?,
    };
    print_response(res).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let text = res.text().await?;
    let rendered = match serde_json::from_str::<Value>(&text) {
        Ok(json) => serde_json::to_string_pretty(&json)?,
        Err(_) => text,
    };

    if status.is_success() {
        println!("{}", rendered);
        Ok(())
    } else {
        eprintln!("Error: API returned status {}", status);
        eprintln!("{}", rendered);
        Err(format!("request failed with status {}", status).into())
    }
}

/// `POST /value` body with `value` as a JSON integer literal.
///
/// Range and sign are left for the server to judge.
fn set_body(value: &str) -> Result<String, String> {
    let digits = value.strip_prefix('-').unwrap_or(value);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(format!("'{}' is not an integer", value));
    }
    Ok(format!(r#"{{"value": {}}}"#, value))
}
