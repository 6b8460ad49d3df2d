use clap::{Parser, Subcommand};
use serde_json::{json, Value};

#[derive(Parser)]
#[command(name = "rental-cli")]
#[command(about = "Command-line client for the Tron rental service", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8085")]
    url: String,

    /// Hex private key of the paying account.
    #[arg(short, long, env = "RENTAL_PRIVATE_KEY", hide_env_values = true)]
    key: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Quote the fee for renting an amount of a resource
    Fee {
        amount: i64,
        /// 0 = bandwidth, 1 = energy
        #[arg(short = 't', long = "type", default_value_t = 1)]
        resource: i32,
    },
    /// Rent a resource for a receiver
    Rent {
        receiver: String,
        amount: i64,
        #[arg(short = 't', long = "type", default_value_t = 1)]
        resource: i32,
    },
    /// Return a rented stake
    Return {
        receiver: String,
        /// Stake to return, in sun
        stake: i64,
        #[arg(short = 't', long = "type", default_value_t = 1)]
        resource: i32,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/');

    let res = match cli.command {
        Commands::Fee { amount, resource } => {
            client
                .get(format!("{}/fee", base))
                .query(&[
                    ("energy", amount.to_string()),
                    ("privateKey", cli.key),
                    ("type", resource.to_string()),
                ])
                .send()
                .await?
        }
        Commands::Rent {
            receiver,
            amount,
            resource,
        } => {
            client
                .post(format!("{}/rent", base))
                .json(&json!({
                    "receive": receiver,
                    "type": resource,
                    "amount": amount,
                    "privateKey": cli.key,
                }))
                .send()
                .await?
        }
        Commands::Return {
            receiver,
            stake,
            resource,
        } => {
            client
                .post(format!("{}/return", base))
                .json(&json!({
                    "receive": receiver,
                    "type": resource,
                    "stakePerTrx": stake,
                    "privateKey": cli.key,
                }))
                .send()
                .await?
        }
    };

    print_response(res).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let json: Value = res.json().await?;
    if !status.is_success() {
        eprintln!("Error: rental service returned status {}", status);
    }
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
