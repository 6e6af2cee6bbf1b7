use clap::Parser;

/// Security Alert Job CLI arguments
#[derive(Debug, Parser)]
#[command(
    name = "security-alert-job",
    version,
    about = "Publishes an alert when a device's security status needs attention"
)]
pub struct Cli {
    /// Device whose ledger instance is checked
    #[arg(long)]
    pub device_id: Option<String>,

    /// Product the alert event is published under
    #[arg(long)]
    pub product_id: Option<String>,

    /// Alert payload: serialized (record JSON) or literal
    #[arg(long, value_parser = ["serialized", "literal"])]
    pub payload_mode: Option<String>,

    /// Text published in literal payload mode
    #[arg(long)]
    pub payload_literal: Option<String>,

    /// Seconds between scheduled runs
    #[arg(long)]
    pub interval: Option<u64>,

    /// Particle Cloud API base URL
    #[arg(long)]
    pub api_url: Option<String>,

    /// Run the job a single time and exit
    #[arg(long)]
    pub once: bool,
}
