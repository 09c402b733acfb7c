use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "tap",
    about = "Taproom — pub check-ins, badges, and missions",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// TOML configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Clone, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Validate a seed file and summarize it
    Seed(SeedArgs),
    /// List the pubs in a seed file
    Pubs(PubsArgs),
    /// Run one check-in through the full flow
    CheckIn(CheckInArgs),
    /// Show mission progress for a user
    Missions(MissionsArgs),
    /// Print the effective configuration
    Config,
}

#[derive(Args)]
pub struct SeedArgs {
    pub path: PathBuf,
}

#[derive(Args)]
pub struct PubsArgs {
    #[arg(long)]
    pub seed: PathBuf,
}

#[derive(Args)]
pub struct CheckInArgs {
    #[arg(long)]
    pub seed: PathBuf,
    #[arg(long = "pub")]
    pub pub_id: String,
    #[arg(long)]
    pub user: String,
    /// Carpet photo to attach
    #[arg(long)]
    pub photo: Option<PathBuf>,
}

#[derive(Args)]
pub struct MissionsArgs {
    #[arg(long)]
    pub seed: PathBuf,
    #[arg(long)]
    pub user: String,
    /// Pubs the user has already visited
    #[arg(long = "visit")]
    pub visits: Vec<String>,
}
