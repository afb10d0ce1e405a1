use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "cinedex",
    about = "Media catalog with reviews, poster uploads and PDF export",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Create the data directory and empty collection files
    Init(InitArgs),
    /// Run the HTTP server
    Serve(ServeArgs),
    /// Print the HTTP endpoint table
    Routes,
    /// List media records
    List(ListArgs),
    /// Show one media record and its reviews
    Show(ShowArgs),
}

#[derive(Args)]
pub struct DataDirArg {
    #[arg(long, default_value = "data")]
    pub data_dir: PathBuf,
}

#[derive(Args)]
pub struct InitArgs {
    #[command(flatten)]
    pub data: DataDirArg,
}

#[derive(Args)]
pub struct ServeArgs {
    /// TOML config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    #[arg(long)]
    pub bind: Option<SocketAddr>,
    #[arg(long)]
    pub data_dir: Option<PathBuf>,
}

#[derive(Args)]
pub struct ListArgs {
    #[command(flatten)]
    pub data: DataDirArg,
}

#[derive(Args)]
pub struct ShowArgs {
    pub id: String,
    #[command(flatten)]
    pub data: DataDirArg,
}
