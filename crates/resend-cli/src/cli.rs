use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Inspect and re-send failed build notifications.
#[derive(Debug, Parser)]
#[command(name = "resend", version, about)]
pub struct Args {
    /// Fleet state file (projects, builds, pending records, delivery configs).
    #[arg(long, short = 'f', env = "RESEND_FLEET_FILE", default_value = "fleet.json")]
    pub fleet_file: PathBuf,

    /// Emit logs as JSON lines.
    #[arg(long, env = "RESEND_LOG_JSON")]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Refresh and print a summary of the pending notifications.
    Status,

    /// Refresh and print the modules awaiting resend.
    Modules {
        /// List every pending version instead of one version per module.
        #[arg(long)]
        all_versions: bool,
    },

    /// Refresh, re-send everything pending, and print the replay report.
    Replay {
        /// Print the batches that would be sent, without contacting any endpoint.
        #[arg(long)]
        dry_run: bool,
    },
}
