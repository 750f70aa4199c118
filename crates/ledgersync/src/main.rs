// SPDX-FileCopyrightText: 2026 Ledgersync Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ledgersync - bank transaction synchronization service.
//!
//! This is the binary entry point for the ledgersync service.

use clap::{Parser, Subcommand};

mod serve;
mod shutdown;

/// Ledgersync - bank transaction synchronization service.
#[derive(Parser, Debug)]
#[command(name = "ledgersync", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the sync service, consuming the trigger queue.
    Serve,
    /// Run one sync pass for a team and exit.
    Sync {
        /// Team identifier to synchronize.
        #[arg(long)]
        team: String,
    },
    /// Enqueue a sync trigger for a team.
    Enqueue {
        /// Team identifier to enqueue.
        #[arg(long)]
        team: String,
    },
    /// Check health of the configured backends.
    Doctor,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match ledgersync_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            ledgersync_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    serve::init_tracing(&config.service.log_level);

    let result = match cli.command {
        Commands::Serve => serve::run_serve(config).await,
        Commands::Sync { team } => serve::run_once(config, &team).await,
        Commands::Enqueue { team } => serve::enqueue(config, &team).await,
        Commands::Doctor => serve::run_doctor(config).await,
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use serial_test::serial;

    #[test]
    #[serial]
    fn binary_loads_config_defaults() {
        // Verify config loads with defaults (no config file needed).
        let config = ledgersync_config::load_and_validate()
            .expect("default config should be valid");
        assert_eq!(config.service.name, "ledgersync");
        assert_eq!(config.sync.batch_limit, 300);
    }
}
