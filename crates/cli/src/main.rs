//! Pandan Stand CLI - inspect and manage the order document.
//!
//! # Usage
//!
//! ```bash
//! # Print the stall menu
//! ps-cli menu
//!
//! # List stored orders (newest first)
//! ps-cli orders list
//!
//! # Wipe all orders and reset the queue sequence
//! ps-cli orders wipe --yes
//! ```
//!
//! The order document path comes from `COUNTER_DATA_FILE` or the
//! `--data-file` flag.

#![cfg_attr(not(test), forbid(unsafe_code))]
// Printing is this binary's output, not incidental logging
#![allow(clippy::print_stdout)]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "ps-cli")]
#[command(author, version, about = "Pandan Stand CLI tools")]
struct Cli {
    /// Path to the JSON order document (overrides COUNTER_DATA_FILE)
    #[arg(long, global = true)]
    data_file: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the stall menu
    Menu,
    /// Inspect or manage stored orders
    Orders {
        #[command(subcommand)]
        action: OrdersAction,
    },
}

#[derive(Subcommand)]
enum OrdersAction {
    /// List stored orders, newest first
    List,
    /// Wipe all orders and reset the queue sequence
    Wipe {
        /// Confirm the destructive wipe
        #[arg(long)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli);

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Menu => commands::menu::show(),
        Commands::Orders { action } => match action {
            OrdersAction::List => commands::orders::list(cli.data_file.as_deref()),
            OrdersAction::Wipe { yes } => commands::orders::wipe(cli.data_file.as_deref(), yes),
        },
    }
}
