//! # Enroll - Provider Credentialing Store
//!
//! The command-line host for `enroll-core`.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │                 apps/enroll (THE BINARY)             │
//! │                                                      │
//! │   config (toml/env/flags) ──► CLI (clap) ──► files   │
//! │                                  │                   │
//! │                                  ▼                   │
//! │                         ┌────────────────┐           │
//! │                         │  enroll-core   │           │
//! │                         │  (THE STORE)   │           │
//! │                         └────────────────┘           │
//! └──────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```bash
//! enroll init
//! enroll provider add --name "Dr. Ada Smith" --npi 1234567893
//! enroll payer add --name "Acme Health"
//! enroll enrollment add --provider P1 --payer Y1
//! enroll enrollment transition E1 submitted
//! enroll enrollment list --status submitted
//! enroll provider remove P1
//! ```

use clap::Parser;
use enroll::cli::{self, Cli};
use enroll::config::{Config, LogFormat, Overrides};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

fn main() {
    let cli = Cli::parse();

    let overrides = Overrides {
        snapshot: cli.snapshot.clone(),
        user: cli.user.clone(),
        role: cli.role,
    };
    let config = Config::resolve(cli.config.as_deref(), |key| std::env::var(key).ok(), overrides);

    // Logs go to stderr so --json-mode output stays parseable.
    let log_format = config
        .as_ref()
        .map_or(LogFormat::Text, |config| config.log_format);
    let default_filter = if cli.verbose {
        "enroll=debug,enroll_core=debug"
    } else {
        "enroll=info,enroll_core=info"
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter.into());

    match log_format {
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(std::io::stderr),
                )
                .init();
        }
        LogFormat::Text => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }

    let config = match config {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Error: {}", e);
            std::process::exit(1);
        }
    };

    if !cli.quiet && !cli.json_mode {
        print_banner();
    }

    if let Err(e) = cli::execute(cli, &config) {
        tracing::error!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Print the startup banner.
fn print_banner() {
    println!(
        r#"
  ███████╗███╗   ██╗██████╗  ██████╗ ██╗     ██╗
  ██╔════╝████╗  ██║██╔══██╗██╔═══██╗██║     ██║
  █████╗  ██╔██╗ ██║██████╔╝██║   ██║██║     ██║
  ██╔══╝  ██║╚██╗██║██╔══██╗██║   ██║██║     ██║
  ███████╗██║ ╚████║██║  ██║╚██████╔╝███████╗███████╗
  ╚══════╝╚═╝  ╚═══╝╚═╝  ╚═╝ ╚═════╝ ╚══════╝╚══════╝

  Provider Credentialing Store v{}
"#,
        env!("CARGO_PKG_VERSION")
    );
}
