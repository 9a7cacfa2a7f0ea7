// SPDX-FileCopyrightText: 2026 Coffer Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Coffer - an encrypted password vault.
//!
//! This is the binary entry point.

mod crypt;
mod entries;
mod generate;
mod transfer;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use coffer_config::CofferConfig;
use coffer_core::CofferError;
use coffer_transfer::ExportFormat;

/// Coffer - an encrypted password vault.
#[derive(Parser, Debug)]
#[command(name = "coffer", version, about, long_about = None)]
struct Cli {
    /// Load this configuration file instead of the standard locations.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate a random password.
    Generate(generate::GenerateArgs),
    /// Create the vault and set the master password.
    Init,
    /// Show whether the vault is initialized.
    Status,
    /// List entries, optionally filtered.
    List {
        /// Case-insensitive filter over platform, label and notes.
        #[arg(long)]
        query: Option<String>,
        /// Print passwords too.
        #[arg(long)]
        show: bool,
    },
    /// Add an entry. A password is generated when none is given.
    Add(entries::AddArgs),
    /// Delete an entry.
    Remove { id: String },
    /// Replace an entry's password, keeping the old one in its history.
    Rotate {
        id: String,
        /// New password. Generated when omitted.
        #[arg(long)]
        password: Option<String>,
    },
    /// Write the vault to a file.
    Export {
        #[arg(long, default_value_t = ExportFormat::Plain)]
        format: ExportFormat,
        #[arg(long)]
        out: PathBuf,
    },
    /// Add entries from a .json or .csv file.
    Import { file: PathBuf },
    /// Encrypt stdin into a Base64 envelope on stdout.
    Encrypt,
    /// Decrypt a Base64 envelope from stdin to stdout.
    Decrypt,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => coffer_config::load_and_validate_path(path),
        None => coffer_config::load_and_validate(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(errors) => {
            coffer_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    init_tracing(&config.general.log_level);

    if let Err(e) = run(cli.command, &config).await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

async fn run(command: Commands, config: &CofferConfig) -> Result<(), CofferError> {
    match command {
        Commands::Generate(args) => generate::run_generate(config, &args),
        Commands::Init => entries::run_init(config).await,
        Commands::Status => entries::run_status(config).await,
        Commands::List { query, show } => entries::run_list(config, query.as_deref(), show).await,
        Commands::Add(args) => entries::run_add(config, &args).await,
        Commands::Remove { id } => entries::run_remove(config, &id).await,
        Commands::Rotate { id, password } => {
            entries::run_rotate(config, &id, password.as_deref()).await
        }
        Commands::Export { format, out } => transfer::run_export(config, format, &out).await,
        Commands::Import { file } => transfer::run_import(config, &file).await,
        Commands::Encrypt => crypt::run_encrypt(config),
        Commands::Decrypt => crypt::run_decrypt(config),
    }
}

/// Log to stderr so stdout stays clean for passwords and envelopes.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "coffer={log_level},coffer_vault={log_level},coffer_storage={log_level},\
             coffer_transfer={log_level},warn"
        ))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_names(false)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn binary_loads_config_defaults() {
        let config = coffer_config::load_and_validate_str("").expect("default config should be valid");
        assert_eq!(config.general.user_id, "local");
    }

    #[test]
    fn parses_generate_flags() {
        let cli = Cli::try_parse_from([
            "coffer", "generate", "--length", "24", "--no-symbols", "--allow-similar", "--exclude", "xyz",
        ])
        .unwrap();
        let Commands::Generate(args) = cli.command else {
            panic!("expected generate");
        };
        assert_eq!(args.length, Some(24));
        assert!(args.no_symbols);
        assert!(args.allow_similar);
        assert_eq!(args.exclude.as_deref(), Some("xyz"));
    }

    #[test]
    fn parses_export_format() {
        let cli = Cli::try_parse_from(["coffer", "export", "--format", "csv", "--out", "v.csv"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Export { format: ExportFormat::Csv, .. }
        ));
        assert!(Cli::try_parse_from(["coffer", "export", "--format", "xml", "--out", "v"]).is_err());
    }

    #[test]
    fn config_flag_is_global() {
        let cli = Cli::try_parse_from(["coffer", "status", "--config", "/tmp/c.toml"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/c.toml")));
    }
}
