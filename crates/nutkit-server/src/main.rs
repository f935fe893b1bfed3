// ============================================
// File: crates/nutkit-server/src/main.rs
// ============================================
//! # nutkit Entry Point
//!
//! ## Creation Reason
//! Command line tool for operating a nut service: generating keys,
//! checking configuration, and issuing or verifying nuts by hand.
//!
//! ## Main Functionality
//! - CLI argument parsing with clap
//! - Logging initialization with tracing
//! - Configuration and key loading
//!
//! ## Usage
//! ```bash
//! # Step 1: Generate a key file
//! nutkit keygen --out /etc/nutkit/nut_key.json
//!
//! # Step 2: Check the configuration
//! nutkit check-config
//!
//! # Manual issue / verify (debugging)
//! nutkit issue --client 203.0.113.7
//! nutkit verify --nut <NUT> --client 203.0.113.7
//! ```
//!
//! ## ⚠️ Important Note for Next Developer
//! - `verify` here is stateless: it checks authenticity, binding and
//!   expiry, but cannot tell whether a nut was already used
//! - Exit code is non-zero on any failure, including a rejected nut
//!
//! ## Last Modified
//! v0.1.0 - Initial CLI implementation

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use nutkit_core::crypto::CipherSuite;
use nutkit_core::{Nutter, Validation};
use nutkit_server::{KeyFile, ServerConfig};

const DEFAULT_CONFIG: &str = "/etc/nutkit/nutkit.toml";
const DEFAULT_LOG_LEVEL: &str = "info";

// ============================================
// CLI Definition
// ============================================

/// nutkit - encrypted login challenge tool
#[derive(Parser, Debug)]
#[command(name = "nutkit")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate a new nut key file
    Keygen {
        /// Cipher suite (chacha20-poly1305, aes-128-gcm, aes-256-gcm)
        #[arg(long, default_value = "chacha20-poly1305")]
        cipher: CipherSuite,

        /// Output path; prints the key file to stdout when omitted
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Issue a nut for a client
    Issue {
        /// Client identifier (usually the client IP)
        #[arg(long)]
        client: String,

        /// Path to configuration file
        #[arg(short, long, default_value = DEFAULT_CONFIG)]
        config: PathBuf,
    },

    /// Check a nut for a client
    Verify {
        /// The nut to check
        #[arg(long)]
        nut: String,

        /// Client identifier the nut should be bound to
        #[arg(long)]
        client: String,

        /// Path to configuration file
        #[arg(short, long, default_value = DEFAULT_CONFIG)]
        config: PathBuf,
    },

    /// Validate configuration file and key
    CheckConfig {
        /// Path to configuration file
        #[arg(short, long, default_value = DEFAULT_CONFIG)]
        config: PathBuf,
    },
}

// ============================================
// Main
// ============================================

#[tokio::main]
async fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Execute command (logging is initialized once the config is known)
    let result = match cli.command {
        Commands::Keygen { cipher, out } => cmd_keygen(cipher, out).await,
        Commands::Issue { client, config } => cmd_issue(&client, &config).await,
        Commands::Verify {
            nut,
            client,
            config,
        } => cmd_verify(&nut, &client, &config).await,
        Commands::CheckConfig { config } => cmd_check_config(&config).await,
    };

    // Handle errors
    if let Err(e) = result {
        init_logging(DEFAULT_LOG_LEVEL);
        error!("{:#}", e);
        std::process::exit(1);
    }
}

// ============================================
// Commands
// ============================================

/// Generates a key file.
async fn cmd_keygen(cipher: CipherSuite, out: Option<PathBuf>) -> anyhow::Result<()> {
    init_logging(DEFAULT_LOG_LEVEL);
    let file = KeyFile::generate(cipher)?;

    match out {
        Some(path) => {
            if path.exists() {
                anyhow::bail!(
                    "{} already exists; remove it first to replace the key",
                    path.display()
                );
            }
            file.save(&path).await?;
            println!("Generated {} key: {}", cipher, path.display());
        }
        None => println!("{}", serde_json::to_string_pretty(&file)?),
    }

    Ok(())
}

/// Issues a nut.
async fn cmd_issue(client: &str, config_path: &Path) -> anyhow::Result<()> {
    let nutter = load_nutter(config_path).await?;
    let nut = nutter.issue(client)?;
    println!("{nut}");
    Ok(())
}

/// Checks a nut.
async fn cmd_verify(nut: &str, client: &str, config_path: &Path) -> anyhow::Result<()> {
    let nutter = load_nutter(config_path).await?;

    match nutter.validate(nut, client) {
        Ok(payload) => {
            println!("valid");
            println!("   Issued at:  {}", payload.issued_at);
            println!("   Counter:    {}", payload.counter);
            println!("   Bound:      {}", !payload.fingerprint.is_unbound());
            Ok(())
        }
        Err(e) if e.is_fatal() => Err(e.into()),
        Err(e) => {
            let outcome = Validation::from_error(&e);
            println!("{outcome}");
            anyhow::bail!("nut rejected: {outcome}")
        }
    }
}

/// Validates configuration file.
async fn cmd_check_config(config_path: &Path) -> anyhow::Result<()> {
    let config = load_config(config_path).await?;
    let key = config.nut.resolve_key().await?;
    Nutter::new(&key, config.nutter_config())?;

    println!("Configuration is valid");
    println!();
    println!("Nut:");
    match (&config.nut.key, &config.nut.key_file) {
        (_, Some(path)) => println!("   Key:          file {}", path.display()),
        _ => println!("   Key:          inline"),
    }
    println!("   Cipher:       {}", config.nut.cipher);
    println!("   Expiry:       {}s", config.nut.expiry_secs);
    println!("   No client id: {:?}", config.nut.no_client_id);
    println!();

    Ok(())
}

// ============================================
// Helper Functions
// ============================================

/// Initializes the tracing subscriber.
fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(filter)
        .try_init()
        .ok();
}

/// Loads configuration and initializes logging at its level.
///
/// `RUST_LOG` takes precedence over the configured level.
async fn load_config(config_path: &Path) -> anyhow::Result<ServerConfig> {
    let config = ServerConfig::load(config_path)
        .await
        .with_context(|| format!("loading {}", config_path.display()))?;
    init_logging(&config.logging.level);
    Ok(config)
}

/// Loads configuration and key, and builds the nutter.
async fn load_nutter(config_path: &Path) -> anyhow::Result<Nutter> {
    let config = load_config(config_path).await?;
    let key = config.nut.resolve_key().await?;
    let nutter = Nutter::new(&key, config.nutter_config())?;

    info!(
        cipher = %config.nut.cipher,
        expiry_secs = config.nut.expiry_secs,
        "Nutter ready"
    );
    Ok(nutter)
}
