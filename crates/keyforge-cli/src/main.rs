use clap::{Parser, Subcommand};
use keyforge_core::{config, HostStore, KeyManager, Platform};
use std::io::{self, IsTerminal, Write};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(
    name = "keyforge",
    about = "Keyforge — RSA keypairs generated on demand, stored in the OS keychain",
    version,
    after_help = "Examples:\n  keyforge generate myapp\n  keyforge generate myapp --bits 4096\n  keyforge public myapp\n  keyforge regenerate myapp\n  keyforge status"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Verbose logging (same as KEYFORGE_LOG=debug)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a keypair for a service, or fetch the existing one
    Generate {
        /// Service name prefix for the keychain entries
        service: String,

        /// RSA key length in bits (default: RSA_KEY_LENGTH env var or 2048)
        #[arg(long)]
        bits: Option<u32>,
    },

    /// Force regeneration, overwriting any stored keypair
    Regenerate {
        /// Service name prefix for the keychain entries
        service: String,

        /// RSA key length in bits (default: RSA_KEY_LENGTH env var or 2048)
        #[arg(long)]
        bits: Option<u32>,
    },

    /// Print the stored public key
    Public {
        /// Service name prefix for the keychain entries
        service: String,
    },

    /// Print the stored private key (blocked on non-interactive stdout)
    Private {
        /// Service name prefix for the keychain entries
        service: String,

        /// Allow raw private-key output even when stdout is not a terminal
        #[arg(long)]
        force_plain: bool,
    },

    /// Show platform and keychain availability
    Status,

    /// Remove stored keys (not supported)
    Clear,
}

fn main() {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_env("KEYFORGE_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("keyforge=debug,keyforge_core=debug")
        } else {
            EnvFilter::new("warn")
        }
    });

    // Logs go to stderr — stdout is reserved for PEM/JSON output.
    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(io::stderr),
        )
        .init();

    let manager = KeyManager::for_host();

    let result = match cli.command {
        Commands::Generate { service, bits } => {
            cmd_generate(&manager, &service, bits, false, cli.json)
        }
        Commands::Regenerate { service, bits } => {
            cmd_generate(&manager, &service, bits, true, cli.json)
        }
        Commands::Public { service } => cmd_public(&manager, &service, cli.json),
        Commands::Private {
            service,
            force_plain,
        } => cmd_private(&manager, &service, force_plain, cli.json),
        Commands::Status => cmd_status(&manager, cli.json),
        Commands::Clear => cmd_clear(&manager),
    };

    if let Err(msg) = result {
        eprintln!("Error: {}", msg);
        std::process::exit(1);
    }
}

fn print_pem(pem: &str) {
    // PEM text carries its own trailing newline.
    print!("{}", pem);
    io::stdout().flush().ok();
}

fn cmd_generate(
    manager: &KeyManager<HostStore>,
    service: &str,
    bits: Option<u32>,
    force: bool,
    json: bool,
) -> Result<(), String> {
    let pem = if force {
        manager.regenerate_keys(service, bits)
    } else {
        manager.generate_keys(service, bits)
    };

    let Some(pem) = pem else {
        return Err(format!(
            "Key generation failed for service '{}'. Run with --verbose for details.",
            service
        ));
    };

    if json {
        let obj = serde_json::json!({
            "service": service,
            "bits": config::resolve_bits(bits),
            "public_key": pem,
        });
        println!("{}", serde_json::to_string_pretty(&obj).unwrap());
    } else {
        print_pem(&pem);
    }

    if !manager.is_keychain_available() {
        eprintln!("Warning: no keychain available — this keypair was not persisted.");
    }

    Ok(())
}

fn cmd_public(manager: &KeyManager<HostStore>, service: &str, json: bool) -> Result<(), String> {
    let Some(pem) = manager.get_public_key(service) else {
        return Err(format!("No stored public key for service '{}'.", service));
    };

    if json {
        let obj = serde_json::json!({ "service": service, "public_key": pem });
        println!("{}", serde_json::to_string_pretty(&obj).unwrap());
    } else {
        print_pem(&pem);
    }
    Ok(())
}

fn cmd_private(
    manager: &KeyManager<HostStore>,
    service: &str,
    force_plain: bool,
    json: bool,
) -> Result<(), String> {
    // TTY guard: never pipe raw private-key material into another process
    // unless the user explicitly opts in.
    if !io::stdout().is_terminal() && !force_plain {
        eprintln!("Error: refusing to write a private key to a non-interactive stdout.");
        eprintln!("  Use --force-plain to override (at your own risk).");
        std::process::exit(2);
    }

    let Some(pem) = manager.get_private_key(service) else {
        return Err(format!("No stored private key for service '{}'.", service));
    };

    if json {
        let obj = serde_json::json!({ "service": service, "private_key": &*pem });
        println!("{}", serde_json::to_string_pretty(&obj).unwrap());
    } else {
        print_pem(&pem);
    }
    Ok(())
}

fn cmd_status(manager: &KeyManager<HostStore>, json: bool) -> Result<(), String> {
    let platform = Platform::detect();
    let available = manager.is_keychain_available();

    if json {
        let obj = serde_json::json!({
            "platform": platform,
            "keychain_available": available,
        });
        println!("{}", serde_json::to_string_pretty(&obj).unwrap());
    } else {
        println!("Platform:  {}", platform);
        println!(
            "Keychain:  {}",
            if available { "available" } else { "unavailable" }
        );
    }
    Ok(())
}

fn cmd_clear(manager: &KeyManager<HostStore>) -> Result<(), String> {
    if manager.clear_keys() {
        Ok(())
    } else {
        Err("Key deletion is not supported.".to_string())
    }
}
