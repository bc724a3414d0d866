mod cmd;

use clap::{Parser, Subcommand};
use cmd::config::{Effective, GlobalArgs};
use winch::Kind;

#[derive(Parser)]
#[command(name = "winch", about = "Normalize board service documents")]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Read a document and write it back in canonical wire form.
    Normalize {
        kind: Kind,

        /// Read from this file instead of stdin.
        #[arg(long)]
        input: Option<String>,
    },
    /// Print a built-in sample document.
    Sample { kind: Kind },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let eff = match Effective::new(&cli.global) {
        Ok(e) => e,
        Err(e) => {
            tracing::error!(error = %e, "failed to load config");
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Command::Normalize { kind, input } => cmd::normalize::run(&eff, kind, input.as_deref()),
        Command::Sample { kind } => cmd::sample::run(&eff, kind),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
