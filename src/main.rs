use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use curman::log::init_logging;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

impl From<Commands> for curman::AppCommand {
    fn from(cmd: Commands) -> curman::AppCommand {
        match cmd {
            Commands::Parse { text, domain } => curman::AppCommand::Parse { text, domain },
            Commands::Convert { text, domain } => curman::AppCommand::Convert { text, domain },
            Commands::Rates { from, targets } => curman::AppCommand::Rates { from, targets },
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Detect a currency amount in text without converting it
    Parse {
        /// Text span to scan, e.g. "($1,299.99)"
        text: String,
        /// Hostname whose domain mapping should disambiguate shared symbols
        #[arg(short, long)]
        domain: Option<String>,
    },
    /// Convert an amount found in text to the configured currency
    Convert {
        /// Text span to scan
        text: String,
        /// Hostname whose domain mapping should disambiguate shared symbols
        #[arg(short, long)]
        domain: Option<String>,
    },
    /// Show exchange rates for a base currency
    Rates {
        /// Base currency code or symbol
        from: String,
        /// Target currency codes (defaults to a common set)
        #[arg(short, long)]
        targets: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => setup(),
        Some(cmd) => curman::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}

fn setup() -> anyhow::Result<()> {
    use anyhow::Context;

    let path = curman::config::AppConfig::default_config_path()?;

    if path.exists() {
        anyhow::bail!("Configuration file already exists at {}", path.display());
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    let default_config = r#"---
# Currency to convert detected amounts into
target_currency: "USD"

# Resolve an ambiguous "$" per site, e.g.:
#   amazon.ca: "CAD"
domain_mappings: {}

providers:
  rates:
    base_url: "https://cdn.jsdelivr.net/npm/@fawazahmed0/currency-api@latest/v1/currencies"
"#;

    std::fs::write(&path, default_config)
        .with_context(|| format!("Failed to write config file to {}", path.display()))?;

    tracing::info!("Created default configuration at {}", path.display());
    Ok(())
}
