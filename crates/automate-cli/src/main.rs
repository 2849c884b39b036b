use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod utils;
use commands::{GenerateArgs, cmd_definitions, cmd_generate, cmd_init};

/// automate command-line interface.
#[derive(Parser, Debug)]
#[command(name = "automate", author, version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Initialize automate.json with defaults.
    Init,
    /// Print the assembled model definitions as JSON.
    Definitions {
        /// Path to automate.json.
        #[arg(short = 'c', long = "config")]
        config: Option<std::path::PathBuf>,
        /// Schema snapshot to read instead of the configured one.
        #[arg(short = 's', long = "schema")]
        schema: Option<std::path::PathBuf>,
    },
    /// Generate model files from the schema snapshot.
    Generate(GenerateArgs),
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    match cli.command {
        Commands::Init => cmd_init(),
        Commands::Definitions { config, schema } => cmd_definitions(config, schema),
        Commands::Generate(args) => cmd_generate(args).await,
    }
}
