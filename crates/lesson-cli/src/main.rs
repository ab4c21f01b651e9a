mod cmd;
mod output;

use clap::{Parser, Subcommand};
use cmd::{generate::GenerateArgs, ModelArgs};

#[derive(Parser)]
#[command(
    name = "lessonplan",
    about = "Generate Japanese language-arts lesson plans with a chat-completion model",
    version,
    propagate_version = true
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API
    Serve {
        /// Address to bind
        #[arg(long, env = "LESSONPLAN_HOST", default_value = "0.0.0.0")]
        host: String,

        /// Port to listen on (0 = OS-assigned)
        #[arg(long, env = "LESSONPLAN_PORT", default_value = "3000")]
        port: u16,

        #[command(flatten)]
        model: ModelArgs,
    },

    /// Generate one lesson plan and print it as JSON
    Generate(GenerateArgs),

    /// Show the hour count a prompt requests
    Hours {
        /// Prompt text to scan
        text: String,

        /// Output as JSON
        #[arg(long, short = 'j')]
        json: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_level = match &cli.command {
        Commands::Serve { .. } => tracing::Level::INFO,
        _ => tracing::Level::WARN,
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Serve { host, port, model } => cmd::serve::run(&host, port, &model),
        Commands::Generate(args) => cmd::generate::run(args),
        Commands::Hours { text, json } => cmd::hours::run(&text, json),
    };

    if let Err(e) = result {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
