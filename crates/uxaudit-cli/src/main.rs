mod audit;
mod progress;
mod render;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "uxaudit")]
#[command(about = "Forensic UX audit of interface screenshots")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    Markdown,
    Json,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Send a screenshot to the model and render the audit
    Audit {
        /// JPEG or PNG screenshot to audit
        image: PathBuf,

        #[arg(long, value_enum, default_value_t = OutputFormat::Markdown)]
        format: OutputFormat,

        /// Override the configured Gemini model
        #[arg(long)]
        model: Option<String>,

        /// Print the outbound request body without calling the API
        #[arg(long)]
        dry_run: bool,

        /// Start immediately after a key is entered instead of asking first
        #[arg(long, short = 'y')]
        yes: bool,
    },
    /// Validate and render a saved audit payload
    Render {
        /// JSON file holding a model reply
        file: PathBuf,

        #[arg(long, value_enum, default_value_t = OutputFormat::Markdown)]
        format: OutputFormat,
    },
    /// Print the response schema sent with every request
    Schema,
    /// Print the instruction prompt sent with every request
    Prompt,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    let config = uxaudit_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Audit {
            image,
            format,
            model,
            dry_run,
            yes,
        } => {
            let args = audit::AuditArgs {
                image,
                format,
                model,
                dry_run,
                assume_yes: yes,
            };
            audit::run_audit(&config, args).await
        }
        Commands::Render { file, format } => render::run_render(&file, format),
        Commands::Schema => {
            let schema = uxaudit_core::schema::response_schema();
            println!("{}", serde_json::to_string_pretty(&schema)?);
            Ok(ExitCode::SUCCESS)
        }
        Commands::Prompt => {
            print!("{}", uxaudit_gemini::instruction_prompt());
            Ok(ExitCode::SUCCESS)
        }
    }
}
