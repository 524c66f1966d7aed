//! skr - submit jobs to the NLM SKR/MTI scheduler
//!
//! CLI binary for batch and interactive MetaMap, SemRep and MTI jobs.

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use skr_client::types::ServiceTarget;
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

mod cli;

#[derive(Parser)]
#[command(name = "skr")]
#[command(about = "Submit jobs to the NLM SKR/MTI scheduler")]
#[command(version)]
struct Cli {
    /// Config file (defaults to <config dir>/skr-client/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// UTS API key; implies --credentials api-key
    #[arg(long, global = true)]
    api_key: Option<String>,

    /// Credential provider: console, console-password, env or api-key
    #[arg(long, global = true)]
    credentials: Option<String>,

    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Submit a generic batch job
    Batch {
        /// Input file uploaded as the job's data
        input: PathBuf,

        /// Email address for job notifications
        #[arg(long)]
        email: Option<String>,

        /// Command the scheduler runs on the input
        #[arg(long, default_value = "metamap -% format -E")]
        command: String,

        /// Environment for the command, `#`-separated NAME=VALUE pairs
        #[arg(long)]
        env: Option<String>,

        /// Notes attached to the job
        #[arg(long, default_value = "SKR API test")]
        note: String,

        /// Don't send an email when the job completes
        #[arg(long)]
        silent: bool,

        /// Don't require the end-of-results marker
        #[arg(long)]
        no_validation: bool,
    },

    /// Run MetaMap, SemRep or MTI interactively on a short text
    Interactive {
        /// Program to run
        #[arg(value_enum)]
        program: Program,

        /// File containing the input text
        input: Option<PathBuf>,

        /// Input text given directly
        #[arg(long, conflicts_with = "input")]
        text: Option<String>,

        /// Email address for job logging
        #[arg(long)]
        email: Option<String>,

        /// Program arguments (MTI defaults to -opt1L_DCMS)
        #[arg(long, allow_hyphen_values = true)]
        args: Option<String>,
    },

    /// Authentication management
    Auth {
        #[command(subcommand)]
        action: AuthAction,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Program {
    Metamap,
    Semrep,
    Mti,
}

impl From<Program> for ServiceTarget {
    fn from(program: Program) -> Self {
        match program {
            Program::Metamap => Self::InteractiveMetaMap,
            Program::Semrep => Self::InteractiveSemRep,
            Program::Mti => Self::InteractiveMti,
        }
    }
}

#[derive(Subcommand)]
enum AuthAction {
    /// Exchange the credential for a service ticket
    Test,
    /// Show authentication setup instructions
    Setup,
}

fn init_tracing(verbose: bool) {
    let default = if verbose {
        "skr_client=debug,skr=debug"
    } else {
        "skr_client=info,skr=info"
    };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let global = cli::GlobalOptions {
        config: cli.config.as_deref(),
        api_key: cli.api_key.as_deref(),
        credentials: cli.credentials.as_deref(),
    };

    match cli.command {
        Commands::Batch {
            input,
            email,
            command,
            env,
            note,
            silent,
            no_validation,
        } => {
            cli::run_batch(
                &input,
                cli::BatchOptions {
                    email: email.as_deref(),
                    command: &command,
                    env: env.as_deref(),
                    note: &note,
                    silent,
                    no_validation,
                },
                &global,
            )
            .await?;
        }
        Commands::Interactive {
            program,
            input,
            text,
            email,
            args,
        } => {
            cli::run_interactive(
                program.into(),
                input.as_deref(),
                cli::InteractiveOptions {
                    email: email.as_deref(),
                    args: args.as_deref(),
                    text: text.as_deref(),
                },
                &global,
            )
            .await?;
        }
        Commands::Auth { action } => {
            let action_str = match action {
                AuthAction::Test => "test",
                AuthAction::Setup => "setup",
            };
            cli::run_auth(action_str, &global).await?;
        }
    }

    Ok(())
}
