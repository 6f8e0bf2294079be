//! Argument parsing and command dispatch.

use std::path::PathBuf;

use anyhow::anyhow;
use cinedrop_config::LoggingSettings;
use cinedrop_config::defaults::ENV_CONFIG_PATH;
use cinedrop_telemetry::{GlobalContextGuard, LogFormat, LoggingConfig, init_logging};
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::debug;

use crate::client::{AppContext, CliError, CliResult, load_config};
use crate::commands::movies::{handle_candidates, handle_detail, handle_search};
use crate::commands::resolve::{handle_ping, handle_resolve};

const BUILD_SHA: &str = match option_env!("CINEDROP_BUILD_SHA") {
    Some(sha) => sha,
    None => "dev",
};

/// Parses CLI arguments, executes the requested command, and returns the process exit
/// code.
pub async fn run() -> i32 {
    let cli = Cli::parse();
    match execute(cli).await {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("error: {}", err.display_message());
            err.exit_code()
        }
    }
}

async fn execute(cli: Cli) -> CliResult<()> {
    let config = load_config(cli.config.as_deref())?;
    install_logging(&config.logging)?;
    let _context = GlobalContextGuard::new("cli");
    debug!(command = cli.command.label(), "dispatching command");

    let ctx = AppContext::from_config(&config)?;
    dispatch(&ctx, cli.command, cli.output).await
}

pub(crate) async fn dispatch(
    ctx: &AppContext,
    command: Command,
    output: OutputFormat,
) -> CliResult<()> {
    match command {
        Command::Search(args) => handle_search(ctx, args, output).await,
        Command::Detail(args) => handle_detail(ctx, args, output).await,
        Command::Candidates(args) => handle_candidates(ctx, args, output).await,
        Command::Resolve(args) => handle_resolve(ctx, args, output).await,
        Command::Ping => handle_ping(ctx, output).await,
    }
}

fn install_logging(settings: &LoggingSettings) -> CliResult<()> {
    let format = match settings.format.as_deref() {
        Some(raw) => raw
            .parse::<LogFormat>()
            .map_err(|err| CliError::validation(err.to_string()))?,
        None => LogFormat::infer(),
    };
    init_logging(&LoggingConfig {
        level: &settings.level,
        format,
        build_sha: BUILD_SHA,
    })
    .map_err(|err| CliError::failure(anyhow!("failed to initialise logging: {err}")))
}

#[derive(Parser)]
#[command(
    name = "cinedrop",
    about = "Find a movie, list its torrent sources, and resolve one to direct links"
)]
pub(crate) struct Cli {
    #[arg(
        long,
        global = true,
        env = ENV_CONFIG_PATH,
        help = "YAML configuration file layered under environment overrides"
    )]
    config: Option<PathBuf>,
    #[arg(
        long = "output",
        alias = "format",
        global = true,
        value_enum,
        default_value_t = OutputFormat::Table,
        help = "Select output format for commands that render structured data"
    )]
    output: OutputFormat,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
pub(crate) enum Command {
    /// Search movies by title.
    Search(SearchArgs),
    /// Show one movie with its genres.
    Detail(MovieArgs),
    /// List torrent sources for a movie.
    Candidates(MovieArgs),
    /// Submit a magnet to the debrid service and wait for direct links.
    Resolve(ResolveArgs),
    /// Check that the debrid token is accepted.
    Ping,
}

impl Command {
    const fn label(&self) -> &'static str {
        match self {
            Self::Search(_) => "search",
            Self::Detail(_) => "detail",
            Self::Candidates(_) => "candidates",
            Self::Resolve(_) => "resolve",
            Self::Ping => "ping",
        }
    }
}

#[derive(Args, Debug)]
pub(crate) struct SearchArgs {
    /// Title to search for.
    pub(crate) query: String,
}

#[derive(Args, Debug)]
pub(crate) struct MovieArgs {
    /// Metadata provider movie identifier.
    pub(crate) id: u64,
}

#[derive(Args, Debug)]
pub(crate) struct ResolveArgs {
    /// Magnet URI carrying an `xt=urn:btih:` info-hash.
    pub(crate) magnet: String,
    /// Release title used to label the source and detect its quality.
    #[arg(long)]
    pub(crate) title: Option<String>,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    #[default]
    Table,
    Json,
}
