use crate::brief::{run_brief, BriefArgs};
use crate::profiles::run_list_profiles;
use clap::{Parser, Subcommand};
use exec_signals::config::{AppConfig, ProfileConfig};
use exec_signals::error::AppError;
use exec_signals::telemetry;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    name = "exec-signals",
    about = "Compile weekly hiring and growth signal briefs from executive posts",
    version
)]
struct Cli {
    /// Company and profile configuration (TOML). Defaults to BRIEF_CONFIG_PATH
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Log filter such as `debug` or `exec_signals=trace`. Overrides APP_LOG_LEVEL
    #[arg(long, global = true)]
    log_level: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the monitored companies and executive profiles
    ListProfiles,
    /// Compile the weekly brief from a post snapshot
    #[command(alias = "generate-weekly-brief")]
    Brief(BriefArgs),
}

pub(crate) fn run() -> Result<(), AppError> {
    let cli = Cli::parse();

    let mut config = AppConfig::load()?;
    if let Some(path) = cli.config {
        config.paths.config_path = path;
    }
    if let Some(level) = cli.log_level {
        config.telemetry.log_level = level;
    }

    telemetry::init(&config.telemetry)?;

    let profiles = ProfileConfig::load(&config.paths.config_path)?;
    info!(
        ?config.environment,
        config = %config.paths.config_path.display(),
        companies = profiles.companies.len(),
        "profile configuration loaded"
    );

    match cli.command {
        Command::ListProfiles => run_list_profiles(&profiles),
        Command::Brief(args) => run_brief(args, &config, &profiles),
    }
}
