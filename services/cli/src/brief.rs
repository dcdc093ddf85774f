use crate::infra::{parse_as_of, parse_lookback_days, parse_positive};
use chrono::{DateTime, Utc};
use clap::{Args, ValueEnum};
use exec_signals::config::{AppConfig, ProfileConfig};
use exec_signals::error::AppError;
use exec_signals::workflows::brief::{
    render_brief, Brief, BriefError, BriefPipeline, BriefScope, ReportingWindow,
};
use exec_signals::workflows::snapshot::{
    filter_posts_for_window, reporting_window, PostSource, SnapshotSource,
};
use std::io::Write;
use std::path::PathBuf;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub(crate) enum OutputFormat {
    /// Plain-text report
    #[default]
    Text,
    /// Serialized brief summary
    Json,
}

#[derive(Args, Debug, Default)]
pub(crate) struct BriefArgs {
    /// Post snapshot (.json array or .csv export). Defaults to BRIEF_SNAPSHOT_PATH
    #[arg(long)]
    pub(crate) snapshot: Option<PathBuf>,
    /// Write the brief to this file instead of stdout
    #[arg(long)]
    pub(crate) output: Option<PathBuf>,
    /// Only report on this company (matched ignoring case)
    #[arg(long)]
    pub(crate) company: Option<String>,
    /// Days of posts to include, counted back from --as-of (1 to 3650)
    #[arg(long, value_parser = parse_lookback_days)]
    pub(crate) lookback_days: Option<u32>,
    /// Reference time (RFC 3339 or YYYY-MM-DD). Defaults to now
    #[arg(long, value_parser = parse_as_of)]
    pub(crate) as_of: Option<DateTime<Utc>>,
    /// Keep at most this many signals per company
    #[arg(long, value_parser = parse_positive)]
    pub(crate) max_signals: Option<usize>,
    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub(crate) format: OutputFormat,
}

pub(crate) fn run_brief(
    args: BriefArgs,
    config: &AppConfig,
    profiles: &ProfileConfig,
) -> Result<(), AppError> {
    let output = args.output.clone();
    let format = args.format;
    let brief = compile_brief(&args, config, profiles)?;

    // Render fully before touching the sink so a failure never leaves a
    // partial file behind.
    let rendered = render_output(&brief, format)?;

    match output {
        Some(path) => {
            std::fs::write(&path, rendered.as_bytes())?;
            info!(path = %path.display(), signals = brief.signal_count(), "brief written");
            println!("Brief written to {}", path.display());
        }
        None => {
            let stdout = std::io::stdout();
            let mut out = stdout.lock();
            out.write_all(rendered.as_bytes())?;
            out.flush()?;
        }
    }

    Ok(())
}

/// Loads, windows and compiles one brief.
///
/// A `--company` filter narrows the snapshot query as well as the scope, so
/// when that company has no posts in the window the batch comes back empty
/// and the result is a no-data brief holding only the filtered company's
/// empty section, not a brief that analysed other companies' posts.
pub(crate) fn compile_brief(
    args: &BriefArgs,
    config: &AppConfig,
    profiles: &ProfileConfig,
) -> Result<Brief, AppError> {
    let as_of = args.as_of.unwrap_or_else(Utc::now);
    let lookback_days = args.lookback_days.unwrap_or(profiles.lookback_days);
    let company = args
        .company
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty());

    let window = reporting_window(lookback_days, as_of);
    let scope = brief_scope(profiles, company, window);

    let snapshot_path = args
        .snapshot
        .clone()
        .unwrap_or_else(|| config.paths.snapshot_path.clone());
    let source = SnapshotSource::from_path(&snapshot_path, profiles.malformed_records);
    let posts = source.load_posts(&profiles.snapshot_query(company))?;
    let loaded = posts.len();
    let posts = filter_posts_for_window(posts, lookback_days, as_of);
    info!(
        snapshot = %snapshot_path.display(),
        loaded,
        in_window = posts.len(),
        lookback_days,
        "snapshot loaded"
    );

    let compiler = profiles
        .compiler()
        .with_max_signals_per_company(args.max_signals.or(profiles.max_signals_per_company));
    let pipeline = BriefPipeline::new(profiles.scorer(), compiler);

    match pipeline.run(&posts, &scope, as_of) {
        Ok(brief) => Ok(brief),
        Err(BriefError::EmptyInputBatch) => {
            warn!(
                snapshot = %snapshot_path.display(),
                "no posts in the reporting window; rendering a no-data brief"
            );
            Ok(Brief::without_data(&scope, as_of))
        }
    }
}

/// Configured companies, narrowed to the filter when one is given. A filter
/// naming an unconfigured company still gets its own (empty) section.
fn brief_scope(
    profiles: &ProfileConfig,
    company: Option<&str>,
    window: ReportingWindow,
) -> BriefScope {
    let scope = match company {
        Some(filter) => match profiles.company(filter) {
            Some(configured) => BriefScope::new()
                .with_company(configured.name.clone())
                .with_profiles(configured.profiles.iter().cloned()),
            None => BriefScope::new().with_company(filter),
        },
        None => profiles
            .companies
            .iter()
            .fold(BriefScope::new(), |scope, configured| {
                scope
                    .with_company(configured.name.clone())
                    .with_profiles(configured.profiles.iter().cloned())
            }),
    };
    scope.with_window(window)
}

fn render_output(brief: &Brief, format: OutputFormat) -> Result<String, AppError> {
    match format {
        OutputFormat::Text => Ok(render_brief(brief)),
        OutputFormat::Json => {
            let mut rendered = serde_json::to_string_pretty(&brief.summary())?;
            rendered.push('\n');
            Ok(rendered)
        }
    }
}
