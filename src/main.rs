use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{CommandFactory, Parser, Subcommand};
use miette::{IntoDiagnostic, Result};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use cochange_core::{CochangeConfig, OrderPolicy, OutputFormat};
use cochange_coupling::report::{CouplingReport, PairCount};
use cochange_coupling::{AnalysisOptions, CommitRecord, ProgressEvent};

#[derive(Parser)]
#[command(
    name = "cochange",
    version,
    about = "Logical and temporal co-change coupling from git history",
    long_about = "cochange finds files that change together.\n\n\
                   Logical coupling counts file pairs modified in the same commit.\n\
                   Temporal coupling counts file pairs modified in different commits\n\
                   that land within a time window of each other.\n\n\
                   Examples:\n  \
                     cochange analyze                         Analyze the repository in .\n  \
                     cochange analyze --ext js --top 10       Only .js files, top 10 pairs\n  \
                     cochange analyze --window 6 --window 24  Custom windows in hours\n  \
                     cochange analyze --commits records.json  Analyze pre-extracted records\n  \
                     cochange init                            Write a default .cochange.toml"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Path to configuration file (default: .cochange.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(
        long,
        global = true,
        default_value = "text",
        long_help = "Output format for command results.\n\n\
                       Formats:\n  \
                         text      Human-readable tables (default)\n  \
                         json      Machine-readable JSON with camelCase keys\n  \
                         markdown  GitHub-flavored Markdown"
    )]
    format: OutputFormat,

    /// Enable verbose output
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Compute logical and temporal coupling
    #[command(long_about = "Compute logical and temporal coupling.\n\n\
        Mines commit history using git2 (or reads commit records from a JSON file),\n\
        counts co-changed file pairs within commits and across commits inside each\n\
        time window, and reports the highest-count pairs.\n\n\
        Examples:\n  cochange analyze --path ../react --ext js\n  cochange analyze --window 24 --window 72 --top 20\n  cochange analyze --output-dir results/")]
    Analyze {
        /// Repository path (default: current directory)
        #[arg(long, default_value = ".")]
        path: PathBuf,

        /// Read commit records from a JSON file instead of git history
        #[arg(
            long,
            conflicts_with = "path",
            long_help = "Read commit records from a JSON file instead of git history.\n\n\
                Format: [{\"timestamp\": 1700000000, \"files\": [\"a.js\", \"b.js\"]}, ...]\n\
                Timestamps are Unix seconds and must be ascending unless --full-scan is set."
        )]
        commits: Option<PathBuf>,

        /// Temporal window width in hours (repeatable; default: 24, 48, 72)
        #[arg(long = "window", value_name = "HOURS")]
        windows: Vec<u64>,

        /// Number of top pairs per table (default: 3)
        #[arg(long)]
        top: Option<usize>,

        /// Only count files with this extension (repeatable; default: all files)
        #[arg(long = "ext", value_name = "EXT")]
        extensions: Vec<String>,

        /// Only include commits from the last N days
        #[arg(long)]
        since: Option<u64>,

        /// Branch to walk (default: HEAD)
        #[arg(long)]
        branch: Option<String>,

        /// Skip commits touching more files than this
        #[arg(long)]
        max_files: Option<usize>,

        /// Accept unsorted records by comparing every pair of commits
        #[arg(long)]
        full_scan: bool,

        /// Report every pair instead of the top N
        #[arg(long)]
        raw: bool,

        /// Also write logical_coupling.json and temporal_coupling.json here
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },
    /// Create a default .cochange.toml in the current directory
    Init,
    /// Generate shell completion scripts
    #[command(hide = true)]
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

const DEFAULT_CONFIG: &str = r#"# cochange configuration

[analysis]
# Temporal window widths in hours
# windows_hours = [24, 48, 72]
# Pairs reported per table
# top_n = 3
# "reject" fails on unsorted records, "full-scan" compares every commit pair
# order_policy = "reject"

[mining]
# Only count files with these extensions (empty: all files)
# extensions = ["js"]
# since_days = 180
# max_files_per_commit = 50
# branch = "main"
# include_merges = false
"#;

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn log_progress(event: ProgressEvent) {
    match event {
        ProgressEvent::LogicalStarted { commits } => {
            info!(commits, "starting logical coupling analysis")
        }
        ProgressEvent::LogicalFinished { pairs } => debug!(pairs, "logical coupling done"),
        ProgressEvent::TemporalStarted { commits, windows } => {
            info!(commits, windows, "starting temporal coupling analysis")
        }
        ProgressEvent::WindowFinished { window, pairs } => {
            debug!(%window, pairs, "temporal window done")
        }
        ProgressEvent::FullScanFallback { commits } => {
            info!(commits, "records are unsorted, comparing every commit pair")
        }
    }
}

fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .build(),
        )
    }))
    .expect("miette handler");
    human_panic::setup_panic!();

    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = match &cli.config {
        Some(path) => CochangeConfig::from_file(path)?,
        None => {
            let default_path = Path::new(".cochange.toml");
            if default_path.exists() {
                CochangeConfig::from_file(default_path)?
            } else {
                CochangeConfig::default()
            }
        }
    };
    debug!(format = %cli.format, "configuration loaded");

    match cli.command {
        None => {
            Cli::command().print_help().into_diagnostic()?;
        }
        Some(Command::Analyze {
            ref path,
            ref commits,
            ref windows,
            top,
            ref extensions,
            since,
            ref branch,
            max_files,
            full_scan,
            raw,
            ref output_dir,
        }) => {
            if !windows.is_empty() {
                config.analysis.windows_hours = windows.clone();
            }
            if let Some(top) = top {
                config.analysis.top_n = top;
            }
            if full_scan {
                config.analysis.order_policy = OrderPolicy::FullScan;
            }
            if !extensions.is_empty() {
                config.mining.extensions = extensions.clone();
            }
            if since.is_some() {
                config.mining.since_days = since;
            }
            if branch.is_some() {
                config.mining.branch = branch.clone();
            }
            if max_files.is_some() {
                config.mining.max_files_per_commit = max_files;
            }
            config.analysis.validate()?;

            let records = match commits {
                Some(file) => {
                    let records = cochange_coupling::record::load_records(file)?;
                    info!(records = records.len(), file = %file.display(), "loaded commit records");
                    records
                }
                None => mine_records(path, &config)?,
            };

            let options = AnalysisOptions::from_config(&config.analysis);
            let analysis = cochange_coupling::analyze(&records, &options, &log_progress)?;
            let limit = if raw {
                None
            } else {
                Some(config.analysis.top_n)
            };
            let report = analysis.report(limit);

            if let Some(dir) = output_dir {
                write_report_files(dir, &report)?;
            }

            match cli.format {
                OutputFormat::Json => {
                    println!(
                        "{}",
                        serde_json::to_string_pretty(&report).into_diagnostic()?
                    );
                }
                OutputFormat::Markdown => print!("{}", render_markdown(&report)),
                OutputFormat::Text => print!("{}", render_text(&report)),
            }
        }
        Some(Command::Init) => {
            let path = Path::new(".cochange.toml");
            if path.exists() {
                miette::bail!(".cochange.toml already exists");
            }
            std::fs::write(path, DEFAULT_CONFIG).into_diagnostic()?;
            println!("Created .cochange.toml with default configuration");
        }
        Some(Command::Completions { shell }) => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "cochange", &mut std::io::stdout());
        }
    }

    Ok(())
}

fn mine_records(path: &Path, config: &CochangeConfig) -> Result<Vec<CommitRecord>> {
    // Hint: not a git repository
    if !path.join(".git").exists() && git2::Repository::discover(path).is_err() {
        miette::bail!(miette::miette!(
            help = "Run cochange from inside a git repository, specify --path to one, or pass --commits",
            "Not a git repository: {}",
            path.display()
        ));
    }

    let options = cochange_gitpulse::mining::MiningOptions::from_config(&config.mining);

    let pb = if std::io::stderr().is_terminal() {
        let pb = indicatif::ProgressBar::new_spinner();
        pb.set_style(
            indicatif::ProgressStyle::with_template("{spinner:.cyan} {msg} ({elapsed})")
                .into_diagnostic()?,
        );
        pb.set_message(format!("Mining git history at {}", path.display()));
        pb.enable_steady_tick(Duration::from_millis(100));
        Some(pb)
    } else {
        None
    };

    let mined = cochange_gitpulse::mining::mine_history(path, &options);
    if let Some(pb) = pb {
        pb.finish_and_clear();
    }
    let mined = mined?;

    let records = cochange_gitpulse::normalize::normalize(&mined, &config.mining.extensions);
    info!(
        mined = mined.len(),
        relevant = records.len(),
        "mined git history"
    );
    Ok(records)
}

fn write_report_files(dir: &Path, report: &CouplingReport) -> Result<()> {
    std::fs::create_dir_all(dir).into_diagnostic()?;

    let logical_path = dir.join("logical_coupling.json");
    std::fs::write(
        &logical_path,
        serde_json::to_string_pretty(&report.logical).into_diagnostic()?,
    )
    .into_diagnostic()?;
    info!(path = %logical_path.display(), "logical coupling saved");

    let temporal_path = dir.join("temporal_coupling.json");
    std::fs::write(
        &temporal_path,
        serde_json::to_string_pretty(&report.temporal).into_diagnostic()?,
    )
    .into_diagnostic()?;
    info!(path = %temporal_path.display(), "temporal coupling saved");

    Ok(())
}

fn format_date(timestamp: i64) -> String {
    chrono::DateTime::from_timestamp(timestamp, 0)
        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| timestamp.to_string())
}

fn date_range(report: &CouplingReport) -> Option<String> {
    match (report.first_commit, report.last_commit) {
        (Some(first), Some(last)) => Some(format!(
            "{} to {}",
            format_date(first),
            format_date(last)
        )),
        _ => None,
    }
}

fn render_text(report: &CouplingReport) -> String {
    let mut out = String::new();
    match date_range(report) {
        Some(range) => out.push_str(&format!(
            "Commits analyzed: {} ({range})\n\n",
            report.commits_analyzed
        )),
        None => out.push_str("Commits analyzed: 0\n\n"),
    }

    out.push_str("Logical Coupling (same commit):\n");
    out.push_str(&format!("{:-<72}\n", ""));
    push_text_pairs(&mut out, &report.logical);
    out.push('\n');

    for window in &report.temporal {
        out.push_str(&format!("Temporal Coupling (window: {}):\n", window.window));
        out.push_str(&format!("{:-<72}\n", ""));
        push_text_pairs(&mut out, &window.pairs);
        out.push('\n');
    }
    out
}

fn push_text_pairs(out: &mut String, pairs: &[PairCount]) {
    if pairs.is_empty() {
        out.push_str("  No coupled pairs found.\n");
        return;
    }
    for (i, pair) in pairs.iter().enumerate() {
        out.push_str(&format!(
            "{:>3}. {} <-> {} (count={})\n",
            i + 1,
            pair.files[0],
            pair.files[1],
            pair.count
        ));
    }
}

fn render_markdown(report: &CouplingReport) -> String {
    let mut out = String::from("# Co-change Coupling\n\n");
    out.push_str(&format!(
        "**Commits analyzed:** {}\n\n",
        report.commits_analyzed
    ));
    if let Some(range) = date_range(report) {
        out.push_str(&format!("**Period:** {range}\n\n"));
    }

    out.push_str("## Logical Coupling\n\n");
    push_markdown_pairs(&mut out, &report.logical);

    for window in &report.temporal {
        out.push_str(&format!("## Temporal Coupling ({})\n\n", window.window));
        push_markdown_pairs(&mut out, &window.pairs);
    }
    out
}

fn push_markdown_pairs(out: &mut String, pairs: &[PairCount]) {
    if pairs.is_empty() {
        out.push_str("No coupled pairs found.\n\n");
        return;
    }
    out.push_str("| Rank | File A | File B | Count |\n");
    out.push_str("|------|--------|--------|-------|\n");
    for (i, pair) in pairs.iter().enumerate() {
        out.push_str(&format!(
            "| {} | `{}` | `{}` | {} |\n",
            i + 1,
            pair.files[0],
            pair.files[1],
            pair.count
        ));
    }
    out.push('\n');
}
