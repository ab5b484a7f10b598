use chrono::Local;
use clap::{Args, Parser, Subcommand, ValueEnum};
use glance::config::{self, GlanceConfig};
use glance::source::{load_payload, CachedSource, LineScoreSource};
use glance::{report, scoring, GlanceError, RenderPayload};
use std::io;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "glance")]
#[command(author, version, about = "Paint per-line heat onto highlighted code listings")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Config file (default: ./glance.toml if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Show debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Only log warnings and errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,
}

/// Where scored windows come from
#[derive(Args, Debug, Default)]
struct SourceArgs {
    /// Scoring endpoint, queried as <ENDPOINT>?file=<FILE>
    #[arg(long)]
    endpoint: Option<String>,

    /// Directory of pre-computed payloads (<DIR>/<FILE>.json)
    #[arg(long)]
    payload_dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a file's heat overlay to an HTML page (or .json / .csv scores)
    Render {
        /// File identifier passed to the scorer
        #[arg(short, long)]
        file: Option<String>,

        /// Read the payload from this JSON file instead of a source
        #[arg(long)]
        payload: Option<PathBuf>,

        #[command(flatten)]
        source: SourceArgs,

        /// Output file; format follows the extension
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Don't open the page when done
        #[arg(long)]
        no_open: bool,
    },

    /// Print per-line scores
    Scores {
        #[arg(short, long)]
        file: Option<String>,

        #[arg(long)]
        payload: Option<PathBuf>,

        #[command(flatten)]
        source: SourceArgs,

        #[arg(long, value_enum, default_value_t = ScoreFormat::Table)]
        format: ScoreFormat,
    },

    /// List the highest-scoring windows
    Top {
        #[arg(short, long)]
        file: Option<String>,

        #[arg(long)]
        payload: Option<PathBuf>,

        #[command(flatten)]
        source: SourceArgs,

        /// How many windows to show
        #[arg(short = 'n', long, default_value = "5")]
        top: usize,
    },

    /// Start a local server rendering pages on request
    Serve {
        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,

        #[command(flatten)]
        source: SourceArgs,

        /// Don't open the browser
        #[arg(long)]
        no_open: bool,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum ScoreFormat {
    Table,
    Json,
    Csv,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    if let Err(e) = run(cli) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool, quiet: bool) {
    let default = if verbose {
        "glance=debug"
    } else if quiet {
        "glance=warn"
    } else {
        "glance=info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

fn run(cli: Cli) -> glance::Result<()> {
    let config = config::load_config(cli.config.as_deref())?;

    match cli.command {
        Command::Render { file, payload, source, output, no_open } => {
            let (file, payload) = fetch(&config, &source, file, payload.as_deref())?;

            let output = match output {
                Some(path) => path,
                None => {
                    std::fs::create_dir_all(&config.report_dir)?;
                    let timestamp = Local::now().format("%Y%m%d_%H%M%S");
                    config.report_dir.join(format!("glance_{}.html", timestamp))
                }
            };

            report::generate(&output, &file, &payload)?;
            eprintln!("\x1b[32mSaved: {}\x1b[0m", output.display());

            let is_page = matches!(
                output.extension().and_then(|e| e.to_str()),
                Some("html") | Some("htm")
            );
            if is_page && config.open_browser && !no_open {
                if let Err(e) = open::that(&output) {
                    eprintln!("Failed to open page: {}", e);
                }
            }
            Ok(())
        }

        Command::Scores { file, payload, source, format } => {
            let (file, payload) = fetch(&config, &source, file, payload.as_deref())?;
            let scores = scoring::line_scores(&payload.line_windows);
            let mut stdout = io::stdout().lock();

            match format {
                ScoreFormat::Json => report::json::write(&mut stdout, &file, &scores)?,
                ScoreFormat::Csv => report::csv::write(&mut stdout, &scores)?,
                ScoreFormat::Table => {
                    if scores.is_empty() {
                        println!("No scored lines.");
                    } else {
                        println!(
                            "{:>6}  {:>12}  {:>9}  {:>7}",
                            "LINE", "AVERAGE", "INTENSITY", "WINDOWS"
                        );
                        println!("{}", "-".repeat(40));
                        for s in &scores.lines {
                            println!(
                                "{:>6}  {:>12.6}  {:>9.3}  {:>7}",
                                s.line_number(),
                                s.average,
                                s.intensity,
                                s.windows
                            );
                        }
                    }
                }
            }
            Ok(())
        }

        Command::Top { file, payload, source, top } => {
            let (_, payload) = fetch(&config, &source, file, payload.as_deref())?;
            for window in report::top_windows(&payload, top) {
                println!(
                    "lines {}-{}  score {:.5}",
                    window.start_line, window.end_line, window.score
                );
            }
            Ok(())
        }

        Command::Serve { port, source, no_open } => {
            let config = apply_source_args(config, &source);
            let port = port.unwrap_or(config.port);
            let source = CachedSource::new(config.source()?);
            glance::serve::start(port, &source, config.open_browser && !no_open)
        }
    }
}

fn apply_source_args(mut config: GlanceConfig, args: &SourceArgs) -> GlanceConfig {
    if let Some(endpoint) = &args.endpoint {
        config = config.with_endpoint(endpoint.clone());
    }
    if let Some(dir) = &args.payload_dir {
        config = config.with_payload_dir(dir.clone());
    }
    config
}

/// Resolve the file identifier and its payload, from `--payload` or the
/// configured source.
fn fetch(
    config: &GlanceConfig,
    args: &SourceArgs,
    file: Option<String>,
    payload_path: Option<&Path>,
) -> glance::Result<(String, RenderPayload)> {
    if let Some(path) = payload_path {
        let payload = load_payload(path)?;
        let file = file.unwrap_or_else(|| path.display().to_string());
        return Ok((file, payload));
    }

    let file = file.ok_or(GlanceError::MissingFile)?;
    let source = apply_source_args(config.clone(), args).source()?;
    let payload = source.fetch_line_scores(&file)?;
    Ok((file, payload))
}
