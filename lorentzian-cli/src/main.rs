//! Lorentzian CLI: run the signal engine over CSV or synthetic bars.
//!
//! Commands:
//! - `run`: process one or more streams and write per-bar results as JSONL
//! - `config`: print the effective configuration as TOML
//! - `validate`: check a configuration file and print its fingerprint

mod bars;
mod logging;
mod runner;

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use lorentzian_core::LorentzianConfig;

use bars::{load_csv, symbol_from_path, synthetic_stream, Stream};
use logging::LogFormat;
use runner::StreamReport;

#[derive(Parser)]
#[command(
    name = "lorentzian",
    version,
    about = "Lorentzian k-NN signal engine over OHLCV bars"
)]
struct Cli {
    /// Log output format (logs go to stderr).
    #[arg(long, value_enum, default_value_t = LogFormat::Pretty, global = true)]
    log_format: LogFormat,

    /// Default log level; RUST_LOG overrides it.
    #[arg(long, default_value = "info", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Process bar streams and write one JSON record per bar.
    Run {
        /// Path to a TOML config file. Defaults are used when omitted.
        #[arg(long)]
        config: Option<PathBuf>,

        /// CSV files with `date,open,high,low,close[,volume]` columns, one stream each.
        #[arg(long, num_args = 1..)]
        bars: Vec<PathBuf>,

        /// Symbols. With --bars, overrides the file-name symbol (one per file).
        /// With --synthetic, names the generated streams.
        #[arg(long, num_args = 1..)]
        symbol: Vec<String>,

        /// Timeframe label attached to every stream.
        #[arg(long, default_value = "1d")]
        timeframe: String,

        /// Generate this many seeded synthetic bars per symbol instead of reading CSV.
        #[arg(long, conflicts_with = "bars")]
        synthetic: Option<usize>,

        /// Output file. Defaults to stdout.
        #[arg(long)]
        output: Option<PathBuf>,

        /// Only write bars with an entry or exit event.
        #[arg(long, default_value_t = false)]
        events_only: bool,
    },
    /// Print the effective configuration as TOML.
    Config {
        /// Path to a TOML config file to merge over defaults.
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Validate a configuration file and print its fingerprint.
    Validate {
        /// Path to a TOML config file.
        #[arg(long)]
        config: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging(&cli.log_level, cli.log_format)?;

    match cli.command {
        Commands::Run {
            config,
            bars,
            symbol,
            timeframe,
            synthetic,
            output,
            events_only,
        } => cmd_run(
            config.as_deref(),
            &bars,
            &symbol,
            &timeframe,
            synthetic,
            output.as_deref(),
            events_only,
        ),
        Commands::Config { config } => cmd_config(config.as_deref()),
        Commands::Validate { config } => cmd_validate(&config),
    }
}

fn load_config(path: Option<&Path>) -> Result<LorentzianConfig> {
    match path {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            LorentzianConfig::from_toml_str(&text)
                .with_context(|| format!("bad config in {}", path.display()))
        }
        None => Ok(LorentzianConfig::default()),
    }
}

fn collect_streams(
    bars: &[PathBuf],
    symbols: &[String],
    timeframe: &str,
    synthetic: Option<usize>,
) -> Result<Vec<Stream>> {
    if let Some(len) = synthetic {
        if symbols.is_empty() {
            bail!("--synthetic needs at least one --symbol");
        }
        return Ok(symbols
            .iter()
            .map(|s| synthetic_stream(s, timeframe, len))
            .collect());
    }

    if bars.is_empty() {
        bail!("nothing to run: pass --bars <CSV>... or --synthetic <N> --symbol <S>...");
    }
    if !symbols.is_empty() && symbols.len() != bars.len() {
        bail!(
            "got {} --symbol values for {} --bars files",
            symbols.len(),
            bars.len()
        );
    }

    bars.iter()
        .enumerate()
        .map(|(i, path)| -> Result<Stream> {
            let symbol = match symbols.get(i) {
                Some(s) => s.clone(),
                None => symbol_from_path(path)?,
            };
            Ok(Stream {
                key: lorentzian_core::StreamKey::new(symbol, timeframe),
                bars: load_csv(path)?,
            })
        })
        .collect()
}

fn write_records<W: Write>(out: W, reports: &[StreamReport], events_only: bool) -> Result<usize> {
    let mut out = BufWriter::new(out);
    let mut written = 0;
    for record in reports
        .iter()
        .flat_map(|r| &r.records)
        .filter(|r| !events_only || r.result.has_event())
    {
        serde_json::to_writer(&mut out, record)?;
        out.write_all(b"\n")?;
        written += 1;
    }
    out.flush()?;
    Ok(written)
}

fn cmd_run(
    config_path: Option<&Path>,
    bars: &[PathBuf],
    symbols: &[String],
    timeframe: &str,
    synthetic: Option<usize>,
    output: Option<&Path>,
    events_only: bool,
) -> Result<()> {
    let config = load_config(config_path)?;
    let hash = config.config_hash()?;
    info!(config = %hash.short(), "configuration loaded");

    let streams = collect_streams(bars, symbols, timeframe, synthetic)?;
    let reports = runner::run_all(&config, &streams)?;

    for report in &reports {
        info!(
            stream = %report.key,
            bars = report.records.len(),
            rejected = report.rejected,
            entries = report.entries,
            exits = report.exits,
            "stream summary"
        );
    }

    let written = match output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            write_records(file, &reports, events_only)?
        }
        None => write_records(io::stdout().lock(), &reports, events_only)?,
    };
    info!(records = written, "done");
    Ok(())
}

fn cmd_config(config_path: Option<&Path>) -> Result<()> {
    let config = load_config(config_path)?;
    print!("{}", config.to_toml_string()?);
    Ok(())
}

fn cmd_validate(config_path: &Path) -> Result<()> {
    let config = load_config(Some(config_path))?;
    let hash = config.config_hash()?;
    println!("ok {} ({} features)", hash, config.feature_count());
    Ok(())
}
