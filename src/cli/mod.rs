//! CLI definition and handler

use anyhow::{Context, Result};
use clap::Parser;
use codestylo::config::{load_config, load_config_file, MAX_WORKERS};
use codestylo::{discover_files, ErrorPolicy, Extraction, ExtractionConfig, MissingMarker, RowLabel};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use tracing::warn;

/// Parse and validate workers count (1-64)
fn parse_workers(s: &str) -> Result<usize, String> {
    let n: usize = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;
    if n == 0 {
        Err("workers must be at least 1".to_string())
    } else if n > MAX_WORKERS {
        Err(format!("workers cannot exceed {}", MAX_WORKERS))
    } else {
        Ok(n)
    }
}

/// Extract stylometric features from a corpus of Java files
#[derive(Parser, Debug)]
#[command(name = "codestylo")]
#[command(
    version,
    about = "Stylometric feature extraction for source-code authorship",
    after_help = "\
Examples:
  codestylo corpus/                          CSV to stdout
  codestylo corpus/ -o features.csv          CSV to a file
  codestylo corpus/ --label author --missing nan
  codestylo corpus/ --on-error skip-failed   Leave out files that fail to parse

Settings are read from codestylo.toml in the corpus directory; flags override them."
)]
pub struct Cli {
    /// Corpus directory
    pub path: PathBuf,

    /// Output CSV file (default: stdout)
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,

    /// Config file (default: <PATH>/codestylo.toml)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Number of parallel workers (1-64)
    #[arg(long, value_parser = parse_workers)]
    pub workers: Option<usize>,

    /// What to do when a file fails to read, tokenize or parse
    #[arg(long, value_parser = ["fail-fast", "skip-failed"])]
    pub on_error: Option<String>,

    /// How missing cells are written
    #[arg(long, value_parser = ["empty", "nan"])]
    pub missing: Option<String>,

    /// Leading label column
    #[arg(long, value_parser = ["none", "path", "author"])]
    pub label: Option<String>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "warn", value_parser = ["error", "warn", "info", "debug", "trace"])]
    pub log_level: String,

    /// Hide the progress bar
    #[arg(long)]
    pub no_progress: bool,
}

/// Fold command-line overrides into the file config
fn apply_overrides(cli: &Cli, config: &mut ExtractionConfig) -> Result<()> {
    if let Some(workers) = cli.workers {
        config.workers = workers;
    }
    if let Some(ref policy) = cli.on_error {
        config.error_policy = policy.parse::<ErrorPolicy>()?;
    }
    if let Some(ref missing) = cli.missing {
        config.export.missing = missing.parse::<MissingMarker>()?;
    }
    if let Some(ref label) = cli.label {
        config.export.label = label.parse::<RowLabel>()?;
    }
    Ok(())
}

fn create_bar(total: usize, hidden: bool) -> Result<ProgressBar> {
    if hidden {
        return Ok(ProgressBar::hidden());
    }
    let bar = ProgressBar::new(total as u64);
    bar.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("█▓▒░  "),
    );
    bar.set_message("Extracting features...");
    Ok(bar)
}

pub fn run(cli: Cli) -> Result<()> {
    let mut config = match cli.config {
        Some(ref path) => load_config_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => load_config(&cli.path),
    };
    apply_overrides(&cli, &mut config)?;

    let files = discover_files(&cli.path, &config.extensions)
        .with_context(|| format!("Failed to read corpus {}", cli.path.display()))?;
    if files.is_empty() {
        warn!(
            "No files with extensions {:?} under {}",
            config.extensions,
            cli.path.display()
        );
    }

    let bar = create_bar(files.len(), cli.no_progress)?;
    let progress = bar.clone();
    let extraction = Extraction::from_config(&config)?
        .with_progress(Box::new(move |done: usize, _total: usize| progress.set_position(done as u64)));

    let report = extraction.run(&files);
    bar.finish_and_clear();
    let report = report.with_context(|| {
        format!("Feature extraction failed for {}", cli.path.display())
    })?;

    match cli.output {
        Some(ref path) => {
            let file = std::fs::File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            let mut writer = BufWriter::new(file);
            report.matrix.write_csv(&mut writer, &config.export)?;
            writer
                .flush()
                .with_context(|| format!("Failed to write {}", path.display()))?;
        }
        None => {
            let stdout = std::io::stdout();
            let mut writer = BufWriter::new(stdout.lock());
            report.matrix.write_csv(&mut writer, &config.export)?;
            writer.flush()?;
        }
    }

    eprintln!(
        "{} files, {} features, {} missing cells, {} skipped",
        report.matrix.n_rows(),
        report.matrix.n_cols(),
        report.matrix.missing_count(),
        report.failures.len()
    );
    for failure in &report.failures {
        eprintln!("  skipped {}: {}", failure.path.display(), failure.error);
    }

    Ok(())
}
