//! usfm2osis - Fast USFM to OSIS converter

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Parser};
use serde::Serialize;

use usfm2osis::{BatchConfig, BatchReport, ConvertConfig, OsisWork, SortMode};

#[derive(Parser)]
#[command(name = "usfm2osis")]
#[command(version, about = "Convert USFM Bible books to a single OSIS document", long_about = None)]
#[command(after_help = "EXAMPLES:
    usfm2osis Bible.KJV *.usfm                  Convert to Bible.KJV.osis.xml
    usfm2osis Bible.KJV -r -s canonical usfm/*  Relaxed, canonical book order
    usfm2osis Bible.KJV -e cp1252 -l en *.SFM   Force input encoding")]
struct Cli {
    /// OSIS work identifier (osisIDWork), e.g. Bible.KJV
    #[arg(value_name = "WORK")]
    work: String,

    /// USFM files or patterns with * and ? in the file name
    #[arg(value_name = "USFM", required = true)]
    inputs: Vec<String>,

    /// Output file [default: <WORK>.osis.xml]
    #[arg(short, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Input encoding, overriding \ide and UTF-8 detection
    #[arg(short, value_name = "ENCODING")]
    encoding: Option<String>,

    /// Relaxed markup processing for non-standard USFM
    #[arg(short)]
    relaxed: bool,

    /// Book order: natural, alpha, canonical, usfm, random or none
    #[arg(short, value_name = "MODE", default_value_t = SortMode::Natural)]
    sort: SortMode,

    /// Number of worker threads
    #[arg(short, value_name = "NUM")]
    threads: Option<usize>,

    /// Language code of the text (xml:lang)
    #[arg(short, value_name = "LANG", default_value = "und")]
    language: String,

    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, action = ArgAction::Count)]
    verbose: u8,

    /// Debug mode: single-threaded with debug logging
    #[arg(short)]
    debug: bool,

    /// Accepted for compatibility; output is not schema-validated
    #[arg(short = 'x')]
    validate: bool,

    /// Exit with status 2 when any book had conformance violations
    #[arg(long)]
    strict_exit: bool,

    /// Write the unhandled-marker and violation summary as JSON
    #[arg(long, value_name = "FILE")]
    report_json: Option<PathBuf>,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    work: &'a str,
    output: String,
    unhandled: &'a [String],
    total_violations: usize,
    books: Vec<JsonBook<'a>>,
}

#[derive(Serialize)]
struct JsonBook<'a> {
    file: String,
    book: &'a str,
    violations: usize,
}

fn setup_logging(verbosity: u8, debug: bool) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let level = match (debug, verbosity) {
        (_, 3..) => tracing::Level::TRACE,
        (true, _) | (_, 2) => tracing::Level::DEBUG,
        (_, 1) => tracing::Level::INFO,
        _ => tracing::Level::WARN,
    };

    let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_names(false)
        .with_line_number(false);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    setup_logging(cli.verbose, cli.debug);

    if cli.validate {
        tracing::warn!("-x given; XML validation is not performed");
    }

    match convert(&cli) {
        Ok(report) if cli.strict_exit && report.has_violations() => ExitCode::from(2),
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn convert(cli: &Cli) -> usfm2osis::Result<BatchReport> {
    let work = OsisWork::new(cli.work.as_str()).with_language(cli.language.as_str());
    let convert = if cli.relaxed {
        ConvertConfig::relaxed()
    } else {
        ConvertConfig::default()
    };
    let mut config = BatchConfig::new(work)
        .with_convert(convert)
        .with_sort(cli.sort);
    if let Some(label) = &cli.encoding {
        config = config.with_encoding(label.as_str());
    }
    if cli.debug {
        config = config.with_threads(1);
    } else if let Some(threads) = cli.threads {
        config = config.with_threads(threads);
    }

    let output = cli
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(format!("{}.osis.xml", cli.work)));

    println!("Converting USFM documents to OSIS...");
    let report = usfm2osis::run(cli.inputs.as_slice(), &output, &config)?;
    println!("Done! Wrote {} books to {}", report.books.len(), output.display());

    for book in report.books.iter().filter(|b| b.violations > 0) {
        println!(
            "{}: {} conformance violation(s) in {}",
            book.book,
            book.violations,
            book.path.display()
        );
    }
    if !report.unhandled.is_empty() {
        println!();
        println!(
            "Unhandled USFM tags: {} ({} total)",
            report.unhandled.join(","),
            report.unhandled.len()
        );
        if !cli.relaxed {
            println!("Consider using the -r option for relaxed markup processing");
        }
    }

    if let Some(path) = &cli.report_json {
        let json = JsonReport {
            work: &cli.work,
            output: output.display().to_string(),
            unhandled: &report.unhandled,
            total_violations: report.total_violations(),
            books: report
                .books
                .iter()
                .map(|b| JsonBook {
                    file: b.path.display().to_string(),
                    book: &b.book,
                    violations: b.violations,
                })
                .collect(),
        };
        let text = serde_json::to_string_pretty(&json).map_err(std::io::Error::other)?;
        fs::write(path, text)?;
    }

    Ok(report)
}
