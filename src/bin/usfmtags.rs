//! usfmtags - list the USFM markers used in files
//!
//! Prints, per file, the markers the converter knows and the ones it does
//! not.

use std::collections::BTreeSet;
use std::path::Path;
use std::process::ExitCode;

use clap::Parser;

use usfm2osis::driver::expand_inputs;
use usfm2osis::{SourceDocument, TagRegistry, marker_pattern};

#[derive(Parser)]
#[command(name = "usfmtags")]
#[command(version, about = "List known and unrecognized USFM markers", long_about = None)]
struct Cli {
    /// USFM files or patterns with * and ? in the file name
    #[arg(value_name = "USFM", required = true)]
    inputs: Vec<String>,

    /// Input encoding, overriding \ide and UTF-8 detection
    #[arg(short, value_name = "ENCODING")]
    encoding: Option<String>,
}

/// Whether the standard registry accepts `marker` (`\q2`, `\+nd*`).
fn is_known(registry: &TagRegistry, marker: &str) -> bool {
    let name = marker
        .trim_start_matches('\\')
        .trim_start_matches('+')
        .trim_end_matches('*');
    let Some(rule) = registry.lookup(name) else {
        return false;
    };
    let digits = name.len() - name.trim_end_matches(|c: char| c.is_ascii_digit()).len();
    match (rule.max_level, digits) {
        (Some(max), 1..) => name[name.len() - digits..]
            .parse::<u32>()
            .is_ok_and(|level| (1..=max).contains(&level)),
        _ => true,
    }
}

fn check_tags(path: &Path, encoding: Option<&str>) -> usfm2osis::Result<()> {
    let doc = SourceDocument::read(path, encoding)?;
    let registry = TagRegistry::standard();

    let mut known = BTreeSet::new();
    let mut unknown = BTreeSet::new();
    let mut count = 0;
    for found in marker_pattern().find_iter(&doc.text) {
        count += 1;
        let marker = found.as_str();
        if is_known(registry, marker) {
            known.insert(marker);
        } else {
            unknown.insert(marker);
        }
    }

    println!("Result for file: {}", path.display());
    println!("{count} matches found");
    println!("Known USFM Tags: {}", known.into_iter().collect::<Vec<_>>().join(","));
    println!("Unrecognized USFM Tags: {}", unknown.into_iter().collect::<Vec<_>>().join(","));
    println!();
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let paths = match expand_inputs(cli.inputs.as_slice()) {
        Ok(paths) => paths,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let mut status = ExitCode::SUCCESS;
    for path in &paths {
        if let Err(e) = check_tags(path, cli.encoding.as_deref()) {
            eprintln!("error: {}: {e}", path.display());
            status = ExitCode::FAILURE;
        }
    }
    status
}
