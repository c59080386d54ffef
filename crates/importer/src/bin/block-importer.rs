// ABOUTME: CLI binary for the block importer.
// ABOUTME: Converts legacy HTML files (or JSON feeds) into canonical block tables in various formats.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

use block_importer::{
    load_rules_file, EmptyBlockPolicy, ImportError, ImportResult, Importer, OutputFormat,
};
use clap::Parser;
use tracing_subscriber::EnvFilter;
use url::Url;

#[derive(Parser, Debug)]
#[command(name = "block-importer")]
#[command(about = "Convert legacy page markup into canonical content blocks")]
struct Args {
    /// Output format: html (default), markdown/md, json
    #[arg(short = 'f', long = "format", default_value = "html")]
    format: String,

    /// Output file path (default: stdout)
    #[arg(short = 'o', long = "output")]
    output: Option<PathBuf>,

    /// JSON file with extraction tables replacing the built-in ones
    #[arg(long = "rules")]
    rules: Option<PathBuf>,

    /// Base URL for resolving relative image and link references
    #[arg(long = "base-url")]
    base_url: Option<String>,

    /// What to do with matched subtrees that yield no content: placeholder (default) or skip
    #[arg(long = "empty-blocks", default_value = "placeholder")]
    empty_blocks: String,

    /// Treat inputs as JSON feeds and build one card per entry
    #[arg(long = "feed")]
    feed: bool,

    /// Print elapsed time in ms to stderr
    #[arg(long = "timing")]
    timing: bool,

    /// Input files
    #[arg()]
    inputs: Vec<PathBuf>,
}

fn build_importer(args: &Args) -> Result<Importer, ImportError> {
    let mut builder = Importer::builder()
        .format(OutputFormat::from(args.format.as_str()))
        .empty_blocks(EmptyBlockPolicy::from(args.empty_blocks.as_str()));

    if let Some(base) = &args.base_url {
        let url = Url::parse(base)
            .map_err(|e| ImportError::config(base.as_str(), "parse base url", Some(e.into())))?;
        builder = builder.base_url(url);
    }
    if let Some(path) = &args.rules {
        builder = builder.rules(load_rules_file(path)?);
    }
    builder.build()
}

fn import_one(importer: &Importer, path: &Path, feed: bool) -> Result<ImportResult, ImportError> {
    if feed {
        let json = fs::read_to_string(path).map_err(|e| {
            ImportError::io(path.display().to_string(), "read feed", Some(e.into()))
        })?;
        importer.import_feed(&json)
    } else {
        importer.import_file(path)
    }
}

/// Format output for one or more results.
///
/// JSON output serializes the full result(s); other formats emit the document
/// only, separated by blank lines when there are several inputs.
fn format_output(results: &[ImportResult], format: OutputFormat) -> Result<String, serde_json::Error> {
    if format == OutputFormat::Json {
        return if results.len() == 1 {
            serde_json::to_string_pretty(&results[0])
        } else {
            serde_json::to_string_pretty(results)
        };
    }
    let rendered = results
        .iter()
        .map(|r| r.render(format))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rendered.join("\n\n"))
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    if args.inputs.is_empty() {
        eprintln!("error: at least one input file is required");
        return ExitCode::from(1);
    }

    let importer = match build_importer(&args) {
        Ok(importer) => importer,
        Err(e) => {
            eprintln!("error: {}", e);
            return ExitCode::from(1);
        }
    };

    let start = Instant::now();
    let mut results: Vec<ImportResult> = Vec::new();
    let mut had_error = false;

    for path in &args.inputs {
        match import_one(&importer, path, args.feed) {
            Ok(result) => {
                for issue in &result.issues {
                    eprintln!("warning: {}: {}", path.display(), issue.message);
                }
                results.push(result);
            }
            Err(e) => {
                eprintln!("error importing {:?}: {}", path, e);
                had_error = true;
            }
        }
    }

    let elapsed = start.elapsed();

    if !results.is_empty() {
        match format_output(&results, importer.options().format) {
            Ok(output_str) => {
                if let Some(output_path) = &args.output {
                    if let Err(e) = fs::write(output_path, &output_str) {
                        eprintln!("error writing to {:?}: {}", output_path, e);
                        had_error = true;
                    }
                } else {
                    println!("{}", output_str);
                }
            }
            Err(e) => {
                eprintln!("error formatting output: {}", e);
                had_error = true;
            }
        }
    }

    if args.timing {
        let _ = writeln!(io::stderr(), "elapsed: {}ms", elapsed.as_millis());
    }

    if had_error {
        ExitCode::from(1)
    } else {
        ExitCode::SUCCESS
    }
}
