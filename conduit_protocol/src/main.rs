// CLI entry point for batch pipe planning.
//
// Reads a `PlanRequest` as JSON, routes it, and writes the `PlanResponse` as
// pretty JSON to stdout (or `--output`). Logs go to stderr. Any rejected
// request or I/O failure exits with status 1; unroutable problems are part
// of a successful response.
//
// Usage:
//   conduit-plan [OPTIONS] <request.json>
//     --config <FILE>     Planner config JSON (default: built-in defaults)
//     --output <FILE>     Write the response here instead of stdout
//     --verbose           Debug-level logging (overrides RUST_LOG)
//
// A request path of `-` reads from stdin.

use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;

use conduit_protocol::logging::init_logging;
use conduit_protocol::{RequestError, handle_request, load_config, read_request};
use conduit_route::PlannerConfig;

struct CliArgs {
    request: PathBuf,
    config: Option<PathBuf>,
    output: Option<PathBuf>,
    verbose: bool,
}

fn main() {
    let args = parse_args();
    init_logging(args.verbose);

    if let Err(e) = run(&args) {
        tracing::error!(error = %e, "planning failed");
        eprintln!("conduit-plan: {e}");
        std::process::exit(1);
    }
}

fn run(args: &CliArgs) -> Result<(), RequestError> {
    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => PlannerConfig::default(),
    };

    let request = if args.request.as_os_str() == "-" {
        read_request(io::stdin().lock())?
    } else {
        read_request(File::open(&args.request)?)?
    };

    let response = handle_request(&request, &config)?;
    tracing::info!(
        problems = response.results.len(),
        routed = response.routed_count(),
        "request complete"
    );

    let json = serde_json::to_string_pretty(&response)?;
    match &args.output {
        Some(path) => std::fs::write(path, json + "\n")?,
        None => {
            let mut stdout = io::stdout().lock();
            writeln!(stdout, "{json}")?;
        }
    }
    Ok(())
}

/// Parse command-line arguments. Uses simple `std::env::args()` matching.
fn parse_args() -> CliArgs {
    let args: Vec<String> = std::env::args().collect();
    let mut request = None;
    let mut config = None;
    let mut output = None;
    let mut verbose = false;
    let mut i = 1;

    while i < args.len() {
        match args[i].as_str() {
            "--config" => {
                i += 1;
                config = Some(args.get(i).map(PathBuf::from).unwrap_or_else(|| {
                    eprintln!("--config requires a file path");
                    std::process::exit(1);
                }));
            }
            "--output" => {
                i += 1;
                output = Some(args.get(i).map(PathBuf::from).unwrap_or_else(|| {
                    eprintln!("--output requires a file path");
                    std::process::exit(1);
                }));
            }
            "--verbose" | "-v" => verbose = true,
            "--help" | "-h" => {
                print_usage();
                std::process::exit(0);
            }
            other if other.starts_with("--") => {
                eprintln!("Unknown argument: {other}");
                print_usage();
                std::process::exit(1);
            }
            path => {
                if request.is_some() {
                    eprintln!("Only one request file may be given");
                    std::process::exit(1);
                }
                request = Some(PathBuf::from(path));
            }
        }
        i += 1;
    }

    let Some(request) = request else {
        eprintln!("Missing request file");
        print_usage();
        std::process::exit(1);
    };

    CliArgs {
        request,
        config,
        output,
        verbose,
    }
}

fn print_usage() {
    println!("Usage: conduit-plan [OPTIONS] <request.json>");
    println!();
    println!("Options:");
    println!("  --config <FILE>     Planner config JSON (default: built-in defaults)");
    println!("  --output <FILE>     Write the response here instead of stdout");
    println!("  --verbose, -v       Debug-level logging (overrides RUST_LOG)");
    println!("  --help, -h          Show this help");
    println!();
    println!("Pass - as the request file to read from stdin.");
}
