// ABOUTME: CLI binary for the stylecull inline-style filter.
// ABOUTME: Reads HTML from files or stdin and writes filtered, minified documents.

use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

use clap::Parser;
use serde_json::json;
use stylecull::Processor;

#[derive(Parser, Debug)]
#[command(name = "stylecull")]
#[command(about = "Remove unused CSS from inline style blocks and minify what remains")]
struct Args {
    /// HTML file(s) to process. Use "-" or no files to read from stdin.
    #[arg()]
    files: Vec<PathBuf>,

    /// Output file path (default: stdout; single input only)
    #[arg(short = 'o', long = "output")]
    output: Option<PathBuf>,

    /// Rewrite each input file in place
    #[arg(short = 'i', long = "in-place")]
    in_place: bool,

    /// Print a JSON summary per input instead of the document text
    #[arg(long = "json")]
    json_output: bool,

    /// Print elapsed time in ms to stderr
    #[arg(long = "timing")]
    timing: bool,
}

fn read_input(path: &Path) -> io::Result<String> {
    if path.as_os_str() == "-" {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        Ok(buf)
    } else {
        fs::read_to_string(path)
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let files = if args.files.is_empty() {
        vec![PathBuf::from("-")]
    } else {
        args.files.clone()
    };
    let reads_stdin = files.iter().any(|p| p.as_os_str() == "-");

    // Validate args
    if args.output.is_some() && files.len() > 1 {
        eprintln!("error: --output is only valid with a single input");
        return ExitCode::from(1);
    }

    if args.in_place && args.output.is_some() {
        eprintln!("error: cannot use both --in-place and --output");
        return ExitCode::from(1);
    }

    if args.in_place && reads_stdin {
        eprintln!("error: --in-place requires file inputs");
        return ExitCode::from(1);
    }

    let processor = Processor::new();
    let start = Instant::now();
    let mut had_error = false;

    for path in &files {
        let input = match read_input(path) {
            Ok(input) => input,
            Err(e) => {
                eprintln!("error reading {:?}: {}", path, e);
                had_error = true;
                continue;
            }
        };

        let output = match processor.process(&input).await {
            Ok(output) => output,
            Err(e) => {
                eprintln!("error processing {:?}: {}", path, e);
                had_error = true;
                continue;
            }
        };

        if args.json_output {
            let summary = json!({
                "path": path.display().to_string(),
                "bytes_in": input.len(),
                "bytes_out": output.len(),
            });
            println!("{}", summary);
        }

        if args.in_place {
            if let Err(e) = fs::write(path, &output) {
                eprintln!("error writing {:?}: {}", path, e);
                had_error = true;
            }
        } else if let Some(output_path) = &args.output {
            if let Err(e) = fs::write(output_path, &output) {
                eprintln!("error writing {:?}: {}", output_path, e);
                had_error = true;
            }
        } else if !args.json_output {
            print!("{}", output);
            let _ = io::stdout().flush();
        }
    }

    // Print timing if requested
    if args.timing {
        let _ = writeln!(io::stderr(), "elapsed: {}ms", start.elapsed().as_millis());
    }

    if had_error {
        ExitCode::from(1)
    } else {
        ExitCode::SUCCESS
    }
}
