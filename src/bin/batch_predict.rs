//! Batch prediction entry point.
//!
//! Loads a model artifact, reads a JSON request file, and writes the
//! prediction response to stdout:
//!
//! `batch_predict --model model.json --input request.json [--pretty]`
//!
//! Logging goes to stderr via `env_logger` (`RUST_LOG=info` for load-time
//! details).

use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::process::ExitCode;

use housecast::{ModelArtifact, PredictionRequest, PredictionService};

const USAGE: &str = "usage: batch_predict --model <artifact.json> --input <request.json> [--pretty]";

#[derive(Debug)]
struct Args {
    model: PathBuf,
    input: PathBuf,
    pretty: bool,
}

fn parse_args() -> Result<Args, String> {
    let mut model = None;
    let mut input = None;
    let mut pretty = false;

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--model" => {
                model = Some(PathBuf::from(
                    args.next().ok_or("--model requires a path")?,
                ));
            }
            "--input" => {
                input = Some(PathBuf::from(
                    args.next().ok_or("--input requires a path")?,
                ));
            }
            "--pretty" => pretty = true,
            other => return Err(format!("unknown argument: {other}")),
        }
    }

    Ok(Args {
        model: model.ok_or("--model is required")?,
        input: input.ok_or("--input is required")?,
        pretty,
    })
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let artifact = ModelArtifact::load(&args.model)?;
    let service = PredictionService::from_artifact(artifact);

    let file = File::open(&args.input)?;
    let request: PredictionRequest = serde_json::from_reader(BufReader::new(file))?;
    log::info!("predicting over {} input records", request.inputs.len());

    let result = service.handle(&request)?;
    let body = if args.pretty {
        serde_json::to_string_pretty(&result)?
    } else {
        serde_json::to_string(&result)?
    };
    println!("{body}");
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();

    let args = match parse_args() {
        Ok(args) => args,
        Err(message) => {
            eprintln!("{message}");
            eprintln!("{USAGE}");
            return ExitCode::from(2);
        }
    };

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("error: {error}");
            ExitCode::FAILURE
        }
    }
}
