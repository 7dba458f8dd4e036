//! pixbrick: turn images and upload requests into brick grids.
//!
//! Three modes share one [`UploadConfig`]:
//!
//! - `grid` runs the transform on an image file and prints the grid
//! - `handle` answers one upload request body the way the game server does
//! - `stream` answers newline-delimited request bodies, one reply per line
//!
//! # Usage
//!
//! ```text
//! cargo run --release --bin pixbrick -- grid --grid-size 16 --preview out.png level.png
//! cargo run --release --bin pixbrick -- handle --input request.json
//! cargo run --release --bin pixbrick -- stream < requests.jsonl
//! ```

#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::error::Error;
use std::io::{self, BufRead, Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use pixbrick_export::{UploadConfig, UploadResponse, handle_upload, preview_png};

/// Preview pixels per cell side when `--cell-px` is not given.
const DEFAULT_CELL_PX: u32 = 16;

/// Convert images into brick grids for pixel-art breakout levels.
#[derive(Parser)]
#[command(name = "pixbrick", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Log at debug level.
    #[arg(long, short, global = true)]
    verbose: bool,

    /// Upload config as a JSON string, e.g. `{"default_grid_size": 32}`.
    ///
    /// Fields left out keep their defaults.
    #[arg(long, global = true)]
    config_json: Option<String>,
}

#[derive(Subcommand)]
enum Command {
    /// Pixelize an image file and print the grid as a success response.
    Grid(GridArgs),
    /// Answer one upload request body read from a file or stdin.
    Handle(HandleArgs),
    /// Answer JSONL request bodies from stdin with JSONL `{status, body}` replies.
    Stream,
}

#[derive(Args)]
struct GridArgs {
    /// Path to the input image (PNG, JPEG, BMP, WebP, GIF).
    image_path: PathBuf,

    /// Grid side length. Defaults to the configured default grid size.
    #[arg(long, allow_negative_numbers = true)]
    grid_size: Option<i64>,

    /// Write a PNG preview of the grid to this path.
    #[arg(long)]
    preview: Option<PathBuf>,

    /// Preview pixels per cell side.
    #[arg(long, default_value_t = DEFAULT_CELL_PX)]
    cell_px: u32,

    /// Pretty-print the JSON output.
    #[arg(long)]
    pretty: bool,
}

#[derive(Args)]
struct HandleArgs {
    /// Read the request body from this file instead of stdin.
    #[arg(long)]
    input: Option<PathBuf>,

    /// Pretty-print the JSON output.
    #[arg(long)]
    pretty: bool,
}

/// Build the [`UploadConfig`] from CLI arguments.
///
/// Without `--config-json` the defaults apply.
fn config_from_cli(cli: &Cli) -> Result<UploadConfig, String> {
    if let Some(ref json) = cli.config_json {
        return serde_json::from_str(json).map_err(|e| format!("Error parsing --config-json: {e}"));
    }
    Ok(UploadConfig::default())
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_millis()
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = match config_from_cli(&cli) {
        Ok(c) => c,
        Err(msg) => {
            eprintln!("{msg}");
            return ExitCode::FAILURE;
        }
    };
    log::debug!("config: {config:?}");

    let result = match cli.command {
        Command::Grid(ref args) => run_grid(args, &config),
        Command::Handle(ref args) => run_handle(args, &config),
        Command::Stream => run_stream(io::stdin().lock(), io::stdout().lock(), &config)
            .map(|answered| {
                log::info!("answered {answered} requests");
                ExitCode::SUCCESS
            })
            .map_err(Into::into),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run_grid(args: &GridArgs, config: &UploadConfig) -> Result<ExitCode, Box<dyn Error>> {
    let requested = args.grid_size.unwrap_or(config.default_grid_size);
    let grid_size = match config.check_grid_size(requested) {
        Ok(n) => n,
        Err(msg) => {
            print_response(&UploadResponse::failure(msg), args.pretty)?;
            return Ok(ExitCode::FAILURE);
        }
    };

    let image_bytes = std::fs::read(&args.image_path)
        .map_err(|e| format!("Error reading {}: {e}", args.image_path.display()))?;
    log::info!(
        "image: {} ({} bytes), grid size {grid_size}",
        args.image_path.display(),
        image_bytes.len(),
    );

    let grid = match pixbrick_pipeline::pixelize_bytes(image_bytes, grid_size) {
        Ok(grid) => grid,
        Err(e) => {
            print_response(&UploadResponse::failure(e.to_string()), args.pretty)?;
            return Ok(ExitCode::FAILURE);
        }
    };

    if let Some(ref path) = args.preview {
        let png = preview_png(&grid, args.cell_px)?;
        std::fs::write(path, &png)
            .map_err(|e| format!("Error writing preview to {}: {e}", path.display()))?;
        log::info!("preview written to {} ({} bytes)", path.display(), png.len());
    }

    print_response(&UploadResponse::success(grid), args.pretty)?;
    Ok(ExitCode::SUCCESS)
}

fn run_handle(args: &HandleArgs, config: &UploadConfig) -> Result<ExitCode, Box<dyn Error>> {
    let body = match args.input {
        Some(ref path) => std::fs::read_to_string(path)
            .map_err(|e| format!("Error reading {}: {e}", path.display()))?,
        None => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };

    let reply = handle_upload(&body, config);
    eprintln!("Status: {}", reply.status.code());
    print_response(&reply.body, args.pretty)?;

    Ok(if reply.status.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Answer each non-blank line of `input` with one JSON line on `output`.
///
/// Returns the number of requests answered. Per-request failures are
/// replies, not errors; only I/O failures stop the stream.
fn run_stream<R: BufRead, W: Write>(
    input: R,
    mut output: W,
    config: &UploadConfig,
) -> io::Result<usize> {
    let mut answered = 0;
    for line in input.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let reply = handle_upload(&line, config);
        serde_json::to_writer(&mut output, &reply)?;
        output.write_all(b"\n")?;
        output.flush()?;
        answered += 1;
    }
    Ok(answered)
}

fn print_response(response: &UploadResponse, pretty: bool) -> serde_json::Result<()> {
    let json = if pretty {
        response.to_json_pretty()?
    } else {
        response.to_json()?
    };
    println!("{json}");
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::io::Cursor;

    use base64::{Engine as _, engine::general_purpose};
    use clap::CommandFactory;
    use pixbrick_pipeline::{Cell, Grid, OpaqueCell};

    use super::*;

    /// A 2x2 PNG data URI, rendered through the preview so no image
    /// encoder is needed here.
    fn two_by_two_uri() -> String {
        let grid = Grid::try_from(vec![
            vec![Cell::Opaque(OpaqueCell::new(255, 0, 0, 255)), Cell::Empty],
            vec![Cell::Empty, Cell::Opaque(OpaqueCell::new(0, 0, 255, 255))],
        ])
        .unwrap();
        let png = preview_png(&grid, 1).unwrap();
        format!(
            "data:image/png;base64,{}",
            general_purpose::STANDARD.encode(png)
        )
    }

    fn stream(input: &str) -> (usize, Vec<serde_json::Value>) {
        let mut out = Vec::new();
        let answered = run_stream(Cursor::new(input), &mut out, &UploadConfig::default()).unwrap();
        let lines = String::from_utf8(out)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        (answered, lines)
    }

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn config_defaults_without_json() {
        let cli = Cli::try_parse_from(["pixbrick", "stream"]).unwrap();
        assert_eq!(config_from_cli(&cli).unwrap(), UploadConfig::default());
    }

    #[test]
    fn config_json_overrides_fields() {
        let cli = Cli::try_parse_from([
            "pixbrick",
            "--config-json",
            r#"{"default_grid_size": 32}"#,
            "stream",
        ])
        .unwrap();
        let config = config_from_cli(&cli).unwrap();
        assert_eq!(config.default_grid_size, 32);
        assert_eq!(
            config.max_content_length,
            UploadConfig::DEFAULT_MAX_CONTENT_LENGTH
        );
    }

    #[test]
    fn bad_config_json_is_reported() {
        let cli = Cli::try_parse_from(["pixbrick", "--config-json", "{", "stream"]).unwrap();
        assert!(config_from_cli(&cli).unwrap_err().contains("--config-json"));
    }

    #[test]
    fn grid_accepts_negative_size() {
        let cli = Cli::try_parse_from(["pixbrick", "grid", "--grid-size", "-5", "in.png"]).unwrap();
        let Command::Grid(args) = cli.command else {
            unreachable!("parsed as grid");
        };
        assert_eq!(args.grid_size, Some(-5));
        assert_eq!(args.cell_px, DEFAULT_CELL_PX);
    }

    #[test]
    fn grid_rejects_size_above_limit_before_reading() {
        let args = GridArgs {
            image_path: PathBuf::from("does-not-exist.png"),
            grid_size: Some(1 << 31),
            preview: None,
            cell_px: DEFAULT_CELL_PX,
            pretty: false,
        };
        // A missing file would be an `Err`; the limit answers first.
        assert!(run_grid(&args, &UploadConfig::default()).is_ok());
    }

    #[test]
    fn stream_survives_oversized_grid_requests() {
        let input = format!(
            "{}\n{}\n",
            serde_json::json!({ "image": two_by_two_uri(), "grid_size": 2_147_483_648_i64 }),
            serde_json::json!({ "image": two_by_two_uri(), "grid_size": 2 }),
        );
        let (answered, replies) = stream(&input);
        assert_eq!(answered, 2);
        assert_eq!(replies[0]["status"], 400);
        assert_eq!(replies[1]["status"], 200);
    }

    #[test]
    fn stream_answers_each_line() {
        let input = format!(
            "{}\n\nnot json\n{}\n",
            serde_json::json!({ "image": two_by_two_uri(), "grid_size": 2 }),
            serde_json::json!({ "image": "garbage" }),
        );
        let (answered, replies) = stream(&input);
        assert_eq!(answered, 3);
        assert_eq!(replies.len(), 3);

        assert_eq!(replies[0]["status"], 200);
        assert_eq!(replies[0]["body"]["grid_size"], 2);
        assert_eq!(replies[0]["body"]["pixel_data"][0][0]["color"], "#ff0000");
        assert_eq!(replies[0]["body"]["pixel_data"][1][1]["color"], "#0000ff");

        assert_eq!(replies[1]["status"], 400);
        assert_eq!(replies[2]["status"], 400);
        assert!(replies[2]["body"]["error"].is_string());
    }

    #[test]
    fn empty_stream_answers_nothing() {
        let (answered, replies) = stream("");
        assert_eq!(answered, 0);
        assert!(replies.is_empty());
    }
}
