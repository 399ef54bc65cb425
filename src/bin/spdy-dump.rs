//! Print the frames in a captured SPDY/3 byte stream.

use clap::Parser;
use spdy::config::Config;
use spdy::conn::FrameReader;
use spdy::frame::{Error, Frame};
use spdy::logging;
use std::fs::File;
use std::io::{self, BufReader, Read, Write};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "spdy-dump")]
#[command(about = "Dump the frames of a captured SPDY/3 stream")]
struct Args {
    /// Capture file (one direction of a connection); reads stdin if omitted
    input: Option<PathBuf>,

    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Leave header blocks compressed
    #[arg(long)]
    raw: bool,

    /// Print payloads and compressed blocks in full
    #[arg(short, long)]
    verbose: bool,

    /// Print default configuration and exit
    #[arg(long)]
    print_config: bool,
}

fn main() {
    let args = Args::parse();

    if args.print_config {
        print_default_config();
        return;
    }

    let config = match &args.config {
        Some(path) => match Config::load(path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Failed to load config: {}", e);
                std::process::exit(1);
            }
        },
        None => Config::default(),
    };

    logging::init(&config.logging);

    if let Err(e) = run(&args, &config) {
        tracing::error!(error = %e, "dump failed");
        std::process::exit(1);
    }
}

fn run(args: &Args, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let input: Box<dyn Read> = match &args.input {
        Some(path) => Box::new(File::open(path)?),
        None => Box::new(io::stdin().lock()),
    };
    let mut input = BufReader::new(input);
    let mut out = io::stdout().lock();
    let mut frames = 0usize;

    if args.raw {
        loop {
            match Frame::read_from(&mut input) {
                Ok(frame) => {
                    write!(out, "{}", frame.dump(args.verbose))?;
                    frames += 1;
                }
                Err(Error::Closed) => break,
                Err(e) if e.is_connection_fatal() => return Err(e.into()),
                Err(e) => writeln!(out, "# rejected frame: {e}")?,
            }
        }
    } else {
        let mut reader = FrameReader::from_config(input, &config.compression);
        loop {
            match reader.read_frame() {
                Ok(Some(frame)) => {
                    write!(out, "{}", frame.dump(args.verbose))?;
                    frames += 1;
                }
                Ok(None) => break,
                Err(e) if reader.is_poisoned() => return Err(e.into()),
                Err(e) => writeln!(out, "# rejected frame: {e}")?,
            }
        }
    }

    out.flush()?;
    tracing::info!(frames, "end of capture");
    Ok(())
}

fn print_default_config() {
    let config = r#"# spdy-dump configuration

[compression]
# zlib level for outbound header blocks (0-9)
level = 9
# Largest decompressed header block accepted, in bytes
max_header_block_size = 262144

[logging]
# Filter directive; RUST_LOG takes precedence
level = "info"
# pretty, compact or json
format = "compact"
timestamps = false
target = true
"#;
    print!("{}", config);
}
