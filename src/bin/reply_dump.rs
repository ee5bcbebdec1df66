//! Dump the parsed form of a raw reply as JSON, for pipeline debugging.
//!
//! Reads the reply from a file argument, or from stdin when no argument
//! is given. An absent result (no block-level tags) prints `null`.

use std::io::Read;
use tracing_subscriber::EnvFilter;

fn main() {
    if let Err(e) = run() {
        eprintln!("cadenza-dump failed: {e}");
        std::process::exit(1);
    }
}

fn run() -> cadenza::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("cadenza=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();
    let raw = match args.get(1).map(String::as_str) {
        Some("help" | "--help" | "-h") => {
            print_usage();
            return Ok(());
        }
        Some(path) => std::fs::read_to_string(path)?,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };

    let config = load_config()?;
    let result = cadenza::parse_reply(&raw, &config);
    let json = serde_json::to_string_pretty(&result)
        .map_err(|e| cadenza::ParseError::Config(format!("serialize failed: {e}")))?;
    println!("{json}");
    Ok(())
}

fn load_config() -> cadenza::Result<cadenza::ParserConfig> {
    let path = cadenza::ParserConfig::default_config_path();
    if path.exists() {
        cadenza::ParserConfig::from_file(&path)
    } else {
        Ok(cadenza::ParserConfig::default())
    }
}

fn print_usage() {
    println!("usage: cadenza-dump [reply-file]");
    println!("reads stdin when no file is given; prints the parse result as JSON");
}
