//! # ZenEdit - A Distraction-Free Text Editor
//!
//! ## Quick Start
//!
//! ```bash
//! # Run the editor
//! cargo run
//!
//! # Run with a file
//! cargo run -- notes.txt
//!
//! # Keep settings next to the project instead of the config directory
//! cargo run -- --config ./settings.toml
//! ```

use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use zenedit_ui::{Flags, run};

/// ZenEdit - a simple distraction-free text editor
#[derive(Parser, Debug)]
#[command(name = "zenedit")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// File to open
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// Settings file to use
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Where to autosave untitled documents
    #[arg(long, value_name = "PATH")]
    autosave_file: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> anyhow::Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize logging
    let log_level = match args.verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_level(true),
        )
        .with(tracing_subscriber::filter::LevelFilter::from_level(
            log_level,
        ))
        .init();

    tracing::info!("Starting ZenEdit v{}", env!("CARGO_PKG_VERSION"));

    let flags = Flags {
        file: args.file,
        settings_file: args.config,
        autosave_file: args.autosave_file,
    };

    run(flags).map_err(|e| anyhow::anyhow!("Application error: {}", e))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_parsing() {
        let args = Args::parse_from(["zenedit"]);
        assert!(args.file.is_none());
        assert!(args.config.is_none());
        assert_eq!(args.verbose, 0);
    }

    #[test]
    fn test_args_with_file_and_overrides() {
        let args = Args::parse_from([
            "zenedit",
            "notes.txt",
            "--config",
            "s.toml",
            "--autosave-file",
            "draft.txt",
            "-vv",
        ]);
        assert_eq!(args.file, Some(PathBuf::from("notes.txt")));
        assert_eq!(args.config, Some(PathBuf::from("s.toml")));
        assert_eq!(args.autosave_file, Some(PathBuf::from("draft.txt")));
        assert_eq!(args.verbose, 2);
    }
}
