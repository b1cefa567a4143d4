//! otio-rv CLI — Convert an OTIO timeline into an RV session file.
//!
//! Usage:
//!   otio-rv <OUTPUT> < timeline.otio
//!
//! The timeline document is read from stdin in the `otio_json` encoding.
//! Logging goes to stderr and is controlled by `OTIO_RV_LOG` (or
//! `RUST_LOG`) and `OTIO_RV_LOG_JSON`.

use std::path::PathBuf;

use clap::Parser;

mod commands;

#[derive(Parser)]
#[command(
    name = "otio-rv",
    about = "Convert an OTIO timeline read from stdin into an RV session file",
    version,
    author
)]
struct Cli {
    /// Path of the session file to write
    output: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = otio_rv_common::AdapterConfig::from_env();
    otio_rv_common::logging::init_logging(&config.logging);
    config.log_warnings();

    commands::convert::run(cli.output, &config)
}
