//! Convert a timeline on stdin into a session file.

use std::io::Read;
use std::path::PathBuf;

use anyhow::Context;
use otio_rv_common::{AdapterConfig, AdapterError, AdapterResult};
use otio_rv_converter::write_otio;
use otio_rv_session::Session;
use otio_rv_timeline_model::read_from_string;

pub fn run(output: PathBuf, config: &AdapterConfig) -> anyhow::Result<()> {
    if let Some(lib) = &config.rv_python_lib {
        tracing::debug!(path = %lib.display(), "ignoring OTIO_RV_PYTHON_LIB, session writer is built in");
    }
    if let Some(bin) = &config.rv_python_bin {
        tracing::debug!(path = %bin.display(), "ignoring OTIO_RV_PYTHON_BIN, session writer is built in");
    }

    if output.is_dir() {
        return Err(AdapterError::output(&output, "is a directory").into());
    }

    let input = read_input(std::io::stdin().lock())?;
    let session = convert_document(&input)?;

    session
        .write(&output)
        .with_context(|| format!("Failed to write session to {}", output.display()))?;

    tracing::info!(
        output = %output.display(),
        nodes = session.len(),
        "session written"
    );
    Ok(())
}

/// Read the whole timeline document.
fn read_input(mut reader: impl Read) -> AdapterResult<String> {
    let mut input = String::new();
    reader.read_to_string(&mut input)?;
    if input.trim().is_empty() {
        return Err(AdapterError::input("no timeline document on stdin"));
    }
    Ok(input)
}

/// Parse and convert a document. Nothing is written unless the whole
/// conversion succeeds.
fn convert_document(input: &str) -> anyhow::Result<Session> {
    let timeline = read_from_string(input).context("Failed to read timeline")?;
    tracing::debug!(schema = timeline.schema_name(), name = timeline.name(), "timeline read");

    let mut session = Session::new();
    write_otio(&timeline, &mut session).context("Failed to convert timeline")?;
    Ok(session)
}
