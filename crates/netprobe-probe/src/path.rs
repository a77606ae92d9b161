use anyhow::{Context, Result};
use netprobe_model::TracePayload;

/// Decodes `mtr -j` output into an open-ended JSON object.
///
/// Anything that is not a JSON object at the top level is rejected.
pub fn decode_path_output(text: &str) -> Result<TracePayload> {
    serde_json::from_str::<TracePayload>(text).context("path diagnostic is not a JSON object")
}
