//! Diagnostic execution and parsing.

pub mod path;
pub mod ping;
pub mod runner;
pub mod stats;

use netprobe_model::Statistics;

pub use path::decode_path_output;
pub use ping::{extract_duration, extract_samples};
pub use runner::{run_diagnostic, DiagnosticKind, DiagnosticRunner, RawOutput, SystemRunner};
pub use stats::{aggregate, jitter_samples};

/// Extracts samples from raw `ping` output and reduces them to statistics.
pub fn ping_statistics(text: &str) -> Statistics {
    aggregate(&extract_samples(text))
}
