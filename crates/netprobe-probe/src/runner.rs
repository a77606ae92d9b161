use anyhow::{Context, Result};
use std::fmt;
use std::process::Command;

const PING_PROGRAM: &str = "ping";
const PING_ARGS: [&str; 3] = ["-O", "-c", "10"];

const PATH_PROGRAM: &str = "mtr";
const PATH_ARGS: [&str; 2] = ["-z", "-j"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticKind {
    /// Echo probes via `ping`.
    Reachability,
    /// Hop-by-hop statistics via `mtr` in JSON mode.
    Path,
}

impl DiagnosticKind {
    pub fn program(self) -> &'static str {
        match self {
            DiagnosticKind::Reachability => PING_PROGRAM,
            DiagnosticKind::Path => PATH_PROGRAM,
        }
    }

    pub fn args(self) -> &'static [&'static str] {
        match self {
            DiagnosticKind::Reachability => &PING_ARGS,
            DiagnosticKind::Path => &PATH_ARGS,
        }
    }
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticKind::Reachability => f.write_str("ping"),
            DiagnosticKind::Path => f.write_str("traceroute"),
        }
    }
}

/// Captured stdout of one diagnostic run and whether the program exited
/// successfully.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawOutput {
    pub text: String,
    pub success: bool,
}

impl RawOutput {
    pub fn new(text: impl Into<String>, success: bool) -> Self {
        Self {
            text: text.into(),
            success,
        }
    }
}

pub trait DiagnosticRunner: Send + Sync {
    /// Runs one diagnostic against `target`. An `Err` means the program could
    /// not be started at all; a non-zero exit is reported through
    /// [`RawOutput::success`].
    fn run(&self, kind: DiagnosticKind, target: &str) -> Result<RawOutput>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl DiagnosticRunner for SystemRunner {
    fn run(&self, kind: DiagnosticKind, target: &str) -> Result<RawOutput> {
        run_diagnostic(kind, target)
    }
}

pub fn run_diagnostic(kind: DiagnosticKind, target: &str) -> Result<RawOutput> {
    let output = Command::new(kind.program())
        .args(kind.args())
        .arg(target)
        .output()
        .with_context(|| format!("failed to spawn {} for {target}", kind.program()))?;

    if !output.status.success() {
        log::debug!(
            "{} exited with {} for {target}: {}",
            kind.program(),
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        );
    }

    Ok(RawOutput {
        text: String::from_utf8_lossy(&output.stdout).to_string(),
        success: output.status.success(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_argument_sets() {
        assert_eq!(DiagnosticKind::Reachability.program(), "ping");
        assert_eq!(DiagnosticKind::Reachability.args(), &["-O", "-c", "10"]);
        assert_eq!(DiagnosticKind::Path.program(), "mtr");
        assert_eq!(DiagnosticKind::Path.args(), &["-z", "-j"]);
    }

    #[test]
    fn kind_displays_as_report_type() {
        assert_eq!(DiagnosticKind::Reachability.to_string(), "ping");
        assert_eq!(DiagnosticKind::Path.to_string(), "traceroute");
    }
}
