use netprobe_model::Report;
use netprobe_probe::{decode_path_output, ping_statistics, DiagnosticKind, DiagnosticRunner};
use netprobe_telemetry::TelemetryChannel;
use std::sync::Arc;

/// Everything a per-target probe task needs. Shared by all tasks.
pub struct Prober {
    source: String,
    runner: Arc<dyn DiagnosticRunner>,
    channel: Arc<TelemetryChannel>,
}

impl Prober {
    pub fn new(
        source: impl Into<String>,
        runner: Arc<dyn DiagnosticRunner>,
        channel: Arc<TelemetryChannel>,
    ) -> Self {
        Self {
            source: source.into(),
            runner,
            channel,
        }
    }

    /// Runs one probe task to completion. Failures are logged, never returned.
    pub fn probe(&self, kind: DiagnosticKind, target: &str) {
        let report = match kind {
            DiagnosticKind::Reachability => Some(self.ping_report(target)),
            DiagnosticKind::Path => self.trace_report(target),
        };

        if let Some(report) = report {
            self.deliver(&report);
        }
    }

    /// A non-zero `ping` exit still yields a report; lost probes show up as
    /// output lines rather than in the exit code.
    pub fn ping_report(&self, target: &str) -> Report {
        let text = match self.runner.run(DiagnosticKind::Reachability, target) {
            Ok(output) => output.text,
            Err(err) => {
                log::warn!("ping failed for {target}: {err:#}");
                String::new()
            }
        };
        log::debug!("ping output for {target}:\n{text}");

        let stats = ping_statistics(&text);
        log::debug!("ping statistics for {target}: {stats:?}");
        Report::ping(self.source.as_str(), target, stats)
    }

    pub fn trace_report(&self, target: &str) -> Option<Report> {
        let output = match self.runner.run(DiagnosticKind::Path, target) {
            Ok(output) => output,
            Err(err) => {
                log::warn!("traceroute failed for {target}: {err:#}");
                return None;
            }
        };
        log::debug!("traceroute output for {target}:\n{}", output.text);

        if !output.success {
            log::warn!("traceroute exited unsuccessfully for {target}; dropping report");
            return None;
        }

        match decode_path_output(&output.text) {
            Ok(payload) => Some(Report::trace(self.source.as_str(), target, payload)),
            Err(err) => {
                log::debug!("dropping traceroute report for {target}: {err:#}");
                None
            }
        }
    }

    /// Sends `report`; on any error the report is dropped and a single
    /// reconnect is attempted.
    fn deliver(&self, report: &Report) {
        match self.channel.send(report) {
            Ok(()) => log::info!("sent {} report for {}", report.kind(), report.target()),
            Err(err) => {
                log::warn!(
                    "sending {} report for {} failed: {err}",
                    report.kind(),
                    report.target()
                );
                let _ = self.channel.reconnect();
            }
        }
    }
}

impl std::fmt::Debug for Prober {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Prober")
            .field("source", &self.source)
            .field("channel", &self.channel)
            .finish_non_exhaustive()
    }
}
