//! Shared data structures for netprobe.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One reachability probe attempt, in the order it appeared in the output.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Sample {
    Rtt(f64),
    Timeout,
}

impl Sample {
    pub fn rtt(&self) -> Option<f64> {
        match self {
            Sample::Rtt(value) => Some(*value),
            Sample::Timeout => None,
        }
    }
}

/// Latency summary for one reachability run. All values are milliseconds
/// except `loss`, which is a ratio in `[0, 1]`.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Statistics {
    pub min: f64,
    pub max: f64,
    pub avg: f64,
    pub jitter: f64,
    pub loss: f64,
}

/// Decoded path diagnostic, kept as an open-ended JSON object.
pub type TracePayload = Map<String, Value>;

/// A single probe result as written to the telemetry connection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum Report {
    #[serde(rename = "ping")]
    Ping {
        source: String,
        target: String,
        data: Statistics,
    },
    #[serde(rename = "traceroute")]
    Trace {
        source: String,
        target: String,
        data: TracePayload,
    },
}

impl Report {
    pub fn ping(source: impl Into<String>, target: impl Into<String>, data: Statistics) -> Self {
        Report::Ping {
            source: source.into(),
            target: target.into(),
            data,
        }
    }

    pub fn trace(
        source: impl Into<String>,
        target: impl Into<String>,
        data: TracePayload,
    ) -> Self {
        Report::Trace {
            source: source.into(),
            target: target.into(),
            data,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Report::Ping { .. } => "ping",
            Report::Trace { .. } => "traceroute",
        }
    }

    pub fn target(&self) -> &str {
        match self {
            Report::Ping { target, .. } | Report::Trace { target, .. } => target,
        }
    }

    /// Serializes the report as a single JSON text message.
    pub fn to_message(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn ping_report_wire_shape() {
        let report = Report::ping(
            "probe-01",
            "1.1.1.1",
            Statistics {
                min: 10.0,
                max: 30.0,
                avg: 17.5,
                jitter: 15.0,
                loss: 0.2,
            },
        );

        let value: Value = serde_json::from_str(&report.to_message().unwrap()).unwrap();
        assert_eq!(
            value,
            json!({
                "type": "ping",
                "source": "probe-01",
                "target": "1.1.1.1",
                "data": {"min": 10.0, "max": 30.0, "avg": 17.5, "jitter": 15.0, "loss": 0.2}
            })
        );
    }

    #[test]
    fn trace_report_carries_arbitrary_payload() {
        let mut payload = Map::new();
        payload.insert("report".to_string(), json!({"hubs": [{"count": 1, "host": "10.0.0.1"}]}));
        let report = Report::trace("probe-01", "8.8.8.8", payload);

        let message = report.to_message().unwrap();
        assert!(message.starts_with(r#"{"type":"traceroute""#));

        let value: Value = serde_json::from_str(&message).unwrap();
        assert_eq!(value["data"]["report"]["hubs"][0]["host"], "10.0.0.1");
        assert_eq!(report.kind(), "traceroute");
        assert_eq!(report.target(), "8.8.8.8");
    }

    #[test]
    fn sample_exposes_rtt_only_for_replies() {
        assert_eq!(Sample::Rtt(1.5).rtt(), Some(1.5));
        assert_eq!(Sample::Timeout.rtt(), None);
    }
}
