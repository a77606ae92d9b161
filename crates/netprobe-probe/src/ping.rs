use anyhow::{anyhow, Result};
use netprobe_model::Sample;

const HEADER_PREFIX: &str = "PING";
const TIME_MARKER: &str = "time=";
/// Reply lines are at least this long; anything shorter is a timeout notice.
const MIN_REPLY_LEN: usize = 40;
/// Lines shorter than this mark the end of the per-probe section.
const MIN_LINE_LEN: usize = 2;

/// Splits raw `ping` output into one sample per probe line.
///
/// The header is skipped and parsing stops at the first blank line, which
/// `ping` prints before its own summary.
pub fn extract_samples(text: &str) -> Vec<Sample> {
    let mut samples = Vec::new();

    for line in text.split('\n') {
        if line.starts_with(HEADER_PREFIX) {
            continue;
        }

        if line.len() < MIN_LINE_LEN {
            break;
        }

        match extract_duration(line) {
            Ok(ms) => samples.push(Sample::Rtt(ms)),
            Err(err) => {
                log::trace!("counting line as timeout ({err}): {line}");
                samples.push(Sample::Timeout);
            }
        }
    }

    samples
}

/// Pulls the round-trip time in milliseconds out of a single reply line.
pub fn extract_duration(line: &str) -> Result<f64> {
    if line.len() < MIN_REPLY_LEN {
        return Err(anyhow!("request timed out"));
    }

    let start = line
        .rfind(TIME_MARKER)
        .ok_or_else(|| anyhow!("missing {TIME_MARKER} marker"))?;

    let digits: String = line[start..]
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();

    digits
        .parse::<f64>()
        .map_err(|err| anyhow!("invalid duration {digits:?}: {err}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duration_from_reply_line() {
        let line = "64 bytes from 1.1.1.1: icmp_seq=1 ttl=64 time=23.4 ms";
        assert!((extract_duration(line).unwrap() - 23.4).abs() < 1e-9);
    }

    #[test]
    fn short_line_is_always_a_timeout() {
        assert!(extract_duration("time=1.0 ms").is_err());
        assert!(extract_duration("no answer yet for icmp_seq=2").is_err());
    }

    #[test]
    fn long_line_without_marker_is_a_timeout() {
        let line = "From 10.0.0.1 icmp_seq=3 Destination Host Unreachable";
        assert!(line.len() >= MIN_REPLY_LEN);
        assert!(extract_duration(line).is_err());
    }

    #[test]
    fn uses_last_marker_occurrence() {
        let line = "64 bytes from time=host (10.0.0.1): icmp_seq=1 time=7.25 ms";
        assert!((extract_duration(line).unwrap() - 7.25).abs() < 1e-9);
    }

    #[test]
    fn garbage_after_marker_is_a_timeout() {
        let line = "64 bytes from 1.1.1.1: icmp_seq=1 ttl=64 time=1.2.3 ms";
        assert!(extract_duration(line).is_err());
    }

    #[test]
    fn stops_at_blank_line_and_skips_header() {
        let text = "PING 1.1.1.1 (1.1.1.1) 56(84) bytes of data.\n\
                    64 bytes from 1.1.1.1: icmp_seq=1 ttl=57 time=11.0 ms\n\
                    no answer yet for icmp_seq=2\n\
                    \n\
                    64 bytes from 1.1.1.1: icmp_seq=3 ttl=57 time=12.0 ms\n";

        assert_eq!(
            extract_samples(text),
            vec![Sample::Rtt(11.0), Sample::Timeout]
        );
    }

    #[test]
    fn empty_output_has_no_samples() {
        assert!(extract_samples("").is_empty());
    }
}
