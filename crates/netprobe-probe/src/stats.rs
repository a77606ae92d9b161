use netprobe_model::{Sample, Statistics};

/// Reduces an ordered sample sequence to a [`Statistics`] summary.
pub fn aggregate(samples: &[Sample]) -> Statistics {
    let durations: Vec<f64> = samples.iter().filter_map(Sample::rtt).collect();
    let timeouts = samples.len() - durations.len();
    let (min, max) = running_range(&durations);

    Statistics {
        min,
        max,
        avg: mean(&durations),
        jitter: mean(&jitter_samples(&durations)),
        loss: ratio(timeouts as f64, samples.len() as f64),
    }
}

/// Running min/max where the first duration initializes both. A duration that
/// lowers the minimum is not also compared against the maximum.
pub fn running_range(durations: &[f64]) -> (f64, f64) {
    let mut iter = durations.iter().copied();
    let Some(first) = iter.next() else {
        return (0.0, 0.0);
    };

    let (mut min, mut max) = (first, first);
    for value in iter {
        if value < min {
            min = value;
        } else if value > max {
            max = value;
        }
    }

    (min, max)
}

/// Absolute deltas over alternating pairs: the 1st, 3rd, 5th... duration sets
/// the reference and the following one is compared against it.
pub fn jitter_samples(durations: &[f64]) -> Vec<f64> {
    let mut deltas = Vec::with_capacity(durations.len() / 2);
    let mut reference = 0.0;

    for (index, value) in durations.iter().copied().enumerate() {
        if index % 2 == 0 {
            reference = value;
        } else {
            deltas.push((reference - value).abs());
            reference = value;
        }
    }

    deltas
}

pub fn mean(values: &[f64]) -> f64 {
    let sum: f64 = values.iter().sum();
    ratio(sum, values.len() as f64)
}

fn ratio(numerator: f64, denominator: f64) -> f64 {
    let result = numerator / denominator;
    if result.is_nan() {
        0.0
    } else {
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alternating_pair_jitter() {
        let durations = [10.0, 20.0, 10.0, 30.0];
        assert_eq!(jitter_samples(&durations), vec![10.0, 20.0]);
        assert_eq!(mean(&jitter_samples(&durations)), 15.0);
    }

    #[test]
    fn odd_trailing_duration_emits_nothing() {
        assert_eq!(jitter_samples(&[5.0, 7.0, 100.0]), vec![2.0]);
        assert!(jitter_samples(&[5.0]).is_empty());
    }

    #[test]
    fn range_starts_unset() {
        assert_eq!(running_range(&[]), (0.0, 0.0));
        assert_eq!(running_range(&[4.0]), (4.0, 4.0));
        assert_eq!(running_range(&[4.0, 2.0, 9.0, 3.0]), (2.0, 9.0));
    }

    #[test]
    fn empty_inputs_collapse_to_zero() {
        assert_eq!(mean(&[]), 0.0);
        assert_eq!(aggregate(&[]), Statistics::default());
    }

    #[test]
    fn all_timeouts() {
        let stats = aggregate(&[Sample::Timeout, Sample::Timeout, Sample::Timeout]);
        assert_eq!(stats.avg, 0.0);
        assert_eq!(stats.jitter, 0.0);
        assert_eq!(stats.loss, 1.0);
        assert_eq!((stats.min, stats.max), (0.0, 0.0));
    }

    #[test]
    fn mixed_samples() {
        let samples = [
            Sample::Rtt(10.0),
            Sample::Timeout,
            Sample::Rtt(20.0),
            Sample::Rtt(10.0),
            Sample::Rtt(30.0),
        ];
        let stats = aggregate(&samples);

        assert_eq!(stats.min, 10.0);
        assert_eq!(stats.max, 30.0);
        assert_eq!(stats.avg, 17.5);
        assert_eq!(stats.jitter, 15.0);
        assert!((stats.loss - 0.2).abs() < 1e-12);
    }
}
