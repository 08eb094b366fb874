//! Early-vs-late trial aggregates.

/// One indexed trial measurement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Trial {
    /// 1-based trial number.
    pub index: usize,
    /// Completion time in seconds.
    pub time_secs: f64,
    pub errors: u32,
}

/// First-two vs last-two means for a single metric.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricSummary {
    pub first_two_mean: f64,
    pub last_two_mean: f64,
    /// `first_two_mean - last_two_mean`; negative when performance got worse.
    pub saving: f64,
}

impl MetricSummary {
    fn from_values(values: &[f64]) -> Option<Self> {
        if values.len() < 2 {
            return None;
        }
        let first_two_mean = mean(&values[..2]);
        let last_two_mean = mean(&values[values.len() - 2..]);
        Some(Self {
            first_two_mean,
            last_two_mean,
            saving: first_two_mean - last_two_mean,
        })
    }
}

/// Derived statistics for one submission.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    pub time: MetricSummary,
    pub errors: MetricSummary,
}

impl Summary {
    /// Summarise trials given in index order. Needs at least two trials.
    pub fn from_trials(trials: &[Trial]) -> Option<Self> {
        let times: Vec<f64> = trials.iter().map(|t| t.time_secs).collect();
        let errors: Vec<f64> = trials.iter().map(|t| f64::from(t.errors)).collect();
        Some(Self {
            time: MetricSummary::from_values(&times)?,
            errors: MetricSummary::from_values(&errors)?,
        })
    }
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trials(times: &[f64], errors: &[u32]) -> Vec<Trial> {
        times
            .iter()
            .zip(errors)
            .enumerate()
            .map(|(i, (&time_secs, &errors))| Trial {
                index: i + 1,
                time_secs,
                errors,
            })
            .collect()
    }

    #[test]
    fn early_late_means_and_savings() {
        let t = trials(
            &[10.0, 8.0, 7.0, 6.0, 5.0, 4.5, 4.0, 3.5, 3.0, 2.0],
            &[2, 1, 1, 1, 0, 1, 0, 0, 0, 0],
        );
        let s = Summary::from_trials(&t).unwrap();
        assert_eq!(s.time.first_two_mean, 9.0);
        assert_eq!(s.time.last_two_mean, 2.5);
        assert_eq!(s.time.saving, 6.5);
        assert_eq!(s.errors.first_two_mean, 1.5);
        assert_eq!(s.errors.last_two_mean, 0.0);
        assert_eq!(s.errors.saving, 1.5);
    }

    #[test]
    fn worse_performance_gives_negative_saving() {
        let t = trials(&[2.0, 3.0, 4.0, 6.0], &[0, 0, 1, 2]);
        let s = Summary::from_trials(&t).unwrap();
        assert_eq!(s.time.saving, -2.5);
        assert_eq!(s.errors.saving, -1.5);
    }

    #[test]
    fn fewer_than_two_trials_has_no_summary() {
        assert_eq!(Summary::from_trials(&trials(&[1.0], &[0])), None);
        assert_eq!(Summary::from_trials(&[]), None);
    }
}
