/// Order statistics over plain `f64` slices. Empty input yields `None` (or
/// zero for dispersion) rather than NaN.
pub struct StatsHelper;

impl StatsHelper {
    pub fn mean(samples: &[f64]) -> Option<f64> {
        if samples.is_empty() {
            return None;
        }
        Some(samples.iter().sum::<f64>() / samples.len() as f64)
    }

    pub fn min(samples: &[f64]) -> Option<f64> {
        samples.iter().copied().reduce(f64::min)
    }

    pub fn max(samples: &[f64]) -> Option<f64> {
        samples.iter().copied().reduce(f64::max)
    }

    pub fn median(samples: &[f64]) -> Option<f64> {
        if samples.is_empty() {
            return None;
        }
        let mut sorted = samples.to_vec();
        sorted.sort_by(f64::total_cmp);
        let mid = sorted.len() / 2;
        if sorted.len() % 2 == 0 {
            Some((sorted[mid - 1] + sorted[mid]) / 2.0)
        } else {
            Some(sorted[mid])
        }
    }

    /// Sample standard deviation (n - 1 denominator); zero when fewer than two
    /// samples make it undefined.
    pub fn std_dev(samples: &[f64]) -> f64 {
        if samples.len() < 2 {
            return 0.0;
        }
        let mean = samples.iter().sum::<f64>() / samples.len() as f64;
        let sum_sq: f64 = samples.iter().map(|v| (v - mean) * (v - mean)).sum();
        (sum_sq / (samples.len() - 1) as f64).sqrt()
    }
}
