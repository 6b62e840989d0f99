pub struct StatsHelper;

impl StatsHelper {
    pub fn sum(samples: &[f64]) -> f64 {
        samples.iter().sum()
    }

    /// Largest sample, or `None` when there are none. NaN entries never win.
    pub fn max(samples: &[f64]) -> Option<f64> {
        let (first, rest) = samples.split_first()?;
        Some(rest.iter().fold(*first, |acc, &v| if acc < v { v } else { acc }))
    }

    pub fn min(samples: &[f64]) -> Option<f64> {
        let (first, rest) = samples.split_first()?;
        Some(rest.iter().fold(*first, |acc, &v| if v < acc { v } else { acc }))
    }
}
