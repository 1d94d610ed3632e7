//! Wager dispersion inside a single race.

/// How unevenly the wagers of one race are spread across its competitors.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WagerDispersion {
    /// Largest minus smallest wager
    pub spread: f64,
    /// Share of all wagers placed by the top wagerer, in percent
    pub concentration: f64,
    /// Competitor count times the sample standard deviation of the wagers
    pub intensity: f64,
}

pub fn wager_dispersion(wagers: &[f64]) -> WagerDispersion {
    if wagers.is_empty() {
        return WagerDispersion::default();
    }

    let max = wagers.iter().copied().fold(f64::MIN, f64::max);
    let min = wagers.iter().copied().fold(f64::MAX, f64::min);
    let sum: f64 = wagers.iter().sum();

    let concentration = if sum > 0.0 { max / sum * 100.0 } else { 0.0 };
    let intensity = if wagers.len() > 1 {
        wagers.len() as f64 * sample_std_dev(wagers)
    } else {
        0.0
    };

    WagerDispersion {
        spread: max - min,
        concentration,
        intensity,
    }
}

fn sample_std_dev(values: &[f64]) -> f64 {
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);
    variance.sqrt()
}
