use crate::models::{CombinedRecord, Pollutant, PollutantCorrelation};

/// Pearson correlation of yearly mean temperature against each pollutant,
/// in `Pollutant::ALL` order. Years without a mean for the pollutant are left
/// out of that pollutant's series.
pub fn correlate_with_temperature(combined: &[CombinedRecord]) -> Vec<PollutantCorrelation> {
    Pollutant::ALL
        .into_iter()
        .map(|pollutant| {
            let pairs: Vec<(f64, f64)> = combined
                .iter()
                .filter_map(|row| row.mean(pollutant).map(|c| (row.mean_temperature, c)))
                .collect();

            PollutantCorrelation {
                pollutant,
                coefficient: pearson(&pairs),
                samples: pairs.len(),
            }
        })
        .collect()
}

/// None with fewer than two points or when either series is constant
fn pearson(pairs: &[(f64, f64)]) -> Option<f64> {
    if pairs.len() < 2 {
        return None;
    }

    // Rounding in the mean leaves a tiny nonzero variance for constant series
    let (first_x, first_y) = pairs[0];
    if pairs.iter().all(|(x, _)| *x == first_x) || pairs.iter().all(|(_, y)| *y == first_y) {
        return None;
    }

    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|(x, _)| x).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|(_, y)| y).sum::<f64>() / n;

    let mut covariance = 0.0;
    let mut variance_x = 0.0;
    let mut variance_y = 0.0;
    for (x, y) in pairs {
        let dx = x - mean_x;
        let dy = y - mean_y;
        covariance += dx * dy;
        variance_x += dx * dx;
        variance_y += dy * dy;
    }

    Some((covariance / (variance_x.sqrt() * variance_y.sqrt())).clamp(-1.0, 1.0))
}
