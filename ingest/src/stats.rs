//! Summary statistics over repeated trials.

/// Arithmetic mean, `None` for an empty sample
pub fn mean(samples: &[f64]) -> Option<f64> {
    if samples.is_empty() {
        None
    } else {
        Some(samples.iter().sum::<f64>() / samples.len() as f64)
    }
}

/// Population standard deviation (divides by N), `None` for an empty sample
pub fn population_stddev(samples: &[f64]) -> Option<f64> {
    let mean = mean(samples)?;
    let variance = samples
        .iter()
        .map(|sample| (sample - mean).powi(2))
        .sum::<f64>()
        / samples.len() as f64;

    Some(variance.sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_and_stddev_of_even_steps() {
        let samples = [2.0, 4.0, 6.0, 8.0];
        assert_eq!(mean(&samples), Some(5.0));

        let stddev = population_stddev(&samples).unwrap();
        assert!((stddev - 5f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn identical_samples_have_no_spread() {
        let samples = [3.25; 5];
        assert_eq!(mean(&samples), Some(3.25));
        assert_eq!(population_stddev(&samples), Some(0.0));
    }

    #[test]
    fn single_sample() {
        assert_eq!(mean(&[7.5]), Some(7.5));
        assert_eq!(population_stddev(&[7.5]), Some(0.0));
    }

    #[test]
    fn empty_sample_has_no_statistics() {
        assert_eq!(mean(&[]), None);
        assert_eq!(population_stddev(&[]), None);
    }
}
