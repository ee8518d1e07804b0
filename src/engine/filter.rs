//! Causal exponential smoothing for indicator series

/// Apply a first-order low-pass filter to a time series.
///
/// `y[0] = x[0]`, then `y[i] = alpha * x[i] + (1 - alpha) * y[i-1]` with
/// `alpha = 1 / (tau + 1)` for the fixed one-minute step between samples.
/// The filter is causal and has infinite memory with exponentially
/// decaying weight, so a single event impulse becomes a "recent event
/// pressure" signal instead of vanishing after one sample.
///
/// # Arguments
/// * `series` - Input samples on the minute grid
/// * `tau_minutes` - Time constant in minutes; larger tau decays slower.
///   `tau <= 0` disables smoothing and returns the input unchanged.
pub fn low_pass_filter(series: &[f64], tau_minutes: f64) -> Vec<f64> {
    if tau_minutes <= 0.0 {
        return series.to_vec();
    }
    if series.is_empty() {
        return Vec::new();
    }

    let alpha = 1.0 / (tau_minutes + 1.0);
    let mut out = vec![0.0; series.len()];
    out[0] = series[0];
    for i in 1..series.len() {
        out[i] = alpha * series[i] + (1.0 - alpha) * out[i - 1];
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_when_tau_not_positive() {
        let series = vec![0.0, 1.0, 0.0, 1.0, 1.0];

        assert_eq!(low_pass_filter(&series, 0.0), series);
        assert_eq!(low_pass_filter(&series, -5.0), series);
    }

    #[test]
    fn test_first_sample_anchor() {
        assert_eq!(low_pass_filter(&[1.0, 0.0, 0.0], 10.0)[0], 1.0);
        assert_eq!(low_pass_filter(&[0.0, 1.0], 10.0)[0], 0.0);
    }

    #[test]
    fn test_known_values_tau_one() {
        // tau = 1 gives alpha = 0.5: a unit impulse halves every step.
        let out = low_pass_filter(&[1.0, 0.0, 0.0, 0.0], 1.0);

        assert_eq!(out, vec![1.0, 0.5, 0.25, 0.125]);
    }

    #[test]
    fn test_binary_input_stays_in_unit_interval() {
        let series: Vec<f64> = (0..200).map(|i| if i % 7 == 0 { 1.0 } else { 0.0 }).collect();

        for tau in [0.5, 1.0, 30.0, 300.0] {
            for y in low_pass_filter(&series, tau) {
                assert!((0.0..=1.0).contains(&y), "tau={} produced {}", tau, y);
            }
        }
    }

    #[test]
    fn test_larger_tau_decays_slower() {
        let mut series = vec![0.0; 60];
        series[0] = 1.0;

        let fast = low_pass_filter(&series, 2.0);
        let slow = low_pass_filter(&series, 30.0);

        assert!(slow[30] > fast[30]);
    }

    #[test]
    fn test_empty_series() {
        assert!(low_pass_filter(&[], 30.0).is_empty());
    }
}
