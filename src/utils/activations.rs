//! Activation functions for neural networks
//!
//! This module provides the element-wise activations used by the networks:
//! - Leaky ReLU (hidden layers)
//! - Sigmoid (decoder output, bounded to [0, 1])

/// Default negative slope for leaky ReLU.
pub const DEFAULT_NEGATIVE_SLOPE: f32 = 0.01;

/// Sigmoid activation function.
///
/// Returns `1 / (1 + exp(-x))`, evaluated so that large negative inputs do not
/// overflow `exp`. The result lies in [0, 1]: in `f32` it saturates to exactly
/// 1.0 from about x = 17 and to 0.0 below about x = -104.
pub fn sigmoid(x: f32) -> f32 {
    if x >= 0.0 {
        1.0 / (1.0 + (-x).exp())
    } else {
        let e = x.exp();
        e / (1.0 + e)
    }
}

/// Sigmoid applied in-place.
pub fn sigmoid_inplace(data: &mut [f32]) {
    for value in data.iter_mut() {
        *value = sigmoid(*value);
    }
}

/// Leaky ReLU applied in-place.
///
/// Keeps non-negative values unchanged and multiplies negative values by
/// `negative_slope`.
pub fn leaky_relu_inplace(data: &mut [f32], negative_slope: f32) {
    for value in data.iter_mut() {
        if *value < 0.0 {
            *value *= negative_slope;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-6;

    #[test]
    fn test_sigmoid_zero() {
        assert!((sigmoid(0.0) - 0.5).abs() < EPSILON);
    }

    #[test]
    fn test_sigmoid_symmetry() {
        for &x in &[0.5f32, 1.0, 3.0, 7.5] {
            assert!((sigmoid(x) + sigmoid(-x) - 1.0).abs() < EPSILON);
        }
    }

    #[test]
    fn test_sigmoid_large_inputs_are_finite() {
        let mut data = vec![-1000.0f32, 1000.0];
        sigmoid_inplace(&mut data);
        assert!(data.iter().all(|v| v.is_finite()));
        assert!(data[0] >= 0.0 && data[1] <= 1.0);
    }

    #[test]
    fn test_sigmoid_saturates_in_f32() {
        assert_eq!(sigmoid(20.0), 1.0);
        assert_eq!(sigmoid(-110.0), 0.0);
        assert!(sigmoid(5.0) < 1.0 && sigmoid(-5.0) > 0.0);
    }

    #[test]
    fn test_leaky_relu_mixed() {
        let mut data = vec![-2.0, -1.0, 0.0, 1.0, 2.0];
        leaky_relu_inplace(&mut data, DEFAULT_NEGATIVE_SLOPE);
        assert_eq!(data, vec![-0.02, -0.01, 0.0, 1.0, 2.0]);
    }

    #[test]
    fn test_leaky_relu_zero_slope_is_relu() {
        let mut data = vec![-3.0, 4.0];
        leaky_relu_inplace(&mut data, 0.0);
        assert_eq!(data, vec![0.0, 4.0]);
    }
}
