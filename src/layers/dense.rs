//! Dense (fully connected) layer implementation
//!
//! This module provides a DenseLayer (also known as Linear or Fully Connected layer)
//! that performs the transformation: output = input × weights (+ biases)

use crate::error::{check_len, Result};
use crate::layers::param::{Param, ParamMut};
use crate::layers::Layer;
use crate::utils::{matmul, SimpleRng};

/// Dense (fully connected) layer with weights and optional biases.
///
/// Performs the linear transformation: y = xW + b
/// where x is the input (batch_size × input_size),
/// W is the weight matrix (input_size × output_size),
/// and b is the bias vector (output_size).
///
/// A layer built with `bias = false` has no bias parameter at all.
///
/// # Example
///
/// ```
/// use mlp_autoencoder::layers::{DenseLayer, Layer};
/// use mlp_autoencoder::utils::SimpleRng;
///
/// let mut rng = SimpleRng::new(42);
/// let layer = DenseLayer::new(784, 32, false, &mut rng);
/// assert_eq!(layer.input_size(), 784);
/// assert_eq!(layer.output_size(), 32);
/// assert_eq!(layer.parameter_count(), 784 * 32);
/// ```
#[derive(Debug, Clone)]
pub struct DenseLayer {
    input_size: usize,
    output_size: usize,
    weights: Vec<f32>,
    biases: Option<Vec<f32>>,
}

impl DenseLayer {
    /// Create a new DenseLayer with Xavier initialization.
    ///
    /// Weights are sampled uniformly from [-limit, limit] where
    /// limit = sqrt(6 / (input_size + output_size)). Biases, when present,
    /// start at zero.
    pub fn new(input_size: usize, output_size: usize, bias: bool, rng: &mut SimpleRng) -> Self {
        // Xavier initialization: limit = sqrt(6 / (fan_in + fan_out))
        let limit = (6.0f32 / (input_size + output_size).max(1) as f32).sqrt();
        let weights = rng.uniform_vec(input_size * output_size, -limit, limit);

        Self {
            input_size,
            output_size,
            weights,
            biases: bias.then(|| vec![0.0f32; output_size]),
        }
    }

    pub fn has_bias(&self) -> bool {
        self.biases.is_some()
    }

    /// Weight matrix, row-major (input_size × output_size).
    pub fn weights(&self) -> &[f32] {
        &self.weights
    }

    pub fn biases(&self) -> Option<&[f32]> {
        self.biases.as_deref()
    }

    /// Copies weights and biases from a layer of identical shape.
    pub fn copy_from(&mut self, other: &DenseLayer) -> Result<()> {
        check_len("dense weights", self.weights.len(), other.weights.len())?;
        check_len("dense input", self.input_size, other.input_size)?;
        match (&mut self.biases, &other.biases) {
            (Some(dst), Some(src)) => dst.copy_from_slice(src),
            (None, None) => {}
            (dst, _) => {
                let expected = dst.as_ref().map_or(0, |b| b.len());
                let actual = other.biases.as_ref().map_or(0, |b| b.len());
                check_len("dense biases", expected, actual)?;
            }
        }
        self.weights.copy_from_slice(&other.weights);
        Ok(())
    }
}

impl Layer for DenseLayer {
    fn forward(&self, input: &[f32], output: &mut [f32], batch_size: usize) -> Result<()> {
        check_len("dense input", batch_size * self.input_size, input.len())?;
        check_len("dense output", batch_size * self.output_size, output.len())?;

        matmul(
            input,
            &self.weights,
            output,
            batch_size,
            self.input_size,
            self.output_size,
        );

        if let Some(biases) = &self.biases {
            for row in output.chunks_exact_mut(self.output_size) {
                for (value, b) in row.iter_mut().zip(biases) {
                    *value += *b;
                }
            }
        }
        Ok(())
    }

    fn input_size(&self) -> usize {
        self.input_size
    }

    fn output_size(&self) -> usize {
        self.output_size
    }

    fn parameters(&self) -> Vec<Param<'_>> {
        let mut params = vec![Param::new("weight", &self.weights)];
        if let Some(biases) = &self.biases {
            params.push(Param::new("bias", biases));
        }
        params
    }

    fn parameters_mut(&mut self) -> Vec<ParamMut<'_>> {
        let mut params = vec![ParamMut::new("weight", &mut self.weights)];
        if let Some(biases) = &mut self.biases {
            params.push(ParamMut::new("bias", biases));
        }
        params
    }
}
