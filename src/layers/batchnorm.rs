//! Batch normalization layer implementation
//!
//! This module provides a BatchNormLayer that normalizes activations per feature
//! across the batch dimension.
//!
//! # Batch Normalization Theory
//!
//! 1. Compute batch statistics: mean μ and variance σ² across the batch
//! 2. Normalize: x_norm = (x - μ) / sqrt(σ² + ε)
//! 3. Scale and shift: y = γ * x_norm + β
//!
//! During training, batch normalization uses batch statistics and updates running statistics
//! via exponential moving average for use during inference. During inference, it uses the
//! accumulated running statistics instead of computing batch statistics.
//!
//! The scale and shift step is only present when the layer is built with
//! `affine = true`; otherwise the normalized values are returned as is.
//!
//! # References
//!
//! Ioffe, S., & Szegedy, C. (2015). Batch Normalization: Accelerating Deep Network Training
//! by Reducing Internal Covariate Shift. ICML.

use std::cell::RefCell;

use crate::error::{check_len, NetworkError, Result};
use crate::layers::param::{Buffer, Param, ParamMut};
use crate::layers::Layer;

/// Learnable scale and shift of an affine batch-norm layer.
#[derive(Debug, Clone)]
struct Affine {
    gamma: Vec<f32>,
    beta: Vec<f32>,
}

/// Batch normalization layer with optional learnable scale and shift parameters.
///
/// # Fields
///
/// * `size` - Number of input/output features (batch norm doesn't change dimensions)
/// * `epsilon` - Small constant for numerical stability (prevents division by zero)
/// * `momentum` - Momentum for updating running statistics (typical: 0.9)
/// * `training` - Whether the layer is in training mode (true) or inference mode (false)
/// * `affine` - Learnable gamma (initialized to 1.0) and beta (initialized to 0.0), if enabled
/// * `running_mean` - Running average of means (for inference)
/// * `running_var` - Running average of variances (for inference)
///
/// # Example
///
/// ```
/// use mlp_autoencoder::layers::{BatchNormLayer, Layer};
///
/// let layer = BatchNormLayer::new(512, 1e-4, 0.9, true).unwrap();
/// assert_eq!(layer.input_size(), 512);
/// assert_eq!(layer.parameter_count(), 1024);  // 512 gamma + 512 beta
/// ```
#[derive(Debug, Clone)]
pub struct BatchNormLayer {
    size: usize,
    epsilon: f32,
    momentum: f32,
    training: bool,

    affine: Option<Affine>,

    // Running statistics (updated during training, used during inference)
    // RefCell needed for interior mutability during forward pass
    running_mean: RefCell<Vec<f32>>,
    running_var: RefCell<Vec<f32>>,
}

impl BatchNormLayer {
    /// Creates a new batch normalization layer.
    ///
    /// Running mean starts at 0 and running variance at 1. The layer starts
    /// in training mode.
    ///
    /// # Errors
    ///
    /// Returns [`NetworkError::InvalidConfig`] if `epsilon` is not positive or
    /// `momentum` is outside [0.0, 1.0].
    pub fn new(size: usize, epsilon: f32, momentum: f32, affine: bool) -> Result<Self> {
        if !(epsilon > 0.0) {
            return Err(NetworkError::InvalidConfig(format!(
                "epsilon must be positive, got {}",
                epsilon
            )));
        }
        if !(0.0..=1.0).contains(&momentum) {
            return Err(NetworkError::InvalidConfig(format!(
                "momentum must be in range [0.0, 1.0], got {}",
                momentum
            )));
        }

        Ok(Self {
            size,
            epsilon,
            momentum,
            training: true,
            affine: affine.then(|| Affine {
                gamma: vec![1.0f32; size],
                beta: vec![0.0f32; size],
            }),
            running_mean: RefCell::new(vec![0.0f32; size]),
            running_var: RefCell::new(vec![1.0f32; size]),
        })
    }

    pub fn is_training(&self) -> bool {
        self.training
    }

    pub fn is_affine(&self) -> bool {
        self.affine.is_some()
    }

    pub fn epsilon(&self) -> f32 {
        self.epsilon
    }

    pub fn momentum(&self) -> f32 {
        self.momentum
    }

    /// Scale parameters, if the layer is affine.
    pub fn gamma(&self) -> Option<&[f32]> {
        self.affine.as_ref().map(|a| a.gamma.as_slice())
    }

    /// Shift parameters, if the layer is affine.
    pub fn beta(&self) -> Option<&[f32]> {
        self.affine.as_ref().map(|a| a.beta.as_slice())
    }

    /// Get a copy of the running mean statistics.
    pub fn running_mean(&self) -> Vec<f32> {
        self.running_mean.borrow().clone()
    }

    /// Get a copy of the running variance statistics.
    pub fn running_var(&self) -> Vec<f32> {
        self.running_var.borrow().clone()
    }

    /// Overwrites the running statistics.
    pub fn set_running_stats(&mut self, mean: &[f32], var: &[f32]) -> Result<()> {
        check_len("running mean", self.size, mean.len())?;
        check_len("running var", self.size, var.len())?;
        self.running_mean.get_mut().copy_from_slice(mean);
        self.running_var.get_mut().copy_from_slice(var);
        Ok(())
    }

    /// Copies affine parameters and running statistics from a layer of identical shape.
    pub fn copy_from(&mut self, other: &BatchNormLayer) -> Result<()> {
        check_len("batch norm size", self.size, other.size)?;
        match (&mut self.affine, &other.affine) {
            (Some(dst), Some(src)) => {
                dst.gamma.copy_from_slice(&src.gamma);
                dst.beta.copy_from_slice(&src.beta);
            }
            (None, None) => {}
            (dst, _) => {
                let expected = if dst.is_some() { 2 * self.size } else { 0 };
                let actual = if other.affine.is_some() { 2 * other.size } else { 0 };
                return Err(NetworkError::shape("batch norm affine parameters", expected, actual));
            }
        }
        let mean = other.running_mean();
        let var = other.running_var();
        self.set_running_stats(&mean, &var)
    }

    fn scale_shift(&self, j: usize, normalized: f32) -> f32 {
        match &self.affine {
            Some(affine) => affine.gamma[j] * normalized + affine.beta[j],
            None => normalized,
        }
    }
}

impl Layer for BatchNormLayer {
    /// Forward propagation through the batch normalization layer.
    ///
    /// During training mode, computes batch statistics, normalizes the input, applies
    /// the optional scale and shift, and updates running statistics.
    /// During inference mode, uses accumulated running statistics for normalization.
    ///
    /// Training mode needs at least two samples.
    fn forward(&self, input: &[f32], output: &mut [f32], batch_size: usize) -> Result<()> {
        let total_size = batch_size * self.size;
        check_len("batch norm input", total_size, input.len())?;
        check_len("batch norm output", total_size, output.len())?;

        if self.training && batch_size < 2 {
            return Err(NetworkError::BatchTooSmall(batch_size));
        }
        if self.size == 0 {
            return Ok(());
        }

        if self.training {
            // Training mode: compute batch statistics and normalize
            let mut batch_mean = vec![0.0f32; self.size];
            let mut batch_var = vec![0.0f32; self.size];

            for row in input.chunks_exact(self.size) {
                for (mean, &x) in batch_mean.iter_mut().zip(row) {
                    *mean += x;
                }
            }
            for mean in &mut batch_mean {
                *mean /= batch_size as f32;
            }

            for row in input.chunks_exact(self.size) {
                for ((var, &x), &mean) in batch_var.iter_mut().zip(row).zip(&batch_mean) {
                    let diff = x - mean;
                    *var += diff * diff;
                }
            }
            for var in &mut batch_var {
                *var /= batch_size as f32;
            }

            let inv_std: Vec<f32> = batch_var
                .iter()
                .map(|&v| 1.0 / (v + self.epsilon).sqrt())
                .collect();

            for (in_row, out_row) in input
                .chunks_exact(self.size)
                .zip(output.chunks_exact_mut(self.size))
            {
                for j in 0..self.size {
                    let normalized = (in_row[j] - batch_mean[j]) * inv_std[j];
                    out_row[j] = self.scale_shift(j, normalized);
                }
            }

            // Update running statistics with exponential moving average
            // running = momentum * running + (1 - momentum) * batch
            // The running variance tracks the unbiased estimate.
            let correction = batch_size as f32 / (batch_size - 1) as f32;
            let mut running_mean = self.running_mean.borrow_mut();
            let mut running_var = self.running_var.borrow_mut();
            for j in 0..self.size {
                running_mean[j] =
                    self.momentum * running_mean[j] + (1.0 - self.momentum) * batch_mean[j];
                running_var[j] = self.momentum * running_var[j]
                    + (1.0 - self.momentum) * batch_var[j] * correction;
            }
        } else {
            // Inference mode: use running statistics
            let running_mean = self.running_mean.borrow();
            let running_var = self.running_var.borrow();
            for (in_row, out_row) in input
                .chunks_exact(self.size)
                .zip(output.chunks_exact_mut(self.size))
            {
                for j in 0..self.size {
                    let normalized =
                        (in_row[j] - running_mean[j]) / (running_var[j] + self.epsilon).sqrt();
                    out_row[j] = self.scale_shift(j, normalized);
                }
            }
        }
        Ok(())
    }

    fn set_training(&mut self, training: bool) {
        self.training = training;
    }

    fn input_size(&self) -> usize {
        self.size
    }

    /// Batch norm doesn't change the dimensionality of the data.
    fn output_size(&self) -> usize {
        self.size
    }

    fn parameters(&self) -> Vec<Param<'_>> {
        match &self.affine {
            Some(affine) => vec![
                Param::new("weight", &affine.gamma),
                Param::new("bias", &affine.beta),
            ],
            None => Vec::new(),
        }
    }

    fn parameters_mut(&mut self) -> Vec<ParamMut<'_>> {
        match &mut self.affine {
            Some(affine) => vec![
                ParamMut::new("weight", &mut affine.gamma),
                ParamMut::new("bias", &mut affine.beta),
            ],
            None => Vec::new(),
        }
    }

    fn buffers(&self) -> Vec<Buffer> {
        vec![
            Buffer::new("running_mean", self.running_mean()),
            Buffer::new("running_var", self.running_var()),
        ]
    }
}
