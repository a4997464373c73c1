//! Layer trait definition for neural network layers
//!
//! This module defines the core Layer trait that all layer types implement.
//! The trait provides a common interface for forward propagation, training
//! mode switching and parameter access.

use crate::error::Result;
use crate::layers::param::{Buffer, Param, ParamMut};

/// Core trait for neural network layers.
///
/// All layer types (Dense, BatchNorm, the composite Linear + BatchNorm +
/// LeakyReLU block) implement this trait to provide a uniform interface for
/// forward propagation over flat row-major buffers.
///
/// # Example
///
/// ```ignore
/// let mut output = vec![0.0f32; batch_size * layer.output_size()];
/// layer.forward(&input, &mut output, batch_size)?;
/// ```
pub trait Layer {
    /// Forward propagation through the layer.
    ///
    /// # Arguments
    ///
    /// * `input` - Input data flattened as a 1D array (batch_size × input_size)
    /// * `output` - Output buffer to store results (batch_size × output_size)
    /// * `batch_size` - Number of samples in the batch
    ///
    /// # Errors
    ///
    /// Returns [`crate::NetworkError::Shape`] if a buffer length does not
    /// match `batch_size` times the corresponding width.
    fn forward(&self, input: &[f32], output: &mut [f32], batch_size: usize) -> Result<()>;

    /// Switch between training (batch statistics) and inference behaviour.
    ///
    /// Layers without mode-dependent behaviour ignore this.
    fn set_training(&mut self, _training: bool) {}

    /// Get the input size of the layer.
    fn input_size(&self) -> usize;

    /// Get the output size of the layer.
    fn output_size(&self) -> usize;

    /// Named views over the learnable parameters.
    fn parameters(&self) -> Vec<Param<'_>>;

    /// Mutable views over the learnable parameters.
    fn parameters_mut(&mut self) -> Vec<ParamMut<'_>>;

    /// Non-learnable state such as running statistics.
    fn buffers(&self) -> Vec<Buffer> {
        Vec::new()
    }

    /// Get the number of trainable parameters in the layer.
    fn parameter_count(&self) -> usize {
        self.parameters().iter().map(|p| p.values.len()).sum()
    }
}
