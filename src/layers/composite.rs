//! Linear + BatchNorm + LeakyReLU building block
//!
//! The hidden layers of every network in this crate are stacks of this block.

use std::fmt;

use crate::error::{check_len, Result};
use crate::layers::param::{prefix_all, Buffer, Param, ParamMut};
use crate::layers::{BatchNormLayer, DenseLayer, Layer};
use crate::utils::{leaky_relu_inplace, SimpleRng, DEFAULT_NEGATIVE_SLOPE};

/// Default batch-norm epsilon for hidden blocks.
pub const DEFAULT_BN_EPSILON: f32 = 1e-4;

/// Default running-statistics momentum (`running = m·running + (1 − m)·batch`).
pub const DEFAULT_BN_MOMENTUM: f32 = 0.9;

/// Dense layer followed by batch normalization and a leaky ReLU.
///
/// The bias flag controls both the dense bias and the batch-norm affine
/// parameters: with `bias = false` neither exists.
#[derive(Debug, Clone)]
pub struct LinearBnLeakyRelu {
    linear: DenseLayer,
    bn: BatchNormLayer,
    negative_slope: f32,
}

impl LinearBnLeakyRelu {
    /// Builds the block with the default momentum and negative slope.
    pub fn new(
        in_features: usize,
        out_features: usize,
        bias: bool,
        eps: f32,
        rng: &mut SimpleRng,
    ) -> Result<Self> {
        Self::with_options(
            in_features,
            out_features,
            bias,
            eps,
            DEFAULT_BN_MOMENTUM,
            DEFAULT_NEGATIVE_SLOPE,
            rng,
        )
    }

    pub fn with_options(
        in_features: usize,
        out_features: usize,
        bias: bool,
        eps: f32,
        momentum: f32,
        negative_slope: f32,
        rng: &mut SimpleRng,
    ) -> Result<Self> {
        Ok(Self {
            linear: DenseLayer::new(in_features, out_features, bias, rng),
            bn: BatchNormLayer::new(out_features, eps, momentum, bias)?,
            negative_slope,
        })
    }

    pub fn linear(&self) -> &DenseLayer {
        &self.linear
    }

    pub fn batch_norm(&self) -> &BatchNormLayer {
        &self.bn
    }

    pub fn negative_slope(&self) -> f32 {
        self.negative_slope
    }

    pub fn copy_from(&mut self, other: &LinearBnLeakyRelu) -> Result<()> {
        self.linear.copy_from(&other.linear)?;
        self.bn.copy_from(&other.bn)
    }
}

impl Layer for LinearBnLeakyRelu {
    fn forward(&self, input: &[f32], output: &mut [f32], batch_size: usize) -> Result<()> {
        check_len("hidden block output", batch_size * self.output_size(), output.len())?;

        let mut pre_norm = vec![0.0f32; output.len()];
        self.linear.forward(input, &mut pre_norm, batch_size)?;
        self.bn.forward(&pre_norm, output, batch_size)?;
        leaky_relu_inplace(output, self.negative_slope);
        Ok(())
    }

    fn set_training(&mut self, training: bool) {
        self.bn.set_training(training);
    }

    fn input_size(&self) -> usize {
        self.linear.input_size()
    }

    fn output_size(&self) -> usize {
        self.linear.output_size()
    }

    fn parameters(&self) -> Vec<Param<'_>> {
        let mut params = prefix_all(self.linear.parameters(), "linear", Param::prefixed);
        params.extend(prefix_all(self.bn.parameters(), "bn", Param::prefixed));
        params
    }

    fn parameters_mut(&mut self) -> Vec<ParamMut<'_>> {
        let mut params = prefix_all(self.linear.parameters_mut(), "linear", ParamMut::prefixed);
        params.extend(prefix_all(self.bn.parameters_mut(), "bn", ParamMut::prefixed));
        params
    }

    fn buffers(&self) -> Vec<Buffer> {
        prefix_all(self.bn.buffers(), "bn", Buffer::prefixed)
    }
}

impl fmt::Display for LinearBnLeakyRelu {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Linear({} -> {}, bias={}) -> BatchNorm({}, eps={}, affine={}) -> LeakyReLU({})",
            self.linear.input_size(),
            self.linear.output_size(),
            self.linear.has_bias(),
            self.bn.output_size(),
            self.bn.epsilon(),
            self.bn.is_affine(),
            self.negative_slope
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_shapes() {
        let mut rng = SimpleRng::new(42);
        let block = LinearBnLeakyRelu::new(6, 4, false, DEFAULT_BN_EPSILON, &mut rng).unwrap();
        assert_eq!(block.input_size(), 6);
        assert_eq!(block.output_size(), 4);

        let input = rng.uniform_vec(3 * 6, -1.0, 1.0);
        let mut output = vec![0.0f32; 3 * 4];
        block.forward(&input, &mut output, 3).unwrap();
        assert!(output.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_bias_flag_couples_batchnorm_affine() {
        let mut rng = SimpleRng::new(42);
        let with_bias = LinearBnLeakyRelu::new(5, 3, true, DEFAULT_BN_EPSILON, &mut rng).unwrap();
        let names: Vec<_> = with_bias.parameters().into_iter().map(|p| p.name).collect();
        assert_eq!(
            names,
            vec!["linear.weight", "linear.bias", "bn.weight", "bn.bias"]
        );
        assert_eq!(with_bias.parameter_count(), 5 * 3 + 3 + 3 + 3);

        let without = LinearBnLeakyRelu::new(5, 3, false, DEFAULT_BN_EPSILON, &mut rng).unwrap();
        let names: Vec<_> = without.parameters().into_iter().map(|p| p.name).collect();
        assert_eq!(names, vec!["linear.weight"]);
        assert!(!without.batch_norm().is_affine());
    }

    #[test]
    fn test_negative_outputs_are_scaled() {
        let mut rng = SimpleRng::new(3);
        let block = LinearBnLeakyRelu::new(4, 8, false, DEFAULT_BN_EPSILON, &mut rng).unwrap();
        let input = rng.uniform_vec(16 * 4, -2.0, 2.0);
        let mut output = vec![0.0f32; 16 * 8];
        block.forward(&input, &mut output, 16).unwrap();

        // Batch-normalized pre-activations lie within a few units of zero, so
        // leaky outputs are bounded below by a small negative number.
        let min = output.iter().cloned().fold(f32::INFINITY, f32::min);
        assert!(min < 0.0);
        assert!(min > -0.1);
    }

    #[test]
    fn test_buffers_are_prefixed() {
        let mut rng = SimpleRng::new(3);
        let block = LinearBnLeakyRelu::new(2, 2, false, DEFAULT_BN_EPSILON, &mut rng).unwrap();
        let names: Vec<_> = block.buffers().into_iter().map(|b| b.name).collect();
        assert_eq!(names, vec!["bn.running_mean", "bn.running_var"]);
    }

    #[test]
    fn test_display() {
        let mut rng = SimpleRng::new(3);
        let block = LinearBnLeakyRelu::new(2, 3, true, DEFAULT_BN_EPSILON, &mut rng).unwrap();
        let text = block.to_string();
        assert!(text.starts_with("Linear(2 -> 3, bias=true)"));
        assert!(text.contains("affine=true"));
    }
}
