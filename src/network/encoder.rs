//! MLP encoder: input features to a latent code.

use std::fmt;

use tracing::debug;

use crate::architecture::ArchitectureSpec;
use crate::batch::Batch;
use crate::error::{check_len, Result};
use crate::layers::{Buffer, DenseLayer, Layer, LinearBnLeakyRelu, Param, ParamMut};
use crate::network::{
    build_hidden, flatten_input, fmt_stack, forward_stack, stack_buffers, stack_parameters,
    stack_parameters_mut, Mode, Network,
};
use crate::utils::SimpleRng;

/// Hidden blocks over `[x_dim, h_1, ..., h_n]` followed by a plain dense
/// projection `h_n -> rep_dim`.
///
/// The latent code is left unconstrained: the projection has no
/// normalization and no activation.
///
/// # Example
///
/// ```
/// use mlp_autoencoder::{ArchitectureSpec, Batch, Encoder, Network};
/// use mlp_autoencoder::utils::SimpleRng;
///
/// let spec = ArchitectureSpec::parse(12, "32-16", 8, false).unwrap();
/// let encoder = Encoder::new(&spec, &mut SimpleRng::new(42)).unwrap();
/// let code = encoder.forward(&Batch::zeros(vec![4, 12]).unwrap()).unwrap();
/// assert_eq!(code.shape(), &[4, 8]);
/// ```
#[derive(Debug, Clone)]
pub struct Encoder {
    spec: ArchitectureSpec,
    hidden: Vec<LinearBnLeakyRelu>,
    code: DenseLayer,
    mode: Mode,
}

impl Encoder {
    pub fn new(spec: &ArchitectureSpec, rng: &mut SimpleRng) -> Result<Self> {
        let hidden = build_hidden(&spec.encoder_widths(), spec, rng)?;
        let code = DenseLayer::new(spec.last_hidden(), spec.rep_dim(), spec.bias(), rng);
        debug!(
            x_dim = spec.x_dim(),
            h_dims = %spec.h_dims_string(),
            rep_dim = spec.rep_dim(),
            bias = spec.bias(),
            "built encoder"
        );

        Ok(Self {
            spec: spec.clone(),
            hidden,
            code,
            mode: Mode::Train,
        })
    }

    pub fn spec(&self) -> &ArchitectureSpec {
        &self.spec
    }

    pub fn hidden(&self) -> &[LinearBnLeakyRelu] {
        &self.hidden
    }

    /// Terminal projection to the latent code.
    pub fn code_layer(&self) -> &DenseLayer {
        &self.code
    }

    /// Copies every parameter and running statistic from an encoder with the
    /// same architecture, e.g. the encoder half of a pretrained autoencoder.
    ///
    /// # Errors
    ///
    /// Returns [`crate::NetworkError::Shape`] if the architectures differ.
    /// Nothing is copied in that case.
    pub fn load_from(&mut self, other: &Encoder) -> Result<()> {
        check_len("encoder hidden layers", self.hidden.len(), other.hidden.len())?;
        for (dst, src) in self.hidden.iter().zip(&other.hidden) {
            check_len("encoder hidden input", dst.input_size(), src.input_size())?;
            check_len("encoder hidden output", dst.output_size(), src.output_size())?;
            check_len(
                "encoder hidden parameters",
                dst.parameter_count(),
                src.parameter_count(),
            )?;
        }
        check_len("encoder code parameters", self.code.parameter_count(), other.code.parameter_count())?;
        check_len("encoder code output", self.code.output_size(), other.code.output_size())?;

        for (dst, src) in self.hidden.iter_mut().zip(&other.hidden) {
            dst.copy_from(src)?;
        }
        self.code.copy_from(&other.code)?;
        debug!(layers = self.hidden.len() + 1, "loaded encoder weights");
        Ok(())
    }
}

impl Network for Encoder {
    fn name(&self) -> &'static str {
        "Encoder"
    }

    fn forward(&self, input: &Batch) -> Result<Batch> {
        let (batch_size, x) = flatten_input(input, self.spec.x_dim(), "encoder input")?;
        let code = forward_stack(&self.hidden, &self.code, x, batch_size)?;
        Batch::from_rows(batch_size, self.spec.rep_dim(), code)
    }

    fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
        for layer in &mut self.hidden {
            layer.set_training(mode.is_training());
        }
    }

    fn mode(&self) -> Mode {
        self.mode
    }

    fn input_dim(&self) -> usize {
        self.spec.x_dim()
    }

    fn output_dim(&self) -> usize {
        self.spec.rep_dim()
    }

    fn rep_dim(&self) -> usize {
        self.spec.rep_dim()
    }

    fn parameters(&self) -> Vec<Param<'_>> {
        stack_parameters(&self.hidden, &self.code, "code")
    }

    fn parameters_mut(&mut self) -> Vec<ParamMut<'_>> {
        stack_parameters_mut(&mut self.hidden, &mut self.code, "code")
    }

    fn buffers(&self) -> Vec<Buffer> {
        stack_buffers(&self.hidden)
    }
}

impl fmt::Display for Encoder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_stack(f, "Encoder", &self.hidden, "code", &self.code, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::NetworkError;

    fn encoder(h_dims: &str, bias: bool) -> Encoder {
        let spec = ArchitectureSpec::parse(20, h_dims, 4, bias).unwrap();
        Encoder::new(&spec, &mut SimpleRng::new(42)).unwrap()
    }

    #[test]
    fn test_layer_widths() {
        let enc = encoder("32-16", false);
        assert_eq!(enc.hidden().len(), 2);
        assert_eq!(enc.hidden()[0].input_size(), 20);
        assert_eq!(enc.hidden()[0].output_size(), 32);
        assert_eq!(enc.hidden()[1].output_size(), 16);
        assert_eq!(enc.code_layer().input_size(), 16);
        assert_eq!(enc.code_layer().output_size(), 4);
    }

    #[test]
    fn test_parameter_names() {
        let enc = encoder("8", true);
        let names: Vec<_> = enc.parameters().into_iter().map(|p| p.name).collect();
        assert_eq!(
            names,
            vec![
                "hidden.0.linear.weight",
                "hidden.0.linear.bias",
                "hidden.0.bn.weight",
                "hidden.0.bn.bias",
                "code.weight",
                "code.bias",
            ]
        );
    }

    #[test]
    fn test_parameter_count_without_bias() {
        let enc = encoder("32-16", false);
        assert_eq!(enc.parameter_count(), 20 * 32 + 32 * 16 + 16 * 4);
    }

    #[test]
    fn test_forward_rejects_wrong_width() {
        let enc = encoder("8", false);
        let result = enc.forward(&Batch::zeros(vec![3, 19]).unwrap());
        assert!(matches!(
            result,
            Err(NetworkError::Shape { expected: 20, actual: 19, .. })
        ));
    }

    #[test]
    fn test_set_mode_propagates() {
        let mut enc = encoder("8-4", false);
        enc.set_mode(Mode::Eval);
        assert_eq!(enc.mode(), Mode::Eval);
        assert!(enc.hidden().iter().all(|l| !l.batch_norm().is_training()));
    }

    #[test]
    fn test_load_from_copies_parameters() {
        let spec = ArchitectureSpec::parse(20, "8-4", 2, true).unwrap();
        let source = Encoder::new(&spec, &mut SimpleRng::new(1)).unwrap();
        let mut target = Encoder::new(&spec, &mut SimpleRng::new(2)).unwrap();

        target.load_from(&source).unwrap();
        for (a, b) in source.parameters().iter().zip(target.parameters().iter()) {
            assert_eq!(a.name, b.name);
            assert_eq!(a.values, b.values);
        }
        assert_eq!(source.buffers(), target.buffers());
    }

    #[test]
    fn test_load_from_rejects_other_architecture() {
        let mut target = encoder("8-4", false);
        let source = encoder("8", false);
        let before: Vec<Vec<f32>> = target.parameters().iter().map(|p| p.values.to_vec()).collect();

        assert!(target.load_from(&source).is_err());
        let after: Vec<Vec<f32>> = target.parameters().iter().map(|p| p.values.to_vec()).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_display_lists_layers() {
        let text = encoder("8", false).to_string();
        assert!(text.starts_with("Encoder("));
        assert!(text.contains("(hidden.0): Linear(20 -> 8"));
        assert!(text.contains("(code): Linear(8 -> 4, bias=false)"));
    }
}
