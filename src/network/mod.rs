//! Encoder, decoder and autoencoder networks
//!
//! Every network is an ordered stack of [`LinearBnLeakyRelu`] blocks followed
//! by a terminal dense projection. The [`Network`] trait is the capability
//! set shared by all three: forward a batch, switch between training and
//! evaluation, and expose parameters to an external optimizer.

use std::fmt;

use tracing::info;

use crate::architecture::ArchitectureSpec;
use crate::batch::Batch;
use crate::error::{NetworkError, Result};
use crate::layers::{Buffer, DenseLayer, Layer, LinearBnLeakyRelu, Param, ParamMut};
use crate::utils::SimpleRng;

pub mod autoencoder;
pub mod decoder;
pub mod encoder;

pub use autoencoder::Autoencoder;
pub use decoder::Decoder;
pub use encoder::Encoder;

/// Whether batch normalization uses batch statistics or running statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Batch statistics; running statistics are updated on every forward pass.
    #[default]
    Train,
    /// Running statistics; forward passes leave the network untouched.
    Eval,
}

impl Mode {
    pub fn is_training(self) -> bool {
        self == Mode::Train
    }
}

/// Shared interface of the encoder, decoder and autoencoder.
pub trait Network: fmt::Display {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Runs a batch through the network.
    ///
    /// Trailing dimensions of `input` are flattened into one feature axis,
    /// which must match [`Network::input_dim`]. The result has shape
    /// `[batch, output_dim]`.
    fn forward(&self, input: &Batch) -> Result<Batch>;

    /// Switches every batch-norm layer to `mode`.
    fn set_mode(&mut self, mode: Mode);

    fn mode(&self) -> Mode;

    /// Features per sample expected by [`Network::forward`].
    fn input_dim(&self) -> usize;

    /// Features per sample produced by [`Network::forward`].
    fn output_dim(&self) -> usize;

    /// Latent dimensionality.
    fn rep_dim(&self) -> usize;

    /// Named views over every learnable parameter.
    fn parameters(&self) -> Vec<Param<'_>>;

    /// Mutable views over every learnable parameter.
    fn parameters_mut(&mut self) -> Vec<ParamMut<'_>>;

    /// Snapshots of the batch-norm running statistics.
    fn buffers(&self) -> Vec<Buffer>;

    /// Total number of trainable parameters.
    fn parameter_count(&self) -> usize {
        self.parameters().iter().map(|p| p.values.len()).sum()
    }

    /// Logs the trainable parameter count and the layer structure.
    fn summary(&self) {
        info!(
            network = self.name(),
            trainable_parameters = self.parameter_count(),
            "Trainable parameters: {}",
            self.parameter_count()
        );
        info!("{}", self);
    }
}

/// Builds one hidden block per consecutive pair of `widths`.
pub(crate) fn build_hidden(
    widths: &[usize],
    spec: &ArchitectureSpec,
    rng: &mut SimpleRng,
) -> Result<Vec<LinearBnLeakyRelu>> {
    widths
        .windows(2)
        .map(|pair| {
            LinearBnLeakyRelu::with_options(
                pair[0],
                pair[1],
                spec.bias(),
                spec.eps(),
                spec.momentum(),
                spec.negative_slope(),
                rng,
            )
        })
        .collect()
}

/// Flattens `input` and checks its feature count.
pub(crate) fn flatten_input(input: &Batch, expected: usize, context: &str) -> Result<(usize, Vec<f32>)> {
    let features = input.features();
    if features != expected {
        return Err(NetworkError::shape(context, expected, features));
    }
    Ok((input.batch_size(), input.data().to_vec()))
}

/// Runs `x` through the hidden blocks and then the terminal projection.
pub(crate) fn forward_stack(
    hidden: &[LinearBnLeakyRelu],
    head: &DenseLayer,
    mut x: Vec<f32>,
    batch_size: usize,
) -> Result<Vec<f32>> {
    for layer in hidden {
        let mut out = vec![0.0f32; batch_size * layer.output_size()];
        layer.forward(&x, &mut out, batch_size)?;
        x = out;
    }
    let mut out = vec![0.0f32; batch_size * head.output_size()];
    head.forward(&x, &mut out, batch_size)?;
    Ok(out)
}

/// Collects parameters as `hidden.{i}.*` followed by `{head_name}.*`.
pub(crate) fn stack_parameters<'a>(
    hidden: &'a [LinearBnLeakyRelu],
    head: &'a DenseLayer,
    head_name: &str,
) -> Vec<Param<'a>> {
    let mut params = Vec::new();
    for (i, layer) in hidden.iter().enumerate() {
        let prefix = format!("hidden.{}", i);
        params.extend(layer.parameters().into_iter().map(|p| p.prefixed(&prefix)));
    }
    params.extend(head.parameters().into_iter().map(|p| p.prefixed(head_name)));
    params
}

pub(crate) fn stack_parameters_mut<'a>(
    hidden: &'a mut [LinearBnLeakyRelu],
    head: &'a mut DenseLayer,
    head_name: &str,
) -> Vec<ParamMut<'a>> {
    let mut params = Vec::new();
    for (i, layer) in hidden.iter_mut().enumerate() {
        let prefix = format!("hidden.{}", i);
        params.extend(layer.parameters_mut().into_iter().map(|p| p.prefixed(&prefix)));
    }
    params.extend(head.parameters_mut().into_iter().map(|p| p.prefixed(head_name)));
    params
}

pub(crate) fn stack_buffers(hidden: &[LinearBnLeakyRelu]) -> Vec<Buffer> {
    hidden
        .iter()
        .enumerate()
        .flat_map(|(i, layer)| {
            let prefix = format!("hidden.{}", i);
            layer
                .buffers()
                .into_iter()
                .map(move |b| b.prefixed(&prefix))
        })
        .collect()
}

/// Writes the layer listing shared by encoder and decoder `Display` impls.
pub(crate) fn fmt_stack(
    f: &mut fmt::Formatter<'_>,
    name: &str,
    hidden: &[LinearBnLeakyRelu],
    head_name: &str,
    head: &DenseLayer,
    output_activation: Option<&str>,
) -> fmt::Result {
    writeln!(f, "{}(", name)?;
    for (i, layer) in hidden.iter().enumerate() {
        writeln!(f, "  (hidden.{}): {}", i, layer)?;
    }
    writeln!(
        f,
        "  ({}): Linear({} -> {}, bias={})",
        head_name,
        head.input_size(),
        head.output_size(),
        head.has_bias()
    )?;
    if let Some(activation) = output_activation {
        writeln!(f, "  (output_activation): {}", activation)?;
    }
    write!(f, ")")
}
