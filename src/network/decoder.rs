//! MLP decoder: latent code to a reconstruction bounded to [0, 1].

use std::fmt;

use tracing::debug;

use crate::architecture::ArchitectureSpec;
use crate::batch::Batch;
use crate::error::Result;
use crate::layers::{Buffer, DenseLayer, Layer, LinearBnLeakyRelu, Param, ParamMut};
use crate::network::{
    build_hidden, flatten_input, fmt_stack, forward_stack, stack_buffers, stack_parameters,
    stack_parameters_mut, Mode, Network,
};
use crate::utils::{sigmoid_inplace, SimpleRng};

/// Hidden blocks over `[rep_dim, h_1, ..., h_n]`, a dense projection
/// `h_n -> x_dim` and a sigmoid.
///
/// The hidden widths are used in the order given; an autoencoder passes the
/// reverse of its encoder's widths.
#[derive(Debug, Clone)]
pub struct Decoder {
    spec: ArchitectureSpec,
    hidden: Vec<LinearBnLeakyRelu>,
    reconstruction: DenseLayer,
    mode: Mode,
}

impl Decoder {
    pub fn new(spec: &ArchitectureSpec, rng: &mut SimpleRng) -> Result<Self> {
        let hidden = build_hidden(&spec.decoder_widths(), spec, rng)?;
        let reconstruction = DenseLayer::new(spec.last_hidden(), spec.x_dim(), spec.bias(), rng);
        debug!(
            rep_dim = spec.rep_dim(),
            h_dims = %spec.h_dims_string(),
            x_dim = spec.x_dim(),
            bias = spec.bias(),
            "built decoder"
        );

        Ok(Self {
            spec: spec.clone(),
            hidden,
            reconstruction,
            mode: Mode::Train,
        })
    }

    pub fn spec(&self) -> &ArchitectureSpec {
        &self.spec
    }

    /// Hidden widths in the order the decoder applies them.
    pub fn h_dims(&self) -> &[usize] {
        self.spec.h_dims()
    }

    pub fn hidden(&self) -> &[LinearBnLeakyRelu] {
        &self.hidden
    }

    pub fn reconstruction_layer(&self) -> &DenseLayer {
        &self.reconstruction
    }
}

impl Network for Decoder {
    fn name(&self) -> &'static str {
        "Decoder"
    }

    fn forward(&self, input: &Batch) -> Result<Batch> {
        let (batch_size, z) = flatten_input(input, self.spec.rep_dim(), "decoder input")?;
        let mut x = forward_stack(&self.hidden, &self.reconstruction, z, batch_size)?;
        sigmoid_inplace(&mut x);
        Batch::from_rows(batch_size, self.spec.x_dim(), x)
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
        self.spec.rep_dim()
    }

    fn output_dim(&self) -> usize {
        self.spec.x_dim()
    }

    fn rep_dim(&self) -> usize {
        self.spec.rep_dim()
    }

    fn parameters(&self) -> Vec<Param<'_>> {
        stack_parameters(&self.hidden, &self.reconstruction, "reconstruction")
    }

    fn parameters_mut(&mut self) -> Vec<ParamMut<'_>> {
        stack_parameters_mut(&mut self.hidden, &mut self.reconstruction, "reconstruction")
    }

    fn buffers(&self) -> Vec<Buffer> {
        stack_buffers(&self.hidden)
    }
}

impl fmt::Display for Decoder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_stack(
            f,
            "Decoder",
            &self.hidden,
            "reconstruction",
            &self.reconstruction,
            Some("Sigmoid"),
        )
    }
}
