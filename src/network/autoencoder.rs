//! MLP autoencoder: encoder followed by a mirrored decoder.

use std::fmt;

use tracing::debug;

use crate::architecture::ArchitectureSpec;
use crate::batch::Batch;
use crate::error::Result;
use crate::layers::{Buffer, Param, ParamMut};
use crate::network::{Decoder, Encoder, Mode, Network};
use crate::utils::SimpleRng;

/// Encoder with the given hidden widths and a decoder with the same widths
/// reversed, so `"32-16"` encodes `x -> 32 -> 16 -> z` and decodes
/// `z -> 16 -> 32 -> x`.
///
/// # Example
///
/// ```
/// use mlp_autoencoder::{ArchitectureSpec, Autoencoder, Batch, Network};
/// use mlp_autoencoder::utils::SimpleRng;
///
/// let spec = ArchitectureSpec::parse(12, "32-16", 8, false).unwrap();
/// let ae = Autoencoder::new(&spec, &mut SimpleRng::new(42)).unwrap();
/// assert_eq!(ae.decoder().h_dims(), &[16, 32]);
///
/// let x = Batch::zeros(vec![4, 12]).unwrap();
/// assert_eq!(ae.forward(&x).unwrap().shape(), &[4, 12]);
/// ```
#[derive(Debug, Clone)]
pub struct Autoencoder {
    encoder: Encoder,
    decoder: Decoder,
    mode: Mode,
}

impl Autoencoder {
    pub fn new(spec: &ArchitectureSpec, rng: &mut SimpleRng) -> Result<Self> {
        let encoder = Encoder::new(spec, rng)?;
        let decoder = Decoder::new(&spec.reversed(), rng)?;
        debug!(
            encoder_h_dims = %spec.h_dims_string(),
            decoder_h_dims = %decoder.spec().h_dims_string(),
            "built autoencoder"
        );

        Ok(Self {
            encoder,
            decoder,
            mode: Mode::Train,
        })
    }

    pub fn encoder(&self) -> &Encoder {
        &self.encoder
    }

    pub fn decoder(&self) -> &Decoder {
        &self.decoder
    }

    /// Splits the autoencoder, e.g. to keep the pretrained encoder.
    pub fn into_parts(self) -> (Encoder, Decoder) {
        (self.encoder, self.decoder)
    }

    /// Latent codes for `input` without decoding them.
    pub fn encode(&self, input: &Batch) -> Result<Batch> {
        self.encoder.forward(input)
    }
}

impl Network for Autoencoder {
    fn name(&self) -> &'static str {
        "Autoencoder"
    }

    fn forward(&self, input: &Batch) -> Result<Batch> {
        let code = self.encoder.forward(input)?;
        self.decoder.forward(&code)
    }

    fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
        self.encoder.set_mode(mode);
        self.decoder.set_mode(mode);
    }

    fn mode(&self) -> Mode {
        self.mode
    }

    fn input_dim(&self) -> usize {
        self.encoder.input_dim()
    }

    fn output_dim(&self) -> usize {
        self.decoder.output_dim()
    }

    fn rep_dim(&self) -> usize {
        self.encoder.rep_dim()
    }

    fn parameters(&self) -> Vec<Param<'_>> {
        let mut params: Vec<_> = self
            .encoder
            .parameters()
            .into_iter()
            .map(|p| p.prefixed("encoder"))
            .collect();
        params.extend(self.decoder.parameters().into_iter().map(|p| p.prefixed("decoder")));
        params
    }

    fn parameters_mut(&mut self) -> Vec<ParamMut<'_>> {
        let mut params: Vec<_> = self
            .encoder
            .parameters_mut()
            .into_iter()
            .map(|p| p.prefixed("encoder"))
            .collect();
        params.extend(
            self.decoder
                .parameters_mut()
                .into_iter()
                .map(|p| p.prefixed("decoder")),
        );
        params
    }

    fn buffers(&self) -> Vec<Buffer> {
        let mut buffers: Vec<_> = self
            .encoder
            .buffers()
            .into_iter()
            .map(|b| b.prefixed("encoder"))
            .collect();
        buffers.extend(self.decoder.buffers().into_iter().map(|b| b.prefixed("decoder")));
        buffers
    }
}

impl fmt::Display for Autoencoder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Autoencoder(")?;
        writeln!(f, "  (encoder): {}", indent_nested(&self.encoder.to_string()))?;
        writeln!(f, "  (decoder): {}", indent_nested(&self.decoder.to_string()))?;
        write!(f, ")")
    }
}

/// Indents every line after the first by two spaces.
fn indent_nested(text: &str) -> String {
    text.replace('\n', "\n  ")
}
