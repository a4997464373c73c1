//! Architecture specification and network building
//!
//! An [`ArchitectureSpec`] fixes every width of a network: the input
//! dimensionality, the hidden widths and the latent dimensionality, along
//! with the bias flag and the hidden-block hyperparameters. It is validated
//! once on construction and immutable afterwards.

use tracing::debug;

use crate::config::{NetworkConfig, NetworkKind};
use crate::dims::{format_hidden_dims, parse_hidden_dims};
use crate::error::{NetworkError, Result};
use crate::layers::{DEFAULT_BN_EPSILON, DEFAULT_BN_MOMENTUM};
use crate::network::{Autoencoder, Decoder, Encoder, Network};
use crate::utils::{SimpleRng, DEFAULT_NEGATIVE_SLOPE};

/// Widths and hyperparameters of an encoder, decoder or autoencoder.
///
/// # Example
///
/// ```
/// use mlp_autoencoder::ArchitectureSpec;
///
/// let spec = ArchitectureSpec::parse(784, "32-16", 8, false).unwrap();
/// assert_eq!(spec.encoder_widths(), vec![784, 32, 16]);
/// assert_eq!(spec.reversed().h_dims(), &[16, 32]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ArchitectureSpec {
    x_dim: usize,
    h_dims: Vec<usize>,
    rep_dim: usize,
    bias: bool,
    eps: f32,
    momentum: f32,
    negative_slope: f32,
}

impl ArchitectureSpec {
    /// Builds a spec from already parsed hidden widths.
    ///
    /// # Errors
    ///
    /// Returns [`NetworkError::DegenerateConfig`] if `h_dims` is empty or any
    /// dimension is zero.
    pub fn new(x_dim: usize, h_dims: Vec<usize>, rep_dim: usize, bias: bool) -> Result<Self> {
        if h_dims.is_empty() {
            return Err(NetworkError::DegenerateConfig(
                "at least one hidden width is required".to_string(),
            ));
        }
        if x_dim == 0 {
            return Err(NetworkError::DegenerateConfig(
                "input dimensionality must be greater than 0".to_string(),
            ));
        }
        if rep_dim == 0 {
            return Err(NetworkError::DegenerateConfig(
                "latent dimensionality must be greater than 0".to_string(),
            ));
        }
        if let Some(i) = h_dims.iter().position(|&w| w == 0) {
            return Err(NetworkError::DegenerateConfig(format!(
                "hidden width {} must be greater than 0",
                i
            )));
        }

        Ok(Self {
            x_dim,
            h_dims,
            rep_dim,
            bias,
            eps: DEFAULT_BN_EPSILON,
            momentum: DEFAULT_BN_MOMENTUM,
            negative_slope: DEFAULT_NEGATIVE_SLOPE,
        })
    }

    /// Builds a spec from a hidden-width string such as `"32-16"`.
    pub fn parse(x_dim: usize, h_dims: &str, rep_dim: usize, bias: bool) -> Result<Self> {
        Self::new(x_dim, parse_hidden_dims(h_dims)?, rep_dim, bias)
    }

    /// Sets the batch-norm epsilon of the hidden blocks.
    pub fn with_eps(mut self, eps: f32) -> Result<Self> {
        if !(eps > 0.0) {
            return Err(NetworkError::InvalidConfig(format!(
                "eps must be positive, got {}",
                eps
            )));
        }
        self.eps = eps;
        Ok(self)
    }

    /// Sets the running-statistics momentum of the hidden blocks.
    pub fn with_momentum(mut self, momentum: f32) -> Result<Self> {
        if !(0.0..=1.0).contains(&momentum) {
            return Err(NetworkError::InvalidConfig(format!(
                "momentum must be in range [0.0, 1.0], got {}",
                momentum
            )));
        }
        self.momentum = momentum;
        Ok(self)
    }

    /// Sets the leaky ReLU negative slope of the hidden blocks.
    pub fn with_negative_slope(mut self, negative_slope: f32) -> Result<Self> {
        if !(negative_slope >= 0.0) {
            return Err(NetworkError::InvalidConfig(format!(
                "negative_slope must be non-negative, got {}",
                negative_slope
            )));
        }
        self.negative_slope = negative_slope;
        Ok(self)
    }

    /// Same spec with the hidden widths in reverse order.
    pub fn reversed(&self) -> Self {
        let mut spec = self.clone();
        spec.h_dims.reverse();
        spec
    }

    pub fn x_dim(&self) -> usize {
        self.x_dim
    }

    pub fn h_dims(&self) -> &[usize] {
        &self.h_dims
    }

    /// Hidden widths in `-` separated form.
    pub fn h_dims_string(&self) -> String {
        format_hidden_dims(&self.h_dims)
    }

    pub fn rep_dim(&self) -> usize {
        self.rep_dim
    }

    pub fn bias(&self) -> bool {
        self.bias
    }

    pub fn eps(&self) -> f32 {
        self.eps
    }

    pub fn momentum(&self) -> f32 {
        self.momentum
    }

    pub fn negative_slope(&self) -> f32 {
        self.negative_slope
    }

    /// `[x_dim, h_1, ..., h_n]`: widths chained by the encoder's hidden blocks.
    pub fn encoder_widths(&self) -> Vec<usize> {
        std::iter::once(self.x_dim)
            .chain(self.h_dims.iter().copied())
            .collect()
    }

    /// `[rep_dim, h_1, ..., h_n]`: widths chained by the decoder's hidden blocks.
    pub fn decoder_widths(&self) -> Vec<usize> {
        std::iter::once(self.rep_dim)
            .chain(self.h_dims.iter().copied())
            .collect()
    }

    /// Last hidden width, the input of the terminal projection.
    pub fn last_hidden(&self) -> usize {
        // h_dims is non-empty by construction
        self.h_dims[self.h_dims.len() - 1]
    }
}

/// Builds the network described by a configuration.
///
/// # Examples
///
/// ```
/// use mlp_autoencoder::architecture::build_network;
/// use mlp_autoencoder::config::NetworkConfig;
/// use mlp_autoencoder::utils::SimpleRng;
///
/// let config: NetworkConfig = serde_json::from_str(
///     r#"{ "kind": "autoencoder", "x_dim": 20, "h_dims": "16-8", "rep_dim": 4 }"#,
/// ).unwrap();
/// let mut rng = SimpleRng::new(42);
/// let network = build_network(&config, &mut rng).unwrap();
/// assert_eq!(network.output_dim(), 20);
/// ```
pub fn build_network(config: &NetworkConfig, rng: &mut SimpleRng) -> Result<Box<dyn Network>> {
    let spec = config.spec()?;
    debug!(kind = ?config.kind, h_dims = %spec.h_dims_string(), "building network");

    let network: Box<dyn Network> = match config.kind {
        NetworkKind::Encoder => Box::new(Encoder::new(&spec, rng)?),
        NetworkKind::Decoder => Box::new(Decoder::new(&spec, rng)?),
        NetworkKind::Autoencoder => Box::new(Autoencoder::new(&spec, rng)?),
    };
    Ok(network)
}
