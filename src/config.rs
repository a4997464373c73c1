//! Network configuration files
//!
//! This module provides the JSON configuration structure for describing which
//! network to build and with which widths.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::architecture::ArchitectureSpec;
use crate::error::{NetworkError, Result};
use crate::layers::{DEFAULT_BN_EPSILON, DEFAULT_BN_MOMENTUM};
use crate::utils::DEFAULT_NEGATIVE_SLOPE;

/// Which network a configuration describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NetworkKind {
    Encoder,
    Decoder,
    Autoencoder,
}

/// Configuration for building a network.
///
/// `kind` and `x_dim` are required; every other field has a default.
///
/// # Example
///
/// ```json
/// {
///   "kind": "autoencoder",
///   "x_dim": 784,
///   "h_dims": "32-16",
///   "rep_dim": 8,
///   "bias": false,
///   "eps": 0.0001,
///   "seed": 42
/// }
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct NetworkConfig {
    /// Network variant: "encoder", "decoder" or "autoencoder"
    pub kind: NetworkKind,

    /// Input dimensionality (output dimensionality for decoders)
    pub x_dim: usize,

    /// Hidden widths joined by '-' (default "32-16")
    #[serde(default = "default_h_dims")]
    pub h_dims: String,

    /// Latent dimensionality (default 8)
    #[serde(default = "default_rep_dim")]
    pub rep_dim: usize,

    /// Bias on dense layers and affine batch norm (default false)
    #[serde(default)]
    pub bias: bool,

    /// Batch-norm epsilon (default 1e-4)
    #[serde(default = "default_eps")]
    pub eps: f32,

    /// Running-statistics momentum (default 0.9)
    #[serde(default = "default_momentum")]
    pub momentum: f32,

    /// Leaky ReLU negative slope (default 0.01)
    #[serde(default = "default_negative_slope")]
    pub negative_slope: f32,

    /// Seed for weight initialization
    pub seed: Option<u64>,
}

fn default_h_dims() -> String {
    "32-16".to_string()
}

fn default_rep_dim() -> usize {
    8
}

fn default_eps() -> f32 {
    DEFAULT_BN_EPSILON
}

fn default_momentum() -> f32 {
    DEFAULT_BN_MOMENTUM
}

fn default_negative_slope() -> f32 {
    DEFAULT_NEGATIVE_SLOPE
}

impl NetworkConfig {
    /// Validated architecture described by this configuration.
    pub fn spec(&self) -> Result<ArchitectureSpec> {
        ArchitectureSpec::parse(self.x_dim, &self.h_dims, self.rep_dim, self.bias)?
            .with_eps(self.eps)?
            .with_momentum(self.momentum)?
            .with_negative_slope(self.negative_slope)
    }
}

/// Loads a network configuration from a JSON file.
///
/// Reads the file at `path`, deserializes it and validates the described
/// architecture.
///
/// # Examples
///
/// ```no_run
/// use mlp_autoencoder::config::load_config;
///
/// let cfg = load_config("config/mlp_autoencoder.json").unwrap();
/// assert_eq!(cfg.h_dims, "32-16");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<NetworkConfig> {
    let contents = fs::read_to_string(path)?;
    let config: NetworkConfig = serde_json::from_str(&contents)?;
    validate_config(&config)?;
    Ok(config)
}

fn validate_config(config: &NetworkConfig) -> Result<()> {
    if config.x_dim == 0 {
        return Err(NetworkError::InvalidConfig(
            "x_dim must be greater than 0".to_string(),
        ));
    }
    if config.rep_dim == 0 {
        return Err(NetworkError::InvalidConfig(
            "rep_dim must be greater than 0".to_string(),
        ));
    }

    config.spec().map(|_| ())
}
