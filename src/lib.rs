//! MLP encoder, decoder and autoencoder networks
//!
//! Feed-forward networks assembled from a repeated Linear + BatchNorm +
//! LeakyReLU block, sized from a compact hidden-width string such as `"32-16"`.
//!
//! # Modules
//!
//! - `dims`: hidden-width specification parsing
//! - `batch`: batched tensors and flattening
//! - `layers`: Layer trait, Dense, BatchNorm and the composite block
//! - `architecture`: validated architecture specification and network building
//! - `network`: Encoder, Decoder, Autoencoder and the shared Network trait
//! - `config`: JSON network configuration
//! - `utils`: RNG, activation functions, matrix multiply

pub mod architecture;
pub mod batch;
pub mod config;
pub mod dims;
pub mod error;
pub mod layers;
pub mod network;
pub mod utils;

pub use architecture::{build_network, ArchitectureSpec};
pub use batch::Batch;
pub use error::{NetworkError, Result};
pub use network::{Autoencoder, Decoder, Encoder, Mode, Network};
