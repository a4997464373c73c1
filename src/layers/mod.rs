//! Layer abstractions for neural networks
//!
//! This module provides the Layer trait, the primitive layers (Dense,
//! BatchNorm) and the composite Linear + BatchNorm + LeakyReLU block the
//! networks are assembled from.

mod r#trait;
pub mod batchnorm;
pub mod composite;
pub mod dense;
pub mod param;

// Re-export the Layer trait for convenience
pub use r#trait::Layer;
pub use batchnorm::BatchNormLayer;
pub use composite::{LinearBnLeakyRelu, DEFAULT_BN_EPSILON, DEFAULT_BN_MOMENTUM};
pub use dense::DenseLayer;
pub use param::{Buffer, Param, ParamMut};
