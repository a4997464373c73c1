//! Shared utilities for the network implementations
//!
//! Random number generation, activation functions and the matrix multiply
//! used by dense layers.

pub mod activations;
pub mod gemm;
pub mod rng;

pub use activations::{leaky_relu_inplace, sigmoid, sigmoid_inplace, DEFAULT_NEGATIVE_SLOPE};
pub use gemm::matmul;
pub use rng::SimpleRng;
