//! Batched input and output tensors
//!
//! A [`Batch`] is a row-major `f32` buffer with an explicit shape whose first
//! dimension is the batch size. Networks flatten every trailing dimension into
//! a single feature axis before the first layer.

use crate::error::{NetworkError, Result};

/// Row-major tensor whose leading dimension indexes samples.
#[derive(Debug, Clone, PartialEq)]
pub struct Batch {
    shape: Vec<usize>,
    data: Vec<f32>,
}

impl Batch {
    /// Wraps `data` with the given shape.
    ///
    /// # Errors
    ///
    /// Returns [`NetworkError::Shape`] if the shape is empty or its product
    /// differs from `data.len()`.
    ///
    /// # Examples
    ///
    /// ```
    /// use mlp_autoencoder::Batch;
    ///
    /// let batch = Batch::new(vec![2, 1, 3], vec![0.0; 6]).unwrap();
    /// assert_eq!(batch.batch_size(), 2);
    /// assert_eq!(batch.features(), 3);
    /// ```
    pub fn new(shape: Vec<usize>, data: Vec<f32>) -> Result<Self> {
        if shape.is_empty() {
            return Err(NetworkError::shape("batch rank", 1, 0));
        }
        let expected: usize = shape.iter().product();
        if expected != data.len() {
            return Err(NetworkError::shape("batch data", expected, data.len()));
        }
        Ok(Self { shape, data })
    }

    /// Builds a `[rows, cols]` batch.
    pub fn from_rows(rows: usize, cols: usize, data: Vec<f32>) -> Result<Self> {
        Self::new(vec![rows, cols], data)
    }

    /// Zero-filled batch of the given shape.
    ///
    /// # Errors
    ///
    /// Returns [`NetworkError::Shape`] if the shape is empty.
    pub fn zeros(shape: Vec<usize>) -> Result<Self> {
        let len = shape.iter().product();
        Self::new(shape, vec![0.0f32; len])
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn data(&self) -> &[f32] {
        &self.data
    }

    pub fn into_data(self) -> Vec<f32> {
        self.data
    }

    /// Number of samples (size of the leading dimension).
    pub fn batch_size(&self) -> usize {
        self.shape.first().copied().unwrap_or(0)
    }

    /// Number of features per sample once trailing dimensions are flattened.
    pub fn features(&self) -> usize {
        match self.shape.get(1..) {
            Some(trailing) => trailing.iter().product(),
            None => 0,
        }
    }

    /// Reshapes to `[batch, features]` without copying.
    pub fn flatten(self) -> Self {
        let shape = vec![self.batch_size(), self.features()];
        Self {
            shape,
            data: self.data,
        }
    }

    /// Row `index` of the flattened view, or `None` past the last sample.
    pub fn row(&self, index: usize) -> Option<&[f32]> {
        let cols = self.features();
        let start = index.checked_mul(cols)?;
        self.data.get(start..start.checked_add(cols)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_checks_length() {
        assert!(Batch::new(vec![2, 3], vec![0.0; 6]).is_ok());
        assert!(matches!(
            Batch::new(vec![2, 3], vec![0.0; 5]),
            Err(NetworkError::Shape { expected: 6, actual: 5, .. })
        ));
    }

    #[test]
    fn test_new_rejects_rank_zero() {
        assert!(Batch::new(vec![], vec![]).is_err());
    }

    #[test]
    fn test_flatten_trailing_dims() {
        let batch = Batch::new(vec![4, 1, 2, 5], vec![1.0; 40]).unwrap();
        let flat = batch.flatten();
        assert_eq!(flat.shape(), &[4, 10]);
        assert_eq!(flat.data().len(), 40);
    }

    #[test]
    fn test_rank_one_has_single_feature() {
        let batch = Batch::new(vec![3], vec![1.0, 2.0, 3.0]).unwrap();
        assert_eq!(batch.features(), 1);
        assert_eq!(batch.flatten().shape(), &[3, 1]);
    }

    #[test]
    fn test_row_access() {
        let batch = Batch::from_rows(2, 2, vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        assert_eq!(batch.row(1), Some(&[3.0, 4.0][..]));
        assert_eq!(batch.row(2), None);
    }

    #[test]
    fn test_rank_zero_accessors_do_not_panic() {
        let batch = Batch { shape: Vec::new(), data: Vec::new() };
        assert_eq!(batch.batch_size(), 0);
        assert_eq!(batch.features(), 0);
    }

    #[test]
    fn test_zeros_rejects_rank_zero() {
        assert!(matches!(
            Batch::zeros(vec![]),
            Err(NetworkError::Shape { expected: 1, actual: 0, .. })
        ));
        let batch = Batch::zeros(vec![2, 3]).unwrap();
        assert_eq!(batch.data(), &[0.0; 6]);
    }
}
