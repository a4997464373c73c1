//! Hidden-width specification parsing
//!
//! Hidden layer widths are written compactly as integers joined by `-`,
//! e.g. `"32-16"` for two hidden layers of 32 and 16 units.

use crate::error::{NetworkError, Result};

/// Separator between widths in a hidden-width specification.
pub const DIM_SEPARATOR: char = '-';

/// Parses a hidden-width specification such as `"32-16"` into `[32, 16]`.
///
/// Every segment must be a positive integer. Surrounding whitespace in a
/// segment is ignored.
///
/// # Errors
///
/// Returns [`NetworkError::Format`] for an empty string, an empty segment
/// (`"32-"`), a non-numeric segment (`"abc"`) or a zero width.
///
/// # Examples
///
/// ```
/// use mlp_autoencoder::dims::parse_hidden_dims;
///
/// assert_eq!(parse_hidden_dims("32-16").unwrap(), vec![32, 16]);
/// assert!(parse_hidden_dims("32-").is_err());
/// ```
pub fn parse_hidden_dims(spec: &str) -> Result<Vec<usize>> {
    if spec.trim().is_empty() {
        return Err(NetworkError::format(spec, "empty specification"));
    }

    spec.split(DIM_SEPARATOR)
        .enumerate()
        .map(|(i, segment)| {
            let segment = segment.trim();
            if segment.is_empty() {
                return Err(NetworkError::format(spec, format!("segment {} is empty", i)));
            }
            let width: usize = segment.parse().map_err(|_| {
                NetworkError::format(spec, format!("segment {} ({:?}) is not an integer", i, segment))
            })?;
            if width == 0 {
                return Err(NetworkError::format(spec, format!("segment {} is zero", i)));
            }
            Ok(width)
        })
        .collect()
}

/// Renders widths back into the `-` separated form.
pub fn format_hidden_dims(dims: &[usize]) -> String {
    dims.iter()
        .map(|d| d.to_string())
        .collect::<Vec<_>>()
        .join(&DIM_SEPARATOR.to_string())
}
