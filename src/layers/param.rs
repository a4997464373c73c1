//! Named views over learnable parameters and running statistics.
//!
//! Layers and networks hand these out so that an optimizer or serializer
//! living outside the crate can read and update parameters in place.

/// Read-only view of one parameter tensor.
#[derive(Debug)]
pub struct Param<'a> {
    pub name: String,
    pub values: &'a [f32],
}

/// Mutable view of one parameter tensor.
#[derive(Debug)]
pub struct ParamMut<'a> {
    pub name: String,
    pub values: &'a mut [f32],
}

/// Snapshot of a non-learnable state tensor (batch-norm running statistics).
#[derive(Debug, Clone, PartialEq)]
pub struct Buffer {
    pub name: String,
    pub values: Vec<f32>,
}

impl<'a> Param<'a> {
    pub fn new(name: impl Into<String>, values: &'a [f32]) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    pub(crate) fn prefixed(mut self, prefix: &str) -> Self {
        self.name = format!("{}.{}", prefix, self.name);
        self
    }
}

impl<'a> ParamMut<'a> {
    pub fn new(name: impl Into<String>, values: &'a mut [f32]) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    pub(crate) fn prefixed(mut self, prefix: &str) -> Self {
        self.name = format!("{}.{}", prefix, self.name);
        self
    }
}

impl Buffer {
    pub fn new(name: impl Into<String>, values: Vec<f32>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    pub(crate) fn prefixed(mut self, prefix: &str) -> Self {
        self.name = format!("{}.{}", prefix, self.name);
        self
    }
}

/// Prepends `prefix.` to every name in a list of views.
pub(crate) fn prefix_all<T>(items: Vec<T>, prefix: &str, f: fn(T, &str) -> T) -> Vec<T> {
    items.into_iter().map(|item| f(item, prefix)).collect()
}
