//! Dense N-dimensional arrays in column-major order.

use sampler_core::{Result, SamplingError};

/// A dense array with the first index varying fastest.
///
/// # Examples
///
/// ```rust
/// use sampler_gen::DenseArray;
///
/// let array = DenseArray::from_vec(vec![2, 3], (0..6).collect()).unwrap();
/// assert_eq!(array.get(&[1, 0]), Some(&1));
/// assert_eq!(array.get(&[0, 1]), Some(&2));
/// assert_eq!(array.get(&[2, 0]), None);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct DenseArray<T> {
    dims: Vec<usize>,
    data: Vec<T>,
}

impl<T> DenseArray<T> {
    /// Builds an array from its shape and column-major data.
    ///
    /// # Errors
    ///
    /// Returns [`SamplingError::InvalidDimensions`] when the shape does not
    /// describe `data.len()` elements.
    pub fn from_vec(dims: Vec<usize>, data: Vec<T>) -> Result<Self> {
        let expected = dims.iter().try_fold(1usize, |acc, &dim| acc.checked_mul(dim));
        if expected != Some(data.len()) {
            return Err(SamplingError::InvalidDimensions {
                dims,
                reason: format!("shape does not match {} elements", data.len()),
            });
        }
        Ok(Self { dims, data })
    }

    pub(crate) fn from_parts(dims: Vec<usize>, data: Vec<T>) -> Self {
        Self { dims, data }
    }

    /// Shape.
    pub fn dims(&self) -> &[usize] {
        &self.dims
    }

    /// Number of dimensions.
    pub fn ndims(&self) -> usize {
        self.dims.len()
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the array has no elements.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Element at a multi-index, or `None` when out of bounds.
    pub fn get(&self, index: &[usize]) -> Option<&T> {
        self.offset(index).and_then(|offset| self.data.get(offset))
    }

    /// Elements in storage order.
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Mutable elements in storage order.
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Iterates in storage order.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.data.iter()
    }

    /// Consumes the array, returning its storage.
    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    fn offset(&self, index: &[usize]) -> Option<usize> {
        if index.len() != self.dims.len() {
            return None;
        }
        let mut offset = 0;
        let mut stride = 1;
        for (&i, &dim) in index.iter().zip(&self.dims) {
            if i >= dim {
                return None;
            }
            offset += i * stride;
            stride *= dim;
        }
        Some(offset)
    }
}

impl<'a, T> IntoIterator for &'a DenseArray<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.iter()
    }
}
