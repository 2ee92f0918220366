//! Random sparse vectors and matrices.
//!
//! Each position is occupied independently with probability `density`;
//! occupied positions receive a draw from the value request, which defaults
//! to uniform `Float64` over `[0, 1)`. Both the occupancy and value samplers
//! are resolved once per call. Matrices are stored in compressed sparse
//! column form and filled column by column.

use sampler_core::{Engine, Repetition, Result, SamplingError, Value, ValueKind};

use crate::context::SamplingContext;
use crate::distribution::{Distribution, Interval};
use crate::request::Request;
use crate::sampler::Sampler;

/// A sparse vector with sorted indices.
#[derive(Clone, Debug, PartialEq)]
pub struct SparseVector<T> {
    len: usize,
    indices: Vec<usize>,
    values: Vec<T>,
}

impl<T> SparseVector<T> {
    /// Logical length.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the logical length is zero.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of stored entries.
    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    /// Stored indices, ascending.
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// Stored values, aligned with [`indices`](Self::indices).
    pub fn values(&self) -> &[T] {
        &self.values
    }

    /// Value stored at `index`, if any.
    pub fn get(&self, index: usize) -> Option<&T> {
        self.indices
            .binary_search(&index)
            .ok()
            .map(|position| &self.values[position])
    }

    /// Fraction of positions stored.
    pub fn density(&self) -> f64 {
        if self.len == 0 {
            0.0
        } else {
            self.nnz() as f64 / self.len as f64
        }
    }

    /// Iterates `(index, value)` in index order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &T)> + '_ {
        self.indices.iter().copied().zip(self.values.iter())
    }
}

/// A sparse matrix in compressed sparse column form.
#[derive(Clone, Debug, PartialEq)]
pub struct SparseMatrix<T> {
    rows: usize,
    cols: usize,
    col_ptr: Vec<usize>,
    row_indices: Vec<usize>,
    values: Vec<T>,
}

impl<T> SparseMatrix<T> {
    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Number of stored entries.
    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    /// Column offsets into the entry arrays; `cols + 1` long.
    pub fn col_ptr(&self) -> &[usize] {
        &self.col_ptr
    }

    /// Row of each stored entry.
    pub fn row_indices(&self) -> &[usize] {
        &self.row_indices
    }

    /// Stored values.
    pub fn values(&self) -> &[T] {
        &self.values
    }

    /// Value stored at `(row, col)`, if any.
    pub fn get(&self, row: usize, col: usize) -> Option<&T> {
        if col >= self.cols {
            return None;
        }
        let (start, end) = (self.col_ptr[col], self.col_ptr[col + 1]);
        self.row_indices[start..end]
            .binary_search(&row)
            .ok()
            .map(|offset| &self.values[start + offset])
    }

    /// Fraction of positions stored.
    pub fn density(&self) -> f64 {
        let size = self.rows * self.cols;
        if size == 0 {
            0.0
        } else {
            self.nnz() as f64 / size as f64
        }
    }

    /// Iterates `(row, col, value)` in column-major order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, &T)> + '_ {
        (0..self.cols).flat_map(move |col| {
            (self.col_ptr[col]..self.col_ptr[col + 1])
                .map(move |entry| (self.row_indices[entry], col, &self.values[entry]))
        })
    }
}

impl SamplingContext {
    /// Generates a sparse vector of length `len`.
    ///
    /// # Arguments
    ///
    /// * `engine` - Source of randomness
    /// * `len` - Logical length of the vector
    /// * `density` - Probability that each position is occupied, in `[0, 1]`
    /// * `values` - Request for occupied values; uniform `Float64` in `[0, 1)` when `None`
    ///
    /// # Returns
    ///
    /// A vector whose indices are strictly ascending.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sampler_core::{StdEngine, Value};
    /// use sampler_gen::{Request, SamplingContext};
    ///
    /// let mut engine = StdEngine::from_seed(11);
    /// let vector = SamplingContext::default()
    ///     .sparse_vector(&mut engine, 200, 0.25, Some(&Request::from(1..=9i64)))
    ///     .unwrap();
    /// assert_eq!(vector.len(), 200);
    /// assert!(vector.values().iter().all(|v| matches!(v, Value::Int(1..=9))));
    /// ```
    ///
    /// # Errors
    ///
    /// - [`SamplingError::InvalidParameter`] when `density` is outside `[0, 1]`
    /// - [`SamplingError::InvalidDimensions`] when `len` exceeds the configured limit
    /// - resolution errors of the value request
    pub fn sparse_vector<E: Engine>(
        &self,
        engine: &mut E,
        len: usize,
        density: f64,
        values: Option<&Request>,
    ) -> Result<SparseVector<Value>> {
        self.element_count(&[len])?;
        let (occupancy, sampler) = self.sparse_samplers(density, values)?;
        let mut indices = Vec::new();
        let mut drawn = Vec::new();
        for index in 0..len {
            if occupied(&occupancy, engine) {
                indices.push(index);
                drawn.push(sampler.draw(engine));
            }
        }
        tracing::trace!(len, nnz = drawn.len(), "sparse vector generated");
        Ok(SparseVector {
            len,
            indices,
            values: drawn,
        })
    }

    /// Generates a `rows` × `cols` sparse matrix.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sampler_core::StdEngine;
    /// use sampler_gen::SamplingContext;
    ///
    /// let mut engine = StdEngine::from_seed(3);
    /// let matrix = SamplingContext::default()
    ///     .sparse_matrix(&mut engine, 100, 50, 0.1, None)
    ///     .unwrap();
    /// assert_eq!(matrix.col_ptr().len(), 51);
    /// assert!(matrix.density() > 0.05 && matrix.density() < 0.15);
    /// ```
    pub fn sparse_matrix<E: Engine>(
        &self,
        engine: &mut E,
        rows: usize,
        cols: usize,
        density: f64,
        values: Option<&Request>,
    ) -> Result<SparseMatrix<Value>> {
        self.element_count(&[rows, cols])?;
        let (occupancy, sampler) = self.sparse_samplers(density, values)?;
        let mut col_ptr = Vec::with_capacity(cols + 1);
        col_ptr.push(0);
        let mut row_indices = Vec::new();
        let mut drawn = Vec::new();
        for _ in 0..cols {
            for row in 0..rows {
                if occupied(&occupancy, engine) {
                    row_indices.push(row);
                    drawn.push(sampler.draw(engine));
                }
            }
            col_ptr.push(row_indices.len());
        }
        tracing::trace!(rows, cols, nnz = drawn.len(), "sparse matrix generated");
        Ok(SparseMatrix {
            rows,
            cols,
            col_ptr,
            row_indices,
            values: drawn,
        })
    }

    fn sparse_samplers(&self, density: f64, values: Option<&Request>) -> Result<(Sampler, Sampler)> {
        if !(0.0..=1.0).contains(&density) {
            return Err(SamplingError::invalid_parameter(
                "density",
                format!("{} is outside [0, 1]", density),
            ));
        }
        let occupancy = self.resolve(&Distribution::bernoulli(density).into(), Repetition::Many)?;
        let sampler = match values {
            Some(request) => self.resolve(request, Repetition::Many)?,
            None => self.resolve(
                &Distribution::interval(ValueKind::Float64, Interval::CloseOpen01).into(),
                Repetition::Many,
            )?,
        };
        Ok((occupancy, sampler))
    }
}

fn occupied<E: Engine>(occupancy: &Sampler, engine: &mut E) -> bool {
    matches!(occupancy.draw(engine), Value::Bool(true))
}

#[cfg(test)]
mod tests {
    use super::*;
    use sampler_core::StdEngine;

    #[test]
    fn test_sparse_vector_layout() {
        let mut engine = StdEngine::from_seed(1);
        let vector = SamplingContext::default()
            .sparse_vector(&mut engine, 1000, 0.2, None)
            .unwrap();
        assert_eq!(vector.len(), 1000);
        assert!(vector.indices().windows(2).all(|w| w[0] < w[1]));
        assert!(vector.density() > 0.15 && vector.density() < 0.25);
        for (index, value) in vector.iter() {
            assert_eq!(vector.get(index), Some(value));
            assert!(matches!(value, Value::Float64(x) if (0.0..1.0).contains(x)));
        }
    }

    #[test]
    fn test_extreme_densities() {
        let mut engine = StdEngine::from_seed(2);
        let context = SamplingContext::default();
        let empty = context.sparse_vector(&mut engine, 100, 0.0, None).unwrap();
        assert_eq!(empty.nnz(), 0);
        let full = context
            .sparse_matrix(&mut engine, 4, 5, 1.0, Some(&Request::from(1..=9i64)))
            .unwrap();
        assert_eq!(full.nnz(), 20);
        assert_eq!(full.col_ptr(), &[0, 4, 8, 12, 16, 20]);
        assert!(matches!(full.get(3, 4), Some(Value::Int(1..=9))));
        assert_eq!(full.get(0, 5), None);
    }

    #[test]
    fn test_matrix_iteration_order() {
        let mut engine = StdEngine::from_seed(3);
        let matrix = SamplingContext::default()
            .sparse_matrix(&mut engine, 10, 10, 0.3, None)
            .unwrap();
        let positions: Vec<(usize, usize)> = matrix.iter().map(|(r, c, _)| (r, c)).collect();
        assert_eq!(positions.len(), matrix.nnz());
        assert!(positions.windows(2).all(|w| (w[0].1, w[0].0) < (w[1].1, w[1].0)));
    }

    #[test]
    fn test_invalid_density() {
        let mut engine = StdEngine::from_seed(4);
        for density in [-0.1, 1.5, f64::NAN] {
            assert!(matches!(
                SamplingContext::default().sparse_vector(&mut engine, 10, density, None),
                Err(SamplingError::InvalidParameter { name: "density", .. })
            ));
        }
    }
}
