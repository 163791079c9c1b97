//! Dense row-major matrix, the input type at the estimator seam.
//!
//! One row per record, one column per schema field. Missing values are
//! represented as `f64::NAN` (the aligner never produces them for one-hot
//! gaps, which are filled with 0.0 instead).

/// Dense row-major matrix.
///
/// Rows are contiguous, which matches how tree traversal consumes features.
///
/// # Example
///
/// ```
/// use housecast::data::RowMatrix;
///
/// let m = RowMatrix::from_vec(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], 2, 3);
/// assert_eq!(m.row_slice(1), &[4.0, 5.0, 6.0]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RowMatrix<T = f64> {
    data: Box<[T]>,
    num_rows: usize,
    num_cols: usize,
}

impl<T: Copy> RowMatrix<T> {
    /// Create a matrix from a flat row-major buffer, taking ownership.
    ///
    /// # Panics
    ///
    /// Panics if `data.len() != num_rows * num_cols`.
    pub fn from_vec(data: Vec<T>, num_rows: usize, num_cols: usize) -> Self {
        assert_eq!(
            data.len(),
            num_rows * num_cols,
            "data length {} does not match dimensions {}x{}",
            data.len(),
            num_rows,
            num_cols
        );
        Self {
            data: data.into_boxed_slice(),
            num_rows,
            num_cols,
        }
    }

    /// Stack per-record rows into a matrix.
    ///
    /// `num_cols` is passed explicitly so a zero-row matrix still carries the
    /// schema width.
    ///
    /// # Panics
    ///
    /// Panics if any row's length differs from `num_cols`.
    pub fn from_rows(rows: &[Vec<T>], num_cols: usize) -> Self {
        let mut data = Vec::with_capacity(rows.len() * num_cols);
        for (i, row) in rows.iter().enumerate() {
            assert_eq!(row.len(), num_cols, "row {} has length {}", i, row.len());
            data.extend_from_slice(row);
        }
        Self::from_vec(data, rows.len(), num_cols)
    }

    /// Number of rows.
    #[inline]
    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    /// Number of columns.
    #[inline]
    pub fn num_cols(&self) -> usize {
        self.num_cols
    }

    /// Returns true if the matrix has no rows.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.num_rows == 0
    }

    /// Borrow one row as a contiguous slice.
    ///
    /// # Panics
    ///
    /// Panics if `row >= num_rows`.
    #[inline]
    pub fn row_slice(&self, row: usize) -> &[T] {
        let start = row * self.num_cols;
        &self.data[start..start + self.num_cols]
    }

    /// Iterate over rows as contiguous slices.
    pub fn rows(&self) -> impl Iterator<Item = &[T]> + '_ {
        self.data.chunks_exact(self.num_cols.max(1)).take(self.num_rows)
    }

    /// The flat row-major buffer.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }
}
