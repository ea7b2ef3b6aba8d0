use crate::errors::TreeError;

/// Contiguous Column Major Matrix data container.
///
/// This structure borrows a dense matrix of values held in a single contiguous memory block,
/// in column-major order (Fortran-style), so each feature column is one slice.
///
/// # Type Parameters
/// * `T` - The numeric type of the data, `f64` for training and prediction.
pub struct Matrix<'a, T> {
    /// The raw data stored in a single slice.
    pub data: &'a [T],
    /// Indices into the data row-wise.
    pub index: Vec<usize>,
    /// Number of rows in the matrix.
    pub rows: usize,
    /// Number of columns in the matrix.
    pub cols: usize,
    stride1: usize,
    stride2: usize,
}

impl<'a, T> Matrix<'a, T> {
    // Defaults to column major
    /// Create a new Matrix.
    ///
    /// The caller is responsible for `data.len() == rows * cols`, use
    /// [`Matrix::try_new`] when the buffer comes from outside.
    pub fn new(data: &'a [T], rows: usize, cols: usize) -> Self {
        Matrix {
            data,
            index: (0..rows).collect(),
            rows,
            cols,
            stride1: rows,
            stride2: 1,
        }
    }

    /// Create a new Matrix, checking that the buffer is rectangular and non-empty.
    pub fn try_new(data: &'a [T], rows: usize, cols: usize) -> Result<Self, TreeError> {
        if rows == 0 || cols == 0 {
            return Err(TreeError::InvalidInput(format!(
                "feature matrix must have at least one row and one column, got {} x {}",
                rows, cols
            )));
        }
        if data.len() != rows * cols {
            return Err(TreeError::InvalidInput(format!(
                "buffer of length {} cannot hold a {} x {} matrix",
                data.len(),
                rows,
                cols
            )));
        }
        Ok(Matrix::new(data, rows, cols))
    }

    /// Get a single reference to an item in the matrix.
    ///
    /// * `i` - The ith row of the data to get.
    /// * `j` - the jth column of the data to get.
    pub fn get(&self, i: usize, j: usize) -> &T {
        &self.data[self.item_index(i, j)]
    }

    fn item_index(&self, i: usize, j: usize) -> usize {
        let mut idx = self.stride2 * i;
        idx += j * self.stride1;
        idx
    }

    /// Get access to a row of the data, as an iterator.
    pub fn get_row_iter(&self, row: usize) -> std::iter::StepBy<std::iter::Skip<std::slice::Iter<'a, T>>> {
        self.data.iter().skip(row).step_by(self.rows)
    }

    /// Get an entire column in the matrix.
    ///
    /// * `col` - The index of the column to get.
    pub fn get_col(&self, col: usize) -> &[T] {
        let i = self.item_index(0, col);
        let j = self.item_index(self.rows, col);
        &self.data[i..j]
    }
}

impl<'a, T> Matrix<'a, T>
where
    T: Copy,
{
    /// Get a row of the data as a vector.
    pub fn get_row(&self, row: usize) -> Vec<T> {
        self.get_row_iter(row).copied().collect()
    }
}

impl<'a> Matrix<'a, f64> {
    /// Fail on the first NaN or infinite value, missing values are not supported.
    pub fn check_finite(&self) -> Result<(), TreeError> {
        match self.data.iter().position(|v| !v.is_finite()) {
            Some(pos) => Err(TreeError::InvalidInput(format!(
                "non-finite value {} at row {}, column {}",
                self.data[pos],
                pos % self.rows,
                pos / self.rows
            ))),
            None => Ok(()),
        }
    }
}

/// Convert row-major nested rows into a column-major buffer usable by [`Matrix`].
///
/// Returns the buffer together with the number of rows and columns.
/// Every row must have the same, non-zero, number of columns.
pub fn flatten_rows(rows: &[Vec<f64>]) -> Result<(Vec<f64>, usize, usize), TreeError> {
    let n_rows = rows.len();
    let n_cols = match rows.first() {
        Some(r) => r.len(),
        None => return Err(TreeError::InvalidInput("feature matrix has no rows".to_string())),
    };
    if n_cols == 0 {
        return Err(TreeError::InvalidInput("feature matrix has no columns".to_string()));
    }
    if let Some((i, r)) = rows.iter().enumerate().find(|(_, r)| r.len() != n_cols) {
        return Err(TreeError::InvalidInput(format!(
            "row {} has {} columns, expected {}",
            i,
            r.len(),
            n_cols
        )));
    }
    let mut data = Vec::with_capacity(n_rows * n_cols);
    for j in 0..n_cols {
        data.extend(rows.iter().map(|r| r[j]));
    }
    Ok((data, n_rows, n_cols))
}
