/* ************************************************************************ **
** This file is part of matcalc, and is licensed under EITHER the MIT       **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

use ndarray::{Array2, ArrayBase, ArrayView2, Ix2};

/// Owned, contiguous, C-order matrix of `f64`.
///
/// The shape is fixed at construction. Operations never modify a `Matrix`;
/// they produce new ones.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix(
    // invariant: .is_standard_layout()
    Array2<f64>
);

impl Matrix {
    /// # Panics
    ///
    /// Panics if `data.len() != rows * cols`.
    pub fn from_row_major_data((rows, cols): (usize, usize), data: Vec<f64>) -> Self {
        assert_eq!(data.len(), rows * cols, "data does not match dims {:?}", (rows, cols));
        Matrix(Array2::from_shape_vec((rows, cols), data).expect("(BUG) length was checked"))
    }

    pub fn eye(n: usize) -> Self { Matrix(Array2::eye(n)) }

    pub fn num_rows(&self) -> usize { self.0.nrows() }
    pub fn num_cols(&self) -> usize { self.0.ncols() }
    /// `(rows, cols)`
    pub fn dims(&self) -> (usize, usize) { self.0.dim() }
    pub fn is_square(&self) -> bool { self.num_rows() == self.num_cols() }

    pub fn view(&self) -> ArrayView2<'_, f64> { self.0.view() }

    pub fn c_order_data(&self) -> &[f64] {
        self.0.as_slice().expect("(BUG) not c-order!!")
    }

    /// Iterate over the rows as contiguous slices.
    pub fn rows(&self) -> impl ExactSizeIterator<Item=&[f64]> + '_ {
        let width = self.num_cols();
        let data = self.c_order_data();
        // `chunks` rejects a size of zero
        (0..self.num_rows()).map(move |r| &data[r * width..(r + 1) * width])
    }
}

impl From<Array2<f64>> for Matrix {
    fn from(arr: Array2<f64>) -> Self {
        if arr.is_standard_layout() {
            Matrix(arr)
        } else {
            arr.view().into()
        }
    }
}

impl<'a> From<ArrayView2<'a, f64>> for Matrix {
    fn from(arr: ArrayView2<'a, f64>) -> Self {
        let dim = arr.raw_dim();
        let data = match arr.as_slice() {
            Some(data) => data.to_vec(),
            None => arr.iter().cloned().collect(),
        };
        Matrix(Array2::from_shape_vec(dim, data).expect("(BUG) iteration is in logical order"))
    }
}

impl<'a, S> From<&'a ArrayBase<S, Ix2>> for Matrix
where S: ndarray::Data<Elem = f64>,
{
    fn from(arr: &'a ArrayBase<S, Ix2>) -> Self { arr.view().into() }
}

impl std::ops::Index<(usize, usize)> for Matrix {
    type Output = f64;

    #[inline(always)]
    fn index(&self, index: (usize, usize)) -> &f64 { &self.0[index] }
}
