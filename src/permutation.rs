//! In-place reordering of the rows of a tensor batch.
//!
//! A batch holds `n_rows x n_cols` values in column-major order,
//! so a "row" is the `n_cols` values at `row + c * n_rows`.
//! Sum factorization needs the rows reordered so that the axis being operated on
//! varies fastest, which is a non-square transpose of each column.
//! This is done in place by following the cycles of the permutation,
//! needing one index per row of bookkeeping and no additional row storage.

use fixedbitset as fb;
use itertools::iproduct;

use crate::error::{Result, SumFactError};

/// A reordering of rows given by three nested loop bounds and strides.
///
/// Row `t` of the result, where `t` counts through `(i, j, k)` in nested loop order
/// with `k` varying fastest, is taken from row
/// `i * steps[0] + j * steps[1] + k * steps[2]` of the input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AxisPermutation {
    /// Loop bounds of `(i, j, k)`.
    pub bounds: [usize; 3],
    /// Source row strides of `(i, j, k)`.
    pub steps: [usize; 3],
}

impl AxisPermutation {
    /// Create a permutation from loop bounds and strides.
    pub fn new(bounds: [usize; 3], steps: [usize; 3]) -> Self {
        Self { bounds, steps }
    }

    /// For a batch with `sizes[a]` nodes along axis `a` and axis 0 varying fastest,
    /// the permutation making `axis` vary fastest instead.
    ///
    /// For axis 1 the resulting order is `(1, 0, 2)` (fastest first),
    /// for axis 2 it is `(2, 0, 1)`.
    /// For axis 0 this is the identity.
    pub fn to_front(axis: usize, sizes: [usize; 3]) -> Result<Self> {
        let [n0, n1, n2] = sizes;
        match axis {
            0 => Ok(Self::new([1, 1, n0 * n1 * n2], [0, 0, 1])),
            1 => Ok(Self::new([n2, n0, n1], [n0 * n1, 1, n0])),
            2 => Ok(Self::new([n0, n1, n2], [n1, 1, n0 * n1])),
            _ => Err(invalid_axis(axis)),
        }
    }

    /// The inverse of [`to_front`][Self::to_front]:
    /// for a batch ordered with `axis` fastest, restore axis 0 as the fastest.
    ///
    /// `sizes` are given in reference axis order as in `to_front`.
    pub fn to_back(axis: usize, sizes: [usize; 3]) -> Result<Self> {
        let [n0, n1, n2] = sizes;
        match axis {
            0 => Ok(Self::new([1, 1, n0 * n1 * n2], [0, 0, 1])),
            1 => Ok(Self::new([n2, n1, n0], [n1 * n0, 1, n1])),
            2 => Ok(Self::new([n2, n1, n0], [1, n2 * n0, n2])),
            _ => Err(invalid_axis(axis)),
        }
    }

    /// Total number of rows reordered by this permutation.
    #[inline]
    pub fn n_rows(&self) -> usize {
        self.bounds.iter().product()
    }

    /// Iterate over the source row of every target row, in target order.
    pub fn sources(&self) -> impl '_ + Iterator<Item = usize> {
        let [bi, bj, bk] = self.bounds;
        let [si, sj, sk] = self.steps;
        iproduct!(0..bi, 0..bj, 0..bk).map(move |(i, j, k)| i * si + j * sj + k * sk)
    }

    /// Apply this permutation in place to a batch with `n_cols` columns.
    ///
    /// Fails without touching the data if the data length doesn't match
    /// or the bounds and strides don't describe a permutation.
    pub fn apply(&self, data: &mut [f64], n_cols: usize) -> Result<()> {
        permute_rows(data, n_cols, self.bounds, self.steps)
    }
}

fn invalid_axis(axis: usize) -> SumFactError {
    SumFactError::InvalidDimension(format!("axis {axis} of a tensor with at most 3 axes"))
}

/// Reorder the rows of a column-major batch in place.
///
/// See [`AxisPermutation`] for the meaning of `bounds` and `steps`.
pub fn permute_rows(
    data: &mut [f64],
    n_cols: usize,
    bounds: [usize; 3],
    steps: [usize; 3],
) -> Result<()> {
    let perm = AxisPermutation::new(bounds, steps);
    let n_rows = perm.n_rows();
    if data.len() != n_rows * n_cols {
        return Err(SumFactError::InvalidDimension(format!(
            "batch of {} values cannot hold {n_rows} rows of {n_cols} columns",
            data.len()
        )));
    }

    // check that every row is used exactly once before moving anything,
    // otherwise the cycle search below would not terminate
    let mut seen = fb::FixedBitSet::with_capacity(n_rows);
    for source in perm.sources() {
        if source >= n_rows || seen.put(source) {
            return Err(SumFactError::InvalidDimension(format!(
                "bounds {bounds:?} with steps {steps:?} do not permute {n_rows} rows"
            )));
        }
    }

    // held[p] is the original index of the row currently stored at position p
    let mut held: Vec<usize> = (0..n_rows).collect();
    for (target, source) in perm.sources().enumerate() {
        // walk the cycle containing `source` back to the position holding it
        let mut pos = source;
        while held[pos] != source {
            pos = held[pos];
        }
        if pos != target {
            for col in 0..n_cols {
                data.swap(target + col * n_rows, pos + col * n_rows);
            }
            held.swap(target, pos);
        }
    }

    Ok(())
}
