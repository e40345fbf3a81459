//! Applying separable operators with sum factorization.
//!
//! The full operator of a `d`-dimensional tensor-product element
//! is the Kronecker product `A_2 ⊗ A_1 ⊗ A_0` of its axis operators.
//! Instead of forming it, we apply one axis at a time:
//! `A_0` acts directly on the batch viewed as an `n_in[0] x (rest)` matrix,
//! and for axes 1 and 2 the rows of the intermediate result are first permuted
//! so that the axis being operated on varies fastest,
//! then permuted back after the multiplication.
//! Axes are always processed in the order 0, 1, 2,
//! which needs at most two pairs of permutations per application.

use nalgebra as na;

use crate::{
    error::{Result, SumFactError},
    operator::{AxisAssignment, AxisEntry, Diagonality, Operator},
    permutation::AxisPermutation,
};

/// What happens along one axis.
#[derive(Clone, Copy)]
enum AxisAction<'a> {
    /// Multiply by a dense `n_out x n_in` matrix.
    Multiply(&'a na::DMatrix<f64>),
    /// Identity or degenerate axis: copy the values unchanged.
    Copy,
}

impl<'a> AxisAction<'a> {
    fn for_entry(axis: usize, entry: &AxisEntry<'a>) -> Result<Self> {
        let Some(op) = entry.operator else {
            return Ok(Self::Copy);
        };
        match op.diagonality() {
            Diagonality::None => Ok(Self::Multiply(op.matrix())),
            Diagonality::Identity if entry.n_in == entry.n_out => Ok(Self::Copy),
            Diagonality::Identity => Err(SumFactError::InvalidDimension(format!(
                "identity operator on axis {axis} maps {} nodes to {}",
                entry.n_in, entry.n_out
            ))),
            // TODO: scale rows by the diagonal once there are reference results to compare to
            Diagonality::NonIdentity => Err(SumFactError::Unsupported(format!(
                "sum factorization with a non-identity diagonal operator on axis {axis}"
            ))),
        }
    }
}

/// Apply a separable operator to `n_cols` columns of nodal values.
///
/// `input` holds `prod(n_in) x n_cols` values and `output` `prod(n_out) x n_cols` values,
/// both column-major with reference axis 0 varying fastest within a column.
/// `input` is only read and `output` is completely overwritten.
/// On error, `output` is left untouched.
pub fn apply_separable_operator(
    assignment: &AxisAssignment<'_>,
    n_cols: usize,
    input: &[f64],
    output: &mut [f64],
) -> Result<()> {
    let dim = assignment.dim();
    let n_in = assignment.n_in_per_axis();
    let n_out = assignment.n_out_per_axis();

    if n_cols == 0 {
        return Err(SumFactError::InvalidDimension(
            "batch with no columns".into(),
        ));
    }
    if input.len() != assignment.n_in() * n_cols {
        return Err(SumFactError::InvalidDimension(format!(
            "input has {} values, expected {} nodes x {n_cols} columns",
            input.len(),
            assignment.n_in(),
        )));
    }
    if output.len() != assignment.n_out() * n_cols {
        return Err(SumFactError::InvalidDimension(format!(
            "output has {} values, expected {} nodes x {n_cols} columns",
            output.len(),
            assignment.n_out(),
        )));
    }

    // resolve every axis before doing any work so that failures leave no partial results
    let mut actions = [AxisAction::Copy; 3];
    for (axis, (action, entry)) in actions
        .iter_mut()
        .zip(assignment.entries())
        .enumerate()
        .take(dim)
    {
        *action = AxisAction::for_entry(axis, entry)?;
    }

    log::trace!("sum factorization: {dim}D, nodes {n_in:?} -> {n_out:?}, {n_cols} columns");

    // axis 0
    let block_cols0 = n_cols * n_in[1] * n_in[2];
    if dim == 1 {
        return apply_leading_axis(actions[0], n_in[0], n_out[0], block_cols0, input, output);
    }
    let mut stage0 = vec![0.; n_out[0] * n_in[1] * n_in[2] * n_cols];
    apply_leading_axis(actions[0], n_in[0], n_out[0], block_cols0, input, &mut stage0)?;

    // axis 1
    let sizes1 = [n_out[0], n_in[1], n_in[2]];
    if dim == 2 {
        return apply_trailing_axis(1, actions[1], sizes1, n_out[1], n_cols, &mut stage0, output);
    }
    let mut stage1 = vec![0.; n_out[0] * n_out[1] * n_in[2] * n_cols];
    apply_trailing_axis(1, actions[1], sizes1, n_out[1], n_cols, &mut stage0, &mut stage1)?;
    drop(stage0);

    // axis 2
    let sizes2 = [n_out[0], n_out[1], n_in[2]];
    apply_trailing_axis(2, actions[2], sizes2, n_out[2], n_cols, &mut stage1, output)
}

/// Apply a separable operator to a batch stored as a column-major matrix,
/// returning the resulting batch.
pub fn apply_to_batch(
    assignment: &AxisAssignment<'_>,
    input: &na::DMatrix<f64>,
) -> Result<na::DMatrix<f64>> {
    if input.nrows() != assignment.n_in() {
        return Err(SumFactError::InvalidDimension(format!(
            "batch has {} rows, operator expects {}",
            input.nrows(),
            assignment.n_in(),
        )));
    }
    let mut output = na::DMatrix::zeros(assignment.n_out(), input.ncols());
    apply_separable_operator(
        assignment,
        input.ncols(),
        input.as_slice(),
        output.as_mut_slice(),
    )?;
    Ok(output)
}

/// Apply along the axis that currently varies fastest,
/// treating the data as an `n_in x block_cols` column-major matrix.
fn apply_leading_axis(
    action: AxisAction<'_>,
    n_in: usize,
    n_out: usize,
    block_cols: usize,
    src: &[f64],
    dst: &mut [f64],
) -> Result<()> {
    match action {
        AxisAction::Copy => dst.copy_from_slice(src),
        AxisAction::Multiply(op) => {
            debug_assert_eq!((op.nrows(), op.ncols()), (n_out, n_in));
            let src = na::DMatrixView::from_slice(src, n_in, block_cols);
            let mut dst = na::DMatrixViewMut::from_slice(dst, n_out, block_cols);
            dst.gemm(1., op, &src, 0.);
        }
    }
    Ok(())
}

/// Apply along axis 1 or 2 of a batch currently ordered with axis 0 fastest.
///
/// `sizes` are the current node counts along each axis.
/// `src` is reordered in place and should be considered garbage afterwards;
/// `dst` ends up ordered with axis 0 fastest again.
fn apply_trailing_axis(
    axis: usize,
    action: AxisAction<'_>,
    sizes: [usize; 3],
    n_out: usize,
    n_cols: usize,
    src: &mut [f64],
    dst: &mut [f64],
) -> Result<()> {
    let AxisAction::Multiply(_) = action else {
        // identity axes don't need reordering at all
        dst.copy_from_slice(src);
        return Ok(());
    };

    let n_in = sizes[axis];
    // the other two axes, which stay the same through the multiplication
    let block_cols = n_cols
        * sizes
            .iter()
            .enumerate()
            .filter(|&(a, _)| a != axis)
            .map(|(_, &n)| n)
            .product::<usize>();
    AxisPermutation::to_front(axis, sizes)?.apply(src, n_cols)?;
    apply_leading_axis(action, n_in, n_out, block_cols, src, dst)?;

    let mut out_sizes = sizes;
    out_sizes[axis] = n_out;
    AxisPermutation::to_back(axis, out_sizes)?.apply(dst, n_cols)
}
