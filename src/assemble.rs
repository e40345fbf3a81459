//! Explicit assembly of separable operators into dense matrices.
//!
//! Each axis operator `A_a` is expanded into the sparse matrix
//! `I_after ⊗ A_a ⊗ I_before` acting on the whole batch,
//! and the expansions are multiplied together in axis order.
//! This is far more expensive than applying the operator with sum factorization,
//! but the result can be reused for many applications
//! or fed into a global sparse system.

use nalgebra as na;
use nalgebra_sparse as nas;

use crate::{
    error::{Result, SumFactError},
    operator::{AxisAssignment, Operator, Operator1d},
};

/// Form the full `prod(n_out) x prod(n_in)` matrix of a separable operator.
///
/// Degenerate axes contribute nothing;
/// if every axis is degenerate, the result is the identity.
/// Diagonality flags are ignored since the stored matrices are used as they are.
///
/// Fails with [`PreconditionViolated`][SumFactError::PreconditionViolated]
/// for one-dimensional assignments, whose matrix is simply the axis 0 operator.
pub fn assemble_dense_operator(assignment: &AxisAssignment<'_>) -> Result<na::DMatrix<f64>> {
    let dim = assignment.dim();
    if dim < 2 {
        return Err(SumFactError::PreconditionViolated(format!(
            "assembling a {dim}-dimensional operator (use the axis 0 matrix directly)"
        )));
    }

    let n_in = assignment.n_in_per_axis();
    let n_out = assignment.n_out_per_axis();
    log::trace!("assembling {dim}D operator, nodes {n_in:?} -> {n_out:?}");

    let mut acc: Option<na::DMatrix<f64>> = None;
    for (axis, entry) in assignment.entries().iter().enumerate().take(dim) {
        let Some(op) = entry.operator else {
            continue;
        };
        let before: usize = n_out[..axis].iter().product();
        let after: usize = n_in[axis + 1..].iter().product();
        let expansion = expand_axis(op, before, after);
        acc = Some(match acc {
            None => na::DMatrix::from(&expansion),
            Some(acc) => &expansion * &acc,
        });
    }

    Ok(acc.unwrap_or_else(|| na::DMatrix::identity(assignment.n_in(), assignment.n_in())))
}

/// The matrix of `op` acting along one axis of a batch,
/// i.e. `I_after ⊗ op ⊗ I_before` in CSR form.
fn expand_axis(op: &Operator1d, before: usize, after: usize) -> nas::CsrMatrix<f64> {
    let mat = op.matrix();
    let (op_rows, op_cols) = mat.shape();
    let n_rows = before * op_rows * after;
    let n_cols = before * op_cols * after;

    let mut row_offsets = Vec::with_capacity(n_rows + 1);
    let mut col_indices = Vec::with_capacity(n_rows * op_cols);
    let mut values = Vec::with_capacity(n_rows * op_cols);
    // rows are generated in increasing order: i fastest, then r, then k
    for k in 0..after {
        for r in 0..op_rows {
            for i in 0..before {
                row_offsets.push(col_indices.len());
                for c in 0..op_cols {
                    col_indices.push(i + before * (c + op_cols * k));
                    values.push(mat[(r, c)]);
                }
            }
        }
    }
    row_offsets.push(col_indices.len());

    nas::CsrMatrix::try_from_csr_data(n_rows, n_cols, row_offsets, col_indices, values)
        .expect("expansion rows and columns are generated in sorted order")
}
