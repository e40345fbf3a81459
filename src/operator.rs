//! One-dimensional reference operators
//! and their per-axis combination into separable tensor-product operators.

use nalgebra as na;
use nalgebra_sparse as nas;

use crate::error::{Result, SumFactError};

//
// traits
//

/// Trait implemented by everything that acts linearly on a batch of nodal values.
///
/// Batches are column-major [`DMatrix`][na::DMatrix]es
/// where each column is one independent set of nodal values
/// and the row index runs over the nodes with reference axis 0 varying fastest.
pub trait Operator {
    /// Number of input nodes, i.e. the number of rows an input batch must have.
    fn n_in(&self) -> usize;
    /// Number of output nodes, i.e. the number of rows in an output batch.
    fn n_out(&self) -> usize;
    /// Apply this operator to every column of a batch.
    fn apply(&self, input: &na::DMatrix<f64>) -> Result<na::DMatrix<f64>>;
    /// Get the explicit dense matrix of this operator.
    fn to_dense(&self) -> Result<na::DMatrix<f64>>;
    /// Get the explicit matrix of this operator in CSR format,
    /// dropping explicitly stored zeros.
    fn to_csr(&self) -> Result<nas::CsrMatrix<f64>> {
        Ok(nas::CsrMatrix::from(&self.to_dense()?))
    }
}

//
// one-dimensional operators
//

/// Structural information about the matrix of an [`Operator1d`].
///
/// Identity operators are applied as plain copies,
/// which avoids all floating-point operations on their axis.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Diagonality {
    /// A general dense matrix.
    #[default]
    None = 0,
    /// A diagonal matrix which is not the identity.
    ///
    /// There is no fast path for these yet,
    /// so applying one with sum factorization is an error.
    NonIdentity = 1,
    /// The identity matrix.
    Identity = 2,
}

impl TryFrom<u8> for Diagonality {
    type Error = SumFactError;

    fn try_from(flag: u8) -> Result<Self> {
        match flag {
            0 => Ok(Self::None),
            1 => Ok(Self::NonIdentity),
            2 => Ok(Self::Identity),
            _ => Err(SumFactError::Unsupported(format!(
                "diagonal flag {flag} (expected 0, 1 or 2)"
            ))),
        }
    }
}

/// A linear map acting in a single reference coordinate direction.
///
/// The matrix has shape `n_out x n_in`.
#[derive(Clone, Debug, PartialEq)]
pub struct Operator1d {
    matrix: na::DMatrix<f64>,
    diagonality: Diagonality,
}

impl Operator1d {
    /// Create a dense operator from its matrix.
    pub fn new(matrix: na::DMatrix<f64>) -> Self {
        Self {
            matrix,
            diagonality: Diagonality::None,
        }
    }

    /// Create a dense operator from a row-major slice of values,
    /// the layout in which reference operators are usually tabulated.
    pub fn from_row_slice(n_out: usize, n_in: usize, values: &[f64]) -> Result<Self> {
        if values.len() != n_out * n_in {
            return Err(SumFactError::InvalidDimension(format!(
                "{} values given for a {n_out}x{n_in} operator",
                values.len()
            )));
        }
        Ok(Self::new(na::DMatrix::from_row_slice(n_out, n_in, values)))
    }

    /// Create an identity operator on `n` nodes.
    pub fn identity(n: usize) -> Self {
        Self {
            matrix: na::DMatrix::identity(n, n),
            diagonality: Diagonality::Identity,
        }
    }

    /// Create an operator with an explicit diagonality flag.
    ///
    /// The flag is checked against the matrix,
    /// so a copy can never stand in for a matrix that isn't the identity.
    pub fn with_diagonality(matrix: na::DMatrix<f64>, diagonality: Diagonality) -> Result<Self> {
        let is_square = matrix.is_square();
        let off_diagonal_zero = || {
            matrix
                .column_iter()
                .enumerate()
                .all(|(col, vals)| vals.iter().enumerate().all(|(row, &v)| row == col || v == 0.))
        };
        let consistent = match diagonality {
            Diagonality::None => true,
            Diagonality::NonIdentity => is_square && off_diagonal_zero(),
            Diagonality::Identity => is_square && matrix.is_identity(0.),
        };
        if !consistent {
            return Err(SumFactError::PreconditionViolated(format!(
                "a {}x{} matrix is not {diagonality:?}",
                matrix.nrows(),
                matrix.ncols(),
            )));
        }
        Ok(Self {
            matrix,
            diagonality,
        })
    }

    /// The underlying `n_out x n_in` matrix.
    #[inline]
    pub fn matrix(&self) -> &na::DMatrix<f64> {
        &self.matrix
    }

    /// The diagonality flag of this operator.
    #[inline]
    pub fn diagonality(&self) -> Diagonality {
        self.diagonality
    }
}

impl Operator for Operator1d {
    #[inline]
    fn n_in(&self) -> usize {
        self.matrix.ncols()
    }

    #[inline]
    fn n_out(&self) -> usize {
        self.matrix.nrows()
    }

    fn apply(&self, input: &na::DMatrix<f64>) -> Result<na::DMatrix<f64>> {
        AxisAssignment::single(self).apply(input)
    }

    fn to_dense(&self) -> Result<na::DMatrix<f64>> {
        Ok(self.matrix.clone())
    }
}

impl From<na::DMatrix<f64>> for Operator1d {
    fn from(matrix: na::DMatrix<f64>) -> Self {
        Self::new(matrix)
    }
}

//
// per-axis assignments
//

/// The operator acting along one reference axis of a separable operator.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AxisEntry<'a> {
    /// The operator, or `None` if the axis is degenerate
    /// (it doesn't exist in the tensor-product part of the element,
    /// or it lies beyond the dimension of the element).
    pub operator: Option<&'a Operator1d>,
    /// Number of input nodes along this axis.
    pub n_in: usize,
    /// Number of output nodes along this axis.
    pub n_out: usize,
}

impl<'a> AxisEntry<'a> {
    /// An axis acted on by the given operator.
    pub fn new(operator: &'a Operator1d) -> Self {
        Self {
            operator: Some(operator),
            n_in: operator.n_in(),
            n_out: operator.n_out(),
        }
    }

    /// A degenerate axis with a single node and no operator.
    pub fn degenerate() -> Self {
        Self {
            operator: None,
            n_in: 1,
            n_out: 1,
        }
    }

    /// Whether this is a degenerate axis without an operator.
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.operator.is_none()
    }
}

/// A separable operator given as one 1D operator per reference axis.
///
/// The full operator is the Kronecker product
/// `A_2 ⊗ A_1 ⊗ A_0` of the axis operators,
/// but it is never formed unless explicitly requested with
/// [`assemble_dense_operator`][crate::assemble::assemble_dense_operator].
///
/// Usually obtained from
/// [`select_axis_operators`][crate::selection::select_axis_operators].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AxisAssignment<'a> {
    dim: usize,
    entries: [AxisEntry<'a>; 3],
}

impl<'a> AxisAssignment<'a> {
    /// Create an assignment of `dim` active axes.
    ///
    /// Axes at index `dim` and beyond must be degenerate,
    /// and the node counts of every entry must match its operator.
    pub fn new(dim: usize, entries: [AxisEntry<'a>; 3]) -> Result<Self> {
        if !(1..=3).contains(&dim) {
            return Err(SumFactError::Unsupported(format!(
                "{dim}-dimensional tensor-product operators"
            )));
        }
        for (axis, entry) in entries.iter().enumerate() {
            match entry.operator {
                Some(op) if op.n_in() != entry.n_in || op.n_out() != entry.n_out => {
                    return Err(SumFactError::InvalidDimension(format!(
                        "axis {axis} declares {}x{} nodes but its operator is {}x{}",
                        entry.n_out,
                        entry.n_in,
                        op.n_out(),
                        op.n_in(),
                    )));
                }
                Some(_) if axis >= dim => {
                    return Err(SumFactError::PreconditionViolated(format!(
                        "axis {axis} has an operator but only {dim} axes are active"
                    )));
                }
                None if entry.n_in != 1 || entry.n_out != 1 => {
                    return Err(SumFactError::PreconditionViolated(format!(
                        "degenerate axis {axis} must have a single node, got {}x{}",
                        entry.n_out, entry.n_in,
                    )));
                }
                _ => {}
            }
        }
        Ok(Self { dim, entries })
    }

    /// A one-dimensional assignment acting with `operator` along axis 0.
    pub fn single(operator: &'a Operator1d) -> Self {
        Self {
            dim: 1,
            entries: [
                AxisEntry::new(operator),
                AxisEntry::degenerate(),
                AxisEntry::degenerate(),
            ],
        }
    }

    /// Number of active axes.
    #[inline]
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// The entries for all three reference axes.
    #[inline]
    pub fn entries(&self) -> &[AxisEntry<'a>; 3] {
        &self.entries
    }

    /// The entry for a single axis.
    #[inline]
    pub fn entry(&self, axis: usize) -> &AxisEntry<'a> {
        &self.entries[axis]
    }

    /// Number of input nodes along each axis.
    pub fn n_in_per_axis(&self) -> [usize; 3] {
        self.entries.map(|e| e.n_in)
    }

    /// Number of output nodes along each axis.
    pub fn n_out_per_axis(&self) -> [usize; 3] {
        self.entries.map(|e| e.n_out)
    }
}

impl Operator for AxisAssignment<'_> {
    fn n_in(&self) -> usize {
        self.n_in_per_axis().iter().product()
    }

    fn n_out(&self) -> usize {
        self.n_out_per_axis().iter().product()
    }

    fn apply(&self, input: &na::DMatrix<f64>) -> Result<na::DMatrix<f64>> {
        crate::apply::apply_to_batch(self, input)
    }

    /// For one-dimensional assignments this is the axis 0 matrix itself,
    /// otherwise the result of
    /// [`assemble_dense_operator`][crate::assemble::assemble_dense_operator].
    fn to_dense(&self) -> Result<na::DMatrix<f64>> {
        if self.dim == 1 {
            return Ok(match self.entries[0].operator {
                Some(op) => op.matrix().clone(),
                None => na::DMatrix::identity(1, 1),
            });
        }
        crate::assemble::assemble_dense_operator(self)
    }
}

//
// tests
//
