//! Sum-factorized operators on tensor-product reference elements.
//!
//! High-order discontinuous Galerkin methods constantly interpolate and differentiate
//! nodal values between the nodes of a reference element and those of its faces,
//! edges and refined children.
//! On tensor-product elements (and the tensor-product part of wedges)
//! these operators are Kronecker products of one-dimensional operators,
//! so instead of a dense `prod(n_out) x prod(n_in)` matrix
//! they can be applied one axis at a time.
//!
//! The typical workflow:
//! 1. [`select_axis_operators`] picks the 1D operator acting along each axis
//!    for an element class and refinement [`Configuration`],
//!    producing an [`AxisAssignment`].
//! 2. [`Operator::apply`] (or [`apply_separable_operator`] on raw slices)
//!    applies it to a batch of nodal values,
//!    or [`Operator::to_dense`] assembles the full matrix for reuse.
//!
//! ```
//! # use sumfact::{na, Configuration, ElementClass, Operator, Operator1d};
//! let coarse = Operator1d::from_row_slice(2, 2, &[1., 0., 0., 1.])?;
//! let halves = [
//!     coarse,
//!     Operator1d::from_row_slice(2, 2, &[1., 0., 0.5, 0.5])?,
//!     Operator1d::from_row_slice(2, 2, &[0.5, 0.5, 0., 1.])?,
//! ];
//! // the first of four children of an isotropically refined quad
//! let op = sumfact::select_axis_operators(
//!     &halves,
//!     &[],
//!     ElementClass::TensorProduct,
//!     2,
//!     Configuration::Volume { code: 1 },
//! )?;
//! let values = na::DMatrix::from_column_slice(4, 1, &[1., 2., 3., 4.]);
//! let child_values = op.apply(&values)?;
//! assert_eq!(child_values, op.to_dense()? * &values);
//! # Ok::<(), sumfact::SumFactError>(())
//! ```

#![warn(missing_docs)]

pub mod error;
#[doc(inline)]
pub use error::{ErrorKind, Result, SumFactError};

pub mod operator;
#[doc(inline)]
pub use operator::{AxisAssignment, AxisEntry, Diagonality, Operator, Operator1d};

pub mod selection;
#[doc(inline)]
pub use selection::{select_axis_operators, Configuration, ElementClass};

pub mod permutation;
#[doc(inline)]
pub use permutation::{permute_rows, AxisPermutation};

pub mod apply;
#[doc(inline)]
pub use apply::apply_separable_operator;

pub mod assemble;
#[doc(inline)]
pub use assemble::assemble_dense_operator;

// re-exports of the linear algebra crates used in the public API

pub use nalgebra as na;
pub use nalgebra_sparse as nas;
