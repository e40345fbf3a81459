//! Case tables for the h-refinement configurations of tensor-product and wedge elements.
//!
//! Each table is indexed by configuration code.
//! Operator families are ordered so that index 0 is the conforming operator
//! and indices 1 and 2 are the operators onto the two halves
//! of a refined line segment
//! (for triangle families on wedges, indices 1 to 4 are the four children).

/// Family indices chosen for one configuration code.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RefinementCase<const N: usize> {
    /// Number of children the cell is split into (1 for the conforming case).
    pub children: usize,
    /// Index into the operator family for each axis the table covers.
    pub family_indices: [usize; N],
}

const fn case<const N: usize>(children: usize, family_indices: [usize; N]) -> RefinementCase<N> {
    RefinementCase {
        children,
        family_indices,
    }
}

/// Line segments: conforming and the two halves.
pub const LINE_CASES: [RefinementCase<1>; 3] = [case(1, [0]), case(2, [1]), case(2, [2])];

/// Quadrilaterals, indexed over the two axes of the quad.
///
/// Also used for the sub-faces of hexahedra and of the quad faces of wedges.
#[rustfmt::skip]
pub const QUAD_CASES: [RefinementCase<2>; 9] = [
    // conforming
    case(1, [0, 0]),
    // isotropic (1 -> 4)
    case(4, [1, 1]), case(4, [2, 1]), case(4, [1, 2]), case(4, [2, 2]),
    // anisotropic (1 -> 2)
    case(2, [1, 0]), case(2, [2, 0]), case(2, [0, 1]), case(2, [0, 2]),
];

/// Hexahedra, indexed over all three axes.
#[rustfmt::skip]
pub const HEX_CASES: [RefinementCase<3>; 27] = [
    // conforming
    case(1, [0, 0, 0]),
    // isotropic (1 -> 8)
    case(8, [1, 1, 1]), case(8, [2, 1, 1]), case(8, [1, 2, 1]), case(8, [2, 2, 1]),
    case(8, [1, 1, 2]), case(8, [2, 1, 2]), case(8, [1, 2, 2]), case(8, [2, 2, 2]),
    // anisotropic (1 -> 4)
    case(4, [1, 1, 0]), case(4, [2, 1, 0]), case(4, [1, 2, 0]), case(4, [2, 2, 0]),
    case(4, [1, 0, 1]), case(4, [2, 0, 1]), case(4, [1, 0, 2]), case(4, [2, 0, 2]),
    case(4, [0, 1, 1]), case(4, [0, 2, 1]), case(4, [0, 1, 2]), case(4, [0, 2, 2]),
    // anisotropic (1 -> 2)
    case(2, [1, 0, 0]), case(2, [2, 0, 0]),
    case(2, [0, 1, 0]), case(2, [0, 2, 0]),
    case(2, [0, 0, 1]), case(2, [0, 0, 2]),
];

/// Wedges, indexed as `[triangle family index, line family index]`.
#[rustfmt::skip]
pub const WEDGE_CASES: [RefinementCase<2>; 15] = [
    // conforming
    case(1, [0, 0]),
    // isotropic (1 -> 8)
    case(8, [1, 1]), case(8, [2, 1]), case(8, [3, 1]), case(8, [4, 1]),
    case(8, [1, 2]), case(8, [2, 2]), case(8, [3, 2]), case(8, [4, 2]),
    // anisotropic (1 -> 4), triangle refined only
    case(4, [1, 0]), case(4, [2, 0]), case(4, [3, 0]), case(4, [4, 0]),
    // anisotropic (1 -> 2), line refined only
    case(2, [0, 1]), case(2, [0, 2]),
];

/// Number of sub-faces accepted on the triangular faces of a wedge
/// (conforming plus the four children of a refined triangle).
pub const TRI_FACE_CASES: usize = 5;
