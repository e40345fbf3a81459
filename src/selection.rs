//! Choosing which 1D operator acts along each reference axis.
//!
//! Operators for tensor-product and wedge elements are separable,
//! but which 1D operator acts along which axis
//! depends on the h-refinement configuration being evaluated
//! (e.g. interpolating onto one of the children of a refined hexahedron,
//! or onto one sub-face of a refined face).
//! [`select_axis_operators`] maps an element class and a [`Configuration`]
//! to an [`AxisAssignment`] using the case tables in [`tables`].
//!
//! # Operator families
//!
//! Operators are given as two families (slices of [`Operator1d`]),
//! `primary` and `secondary`, indexed by refinement variant.
//! What each family contains depends on the configuration:
//!
//! | configuration | primary | secondary |
//! |---|---|---|
//! | `Axis` | coarse operator at index 0 | fine operator at index 0 |
//! | `Volume`, tensor product | line operators (conforming, two halves) | unused |
//! | `Volume`, wedge | triangle operators (conforming, four children) | line operators |
//! | `Face`, tensor product | line operators along the face | face operators, [`FACE_REFINEMENTS_MAX`] per face side |
//! | `Face`, wedge | face-strided triangle/line operators | line operators |
//! | `Edge` | line operators along the edge | face operators, [`FACE_REFINEMENTS_MAX`] per face side |
//!
//! A family that is too short for the requested configuration
//! is reported as [`PreconditionViolated`][SumFactError::PreconditionViolated].

pub mod tables;

use crate::{
    error::{Result, SumFactError},
    operator::{AxisAssignment, AxisEntry, Operator1d},
};
use tables::{RefinementCase, HEX_CASES, LINE_CASES, QUAD_CASES, TRI_FACE_CASES, WEDGE_CASES};

/// Stride between the operators of consecutive faces in a face operator family.
pub const FACE_REFINEMENTS_MAX: usize = 9;
/// Stride between the operators of consecutive edges in an edge operator family.
pub const EDGE_REFINEMENTS_MAX: usize = 3;
/// Number of volume configuration codes of a hexahedron.
pub const VOLUME_CODES_3D: usize = HEX_CASES.len();
/// Number of volume configuration codes of a quadrilateral.
pub const VOLUME_CODES_2D: usize = QUAD_CASES.len();
/// Number of volume configuration codes of a wedge.
pub const VOLUME_CODES_WEDGE: usize = WEDGE_CASES.len();

/// Classes of reference element.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ElementClass {
    /// Line segments, quadrilaterals and hexahedra.
    TensorProduct,
    /// Triangles and tetrahedra. Not separable.
    Simplex,
    /// Pyramids. Not separable.
    Pyramid,
    /// Wedges: a triangle extruded along a line,
    /// separable into the triangle (axis 0) and the line (axis 2).
    /// Axis 1 is degenerate.
    Wedge,
}

/// The refinement configuration to select operators for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Configuration {
    /// The fine operator along `axis` and the coarse operator along all other axes.
    Axis {
        /// The axis receiving the fine operator.
        axis: usize,
    },
    /// A child of a (possibly) h-refined volume; code 0 is conforming.
    Volume {
        /// Index into the volume case table of the element class.
        code: usize,
    },
    /// A sub-face of a face of the element; `sub_face` 0 is conforming.
    Face {
        /// Local face index; the face is normal to axis `face / 2`.
        face: usize,
        /// Index into the face case table.
        sub_face: usize,
    },
    /// Like [`Face`][Self::Face] but with an explicit face-normal axis,
    /// used with derivative operators where the secondary family
    /// has already been restricted to one derivative direction.
    FaceDerivative {
        /// Local face index.
        face: usize,
        /// Index into the face case table.
        sub_face: usize,
        /// The axis receiving the face operator.
        face_axis: usize,
    },
    /// A sub-edge of an edge of a hexahedron.
    Edge {
        /// Local edge index; the edge is parallel to axis `edge / 4`.
        edge: usize,
        /// Sub-edge index. Only the conforming sub-edge 0 is supported.
        sub_edge: usize,
    },
}

impl Configuration {
    /// Decode a combined face code `face * FACE_REFINEMENTS_MAX + sub_face`.
    pub fn from_face_code(code: usize) -> Self {
        Self::Face {
            face: code / FACE_REFINEMENTS_MAX,
            sub_face: code % FACE_REFINEMENTS_MAX,
        }
    }

    /// Decode a combined edge code `edge * EDGE_REFINEMENTS_MAX + sub_edge`.
    pub fn from_edge_code(code: usize) -> Self {
        Self::Edge {
            edge: code / EDGE_REFINEMENTS_MAX,
            sub_edge: code % EDGE_REFINEMENTS_MAX,
        }
    }
}

/// Select the operator acting along each axis for a configuration.
///
/// `dim` is the dimension of the element (1 to 3).
/// See the [module-level docs][self] for the contents of the families.
///
/// ```
/// # use sumfact::{na, Operator1d, selection::*};
/// let coarse = Operator1d::new(na::DMatrix::identity(3, 3));
/// let halves = [
///     coarse.clone(),
///     Operator1d::new(na::DMatrix::from_element(2, 3, 0.5)),
///     Operator1d::new(na::DMatrix::from_element(2, 3, 0.25)),
/// ];
/// // axis 0 refined onto its first half, axis 1 conforming
/// let assignment = select_axis_operators(
///     &halves,
///     &[],
///     ElementClass::TensorProduct,
///     2,
///     Configuration::Volume { code: 5 },
/// )?;
/// assert_eq!(assignment.n_out_per_axis(), [2, 3, 1]);
/// # Ok::<(), sumfact::SumFactError>(())
/// ```
pub fn select_axis_operators<'a>(
    primary: &'a [Operator1d],
    secondary: &'a [Operator1d],
    class: ElementClass,
    dim: usize,
    configuration: Configuration,
) -> Result<AxisAssignment<'a>> {
    if !(1..=3).contains(&dim) {
        return Err(SumFactError::Unsupported(format!(
            "{dim}-dimensional {class:?} elements"
        )));
    }

    let assignment = match configuration {
        Configuration::Axis { axis } => select_single_axis(
            family_entry(primary, 0, "primary")?,
            family_entry(secondary, 0, "secondary")?,
            class,
            dim,
            axis,
        ),
        Configuration::Volume { code } => select_volume(primary, secondary, class, dim, code),
        Configuration::Face { face, sub_face } => {
            select_face(primary, secondary, class, dim, face, sub_face, face / 2)
        }
        Configuration::FaceDerivative {
            face,
            sub_face,
            face_axis,
        } => select_face(primary, secondary, class, dim, face, sub_face, face_axis),
        Configuration::Edge { edge, sub_edge } => {
            select_edge(primary, secondary, class, dim, edge, sub_edge)
        }
    }?;

    log::debug!(
        "{class:?} {dim}D {configuration:?}: axis nodes in {:?}, out {:?}",
        assignment.n_in_per_axis(),
        assignment.n_out_per_axis(),
    );
    Ok(assignment)
}

/// Look up an operator in a family,
/// failing if the family doesn't contain enough operators.
fn family_entry<'a>(family: &'a [Operator1d], index: usize, name: &str) -> Result<AxisEntry<'a>> {
    family.get(index).map(AxisEntry::new).ok_or_else(|| {
        SumFactError::PreconditionViolated(format!(
            "{name} operator family has {} operators, index {index} requested",
            family.len()
        ))
    })
}

/// Look up a case in a table, failing loudly for codes outside it.
fn table_case<const N: usize>(
    table: &[RefinementCase<N>],
    code: usize,
    what: &str,
) -> Result<RefinementCase<N>> {
    table.get(code).copied().ok_or_else(|| {
        SumFactError::Unsupported(format!(
            "{what} configuration code {code} (valid codes are 0..{})",
            table.len()
        ))
    })
}

/// The two axes other than `axis` in a 3D element, in ascending order.
fn other_axes(axis: usize) -> [usize; 2] {
    match axis {
        0 => [1, 2],
        1 => [0, 2],
        _ => [0, 1],
    }
}

fn select_single_axis<'a>(
    coarse: AxisEntry<'a>,
    fine: AxisEntry<'a>,
    class: ElementClass,
    dim: usize,
    axis: usize,
) -> Result<AxisAssignment<'a>> {
    match class {
        ElementClass::TensorProduct => {
            if axis >= dim {
                return Err(SumFactError::Unsupported(format!(
                    "refined axis {axis} in a {dim}D tensor-product element"
                )));
            }
            let entries = std::array::from_fn(|a| {
                if a == axis {
                    fine
                } else if a < dim {
                    coarse
                } else {
                    AxisEntry::degenerate()
                }
            });
            AxisAssignment::new(dim, entries)
        }
        ElementClass::Wedge => {
            require_3d_wedge(dim)?;
            AxisAssignment::new(3, [coarse, AxisEntry::degenerate(), fine])
        }
        ElementClass::Simplex | ElementClass::Pyramid => Err(not_separable(class)),
    }
}

fn select_volume<'a>(
    primary: &'a [Operator1d],
    secondary: &'a [Operator1d],
    class: ElementClass,
    dim: usize,
    code: usize,
) -> Result<AxisAssignment<'a>> {
    match class {
        ElementClass::TensorProduct => {
            let indices: [Option<usize>; 3] = match dim {
                1 => {
                    let [r] = table_case(&LINE_CASES, code, "1D tensor-product volume")?
                        .family_indices;
                    [Some(r), None, None]
                }
                2 => {
                    let [r, s] = table_case(&QUAD_CASES, code, "2D tensor-product volume")?
                        .family_indices;
                    [Some(r), Some(s), None]
                }
                _ => table_case(&HEX_CASES, code, "3D tensor-product volume")?
                    .family_indices
                    .map(Some),
            };
            let mut entries = [AxisEntry::degenerate(); 3];
            for (entry, index) in entries.iter_mut().zip(indices) {
                if let Some(index) = index {
                    *entry = family_entry(primary, index, "primary")?;
                }
            }
            AxisAssignment::new(dim, entries)
        }
        ElementClass::Wedge => {
            require_3d_wedge(dim)?;
            let [tri, line] = table_case(&WEDGE_CASES, code, "wedge volume")?.family_indices;
            AxisAssignment::new(
                3,
                [
                    family_entry(primary, tri, "primary")?,
                    AxisEntry::degenerate(),
                    family_entry(secondary, line, "secondary")?,
                ],
            )
        }
        ElementClass::Simplex | ElementClass::Pyramid => Err(not_separable(class)),
    }
}

fn select_face<'a>(
    primary: &'a [Operator1d],
    secondary: &'a [Operator1d],
    class: ElementClass,
    dim: usize,
    face: usize,
    sub_face: usize,
    face_axis: usize,
) -> Result<AxisAssignment<'a>> {
    let face_count = 2 * dim;
    match class {
        ElementClass::TensorProduct => {
            if dim == 1 {
                return Err(SumFactError::Unsupported(
                    "face operators of 1D tensor-product elements".into(),
                ));
            }
            if face >= face_count || face_axis >= dim {
                return Err(SumFactError::Unsupported(format!(
                    "face {face} normal to axis {face_axis} of a {dim}D tensor-product element"
                )));
            }
            let face_op = family_entry(
                secondary,
                (face % 2) * FACE_REFINEMENTS_MAX,
                "secondary",
            )?;
            match dim {
                2 => {
                    let [index] = table_case(&LINE_CASES, sub_face, "2D face")?.family_indices;
                    let coarse = family_entry(primary, index, "primary")?;
                    select_single_axis(coarse, face_op, class, dim, face_axis)
                }
                _ => {
                    let [i, j] = table_case(&QUAD_CASES, sub_face, "3D face")?.family_indices;
                    let [v1, v2] = other_axes(face_axis);
                    let mut entries = [AxisEntry::degenerate(); 3];
                    entries[face_axis] = face_op;
                    entries[v1] = family_entry(primary, i, "primary")?;
                    entries[v2] = family_entry(primary, j, "primary")?;
                    AxisAssignment::new(3, entries)
                }
            }
        }
        ElementClass::Wedge => {
            require_3d_wedge(dim)?;
            let (tri, line) = match face {
                // quad faces
                0..=2 => {
                    let [i, j] = table_case(&QUAD_CASES, sub_face, "wedge quad face")?
                        .family_indices;
                    (
                        family_entry(primary, face * FACE_REFINEMENTS_MAX + i, "primary")?,
                        family_entry(secondary, j, "secondary")?,
                    )
                }
                // triangle faces
                3 | 4 => {
                    if sub_face >= TRI_FACE_CASES {
                        return Err(SumFactError::Unsupported(format!(
                            "wedge triangle face configuration code {sub_face} \
                            (valid codes are 0..{TRI_FACE_CASES})"
                        )));
                    }
                    (
                        family_entry(primary, sub_face, "primary")?,
                        family_entry(
                            secondary,
                            ((face + 1) % 2) * FACE_REFINEMENTS_MAX,
                            "secondary",
                        )?,
                    )
                }
                _ => {
                    return Err(SumFactError::Unsupported(format!("wedge face {face}")));
                }
            };
            AxisAssignment::new(3, [tri, AxisEntry::degenerate(), line])
        }
        ElementClass::Simplex | ElementClass::Pyramid => Err(not_separable(class)),
    }
}

fn select_edge<'a>(
    primary: &'a [Operator1d],
    secondary: &'a [Operator1d],
    class: ElementClass,
    dim: usize,
    edge: usize,
    sub_edge: usize,
) -> Result<AxisAssignment<'a>> {
    match class {
        ElementClass::TensorProduct => {}
        ElementClass::Wedge => {
            return Err(SumFactError::Unsupported("edge operators of wedges".into()));
        }
        ElementClass::Simplex | ElementClass::Pyramid => return Err(not_separable(class)),
    }
    if dim != 3 {
        return Err(SumFactError::Unsupported(format!(
            "edge operators of {dim}D tensor-product elements"
        )));
    }
    if edge >= 12 {
        return Err(SumFactError::Unsupported(format!("hexahedron edge {edge}")));
    }
    if sub_edge != 0 {
        return Err(SumFactError::Unsupported(format!(
            "non-conforming sub-edge {sub_edge}"
        )));
    }

    let edge_axis = edge / 4;
    let [f1, f2] = other_axes(edge_axis);
    let mut entries = [AxisEntry::degenerate(); 3];
    entries[edge_axis] = family_entry(primary, 0, "primary")?;
    entries[f1] = family_entry(secondary, (edge % 2) * FACE_REFINEMENTS_MAX, "secondary")?;
    entries[f2] = family_entry(
        secondary,
        ((edge / 2) % 2) * FACE_REFINEMENTS_MAX,
        "secondary",
    )?;
    AxisAssignment::new(3, entries)
}

fn require_3d_wedge(dim: usize) -> Result<()> {
    if dim == 3 {
        Ok(())
    } else {
        Err(SumFactError::Unsupported(format!("{dim}D wedge elements")))
    }
}

fn not_separable(class: ElementClass) -> SumFactError {
    SumFactError::Unsupported(format!(
        "{class:?} elements have no sum-factorized operators"
    ))
}

//
// tests
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use nalgebra as na;

    /// A family of `len` operators, each filled with a distinct value
    /// so that we can tell them apart after selection.
    fn family(len: usize, n_out: usize, n_in: usize, offset: f64) -> Vec<Operator1d> {
        (0..len)
            .map(|i| Operator1d::new(na::DMatrix::from_element(n_out, n_in, offset + i as f64)))
            .collect()
    }

    /// Find the family index of the operator selected for an axis.
    fn chosen(family: &[Operator1d], entry: &AxisEntry) -> Option<usize> {
        let op = entry.operator?;
        family.iter().position(|f| std::ptr::eq(f, op))
    }

    fn kind<T>(r: Result<T>) -> Option<ErrorKind> {
        r.err().map(|e| e.kind())
    }

    #[test]
    fn single_axis_tensor_product() {
        let coarse = family(1, 3, 3, 0.);
        let fine = family(1, 2, 3, 10.);
        for dim in 1..=3 {
            for axis in 0..dim {
                let a = select_axis_operators(
                    &coarse,
                    &fine,
                    ElementClass::TensorProduct,
                    dim,
                    Configuration::Axis { axis },
                )
                .unwrap();
                for (a_idx, entry) in a.entries().iter().enumerate() {
                    if a_idx == axis {
                        assert_eq!(chosen(&fine, entry), Some(0));
                        assert_eq!((entry.n_in, entry.n_out), (3, 2));
                    } else if a_idx < dim {
                        assert_eq!(chosen(&coarse, entry), Some(0));
                    } else {
                        assert!(entry.is_degenerate());
                    }
                }
            }
            assert_eq!(
                kind(select_axis_operators(
                    &coarse,
                    &fine,
                    ElementClass::TensorProduct,
                    dim,
                    Configuration::Axis { axis: dim },
                )),
                Some(ErrorKind::Unsupported),
            );
        }
    }

    #[test]
    fn single_axis_wedge() {
        let tri = family(1, 6, 6, 0.);
        let line = family(1, 3, 2, 10.);
        let a = select_axis_operators(
            &tri,
            &line,
            ElementClass::Wedge,
            3,
            Configuration::Axis { axis: 2 },
        )
        .unwrap();
        assert_eq!(chosen(&tri, a.entry(0)), Some(0));
        assert!(a.entry(1).is_degenerate());
        assert_eq!((a.entry(1).n_in, a.entry(1).n_out), (1, 1));
        assert_eq!(chosen(&line, a.entry(2)), Some(0));
    }

    /// Check the hexahedron table against the rule it was generated by:
    /// isotropic codes enumerate the halves of all axes in binary,
    /// anisotropic codes the halves of the refined axes in the same way.
    #[test]
    fn hex_volume_cases() {
        let ops = family(3, 2, 2, 0.);
        let expected = |code: usize| -> [usize; 3] {
            match code {
                0 => [0, 0, 0],
                1..=8 => {
                    let b = code - 1;
                    [1 + (b & 1), 1 + ((b >> 1) & 1), 1 + ((b >> 2) & 1)]
                }
                9..=20 => {
                    let group = (code - 9) / 4;
                    let b = (code - 9) % 4;
                    let unrefined = 2 - group;
                    let [a1, a2] = other_axes(unrefined);
                    let mut idx = [0; 3];
                    idx[a1] = 1 + (b & 1);
                    idx[a2] = 1 + ((b >> 1) & 1);
                    idx
                }
                _ => {
                    let mut idx = [0; 3];
                    idx[(code - 21) / 2] = 1 + (code - 21) % 2;
                    idx
                }
            }
        };

        for code in 0..VOLUME_CODES_3D {
            let a = select_axis_operators(
                &ops,
                &[],
                ElementClass::TensorProduct,
                3,
                Configuration::Volume { code },
            )
            .unwrap();
            let got: Vec<_> = a.entries().iter().map(|e| chosen(&ops, e).unwrap()).collect();
            assert_eq!(got, expected(code), "wrong operators for code {code}");
        }
    }

    #[test]
    fn quad_volume_cases() {
        let ops = family(3, 2, 2, 0.);
        let expected = |code: usize| -> [usize; 2] {
            match code {
                0 => [0, 0],
                1..=4 => [1 + ((code - 1) & 1), 1 + (((code - 1) >> 1) & 1)],
                _ => {
                    let mut idx = [0; 2];
                    idx[(code - 5) / 2] = 1 + (code - 5) % 2;
                    idx
                }
            }
        };
        for code in 0..VOLUME_CODES_2D {
            let a = select_axis_operators(
                &ops,
                &[],
                ElementClass::TensorProduct,
                2,
                Configuration::Volume { code },
            )
            .unwrap();
            assert_eq!(chosen(&ops, a.entry(0)), Some(expected(code)[0]), "code {code}");
            assert_eq!(chosen(&ops, a.entry(1)), Some(expected(code)[1]), "code {code}");
            assert!(a.entry(2).is_degenerate());
        }
    }

    #[test]
    fn wedge_volume_cases() {
        let tri = family(5, 3, 3, 0.);
        let line = family(3, 2, 2, 10.);
        let expected = |code: usize| -> (usize, usize) {
            match code {
                0 => (0, 0),
                1..=8 => (1 + (code - 1) % 4, 1 + (code - 1) / 4),
                9..=12 => (code - 8, 0),
                _ => (0, code - 12),
            }
        };
        for code in 0..VOLUME_CODES_WEDGE {
            let a = select_axis_operators(
                &tri,
                &line,
                ElementClass::Wedge,
                3,
                Configuration::Volume { code },
            )
            .unwrap();
            let (t, l) = expected(code);
            assert_eq!(chosen(&tri, a.entry(0)), Some(t), "code {code}");
            assert!(a.entry(1).is_degenerate(), "code {code}");
            assert_eq!(chosen(&line, a.entry(2)), Some(l), "code {code}");
        }
    }

    #[test]
    fn conforming_code_is_all_coarse() {
        let line = family(3, 2, 2, 0.);
        let tri = family(5, 3, 3, 10.);
        for dim in 1..=3 {
            let a = select_axis_operators(
                &line,
                &[],
                ElementClass::TensorProduct,
                dim,
                Configuration::Volume { code: 0 },
            )
            .unwrap();
            for entry in &a.entries()[..dim] {
                assert_eq!(chosen(&line, entry), Some(0));
            }
        }
        let a = select_axis_operators(
            &tri,
            &line,
            ElementClass::Wedge,
            3,
            Configuration::Volume { code: 0 },
        )
        .unwrap();
        assert_eq!(chosen(&tri, a.entry(0)), Some(0));
        assert_eq!(chosen(&line, a.entry(2)), Some(0));

        // conforming sub-faces too
        let faces = family(2 * FACE_REFINEMENTS_MAX, 1, 2, 20.);
        for face in 0..6 {
            let a = select_axis_operators(
                &line,
                &faces,
                ElementClass::TensorProduct,
                3,
                Configuration::Face { face, sub_face: 0 },
            )
            .unwrap();
            for axis in other_axes(face / 2) {
                assert_eq!(chosen(&line, a.entry(axis)), Some(0));
            }
        }
    }

    #[test]
    fn out_of_range_codes_are_unsupported() {
        let line = family(3, 2, 2, 0.);
        let tri = family(5, 3, 3, 10.);
        let tp = |dim, code| {
            select_axis_operators(
                &line,
                &[],
                ElementClass::TensorProduct,
                dim,
                Configuration::Volume { code },
            )
        };
        assert_eq!(kind(tp(3, 27)), Some(ErrorKind::Unsupported));
        assert_eq!(kind(tp(2, 9)), Some(ErrorKind::Unsupported));
        assert_eq!(kind(tp(1, 3)), Some(ErrorKind::Unsupported));
        assert_eq!(kind(tp(4, 0)), Some(ErrorKind::Unsupported));
        assert_eq!(
            kind(select_axis_operators(
                &tri,
                &line,
                ElementClass::Wedge,
                3,
                Configuration::Volume { code: 15 },
            )),
            Some(ErrorKind::Unsupported),
        );
        assert_eq!(
            kind(select_axis_operators(
                &tri,
                &line,
                ElementClass::Wedge,
                2,
                Configuration::Volume { code: 0 },
            )),
            Some(ErrorKind::Unsupported),
        );
        for class in [ElementClass::Simplex, ElementClass::Pyramid] {
            assert_eq!(
                kind(select_axis_operators(
                    &line,
                    &line,
                    class,
                    3,
                    Configuration::Volume { code: 0 },
                )),
                Some(ErrorKind::Unsupported),
            );
        }
    }

    #[test]
    fn short_family_is_a_precondition_violation() {
        let only_coarse = family(1, 2, 2, 0.);
        assert_eq!(
            kind(select_axis_operators(
                &only_coarse,
                &[],
                ElementClass::TensorProduct,
                3,
                Configuration::Volume { code: 1 },
            )),
            Some(ErrorKind::PreconditionViolated),
        );
        assert_eq!(
            kind(select_axis_operators(
                &only_coarse,
                &[],
                ElementClass::TensorProduct,
                2,
                Configuration::Axis { axis: 0 },
            )),
            Some(ErrorKind::PreconditionViolated),
        );
    }

    #[test]
    fn hex_face_cases() {
        let line = family(3, 3, 3, 0.);
        let faces = family(2 * FACE_REFINEMENTS_MAX, 1, 3, 10.);
        for face in 0..6 {
            for sub_face in 0..QUAD_CASES.len() {
                let a = select_axis_operators(
                    &line,
                    &faces,
                    ElementClass::TensorProduct,
                    3,
                    Configuration::Face { face, sub_face },
                )
                .unwrap();
                let face_axis = face / 2;
                assert_eq!(
                    chosen(&faces, a.entry(face_axis)),
                    Some((face % 2) * FACE_REFINEMENTS_MAX),
                );
                assert_eq!(a.entry(face_axis).n_out, 1);
                let [v1, v2] = other_axes(face_axis);
                let [i, j] = QUAD_CASES[sub_face].family_indices;
                assert_eq!(chosen(&line, a.entry(v1)), Some(i));
                assert_eq!(chosen(&line, a.entry(v2)), Some(j));
            }
            assert_eq!(
                kind(select_axis_operators(
                    &line,
                    &faces,
                    ElementClass::TensorProduct,
                    3,
                    Configuration::Face { face, sub_face: 9 },
                )),
                Some(ErrorKind::Unsupported),
            );
        }

        // derivative variant uses the given axis instead of the face's own
        let a = select_axis_operators(
            &line,
            &faces,
            ElementClass::TensorProduct,
            3,
            Configuration::FaceDerivative {
                face: 1,
                sub_face: 2,
                face_axis: 2,
            },
        )
        .unwrap();
        assert_eq!(chosen(&faces, a.entry(2)), Some(FACE_REFINEMENTS_MAX));
        assert_eq!(chosen(&line, a.entry(0)), Some(2));
        assert_eq!(chosen(&line, a.entry(1)), Some(1));
    }

    #[test]
    fn quad_face_cases() {
        let line = family(3, 3, 3, 0.);
        let faces = family(2 * FACE_REFINEMENTS_MAX, 1, 3, 10.);
        for face in 0..4 {
            for sub_face in 0..3 {
                let a = select_axis_operators(
                    &line,
                    &faces,
                    ElementClass::TensorProduct,
                    2,
                    Configuration::Face { face, sub_face },
                )
                .unwrap();
                let face_axis = face / 2;
                let along = 1 - face_axis;
                assert_eq!(
                    chosen(&faces, a.entry(face_axis)),
                    Some((face % 2) * FACE_REFINEMENTS_MAX)
                );
                assert_eq!(chosen(&line, a.entry(along)), Some(sub_face));
                assert!(a.entry(2).is_degenerate());
            }
        }
        assert_eq!(
            kind(select_axis_operators(
                &line,
                &faces,
                ElementClass::TensorProduct,
                2,
                Configuration::Face { face: 4, sub_face: 0 },
            )),
            Some(ErrorKind::Unsupported),
        );
    }

    #[test]
    fn wedge_face_cases() {
        let tri_faces = family(3 * FACE_REFINEMENTS_MAX, 2, 6, 0.);
        let line = family(2 * FACE_REFINEMENTS_MAX, 2, 2, 100.);
        // quad faces
        for face in 0..3 {
            for sub_face in 0..QUAD_CASES.len() {
                let a = select_axis_operators(
                    &tri_faces,
                    &line,
                    ElementClass::Wedge,
                    3,
                    Configuration::Face { face, sub_face },
                )
                .unwrap();
                let [i, j] = QUAD_CASES[sub_face].family_indices;
                assert_eq!(
                    chosen(&tri_faces, a.entry(0)),
                    Some(face * FACE_REFINEMENTS_MAX + i)
                );
                assert!(a.entry(1).is_degenerate());
                assert_eq!(chosen(&line, a.entry(2)), Some(j));
            }
        }
        // triangle faces
        for face in 3..5 {
            for sub_face in 0..TRI_FACE_CASES {
                let a = select_axis_operators(
                    &tri_faces,
                    &line,
                    ElementClass::Wedge,
                    3,
                    Configuration::Face { face, sub_face },
                )
                .unwrap();
                assert_eq!(chosen(&tri_faces, a.entry(0)), Some(sub_face));
                assert!(a.entry(1).is_degenerate());
                assert_eq!(
                    chosen(&line, a.entry(2)),
                    Some(((face + 1) % 2) * FACE_REFINEMENTS_MAX)
                );
            }
            assert_eq!(
                kind(select_axis_operators(
                    &tri_faces,
                    &line,
                    ElementClass::Wedge,
                    3,
                    Configuration::Face {
                        face,
                        sub_face: TRI_FACE_CASES
                    },
                )),
                Some(ErrorKind::Unsupported),
            );
        }
        assert_eq!(
            kind(select_axis_operators(
                &tri_faces,
                &line,
                ElementClass::Wedge,
                3,
                Configuration::Face { face: 5, sub_face: 0 },
            )),
            Some(ErrorKind::Unsupported),
        );
    }

    #[test]
    fn combined_codes() {
        assert_eq!(
            Configuration::from_face_code(3 * FACE_REFINEMENTS_MAX + 4),
            Configuration::Face {
                face: 3,
                sub_face: 4
            },
        );
        assert_eq!(
            Configuration::from_edge_code(7 * EDGE_REFINEMENTS_MAX),
            Configuration::Edge {
                edge: 7,
                sub_edge: 0
            },
        );
    }

    #[test]
    fn hex_edge_cases() {
        let line = family(1, 3, 3, 0.);
        let faces = family(2 * FACE_REFINEMENTS_MAX, 1, 3, 10.);
        for edge in 0..12 {
            let a = select_axis_operators(
                &line,
                &faces,
                ElementClass::TensorProduct,
                3,
                Configuration::Edge { edge, sub_edge: 0 },
            )
            .unwrap();
            let edge_axis = edge / 4;
            let [f1, f2] = other_axes(edge_axis);
            assert_eq!(chosen(&line, a.entry(edge_axis)), Some(0));
            assert_eq!(
                chosen(&faces, a.entry(f1)),
                Some((edge % 2) * FACE_REFINEMENTS_MAX)
            );
            assert_eq!(
                chosen(&faces, a.entry(f2)),
                Some(((edge / 2) % 2) * FACE_REFINEMENTS_MAX)
            );
        }

        let edge = |class, dim, edge, sub_edge| {
            kind(select_axis_operators(
                &line,
                &faces,
                class,
                dim,
                Configuration::Edge { edge, sub_edge },
            ))
        };
        assert_eq!(edge(ElementClass::TensorProduct, 3, 0, 1), Some(ErrorKind::Unsupported));
        assert_eq!(edge(ElementClass::TensorProduct, 3, 12, 0), Some(ErrorKind::Unsupported));
        assert_eq!(edge(ElementClass::TensorProduct, 2, 0, 0), Some(ErrorKind::Unsupported));
        assert_eq!(edge(ElementClass::Wedge, 3, 0, 0), Some(ErrorKind::Unsupported));
    }
}
