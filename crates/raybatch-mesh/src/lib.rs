#![warn(missing_docs)]

//! Triangle and volumetric element meshes for the raybatch kernel.
//!
//! Application vertex/index arrays are converted here into the triangle
//! lists the tracer consumes:
//!
//! - [`TriangleMesh`] — a triangulated surface, either indexed or given as
//!   an implicit soup of consecutive vertex triples.
//! - [`ElementMesh`] — volumetric tetrahedra or hexahedra, decomposed into
//!   their triangular boundary faces with a fixed ordering so that reported
//!   primitive ids and hit coordinates are stable.
//!
//! All index data is validated at construction; a mesh that exists is safe
//! to trace against.

use raybatch_math::Point3;

mod error;

pub use error::{MeshError, Result};

/// Triangular faces of a tetrahedron, ordered by the vertex each face omits.
const TET_FACES: [[usize; 3]; 4] = [[1, 3, 2], [0, 2, 3], [0, 3, 1], [0, 1, 2]];

/// Quad faces of a hexahedron: bottom, top, then the four sides walking the
/// bottom ring. Node numbering follows the usual convention of nodes 0-3 on
/// the bottom face and 4-7 stacked above them.
const HEX_FACES: [[usize; 4]; 6] = [
    [0, 3, 2, 1],
    [4, 5, 6, 7],
    [0, 1, 5, 4],
    [1, 2, 6, 5],
    [2, 3, 7, 6],
    [3, 0, 4, 7],
];

/// Common view over registered geometry: a vertex array plus triangle index
/// triples into it. The scene consumes meshes through this trait.
pub trait Mesh {
    /// Vertex positions.
    fn vertices(&self) -> &[Point3];

    /// Triangle index triples into [`Mesh::vertices`].
    fn triangles(&self) -> &[[u32; 3]];
}

fn to_points(vertices: &[[f32; 3]]) -> Vec<Point3> {
    vertices
        .iter()
        .map(|v| Point3::new(v[0], v[1], v[2]))
        .collect()
}

fn check_indices(triangles: &[[u32; 3]], vertex_count: usize) -> Result<()> {
    for tri in triangles {
        for &index in tri {
            if index as usize >= vertex_count {
                return Err(MeshError::IndexOutOfRange {
                    index,
                    vertex_count,
                });
            }
        }
    }
    Ok(())
}

/// A triangulated surface mesh.
///
/// Triangle `i` of the mesh becomes primitive id `i` of the geometry once
/// attached to a scene; hit `(u, v)` coordinates are barycentric along the
/// triangle's first and second edge respectively.
#[derive(Debug, Clone)]
pub struct TriangleMesh {
    vertices: Vec<Point3>,
    triangles: Vec<[u32; 3]>,
}

impl TriangleMesh {
    /// Create a mesh from a vertex array and explicit triangle index triples.
    pub fn indexed(vertices: &[[f32; 3]], triangles: &[[u32; 3]]) -> Result<Self> {
        check_indices(triangles, vertices.len())?;
        Ok(Self {
            vertices: to_points(vertices),
            triangles: triangles.to_vec(),
        })
    }

    /// Create a mesh from an implicit triangle list: vertices are consumed
    /// in consecutive triples, so the vertex count must be a multiple of 3.
    pub fn from_soup(vertices: &[[f32; 3]]) -> Result<Self> {
        if vertices.len() % 3 != 0 {
            return Err(MeshError::SoupLength(vertices.len()));
        }
        let triangles = (0..vertices.len() as u32 / 3)
            .map(|i| [3 * i, 3 * i + 1, 3 * i + 2])
            .collect();
        Ok(Self {
            vertices: to_points(vertices),
            triangles,
        })
    }

    /// Number of triangles.
    pub fn num_triangles(&self) -> usize {
        self.triangles.len()
    }
}

impl Mesh for TriangleMesh {
    fn vertices(&self) -> &[Point3] {
        &self.vertices
    }

    fn triangles(&self) -> &[[u32; 3]] {
        &self.triangles
    }
}

/// The volumetric element types understood by [`ElementMesh`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    /// Four-node tetrahedron; decomposes into 4 triangular faces.
    Tetrahedron,
    /// Eight-node hexahedron; decomposes into 6 quad faces, 2 triangles each.
    Hexahedron,
}

impl ElementKind {
    /// Nodes per element of this kind.
    pub fn nodes(&self) -> usize {
        match self {
            ElementKind::Tetrahedron => 4,
            ElementKind::Hexahedron => 8,
        }
    }

    /// Triangles produced per element by the face decomposition.
    pub fn triangles_per_element(&self) -> usize {
        match self {
            ElementKind::Tetrahedron => 4,
            ElementKind::Hexahedron => 12,
        }
    }

    fn from_row_len(row: usize) -> Result<Self> {
        match row {
            4 => Ok(ElementKind::Tetrahedron),
            8 => Ok(ElementKind::Hexahedron),
            other => Err(MeshError::ElementRow(other)),
        }
    }
}

/// A mesh of volumetric elements, stored as the triangulated boundary faces
/// of each element.
///
/// Element `e` contributes triangles `e * k .. (e + 1) * k` where `k` is
/// [`ElementKind::triangles_per_element`]; the face tables are fixed, so the
/// primitive id and `(u, v)` reported for a hit are reproducible properties
/// of the mesh. Quad faces are split along the diagonal from their second to
/// their fourth vertex.
#[derive(Debug, Clone)]
pub struct ElementMesh {
    vertices: Vec<Point3>,
    triangles: Vec<[u32; 3]>,
    kind: ElementKind,
}

impl ElementMesh {
    /// Create an element mesh from flat index data.
    ///
    /// `nodes_per_element` selects the interpretation: 4 for tetrahedra,
    /// 8 for hexahedra. The index count must divide evenly into rows.
    pub fn new(vertices: &[[f32; 3]], indices: &[u32], nodes_per_element: usize) -> Result<Self> {
        let kind = ElementKind::from_row_len(nodes_per_element)?;
        if indices.len() % nodes_per_element != 0 {
            return Err(MeshError::RaggedElements {
                count: indices.len(),
                row: nodes_per_element,
            });
        }

        let mut triangles = Vec::new();
        for element in indices.chunks_exact(nodes_per_element) {
            match kind {
                ElementKind::Tetrahedron => {
                    for face in &TET_FACES {
                        triangles.push([element[face[0]], element[face[1]], element[face[2]]]);
                    }
                }
                ElementKind::Hexahedron => {
                    for quad in &HEX_FACES {
                        let [a, b, c, d] = quad.map(|i| element[i]);
                        triangles.push([b, d, a]);
                        triangles.push([b, c, d]);
                    }
                }
            }
        }
        check_indices(&triangles, vertices.len())?;

        Ok(Self {
            vertices: to_points(vertices),
            triangles,
            kind,
        })
    }

    /// Create a tetrahedral mesh from 4-node element rows.
    pub fn tetrahedra(vertices: &[[f32; 3]], elements: &[[u32; 4]]) -> Result<Self> {
        let flat: Vec<u32> = elements.iter().flatten().copied().collect();
        Self::new(vertices, &flat, 4)
    }

    /// Create a hexahedral mesh from 8-node element rows.
    pub fn hexahedra(vertices: &[[f32; 3]], elements: &[[u32; 8]]) -> Result<Self> {
        let flat: Vec<u32> = elements.iter().flatten().copied().collect();
        Self::new(vertices, &flat, 8)
    }

    /// The element type of this mesh.
    pub fn kind(&self) -> ElementKind {
        self.kind
    }

    /// Number of elements.
    pub fn num_elements(&self) -> usize {
        self.triangles.len() / self.kind.triangles_per_element()
    }
}

impl Mesh for ElementMesh {
    fn vertices(&self) -> &[Point3] {
        &self.vertices
    }

    fn triangles(&self) -> &[[u32; 3]] {
        &self.triangles
    }
}
