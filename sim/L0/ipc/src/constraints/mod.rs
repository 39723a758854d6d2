//! Collision constraints between mesh primitives.
//!
//! Each constraint names the primitives that interact and recomputes its
//! distance, barrier potential, gradient and Hessian from the current vertex
//! positions on every call. Nothing numeric is cached.
//!
//! - [`VertexVertexConstraint`] - two vertices (6 DOF in 3D)
//! - [`EdgeVertexConstraint`] - a vertex against the interior of an edge (9 DOF)
//! - [`EdgeEdgeConstraint`] - two edges, mollified near parallel (12 DOF)
//! - [`FaceVertexConstraint`] - a vertex against the interior of a face (12 DOF)
//! - [`PlaneVertexConstraint`] - a vertex against a fixed plane (3 DOF)
//!
//! # Mesh data
//!
//! All operations take the vertex matrix (one row per vertex, 2 or 3
//! columns), the edge list and the face list. The local degree-of-freedom
//! layout is the vertex order returned by `vertex_indices`, with `dim`
//! coordinates per vertex. Indices must be valid for the mesh passed in;
//! that is checked by nalgebra's row access, not reported as an error.

mod edge_edge;
mod edge_vertex;
mod face_vertex;
mod plane_vertex;
mod vertex_vertex;

pub use edge_edge::EdgeEdgeConstraint;
pub use edge_vertex::EdgeVertexConstraint;
pub use face_vertex::FaceVertexConstraint;
pub use plane_vertex::PlaneVertexConstraint;
pub use vertex_vertex::VertexVertexConstraint;

use nalgebra::{DMatrix, Vector3};
use smallvec::SmallVec;

use crate::{BarrierParams, IpcError, MatrixMax12, Result, VectorMax12};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Primitive pair of a constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ConstraintKind {
    /// Vertex-vertex.
    VertexVertex,
    /// Edge-vertex.
    EdgeVertex,
    /// Edge-edge.
    EdgeEdge,
    /// Face-vertex.
    FaceVertex,
    /// Plane-vertex.
    PlaneVertex,
}

impl ConstraintKind {
    /// All kinds, in constraint-set order.
    pub const ALL: [Self; 5] = [
        Self::VertexVertex,
        Self::EdgeVertex,
        Self::EdgeEdge,
        Self::FaceVertex,
        Self::PlaneVertex,
    ];

    /// Number of mesh vertices in the local stencil.
    #[must_use]
    pub const fn num_vertices(self) -> usize {
        match self {
            Self::PlaneVertex => 1,
            Self::VertexVertex => 2,
            Self::EdgeVertex => 3,
            Self::EdgeEdge | Self::FaceVertex => 4,
        }
    }
}

impl std::fmt::Display for ConstraintKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::VertexVertex => write!(f, "vertex-vertex"),
            Self::EdgeVertex => write!(f, "edge-vertex"),
            Self::EdgeEdge => write!(f, "edge-edge"),
            Self::FaceVertex => write!(f, "face-vertex"),
            Self::PlaneVertex => write!(f, "plane-vertex"),
        }
    }
}

/// An owned constraint of any kind.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum CollisionConstraint {
    /// Vertex-vertex constraint.
    VertexVertex(VertexVertexConstraint),
    /// Edge-vertex constraint.
    EdgeVertex(EdgeVertexConstraint),
    /// Edge-edge constraint.
    EdgeEdge(EdgeEdgeConstraint),
    /// Face-vertex constraint.
    FaceVertex(FaceVertexConstraint),
    /// Plane-vertex constraint.
    PlaneVertex(PlaneVertexConstraint),
}

impl CollisionConstraint {
    /// Borrow as a [`ConstraintRef`], which carries the evaluation methods.
    #[must_use]
    pub fn to_ref(&self) -> ConstraintRef<'_> {
        match self {
            Self::VertexVertex(c) => ConstraintRef::VertexVertex(c),
            Self::EdgeVertex(c) => ConstraintRef::EdgeVertex(c),
            Self::EdgeEdge(c) => ConstraintRef::EdgeEdge(c),
            Self::FaceVertex(c) => ConstraintRef::FaceVertex(c),
            Self::PlaneVertex(c) => ConstraintRef::PlaneVertex(c),
        }
    }

    /// Kind of this constraint.
    #[must_use]
    pub fn kind(&self) -> ConstraintKind {
        self.to_ref().kind()
    }
}

impl From<VertexVertexConstraint> for CollisionConstraint {
    fn from(c: VertexVertexConstraint) -> Self {
        Self::VertexVertex(c)
    }
}

impl From<EdgeVertexConstraint> for CollisionConstraint {
    fn from(c: EdgeVertexConstraint) -> Self {
        Self::EdgeVertex(c)
    }
}

impl From<EdgeEdgeConstraint> for CollisionConstraint {
    fn from(c: EdgeEdgeConstraint) -> Self {
        Self::EdgeEdge(c)
    }
}

impl From<FaceVertexConstraint> for CollisionConstraint {
    fn from(c: FaceVertexConstraint) -> Self {
        Self::FaceVertex(c)
    }
}

impl From<PlaneVertexConstraint> for CollisionConstraint {
    fn from(c: PlaneVertexConstraint) -> Self {
        Self::PlaneVertex(c)
    }
}

/// A borrowed constraint of any kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConstraintRef<'a> {
    /// Vertex-vertex constraint.
    VertexVertex(&'a VertexVertexConstraint),
    /// Edge-vertex constraint.
    EdgeVertex(&'a EdgeVertexConstraint),
    /// Edge-edge constraint.
    EdgeEdge(&'a EdgeEdgeConstraint),
    /// Face-vertex constraint.
    FaceVertex(&'a FaceVertexConstraint),
    /// Plane-vertex constraint.
    PlaneVertex(&'a PlaneVertexConstraint),
}

impl ConstraintRef<'_> {
    /// Kind of the referenced constraint.
    #[must_use]
    pub const fn kind(&self) -> ConstraintKind {
        match self {
            Self::VertexVertex(_) => ConstraintKind::VertexVertex,
            Self::EdgeVertex(_) => ConstraintKind::EdgeVertex,
            Self::EdgeEdge(_) => ConstraintKind::EdgeEdge,
            Self::FaceVertex(_) => ConstraintKind::FaceVertex,
            Self::PlaneVertex(_) => ConstraintKind::PlaneVertex,
        }
    }

    /// Number of geometric constraints this instance stands for.
    #[must_use]
    pub const fn multiplicity(&self) -> u32 {
        match self {
            Self::VertexVertex(c) => c.multiplicity(),
            Self::EdgeVertex(c) => c.multiplicity(),
            Self::EdgeEdge(_) | Self::FaceVertex(_) | Self::PlaneVertex(_) => 1,
        }
    }

    /// Number of mesh vertices in the local stencil.
    #[must_use]
    pub const fn num_vertices(&self) -> usize {
        self.kind().num_vertices()
    }

    /// Local degrees of freedom for `dim` coordinates per vertex.
    #[must_use]
    pub const fn ndof(&self, dim: usize) -> usize {
        self.num_vertices() * dim
    }

    /// Global vertex ids in local order.
    #[must_use]
    pub fn vertex_indices(&self, edges: &[[usize; 2]], faces: &[[usize; 3]]) -> SmallVec<[usize; 4]> {
        match self {
            Self::VertexVertex(c) => c.vertex_indices(edges, faces),
            Self::EdgeVertex(c) => c.vertex_indices(edges, faces),
            Self::EdgeEdge(c) => c.vertex_indices(edges, faces),
            Self::FaceVertex(c) => c.vertex_indices(edges, faces),
            Self::PlaneVertex(c) => c.vertex_indices(edges, faces),
        }
    }

    /// Squared distance between the primitives.
    #[must_use]
    pub fn compute_distance(
        &self,
        vertices: &DMatrix<f64>,
        edges: &[[usize; 2]],
        faces: &[[usize; 3]],
    ) -> f64 {
        match self {
            Self::VertexVertex(c) => c.compute_distance(vertices, edges, faces),
            Self::EdgeVertex(c) => c.compute_distance(vertices, edges, faces),
            Self::EdgeEdge(c) => c.compute_distance(vertices, edges, faces),
            Self::FaceVertex(c) => c.compute_distance(vertices, edges, faces),
            Self::PlaneVertex(c) => c.compute_distance(vertices, edges, faces),
        }
    }

    /// Barrier potential.
    #[must_use]
    pub fn compute_potential(
        &self,
        vertices: &DMatrix<f64>,
        edges: &[[usize; 2]],
        faces: &[[usize; 3]],
        params: &BarrierParams,
    ) -> f64 {
        match self {
            Self::VertexVertex(c) => c.compute_potential(vertices, edges, faces, params),
            Self::EdgeVertex(c) => c.compute_potential(vertices, edges, faces, params),
            Self::EdgeEdge(c) => c.compute_potential(vertices, edges, faces, params),
            Self::FaceVertex(c) => c.compute_potential(vertices, edges, faces, params),
            Self::PlaneVertex(c) => c.compute_potential(vertices, edges, faces, params),
        }
    }

    /// Gradient of the barrier potential in local DOF order.
    #[must_use]
    pub fn compute_potential_gradient(
        &self,
        vertices: &DMatrix<f64>,
        edges: &[[usize; 2]],
        faces: &[[usize; 3]],
        params: &BarrierParams,
    ) -> VectorMax12 {
        match self {
            Self::VertexVertex(c) => c.compute_potential_gradient(vertices, edges, faces, params),
            Self::EdgeVertex(c) => c.compute_potential_gradient(vertices, edges, faces, params),
            Self::EdgeEdge(c) => c.compute_potential_gradient(vertices, edges, faces, params),
            Self::FaceVertex(c) => c.compute_potential_gradient(vertices, edges, faces, params),
            Self::PlaneVertex(c) => c.compute_potential_gradient(vertices, edges, faces, params),
        }
    }

    /// Hessian of the barrier potential in local DOF order.
    #[must_use]
    pub fn compute_potential_hessian(
        &self,
        vertices: &DMatrix<f64>,
        edges: &[[usize; 2]],
        faces: &[[usize; 3]],
        params: &BarrierParams,
        project_hessian_to_psd: bool,
    ) -> MatrixMax12 {
        match self {
            Self::VertexVertex(c) => {
                c.compute_potential_hessian(vertices, edges, faces, params, project_hessian_to_psd)
            }
            Self::EdgeVertex(c) => {
                c.compute_potential_hessian(vertices, edges, faces, params, project_hessian_to_psd)
            }
            Self::EdgeEdge(c) => {
                c.compute_potential_hessian(vertices, edges, faces, params, project_hessian_to_psd)
            }
            Self::FaceVertex(c) => {
                c.compute_potential_hessian(vertices, edges, faces, params, project_hessian_to_psd)
            }
            Self::PlaneVertex(c) => {
                c.compute_potential_hessian(vertices, edges, faces, params, project_hessian_to_psd)
            }
        }
    }
}

/// A mutably borrowed constraint of any kind.
#[derive(Debug, PartialEq)]
pub enum ConstraintMut<'a> {
    /// Vertex-vertex constraint.
    VertexVertex(&'a mut VertexVertexConstraint),
    /// Edge-vertex constraint.
    EdgeVertex(&'a mut EdgeVertexConstraint),
    /// Edge-edge constraint.
    EdgeEdge(&'a mut EdgeEdgeConstraint),
    /// Face-vertex constraint.
    FaceVertex(&'a mut FaceVertexConstraint),
    /// Plane-vertex constraint.
    PlaneVertex(&'a mut PlaneVertexConstraint),
}

impl ConstraintMut<'_> {
    /// Reborrow immutably.
    #[must_use]
    pub fn to_ref(&self) -> ConstraintRef<'_> {
        match self {
            Self::VertexVertex(c) => ConstraintRef::VertexVertex(c),
            Self::EdgeVertex(c) => ConstraintRef::EdgeVertex(c),
            Self::EdgeEdge(c) => ConstraintRef::EdgeEdge(c),
            Self::FaceVertex(c) => ConstraintRef::FaceVertex(c),
            Self::PlaneVertex(c) => ConstraintRef::PlaneVertex(c),
        }
    }

    /// Change the multiplicity of a vertex-vertex or edge-vertex constraint.
    ///
    /// # Errors
    ///
    /// Returns [`IpcError::InvalidConstraint`] for multiplicity 0 or for a
    /// kind that has no multiplicity.
    pub fn set_multiplicity(&mut self, multiplicity: u32) -> Result<()> {
        match self {
            Self::VertexVertex(c) => c.set_multiplicity(multiplicity),
            Self::EdgeVertex(c) => c.set_multiplicity(multiplicity),
            other => Err(IpcError::invalid_constraint(format!(
                "{} constraints have no multiplicity",
                other.to_ref().kind()
            ))),
        }
    }
}

/// Check a multiplicity before storing it.
pub(crate) fn validate_multiplicity(multiplicity: u32) -> Result<()> {
    if multiplicity == 0 {
        return Err(IpcError::invalid_constraint("multiplicity must be at least 1"));
    }
    Ok(())
}

/// Position of vertex `index` as a 3D point; 2D rows get `z = 0`.
pub(crate) fn vertex_position(vertices: &DMatrix<f64>, index: usize) -> Vector3<f64> {
    let row = vertices.row(index);
    let mut p = Vector3::zeros();
    for (k, &value) in row.iter().take(3).enumerate() {
        p[k] = value;
    }
    p
}
