//! Heterogeneous collection of active constraints.
//!
//! A [`ConstraintSet`] keeps one ordered sequence per constraint kind. Flat
//! indices run over the concatenation of the sequences in the fixed order
//! vertex-vertex, edge-vertex, edge-edge, face-vertex, plane-vertex, so a
//! solver can visit every active constraint without knowing its kind.
//!
//! The set is rebuilt whenever the active contact set changes (every time
//! step or line-search candidate). Mutation is not synchronized; evaluation
//! only reads the set and the mesh.

use nalgebra::{DMatrix, DVector};
use tracing::{debug, trace};

use crate::constraints::{
    CollisionConstraint, ConstraintMut, ConstraintRef, EdgeEdgeConstraint, EdgeVertexConstraint,
    FaceVertexConstraint, PlaneVertexConstraint, VertexVertexConstraint,
};
use crate::{BarrierParams, IpcError, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Active constraints, grouped by kind.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ConstraintSet {
    /// Vertex-vertex constraints.
    pub vertex_vertex: Vec<VertexVertexConstraint>,
    /// Edge-vertex constraints.
    pub edge_vertex: Vec<EdgeVertexConstraint>,
    /// Edge-edge constraints.
    pub edge_edge: Vec<EdgeEdgeConstraint>,
    /// Face-vertex constraints.
    pub face_vertex: Vec<FaceVertexConstraint>,
    /// Plane-vertex constraints.
    pub plane_vertex: Vec<PlaneVertexConstraint>,
}

impl ConstraintSet {
    /// Create an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored instances across all kinds.
    #[must_use]
    pub fn len(&self) -> usize {
        self.vertex_vertex.len()
            + self.edge_vertex.len()
            + self.edge_edge.len()
            + self.face_vertex.len()
            + self.plane_vertex.len()
    }

    /// Number of geometric constraints, counting vertex-vertex and
    /// edge-vertex instances by their multiplicity. Never less than
    /// [`len`](Self::len).
    #[must_use]
    pub fn num_constraints(&self) -> usize {
        let weighted = |m: u32| usize::try_from(m).unwrap_or(usize::MAX);
        let vv: usize = self
            .vertex_vertex
            .iter()
            .map(|c| weighted(c.multiplicity()))
            .sum();
        let ev: usize = self
            .edge_vertex
            .iter()
            .map(|c| weighted(c.multiplicity()))
            .sum();
        vv + ev + self.edge_edge.len() + self.face_vertex.len() + self.plane_vertex.len()
    }

    /// Whether no constraints are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove all constraints.
    pub fn clear(&mut self) {
        debug!(
            len = self.len(),
            num_constraints = self.num_constraints(),
            "clearing constraint set"
        );
        self.vertex_vertex.clear();
        self.edge_vertex.clear();
        self.edge_edge.clear();
        self.face_vertex.clear();
        self.plane_vertex.clear();
    }

    /// Append a constraint to the sequence of its kind.
    pub fn push(&mut self, constraint: impl Into<CollisionConstraint>) {
        match constraint.into() {
            CollisionConstraint::VertexVertex(c) => self.vertex_vertex.push(c),
            CollisionConstraint::EdgeVertex(c) => self.edge_vertex.push(c),
            CollisionConstraint::EdgeEdge(c) => self.edge_edge.push(c),
            CollisionConstraint::FaceVertex(c) => self.face_vertex.push(c),
            CollisionConstraint::PlaneVertex(c) => self.plane_vertex.push(c),
        }
    }

    /// Constraint at flat index `index`.
    ///
    /// # Errors
    ///
    /// Returns [`IpcError::IndexOutOfRange`] if `index >= self.len()`.
    pub fn get(&self, index: usize) -> Result<ConstraintRef<'_>> {
        let mut i = index;
        if i < self.vertex_vertex.len() {
            return Ok(ConstraintRef::VertexVertex(&self.vertex_vertex[i]));
        }
        i -= self.vertex_vertex.len();
        if i < self.edge_vertex.len() {
            return Ok(ConstraintRef::EdgeVertex(&self.edge_vertex[i]));
        }
        i -= self.edge_vertex.len();
        if i < self.edge_edge.len() {
            return Ok(ConstraintRef::EdgeEdge(&self.edge_edge[i]));
        }
        i -= self.edge_edge.len();
        if i < self.face_vertex.len() {
            return Ok(ConstraintRef::FaceVertex(&self.face_vertex[i]));
        }
        i -= self.face_vertex.len();
        if i < self.plane_vertex.len() {
            return Ok(ConstraintRef::PlaneVertex(&self.plane_vertex[i]));
        }
        Err(IpcError::IndexOutOfRange {
            index,
            len: self.len(),
        })
    }

    /// Mutable constraint at flat index `index`.
    ///
    /// # Errors
    ///
    /// Returns [`IpcError::IndexOutOfRange`] if `index >= self.len()`.
    pub fn get_mut(&mut self, index: usize) -> Result<ConstraintMut<'_>> {
        let len = self.len();
        let mut i = index;
        if i < self.vertex_vertex.len() {
            return Ok(ConstraintMut::VertexVertex(&mut self.vertex_vertex[i]));
        }
        i -= self.vertex_vertex.len();
        if i < self.edge_vertex.len() {
            return Ok(ConstraintMut::EdgeVertex(&mut self.edge_vertex[i]));
        }
        i -= self.edge_vertex.len();
        if i < self.edge_edge.len() {
            return Ok(ConstraintMut::EdgeEdge(&mut self.edge_edge[i]));
        }
        i -= self.edge_edge.len();
        if i < self.face_vertex.len() {
            return Ok(ConstraintMut::FaceVertex(&mut self.face_vertex[i]));
        }
        i -= self.face_vertex.len();
        if i < self.plane_vertex.len() {
            return Ok(ConstraintMut::PlaneVertex(&mut self.plane_vertex[i]));
        }
        Err(IpcError::IndexOutOfRange { index, len })
    }

    /// Iterate over all constraints in flat-index order.
    pub fn iter(&self) -> impl Iterator<Item = ConstraintRef<'_>> {
        self.vertex_vertex
            .iter()
            .map(ConstraintRef::VertexVertex)
            .chain(self.edge_vertex.iter().map(ConstraintRef::EdgeVertex))
            .chain(self.edge_edge.iter().map(ConstraintRef::EdgeEdge))
            .chain(self.face_vertex.iter().map(ConstraintRef::FaceVertex))
            .chain(self.plane_vertex.iter().map(ConstraintRef::PlaneVertex))
    }

    /// Sum of the barrier potentials of all constraints.
    ///
    /// With the `parallel` feature the per-constraint potentials are
    /// evaluated with rayon; the result does not depend on it beyond
    /// floating-point summation order.
    #[must_use]
    pub fn compute_potential(
        &self,
        vertices: &DMatrix<f64>,
        edges: &[[usize; 2]],
        faces: &[[usize; 3]],
        params: &BarrierParams,
    ) -> f64 {
        let potential = |c: ConstraintRef<'_>| c.compute_potential(vertices, edges, faces, params);
        let total = sum_over(&self.vertex_vertex, |c| potential(ConstraintRef::VertexVertex(c)))
            + sum_over(&self.edge_vertex, |c| potential(ConstraintRef::EdgeVertex(c)))
            + sum_over(&self.edge_edge, |c| potential(ConstraintRef::EdgeEdge(c)))
            + sum_over(&self.face_vertex, |c| potential(ConstraintRef::FaceVertex(c)))
            + sum_over(&self.plane_vertex, |c| potential(ConstraintRef::PlaneVertex(c)));
        trace!(len = self.len(), total, "constraint set potential");
        total
    }

    /// Gradient of [`compute_potential`](Self::compute_potential) with
    /// respect to all vertex coordinates, laid out vertex-major
    /// (`[x0, y0, (z0), x1, ...]`).
    #[must_use]
    pub fn compute_potential_gradient(
        &self,
        vertices: &DMatrix<f64>,
        edges: &[[usize; 2]],
        faces: &[[usize; 3]],
        params: &BarrierParams,
    ) -> DVector<f64> {
        let dim = vertices.ncols();
        let mut gradient = DVector::zeros(vertices.nrows() * dim);
        for constraint in self.iter() {
            let local = constraint.compute_potential_gradient(vertices, edges, faces, params);
            for (k, &vertex) in constraint.vertex_indices(edges, faces).iter().enumerate() {
                for c in 0..dim {
                    gradient[vertex * dim + c] += local[k * dim + c];
                }
            }
        }
        gradient
    }
}

/// Sum `f` over `items`, in parallel with the `parallel` feature.
fn sum_over<T, F>(items: &[T], f: F) -> f64
where
    T: Sync,
    F: Fn(&T) -> f64 + Sync + Send,
{
    #[cfg(feature = "parallel")]
    {
        use rayon::iter::{IntoParallelRefIterator, ParallelIterator};
        items.par_iter().map(f).sum()
    }

    #[cfg(not(feature = "parallel"))]
    {
        items.iter().map(f).sum()
    }
}
