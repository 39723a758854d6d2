//! Edge-vertex constraint.

use nalgebra::{DMatrix, Vector3};
use sim_distance::{
    PointEdgeDistanceType, point_edge_distance, point_edge_distance_gradient,
    point_edge_distance_hessian,
};
use smallvec::{SmallVec, smallvec};

use super::{validate_multiplicity, vertex_position};
use crate::barrier::{barrier_potential, barrier_potential_gradient, barrier_potential_hessian};
use crate::{BarrierParams, MatrixMax12, Result, VectorMax12};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Only built for pairs whose closest point lies inside the edge.
const DISTANCE_TYPE: PointEdgeDistanceType = PointEdgeDistanceType::Edge;

/// Barrier between a vertex and the interior of an edge.
///
/// Local DOF order is `(vertex, edge.0, edge.1)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EdgeVertexConstraint {
    edge: usize,
    vertex: usize,
    multiplicity: u32,
}

impl EdgeVertexConstraint {
    /// Create a constraint with multiplicity 1.
    #[must_use]
    pub const fn new(edge: usize, vertex: usize) -> Self {
        Self {
            edge,
            vertex,
            multiplicity: 1,
        }
    }

    /// Set the multiplicity.
    ///
    /// # Errors
    ///
    /// Returns [`crate::IpcError::InvalidConstraint`] for multiplicity 0.
    pub fn with_multiplicity(mut self, multiplicity: u32) -> Result<Self> {
        self.set_multiplicity(multiplicity)?;
        Ok(self)
    }

    /// Change the multiplicity in place.
    ///
    /// # Errors
    ///
    /// Returns [`crate::IpcError::InvalidConstraint`] for multiplicity 0.
    pub fn set_multiplicity(&mut self, multiplicity: u32) -> Result<()> {
        validate_multiplicity(multiplicity)?;
        self.multiplicity = multiplicity;
        Ok(())
    }

    /// Edge index.
    #[must_use]
    pub const fn edge(&self) -> usize {
        self.edge
    }

    /// Vertex index.
    #[must_use]
    pub const fn vertex(&self) -> usize {
        self.vertex
    }

    /// Number of coincident edge-vertex contacts this instance stands for.
    #[must_use]
    pub const fn multiplicity(&self) -> u32 {
        self.multiplicity
    }

    /// Global vertex ids in local order.
    #[must_use]
    pub fn vertex_indices(&self, edges: &[[usize; 2]], _faces: &[[usize; 3]]) -> SmallVec<[usize; 4]> {
        let [e0, e1] = edges[self.edge];
        smallvec![self.vertex, e0, e1]
    }

    fn positions(&self, vertices: &DMatrix<f64>, edges: &[[usize; 2]]) -> [Vector3<f64>; 3] {
        let [e0, e1] = edges[self.edge];
        [
            vertex_position(vertices, self.vertex),
            vertex_position(vertices, e0),
            vertex_position(vertices, e1),
        ]
    }

    /// Squared distance from the vertex to the edge's supporting line.
    #[must_use]
    pub fn compute_distance(&self, vertices: &DMatrix<f64>, edges: &[[usize; 2]], _faces: &[[usize; 3]]) -> f64 {
        let [p, e0, e1] = self.positions(vertices, edges);
        point_edge_distance(&p, &e0, &e1, DISTANCE_TYPE)
    }

    /// `multiplicity · B(d²)`.
    #[must_use]
    pub fn compute_potential(
        &self,
        vertices: &DMatrix<f64>,
        edges: &[[usize; 2]],
        faces: &[[usize; 3]],
        params: &BarrierParams,
    ) -> f64 {
        let distance = self.compute_distance(vertices, edges, faces);
        f64::from(self.multiplicity) * barrier_potential(distance, params)
    }

    /// `multiplicity · b' · ∇d²`.
    #[must_use]
    pub fn compute_potential_gradient(
        &self,
        vertices: &DMatrix<f64>,
        edges: &[[usize; 2]],
        _faces: &[[usize; 3]],
        params: &BarrierParams,
    ) -> VectorMax12 {
        let [p, e0, e1] = self.positions(vertices, edges);
        let distance = point_edge_distance(&p, &e0, &e1, DISTANCE_TYPE);
        let distance_grad = VectorMax12::from_stencil(
            &point_edge_distance_gradient(&p, &e0, &e1, DISTANCE_TYPE),
            vertices.ncols(),
        );
        barrier_potential_gradient(distance, &distance_grad, params) * f64::from(self.multiplicity)
    }

    /// `multiplicity · (b'' ∇d² ∇d²ᵀ + b' ∇²d²)`, the second term optionally
    /// projected to PSD.
    #[must_use]
    pub fn compute_potential_hessian(
        &self,
        vertices: &DMatrix<f64>,
        edges: &[[usize; 2]],
        _faces: &[[usize; 3]],
        params: &BarrierParams,
        project_hessian_to_psd: bool,
    ) -> MatrixMax12 {
        let dim = vertices.ncols();
        let [p, e0, e1] = self.positions(vertices, edges);
        let distance = point_edge_distance(&p, &e0, &e1, DISTANCE_TYPE);
        let distance_grad =
            VectorMax12::from_stencil(&point_edge_distance_gradient(&p, &e0, &e1, DISTANCE_TYPE), dim);
        let distance_hess =
            MatrixMax12::from_stencil(&point_edge_distance_hessian(&p, &e0, &e1, DISTANCE_TYPE), dim);
        barrier_potential_hessian(distance, &distance_grad, &distance_hess, params, project_hessian_to_psd)
            * f64::from(self.multiplicity)
    }
}
