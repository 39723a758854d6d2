//! Vertex-vertex constraint.

use nalgebra::{DMatrix, Vector3};
use sim_distance::{point_point_distance, point_point_distance_gradient, point_point_distance_hessian};
use smallvec::{SmallVec, smallvec};

use super::{validate_multiplicity, vertex_position};
use crate::barrier::{barrier_potential, barrier_potential_gradient, barrier_potential_hessian};
use crate::{BarrierParams, MatrixMax12, Result, VectorMax12};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Barrier between two vertices.
///
/// Local DOF order is `(vertex0, vertex1)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct VertexVertexConstraint {
    vertex0: usize,
    vertex1: usize,
    multiplicity: u32,
}

impl VertexVertexConstraint {
    /// Create a constraint with multiplicity 1.
    #[must_use]
    pub const fn new(vertex0: usize, vertex1: usize) -> Self {
        Self {
            vertex0,
            vertex1,
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

    /// First vertex.
    #[must_use]
    pub const fn vertex0(&self) -> usize {
        self.vertex0
    }

    /// Second vertex.
    #[must_use]
    pub const fn vertex1(&self) -> usize {
        self.vertex1
    }

    /// Number of coincident vertex-vertex contacts this instance stands for.
    #[must_use]
    pub const fn multiplicity(&self) -> u32 {
        self.multiplicity
    }

    /// Global vertex ids in local order.
    #[must_use]
    pub fn vertex_indices(&self, _edges: &[[usize; 2]], _faces: &[[usize; 3]]) -> SmallVec<[usize; 4]> {
        smallvec![self.vertex0, self.vertex1]
    }

    fn positions(&self, vertices: &DMatrix<f64>) -> (Vector3<f64>, Vector3<f64>) {
        (
            vertex_position(vertices, self.vertex0),
            vertex_position(vertices, self.vertex1),
        )
    }

    /// Squared distance between the vertices.
    #[must_use]
    pub fn compute_distance(&self, vertices: &DMatrix<f64>, _edges: &[[usize; 2]], _faces: &[[usize; 3]]) -> f64 {
        let (p0, p1) = self.positions(vertices);
        point_point_distance(&p0, &p1)
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
        _edges: &[[usize; 2]],
        _faces: &[[usize; 3]],
        params: &BarrierParams,
    ) -> VectorMax12 {
        let dim = vertices.ncols();
        let (p0, p1) = self.positions(vertices);
        let distance = point_point_distance(&p0, &p1);
        let distance_grad = VectorMax12::from_stencil(&point_point_distance_gradient(&p0, &p1), dim);
        barrier_potential_gradient(distance, &distance_grad, params) * f64::from(self.multiplicity)
    }

    /// `multiplicity · (b'' ∇d² ∇d²ᵀ + b' ∇²d²)`, the second term optionally
    /// projected to PSD.
    #[must_use]
    pub fn compute_potential_hessian(
        &self,
        vertices: &DMatrix<f64>,
        _edges: &[[usize; 2]],
        _faces: &[[usize; 3]],
        params: &BarrierParams,
        project_hessian_to_psd: bool,
    ) -> MatrixMax12 {
        let dim = vertices.ncols();
        let (p0, p1) = self.positions(vertices);
        let distance = point_point_distance(&p0, &p1);
        let distance_grad = VectorMax12::from_stencil(&point_point_distance_gradient(&p0, &p1), dim);
        let distance_hess = MatrixMax12::from_stencil(&point_point_distance_hessian(&p0, &p1), dim);
        barrier_potential_hessian(distance, &distance_grad, &distance_hess, params, project_hessian_to_psd)
            * f64::from(self.multiplicity)
    }
}
