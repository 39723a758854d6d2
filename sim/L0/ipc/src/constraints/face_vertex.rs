//! Face-vertex constraint.

use nalgebra::{DMatrix, Vector3};
use sim_distance::{
    PointTriangleDistanceType, point_triangle_distance, point_triangle_distance_gradient,
    point_triangle_distance_hessian,
};
use smallvec::{SmallVec, smallvec};

use super::vertex_position;
use crate::barrier::{barrier_potential, barrier_potential_gradient, barrier_potential_hessian};
use crate::{BarrierParams, MatrixMax12, VectorMax12};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Only built for pairs whose closest point lies inside the face.
const DISTANCE_TYPE: PointTriangleDistanceType = PointTriangleDistanceType::Face;

/// Barrier between a vertex and the interior of a triangle.
///
/// Local DOF order is `(vertex, face.0, face.1, face.2)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FaceVertexConstraint {
    face: usize,
    vertex: usize,
}

impl FaceVertexConstraint {
    /// Create a constraint.
    #[must_use]
    pub const fn new(face: usize, vertex: usize) -> Self {
        Self { face, vertex }
    }

    /// Face index.
    #[must_use]
    pub const fn face(&self) -> usize {
        self.face
    }

    /// Vertex index.
    #[must_use]
    pub const fn vertex(&self) -> usize {
        self.vertex
    }

    /// Global vertex ids in local order.
    #[must_use]
    pub fn vertex_indices(&self, _edges: &[[usize; 2]], faces: &[[usize; 3]]) -> SmallVec<[usize; 4]> {
        let [t0, t1, t2] = faces[self.face];
        smallvec![self.vertex, t0, t1, t2]
    }

    fn positions(&self, vertices: &DMatrix<f64>, faces: &[[usize; 3]]) -> [Vector3<f64>; 4] {
        let [t0, t1, t2] = faces[self.face];
        [
            vertex_position(vertices, self.vertex),
            vertex_position(vertices, t0),
            vertex_position(vertices, t1),
            vertex_position(vertices, t2),
        ]
    }

    /// Squared distance from the vertex to the face's supporting plane.
    #[must_use]
    pub fn compute_distance(&self, vertices: &DMatrix<f64>, _edges: &[[usize; 2]], faces: &[[usize; 3]]) -> f64 {
        let [p, t0, t1, t2] = self.positions(vertices, faces);
        point_triangle_distance(&p, &t0, &t1, &t2, DISTANCE_TYPE)
    }

    /// `B(d²)`.
    #[must_use]
    pub fn compute_potential(
        &self,
        vertices: &DMatrix<f64>,
        edges: &[[usize; 2]],
        faces: &[[usize; 3]],
        params: &BarrierParams,
    ) -> f64 {
        barrier_potential(self.compute_distance(vertices, edges, faces), params)
    }

    /// `b' · ∇d²`.
    #[must_use]
    pub fn compute_potential_gradient(
        &self,
        vertices: &DMatrix<f64>,
        _edges: &[[usize; 2]],
        faces: &[[usize; 3]],
        params: &BarrierParams,
    ) -> VectorMax12 {
        let [p, t0, t1, t2] = self.positions(vertices, faces);
        let distance = point_triangle_distance(&p, &t0, &t1, &t2, DISTANCE_TYPE);
        let distance_grad = VectorMax12::from_stencil(
            &point_triangle_distance_gradient(&p, &t0, &t1, &t2, DISTANCE_TYPE),
            vertices.ncols(),
        );
        barrier_potential_gradient(distance, &distance_grad, params)
    }

    /// `b'' ∇d² ∇d²ᵀ + b' ∇²d²`, the second term optionally projected to PSD.
    #[must_use]
    pub fn compute_potential_hessian(
        &self,
        vertices: &DMatrix<f64>,
        _edges: &[[usize; 2]],
        faces: &[[usize; 3]],
        params: &BarrierParams,
        project_hessian_to_psd: bool,
    ) -> MatrixMax12 {
        let dim = vertices.ncols();
        let [p, t0, t1, t2] = self.positions(vertices, faces);
        let distance = point_triangle_distance(&p, &t0, &t1, &t2, DISTANCE_TYPE);
        let distance_grad = VectorMax12::from_stencil(
            &point_triangle_distance_gradient(&p, &t0, &t1, &t2, DISTANCE_TYPE),
            dim,
        );
        let distance_hess = MatrixMax12::from_stencil(
            &point_triangle_distance_hessian(&p, &t0, &t1, &t2, DISTANCE_TYPE),
            dim,
        );
        barrier_potential_hessian(distance, &distance_grad, &distance_hess, params, project_hessian_to_psd)
    }
}
