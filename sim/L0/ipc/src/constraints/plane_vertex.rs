//! Plane-vertex constraint.

use nalgebra::{DMatrix, Vector2, Vector3};
use sim_distance::{point_plane_distance, point_plane_distance_gradient, point_plane_distance_hessian};
use smallvec::{SmallVec, smallvec};
use tracing::warn;

use super::vertex_position;
use crate::barrier::{barrier_potential, barrier_potential_gradient, barrier_potential_hessian};
use crate::{BarrierParams, IpcError, MatrixMax12, Result, VectorMax12};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Barrier between a vertex and a fixed plane (a line in 2D).
///
/// The plane is not part of the mesh, so the local stencil is the vertex
/// alone.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PlaneVertexConstraint {
    origin: Vector3<f64>,
    normal: Vector3<f64>,
    dim: usize,
    vertex: usize,
}

impl PlaneVertexConstraint {
    /// Plane through `origin` with normal `normal` (normalized on entry).
    ///
    /// # Errors
    ///
    /// Returns [`IpcError::InvalidConstraint`] for a zero or non-finite
    /// normal.
    pub fn new(origin: Vector3<f64>, normal: Vector3<f64>, vertex: usize) -> Result<Self> {
        Self::with_dim(origin, normal, 3, vertex)
    }

    /// Line through `origin` with normal `normal`, for planar meshes.
    ///
    /// # Errors
    ///
    /// Returns [`IpcError::InvalidConstraint`] for a zero or non-finite
    /// normal.
    pub fn new_2d(origin: Vector2<f64>, normal: Vector2<f64>, vertex: usize) -> Result<Self> {
        Self::with_dim(origin.push(0.0), normal.push(0.0), 2, vertex)
    }

    /// Plane from coordinate slices of length 2 or 3.
    ///
    /// # Errors
    ///
    /// Returns [`IpcError::InvalidConstraint`] if the slices differ in
    /// length, are not 2 or 3 long, or the normal is zero.
    pub fn from_slices(origin: &[f64], normal: &[f64], vertex: usize) -> Result<Self> {
        let dim = origin.len();
        if normal.len() != dim || !(2..=3).contains(&dim) {
            return Err(IpcError::invalid_constraint(format!(
                "plane origin and normal must both have 2 or 3 coordinates, got {} and {}",
                origin.len(),
                normal.len()
            )));
        }
        let embed = |coords: &[f64]| Vector3::from_fn(|i, _| coords.get(i).copied().unwrap_or(0.0));
        Self::with_dim(embed(origin), embed(normal), dim, vertex)
    }

    fn with_dim(origin: Vector3<f64>, normal: Vector3<f64>, dim: usize, vertex: usize) -> Result<Self> {
        let normal = normal
            .try_normalize(f64::EPSILON)
            .filter(|n| n.iter().all(|c| c.is_finite()))
            .ok_or_else(|| {
                warn!(vertex, "rejected plane with degenerate normal");
                IpcError::invalid_constraint("plane normal must be non-zero and finite")
            })?;
        Ok(Self {
            origin,
            normal,
            dim,
            vertex,
        })
    }

    /// A point on the plane.
    #[must_use]
    pub const fn origin(&self) -> &Vector3<f64> {
        &self.origin
    }

    /// Unit normal.
    #[must_use]
    pub const fn normal(&self) -> &Vector3<f64> {
        &self.normal
    }

    /// Ambient dimension the plane was given in (2 or 3).
    #[must_use]
    pub const fn dim(&self) -> usize {
        self.dim
    }

    /// Vertex index.
    #[must_use]
    pub const fn vertex(&self) -> usize {
        self.vertex
    }

    /// Global vertex ids in local order.
    #[must_use]
    pub fn vertex_indices(&self, _edges: &[[usize; 2]], _faces: &[[usize; 3]]) -> SmallVec<[usize; 4]> {
        smallvec![self.vertex]
    }

    /// Squared distance from the vertex to the plane.
    #[must_use]
    pub fn compute_distance(&self, vertices: &DMatrix<f64>, _edges: &[[usize; 2]], _faces: &[[usize; 3]]) -> f64 {
        let p = vertex_position(vertices, self.vertex);
        point_plane_distance(&p, &self.origin, &self.normal)
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
        _faces: &[[usize; 3]],
        params: &BarrierParams,
    ) -> VectorMax12 {
        let p = vertex_position(vertices, self.vertex);
        let distance = point_plane_distance(&p, &self.origin, &self.normal);
        let distance_grad = VectorMax12::from_stencil(
            &point_plane_distance_gradient(&p, &self.origin, &self.normal),
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
        _faces: &[[usize; 3]],
        params: &BarrierParams,
        project_hessian_to_psd: bool,
    ) -> MatrixMax12 {
        let dim = vertices.ncols();
        let p = vertex_position(vertices, self.vertex);
        let distance = point_plane_distance(&p, &self.origin, &self.normal);
        let distance_grad =
            VectorMax12::from_stencil(&point_plane_distance_gradient(&p, &self.origin, &self.normal), dim);
        let distance_hess =
            MatrixMax12::from_stencil(&point_plane_distance_hessian(&p, &self.origin, &self.normal), dim);
        barrier_potential_hessian(distance, &distance_grad, &distance_hess, params, project_hessian_to_psd)
    }
}
