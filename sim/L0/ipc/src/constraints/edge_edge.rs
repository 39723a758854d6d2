//! Mollified edge-edge constraint.
//!
//! The potential is `m(x) · B(d²(x))`, where `m` is the edge-edge mollifier.
//! `m` goes to zero as the edges become parallel, which removes the
//! discontinuity of the barrier gradient there.
//!
//! ```text
//! ∇(mB)  = B ∇m + m b' ∇d²
//! ∇²(mB) = B ∇²m + b' (∇d² ∇mᵀ + ∇m ∇d²ᵀ) + m (b'' ∇d² ∇d²ᵀ + b' ∇²d²)
//! ```
//!
//! The cross terms are indefinite, so PSD projection acts on the whole sum.
//!
//! Pairs are also created for configurations whose closest points are
//! endpoints, so the distance type is classified on every evaluation.

use nalgebra::{DMatrix, Vector3};
use sim_distance::{
    EdgeEdgeDistanceType, edge_edge_distance, edge_edge_distance_gradient,
    edge_edge_distance_hessian, edge_edge_distance_type, edge_edge_mollifier,
    edge_edge_mollifier_gradient, edge_edge_mollifier_hessian, edge_edge_mollifier_threshold,
};
use smallvec::{SmallVec, smallvec};
use tracing::warn;

use super::vertex_position;
use crate::barrier::{barrier, barrier_arguments, barrier_gradient, barrier_hessian};
use crate::{BarrierParams, IpcError, MatrixMax12, Result, VectorMax12};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Barrier between two edges, mollified near parallel.
///
/// Local DOF order is `(edge0.0, edge0.1, edge1.0, edge1.1)`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EdgeEdgeConstraint {
    edge0: usize,
    edge1: usize,
    eps_x: f64,
}

impl EdgeEdgeConstraint {
    /// Create a constraint with mollifier threshold `eps_x`.
    ///
    /// # Errors
    ///
    /// Returns [`IpcError::InvalidConstraint`] if `eps_x` is not positive and
    /// finite.
    pub fn new(edge0: usize, edge1: usize, eps_x: f64) -> Result<Self> {
        if !eps_x.is_finite() || eps_x <= 0.0 {
            warn!(edge0, edge1, eps_x, "degenerate edge-edge mollifier threshold");
            return Err(IpcError::invalid_constraint(format!(
                "edge-edge mollifier threshold must be positive and finite, got {eps_x}"
            )));
        }
        Ok(Self { edge0, edge1, eps_x })
    }

    /// Create a constraint with `eps_x` taken from the rest positions of the
    /// two edges.
    ///
    /// # Errors
    ///
    /// Returns [`IpcError::InvalidConstraint`] if either rest edge has zero
    /// length.
    pub fn from_rest_positions(
        edge0: usize,
        edge1: usize,
        rest_vertices: &DMatrix<f64>,
        edges: &[[usize; 2]],
    ) -> Result<Self> {
        let [ea0, ea1] = edges[edge0];
        let [eb0, eb1] = edges[edge1];
        let eps_x = edge_edge_mollifier_threshold(
            &vertex_position(rest_vertices, ea0),
            &vertex_position(rest_vertices, ea1),
            &vertex_position(rest_vertices, eb0),
            &vertex_position(rest_vertices, eb1),
        );
        Self::new(edge0, edge1, eps_x)
    }

    /// First edge.
    #[must_use]
    pub const fn edge0(&self) -> usize {
        self.edge0
    }

    /// Second edge.
    #[must_use]
    pub const fn edge1(&self) -> usize {
        self.edge1
    }

    /// Mollifier threshold on `|ea × eb|²`.
    #[must_use]
    pub const fn eps_x(&self) -> f64 {
        self.eps_x
    }

    /// Global vertex ids in local order.
    #[must_use]
    pub fn vertex_indices(&self, edges: &[[usize; 2]], _faces: &[[usize; 3]]) -> SmallVec<[usize; 4]> {
        let [ea0, ea1] = edges[self.edge0];
        let [eb0, eb1] = edges[self.edge1];
        smallvec![ea0, ea1, eb0, eb1]
    }

    fn positions(&self, vertices: &DMatrix<f64>, edges: &[[usize; 2]]) -> [Vector3<f64>; 4] {
        let [ea0, ea1] = edges[self.edge0];
        let [eb0, eb1] = edges[self.edge1];
        [
            vertex_position(vertices, ea0),
            vertex_position(vertices, ea1),
            vertex_position(vertices, eb0),
            vertex_position(vertices, eb1),
        ]
    }

    /// Closest-feature classification for the current positions.
    #[must_use]
    pub fn distance_type(&self, vertices: &DMatrix<f64>, edges: &[[usize; 2]]) -> EdgeEdgeDistanceType {
        let [ea0, ea1, eb0, eb1] = self.positions(vertices, edges);
        edge_edge_distance_type(&ea0, &ea1, &eb0, &eb1)
    }

    /// Squared distance between the edges.
    #[must_use]
    pub fn compute_distance(&self, vertices: &DMatrix<f64>, edges: &[[usize; 2]], _faces: &[[usize; 3]]) -> f64 {
        let [ea0, ea1, eb0, eb1] = self.positions(vertices, edges);
        let dtype = edge_edge_distance_type(&ea0, &ea1, &eb0, &eb1);
        edge_edge_distance(&ea0, &ea1, &eb0, &eb1, dtype)
    }

    /// Mollifier weight for the current positions.
    #[must_use]
    pub fn compute_mollifier(&self, vertices: &DMatrix<f64>, edges: &[[usize; 2]]) -> f64 {
        let [ea0, ea1, eb0, eb1] = self.positions(vertices, edges);
        edge_edge_mollifier(&ea0, &ea1, &eb0, &eb1, self.eps_x)
    }

    /// `m · B(d²)`.
    #[must_use]
    pub fn compute_potential(
        &self,
        vertices: &DMatrix<f64>,
        edges: &[[usize; 2]],
        faces: &[[usize; 3]],
        params: &BarrierParams,
    ) -> f64 {
        let distance = self.compute_distance(vertices, edges, faces);
        let (x, t) = barrier_arguments(distance, params);
        let b = barrier(x, t);
        if b == 0.0 {
            return 0.0;
        }
        self.compute_mollifier(vertices, edges) * b
    }

    /// `B ∇m + m b' ∇d²`.
    #[must_use]
    pub fn compute_potential_gradient(
        &self,
        vertices: &DMatrix<f64>,
        edges: &[[usize; 2]],
        _faces: &[[usize; 3]],
        params: &BarrierParams,
    ) -> VectorMax12 {
        let dim = vertices.ncols();
        let [ea0, ea1, eb0, eb1] = self.positions(vertices, edges);

        let dtype = edge_edge_distance_type(&ea0, &ea1, &eb0, &eb1);
        let distance = edge_edge_distance(&ea0, &ea1, &eb0, &eb1, dtype);
        let (x, t) = barrier_arguments(distance, params);
        let b = barrier(x, t);
        if b == 0.0 {
            return VectorMax12::zeros(4 * dim);
        }
        let grad_b = barrier_gradient(x, t);
        let distance_grad = VectorMax12::from_stencil(
            &edge_edge_distance_gradient(&ea0, &ea1, &eb0, &eb1, dtype),
            dim,
        );

        let mollifier = edge_edge_mollifier(&ea0, &ea1, &eb0, &eb1, self.eps_x);
        let mollifier_grad = VectorMax12::from_stencil(
            &edge_edge_mollifier_gradient(&ea0, &ea1, &eb0, &eb1, self.eps_x),
            dim,
        );

        mollifier_grad * b + distance_grad * (mollifier * grad_b)
    }

    /// Full product-rule Hessian of `m · B(d²)`, optionally projected to PSD
    /// as a whole.
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
        let [ea0, ea1, eb0, eb1] = self.positions(vertices, edges);

        let dtype = edge_edge_distance_type(&ea0, &ea1, &eb0, &eb1);
        let distance = edge_edge_distance(&ea0, &ea1, &eb0, &eb1, dtype);
        let (x, t) = barrier_arguments(distance, params);
        let b = barrier(x, t);
        if b == 0.0 {
            return MatrixMax12::zeros(4 * dim);
        }
        let grad_b = barrier_gradient(x, t);
        let hess_b = barrier_hessian(x, t);
        debug_assert!(hess_b >= 0.0, "barrier second derivative must be non-negative, got {hess_b}");

        let distance_grad = VectorMax12::from_stencil(
            &edge_edge_distance_gradient(&ea0, &ea1, &eb0, &eb1, dtype),
            dim,
        );
        let distance_hess = MatrixMax12::from_stencil(
            &edge_edge_distance_hessian(&ea0, &ea1, &eb0, &eb1, dtype),
            dim,
        );

        let mollifier = edge_edge_mollifier(&ea0, &ea1, &eb0, &eb1, self.eps_x);
        let mollifier_grad = VectorMax12::from_stencil(
            &edge_edge_mollifier_gradient(&ea0, &ea1, &eb0, &eb1, self.eps_x),
            dim,
        );
        let mollifier_hess = MatrixMax12::from_stencil(
            &edge_edge_mollifier_hessian(&ea0, &ea1, &eb0, &eb1, self.eps_x),
            dim,
        );

        let hess = mollifier_hess * b
            + (distance_grad.outer(&mollifier_grad) + mollifier_grad.outer(&distance_grad)) * grad_b
            + (distance_grad.outer(&distance_grad) * hess_b + distance_hess * grad_b) * mollifier;

        if project_hessian_to_psd {
            hess.project_to_psd()
        } else {
            hess
        }
    }
}
