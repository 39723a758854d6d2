//! Shared scenes and finite-difference checks.
//!
//! Finite differences perturb one global vertex coordinate at a time and map
//! the result back to the constraint's local layout through
//! `vertex_indices`, so the checks exercise the same indexing a caller uses
//! to scatter local blocks.

use nalgebra::{DMatrix, DVector};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sim_ipc::{BarrierParams, ConstraintRef, MatrixMax12, VectorMax12};

/// Central-difference step.
pub const FD_STEP: f64 = 1e-6;

/// Relative tolerance for analytic vs. finite-difference derivatives.
pub const FD_TOL: f64 = 1e-5;

/// Tolerance on the smallest eigenvalue of a projected Hessian, relative to
/// its largest entry.
pub const PSD_TOL: f64 = 1e-9;

/// Mesh data consumed by every constraint evaluation.
#[derive(Debug, Clone)]
pub struct Scene {
    pub vertices: DMatrix<f64>,
    pub edges: Vec<[usize; 2]>,
    pub faces: Vec<[usize; 3]>,
}

impl Scene {
    /// Four vertices with edges `[0,1]`, `[2,3]`, `[1,2]` and face `[1,2,3]`.
    pub fn four_points(vertices: DMatrix<f64>) -> Self {
        Self {
            vertices,
            edges: vec![[0, 1], [2, 3], [1, 2]],
            faces: vec![[1, 2, 3]],
        }
    }

    /// Build from rows of 3D points.
    pub fn from_rows(points: &[[f64; 3]]) -> Self {
        Self::four_points(DMatrix::from_fn(points.len(), 3, |i, j| points[i][j]))
    }

    pub fn dim(&self) -> usize {
        self.vertices.ncols()
    }

    pub fn distance(&self, c: ConstraintRef<'_>) -> f64 {
        c.compute_distance(&self.vertices, &self.edges, &self.faces)
    }

    pub fn potential(&self, c: ConstraintRef<'_>, params: &BarrierParams) -> f64 {
        c.compute_potential(&self.vertices, &self.edges, &self.faces, params)
    }

    pub fn gradient(&self, c: ConstraintRef<'_>, params: &BarrierParams) -> VectorMax12 {
        c.compute_potential_gradient(&self.vertices, &self.edges, &self.faces, params)
    }

    pub fn hessian(&self, c: ConstraintRef<'_>, params: &BarrierParams, project: bool) -> MatrixMax12 {
        c.compute_potential_hessian(&self.vertices, &self.edges, &self.faces, params, project)
    }

    /// Copy with one global coordinate shifted.
    fn perturbed(&self, vertex: usize, coord: usize, delta: f64) -> Self {
        let mut out = self.clone();
        out.vertices[(vertex, coord)] += delta;
        out
    }

    /// `(vertex, coordinate)` for each local DOF of `c`.
    fn local_dofs(&self, c: ConstraintRef<'_>) -> Vec<(usize, usize)> {
        let dim = self.dim();
        c.vertex_indices(&self.edges, &self.faces)
            .iter()
            .flat_map(|&v| (0..dim).map(move |k| (v, k)))
            .collect()
    }

    /// Central differences of the potential in local DOF order.
    pub fn fd_gradient(&self, c: ConstraintRef<'_>, params: &BarrierParams) -> DVector<f64> {
        let dofs = self.local_dofs(c);
        DVector::from_fn(dofs.len(), |l, _| {
            let (v, k) = dofs[l];
            let forward = self.perturbed(v, k, FD_STEP).potential(c, params);
            let backward = self.perturbed(v, k, -FD_STEP).potential(c, params);
            (forward - backward) / (2.0 * FD_STEP)
        })
    }

    /// Central differences of the analytic gradient in local DOF order.
    pub fn fd_hessian(&self, c: ConstraintRef<'_>, params: &BarrierParams) -> DMatrix<f64> {
        let dofs = self.local_dofs(c);
        let n = dofs.len();
        let mut hess = DMatrix::zeros(n, n);
        for (l, &(v, k)) in dofs.iter().enumerate() {
            let forward = self.perturbed(v, k, FD_STEP).gradient(c, params).to_dvector();
            let backward = self.perturbed(v, k, -FD_STEP).gradient(c, params).to_dvector();
            hess.set_column(l, &((forward - backward) / (2.0 * FD_STEP)));
        }
        hess
    }
}

/// Seeded generator for reproducible random scenes.
pub fn rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Random vertex matrix in `[-1, 1]^dim`.
pub fn random_vertices(rng: &mut StdRng, count: usize, dim: usize) -> DMatrix<f64> {
    DMatrix::from_fn(count, dim, |_, _| rng.gen_range(-1.0..1.0))
}

/// Smallest distance between any two rows.
pub fn min_pairwise_distance(vertices: &DMatrix<f64>) -> f64 {
    let mut min = f64::INFINITY;
    for i in 0..vertices.nrows() {
        for j in (i + 1)..vertices.nrows() {
            min = min.min((vertices.row(i) - vertices.row(j)).norm());
        }
    }
    min
}

/// Barrier parameters that put a pair at squared distance `distance_sqr`
/// well inside the active band, with a non-zero clearance.
pub fn active_params(distance_sqr: f64) -> BarrierParams {
    let d = distance_sqr.sqrt();
    BarrierParams::new(d).with_min_distance(0.5 * d)
}

pub fn assert_gradient_matches(analytic: &VectorMax12, numeric: &DVector<f64>, context: &str) {
    assert_eq!(analytic.len(), numeric.len(), "{context}: gradient size");
    let scale = 1.0 + analytic.amax();
    for i in 0..numeric.len() {
        assert!(
            (analytic[i] - numeric[i]).abs() <= FD_TOL * scale,
            "{context}: gradient[{i}] analytic {} vs numeric {}",
            analytic[i],
            numeric[i]
        );
    }
}

pub fn assert_hessian_matches(analytic: &MatrixMax12, numeric: &DMatrix<f64>, context: &str) {
    assert_eq!(analytic.dim(), numeric.nrows(), "{context}: hessian size");
    let scale = 1.0 + analytic.amax();
    for i in 0..numeric.nrows() {
        for j in 0..numeric.ncols() {
            assert!(
                (analytic[(i, j)] - numeric[(i, j)]).abs() <= FD_TOL * scale,
                "{context}: hessian[({i}, {j})] analytic {} vs numeric {}",
                analytic[(i, j)],
                numeric[(i, j)]
            );
        }
    }
}

pub fn assert_psd(hess: &MatrixMax12, context: &str) {
    let min = hess.symmetric_eigenvalues().min();
    assert!(
        min >= -PSD_TOL * (1.0 + hess.amax()),
        "{context}: smallest eigenvalue {min}"
    );
}
