//! Mollifier for nearly parallel edge-edge pairs.
//!
//! The weight is a function of `c = |(ea1 - ea0) × (eb1 - eb0)|²`, which
//! vanishes exactly when the edges are parallel:
//!
//! ```text
//! m(c) = (2 - c / ε) · c / ε    for c < ε
//! m(c) = 1                      otherwise
//! ```
//!
//! `m` is C¹ at `c = ε` (value 1, slope 0) and `m(0) = 0`, so a potential
//! multiplied by `m` fades out continuously as the edges become parallel.

use nalgebra::{Matrix3, SMatrix, SVector, Vector3};

use crate::stencil::{cross_curvature, cross_jacobian, difference_map};
use crate::{Matrix12, Vector12};

/// Scale applied to the rest-geometry product `|ea|²·|eb|²` to obtain `ε`.
pub const EDGE_EDGE_MOLLIFIER_SCALE: f64 = 1.0e-3;

/// `(ea0, ea1, eb0, eb1) -> (ea1 - ea0, eb1 - eb0)`.
fn edge_vectors_map() -> SMatrix<f64, 6, 12> {
    difference_map(&[(0, 1, 1.0), (0, 0, -1.0), (1, 3, 1.0), (1, 2, -1.0)])
}

/// Mollifier threshold `ε` from the rest positions of the two edges.
#[must_use]
pub fn edge_edge_mollifier_threshold(
    ea0_rest: &Vector3<f64>,
    ea1_rest: &Vector3<f64>,
    eb0_rest: &Vector3<f64>,
    eb1_rest: &Vector3<f64>,
) -> f64 {
    EDGE_EDGE_MOLLIFIER_SCALE
        * (ea0_rest - ea1_rest).norm_squared()
        * (eb0_rest - eb1_rest).norm_squared()
}

/// `|(ea1 - ea0) × (eb1 - eb0)|²`.
#[must_use]
pub fn edge_edge_cross_squarednorm(
    ea0: &Vector3<f64>,
    ea1: &Vector3<f64>,
    eb0: &Vector3<f64>,
    eb1: &Vector3<f64>,
) -> f64 {
    (ea1 - ea0).cross(&(eb1 - eb0)).norm_squared()
}

/// Gradient of [`edge_edge_cross_squarednorm`].
#[must_use]
pub fn edge_edge_cross_squarednorm_gradient(
    ea0: &Vector3<f64>,
    ea1: &Vector3<f64>,
    eb0: &Vector3<f64>,
    eb1: &Vector3<f64>,
) -> Vector12 {
    let e1 = ea1 - ea0;
    let e2 = eb1 - eb0;
    let n = e1.cross(&e2);
    let grad: SVector<f64, 6> = cross_jacobian(&e1, &e2).transpose() * (n * 2.0);
    edge_vectors_map().transpose() * grad
}

/// Hessian of [`edge_edge_cross_squarednorm`].
#[must_use]
pub fn edge_edge_cross_squarednorm_hessian(
    ea0: &Vector3<f64>,
    ea1: &Vector3<f64>,
    eb0: &Vector3<f64>,
    eb1: &Vector3<f64>,
) -> Matrix12 {
    let e1 = ea1 - ea0;
    let e2 = eb1 - eb0;
    let n = e1.cross(&e2);
    let jac = cross_jacobian(&e1, &e2);
    let hess = jac.transpose() * (Matrix3::identity() * 2.0) * jac + cross_curvature(&(n * 2.0));
    let map = edge_vectors_map();
    map.transpose() * hess * map
}

fn mollifier(c: f64, eps_x: f64) -> f64 {
    if c < eps_x {
        let ratio = c / eps_x;
        (2.0 - ratio) * ratio
    } else {
        1.0
    }
}

fn mollifier_derivative(c: f64, eps_x: f64) -> f64 {
    if c < eps_x {
        2.0 * (eps_x - c) / (eps_x * eps_x)
    } else {
        0.0
    }
}

fn mollifier_second_derivative(c: f64, eps_x: f64) -> f64 {
    if c < eps_x {
        -2.0 / (eps_x * eps_x)
    } else {
        0.0
    }
}

/// Mollifier weight of the edge pair for threshold `eps_x`.
#[must_use]
pub fn edge_edge_mollifier(
    ea0: &Vector3<f64>,
    ea1: &Vector3<f64>,
    eb0: &Vector3<f64>,
    eb1: &Vector3<f64>,
    eps_x: f64,
) -> f64 {
    mollifier(edge_edge_cross_squarednorm(ea0, ea1, eb0, eb1), eps_x)
}

/// Gradient of [`edge_edge_mollifier`] with respect to `(ea0, ea1, eb0, eb1)`.
#[must_use]
pub fn edge_edge_mollifier_gradient(
    ea0: &Vector3<f64>,
    ea1: &Vector3<f64>,
    eb0: &Vector3<f64>,
    eb1: &Vector3<f64>,
    eps_x: f64,
) -> Vector12 {
    let c = edge_edge_cross_squarednorm(ea0, ea1, eb0, eb1);
    if c >= eps_x {
        return Vector12::zeros();
    }
    edge_edge_cross_squarednorm_gradient(ea0, ea1, eb0, eb1) * mollifier_derivative(c, eps_x)
}

/// Hessian of [`edge_edge_mollifier`] with respect to `(ea0, ea1, eb0, eb1)`.
#[must_use]
pub fn edge_edge_mollifier_hessian(
    ea0: &Vector3<f64>,
    ea1: &Vector3<f64>,
    eb0: &Vector3<f64>,
    eb1: &Vector3<f64>,
    eps_x: f64,
) -> Matrix12 {
    let c = edge_edge_cross_squarednorm(ea0, ea1, eb0, eb1);
    if c >= eps_x {
        return Matrix12::zeros();
    }
    let grad_c = edge_edge_cross_squarednorm_gradient(ea0, ea1, eb0, eb1);
    let hess_c = edge_edge_cross_squarednorm_hessian(ea0, ea1, eb0, eb1);
    grad_c * grad_c.transpose() * mollifier_second_derivative(c, eps_x)
        + hess_c * mollifier_derivative(c, eps_x)
}
