//! Squared distance from a point to a fixed plane.
//!
//! The plane is static geometry (a floor, a wall), so only the point moves
//! and the local stencil is a single point. The normal need not be unit
//! length: the distance is `((p - o)·n)² / (n·n)`.

use nalgebra::{Matrix3, Vector3};

/// Squared distance from `p` to the plane through `origin` with normal `normal`.
#[must_use]
pub fn point_plane_distance(p: &Vector3<f64>, origin: &Vector3<f64>, normal: &Vector3<f64>) -> f64 {
    let c = (p - origin).dot(normal);
    c * c / normal.norm_squared()
}

/// Gradient of [`point_plane_distance`] with respect to `p`.
#[must_use]
pub fn point_plane_distance_gradient(
    p: &Vector3<f64>,
    origin: &Vector3<f64>,
    normal: &Vector3<f64>,
) -> Vector3<f64> {
    let c = (p - origin).dot(normal);
    normal * (2.0 * c / normal.norm_squared())
}

/// Hessian of [`point_plane_distance`] with respect to `p`. Constant in `p`.
#[must_use]
pub fn point_plane_distance_hessian(
    _p: &Vector3<f64>,
    _origin: &Vector3<f64>,
    normal: &Vector3<f64>,
) -> Matrix3<f64> {
    normal * normal.transpose() * (2.0 / normal.norm_squared())
}
