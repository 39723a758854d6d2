//! Squared distance from a point to the infinite line through an edge.

use nalgebra::{Matrix3, SMatrix, SVector, Vector3};

use crate::stencil::difference_map;
use crate::{Matrix9, Vector9};

/// `(p, e0, e1) -> (u, v)` with `u = p - e0`, `v = e1 - e0`.
fn line_map() -> SMatrix<f64, 6, 9> {
    difference_map(&[(0, 0, 1.0), (0, 1, -1.0), (1, 1, -1.0), (1, 2, 1.0)])
}

/// Squared distance from `p` to the line through `e0` and `e1`.
///
/// Computed as `|(e0 - p) × (e1 - p)|² / |e1 - e0|²`. Undefined for a
/// zero-length edge.
#[must_use]
pub fn point_line_distance(p: &Vector3<f64>, e0: &Vector3<f64>, e1: &Vector3<f64>) -> f64 {
    (e0 - p).cross(&(e1 - p)).norm_squared() / (e1 - e0).norm_squared()
}

/// Gradient of [`point_line_distance`] with respect to `(p, e0, e1)`.
#[must_use]
pub fn point_line_distance_gradient(
    p: &Vector3<f64>,
    e0: &Vector3<f64>,
    e1: &Vector3<f64>,
) -> Vector9 {
    // f(u, v) = u·u - (u·v)² / (v·v)
    let u = p - e0;
    let v = e1 - e0;
    let a = u.dot(&v);
    let b = v.norm_squared();

    let grad_u = u * 2.0 - v * (2.0 * a / b);
    let grad_v = u * (-2.0 * a / b) + v * (2.0 * a * a / (b * b));

    let mut grad = SVector::<f64, 6>::zeros();
    grad.fixed_rows_mut::<3>(0).copy_from(&grad_u);
    grad.fixed_rows_mut::<3>(3).copy_from(&grad_v);
    line_map().transpose() * grad
}

/// Hessian of [`point_line_distance`] with respect to `(p, e0, e1)`.
#[must_use]
pub fn point_line_distance_hessian(
    p: &Vector3<f64>,
    e0: &Vector3<f64>,
    e1: &Vector3<f64>,
) -> Matrix9 {
    let u = p - e0;
    let v = e1 - e0;
    let a = u.dot(&v);
    let b = v.norm_squared();
    let b2 = b * b;
    let identity = Matrix3::identity();
    let vvt = v * v.transpose();

    let h_uu = identity * 2.0 - vvt * (2.0 / b);
    let h_uv = (v * u.transpose() + identity * a) * (-2.0 / b) + vvt * (4.0 * a / b2);
    let h_vv = u * u.transpose() * (-2.0 / b)
        + (u * v.transpose() + v * u.transpose()) * (4.0 * a / b2)
        + identity * (2.0 * a * a / b2)
        - vvt * (8.0 * a * a / (b2 * b));

    let mut hess = SMatrix::<f64, 6, 6>::zeros();
    hess.fixed_view_mut::<3, 3>(0, 0).copy_from(&h_uu);
    hess.fixed_view_mut::<3, 3>(0, 3).copy_from(&h_uv);
    hess.fixed_view_mut::<3, 3>(3, 0).copy_from(&h_uv.transpose());
    hess.fixed_view_mut::<3, 3>(3, 3).copy_from(&h_vv);

    let map = line_map();
    map.transpose() * hess * map
}
