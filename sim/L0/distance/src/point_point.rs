//! Point-point squared distance.

use nalgebra::{Matrix3, Vector3};

use crate::{Matrix6, Vector6};

/// Squared distance `|p0 - p1|²`.
#[must_use]
pub fn point_point_distance(p0: &Vector3<f64>, p1: &Vector3<f64>) -> f64 {
    (p0 - p1).norm_squared()
}

/// Gradient of [`point_point_distance`] with respect to `(p0, p1)`.
#[must_use]
pub fn point_point_distance_gradient(p0: &Vector3<f64>, p1: &Vector3<f64>) -> Vector6 {
    let diff = (p0 - p1) * 2.0;
    let mut grad = Vector6::zeros();
    grad.fixed_rows_mut::<3>(0).copy_from(&diff);
    grad.fixed_rows_mut::<3>(3).copy_from(&(-diff));
    grad
}

/// Hessian of [`point_point_distance`] with respect to `(p0, p1)`.
///
/// Constant: `[[2I, -2I], [-2I, 2I]]`.
#[must_use]
pub fn point_point_distance_hessian(_p0: &Vector3<f64>, _p1: &Vector3<f64>) -> Matrix6 {
    let block = Matrix3::identity() * 2.0;
    let mut hess = Matrix6::zeros();
    hess.fixed_view_mut::<3, 3>(0, 0).copy_from(&block);
    hess.fixed_view_mut::<3, 3>(3, 3).copy_from(&block);
    hess.fixed_view_mut::<3, 3>(0, 3).copy_from(&(-block));
    hess.fixed_view_mut::<3, 3>(3, 0).copy_from(&(-block));
    hess
}
