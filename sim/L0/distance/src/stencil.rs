//! Helpers for moving derivatives between local stencils.
//!
//! Most distances are written in terms of a few difference vectors
//! (`p - e0`, `e1 - e0`, ...). [`difference_map`] builds the linear map from
//! stacked points to those differences, so the point-space derivatives are
//! `Lᵀ g` and `Lᵀ H L`. The scatter helpers embed a sub-case result (e.g. a
//! point-point distance inside a point-triangle stencil) into the full layout.

use nalgebra::{Matrix3, SMatrix, SVector, Vector3};

/// Skew-symmetric matrix `[v]ₓ` with `[v]ₓ a = v × a`.
pub(crate) fn cross_matrix(v: &Vector3<f64>) -> Matrix3<f64> {
    Matrix3::new(0.0, -v.z, v.y, v.z, 0.0, -v.x, -v.y, v.x, 0.0)
}

/// Linear map from `C / 3` stacked points to `R / 3` stacked differences.
///
/// Each entry `(difference, point, sign)` adds `sign * point` to the
/// given difference vector.
pub(crate) fn difference_map<const R: usize, const C: usize>(
    entries: &[(usize, usize, f64)],
) -> SMatrix<f64, R, C> {
    let mut map = SMatrix::<f64, R, C>::zeros();
    for &(row, col, sign) in entries {
        for k in 0..3 {
            map[(3 * row + k, 3 * col + k)] = sign;
        }
    }
    map
}

/// Place the per-point blocks of `local` at the point `slots` of a larger stencil.
pub(crate) fn scatter_gradient<const N: usize, const M: usize>(
    local: &SVector<f64, N>,
    slots: &[usize],
) -> SVector<f64, M> {
    debug_assert_eq!(slots.len() * 3, N);
    let mut out = SVector::<f64, M>::zeros();
    for (k, &slot) in slots.iter().enumerate() {
        out.fixed_rows_mut::<3>(3 * slot)
            .copy_from(&local.fixed_rows::<3>(3 * k));
    }
    out
}

/// Hessian counterpart of [`scatter_gradient`].
pub(crate) fn scatter_hessian<const N: usize, const M: usize>(
    local: &SMatrix<f64, N, N>,
    slots: &[usize],
) -> SMatrix<f64, M, M> {
    debug_assert_eq!(slots.len() * 3, N);
    let mut out = SMatrix::<f64, M, M>::zeros();
    for (a, &slot_a) in slots.iter().enumerate() {
        for (b, &slot_b) in slots.iter().enumerate() {
            out.fixed_view_mut::<3, 3>(3 * slot_a, 3 * slot_b)
                .copy_from(&local.fixed_view::<3, 3>(3 * a, 3 * b));
        }
    }
    out
}

/// Jacobian of `n = e1 × e2` with respect to `(e1, e2)`.
pub(crate) fn cross_jacobian(e1: &Vector3<f64>, e2: &Vector3<f64>) -> SMatrix<f64, 3, 6> {
    let mut jac = SMatrix::<f64, 3, 6>::zeros();
    jac.fixed_view_mut::<3, 3>(0, 0).copy_from(&(-cross_matrix(e2)));
    jac.fixed_view_mut::<3, 3>(0, 3).copy_from(&cross_matrix(e1));
    jac
}

/// Hessian of the scalar `λ · (e1 × e2)` with respect to `(e1, e2)`, for fixed `λ`.
pub(crate) fn cross_curvature(lambda: &Vector3<f64>) -> SMatrix<f64, 6, 6> {
    // λ · (e1 × e2) = e1ᵀ (-[λ]ₓ) e2
    let skew = cross_matrix(lambda);
    let mut hess = SMatrix::<f64, 6, 6>::zeros();
    hess.fixed_view_mut::<3, 3>(0, 3).copy_from(&(-skew));
    hess.fixed_view_mut::<3, 3>(3, 0).copy_from(&skew);
    hess
}

/// `(w·n)² / (n·n)` with `n = e1 × e2`, the squared distance from the
/// origin-relative point `w` to the plane spanned by `e1` and `e2`.
pub(crate) fn plane_projection(w: &Vector3<f64>, e1: &Vector3<f64>, e2: &Vector3<f64>) -> f64 {
    let n = e1.cross(e2);
    let c = w.dot(&n);
    c * c / n.norm_squared()
}

/// Gradient of [`plane_projection`] with respect to `(w, e1, e2)`.
pub(crate) fn plane_projection_gradient(
    w: &Vector3<f64>,
    e1: &Vector3<f64>,
    e2: &Vector3<f64>,
) -> SVector<f64, 9> {
    let n = e1.cross(e2);
    let c = w.dot(&n);
    let q = n.norm_squared();

    let grad_w = n * (2.0 * c / q);
    let grad_n = w * (2.0 * c / q) - n * (2.0 * c * c / (q * q));

    let mut grad = SVector::<f64, 9>::zeros();
    grad.fixed_rows_mut::<3>(0).copy_from(&grad_w);
    grad.fixed_rows_mut::<6>(3)
        .copy_from(&(cross_jacobian(e1, e2).transpose() * grad_n));
    grad
}

/// Hessian of [`plane_projection`] with respect to `(w, e1, e2)`.
pub(crate) fn plane_projection_hessian(
    w: &Vector3<f64>,
    e1: &Vector3<f64>,
    e2: &Vector3<f64>,
) -> SMatrix<f64, 9, 9> {
    let n = e1.cross(e2);
    let c = w.dot(&n);
    let q = n.norm_squared();
    let q2 = q * q;
    let identity = Matrix3::identity();

    let grad_n = w * (2.0 * c / q) - n * (2.0 * c * c / q2);

    // Second derivatives of g(w, n) = (w·n)² / (n·n).
    let g_ww = n * n.transpose() * (2.0 / q);
    let g_wn = (n * w.transpose() + identity * c) * (2.0 / q) - n * n.transpose() * (4.0 * c / q2);
    let g_nn = w * w.transpose() * (2.0 / q)
        - (w * n.transpose() + n * w.transpose()) * (4.0 * c / q2)
        - identity * (2.0 * c * c / q2)
        + n * n.transpose() * (8.0 * c * c / (q2 * q));

    let mut g = SMatrix::<f64, 6, 6>::zeros();
    g.fixed_view_mut::<3, 3>(0, 0).copy_from(&g_ww);
    g.fixed_view_mut::<3, 3>(0, 3).copy_from(&g_wn);
    g.fixed_view_mut::<3, 3>(3, 0).copy_from(&g_wn.transpose());
    g.fixed_view_mut::<3, 3>(3, 3).copy_from(&g_nn);

    // (w, e1, e2) -> (w, n)
    let mut jac = SMatrix::<f64, 6, 9>::zeros();
    jac.fixed_view_mut::<3, 3>(0, 0).copy_from(&identity);
    jac.fixed_view_mut::<3, 6>(3, 3)
        .copy_from(&cross_jacobian(e1, e2));

    let mut hess = jac.transpose() * g * jac;
    let curvature = cross_curvature(&grad_n);
    let mut lower = hess.fixed_view_mut::<6, 6>(3, 3);
    lower += curvature;
    hess
}
