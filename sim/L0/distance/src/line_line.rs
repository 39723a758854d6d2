//! Squared distance between the infinite lines through two edges.

use nalgebra::{SMatrix, Vector3};

use crate::stencil::{
    difference_map, plane_projection, plane_projection_gradient, plane_projection_hessian,
};
use crate::{Matrix12, Vector12};

/// `(ea0, ea1, eb0, eb1) -> (eb0 - ea0, ea1 - ea0, eb1 - eb0)`.
fn line_line_map() -> SMatrix<f64, 9, 12> {
    difference_map(&[
        (0, 2, 1.0),
        (0, 0, -1.0),
        (1, 1, 1.0),
        (1, 0, -1.0),
        (2, 3, 1.0),
        (2, 2, -1.0),
    ])
}

/// Squared distance between the line through `ea0, ea1` and the line through `eb0, eb1`.
///
/// Undefined for parallel lines; see [`crate::edge_edge_distance_type`], which
/// never selects this case for them.
#[must_use]
pub fn line_line_distance(
    ea0: &Vector3<f64>,
    ea1: &Vector3<f64>,
    eb0: &Vector3<f64>,
    eb1: &Vector3<f64>,
) -> f64 {
    plane_projection(&(eb0 - ea0), &(ea1 - ea0), &(eb1 - eb0))
}

/// Gradient of [`line_line_distance`] with respect to `(ea0, ea1, eb0, eb1)`.
#[must_use]
pub fn line_line_distance_gradient(
    ea0: &Vector3<f64>,
    ea1: &Vector3<f64>,
    eb0: &Vector3<f64>,
    eb1: &Vector3<f64>,
) -> Vector12 {
    line_line_map().transpose() * plane_projection_gradient(&(eb0 - ea0), &(ea1 - ea0), &(eb1 - eb0))
}

/// Hessian of [`line_line_distance`] with respect to `(ea0, ea1, eb0, eb1)`.
#[must_use]
pub fn line_line_distance_hessian(
    ea0: &Vector3<f64>,
    ea1: &Vector3<f64>,
    eb0: &Vector3<f64>,
    eb1: &Vector3<f64>,
) -> Matrix12 {
    let map = line_line_map();
    map.transpose() * plane_projection_hessian(&(eb0 - ea0), &(ea1 - ea0), &(eb1 - eb0)) * map
}
