//! Point-edge squared distance.
//!
//! A point is closest either to one of the edge endpoints or to the edge
//! interior. The interior case is the point-line distance.

use nalgebra::Vector3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::point_line::{
    point_line_distance, point_line_distance_gradient, point_line_distance_hessian,
};
use crate::point_point::{
    point_point_distance, point_point_distance_gradient, point_point_distance_hessian,
};
use crate::stencil::{scatter_gradient, scatter_hessian};
use crate::{Matrix9, Vector9};

/// Which feature of the edge `(e0, e1)` is closest to the point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PointEdgeDistanceType {
    /// Closest to endpoint `e0`.
    Vertex0,
    /// Closest to endpoint `e1`.
    Vertex1,
    /// Closest to the edge interior.
    Edge,
}

/// Classify the closest feature by the clamped projection parameter.
#[must_use]
pub fn point_edge_distance_type(
    p: &Vector3<f64>,
    e0: &Vector3<f64>,
    e1: &Vector3<f64>,
) -> PointEdgeDistanceType {
    let e = e1 - e0;
    let length_sq = e.norm_squared();
    if length_sq <= 0.0 {
        return PointEdgeDistanceType::Vertex0;
    }
    let t = (p - e0).dot(&e) / length_sq;
    if t < 0.0 {
        PointEdgeDistanceType::Vertex0
    } else if t > 1.0 {
        PointEdgeDistanceType::Vertex1
    } else {
        PointEdgeDistanceType::Edge
    }
}

/// Squared point-edge distance for the given sub-case.
#[must_use]
pub fn point_edge_distance(
    p: &Vector3<f64>,
    e0: &Vector3<f64>,
    e1: &Vector3<f64>,
    dtype: PointEdgeDistanceType,
) -> f64 {
    match dtype {
        PointEdgeDistanceType::Vertex0 => point_point_distance(p, e0),
        PointEdgeDistanceType::Vertex1 => point_point_distance(p, e1),
        PointEdgeDistanceType::Edge => point_line_distance(p, e0, e1),
    }
}

/// Gradient of [`point_edge_distance`] with respect to `(p, e0, e1)`.
#[must_use]
pub fn point_edge_distance_gradient(
    p: &Vector3<f64>,
    e0: &Vector3<f64>,
    e1: &Vector3<f64>,
    dtype: PointEdgeDistanceType,
) -> Vector9 {
    match dtype {
        PointEdgeDistanceType::Vertex0 => {
            scatter_gradient(&point_point_distance_gradient(p, e0), &[0, 1])
        }
        PointEdgeDistanceType::Vertex1 => {
            scatter_gradient(&point_point_distance_gradient(p, e1), &[0, 2])
        }
        PointEdgeDistanceType::Edge => point_line_distance_gradient(p, e0, e1),
    }
}

/// Hessian of [`point_edge_distance`] with respect to `(p, e0, e1)`.
#[must_use]
pub fn point_edge_distance_hessian(
    p: &Vector3<f64>,
    e0: &Vector3<f64>,
    e1: &Vector3<f64>,
    dtype: PointEdgeDistanceType,
) -> Matrix9 {
    match dtype {
        PointEdgeDistanceType::Vertex0 => {
            scatter_hessian(&point_point_distance_hessian(p, e0), &[0, 1])
        }
        PointEdgeDistanceType::Vertex1 => {
            scatter_hessian(&point_point_distance_hessian(p, e1), &[0, 2])
        }
        PointEdgeDistanceType::Edge => point_line_distance_hessian(p, e0, e1),
    }
}
