//! Point-triangle squared distance.

use nalgebra::{SMatrix, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::point_edge::{PointEdgeDistanceType, point_edge_distance, point_edge_distance_type};
use crate::point_line::{
    point_line_distance, point_line_distance_gradient, point_line_distance_hessian,
};
use crate::point_point::{
    point_point_distance, point_point_distance_gradient, point_point_distance_hessian,
};
use crate::stencil::{
    difference_map, plane_projection, plane_projection_gradient, plane_projection_hessian,
    scatter_gradient, scatter_hessian,
};
use crate::{Matrix12, Vector12};

/// Which feature of the triangle `(t0, t1, t2)` is closest to the point.
///
/// Edge `i` runs from `t_i` to `t_{i+1 mod 3}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PointTriangleDistanceType {
    /// Closest to vertex `t0`.
    Vertex0,
    /// Closest to vertex `t1`.
    Vertex1,
    /// Closest to vertex `t2`.
    Vertex2,
    /// Closest to the interior of edge `t0 t1`.
    Edge0,
    /// Closest to the interior of edge `t1 t2`.
    Edge1,
    /// Closest to the interior of edge `t2 t0`.
    Edge2,
    /// Closest to the triangle interior.
    Face,
}

impl PointTriangleDistanceType {
    const VERTICES: [Self; 3] = [Self::Vertex0, Self::Vertex1, Self::Vertex2];
    const EDGES: [Self; 3] = [Self::Edge0, Self::Edge1, Self::Edge2];
}

/// Classify the closest triangle feature.
///
/// A point whose projection falls inside the triangle is closest to the
/// face. Otherwise the closest of the three edges decides, reduced to a
/// vertex when the edge's own projection is clamped.
#[must_use]
pub fn point_triangle_distance_type(
    p: &Vector3<f64>,
    t0: &Vector3<f64>,
    t1: &Vector3<f64>,
    t2: &Vector3<f64>,
) -> PointTriangleDistanceType {
    let corners = [t0, t1, t2];
    let normal = (t1 - t0).cross(&(t2 - t0));

    let inside = normal.norm_squared() > 0.0
        && (0..3).all(|i| {
            let a = corners[i];
            let b = corners[(i + 1) % 3];
            (b - a).cross(&(p - a)).dot(&normal) >= 0.0
        });
    if inside {
        return PointTriangleDistanceType::Face;
    }

    let mut best = (f64::INFINITY, PointTriangleDistanceType::Face);
    for i in 0..3 {
        let a = corners[i];
        let b = corners[(i + 1) % 3];
        let edge_type = point_edge_distance_type(p, a, b);
        let distance = point_edge_distance(p, a, b, edge_type);
        if distance < best.0 {
            let feature = match edge_type {
                PointEdgeDistanceType::Vertex0 => PointTriangleDistanceType::VERTICES[i],
                PointEdgeDistanceType::Vertex1 => PointTriangleDistanceType::VERTICES[(i + 1) % 3],
                PointEdgeDistanceType::Edge => PointTriangleDistanceType::EDGES[i],
            };
            best = (distance, feature);
        }
    }
    best.1
}

/// `(p, t0, t1, t2) -> (p - t0, t1 - t0, t2 - t0)`.
fn face_map() -> SMatrix<f64, 9, 12> {
    difference_map(&[
        (0, 0, 1.0),
        (0, 1, -1.0),
        (1, 2, 1.0),
        (1, 1, -1.0),
        (2, 3, 1.0),
        (2, 1, -1.0),
    ])
}

/// Squared point-triangle distance for the given sub-case.
#[must_use]
pub fn point_triangle_distance(
    p: &Vector3<f64>,
    t0: &Vector3<f64>,
    t1: &Vector3<f64>,
    t2: &Vector3<f64>,
    dtype: PointTriangleDistanceType,
) -> f64 {
    match dtype {
        PointTriangleDistanceType::Vertex0 => point_point_distance(p, t0),
        PointTriangleDistanceType::Vertex1 => point_point_distance(p, t1),
        PointTriangleDistanceType::Vertex2 => point_point_distance(p, t2),
        PointTriangleDistanceType::Edge0 => point_line_distance(p, t0, t1),
        PointTriangleDistanceType::Edge1 => point_line_distance(p, t1, t2),
        PointTriangleDistanceType::Edge2 => point_line_distance(p, t2, t0),
        PointTriangleDistanceType::Face => plane_projection(&(p - t0), &(t1 - t0), &(t2 - t0)),
    }
}

/// Gradient of [`point_triangle_distance`] with respect to `(p, t0, t1, t2)`.
#[must_use]
pub fn point_triangle_distance_gradient(
    p: &Vector3<f64>,
    t0: &Vector3<f64>,
    t1: &Vector3<f64>,
    t2: &Vector3<f64>,
    dtype: PointTriangleDistanceType,
) -> Vector12 {
    match dtype {
        PointTriangleDistanceType::Vertex0 => {
            scatter_gradient(&point_point_distance_gradient(p, t0), &[0, 1])
        }
        PointTriangleDistanceType::Vertex1 => {
            scatter_gradient(&point_point_distance_gradient(p, t1), &[0, 2])
        }
        PointTriangleDistanceType::Vertex2 => {
            scatter_gradient(&point_point_distance_gradient(p, t2), &[0, 3])
        }
        PointTriangleDistanceType::Edge0 => {
            scatter_gradient(&point_line_distance_gradient(p, t0, t1), &[0, 1, 2])
        }
        PointTriangleDistanceType::Edge1 => {
            scatter_gradient(&point_line_distance_gradient(p, t1, t2), &[0, 2, 3])
        }
        PointTriangleDistanceType::Edge2 => {
            scatter_gradient(&point_line_distance_gradient(p, t2, t0), &[0, 3, 1])
        }
        PointTriangleDistanceType::Face => {
            face_map().transpose() * plane_projection_gradient(&(p - t0), &(t1 - t0), &(t2 - t0))
        }
    }
}

/// Hessian of [`point_triangle_distance`] with respect to `(p, t0, t1, t2)`.
#[must_use]
pub fn point_triangle_distance_hessian(
    p: &Vector3<f64>,
    t0: &Vector3<f64>,
    t1: &Vector3<f64>,
    t2: &Vector3<f64>,
    dtype: PointTriangleDistanceType,
) -> Matrix12 {
    match dtype {
        PointTriangleDistanceType::Vertex0 => {
            scatter_hessian(&point_point_distance_hessian(p, t0), &[0, 1])
        }
        PointTriangleDistanceType::Vertex1 => {
            scatter_hessian(&point_point_distance_hessian(p, t1), &[0, 2])
        }
        PointTriangleDistanceType::Vertex2 => {
            scatter_hessian(&point_point_distance_hessian(p, t2), &[0, 3])
        }
        PointTriangleDistanceType::Edge0 => {
            scatter_hessian(&point_line_distance_hessian(p, t0, t1), &[0, 1, 2])
        }
        PointTriangleDistanceType::Edge1 => {
            scatter_hessian(&point_line_distance_hessian(p, t1, t2), &[0, 2, 3])
        }
        PointTriangleDistanceType::Edge2 => {
            scatter_hessian(&point_line_distance_hessian(p, t2, t0), &[0, 3, 1])
        }
        PointTriangleDistanceType::Face => {
            let map = face_map();
            map.transpose() * plane_projection_hessian(&(p - t0), &(t1 - t0), &(t2 - t0)) * map
        }
    }
}
