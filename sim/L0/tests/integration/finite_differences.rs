//! Analytic potential derivatives against central differences.
//!
//! Every constraint kind is checked on random, well-separated configurations
//! in 3D and (where the kind makes sense in the plane) 2D, with a non-zero
//! minimum distance so the offset is part of the chain rule being tested.

use nalgebra::{DMatrix, Vector3};
use rand::Rng;
use rand::rngs::StdRng;
use sim_distance::edge_edge_cross_squarednorm;
use sim_ipc::{
    CollisionConstraint, EdgeEdgeConstraint, EdgeVertexConstraint, FaceVertexConstraint,
    PlaneVertexConstraint, VertexVertexConstraint,
};

use crate::common::{
    Scene, active_params, assert_gradient_matches, assert_hessian_matches, min_pairwise_distance,
    random_vertices, rng,
};

/// Configurations checked per constraint kind.
const SAMPLES: usize = 8;

/// Seeds tried before giving up on finding enough usable configurations.
const MAX_SEEDS: u64 = 500;

/// Perturbation used to make sure an edge-edge pair is not near a change of
/// closest feature.
const CLASSIFICATION_MARGIN: f64 = 1e-4;

fn well_separated(vertices: &DMatrix<f64>) -> bool {
    min_pairwise_distance(vertices) > 0.3
}

fn face_is_fat(scene: &Scene) -> bool {
    let p = |i: usize| {
        let r = scene.vertices.row(i);
        Vector3::new(r[0], r[1], if r.len() > 2 { r[2] } else { 0.0 })
    };
    (p(2) - p(1)).cross(&(p(3) - p(1))).norm() > 0.2
}

fn edge_edge_type_is_stable(scene: &Scene, c: &EdgeEdgeConstraint) -> bool {
    let base = c.distance_type(&scene.vertices, &scene.edges);
    for v in 0..4 {
        for k in 0..scene.dim() {
            for delta in [CLASSIFICATION_MARGIN, -CLASSIFICATION_MARGIN] {
                let mut moved = scene.vertices.clone();
                moved[(v, k)] += delta;
                if c.distance_type(&moved, &scene.edges) != base {
                    return false;
                }
            }
        }
    }
    true
}

fn cross_squarednorm(scene: &Scene) -> f64 {
    let p = |i: usize| {
        let r = scene.vertices.row(i);
        Vector3::new(r[0], r[1], if r.len() > 2 { r[2] } else { 0.0 })
    };
    edge_edge_cross_squarednorm(&p(0), &p(1), &p(2), &p(3))
}

/// Build the constraint under test, or `None` if the configuration is not
/// usable for finite differences.
type Builder = fn(&Scene, &mut StdRng) -> Option<CollisionConstraint>;

fn vertex_vertex(_scene: &Scene, _rng: &mut StdRng) -> Option<CollisionConstraint> {
    VertexVertexConstraint::new(0, 1)
        .with_multiplicity(2)
        .ok()
        .map(Into::into)
}

fn edge_vertex(_scene: &Scene, _rng: &mut StdRng) -> Option<CollisionConstraint> {
    EdgeVertexConstraint::new(2, 0).with_multiplicity(3).ok().map(Into::into)
}

fn edge_edge_unmollified(scene: &Scene, _rng: &mut StdRng) -> Option<CollisionConstraint> {
    let c = EdgeEdgeConstraint::new(0, 1, 1e-8).ok()?;
    (cross_squarednorm(scene) > 1e-3 && edge_edge_type_is_stable(scene, &c)).then(|| c.into())
}

fn edge_edge_mollified(scene: &Scene, _rng: &mut StdRng) -> Option<CollisionConstraint> {
    let cross = cross_squarednorm(scene);
    if cross < 1e-2 {
        return None;
    }
    // c = eps / 2 sits in the middle of the mollified band
    let c = EdgeEdgeConstraint::new(0, 1, 2.0 * cross).ok()?;
    edge_edge_type_is_stable(scene, &c).then(|| c.into())
}

fn face_vertex(scene: &Scene, _rng: &mut StdRng) -> Option<CollisionConstraint> {
    face_is_fat(scene).then(|| FaceVertexConstraint::new(0, 0).into())
}

fn plane_vertex(scene: &Scene, rng: &mut StdRng) -> Option<CollisionConstraint> {
    let dim = scene.dim();
    let origin: Vec<f64> = (0..dim).map(|_| rng.gen_range(-1.0..1.0)).collect();
    let normal: Vec<f64> = (0..dim).map(|_| rng.gen_range(-1.0..1.0)).collect();
    PlaneVertexConstraint::from_slices(&origin, &normal, 0)
        .ok()
        .map(Into::into)
}

fn check_kind(name: &str, dim: usize, build: Builder) {
    let mut checked = 0;
    for seed in 0..MAX_SEEDS {
        let mut rng = rng(seed);
        let scene = Scene::four_points(random_vertices(&mut rng, 4, dim));
        if !well_separated(&scene.vertices) {
            continue;
        }
        let Some(constraint) = build(&scene, &mut rng) else {
            continue;
        };
        let c = constraint.to_ref();
        let distance = scene.distance(c);
        if distance < 0.01 {
            continue;
        }
        let params = active_params(distance);
        let context = format!("{name} {dim}D seed {seed}");

        assert!(scene.potential(c, &params) > 0.0, "{context}: inactive");
        assert_gradient_matches(&scene.gradient(c, &params), &scene.fd_gradient(c, &params), &context);
        assert_hessian_matches(
            &scene.hessian(c, &params, false),
            &scene.fd_hessian(c, &params),
            &context,
        );

        checked += 1;
        if checked == SAMPLES {
            return;
        }
    }
    panic!("{name} {dim}D: only {checked} usable configurations");
}

#[test]
fn vertex_vertex_derivatives_3d() {
    check_kind("vertex-vertex", 3, vertex_vertex);
}

#[test]
fn vertex_vertex_derivatives_2d() {
    check_kind("vertex-vertex", 2, vertex_vertex);
}

#[test]
fn edge_vertex_derivatives_3d() {
    check_kind("edge-vertex", 3, edge_vertex);
}

#[test]
fn edge_vertex_derivatives_2d() {
    check_kind("edge-vertex", 2, edge_vertex);
}

#[test]
fn edge_edge_derivatives_3d() {
    check_kind("edge-edge", 3, edge_edge_unmollified);
}

#[test]
fn edge_edge_derivatives_2d() {
    check_kind("edge-edge", 2, edge_edge_unmollified);
}

#[test]
fn mollified_edge_edge_derivatives_3d() {
    check_kind("mollified edge-edge", 3, edge_edge_mollified);
}

#[test]
fn face_vertex_derivatives_3d() {
    check_kind("face-vertex", 3, face_vertex);
}

#[test]
fn plane_vertex_derivatives_3d() {
    check_kind("plane-vertex", 3, plane_vertex);
}

#[test]
fn plane_vertex_derivatives_2d() {
    check_kind("plane-vertex", 2, plane_vertex);
}
