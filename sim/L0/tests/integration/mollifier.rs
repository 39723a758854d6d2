//! Edge-edge potentials fade out as the edges become parallel.

use approx::assert_relative_eq;
use sim_distance::edge_edge_mollifier_threshold;
use sim_ipc::{BarrierParams, CollisionConstraint, EdgeEdgeConstraint, barrier_potential};

use crate::common::Scene;

/// Unit edge along x and a unit edge at height `gap` rotated by `angle`
/// about z, both centered on the z axis.
fn rotated_pair(angle: f64, gap: f64) -> Scene {
    let (s, c) = angle.sin_cos();
    Scene::from_rows(&[
        [-0.5, 0.0, 0.0],
        [0.5, 0.0, 0.0],
        [-0.5 * c, -0.5 * s, gap],
        [0.5 * c, 0.5 * s, gap],
    ])
}

fn constraint() -> CollisionConstraint {
    // perpendicular rest state
    let rest = rotated_pair(std::f64::consts::FRAC_PI_2, 0.05);
    EdgeEdgeConstraint::from_rest_positions(0, 1, &rest.vertices, &rest.edges)
        .unwrap()
        .into()
}

#[test]
fn rest_threshold_from_edge_lengths() {
    let rest = rotated_pair(std::f64::consts::FRAC_PI_2, 0.05);
    let CollisionConstraint::EdgeEdge(c) = constraint() else {
        unreachable!()
    };
    let p = |i: usize| rest.vertices.row(i).transpose().fixed_rows::<3>(0).into_owned();
    assert_relative_eq!(
        c.eps_x(),
        edge_edge_mollifier_threshold(&p(0), &p(1), &p(2), &p(3)),
        epsilon = 1e-18
    );
    assert_relative_eq!(c.eps_x(), 1e-3, epsilon = 1e-15);
}

#[test]
fn potential_tends_to_zero_approaching_parallel() {
    let c = constraint();
    let params = BarrierParams::new(0.1);

    let mut previous = f64::INFINITY;
    for angle in [1e-1, 3e-2, 1e-2, 3e-3, 1e-3, 1e-4, 1e-6] {
        let scene = rotated_pair(angle, 0.05);
        let unmollified = barrier_potential(scene.distance(c.to_ref()), &params);
        let potential = scene.potential(c.to_ref(), &params);

        assert!(unmollified > 0.0);
        assert!(potential <= unmollified);
        assert!(potential <= previous, "angle {angle}");
        previous = potential;
    }
    // sin²(1e-6) / 1e-3 ≈ 1e-9, so m ≈ 2e-9
    let unmollified = barrier_potential(0.0025, &params);
    assert!(previous < 1e-8 * unmollified);

    let parallel = rotated_pair(0.0, 0.05);
    assert_eq!(parallel.potential(c.to_ref(), &params), 0.0);
}

#[test]
fn away_from_parallel_the_mollifier_is_inactive() {
    let c = constraint();
    let params = BarrierParams::new(0.1);
    let scene = rotated_pair(0.5, 0.05);
    assert_relative_eq!(
        scene.potential(c.to_ref(), &params),
        barrier_potential(0.0025, &params),
        max_relative = 1e-12
    );
}
