//! PSD projection of local Hessians.

use nalgebra::Vector3;
use sim_ipc::{
    BarrierParams, CollisionConstraint, EdgeEdgeConstraint, EdgeVertexConstraint,
    FaceVertexConstraint, PlaneVertexConstraint, VertexVertexConstraint,
};

use crate::common::{Scene, assert_psd, random_vertices, rng};

fn kinds() -> Vec<CollisionConstraint> {
    vec![
        VertexVertexConstraint::new(0, 1).with_multiplicity(2).unwrap().into(),
        EdgeVertexConstraint::new(2, 0).into(),
        EdgeEdgeConstraint::new(0, 1, 1e-3).unwrap().into(),
        EdgeEdgeConstraint::new(0, 1, 10.0).unwrap().into(),
        FaceVertexConstraint::new(0, 0).into(),
        PlaneVertexConstraint::new(Vector3::zeros(), Vector3::new(1.0, 2.0, 3.0), 0)
            .unwrap()
            .into(),
    ]
}

#[test]
fn projected_hessians_are_psd_on_random_configurations() {
    for seed in 0..40 {
        let mut rng = rng(1000 + seed);
        let scene = Scene::four_points(random_vertices(&mut rng, 4, 3));
        for constraint in kinds() {
            let c = constraint.to_ref();
            let distance = scene.distance(c);
            if distance < 1e-6 {
                continue;
            }
            // deep and shallow in the active band
            for scale in [1.05, 3.0] {
                let params = BarrierParams::new(scale * distance.sqrt());
                let hess = scene.hessian(c, &params, true);
                assert_psd(&hess, &format!("{} seed {seed} scale {scale}", c.kind()));
            }
        }
    }
}

#[test]
fn unprojected_hessian_can_be_indefinite() {
    // vertex close to the middle of a long edge: the point-line curvature
    // term has a negative direction along the edge
    let scene = Scene::from_rows(&[
        [0.5, 0.05, 0.0],
        [0.0, 0.0, 0.0],
        [1.0, 0.0, 0.0],
        [0.0, 0.0, 1.0],
    ]);
    let c = CollisionConstraint::from(EdgeVertexConstraint::new(2, 0));
    let params = BarrierParams::new(0.1);
    let raw = scene.hessian(c.to_ref(), &params, false);
    assert!(raw.symmetric_eigenvalues().min() < 0.0);
    assert_psd(&scene.hessian(c.to_ref(), &params, true), "edge-vertex");
}

#[test]
fn parallel_edge_edge_hessian_is_finite_and_psd() {
    let scene = Scene::from_rows(&[
        [0.0, 0.0, 0.0],
        [1.0, 0.0, 0.0],
        [0.2, 0.05, 0.02],
        [1.2, 0.05, 0.02],
    ]);
    let c = CollisionConstraint::from(
        EdgeEdgeConstraint::from_rest_positions(0, 1, &scene.vertices, &scene.edges).unwrap(),
    );
    let params = BarrierParams::new(0.1);
    assert_eq!(scene.potential(c.to_ref(), &params), 0.0);

    let gradient = scene.gradient(c.to_ref(), &params);
    assert!(gradient.iter().all(|g| g.is_finite()));
    assert_eq!(gradient.amax(), 0.0);

    for project in [false, true] {
        let hess = scene.hessian(c.to_ref(), &params, project);
        assert!(hess.amax().is_finite());
        assert_psd(&hess, "parallel edge-edge");
    }
}
