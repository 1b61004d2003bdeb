//! Integration tests for the forward/inverse moment transforms
//!
//! Reference values come from the 7-group problem with the coarse map
//! [1, 1, 1, 1, 2, 2, 2].

use dgm_basis::{BasisMatrix, GroupStructure};
use dgm_collapse::{ExpansionOrders, MomentProjector};
use rstest::{fixture, rstest};

const SQRT_3: f64 = 1.7320508075688772;

fn assert_close(a: f64, b: f64) {
    assert!((a - b).abs() < 1e-12, "expected {b}, found {a}");
}

#[fixture]
fn seven_group() -> (GroupStructure, BasisMatrix) {
    let structure = GroupStructure::from_map(7, &[1, 1, 1, 1, 2, 2, 2]).unwrap();
    let basis = BasisMatrix::build(&structure).unwrap();
    (structure, basis)
}

#[rstest]
fn uniform_flux_order_zero_moments(seven_group: (GroupStructure, BasisMatrix)) {
    let (structure, basis) = seven_group;
    let orders = ExpansionOrders::full(&structure);
    let projector = MomentProjector::new(&basis, &orders);

    let flux = vec![1.0; 7];
    let m0 = projector.project(&flux, 0).unwrap();
    assert_close(m0[0], 2.0);
    assert_close(m0[1], SQRT_3);

    // all higher moments of a flat flux vanish
    for order in 1..=orders.expansion_order() {
        let m = projector.project(&flux, order).unwrap();
        assert_close(m[0], 0.0);
        assert_close(m[1], 0.0);
    }
}

#[rstest]
fn shaped_flux_order_zero_moments(seven_group: (GroupStructure, BasisMatrix)) {
    let (structure, basis) = seven_group;
    let orders = ExpansionOrders::full(&structure);
    let projector = MomentProjector::new(&basis, &orders);

    // a converged fixed-source flux shape from the reference problem
    let flux = vec![
        0.021377987105421,
        0.7984597778757521,
        0.5999743700269914,
        0.0450954611897237,
        0.0014555781016859,
        0.0000276607249577,
        0.000000019588085,
    ];

    let m0 = projector.project(&flux, 0).unwrap();
    assert_close(m0[0], 0.7324537980989441);
    assert_close(m0[1], 0.0008563596450213);
}

#[rstest]
fn incoming_angular_moments_match_reference(seven_group: (GroupStructure, BasisMatrix)) {
    let (structure, basis) = seven_group;
    let orders = ExpansionOrders::full(&structure);
    let projector = MomentProjector::new(&basis, &orders);

    let flux = [
        0.198933535568562,
        2.7231683533646702,
        1.3986600409998782,
        1.010361903429942,
        0.8149441787223116,
        0.8510697418684054,
        0.00286224604623,
    ];
    // isotropic boundary estimate: psi = phi / 2 in every direction
    let psi: Vec<Vec<f64>> = (0..2)
        .map(|_| flux.iter().map(|phi| phi / 2.0).collect())
        .collect();

    // per-order incident moments, [order][coarse group]
    let expected = [
        [1.3327809583407633, 0.4817630520259961],
        [-0.1240768172509027, 0.2871143207371673],
        [-0.728133238841511, -0.1805137297622373],
        [-0.5349740429521677, 0.0],
    ];

    for (order, row) in expected.iter().enumerate() {
        let incident = projector.project_angular(&psi, order).unwrap();
        for moments in &incident {
            assert_close(moments[0], row[0]);
            assert_close(moments[1], row[1]);
        }
    }
}

#[rstest]
fn constant_source_moments(seven_group: (GroupStructure, BasisMatrix)) {
    let (structure, basis) = seven_group;
    let orders = ExpansionOrders::full(&structure);
    let projector = MomentProjector::new(&basis, &orders);

    // a flat unit source carries only order-0 moments
    let source = vec![1.0; 7];
    let moments = projector.project_all(&source).unwrap();

    assert_close(moments[0][0], 2.0);
    assert_close(moments[0][1], SQRT_3);
    for m in &moments[1..] {
        assert_close(m[0], 0.0);
        assert_close(m[1], 0.0);
    }
}

#[rstest]
fn round_trip_is_exact_at_full_order(seven_group: (GroupStructure, BasisMatrix)) {
    let (structure, basis) = seven_group;
    let orders = ExpansionOrders::full(&structure);
    let projector = MomentProjector::new(&basis, &orders);

    let flux = vec![0.3, 2.7, 1.4, 1.01, 0.81, 0.85, 0.003];
    let moments = projector.project_all(&flux).unwrap();
    let unfolded = projector.unfold(&moments).unwrap();

    for (a, b) in flux.iter().zip(unfolded.iter()) {
        assert_close(*a, *b);
    }
}

#[test]
fn round_trip_is_exact_for_non_contiguous_maps() {
    let structure = GroupStructure::from_map(7, &[1, 2, 1, 2, 1, 2, 1]).unwrap();
    let basis = BasisMatrix::build(&structure).unwrap();
    let orders = ExpansionOrders::full(&structure);
    let projector = MomentProjector::new(&basis, &orders);

    let flux = vec![0.3, 2.7, 1.4, 1.01, 0.81, 0.85, 0.003];
    let moments = projector.project_all(&flux).unwrap();
    let unfolded = projector.unfold(&moments).unwrap();

    for (a, b) in flux.iter().zip(unfolded.iter()) {
        assert_close(*a, *b);
    }
}

#[rstest]
fn truncation_residual_is_monotonic(seven_group: (GroupStructure, BasisMatrix)) {
    let (structure, basis) = seven_group;
    let orders = ExpansionOrders::full(&structure);
    let projector = MomentProjector::new(&basis, &orders);

    let flux = vec![0.02, 0.79, 0.6, 0.04, 0.0015, 0.00002, 0.0000001];

    let mut previous = f64::INFINITY;
    for cap in 0..=orders.expansion_order() {
        let residual = projector.truncation_residual(&flux, cap).unwrap();
        assert!(
            residual <= previous + 1e-14,
            "residual grew from {previous} to {residual} at cap {cap}"
        );
        previous = residual;
    }

    // the full order set reconstructs exactly
    assert_close(previous, 0.0);
}

#[rstest]
fn truncated_orders_project_to_zero(seven_group: (GroupStructure, BasisMatrix)) {
    let (structure, basis) = seven_group;
    let orders = ExpansionOrders::truncated(&structure, &[2, 1]).unwrap();
    let projector = MomentProjector::new(&basis, &orders);

    assert_eq!(orders.orders(), &[2, 1]);
    assert_eq!(orders.expansion_order(), 2);

    let flux = vec![0.3, 2.7, 1.4, 1.01, 0.81, 0.85, 0.003];

    // the second coarse group is exhausted beyond order 1
    let m2 = projector.project(&flux, 2).unwrap();
    assert!(m2[0].abs() > 0.0);
    assert_close(m2[1], 0.0);
}

#[rstest]
fn length_mismatch_is_fatal(seven_group: (GroupStructure, BasisMatrix)) {
    let (structure, basis) = seven_group;
    let orders = ExpansionOrders::full(&structure);
    let projector = MomentProjector::new(&basis, &orders);

    assert!(projector.project(&[1.0, 2.0], 0).is_err());
    assert!(projector.unfold(&[vec![1.0, 2.0, 3.0]]).is_err());
}
