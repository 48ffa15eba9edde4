use gvf::boundary::{expand_2d, shrink_2d};
use gvf::grid::normalize;
use gvf::operators::gradient;
use gvf::phantom::{disk_2d, planar_edge_3d, sphere_3d, step_edge_2d};
use gvf::{gvf_2d, solve_2d, solve_3d, GvfError, GvfParams, GvfSolver};
use ndarray::{array, s, Array2, Array3};

#[test]
fn public_api_reproduces_mirror_example() {
    let grid = array![[1.0, 2.0, 3.0, 11.0], [4.0, 5.0, 6.0, 12.0], [7.0, 8.0, 9.0, 13.0]];
    let padded = expand_2d(&grid).unwrap();
    assert_eq!(padded.row(0), array![5.0, 4.0, 5.0, 6.0, 12.0, 6.0]);
    assert_eq!(padded.column(5), array![6.0, 3.0, 6.0, 9.0, 6.0]);
    assert_eq!(shrink_2d(&padded).unwrap(), grid);
}

#[test]
fn initial_flow_is_gradient_of_normalized_image() {
    let image = disk_2d(9, 11, 3.0) * 40.0 + 7.0;
    let solver = GvfSolver::new(&image, GvfParams::new(0.05, 10)).unwrap();
    let initial = solver.field().unwrap();
    assert_eq!(initial, solver.initial_gradient().unwrap());
    let edge_map = solver.edge_map().unwrap();
    let expected_map = initial.u().mapv(|g| g * g) + initial.v().mapv(|g| g * g);
    for (&a, &b) in edge_map.iter().zip(expected_map.iter()) {
        assert!((a - b).abs() < 1e-15);
    }

    let reference = gradient(&normalize(&image).unwrap()).unwrap();
    for (flow, expected) in initial.components().iter().zip(&reference) {
        assert_eq!(flow.slice(s![1..-1, 1..-1]), expected.slice(s![1..-1, 1..-1]));
    }
    // Mirrored padding makes the normal derivative vanish on the image border.
    assert!(initial.u().row(0).iter().all(|&g| g == 0.0));
    assert!(initial.u().row(8).iter().all(|&g| g == 0.0));
    assert!(initial.v().column(0).iter().all(|&g| g == 0.0));
    assert!(initial.v().column(10).iter().all(|&g| g == 0.0));
}

#[test]
fn reaction_only_flow_stays_bounded() {
    let ramp = Array2::from_shape_fn((12, 10), |(i, j)| 0.3 * i as f64 + 0.7 * j as f64);
    let field = solve_2d(&ramp, 0.0, 500).unwrap();
    assert!(field.is_finite());
    let solver = GvfSolver::new(&ramp, GvfParams::new(0.0, 1)).unwrap();
    let start = solver.field().unwrap();
    assert!(field.max_abs_diff(&start).unwrap() < 1e-12);

    let volume = Array3::from_shape_fn((5, 6, 7), |(i, j, k)| (i + 2 * j + 3 * k) as f64);
    let field = solve_3d(&volume, 0.0, 300, false).unwrap();
    let max = field.magnitude().iter().copied().fold(0.0_f64, f64::max);
    assert!(max.is_finite() && max < 1.0);
}

#[test]
fn successive_changes_shrink_on_step_edge() {
    let image = step_edge_2d(16, 24, 12);
    let mut solver = GvfSolver::new(&image, GvfParams::new(0.05, 150)).unwrap();
    let mut changes = Vec::new();
    while !solver.is_finished() {
        changes.push(solver.step().unwrap());
    }
    for pair in changes.windows(2) {
        assert!(pair[1] <= pair[0] + 1e-12, "change grew: {:?}", pair);
    }
    assert!(changes[changes.len() - 1] < changes[0]);
}

#[test]
fn more_iterations_extend_capture_range() {
    let image = disk_2d(32, 32, 8.0);
    let solver = GvfSolver::new(&image, GvfParams::new(0.05, 1)).unwrap();
    let gradient_only = solver.initial_gradient().unwrap();
    let flow = solve_2d(&image, 0.05, 300).unwrap();

    let covered = |m: &Array2<f64>| m.iter().filter(|&&v| v > 1e-4).count();
    assert!(covered(&flow.magnitude()) > covered(&gradient_only.magnitude()));

    // Left of the disk the flow points along +column, toward the edge.
    assert_eq!(gradient_only.v()[[16, 2]], 0.0);
    assert!(flow.v()[[16, 2]] > 0.0);
}

#[test]
fn constant_input_is_rejected_without_nan() {
    let image = Array2::from_elem((6, 6), 0.25);
    assert_eq!(
        solve_2d(&image, 0.05, 20),
        Err(GvfError::DegenerateInput { value: 0.25 })
    );
    let volume = Array3::from_elem((4, 4, 4), -3.0);
    assert_eq!(
        solve_3d(&volume, 0.02, 20, false),
        Err(GvfError::DegenerateInput { value: -3.0 })
    );
}

#[test]
fn invalid_parameters_are_rejected_before_iterating() {
    let image = step_edge_2d(8, 8, 4);
    assert!(matches!(
        solve_2d(&image, 0.05, 0),
        Err(GvfError::InvalidParameters(_))
    ));
    assert!(matches!(
        solve_2d(&image, -0.01, 10),
        Err(GvfError::InvalidParameters(_))
    ));
}

#[test]
fn planar_edge_volume_has_no_axis_artifacts() {
    let volume = planar_edge_3d(7, 6, 9, 4);
    let field = solve_3d(&volume, 0.02, 60, true).unwrap();

    assert!(field.u().iter().all(|&c| c == 0.0));
    assert!(field.v().iter().all(|&c| c == 0.0));

    let w = field.w();
    for ((i, j, k), &value) in w.indexed_iter() {
        assert!(
            (value - w[[0, 0, k]]).abs() < 1e-12,
            "w differs across the plane at ({}, {}, {})",
            i,
            j,
            k
        );
    }
    // Diffused into the flat half, pointing toward the brighter side.
    assert!(w[[3, 3, 1]] > 0.0);
    assert!(w[[3, 3, 7]] > 0.0);
}

#[test]
fn sphere_flow_is_symmetric_under_axis_swap() {
    let volume = sphere_3d(9, 2.5);
    let field = solve_3d(&volume, 0.02, 40, false).unwrap();
    // Swapping axes 0 and 2 maps the ball onto itself and u onto w.
    let swapped_w = field.w().clone().permuted_axes([2, 1, 0]);
    for (&a, &b) in field.u().iter().zip(swapped_w.iter()) {
        assert!((a - b).abs() < 1e-12);
    }
}

#[test]
fn parallel_knob_leaves_result_unchanged_in_3d() {
    let volume = sphere_3d(8, 2.0);
    let params = GvfParams::new(0.02, 15);
    let serial = gvf::gvf_3d(&volume, &params).unwrap();
    let parallel = gvf::gvf_3d(&volume, &params.parallel(true)).unwrap();
    assert_eq!(serial, parallel);
    assert_eq!(serial.shape(), &[8, 8, 8]);

    let image = step_edge_2d(5, 5, 2);
    assert_eq!(gvf_2d(&image, &GvfParams::new(0.05, 3)).unwrap().shape(), &[5, 5]);
}
