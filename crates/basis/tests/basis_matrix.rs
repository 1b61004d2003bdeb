//! Integration tests for basis assembly and persistence

use dgm_basis::{BasisMatrix, GroupStructure};
use rstest::{fixture, rstest};

fn assert_close(a: f64, b: f64) {
    assert!((a - b).abs() < 1e-12, "expected {b}, found {a}");
}

#[fixture]
fn seven_group() -> GroupStructure {
    GroupStructure::from_map(7, &[1, 1, 1, 1, 2, 2, 2]).unwrap()
}

#[test]
fn seven_group_basis_matches_reference() {
    // condensed rows of the reference basis, one row per fine group with the
    // values of its own coarse group's block
    let expected = [
        vec![0.5, 0.6708203932499369, 0.5, 0.2236067977499789],
        vec![0.5, 0.223606797749979, -0.5, -0.6708203932499369],
        vec![0.5, -0.223606797749979, -0.5, 0.6708203932499369],
        vec![0.5, -0.6708203932499369, 0.5, -0.2236067977499789],
        vec![0.5773502691896258, 0.7071067811865475, 0.4082482904638631],
        vec![0.5773502691896258, 0.0, -0.8164965809277261],
        vec![0.5773502691896258, -0.7071067811865475, 0.4082482904638631],
    ];

    let structure = GroupStructure::from_map(7, &[1, 1, 1, 1, 2, 2, 2]).unwrap();
    let basis = BasisMatrix::build(&structure).unwrap();

    for (g, row) in expected.iter().enumerate() {
        for (i, value) in row.iter().enumerate() {
            assert_close(basis.value(g, i), *value);
        }
    }
}

#[rstest]
#[case::contiguous(vec![1, 1, 1, 1, 2, 2, 2])] // case 1
#[case::interleaved(vec![1, 2, 1, 2, 1, 2, 1])] // case 2
#[case::three_way(vec![3, 1, 2, 1, 3, 2, 1])] // case 3
fn blocks_are_orthonormal(#[case] map: Vec<usize>) {
    let structure = GroupStructure::from_map(map.len(), &map).unwrap();
    let basis = BasisMatrix::build(&structure).unwrap();

    for c in 0..structure.coarse_groups() {
        let offset = basis.offset(c);
        for i in 0..structure.count(c) {
            for j in 0..structure.count(c) {
                let dot: f64 = (0..structure.fine_groups())
                    .map(|g| basis.matrix()[(g, offset + i)] * basis.matrix()[(g, offset + j)])
                    .sum();
                let expected = if i == j { 1.0 } else { 0.0 };
                assert_close(dot, expected);
            }
        }
    }
}

#[rstest]
#[case(44)] // case 1
#[case(238)] // case 2
fn registered_bases_are_orthonormal(#[case] fine_groups: usize) {
    let basis = BasisMatrix::from_registry(fine_groups).unwrap();
    let gram = basis.matrix().transpose() * basis.matrix();

    // full-matrix Gram is the identity because cross-block columns have
    // disjoint row support
    for i in 0..fine_groups {
        for j in 0..fine_groups {
            let expected = if i == j { 1.0 } else { 0.0 };
            assert!(
                (gram[(i, j)] - expected).abs() < 1e-12,
                "gram[({i},{j})] = {}",
                gram[(i, j)]
            );
        }
    }
}

#[test]
fn non_contiguous_columns_have_block_support_only() {
    let map = [1, 2, 1, 2, 1, 2, 1];
    let structure = GroupStructure::from_map(7, &map).unwrap();
    let basis = BasisMatrix::build(&structure).unwrap();

    for c in 0..structure.coarse_groups() {
        let members = structure.fine_indices(c);
        for i in 0..structure.count(c) {
            let col = basis.offset(c) + i;
            for g in 0..7 {
                if members.contains(&g) {
                    continue;
                }
                assert_eq!(
                    basis.matrix()[(g, col)],
                    0.0,
                    "column {col} has support outside coarse group {c} at row {g}"
                );
            }
        }
    }
}

#[rstest]
fn file_round_trip_is_lossless(seven_group: GroupStructure) {
    let basis = BasisMatrix::build(&seven_group).unwrap();

    let path = std::env::temp_dir().join("dgm_basis_roundtrip_7g");
    basis.write(&path).unwrap();
    let reloaded = BasisMatrix::from_file(&path, &seven_group).unwrap();
    std::fs::remove_file(&path).unwrap();

    assert_eq!(basis, reloaded);
}

#[rstest]
fn file_shape_is_validated(seven_group: GroupStructure) {
    let path = std::env::temp_dir().join("dgm_basis_badshape_7g");

    // row too short
    std::fs::write(&path, "1.0 2.0 3.0\n").unwrap();
    assert!(BasisMatrix::from_file(&path, &seven_group).is_err());

    // too few rows
    std::fs::write(&path, "0.0 0.0 0.0 0.0 0.0 0.0 0.0\n").unwrap();
    assert!(BasisMatrix::from_file(&path, &seven_group).is_err());

    // unparsable value
    std::fs::write(&path, "0.0 0.0 0.0 nope 0.0 0.0 0.0\n").unwrap();
    assert!(BasisMatrix::from_file(&path, &seven_group).is_err());

    std::fs::remove_file(&path).unwrap();
}

#[rstest]
fn surplus_rows_report_the_real_count(seven_group: GroupStructure) {
    let path = std::env::temp_dir().join("dgm_basis_surplus_7g");

    // two rows too many for a 7-group structure
    let row = "0.0 0.0 0.0 0.0 0.0 0.0 0.0\n";
    std::fs::write(&path, row.repeat(9)).unwrap();

    let result = BasisMatrix::from_file(&path, &seven_group);
    std::fs::remove_file(&path).unwrap();

    assert!(matches!(
        result,
        Err(dgm_basis::Error::UnexpectedRowCount {
            expected: 7,
            found: 9
        })
    ));
}
