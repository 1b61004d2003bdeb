//! Integration tests for configuration parsing and validation

use dgm_collapse::DgmConfig;
use rstest::rstest;

use std::path::PathBuf;

#[test]
fn minimal_json_fills_in_defaults() {
    let json = r#"{
        "energy_group_map": [1, 1, 1, 1, 2, 2, 2],
        "dgm_basis_name": "test/7gbasis"
    }"#;

    let config: DgmConfig = serde_json::from_str(json).unwrap();

    assert_eq!(config.energy_group_map, vec![1, 1, 1, 1, 2, 2, 2]);
    assert_eq!(config.dgm_basis_name, PathBuf::from("test/7gbasis"));
    assert_eq!(config.truncation_map, None);
    assert_eq!(config.lambda, 1.0);
    assert_eq!(config.scatter_leg_order, 0);
}

#[test]
fn full_config_round_trips_through_json() {
    let mut config = DgmConfig::new(vec![1, 1, 1, 1, 2, 2, 2], "test/7gbasis");
    config.truncation_map = Some(vec![2, 1]);
    config.lambda = 0.7;
    config.scatter_leg_order = 3;

    let json = serde_json::to_string(&config).unwrap();
    let recovered: DgmConfig = serde_json::from_str(&json).unwrap();

    assert_eq!(recovered, config);
}

#[rstest]
#[case(0.0)]
#[case(-0.2)]
#[case(1.0001)]
fn out_of_range_lambda_is_rejected(#[case] lambda: f64) {
    let mut config = DgmConfig::new(vec![1, 1, 1, 1, 2, 2, 2], "test/7gbasis");
    config.lambda = lambda;
    assert!(config.validated().is_err());
}

#[test]
fn truncation_map_length_is_checked() {
    let mut config = DgmConfig::new(vec![1, 1, 1, 1, 2, 2, 2], "test/7gbasis");
    config.truncation_map = Some(vec![2, 1, 0]);
    assert!(config.validated().is_err());
}

#[test]
fn structure_and_orders_follow_the_group_map() {
    let mut config = DgmConfig::new(vec![1, 1, 1, 1, 2, 2, 2], "test/7gbasis");
    config.truncation_map = Some(vec![1, 5]);
    let config = config.validated().unwrap();

    let structure = config.structure().unwrap();
    assert_eq!(structure.coarse_groups(), 2);

    // caps above the natural maximum clip to it
    let orders = config.orders(&structure).unwrap();
    assert_eq!(orders.orders(), &[1, 2]);
    assert_eq!(orders.expansion_order(), 2);
}

#[test]
fn missing_basis_file_is_an_error() {
    let config = DgmConfig::new(vec![1, 1, 1, 1, 2, 2, 2], "no/such/basis");
    let structure = config.structure().unwrap();
    assert!(config.load_basis(&structure).is_err());
}
