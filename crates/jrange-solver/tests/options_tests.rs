use super::*;

#[test]
fn test_defaults_come_from_limits() {
    let opts = SolverOptions::default();
    assert_eq!(opts.max_hierarchy_depth, limits::MAX_HIERARCHY_DEPTH);
    assert_eq!(opts.max_propagation_steps, limits::MAX_PROPAGATION_STEPS);
    assert!(opts.report_incomplete_hierarchy);
}

#[test]
fn test_from_json_partial_document() {
    let opts = SolverOptions::from_json(r#"{ "max_hierarchy_depth": 8 }"#).unwrap();
    assert_eq!(opts.max_hierarchy_depth, 8);
    assert_eq!(opts.max_propagation_steps, limits::MAX_PROPAGATION_STEPS);
}

#[test]
fn test_from_json_empty_object() {
    assert_eq!(SolverOptions::from_json("{}").unwrap(), SolverOptions::default());
}

#[test]
fn test_from_json_rejects_unknown_field() {
    assert!(SolverOptions::from_json(r#"{ "max_depth": 8 }"#).is_err());
}

#[test]
fn test_from_json_rejects_wrong_type() {
    assert!(SolverOptions::from_json(r#"{ "report_incomplete_hierarchy": "yes" }"#).is_err());
}

#[test]
fn test_serializes_every_field() {
    let opts = SolverOptions::default()
        .with_max_hierarchy_depth(16)
        .with_max_propagation_steps(10);
    let json = serde_json::to_value(&opts).unwrap();
    assert_eq!(json["max_hierarchy_depth"], 16);
    assert_eq!(json["max_propagation_steps"], 10);
    assert_eq!(json["report_incomplete_hierarchy"], true);
}
