use featrs::{
    DenseOptionVector, DenseVector, Error, FeatureSpec, Identity, InMemory, MinMaxScaler,
};

#[derive(Debug, Clone)]
struct Row {
    value: f64,
    maybe: Option<f64>,
}

#[test]
fn test_identity_pass_through() {
    let spec = FeatureSpec::<f64>::of().required(|x: &f64| *x, Identity::new("id"));
    let extractor = spec.extract::<InMemory>(vec![1.0, 2.0, 3.0]).unwrap();

    let names = extractor.feature_names().unwrap();
    assert_eq!(names, vec![vec!["id".to_string()]]);

    let values = extractor.feature_values(&DenseVector::new()).unwrap();
    assert_eq!(values, vec![vec![1.0], vec![2.0], vec![3.0]]);

    let settings = extractor.feature_settings().unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&settings[0]).unwrap();
    assert_eq!(parsed.as_array().unwrap().len(), 1);
}

#[test]
fn test_min_max_over_known_range() {
    let spec = FeatureSpec::<f64>::of().required(|x: &f64| *x, MinMaxScaler::new("x"));
    let extractor = spec.extract::<InMemory>(vec![0.0, 5.0, 10.0]).unwrap();

    let values = extractor.feature_values(&DenseVector::new()).unwrap();
    assert_eq!(values, vec![vec![0.0], vec![0.5], vec![1.0]]);
}

#[test]
fn test_optional_with_default() {
    let rows = vec![
        Row { value: 0.0, maybe: Some(2.0) },
        Row { value: 0.0, maybe: None },
        Row { value: 0.0, maybe: Some(4.0) },
    ];
    let spec = FeatureSpec::<Row>::of().optional_or(|r: &Row| r.maybe, 0.0, Identity::new("m"));
    let extractor = spec.extract::<InMemory>(rows).unwrap();

    let values = extractor.feature_values(&DenseVector::new()).unwrap();
    assert_eq!(values, vec![vec![2.0], vec![0.0], vec![4.0]]);
}

#[test]
fn test_optional_without_default_skips() {
    let rows = vec![
        Row { value: 0.0, maybe: Some(2.0) },
        Row { value: 0.0, maybe: None },
    ];
    let spec = FeatureSpec::<Row>::of().optional(|r: &Row| r.maybe, Identity::new("m"));
    let extractor = spec.extract::<InMemory>(rows).unwrap();

    let values = extractor.feature_values(&DenseOptionVector::new()).unwrap();
    assert_eq!(values, vec![vec![Some(2.0)], vec![None]]);
}

#[test]
fn test_width_agreement_and_order_stability() {
    let rows = vec![
        Row { value: 1.0, maybe: Some(2.0) },
        Row { value: 3.0, maybe: None },
    ];
    let spec = FeatureSpec::<Row>::of()
        .required(|r: &Row| r.value, MinMaxScaler::new("v"))
        .optional(|r: &Row| r.maybe, Identity::new("m"));

    let extractor = spec.extract::<InMemory>(rows.clone()).unwrap();
    let names = extractor.feature_names().unwrap().remove(0);
    let dimension = extractor.feature_dimension().unwrap().remove(0);
    assert_eq!(names.len(), dimension);
    let values = extractor.feature_values(&DenseVector::new()).unwrap();
    for row in &values {
        assert_eq!(row.len(), dimension);
    }

    // A second extraction over the same data yields the same name sequence.
    let again = spec.extract::<InMemory>(rows).unwrap();
    assert_eq!(again.feature_names().unwrap().remove(0), names);
}

#[test]
fn test_values_with_original() {
    let spec = FeatureSpec::<f64>::of().required(|x: &f64| *x, Identity::new("id"));
    let extractor = spec.extract::<InMemory>(vec![7.0, 8.0]).unwrap();

    let paired = extractor
        .feature_values_with_original(&DenseVector::new())
        .unwrap();
    assert_eq!(paired, vec![(vec![7.0], 7.0), (vec![8.0], 8.0)]);
}

#[test]
fn test_empty_dataset_fails_without_settings() {
    let spec = FeatureSpec::<f64>::of().required(|x: &f64| *x, MinMaxScaler::new("x"));
    let extractor = spec.extract::<InMemory>(Vec::new()).unwrap();
    assert!(matches!(
        extractor.feature_names(),
        Err(Error::EmptyAggregation)
    ));
}

#[test]
fn test_duplicate_name_rejected_before_data() {
    let spec = FeatureSpec::<f64>::of()
        .required(|x: &f64| *x, Identity::new("dup"))
        .required(|x: &f64| *x, Identity::new("dup"));
    assert!(matches!(
        spec.extract::<InMemory>(vec![1.0]),
        Err(Error::DuplicateTransformer(name)) if name == "dup"
    ));
}

#[test]
fn test_combine_specs() {
    let a = FeatureSpec::<f64>::of().required(|x: &f64| *x, Identity::new("a"));
    let b = FeatureSpec::<f64>::of().required(|x: &f64| *x + 1.0, Identity::new("b"));
    let combined = FeatureSpec::combine(vec![a, b]).unwrap();

    let extractor = combined.extract::<InMemory>(vec![1.0]).unwrap();
    assert_eq!(
        extractor.feature_names().unwrap().remove(0),
        vec!["a".to_string(), "b".to_string()]
    );
    assert_eq!(
        extractor.feature_values(&DenseVector::new()).unwrap(),
        vec![vec![1.0, 2.0]]
    );

    assert!(matches!(
        FeatureSpec::<f64>::combine(Vec::new()),
        Err(Error::EmptySpec)
    ));
}
