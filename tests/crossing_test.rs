use featrs::{
    cross_name, DenseOptionVector, DenseVector, Error, FeatureSpec, Identity, InMemory,
    OneHotEncoder,
};

#[derive(Debug, Clone)]
struct Pair {
    left: String,
    right: String,
}

fn pair(left: &str, right: &str) -> Pair {
    Pair {
        left: left.to_string(),
        right: right.to_string(),
    }
}

fn crossed_spec() -> FeatureSpec<Pair> {
    FeatureSpec::<Pair>::of()
        .required(|p: &Pair| p.left.clone(), OneHotEncoder::new("l"))
        .required(|p: &Pair| p.right.clone(), OneHotEncoder::new("r"))
        .cross(("l", "r"), |a, b| a * b)
}

#[test]
fn test_crossing_dimension_and_order() {
    // Vocabularies: l in {a, b} (width 2), r in {x, y, z} (width 3).
    let data = vec![pair("a", "x"), pair("b", "y"), pair("a", "z")];
    let extractor = crossed_spec().extract::<InMemory>(data).unwrap();

    let names = extractor.feature_names().unwrap().remove(0);
    assert_eq!(names.len(), 2 + 3 + 6);
    assert_eq!(
        &names[5..],
        &[
            cross_name("l_a", "r_x"),
            cross_name("l_a", "r_y"),
            cross_name("l_a", "r_z"),
            cross_name("l_b", "r_x"),
            cross_name("l_b", "r_y"),
            cross_name("l_b", "r_z"),
        ]
    );

    let values = extractor.feature_values(&DenseVector::new()).unwrap();
    for row in &values {
        assert_eq!(row.len(), 11);
    }
    // Record (a, x): one-hot blocks [1,0] and [1,0,0]; the cross block is
    // their outer product, left-major.
    assert_eq!(values[0], vec![1.0, 0.0, 1.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
    // Record (b, y): cross cell (b, y) sits at offset 5 + 3 + 1.
    assert_eq!(values[1][5 + 4], 1.0);
}

#[test]
fn test_crossing_skipped_when_block_fully_skipped() {
    let data = vec![pair("a", "x"), pair("b", "y")];
    let spec = crossed_spec();
    let fitted = spec.extract::<InMemory>(data).unwrap();
    let settings = fitted.feature_settings().unwrap().remove(0);

    // "q" was never seen by the left encoder, so its whole block skips and
    // the cross block skips with it.
    let replayed = spec
        .extract_with_settings::<InMemory>(vec![pair("q", "x")], &settings)
        .unwrap();
    let values = replayed.feature_values(&DenseOptionVector::new()).unwrap();
    let row = &values[0];
    assert_eq!(row.len(), 2 + 2 + 4);
    assert!(row[..2].iter().all(Option::is_none));
    assert_eq!(row[2], Some(1.0));
    assert!(row[4..].iter().all(Option::is_none));
}

#[test]
fn test_cross_names_use_stable_combiner() {
    assert_eq!(cross_name("a", "b"), "a_x_b");
}

#[test]
fn test_cross_unknown_name_rejected() {
    let spec = FeatureSpec::<f64>::of()
        .required(|x: &f64| *x, Identity::new("known"))
        .cross(("known", "missing"), |a, b| a + b);
    assert!(matches!(
        spec.extract::<InMemory>(vec![1.0]),
        Err(Error::TransformerNotFound(name)) if name == "missing"
    ));
}

#[test]
fn test_cross_with_scalar_blocks() {
    #[derive(Debug, Clone)]
    struct Point {
        x: f64,
        y: f64,
    }
    let spec = FeatureSpec::<Point>::of()
        .required(|p: &Point| p.x, Identity::new("x"))
        .required(|p: &Point| p.y, Identity::new("y"))
        .cross(("x", "y"), |a, b| a * b);
    let extractor = spec
        .extract::<InMemory>(vec![Point { x: 3.0, y: 4.0 }])
        .unwrap();

    assert_eq!(
        extractor.feature_names().unwrap().remove(0),
        vec!["x".to_string(), "y".to_string(), "x_x_y".to_string()]
    );
    assert_eq!(
        extractor.feature_values(&DenseVector::new()).unwrap(),
        vec![vec![3.0, 4.0, 12.0]]
    );
}
