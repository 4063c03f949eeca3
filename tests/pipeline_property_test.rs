use rand::seq::SliceRandom;
use rand::SeedableRng;

use featrs::{
    DenseVector, FeatureSpec, InMemory, MaxAbsScaler, MinMaxScaler, NamedMap, OneHotEncoder,
    SparseVector,
};

#[derive(Debug, Clone)]
struct Event {
    amount: f64,
    kind: String,
}

fn dataset() -> Vec<Event> {
    let kinds = ["click", "view", "purchase", "refund"];
    (0..200)
        .map(|i| Event {
            amount: (i as f64) * 0.37 - 20.0,
            kind: kinds[i % kinds.len()].to_string(),
        })
        .collect()
}

fn spec() -> FeatureSpec<Event> {
    FeatureSpec::<Event>::of()
        .required(|e: &Event| e.amount, MinMaxScaler::new("amount"))
        .required(|e: &Event| e.amount, MaxAbsScaler::new("abs"))
        .required(|e: &Event| e.kind.clone(), OneHotEncoder::new("kind"))
}

#[test]
fn test_summary_independent_of_record_order() {
    let data = dataset();
    let baseline = spec()
        .extract::<InMemory>(data.clone())
        .unwrap()
        .feature_settings()
        .unwrap()
        .remove(0);

    let mut rng = rand::rngs::StdRng::seed_from_u64(42);
    for _ in 0..5 {
        let mut shuffled = data.clone();
        shuffled.shuffle(&mut rng);
        let settings = spec()
            .extract::<InMemory>(shuffled)
            .unwrap()
            .feature_settings()
            .unwrap()
            .remove(0);
        assert_eq!(settings, baseline);
    }
}

#[cfg(feature = "parallel")]
#[test]
fn test_threaded_driver_matches_sequential() {
    use featrs::Threaded;

    let data = dataset();
    let sequential = spec().extract::<InMemory>(data.clone()).unwrap();
    let threaded = spec().extract::<Threaded>(data).unwrap();

    assert_eq!(
        sequential.feature_settings().unwrap(),
        threaded.feature_settings().unwrap()
    );
    assert_eq!(
        sequential.feature_values(&DenseVector::new()).unwrap(),
        threaded.feature_values(&DenseVector::new()).unwrap()
    );
}

#[test]
fn test_feature_names_unique() {
    let extractor = spec()
        .cross(("amount", "kind"), |a, b| a * b)
        .extract::<InMemory>(dataset())
        .unwrap();
    let names = extractor.feature_names().unwrap().remove(0);
    let mut deduped = names.clone();
    deduped.sort();
    deduped.dedup();
    assert_eq!(deduped.len(), names.len());
}

#[test]
fn test_builders_agree_on_emitted_cells() {
    let data = dataset();
    let extractor = spec().extract::<InMemory>(data).unwrap();
    let names = extractor.feature_names().unwrap().remove(0);

    let dense = extractor.feature_values(&DenseVector::new()).unwrap();
    let sparse = extractor.feature_values(&SparseVector::new()).unwrap();
    let maps = extractor.feature_values(&NamedMap::new()).unwrap();

    for ((dense_row, sparse_row), map_row) in dense.iter().zip(&sparse).zip(&maps) {
        assert_eq!(sparse_row.dimension, dense_row.len());
        for (index, value) in &sparse_row.entries {
            assert_eq!(dense_row[*index], *value);
            assert_eq!(map_row[&names[*index]], *value);
        }
    }
}
