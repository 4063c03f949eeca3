//! Rayon-backed thread-pool driver

use rayon::prelude::*;

use super::CollectionDriver;

/// `Vec`-backed execution over the rayon thread pool. The reduce is
/// tree-shaped, which is safe because the engine's combine operations are
/// associative.
pub struct Threaded;

impl CollectionDriver for Threaded {
    type Coll<T: Send + Sync + 'static> = Vec<T>;

    fn pure<T: Send + Sync + 'static>(value: T) -> Vec<T> {
        vec![value]
    }

    fn map<A, B, F>(coll: &Vec<A>, f: F) -> Vec<B>
    where
        A: Send + Sync + 'static,
        B: Send + Sync + 'static,
        F: Fn(&A) -> B + Send + Sync,
    {
        coll.par_iter().map(f).collect()
    }

    fn reduce<A, F>(coll: &Vec<A>, f: F) -> Option<A>
    where
        A: Clone + Send + Sync + 'static,
        F: Fn(A, A) -> A + Send + Sync,
    {
        coll.par_iter().cloned().reduce_with(f)
    }

    fn cross<A, B>(coll: &Vec<A>, singleton: &Vec<B>) -> Vec<(A, B)>
    where
        A: Clone + Send + Sync + 'static,
        B: Clone + Send + Sync + 'static,
    {
        match singleton.first() {
            Some(single) => coll
                .par_iter()
                .map(|a| (a.clone(), single.clone()))
                .collect(),
            None => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threaded_matches_sequential() {
        let coll: Vec<i64> = (0..1000).collect();
        let mapped = Threaded::map(&coll, |x| x + 1);
        assert_eq!(mapped.len(), 1000);
        assert_eq!(Threaded::reduce(&mapped, |a, b| a + b), Some(500_500));
    }
}
