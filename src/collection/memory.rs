//! Sequential in-memory driver

use super::CollectionDriver;

/// `Vec`-backed sequential execution.
pub struct InMemory;

impl CollectionDriver for InMemory {
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
        coll.iter().map(f).collect()
    }

    fn reduce<A, F>(coll: &Vec<A>, f: F) -> Option<A>
    where
        A: Clone + Send + Sync + 'static,
        F: Fn(A, A) -> A + Send + Sync,
    {
        coll.iter().cloned().reduce(f)
    }

    fn cross<A, B>(coll: &Vec<A>, singleton: &Vec<B>) -> Vec<(A, B)>
    where
        A: Clone + Send + Sync + 'static,
        B: Clone + Send + Sync + 'static,
    {
        match singleton.first() {
            Some(single) => coll.iter().map(|a| (a.clone(), single.clone())).collect(),
            None => Vec::new(),
        }
    }
}
