//! Collection capability
//!
//! The engine is driver-agnostic: all heavy work is expressed as
//! data-parallel transformations over an abstract collection. A driver
//! supplies the collection representation and four operations — `map`,
//! `reduce` over an associative operation, `cross` against a singleton, and
//! `pure` — and the engine adds no threads, suspension points, or blocking
//! calls of its own. The shipped drivers cover sequential and thread-pool
//! execution; a wrapper over a distributed dataset runtime satisfies the
//! same contract.

mod memory;
#[cfg(feature = "parallel")]
mod parallel;

pub use memory::InMemory;
#[cfg(feature = "parallel")]
pub use parallel::Threaded;

/// A host collection runtime.
///
/// `reduce` may combine elements in any tree shape across arbitrary
/// partitions; the operations the engine passes it are associative and obey
/// the option-monoid combine rules, which is what makes that safe.
pub trait CollectionDriver {
    /// The collection representation for element type `T`.
    type Coll<T: Send + Sync + 'static>: Send + Sync;

    /// Lifts a single value into a one-element collection.
    fn pure<T: Send + Sync + 'static>(value: T) -> Self::Coll<T>;

    /// Element-wise transformation.
    fn map<A, B, F>(coll: &Self::Coll<A>, f: F) -> Self::Coll<B>
    where
        A: Send + Sync + 'static,
        B: Send + Sync + 'static,
        F: Fn(&A) -> B + Send + Sync;

    /// Combines all elements with an associative operation. Returns `None`
    /// on an empty collection.
    fn reduce<A, F>(coll: &Self::Coll<A>, f: F) -> Option<A>
    where
        A: Clone + Send + Sync + 'static,
        F: Fn(A, A) -> A + Send + Sync;

    /// Zips every element with the value of a one-element collection.
    fn cross<A, B>(coll: &Self::Coll<A>, singleton: &Self::Coll<B>) -> Self::Coll<(A, B)>
    where
        A: Clone + Send + Sync + 'static,
        B: Clone + Send + Sync + 'static;
}
