//! Monoidal aggregation primitives
//!
//! Every transformer with learned state carries an aggregator: a `prepare`
//! step lifting one raw input into a partial state, an associative `combine`
//! merging two partial states, and a `present` step turning the final state
//! into the summary the emission phase consumes. Transformers without learned
//! state use `()` for both the state and the summary, and all three steps are
//! the identity.
//!
//! The reduce over a dataset works on `Option<State>` so that records whose
//! extractor produced nothing simply do not participate. The combination
//! rules are the usual option-monoid lift of the semigroup:
//!
//! - `None ⊕ None = None`
//! - `Some(x) ⊕ None = Some(x)`
//! - `None ⊕ Some(y) = Some(y)`
//! - `Some(x) ⊕ Some(y) = Some(combine(x, y))`

/// Combines two optional partial states with the given semigroup operation.
///
/// `combine` must be associative; the reduce over a dataset may apply it in
/// any tree shape.
pub fn combine_options<B, F>(combine: F, lhs: Option<B>, rhs: Option<B>) -> Option<B>
where
    F: FnOnce(B, B) -> B,
{
    match (lhs, rhs) {
        (Some(x), Some(y)) => Some(combine(x, y)),
        (Some(x), None) => Some(x),
        (None, y) => y,
    }
}
