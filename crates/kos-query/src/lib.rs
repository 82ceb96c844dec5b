//! Index predicates for the keyed object store.
//!
//! A [`Predicate`] is an ordered chain of index-equality conditions joined by
//! `AND` / `OR`, plus optional pagination. It is built with the fluent
//! [`PredicateBuilder`] and rendered by [`Predicate::to_query`] into a
//! condition fragment such as
//!
//! ```text
//! ko.index1=177137748 OR ko.index2=177142842
//! ```
//!
//! which a storage backend embeds into its own lookup-by-type query. The
//! chain is a flat left-to-right fold with no operator precedence and no
//! parentheses. [`ConditionExpr`] parses a rendered fragment back and
//! evaluates it against a record's index values, for backends that filter in
//! process.
//!
//! Searching by index is slower than lookup by key. Avoid predicates over
//! indexes with a very low distribution of values, and bound large result
//! sets with `max_results`.

pub mod builder;
pub mod condition;
pub mod error;
pub mod predicate;

pub use builder::PredicateBuilder;
pub use condition::{ConditionExpr, Term};
pub use error::{QueryError, QueryResult};
pub use predicate::{Condition, Connective, Predicate, RECORD_ALIAS};
