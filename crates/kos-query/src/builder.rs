use kos_types::IndexSlot;

use crate::error::{QueryError, QueryResult};
use crate::predicate::{Connective, Predicate};

/// Fluent builder for a [`Predicate`].
///
/// `and` / `or` silently skip a condition whose slot or value is absent, so
/// callers can chain optional criteria without branching:
///
/// ```
/// use kos_query::PredicateBuilder;
/// use kos_types::IndexSlot;
///
/// let title: Option<&str> = None;
/// let predicate = PredicateBuilder::new()
///     .and(IndexSlot::Index1, "Chen")
///     .or(IndexSlot::Index2, title)
///     .max_results(20)?
///     .build()?;
/// assert_eq!(predicate.conditions().len(), 1);
/// # Ok::<(), kos_query::QueryError>(())
/// ```
#[derive(Clone, Debug, Default)]
pub struct PredicateBuilder {
    predicate: Predicate,
}

impl PredicateBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an `AND` condition.
    pub fn and<'a>(
        self,
        slot: impl Into<Option<IndexSlot>>,
        value: impl Into<Option<&'a str>>,
    ) -> Self {
        self.push(Connective::And, slot.into(), value.into())
    }

    /// Append an `OR` condition.
    pub fn or<'a>(
        self,
        slot: impl Into<Option<IndexSlot>>,
        value: impl Into<Option<&'a str>>,
    ) -> Self {
        self.push(Connective::Or, slot.into(), value.into())
    }

    /// Limit the number of results.
    pub fn max_results(mut self, max: i64) -> QueryResult<Self> {
        self.predicate.set_max_results(max)?;
        Ok(self)
    }

    /// Skip the first `position` results.
    pub fn first_result(mut self, position: i64) -> QueryResult<Self> {
        self.predicate.set_first_result(position)?;
        Ok(self)
    }

    /// Produce the predicate. Fails if nothing was specified.
    pub fn build(self) -> QueryResult<Predicate> {
        if self.predicate.is_empty() {
            return Err(QueryError::InvalidPredicate(
                "Predicate is empty. No condition defined.".into(),
            ));
        }
        Ok(self.predicate)
    }

    fn push(
        mut self,
        connective: Connective,
        slot: Option<IndexSlot>,
        value: Option<&str>,
    ) -> Self {
        if let (Some(slot), Some(value)) = (slot, value) {
            self.predicate.add(connective, slot, value);
        }
        self
    }
}
