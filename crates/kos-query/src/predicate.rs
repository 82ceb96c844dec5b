use std::fmt;
use std::fmt::Write as _;

use kos_types::{stable_hash, IndexSlot};
use serde::{Deserialize, Serialize};

use crate::error::{QueryError, QueryResult};

/// Alias under which backends expose the record being matched.
pub const RECORD_ALIAS: &str = "ko";

/// How a condition joins the conditions before it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Connective {
    And,
    Or,
}

impl Connective {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::And => "AND",
            Self::Or => "OR",
        }
    }
}

impl fmt::Display for Connective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One index-equality test: `slot == stable_hash(value)`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Condition {
    pub connective: Connective,
    pub slot: IndexSlot,
    pub value: String,
}

impl Condition {
    pub fn new(connective: Connective, slot: IndexSlot, value: impl Into<String>) -> Self {
        Self {
            connective,
            slot,
            value: value.into(),
        }
    }

    /// Hash the value is compared against.
    pub fn hash(&self) -> i32 {
        stable_hash(&self.value)
    }
}

/// A search condition over the index slots of one record type.
///
/// Conditions keep their insertion order; `max_results` and `first_result`
/// are `None` until set, meaning no limit and no offset.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Predicate {
    conditions: Vec<Condition>,
    max_results: Option<usize>,
    first_result: Option<usize>,
}

impl Predicate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a condition.
    pub fn add(&mut self, connective: Connective, slot: IndexSlot, value: impl Into<String>) {
        self.conditions.push(Condition::new(connective, slot, value));
    }

    /// Set the maximum number of results. Negative values are rejected.
    pub fn set_max_results(&mut self, max: i64) -> QueryResult<()> {
        let max = usize::try_from(max).map_err(|_| {
            QueryError::InvalidPredicate("Max result number should not be negative.".into())
        })?;
        self.max_results = Some(max);
        Ok(())
    }

    /// Set the position of the first result. Negative values are rejected.
    pub fn set_first_result(&mut self, position: i64) -> QueryResult<()> {
        let position = usize::try_from(position).map_err(|_| {
            QueryError::InvalidPredicate("First result number should not be negative.".into())
        })?;
        self.first_result = Some(position);
        Ok(())
    }

    pub fn max_results(&self) -> Option<usize> {
        self.max_results
    }

    pub fn first_result(&self) -> Option<usize> {
        self.first_result
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    /// Returns `true` if at least one condition was added.
    pub fn has_conditions(&self) -> bool {
        !self.conditions.is_empty()
    }

    /// Returns `true` if there are no conditions and no pagination bounds.
    ///
    /// An empty predicate must not be used for a search.
    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty() && self.max_results.is_none() && self.first_result.is_none()
    }

    /// Render the conditions as a backend condition fragment.
    ///
    /// The first condition is the base clause and must not be an `OR`. Each
    /// following condition is appended as ` AND ` or ` OR ` in insertion
    /// order. A predicate holding only pagination bounds has nothing to
    /// render and fails.
    pub fn to_query(&self) -> QueryResult<String> {
        let Some((first, rest)) = self.conditions.split_first() else {
            return Err(QueryError::InvalidPredicate(
                "Predicate has no condition to render.".into(),
            ));
        };
        if first.connective == Connective::Or {
            return Err(QueryError::InvalidPredicate(
                "The first operand should not be OR.".into(),
            ));
        }

        let mut query = String::with_capacity(100);
        write_term(&mut query, first);
        for condition in rest {
            query.push(' ');
            query.push_str(condition.connective.as_str());
            query.push(' ');
            write_term(&mut query, condition);
        }
        Ok(query)
    }
}

fn write_term(query: &mut String, condition: &Condition) {
    // Writing into a String cannot fail.
    let _ = write!(
        query,
        "{RECORD_ALIAS}.{}={}",
        condition.slot.name(),
        condition.hash()
    );
}
