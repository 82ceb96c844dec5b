//! Parsing and evaluation of rendered condition fragments.
//!
//! A fragment is what [`Predicate::to_query`](crate::Predicate::to_query)
//! produces: `ko.<slot>=<hash>` terms separated by `AND` / `OR`. Evaluation
//! is a flat left-to-right fold, `((t0 op1 t1) op2 t2) ...`.

use kos_types::{IndexSlot, IndexValues};

use crate::error::{QueryError, QueryResult};
use crate::predicate::{Connective, Predicate, RECORD_ALIAS};

/// `slot == hash`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Term {
    pub slot: IndexSlot,
    pub hash: i32,
}

impl Term {
    pub fn matches(&self, indexes: &IndexValues) -> bool {
        indexes.get(self.slot) == Some(self.hash)
    }
}

/// A parsed condition fragment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConditionExpr {
    first: Term,
    rest: Vec<(Connective, Term)>,
}

impl ConditionExpr {
    /// Parse a rendered fragment.
    pub fn parse(fragment: &str) -> QueryResult<Self> {
        let malformed = |reason: &str| QueryError::MalformedCondition {
            fragment: fragment.to_string(),
            reason: reason.to_string(),
        };

        let mut tokens = fragment.split_whitespace();
        let first = tokens
            .next()
            .ok_or_else(|| malformed("empty condition"))
            .and_then(|token| parse_term(token).map_err(|reason| malformed(&reason)))?;

        let mut rest = Vec::new();
        while let Some(token) = tokens.next() {
            let connective = match token {
                "AND" => Connective::And,
                "OR" => Connective::Or,
                other => return Err(malformed(&format!("expected AND or OR, found `{other}`"))),
            };
            let term = tokens
                .next()
                .ok_or_else(|| malformed("dangling connective"))
                .and_then(|token| parse_term(token).map_err(|reason| malformed(&reason)))?;
            rest.push((connective, term));
        }
        Ok(Self { first, rest })
    }

    /// Render `predicate` and parse the result.
    ///
    /// Fails with the rendering error for a leading `OR` or a predicate
    /// without conditions.
    pub fn from_predicate(predicate: &Predicate) -> QueryResult<Self> {
        Self::parse(&predicate.to_query()?)
    }

    /// Evaluate against a record's index values.
    pub fn matches(&self, indexes: &IndexValues) -> bool {
        self.rest
            .iter()
            .fold(self.first.matches(indexes), |acc, (connective, term)| {
                match connective {
                    Connective::And => acc && term.matches(indexes),
                    Connective::Or => acc || term.matches(indexes),
                }
            })
    }

    /// Number of terms.
    pub fn len(&self) -> usize {
        1 + self.rest.len()
    }

    /// Always `false`; a parsed expression has at least one term.
    pub fn is_empty(&self) -> bool {
        false
    }
}

fn parse_term(token: &str) -> Result<Term, String> {
    let column = token
        .strip_prefix(RECORD_ALIAS)
        .and_then(|rest| rest.strip_prefix('.'))
        .ok_or_else(|| format!("term `{token}` is not qualified with `{RECORD_ALIAS}.`"))?;
    let (slot, hash) = column
        .split_once('=')
        .ok_or_else(|| format!("term `{token}` has no `=`"))?;
    let slot = slot.parse::<IndexSlot>().map_err(|e| e.to_string())?;
    let hash = hash
        .parse::<i32>()
        .map_err(|e| format!("bad hash in `{token}`: {e}"))?;
    Ok(Term { slot, hash })
}
