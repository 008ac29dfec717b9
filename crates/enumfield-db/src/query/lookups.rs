//! Query lookups and Q objects for building filters.
//!
//! This module provides the [`Lookup`] enum for field-level comparisons and
//! the [`Q`] enum for combining filters with AND, OR, and NOT operators.
//! An [`EnumField`](crate::fields::EnumField) rewrites the values inside
//! these filters into the integers stored in the database.
//!
//! # Examples
//!
//! ```
//! use enumfield_db::query::lookups::{Q, Lookup};
//! use enumfield_db::value::Value;
//!
//! // status = "live" AND priority > 2
//! let q = Q::filter("status", Lookup::Exact(Value::from("live")))
//!     & Q::filter("priority", Lookup::Gt(Value::from(2)));
//!
//! // NOT(status IS NULL)
//! let present = !Q::filter("status", Lookup::IsNull(true));
//! ```

use crate::value::Value;
use std::ops;

/// A field-level lookup operation.
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup {
    /// Exact match (`field = value`).
    Exact(Value),
    /// Case-insensitive exact match.
    IExact(Value),
    /// Substring match.
    Contains(String),
    /// Membership test (`field IN (values...)`).
    In(Vec<Value>),
    /// Greater than (`field > value`).
    Gt(Value),
    /// Greater than or equal (`field >= value`).
    Gte(Value),
    /// Less than (`field < value`).
    Lt(Value),
    /// Less than or equal (`field <= value`).
    Lte(Value),
    /// Range test (`field BETWEEN low AND high`).
    Range(Value, Value),
    /// NULL test (`field IS NULL` or `field IS NOT NULL`).
    IsNull(bool),
}

impl Lookup {
    /// The lookup name as written in a filter (`"exact"`, `"in"`, ...).
    pub const fn lookup_type(&self) -> &'static str {
        match self {
            Self::Exact(_) => "exact",
            Self::IExact(_) => "iexact",
            Self::Contains(_) => "contains",
            Self::In(_) => "in",
            Self::Gt(_) => "gt",
            Self::Gte(_) => "gte",
            Self::Lt(_) => "lt",
            Self::Lte(_) => "lte",
            Self::Range(..) => "range",
            Self::IsNull(_) => "isnull",
        }
    }
}

/// A composable query filter, equivalent to Django's `Q` object.
#[derive(Debug, Clone, PartialEq)]
pub enum Q {
    /// A single field lookup.
    Filter {
        /// The field name.
        field: String,
        /// The lookup operation.
        lookup: Lookup,
    },
    /// Logical AND of multiple conditions.
    And(Vec<Q>),
    /// Logical OR of multiple conditions.
    Or(Vec<Q>),
    /// Logical negation of a condition.
    Not(Box<Q>),
}

impl Q {
    /// Creates a new filter Q object.
    pub fn filter(field: impl Into<String>, lookup: Lookup) -> Self {
        Self::Filter {
            field: field.into(),
            lookup,
        }
    }

    /// Rebuilds this tree, passing every leaf filter through `f`.
    pub fn try_map_filters<E>(
        self,
        f: &mut impl FnMut(String, Lookup) -> Result<Self, E>,
    ) -> Result<Self, E> {
        match self {
            Self::Filter { field, lookup } => f(field, lookup),
            Self::And(children) => children
                .into_iter()
                .map(|child| child.try_map_filters(&mut *f))
                .collect::<Result<_, _>>()
                .map(Self::And),
            Self::Or(children) => children
                .into_iter()
                .map(|child| child.try_map_filters(&mut *f))
                .collect::<Result<_, _>>()
                .map(Self::Or),
            Self::Not(inner) => inner.try_map_filters(f).map(|q| Self::Not(Box::new(q))),
        }
    }
}

impl ops::BitAnd for Q {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self::Output {
        match (self, rhs) {
            // Flatten nested ANDs
            (Self::And(mut left), Self::And(right)) => {
                left.extend(right);
                Self::And(left)
            }
            (Self::And(mut left), other) => {
                left.push(other);
                Self::And(left)
            }
            (other, Self::And(mut right)) => {
                right.insert(0, other);
                Self::And(right)
            }
            (left, right) => Self::And(vec![left, right]),
        }
    }
}

impl ops::BitOr for Q {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        match (self, rhs) {
            // Flatten nested ORs
            (Self::Or(mut left), Self::Or(right)) => {
                left.extend(right);
                Self::Or(left)
            }
            (Self::Or(mut left), other) => {
                left.push(other);
                Self::Or(left)
            }
            (other, Self::Or(mut right)) => {
                right.insert(0, other);
                Self::Or(right)
            }
            (left, right) => Self::Or(vec![left, right]),
        }
    }
}

impl ops::Not for Q {
    type Output = Self;

    fn not(self) -> Self::Output {
        match self {
            Self::Not(inner) => *inner,
            other => Self::Not(Box::new(other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_type_names() {
        assert_eq!(Lookup::Exact(Value::Null).lookup_type(), "exact");
        assert_eq!(Lookup::In(vec![]).lookup_type(), "in");
        assert_eq!(Lookup::IsNull(true).lookup_type(), "isnull");
        assert_eq!(
            Lookup::Range(Value::Int(1), Value::Int(2)).lookup_type(),
            "range"
        );
        assert_eq!(Lookup::Contains("x".into()).lookup_type(), "contains");
    }

    #[test]
    fn test_and_flattening() {
        let q1 = Q::filter("a", Lookup::Exact(Value::from(1)));
        let q2 = Q::filter("b", Lookup::Exact(Value::from(2)));
        let q3 = Q::filter("c", Lookup::Exact(Value::from(3)));
        match (q1 & q2) & q3 {
            Q::And(children) => assert_eq!(children.len(), 3),
            other => panic!("Expected And with 3 children, got {other:?}"),
        }
    }

    #[test]
    fn test_or_flattening() {
        let q1 = Q::filter("a", Lookup::Exact(Value::from(1)));
        let q2 = Q::filter("b", Lookup::Exact(Value::from(2)));
        let q3 = Q::filter("c", Lookup::Exact(Value::from(3)));
        match (q1 | q2) | q3 {
            Q::Or(children) => assert_eq!(children.len(), 3),
            other => panic!("Expected Or with 3 children, got {other:?}"),
        }
    }

    #[test]
    fn test_double_negation() {
        let q = Q::filter("active", Lookup::Exact(Value::from(true)));
        assert_eq!(!!q.clone(), q);
    }

    #[test]
    fn test_try_map_filters_rewrites_leaves() {
        let q = Q::filter("a", Lookup::Exact(Value::from(1)))
            | !Q::filter("b", Lookup::Exact(Value::from(2)));

        let mapped: Result<Q, ()> = q.try_map_filters(&mut |field, lookup| {
            let lookup = match lookup {
                Lookup::Exact(Value::Int(i)) => Lookup::Exact(Value::Int(i * 10)),
                other => other,
            };
            Ok(Q::filter(field, lookup))
        });

        let expected = Q::filter("a", Lookup::Exact(Value::from(10)))
            | !Q::filter("b", Lookup::Exact(Value::from(20)));
        assert_eq!(mapped.unwrap(), expected);
    }

    #[test]
    fn test_try_map_filters_short_circuits() {
        let q = Q::filter("a", Lookup::IsNull(true)) & Q::filter("b", Lookup::IsNull(false));
        let mut calls = 0;
        let mapped: Result<Q, &str> = q.try_map_filters(&mut |_, _| {
            calls += 1;
            Err("stop")
        });
        assert_eq!(mapped.unwrap_err(), "stop");
        assert_eq!(calls, 1);
    }
}
