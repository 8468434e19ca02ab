//! Structural pattern matching over message values.
//!
//! A [`Shape`] is written in the same grammar as a [`Value`], extended with
//! type tokens ("any integer", "any address", …) and a wildcard. Selective
//! receive scans mailboxes with these shapes, so matching must be total and
//! side-effect free: it only ever reads the value and reports either success
//! or a typed mismatch.
//!
//! # Matching rules, in order
//!
//! 1. The wildcard matches anything.
//! 2. Containers dispatch structurally: a mapping shape requires its keys to
//!    be present and match (extra keys are fine); a tuple shape requires
//!    exact arity and positional matches; a sequence or set shape carries a
//!    single element shape every element must match (sequences and sets are
//!    interchangeable on the value side).
//! 3. A literal shape matches a value of the same kind that compares equal.
//! 4. A type token matches any value of its kind.
//! 5. Anything else is a mismatch.
//!
//! # Example
//!
//! ```rust
//! use castor_rt::message::Value;
//! use castor_rt::shape::{is_shaped, Shape};
//!
//! let message = Value::map([("credit", Value::Int(250))]);
//! let pattern = Shape::map([("credit", Shape::Int)]);
//! assert!(is_shaped(&message, &pattern));
//! ```

// Layer 1: Standard library imports
use std::collections::BTreeMap;

// Layer 2: Third-party crate imports
use thiserror::Error;

// Layer 3: Internal module imports
use crate::message::Value;

/// A structural pattern over [`Value`]s.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    /// Matches any value.
    Any,
    /// Matches any boolean.
    Bool,
    /// Matches any integer.
    Int,
    /// Matches any float.
    Float,
    /// Matches any string.
    Str,
    /// Matches any actor address.
    Address,
    /// Matches any binary blob.
    Binary,
    /// Matches exactly this value.
    Literal(Value),
    /// Matches a mapping containing (at least) these keys, each matching
    /// its shape.
    Map(BTreeMap<String, Shape>),
    /// Matches a tuple of exactly this arity, position by position.
    Tuple(Vec<Shape>),
    /// Matches a sequence or set whose every element matches.
    List(Box<Shape>),
    /// Matches a sequence or set whose every element matches.
    Set(Box<Shape>),
}

impl Shape {
    /// Build a mapping shape from key/shape pairs.
    pub fn map<K, I>(fields: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Shape)>,
    {
        Self::Map(
            fields
                .into_iter()
                .map(|(key, shape)| (key.into(), shape))
                .collect(),
        )
    }

    /// Build a tuple shape.
    pub fn tuple<I: IntoIterator<Item = Shape>>(items: I) -> Self {
        Self::Tuple(items.into_iter().collect())
    }

    /// Build a sequence shape from its element shape.
    pub fn list(element: Shape) -> Self {
        Self::List(Box::new(element))
    }

    /// Build a set shape from its element shape.
    pub fn set(element: Shape) -> Self {
        Self::Set(Box::new(element))
    }

    /// Build a literal shape.
    pub fn literal(value: impl Into<Value>) -> Self {
        Self::Literal(value.into())
    }
}

/// Why a value failed to match a shape.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ShapeError {
    /// The value has the wrong kind for the shape.
    #[error("{found} value where {expected} was required")]
    Type {
        /// Kind the shape requires.
        expected: &'static str,
        /// Kind the value actually has.
        found: &'static str,
    },

    /// A key required by a mapping shape is absent.
    #[error("required key `{key}` is missing")]
    Key {
        /// The missing key.
        key: String,
    },

    /// A tuple value has the wrong arity.
    #[error("wrong arity: expected {expected} items, found {found}")]
    Size {
        /// Arity the shape requires.
        expected: usize,
        /// Arity the value has.
        found: usize,
    },

    /// A literal shape and a value of the same kind compare unequal.
    #[error("value {found} does not equal literal {expected}")]
    Mismatch {
        /// Debug form of the literal.
        expected: String,
        /// Debug form of the value.
        found: String,
    },
}

/// Does `value` match `shape`?
pub fn is_shaped(value: &Value, shape: &Shape) -> bool {
    is_shaped_exc(value, shape).is_ok()
}

/// Match `value` against `shape`, reporting the first mismatch found.
pub fn is_shaped_exc(value: &Value, shape: &Shape) -> Result<(), ShapeError> {
    match shape {
        Shape::Any => Ok(()),

        Shape::Map(fields) => {
            let Value::Map(entries) = value else {
                return Err(ShapeError::Type {
                    expected: "map",
                    found: value.type_name(),
                });
            };
            for (key, field_shape) in fields {
                let entry = entries.get(key).ok_or_else(|| ShapeError::Key { key: key.clone() })?;
                is_shaped_exc(entry, field_shape)?;
            }
            Ok(())
        }

        Shape::Tuple(item_shapes) => {
            let Value::Tuple(items) = value else {
                return Err(ShapeError::Type {
                    expected: "tuple",
                    found: value.type_name(),
                });
            };
            if items.len() != item_shapes.len() {
                return Err(ShapeError::Size {
                    expected: item_shapes.len(),
                    found: items.len(),
                });
            }
            for (item, item_shape) in items.iter().zip(item_shapes) {
                is_shaped_exc(item, item_shape)?;
            }
            Ok(())
        }

        Shape::List(element) | Shape::Set(element) => {
            let items = match value {
                Value::List(items) | Value::Set(items) => items,
                other => {
                    return Err(ShapeError::Type {
                        expected: "list or set",
                        found: other.type_name(),
                    })
                }
            };
            for item in items {
                is_shaped_exc(item, element)?;
            }
            Ok(())
        }

        Shape::Literal(expected) => {
            if value == expected {
                Ok(())
            } else if value.type_name() == expected.type_name() {
                Err(ShapeError::Mismatch {
                    expected: format!("{expected:?}"),
                    found: format!("{value:?}"),
                })
            } else {
                Err(ShapeError::Type {
                    expected: expected.type_name(),
                    found: value.type_name(),
                })
            }
        }

        Shape::Bool => expect_kind(value, matches!(value, Value::Bool(_)), "bool"),
        Shape::Int => expect_kind(value, matches!(value, Value::Int(_)), "int"),
        Shape::Float => expect_kind(value, matches!(value, Value::Float(_)), "float"),
        Shape::Str => expect_kind(value, matches!(value, Value::Str(_)), "str"),
        Shape::Address => expect_kind(value, matches!(value, Value::Address(_)), "address"),
        Shape::Binary => expect_kind(value, matches!(value, Value::Binary(_)), "binary"),
    }
}

fn expect_kind(value: &Value, matched: bool, expected: &'static str) -> Result<(), ShapeError> {
    if matched {
        Ok(())
    } else {
        Err(ShapeError::Type {
            expected,
            found: value.type_name(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ints(items: &[i64]) -> Vec<Value> {
        items.iter().map(|n| Value::Int(*n)).collect()
    }

    #[test]
    fn test_type_tokens() {
        assert!(is_shaped(&Value::from("hello"), &Shape::Str));
        assert!(is_shaped(&Value::Int(1), &Shape::Int));
        assert!(is_shaped(&Value::Bool(true), &Shape::Bool));
        assert!(is_shaped(&Value::Float(1.5), &Shape::Float));
    }

    #[test]
    fn test_type_tokens_are_strict() {
        assert_eq!(
            is_shaped_exc(&Value::Int(1), &Shape::Str),
            Err(ShapeError::Type { expected: "str", found: "int" })
        );
        // An integer is not a boolean, and not a float either.
        assert!(!is_shaped(&Value::Int(1), &Shape::Bool));
        assert!(!is_shaped(&Value::Int(1), &Shape::Float));
    }

    #[test]
    fn test_wildcard_matches_everything() {
        assert!(is_shaped(&Value::Null, &Shape::Any));
        assert!(is_shaped(&Value::map([("k", Value::Int(1))]), &Shape::Any));
    }

    #[test]
    fn test_list_shape() {
        let shape = Shape::list(Shape::Int);

        assert!(is_shaped(&Value::List(ints(&[1, 2, 3])), &shape));
        assert!(is_shaped(&Value::Set(ints(&[8, 9])), &shape));
        assert!(matches!(
            is_shaped_exc(&Value::List(vec![Value::Int(1), Value::from("x")]), &shape),
            Err(ShapeError::Type { .. })
        ));
        // A scalar is not a sequence.
        assert!(matches!(
            is_shaped_exc(&Value::Int(7), &Shape::list(Shape::literal("a"))),
            Err(ShapeError::Type { .. })
        ));
    }

    #[test]
    fn test_set_shape_accepts_lists_and_sets() {
        let shape = Shape::set(Shape::Str);

        assert!(is_shaped(&Value::List(vec![Value::from("x")]), &shape));
        assert!(is_shaped(&Value::Set(vec![Value::from("x")]), &shape));
        assert!(is_shaped(&Value::Set(vec![Value::from("x")]), &Shape::set(Shape::literal("x"))));
    }

    #[test]
    fn test_map_shape_allows_extra_keys() {
        let shape = Shape::map([("a", Shape::Str), ("c", Shape::Int)]);
        let value = Value::map([
            ("a", Value::from("b")),
            ("c", Value::Int(5)),
            ("extra", Value::Null),
        ]);

        assert!(is_shaped(&value, &shape));
    }

    #[test]
    fn test_map_shape_missing_key() {
        let shape = Shape::map([("foo", Shape::Int)]);
        let value = Value::map([("bar", Value::Int(1))]);

        assert_eq!(
            is_shaped_exc(&value, &shape),
            Err(ShapeError::Key { key: "foo".to_owned() })
        );
    }

    #[test]
    fn test_map_shape_requires_map() {
        assert!(matches!(
            is_shaped_exc(&Value::Int(1), &Shape::map([("a", Shape::Int)])),
            Err(ShapeError::Type { .. })
        ));
    }

    #[test]
    fn test_tuple_shape() {
        let shape = Shape::tuple([Shape::Int, Shape::Str, Shape::Bool]);
        let value = Value::tuple([Value::Int(1), Value::from("hello"), Value::Bool(true)]);

        assert!(is_shaped(&value, &shape));
    }

    #[test]
    fn test_tuple_arity_mismatch() {
        let value = Value::tuple([Value::Int(1), Value::from("hello"), Value::Bool(true)]);

        assert_eq!(
            is_shaped_exc(&value, &Shape::tuple([Shape::Int, Shape::Str])),
            Err(ShapeError::Size { expected: 2, found: 3 })
        );
        assert_eq!(
            is_shaped_exc(&value, &Shape::tuple([Shape::Int, Shape::Str, Shape::Bool, Shape::Int])),
            Err(ShapeError::Size { expected: 4, found: 3 })
        );
        // A list does not satisfy a tuple shape.
        assert!(matches!(
            is_shaped_exc(&Value::List(ints(&[1, 2, 3])), &Shape::tuple([Shape::Int, Shape::Int, Shape::Int])),
            Err(ShapeError::Type { .. })
        ));
    }

    #[test]
    fn test_deep_nesting() {
        let shape = Shape::map([
            ("hello", Shape::Int),
            ("world", Shape::list(Shape::map([("abc", Shape::Str)]))),
        ]);
        let value = Value::map([
            ("hello", Value::Int(1)),
            (
                "world",
                Value::List(vec![
                    Value::map([("abc", Value::from("def"))]),
                    Value::map([("abc", Value::from("def"))]),
                ]),
            ),
        ]);

        assert!(is_shaped(&value, &shape));
    }

    #[test]
    fn test_literal_match_and_mismatch() {
        let shape = Shape::map([("hello", Shape::literal("world"))]);

        assert!(is_shaped(&Value::map([("hello", Value::from("world"))]), &shape));
        assert!(matches!(
            is_shaped_exc(&Value::map([("hello", Value::from("something"))]), &shape),
            Err(ShapeError::Mismatch { .. })
        ));
        // Same literal, different kind: a type mismatch, not a value one.
        assert!(matches!(
            is_shaped_exc(&Value::Int(1), &Shape::literal("one")),
            Err(ShapeError::Type { .. })
        ));
        assert!(!is_shaped(&Value::Int(1), &Shape::literal(2)));
    }
}
