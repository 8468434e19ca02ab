//! Tightest-shape inference.
//!
//! `calculate_shape` derives the most specific [`Shape`] a given value
//! satisfies: primitives collapse to their type token, containers recurse.
//! The derived shape is what a receiver would pass to selective receive to
//! match "another message just like this one".

// Layer 1: Standard library imports
// (none)

// Layer 2: Third-party crate imports
use thiserror::Error;

// Layer 3: Internal module imports
use super::matcher::Shape;
use crate::message::Value;

/// Why a value has no derivable shape.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MalformedShape {
    /// An empty sequence or set has no element to take the shape from.
    #[error("cannot infer the element shape of an empty sequence")]
    Ambiguous,

    /// Sequence elements of mixed kinds admit no single element shape.
    #[error("sequence elements must share one kind to infer a shape")]
    Heterogeneous,
}

/// Derive the tightest shape of `value`.
///
/// Sequences and sets must be non-empty and homogeneous at the top level;
/// their element shape is inferred from the first element.
pub fn calculate_shape(value: &Value) -> Result<Shape, MalformedShape> {
    match value {
        Value::Null => Ok(Shape::Literal(Value::Null)),
        Value::Bool(_) => Ok(Shape::Bool),
        Value::Int(_) => Ok(Shape::Int),
        Value::Float(_) => Ok(Shape::Float),
        Value::Str(_) => Ok(Shape::Str),
        Value::Address(_) => Ok(Shape::Address),
        Value::Binary(_) => Ok(Shape::Binary),

        Value::Map(entries) => {
            let mut fields = std::collections::BTreeMap::new();
            for (key, entry) in entries {
                fields.insert(key.clone(), calculate_shape(entry)?);
            }
            Ok(Shape::Map(fields))
        }

        Value::Tuple(items) => {
            let mut shapes = Vec::with_capacity(items.len());
            for item in items {
                shapes.push(calculate_shape(item)?);
            }
            Ok(Shape::Tuple(shapes))
        }

        Value::List(items) => Ok(Shape::list(element_shape(items)?)),
        Value::Set(items) => Ok(Shape::set(element_shape(items)?)),
    }
}

fn element_shape(items: &[Value]) -> Result<Shape, MalformedShape> {
    let first = items.first().ok_or(MalformedShape::Ambiguous)?;
    if items.iter().any(|item| item.type_name() != first.type_name()) {
        return Err(MalformedShape::Heterogeneous);
    }
    calculate_shape(first)
}
