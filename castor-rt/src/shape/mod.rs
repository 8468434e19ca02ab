//! Structural patterns over message values.
//!
//! # Components
//!
//! - [`Shape`] - pattern grammar: type tokens, wildcard, literals, containers
//! - [`is_shaped`] / [`is_shaped_exc`] - the matcher, boolean or diagnostic
//! - [`calculate_shape`] - tightest-shape inference for a given value
//!
//! Selective receive is built on this matcher: patterns handed to
//! `receive` are shapes, and the first mailbox entry satisfying any of
//! them is the one delivered.

pub mod infer;
pub mod matcher;

pub use infer::{calculate_shape, MalformedShape};
pub use matcher::{is_shaped, is_shaped_exc, Shape, ShapeError};
