//! Call/response protocol, the server loop, and fan-out collection.
//!
//! # Components
//!
//! - [`protocol`] - envelope shapes, correlation ids, respond helpers
//! - [`Server`] / [`spawn_server`] - a reusable actor dispatching calls by
//!   method name
//! - [`wait_all`] / [`Gather`] - run a batch of actors and collect their
//!   termination records in input order

pub mod gather;
pub mod protocol;
pub mod server;

pub use gather::{wait_all, Gather};
pub use protocol::{call_shape, call_shape_for, CallRequest};
pub use server::{spawn_server, Dispatch, Server, ServerActor};
