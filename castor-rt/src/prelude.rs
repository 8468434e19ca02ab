//! Prelude module for convenient imports.
//!
//! Re-exports the surface most actor code touches. Import it to get
//! started quickly:
//!
//! ```rust
//! use castor_rt::prelude::*;
//! ```
//!
//! # What's Included
//!
//! ## Core Actor System
//! - [`Actor`] - core trait for actors
//! - [`ActorContext`] - the running actor's execution surface
//! - [`Address`] / [`ActorId`] - actor references and identity
//! - [`spawn`] / [`from_fn`] - starting actors
//!
//! ## Messaging
//! - [`Value`] - the transportable value algebra
//! - [`Binary`] - opaque byte strings
//! - [`Shape`] - structural receive patterns
//! - [`is_shaped`] / [`calculate_shape`] - matching and inference
//!
//! ## Call Protocol
//! - [`Server`] / [`Dispatch`] / [`spawn_server`] - method-dispatch servers
//! - [`call_shape`] / [`call_shape_for`] - receive patterns for calls
//! - [`wait_all`] - fan out and collect termination records
//!
//! ## Errors
//! - [`ActorError`] / [`RtResult`] - the runtime error taxonomy
//! - [`FailureReport`] - transport-safe failure formatting

pub use crate::actor::{
    from_fn, set_verbose_failures, spawn, Actor, ActorContext, ActorError, ActorId, Address,
    FailureReport, RtResult,
};
pub use crate::call::{
    call_shape, call_shape_for, spawn_server, wait_all, CallRequest, Dispatch, Gather, Server,
};
pub use crate::message::{Binary, Value};
pub use crate::shape::{calculate_shape, is_shaped, is_shaped_exc, Shape};
