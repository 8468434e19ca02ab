//! Actor core: identity, mailbox discipline, lifecycle, and links.
//!
//! # Components
//!
//! - [`Actor`] / [`from_fn`] - the trait every actor implements, and the
//!   closure adapter
//! - [`ActorContext`] - the running actor's own surface: selective receive,
//!   sleeps, links, renaming, respond helpers
//! - [`Address`] - shareable handle: cast, call, link, wait, kill, lookup
//! - [`spawn`] - start an actor; `ActorContext::spawn_link` for supervised
//!   children
//! - [`ActorError`] / [`FailureReport`] - error taxonomy and its
//!   transport-safe form
//!
//! Internal pieces (the cell, the mailbox queue, the registry) are not part
//! of the public surface; everything reaches them through the context or an
//! address.

pub mod address;
pub(crate) mod cell;
pub mod context;
pub mod error;
pub mod lifecycle;
pub(crate) mod mailbox;
pub(crate) mod registry;
pub mod traits;

pub use address::{ActorId, Address};
pub use context::ActorContext;
pub use error::{ActorError, FailureReport, RtResult};
pub use lifecycle::{set_verbose_failures, spawn};
pub use traits::{from_fn, Actor, FnActor};
