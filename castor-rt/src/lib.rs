//! # castor-rt - In-Process Actor Runtime with Selective Receive
//!
//! Lightweight actor model for building concurrent applications out of
//! isolated units of execution that communicate exclusively by asynchronous
//! messages. Actors are identified by opaque addresses that can travel
//! inside messages, receive selectively against structural patterns, link to
//! each other's termination, and answer synchronous calls layered over
//! asynchronous casts.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use castor_rt::prelude::*;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> RtResult<()> {
//!     // A child that answers the first message it receives.
//!     let echo = spawn(from_fn(|mut ctx| async move {
//!         let (_pattern, message) = ctx.receive(&[]).await?;
//!         Ok(message)
//!     }));
//!
//!     echo.cast(Value::from("hello"))?;
//!     assert_eq!(echo.wait().await?, Value::from("hello"));
//!     Ok(())
//! }
//! ```
//!
//! # Core Concepts
//!
//! ## Mailboxes and Selective Receive
//! Every actor owns a FIFO mailbox. `receive` scans it head to tail against
//! any number of [`Shape`](shape::Shape) patterns and removes the first
//! matching entry, leaving the rest in order. With a timeout, expiry
//! returns `None` instead of a message; a zero timeout polls without
//! suspending.
//!
//! ## Isolation Through the Envelope
//! Every cast encodes the message to JSON text and decodes it on delivery,
//! also in-process. Receivers can never alias sender-side state. Addresses
//! and binary blobs survive the round trip via reserved envelope tags.
//!
//! ## Links and Supervision
//! `spawn_link` (or `Address::link`) subscribes one actor to another's
//! termination. A linked actor's normal return arrives as
//! `{address, exit: result}`, a failure as `{address, exception: report}`:
//! ordinary messages, received like any other. No error ever crosses an
//! actor boundary directly.
//!
//! ## Calls Over Casts
//! `Address::call` casts a correlated request and selective-receives the
//! response; [`Server`](call::Server) implements the answering side as a
//! dispatch loop over named methods.
//!
//! # Scheduling Model
//!
//! The runtime targets Tokio's current-thread flavour: all actors share one
//! executor and switch only at suspension points (receive, sleep,
//! cooperate, call, wait). `cast` never suspends. Mailbox delivery itself is
//! thread-safe, but the deferred-start contract (a parent finishes its
//! post-spawn statements before the child runs) holds on the
//! single-threaded flavour.
//!
//! # Module Organization
//!
//! - [`message`] - value algebra and the wire envelope
//! - [`shape`] - structural patterns and matching
//! - [`actor`] - identity, mailbox, context, lifecycle, links
//! - [`call`] - call/response protocol, server loop, gather
//! - [`prelude`] - one-stop imports

pub mod actor;
pub mod call;
pub mod message;
pub mod prelude;
pub mod shape;

// Re-export commonly used types
pub use actor::{
    from_fn, set_verbose_failures, spawn, Actor, ActorContext, ActorError, ActorId, Address,
    FailureReport, FnActor, RtResult,
};
pub use call::{
    call_shape, call_shape_for, spawn_server, wait_all, CallRequest, Dispatch, Gather, Server,
    ServerActor,
};
pub use message::{Binary, Value};
pub use shape::{calculate_shape, is_shaped, is_shaped_exc, MalformedShape, Shape, ShapeError};
