//! The `Actor` trait and the closure adapter.
//!
//! An actor is anything with an async `main` that consumes the actor's
//! [`ActorContext`] and produces a final [`Value`] (or an error). Struct
//! actors carry their configuration as fields; one-off bodies wrap a closure
//! with [`from_fn`].
//!
//! # Example
//!
//! ```rust,ignore
//! use async_trait::async_trait;
//! use castor_rt::prelude::*;
//!
//! struct Greeter {
//!     greeting: String,
//! }
//!
//! #[async_trait]
//! impl Actor for Greeter {
//!     async fn main(&mut self, mut ctx: ActorContext) -> RtResult<Value> {
//!         let (_pattern, message) = ctx.receive(&[Shape::Str]).await?;
//!         Ok(Value::from(format!("{}, {message:?}", self.greeting)))
//!     }
//! }
//!
//! let address = spawn(Greeter { greeting: "hello".into() });
//! ```

// Layer 1: Standard library imports
use std::future::Future;

// Layer 2: Third-party crate imports
use async_trait::async_trait;

// Layer 3: Internal module imports
use super::context::ActorContext;
use super::error::{ActorError, RtResult};
use crate::message::Value;

/// A unit of isolated execution.
///
/// `main` runs exactly once on the actor's own task. Its return value
/// completes the exit slot and is delivered to exit links; an `Err` follows
/// the failure path instead (alink notification, `wait` re-raises).
#[async_trait]
pub trait Actor: Send + 'static {
    /// The actor body.
    async fn main(&mut self, ctx: ActorContext) -> RtResult<Value>;
}

/// Adapt an async closure into an [`Actor`].
///
/// The closure receives the owned context (the receive capability) the
/// way struct actors receive it through `main`.
///
/// # Example
///
/// ```rust,ignore
/// use castor_rt::prelude::*;
///
/// let address = spawn(from_fn(|_ctx| async move { Ok(Value::Int(2 + 2)) }));
/// ```
pub fn from_fn<F, Fut>(body: F) -> FnActor<F>
where
    F: FnOnce(ActorContext) -> Fut + Send + 'static,
    Fut: Future<Output = RtResult<Value>> + Send + 'static,
{
    FnActor { body: Some(body) }
}

/// An [`Actor`] wrapping a one-shot closure; built by [`from_fn`].
pub struct FnActor<F> {
    body: Option<F>,
}

#[async_trait]
impl<F, Fut> Actor for FnActor<F>
where
    F: FnOnce(ActorContext) -> Fut + Send + 'static,
    Fut: Future<Output = RtResult<Value>> + Send + 'static,
{
    async fn main(&mut self, ctx: ActorContext) -> RtResult<Value> {
        match self.body.take() {
            Some(body) => body(ctx).await,
            None => Err(ActorError::failure(
                "InvalidState",
                "actor body already consumed",
            )),
        }
    }
}
