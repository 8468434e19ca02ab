//! A reusable server actor dispatching calls by method name.
//!
//! Implement [`Server`] with the closed set of methods you expose, then
//! [`spawn_server`] it. The loop receives the call shape forever and replies
//! with the matching response variant: a result, `invalid_method` for a name
//! the server does not expose, or a formatted exception when the handler
//! fails. `server_start` runs before the first receive; `server_stop` runs
//! on every way out of the loop, including a kill.

// Layer 1: Standard library imports
// (none)

// Layer 2: Third-party crate imports
use async_trait::async_trait;
use tracing::debug;

// Layer 3: Internal module imports
use super::protocol::{self, call_shape};
use crate::actor::address::Address;
use crate::actor::context::ActorContext;
use crate::actor::error::{ActorError, FailureReport, RtResult};
use crate::actor::lifecycle::spawn;
use crate::actor::traits::Actor;
use crate::message::Value;

/// Outcome of dispatching one call to a [`Server`].
#[derive(Debug)]
pub enum Dispatch {
    /// The method exists; reply with the result or a formatted failure.
    Handled(RtResult<Value>),
    /// The server exposes no such method.
    Unknown,
}

impl Dispatch {
    /// A successful reply.
    pub fn reply(message: impl Into<Value>) -> Self {
        Self::Handled(Ok(message.into()))
    }

    /// A failed handler.
    pub fn fail(error: ActorError) -> Self {
        Self::Handled(Err(error))
    }
}

/// An actor that answers the call protocol.
#[async_trait]
pub trait Server: Send + 'static {
    /// Runs once before the dispatch loop starts.
    async fn server_start(&mut self, _ctx: &mut ActorContext) -> RtResult<()> {
        Ok(())
    }

    /// Runs once on every exit path of the dispatch loop.
    async fn server_stop(&mut self, _ctx: &mut ActorContext) {}

    /// Resolve `method` against the server's operations.
    ///
    /// Return [`Dispatch::Unknown`] for a name outside the exposed set; the
    /// loop turns it into an `invalid_method` response.
    async fn handle(&mut self, ctx: &mut ActorContext, method: &str, message: Value) -> Dispatch;
}

/// Spawn `server` wrapped in the dispatch loop; returns its address.
pub fn spawn_server<S: Server>(server: S) -> Address {
    spawn(ServerActor::new(server))
}

/// The dispatch-loop actor wrapping a [`Server`].
///
/// Usually spawned through [`spawn_server`]; exposed for callers that want
/// to `spawn_link` a server instead.
pub struct ServerActor<S> {
    server: S,
}

impl<S: Server> ServerActor<S> {
    pub fn new(server: S) -> Self {
        Self { server }
    }

    async fn serve(&mut self, ctx: &mut ActorContext) -> RtResult<Value> {
        let accept = [call_shape()];
        loop {
            let (_pattern, message) = ctx.receive(&accept).await?;
            let method = message
                .get("method")
                .and_then(Value::as_str)
                .map(str::to_owned)
                .ok_or_else(|| ActorError::InvalidCallMessage(format!("{message:?}")))?;
            let payload = message.get("message").cloned().unwrap_or(Value::Null);

            let replied = match self.server.handle(ctx, &method, payload).await {
                Dispatch::Unknown => protocol::respond_invalid_method(&message, &method),
                Dispatch::Handled(Ok(result)) => protocol::respond(&message, result),
                Dispatch::Handled(Err(ActorError::Killed)) => return Err(ActorError::Killed),
                Dispatch::Handled(Err(failure)) => {
                    protocol::respond_exception(&message, FailureReport::from_error(&failure).to_value())
                }
            };
            // A caller gone between call and reply is not the server's
            // problem.
            if let Err(cast_error) = replied {
                debug!(method = %method, %cast_error, "dropping reply");
            }
        }
    }
}

#[async_trait]
impl<S: Server> Actor for ServerActor<S> {
    async fn main(&mut self, mut ctx: ActorContext) -> RtResult<Value> {
        self.server.server_start(&mut ctx).await?;
        let outcome = self.serve(&mut ctx).await;
        self.server.server_stop(&mut ctx).await;
        outcome
    }
}
