//! Actor identity and the public address handle.
//!
//! An [`Address`] is the only way one actor refers to another: it can be
//! copied freely, embedded inside messages, and survives the wire envelope.
//! The handle holds a weak reference to the actor cell, so once the actor
//! terminates and leaves the registry every operation on every copy of its
//! address fails with [`ActorError::DeadActor`].

// Layer 1: Standard library imports
use std::fmt;
use std::sync::{Arc, Weak};
use std::time::Duration;

// Layer 2: Third-party crate imports
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};
use uuid::Uuid;

// Layer 3: Internal module imports
use super::cell::ActorCell;
use super::context::ActorContext;
use super::error::{ActorError, RtResult};
use super::registry;
use crate::call::protocol::{self, CallRequest};
use crate::message::{codec, Value};

/// Unique identifier of an actor.
///
/// Freshly spawned actors get a UUID-v4 string; `rename` may substitute an
/// arbitrary public name. Identity is what survives the wire: an address
/// encodes to its actor id and is resolved back through the registry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActorId(String);

impl ActorId {
    /// Generate a fresh unique id.
    pub fn fresh() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// View the id as a string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ActorId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl From<String> for ActorId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// A reference to an actor.
///
/// Any holder of an address can asynchronously [`cast`](Address::cast) a
/// message into the actor's mailbox, [`call`](Address::call) it and wait for
/// a response, [`link`](Address::link) to its termination,
/// [`wait`](Address::wait) for its result, or [`kill`](Address::kill) it.
///
/// Two addresses are equal when they refer to the same actor.
#[derive(Clone)]
pub struct Address {
    cell: Weak<ActorCell>,
}

impl Address {
    pub(crate) fn from_cell(cell: &Arc<ActorCell>) -> Self {
        Self {
            cell: Arc::downgrade(cell),
        }
    }

    /// An address whose actor is already gone, e.g. decoded from a message
    /// naming an unknown actor id. Every operation fails with `DeadActor`.
    pub(crate) fn terminated() -> Self {
        Self { cell: Weak::new() }
    }

    /// Dereference to the live cell, or fail with `DeadActor`.
    pub(crate) fn cell(&self) -> RtResult<Arc<ActorCell>> {
        self.cell
            .upgrade()
            .filter(|cell| !cell.is_dead())
            .ok_or(ActorError::DeadActor)
    }

    /// Look up a live actor by id.
    pub fn lookup(actor_id: &str) -> RtResult<Self> {
        registry::lookup(&ActorId::from(actor_id))
    }

    /// The target's current actor id. Fails once the actor has terminated.
    pub fn actor_id(&self) -> RtResult<ActorId> {
        Ok(self.cell()?.actor_id())
    }

    /// Whether the target is still running.
    pub fn is_alive(&self) -> bool {
        self.cell().is_ok()
    }

    /// Send a message to the actor's mailbox.
    ///
    /// The message passes through the wire envelope even for same-process
    /// delivery, so the receiver never aliases the sender's data. Anything
    /// convertible into a [`Value`] can be cast.
    pub fn cast(&self, message: impl Into<Value>) -> RtResult<()> {
        let cell = self.cell()?;
        let wire = codec::encode(&message.into())?;
        let delivered = codec::decode(&wire)?;
        trace!(to = %cell.actor_id(), "cast");
        cell.mailbox.deliver(delivered);
        Ok(())
    }

    /// Call a named method on the target and wait for its response.
    ///
    /// Built from a pair of casts correlated by a fresh id; see
    /// [`crate::call::protocol`] for the envelope shapes. With a timeout,
    /// expiry surfaces as [`ActorError::CallTimeout`]; the callee is not
    /// cancelled and a late response stays in the caller's mailbox.
    pub async fn call(
        &self,
        ctx: &mut ActorContext,
        method: &str,
        message: impl Into<Value>,
        timeout: Option<Duration>,
    ) -> RtResult<Value> {
        protocol::call(ctx, self, method, message.into(), timeout).await
    }

    /// Start building a call, for fluent message/timeout configuration.
    pub fn request(&self, method: impl Into<String>) -> CallRequest<'_> {
        CallRequest::new(self, method)
    }

    /// Link the calling actor to this one.
    ///
    /// On failure of the target, the caller receives an
    /// `{address, exception}` message; with `trap_exit`, a normal return
    /// additionally delivers `{address, exit}`.
    pub fn link(&self, ctx: &ActorContext, trap_exit: bool) -> RtResult<()> {
        self.cell()?.add_link(ctx.address(), trap_exit);
        Ok(())
    }

    /// Wait for the actor to finish and return its result.
    ///
    /// A failed actor re-raises its error here; a killed actor yields
    /// [`ActorError::Killed`]. Every waiter observes the same outcome.
    pub async fn wait(&self) -> RtResult<Value> {
        let cell = self.cell()?;
        cell.exit().wait().await
    }

    /// Forcibly terminate the actor.
    ///
    /// The target observes [`ActorError::Killed`] at its next suspension
    /// point and then follows the failure path: alinks are notified and
    /// waiters see `Killed`.
    pub fn kill(&self) -> RtResult<()> {
        let cell = self.cell()?;
        debug!(to = %cell.actor_id(), "kill requested");
        cell.kill();
        Ok(())
    }
}

impl PartialEq for Address {
    fn eq(&self, other: &Self) -> bool {
        Weak::ptr_eq(&self.cell, &other.cell)
    }
}

impl Eq for Address {}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.actor_id() {
            Ok(id) => write!(f, "Address({id})"),
            Err(_) => write!(f, "Address(<terminated>)"),
        }
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_actor_id_uniqueness() {
        assert_ne!(ActorId::fresh(), ActorId::fresh());
    }

    #[test]
    fn test_terminated_address_operations_fail() {
        let address = Address::terminated();

        assert!(!address.is_alive());
        assert_eq!(address.actor_id(), Err(ActorError::DeadActor));
        assert_eq!(address.cast(Value::Null), Err(ActorError::DeadActor));
        assert_eq!(address.kill(), Err(ActorError::DeadActor));
    }

    #[test]
    fn test_lookup_unknown_id_fails() {
        assert_eq!(
            Address::lookup("no-such-actor-id"),
            Err(ActorError::DeadActor)
        );
    }

    #[test]
    fn test_terminated_address_debug() {
        assert_eq!(format!("{:?}", Address::terminated()), "Address(<terminated>)");
    }
}
