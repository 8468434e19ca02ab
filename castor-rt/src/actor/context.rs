//! The execution surface handed to a running actor body.
//!
//! The context is the actor's own end of its cell: selective receive over
//! the private mailbox, timed sleeps, cooperative yields, link management,
//! renaming, and the respond helpers of the call protocol. It is not `Clone`
//! and `receive` takes `&mut self`, so there is at most one pending receiver
//! per actor by construction.
//!
//! All suspension points (the receive wait, `sleep`, `cooperate`, the wait
//! inside `call`, and `wait`) watch the kill signal and return
//! [`ActorError::Killed`] when the actor has been killed. A body that never
//! suspends cannot be interrupted; that is the cooperative contract.

// Layer 1: Standard library imports
use std::sync::Arc;
use std::time::Duration;

// Layer 2: Third-party crate imports
use tokio::time::{sleep_until, Instant};

// Layer 3: Internal module imports
use super::address::{ActorId, Address};
use super::cell::ActorCell;
use super::error::{ActorError, RtResult};
use super::lifecycle;
use super::registry;
use super::traits::Actor;
use crate::call::protocol;
use crate::message::Value;
use crate::shape::Shape;

pub struct ActorContext {
    cell: Arc<ActorCell>,
}

impl ActorContext {
    pub(crate) fn new(cell: Arc<ActorCell>) -> Self {
        Self { cell }
    }

    /// This actor's own address, embeddable in messages.
    pub fn address(&self) -> Address {
        Address::from_cell(&self.cell)
    }

    /// This actor's current id.
    pub fn actor_id(&self) -> ActorId {
        self.cell.actor_id()
    }

    /// Select the next message matching any of `patterns`, blocking until
    /// one arrives.
    ///
    /// An empty pattern slice matches anything and takes the mailbox head.
    /// Returns the pattern that matched together with the message; ties
    /// among patterns are broken by their order in the slice. The mailbox is
    /// scanned head to tail, and entries that match nothing keep their
    /// positions; newly arrived messages never jump the queue.
    pub async fn receive(&mut self, patterns: &[Shape]) -> RtResult<(Shape, Value)> {
        match self.receive_inner(patterns, None).await? {
            Some(matched) => Ok(matched),
            // Only the zero-timeout path and an armed deadline produce None,
            // and neither exists without a timeout.
            None => Err(ActorError::failure(
                "InternalError",
                "receive without a deadline cannot time out",
            )),
        }
    }

    /// Like [`receive`](Self::receive), giving up after `timeout`.
    ///
    /// Returns `Ok(None)` on expiry. A zero timeout polls the mailbox once
    /// and returns without suspending, even when nothing matches.
    pub async fn receive_timeout(
        &mut self,
        patterns: &[Shape],
        timeout: Duration,
    ) -> RtResult<Option<(Shape, Value)>> {
        self.receive_inner(patterns, Some(timeout)).await
    }

    async fn receive_inner(
        &mut self,
        patterns: &[Shape],
        timeout: Option<Duration>,
    ) -> RtResult<Option<(Shape, Value)>> {
        if let Some(duration) = timeout {
            if duration.is_zero() {
                return Ok(self.cell.mailbox.take_first(patterns));
            }
        }
        let deadline = timeout.map(|duration| Instant::now() + duration);
        loop {
            if let Some(matched) = self.cell.mailbox.take_first(patterns) {
                return Ok(Some(matched));
            }
            if self.cell.is_killed() {
                return Err(ActorError::Killed);
            }
            // The signal future is created by the select below after the
            // scan above came up empty; a delivery in between leaves a
            // permit, so the wait completes immediately and we re-scan
            // from the head.
            match deadline {
                Some(deadline) => {
                    tokio::select! {
                        _ = self.cell.mailbox.signalled() => {}
                        _ = self.cell.kill_signal().notified() => return Err(ActorError::Killed),
                        _ = sleep_until(deadline) => return Ok(None),
                    }
                }
                None => {
                    tokio::select! {
                        _ = self.cell.mailbox.signalled() => {}
                        _ = self.cell.kill_signal().notified() => return Err(ActorError::Killed),
                    }
                }
            }
        }
    }

    /// Suspend for `duration`.
    pub async fn sleep(&self, duration: Duration) -> RtResult<()> {
        if self.cell.is_killed() {
            return Err(ActorError::Killed);
        }
        tokio::select! {
            _ = tokio::time::sleep(duration) => Ok(()),
            _ = self.cell.kill_signal().notified() => Err(ActorError::Killed),
        }
    }

    /// Yield to the scheduler without delay.
    pub async fn cooperate(&self) -> RtResult<()> {
        if self.cell.is_killed() {
            return Err(ActorError::Killed);
        }
        tokio::task::yield_now().await;
        if self.cell.is_killed() {
            return Err(ActorError::Killed);
        }
        Ok(())
    }

    /// Change this actor's public id and re-key the registry.
    ///
    /// Existing addresses keep resolving to this actor; only lookups by id
    /// follow the new name.
    pub fn rename(&self, new_id: impl Into<String>) {
        registry::rename(&self.cell, ActorId::from(new_id.into()));
    }

    /// Subscribe `address` to this actor's termination: it receives an
    /// `{address, exception}` message if this actor fails and, with
    /// `trap_exit`, an `{address, exit}` message on a normal return.
    pub fn add_link(&self, address: Address, trap_exit: bool) {
        self.cell.add_link(address, trap_exit);
    }

    /// Spawn a child actor linked to this one (as both failure and exit
    /// subscriber), returning its address.
    ///
    /// The link is installed before the child can run, so no termination
    /// notice is ever missed.
    pub fn spawn_link<A: Actor>(&self, actor: A) -> Address {
        self.spawn_link_boxed(Box::new(actor))
    }

    pub(crate) fn spawn_link_boxed(&self, actor: Box<dyn Actor>) -> Address {
        lifecycle::spawn_boxed(actor, Some(self.address()))
    }

    /// Call a method on `target`; see [`Address::call`].
    pub async fn call(
        &mut self,
        target: &Address,
        method: &str,
        message: impl Into<Value>,
        timeout: Option<Duration>,
    ) -> RtResult<Value> {
        protocol::call(self, target, method, message.into(), timeout).await
    }

    /// Wait for `target` to finish and return its result, remaining
    /// interruptible by a kill of this actor.
    pub async fn wait(&self, target: &Address) -> RtResult<Value> {
        let cell = target.cell()?;
        if self.cell.is_killed() {
            return Err(ActorError::Killed);
        }
        tokio::select! {
            outcome = cell.exit().wait() => outcome,
            _ = self.cell.kill_signal().notified() => Err(ActorError::Killed),
        }
    }

    /// Reply to a call message with a result; see
    /// [`protocol::respond`](crate::call::protocol::respond).
    pub fn respond(&self, origin: &Value, response: impl Into<Value>) -> RtResult<()> {
        protocol::respond(origin, response.into())
    }

    /// Reply to a call message naming a method this actor does not expose.
    pub fn respond_invalid_method(&self, origin: &Value, method: &str) -> RtResult<()> {
        protocol::respond_invalid_method(origin, method)
    }

    /// Reply to a call message with a formatted failure.
    pub fn respond_exception(&self, origin: &Value, report: Value) -> RtResult<()> {
        protocol::respond_exception(origin, report)
    }
}
