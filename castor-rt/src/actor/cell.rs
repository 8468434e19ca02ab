//! Shared per-actor state.
//!
//! The cell is the one structure both sides of an actor touch: the actor
//! itself (through its context) and everyone holding an [`Address`] to it.
//! It bundles the identity, the mailbox, the link sets, the one-shot exit
//! slot, and the kill signal. The cell is owned by the registry and the
//! running task; addresses only hold weak references to it.

// Layer 1: Standard library imports
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

// Layer 2: Third-party crate imports
use parking_lot::{Mutex, RwLock};
use tokio::sync::Notify;

// Layer 3: Internal module imports
use super::address::{ActorId, Address};
use super::error::RtResult;
use super::mailbox::Mailbox;
use crate::message::Value;

/// One-shot container for an actor's final outcome.
///
/// The first `complete` wins; every `wait`, before or after completion,
/// observes the same outcome. The notify future is armed before the state
/// is re-checked so a completion between check and await is never missed.
pub(crate) struct ExitSlot {
    state: Mutex<Option<RtResult<Value>>>,
    notify: Notify,
}

impl ExitSlot {
    fn new() -> Self {
        Self {
            state: Mutex::new(None),
            notify: Notify::new(),
        }
    }

    /// Store the outcome if none is stored yet, then wake all waiters.
    pub(crate) fn complete(&self, outcome: RtResult<Value>) {
        {
            let mut state = self.state.lock();
            if state.is_none() {
                *state = Some(outcome);
            }
        }
        self.notify.notify_waiters();
    }

    /// Wait for the outcome. Returns immediately if already completed.
    pub(crate) async fn wait(&self) -> RtResult<Value> {
        loop {
            let notified = self.notify.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();
            if let Some(outcome) = self.state.lock().clone() {
                return outcome;
            }
            notified.await;
        }
    }
}

/// Link subscriptions, in registration order.
#[derive(Default)]
struct LinkSet {
    /// Notified with an `exception` record when the actor fails.
    alinks: Vec<Address>,
    /// Notified with an `exit` record when the actor returns normally.
    exit_links: Vec<Address>,
}

pub(crate) struct ActorCell {
    id: RwLock<ActorId>,
    pub(crate) mailbox: Mailbox,
    links: Mutex<LinkSet>,
    exit: ExitSlot,
    killed: AtomicBool,
    kill_signal: Notify,
    dead: AtomicBool,
}

impl ActorCell {
    /// Create a cell with a fresh identity.
    pub(crate) fn create() -> Arc<Self> {
        Arc::new(Self {
            id: RwLock::new(ActorId::fresh()),
            mailbox: Mailbox::new(),
            links: Mutex::new(LinkSet::default()),
            exit: ExitSlot::new(),
            killed: AtomicBool::new(false),
            kill_signal: Notify::new(),
            dead: AtomicBool::new(false),
        })
    }

    /// Current identity. Changes on rename, so callers take a snapshot.
    pub(crate) fn actor_id(&self) -> ActorId {
        self.id.read().clone()
    }

    pub(crate) fn set_id(&self, id: ActorId) {
        *self.id.write() = id;
    }

    /// Whether the actor has terminated and left the registry.
    pub(crate) fn is_dead(&self) -> bool {
        self.dead.load(Ordering::SeqCst)
    }

    pub(crate) fn mark_dead(&self) {
        self.dead.store(true, Ordering::SeqCst);
    }

    /// Whether a kill is pending. Checked at every suspension point.
    pub(crate) fn is_killed(&self) -> bool {
        self.killed.load(Ordering::SeqCst)
    }

    /// Request termination. The permit-holding notify means a kill sent
    /// while the target runs between suspension points is taken at the
    /// next one.
    pub(crate) fn kill(&self) {
        self.killed.store(true, Ordering::SeqCst);
        self.kill_signal.notify_one();
    }

    pub(crate) fn kill_signal(&self) -> &Notify {
        &self.kill_signal
    }

    /// Subscribe `address` to this actor's termination.
    pub(crate) fn add_link(&self, address: Address, trap_exit: bool) {
        let mut links = self.links.lock();
        links.alinks.push(address.clone());
        if trap_exit {
            links.exit_links.push(address);
        }
    }

    /// Failure subscribers, in registration order.
    pub(crate) fn alinks(&self) -> Vec<Address> {
        self.links.lock().alinks.clone()
    }

    /// Normal-exit subscribers, in registration order.
    pub(crate) fn exit_links(&self) -> Vec<Address> {
        self.links.lock().exit_links.clone()
    }

    pub(crate) fn exit(&self) -> &ExitSlot {
        &self.exit
    }
}
