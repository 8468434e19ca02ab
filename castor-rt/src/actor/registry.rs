//! Process-wide actor registry.
//!
//! Maps live actor ids to their cells. Every live actor is present exactly
//! while it runs: spawn registers before the body's first poll, termination
//! deregisters after the exit slot completes. Lookups back both
//! [`Address::lookup`](super::address::Address::lookup) and the decoding of
//! addresses embedded in messages.

// Layer 1: Standard library imports
use std::sync::Arc;

// Layer 2: Third-party crate imports
use dashmap::DashMap;
use once_cell::sync::Lazy;
use tracing::debug;

// Layer 3: Internal module imports
use super::address::{ActorId, Address};
use super::cell::ActorCell;
use super::error::{ActorError, RtResult};

static ACTORS: Lazy<DashMap<ActorId, Arc<ActorCell>>> = Lazy::new(DashMap::new);

/// Make `cell` reachable under its current id.
pub(crate) fn register(cell: &Arc<ActorCell>) {
    ACTORS.insert(cell.actor_id(), Arc::clone(cell));
}

/// Drop the entry for `id`, if any.
pub(crate) fn deregister(id: &ActorId) {
    ACTORS.remove(id);
}

/// Fetch the cell registered under `id`.
pub(crate) fn get(id: &ActorId) -> Option<Arc<ActorCell>> {
    ACTORS.get(id).map(|entry| Arc::clone(entry.value()))
}

/// Resolve an id to an address, failing for unknown or terminated actors.
pub(crate) fn lookup(id: &ActorId) -> RtResult<Address> {
    get(id)
        .filter(|cell| !cell.is_dead())
        .map(|cell| Address::from_cell(&cell))
        .ok_or(ActorError::DeadActor)
}

/// Re-key `cell` under a new public id.
///
/// Existing addresses keep working (they hold the cell, not the key); only
/// lookups change. A previously registered actor under the new id is
/// shadowed, last write wins.
pub(crate) fn rename(cell: &Arc<ActorCell>, new_id: ActorId) {
    let old_id = cell.actor_id();
    debug!(%old_id, %new_id, "rename");
    ACTORS.remove(&old_id);
    cell.set_id(new_id);
    register(cell);
}
